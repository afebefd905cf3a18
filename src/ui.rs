use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Paragraph, Widget, Wrap},
};
use time_humanize::{Accuracy, HumanTime, Tense};
use unicode_width::UnicodeWidthStr;
use webbrowser::Browser;

use levelup::badge::evaluate;
use levelup::confetti::Confetti;
use levelup::language::{bar_color, display_name};
use levelup::level::{hours, level_for, next_level, progress_percent, LEVELS};
use levelup::state::TOP_LANGUAGES;

use crate::App;

const ACCENT: Color = Color::Rgb(78, 201, 176);
const HORIZONTAL_MARGIN: u16 = 2;

pub fn format_hms(total_seconds: u64) -> String {
    let h = total_seconds / 3600;
    let m = (total_seconds % 3600) / 60;
    let s = total_seconds % 60;
    format!("{:02}:{:02}:{:02}", h, m, s)
}

fn section_label(text: &str) -> Paragraph<'_> {
    Paragraph::new(Span::styled(
        text,
        Style::default()
            .fg(Color::DarkGray)
            .add_modifier(Modifier::BOLD),
    ))
}

/// Fixed-width bar of filled/empty blocks.
fn bar_spans(percent: f64, width: u16, color: Color) -> Line<'static> {
    let width = width.max(1) as usize;
    let filled = ((percent / 100.0) * width as f64).round() as usize;
    let filled = filled.min(width);
    Line::from(vec![
        Span::styled("█".repeat(filled), Style::default().fg(color)),
        Span::styled(
            "░".repeat(width - filled),
            Style::default().fg(Color::DarkGray),
        ),
    ])
}

/// Pad or truncate a label to a fixed display width.
fn fit_label(text: &str, width: usize) -> String {
    let mut out = String::new();
    for c in text.chars() {
        if out.width() + 1 > width {
            break;
        }
        out.push(c);
    }
    while out.width() < width {
        out.push(' ');
    }
    out
}

impl Widget for &App {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let state = self.panel.state();
        let level_index = level_for(state.total_seconds);
        let level = &LEVELS[level_index];

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .horizontal_margin(HORIZONTAL_MARGIN)
            .vertical_margin(1)
            .constraints(
                [
                    Constraint::Length(3),                       // level header
                    Constraint::Length(3),                       // timer
                    Constraint::Length(3),                       // level progress
                    Constraint::Length(2 + TOP_LANGUAGES as u16), // languages
                    Constraint::Length(4),                       // badges
                    Constraint::Length(5),                       // characters
                    Constraint::Min(0),
                    Constraint::Length(1), // legend
                ]
                .as_ref(),
            )
            .split(area);

        self.render_header(level.name, level.flavor, chunks[0], buf);
        self.render_timer(chunks[1], buf);
        self.render_progress(level_index, chunks[2], buf);
        self.render_languages(chunks[3], buf);
        self.render_badges(chunks[4], buf);
        self.render_characters(level_index, chunks[5], buf);

        let legend = Paragraph::new(Span::styled(
            if Browser::is_available() {
                "(t)weet / (esc)ape"
            } else {
                "(esc)ape"
            },
            Style::default().add_modifier(Modifier::ITALIC),
        ));
        legend.render(chunks[7], buf);

        if let Some(message) = self.panel.toast_message() {
            render_toast(message, area, buf);
        }

        if self.panel.confetti().is_active {
            render_confetti(self.panel.confetti(), area, buf);
        }
    }
}

impl App {
    fn render_header(&self, name: &str, flavor: &str, area: Rect, buf: &mut Buffer) {
        let title = Paragraph::new(Span::styled(
            name.to_string(),
            Style::default().fg(ACCENT).add_modifier(Modifier::BOLD),
        ))
        .alignment(Alignment::Center);
        let tag = Paragraph::new(Span::styled(
            flavor.to_string(),
            Style::default()
                .fg(Color::DarkGray)
                .add_modifier(Modifier::ITALIC),
        ))
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true });

        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(1), Constraint::Length(2)].as_ref())
            .split(area);
        title.render(rows[0], buf);
        tag.render(rows[1], buf);
    }

    fn render_timer(&self, area: Rect, buf: &mut Buffer) {
        let state = self.panel.state();
        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(1), Constraint::Length(1), Constraint::Length(1)])
            .split(area);

        section_label("CODING TIME").render(rows[0], buf);

        let clock = Paragraph::new(Span::styled(
            format_hms(state.total_seconds),
            Style::default().fg(ACCENT).add_modifier(Modifier::BOLD),
        ));
        clock.render(rows[1], buf);

        let status = if self.panel.timer().is_running() {
            Line::from(vec![
                Span::styled("● ", Style::default().fg(ACCENT)),
                Span::styled("Active", Style::default().fg(ACCENT)),
            ])
        } else {
            let since = self
                .panel
                .timer()
                .last_activity()
                .and_then(|at| at.elapsed().ok())
                .map(|elapsed| {
                    format!(
                        " — {}",
                        HumanTime::from(elapsed).to_text_en(Accuracy::Rough, Tense::Past)
                    )
                })
                .unwrap_or_default();
            Line::from(Span::styled(
                format!("○ Paused{}", since),
                Style::default().fg(Color::DarkGray),
            ))
        };
        Paragraph::new(status).render(rows[2], buf);
    }

    fn render_progress(&self, level_index: usize, area: Rect, buf: &mut Buffer) {
        let state = self.panel.state();
        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(1), Constraint::Length(1), Constraint::Length(1)])
            .split(area);

        section_label("LEVEL PROGRESS").render(rows[0], buf);

        let pct = progress_percent(state.total_seconds);
        Paragraph::new(bar_spans(pct, rows[1].width, ACCENT)).render(rows[1], buf);

        let teaser = match next_level(level_index) {
            Some(next) => format!(
                "{:.1}h total   → {} at {}h",
                hours(state.total_seconds),
                next.name,
                next.min_hours
            ),
            None => format!("{:.1}h total   Max Level Reached!", hours(state.total_seconds)),
        };
        Paragraph::new(Span::styled(teaser, Style::default().fg(Color::DarkGray)))
            .render(rows[2], buf);
    }

    fn render_languages(&self, area: Rect, buf: &mut Buffer) {
        section_label("LANGUAGES").render(
            Rect {
                height: area.height.min(1),
                ..area
            },
            buf,
        );

        let shares = self.panel.state().top_languages();
        if shares.is_empty() {
            let empty = Paragraph::new(Span::styled(
                "Start coding to track languages",
                Style::default().fg(Color::DarkGray),
            ));
            if area.height > 1 {
                empty.render(
                    Rect {
                        y: area.y + 1,
                        height: 1,
                        ..area
                    },
                    buf,
                );
            }
            return;
        }

        const NAME_WIDTH: usize = 12;
        for (i, share) in shares.iter().enumerate() {
            let y = area.y + 1 + i as u16;
            if y >= area.y + area.height {
                break;
            }
            let row = Rect {
                y,
                height: 1,
                ..area
            };
            let (r, g, b) = bar_color(&share.language);
            let bar_width = row.width.saturating_sub(NAME_WIDTH as u16 + 6).max(1);
            let mut spans = vec![Span::raw(fit_label(
                &display_name(&share.language),
                NAME_WIDTH,
            ))];
            spans.extend(bar_spans(share.percent, bar_width, Color::Rgb(r, g, b)).spans);
            spans.push(Span::styled(
                format!(" {:>3.0}%", share.percent),
                Style::default().fg(Color::DarkGray),
            ));
            Paragraph::new(Line::from(spans)).render(row, buf);
        }
    }

    fn render_badges(&self, area: Rect, buf: &mut Buffer) {
        section_label("BADGES").render(
            Rect {
                height: area.height.min(1),
                ..area
            },
            buf,
        );

        let state = self.panel.state();
        let badges = evaluate(state.total_seconds, &state.language_stats);
        for (i, (badge, earned)) in badges.iter().enumerate() {
            let row = i / 3;
            let col = i % 3;
            let cell_width = area.width / 3;
            let cell = Rect {
                x: area.x + col as u16 * cell_width,
                y: area.y + 1 + row as u16,
                width: cell_width,
                height: 1,
            };
            if cell.y >= area.y + area.height {
                continue;
            }
            let style = if *earned {
                Style::default().fg(ACCENT)
            } else {
                Style::default()
                    .fg(Color::DarkGray)
                    .add_modifier(Modifier::DIM)
            };
            Paragraph::new(Span::styled(
                format!("{} {}", badge.icon, badge.title),
                style,
            ))
            .render(cell, buf);
        }
    }

    fn render_characters(&self, level_index: usize, area: Rect, buf: &mut Buffer) {
        section_label("CHARACTERS").render(
            Rect {
                height: area.height.min(1),
                ..area
            },
            buf,
        );

        for (i, level) in LEVELS.iter().enumerate() {
            let row = i / 3;
            let col = i % 3;
            let cell_width = area.width / 3;
            let cell = Rect {
                x: area.x + col as u16 * cell_width,
                y: area.y + 1 + row as u16,
                width: cell_width,
                height: 1,
            };
            if cell.y >= area.y + area.height {
                continue;
            }
            let unlocked = i <= level_index;
            let (mark, style) = if unlocked {
                ("✔", Style::default().fg(ACCENT))
            } else {
                (
                    "🔒",
                    Style::default()
                        .fg(Color::DarkGray)
                        .add_modifier(Modifier::DIM),
                )
            };
            Paragraph::new(Span::styled(
                format!("{} {}", mark, fit_label(level.name, cell_width.saturating_sub(3) as usize)),
                style,
            ))
            .render(cell, buf);
        }
    }
}

/// Bottom-centered notification pill.
fn render_toast(message: &str, area: Rect, buf: &mut Buffer) {
    let text = format!(" {} ", message);
    let width = (text.width() as u16).min(area.width);
    let rect = Rect {
        x: area.x + (area.width.saturating_sub(width)) / 2,
        y: area.y + area.height.saturating_sub(2),
        width,
        height: 1,
    };
    Paragraph::new(Span::styled(
        text,
        Style::default()
            .fg(Color::Black)
            .bg(ACCENT)
            .add_modifier(Modifier::BOLD),
    ))
    .render(rect, buf);
}

/// Paint confetti particles over the finished frame
fn render_confetti(confetti: &Confetti, area: Rect, buf: &mut Buffer) {
    let colors = [
        Color::Yellow,
        Color::Magenta,
        Color::Cyan,
        Color::Green,
        Color::Red,
        Color::Blue,
        Color::LightYellow,
    ];

    for (x, y, particle) in confetti.visible_particles() {
        if x >= area.width || y >= area.height {
            continue;
        }
        let color = colors[particle.color_index % colors.len()];
        let alpha = 1.0 - (particle.age / particle.max_age);
        let style = if alpha > 0.7 {
            Style::default().fg(color).add_modifier(Modifier::BOLD)
        } else if alpha > 0.3 {
            Style::default().fg(color)
        } else {
            Style::default().fg(color).add_modifier(Modifier::DIM)
        };
        if let Some(cell) = buf.cell_mut((area.x + x, area.y + y)) {
            cell.set_symbol(&particle.symbol.to_string());
            cell.set_style(style);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use levelup::panel::Panel;
    use levelup::protocol::HostMessage;
    use levelup::store::MemoryStateStore;
    use levelup::timer::ActivityTimer;
    use std::collections::HashMap;

    fn test_app(total_seconds: u64, languages: &[(&str, u64)]) -> App {
        let mut panel = Panel::new(ActivityTimer::default(), MemoryStateStore::new());
        panel.on_create();
        let mut stats = HashMap::new();
        for (lang, secs) in languages {
            stats.insert(lang.to_string(), *secs);
        }
        panel.on_message(HostMessage::SetState {
            total_seconds,
            language_stats: stats,
        });
        App::for_tests(panel)
    }

    #[test]
    fn format_hms_zero_pads() {
        assert_eq!(format_hms(0), "00:00:00");
        assert_eq!(format_hms(59), "00:00:59");
        assert_eq!(format_hms(61), "00:01:01");
        assert_eq!(format_hms(3600), "01:00:00");
        assert_eq!(format_hms(36_000 + 23 * 60 + 7), "10:23:07");
    }

    #[test]
    fn fit_label_pads_and_truncates() {
        assert_eq!(fit_label("Go", 5), "Go   ");
        assert_eq!(fit_label("TypeScript", 4), "Type");
    }

    #[test]
    fn bar_is_full_at_hundred_percent() {
        let line = bar_spans(100.0, 10, ACCENT);
        assert_eq!(line.spans[0].content, "█".repeat(10));
        assert!(line.spans[1].content.is_empty());
    }

    #[test]
    fn renders_fresh_state_without_panicking() {
        let app = test_app(0, &[]);
        let area = Rect::new(0, 0, 44, 30);
        let mut buffer = Buffer::empty(area);
        (&app).render(area, &mut buffer);
        assert!(*buffer.area() == area);
    }

    #[test]
    fn renders_populated_state_without_panicking() {
        let app = test_app(
            120 * 3600,
            &[("rust", 4000), ("go", 3000), ("python", 2000)],
        );
        let area = Rect::new(0, 0, 44, 30);
        let mut buffer = Buffer::empty(area);
        (&app).render(area, &mut buffer);
        assert!(*buffer.area() == area);
    }

    #[test]
    fn renders_in_a_tiny_terminal_without_panicking() {
        let app = test_app(500, &[("rust", 500)]);
        let area = Rect::new(0, 0, 10, 5);
        let mut buffer = Buffer::empty(area);
        (&app).render(area, &mut buffer);
        assert!(*buffer.area() == area);
    }

    #[test]
    fn timer_text_appears_in_the_frame() {
        let app = test_app(3661, &[]);
        let area = Rect::new(0, 0, 44, 30);
        let mut buffer = Buffer::empty(area);
        (&app).render(area, &mut buffer);
        let rendered: String = buffer
            .content()
            .iter()
            .map(|cell| cell.symbol().to_string())
            .collect();
        assert!(rendered.contains("01:01:01"));
    }
}
