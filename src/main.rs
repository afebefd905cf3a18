mod ui;

use clap::{error::ErrorKind, CommandFactory, Parser, Subcommand};
use crossterm::{
    event::{KeyCode, KeyEvent, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
    tty::IsTty,
};
use ratatui::{
    backend::{Backend, CrosstermBackend},
    Terminal,
};
use std::{
    error::Error,
    io::{self, stdin},
    sync::mpsc::RecvTimeoutError,
    time::Duration,
};
use webbrowser::Browser;

use levelup::config::{Config, ConfigStore, FileConfigStore};
use levelup::history::HistoryDb;
use levelup::host::HostGlue;
use levelup::level::{hours, level_for, LEVELS};
use levelup::panel::Panel;
use levelup::runtime::{CrosstermEventSource, PanelEvent, PanelEventSource};
use levelup::signal;
use levelup::store::{FileStateStore, MemoryStateStore, StateStore};
use levelup::timer::ActivityTimer;

/// gamified coding-time tracker for your terminal
#[derive(Parser, Debug, Clone)]
#[clap(
    version,
    about,
    long_about = "Tracks your active coding time, levels you up through nine questionable career stages, and awards badges for time and language diversity. Editor plugins report activity over a localhost socket."
)]
pub struct Cli {
    /// port for the activity socket
    #[clap(short = 'p', long)]
    port: Option<u16>,

    #[clap(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug, Clone)]
enum Command {
    /// send one activity signal to a running tracker
    Ping {
        /// language identifier of the edited document
        language: Option<String>,
    },
    /// print tracked totals and daily history
    Stats,
    /// dump per-language history as CSV on stdout
    Export,
}

pub struct App {
    pub panel: Panel,
}

impl App {
    pub fn new(config: &Config) -> Self {
        let timer = ActivityTimer::new(config.inactivity_secs, config.save_every_ticks);
        let mut panel = Panel::new(timer, MemoryStateStore::new());
        panel.on_create();
        Self { panel }
    }

    #[cfg(test)]
    pub fn for_tests(panel: Panel) -> Self {
        Self { panel }
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();
    let config = FileConfigStore::new().load();
    let port = cli.port.unwrap_or(config.listen_port);

    match &cli.command {
        Some(Command::Ping { language }) => {
            return signal::send_ping(port, language.as_deref().unwrap_or(""))
                .map_err(|e| format!("no tracker listening on port {}: {}", port, e).into());
        }
        Some(Command::Stats) => return print_stats(),
        Some(Command::Export) => {
            let history = HistoryDb::new()?;
            history.export_csv(io::stdout())?;
            return Ok(());
        }
        None => {}
    }

    if !stdin().is_tty() {
        let mut cmd = Cli::command();
        cmd.error(ErrorKind::Io, "stdin must be a tty").exit();
    }

    enable_raw_mode()?;

    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = start_tui(&mut terminal, &config, port);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}

fn start_tui<B: Backend>(
    terminal: &mut Terminal<B>,
    config: &Config,
    port: u16,
) -> Result<(), Box<dyn Error>> {
    let events = CrosstermEventSource::new(port)?;

    let store = FileStateStore::new();
    let history = HistoryDb::new().ok();
    let mut host = HostGlue::new(store, history, config.request_state_secs);
    let mut app = App::new(config);

    loop {
        terminal.draw(|f| {
            app.panel.set_viewport(f.area().width, f.area().height);
            f.render_widget(&app, f.area());
        })?;

        // While confetti is falling, redraw between events.
        let event = if app.panel.needs_animation_frames() {
            match events.recv_timeout(Duration::from_millis(50)) {
                Ok(ev) => Some(ev),
                Err(RecvTimeoutError::Timeout) => None,
                Err(RecvTimeoutError::Disconnected) => break,
            }
        } else {
            match events.recv() {
                Ok(ev) => Some(ev),
                Err(_) => break,
            }
        };

        let Some(event) = event else {
            app.panel.animate();
            continue;
        };

        match event {
            PanelEvent::Tick => {
                for msg in host.on_tick() {
                    for reply in app.panel.on_message(msg) {
                        host.on_panel_message(reply);
                    }
                }
                for reply in app.panel.on_tick() {
                    host.on_panel_message(reply);
                }
            }
            PanelEvent::Edit(language) => {
                for msg in host.on_edit(language) {
                    for reply in app.panel.on_message(msg) {
                        host.on_panel_message(reply);
                    }
                }
            }
            PanelEvent::Resize => {}
            PanelEvent::Key(key) => {
                if handle_key(key, &app) {
                    break;
                }
            }
        }
    }

    for reply in app.panel.on_dispose() {
        host.on_panel_message(reply);
    }

    Ok(())
}

/// Returns true when the app should exit.
fn handle_key(key: KeyEvent, app: &App) -> bool {
    match key.code {
        KeyCode::Esc => true,
        KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => true,
        KeyCode::Char('t') => {
            if Browser::is_available() {
                let state = app.panel.state();
                let level = &LEVELS[level_for(state.total_seconds)];
                webbrowser::open(&format!(
                    "https://twitter.com/intent/tweet?text={}%20%E2%80%94%20{:.0}h%20of%20coding%20tracked%20with%20levelup",
                    level.name.replace(' ', "%20"),
                    hours(state.total_seconds),
                ))
                .unwrap_or_default();
            }
            false
        }
        _ => false,
    }
}

fn print_stats() -> Result<(), Box<dyn Error>> {
    let state = FileStateStore::new().load();
    let level = &LEVELS[level_for(state.total_seconds)];
    println!(
        "{} — {:.1}h tracked ({})",
        level.name,
        hours(state.total_seconds),
        level.flavor
    );

    let history = HistoryDb::new()?;

    let days = history.recent_days(14)?;
    if !days.is_empty() {
        println!("\nrecent days:");
        for (day, seconds) in days {
            println!("  {}  {:>6.1}h", day, hours(seconds));
        }
    }

    let languages = history.language_totals()?;
    if !languages.is_empty() {
        println!("\nlanguages:");
        for (language, seconds) in languages {
            println!("  {:<16} {:>6.1}h", language, hours(seconds));
        }
    }

    Ok(())
}
