use std::collections::HashMap;

/// Pseudo-language identifiers that editors report for non-code buffers.
/// These never count towards language-diversity badges and never accrue
/// per-language time.
pub const NOISE_LANGUAGES: [&str; 9] = [
    "plaintext",
    "Log",
    "log",
    "scminput",
    "git-commit",
    "search-result",
    "code-text-binary",
    "ignore",
    "",
];

pub fn is_noise(language: &str) -> bool {
    NOISE_LANGUAGES.contains(&language)
}

/// Number of distinct real languages with recorded time.
pub fn distinct_tracked_languages(language_stats: &HashMap<String, u64>) -> usize {
    language_stats
        .keys()
        .filter(|id| !is_noise(id.as_str()))
        .count()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, strum_macros::Display)]
pub enum BadgeId {
    #[strum(serialize = "warmed_up")]
    WarmedUp,
    #[strum(serialize = "polyglot")]
    Polyglot,
    #[strum(serialize = "dedicated")]
    Dedicated,
    #[strum(serialize = "linguist")]
    Linguist,
    #[strum(serialize = "centurion")]
    Centurion,
    #[strum(serialize = "legend")]
    Legend,
}

#[derive(Debug, Clone, Copy)]
enum Requirement {
    /// Total tracked time reaches this many hours.
    Hours(u64),
    /// Distinct tracked languages reach this count.
    Languages(usize),
}

#[derive(Debug, Clone, Copy)]
pub struct Badge {
    pub id: BadgeId,
    pub title: &'static str,
    pub icon: &'static str,
    requirement: Requirement,
}

impl Badge {
    /// Badges are independent and monotone in time; they are re-derived from
    /// the session state on every tick and never persisted on their own.
    pub fn earned(&self, total_seconds: u64, tracked_languages: usize) -> bool {
        match self.requirement {
            Requirement::Hours(h) => total_seconds >= h * 3600,
            Requirement::Languages(n) => tracked_languages >= n,
        }
    }
}

pub const BADGES: [Badge; 6] = [
    Badge {
        id: BadgeId::WarmedUp,
        title: "Warmed Up",
        icon: "🔥",
        requirement: Requirement::Hours(1),
    },
    Badge {
        id: BadgeId::Polyglot,
        title: "Polyglot",
        icon: "🌐",
        requirement: Requirement::Languages(3),
    },
    Badge {
        id: BadgeId::Dedicated,
        title: "Dedicated",
        icon: "⚡",
        requirement: Requirement::Hours(50),
    },
    Badge {
        id: BadgeId::Linguist,
        title: "Linguist",
        icon: "📖",
        requirement: Requirement::Languages(5),
    },
    Badge {
        id: BadgeId::Centurion,
        title: "Centurion",
        icon: "💯",
        requirement: Requirement::Hours(100),
    },
    Badge {
        id: BadgeId::Legend,
        title: "Legend",
        icon: "🏆",
        requirement: Requirement::Hours(500),
    },
];

/// Earned/locked flags for all badges, in grid order.
pub fn evaluate(total_seconds: u64, language_stats: &HashMap<String, u64>) -> Vec<(Badge, bool)> {
    let tracked = distinct_tracked_languages(language_stats);
    BADGES
        .iter()
        .map(|b| (*b, b.earned(total_seconds, tracked)))
        .collect()
}
