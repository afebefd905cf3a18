/// A milestone in the coding-time ladder, keyed by cumulative active hours.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Level {
    pub name: &'static str,
    pub flavor: &'static str,
    /// Inclusive lower bound, in hours of tracked time.
    pub min_hours: f64,
}

/// The ladder, ordered by `min_hours`. The last tier has no upper bound.
pub const LEVELS: [Level; 9] = [
    Level {
        name: "Script Kiddie",
        flavor: "I hacked the mainframe (I changed the HTML background color).",
        min_hours: 0.0,
    },
    Level {
        name: "Vibe Coder",
        flavor: "My code works and I have no idea why.",
        min_hours: 10.0,
    },
    Level {
        name: "Spaghetti Chef",
        flavor: "It's not spaghetti code, it's... artisan pasta.",
        min_hours: 30.0,
    },
    Level {
        name: "Junior Developer",
        flavor: "Stack Overflow is my rubber duck.",
        min_hours: 50.0,
    },
    Level {
        name: "Overflow Survivor",
        flavor: "I've closed over 500 Stack Overflow tabs.",
        min_hours: 100.0,
    },
    Level {
        name: "Senior Developer",
        flavor: "Why add comments when the code speaks for itself?",
        min_hours: 200.0,
    },
    Level {
        name: "10x Engineer",
        flavor: "10x the output, 10x the technical debt.",
        min_hours: 300.0,
    },
    Level {
        name: "The Vim Lord",
        flavor: "I exit Vim on purpose now.",
        min_hours: 500.0,
    },
    Level {
        name: "The Singularity",
        flavor: "I don't write code. I manifest it.",
        min_hours: 1000.0,
    },
];

pub fn hours(total_seconds: u64) -> f64 {
    total_seconds as f64 / 3600.0
}

/// Index of the highest tier whose lower bound has been reached.
/// Total over all inputs; tier 0 starts at zero hours.
pub fn level_for(total_seconds: u64) -> usize {
    let hrs = hours(total_seconds);
    for (i, level) in LEVELS.iter().enumerate().rev() {
        if hrs >= level.min_hours {
            return i;
        }
    }
    0
}

/// The tier after `index`, if any.
pub fn next_level(index: usize) -> Option<&'static Level> {
    LEVELS.get(index + 1)
}

/// Position between the current tier's bound and the next tier's bound,
/// clamped to [0, 100]. The top tier always reports 100.
pub fn progress_percent(total_seconds: u64) -> f64 {
    let index = level_for(total_seconds);
    let current = &LEVELS[index];
    match next_level(index) {
        Some(next) => {
            let span = next.min_hours - current.min_hours;
            let into = hours(total_seconds) - current.min_hours;
            (into / span * 100.0).clamp(0.0, 100.0)
        }
        None => 100.0,
    }
}
