use itertools::Itertools;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::badge::is_noise;

/// How many languages the distribution panel shows.
pub const TOP_LANGUAGES: usize = 5;

/// The tracked counters. Owned by the panel at session scope and mirrored
/// into the host's persistent store; both sides exchange it whole.
///
/// `total_seconds` and the per-language decomposition are accrued
/// independently and are allowed to drift apart.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrackerState {
    #[serde(default)]
    pub total_seconds: u64,
    #[serde(default)]
    pub language_stats: HashMap<String, u64>,
}

/// One row of the language distribution panel.
#[derive(Debug, Clone, PartialEq)]
pub struct LanguageShare {
    pub language: String,
    pub seconds: u64,
    /// Share of the displayed subset, not of total time. Sums to ~100
    /// across the returned rows.
    pub percent: f64,
}

impl TrackerState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add one attributed second to a language counter.
    pub fn record_language_second(&mut self, language: &str) {
        *self
            .language_stats
            .entry(language.to_string())
            .or_insert(0) += 1;
    }

    /// Top languages by recorded seconds, noise filtered out. Ties break by
    /// language id so the ordering is stable across runs.
    pub fn top_languages(&self) -> Vec<LanguageShare> {
        let shown: Vec<(&String, &u64)> = self
            .language_stats
            .iter()
            .filter(|(id, _)| !is_noise(id.as_str()))
            .sorted_by(|a, b| b.1.cmp(a.1).then_with(|| a.0.cmp(b.0)))
            .take(TOP_LANGUAGES)
            .collect();

        let subset_total: u64 = shown.iter().map(|(_, secs)| **secs).sum();

        shown
            .into_iter()
            .map(|(id, secs)| LanguageShare {
                language: id.clone(),
                seconds: *secs,
                percent: if subset_total > 0 {
                    *secs as f64 / subset_total as f64 * 100.0
                } else {
                    0.0
                },
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn state_with(entries: &[(&str, u64)]) -> TrackerState {
        let mut state = TrackerState::new();
        for (lang, secs) in entries {
            state.language_stats.insert(lang.to_string(), *secs);
        }
        state
    }

    #[test]
    fn record_language_second_accumulates() {
        let mut state = TrackerState::new();
        state.record_language_second("rust");
        state.record_language_second("rust");
        state.record_language_second("go");
        assert_eq!(state.language_stats["rust"], 2);
        assert_eq!(state.language_stats["go"], 1);
    }

    #[test]
    fn top_languages_sorts_descending_and_caps_at_five() {
        let state = state_with(&[
            ("rust", 600),
            ("go", 500),
            ("python", 400),
            ("c", 300),
            ("lua", 200),
            ("zig", 100),
        ]);
        let top = state.top_languages();
        assert_eq!(top.len(), 5);
        assert_eq!(top[0].language, "rust");
        assert_eq!(top[4].language, "lua");
        assert!(top.iter().all(|share| share.language != "zig"));
    }

    #[test]
    fn percentages_sum_over_shown_subset() {
        let state = state_with(&[("rust", 75), ("go", 25)]);
        let top = state.top_languages();
        assert_eq!(top[0].percent, 75.0);
        assert_eq!(top[1].percent, 25.0);
    }

    #[test]
    fn noise_languages_never_shown() {
        let state = state_with(&[("plaintext", 9999), ("rust", 1)]);
        let top = state.top_languages();
        assert_eq!(top.len(), 1);
        assert_eq!(top[0].language, "rust");
        assert_eq!(top[0].percent, 100.0);
    }

    #[test]
    fn ties_break_by_language_id() {
        let state = state_with(&[("go", 10), ("elixir", 10), ("rust", 10)]);
        let top = state.top_languages();
        let order: Vec<&str> = top.iter().map(|s| s.language.as_str()).collect();
        assert_eq!(order, vec!["elixir", "go", "rust"]);
    }

    #[test]
    fn serde_uses_the_store_field_names() {
        let state = state_with(&[("python", 5000)]);
        let json = serde_json::to_value(TrackerState {
            total_seconds: 7230,
            ..state
        })
        .unwrap();
        assert_eq!(json["totalSeconds"], 7230);
        assert_eq!(json["languageStats"]["python"], 5000);
    }

    #[test]
    fn missing_fields_default_to_zeroed_state() {
        let state: TrackerState = serde_json::from_str("{}").unwrap();
        assert_eq!(state, TrackerState::new());
    }
}
