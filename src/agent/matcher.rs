//! Fuzzy question matching
//!
//! Scores every known question against the input, keeps the ones at or
//! above the cutoff, ranks them best-first and answers with the top one.
//! Scoring is delegated to a [`StringMatcher`] so the metric can be
//! swapped without touching the ranking rules.

use anyhow::{bail, Result};
use similar::{ChangeTag, TextDiff};
use tracing::debug;

use crate::config::MatcherConfig;

/// Similarity metric between two strings
pub trait StringMatcher {
    /// Score in `0.0..=1.0`, where `1.0` means identical
    fn similarity(&self, a: &str, b: &str) -> f64;
}

/// Character sequence ratio `2·M / T` (case-sensitive).
///
/// `M` counts characters left unchanged by a minimal character diff and
/// `T` is the combined length of both strings.
#[derive(Debug, Clone, Copy, Default)]
pub struct SequenceRatioMatcher;

impl StringMatcher for SequenceRatioMatcher {
    fn similarity(&self, a: &str, b: &str) -> f64 {
        let total = a.chars().count() + b.chars().count();
        if total == 0 {
            return 1.0;
        }
        let matched = TextDiff::from_chars(a, b)
            .iter_all_changes()
            .filter(|change| change.tag() == ChangeTag::Equal)
            .count();
        (2 * matched) as f64 / total as f64
    }
}

/// Picks the closest known question for an utterance
pub struct QuestionMatcher {
    metric: Box<dyn StringMatcher>,
    cutoff: f64,
    max_candidates: usize,
}

impl QuestionMatcher {
    /// Create a matcher. `cutoff` must lie in `0.0..=1.0` and at least one
    /// candidate must be allowed.
    pub fn new(metric: Box<dyn StringMatcher>, cutoff: f64, max_candidates: usize) -> Result<Self> {
        if !(0.0..=1.0).contains(&cutoff) {
            bail!("Match cutoff must be between 0.0 and 1.0, got {}", cutoff);
        }
        if max_candidates == 0 {
            bail!("Matcher must keep at least one candidate");
        }
        Ok(Self {
            metric,
            cutoff,
            max_candidates,
        })
    }

    /// Sequence-ratio matcher with the configured cutoff
    pub fn from_config(config: &MatcherConfig) -> Result<Self> {
        Self::new(Box::new(SequenceRatioMatcher), config.cutoff, config.max_candidates)
    }

    pub fn cutoff(&self) -> f64 {
        self.cutoff
    }

    /// Candidates scoring at least the cutoff, best first.
    ///
    /// Equal scores keep the order of `known`. At most `max_candidates`
    /// are returned.
    pub fn close_matches<'a>(&self, input: &str, known: &[&'a str]) -> Vec<(&'a str, f64)> {
        let mut scored: Vec<(&'a str, f64)> = known
            .iter()
            .map(|q| (*q, self.metric.similarity(input, q)))
            .filter(|(_, score)| *score >= self.cutoff)
            .collect();

        scored.sort_by(|a, b| b.1.total_cmp(&a.1));
        scored.truncate(self.max_candidates);
        scored
    }

    /// The best known question for `input`, if any clears the cutoff
    pub fn find_best_match<'a>(&self, input: &str, known: &[&'a str]) -> Option<&'a str> {
        let matches = self.close_matches(input, known);
        debug!("Match candidates for {:?}: {:?}", input, matches);
        matches.first().map(|(q, _)| *q)
    }
}
