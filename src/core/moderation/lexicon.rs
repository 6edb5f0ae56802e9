// Built-in word tiers and the severe-term detector.
//
// The lexicon is an explicitly-constructed, immutable value passed into the
// engine at construction. Severe terms are delegated to the `rustrict`
// crate; mild and moderate tiers are small static lists.

use super::moderation_models::SensitivityTier;
use rustrict::{CensorStr, Type};
use std::collections::BTreeSet;

/// Built-in mild-tier terms, checked only at high sensitivity.
const MILD_WORDS: &[&str] = &["damn", "hell", "crap", "piss"];

/// Built-in moderate-tier terms, checked at medium and high sensitivity.
const MODERATE_WORDS: &[&str] = &["ass", "bitch", "shit"];

/// Read-only word tiers, loaded once at process start.
#[derive(Debug, Clone)]
pub struct Lexicon {
    mild: BTreeSet<String>,
    moderate: BTreeSet<String>,
}

impl Lexicon {
    /// Build a lexicon with custom tier lists. Terms are case-folded.
    pub fn new<I, J>(mild: I, moderate: J) -> Self
    where
        I: IntoIterator<Item = String>,
        J: IntoIterator<Item = String>,
    {
        Self {
            mild: mild.into_iter().map(|w| w.to_lowercase()).collect(),
            moderate: moderate.into_iter().map(|w| w.to_lowercase()).collect(),
        }
    }

    /// The stock lexicon with the built-in mild and moderate tiers.
    pub fn builtin() -> Self {
        Self::new(
            MILD_WORDS.iter().map(|w| w.to_string()),
            MODERATE_WORDS.iter().map(|w| w.to_string()),
        )
    }

    /// Whether the severe-term detector flags this text.
    ///
    /// Only severe-typed matches count; mild and moderate profanity is the
    /// job of the tier lists, so a low-sensitivity guild is not flagged for
    /// words like "crap".
    pub fn contains_severe(&self, text: &str) -> bool {
        text.is(Type::SEVERE)
    }

    /// Tier word sets selected by sensitivity: low checks nothing here
    /// (severe terms are covered by the detector), medium checks moderate,
    /// high checks moderate plus mild.
    pub fn tier_words(&self, tier: SensitivityTier) -> Vec<&str> {
        match tier {
            SensitivityTier::Low => Vec::new(),
            SensitivityTier::Medium => self.moderate.iter().map(String::as_str).collect(),
            SensitivityTier::High => self
                .moderate
                .iter()
                .chain(self.mild.iter())
                .map(String::as_str)
                .collect(),
        }
    }
}
