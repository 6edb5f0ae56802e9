// Detection engine - decides whether a message is spam and/or profane.
//
// Pure, stateless with respect to other messages: all work is in-memory
// string processing against a read-only policy snapshot. No platform
// dependencies and no error cases.

use super::lexicon::Lexicon;
use super::moderation_models::{DetectionResult, GuildPolicy};
use super::normalizer::normalize;
use std::collections::BTreeSet;

/// A single character repeated this many times is spam.
const SPAM_RUN_LENGTH: usize = 7;

/// Profanity/spam detection over a per-guild policy.
pub struct DetectionEngine {
    lexicon: Lexicon,
}

impl DetectionEngine {
    /// Create an engine with an explicitly-constructed lexicon.
    pub fn new(lexicon: Lexicon) -> Self {
        Self { lexicon }
    }

    /// Evaluate a message against a guild policy.
    ///
    /// The spam check runs first; if it hits, profanity is never evaluated
    /// for this message (first-match-wins short-circuit).
    pub fn evaluate(&self, text: &str, policy: &GuildPolicy) -> DetectionResult {
        if let Some(reason) = check_spam(text) {
            return DetectionResult::spam(reason);
        }

        DetectionResult::profane(self.check_profanity(text, policy))
    }

    /// Collect profanity matches from both the plain lowercased text and
    /// the normalized text. A hit on either surface counts; whitelist
    /// entries suppress a hit from any source.
    fn check_profanity(&self, text: &str, policy: &GuildPolicy) -> BTreeSet<String> {
        let mut found = BTreeSet::new();

        let normalized = normalize(text);
        let original_lower = text.to_lowercase();
        let whitelist = &policy.whitelist_words;

        // An empty word would substring-match everything, including the
        // empty message; a persisted policy is not trusted to exclude it.
        let hits = |word: &str| {
            !word.is_empty() && (original_lower.contains(word) || normalized.contains(word))
        };

        // Custom words first.
        for word in &policy.custom_words {
            if hits(word) && !whitelist.contains(word) {
                found.insert(word.clone());
            }
        }

        // Built-in severe detector, recorded per token so the matched terms
        // name what was actually said.
        if self.lexicon.contains_severe(text) || self.lexicon.contains_severe(&normalized) {
            for token in text.split_whitespace().chain(normalized.split_whitespace()) {
                let folded = token.to_lowercase();
                if self.lexicon.contains_severe(token) && !whitelist.contains(&folded) {
                    found.insert(folded);
                }
            }
        }

        // Tier words selected by the configured sensitivity.
        for word in self.lexicon.tier_words(policy.sensitivity) {
            if hits(word) && !whitelist.contains(word) {
                found.insert(word.to_string());
            }
        }

        found
    }
}

/// Check for repeated-character spam: any single character (including
/// multi-byte symbols) repeated 7+ times consecutively in the raw text.
pub fn check_spam(text: &str) -> Option<String> {
    let mut last: Option<char> = None;
    let mut run_len = 0usize;

    for c in text.chars() {
        if last == Some(c) {
            run_len += 1;
            if run_len == SPAM_RUN_LENGTH {
                return Some(format!("Repeated character spam: '{}'", c));
            }
        } else {
            last = Some(c);
            run_len = 1;
        }
    }

    None
}
