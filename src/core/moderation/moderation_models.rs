// Moderation domain models - data structures for the detection pipeline.
//
// These are pure domain types with no chat-platform dependencies.
// The platform adapter converts these to platform-specific actions.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::collections::HashSet;
use std::time::Duration;

/// Which built-in word tiers are checked for a guild.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SensitivityTier {
    /// Only severe terms (built-in severe detector).
    Low,
    /// Moderate + severe terms.
    Medium,
    /// Mild + moderate + severe terms.
    High,
}

impl std::fmt::Display for SensitivityTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SensitivityTier::Low => write!(f, "low"),
            SensitivityTier::Medium => write!(f, "medium"),
            SensitivityTier::High => write!(f, "high"),
        }
    }
}

/// Remediation applied on a confirmed violation. Timeout/kick/ban are
/// layered on top of the warn step, not alternatives to it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EscalationAction {
    Warn,
    Timeout,
    Kick,
    Ban,
}

impl std::fmt::Display for EscalationAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EscalationAction::Warn => write!(f, "warn"),
            EscalationAction::Timeout => write!(f, "timeout"),
            EscalationAction::Kick => write!(f, "kick"),
            EscalationAction::Ban => write!(f, "ban"),
        }
    }
}

/// Per-guild moderation configuration.
///
/// Word lists are stored in lowercase canonical form; re-adding an existing
/// word is idempotent (set semantics). A whitelist entry always wins over a
/// custom-word or built-in match for the same term.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GuildPolicy {
    /// Master moderation switch.
    pub enabled: bool,
    /// Which built-in word tiers are checked.
    pub sensitivity: SensitivityTier,
    /// Escalation applied on a confirmed violation.
    pub action: EscalationAction,
    /// Skip moderation for privileged members (caller-level gate).
    pub skip_admins: bool,
    /// Community-specific block list.
    pub custom_words: BTreeSet<String>,
    /// Override list; suppresses a flag even if otherwise detected.
    pub whitelist_words: BTreeSet<String>,
    /// Channel that receives incident summaries, if configured.
    pub log_channel: Option<u64>,
    /// Text sent to the violator.
    pub warning_message: String,
    /// Whether to remove the offending message.
    pub delete_message: bool,
}

impl Default for GuildPolicy {
    fn default() -> Self {
        Self {
            enabled: true,
            sensitivity: SensitivityTier::Medium,
            action: EscalationAction::Warn,
            skip_admins: true,
            custom_words: BTreeSet::new(),
            whitelist_words: BTreeSet::new(),
            log_channel: None,
            warning_message: "Please keep your language appropriate for this server.".to_string(),
            delete_message: true,
        }
    }
}

/// Result of evaluating a single message.
///
/// Spam and profanity are mutually exclusive outcomes: if spam is detected,
/// profanity is never evaluated for that message.
#[derive(Debug, Clone, PartialEq)]
pub struct DetectionResult {
    /// Whether the message is repeated-character spam.
    pub is_spam: bool,
    /// Human-readable reason, present iff `is_spam`.
    pub spam_reason: Option<String>,
    /// Whether the message contains profanity.
    pub is_profane: bool,
    /// Matched terms, case-folded and deduplicated.
    pub matched_terms: BTreeSet<String>,
}

impl DetectionResult {
    /// Create a "nothing detected" result.
    pub fn clean() -> Self {
        Self {
            is_spam: false,
            spam_reason: None,
            is_profane: false,
            matched_terms: BTreeSet::new(),
        }
    }

    /// Create a spam result.
    pub fn spam(reason: String) -> Self {
        Self {
            is_spam: true,
            spam_reason: Some(reason),
            is_profane: false,
            matched_terms: BTreeSet::new(),
        }
    }

    /// Create a profanity result.
    pub fn profane(matched_terms: BTreeSet<String>) -> Self {
        Self {
            is_spam: false,
            spam_reason: None,
            is_profane: !matched_terms.is_empty(),
            matched_terms,
        }
    }
}

/// What the caller knows about the message author's privileges.
///
/// Bypass-role identifiers are configuration data resolved at construction
/// time, so the decision logic never sees raw role ids.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PrivilegeInfo {
    /// Author holds an administrator-equivalent permission.
    pub is_administrator: bool,
    /// Author can manage messages (counts as privileged for `skip_admins`).
    pub can_manage_messages: bool,
    /// Author holds one of the configured bypass roles.
    pub has_bypass_role: bool,
}

impl PrivilegeInfo {
    /// Resolve an author's role id set against the configured bypass roles.
    pub fn resolve(
        is_administrator: bool,
        can_manage_messages: bool,
        role_ids: &[u64],
        bypass_roles: &HashSet<u64>,
    ) -> Self {
        Self {
            is_administrator,
            can_manage_messages,
            has_bypass_role: role_ids.iter().any(|id| bypass_roles.contains(id)),
        }
    }

    /// An ordinary member with no elevated permissions or roles.
    pub fn member() -> Self {
        Self {
            is_administrator: false,
            can_manage_messages: false,
            has_bypass_role: false,
        }
    }

    /// The engine-level bypass gate: administrators and bypass-role holders
    /// skip evaluation entirely, independent of `GuildPolicy::skip_admins`.
    pub fn bypasses_moderation(&self) -> bool {
        self.is_administrator || self.has_bypass_role
    }
}

/// Everything the actuator needs to carry out a non-trivial action.
#[derive(Debug, Clone, PartialEq)]
pub struct ActionContext {
    /// Whether the offending message should be removed.
    pub delete_message: bool,
    /// Warning text delivered to the violator (DM first, channel fallback).
    pub warning: String,
    /// Best-effort notice: when the DM fails, skip the channel fallback.
    /// Set for spam, whose remediation is delete plus a direct note only.
    pub dm_only: bool,
    /// Matched terms, for audit logging. Empty for spam.
    pub matched_terms: Vec<String>,
    /// Short reason attached to platform moderation calls.
    pub audit_reason: String,
}

/// Enforcement action decided for one message.
#[derive(Debug, Clone, PartialEq)]
pub enum ModAction {
    /// Nothing to do - message is clean or the author is bypassed.
    None,
    /// Delete (if configured) and warn the user.
    DeleteAndWarn(ActionContext),
    /// Warn, then time the user out for the given duration.
    DeleteAndTimeout(ActionContext, Duration),
    /// Warn, then kick the user.
    DeleteAndKick(ActionContext),
    /// Warn, then ban the user.
    DeleteAndBan(ActionContext),
}

impl ModAction {
    pub fn is_none(&self) -> bool {
        matches!(self, ModAction::None)
    }
}

/// Where a message lives, for actuator calls.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MessageRef {
    pub guild_id: u64,
    pub channel_id: u64,
    pub message_id: u64,
    pub author_id: u64,
}

/// A handled violation, emitted to the configured log channel.
#[derive(Debug, Clone, PartialEq)]
pub struct Incident {
    pub guild_id: u64,
    pub channel_id: u64,
    pub user_id: u64,
    /// What was detected and what was done about it.
    pub detail: String,
    pub timestamp: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_policy_matches_stock_settings() {
        let policy = GuildPolicy::default();
        assert!(policy.enabled);
        assert_eq!(policy.sensitivity, SensitivityTier::Medium);
        assert_eq!(policy.action, EscalationAction::Warn);
        assert!(policy.skip_admins);
        assert!(policy.delete_message);
        assert!(policy.custom_words.is_empty());
        assert!(policy.whitelist_words.is_empty());
        assert!(policy.log_channel.is_none());
    }

    #[test]
    fn policy_round_trips_through_json() {
        let mut policy = GuildPolicy::default();
        policy.custom_words.insert("badword".to_string());
        policy.sensitivity = SensitivityTier::High;
        policy.action = EscalationAction::Timeout;

        let json = serde_json::to_string(&policy).unwrap();
        let back: GuildPolicy = serde_json::from_str(&json).unwrap();
        assert_eq!(policy, back);

        // Enum values persist as the lowercase names used in config files.
        assert!(json.contains("\"high\""));
        assert!(json.contains("\"timeout\""));
    }

    #[test]
    fn bypass_role_resolution() {
        let bypass: HashSet<u64> = [10, 20].into_iter().collect();

        let info = PrivilegeInfo::resolve(false, false, &[5, 20], &bypass);
        assert!(info.has_bypass_role);
        assert!(info.bypasses_moderation());

        let info = PrivilegeInfo::resolve(false, false, &[5, 6], &bypass);
        assert!(!info.has_bypass_role);
        assert!(!info.bypasses_moderation());

        let info = PrivilegeInfo::resolve(true, false, &[], &bypass);
        assert!(info.bypasses_moderation());
    }

    #[test]
    fn profane_constructor_requires_terms() {
        let result = DetectionResult::profane(BTreeSet::new());
        assert!(!result.is_profane);

        let terms: BTreeSet<String> = ["badword".to_string()].into_iter().collect();
        let result = DetectionResult::profane(terms);
        assert!(result.is_profane);
        assert!(!result.is_spam);
    }
}
