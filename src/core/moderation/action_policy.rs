// Action policy - maps a detection result plus guild configuration to a
// concrete enforcement action.
//
// The bypass gate here (administrator or bypass role) is deliberately
// separate from `GuildPolicy::skip_admins`, which the caller applies before
// the engine is even invoked. Both gates exist in the pipeline and compose;
// neither is the sole source of truth.

use super::moderation_models::{
    ActionContext, DetectionResult, EscalationAction, GuildPolicy, ModAction, PrivilegeInfo,
};
use std::time::Duration;

/// Fixed timeout applied on escalation: 10 minutes.
pub const TIMEOUT_DURATION: Duration = Duration::from_secs(600);

/// Notice sent to repeated-character spammers. Spam never escalates beyond
/// deletion plus this note, regardless of the configured action.
pub const SPAM_NOTICE: &str = "ok bro stop spamming";

/// How many matched terms are named in the audit reason.
const AUDIT_TERM_LIMIT: usize = 3;

/// Decides the enforcement action for one evaluated message.
#[derive(Debug, Clone, Copy, Default)]
pub struct ActionPolicy;

impl ActionPolicy {
    pub fn new() -> Self {
        Self
    }

    /// Map a detection result to an action.
    ///
    /// Bypassed authors (administrator or bypass role) always get
    /// `ModAction::None`, even when moderation is otherwise enabled.
    pub fn decide(
        &self,
        result: &DetectionResult,
        policy: &GuildPolicy,
        privilege: &PrivilegeInfo,
    ) -> ModAction {
        if privilege.bypasses_moderation() {
            return ModAction::None;
        }

        if result.is_spam {
            let reason = result
                .spam_reason
                .clone()
                .unwrap_or_else(|| "Repeated character spam".to_string());
            // Spam is always delete + best-effort direct notice; the
            // configured escalation does not apply and the notice gets no
            // channel fallback.
            return ModAction::DeleteAndWarn(ActionContext {
                delete_message: true,
                warning: SPAM_NOTICE.to_string(),
                dm_only: true,
                matched_terms: Vec::new(),
                audit_reason: reason,
            });
        }

        if !result.is_profane {
            return ModAction::None;
        }

        let terms: Vec<String> = result.matched_terms.iter().cloned().collect();
        let named: Vec<&str> = terms
            .iter()
            .take(AUDIT_TERM_LIMIT)
            .map(String::as_str)
            .collect();
        let ctx = ActionContext {
            delete_message: policy.delete_message,
            warning: policy.warning_message.clone(),
            dm_only: false,
            matched_terms: terms.clone(),
            audit_reason: format!("Inappropriate language: {}", named.join(", ")),
        };

        match policy.action {
            EscalationAction::Warn => ModAction::DeleteAndWarn(ctx),
            EscalationAction::Timeout => ModAction::DeleteAndTimeout(ctx, TIMEOUT_DURATION),
            EscalationAction::Kick => ModAction::DeleteAndKick(ctx),
            EscalationAction::Ban => ModAction::DeleteAndBan(ctx),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeSet;

    fn profane_result(terms: &[&str]) -> DetectionResult {
        DetectionResult::profane(terms.iter().map(|t| t.to_string()).collect())
    }

    fn admin() -> PrivilegeInfo {
        PrivilegeInfo {
            is_administrator: true,
            can_manage_messages: true,
            has_bypass_role: false,
        }
    }

    fn bypass_role_holder() -> PrivilegeInfo {
        PrivilegeInfo {
            is_administrator: false,
            can_manage_messages: false,
            has_bypass_role: true,
        }
    }

    #[test]
    fn administrator_is_never_actioned() {
        let policy = ActionPolicy::new();
        let guild = GuildPolicy {
            action: EscalationAction::Ban,
            ..Default::default()
        };

        let action = policy.decide(&profane_result(&["badword"]), &guild, &admin());
        assert!(action.is_none());

        let action = policy.decide(
            &DetectionResult::spam("Repeated character spam: 'o'".to_string()),
            &guild,
            &admin(),
        );
        assert!(action.is_none());
    }

    #[test]
    fn bypass_role_is_never_actioned() {
        let policy = ActionPolicy::new();
        let action = policy.decide(
            &profane_result(&["badword"]),
            &GuildPolicy::default(),
            &bypass_role_holder(),
        );
        assert!(action.is_none());
    }

    #[test]
    fn clean_result_means_no_action() {
        let policy = ActionPolicy::new();
        let action = policy.decide(
            &DetectionResult::clean(),
            &GuildPolicy::default(),
            &PrivilegeInfo::member(),
        );
        assert!(action.is_none());
    }

    #[test]
    fn spam_never_escalates_past_delete_and_warn() {
        let policy = ActionPolicy::new();
        let guild = GuildPolicy {
            action: EscalationAction::Ban,
            delete_message: false,
            ..Default::default()
        };

        let action = policy.decide(
            &DetectionResult::spam("Repeated character spam: 'o'".to_string()),
            &guild,
            &PrivilegeInfo::member(),
        );

        match action {
            ModAction::DeleteAndWarn(ctx) => {
                // Spam always deletes, even when profanity deletion is off.
                assert!(ctx.delete_message);
                assert_eq!(ctx.warning, SPAM_NOTICE);
                // Best-effort notice only; the reason lives in the audit
                // field, not in matched terms.
                assert!(ctx.dm_only);
                assert!(ctx.matched_terms.is_empty());
                assert!(ctx.audit_reason.contains("Repeated character spam"));
            }
            other => panic!("expected DeleteAndWarn, got {:?}", other),
        }
    }

    #[test]
    fn profanity_maps_to_configured_escalation() {
        let policy = ActionPolicy::new();
        let member = PrivilegeInfo::member();
        let result = profane_result(&["badword"]);

        for (configured, expect_timeout, expect_kick, expect_ban) in [
            (EscalationAction::Warn, false, false, false),
            (EscalationAction::Timeout, true, false, false),
            (EscalationAction::Kick, false, true, false),
            (EscalationAction::Ban, false, false, true),
        ] {
            let guild = GuildPolicy {
                action: configured,
                ..Default::default()
            };
            let action = policy.decide(&result, &guild, &member);
            assert_eq!(
                matches!(action, ModAction::DeleteAndTimeout(_, _)),
                expect_timeout
            );
            assert_eq!(matches!(action, ModAction::DeleteAndKick(_)), expect_kick);
            assert_eq!(matches!(action, ModAction::DeleteAndBan(_)), expect_ban);
        }
    }

    #[test]
    fn timeout_duration_is_ten_minutes() {
        let policy = ActionPolicy::new();
        let guild = GuildPolicy {
            action: EscalationAction::Timeout,
            ..Default::default()
        };

        match policy.decide(&profane_result(&["badword"]), &guild, &PrivilegeInfo::member()) {
            ModAction::DeleteAndTimeout(_, duration) => {
                assert_eq!(duration, Duration::from_secs(600));
            }
            other => panic!("expected DeleteAndTimeout, got {:?}", other),
        }
    }

    #[test]
    fn context_carries_policy_settings() {
        let policy = ActionPolicy::new();
        let guild = GuildPolicy {
            delete_message: false,
            warning_message: "watch it".to_string(),
            ..Default::default()
        };

        match policy.decide(&profane_result(&["badword"]), &guild, &PrivilegeInfo::member()) {
            ModAction::DeleteAndWarn(ctx) => {
                assert!(!ctx.delete_message);
                assert_eq!(ctx.warning, "watch it");
                // Profanity warnings keep the channel fallback.
                assert!(!ctx.dm_only);
                assert_eq!(ctx.matched_terms, vec!["badword".to_string()]);
                assert!(ctx.audit_reason.contains("badword"));
            }
            other => panic!("expected DeleteAndWarn, got {:?}", other),
        }
    }

    #[test]
    fn audit_reason_names_at_most_three_terms() {
        let policy = ActionPolicy::new();
        let terms: BTreeSet<String> = ["alpha", "bravo", "charlie", "delta"]
            .iter()
            .map(|t| t.to_string())
            .collect();
        let result = DetectionResult::profane(terms);

        match policy.decide(&result, &GuildPolicy::default(), &PrivilegeInfo::member()) {
            ModAction::DeleteAndWarn(ctx) => {
                assert!(!ctx.audit_reason.contains("delta"));
                assert_eq!(ctx.matched_terms.len(), 4);
            }
            other => panic!("expected DeleteAndWarn, got {:?}", other),
        }
    }
}
