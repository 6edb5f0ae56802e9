// Enforcement - drives the platform actuator with a decided action.
//
// The actuator performs the network I/O (deletes, DMs, moderation calls).
// Every call reports an explicit outcome instead of raising; permission
// gaps and delivery failures are logged and swallowed so that no message's
// handling can stall the pipeline.

use super::moderation_models::{ActionContext, Incident, MessageRef, ModAction};
use async_trait::async_trait;
use chrono::Utc;
use std::time::Duration;

/// Visibility window for an in-channel warning when a DM cannot be
/// delivered.
const CHANNEL_WARNING_TTL: Duration = Duration::from_secs(15);
/// Visibility window for the timeout notice.
const TIMEOUT_NOTICE_TTL: Duration = Duration::from_secs(30);
/// Visibility window for kick/ban notices.
const REMOVAL_NOTICE_TTL: Duration = Duration::from_secs(60);

/// Outcome of a single actuator call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActOutcome {
    Success,
    /// The target no longer exists (message already deleted, member gone).
    NotFound,
    /// The actuator lacks the platform permission, or the recipient has
    /// blocked delivery.
    Forbidden,
}

/// Platform moderation surface. Implementations wrap the chat platform's
/// HTTP client; capability queries replace probing for method existence.
#[async_trait]
pub trait Actuator: Send + Sync {
    async fn delete_message(&self, msg: &MessageRef) -> ActOutcome;

    async fn send_direct_message(&self, user_id: u64, content: &str) -> ActOutcome;

    /// Send to a channel, optionally auto-deleting after `ttl`.
    async fn send_channel_message(
        &self,
        channel_id: u64,
        content: &str,
        ttl: Option<Duration>,
    ) -> ActOutcome;

    async fn apply_timeout(
        &self,
        guild_id: u64,
        user_id: u64,
        duration: Duration,
        reason: &str,
    ) -> ActOutcome;

    async fn kick_member(&self, guild_id: u64, user_id: u64, reason: &str) -> ActOutcome;

    async fn ban_member(&self, guild_id: u64, user_id: u64, reason: &str) -> ActOutcome;

    /// Whether the actuator holds the moderate-members permission.
    async fn can_timeout(&self, guild_id: u64) -> bool;

    /// Whether the actuator holds the kick-members permission.
    async fn can_kick(&self, guild_id: u64) -> bool;

    /// Whether the actuator holds the ban-members permission.
    async fn can_ban(&self, guild_id: u64) -> bool;
}

/// Executes a decided action against the actuator.
pub struct ActionDispatcher<A: Actuator> {
    actuator: A,
}

impl<A: Actuator> ActionDispatcher<A> {
    pub fn new(actuator: A) -> Self {
        Self { actuator }
    }

    /// Carry out an action for one message. Never fails: capability gaps
    /// and delivery failures are logged and the incident is still
    /// considered handled.
    pub async fn dispatch(&self, msg: &MessageRef, action: &ModAction, log_channel: Option<u64>) {
        let ctx = match action {
            ModAction::None => return,
            ModAction::DeleteAndWarn(ctx)
            | ModAction::DeleteAndTimeout(ctx, _)
            | ModAction::DeleteAndKick(ctx)
            | ModAction::DeleteAndBan(ctx) => ctx,
        };

        if ctx.delete_message {
            self.delete(msg).await;
        }

        // The warn step always happens first; escalations are layered on
        // top of it, not substitutes for it.
        self.warn(msg, ctx).await;

        match action {
            ModAction::None | ModAction::DeleteAndWarn(_) => {}
            ModAction::DeleteAndTimeout(_, duration) => {
                self.timeout(msg, ctx, *duration).await;
            }
            ModAction::DeleteAndKick(_) => self.kick(msg, ctx).await,
            ModAction::DeleteAndBan(_) => self.ban(msg, ctx).await,
        }

        self.log_incident(msg, ctx, log_channel).await;
    }

    async fn delete(&self, msg: &MessageRef) {
        match self.actuator.delete_message(msg).await {
            ActOutcome::Success => {
                tracing::info!(
                    guild_id = msg.guild_id,
                    author_id = msg.author_id,
                    "Deleted flagged message"
                );
            }
            ActOutcome::NotFound => {
                // Already deleted, nothing to do.
            }
            ActOutcome::Forbidden => {
                tracing::warn!(guild_id = msg.guild_id, "No permission to delete messages");
            }
        }
    }

    /// Warn via DM, falling back to an auto-expiring in-channel notice when
    /// the recipient has DMs disabled. A failed fallback is logged and the
    /// incident is otherwise considered handled. Best-effort notices
    /// (`dm_only`) skip the fallback entirely.
    async fn warn(&self, msg: &MessageRef, ctx: &ActionContext) {
        match self
            .actuator
            .send_direct_message(msg.author_id, &ctx.warning)
            .await
        {
            ActOutcome::Success => {
                tracing::info!(author_id = msg.author_id, "Sent DM warning");
            }
            ActOutcome::NotFound | ActOutcome::Forbidden if ctx.dm_only => {
                tracing::info!(
                    author_id = msg.author_id,
                    "Could not DM member - DMs are disabled"
                );
            }
            ActOutcome::NotFound | ActOutcome::Forbidden => {
                let channel_warning = format!("<@{}> {}", msg.author_id, ctx.warning);
                let outcome = self
                    .actuator
                    .send_channel_message(
                        msg.channel_id,
                        &channel_warning,
                        Some(CHANNEL_WARNING_TTL),
                    )
                    .await;
                if outcome != ActOutcome::Success {
                    tracing::warn!(
                        author_id = msg.author_id,
                        channel_id = msg.channel_id,
                        "Could not deliver warning via DM or channel"
                    );
                }
            }
        }
    }

    async fn timeout(&self, msg: &MessageRef, ctx: &ActionContext, duration: Duration) {
        if !self.actuator.can_timeout(msg.guild_id).await {
            tracing::warn!(guild_id = msg.guild_id, "No permission to timeout members");
            return;
        }

        match self
            .actuator
            .apply_timeout(msg.guild_id, msg.author_id, duration, &ctx.audit_reason)
            .await
        {
            ActOutcome::Success => {
                let notice = format!(
                    "<@{}> has been timed out for {} minutes due to inappropriate language.",
                    msg.author_id,
                    duration.as_secs() / 60
                );
                self.actuator
                    .send_channel_message(msg.channel_id, &notice, Some(TIMEOUT_NOTICE_TTL))
                    .await;
                tracing::info!(author_id = msg.author_id, "Timed out member");
            }
            outcome => {
                tracing::warn!(
                    guild_id = msg.guild_id,
                    author_id = msg.author_id,
                    ?outcome,
                    "Timeout failed"
                );
            }
        }
    }

    async fn kick(&self, msg: &MessageRef, ctx: &ActionContext) {
        if !self.actuator.can_kick(msg.guild_id).await {
            tracing::warn!(guild_id = msg.guild_id, "No permission to kick members");
            return;
        }

        match self
            .actuator
            .kick_member(msg.guild_id, msg.author_id, &ctx.audit_reason)
            .await
        {
            ActOutcome::Success => {
                let notice = format!(
                    "<@{}> has been kicked for inappropriate language.",
                    msg.author_id
                );
                self.actuator
                    .send_channel_message(msg.channel_id, &notice, Some(REMOVAL_NOTICE_TTL))
                    .await;
                tracing::info!(author_id = msg.author_id, "Kicked member");
            }
            outcome => {
                tracing::warn!(
                    guild_id = msg.guild_id,
                    author_id = msg.author_id,
                    ?outcome,
                    "Kick failed"
                );
            }
        }
    }

    async fn ban(&self, msg: &MessageRef, ctx: &ActionContext) {
        if !self.actuator.can_ban(msg.guild_id).await {
            tracing::warn!(guild_id = msg.guild_id, "No permission to ban members");
            return;
        }

        match self
            .actuator
            .ban_member(msg.guild_id, msg.author_id, &ctx.audit_reason)
            .await
        {
            ActOutcome::Success => {
                let notice = format!(
                    "<@{}> has been banned for inappropriate language.",
                    msg.author_id
                );
                self.actuator
                    .send_channel_message(msg.channel_id, &notice, Some(REMOVAL_NOTICE_TTL))
                    .await;
                tracing::info!(author_id = msg.author_id, "Banned member");
            }
            outcome => {
                tracing::warn!(
                    guild_id = msg.guild_id,
                    author_id = msg.author_id,
                    ?outcome,
                    "Ban failed"
                );
            }
        }
    }

    /// Emit a summary to the configured log channel, if any.
    async fn log_incident(&self, msg: &MessageRef, ctx: &ActionContext, log_channel: Option<u64>) {
        let incident = Incident {
            guild_id: msg.guild_id,
            channel_id: msg.channel_id,
            user_id: msg.author_id,
            detail: ctx.audit_reason.clone(),
            timestamp: Utc::now(),
        };

        tracing::info!(
            guild_id = incident.guild_id,
            user_id = incident.user_id,
            detail = %incident.detail,
            "Moderation incident handled"
        );

        let Some(channel_id) = log_channel else {
            return;
        };

        let summary = format!(
            "🚨 Moderation log — <@{}> in <#{}> at {}: {}",
            incident.user_id,
            incident.channel_id,
            incident.timestamp.format("%Y-%m-%d %H:%M:%S UTC"),
            incident.detail
        );

        if self
            .actuator
            .send_channel_message(channel_id, &summary, None)
            .await
            != ActOutcome::Success
        {
            tracing::warn!(channel_id, "Failed to write to the log channel");
        }
    }
}
