// Moderation service - orchestrates one message through the pipeline and
// carries the administrative operations that mutate guild policy.
//
// NO platform dependencies here - just pure domain logic over the
// PolicyStore port.

use super::action_policy::ActionPolicy;
use super::detection_engine::DetectionEngine;
use super::moderation_models::{
    EscalationAction, GuildPolicy, ModAction, PrivilegeInfo, SensitivityTier,
};
use async_trait::async_trait;
use thiserror::Error;

// ============================================================================
// ERRORS
// ============================================================================

#[derive(Debug, Error)]
pub enum PolicyError {
    #[error("Storage error: {0}")]
    StorageError(String),
}

// ============================================================================
// STORAGE TRAIT (PORT)
// ============================================================================

/// Trait for persisting per-guild moderation policy.
#[async_trait]
pub trait PolicyStore: Send + Sync {
    /// Get the policy for a guild. Never-seen guilds get a fully-populated
    /// default policy (lazy initialization), never an absent value.
    async fn get_policy(&self, guild_id: u64) -> Result<GuildPolicy, PolicyError>;

    /// Replace the policy for a guild in one atomic swap, so no in-flight
    /// evaluation observes a partially-updated policy.
    async fn save_policy(&self, guild_id: u64, policy: GuildPolicy) -> Result<(), PolicyError>;
}

// ============================================================================
// CORE SERVICE
// ============================================================================

/// Moderation service tying the detection engine and action policy to a
/// policy store.
pub struct ModerationService<S: PolicyStore> {
    store: S,
    engine: DetectionEngine,
    action_policy: ActionPolicy,
}

impl<S: PolicyStore> ModerationService<S> {
    /// Create a moderation service with the given store and engine.
    pub fn new(store: S, engine: DetectionEngine) -> Self {
        Self {
            store,
            engine,
            action_policy: ActionPolicy::new(),
        }
    }

    /// Run one message through the full decision pipeline and return the
    /// action to take. Detection itself cannot fail; only the policy read
    /// can.
    ///
    /// Gates, in order:
    /// 1. Guild master switch.
    /// 2. Caller-level `skip_admins` (administrator or manage-messages).
    /// 3. Engine-level bypass (administrator or bypass role) inside
    ///    `ActionPolicy::decide`.
    pub async fn review_message(
        &self,
        guild_id: u64,
        text: &str,
        privilege: &PrivilegeInfo,
    ) -> Result<ModAction, PolicyError> {
        let policy = self.store.get_policy(guild_id).await?;

        if !policy.enabled {
            return Ok(ModAction::None);
        }

        if policy.skip_admins && (privilege.is_administrator || privilege.can_manage_messages) {
            return Ok(ModAction::None);
        }

        let result = self.engine.evaluate(text, &policy);
        Ok(self.action_policy.decide(&result, &policy, privilege))
    }

    /// Get the current policy for a guild.
    pub async fn get_policy(&self, guild_id: u64) -> Result<GuildPolicy, PolicyError> {
        self.store.get_policy(guild_id).await
    }

    /// Enable or disable moderation for a guild.
    pub async fn set_enabled(&self, guild_id: u64, enabled: bool) -> Result<(), PolicyError> {
        self.update(guild_id, |p| p.enabled = enabled).await
    }

    /// Set the sensitivity tier.
    pub async fn set_sensitivity(
        &self,
        guild_id: u64,
        tier: SensitivityTier,
    ) -> Result<(), PolicyError> {
        self.update(guild_id, |p| p.sensitivity = tier).await
    }

    /// Set the escalation action applied on violations.
    pub async fn set_action(
        &self,
        guild_id: u64,
        action: EscalationAction,
    ) -> Result<(), PolicyError> {
        self.update(guild_id, |p| p.action = action).await
    }

    /// Set or clear the incident log channel.
    pub async fn set_log_channel(
        &self,
        guild_id: u64,
        channel_id: Option<u64>,
    ) -> Result<(), PolicyError> {
        self.update(guild_id, |p| p.log_channel = channel_id).await
    }

    /// Set the warning message sent to violators.
    pub async fn set_warning_message(
        &self,
        guild_id: u64,
        message: String,
    ) -> Result<(), PolicyError> {
        self.update(guild_id, |p| p.warning_message = message).await
    }

    /// Add a word to the custom block list. Case-insensitive, idempotent.
    /// Empty and whitespace-only words are ignored; an empty entry would
    /// substring-match every message.
    pub async fn add_custom_word(&self, guild_id: u64, word: &str) -> Result<(), PolicyError> {
        let word = word.trim().to_lowercase();
        if word.is_empty() {
            return Ok(());
        }
        self.update(guild_id, move |p| {
            p.custom_words.insert(word);
        })
        .await
    }

    /// Remove a word from the custom block list. Returns whether it existed.
    pub async fn remove_custom_word(&self, guild_id: u64, word: &str) -> Result<bool, PolicyError> {
        let word = word.trim().to_lowercase();
        let mut policy = self.store.get_policy(guild_id).await?;
        let removed = policy.custom_words.remove(&word);
        self.store.save_policy(guild_id, policy).await?;
        Ok(removed)
    }

    /// Add a word to the whitelist. Case-insensitive, idempotent.
    /// Empty and whitespace-only words are ignored.
    pub async fn add_whitelist_word(&self, guild_id: u64, word: &str) -> Result<(), PolicyError> {
        let word = word.trim().to_lowercase();
        if word.is_empty() {
            return Ok(());
        }
        self.update(guild_id, move |p| {
            p.whitelist_words.insert(word);
        })
        .await
    }

    /// Remove a word from the whitelist. Returns whether it existed.
    pub async fn remove_whitelist_word(
        &self,
        guild_id: u64,
        word: &str,
    ) -> Result<bool, PolicyError> {
        let word = word.trim().to_lowercase();
        let mut policy = self.store.get_policy(guild_id).await?;
        let removed = policy.whitelist_words.remove(&word);
        self.store.save_policy(guild_id, policy).await?;
        Ok(removed)
    }

    /// Read-modify-write helper; the store swaps the whole policy so
    /// concurrent evaluations keep a consistent snapshot.
    async fn update<F>(&self, guild_id: u64, mutate: F) -> Result<(), PolicyError>
    where
        F: FnOnce(&mut GuildPolicy),
    {
        let mut policy = self.store.get_policy(guild_id).await?;
        mutate(&mut policy);
        self.store.save_policy(guild_id, policy).await
    }
}

// ============================================================================
// TESTS
// ============================================================================
