// In-memory policy store - useful for tests and single-process setups
// where persistence across restarts is not needed.

use crate::core::moderation::{GuildPolicy, PolicyError, PolicyStore};
use async_trait::async_trait;
use dashmap::DashMap;

#[derive(Default)]
pub struct InMemoryPolicyStore {
    policies: DashMap<u64, GuildPolicy>,
}

impl InMemoryPolicyStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl PolicyStore for InMemoryPolicyStore {
    async fn get_policy(&self, guild_id: u64) -> Result<GuildPolicy, PolicyError> {
        Ok(self
            .policies
            .get(&guild_id)
            .map(|p| p.value().clone())
            .unwrap_or_default())
    }

    async fn save_policy(&self, guild_id: u64, policy: GuildPolicy) -> Result<(), PolicyError> {
        self.policies.insert(guild_id, policy);
        Ok(())
    }
}
