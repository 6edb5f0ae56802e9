// JSON-backed policy store - the whole policy map lives in one pretty-
// printed file, read once at startup and rewritten on every save.
//
// A malformed or unreadable file is recovered locally: the store starts
// from defaults and logs the problem. Configuration trouble is never
// surfaced to end users.

use crate::core::moderation::{GuildPolicy, PolicyError, PolicyStore};
use async_trait::async_trait;
use std::collections::HashMap;
use std::path::PathBuf;
use tokio::sync::RwLock;

pub struct JsonPolicyStore {
    path: PathBuf,
    cache: RwLock<HashMap<u64, GuildPolicy>>,
}

impl JsonPolicyStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let map = if path.exists() {
            match std::fs::read_to_string(&path) {
                Ok(contents) => match serde_json::from_str(&contents) {
                    Ok(map) => map,
                    Err(e) => {
                        tracing::error!(path = %path.display(), "Malformed policy file, starting from defaults: {e}");
                        HashMap::new()
                    }
                },
                Err(e) => {
                    tracing::error!(path = %path.display(), "Could not read policy file, starting from defaults: {e}");
                    HashMap::new()
                }
            }
        } else {
            HashMap::new()
        };

        Self {
            path,
            cache: RwLock::new(map),
        }
    }

    async fn persist(&self) -> Result<(), PolicyError> {
        let cache = self.cache.read().await;
        let file = std::fs::File::create(&self.path)
            .map_err(|e| PolicyError::StorageError(e.to_string()))?;
        serde_json::to_writer_pretty(file, &*cache)
            .map_err(|e| PolicyError::StorageError(e.to_string()))?;
        Ok(())
    }
}

#[async_trait]
impl PolicyStore for JsonPolicyStore {
    async fn get_policy(&self, guild_id: u64) -> Result<GuildPolicy, PolicyError> {
        let cache = self.cache.read().await;
        Ok(cache.get(&guild_id).cloned().unwrap_or_default())
    }

    async fn save_policy(&self, guild_id: u64, policy: GuildPolicy) -> Result<(), PolicyError> {
        let mut cache = self.cache.write().await;
        cache.insert(guild_id, policy);
        drop(cache); // Release lock before persisting
        self.persist().await
    }
}
