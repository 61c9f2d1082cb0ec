use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;

use super::TokenStore;
use crate::config::TokenKeys;
use crate::models::{TokenKind, TokenPair};

/// A token store that lives as long as the process.
/// Both slots sit behind one mutex, so replace and clear are atomic.
pub struct MemoryStore {
    keys: TokenKeys,
    slots: Mutex<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new(keys: TokenKeys) -> Self {
        MemoryStore {
            keys,
            slots: Mutex::new(HashMap::new()),
        }
    }

    fn key(&self, kind: TokenKind) -> &str {
        match kind {
            TokenKind::Access => &self.keys.access,
            TokenKind::Refresh => &self.keys.refresh,
        }
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, HashMap<String, String>>, String> {
        self.slots
            .lock()
            .map_err(|_| "Token store mutex poisoned".to_string())
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new(TokenKeys::default())
    }
}

#[async_trait]
impl TokenStore for MemoryStore {
    async fn get(&self, kind: TokenKind) -> Result<Option<String>, String> {
        Ok(self.lock()?.get(self.key(kind)).cloned())
    }

    async fn set(&self, kind: TokenKind, value: &str) -> Result<(), String> {
        let key = self.key(kind).to_string();
        self.lock()?.insert(key, value.to_string());
        Ok(())
    }

    async fn replace(&self, pair: &TokenPair) -> Result<(), String> {
        let mut slots = self.lock()?;
        slots.insert(self.keys.access.clone(), pair.access_token.clone());
        if let Some(refresh) = &pair.refresh_token {
            slots.insert(self.keys.refresh.clone(), refresh.clone());
        }
        Ok(())
    }

    async fn overwrite(&self, pair: &TokenPair) -> Result<(), String> {
        let mut slots = self.lock()?;
        slots.insert(self.keys.access.clone(), pair.access_token.clone());
        match &pair.refresh_token {
            Some(refresh) => slots.insert(self.keys.refresh.clone(), refresh.clone()),
            None => slots.remove(&self.keys.refresh),
        };
        Ok(())
    }

    async fn clear(&self) -> Result<(), String> {
        let mut slots = self.lock()?;
        slots.remove(&self.keys.access);
        slots.remove(&self.keys.refresh);
        Ok(())
    }

    fn get_name(&self) -> &str {
        "memory"
    }
}
