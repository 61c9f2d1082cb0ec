use std::sync::Arc;

use async_trait::async_trait;
use tracing::info;

use super::{file_store::FileStore, memory_store::MemoryStore};
use crate::config::{StoreBackend, StoreConfig};
use crate::models::{TokenKind, TokenPair};

/// The TokenStore trait abstracts the two persisted token slots.
///
/// Implementations must make `replace`, `overwrite` and `clear` atomic: no
/// reader may observe one slot updated and the other not.
#[async_trait]
pub trait TokenStore: Send + Sync {
    async fn get(&self, kind: TokenKind) -> Result<Option<String>, String>;
    async fn set(&self, kind: TokenKind, value: &str) -> Result<(), String>;
    /// Store a freshly issued pair. A pair without a refresh token keeps the
    /// refresh slot as it is.
    async fn replace(&self, pair: &TokenPair) -> Result<(), String>;
    /// Make the store hold exactly `pair`: a pair without a refresh token
    /// empties the refresh slot. Used when a new session starts.
    async fn overwrite(&self, pair: &TokenPair) -> Result<(), String>;
    /// Remove both slots as one unit.
    async fn clear(&self) -> Result<(), String>;
    fn get_name(&self) -> &str;
}

/// Creates a concrete store implementation based on the StoreConfig.
pub fn create_store(config: &StoreConfig) -> Arc<dyn TokenStore> {
    match &config.backend {
        StoreBackend::Memory => {
            info!("Using in-memory token store.");
            Arc::new(MemoryStore::new(config.keys.clone()))
        }
        StoreBackend::File { path } => {
            let store = FileStore::new(path.clone(), config.keys.clone());
            info!("Using file token store at {}", store.path().display());
            Arc::new(store)
        }
    }
}
