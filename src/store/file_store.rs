use std::collections::BTreeMap;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::sync::Mutex;
use tracing::debug;

use super::TokenStore;
use crate::config::TokenKeys;
use crate::models::{TokenKind, TokenPair};

type Document = BTreeMap<String, String>;

/// A token store persisted as a flat JSON object on disk.
///
/// Entries other than the two token slots are left untouched. Every write goes
/// to a sibling temp file which is then renamed over the original, and all
/// read-modify-write cycles hold the same lock.
pub struct FileStore {
    path: PathBuf,
    keys: TokenKeys,
    lock: Mutex<()>,
}

impl FileStore {
    pub fn new(path: PathBuf, keys: TokenKeys) -> Self {
        FileStore {
            path,
            keys,
            lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn key(&self, kind: TokenKind) -> &str {
        match kind {
            TokenKind::Access => &self.keys.access,
            TokenKind::Refresh => &self.keys.refresh,
        }
    }

    async fn read(&self) -> Result<Document, String> {
        match tokio::fs::read(&self.path).await {
            Ok(bytes) if bytes.is_empty() => Ok(Document::new()),
            Ok(bytes) => serde_json::from_slice(&bytes).map_err(|e| {
                format!(
                    "Failed to parse token file {}: {}",
                    self.path.display(),
                    e
                )
            }),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(Document::new()),
            Err(e) => Err(format!(
                "Failed to read token file {}: {}",
                self.path.display(),
                e
            )),
        }
    }

    async fn write(&self, doc: &Document) -> Result<(), String> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent)
                    .await
                    .map_err(|e| format!("Failed to create {}: {}", parent.display(), e))?;
            }
        }

        let body = serde_json::to_vec_pretty(doc)
            .map_err(|e| format!("Failed to serialize token file: {}", e))?;
        let tmp = self.path.with_extension("tmp");
        tokio::fs::write(&tmp, body)
            .await
            .map_err(|e| format!("Failed to write {}: {}", tmp.display(), e))?;
        tokio::fs::rename(&tmp, &self.path)
            .await
            .map_err(|e| format!("Failed to move token file into place: {}", e))?;

        debug!("Token file {} updated", self.path.display());
        Ok(())
    }
}

#[async_trait]
impl TokenStore for FileStore {
    async fn get(&self, kind: TokenKind) -> Result<Option<String>, String> {
        let _guard = self.lock.lock().await;
        Ok(self.read().await?.remove(self.key(kind)))
    }

    async fn set(&self, kind: TokenKind, value: &str) -> Result<(), String> {
        let _guard = self.lock.lock().await;
        let mut doc = self.read().await?;
        doc.insert(self.key(kind).to_string(), value.to_string());
        self.write(&doc).await
    }

    async fn replace(&self, pair: &TokenPair) -> Result<(), String> {
        let _guard = self.lock.lock().await;
        let mut doc = self.read().await?;
        doc.insert(self.keys.access.clone(), pair.access_token.clone());
        if let Some(refresh) = &pair.refresh_token {
            doc.insert(self.keys.refresh.clone(), refresh.clone());
        }
        self.write(&doc).await
    }

    async fn overwrite(&self, pair: &TokenPair) -> Result<(), String> {
        let _guard = self.lock.lock().await;
        let mut doc = self.read().await?;
        doc.insert(self.keys.access.clone(), pair.access_token.clone());
        match &pair.refresh_token {
            Some(refresh) => doc.insert(self.keys.refresh.clone(), refresh.clone()),
            None => doc.remove(&self.keys.refresh),
        };
        self.write(&doc).await
    }

    async fn clear(&self) -> Result<(), String> {
        let _guard = self.lock.lock().await;
        let mut doc = self.read().await?;
        let had_access = doc.remove(&self.keys.access).is_some();
        let had_refresh = doc.remove(&self.keys.refresh).is_some();
        if had_access || had_refresh {
            self.write(&doc).await?;
        }
        Ok(())
    }

    fn get_name(&self) -> &str {
        "file"
    }
}
