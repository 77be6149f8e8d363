use std::collections::HashMap;
use std::future::Future;
use std::path::{Path, PathBuf};
use std::pin::Pin;

use tokio::sync::RwLock;

use crate::error::StoreError;

/// String-keyed persistent store backing the authorization cache.
///
/// Backends only move strings; TTL semantics are layered on top by
/// [`crate::AuthCache`]. The store is page-wide by design: widget instances
/// sharing a (website_id, app_id) pair share entries, last write wins.
///
/// Uses Pin<Box<dyn Future>> for dyn-compatibility.
pub trait CacheStore: Send + Sync {
    fn get<'a>(
        &'a self,
        key: &'a str,
    ) -> Pin<Box<dyn Future<Output = Result<Option<String>, StoreError>> + Send + 'a>>;

    fn put<'a>(
        &'a self,
        key: &'a str,
        value: String,
    ) -> Pin<Box<dyn Future<Output = Result<(), StoreError>> + Send + 'a>>;

    fn remove<'a>(
        &'a self,
        key: &'a str,
    ) -> Pin<Box<dyn Future<Output = Result<(), StoreError>> + Send + 'a>>;

    /// Backend name for logging.
    fn backend_name(&self) -> &str;
}

/// In-memory backend. Shared between instances via `Arc`.
pub struct MemoryStore {
    entries: RwLock<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
        }
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl CacheStore for MemoryStore {
    fn get<'a>(
        &'a self,
        key: &'a str,
    ) -> Pin<Box<dyn Future<Output = Result<Option<String>, StoreError>> + Send + 'a>> {
        Box::pin(async move {
            let entries = self.entries.read().await;
            Ok(entries.get(key).cloned())
        })
    }

    fn put<'a>(
        &'a self,
        key: &'a str,
        value: String,
    ) -> Pin<Box<dyn Future<Output = Result<(), StoreError>> + Send + 'a>> {
        Box::pin(async move {
            let mut entries = self.entries.write().await;
            entries.insert(key.to_string(), value);
            Ok(())
        })
    }

    fn remove<'a>(
        &'a self,
        key: &'a str,
    ) -> Pin<Box<dyn Future<Output = Result<(), StoreError>> + Send + 'a>> {
        Box::pin(async move {
            let mut entries = self.entries.write().await;
            entries.remove(key);
            Ok(())
        })
    }

    fn backend_name(&self) -> &str {
        "memory"
    }
}

/// Disk-backed store: one JSON file per key under `base_dir`.
///
/// Keys are hex digests (see `WidgetIdentity::cache_key`), so they are
/// filename-safe as-is.
pub struct DiskStore {
    base_dir: PathBuf,
}

impl DiskStore {
    pub fn new(base_dir: PathBuf) -> Self {
        Self { base_dir }
    }

    /// Default store location: ~/.trellis/cache/
    pub fn default_path() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".trellis")
            .join("cache")
    }

    fn entry_path(&self, key: &str) -> PathBuf {
        self.base_dir.join(format!("{key}.json"))
    }

    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }
}

impl CacheStore for DiskStore {
    fn get<'a>(
        &'a self,
        key: &'a str,
    ) -> Pin<Box<dyn Future<Output = Result<Option<String>, StoreError>> + Send + 'a>> {
        Box::pin(async move {
            match tokio::fs::read_to_string(self.entry_path(key)).await {
                Ok(content) => Ok(Some(content)),
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
                Err(e) => Err(e.into()),
            }
        })
    }

    fn put<'a>(
        &'a self,
        key: &'a str,
        value: String,
    ) -> Pin<Box<dyn Future<Output = Result<(), StoreError>> + Send + 'a>> {
        Box::pin(async move {
            tokio::fs::create_dir_all(&self.base_dir).await?;
            tokio::fs::write(self.entry_path(key), value).await?;
            Ok(())
        })
    }

    fn remove<'a>(
        &'a self,
        key: &'a str,
    ) -> Pin<Box<dyn Future<Output = Result<(), StoreError>> + Send + 'a>> {
        Box::pin(async move {
            match tokio::fs::remove_file(self.entry_path(key)).await {
                Ok(()) => Ok(()),
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
                Err(e) => Err(e.into()),
            }
        })
    }

    fn backend_name(&self) -> &str {
        "disk"
    }
}
