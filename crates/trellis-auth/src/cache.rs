use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use serde::{Deserialize, Serialize};
use trellis_core::{AuthorizationResult, WidgetIdentity};

use crate::error::AuthError;
use crate::store::CacheStore;

/// Persisted authorization snapshot, JSON-serialized into the store.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CachedAuthorization {
    pub data: AuthorizationResult,
    /// Capture time, Unix milliseconds.
    pub timestamp: i64,
}

/// TTL cache for authorization results, layered over a [`CacheStore`].
///
/// Freshness uses wall-clock time: an entry is served while
/// `now - timestamp <= ttl` and deleted once it goes stale. Manual store
/// edits and clock skew are accepted as-is; there is no integrity check.
pub struct AuthCache {
    store: Arc<dyn CacheStore>,
    ttl: Duration,
}

impl AuthCache {
    pub fn new(store: Arc<dyn CacheStore>, ttl: Duration) -> Self {
        Self { store, ttl }
    }

    /// Load a fresh cached result for this identity.
    ///
    /// Stale entries are deleted before returning `None`. Store or parse
    /// failures are logged and treated as a miss so a corrupt cache can
    /// never block authorization.
    pub async fn load(&self, identity: &WidgetIdentity) -> Option<AuthorizationResult> {
        let key = identity.cache_key();

        let raw = match self.store.get(&key).await {
            Ok(Some(raw)) => raw,
            Ok(None) => return None,
            Err(e) => {
                tracing::warn!(backend = self.store.backend_name(), error = %e, "Cache read failed");
                return None;
            }
        };

        let entry: CachedAuthorization = match serde_json::from_str(&raw) {
            Ok(entry) => entry,
            Err(e) => {
                tracing::warn!(key = %key, error = %e, "Corrupt cache entry, discarding");
                let _ = self.store.remove(&key).await;
                return None;
            }
        };

        let age_ms = Utc::now().timestamp_millis().saturating_sub(entry.timestamp);
        if age_ms > self.ttl.as_millis() as i64 {
            tracing::debug!(key = %key, age_ms, "Cache entry expired, deleting");
            if let Err(e) = self.store.remove(&key).await {
                tracing::warn!(key = %key, error = %e, "Failed to delete stale cache entry");
            }
            return None;
        }

        tracing::debug!(key = %key, age_ms, "Cache hit");
        Some(entry.data)
    }

    /// Persist a result with the current timestamp.
    pub async fn store(
        &self,
        identity: &WidgetIdentity,
        result: &AuthorizationResult,
    ) -> Result<(), AuthError> {
        let entry = CachedAuthorization {
            data: result.clone(),
            timestamp: Utc::now().timestamp_millis(),
        };
        let raw = serde_json::to_string(&entry)?;
        self.store.put(&identity.cache_key(), raw).await?;
        Ok(())
    }

    /// Delete the entry for this identity, if any.
    pub async fn clear(&self, identity: &WidgetIdentity) -> Result<(), AuthError> {
        self.store.remove(&identity.cache_key()).await?;
        Ok(())
    }
}
