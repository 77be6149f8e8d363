use std::sync::Arc;
use std::time::Duration;

use trellis_core::{AuthorizationResult, RuntimeOptions, WidgetIdentity, PREVIEW_TOKEN};

use crate::cache::AuthCache;
use crate::error::AuthError;
use crate::store::CacheStore;
use crate::transport::AuthTransport;

/// Resolves authorization for a widget identity.
///
/// Priority order: preview override, then cache (when enabled), then a
/// bounded network retry loop with constant backoff. The preview override is
/// injected explicitly at construction rather than read from ambient state,
/// and wins unconditionally — it never touches cache or network.
pub struct Authorizer {
    transport: Arc<dyn AuthTransport>,
    cache: Option<AuthCache>,
    preview: Option<serde_json::Value>,
    retry_attempts: u32,
    retry_delay: Duration,
}

impl Authorizer {
    pub fn new(
        options: &RuntimeOptions,
        transport: Arc<dyn AuthTransport>,
        store: Arc<dyn CacheStore>,
    ) -> Self {
        let cache = options
            .cache_enabled
            .then(|| AuthCache::new(store, options.cache_ttl()));

        Self {
            transport,
            cache,
            preview: None,
            retry_attempts: options.retry_attempts.max(1),
            retry_delay: options.retry_delay(),
        }
    }

    /// Install a preview config override.
    pub fn with_preview(mut self, preview: Option<serde_json::Value>) -> Self {
        self.preview = preview;
        self
    }

    /// Obtain an authorization result: preview, then cache, then network.
    pub async fn authorize(
        &self,
        identity: &WidgetIdentity,
    ) -> Result<AuthorizationResult, AuthError> {
        if let Some(config) = &self.preview {
            tracing::info!(token = PREVIEW_TOKEN, "Preview override active, skipping authorization");
            return Ok(AuthorizationResult::preview(identity, config.clone()));
        }

        if let Some(cache) = &self.cache
            && let Some(cached) = cache.load(identity).await
        {
            return Ok(cached);
        }

        self.fetch_with_retry(identity).await
    }

    /// Re-authorize from the network, discarding any cached entry first.
    ///
    /// Used by reload: the cache read is bypassed, and a successful fetch
    /// re-populates the cache. The preview override still wins.
    pub async fn refresh(
        &self,
        identity: &WidgetIdentity,
    ) -> Result<AuthorizationResult, AuthError> {
        if let Some(config) = &self.preview {
            return Ok(AuthorizationResult::preview(identity, config.clone()));
        }

        if let Some(cache) = &self.cache
            && let Err(e) = cache.clear(identity).await
        {
            tracing::warn!(error = %e, "Failed to clear cache entry before refresh");
        }

        self.fetch_with_retry(identity).await
    }

    async fn fetch_with_retry(
        &self,
        identity: &WidgetIdentity,
    ) -> Result<AuthorizationResult, AuthError> {
        let mut last_error: Option<AuthError> = None;

        for attempt in 1..=self.retry_attempts {
            match self.transport.fetch(identity).await {
                Ok(result) => {
                    tracing::info!(
                        attempt,
                        authorized = result.authorized,
                        "Authorization fetched"
                    );

                    if let Some(cache) = &self.cache
                        && let Err(e) = cache.store(identity, &result).await
                    {
                        tracing::warn!(error = %e, "Failed to persist authorization to cache");
                    }

                    return Ok(result);
                }
                Err(e) => {
                    tracing::warn!(
                        attempt,
                        max_attempts = self.retry_attempts,
                        error = %e,
                        "Authorization attempt failed"
                    );
                    last_error = Some(e);

                    if attempt < self.retry_attempts {
                        tokio::time::sleep(self.retry_delay).await;
                    }
                }
            }
        }

        Err(AuthError::Exhausted {
            attempts: self.retry_attempts,
            message: last_error
                .map(|e| e.to_string())
                .unwrap_or_else(|| "authorization failed".to_string()),
        })
    }
}
