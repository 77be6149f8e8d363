use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::error::ConfigError;

/// Immutable identity of a widget instance.
///
/// The embedding layer must supply a website id, an app id, and the
/// authorization service base URL; construction fails if any of the three is
/// blank. Widget name and version identify the widget build for telemetry
/// and preview placeholders.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WidgetIdentity {
    pub website_id: String,
    pub app_id: String,
    /// Authorization service base URL, without trailing slash.
    pub base_url: String,
    pub widget_name: String,
    pub widget_version: String,
}

impl WidgetIdentity {
    pub fn new(
        website_id: impl Into<String>,
        app_id: impl Into<String>,
        base_url: impl Into<String>,
        widget_name: impl Into<String>,
        widget_version: impl Into<String>,
    ) -> Result<Self, ConfigError> {
        let website_id = required("website_id", website_id.into())?;
        let app_id = required("app_id", app_id.into())?;
        let base_url = required("base_url", base_url.into())?;

        Ok(Self {
            website_id,
            app_id,
            base_url: base_url.trim_end_matches('/').to_string(),
            widget_name: widget_name.into(),
            widget_version: widget_version.into(),
        })
    }

    /// Compute a stable SHA-256 cache key for this (website_id, app_id) pair.
    ///
    /// Uses canonical JSON serialization of the pair, so the key is
    /// collision-free per pair and identical across restarts.
    pub fn cache_key(&self) -> String {
        let canonical =
            serde_json::to_string(&(&self.website_id, &self.app_id)).unwrap_or_default();
        let mut hasher = Sha256::new();
        hasher.update(canonical.as_bytes());
        hex::encode(hasher.finalize())
    }
}

fn required(attribute: &'static str, value: String) -> Result<String, ConfigError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ConfigError::MissingAttribute { attribute });
    }
    Ok(trimmed.to_string())
}
