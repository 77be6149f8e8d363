use serde::{Deserialize, Serialize};

use crate::identity::WidgetIdentity;

/// Token value carried by authorization results synthesized in preview mode.
pub const PREVIEW_TOKEN: &str = "preview";

/// Outcome of an authorization attempt.
///
/// Matches the JSON body returned by
/// `GET {base_url}/api/auth/widget?website_id=…&app_id=…`. Every field is
/// defaulted so lax upstream payloads still parse; the runtime only acts on
/// the `authorized` flag and the opaque `config`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AuthorizationResult {
    #[serde(default)]
    pub authorized: bool,
    /// Opaque widget configuration, passed verbatim to the lifecycle hooks.
    #[serde(default)]
    pub config: serde_json::Value,
    #[serde(default)]
    pub token: String,
    #[serde(default)]
    pub app: AppMetadata,
    #[serde(default)]
    pub website: WebsiteMetadata,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppMetadata {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WebsiteMetadata {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub is_ecommerce: bool,
    #[serde(default)]
    pub customer_id: String,
}

impl AuthorizationResult {
    /// Synthesize a preview-mode result from an injected config.
    ///
    /// Always authorized, never touches cache or network. Metadata fields are
    /// placeholders derived from the widget identity.
    pub fn preview(identity: &WidgetIdentity, config: serde_json::Value) -> Self {
        Self {
            authorized: true,
            config,
            token: PREVIEW_TOKEN.to_string(),
            app: AppMetadata {
                id: identity.app_id.clone(),
                name: identity.widget_name.clone(),
                description: String::new(),
            },
            website: WebsiteMetadata {
                id: identity.website_id.clone(),
                url: identity.base_url.clone(),
                is_ecommerce: false,
                customer_id: String::new(),
            },
        }
    }
}
