use std::path::Path;

use serde::Deserialize;
use trellis_core::RuntimeOptions;

/// Embedding configuration file (TOML).
///
/// The explicit replacement for the original script-tag attribute discovery:
/// the hosting layer states the widget identity outright instead of the
/// runtime scraping it from the document.
///
/// ```toml
/// [widget]
/// website_id = "site-1"
/// app_id = "app-1"
/// base_url = "https://platform.example"
///
/// [options]
/// retry_attempts = 5
/// ```
#[derive(Debug, Default, Deserialize)]
pub struct EmbedConfig {
    #[serde(default)]
    pub widget: WidgetSection,
    #[serde(default)]
    pub options: RuntimeOptions,
}

#[derive(Debug, Deserialize)]
pub struct WidgetSection {
    #[serde(default)]
    pub website_id: String,
    #[serde(default)]
    pub app_id: String,
    #[serde(default)]
    pub base_url: String,
    #[serde(default = "default_widget_name")]
    pub name: String,
    #[serde(default = "default_widget_version")]
    pub version: String,
}

fn default_widget_name() -> String {
    "trellis_widget".into()
}
fn default_widget_version() -> String {
    env!("CARGO_PKG_VERSION").into()
}

impl EmbedConfig {
    pub fn from_file(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Ok(toml::from_str(&content)?)
    }
}

impl Default for WidgetSection {
    fn default() -> Self {
        Self {
            website_id: String::new(),
            app_id: String::new(),
            base_url: String::new(),
            name: default_widget_name(),
            version: default_widget_version(),
        }
    }
}
