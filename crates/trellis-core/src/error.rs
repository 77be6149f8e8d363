use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required embedding attribute: {attribute}")]
    MissingAttribute { attribute: &'static str },
}
