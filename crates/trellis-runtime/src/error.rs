use thiserror::Error;
use trellis_auth::AuthError;

#[derive(Debug, Error)]
pub enum WidgetError {
    #[error("authorization failed: {0}")]
    Authorization(#[from] AuthError),

    #[error("{hook} hook failed: {source}")]
    Hook {
        hook: &'static str,
        #[source]
        source: anyhow::Error,
    },
}
