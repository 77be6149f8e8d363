use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("authorization request failed: {0}")]
    Transport(String),

    #[error("authorization service returned {status}: {body}")]
    Status { status: u16, body: String },

    #[error("authorization failed after {attempts} attempts: {message}")]
    Exhausted { attempts: u32, message: String },

    #[error("cache store error: {0}")]
    Store(#[from] StoreError),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
