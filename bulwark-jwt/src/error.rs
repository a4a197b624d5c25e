// Error types for JWT operations

use thiserror::Error;

#[derive(Error, Debug)]
pub enum JwtError {
    #[error("JWT encoding error: {0}")]
    EncodingError(#[from] jsonwebtoken::errors::Error),

    #[error("Invalid token: {0}")]
    InvalidToken(String),

    #[error("Token expired")]
    TokenExpired,

    #[error("Invalid signature")]
    InvalidSignature,

    #[error("Algorithm not accepted")]
    InvalidAlgorithm,

    #[error("Signing key too short: {len} bytes, at least {required} required")]
    KeyTooShort { len: usize, required: usize },

    #[error("Signing key is not valid base64: {0}")]
    InvalidKeyEncoding(#[from] base64::DecodeError),

    #[error("Configuration error: {0}")]
    ConfigError(String),
}

impl JwtError {
    /// Whether this error came from bad key material rather than a bad token.
    pub fn is_config_error(&self) -> bool {
        matches!(
            self,
            Self::KeyTooShort { .. } | Self::InvalidKeyEncoding(_) | Self::ConfigError(_)
        )
    }
}

pub type Result<T> = std::result::Result<T, JwtError>;
