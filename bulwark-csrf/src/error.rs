use bulwark_jwt::JwtError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CsrfError {
    #[error("Missing CSRF token")]
    MissingToken,

    #[error("Invalid CSRF token: {0}")]
    InvalidToken(#[source] JwtError),

    #[error("CSRF token was issued for another session")]
    SessionMismatch,

    #[error("Token generation failed: {0}")]
    GenerationFailed(#[source] JwtError),

    #[error("Invalid CSRF configuration: {0}")]
    Config(String),

    #[error("Failed to load CSRF settings: {0}")]
    Settings(#[from] toml::de::Error),
}

impl CsrfError {
    /// Create a configuration error
    pub fn config<S: Into<String>>(msg: S) -> Self {
        Self::Config(msg.into())
    }

    /// Whether this error means the presented token was rejected.
    pub fn is_verification_failure(&self) -> bool {
        matches!(
            self,
            Self::MissingToken | Self::InvalidToken(_) | Self::SessionMismatch
        )
    }
}

impl From<JwtError> for CsrfError {
    fn from(err: JwtError) -> Self {
        if err.is_config_error() {
            Self::Config(err.to_string())
        } else {
            Self::InvalidToken(err)
        }
    }
}

pub type Result<T> = std::result::Result<T, CsrfError>;
