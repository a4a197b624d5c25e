use crate::error::{CsrfError, Result};
use bulwark_jwt::{JwtConfig, JwtService};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Claims carried by a CSRF token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionClaims {
    /// Session the token was issued for
    #[serde(default)]
    pub sid: String,

    /// Expiration (Unix timestamp), only present when a TTL is configured
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exp: Option<i64>,
}

/// Issues and verifies session-bound CSRF tokens.
///
/// A token is a JWT whose `sid` claim names the session it was issued for.
/// Without a TTL the token for a given session and key is always the same.
#[derive(Debug, Clone)]
pub struct CsrfTokenService {
    signer: JwtService,
    ttl: Option<Duration>,
}

impl CsrfTokenService {
    /// Create a service signing with `config`.
    pub fn new(config: JwtConfig) -> Self {
        Self {
            signer: JwtService::new(config),
            ttl: None,
        }
    }

    /// Create a service from base64-encoded key material.
    pub fn from_base64_secret(secret: &str) -> Result<Self> {
        Ok(Self::new(JwtConfig::from_base64(secret)?))
    }

    /// Expire tokens `ttl` after issuance.
    ///
    /// Fails if `ttl` in whole seconds does not fit an `i64` timestamp.
    pub fn with_ttl(self, ttl: Duration) -> Result<Self> {
        if i64::try_from(ttl.as_secs()).is_err() {
            return Err(CsrfError::config(format!(
                "Token TTL of {} seconds is out of range",
                ttl.as_secs()
            )));
        }

        let config = self.signer.config().clone().with_validate_exp(true);
        Ok(Self {
            signer: JwtService::new(config),
            ttl: Some(ttl),
        })
    }

    /// Configured token lifetime.
    pub fn ttl(&self) -> Option<Duration> {
        self.ttl
    }

    /// Issue a token bound to `session_id`.
    pub fn issue(&self, session_id: &str) -> Result<String> {
        let claims = SessionClaims {
            sid: session_id.to_string(),
            exp: self.ttl.map(|ttl| {
                let secs = i64::try_from(ttl.as_secs()).unwrap_or(i64::MAX);
                Utc::now().timestamp().saturating_add(secs)
            }),
        };

        self.signer
            .sign(&claims)
            .map_err(CsrfError::GenerationFailed)
    }

    /// Check a presented token against the current session.
    pub fn validate(&self, session_id: &str, presented: Option<&str>) -> Result<SessionClaims> {
        let token = match presented {
            Some(token) if !token.is_empty() => token,
            _ => return Err(CsrfError::MissingToken),
        };

        let claims: SessionClaims = self.signer.verify(token).map_err(CsrfError::InvalidToken)?;

        if claims.sid != session_id {
            return Err(CsrfError::SessionMismatch);
        }

        Ok(claims)
    }

    /// Whether `presented` is a valid token for `session_id`.
    pub fn verify(&self, session_id: &str, presented: Option<&str>) -> bool {
        self.validate(session_id, presented).is_ok()
    }
}
