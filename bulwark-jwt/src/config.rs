// JWT configuration

use crate::{JwtError, Result};
use base64::{Engine, engine::general_purpose::STANDARD};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Validation};
use rand::RngCore;

/// Minimum HMAC key length in bytes (256 bits).
pub const MIN_SECRET_LEN: usize = 32;

/// JWT configuration for HMAC-signed tokens.
///
/// The secret never appears in `Debug` output.
#[derive(Clone)]
pub struct JwtConfig {
    secret: Vec<u8>,

    /// Algorithm used to sign and the only one accepted when verifying
    pub algorithm: Algorithm,

    /// Require and validate the `exp` claim
    pub validate_exp: bool,

    /// Leeway for time validation (seconds)
    pub leeway: u64,
}

impl JwtConfig {
    /// Create a configuration from raw key bytes.
    ///
    /// The algorithm is picked from the key length: HS256 for 32..48 bytes,
    /// HS384 for 48..64 and HS512 from 64 bytes up.
    pub fn hmac(secret: impl Into<Vec<u8>>) -> Result<Self> {
        let secret = secret.into();
        let algorithm = algorithm_for_key_len(secret.len())?;

        Ok(Self {
            secret,
            algorithm,
            validate_exp: false,
            leeway: 0,
        })
    }

    /// Create a configuration from base64-encoded key material.
    pub fn from_base64(encoded: &str) -> Result<Self> {
        let secret = STANDARD.decode(encoded.trim())?;
        Self::hmac(secret)
    }

    /// Generate a random key of [`MIN_SECRET_LEN`] bytes.
    pub fn generate_secret() -> Vec<u8> {
        let mut secret = vec![0u8; MIN_SECRET_LEN];
        rand::thread_rng().fill_bytes(&mut secret);
        secret
    }

    /// Generate a random key, base64-encoded.
    pub fn generate_base64_secret() -> String {
        STANDARD.encode(Self::generate_secret())
    }

    /// Override the algorithm.
    ///
    /// Only HMAC algorithms are accepted, and the key must be at least as
    /// long as the digest.
    pub fn with_algorithm(mut self, algorithm: Algorithm) -> Result<Self> {
        let required = match algorithm {
            Algorithm::HS256 => 32,
            Algorithm::HS384 => 48,
            Algorithm::HS512 => 64,
            other => {
                return Err(JwtError::ConfigError(format!(
                    "Unsupported algorithm {:?}, only HMAC is available",
                    other
                )));
            }
        };

        if self.secret.len() < required {
            return Err(JwtError::KeyTooShort {
                len: self.secret.len(),
                required,
            });
        }

        self.algorithm = algorithm;
        Ok(self)
    }

    /// Require tokens to carry a valid `exp` claim
    pub fn with_validate_exp(mut self, validate: bool) -> Self {
        self.validate_exp = validate;
        self
    }

    /// Set leeway
    pub fn with_leeway(mut self, leeway: u64) -> Self {
        self.leeway = leeway;
        self
    }

    /// Key length in bytes.
    pub fn secret_len(&self) -> usize {
        self.secret.len()
    }

    /// Get encoding key
    pub fn encoding_key(&self) -> EncodingKey {
        EncodingKey::from_secret(&self.secret)
    }

    /// Get decoding key
    pub fn decoding_key(&self) -> DecodingKey {
        DecodingKey::from_secret(&self.secret)
    }

    /// Get validation config
    pub fn validation(&self) -> Validation {
        let mut validation = Validation::new(self.algorithm);
        validation.validate_exp = self.validate_exp;
        validation.leeway = self.leeway;
        validation.validate_aud = false;

        if !self.validate_exp {
            validation.required_spec_claims.clear();
        }

        validation
    }
}

impl std::fmt::Debug for JwtConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtConfig")
            .field("secret", &"<redacted>")
            .field("algorithm", &self.algorithm)
            .field("validate_exp", &self.validate_exp)
            .field("leeway", &self.leeway)
            .finish()
    }
}

fn algorithm_for_key_len(len: usize) -> Result<Algorithm> {
    match len {
        0..MIN_SECRET_LEN => Err(JwtError::KeyTooShort {
            len,
            required: MIN_SECRET_LEN,
        }),
        32..48 => Ok(Algorithm::HS256),
        48..64 => Ok(Algorithm::HS384),
        _ => Ok(Algorithm::HS512),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_algorithm_from_key_length() {
        assert_eq!(JwtConfig::hmac(vec![7u8; 32]).unwrap().algorithm, Algorithm::HS256);
        assert_eq!(JwtConfig::hmac(vec![7u8; 48]).unwrap().algorithm, Algorithm::HS384);
        assert_eq!(JwtConfig::hmac(vec![7u8; 100]).unwrap().algorithm, Algorithm::HS512);
    }

    #[test]
    fn test_short_key_rejected() {
        let err = JwtConfig::hmac(vec![1, 2, 3]).unwrap_err();
        assert!(matches!(err, JwtError::KeyTooShort { len: 3, required: 32 }));
    }

    #[test]
    fn test_from_base64() {
        let config = JwtConfig::from_base64("UXOwbPd+P0u8YyBkQbuyXiv7UVc1JmMS061HUuaDRms=").unwrap();
        assert_eq!(config.secret_len(), 32);
        assert_eq!(config.algorithm, Algorithm::HS256);

        assert!(matches!(
            JwtConfig::from_base64("not base64!"),
            Err(JwtError::InvalidKeyEncoding(_))
        ));
    }

    #[test]
    fn test_with_algorithm() {
        let config = JwtConfig::hmac(vec![9u8; 64]).unwrap();
        let config = config.with_algorithm(Algorithm::HS256).unwrap();
        assert_eq!(config.algorithm, Algorithm::HS256);

        let short = JwtConfig::hmac(vec![9u8; 32]).unwrap();
        assert!(short.clone().with_algorithm(Algorithm::HS512).is_err());
        assert!(short.with_algorithm(Algorithm::RS256).is_err());
    }

    #[test]
    fn test_generated_secret_is_usable() {
        let encoded = JwtConfig::generate_base64_secret();
        assert_ne!(encoded, JwtConfig::generate_base64_secret());
        assert!(JwtConfig::from_base64(&encoded).is_ok());
    }

    #[test]
    fn test_debug_redacts_secret() {
        let config = JwtConfig::hmac(b"super_secret_key_material_32byte".to_vec()).unwrap();
        let debug = format!("{:?}", config);
        assert!(debug.contains("<redacted>"));
        assert!(!debug.contains("super_secret"));
    }

    #[test]
    fn test_validation_without_exp() {
        let validation = JwtConfig::hmac(vec![1u8; 32]).unwrap().validation();
        assert!(!validation.validate_exp);
        assert!(validation.required_spec_claims.is_empty());

        let validation = JwtConfig::hmac(vec![1u8; 32])
            .unwrap()
            .with_validate_exp(true)
            .validation();
        assert!(validation.validate_exp);
        assert!(validation.required_spec_claims.contains("exp"));
    }
}
