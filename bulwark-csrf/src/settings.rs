//! Loadable CSRF settings
//!
//! [`CsrfSettings`] is the serializable form of [`CsrfConfig`](crate::CsrfConfig),
//! read from TOML or from `BULWARK_CSRF_*` environment variables:
//!
//! ```toml
//! enabled = true
//! header_key_name = "X-Csrf-Token"
//! secret = "UXOwbPd+P0u8YyBkQbuyXiv7UVc1JmMS061HUuaDRms="
//! verify_methods = ["POST", "PUT", "DELETE"]
//! exclusions = ["/notify/**", "/upload/**"]
//! ```

use crate::config::{
    DEFAULT_ATTR_KEY_NAME, DEFAULT_FORM_KEY_NAME, DEFAULT_HEADER_KEY_NAME, DEFAULT_SECRET,
};
use crate::error::{CsrfError, Result};
use serde::{Deserialize, Serialize};
use std::env;

/// Prefix of the environment variables read by [`CsrfSettings::from_env`].
pub const ENV_PREFIX: &str = "BULWARK_CSRF_";

/// Serializable CSRF settings. Every field has a default.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CsrfSettings {
    /// Whether protection is active
    pub enabled: bool,
    /// Attribute name the issued token is stored under
    pub attr_key_name: String,
    /// Header name carrying the token
    pub header_key_name: String,
    /// Form field name for the token
    pub form_key_name: String,
    /// Base64-encoded signing key
    pub secret: String,
    /// Methods that must present a valid token
    pub verify_methods: Vec<String>,
    /// Path patterns exempt from protection
    pub exclusions: Vec<String>,
    /// Token lifetime in seconds, unlimited when absent
    pub token_ttl_secs: Option<u64>,
}

impl Default for CsrfSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            attr_key_name: DEFAULT_ATTR_KEY_NAME.to_string(),
            header_key_name: DEFAULT_HEADER_KEY_NAME.to_string(),
            form_key_name: DEFAULT_FORM_KEY_NAME.to_string(),
            secret: DEFAULT_SECRET.to_string(),
            verify_methods: vec!["POST".to_string(), "PUT".to_string(), "DELETE".to_string()],
            exclusions: Vec::new(),
            token_ttl_secs: None,
        }
    }
}

impl CsrfSettings {
    /// Parse settings from a TOML document.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Read settings from `BULWARK_CSRF_*` environment variables.
    pub fn from_env() -> Result<Self> {
        Self::from_vars(env::vars())
    }

    /// Read settings from explicit `(name, value)` pairs.
    ///
    /// Recognised names: `BULWARK_CSRF_ENABLED`, `..._ATTR_KEY_NAME`,
    /// `..._HEADER_KEY_NAME`, `..._FORM_KEY_NAME`, `..._SECRET`,
    /// `..._VERIFY_METHODS` and `..._EXCLUSIONS` (comma separated), and
    /// `..._TOKEN_TTL_SECS`. Other names are ignored.
    pub fn from_vars<I, K, V>(vars: I) -> Result<Self>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let mut settings = Self::default();

        for (key, value) in vars {
            let Some(name) = key.as_ref().strip_prefix(ENV_PREFIX) else {
                continue;
            };
            let value = value.as_ref().trim();

            match name {
                "ENABLED" => settings.enabled = parse_bool(name, value)?,
                "ATTR_KEY_NAME" => settings.attr_key_name = value.to_string(),
                "HEADER_KEY_NAME" => settings.header_key_name = value.to_string(),
                "FORM_KEY_NAME" => settings.form_key_name = value.to_string(),
                "SECRET" => settings.secret = value.to_string(),
                "VERIFY_METHODS" => settings.verify_methods = split_list(value),
                "EXCLUSIONS" => settings.exclusions = split_list(value),
                "TOKEN_TTL_SECS" => {
                    let secs = value.parse().map_err(|_| {
                        CsrfError::config(format!("{}{} must be a number", ENV_PREFIX, name))
                    })?;
                    settings.token_ttl_secs = Some(secs);
                }
                _ => {}
            }
        }

        Ok(settings)
    }
}

fn parse_bool(name: &str, value: &str) -> Result<bool> {
    match value.to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(CsrfError::config(format!(
            "{}{} must be a boolean, got {:?}",
            ENV_PREFIX, name, value
        ))),
    }
}

fn split_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_toml_defaults() {
        let settings = CsrfSettings::from_toml_str("").unwrap();
        assert_eq!(settings, CsrfSettings::default());
    }

    #[test]
    fn test_toml_overrides() {
        let settings = CsrfSettings::from_toml_str(
            r#"
            enabled = false
            header_key_name = "X-XSRF-TOKEN"
            verify_methods = ["POST"]
            exclusions = ["/notify/**", "/upload/**"]
            token_ttl_secs = 3600
            "#,
        )
        .unwrap();

        assert!(!settings.enabled);
        assert_eq!(settings.header_key_name, "X-XSRF-TOKEN");
        assert_eq!(settings.attr_key_name, "_csrf_token");
        assert_eq!(settings.verify_methods, vec!["POST"]);
        assert_eq!(settings.exclusions.len(), 2);
        assert_eq!(settings.token_ttl_secs, Some(3600));
    }

    #[test]
    fn test_toml_type_error() {
        let result = CsrfSettings::from_toml_str("enabled = \"maybe\"");
        assert!(matches!(result, Err(CsrfError::Settings(_))));
    }

    #[test]
    fn test_from_vars() {
        let settings = CsrfSettings::from_vars([
            ("BULWARK_CSRF_ENABLED", "false"),
            ("BULWARK_CSRF_VERIFY_METHODS", "POST, PATCH,"),
            ("BULWARK_CSRF_EXCLUSIONS", "/notify/**,/upload/**"),
            ("BULWARK_CSRF_TOKEN_TTL_SECS", "90"),
            ("PATH", "/usr/bin"),
        ])
        .unwrap();

        assert!(!settings.enabled);
        assert_eq!(settings.verify_methods, vec!["POST", "PATCH"]);
        assert_eq!(settings.exclusions, vec!["/notify/**", "/upload/**"]);
        assert_eq!(settings.token_ttl_secs, Some(90));
        assert_eq!(settings.secret, DEFAULT_SECRET);
    }

    #[test]
    fn test_from_vars_errors() {
        assert!(CsrfSettings::from_vars([("BULWARK_CSRF_ENABLED", "maybe")]).is_err());
        assert!(CsrfSettings::from_vars([("BULWARK_CSRF_TOKEN_TTL_SECS", "soon")]).is_err());
    }
}
