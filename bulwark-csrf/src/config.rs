use crate::error::{CsrfError, Result};
use crate::exclusion::ExclusionMatcher;
use crate::request::CsrfRequest;
use crate::settings::CsrfSettings;
use crate::token::CsrfTokenService;
use bulwark_jwt::JwtConfig;
use http::Method;
use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;

/// Default attribute name the issued token is stored under.
pub const DEFAULT_ATTR_KEY_NAME: &str = "_csrf_token";

/// Default header carrying the token.
pub const DEFAULT_HEADER_KEY_NAME: &str = "X-Csrf-Token";

/// Default form field name.
pub const DEFAULT_FORM_KEY_NAME: &str = "_csrf_token";

/// Default signing key (base64). Replace it in production.
pub const DEFAULT_SECRET: &str = "UXOwbPd+P0u8YyBkQbuyXiv7UVc1JmMS061HUuaDRms=";

/// Methods that must present a token unless configured otherwise.
pub fn default_verify_methods() -> HashSet<Method> {
    [Method::POST, Method::PUT, Method::DELETE].into_iter().collect()
}

/// Handler invoked when verification fails.
///
/// Receives the request and returns whether the pipeline should continue.
pub type RejectionHandler = Arc<dyn Fn(&mut dyn CsrfRequest) -> bool + Send + Sync>;

/// CSRF protection configuration
#[derive(Clone)]
pub struct CsrfConfig {
    /// Whether protection is active at all
    pub enabled: bool,

    /// Attribute name the issued token is stored under
    pub attr_key_name: String,

    /// Header name carrying the token
    pub header_key_name: String,

    /// Form field name for the token. Not read during verification.
    pub form_key_name: String,

    /// Methods that must present a valid token
    pub verify_methods: HashSet<Method>,

    /// Paths exempt from protection
    pub exclusions: Option<ExclusionMatcher>,

    /// Custom handling of failed verification
    pub rejection_handler: Option<RejectionHandler>,

    tokens: CsrfTokenService,
}

impl CsrfConfig {
    /// Create a configuration signing with a base64-encoded secret.
    ///
    /// Fails if the secret is not valid base64 or decodes to fewer than 32
    /// bytes.
    pub fn new(secret: &str) -> Result<Self> {
        Ok(Self::with_tokens(CsrfTokenService::from_base64_secret(secret)?))
    }

    fn with_tokens(tokens: CsrfTokenService) -> Self {
        Self {
            enabled: true,
            attr_key_name: DEFAULT_ATTR_KEY_NAME.to_string(),
            header_key_name: DEFAULT_HEADER_KEY_NAME.to_string(),
            form_key_name: DEFAULT_FORM_KEY_NAME.to_string(),
            verify_methods: default_verify_methods(),
            exclusions: None,
            rejection_handler: None,
            tokens,
        }
    }

    /// Build a configuration from loaded settings.
    pub fn from_settings(settings: &CsrfSettings) -> Result<Self> {
        let verify_methods = settings
            .verify_methods
            .iter()
            .map(|m| {
                Method::from_bytes(m.trim().to_uppercase().as_bytes())
                    .map_err(|_| CsrfError::config(format!("Invalid HTTP method: {:?}", m)))
            })
            .collect::<Result<HashSet<_>>>()?;

        let mut config = Self::new(&settings.secret)?
            .with_enabled(settings.enabled)
            .with_attr_key_name(&settings.attr_key_name)
            .with_header_key_name(&settings.header_key_name)
            .with_form_key_name(&settings.form_key_name)
            .with_verify_methods(verify_methods)
            .with_exclusions(&settings.exclusions);

        if let Some(secs) = settings.token_ttl_secs {
            config = config.with_token_ttl(Duration::from_secs(secs))?;
        }

        Ok(config)
    }

    /// Generate a random base64-encoded secret
    pub fn generate_secret() -> String {
        JwtConfig::generate_base64_secret()
    }

    /// Enable or disable protection
    pub fn with_enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    /// Set attribute name
    pub fn with_attr_key_name(mut self, name: impl Into<String>) -> Self {
        self.attr_key_name = name.into();
        self
    }

    /// Set header name
    pub fn with_header_key_name(mut self, name: impl Into<String>) -> Self {
        self.header_key_name = name.into();
        self
    }

    /// Set form field name
    pub fn with_form_key_name(mut self, name: impl Into<String>) -> Self {
        self.form_key_name = name.into();
        self
    }

    /// Replace the verified methods
    pub fn with_verify_methods(mut self, methods: impl IntoIterator<Item = Method>) -> Self {
        self.verify_methods = methods.into_iter().collect();
        self
    }

    /// Exclude a path pattern
    pub fn exclude(mut self, pattern: &str) -> Self {
        self.exclusions
            .get_or_insert_with(ExclusionMatcher::new)
            .add_exclusion(pattern);
        self
    }

    /// Exclude several path patterns
    pub fn with_exclusions<S: AsRef<str>>(mut self, patterns: impl IntoIterator<Item = S>) -> Self {
        let mut patterns = patterns.into_iter().peekable();
        if patterns.peek().is_some() {
            self.exclusions
                .get_or_insert_with(ExclusionMatcher::new)
                .extend(patterns);
        }
        self
    }

    /// Set a custom rejection handler
    pub fn with_rejection_handler<F>(mut self, handler: F) -> Self
    where
        F: Fn(&mut dyn CsrfRequest) -> bool + Send + Sync + 'static,
    {
        self.rejection_handler = Some(Arc::new(handler));
        self
    }

    /// Expire tokens `ttl` after issuance
    ///
    /// Fails if `ttl` does not fit a Unix timestamp.
    pub fn with_token_ttl(mut self, ttl: Duration) -> Result<Self> {
        self.tokens = self.tokens.with_ttl(ttl)?;
        Ok(self)
    }

    /// Whether `url` is excluded from protection
    pub fn is_excluded(&self, url: &str) -> bool {
        self.exclusions
            .as_ref()
            .is_some_and(|matcher| matcher.is_excluded(url))
    }

    /// Token issuing and verification
    pub fn tokens(&self) -> &CsrfTokenService {
        &self.tokens
    }
}

impl Default for CsrfConfig {
    fn default() -> Self {
        match CsrfTokenService::from_base64_secret(DEFAULT_SECRET) {
            Ok(tokens) => Self::with_tokens(tokens),
            Err(e) => unreachable!("default secret is valid: {}", e),
        }
    }
}

impl std::fmt::Debug for CsrfConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CsrfConfig")
            .field("enabled", &self.enabled)
            .field("attr_key_name", &self.attr_key_name)
            .field("header_key_name", &self.header_key_name)
            .field("form_key_name", &self.form_key_name)
            .field("verify_methods", &self.verify_methods)
            .field("exclusions", &self.exclusions)
            .field("rejection_handler", &self.rejection_handler.is_some())
            .field("tokens", &self.tokens)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = CsrfConfig::default();
        assert!(config.enabled);
        assert_eq!(config.attr_key_name, "_csrf_token");
        assert_eq!(config.header_key_name, "X-Csrf-Token");
        assert_eq!(config.form_key_name, "_csrf_token");
        assert_eq!(config.verify_methods, default_verify_methods());
        assert!(config.exclusions.is_none());
        assert!(config.rejection_handler.is_none());
        assert!(config.tokens().ttl().is_none());
    }

    #[test]
    fn test_builder() {
        let config = CsrfConfig::new(&CsrfConfig::generate_secret())
            .unwrap()
            .with_enabled(false)
            .with_attr_key_name("csrf")
            .with_header_key_name("X-XSRF-TOKEN")
            .with_verify_methods([Method::POST, Method::PATCH])
            .exclude("/notify/**")
            .with_token_ttl(Duration::from_secs(60))
            .unwrap();

        assert!(!config.enabled);
        assert_eq!(config.attr_key_name, "csrf");
        assert_eq!(config.header_key_name, "X-XSRF-TOKEN");
        assert!(config.verify_methods.contains(&Method::PATCH));
        assert!(!config.verify_methods.contains(&Method::DELETE));
        assert!(config.is_excluded("/notify/github"));
        assert_eq!(config.tokens().ttl(), Some(Duration::from_secs(60)));
    }

    #[test]
    fn test_invalid_secret() {
        assert!(matches!(CsrfConfig::new("!!!"), Err(CsrfError::Config(_))));
        assert!(matches!(CsrfConfig::new("c2hvcnQ="), Err(CsrfError::Config(_))));
    }

    #[test]
    fn test_no_exclusions() {
        let config = CsrfConfig::default().with_exclusions(Vec::<String>::new());
        assert!(config.exclusions.is_none());
        assert!(!config.is_excluded("/"));
    }

    #[test]
    fn test_debug_hides_secret() {
        let config = CsrfConfig::default().with_rejection_handler(|_| false);
        let debug = format!("{:?}", config);
        assert!(debug.contains("rejection_handler: true"));
        assert!(!debug.contains(DEFAULT_SECRET));
    }

    #[test]
    fn test_from_settings() {
        let settings = CsrfSettings {
            verify_methods: vec!["post".to_string(), " PATCH ".to_string()],
            exclusions: vec!["/upload/**".to_string()],
            token_ttl_secs: Some(120),
            ..CsrfSettings::default()
        };

        let config = CsrfConfig::from_settings(&settings).unwrap();
        assert_eq!(
            config.verify_methods,
            [Method::POST, Method::PATCH].into_iter().collect()
        );
        assert!(config.is_excluded("/upload/x"));
        assert_eq!(config.tokens().ttl(), Some(Duration::from_secs(120)));
    }

    #[test]
    fn test_from_settings_rejects_huge_ttl() {
        for secs in [u64::MAX, i64::MAX as u64 + 1] {
            let settings = CsrfSettings {
                token_ttl_secs: Some(secs),
                ..CsrfSettings::default()
            };
            assert!(matches!(
                CsrfConfig::from_settings(&settings),
                Err(CsrfError::Config(_))
            ));
        }
    }

    #[test]
    fn test_from_settings_rejects_bad_method() {
        let settings = CsrfSettings {
            verify_methods: vec!["PO ST".to_string()],
            ..CsrfSettings::default()
        };
        assert!(matches!(
            CsrfConfig::from_settings(&settings),
            Err(CsrfError::Config(_))
        ));
    }
}
