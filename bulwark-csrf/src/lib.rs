//! # Bulwark CSRF Protection
//!
//! Session-bound Cross-Site Request Forgery (CSRF) protection.
//!
//! ## Features
//!
//! - ✅ **Session Binding** - Tokens are signed JWTs naming the session they belong to
//! - ✅ **Method Selection** - Only configured methods (POST, PUT, DELETE by default) are verified
//! - ✅ **Path Exclusion** - Trie-based patterns with `:param` and `**` segments
//! - ✅ **Custom Rejection** - Replace the default 400 response with your own handler
//! - ✅ **Loadable Settings** - TOML or `BULWARK_CSRF_*` environment variables
//!
//! ## Quick Start
//!
//! ```rust
//! use bulwark_csrf::{CsrfConfig, CsrfMiddleware, CsrfOutcome, RequestContext};
//! use http::Method;
//!
//! let config = CsrfConfig::new(&CsrfConfig::generate_secret())
//!     .unwrap()
//!     .exclude("/notify/**");
//! let csrf = CsrfMiddleware::new(config);
//!
//! // Rendering a form issues a token
//! let mut get = RequestContext::new(Method::GET, "/form").with_session("s1");
//! let token = csrf.check(&mut get).token().unwrap().to_string();
//! assert_eq!(get.attribute("_csrf_token"), Some(token.as_str()));
//!
//! // Submitting it back passes
//! let mut post = RequestContext::new(Method::POST, "/form")
//!     .with_session("s1")
//!     .with_header("X-Csrf-Token", token);
//! assert_eq!(csrf.check(&mut post), CsrfOutcome::Pass);
//!
//! // Without it the request is rejected
//! let mut forged = RequestContext::new(Method::POST, "/form").with_session("s1");
//! let outcome = csrf.check(&mut forged);
//! assert_eq!(outcome.rejection().unwrap().status.as_u16(), 400);
//!
//! // Excluded paths are never checked
//! let mut hook = RequestContext::new(Method::POST, "/notify/github").with_session("s1");
//! assert_eq!(csrf.check(&mut hook), CsrfOutcome::Pass);
//! ```
//!
//! ## Path Patterns
//!
//! ```rust
//! use bulwark_csrf::PathTrie;
//!
//! let mut trie = PathTrie::new();
//! trie.add_pattern("/users/:id/posts");
//! trie.add_pattern("/static/**");
//!
//! assert!(trie.matches("/users/42/posts"));
//! assert!(trie.matches("/static/css/site.css"));
//! assert!(!trie.matches("/users/42"));
//! ```
//!
//! ## Host Integration
//!
//! Implement [`CsrfRequest`] for the host framework's request type and call
//! [`CsrfMiddleware::check`] before dispatching to the handler:
//!
//! ```ignore
//! match csrf.check(&mut request) {
//!     CsrfOutcome::Pass | CsrfOutcome::IssueAndPass { .. } => next.run(request).await,
//!     CsrfOutcome::Reject { rejection: Some(r) } => json_response(r.status, r.body_json()),
//!     CsrfOutcome::Reject { rejection: None } => empty_response(),
//! }
//! ```

pub mod config;
pub mod error;
pub mod exclusion;
pub mod middleware;
pub mod request;
pub mod settings;
pub mod token;
pub mod trie;

pub use config::{
    CsrfConfig, DEFAULT_ATTR_KEY_NAME, DEFAULT_FORM_KEY_NAME, DEFAULT_HEADER_KEY_NAME,
    DEFAULT_SECRET, RejectionHandler,
};
pub use error::{CsrfError, Result};
pub use exclusion::ExclusionMatcher;
pub use middleware::{CsrfMiddleware, CsrfOutcome, CsrfRejection, RejectionBody};
pub use request::{CsrfRequest, RequestContext};
pub use settings::CsrfSettings;
pub use token::{CsrfTokenService, SessionClaims};
pub use trie::PathTrie;
