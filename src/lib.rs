// Bulwark - session-bound CSRF protection for Rust web servers
//
// This library bundles the CSRF middleware with the JWT signing service it
// builds on and an environment-driven logging setup.

// Re-export the CSRF middleware
pub use bulwark_csrf::*;

// Re-export member crates
pub use bulwark_csrf;
pub use bulwark_jwt;

#[cfg(feature = "log")]
pub use bulwark_log;

// Prelude for common imports
pub mod prelude {
    pub use crate::{
        CsrfConfig,
        CsrfError,
        CsrfMiddleware,
        CsrfOutcome,
        CsrfRejection,
        CsrfRequest,
        CsrfSettings,
        ExclusionMatcher,
        PathTrie,
        RequestContext,
    };
}
