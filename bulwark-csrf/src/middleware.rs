//! Per-request CSRF decision
//!
//! [`CsrfMiddleware::check`] runs once per request, before the handler:
//!
//! 1. disabled, session-less and excluded requests pass untouched
//! 2. `GET` requests get a fresh token stored as a request attribute
//! 3. verified methods must present a valid token in the configured header
//! 4. every other method passes

use crate::config::CsrfConfig;
use crate::error::CsrfError;
use crate::request::CsrfRequest;
use http::{Method, StatusCode};
use serde::Serialize;
use std::sync::Arc;
use tracing::{debug, error, trace};

/// Default failure message.
pub const DEFAULT_REJECTION_MESSAGE: &str = "CSRF token mismatch";

/// CSRF protection middleware
#[derive(Clone, Debug)]
pub struct CsrfMiddleware {
    config: Arc<CsrfConfig>,
}

impl CsrfMiddleware {
    /// Create new CSRF middleware
    pub fn new(config: CsrfConfig) -> Self {
        Self {
            config: Arc::new(config),
        }
    }

    /// Decide what happens to `request`.
    pub fn check<R: CsrfRequest + ?Sized>(&self, request: &mut R) -> CsrfOutcome {
        if !self.config.enabled {
            return CsrfOutcome::Pass;
        }

        let Some(session_id) = request.session_id().map(str::to_string) else {
            return CsrfOutcome::Pass;
        };

        if self.config.is_excluded(request.path()) {
            debug!(path = %request.path(), "Path excluded from CSRF protection");
            return CsrfOutcome::Pass;
        }

        let method = request.method().clone();

        if method == Method::GET {
            return match self.config.tokens().issue(&session_id) {
                Ok(token) => {
                    trace!(path = %request.path(), "Issued CSRF token");
                    request.set_attribute(&self.config.attr_key_name, token.clone());
                    CsrfOutcome::IssueAndPass { token }
                }
                Err(e) => {
                    error!(error = %e, path = %request.path(), "CSRF token generation failed");
                    CsrfOutcome::Pass
                }
            };
        }

        if !self.config.verify_methods.contains(&method) {
            return CsrfOutcome::Pass;
        }

        let token = self.token_from_request(request);
        match self.config.tokens().validate(&session_id, token.as_deref()) {
            Ok(_) => CsrfOutcome::Pass,
            Err(e) => {
                self.report_failure(request, token.as_deref(), &e);
                self.reject(request)
            }
        }
    }

    /// Read the presented token: exact header name first, upper-cased second.
    pub fn token_from_request<R: CsrfRequest + ?Sized>(&self, request: &R) -> Option<String> {
        let name = &self.config.header_key_name;
        request
            .header(name)
            .filter(|value| !value.is_empty())
            .or_else(|| request.header(&name.to_uppercase()))
            .map(str::to_string)
    }

    /// Get the configuration
    pub fn config(&self) -> &CsrfConfig {
        &self.config
    }

    fn reject<R: CsrfRequest + ?Sized>(&self, request: &mut R) -> CsrfOutcome {
        match &self.config.rejection_handler {
            Some(handler) => {
                // `R` may itself be unsized, so wrap it before coercing to `dyn`
                if handler(&mut DynRequest(request)) {
                    CsrfOutcome::Pass
                } else {
                    CsrfOutcome::Reject { rejection: None }
                }
            }
            None => CsrfOutcome::Reject {
                rejection: Some(CsrfRejection::default()),
            },
        }
    }

    fn report_failure<R: CsrfRequest + ?Sized>(
        &self,
        request: &R,
        token: Option<&str>,
        err: &CsrfError,
    ) {
        error!(
            remote_addr = request.remote_addr().unwrap_or("-"),
            user_agent = request.user_agent().unwrap_or("-"),
            token = token.unwrap_or(""),
            method = %request.method(),
            path = %request.path(),
            error = %err,
            "CSRF token verification failed"
        );
    }
}

/// Adapter giving a possibly unsized request a `dyn CsrfRequest` face.
struct DynRequest<'a, R: CsrfRequest + ?Sized>(&'a mut R);

impl<R: CsrfRequest + ?Sized> CsrfRequest for DynRequest<'_, R> {
    fn method(&self) -> &Method {
        self.0.method()
    }

    fn path(&self) -> &str {
        self.0.path()
    }

    fn session_id(&self) -> Option<&str> {
        self.0.session_id()
    }

    fn header(&self, name: &str) -> Option<&str> {
        self.0.header(name)
    }

    fn set_attribute(&mut self, name: &str, value: String) {
        self.0.set_attribute(name, value)
    }

    fn remote_addr(&self) -> Option<&str> {
        self.0.remote_addr()
    }

    fn user_agent(&self) -> Option<&str> {
        self.0.user_agent()
    }
}

/// Result of the CSRF check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CsrfOutcome {
    /// Continue the pipeline
    Pass,
    /// A token was issued and stored; continue the pipeline
    IssueAndPass {
        /// The issued token
        token: String,
    },
    /// Stop the pipeline
    Reject {
        /// Default failure response, `None` when a custom handler took over
        rejection: Option<CsrfRejection>,
    },
}

impl CsrfOutcome {
    /// Whether the request should continue
    pub fn is_continue(&self) -> bool {
        !self.is_rejected()
    }

    /// Whether the request was rejected
    pub fn is_rejected(&self) -> bool {
        matches!(self, Self::Reject { .. })
    }

    /// The issued token, if any
    pub fn token(&self) -> Option<&str> {
        match self {
            Self::IssueAndPass { token } => Some(token),
            _ => None,
        }
    }

    /// The default failure response, if any
    pub fn rejection(&self) -> Option<&CsrfRejection> {
        match self {
            Self::Reject { rejection } => rejection.as_ref(),
            _ => None,
        }
    }
}

/// Default response for a failed check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CsrfRejection {
    /// Response status
    pub status: StatusCode,
    /// Response body
    pub body: RejectionBody,
}

/// JSON body of a rejected request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RejectionBody {
    /// Always `false`
    pub success: bool,
    /// Human-readable reason
    pub message: String,
}

impl CsrfRejection {
    /// Serialize the body to JSON
    pub fn body_json(&self) -> String {
        serde_json::to_string(&self.body).unwrap_or_else(|_| {
            format!(r#"{{"success":false,"message":"{}"}}"#, DEFAULT_REJECTION_MESSAGE)
        })
    }
}

impl Default for CsrfRejection {
    fn default() -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            body: RejectionBody {
                success: false,
                message: DEFAULT_REJECTION_MESSAGE.to_string(),
            },
        }
    }
}
