//! Request interface consumed by the CSRF middleware
//!
//! Host frameworks implement [`CsrfRequest`] for their own request type.
//! [`RequestContext`] is an owned implementation for hosts that do not have
//! one, and for tests.

use http::Method;
use std::collections::HashMap;

/// What the middleware needs from an incoming request.
pub trait CsrfRequest {
    /// HTTP method.
    fn method(&self) -> &Method;

    /// Request path, possibly with a query string.
    ///
    /// Matched against exclusions as given, so hosts must pass a normalised
    /// path without `.` or `..` segments.
    fn path(&self) -> &str;

    /// Stable identifier of the current session, `None` without a session.
    fn session_id(&self) -> Option<&str>;

    /// Header value by exact name.
    fn header(&self, name: &str) -> Option<&str>;

    /// Store a request-scoped attribute (read by templates and handlers).
    fn set_attribute(&mut self, name: &str, value: String);

    /// Client address, for logging.
    fn remote_addr(&self) -> Option<&str> {
        None
    }

    /// Client user agent, for logging.
    fn user_agent(&self) -> Option<&str> {
        self.header("User-Agent")
    }
}

/// Owned request data implementing [`CsrfRequest`].
#[derive(Debug, Clone)]
pub struct RequestContext {
    /// Request method
    pub method: Method,
    /// Request path
    pub path: String,
    /// Session identifier, if the request has a session
    pub session_id: Option<String>,
    /// Headers in arrival order
    pub headers: Vec<(String, String)>,
    /// Client address
    pub remote_addr: Option<String>,
    /// Request-scoped attributes
    pub attributes: HashMap<String, String>,
}

impl RequestContext {
    /// Create a new request context
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            session_id: None,
            headers: Vec::new(),
            remote_addr: None,
            attributes: HashMap::new(),
        }
    }

    /// Attach a session
    pub fn with_session(mut self, session_id: impl Into<String>) -> Self {
        self.session_id = Some(session_id.into());
        self
    }

    /// Add a header
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    /// Set the client address
    pub fn with_remote_addr(mut self, addr: impl Into<String>) -> Self {
        self.remote_addr = Some(addr.into());
        self
    }

    /// Read back an attribute
    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes.get(name).map(String::as_str)
    }
}

impl CsrfRequest for RequestContext {
    fn method(&self) -> &Method {
        &self.method
    }

    fn path(&self) -> &str {
        &self.path
    }

    fn session_id(&self) -> Option<&str> {
        self.session_id.as_deref()
    }

    fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }

    fn set_attribute(&mut self, name: &str, value: String) {
        self.attributes.insert(name.to_string(), value);
    }

    fn remote_addr(&self) -> Option<&str> {
        self.remote_addr.as_deref()
    }
}
