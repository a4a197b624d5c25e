// HMAC-signed JWT support for Bulwark
//
// Bulwark treats signing as a black box: `sign(claims) -> token` and
// `verify(token) -> claims`. This crate is that box.

pub mod config;
pub mod error;
pub mod service;

pub use config::{JwtConfig, MIN_SECRET_LEN};
pub use error::{JwtError, Result};
pub use service::JwtService;

// Re-export jsonwebtoken types
pub use jsonwebtoken::Algorithm;
