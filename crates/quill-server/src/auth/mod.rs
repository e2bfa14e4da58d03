//! Identity and authentication
//!
//! - [`token`]: signed, expiring identity token codec (HS256, config-injected
//!   secret)
//! - [`middleware`]: bearer extraction gating protected routes, injecting
//!   [`CurrentUser`] into request extensions
//! - [`password`]: argon2 password hashing for registration and login

pub mod middleware;
pub mod password;
pub mod token;

pub use middleware::{require_auth, AuthFailure, CurrentUser};
pub use token::{IdentityClaim, TokenCodec, TokenError};
