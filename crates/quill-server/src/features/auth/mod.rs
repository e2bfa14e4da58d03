//! Accounts feature
//!
//! Registration and login. Login is the only place bearer tokens are
//! issued; everything else consumes them through the auth middleware.

pub mod commands;
pub mod routes;

pub use routes::{auth_routes, AuthState};
