//! Request logs feature
//!
//! Public read-only view over the records written by the audit middleware.

pub mod queries;
pub mod routes;

pub use routes::logs_routes;
