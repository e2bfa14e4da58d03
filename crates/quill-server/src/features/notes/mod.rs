//! Notes feature
//!
//! Owner-scoped CRUD over notes. Updates and listings go through the
//! dynamic statement builder in [`crate::db::statement`]; every statement
//! carries the owner predicate, and a missing row is indistinguishable from
//! someone else's row.

pub mod commands;
pub mod queries;
pub mod routes;
pub mod types;

pub use routes::notes_routes;
