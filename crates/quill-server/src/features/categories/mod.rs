//! Categories feature
//!
//! Owner-scoped note categories. Deleting a category detaches the owner's
//! notes from it instead of deleting them.

pub mod commands;
pub mod queries;
pub mod routes;

pub use routes::categories_routes;
