//! Quill Common Library
//!
//! Shared utilities for the Quill workspace:
//!
//! - **Error Handling**: common error type and result alias
//! - **Logging**: tracing subscriber configuration and initialization
//!
//! # Example
//!
//! ```no_run
//! use quill_common::logging::{init_logging, LogConfig};
//!
//! fn main() -> quill_common::Result<()> {
//!     let config = LogConfig::from_env()?;
//!     init_logging(&config)?;
//!     Ok(())
//! }
//! ```

pub mod error;
pub mod logging;

pub use error::{CommonError, Result};
