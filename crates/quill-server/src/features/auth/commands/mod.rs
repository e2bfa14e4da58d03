//! Account write operations

pub mod login;
pub mod register;
