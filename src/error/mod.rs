//! Error handling
//!
//! Defines error types and handling for the backend.

pub mod handlers;
pub mod types;

pub use types::*;
