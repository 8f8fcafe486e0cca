//! Console front end
//!
//! A line-oriented command session over stdin/stdout that drives the
//! authentication and messages services.

pub mod commands;
pub mod handler;
pub mod responses;
pub mod session;

pub use commands::{Command, parse_command};
pub use handler::{CommandResult, CommandStatus, Services, handle_command};
pub use session::run_session;
