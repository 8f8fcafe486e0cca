//! Error handlers
//!
//! Provides error logging and response code mapping.

use crate::error::types::{AppError, AuthError};
use log::error;

/// Response codes shared by the console session
pub mod codes {
    pub const OK: u16 = 200;
    pub const CREATED: u16 = 201;
    pub const GOODBYE: u16 = 221;
    pub const UNAUTHORIZED: u16 = 401;
    pub const NOT_FOUND: u16 = 404;
    pub const CONFLICT: u16 = 409;
    pub const INTERNAL: u16 = 500;
    pub const BAD_SYNTAX: u16 = 500;
    pub const MALFORMED: u16 = 501;
}

/// Log an application error
pub fn handle_error(err: &AppError) {
    error!("Backend error: {}", err);
}

/// Whether an error is an infrastructure failure rather than a client mistake
pub fn is_internal(err: &AppError) -> bool {
    match err {
        AppError::Auth(auth) => !matches!(
            auth,
            AuthError::DuplicateIdentity(_)
                | AuthError::UnknownIdentity(_)
                | AuthError::InvalidCredentials
        ),
        AppError::Message(_) | AppError::Config(_) | AppError::Io(_) => true,
    }
}

/// Convert an error to its response code
pub fn error_to_status_code(err: &AppError) -> u16 {
    match err {
        AppError::Auth(auth) => auth_error_to_status_code(auth),
        AppError::Message(_) => codes::INTERNAL,
        AppError::Config(_) => codes::INTERNAL,
        AppError::Io(_) => codes::INTERNAL,
    }
}

fn auth_error_to_status_code(err: &AuthError) -> u16 {
    match err {
        AuthError::DuplicateIdentity(_) => codes::CONFLICT,
        AuthError::UnknownIdentity(_) => codes::NOT_FOUND,
        AuthError::InvalidCredentials => codes::UNAUTHORIZED,
        AuthError::MalformedStoredSecret { .. } => codes::INTERNAL,
        AuthError::Hashing(_) => codes::INTERNAL,
        AuthError::Directory(_) => codes::INTERNAL,
    }
}
