//! Error types
//!
//! Defines domain-specific error types for each module of the backend.
//! No variant ever carries a plaintext secret, salt or hash.

use std::io;

use thiserror::Error;

use crate::auth::IdentityId;

/// Authentication module errors
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Identity already registered: {0}")]
    DuplicateIdentity(String),

    #[error("No identity registered for: {0}")]
    UnknownIdentity(String),

    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Stored secret for identity {id} is malformed")]
    MalformedStoredSecret { id: IdentityId },

    #[error("Key derivation failed: {0}")]
    Hashing(String),

    #[error(transparent)]
    Directory(#[from] DirectoryError),
}

/// User directory errors
#[derive(Debug, Error)]
pub enum DirectoryError {
    /// The directory refused a write because the identity key already exists
    #[error("Identity key conflict: {0}")]
    Conflict(String),

    #[error("User directory unavailable: {0}")]
    Unavailable(String),
}

/// Message repository errors
#[derive(Debug, Error)]
pub enum MessageError {
    #[error("Message store I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("Message store is corrupt: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// General application error that encompasses all error types
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Authentication error: {0}")]
    Auth(#[from] AuthError),

    #[error("Message error: {0}")]
    Message(#[from] MessageError),

    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

impl From<DirectoryError> for AppError {
    fn from(error: DirectoryError) -> Self {
        AppError::Auth(AuthError::Directory(error))
    }
}
