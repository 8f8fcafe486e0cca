//! Authentication system
//!
//! Handles identity signup, signin, and salted secret hashing.

pub mod authenticator;
pub mod directory;
pub mod hashing;
pub mod identity;

pub use authenticator::CredentialAuthenticator;
pub use directory::{DynUserDirectory, InMemoryUserDirectory, UserDirectory};
pub use hashing::{SALT_SEPARATOR, SecretHasher};
pub use identity::{Identity, IdentityId};
