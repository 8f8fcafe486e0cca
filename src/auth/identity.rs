//! Identity records
//!
//! Defines the account record returned by signup and signin.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Opaque identifier assigned by a user directory on creation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct IdentityId(pub u64);

impl fmt::Display for IdentityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One registered account.
///
/// `stored_secret` holds `salt.hash` and is skipped when the identity is
/// serialized or debug-printed.
#[derive(Clone, PartialEq, Eq, Serialize)]
pub struct Identity {
    pub id: IdentityId,
    #[serde(rename = "email")]
    pub identity_key: String,
    #[serde(skip_serializing)]
    pub stored_secret: String,
}

impl Identity {
    pub fn new(id: IdentityId, identity_key: &str, stored_secret: &str) -> Self {
        Self {
            id,
            identity_key: identity_key.to_string(),
            stored_secret: stored_secret.to_string(),
        }
    }
}

impl fmt::Debug for Identity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Identity")
            .field("id", &self.id)
            .field("identity_key", &self.identity_key)
            .field("stored_secret", &"<redacted>")
            .finish()
    }
}
