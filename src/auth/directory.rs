//! User directory
//!
//! The storage capability the authenticator depends on, plus an in-memory
//! implementation backed by an ordered list of identities.

use async_trait::async_trait;
use log::debug;
use std::sync::Arc;
use tokio::sync::Mutex;

use crate::auth::identity::{Identity, IdentityId};
use crate::error::DirectoryError;

/// Lookup and creation of identities
#[async_trait]
pub trait UserDirectory: Send + Sync {
    /// All identities registered under `identity_key` (empty when none)
    async fn find(&self, identity_key: &str) -> Result<Vec<Identity>, DirectoryError>;

    /// Persist a new identity and return it with its assigned id
    async fn create(
        &self,
        identity_key: &str,
        stored_secret: &str,
    ) -> Result<Identity, DirectoryError>;
}

pub type DynUserDirectory = Arc<dyn UserDirectory>;

/// In-memory directory.
///
/// Ids are assigned sequentially from 1. `create` refuses a key that is
/// already present, checked under the same lock as the insert.
#[derive(Debug, Default)]
pub struct InMemoryUserDirectory {
    identities: Mutex<Vec<Identity>>,
}

impl InMemoryUserDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.identities.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.identities.lock().await.is_empty()
    }
}

#[async_trait]
impl UserDirectory for InMemoryUserDirectory {
    async fn find(&self, identity_key: &str) -> Result<Vec<Identity>, DirectoryError> {
        let identities = self.identities.lock().await;
        Ok(identities
            .iter()
            .filter(|identity| identity.identity_key == identity_key)
            .cloned()
            .collect())
    }

    async fn create(
        &self,
        identity_key: &str,
        stored_secret: &str,
    ) -> Result<Identity, DirectoryError> {
        let mut identities = self.identities.lock().await;

        if identities
            .iter()
            .any(|identity| identity.identity_key == identity_key)
        {
            return Err(DirectoryError::Conflict(identity_key.to_string()));
        }

        let id = IdentityId(identities.len() as u64 + 1);
        let identity = Identity::new(id, identity_key, stored_secret);
        identities.push(identity.clone());
        debug!("Directory stored identity {} ({})", id, identity_key);

        Ok(identity)
    }
}
