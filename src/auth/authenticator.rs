//! Credential authenticator
//!
//! Implements signup and signin against an injected user directory.
//! Secrets are salted and hashed before they reach the directory; the
//! plaintext never leaves these two calls.

use log::{info, warn};
use tokio::task;

use crate::auth::directory::DynUserDirectory;
use crate::auth::hashing::SecretHasher;
use crate::auth::identity::Identity;
use crate::error::{AuthError, DirectoryError};

/// Owns the signup/signin contract.
///
/// The uniqueness check in [`signup`](Self::signup) is a read followed by a
/// write and is not atomic on its own. Two concurrent signups for the same key
/// can both pass the check; only a directory that enforces uniqueness on
/// `create` (reporting [`DirectoryError::Conflict`]) keeps the key unique.
pub struct CredentialAuthenticator {
    directory: DynUserDirectory,
    hasher: SecretHasher,
}

impl CredentialAuthenticator {
    pub fn new(directory: DynUserDirectory, hasher: SecretHasher) -> Self {
        Self { directory, hasher }
    }

    /// Register a new identity.
    ///
    /// Fails with [`AuthError::DuplicateIdentity`] without writing anything
    /// when the key is already registered.
    pub async fn signup(
        &self,
        identity_key: &str,
        plaintext_secret: &str,
    ) -> Result<Identity, AuthError> {
        let existing = self.directory.find(identity_key).await?;
        if !existing.is_empty() {
            warn!("Signup rejected, identity already registered: {}", identity_key);
            return Err(AuthError::DuplicateIdentity(identity_key.to_string()));
        }

        let stored_secret = self.hash_secret(plaintext_secret).await?;

        match self.directory.create(identity_key, &stored_secret).await {
            Ok(identity) => {
                info!("Signed up identity {} ({})", identity.id, identity.identity_key);
                Ok(identity)
            }
            Err(DirectoryError::Conflict(_)) => {
                warn!("Signup lost a race for identity key: {}", identity_key);
                Err(AuthError::DuplicateIdentity(identity_key.to_string()))
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Verify a plaintext secret and return the matching identity
    pub async fn signin(
        &self,
        identity_key: &str,
        plaintext_secret: &str,
    ) -> Result<Identity, AuthError> {
        let identity = match self.directory.find(identity_key).await?.into_iter().next() {
            Some(identity) => identity,
            None => {
                warn!("Signin rejected, unknown identity: {}", identity_key);
                return Err(AuthError::UnknownIdentity(identity_key.to_string()));
            }
        };

        let (identity, matches) = self.verify_secret(plaintext_secret, identity).await?;
        if !matches {
            warn!("Signin rejected, bad credentials for identity {}", identity.id);
            return Err(AuthError::InvalidCredentials);
        }

        info!("Signed in identity {} ({})", identity.id, identity.identity_key);
        Ok(identity)
    }

    // Key derivation is CPU bound; keep it off the async workers.
    async fn hash_secret(&self, plaintext_secret: &str) -> Result<String, AuthError> {
        let hasher = self.hasher.clone();
        let secret = plaintext_secret.to_owned();

        task::spawn_blocking(move || hasher.hash_secret(&secret))
            .await
            .map_err(|e| AuthError::Hashing(e.to_string()))?
    }

    async fn verify_secret(
        &self,
        plaintext_secret: &str,
        identity: Identity,
    ) -> Result<(Identity, bool), AuthError> {
        let hasher = self.hasher.clone();
        let secret = plaintext_secret.to_owned();

        task::spawn_blocking(move || {
            let matches = hasher.verify(&secret, &identity)?;
            Ok::<_, AuthError>((identity, matches))
        })
        .await
        .map_err(|e| AuthError::Hashing(e.to_string()))?
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::directory::UserDirectory;
    use crate::auth::hashing::decode;
    use crate::auth::identity::IdentityId;
    use crate::config::HashingConfig;
    use async_trait::async_trait;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tokio::sync::Mutex;

    /// Directory fake that filters a plain list and never enforces uniqueness
    #[derive(Default)]
    struct FakeUserDirectory {
        users: Mutex<Vec<Identity>>,
        creates: AtomicUsize,
    }

    #[async_trait]
    impl UserDirectory for FakeUserDirectory {
        async fn find(&self, identity_key: &str) -> Result<Vec<Identity>, DirectoryError> {
            let users = self.users.lock().await;
            Ok(users
                .iter()
                .filter(|user| user.identity_key == identity_key)
                .cloned()
                .collect())
        }

        async fn create(
            &self,
            identity_key: &str,
            stored_secret: &str,
        ) -> Result<Identity, DirectoryError> {
            self.creates.fetch_add(1, Ordering::SeqCst);
            let mut users = self.users.lock().await;
            let user = Identity::new(
                IdentityId(users.len() as u64 + 100),
                identity_key,
                stored_secret,
            );
            users.push(user.clone());
            Ok(user)
        }
    }

    /// Directory whose lookups miss but whose writes report a conflict
    struct RacingUserDirectory;

    #[async_trait]
    impl UserDirectory for RacingUserDirectory {
        async fn find(&self, _identity_key: &str) -> Result<Vec<Identity>, DirectoryError> {
            Ok(Vec::new())
        }

        async fn create(
            &self,
            identity_key: &str,
            _stored_secret: &str,
        ) -> Result<Identity, DirectoryError> {
            Err(DirectoryError::Conflict(identity_key.to_string()))
        }
    }

    fn fast_hasher() -> SecretHasher {
        SecretHasher::new(&HashingConfig {
            kdf_memory_kib: 256,
            kdf_iterations: 1,
            kdf_parallelism: 1,
        })
        .unwrap()
    }

    fn setup() -> (CredentialAuthenticator, Arc<FakeUserDirectory>) {
        let directory = Arc::new(FakeUserDirectory::default());
        let service = CredentialAuthenticator::new(directory.clone(), fast_hasher());
        (service, directory)
    }

    #[tokio::test]
    async fn test_signup_stores_salted_and_hashed_secret() {
        let (service, _) = setup();
        let user = service.signup("abcd@gmail.com", "1234").await.unwrap();

        assert_ne!(user.stored_secret, "1234");
        let (salt, hash) = decode(&user.stored_secret).unwrap();
        assert!(salt.chars().all(|c| c.is_ascii_hexdigit()));
        assert!(hash.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[tokio::test]
    async fn test_signup_rejects_email_in_use_without_writing() {
        let (service, directory) = setup();
        service.signup("abcd@gmail.com", "1234").await.unwrap();

        let result = service.signup("abcd@gmail.com", "1234").await;
        assert!(matches!(result, Err(AuthError::DuplicateIdentity(key)) if key == "abcd@gmail.com"));
        assert_eq!(directory.creates.load(Ordering::SeqCst), 1);
        assert_eq!(directory.find("abcd@gmail.com").await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_signup_maps_directory_conflict_to_duplicate() {
        let service = CredentialAuthenticator::new(Arc::new(RacingUserDirectory), fast_hasher());
        let result = service.signup("abcd@gmail.com", "1234").await;
        assert!(matches!(result, Err(AuthError::DuplicateIdentity(_))));
    }

    #[tokio::test]
    async fn test_same_secret_gets_different_salts() {
        let (service, _) = setup();
        let first = service.signup("a@gmail.com", "1234").await.unwrap();
        let second = service.signup("b@gmail.com", "1234").await.unwrap();
        assert_ne!(first.stored_secret, second.stored_secret);
    }

    #[tokio::test]
    async fn test_signin_with_unused_email() {
        let (service, _) = setup();
        let result = service.signin("abcd@gmail.com", "password").await;
        assert!(matches!(result, Err(AuthError::UnknownIdentity(_))));
    }

    #[tokio::test]
    async fn test_signin_with_invalid_password() {
        let (service, _) = setup();
        service.signup("abcd@gmail.com", "password1").await.unwrap();

        let result = service.signin("abcd@gmail.com", "password").await;
        assert!(matches!(result, Err(AuthError::InvalidCredentials)));
    }

    #[tokio::test]
    async fn test_signin_with_correct_password() {
        let (service, _) = setup();
        let created = service.signup("abcd@gmail.com", "password").await.unwrap();

        let user = service.signin("abcd@gmail.com", "password").await.unwrap();
        assert_eq!(user, created);
    }

    #[tokio::test]
    async fn test_signin_with_corrupt_stored_secret() {
        let (service, directory) = setup();
        directory
            .create("abcd@gmail.com", "not-a-stored-secret")
            .await
            .unwrap();

        let result = service.signin("abcd@gmail.com", "password").await;
        assert!(matches!(
            result,
            Err(AuthError::MalformedStoredSecret { id: IdentityId(100) })
        ));
    }

    #[tokio::test]
    async fn test_errors_do_not_leak_secrets() {
        let (service, directory) = setup();
        service.signup("abcd@gmail.com", "hunter2").await.unwrap();
        let stored = directory.find("abcd@gmail.com").await.unwrap()[0]
            .stored_secret
            .clone();
        let (salt, hash) = decode(&stored).unwrap();

        let errors = [
            service.signup("abcd@gmail.com", "hunter2").await.unwrap_err(),
            service.signin("abcd@gmail.com", "hunter3").await.unwrap_err(),
            service.signin("nobody@x.com", "hunter2").await.unwrap_err(),
        ];

        for err in errors {
            let text = format!("{} {:?}", err, err);
            assert!(!text.contains("hunter"));
            assert!(!text.contains(salt));
            assert!(!text.contains(hash));
        }
    }
}
