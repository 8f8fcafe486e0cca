//! Salted secret hashing
//!
//! Derives stored secrets of the form `salt.hash` with Argon2id and verifies
//! plaintext secrets against them. Salt and hash are lowercase hex.

use argon2::password_hash::Output;
use argon2::{Algorithm, Argon2, Version};
use rand::RngCore;
use rand::rngs::OsRng;

use crate::auth::identity::Identity;
use crate::config::HashingConfig;
use crate::error::AuthError;

/// Separates the salt from the hash inside a stored secret
pub const SALT_SEPARATOR: char = '.';

/// Random salt length in bytes (hex-encoded to twice this many characters)
pub const SALT_LEN: usize = 8;

/// Derived hash length in bytes
pub const HASH_LEN: usize = 32;

/// Key derivation function shared by signup and signin
#[derive(Clone)]
pub struct SecretHasher {
    argon2: Argon2<'static>,
}

impl SecretHasher {
    pub fn new(config: &HashingConfig) -> Result<Self, AuthError> {
        let params = config
            .params()
            .map_err(|e| AuthError::Hashing(e.to_string()))?;

        Ok(Self {
            argon2: Argon2::new(Algorithm::Argon2id, Version::V0x13, params),
        })
    }

    /// Generate a fresh hex salt from the operating system RNG
    pub fn generate_salt() -> String {
        let mut bytes = [0u8; SALT_LEN];
        OsRng.fill_bytes(&mut bytes);
        hex::encode(bytes)
    }

    /// Derive the hex hash for `secret` under `salt`
    pub fn derive(&self, secret: &str, salt: &str) -> Result<String, AuthError> {
        self.derive_bytes(secret, salt).map(hex::encode)
    }

    fn derive_bytes(&self, secret: &str, salt: &str) -> Result<[u8; HASH_LEN], AuthError> {
        let mut out = [0u8; HASH_LEN];
        self.argon2
            .hash_password_into(secret.as_bytes(), salt.as_bytes(), &mut out)
            .map_err(|e| AuthError::Hashing(e.to_string()))?;
        Ok(out)
    }

    /// Salt and hash a plaintext secret into its stored form
    pub fn hash_secret(&self, secret: &str) -> Result<String, AuthError> {
        let salt = Self::generate_salt();
        let hash = self.derive(secret, &salt)?;
        Ok(encode(&salt, &hash))
    }

    /// Check `secret` against the identity's stored secret.
    ///
    /// The comparison goes through [`Output`], whose equality is constant time.
    pub fn verify(&self, secret: &str, identity: &Identity) -> Result<bool, AuthError> {
        let malformed = || AuthError::MalformedStoredSecret { id: identity.id };

        let (salt, expected_hex) = decode(&identity.stored_secret).ok_or_else(malformed)?;
        if salt.len() != SALT_LEN * 2 || !salt.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(malformed());
        }
        let expected_bytes = hex::decode(expected_hex).map_err(|_| malformed())?;
        if expected_bytes.len() != HASH_LEN {
            return Err(malformed());
        }
        let expected = Output::new(&expected_bytes).map_err(|_| malformed())?;

        let computed_bytes = self.derive_bytes(secret, salt)?;
        let computed =
            Output::new(&computed_bytes).map_err(|e| AuthError::Hashing(e.to_string()))?;

        Ok(computed == expected)
    }
}

/// Join salt and hash into a stored secret
pub fn encode(salt: &str, hash: &str) -> String {
    format!("{salt}{SALT_SEPARATOR}{hash}")
}

/// Split a stored secret into `(salt, hash)`; both segments must be non-empty
pub fn decode(stored_secret: &str) -> Option<(&str, &str)> {
    let (salt, hash) = stored_secret.split_once(SALT_SEPARATOR)?;
    if salt.is_empty() || hash.is_empty() || hash.contains(SALT_SEPARATOR) {
        return None;
    }
    Some((salt, hash))
}
