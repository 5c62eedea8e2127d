//! Password storage and verification
//!
//! New passwords are stored as `pbkdf2_sha256$<iterations>$<salt>$<hash>`,
//! the same layout Django uses, so existing hashes stay verifiable. Rows that
//! hold a raw value (plaintext mode or legacy data) are compared in constant
//! time.

use crate::config::{PasswordStorage, SecurityConfig};
use crate::domain::{PortalError, Result};
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use pbkdf2::pbkdf2_hmac;
use rand::RngCore;
use sha2::Sha256;
use subtle::ConstantTimeEq;
use zeroize::Zeroize;

pub const PBKDF2_ALGORITHM: &str = "pbkdf2_sha256";
pub const HASH_LENGTH: usize = 32;
const SALT_BYTES: usize = 16;

/// Hashes and checks passwords according to the configured storage mode
#[derive(Debug, Clone, Copy)]
pub struct PasswordHasher {
    storage: PasswordStorage,
    iterations: u32,
}

impl PasswordHasher {
    pub fn new(storage: PasswordStorage, iterations: u32) -> Self {
        Self {
            storage,
            iterations,
        }
    }

    pub fn from_config(config: &SecurityConfig) -> Self {
        Self::new(config.password_storage, config.pbkdf2_iterations)
    }

    /// Produces the value to persist for `password`
    pub fn hash(&self, password: &str) -> String {
        match self.storage {
            PasswordStorage::Plaintext => password.to_string(),
            PasswordStorage::Pbkdf2 => {
                let mut salt_bytes = [0u8; SALT_BYTES];
                rand::thread_rng().fill_bytes(&mut salt_bytes);
                let salt = STANDARD.encode(salt_bytes);
                encode_pbkdf2(password, &salt, self.iterations)
            }
        }
    }

    /// Checks `password` against a stored value of either format
    pub fn verify(&self, password: &str, stored: &str) -> bool {
        match parse_pbkdf2(stored) {
            Some(parts) => {
                let mut derived = derive(password, parts.salt, parts.iterations);
                let matches = STANDARD
                    .decode(parts.hash)
                    .map(|expected| bool::from(derived.as_slice().ct_eq(expected.as_slice())))
                    .unwrap_or(false);
                derived.zeroize();
                matches
            }
            None => bool::from(password.as_bytes().ct_eq(stored.as_bytes())),
        }
    }

    /// [`hash`](Self::hash) on the blocking thread pool, for use from request handlers
    pub async fn hash_async(&self, password: String) -> Result<String> {
        let hasher = *self;
        tokio::task::spawn_blocking(move || hasher.hash(&password))
            .await
            .map_err(|e| PortalError::Other(format!("Password hashing task failed: {e}")))
    }

    /// [`verify`](Self::verify) on the blocking thread pool
    pub async fn verify_async(&self, password: String, stored: String) -> Result<bool> {
        let hasher = *self;
        tokio::task::spawn_blocking(move || hasher.verify(&password, &stored))
            .await
            .map_err(|e| PortalError::Other(format!("Password verification task failed: {e}")))
    }
}

impl Default for PasswordHasher {
    fn default() -> Self {
        Self::from_config(&SecurityConfig::default())
    }
}

struct Pbkdf2Parts<'a> {
    iterations: u32,
    salt: &'a str,
    hash: &'a str,
}

fn parse_pbkdf2(stored: &str) -> Option<Pbkdf2Parts<'_>> {
    let mut parts = stored.splitn(4, '$');
    if parts.next()? != PBKDF2_ALGORITHM {
        return None;
    }
    let iterations = parts.next()?.parse().ok().filter(|n| *n > 0)?;
    let salt = parts.next()?;
    let hash = parts.next()?;
    Some(Pbkdf2Parts {
        iterations,
        salt,
        hash,
    })
}

fn derive(password: &str, salt: &str, iterations: u32) -> [u8; HASH_LENGTH] {
    let mut key = [0u8; HASH_LENGTH];
    pbkdf2_hmac::<Sha256>(password.as_bytes(), salt.as_bytes(), iterations, &mut key);
    key
}

fn encode_pbkdf2(password: &str, salt: &str, iterations: u32) -> String {
    let mut key = derive(password, salt, iterations);
    let encoded = format!(
        "{PBKDF2_ALGORITHM}${iterations}${salt}${}",
        STANDARD.encode(key)
    );
    key.zeroize();
    encoded
}

/// True when a stored value is a PBKDF2 hash rather than a raw password
pub fn is_hashed(stored: &str) -> bool {
    parse_pbkdf2(stored).is_some()
}
