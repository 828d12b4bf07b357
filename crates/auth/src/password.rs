//! Password hashing and verification (bcrypt).

use thiserror::Error;

/// Credential hashing failure.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum HashError {
    /// The stored value is not a recognizable bcrypt hash.
    ///
    /// Callers must treat this as an authentication failure, not a crash:
    /// it means the stored credential is unusable, never that the caller
    /// supplied the right password.
    #[error("stored credential is not a recognizable password hash")]
    Malformed,

    /// Hashing itself failed (e.g. cost factor out of range).
    #[error("password hashing failed: {0}")]
    Hashing(String),
}

/// One-way password hasher with an injected cost factor.
///
/// The cost is explicit configuration (no ambient globals); each `hash`
/// call salts independently, so equal passwords produce distinct hashes.
#[derive(Debug, Clone, Copy)]
pub struct PasswordHasher {
    cost: u32,
}

impl PasswordHasher {
    pub fn new(cost: u32) -> Self {
        Self { cost }
    }

    pub fn cost(&self) -> u32 {
        self.cost
    }

    /// Hash a raw password.
    ///
    /// Must be invoked exactly once per password set/change — never on a
    /// value that is already a hash.
    pub fn hash(&self, raw: &str) -> Result<String, HashError> {
        bcrypt::hash(raw, self.cost).map_err(|e| HashError::Hashing(e.to_string()))
    }

    /// Verify a raw password against a stored hash.
    ///
    /// Returns `Ok(false)` on mismatch; a stored value that bcrypt cannot
    /// parse is surfaced as [`HashError::Malformed`].
    pub fn verify(&self, raw: &str, stored: &str) -> Result<bool, HashError> {
        match bcrypt::verify(raw, stored) {
            Ok(matches) => Ok(matches),
            Err(_) => Err(HashError::Malformed),
        }
    }
}

impl Default for PasswordHasher {
    fn default() -> Self {
        Self::new(bcrypt::DEFAULT_COST)
    }
}
