use crate::error::AuthError;
use bcrypt::{hash, verify};

/// Cost bounds accepted by bcrypt.
pub const MIN_COST: u32 = 4;
pub const MAX_COST: u32 = 31;

/// bcrypt hashing with a fixed cost.
///
/// Every call to [`PasswordHasher::hash`] draws a fresh random salt, so the
/// same plaintext never hashes to the same string twice. The salt and cost
/// travel inside the `$2b$...` string, which is all `verify` needs.
#[derive(Debug, Clone, Copy)]
pub struct PasswordHasher {
    cost: u32,
}

impl PasswordHasher {
    pub fn new(cost: u32) -> Self {
        Self { cost }
    }

    pub fn hash(&self, plaintext: &str) -> Result<String, AuthError> {
        Ok(hash(plaintext, self.cost)?)
    }

    /// Malformed hash strings verify as `false`.
    pub fn verify(&self, plaintext: &str, password_hash: &str) -> bool {
        verify(plaintext, password_hash).unwrap_or(false)
    }
}

/// Cost parameter embedded in a `$2b$<cost>$...` hash string.
pub fn hash_cost(password_hash: &str) -> Option<u32> {
    let mut parts = password_hash.split('$');
    match (parts.next(), parts.next(), parts.next()) {
        (Some(""), Some(_version), Some(cost)) if cost.len() == 2 => cost.parse().ok(),
        _ => None,
    }
}
