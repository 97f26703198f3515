//! bcrypt password digests.

use super::{DbError, Result};

#[cfg(not(test))]
const COST: u32 = bcrypt::DEFAULT_COST;
// Minimum cost keeps unit tests fast
#[cfg(test)]
const COST: u32 = 4;

/// Hashes a password with a fresh random salt.
pub fn hash(plain: &str) -> Result<String> {
    bcrypt::hash(plain, COST).map_err(DbError::from)
}

/// Returns true if `plain` matches a bcrypt hash.
///
/// Malformed hashes never match.
pub fn verify(plain: &str, hashed: &str) -> bool {
    bcrypt::verify(plain, hashed).unwrap_or(false)
}
