//! bcrypt verification and hashing. The seed tooling for the original
//! deployment hashed passwords with bcrypt at cost 12, so stored hashes
//! are bcrypt strings and `DEFAULT_COST` matches.

/// Valid bcrypt hash of an arbitrary string, verified against on the
/// unknown-email path to keep its timing in line with real lookups.
pub const DUMMY_HASH: &str = "$2b$12$C6UzMDM.H6dfI/f/IKcEeO7ZBlG08mZ01tY0g41hVXAyKKBGCCNPm";

pub fn hash(password: &str, cost: u32) -> Result<String, bcrypt::BcryptError> {
    bcrypt::hash(password, cost)
}

pub fn verify(password: &str, hash: &str) -> Result<bool, bcrypt::BcryptError> {
    bcrypt::verify(password, hash)
}
