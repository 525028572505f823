use crate::error::AppError;
use bcrypt::{hash, verify, DEFAULT_COST};

pub fn hash_password(password: &str) -> Result<String, AppError> {
    // The resulting string embeds algorithm, cost and salt, so verification
    // needs nothing beyond the hash itself.
    hash(password, DEFAULT_COST)
        .map_err(|e| AppError::InternalServerError(format!("Failed to hash password: {}", e)))
}

pub fn verify_password(password: &str, hashed_password: &str) -> bool {
    // A hash that bcrypt cannot parse can never match; treat it as a mismatch.
    verify(password, hashed_password).unwrap_or(false)
}
