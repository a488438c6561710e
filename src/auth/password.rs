use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use tokio::task;

use crate::errors::{AppError, AppResult};

/// Hashes a password with Argon2id and a fresh random salt, producing a PHC
/// string. Runs on the blocking pool so the hash cost never stalls the
/// async executor.
pub async fn hash_password(password: &str) -> AppResult<String> {
    let password = password.to_string();

    task::spawn_blocking(move || {
        let salt = SaltString::generate(&mut OsRng);
        let hash = Argon2::default()
            .hash_password(password.as_bytes(), &salt)
            .map_err(|e| AppError::InternalError(format!("Failed to hash password: {}", e)))?
            .to_string();
        Ok(hash)
    })
    .await
    .map_err(|e| AppError::InternalError(format!("Password hashing task failed: {}", e)))?
}

/// Verifies a password against a stored PHC string. A mismatch is `Ok(false)`,
/// not an error; only a corrupt hash or an internal failure is an `Err`.
pub async fn verify_password(password: &str, hash: &str) -> AppResult<bool> {
    let password = password.to_string();
    let hash = hash.to_string();

    task::spawn_blocking(move || {
        let parsed = PasswordHash::new(&hash)
            .map_err(|e| AppError::InternalError(format!("Invalid password hash: {}", e)))?;

        match Argon2::default().verify_password(password.as_bytes(), &parsed) {
            Ok(()) => Ok(true),
            Err(argon2::password_hash::Error::Password) => Ok(false),
            Err(e) => Err(AppError::InternalError(format!(
                "Password verification failed: {}",
                e
            ))),
        }
    })
    .await
    .map_err(|e| AppError::InternalError(format!("Password verification task failed: {}", e)))?
}
