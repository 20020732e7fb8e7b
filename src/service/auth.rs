//! Admin credential check.

use argon2::{
    Argon2,
    password_hash::{self, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
};
use serde::Deserialize;
use subtle::ConstantTimeEq;
use tracing::{info, warn};

use crate::config::Config;
use crate::error::JournalError;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct LoginForm {
    pub username: Option<String>,
    pub password: Option<String>,
}

/// Check submitted credentials against the configured admin pair.
///
/// A wrong username or password yields `Ok(false)`, and so does every attempt
/// while no hash is configured. A missing parameter is an error, as is a
/// configured hash that cannot be parsed.
pub fn do_login(config: &Config, form: &LoginForm) -> Result<bool, JournalError> {
    let username = form
        .username
        .as_deref()
        .ok_or(JournalError::MissingParameter("username"))?;
    let password = form
        .password
        .as_deref()
        .ok_or(JournalError::MissingParameter("password"))?;

    let user_ok = bool::from(
        username
            .as_bytes()
            .ct_eq(config.admin_username.as_bytes()),
    );
    // verified regardless of user_ok
    let password_ok = if config.admin_password_hash.is_empty() {
        false
    } else {
        verify_password(password, &config.admin_password_hash)?
    };

    let ok = user_ok && password_ok;
    if ok {
        info!(username, "admin login succeeded");
    } else {
        warn!(username, "admin login failed");
    }
    Ok(ok)
}

/// Hash `password` into an Argon2id PHC string with a random salt.
pub fn hash_password(password: &str) -> Result<String, JournalError> {
    let salt = SaltString::encode_b64(&rand::random::<[u8; 16]>())
        .map_err(|e| JournalError::PasswordHash(e.to_string()))?;
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| JournalError::PasswordHash(e.to_string()))
}

pub fn verify_password(password: &str, phc: &str) -> Result<bool, JournalError> {
    let parsed = PasswordHash::new(phc).map_err(|e| JournalError::PasswordHash(e.to_string()))?;
    match Argon2::default().verify_password(password.as_bytes(), &parsed) {
        Ok(()) => Ok(true),
        Err(password_hash::Error::Password) => Ok(false),
        Err(e) => Err(JournalError::PasswordHash(e.to_string())),
    }
}
