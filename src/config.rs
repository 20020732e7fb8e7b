//! Runtime configuration.
//!
//! Layered with figment, later layers win:
//! - built-in defaults
//! - `journal.toml` in the working directory
//! - `JOURNAL_*` environment variables
//! - unprefixed `DATABASE_URL`

use axum_extra::extract::cookie::Key;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::JournalError;

pub const CONFIG_FILE: &str = "journal.toml";

/// Minimum length accepted by `Key::derive_from`.
const MIN_COOKIE_SECRET_LEN: usize = 32;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub database_url: String,
    pub max_connections: u32,
    pub listen_addr: String,
    pub loglevel: String,
    pub admin_username: String,
    /// Argon2 PHC string, see the `hash-password` binary.
    pub admin_password_hash: String,
    pub cookie_secret: Option<String>,
    pub insecure_cookie: bool,
    pub session_ttl_hours: u32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database_url: "sqlite:journal.db".to_string(),
            max_connections: 5,
            listen_addr: "0.0.0.0:8000".to_string(),
            loglevel: "info".to_string(),
            admin_username: "admin".to_string(),
            admin_password_hash: String::new(),
            cookie_secret: None,
            insecure_cookie: false,
            session_ttl_hours: 12,
        }
    }
}

impl Config {
    pub fn load() -> Result<Self, JournalError> {
        Self::figment(CONFIG_FILE).extract().map_err(JournalError::from)
    }

    pub fn figment(path: &str) -> Figment {
        Figment::from(Serialized::defaults(Config::default()))
            .merge(Toml::file(path))
            .merge(Env::prefixed("JOURNAL_"))
            .merge(Env::raw().only(&["DATABASE_URL"]))
    }

    /// Key for the private session cookie. Without a configured secret a
    /// random key is generated, so sessions do not survive a restart.
    pub fn cookie_key(&self) -> Key {
        match self.cookie_secret.as_deref() {
            Some(secret) if secret.len() >= MIN_COOKIE_SECRET_LEN => {
                Key::derive_from(secret.as_bytes())
            }
            Some(_) => {
                warn!(
                    min_len = MIN_COOKIE_SECRET_LEN,
                    "cookie_secret too short; using a random per-process key"
                );
                Key::generate()
            }
            None => {
                warn!("cookie_secret not set; using a random per-process key");
                Key::generate()
            }
        }
    }
}
