use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use axum_extra::extract::cookie::{Cookie, PrivateCookieJar, SameSite};
use chrono::Utc;
use std::convert::Infallible;
use subtle::ConstantTimeEq;
use time::Duration;
use tracing::debug;

use crate::config::Config;
use crate::error::JournalError;
use crate::router::JournalState;

pub const SESSION_COOKIE: &str = "journal_session";

/// Issue a session token for the configured admin.
///
/// The token is `<username>:<issued unix seconds>`; the private jar encrypts
/// and authenticates it, so it cannot be read or forged client side.
pub fn start_session(jar: PrivateCookieJar, config: &Config) -> PrivateCookieJar {
    let token = format!("{}:{}", config.admin_username, Utc::now().timestamp());
    jar.add(build_cookie(config, token))
}

pub fn end_session(jar: PrivateCookieJar) -> PrivateCookieJar {
    jar.remove(clear_cookie())
}

pub fn is_authenticated(jar: &PrivateCookieJar, config: &Config) -> bool {
    jar.get(SESSION_COOKIE)
        .is_some_and(|c| token_is_valid(c.value(), config, Utc::now().timestamp()))
}

fn token_is_valid(token: &str, config: &Config, now: i64) -> bool {
    let Some((username, issued)) = token.rsplit_once(':') else {
        return false;
    };
    let Ok(issued) = issued.parse::<i64>() else {
        return false;
    };
    let user_ok = bool::from(username.as_bytes().ct_eq(config.admin_username.as_bytes()));
    let ttl = i64::from(config.session_ttl_hours) * 3600;
    let age = now.saturating_sub(issued);
    user_ok && (0..ttl).contains(&age)
}

fn build_cookie(config: &Config, value: String) -> Cookie<'static> {
    Cookie::build(Cookie::new(SESSION_COOKIE, value))
        .path("/")
        .http_only(true)
        .secure(!config.insecure_cookie)
        .same_site(SameSite::Lax)
        .max_age(Duration::hours(i64::from(config.session_ttl_hours)))
        .build()
}

fn clear_cookie() -> Cookie<'static> {
    Cookie::build(Cookie::new(SESSION_COOKIE, ""))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .build()
}

/// Rejects the request with `Unauthorized` unless it carries a valid
/// session. Put it before any body extractor so nothing is parsed for
/// anonymous callers.
#[derive(Debug, Clone, Copy)]
pub struct RequireAdmin;

impl FromRequestParts<JournalState> for RequireAdmin {
    type Rejection = JournalError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &JournalState,
    ) -> Result<Self, Self::Rejection> {
        let jar = PrivateCookieJar::from_headers(&parts.headers, state.cookie_key.clone());
        if is_authenticated(&jar, &state.config) {
            Ok(Self)
        } else {
            debug!(path = %parts.uri.path(), "rejecting unauthenticated request");
            Err(JournalError::Unauthorized)
        }
    }
}

/// Whether the caller is logged in; never rejects.
#[derive(Debug, Clone, Copy)]
pub struct Viewer {
    pub authenticated: bool,
}

impl FromRequestParts<JournalState> for Viewer {
    type Rejection = Infallible;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &JournalState,
    ) -> Result<Self, Self::Rejection> {
        let jar = PrivateCookieJar::from_headers(&parts.headers, state.cookie_key.clone());
        Ok(Self {
            authenticated: is_authenticated(&jar, &state.config),
        })
    }
}
