use axum::{
    Router,
    extract::FromRef,
    routing::{get, post},
};
use axum_extra::extract::cookie::Key;
use std::sync::Arc;

use crate::config::Config;
use crate::db::EntriesStorage;
use crate::handlers::{entries, not_found, session};

#[derive(Clone)]
pub struct JournalState {
    pub storage: EntriesStorage,
    pub config: Arc<Config>,
    pub cookie_key: Key,
}

impl JournalState {
    pub fn new(storage: EntriesStorage, config: Config) -> Self {
        let cookie_key = config.cookie_key();
        Self {
            storage,
            config: Arc::new(config),
            cookie_key,
        }
    }
}

impl FromRef<JournalState> for Key {
    fn from_ref(state: &JournalState) -> Self {
        state.cookie_key.clone()
    }
}

pub fn journal_router(state: JournalState) -> Router {
    Router::new()
        .route("/", get(entries::list_entries))
        .route("/detail/{id}", get(entries::entry_detail))
        .route("/new", post(entries::new_entry))
        .route(
            "/edit",
            get(entries::edit_form_by_query).post(entries::update_entry_from_form),
        )
        .route(
            "/edit/{id}",
            get(entries::edit_form).post(entries::update_entry),
        )
        .route("/login", get(session::login_form).post(session::login))
        .route("/logout", get(session::logout))
        .fallback(not_found)
        .with_state(state)
}
