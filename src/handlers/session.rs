use axum::{
    Form,
    extract::State,
    response::{IntoResponse, Response},
};
use axum_extra::extract::cookie::PrivateCookieJar;
use maud::Markup;

use super::found;
use crate::middleware::auth::{end_session, start_session};
use crate::render::login_page;
use crate::router::JournalState;
use crate::service::auth::{LoginForm, do_login};
use crate::JournalError;

/// GET /login
pub async fn login_form() -> Markup {
    login_page(false)
}

/// POST /login -> 302 with a session cookie, or the login page again.
pub async fn login(
    State(state): State<JournalState>,
    jar: PrivateCookieJar,
    Form(form): Form<LoginForm>,
) -> Result<Response, JournalError> {
    if do_login(&state.config, &form)? {
        let jar = start_session(jar, &state.config);
        Ok((jar, found("/")).into_response())
    } else {
        Ok(login_page(true).into_response())
    }
}

/// GET /logout
pub async fn logout(jar: PrivateCookieJar) -> impl IntoResponse {
    (end_session(jar), found("/"))
}
