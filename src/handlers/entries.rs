use axum::{
    Form, Json,
    extract::{Path, Query, State},
    http::HeaderMap,
    response::{IntoResponse, Response},
};
use maud::Markup;

use super::{found, wants_json};
use crate::middleware::auth::{RequireAdmin, Viewer};
use crate::render::{detail_page, edit_page, listing_page};
use crate::router::JournalState;
use crate::service::entries::{
    EntryForm, edit_entry, read_entries, read_entry, read_entry_source, write_entry,
};
use crate::JournalError;

/// GET / -> newest-first listing.
pub async fn list_entries(
    State(state): State<JournalState>,
    viewer: Viewer,
) -> Result<Markup, JournalError> {
    let entries = read_entries(&state.storage).await?;
    Ok(listing_page(&entries, viewer.authenticated))
}

/// GET /detail/{id}
pub async fn entry_detail(
    State(state): State<JournalState>,
    viewer: Viewer,
    Path(id): Path<i64>,
) -> Result<Markup, JournalError> {
    let entry = read_entry(&state.storage, id)
        .await?
        .ok_or(JournalError::NotFound)?;
    Ok(detail_page(&entry, viewer.authenticated))
}

/// POST /new -> 302 to the listing, or the new entry as JSON.
pub async fn new_entry(
    State(state): State<JournalState>,
    _admin: RequireAdmin,
    headers: HeaderMap,
    Form(form): Form<EntryForm>,
) -> Result<Response, JournalError> {
    let entry = write_entry(&state.storage, &form).await?;
    if wants_json(&headers) {
        Ok(Json(entry).into_response())
    } else {
        Ok(found("/"))
    }
}

/// GET /edit/{id} -> edit form, or the raw Markdown row as JSON.
pub async fn edit_form(
    State(state): State<JournalState>,
    _admin: RequireAdmin,
    headers: HeaderMap,
    Path(id): Path<i64>,
) -> Result<Response, JournalError> {
    serve_source(&state, &headers, id).await
}

/// GET /edit?id={id}, same as the path form.
pub async fn edit_form_by_query(
    State(state): State<JournalState>,
    _admin: RequireAdmin,
    headers: HeaderMap,
    Query(query): Query<EntryForm>,
) -> Result<Response, JournalError> {
    let id = query.id.ok_or(JournalError::MissingParameter("id"))?;
    serve_source(&state, &headers, id).await
}

async fn serve_source(
    state: &JournalState,
    headers: &HeaderMap,
    id: i64,
) -> Result<Response, JournalError> {
    let entry = read_entry_source(&state.storage, id)
        .await?
        .ok_or(JournalError::NotFound)?;
    if wants_json(headers) {
        Ok(Json(entry).into_response())
    } else {
        Ok(edit_page(&entry).into_response())
    }
}

/// POST /edit/{id}
pub async fn update_entry(
    State(state): State<JournalState>,
    _admin: RequireAdmin,
    headers: HeaderMap,
    Path(id): Path<i64>,
    Form(mut form): Form<EntryForm>,
) -> Result<Response, JournalError> {
    form.id = Some(id);
    apply_edit(&state, &headers, &form).await
}

/// POST /edit with the id in the form body.
pub async fn update_entry_from_form(
    State(state): State<JournalState>,
    _admin: RequireAdmin,
    headers: HeaderMap,
    Form(form): Form<EntryForm>,
) -> Result<Response, JournalError> {
    apply_edit(&state, &headers, &form).await
}

async fn apply_edit(
    state: &JournalState,
    headers: &HeaderMap,
    form: &EntryForm,
) -> Result<Response, JournalError> {
    let entry = edit_entry(&state.storage, form).await?;
    if wants_json(headers) {
        Ok(Json(entry).into_response())
    } else {
        Ok(found(&format!("/detail/{}", entry.id)))
    }
}
