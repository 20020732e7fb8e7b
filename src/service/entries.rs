//! Entry repository operations.
//!
//! Thin mapping between submitted form parameters, the storage layer and the
//! rendered view shown to readers.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::db::{EntriesStorage, EntryRecord};
use crate::error::JournalError;
use crate::service::markdown::render_markdown;

/// Parameters submitted by the new/edit forms.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct EntryForm {
    pub title: Option<String>,
    pub text: Option<String>,
    pub id: Option<i64>,
}

/// An entry with its body rendered to HTML.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct EntryView {
    pub id: i64,
    pub title: String,
    pub text: String,
    pub created: DateTime<Utc>,
}

impl From<EntryRecord> for EntryView {
    fn from(rec: EntryRecord) -> Self {
        Self {
            text: render_markdown(&rec.text),
            id: rec.id,
            title: rec.title,
            created: rec.created,
        }
    }
}

pub async fn read_entries(storage: &EntriesStorage) -> Result<Vec<EntryView>, JournalError> {
    let rows = storage.list_entries().await?;
    Ok(rows.into_iter().map(EntryView::from).collect())
}

pub async fn read_entry(
    storage: &EntriesStorage,
    id: i64,
) -> Result<Option<EntryView>, JournalError> {
    Ok(storage.get_entry(id).await?.map(EntryView::from))
}

/// The unrendered row, for pre-filling the edit form.
pub async fn read_entry_source(
    storage: &EntriesStorage,
    id: i64,
) -> Result<Option<EntryRecord>, JournalError> {
    storage.get_entry(id).await
}

pub async fn write_entry(
    storage: &EntriesStorage,
    form: &EntryForm,
) -> Result<EntryView, JournalError> {
    let rec = storage
        .insert_entry(form.title.as_deref(), form.text.as_deref(), Utc::now())
        .await?;
    info!(id = rec.id, title = %rec.title, "entry written");
    Ok(rec.into())
}

pub async fn edit_entry(
    storage: &EntriesStorage,
    form: &EntryForm,
) -> Result<EntryView, JournalError> {
    let id = form.id.ok_or(JournalError::MissingParameter("id"))?;
    let rec = storage
        .update_entry(id, form.title.as_deref(), form.text.as_deref())
        .await?
        .ok_or(JournalError::NotFound)?;
    info!(id = rec.id, title = %rec.title, "entry edited");
    Ok(rec.into())
}
