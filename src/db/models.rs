use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One row of `entries`; `text` is the Markdown source.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EntryRecord {
    pub id: i64,
    pub title: String,
    pub text: String,
    pub created: DateTime<Utc>,
}
