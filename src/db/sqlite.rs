use crate::config::Config;
use crate::db::models::EntryRecord;
use crate::db::schema::SQLITE_INIT;
use crate::error::JournalError;
use chrono::{DateTime, SecondsFormat, Utc};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions, SqliteRow};
use sqlx::{Pool, Row, Sqlite};
use std::str::FromStr;
use tracing::debug;

type SqlitePool = Pool<Sqlite>;

const ENTRY_COLUMNS: &str = "id, title, text, created";

/// Open the pool described by `cfg` and make sure the schema exists.
pub async fn connect(cfg: &Config) -> Result<EntriesStorage, JournalError> {
    let options = SqliteConnectOptions::from_str(&cfg.database_url)?.create_if_missing(true);

    // Every connection to an in-memory database is a fresh database, so keep
    // exactly one alive for the lifetime of the pool.
    let pool_options = if is_in_memory(&cfg.database_url) {
        SqlitePoolOptions::new()
            .max_connections(1)
            .min_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
    } else {
        SqlitePoolOptions::new().max_connections(cfg.max_connections)
    };

    let pool = pool_options.connect_with(options).await?;
    let storage = EntriesStorage::new(pool);
    storage.init_schema().await?;
    Ok(storage)
}

fn is_in_memory(url: &str) -> bool {
    url.contains(":memory:") || url.contains("mode=memory")
}

#[derive(Clone)]
pub struct EntriesStorage {
    pool: SqlitePool,
}

impl EntriesStorage {
    fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Initialize the schema by executing the bundled DDL.
    pub async fn init_schema(&self) -> Result<(), JournalError> {
        // sqlx::query runs one statement at a time
        for stmt in SQLITE_INIT.split(';') {
            let s = stmt.trim();
            if s.is_empty() {
                continue;
            }
            sqlx::query(s).execute(&self.pool).await?;
        }
        Ok(())
    }

    /// All entries, newest first. Equal timestamps fall back to id order.
    pub async fn list_entries(&self) -> Result<Vec<EntryRecord>, JournalError> {
        let rows = sqlx::query(&format!(
            "SELECT {ENTRY_COLUMNS} FROM entries ORDER BY created DESC, id DESC"
        ))
        .fetch_all(&self.pool)
        .await?;
        debug!(count = rows.len(), "listed entries");
        rows.into_iter().map(Self::row_to_model).collect()
    }

    pub async fn get_entry(&self, id: i64) -> Result<Option<EntryRecord>, JournalError> {
        let row = sqlx::query(&format!(
            "SELECT {ENTRY_COLUMNS} FROM entries WHERE id = ?"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        row.map(Self::row_to_model).transpose()
    }

    /// Insert a new row. `None` fields are bound as NULL and rejected by the
    /// table constraints, which leaves the table untouched.
    pub async fn insert_entry(
        &self,
        title: Option<&str>,
        text: Option<&str>,
        created: DateTime<Utc>,
    ) -> Result<EntryRecord, JournalError> {
        let row = sqlx::query(&format!(
            "INSERT INTO entries (title, text, created) VALUES (?, ?, ?) RETURNING {ENTRY_COLUMNS}"
        ))
        .bind(title)
        .bind(text)
        .bind(encode_timestamp(created))
        .fetch_one(&self.pool)
        .await
        .map_err(JournalError::from_write)?;
        Self::row_to_model(row)
    }

    /// Update title and text in place. Returns `None` when no row has `id`.
    pub async fn update_entry(
        &self,
        id: i64,
        title: Option<&str>,
        text: Option<&str>,
    ) -> Result<Option<EntryRecord>, JournalError> {
        let row = sqlx::query(&format!(
            "UPDATE entries SET title = ?, text = ? WHERE id = ? RETURNING {ENTRY_COLUMNS}"
        ))
        .bind(title)
        .bind(text)
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(JournalError::from_write)?;
        row.map(Self::row_to_model).transpose()
    }

    pub async fn count_entries(&self) -> Result<i64, JournalError> {
        let rec: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM entries")
            .fetch_one(&self.pool)
            .await?;
        Ok(rec.0)
    }

    fn row_to_model(row: SqliteRow) -> Result<EntryRecord, JournalError> {
        let id: i64 = row.try_get("id")?;
        let title: String = row.try_get("title")?;
        let text: String = row.try_get("text")?;
        let created_str: String = row.try_get("created")?;

        let created = DateTime::parse_from_rfc3339(&created_str)
            .map_err(|e| sqlx::Error::Decode(Box::new(e)))?
            .with_timezone(&Utc);

        Ok(EntryRecord {
            id,
            title,
            text,
            created,
        })
    }
}

fn encode_timestamp(ts: DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Micros, true)
}
