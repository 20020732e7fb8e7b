//! Database module: entry rows, schema and the SQLite-backed storage.
//!
//! Layout:
//! - `models.rs`: Rust structs mirroring DB rows
//! - `schema.rs`: SQL DDL for initializing the database
//! - `sqlite.rs`: pool setup and the parameterized entry queries

pub mod models;
pub mod schema;
pub mod sqlite;

pub use models::EntryRecord;
pub use sqlite::{EntriesStorage, connect};
