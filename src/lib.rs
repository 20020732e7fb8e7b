pub mod config;
pub mod error;
pub mod db;
pub mod service;
pub mod middleware;
pub mod handlers;
pub mod render;
pub mod router;

pub use config::Config;
pub use error::JournalError;
