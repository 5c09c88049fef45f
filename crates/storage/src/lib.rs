//! Durable homes for the request list.
//!
//! Every backend stores the whole, ordered sequence: `load` hands back what
//! was last saved (newest first), `save` replaces it wholesale.

use std::{path::PathBuf, sync::Arc};

use anyhow::Result;
use async_trait::async_trait;
use shared::domain::Request;

mod json_file;
mod memory;
mod sqlite;

pub use json_file::JsonFileStore;
pub use memory::MemoryStore;
pub use sqlite::SqliteStore;

#[async_trait]
pub trait RequestStore: Send + Sync {
    /// Returns the stored sequence, or an empty list when nothing was saved yet.
    async fn load(&self) -> Result<Vec<Request>>;
    async fn save(&self, requests: &[Request]) -> Result<()>;
    fn describe(&self) -> String;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StorageLocation {
    Memory,
    Json(PathBuf),
    Sqlite(String),
}

impl StorageLocation {
    pub const DEFAULT: &'static str = "./data/requests.json";

    pub fn parse(raw: &str) -> Self {
        let raw = raw.trim();

        if raw.is_empty() {
            return Self::Json(PathBuf::from(Self::DEFAULT));
        }

        if raw.eq_ignore_ascii_case("memory") {
            return Self::Memory;
        }

        if raw.starts_with("sqlite:") {
            return Self::Sqlite(raw.to_string());
        }

        if let Some(path) = raw.strip_prefix("json://") {
            return Self::Json(PathBuf::from(path));
        }

        let lower = raw.to_ascii_lowercase();
        if lower.ends_with(".db") || lower.ends_with(".sqlite") || lower.ends_with(".sqlite3") {
            return Self::Sqlite(format!("sqlite://{}", raw.replace('\\', "/")));
        }

        Self::Json(PathBuf::from(raw))
    }
}

pub async fn open_store(location: &StorageLocation) -> Result<Arc<dyn RequestStore>> {
    let store: Arc<dyn RequestStore> = match location {
        StorageLocation::Memory => Arc::new(MemoryStore::default()),
        StorageLocation::Json(path) => Arc::new(JsonFileStore::new(path.clone())),
        StorageLocation::Sqlite(database_url) => Arc::new(SqliteStore::new(database_url).await?),
    };
    tracing::debug!(store = %store.describe(), "opened request store");
    Ok(store)
}

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;
