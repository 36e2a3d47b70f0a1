use np_core::{ArticleStore, Error, Result};
use std::path::PathBuf;
use std::str::FromStr;
use std::sync::Arc;

pub mod backends;
pub mod history;

pub use backends::*;
pub use history::{merge_history, HistoryMerge, DEFAULT_RETENTION_DAYS};

pub const DEFAULT_STORE_PATH: &str = "noticias_completas.json";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreKind {
    Json,
    Memory,
}

impl FromStr for StoreKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "json" | "file" => Ok(Self::Json),
            "memory" => Ok(Self::Memory),
            other => Err(Error::Config(format!("Unknown store backend: {}", other))),
        }
    }
}

/// Builds the history store selected on the command line.
pub fn create_store(kind: StoreKind, path: Option<PathBuf>) -> Arc<dyn ArticleStore> {
    match kind {
        StoreKind::Json => Arc::new(JsonFileStore::new(
            path.unwrap_or_else(|| PathBuf::from(DEFAULT_STORE_PATH)),
        )),
        StoreKind::Memory => Arc::new(InMemoryStore::new()),
    }
}

pub mod prelude {
    pub use super::backends::*;
    pub use super::history::merge_history;
}
