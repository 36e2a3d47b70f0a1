use async_trait::async_trait;
use np_core::{Article, ArticleStore, Error, Result};
use serde_json::Value;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use tracing::{debug, info, warn};

/// History store kept as one pretty-printed JSON array on disk.
///
/// Writes go to a temporary file in the same directory which is then renamed
/// over the snapshot, so a reader never sees a partially written array.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

/// A fully written snapshot waiting to be moved into place. Dropping it
/// without calling [`StagedSnapshot::commit`] deletes the temporary file and
/// leaves the previous snapshot untouched.
#[derive(Debug)]
pub struct StagedSnapshot {
    file: NamedTempFile,
    target: PathBuf,
    count: usize,
}

impl StagedSnapshot {
    pub fn temp_path(&self) -> &Path {
        self.file.path()
    }

    pub fn len(&self) -> usize {
        self.count
    }

    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    pub fn commit(self) -> Result<()> {
        let target = self.target;
        self.file
            .persist(&target)
            .map_err(|e| Error::Storage(format!("Failed to replace {}: {}", target.display(), e.error)))?;
        Ok(())
    }
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn parent_dir(&self) -> PathBuf {
        match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        }
    }

    /// Serializes `articles` into a temporary file next to the snapshot.
    pub fn stage(&self, articles: &[Article]) -> Result<StagedSnapshot> {
        let dir = self.parent_dir();
        std::fs::create_dir_all(&dir)?;

        let mut file = NamedTempFile::new_in(&dir)?;
        {
            let mut writer = BufWriter::new(file.as_file_mut());
            serde_json::to_writer_pretty(&mut writer, articles)?;
            writer.flush()?;
        }
        file.as_file().sync_all()?;
        debug!(path = %file.path().display(), count = articles.len(), "Staged snapshot");

        Ok(StagedSnapshot {
            file,
            target: self.path.clone(),
            count: articles.len(),
        })
    }

    /// Stages the snapshot, runs `before_commit`, then swaps it into place.
    /// An error from `before_commit` abandons the staged file.
    pub fn replace_with<F>(&self, articles: &[Article], before_commit: F) -> Result<()>
    where
        F: FnOnce(&StagedSnapshot) -> Result<()>,
    {
        let staged = self.stage(articles)?;
        before_commit(&staged)?;
        staged.commit()?;
        info!(path = %self.path.display(), count = articles.len(), "Snapshot written");
        Ok(())
    }
}

#[async_trait]
impl ArticleStore for JsonFileStore {
    async fn load(&self) -> Result<Vec<Article>> {
        let raw = match tokio::fs::read_to_string(&self.path).await {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                info!(path = %self.path.display(), "No previous snapshot, starting empty");
                return Ok(Vec::new());
            }
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "Snapshot unreadable, starting empty");
                return Ok(Vec::new());
            }
        };

        let records = match serde_json::from_str::<Vec<Value>>(&raw) {
            Ok(records) => records,
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "Snapshot is not a JSON array, starting empty");
                return Ok(Vec::new());
            }
        };

        let total = records.len();
        let articles: Vec<Article> = records
            .into_iter()
            .enumerate()
            .filter_map(|(index, record)| match serde_json::from_value::<Article>(record) {
                Ok(article) => Some(article),
                Err(e) => {
                    warn!(path = %self.path.display(), index, error = %e, "Skipping unreadable record");
                    None
                }
            })
            .collect();
        info!(
            path = %self.path.display(),
            count = articles.len(),
            skipped = total - articles.len(),
            "Loaded snapshot"
        );
        Ok(articles)
    }

    async fn replace(&self, articles: &[Article]) -> Result<()> {
        let store = self.clone();
        let articles = articles.to_vec();
        tokio::task::spawn_blocking(move || store.replace_with(&articles, |_| Ok(())))
            .await
            .map_err(|e| Error::Storage(format!("Snapshot writer failed: {}", e)))?
    }
}
