use async_trait::async_trait;
use np_core::{Article, ArticleStore, Result};
use std::sync::Arc;
use tokio::sync::RwLock;

/// Snapshot store held in memory; used by `--store memory` runs and tests.
#[derive(Debug, Clone, Default)]
pub struct InMemoryStore {
    articles: Arc<RwLock<Vec<Article>>>,
    writes: Arc<RwLock<usize>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_articles(articles: Vec<Article>) -> Self {
        Self {
            articles: Arc::new(RwLock::new(articles)),
            writes: Arc::new(RwLock::new(0)),
        }
    }

    /// Number of snapshots written so far.
    pub async fn writes(&self) -> usize {
        *self.writes.read().await
    }
}

#[async_trait]
impl ArticleStore for InMemoryStore {
    async fn load(&self) -> Result<Vec<Article>> {
        Ok(self.articles.read().await.clone())
    }

    async fn replace(&self, articles: &[Article]) -> Result<()> {
        let mut store = self.articles.write().await;
        *store = articles.to_vec();
        *self.writes.write().await += 1;
        Ok(())
    }
}
