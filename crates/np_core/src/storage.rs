use async_trait::async_trait;
use crate::types::Article;
use crate::Result;

#[async_trait]
pub trait ArticleStore: Send + Sync {
    /// Load the current snapshot. A missing or unreadable snapshot is empty.
    async fn load(&self) -> Result<Vec<Article>>;

    /// Replace the whole snapshot. Readers see either the old or the new one.
    async fn replace(&self, articles: &[Article]) -> Result<()>;
}
