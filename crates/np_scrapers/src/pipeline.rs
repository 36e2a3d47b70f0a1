use chrono::Utc;
use np_core::dates::now_iso;
use np_core::identity::content_hash;
use np_core::{Article, ArticleStore, DetailRecord, Error, Result, Stub};
use np_storage::{merge_history, HistoryMerge, DEFAULT_RETENTION_DAYS};
use scraper::Html;
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;
use tracing::{error, info, warn};
use url::Url;

use crate::http::{FetchOptions, Fetcher};
use crate::logging::Logger;
use crate::scrapers::{RegisteredSource, SiteAdapter, SourceRegistry};

pub const DEFAULT_INTER_SOURCE_DELAY: Duration = Duration::from_secs(2);

#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// Pause taken before each source in a batch run.
    pub inter_source_delay: Duration,
    pub retention: chrono::Duration,
    pub fetch: FetchOptions,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            inter_source_delay: DEFAULT_INTER_SOURCE_DELAY,
            retention: chrono::Duration::days(DEFAULT_RETENTION_DAYS),
            fetch: FetchOptions::default(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RunReport {
    /// Records produced by all sources this run, before dedup.
    pub scraped: usize,
    pub added: usize,
    pub expired: usize,
    /// Size of the persisted snapshot.
    pub total: usize,
    pub per_source: Vec<(String, usize)>,
    pub failed_sources: Vec<String>,
}

pub struct Pipeline {
    config: PipelineConfig,
    fetcher: Arc<dyn Fetcher>,
    store: Arc<dyn ArticleStore>,
    registry: SourceRegistry,
}

impl Pipeline {
    pub fn new(
        config: PipelineConfig,
        fetcher: Arc<dyn Fetcher>,
        store: Arc<dyn ArticleStore>,
        registry: SourceRegistry,
    ) -> Self {
        Self {
            config,
            fetcher,
            store,
            registry,
        }
    }

    pub fn registry(&self) -> &SourceRegistry {
        &self.registry
    }

    /// Scrapes every registered source in order, merges the batch into the
    /// history snapshot and persists it. Source failures are logged and
    /// skipped; only a failing store aborts the run.
    pub async fn run(&self) -> Result<RunReport> {
        let mut report = RunReport::default();
        let mut batch = Vec::new();

        for source in self.registry.sources() {
            tokio::time::sleep(self.config.inter_source_delay).await;
            let logger = Logger::new().with_prefix(source.host().to_string());
            logger.info(&format!("Scraping {}", source.metadata.landing_url));

            match self.collect(source, source.metadata.landing_url, &logger).await {
                Ok(articles) => {
                    info!(source = %source.host(), count = articles.len(), "Source scraped");
                    report.per_source.push((source.host().to_string(), articles.len()));
                    batch.extend(articles);
                }
                Err(e) => {
                    error!(source = %source.host(), error = %e, "Source failed");
                    report.failed_sources.push(source.host().to_string());
                }
            }
        }
        report.scraped = batch.len();

        let previous = self.store.load().await?;
        let HistoryMerge {
            articles,
            added,
            expired,
        } = merge_history(previous, batch, Utc::now(), self.config.retention);
        self.store.replace(&articles).await?;

        report.added = added;
        report.expired = expired;
        report.total = articles.len();
        info!(
            scraped = report.scraped,
            added = report.added,
            expired = report.expired,
            total = report.total,
            failed = report.failed_sources.len(),
            "Run complete"
        );
        Ok(report)
    }

    /// Scrapes a single page of a known source without touching the store.
    pub async fn query(&self, url: &str) -> Result<Vec<Article>> {
        let source = self.registry.resolve(url)?;
        let logger = Logger::new().with_prefix(source.host().to_string());
        self.collect(source, url, &logger).await
    }

    async fn collect(&self, source: &RegisteredSource, url: &str, logger: &Logger) -> Result<Vec<Article>> {
        let adapter = source.adapter();
        let origin = Url::parse(source.metadata.landing_url)?;
        let html = self.fetcher.fetch(url, &self.config.fetch).await?;

        let stubs = {
            let document = Html::parse_document(&html);
            adapter.extract_list(&document, &origin)
        };

        let articles = if stubs.is_empty() {
            logger.info("No list entries, reading the page as a single article");
            let detail = {
                let document = Html::parse_document(&html);
                adapter.extract_detail(&document)?
            };
            let stub = Stub::from_detail(source.metadata.name, url, now_iso(), detail);
            vec![Article::from(stub)]
        } else {
            logger.debug(&format!("{} list entries", stubs.len()));
            let mut articles = Vec::with_capacity(stubs.len());
            for stub in stubs {
                articles.push(self.enrich(adapter.as_ref(), stub, logger).await);
            }
            articles
        };

        Ok(articles
            .into_iter()
            .map(|article| finalize(article, source.host()))
            .collect())
    }

    async fn enrich(&self, adapter: &dyn SiteAdapter, stub: Stub, logger: &Logger) -> Article {
        match self.detail(adapter, &stub.url).await {
            Ok(detail) => adapter.enrich(stub, detail),
            Err(e) => {
                let failure = Error::Enrichment(e.to_string());
                warn!(url = %stub.url, error = %failure, "{}", logger.format("Keeping list data"));
                Article::from(stub)
            }
        }
    }

    async fn detail(&self, adapter: &dyn SiteAdapter, url: &str) -> Result<DetailRecord> {
        let html = self.fetcher.fetch(url, &self.config.fetch).await?;
        let document = Html::parse_document(&html);
        adapter.extract_detail(&document)
    }
}

/// Stamps the dedup hash, canonical domain and scrape time.
fn finalize(mut article: Article, host: &str) -> Article {
    article.content_hash = content_hash(&article.title, &article.url);
    article.domain = host.to_string();
    article.scraped_at = now_iso();
    article
}
