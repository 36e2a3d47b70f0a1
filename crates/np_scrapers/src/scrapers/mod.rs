use np_core::merge::merge;
use np_core::{Article, DetailRecord, Result, Stub};
use scraper::Html;
use url::Url;

pub mod jsonld;
pub mod registry;
pub mod spain;
pub(crate) mod utils;

pub use registry::{AdapterFactory, RegisteredSource, SourceRegistry};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceMetadata {
    /// Display name stored as the article's newspaper.
    pub name: &'static str,
    /// Canonical host, also the article's `domain`.
    pub host: &'static str,
    /// Page listing the latest articles.
    pub landing_url: &'static str,
}

/// Per-site extraction over already-fetched pages. Adapters never touch the
/// network; the pipeline fetches and hands them a parsed document.
pub trait SiteAdapter: Send + Sync {
    fn source_metadata(&self) -> SourceMetadata;

    /// Article stubs found on a list page. Entries without a title or a
    /// resolvable link are skipped.
    fn extract_list(&self, document: &Html, origin: &Url) -> Vec<Stub>;

    /// Fields of a single article page. Missing values stay empty.
    fn extract_detail(&self, document: &Html) -> Result<DetailRecord>;

    fn enrich(&self, stub: Stub, detail: DetailRecord) -> Article {
        merge(stub, detail)
    }
}
