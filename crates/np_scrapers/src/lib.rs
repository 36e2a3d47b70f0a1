pub mod cli;
pub mod http;
pub mod logging;
pub mod pipeline;
pub mod scrapers;

pub use cli::{handle_command, FetchArgs, ScraperArgs, ScraperCommands};
pub use http::{FetchOptions, Fetcher, HttpClient, HttpConfig, UaCategory};
pub use pipeline::{Pipeline, PipelineConfig, RunReport};
pub use scrapers::{SiteAdapter, SourceMetadata, SourceRegistry};

pub mod prelude {
    pub use super::http::{FetchOptions, Fetcher};
    pub use super::pipeline::{Pipeline, PipelineConfig};
    pub use super::scrapers::{SiteAdapter, SourceRegistry};
    pub use np_core::{Article, Error, Result};
}
