use clap::{Args, Subcommand};
use np_core::Result;
use std::time::Duration;
use tracing::warn;

use crate::http::{FetchOptions, HttpConfig, UaCategory, DEFAULT_MAX_JITTER};
use crate::pipeline::{Pipeline, RunReport};

#[derive(Args, Debug, Clone)]
pub struct ScraperArgs {
    #[command(subcommand)]
    pub command: ScraperCommands,
}

#[derive(Subcommand, Debug, Clone)]
pub enum ScraperCommands {
    /// Scrape every source once and update the history snapshot
    Run,
    /// Scrape one page of a supported source and print the articles as JSON
    Url {
        url: String,
    },
    /// List supported sources
    List,
}

/// Identity and timeout flags shared by every command that fetches pages.
#[derive(Args, Debug, Clone, Default)]
pub struct FetchArgs {
    /// User-Agent category (desktop, mobile, tablet, headless, electron, smarttv, bot, chrome, firefox, ...)
    #[arg(long, env = "NP_UA_CATEGORY")]
    pub ua_category: Option<String>,
    /// Swap the leading product token of the User-Agent
    #[arg(long, env = "NP_MUTATE_UA")]
    pub mutate_ua: bool,
    /// Allow the automated (bot) User-Agent category
    #[arg(long, env = "NP_ALLOW_BOTS")]
    pub allow_bots: bool,
    /// Per-request timeout in seconds
    #[arg(long, env = "NP_TIMEOUT_SECS", default_value_t = 15)]
    pub timeout_secs: u64,
}

impl FetchArgs {
    /// Unknown categories fall back to the default browser pool.
    pub fn fetch_options(&self) -> FetchOptions {
        let ua_category = self
            .ua_category
            .as_deref()
            .filter(|c| !c.trim().is_empty())
            .and_then(|c| match c.parse::<UaCategory>() {
                Ok(category) => Some(category),
                Err(e) => {
                    warn!("{}, using the default pool", e);
                    None
                }
            });
        FetchOptions {
            ua_category,
            mutate_ua: self.mutate_ua,
            allow_bots: self.allow_bots,
            headers: Vec::new(),
        }
    }

    pub fn http_config(&self) -> HttpConfig {
        HttpConfig {
            timeout: Duration::from_secs(self.timeout_secs),
            max_jitter: DEFAULT_MAX_JITTER,
        }
    }
}

pub async fn handle_command(args: ScraperArgs, pipeline: &Pipeline) -> Result<()> {
    match args.command {
        ScraperCommands::Run => {
            let report = pipeline.run().await?;
            println!("{}", summarize(&report));
        }
        ScraperCommands::Url { url } => {
            let articles = pipeline.query(&url).await?;
            println!("{}", serde_json::to_string_pretty(&articles)?);
        }
        ScraperCommands::List => {
            println!("Available sources:");
            for source in pipeline.registry().sources() {
                println!(
                    "  {:<14} {:<12} {}",
                    source.host(),
                    source.metadata.name,
                    source.metadata.landing_url
                );
            }
        }
    }
    Ok(())
}

pub fn summarize(report: &RunReport) -> String {
    let mut lines = vec![format!(
        "{} scraped, {} new, {} expired, {} stored",
        report.scraped, report.added, report.expired, report.total
    )];
    for (host, count) in &report.per_source {
        lines.push(format!("  {:<14} +{}", host, count));
    }
    for host in &report.failed_sources {
        lines.push(format!("  {:<14} failed", host));
    }
    lines.join("\n")
}
