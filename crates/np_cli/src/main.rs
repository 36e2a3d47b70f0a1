use clap::Parser;
use np_scrapers::cli::{handle_command, FetchArgs, ScraperArgs, ScraperCommands};
use np_scrapers::logging::init_logging;
use np_scrapers::{HttpClient, Pipeline, PipelineConfig, SourceRegistry};
use np_storage::{create_store, StoreKind, DEFAULT_RETENTION_DAYS, DEFAULT_STORE_PATH};
use np_web::AppState;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;
use tracing::{error, info};

const TOO_LARGE: &str = "Duration is too large";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct HumanDuration(Duration);

impl FromStr for HumanDuration {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let mut total_seconds = 0u64;
        let mut current_number = String::new();
        let mut has_unit = false;

        for c in s.chars() {
            if c.is_ascii_digit() {
                current_number.push(c);
            } else if !current_number.is_empty() {
                let num = current_number
                    .parse::<u64>()
                    .map_err(|_| "Invalid number in duration".to_string())?;
                let unit = match c {
                    's' => 1,
                    'm' => 60,
                    'h' => 3600,
                    'd' => 86400,
                    _ => return Err(format!("Invalid duration unit: {}", c)),
                };
                total_seconds = num
                    .checked_mul(unit)
                    .and_then(|secs| total_seconds.checked_add(secs))
                    .ok_or_else(|| TOO_LARGE.to_string())?;
                current_number.clear();
                has_unit = true;
            } else if !c.is_whitespace() {
                return Err(format!("Invalid character in duration: {}", c));
            }
        }

        // A trailing bare number counts as seconds
        if !current_number.is_empty() {
            let num = current_number
                .parse::<u64>()
                .map_err(|_| "Invalid number in duration".to_string())?;
            total_seconds = total_seconds
                .checked_add(num)
                .ok_or_else(|| TOO_LARGE.to_string())?;
            has_unit = true;
        }

        if !has_unit {
            return Err("Duration must include a number".to_string());
        }
        if total_seconds == 0 {
            return Err("Duration must be greater than zero".to_string());
        }

        Ok(HumanDuration(Duration::from_secs(total_seconds)))
    }
}

#[derive(Parser, Debug)]
#[command(author, version, about = "Spanish news aggregation pipeline", long_about = None)]
struct Cli {
    /// History store backend: json or memory
    #[arg(long, default_value = "json")]
    storage: String,
    /// Path of the JSON snapshot
    #[arg(long, env = "NP_STORE", default_value = DEFAULT_STORE_PATH)]
    store: PathBuf,
    /// Seconds to wait before each source in a batch run
    #[arg(long, env = "NP_DELAY_SECS", default_value_t = 2)]
    delay_secs: u64,
    /// Days a record stays in the snapshot
    #[arg(
        long,
        env = "NP_RETENTION_DAYS",
        default_value_t = DEFAULT_RETENTION_DAYS,
        value_parser = clap::value_parser!(i64).range(1..=3650)
    )]
    retention_days: i64,
    /// Log level used when RUST_LOG is not set
    #[arg(long, default_value = "info")]
    log_level: String,
    #[command(flatten)]
    fetch: FetchArgs,
    #[command(subcommand)]
    command: Commands,
}

#[derive(clap::Subcommand, Debug)]
enum Commands {
    /// Scrape every source and update the snapshot
    Run {
        /// Repeat forever with this pause between runs (e.g. 1h, 30m, 1h15m30s)
        #[arg(long)]
        interval: Option<HumanDuration>,
    },
    /// Scrape one page and print the articles as JSON
    Url { url: String },
    /// List supported sources
    List,
    /// Serve the HTTP API
    Serve {
        #[arg(long, default_value = np_web::DEFAULT_ADDR)]
        addr: SocketAddr,
    },
}

impl Cli {
    fn pipeline_config(&self) -> PipelineConfig {
        PipelineConfig {
            inter_source_delay: Duration::from_secs(self.delay_secs),
            retention: chrono::Duration::days(self.retention_days),
            fetch: self.fetch.fetch_options(),
        }
    }
}

fn build_pipeline(cli: &Cli) -> anyhow::Result<Pipeline> {
    let kind = StoreKind::from_str(&cli.storage)?;
    let store = create_store(kind, Some(cli.store.clone()));
    let fetcher = HttpClient::new(cli.fetch.http_config())?;
    let registry = SourceRegistry::default();
    info!("🦗 Sources: {}", registry.hosts().join(", "));
    Ok(Pipeline::new(cli.pipeline_config(), Arc::new(fetcher), store, registry))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(&cli.log_level);

    let pipeline = build_pipeline(&cli)?;
    info!("💾 History store: {} ({})", cli.store.display(), cli.storage);

    match cli.command {
        Commands::Run { interval } => {
            let args = ScraperArgs {
                command: ScraperCommands::Run,
            };
            if let Some(HumanDuration(interval)) = interval {
                info!("Running in periodic mode with {}s interval", interval.as_secs());
                loop {
                    info!("Starting scrape cycle");
                    if let Err(e) = handle_command(args.clone(), &pipeline).await {
                        error!("Error during scrape: {}", e);
                    }
                    info!("Waiting {}s before next scrape", interval.as_secs());
                    tokio::time::sleep(interval).await;
                }
            } else {
                handle_command(args, &pipeline).await?;
            }
        }
        Commands::Url { url } => {
            info!("Scraping single URL: {}", url);
            let args = ScraperArgs {
                command: ScraperCommands::Url { url },
            };
            handle_command(args, &pipeline).await?;
        }
        Commands::List => {
            let args = ScraperArgs {
                command: ScraperCommands::List,
            };
            handle_command(args, &pipeline).await?;
        }
        Commands::Serve { addr } => {
            np_web::serve(addr, AppState::new(Arc::new(pipeline))).await?;
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_human_duration() {
        assert_eq!("1h".parse::<HumanDuration>().unwrap().0, Duration::from_secs(3600));
        assert_eq!("30m".parse::<HumanDuration>().unwrap().0, Duration::from_secs(1800));
        assert_eq!("1h15m30s".parse::<HumanDuration>().unwrap().0, Duration::from_secs(4530));
        assert_eq!("90".parse::<HumanDuration>().unwrap().0, Duration::from_secs(90));
        assert!("1w".parse::<HumanDuration>().is_err());
        assert!("h".parse::<HumanDuration>().is_err());
        assert!("0s".parse::<HumanDuration>().is_err());
    }

    #[test]
    fn test_human_duration_rejects_overflow() {
        assert_eq!(
            "213503982334602d".parse::<HumanDuration>(),
            Err("Duration is too large".to_string())
        );
        assert_eq!(
            "18446744073709551615s1s".parse::<HumanDuration>(),
            Err("Duration is too large".to_string())
        );
        assert!("99999999999999999999d".parse::<HumanDuration>().is_err());
    }

    #[test]
    fn test_retention_days_is_bounded() {
        assert!(Cli::try_parse_from(["np", "--retention-days", "100000", "run"]).is_err());
        assert!(Cli::try_parse_from(["np", "--retention-days", "0", "run"]).is_err());
        let cli = Cli::try_parse_from(["np", "--retention-days", "3650", "run"]).unwrap();
        assert_eq!(cli.pipeline_config().retention, chrono::Duration::days(3650));
    }

    #[test]
    fn test_cli_defaults() {
        let cli = Cli::try_parse_from(["np", "run"]).unwrap();
        let config = cli.pipeline_config();
        assert_eq!(config.inter_source_delay, Duration::from_secs(2));
        assert_eq!(config.retention, chrono::Duration::days(7));
        assert!(matches!(cli.command, Commands::Run { interval: None }));
    }

    #[test]
    fn test_cli_flags() {
        let cli = Cli::try_parse_from([
            "np",
            "--storage",
            "memory",
            "--ua-category",
            "mobile",
            "--delay-secs",
            "0",
            "run",
            "--interval",
            "30m",
        ])
        .unwrap();
        assert_eq!(cli.storage, "memory");
        assert_eq!(cli.pipeline_config().fetch.ua_category, Some(np_scrapers::UaCategory::Mobile));
        assert!(matches!(
            cli.command,
            Commands::Run { interval: Some(HumanDuration(d)) } if d == Duration::from_secs(1800)
        ));

        let cli = Cli::try_parse_from(["np", "serve"]).unwrap();
        assert!(matches!(cli.command, Commands::Serve { addr } if addr.port() == 5000));
    }
}
