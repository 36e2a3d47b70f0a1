//! Page fetching with rotating browser identities and randomized pacing.

use async_trait::async_trait;
use np_core::{Error, Result};
use rand::Rng;
use reqwest::header::USER_AGENT;
use std::time::Duration;
use tracing::debug;

pub mod user_agents;

pub use user_agents::UaCategory;

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(15);
pub const DEFAULT_MAX_JITTER: Duration = Duration::from_millis(500);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpConfig {
    /// Per-request timeout.
    pub timeout: Duration,
    /// Upper bound of the random pause taken before every request.
    pub max_jitter: Duration,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout: DEFAULT_TIMEOUT,
            max_jitter: DEFAULT_MAX_JITTER,
        }
    }
}

/// Per-call identity options.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FetchOptions {
    pub ua_category: Option<UaCategory>,
    pub mutate_ua: bool,
    pub allow_bots: bool,
    /// Extra request headers. A `User-Agent` given here is sent as is.
    pub headers: Vec<(String, String)>,
}

impl FetchOptions {
    fn has_user_agent(&self) -> bool {
        self.headers
            .iter()
            .any(|(name, _)| name.eq_ignore_ascii_case(USER_AGENT.as_str()))
    }
}

#[async_trait]
pub trait Fetcher: Send + Sync {
    /// Body of the page at `url`.
    async fn fetch(&self, url: &str, options: &FetchOptions) -> Result<String>;
}

#[derive(Debug, Clone)]
pub struct HttpClient {
    client: reqwest::Client,
    config: HttpConfig,
}

impl HttpClient {
    pub fn new(config: HttpConfig) -> Result<Self> {
        let client = reqwest::Client::builder().timeout(config.timeout).build()?;
        Ok(Self { client, config })
    }

    pub fn config(&self) -> &HttpConfig {
        &self.config
    }
}

pub fn validate_url(url: &str) -> Result<()> {
    if url.starts_with("http://") || url.starts_with("https://") {
        Ok(())
    } else {
        Err(Error::InvalidUrl(format!(
            "{} (must start with http:// or https://)",
            url
        )))
    }
}

/// User-Agent to send, or `None` when the caller already set one.
pub fn choose_identity(options: &FetchOptions) -> Result<Option<String>> {
    if options.ua_category.is_some_and(|c| c.is_automated()) && !options.allow_bots {
        return Err(Error::Config(
            "automated User-Agent category requires allow_bots".to_string(),
        ));
    }
    if options.has_user_agent() {
        return Ok(None);
    }

    let mut rng = rand::thread_rng();
    let ua = user_agents::random_user_agent(options.ua_category, &mut rng);
    let ua = if options.mutate_ua {
        user_agents::mutate_prefix(ua, &mut rng)
    } else {
        ua.to_string()
    };
    Ok(Some(ua))
}

/// Uniform pause in `[0, max]`.
pub fn jitter(max: Duration) -> Duration {
    let max_ms = max.as_millis() as u64;
    if max_ms == 0 {
        return Duration::ZERO;
    }
    Duration::from_millis(rand::thread_rng().gen_range(0..=max_ms))
}

#[async_trait]
impl Fetcher for HttpClient {
    async fn fetch(&self, url: &str, options: &FetchOptions) -> Result<String> {
        validate_url(url)?;
        let identity = choose_identity(options)?;

        let pause = jitter(self.config.max_jitter);
        tokio::time::sleep(pause).await;

        let mut request = self.client.get(url);
        if let Some(ua) = &identity {
            request = request.header(USER_AGENT, ua.as_str());
        }
        for (name, value) in &options.headers {
            request = request.header(name.as_str(), value.as_str());
        }
        debug!(url, user_agent = ?identity, pause_ms = pause.as_millis() as u64, "Fetching page");

        let response = request.send().await.map_err(|e| Error::Fetch {
            url: url.to_string(),
            status: e.status().map(|s| s.as_u16()),
            message: e.to_string(),
        })?;

        let status = response.status();
        if !status.is_success() {
            return Err(Error::Fetch {
                url: url.to_string(),
                status: Some(status.as_u16()),
                message: status
                    .canonical_reason()
                    .unwrap_or("unexpected status")
                    .to_string(),
            });
        }

        Ok(response.text().await?)
    }
}
