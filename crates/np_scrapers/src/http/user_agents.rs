//! Pool of User-Agent strings grouped by device class.
//!
//! The default pool is desktop + mobile + tablet. Automated identities
//! (headless browsers, curl, wget, crawlers) are only handed out when the
//! caller asks for them explicitly.

use np_core::{Error, Result};
use rand::seq::SliceRandom;
use rand::Rng;
use std::str::FromStr;

const DESKTOP: &[&str] = &[
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36",
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36",
    "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/119.0.0.0 Safari/537.36",
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64; rv:121.0) Gecko/20100101 Firefox/121.0",
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/605.1.15 (KHTML, like Gecko) Version/15.6 Safari/605.1.15",
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36 Edg/120.0.0.0",
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) OPR/82.0.4396.61",
    "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Brave/1.50.0 Chrome/120.0.0.0 Safari/537.36",
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Vivaldi/6.0 Chrome/120.0.0.0 Safari/537.36",
];

const MOBILE: &[&str] = &[
    "Mozilla/5.0 (iPhone; CPU iPhone OS 16_0 like Mac OS X) AppleWebKit/605.1.15 (KHTML, like Gecko) Version/16.0 Mobile/15E148 Safari/604.1",
    "Mozilla/5.0 (Linux; Android 13; Pixel 6) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Mobile Safari/537.36",
    "Mozilla/5.0 (Linux; Android 12; SM-G998B) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Mobile Safari/537.36 SamsungBrowser/20.0",
    "Mozilla/5.0 (Linux; U; Android 10; es-es; SM-A505FN Build/QP1A) AppleWebKit/537.36 (KHTML, like Gecko) Version/4.0 Chrome/83.0.4103.106 Mobile Safari/537.36 UCBrowser/13.3.8.1306",
];

const TABLET: &[&str] = &[
    "Mozilla/5.0 (iPad; CPU OS 16_0 like Mac OS X) AppleWebKit/605.1.15 (KHTML, like Gecko) Version/16.0 Mobile/15E148 Safari/604.1",
    "Mozilla/5.0 (Android 12; Tablet; rv:120.0) Gecko/120.0 Firefox/120.0",
    "Mozilla/5.0 (Linux; Android 11; SAMSUNG SM-T870) AppleWebKit/537.36 (KHTML, like Gecko) SamsungBrowser/20.0 Chrome/120.0 Safari/537.36",
];

const HEADLESS: &[&str] = &[
    "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) HeadlessChrome/120.0.0.0 Safari/537.36",
    "curl/7.79.1",
    "Wget/1.21.3 (linux-gnu)",
];

const ELECTRON: &[&str] = &[
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Electron/25.0.0 Safari/537.36",
    "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Electron/24.0.0 Chrome/118.0.0.0 Safari/537.36",
];

const SMART_TV: &[&str] = &[
    "Mozilla/5.0 (SMART-TV; Linux; Tizen 6.0) AppleWebKit/537.36 (KHTML, like Gecko) SamsungBrowser/4.0 TV Safari/537.36",
    "Mozilla/5.0 (Web0S; Linux; LG NetCast) AppleWebKit/537.36 (KHTML, like Gecko) Web0S/2.0 Safari/537.36",
    "Roku/DVP-9.20 (Roku 3)",
];

const AUTOMATED: &[&str] = &[
    "Mozilla/5.0 (compatible; Googlebot/2.1; +http://www.google.com/bot.html)",
    "Mozilla/5.0 (compatible; bingbot/2.0; +http://www.bing.com/bingbot.htm)",
    "curl/7.79.1",
    "Wget/1.21.3 (linux-gnu)",
    "python-requests/2.31.0",
];

/// Replacements for the leading product token of a browser identity.
const PREFIX_ALTERNATIVES: &[&str] = &[
    "Mozilla/5.0",
    "Mozilla/4.0",
    "Chrome/120.0.0.0",
    "HeadlessChrome/120.0.0.0",
    "Edg/120.0.0.0",
    "Safari/605.1.15",
    "OPR/82.0.4396.61",
    "Dalvik/2.1.0",
    "AndroidWebView/120.0.0.0",
    "Python-urllib/3.10",
    "python-requests/2.31.0",
    "Go-http-client/1.1",
    "curl/7.79.1",
    "Wget/1.21.3",
    "Lynx/2.8.9rel.1 libwww-FM/2.14",
    "W3C_Validator/1.3",
    "AppName/1.0",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UaCategory {
    Desktop,
    Mobile,
    Tablet,
    Headless,
    Electron,
    SmartTv,
    Automated,
    Chrome,
    Firefox,
    Safari,
    Edge,
    Opera,
    Samsung,
    Curl,
    Wget,
}

impl UaCategory {
    pub const ALL: &'static [UaCategory] = &[
        UaCategory::Desktop,
        UaCategory::Mobile,
        UaCategory::Tablet,
        UaCategory::Headless,
        UaCategory::Electron,
        UaCategory::SmartTv,
        UaCategory::Automated,
        UaCategory::Chrome,
        UaCategory::Firefox,
        UaCategory::Safari,
        UaCategory::Edge,
        UaCategory::Opera,
        UaCategory::Samsung,
        UaCategory::Curl,
        UaCategory::Wget,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            UaCategory::Desktop => "desktop",
            UaCategory::Mobile => "mobile",
            UaCategory::Tablet => "tablet",
            UaCategory::Headless => "headless",
            UaCategory::Electron => "electron",
            UaCategory::SmartTv => "smarttv",
            UaCategory::Automated => "bot",
            UaCategory::Chrome => "chrome",
            UaCategory::Firefox => "firefox",
            UaCategory::Safari => "safari",
            UaCategory::Edge => "edge",
            UaCategory::Opera => "opera",
            UaCategory::Samsung => "samsung",
            UaCategory::Curl => "curl",
            UaCategory::Wget => "wget",
        }
    }

    pub fn is_automated(&self) -> bool {
        matches!(self, UaCategory::Automated)
    }

    pub fn pool(&self) -> Vec<&'static str> {
        match self {
            UaCategory::Desktop => DESKTOP.to_vec(),
            UaCategory::Mobile => MOBILE.to_vec(),
            UaCategory::Tablet => TABLET.to_vec(),
            UaCategory::Headless => HEADLESS.to_vec(),
            UaCategory::Electron => ELECTRON.to_vec(),
            UaCategory::SmartTv => SMART_TV.to_vec(),
            UaCategory::Automated => AUTOMATED.to_vec(),
            UaCategory::Chrome => filter(DESKTOP, |ua| ua.contains("Chrome")),
            UaCategory::Firefox => filter(DESKTOP, |ua| ua.contains("Firefox")),
            UaCategory::Safari => filter(DESKTOP, |ua| ua.contains("Safari") && !ua.contains("Chrome")),
            UaCategory::Edge => filter(DESKTOP, |ua| ua.contains("Edg")),
            UaCategory::Opera => filter(DESKTOP, |ua| ua.contains("OPR/")),
            UaCategory::Samsung => MOBILE
                .iter()
                .chain(TABLET.iter())
                .copied()
                .filter(|ua| ua.contains("SamsungBrowser") || ua.contains("SAMSUNG"))
                .collect(),
            UaCategory::Curl => filter(HEADLESS, |ua| ua.to_lowercase().starts_with("curl")),
            UaCategory::Wget => filter(HEADLESS, |ua| ua.to_lowercase().starts_with("wget")),
        }
    }
}

impl FromStr for UaCategory {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let wanted = s.trim().to_lowercase();
        if wanted == "bots" || wanted == "automated" {
            return Ok(UaCategory::Automated);
        }
        UaCategory::ALL
            .iter()
            .copied()
            .find(|c| c.name() == wanted)
            .ok_or_else(|| Error::Config(format!("Unknown User-Agent category: {}", s)))
    }
}

fn filter(pool: &[&'static str], keep: impl Fn(&str) -> bool) -> Vec<&'static str> {
    pool.iter().copied().filter(|ua| keep(ua)).collect()
}

/// Identities used when no category is requested.
pub fn default_pool() -> Vec<&'static str> {
    DESKTOP.iter().chain(MOBILE).chain(TABLET).copied().collect()
}

/// Picks an identity from `category`, or from the default pool when no
/// category is given or the category is empty.
pub fn random_user_agent<R: Rng + ?Sized>(category: Option<UaCategory>, rng: &mut R) -> &'static str {
    let mut pool = category.map(|c| c.pool()).unwrap_or_default();
    if pool.is_empty() {
        pool = default_pool();
    }
    pool.choose(rng).copied().unwrap_or(DESKTOP[0])
}

/// True for identities that already announce themselves as tools or crawlers.
pub fn is_automated_identity(ua: &str) -> bool {
    let lower = ua.to_lowercase();
    lower.starts_with("curl") || lower.starts_with("wget") || lower.contains("bot")
}

/// Swaps the first product token of `ua` for a random alternative.
/// Single-token and automated identities are returned untouched.
pub fn mutate_prefix<R: Rng + ?Sized>(ua: &str, rng: &mut R) -> String {
    if ua.is_empty() || is_automated_identity(ua) {
        return ua.to_string();
    }
    match ua.split_once(' ') {
        Some((_, rest)) => {
            let prefix = PREFIX_ALTERNATIVES.choose(rng).copied().unwrap_or("Mozilla/5.0");
            format!("{} {}", prefix, rest)
        }
        None => ua.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_default_pool_excludes_automated() {
        let pool = default_pool();
        assert_eq!(pool.len(), DESKTOP.len() + MOBILE.len() + TABLET.len());
        assert!(pool.iter().all(|ua| !is_automated_identity(ua)));
    }

    #[test]
    fn test_every_category_has_identities() {
        for category in UaCategory::ALL {
            assert!(!category.pool().is_empty(), "{} is empty", category.name());
        }
    }

    #[test]
    fn test_category_from_str() {
        assert_eq!("Mobile".parse::<UaCategory>().unwrap(), UaCategory::Mobile);
        assert_eq!("bots".parse::<UaCategory>().unwrap(), UaCategory::Automated);
        assert_eq!("bot".parse::<UaCategory>().unwrap(), UaCategory::Automated);
        assert!("fridge".parse::<UaCategory>().is_err());
    }

    #[test]
    fn test_random_user_agent_respects_category() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..20 {
            let ua = random_user_agent(Some(UaCategory::Tablet), &mut rng);
            assert!(TABLET.contains(&ua));
            let ua = random_user_agent(None, &mut rng);
            assert!(default_pool().contains(&ua));
        }
    }

    #[test]
    fn test_mutate_prefix_replaces_first_token() {
        let mut rng = StdRng::seed_from_u64(42);
        let ua = DESKTOP[0];
        let rest = ua.split_once(' ').unwrap().1;
        for _ in 0..20 {
            let mutated = mutate_prefix(ua, &mut rng);
            let (prefix, tail) = mutated.split_once(' ').unwrap();
            assert!(tail.ends_with(rest) || mutated.ends_with(rest));
            assert!(PREFIX_ALTERNATIVES.iter().any(|p| p.starts_with(prefix)));
        }
    }

    #[test]
    fn test_mutate_prefix_skips_single_token_and_automated() {
        let mut rng = StdRng::seed_from_u64(1);
        assert_eq!(mutate_prefix("Roku/DVP-9.20", &mut rng), "Roku/DVP-9.20");
        assert_eq!(mutate_prefix("curl/7.79.1", &mut rng), "curl/7.79.1");
        assert_eq!(mutate_prefix(AUTOMATED[0], &mut rng), AUTOMATED[0]);
        assert_eq!(mutate_prefix("", &mut rng), "");
    }
}
