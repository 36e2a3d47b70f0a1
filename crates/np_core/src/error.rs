use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    #[error("Fetch error for {url} (status {}): {message}", .status.map(|s| s.to_string()).unwrap_or_else(|| "n/a".to_string()))]
    Fetch {
        url: String,
        status: Option<u16>,
        message: String,
    },

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Empty input: {0}")]
    EmptyInput(String),

    #[error("Enrichment failed: {0}")]
    Enrichment(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Unsupported source: {host}")]
    UnsupportedSource {
        host: String,
        supported: Vec<String>,
    },

    #[error("Storage error: {0}")]
    Storage(String),
}

impl Error {
    /// HTTP status carried by a fetch failure, if the server answered at all.
    pub fn status(&self) -> Option<u16> {
        match self {
            Error::Fetch { status, .. } => *status,
            _ => None,
        }
    }
}

impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        Error::Fetch {
            url: err.url().map(|u| u.to_string()).unwrap_or_default(),
            status: err.status().map(|s| s.as_u16()),
            message: err.to_string(),
        }
    }
}

impl From<url::ParseError> for Error {
    fn from(err: url::ParseError) -> Self {
        Error::InvalidUrl(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fetch_error_display() {
        let err = Error::Fetch {
            url: "https://elpais.com".to_string(),
            status: Some(503),
            message: "Service Unavailable".to_string(),
        };
        assert_eq!(err.status(), Some(503));
        assert!(err.to_string().contains("503"));

        let err = Error::Fetch {
            url: "https://elpais.com".to_string(),
            status: None,
            message: "timed out".to_string(),
        };
        assert_eq!(err.status(), None);
        assert!(err.to_string().contains("n/a"));
    }

    #[test]
    fn test_url_parse_error_maps_to_invalid_url() {
        let err: Error = url::Url::parse("not a url").unwrap_err().into();
        assert!(matches!(err, Error::InvalidUrl(_)));
    }
}
