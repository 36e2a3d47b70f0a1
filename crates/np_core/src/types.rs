use serde::{Deserialize, Deserializer, Serialize};

use crate::identity::{generate_short_id, DEFAULT_ID_LENGTH};
use crate::text::{format_credits, truncate_chars};

pub const DEFAULT_AUTHOR: &str = "Redacción";
pub const MAX_TAGS: usize = 8;
pub const MAX_BODY_CHARS: usize = 3000;

/// A finalized article as it is persisted in the history store.
/// Every field reads as its default when absent or `null`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Article {
    #[serde(default, deserialize_with = "nullable")]
    pub id: String,
    #[serde(rename = "newspaper", default, deserialize_with = "nullable")]
    pub source: String,
    #[serde(rename = "date", default, deserialize_with = "nullable")]
    pub published_at: String,
    #[serde(default, deserialize_with = "nullable")]
    pub tags: Vec<String>,
    #[serde(default, deserialize_with = "nullable")]
    pub title: String,
    #[serde(default, deserialize_with = "nullable")]
    pub subtitle: String,
    #[serde(default, deserialize_with = "nullable")]
    pub url: String,
    #[serde(default = "default_author", deserialize_with = "nullable_author")]
    pub author: String,
    #[serde(default, deserialize_with = "nullable")]
    pub image: ArticleImage,
    #[serde(default, deserialize_with = "nullable")]
    pub body: String,
    #[serde(rename = "hash", default, deserialize_with = "nullable")]
    pub content_hash: String,
    #[serde(default, deserialize_with = "nullable")]
    pub domain: String,
    #[serde(default, deserialize_with = "nullable")]
    pub scraped_at: String,
}

fn default_author() -> String {
    DEFAULT_AUTHOR.to_string()
}

/// `null` reads as the type's default.
fn nullable<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

fn nullable_author<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?
        .filter(|author| !author.trim().is_empty())
        .unwrap_or_else(default_author))
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArticleImage {
    #[serde(default, deserialize_with = "nullable")]
    pub url: String,
    #[serde(default, deserialize_with = "nullable")]
    pub credits: String,
}

/// Image data as found on a list or detail page, before credits are folded together.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImageInfo {
    pub url: String,
    pub credits: String,
    pub alt: String,
    pub description: String,
}

impl ImageInfo {
    pub fn new(url: impl Into<String>, credits: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            credits: credits.into(),
            ..Default::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        self.url.is_empty() && self.credits.is_empty() && self.alt.is_empty() && self.description.is_empty()
    }

    /// Collapses the image into the persisted `{url, credits}` shape.
    pub fn to_article_image(&self) -> ArticleImage {
        ArticleImage {
            url: self.url.clone(),
            credits: format_credits([
                self.credits.as_str(),
                self.alt.as_str(),
                self.description.as_str(),
            ]),
        }
    }
}

/// Partial article extracted from a list page.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Stub {
    pub source: String,
    pub title: String,
    pub url: String,
    pub subtitle: String,
    pub author: String,
    pub published_at: String,
    pub tags: Vec<String>,
    pub image: ImageInfo,
    pub body: String,
}

impl Stub {
    pub fn new(source: impl Into<String>, title: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            title: title.into(),
            url: url.into(),
            ..Default::default()
        }
    }

    /// Wraps a detail page fetched directly, used when a landing URL yields no list entries.
    pub fn from_detail(
        source: impl Into<String>,
        url: impl Into<String>,
        published_at: impl Into<String>,
        detail: DetailRecord,
    ) -> Self {
        Self {
            source: source.into(),
            title: detail.title,
            url: url.into(),
            subtitle: detail.subtitle,
            author: detail.author,
            published_at: published_at.into(),
            tags: detail.tags,
            image: detail.image,
            body: detail.body,
        }
    }
}

/// Fields scraped from an article's own page. Missing values stay empty.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DetailRecord {
    pub title: String,
    pub subtitle: String,
    pub author: String,
    pub tags: Vec<String>,
    pub body: String,
    pub image: ImageInfo,
}

impl Article {
    /// Builds a record enforcing the tag, body and author limits.
    #[allow(clippy::too_many_arguments)]
    pub fn assemble(
        source: String,
        published_at: String,
        tags: Vec<String>,
        title: String,
        subtitle: String,
        url: String,
        author: String,
        image: ArticleImage,
        body: String,
    ) -> Self {
        let id = generate_short_id(&source, &published_at, &title, Some(&url), DEFAULT_ID_LENGTH)
            .unwrap_or_default();
        let author = if author.trim().is_empty() {
            DEFAULT_AUTHOR.to_string()
        } else {
            author
        };
        let mut tags = tags;
        tags.truncate(MAX_TAGS);

        Self {
            id,
            source,
            published_at,
            tags,
            title,
            subtitle,
            url,
            author,
            image,
            body: truncate_chars(&body, MAX_BODY_CHARS),
            content_hash: String::new(),
            domain: String::new(),
            scraped_at: String::new(),
        }
    }
}

impl From<Stub> for Article {
    fn from(stub: Stub) -> Self {
        let image = stub.image.to_article_image();
        Article::assemble(
            stub.source,
            stub.published_at,
            stub.tags,
            stub.title,
            stub.subtitle,
            stub.url,
            stub.author,
            image,
            stub.body,
        )
    }
}
