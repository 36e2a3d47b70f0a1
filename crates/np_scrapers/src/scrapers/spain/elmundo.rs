use lazy_static::lazy_static;
use np_core::dates::normalize;
use np_core::{DetailRecord, ImageInfo, Result, Stub};
use regex::Regex;
use scraper::{ElementRef, Html, Selector};
use url::Url;

use crate::scrapers::utils::{element_text, require_article, resolve_link, select_text};
use crate::scrapers::{SiteAdapter, SourceMetadata};

const MAX_ENTRIES: usize = 25;
const MAX_LIST_TAGS: usize = 3;
const MIN_TITLE_CHARS: usize = 10;
const DEFAULT_SECTION: &str = "General";

lazy_static! {
    static ref COVER: Selector = Selector::parse("article[class*='ue-c-cover-content']").unwrap();
    static ref COVER_HEADLINE: Selector = Selector::parse("h2.ue-c-cover-content__headline").unwrap();
    static ref COVER_LINK: Selector =
        Selector::parse("a.ue-c-cover-content__link-whole-content").unwrap();
    static ref COVER_AUTHOR: Selector = Selector::parse("a[href*='autor']").unwrap();
    static ref COVER_KICKER: Selector = Selector::parse("[class*='ue-c-cover-content__kicker']").unwrap();
    static ref PARAGRAPH: Selector = Selector::parse("p").unwrap();
    static ref IMG: Selector = Selector::parse("img").unwrap();
    static ref STANDFIRST: Selector = Selector::parse("div.ue-c-article__standfirst").unwrap();
    static ref HEADER_CONTENT: Selector = Selector::parse("div.ue-l-article__header-content").unwrap();
    static ref LEAD_PARAGRAPH: Selector = Selector::parse("p.ue-c-article__paragraph").unwrap();
    static ref AUTHOR_NAME: Selector = Selector::parse(".ue-c-article__author-name-item").unwrap();
    static ref MEDIA: Selector = Selector::parse("figure[class*='ue-c-article__media']").unwrap();
    static ref MEDIA_AUTHOR: Selector = Selector::parse(".ue-c-article__media-author").unwrap();
    static ref MEDIA_DESCRIPTION: Selector = Selector::parse(".ue-c-article__media-description").unwrap();
    static ref KICKER: Selector = Selector::parse(".ue-c-article__kicker").unwrap();
    static ref HEADLINE: Selector = Selector::parse("h1.ue-c-article__headline").unwrap();
    static ref LAYOUT_BODY: Selector = Selector::parse("div[class*='ue-l-article__body']").unwrap();
    static ref SECTION_BODY: Selector = Selector::parse("div[data-section='articleBody']").unwrap();
    // Page furniture nested inside the article body
    static ref NOT_EDITORIAL: Regex = Regex::new(r"listing|taboola|cover-content|newsletter").unwrap();
}

#[derive(Debug, Clone, Copy, Default)]
pub struct ElMundoAdapter;

impl ElMundoAdapter {
    fn cover_entry(&self, article: ElementRef, origin: &Url) -> Option<Stub> {
        let title = select_text(article, &COVER_HEADLINE);
        if title.chars().count() < MIN_TITLE_CHARS {
            return None;
        }
        let link = article.select(&COVER_LINK).next()?;
        let url = resolve_link(link.value().attr("href")?, origin)?;

        let mut stub = Stub::new(self.source_metadata().name, title, url);
        stub.author = select_text(article, &COVER_AUTHOR);
        stub.subtitle = select_text(article, &PARAGRAPH);
        stub.published_at = normalize(None);

        let kicker = select_text(article, &COVER_KICKER);
        stub.tags = if kicker.is_empty() {
            vec![DEFAULT_SECTION.to_string()]
        } else {
            vec![kicker]
        };
        stub.tags.truncate(MAX_LIST_TAGS);

        if let Some(img) = article.select(&IMG).next() {
            let attr = |name: &str| img.value().attr(name).map(str::trim).unwrap_or_default();
            let source = ["src", "data-src", "data-srcset", "srcset"]
                .into_iter()
                .map(attr)
                .find(|value| !value.is_empty())
                .unwrap_or_default();
            stub.image = ImageInfo {
                url: first_candidate(source),
                alt: attr("alt").to_string(),
                ..Default::default()
            };
        }
        Some(stub)
    }

    fn subtitle(&self, root: ElementRef) -> String {
        if let Some(standfirst) = root.select(&STANDFIRST).next() {
            return match standfirst.select(&PARAGRAPH).next() {
                Some(p) => element_text(p),
                None => element_text(standfirst),
            };
        }
        let header = root.select(&HEADER_CONTENT).next().unwrap_or(root);
        select_text(header, &LEAD_PARAGRAPH)
    }

    /// First line of the byline; the rest is a role such as "Enviado especial".
    fn author(&self, root: ElementRef) -> String {
        root.select(&AUTHOR_NAME)
            .next()
            .and_then(|byline| {
                byline
                    .text()
                    .flat_map(str::lines)
                    .map(str::trim)
                    .find(|line| !line.is_empty())
                    .map(str::to_string)
            })
            .unwrap_or_default()
    }

    fn image(&self, root: ElementRef) -> ImageInfo {
        let Some(figure) = root.select(&MEDIA).next() else {
            return ImageInfo::default();
        };
        let mut image = ImageInfo {
            credits: select_text(figure, &MEDIA_AUTHOR),
            description: select_text(figure, &MEDIA_DESCRIPTION),
            ..Default::default()
        };
        if let Some(img) = figure.select(&IMG).next() {
            let attr = |name: &str| img.value().attr(name).map(str::trim).unwrap_or_default();
            image.url = ["src", "data-src"]
                .into_iter()
                .map(attr)
                .find(|value| !value.is_empty())
                .map(str::to_string)
                .unwrap_or_else(|| {
                    let srcset = ["srcset", "data-srcset"]
                        .into_iter()
                        .map(attr)
                        .find(|value| !value.is_empty())
                        .unwrap_or_default();
                    first_candidate(srcset)
                });
            image.alt = attr("alt").to_string();
        }
        image
    }

    fn body(&self, root: ElementRef) -> String {
        let Some(container) = root
            .select(&SECTION_BODY)
            .next()
            .or_else(|| root.select(&LAYOUT_BODY).next())
        else {
            return String::new();
        };
        container
            .select(&PARAGRAPH)
            .filter(|p| !inside_page_furniture(*p))
            .map(element_text)
            .filter(|text| !text.is_empty())
            .collect::<Vec<_>>()
            .join("\n\n")
    }
}

/// URL of the first entry of a `srcset`-style list, or the value itself.
fn first_candidate(value: &str) -> String {
    value
        .split(',')
        .next()
        .and_then(|entry| entry.split_whitespace().next())
        .unwrap_or_default()
        .to_string()
}

fn inside_page_furniture(paragraph: ElementRef) -> bool {
    paragraph
        .ancestors()
        .filter_map(ElementRef::wrap)
        .any(|ancestor| ancestor.value().classes().any(|class| NOT_EDITORIAL.is_match(class)))
}

impl SiteAdapter for ElMundoAdapter {
    fn source_metadata(&self) -> SourceMetadata {
        SourceMetadata {
            name: "El Mundo",
            host: "elmundo.es",
            landing_url: "https://www.elmundo.es",
        }
    }

    fn extract_list(&self, document: &Html, origin: &Url) -> Vec<Stub> {
        document
            .select(&COVER)
            .take(MAX_ENTRIES)
            .filter_map(|article| self.cover_entry(article, origin))
            .collect()
    }

    fn extract_detail(&self, document: &Html) -> Result<DetailRecord> {
        let root = document.root_element();
        let kicker = select_text(root, &KICKER);
        let detail = DetailRecord {
            title: select_text(root, &HEADLINE),
            subtitle: self.subtitle(root),
            author: self.author(root),
            tags: if kicker.is_empty() { Vec::new() } else { vec![kicker] },
            body: self.body(root),
            image: self.image(root),
        };
        require_article(detail, self.source_metadata().name)
    }
}
