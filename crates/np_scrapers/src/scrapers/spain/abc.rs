use lazy_static::lazy_static;
use np_core::dates::normalize;
use np_core::text::format_credits;
use np_core::{DetailRecord, ImageInfo, Result, Stub};
use scraper::{ElementRef, Html, Selector};
use url::Url;

use crate::scrapers::utils::{
    collect_tags, element_text, og_image, paragraphs_body, require_article, resolve_link, select_attr,
    select_text,
};
use crate::scrapers::{SiteAdapter, SourceMetadata};

const MAX_ENTRIES: usize = 25;
const MAX_PARAGRAPHS: usize = 12;
const MIN_TITLE_CHARS: usize = 10;

lazy_static! {
    static ref WRAPPER: Selector = Selector::parse("div.voc-wrapper").unwrap();
    static ref ARTICLE: Selector = Selector::parse("article").unwrap();
    static ref HEADLINE_LINK: Selector = Selector::parse("h2 a").unwrap();
    static ref LIST_AUTHOR: Selector = Selector::parse("span.voc-onplus__author").unwrap();
    static ref TIME: Selector = Selector::parse("time").unwrap();
    static ref TITLE: Selector = Selector::parse("h1.voc-title").unwrap();
    static ref SUBTITLE: Selector = Selector::parse("h2.voc-subtitle").unwrap();
    static ref AUTHOR: Selector = Selector::parse("section.voc-author p.voc-author__name a").unwrap();
    static ref TOPICS: Selector = Selector::parse("nav.voc-topics__header a.voc-topics__link").unwrap();
    static ref PARAGRAPH: Selector = Selector::parse("p.voc-p").unwrap();
    static ref LEAD_IMG: Selector = Selector::parse("figure.voc-img-figure img.voc-img[src]").unwrap();
    static ref ANY_IMG: Selector = Selector::parse("img.voc-img[src]").unwrap();
    static ref ALT_IMG: Selector = Selector::parse("figure.voc-img-figure img.voc-img, img.voc-img").unwrap();
    static ref CAPTION: Selector = Selector::parse(
        "figure.voc-img-figure + figcaption, figure.voc-img-figure figcaption, figcaption.voc-figcaption-container"
    )
    .unwrap();
    static ref CAPTION_TEXT: Selector = Selector::parse("span.voc-figcaption--text").unwrap();
    static ref CAPTION_AUTHOR: Selector = Selector::parse("span.voc-figcaption--author").unwrap();
}

#[derive(Debug, Clone, Copy, Default)]
pub struct AbcAdapter;

impl AbcAdapter {
    fn list_entry(&self, article: ElementRef, origin: &Url) -> Option<Stub> {
        let link = article.select(&HEADLINE_LINK).next()?;
        let title = match link.value().attr("title").map(str::trim) {
            Some(title) if !title.is_empty() => np_core::text::clean_text(title),
            _ => element_text(link),
        };
        if title.chars().count() < MIN_TITLE_CHARS {
            return None;
        }
        let url = resolve_link(link.value().attr("href")?, origin)?;

        let mut stub = Stub::new(self.source_metadata().name, title, url);
        stub.author = select_text(article, &LIST_AUTHOR);
        let datetime = select_attr(article, &TIME, "datetime");
        stub.published_at = normalize(Some(datetime.as_str()));
        Some(stub)
    }

    fn image(&self, document: &Html) -> ImageInfo {
        let root = document.root_element();
        let url = [&*LEAD_IMG, &*ANY_IMG]
            .iter()
            .map(|selector| select_attr(root, selector, "src"))
            .find(|src| !src.is_empty())
            .unwrap_or_else(|| og_image(document));

        let (mut caption, author) = match root.select(&CAPTION).next() {
            Some(figcaption) => (
                select_text(figcaption, &CAPTION_TEXT),
                select_text(figcaption, &CAPTION_AUTHOR),
            ),
            None => (String::new(), String::new()),
        };
        if caption.is_empty() {
            caption = select_attr(root, &ALT_IMG, "alt");
        }

        ImageInfo::new(url, format_credits([caption.as_str(), author.as_str()]))
    }
}

impl SiteAdapter for AbcAdapter {
    fn source_metadata(&self) -> SourceMetadata {
        SourceMetadata {
            name: "ABC",
            host: "abc.es",
            landing_url: "https://www.abc.es",
        }
    }

    fn extract_list(&self, document: &Html, origin: &Url) -> Vec<Stub> {
        let Some(wrapper) = document.select(&WRAPPER).next() else {
            return Vec::new();
        };
        wrapper
            .select(&ARTICLE)
            .take(MAX_ENTRIES)
            .filter_map(|article| self.list_entry(article, origin))
            .collect()
    }

    fn extract_detail(&self, document: &Html) -> Result<DetailRecord> {
        let root = document.root_element();
        let tags = root.select(&TOPICS).map(|link| match link.value().attr("title") {
            Some(title) if !title.trim().is_empty() => title.to_string(),
            _ => element_text(link),
        });

        let detail = DetailRecord {
            title: select_text(root, &TITLE),
            subtitle: select_text(root, &SUBTITLE),
            author: select_text(root, &AUTHOR),
            tags: collect_tags(tags),
            body: paragraphs_body(root.select(&PARAGRAPH).take(MAX_PARAGRAPHS), 30),
            image: self.image(document),
        };
        require_article(detail, self.source_metadata().name)
    }
}
