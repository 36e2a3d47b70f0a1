use lazy_static::lazy_static;
use np_core::dates::normalize;
use np_core::text::clean_text;
use np_core::{DetailRecord, ImageInfo, Result, Stub};
use regex::Regex;
use scraper::{ElementRef, Html, Selector};
use url::Url;

use crate::scrapers::utils::{
    collect_tags, element_text, og_image, require_article, resolve_link, select_attr, select_text,
};
use crate::scrapers::{SiteAdapter, SourceMetadata};

const MAX_ENTRIES: usize = 25;
const MAX_PARAGRAPHS: usize = 20;
const MIN_PARAGRAPH_CHARS: usize = 30;

lazy_static! {
    static ref LIST_ARTICLE: Selector = Selector::parse("main article").unwrap();
    static ref HEADLINE_LINK: Selector = Selector::parse("h2 a").unwrap();
    static ref LIST_AUTHOR: Selector = Selector::parse("div.article__author a").unwrap();
    static ref LAUNCHER_TIME: Selector = Selector::parse("time[data-module-launcher-config]").unwrap();
    static ref TITLE: Selector = Selector::parse("h1.article-maintitle").unwrap();
    static ref SUBTITLE: Selector = Selector::parse("h2.article-main__description").unwrap();
    static ref AUTHOR: Selector = Selector::parse("div.article-authorname a").unwrap();
    static ref TAGS: Selector = Selector::parse("ul.article-tags-list li a").unwrap();
    static ref BODY_CONTAINERS: Vec<Selector> = [
        "div#intext",
        "div[class*='article-main'], div[class*='article-body']",
        "article",
        "main",
    ]
    .iter()
    .map(|css| Selector::parse(css).unwrap())
    .collect();
    static ref PARAGRAPH: Selector = Selector::parse("p").unwrap();
    static ref PICTURE_IMG: Selector = Selector::parse("picture img").unwrap();
    static ref IMG_SRC: Selector = Selector::parse("img[src]").unwrap();
    static ref CAPTION: Selector = Selector::parse("figcaption").unwrap();
    static ref PHOTO_HOST: Regex = Regex::new(r"fotografias.*larazon\.es").unwrap();
}

#[derive(Debug, Clone, Copy, Default)]
pub struct LaRazonAdapter;

impl LaRazonAdapter {
    fn list_entry(&self, article: ElementRef, origin: &Url) -> Option<Stub> {
        let link = article.select(&HEADLINE_LINK).next()?;
        let title = element_text(link);
        if title.is_empty() {
            return None;
        }
        let url = resolve_link(link.value().attr("href")?, origin)?;

        let mut stub = Stub::new(self.source_metadata().name, title, url);
        stub.author = select_text(article, &LIST_AUTHOR);
        let launcher = select_attr(article, &LAUNCHER_TIME, "data-module-launcher-config");
        stub.published_at = normalize(Some(launcher.as_str()));
        Some(stub)
    }

    fn body(&self, root: ElementRef) -> String {
        let container = BODY_CONTAINERS
            .iter()
            .find_map(|selector| root.select(selector).next())
            .unwrap_or(root);

        container
            .select(&PARAGRAPH)
            .take(MAX_PARAGRAPHS)
            .map(element_text)
            .filter(|text| {
                let lower = text.to_lowercase();
                !lower.contains("publicidad") && !lower.contains("anuncio")
            })
            .filter(|text| text.chars().count() >= MIN_PARAGRAPH_CHARS)
            .collect::<Vec<_>>()
            .join(" ")
    }

    fn image(&self, document: &Html) -> ImageInfo {
        let root = document.root_element();

        if let Some(img) = root.select(&PICTURE_IMG).next() {
            let src = img.value().attr("src").unwrap_or_default();
            if src.contains("fotografias-2.larazon.es") {
                let credits = img
                    .ancestors()
                    .filter_map(ElementRef::wrap)
                    .find(|el| el.value().name() == "figure")
                    .and_then(|figure| figure.select(&CAPTION).next())
                    .map(|caption| clean_text(&caption.text().collect::<String>()))
                    .unwrap_or_default();
                return ImageInfo::new(src, credits);
            }
        }

        if let Some(src) = root
            .select(&IMG_SRC)
            .filter_map(|img| img.value().attr("src"))
            .find(|src| PHOTO_HOST.is_match(src))
        {
            return ImageInfo::new(src, "");
        }

        ImageInfo::new(og_image(document), "")
    }
}

impl SiteAdapter for LaRazonAdapter {
    fn source_metadata(&self) -> SourceMetadata {
        SourceMetadata {
            name: "La Razón",
            host: "larazon.es",
            landing_url: "https://www.larazon.es",
        }
    }

    fn extract_list(&self, document: &Html, origin: &Url) -> Vec<Stub> {
        document
            .select(&LIST_ARTICLE)
            .take(MAX_ENTRIES)
            .filter_map(|article| self.list_entry(article, origin))
            .collect()
    }

    fn extract_detail(&self, document: &Html) -> Result<DetailRecord> {
        let root = document.root_element();
        let detail = DetailRecord {
            title: select_text(root, &TITLE),
            subtitle: select_text(root, &SUBTITLE),
            author: select_text(root, &AUTHOR),
            tags: collect_tags(root.select(&TAGS).map(element_text)),
            body: self.body(root),
            image: self.image(document),
        };
        require_article(detail, self.source_metadata().name)
    }
}
