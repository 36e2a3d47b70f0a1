use lazy_static::lazy_static;
use np_core::dates::normalize;
use np_core::{DetailRecord, ImageInfo, Result, Stub};
use regex::Regex;
use scraper::{ElementRef, Html, Selector};
use url::Url;

use crate::scrapers::utils::{
    collect_tags, element_text, first_text, og_image, paragraphs_body, require_article, resolve_link,
    select_attr, select_text,
};
use crate::scrapers::{SiteAdapter, SourceMetadata};

const MAX_ENTRIES: usize = 25;
const MAX_PARAGRAPHS: usize = 12;

lazy_static! {
    static ref FIGURE: Selector = Selector::parse("figure.ni-figure").unwrap();
    static ref LINK: Selector = Selector::parse("a").unwrap();
    static ref INFO_AUTHOR: Selector = Selector::parse("div.news-info div.info-wrapper p.authors a").unwrap();
    static ref INFO_TIME: Selector = Selector::parse("div.news-info time").unwrap();
    static ref TITLE: Selector = Selector::parse("h1.title").unwrap();
    static ref SUBTITLE: Selector = Selector::parse("ul.footer li.subtitle--hasAnchor h2").unwrap();
    static ref AUTHORS_LINK: Selector = Selector::parse("p.authors a").unwrap();
    static ref AUTHOR_PAGE_LINK: Selector = Selector::parse("a[href*='/autores/']").unwrap();
    static ref TAGS: Selector = Selector::parse("ul.tags-wrapper li a.tag-link").unwrap();
    static ref PARAGRAPH: Selector = Selector::parse("p.article-text").unwrap();
    static ref IMG: Selector = Selector::parse("img").unwrap();
    static ref IMG_SRC: Selector = Selector::parse("img[src]").unwrap();
    static ref PHOTO_AUTHOR: Selector = Selector::parse("figcaption.image-footer span.author").unwrap();
    static ref STATIC_JPG: Regex = Regex::new(r"static\.eldiario\.es.*\.jpg").unwrap();
}

#[derive(Debug, Clone, Copy, Default)]
pub struct ElDiarioAdapter;

impl ElDiarioAdapter {
    fn list_entry(&self, figure: ElementRef, origin: &Url) -> Option<Stub> {
        let link = figure.select(&LINK).next()?;
        let title = element_text(link);
        if title.is_empty() {
            return None;
        }
        let url = resolve_link(link.value().attr("href")?, origin)?;

        let mut stub = Stub::new(self.source_metadata().name, title, url);
        stub.author = select_text(figure, &INFO_AUTHOR);
        let datetime = select_attr(figure, &INFO_TIME, "datetime");
        stub.published_at = normalize(Some(datetime.as_str()));
        Some(stub)
    }

    fn image(&self, document: &Html) -> ImageInfo {
        let root = document.root_element();

        if let Some(figure) = root.select(&FIGURE).next() {
            if let Some(src) = figure.select(&IMG).next().and_then(|img| img.value().attr("src")) {
                if src.contains("static.eldiario.es") {
                    return ImageInfo::new(src, select_text(figure, &PHOTO_AUTHOR));
                }
            }
        }

        if let Some(src) = root
            .select(&IMG_SRC)
            .filter_map(|img| img.value().attr("src"))
            .find(|src| STATIC_JPG.is_match(src))
        {
            return ImageInfo::new(src, "");
        }

        ImageInfo::new(og_image(document), "")
    }
}

impl SiteAdapter for ElDiarioAdapter {
    fn source_metadata(&self) -> SourceMetadata {
        SourceMetadata {
            name: "elDiario.es",
            host: "eldiario.es",
            landing_url: "https://www.eldiario.es",
        }
    }

    fn extract_list(&self, document: &Html, origin: &Url) -> Vec<Stub> {
        document
            .select(&FIGURE)
            .take(MAX_ENTRIES)
            .filter_map(|figure| self.list_entry(figure, origin))
            .collect()
    }

    fn extract_detail(&self, document: &Html) -> Result<DetailRecord> {
        let root = document.root_element();
        let detail = DetailRecord {
            title: select_text(root, &TITLE),
            subtitle: select_text(root, &SUBTITLE),
            author: first_text(root, &[&*INFO_AUTHOR, &*AUTHORS_LINK, &*AUTHOR_PAGE_LINK]),
            tags: collect_tags(root.select(&TAGS).map(element_text)),
            body: paragraphs_body(root.select(&PARAGRAPH).take(MAX_PARAGRAPHS), 30),
            image: self.image(document),
        };
        require_article(detail, self.source_metadata().name)
    }
}
