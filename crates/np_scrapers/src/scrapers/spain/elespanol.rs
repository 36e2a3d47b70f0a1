use lazy_static::lazy_static;
use np_core::{DetailRecord, ImageInfo, Result, Stub};
use scraper::{Html, Selector};
use url::Url;

use crate::scrapers::utils::{
    byline_or_meta, caption_credits, editorial_body, first_text, heading_link_entry, lead_image_url,
    link_tags, meta_tags, require_article, select_text,
};
use crate::scrapers::{SiteAdapter, SourceMetadata};

const MAX_ENTRIES: usize = 25;
const MIN_TITLE_CHARS: usize = 8;
const MAX_PARAGRAPHS: usize = 30;
const MIN_PARAGRAPH_CHARS: usize = 30;

lazy_static! {
    static ref MAIN: Selector = Selector::parse("main").unwrap();
    static ref ARTICLE: Selector = Selector::parse("article").unwrap();
    static ref LIST_AUTHOR: Selector = Selector::parse(".author, .autor, .byline").unwrap();
    static ref HEADLINE: Selector = Selector::parse("h1, h2").unwrap();
    static ref SUBTITULO: Selector = Selector::parse("p.subtitulo").unwrap();
    static ref LEAD_P: Selector = Selector::parse("p.lead").unwrap();
    static ref H2: Selector = Selector::parse("h2").unwrap();
    static ref AUTHOR: Selector = Selector::parse("a[rel='author'], .author, .autor, .byline").unwrap();
    static ref TAG_CONTAINER: Selector = Selector::parse(".tags, .etiquetas, ul.tags").unwrap();
    static ref BODY_CONTAINERS: Vec<Selector> = [
        "div[class*='article-body'], div[class*='contenido'], div[class*='cuerpo'], \
         div[class*='article-content'], div[class*='article__body']",
        "article",
        "main",
    ]
    .iter()
    .map(|css| Selector::parse(css).unwrap())
    .collect();
    static ref PARAGRAPH: Selector = Selector::parse("p").unwrap();
    static ref FIGURE_IMAGE: Selector = Selector::parse("figure img[src]").unwrap();
    static ref NAMED_IMAGE: Selector = Selector::parse("img.foto[src], img.imagen[src]").unwrap();
}

#[derive(Debug, Clone, Copy, Default)]
pub struct ElEspanolAdapter;

impl SiteAdapter for ElEspanolAdapter {
    fn source_metadata(&self) -> SourceMetadata {
        SourceMetadata {
            name: "El Español",
            host: "elespanol.com",
            landing_url: "https://www.elespanol.com",
        }
    }

    fn extract_list(&self, document: &Html, origin: &Url) -> Vec<Stub> {
        let scope = document
            .select(&MAIN)
            .next()
            .unwrap_or_else(|| document.root_element());
        scope
            .select(&ARTICLE)
            .take(MAX_ENTRIES)
            .filter_map(|article| {
                heading_link_entry(article, origin, self.source_metadata().name, MIN_TITLE_CHARS, &LIST_AUTHOR)
            })
            .collect()
    }

    fn extract_detail(&self, document: &Html) -> Result<DetailRecord> {
        let root = document.root_element();
        let container = BODY_CONTAINERS
            .iter()
            .find_map(|selector| root.select(selector).next())
            .unwrap_or(root);

        let detail = DetailRecord {
            title: select_text(root, &HEADLINE),
            subtitle: first_text(root, &[&*SUBTITULO, &*LEAD_P, &*H2]),
            author: byline_or_meta(document, &AUTHOR),
            tags: link_tags(root, &TAG_CONTAINER).unwrap_or_else(|| meta_tags(root)),
            body: editorial_body(container.select(&PARAGRAPH), MAX_PARAGRAPHS, MIN_PARAGRAPH_CHARS),
            image: ImageInfo::new(
                lead_image_url(document, &[&*FIGURE_IMAGE, &*NAMED_IMAGE]),
                caption_credits(root),
            ),
        };
        require_article(detail, self.source_metadata().name)
    }
}
