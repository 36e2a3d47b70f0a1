use lazy_static::lazy_static;
use np_core::{DetailRecord, ImageInfo, Result, Stub};
use scraper::{Html, Selector};
use url::Url;

use crate::scrapers::utils::{
    byline_or_meta, caption_credits, editorial_body, first_text, heading_link_entry, lead_image_url,
    link_tags, require_article, select_text,
};
use crate::scrapers::{SiteAdapter, SourceMetadata};

const MAX_ENTRIES: usize = 25;
const MIN_TITLE_CHARS: usize = 8;
const MAX_PARAGRAPHS: usize = 30;
const MIN_PARAGRAPH_CHARS: usize = 30;

lazy_static! {
    static ref MAIN: Selector = Selector::parse("main").unwrap();
    static ref ARTICLE: Selector = Selector::parse("article").unwrap();
    static ref LIST_AUTHOR: Selector = Selector::parse(".author, .nota__autor, .mod-autor a").unwrap();
    static ref H1: Selector = Selector::parse("h1").unwrap();
    static ref LEAD_H2: Selector = Selector::parse("h2.lead").unwrap();
    static ref LEAD_P: Selector = Selector::parse("p.lead").unwrap();
    static ref H2: Selector = Selector::parse("h2").unwrap();
    static ref AUTHOR: Selector = Selector::parse(
        "div.author a, div.autor, span.autor, a[rel='author'], div.nota__autor a, .nota__autor, \
         div.a_md_txt a.a_md_a_n, a.a_md_a_n"
    )
    .unwrap();
    static ref TAG_CONTAINER: Selector = Selector::parse("ul.tags, ul.etiquetas, .tags, .etiquetas").unwrap();
    static ref BODY_CONTAINERS: Vec<Selector> = [
        "div[itemprop='articleBody']",
        "div[class*='article-body'], div[class*='nota-body'], div[class*='cuerpo'], div[class*='entrada']",
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
pub struct PublicoAdapter;

impl SiteAdapter for PublicoAdapter {
    fn source_metadata(&self) -> SourceMetadata {
        SourceMetadata {
            name: "Público",
            host: "publico.es",
            landing_url: "https://www.publico.es",
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
            title: select_text(root, &H1),
            subtitle: first_text(root, &[&*LEAD_H2, &*LEAD_P, &*H2]),
            author: byline_or_meta(document, &AUTHOR),
            tags: link_tags(root, &TAG_CONTAINER).unwrap_or_default(),
            body: editorial_body(container.select(&PARAGRAPH), MAX_PARAGRAPHS, MIN_PARAGRAPH_CHARS),
            image: ImageInfo::new(
                lead_image_url(document, &[&*FIGURE_IMAGE, &*NAMED_IMAGE]),
                caption_credits(root),
            ),
        };
        require_article(detail, self.source_metadata().name)
    }
}
