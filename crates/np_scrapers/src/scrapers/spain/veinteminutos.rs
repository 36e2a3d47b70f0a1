use lazy_static::lazy_static;
use np_core::{DetailRecord, ImageInfo, Result, Stub};
use scraper::{ElementRef, Html, Selector};
use url::Url;

use crate::scrapers::jsonld;
use crate::scrapers::utils::{
    caption_credits, element_text, first_text, heading_link_entry, lead_image_url, link_tags,
    meta_author, meta_tags, require_article, select_attr, select_text,
};
use crate::scrapers::{SiteAdapter, SourceMetadata};

const MAX_ENTRIES: usize = 30;
const MAX_PARAGRAPHS: usize = 40;
const MIN_TITLE_CHARS: usize = 6;
const MIN_PARAGRAPH_WORDS: usize = 6;

lazy_static! {
    static ref MAIN: Selector = Selector::parse("main").unwrap();
    static ref ARTICLE: Selector = Selector::parse("article").unwrap();
    static ref LIST_AUTHOR: Selector = Selector::parse(".autor, .byline, .meta__autor").unwrap();
    static ref H1: Selector = Selector::parse("h1").unwrap();
    static ref H2_H3: Selector = Selector::parse("h2, h3").unwrap();
    static ref SUBTITLES: Vec<Selector> = ["p.lead", "div.lead", "p.subtitle", "h2.subtitulo", ".subtitle"]
        .iter()
        .map(|css| Selector::parse(css).unwrap())
        .collect();
    static ref META_DESCRIPTION: Selector =
        Selector::parse("meta[name='description'], meta[property='og:description']").unwrap();
    static ref HEADER: Selector = Selector::parse(
        "header, div[class*='entry-header'], div[class*='article-header'], div[class*='cabecera']"
    )
    .unwrap();
    static ref HEADER_SUBTITLE: Selector = Selector::parse("p.lead, p.subtitle, h2, h3").unwrap();
    static ref AUTHOR: Selector = Selector::parse("a[rel='author'], .autor, .author, .byline").unwrap();
    static ref TAG_CONTAINER: Selector = Selector::parse(".tags, ul.tags, .etiquetas").unwrap();
    static ref BODY_CONTAINERS: Vec<Selector> = [
        "div[class*='article__body'], div[class*='entry-content'], div[class*='article-body'], div[class*='cuerpo'], div[class*='contenido']",
        "article",
        "main",
    ]
    .iter()
    .map(|css| Selector::parse(css).unwrap())
    .collect();
    static ref PARAGRAPH: Selector = Selector::parse("p").unwrap();
    static ref FIGURE_IMAGE: Selector = Selector::parse("figure img[src]").unwrap();
    static ref NAMED_IMAGE: Selector = Selector::parse("img.imagen[src], img.foto[src]").unwrap();
}

#[derive(Debug, Clone, Copy, Default)]
pub struct VeinteMinutosAdapter;

impl VeinteMinutosAdapter {
    fn subtitle(&self, root: ElementRef) -> String {
        let subtitle = SUBTITLES
            .iter()
            .map(|selector| select_text(root, selector))
            .find(|text| !text.is_empty())
            .unwrap_or_default();
        if !subtitle.is_empty() {
            return subtitle;
        }

        let description = select_attr(root, &META_DESCRIPTION, "content");
        if !description.is_empty() {
            return description;
        }

        root.select(&HEADER)
            .next()
            .map(|header| select_text(header, &HEADER_SUBTITLE))
            .unwrap_or_default()
    }

    fn author(&self, document: &Html) -> String {
        let root = document.root_element();
        if let Some(byline) = root.select(&AUTHOR).next() {
            return element_text(byline);
        }
        let author = meta_author(document);
        if !author.is_empty() {
            return author;
        }
        jsonld::extract_authors(document).join(", ")
    }

    fn tags(&self, root: ElementRef) -> Vec<String> {
        link_tags(root, &TAG_CONTAINER).unwrap_or_else(|| meta_tags(root))
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
            .filter(|text| !text.is_empty())
            .filter(|text| !(text.to_lowercase().contains("publicidad") && text.chars().count() < 60))
            .filter(|text| text.split_whitespace().count() >= MIN_PARAGRAPH_WORDS)
            .collect::<Vec<_>>()
            .join(" ")
    }

    fn image(&self, document: &Html) -> ImageInfo {
        let url = lead_image_url(document, &[&*FIGURE_IMAGE, &*NAMED_IMAGE]);
        ImageInfo::new(url, caption_credits(document.root_element()))
    }
}

impl SiteAdapter for VeinteMinutosAdapter {
    fn source_metadata(&self) -> SourceMetadata {
        SourceMetadata {
            name: "20 Minutos",
            host: "20minutos.es",
            landing_url: "https://www.20minutos.es",
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
        let detail = DetailRecord {
            title: first_text(root, &[&*H1, &*H2_H3]),
            subtitle: self.subtitle(root),
            author: self.author(document),
            tags: self.tags(root),
            body: self.body(root),
            image: self.image(document),
        };
        require_article(detail, self.source_metadata().name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const LIST: &str = r#"
        <html><body><main>
          <article>
            <h2><a href="/noticia/5200000/0/huelga-de-metro-madrid/">Huelga de Metro en Madrid este jueves</a></h2>
            <span class="byline">Redacción Madrid</span>
            <time datetime="2024-05-02T06:00:00.250Z"></time>
          </article>
          <article><h3><a href="/corto/">Corto</a></h3></article>
          <article><a href="https://www.20minutos.es/deportes/noticia/5200001/" title="El Madrid gana la Liga">Liga</a></article>
        </main></body></html>
    "#;

    const DETAIL: &str = r#"
        <html><head>
          <meta name="description" content="Descripción meta">
          <meta property="article:tag" content="Metro">
        </head><body>
          <h1>Huelga de Metro en Madrid este jueves</h1>
          <p class="lead">Los maquinistas reclaman mejoras salariales.</p>
          <a rel="author" href="/autor/">Laura Martín</a>
          <figure>
            <img src="https://imagenes.20minutos.es/metro.jpg" alt="Andén de Sol">
            <figcaption>Andén de la estación de Sol — Jorge París</figcaption>
          </figure>
          <div class="article__body">
            <p>Los maquinistas de Metro de Madrid han convocado paros parciales este jueves.</p>
            <p>Publicidad</p>
            <p>Solo cuatro palabras aquí.</p>
            <p>La empresa ha fijado unos servicios mínimos del 60 por ciento en hora punta.</p>
          </div>
          <ul class="tags"><li><a>Metro de Madrid</a></li><li><a>Huelgas</a></li></ul>
        </body></html>
    "#;

    #[test]
    fn test_extract_list() {
        let origin = Url::parse("https://www.20minutos.es").unwrap();
        let stubs = VeinteMinutosAdapter.extract_list(&Html::parse_document(LIST), &origin);

        assert_eq!(stubs.len(), 2);
        assert_eq!(stubs[0].title, "Huelga de Metro en Madrid este jueves");
        assert_eq!(stubs[0].url, "https://www.20minutos.es/noticia/5200000/0/huelga-de-metro-madrid/");
        assert_eq!(stubs[0].author, "Redacción Madrid");
        assert_eq!(stubs[0].published_at, "2024-05-02T06:00:00.000Z");
        assert_eq!(stubs[1].title, "El Madrid gana la Liga");
    }

    #[test]
    fn test_extract_detail() {
        let detail = VeinteMinutosAdapter.extract_detail(&Html::parse_document(DETAIL)).unwrap();

        assert_eq!(detail.title, "Huelga de Metro en Madrid este jueves");
        assert_eq!(detail.subtitle, "Los maquinistas reclaman mejoras salariales.");
        assert_eq!(detail.author, "Laura Martín");
        assert_eq!(detail.tags, vec!["Metro de Madrid", "Huelgas"]);
        assert_eq!(
            detail.body,
            "Los maquinistas de Metro de Madrid han convocado paros parciales este jueves. \
             La empresa ha fijado unos servicios mínimos del 60 por ciento en hora punta."
        );
        assert_eq!(detail.image.url, "https://imagenes.20minutos.es/metro.jpg");
        assert_eq!(detail.image.credits, "Andén de la estación de Sol — Jorge París");
    }

    #[test]
    fn test_detail_metadata_fallbacks() {
        let html = r#"
            <html><head>
              <meta name="description" content="Resumen desde metadatos">
              <meta name="author" content="Agencias">
              <meta property="article:tag" content="Sucesos">
              <meta property="og:image" content="https://imagenes.20minutos.es/og.jpg">
            </head><body><h1>Titular de la noticia</h1></body></html>
        "#;
        let detail = VeinteMinutosAdapter.extract_detail(&Html::parse_document(html)).unwrap();
        assert_eq!(detail.subtitle, "Resumen desde metadatos");
        assert_eq!(detail.author, "Agencias");
        assert_eq!(detail.tags, vec!["Sucesos"]);
        assert_eq!(detail.image.url, "https://imagenes.20minutos.es/og.jpg");
        assert!(detail.image.credits.is_empty());
    }
}
