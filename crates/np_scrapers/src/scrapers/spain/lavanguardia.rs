use lazy_static::lazy_static;
use np_core::{DetailRecord, ImageInfo, Result, Stub};
use scraper::{ElementRef, Html, Selector};
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
    static ref LIST_AUTHOR: Selector = Selector::parse(".author, .byline, .nota__autor, .autor").unwrap();
    static ref H1: Selector = Selector::parse("h1").unwrap();
    static ref LEAD_P: Selector = Selector::parse("p.lead").unwrap();
    static ref SUBTITULO: Selector = Selector::parse("h2.subtitulo").unwrap();
    static ref H2: Selector = Selector::parse("h2").unwrap();
    static ref AUTHOR: Selector =
        Selector::parse("a[rel='author'], .byline a, .byline, .autor, .nota__autor a").unwrap();
    static ref TAG_CONTAINER: Selector = Selector::parse("ul.tags, ul.etiquetas, .tags, .article-tags").unwrap();
    static ref BODY_CONTAINERS: Vec<Selector> = [
        "div.article-modules",
        "div[itemprop='articleBody']",
        "div[class*='article-modules'], div[class*='article-body'], div[class*='cuerpo'], \
         div[class*='content'], div[class*='entry'], div[class*='contenido']",
        "article",
        "main",
    ]
    .iter()
    .map(|css| Selector::parse(css).unwrap())
    .collect();
    static ref MODULE_PARAGRAPH: Selector = Selector::parse("p[class*='paragraph']").unwrap();
    static ref PARAGRAPH: Selector = Selector::parse("p").unwrap();
    static ref FIGURE_IMAGE: Selector = Selector::parse("figure img[src]").unwrap();
    static ref NAMED_IMAGE: Selector = Selector::parse("img.imagen[src], img.foto[src]").unwrap();
}

#[derive(Debug, Clone, Copy, Default)]
pub struct LaVanguardiaAdapter;

impl LaVanguardiaAdapter {
    /// Paragraph modules when the page uses them, plain paragraphs otherwise.
    fn body(&self, root: ElementRef) -> String {
        let container = BODY_CONTAINERS
            .iter()
            .find_map(|selector| root.select(selector).next())
            .unwrap_or(root);
        let paragraphs = if container.select(&MODULE_PARAGRAPH).next().is_some() {
            container.select(&MODULE_PARAGRAPH)
        } else {
            container.select(&PARAGRAPH)
        };
        editorial_body(paragraphs, MAX_PARAGRAPHS, MIN_PARAGRAPH_CHARS)
    }
}

impl SiteAdapter for LaVanguardiaAdapter {
    fn source_metadata(&self) -> SourceMetadata {
        SourceMetadata {
            name: "La Vanguardia",
            host: "lavanguardia.com",
            landing_url: "https://www.lavanguardia.com",
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
            title: select_text(root, &H1),
            subtitle: first_text(root, &[&*LEAD_P, &*SUBTITULO, &*H2]),
            author: byline_or_meta(document, &AUTHOR),
            tags: link_tags(root, &TAG_CONTAINER).unwrap_or_else(|| meta_tags(root)),
            body: self.body(root),
            image: ImageInfo::new(
                lead_image_url(document, &[&*FIGURE_IMAGE, &*NAMED_IMAGE]),
                caption_credits(root),
            ),
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
            <h2><a href="/politica/20241012/9000000/illa-presupuestos.html" title="Illa presenta los presupuestos">Illa</a></h2>
            <span class="byline">Redacción Barcelona</span>
          </article>
          <article>
            <a href="https://www.lavanguardia.com/deportes/20241012/9000001/barca-gana.html">El Barça gana en Montjuïc</a>
            <time datetime="2024-10-12T21:00:00Z"></time>
          </article>
        </main></body></html>
    "#;

    const DETAIL: &str = r#"
        <html><head>
          <meta property="article:tag" content="Presupuestos">
          <meta property="article:tag" content="Generalitat">
        </head><body>
          <h1>Illa presenta los presupuestos</h1>
          <h2 class="subtitulo">El Govern busca apoyos en el Parlament.</h2>
          <div class="byline"><a href="/autores/laura-aragones">Laura Aragonés</a></div>
          <div class="article-modules">
            <figure><img src="https://www.lavanguardia.com/files/illa.jpg" alt="Salvador Illa">
              <figcaption>Salvador Illa en el Parlament <span class="author">Àlex Garcia</span></figcaption>
            </figure>
            <p class="paragraph">El president ha presentado este sábado las cuentas de la Generalitat.</p>
            <p class="intro">Este párrafo sin módulo queda fuera del cuerpo del artículo.</p>
            <p class="paragraph">Contenido relacionado</p>
            <p class="paragraph">Las cuentas incluyen un aumento del gasto en sanidad y educación.</p>
          </div>
        </body></html>
    "#;

    #[test]
    fn test_extract_list() {
        let origin = Url::parse("https://www.lavanguardia.com").unwrap();
        let stubs = LaVanguardiaAdapter.extract_list(&Html::parse_document(LIST), &origin);

        assert_eq!(stubs.len(), 2);
        assert_eq!(stubs[0].title, "Illa presenta los presupuestos");
        assert_eq!(
            stubs[0].url,
            "https://www.lavanguardia.com/politica/20241012/9000000/illa-presupuestos.html"
        );
        assert_eq!(stubs[0].author, "Redacción Barcelona");
        assert_eq!(stubs[1].title, "El Barça gana en Montjuïc");
        assert_eq!(stubs[1].published_at, "2024-10-12T21:00:00.000Z");
    }

    #[test]
    fn test_extract_detail() {
        let detail = LaVanguardiaAdapter.extract_detail(&Html::parse_document(DETAIL)).unwrap();

        assert_eq!(detail.title, "Illa presenta los presupuestos");
        assert_eq!(detail.subtitle, "El Govern busca apoyos en el Parlament.");
        assert_eq!(detail.author, "Laura Aragonés");
        assert_eq!(detail.tags, vec!["Presupuestos", "Generalitat"]);
        assert_eq!(
            detail.body,
            "El president ha presentado este sábado las cuentas de la Generalitat. \
             Las cuentas incluyen un aumento del gasto en sanidad y educación."
        );
        assert_eq!(detail.image.url, "https://www.lavanguardia.com/files/illa.jpg");
        assert_eq!(
            detail.image.credits,
            "Salvador Illa en el Parlament Àlex Garcia — Àlex Garcia"
        );
    }

    #[test]
    fn test_plain_paragraphs_without_modules() {
        let html = r#"
            <html><body>
              <h1>Titular</h1>
              <div itemprop="articleBody">
                <p>Un párrafo corriente con longitud suficiente para contar.</p>
              </div>
            </body></html>
        "#;
        let detail = LaVanguardiaAdapter.extract_detail(&Html::parse_document(html)).unwrap();
        assert_eq!(detail.body, "Un párrafo corriente con longitud suficiente para contar.");
        assert!(detail.tags.is_empty());
        assert!(detail.author.is_empty());
    }
}
