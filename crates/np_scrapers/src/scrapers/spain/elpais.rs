use lazy_static::lazy_static;
use np_core::dates::normalize;
use np_core::{DetailRecord, ImageInfo, Result, Stub};
use scraper::{ElementRef, Html, Selector};
use url::Url;

use crate::scrapers::jsonld;
use crate::scrapers::utils::{
    collect_tags, direct_child, element_text, first_text, img_url, og_image, paragraphs_body,
    require_article, resolve_link, select_text,
};
use crate::scrapers::{SiteAdapter, SourceMetadata};

const MAX_ENTRIES: usize = 30;
const MAX_PARAGRAPHS: usize = 15;

lazy_static! {
    static ref LIST_ARTICLE: Selector = Selector::parse("main section article").unwrap();
    static ref HEADLINE_LINK: Selector = Selector::parse("h2 a").unwrap();
    static ref LINK: Selector = Selector::parse("a").unwrap();
    static ref TIME: Selector = Selector::parse("time").unwrap();
    static ref TITLE: Selector = Selector::parse("h1.at").unwrap();
    static ref SUBTITLE: Selector = Selector::parse("p.ast").unwrap();
    static ref SIGNATURE: Selector =
        Selector::parse("div.a_md_txt div[data-dtm-region='articulo_firma'] a.a_md_a_n").unwrap();
    static ref AUTHOR_LINK: Selector = Selector::parse("a.a_md_a_n").unwrap();
    static ref TAGS: Selector = Selector::parse("section[data-dtm-region='articulo_archivado-en'] li").unwrap();
    static ref BODY: Selector = Selector::parse("div[data-dtm-region='articulo_cuerpo']").unwrap();
    static ref PARAGRAPH: Selector = Selector::parse("p").unwrap();
    static ref LEAD_FIGURE: Selector = Selector::parse("figure.am.am-h").unwrap();
    static ref FIGURE: Selector = Selector::parse("figure").unwrap();
    static ref IMG: Selector = Selector::parse("img").unwrap();
    static ref PHOTO_CREDIT: Selector = Selector::parse("span.amm").unwrap();
    static ref CAPTION: Selector = Selector::parse("figcaption").unwrap();
}

#[derive(Debug, Clone, Copy, Default)]
pub struct ElPaisAdapter;

impl ElPaisAdapter {
    fn list_entry(&self, article: ElementRef, origin: &Url) -> Option<Stub> {
        let link = article.select(&HEADLINE_LINK).next()?;
        let title = element_text(link);
        let href = link.value().attr("href").unwrap_or_default();
        if title.is_empty() || href.is_empty() {
            return None;
        }
        let url = resolve_link(href, origin)?;

        let mut stub = Stub::new(self.source_metadata().name, title, url);
        let mut date_raw = String::new();
        if let Some(meta) = direct_child(article, "div") {
            stub.author = select_text(meta, &LINK);
            if let Some(time) = meta.select(&TIME).last() {
                date_raw = time
                    .value()
                    .attr("datetime")
                    .map(str::to_string)
                    .unwrap_or_else(|| element_text(time));
            }
        }
        stub.published_at = normalize(Some(date_raw.as_str()));
        Some(stub)
    }

    fn image(&self, document: &Html) -> ImageInfo {
        let root = document.root_element();

        if let Some(figure) = root.select(&LEAD_FIGURE).next() {
            if let Some(img) = figure.select(&IMG).next() {
                let url = img_url(img);
                if !url.is_empty() {
                    return ImageInfo::new(url, select_text(figure, &PHOTO_CREDIT));
                }
            }
        }

        if let Some(figure) = root.select(&FIGURE).next() {
            if let Some(img) = figure.select(&IMG).next() {
                let url = img_url(img);
                if !url.is_empty() {
                    let credits = first_text(figure, &[&*PHOTO_CREDIT, &*CAPTION]);
                    return ImageInfo::new(url, credits);
                }
            }
        }

        ImageInfo::new(og_image(document), "")
    }
}

impl SiteAdapter for ElPaisAdapter {
    fn source_metadata(&self) -> SourceMetadata {
        SourceMetadata {
            name: "El País",
            host: "elpais.com",
            landing_url: "https://elpais.com",
        }
    }

    fn extract_list(&self, document: &Html, origin: &Url) -> Vec<Stub> {
        document
            .select(&LIST_ARTICLE)
            .filter_map(|article| self.list_entry(article, origin))
            .take(MAX_ENTRIES)
            .collect()
    }

    fn extract_detail(&self, document: &Html) -> Result<DetailRecord> {
        let root = document.root_element();

        let mut author = first_text(root, &[&*SIGNATURE, &*AUTHOR_LINK]);
        if author.is_empty() {
            author = jsonld::extract_authors(document).join(", ");
        }

        let body = match root.select(&BODY).next() {
            Some(container) => paragraphs_body(container.select(&PARAGRAPH).take(MAX_PARAGRAPHS), 30),
            None => paragraphs_body(root.select(&PARAGRAPH).take(MAX_PARAGRAPHS), 30),
        };

        let detail = DetailRecord {
            title: select_text(root, &TITLE),
            subtitle: select_text(root, &SUBTITLE),
            author,
            tags: collect_tags(root.select(&TAGS).map(element_text)),
            body,
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
          <section>
            <article>
              <header><h2><a href="/espana/2024-05-01/el-gobierno-aprueba.html">El Gobierno aprueba   la reforma</a></h2></header>
              <div><a href="/autor/ana-perez/">Ana Pérez</a><time datetime="2024-05-01T08:30:00+02:00">01 may 2024</time></div>
            </article>
            <article><h2>Sin enlace</h2></article>
            <article>
              <h2><a href="https://elpais.com/economia/2024-05-01/el-ibex.html">El Ibex cierra en verde</a></h2>
            </article>
          </section>
        </main></body></html>
    "#;

    const DETAIL: &str = r#"
        <html><head><meta property="og:image" content="https://imagenes.elpais.com/og.jpg"></head><body>
          <h1 class="at">El Gobierno aprueba la reforma</h1>
          <p class="ast">El Consejo de Ministros da luz verde al texto.</p>
          <div class="a_md_txt"><div data-dtm-region="articulo_firma"><a class="a_md_a_n" href="/autor/">Ana Pérez</a></div></div>
          <figure class="am am-h"><img src="https://imagenes.elpais.com/foto.jpg"><span class="amm">Claudio Álvarez</span></figure>
          <div data-dtm-region="articulo_cuerpo">
            <p>El Consejo de Ministros ha aprobado este martes la reforma anunciada.</p>
            <p>Breve.</p>
            <p>La norma entrará en vigor el próximo mes tras su publicación en el BOE.</p>
          </div>
          <section data-dtm-region="articulo_archivado-en"><ul><li>Política</li><li>Gobierno de España</li></ul></section>
        </body></html>
    "#;

    #[test]
    fn test_extract_list() {
        let document = Html::parse_document(LIST);
        let origin = Url::parse("https://elpais.com").unwrap();
        let stubs = ElPaisAdapter.extract_list(&document, &origin);

        assert_eq!(stubs.len(), 2);
        assert_eq!(stubs[0].title, "El Gobierno aprueba la reforma");
        assert_eq!(stubs[0].url, "https://elpais.com/espana/2024-05-01/el-gobierno-aprueba.html");
        assert_eq!(stubs[0].author, "Ana Pérez");
        assert_eq!(stubs[0].published_at, "2024-05-01T08:30:00.000Z");
        assert_eq!(stubs[0].source, "El País");
        assert_eq!(stubs[1].url, "https://elpais.com/economia/2024-05-01/el-ibex.html");
        assert!(stubs[1].author.is_empty());
    }

    #[test]
    fn test_extract_list_without_main() {
        let document = Html::parse_document("<html><body><article><h2><a href='/a'>Titular</a></h2></article></body></html>");
        let origin = Url::parse("https://elpais.com").unwrap();
        assert!(ElPaisAdapter.extract_list(&document, &origin).is_empty());
    }

    #[test]
    fn test_extract_detail() {
        let document = Html::parse_document(DETAIL);
        let detail = ElPaisAdapter.extract_detail(&document).unwrap();

        assert_eq!(detail.title, "El Gobierno aprueba la reforma");
        assert_eq!(detail.subtitle, "El Consejo de Ministros da luz verde al texto.");
        assert_eq!(detail.author, "Ana Pérez");
        assert_eq!(detail.tags, vec!["Política", "Gobierno de España"]);
        assert!(detail.body.starts_with("El Consejo de Ministros ha aprobado"));
        assert!(!detail.body.contains("Breve."));
        assert_eq!(detail.image.url, "https://imagenes.elpais.com/foto.jpg");
        assert_eq!(detail.image.credits, "Claudio Álvarez");
    }

    #[test]
    fn test_detail_falls_back_to_og_image_and_jsonld_author() {
        let html = r#"
            <html><head>
              <meta property="og:image" content="https://imagenes.elpais.com/og.jpg">
              <script type="application/ld+json">{"author":{"name":"Luis Gil"}}</script>
            </head><body><h1 class="at">Titular</h1></body></html>
        "#;
        let detail = ElPaisAdapter.extract_detail(&Html::parse_document(html)).unwrap();
        assert_eq!(detail.image.url, "https://imagenes.elpais.com/og.jpg");
        assert_eq!(detail.author, "Luis Gil");
        assert!(detail.body.is_empty());
    }

    #[test]
    fn test_detail_without_article_is_parse_error() {
        let document = Html::parse_document("<html><body><nav>Portada</nav></body></html>");
        assert!(ElPaisAdapter.extract_detail(&document).is_err());
    }
}
