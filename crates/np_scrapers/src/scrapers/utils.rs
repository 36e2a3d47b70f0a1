//! DOM helpers shared by the site adapters.

use lazy_static::lazy_static;
use np_core::dates::normalize;
use np_core::text::{clean_text, format_credits};
use np_core::types::MAX_TAGS;
use np_core::{DetailRecord, Error, Result, Stub};
use scraper::{ElementRef, Html, Selector};
use url::Url;

lazy_static! {
    static ref OG_IMAGE: Selector = Selector::parse("meta[property='og:image']").unwrap();
    static ref META_AUTHOR: Selector = Selector::parse("meta[name='author']").unwrap();
    static ref META_TAG: Selector = Selector::parse("meta[property='article:tag']").unwrap();
    static ref HEADING: Selector = Selector::parse("h1, h2, h3").unwrap();
    static ref LINK: Selector = Selector::parse("a").unwrap();
    static ref TIME: Selector = Selector::parse("time").unwrap();
    static ref FIGURE: Selector = Selector::parse("figure").unwrap();
    static ref FIGCAPTION: Selector = Selector::parse("figcaption").unwrap();
    static ref CAPTION_AUTHOR: Selector = Selector::parse(".autor, .author").unwrap();
    static ref FIGURE_IMG: Selector = Selector::parse("figure img").unwrap();
    static ref IMG: Selector = Selector::parse("img").unwrap();
}

/// All text below `element`, whitespace-collapsed.
pub fn element_text(element: ElementRef) -> String {
    clean_text(&element.text().collect::<String>())
}

/// Cleaned text of the first match below `scope`, empty when nothing matches.
pub fn select_text(scope: ElementRef, selector: &Selector) -> String {
    scope.select(selector).next().map(element_text).unwrap_or_default()
}

/// Trimmed attribute of the first match carrying it.
pub fn select_attr(scope: ElementRef, selector: &Selector, attr: &str) -> String {
    scope
        .select(selector)
        .filter_map(|el| el.value().attr(attr))
        .map(str::trim)
        .find(|value| !value.is_empty())
        .unwrap_or_default()
        .to_string()
}

/// First non-empty text among `selectors`, tried in order.
pub fn first_text(scope: ElementRef, selectors: &[&Selector]) -> String {
    selectors
        .iter()
        .map(|selector| select_text(scope, selector))
        .find(|text| !text.is_empty())
        .unwrap_or_default()
}

/// First direct child element named `name`.
pub fn direct_child<'a>(element: ElementRef<'a>, name: &str) -> Option<ElementRef<'a>> {
    element
        .children()
        .filter_map(ElementRef::wrap)
        .find(|child| child.value().name() == name)
}

pub fn og_image(document: &Html) -> String {
    select_attr(document.root_element(), &OG_IMAGE, "content")
}

pub fn meta_author(document: &Html) -> String {
    select_attr(document.root_element(), &META_AUTHOR, "content")
}

/// First candidate of a `srcset`, kept only when it is an absolute URL.
pub fn first_srcset_url(srcset: &str) -> String {
    let candidate = srcset
        .split(',')
        .next()
        .and_then(|entry| entry.split_whitespace().next())
        .unwrap_or_default();
    if candidate.starts_with("http") {
        candidate.to_string()
    } else {
        String::new()
    }
}

/// Image source from `src`, then `data-src`, then the first `srcset` candidate.
pub fn img_url(img: ElementRef) -> String {
    let attr = |name: &str| img.value().attr(name).map(str::trim).unwrap_or_default();
    if !attr("src").is_empty() {
        return attr("src").to_string();
    }
    if !attr("data-src").is_empty() {
        return attr("data-src").to_string();
    }
    first_srcset_url(attr("srcset"))
}

/// Joins cleaned paragraphs longer than `min_chars`.
pub fn paragraphs_body<'a, I>(paragraphs: I, min_chars: usize) -> String
where
    I: IntoIterator<Item = ElementRef<'a>>,
{
    paragraphs
        .into_iter()
        .map(element_text)
        .filter(|text| text.chars().count() > min_chars)
        .collect::<Vec<_>>()
        .join(" ")
}

/// Cleaned, non-empty tag texts capped at the record limit.
pub fn collect_tags<I>(texts: I) -> Vec<String>
where
    I: IntoIterator<Item = String>,
{
    texts
        .into_iter()
        .map(|tag| clean_text(&tag))
        .filter(|tag| !tag.is_empty())
        .take(MAX_TAGS)
        .collect()
}

/// Link texts of the first element matching `container`, `None` when the
/// page has no such container.
pub fn link_tags(root: ElementRef, container: &Selector) -> Option<Vec<String>> {
    root.select(container)
        .next()
        .map(|container| collect_tags(container.select(&LINK).map(element_text)))
}

/// `article:tag` meta values.
pub fn meta_tags(root: ElementRef) -> Vec<String> {
    collect_tags(
        root.select(&META_TAG)
            .filter_map(|meta| meta.value().attr("content"))
            .map(str::to_string),
    )
}

/// Byline text of the first `selector` match, else the `author` meta.
pub fn byline_or_meta(document: &Html, selector: &Selector) -> String {
    match document.root_element().select(selector).next() {
        Some(byline) => element_text(byline),
        None => meta_author(document),
    }
}

/// Source of the first image matched by `selectors`, else `og:image`.
pub fn lead_image_url(document: &Html, selectors: &[&Selector]) -> String {
    let root = document.root_element();
    selectors
        .iter()
        .map(|selector| select_attr(root, selector, "src"))
        .find(|src| !src.is_empty())
        .unwrap_or_else(|| og_image(document))
}

/// Credits for the lead image.
///
/// The caption is the first figure's `figcaption` (inside it or following
/// it), else the first `figcaption` on the page. A caption holding an em dash
/// splits into caption and author; otherwise the author comes from an
/// `.autor` element inside it. Without a caption the image `alt` is used.
pub fn caption_credits(root: ElementRef) -> String {
    let figcaption = root
        .select(&FIGURE)
        .next()
        .and_then(|figure| {
            figure.select(&FIGCAPTION).next().or_else(|| {
                figure
                    .next_siblings()
                    .filter_map(ElementRef::wrap)
                    .find(|sibling| sibling.value().name() == "figcaption")
            })
        })
        .or_else(|| root.select(&FIGCAPTION).next());

    let (mut caption, mut author) = (String::new(), String::new());
    if let Some(figcaption) = figcaption {
        let text = clean_text(&figcaption.text().collect::<Vec<_>>().join(" "));
        match text.split_once('—') {
            Some((before, after)) => {
                caption = before.trim().to_string();
                author = after.trim().to_string();
            }
            None => {
                caption = text;
                author = select_text(figcaption, &CAPTION_AUTHOR);
            }
        }
    }
    if caption.is_empty() {
        caption = root
            .select(&FIGURE_IMG)
            .next()
            .or_else(|| root.select(&IMG).next())
            .and_then(|img| img.value().attr("alt"))
            .map(str::trim)
            .unwrap_or_default()
            .to_string();
    }
    format_credits([caption.as_str(), author.as_str()])
}

/// Joins the first `limit` paragraphs, dropping advertising blurbs and lines
/// shorter than `min_chars`.
pub fn editorial_body<'a, I>(paragraphs: I, limit: usize, min_chars: usize) -> String
where
    I: IntoIterator<Item = ElementRef<'a>>,
{
    paragraphs
        .into_iter()
        .take(limit)
        .map(element_text)
        .filter(|text| {
            let lower = text.to_lowercase();
            !lower.contains("publicidad") && !lower.contains("anuncio")
        })
        .filter(|text| text.chars().count() >= min_chars)
        .collect::<Vec<_>>()
        .join(" ")
}

/// Stub for an `<article>` card on a list page.
///
/// The link is the first anchor of the card's first heading, or the card's
/// first anchor when it has no heading. Its `title` attribute, else its text,
/// is the title and must reach `min_title_chars`. The card's `<time
/// datetime>` is the publication date.
pub fn heading_link_entry(
    article: ElementRef,
    origin: &Url,
    source: &str,
    min_title_chars: usize,
    author: &Selector,
) -> Option<Stub> {
    let link = match article.select(&HEADING).next() {
        Some(heading) => heading.select(&LINK).next()?,
        None => article.select(&LINK).next()?,
    };
    let title = match link.value().attr("title").map(str::trim) {
        Some(title) if !title.is_empty() => clean_text(title),
        _ => element_text(link),
    };
    if title.chars().count() < min_title_chars {
        return None;
    }
    let url = resolve_link(link.value().attr("href")?, origin)?;

    let mut stub = Stub::new(source, title, url);
    stub.author = select_text(article, author);
    let datetime = select_attr(article, &TIME, "datetime");
    stub.published_at = normalize(Some(datetime.as_str()));
    Some(stub)
}

/// Resolves a list-page link against the source origin.
///
/// Absolute http(s) links are kept, rooted paths are joined to `origin` and
/// anything else (fragments, `javascript:`, relative paths) is skipped.
pub fn resolve_link(href: &str, origin: &Url) -> Option<String> {
    let href = href.trim();
    if href.starts_with("http://") || href.starts_with("https://") {
        return Some(href.to_string());
    }
    if href.starts_with('/') {
        return origin.join(href).ok().map(|url| url.to_string());
    }
    None
}

/// Rejects detail pages where neither a headline nor body text was found.
pub fn require_article(detail: DetailRecord, source: &str) -> Result<DetailRecord> {
    if detail.title.is_empty() && detail.body.is_empty() {
        return Err(Error::Parse(format!("{}: no article structure found", source)));
    }
    Ok(detail)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sel(css: &str) -> Selector {
        Selector::parse(css).unwrap()
    }

    #[test]
    fn test_select_text_and_attr() {
        let html = r#"
            <div class="title">  Test
               Title </div>
            <a class="link" href=" /a.html ">x</a>
        "#;
        let document = Html::parse_document(html);
        let root = document.root_element();
        assert_eq!(select_text(root, &sel(".title")), "Test Title");
        assert_eq!(select_text(root, &sel(".missing")), "");
        assert_eq!(select_attr(root, &sel("a.link"), "href"), "/a.html");
        assert_eq!(first_text(root, &[&sel(".missing"), &sel(".title")]), "Test Title");
    }

    #[test]
    fn test_first_srcset_url() {
        assert_eq!(
            first_srcset_url("https://img.es/a.jpg 414w, https://img.es/b.jpg 828w"),
            "https://img.es/a.jpg"
        );
        assert_eq!(first_srcset_url("/relative.jpg 1x"), "");
        assert_eq!(first_srcset_url(""), "");
    }

    #[test]
    fn test_img_url_fallbacks() {
        let document = Html::parse_document(
            r#"<img id="a" data-src="https://img.es/lazy.jpg"><img id="b" srcset="https://img.es/s.jpg 1x">"#,
        );
        let root = document.root_element();
        let lazy = root.select(&sel("#a")).next().unwrap();
        let srcset = root.select(&sel("#b")).next().unwrap();
        assert_eq!(img_url(lazy), "https://img.es/lazy.jpg");
        assert_eq!(img_url(srcset), "https://img.es/s.jpg");
    }

    #[test]
    fn test_paragraphs_body_filters_short_lines() {
        let document = Html::parse_document(
            "<p>Corto.</p><p>Este párrafo tiene claramente más de treinta caracteres.</p>",
        );
        let body = paragraphs_body(document.root_element().select(&sel("p")), 30);
        assert_eq!(body, "Este párrafo tiene claramente más de treinta caracteres.");
    }

    #[test]
    fn test_collect_tags_caps_and_cleans() {
        let tags = collect_tags((0..12).map(|i| format!("  tag {} ", i)).chain([String::new()]));
        assert_eq!(tags.len(), MAX_TAGS);
        assert_eq!(tags[0], "tag 0");
    }

    #[test]
    fn test_resolve_link() {
        let origin = Url::parse("https://www.abc.es").unwrap();
        assert_eq!(
            resolve_link("/espana/noticia.html", &origin).as_deref(),
            Some("https://www.abc.es/espana/noticia.html")
        );
        assert_eq!(
            resolve_link("https://elpais.com/x.html", &origin).as_deref(),
            Some("https://elpais.com/x.html")
        );
        assert_eq!(resolve_link("noticia.html", &origin), None);
        assert_eq!(resolve_link("javascript:void(0)", &origin), None);
    }

    #[test]
    fn test_og_image_and_meta_author() {
        let document = Html::parse_document(
            r#"<html><head><meta property="og:image" content="https://img.es/og.jpg"><meta name="author" content="Ana Pérez"></head></html>"#,
        );
        assert_eq!(og_image(&document), "https://img.es/og.jpg");
        assert_eq!(meta_author(&document), "Ana Pérez");
    }

    #[test]
    fn test_caption_credits() {
        let split = Html::parse_document(
            r#"<figure><img src="a.jpg" alt="Alt"></figure><figcaption>Vista del puerto — EFE</figcaption>"#,
        );
        assert_eq!(caption_credits(split.root_element()), "Vista del puerto — EFE");

        let byline = Html::parse_document(
            r#"<figure><img src="a.jpg"><figcaption>Pleno del Congreso <span class="autor">Europa Press</span></figcaption></figure>"#,
        );
        assert_eq!(
            caption_credits(byline.root_element()),
            "Pleno del Congreso Europa Press — Europa Press"
        );

        let alt = Html::parse_document(r#"<figure><img src="a.jpg" alt=" Fachada del Senado "></figure>"#);
        assert_eq!(caption_credits(alt.root_element()), "Fachada del Senado");
        assert_eq!(caption_credits(Html::parse_document("<p>x</p>").root_element()), "");
    }

    #[test]
    fn test_editorial_body() {
        let document = Html::parse_document(
            "<p>Este primer párrafo supera de largo los treinta caracteres.</p>\
             <p>PUBLICIDAD: suscríbete ahora mismo a nuestro boletín diario</p>\
             <p>Breve.</p>\
             <p>Un anuncio patrocinado que ocupa bastante más de treinta letras.</p>\
             <p>El segundo párrafo válido también es suficientemente largo.</p>",
        );
        let paragraphs = || document.root_element().select(&sel("p")).collect::<Vec<_>>();
        assert_eq!(
            editorial_body(paragraphs(), 30, 30),
            "Este primer párrafo supera de largo los treinta caracteres. \
             El segundo párrafo válido también es suficientemente largo."
        );
        assert_eq!(
            editorial_body(paragraphs(), 1, 30),
            "Este primer párrafo supera de largo los treinta caracteres."
        );
    }

    #[test]
    fn test_heading_link_entry() {
        let document = Html::parse_document(
            r#"<article><h2><a href="/politica/pleno.html">Pleno del Congreso</a></h2><span class="firma">Ana</span><time datetime="2024-05-02T06:00:00Z"></time></article>"#,
        );
        let origin = Url::parse("https://www.publico.es").unwrap();
        let article = document.root_element().select(&sel("article")).next().unwrap();

        let stub = heading_link_entry(article, &origin, "Público", 8, &sel(".firma")).unwrap();
        assert_eq!(stub.source, "Público");
        assert_eq!(stub.url, "https://www.publico.es/politica/pleno.html");
        assert_eq!(stub.author, "Ana");
        assert_eq!(stub.published_at, "2024-05-02T06:00:00.000Z");
        assert!(heading_link_entry(article, &origin, "Público", 40, &sel(".firma")).is_none());
    }

    #[test]
    fn test_tag_sources() {
        let document = Html::parse_document(
            r#"<html><head><meta property="article:tag" content="Empleo"></head><body><ul class="tags"><li><a> Paro </a></li></ul></body></html>"#,
        );
        let root = document.root_element();
        assert_eq!(link_tags(root, &sel("ul.tags")), Some(vec!["Paro".to_string()]));
        assert_eq!(link_tags(root, &sel(".etiquetas")), None);
        assert_eq!(meta_tags(root), vec!["Empleo"]);
    }

    #[test]
    fn test_require_article() {
        assert!(require_article(DetailRecord::default(), "ABC").is_err());
        let detail = DetailRecord {
            title: "Titular".to_string(),
            ..Default::default()
        };
        assert!(require_article(detail, "ABC").is_ok());
    }
}
