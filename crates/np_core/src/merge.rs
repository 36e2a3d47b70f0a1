//! Conservative combination of list-page stubs with detail-page data.
//!
//! Detail values win only when they are non-empty; otherwise whatever the
//! list page already had is kept.

use crate::text::format_credits;
use crate::types::{Article, ArticleImage, DetailRecord, ImageInfo, Stub};

pub fn merge(stub: Stub, detail: DetailRecord) -> Article {
    let image = merge_image(&stub.image, &detail.image);

    Article::assemble(
        stub.source,
        stub.published_at,
        prefer_vec(detail.tags, stub.tags),
        prefer(detail.title, stub.title),
        prefer(detail.subtitle, stub.subtitle),
        stub.url,
        prefer(detail.author, stub.author),
        image,
        prefer(detail.body, stub.body),
    )
}

/// Overlays the non-empty detail image fields on the stub image and folds
/// every caption-like field of both into `credits`.
pub fn merge_image(stub: &ImageInfo, detail: &ImageInfo) -> ArticleImage {
    let url = if detail.url.is_empty() {
        stub.url.clone()
    } else {
        detail.url.clone()
    };
    let credits = format_credits([
        stub.credits.as_str(),
        stub.alt.as_str(),
        stub.description.as_str(),
        detail.credits.as_str(),
        detail.alt.as_str(),
        detail.description.as_str(),
    ]);
    ArticleImage { url, credits }
}

fn prefer(detail: String, stub: String) -> String {
    if detail.trim().is_empty() {
        stub
    } else {
        detail
    }
}

fn prefer_vec(detail: Vec<String>, stub: Vec<String>) -> Vec<String> {
    if detail.is_empty() {
        stub
    } else {
        detail
    }
}
