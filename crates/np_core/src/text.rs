use lazy_static::lazy_static;
use regex::Regex;

pub const CREDITS_SEPARATOR: &str = " — ";

lazy_static! {
    static ref WHITESPACE: Regex = Regex::new(r"\s+").unwrap();
}

/// Trims and collapses runs of whitespace into single spaces.
pub fn clean_text(text: &str) -> String {
    WHITESPACE.replace_all(text.trim(), " ").into_owned()
}

/// Cuts `text` to at most `max_chars` characters.
pub fn truncate_chars(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => text[..idx].to_string(),
        None => text.to_string(),
    }
}

/// Joins image credit fragments, dropping empty and repeated entries while
/// keeping first-seen order.
pub fn format_credits<'a, I>(parts: I) -> String
where
    I: IntoIterator<Item = &'a str>,
{
    let mut out: Vec<&str> = Vec::new();
    for part in parts {
        let part = part.trim();
        if part.is_empty() || out.contains(&part) {
            continue;
        }
        out.push(part);
    }
    out.join(CREDITS_SEPARATOR)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clean_text() {
        assert_eq!(clean_text("  Hola\n\t  mundo  "), "Hola mundo");
        assert_eq!(clean_text(""), "");
        assert_eq!(clean_text("Sánchez   anuncia"), "Sánchez anuncia");
    }

    #[test]
    fn test_truncate_chars_respects_multibyte() {
        assert_eq!(truncate_chars("añoñez", 3), "año");
        assert_eq!(truncate_chars("corto", 100), "corto");
        assert_eq!(truncate_chars("", 3), "");
    }

    #[test]
    fn test_format_credits() {
        assert_eq!(format_credits(["EFE", "", "Foto de archivo", "EFE", "  "]), "EFE — Foto de archivo");
        assert_eq!(format_credits(["", ""]), "");
        assert_eq!(format_credits([" Europa Press "]), "Europa Press");
    }
}
