use scraper::{Html, Selector};
use serde_json::Value;

/// Extracts author names from the JSON-LD blocks of a page.
///
/// Handles `author` as a string, an object with `name` or an array of either,
/// on the top-level object, inside a top-level array or inside `@graph`.
pub fn extract_authors(document: &Html) -> Vec<String> {
    let mut authors = Vec::new();

    let Ok(script_selector) = Selector::parse("script[type='application/ld+json']") else {
        return authors;
    };

    for script in document.select(&script_selector) {
        let raw = script.text().collect::<String>();
        let Ok(json) = serde_json::from_str::<Value>(raw.trim()) else {
            continue;
        };
        for node in nodes(&json) {
            if let Some(author) = node.get("author") {
                push_author(author, &mut authors);
            }
        }
    }

    authors.dedup();
    authors
}

fn nodes(json: &Value) -> Vec<&Value> {
    match json {
        Value::Array(items) => items.iter().collect(),
        Value::Object(obj) => match obj.get("@graph").and_then(Value::as_array) {
            Some(graph) => std::iter::once(json).chain(graph.iter()).collect(),
            None => vec![json],
        },
        _ => Vec::new(),
    }
}

fn push_author(author: &Value, out: &mut Vec<String>) {
    match author {
        Value::Array(arr) => arr.iter().for_each(|a| push_author(a, out)),
        Value::Object(obj) => {
            if let Some(name) = obj.get("name").and_then(Value::as_str) {
                push_name(name, out);
            }
        }
        Value::String(s) => push_name(s, out),
        _ => {}
    }
}

fn push_name(name: &str, out: &mut Vec<String>) {
    let name = name.trim();
    if !name.is_empty() {
        out.push(name.to_string());
    }
}
