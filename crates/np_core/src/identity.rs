//! Deterministic, URL-safe article identifiers.
//!
//! Ids are the MD5 digest of the input read as a big-endian integer,
//! reduced modulo `62^length` and written in base62 (`0-9A-Za-z`). At the
//! default length of six that gives about 5.68e10 distinct values.

use crate::{Error, Result};

pub const DEFAULT_ID_LENGTH: usize = 6;
/// Largest length whose modulus still fits the `u128` reduction.
pub const MAX_ID_LENGTH: usize = 20;

const BASE62_ALPHABET: &[u8; 62] = b"0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz";

/// Derives a stable id from an article URL.
pub fn generate_id_from_url(url: &str, length: usize) -> Result<String> {
    if url.is_empty() {
        return Err(Error::EmptyInput("cannot derive an id from an empty URL".to_string()));
    }
    digest_to_id(url.as_bytes(), length)
}

/// Id for records that may lack a URL: falls back to hashing
/// `timestamp + title[..30] + source`.
pub fn generate_short_id(
    source: &str,
    timestamp: &str,
    title: &str,
    url: Option<&str>,
    length: usize,
) -> Result<String> {
    match url {
        Some(url) if !url.is_empty() => generate_id_from_url(url, length),
        _ => {
            let head: String = title.chars().take(30).collect();
            let content = format!("{}{}{}", timestamp, head, source);
            digest_to_id(content.as_bytes(), length)
        }
    }
}

/// Dedup key for the history store: hex MD5 of `title + url`, the same key
/// older snapshots were written with.
pub fn content_hash(title: &str, url: &str) -> String {
    format!("{:x}", md5::compute(format!("{}{}", title, url)))
}

fn digest_to_id(input: &[u8], length: usize) -> Result<String> {
    if length == 0 || length > MAX_ID_LENGTH {
        return Err(Error::Config(format!(
            "id length must be between 1 and {}, got {}",
            MAX_ID_LENGTH, length
        )));
    }
    let modulus = 62u128.pow(length as u32);
    let digest = md5::compute(input);
    // (a * 256 + b) mod m, byte by byte, equals the full big-endian value mod m.
    let reduced = digest
        .iter()
        .fold(0u128, |acc, &byte| (acc * 256 + byte as u128) % modulus);
    Ok(encode_base62(reduced, length))
}

pub(crate) fn encode_base62(mut value: u128, length: usize) -> String {
    let mut chars = Vec::with_capacity(length);
    while value > 0 {
        chars.push(BASE62_ALPHABET[(value % 62) as usize]);
        value /= 62;
    }
    while chars.len() < length {
        chars.push(BASE62_ALPHABET[0]);
    }
    chars.reverse();
    chars.truncate(length);
    String::from_utf8(chars).unwrap_or_default()
}
