// src/normalize.rs
//! Backend response normalization.
//!
//! The info endpoint names the same concept under several keys depending on the
//! host it resolved. Everything downstream works on [`NormalizedInfo`] only.

use serde_json::{Map, Value};

/// Raw, opaque info endpoint body. Kept verbatim for session storage.
pub type InfoResponse = Map<String, Value>;

const TITLE_KEYS: &[&str] = &["caption", "title"];
const DOWNLOAD_URL_KEYS: &[&str] = &["download_url", "downloadLink", "download_link", "url"];
const THUMBNAIL_KEYS: &[&str] = &["thumb_best", "thumb", "thumbnail"];

#[derive(Debug, Clone, Default, PartialEq)]
pub struct NormalizedInfo {
    pub title: Option<String>,
    pub hosting: Option<String>,
    /// Lowercased `type`.
    pub media_type: Option<String>,
    pub download_url: Option<String>,
    pub thumbnail_url: Option<String>,
    pub duration_secs: Option<f64>,
}

pub fn normalize(data: &InfoResponse) -> NormalizedInfo {
    NormalizedInfo {
        title: first_text(data, TITLE_KEYS),
        hosting: text(data, "hosting"),
        media_type: text(data, "type").map(|t| t.to_lowercase()),
        download_url: first_text(data, DOWNLOAD_URL_KEYS),
        thumbnail_url: first_text(data, THUMBNAIL_KEYS),
        duration_secs: duration(data.get("duration")),
    }
}

/// Non-empty string value; numbers are rendered, everything else is absent.
fn text(data: &InfoResponse, key: &str) -> Option<String> {
    match data.get(key)? {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn first_text(data: &InfoResponse, keys: &[&str]) -> Option<String> {
    keys.iter().find_map(|k| text(data, k))
}

// `null` counts as zero seconds, a missing key as no duration.
fn duration(v: Option<&Value>) -> Option<f64> {
    match v? {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => {
            let t = s.trim();
            if t.is_empty() {
                Some(0.0)
            } else {
                t.parse::<f64>().ok()
            }
        }
        Value::Null => Some(0.0),
        _ => None,
    }
}
