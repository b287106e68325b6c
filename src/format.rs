// src/format.rs
//! Small text helpers for the results view: durations, filenames, extensions.

use once_cell::sync::OnceCell;
use regex::Regex;

/// Fallback base name when the title sanitizes to nothing.
pub const DEFAULT_FILENAME_BASE: &str = "instagram-media";

/// Format seconds as `H:MM:SS` (hours > 0) or `MM:SS`.
/// Non-finite input yields an empty string; negatives clamp to zero.
pub fn format_duration(seconds: f64) -> String {
    if !seconds.is_finite() {
        return String::new();
    }
    let total = seconds.floor().max(0.0) as u64;
    let hrs = total / 3600;
    let mins = (total % 3600) / 60;
    let secs = total % 60;
    if hrs > 0 {
        format!("{hrs}:{mins:02}:{secs:02}")
    } else {
        format!("{mins:02}:{secs:02}")
    }
}

/// Lowercase, turn every run outside `[a-z0-9._-]` into one hyphen,
/// then trim leading/trailing hyphens and dots. May return "".
pub fn sanitize_filename(value: &str) -> String {
    static RE_DISALLOWED: OnceCell<Regex> = OnceCell::new();
    static RE_HYPHENS: OnceCell<Regex> = OnceCell::new();
    let re_disallowed = RE_DISALLOWED.get_or_init(|| Regex::new(r"[^a-z0-9._-]+").unwrap());
    let re_hyphens = RE_HYPHENS.get_or_init(|| Regex::new(r"-+").unwrap());

    let lowered = value.to_lowercase();
    let replaced = re_disallowed.replace_all(&lowered, "-");
    let collapsed = re_hyphens.replace_all(&replaced, "-");
    collapsed.trim_matches(|c| c == '-' || c == '.').to_string()
}

/// Sanitized base name, or [`DEFAULT_FILENAME_BASE`] when nothing survives.
pub fn filename_base(title: &str) -> String {
    let base = sanitize_filename(title);
    if base.is_empty() {
        DEFAULT_FILENAME_BASE.to_string()
    } else {
        base
    }
}

/// Extension (with leading dot) for a media link.
///
/// A recognized media extension right before `?`, `#` or the end of the link wins;
/// otherwise the media type decides (`video`, `audio`, `image`), else `.bin`.
pub fn guess_extension(link: &str, media_type: &str) -> String {
    static RE_EXT: OnceCell<Regex> = OnceCell::new();
    let re_ext = RE_EXT.get_or_init(|| {
        Regex::new(r"(?i)\.(mp4|mov|webm|mp3|m4a|wav|jpg|jpeg|png|webp)(?:\?|#|$)").unwrap()
    });

    if let Some(caps) = re_ext.captures(link) {
        return format!(".{}", caps[1].to_ascii_lowercase());
    }

    match media_type {
        "video" => ".mp4",
        "audio" => ".mp3",
        "image" => ".jpg",
        _ => ".bin",
    }
    .to_string()
}
