// src/derive.rs
//! Results view derivation: stored submission in, everything the results page shows out.

use url::Url;

use crate::download::{download_link, DownloadLink};
use crate::format::{format_duration, guess_extension, sanitize_filename, DEFAULT_FILENAME_BASE};
use crate::normalize::{normalize, NormalizedInfo};
use crate::session::SubmissionResult;

pub const DEFAULT_TITLE: &str = "Download ready";
pub const DEFAULT_HOSTING: &str = "Instagram";
pub const DEFAULT_MEDIA_TYPE: &str = "video";
const THUMB_FALLBACK_BASE: &str = "thumbnail";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReadyStatus {
    Ready,
    Unavailable,
}

impl ReadyStatus {
    pub fn label(self) -> &'static str {
        match self {
            ReadyStatus::Ready => "Ready to download",
            ReadyStatus::Unavailable => "Download unavailable",
        }
    }
}

/// One download button. Disabled when there is nothing to fetch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadAction {
    pub label: String,
    pub sublabel: String,
    pub media_url: Option<String>,
    pub filename: String,
}

impl DownloadAction {
    pub fn enabled(&self) -> bool {
        self.media_url.is_some()
    }

    /// Proxy link for this action, `None` while disabled.
    pub fn link(&self, api_base: &Url) -> Option<DownloadLink> {
        self.media_url
            .as_deref()
            .map(|m| download_link(api_base, m, &self.filename))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ResultsView {
    pub source_url: String,
    pub title: String,
    pub hosting: String,
    pub media_type: String,
    /// `Source: {hosting} • {MEDIA_TYPE}`
    pub meta: String,
    /// Empty when the backend gave no usable duration.
    pub duration: String,
    /// Image shown in the result card.
    pub display_image: Option<String>,
    pub download_url: Option<String>,
    pub thumbnail_url: Option<String>,
    pub filename: String,
    pub primary: DownloadAction,
    pub thumbnail: DownloadAction,
    pub audio: DownloadAction,
    pub status: ReadyStatus,
}

pub fn derive_results(result: &SubmissionResult) -> ResultsView {
    let info = normalize(&result.data);
    derive_from_normalized(&result.source_url, info)
}

pub fn derive_from_normalized(source_url: &str, info: NormalizedInfo) -> ResultsView {
    let title = info.title.unwrap_or_else(|| DEFAULT_TITLE.to_string());
    let hosting = info.hosting.unwrap_or_else(|| DEFAULT_HOSTING.to_string());
    let media_type = info
        .media_type
        .unwrap_or_else(|| DEFAULT_MEDIA_TYPE.to_string());

    // The backend returns no direct file for youtube; the page URL is the actionable link.
    let download_url = info.download_url.or_else(|| {
        (hosting == "youtube" && !source_url.is_empty()).then(|| source_url.to_string())
    });
    let thumbnail_url = info.thumbnail_url;

    let duration = info
        .duration_secs
        .map(format_duration)
        .unwrap_or_default();

    let display_image = thumbnail_url.clone().or_else(|| {
        (media_type == "image")
            .then(|| download_url.clone())
            .flatten()
    });

    let base = sanitize_filename(&title);
    let ext_source = download_url
        .as_deref()
        .or(thumbnail_url.as_deref())
        .unwrap_or_default();
    let filename = format!(
        "{}{}",
        non_empty_or(&base, DEFAULT_FILENAME_BASE),
        guess_extension(ext_source, &media_type)
    );

    let primary = DownloadAction {
        label: if media_type == "image" { "Image" } else { "Video" }.to_string(),
        sublabel: if media_type == "audio" {
            "Audio"
        } else {
            "Highest Quality"
        }
        .to_string(),
        media_url: download_url.clone(),
        filename: filename.clone(),
    };

    let thumbnail = DownloadAction {
        label: "Thumbnail".to_string(),
        sublabel: "Image".to_string(),
        filename: thumbnail_url
            .as_deref()
            .map(|t| {
                format!(
                    "{}-thumb{}",
                    non_empty_or(&base, THUMB_FALLBACK_BASE),
                    guess_extension(t, "image")
                )
            })
            .unwrap_or_default(),
        media_url: thumbnail_url.clone(),
    };

    // No separate audio track is exposed by the backend.
    let audio = DownloadAction {
        label: "Audio".to_string(),
        sublabel: "Audio only".to_string(),
        media_url: None,
        filename: String::new(),
    };

    let status = if download_url.is_some() {
        ReadyStatus::Ready
    } else {
        ReadyStatus::Unavailable
    };

    ResultsView {
        source_url: source_url.to_string(),
        meta: format!("Source: {} • {}", hosting, media_type.to_uppercase()),
        title,
        hosting,
        media_type,
        duration,
        display_image,
        download_url,
        thumbnail_url,
        filename,
        primary,
        thumbnail,
        audio,
        status,
    }
}

fn non_empty_or<'a>(s: &'a str, fallback: &'a str) -> &'a str {
    if s.is_empty() {
        fallback
    } else {
        s
    }
}
