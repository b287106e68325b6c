// src/download.rs
//! Download links through the backend proxy (`GET {base}/api/download`).

use url::Url;

use crate::info::endpoint_url;

pub const DOWNLOAD_PATH: &str = "/api/download";

/// Link the browser navigates to; the proxy answers with `Content-Disposition: attachment`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadLink {
    pub href: String,
    pub filename: String,
}

pub fn build_download_url(api_base: &Url, media_url: &str, filename: &str) -> Url {
    let mut url = endpoint_url(api_base, DOWNLOAD_PATH);
    url.query_pairs_mut()
        .append_pair("url", media_url)
        .append_pair("filename", filename);
    url
}

pub fn download_link(api_base: &Url, media_url: &str, filename: &str) -> DownloadLink {
    DownloadLink {
        href: build_download_url(api_base, media_url, filename).into(),
        filename: filename.to_string(),
    }
}
