// src/server.rs
//! Static asset server for the three client files.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use axum::{
    extract::State,
    http::{header, StatusCode, Uri},
    response::{IntoResponse, Response},
    Router,
};
use metrics::counter;
use tower_http::trace::TraceLayer;

use crate::error::AppError;

/// Request path → file name under the asset directory. Nothing else is served.
pub const ALLOWED_FILES: &[(&str, &str)] = &[
    ("/", "index.html"),
    ("/index.html", "index.html"),
    ("/results.html", "results.html"),
    ("/app.js", "app.js"),
];

const OCTET_STREAM: &str = "application/octet-stream";
const NOT_FOUND_BODY: &str = "Not found";

#[derive(Clone)]
pub struct AssetState {
    root: Arc<PathBuf>,
}

impl AssetState {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: Arc::new(root.into()),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

pub fn create_router(state: AssetState) -> Router {
    Router::new()
        .fallback(serve_static)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Shorthand used by the binary and tests.
pub fn router(asset_dir: impl Into<PathBuf>) -> Router {
    create_router(AssetState::new(asset_dir))
}

async fn serve_static(State(state): State<AssetState>, uri: Uri) -> Response {
    let path = uri.path();
    match read_asset(state.root(), path).await {
        Ok((bytes, content_type)) => {
            counter!("static_requests_total", "path" => path.to_string(), "status" => "200")
                .increment(1);
            (StatusCode::OK, [(header::CONTENT_TYPE, content_type)], bytes).into_response()
        }
        Err(e) => {
            tracing::debug!(%path, error = %e, "static asset not served");
            counter!("static_requests_total", "path" => "other", "status" => "404").increment(1);
            not_found()
        }
    }
}

pub fn allowed_file(request_path: &str) -> Option<&'static str> {
    ALLOWED_FILES
        .iter()
        .find(|(p, _)| *p == request_path)
        .map(|(_, f)| *f)
}

/// Bytes and content type for an allow-listed path.
/// Unknown paths and read failures both come back as `AssetNotFound`.
pub async fn read_asset(root: &Path, request_path: &str) -> Result<(Vec<u8>, &'static str), AppError> {
    let file = allowed_file(request_path)
        .ok_or_else(|| AppError::AssetNotFound(request_path.to_string()))?;
    let full = root.join(file);
    let bytes = tokio::fs::read(&full).await.map_err(|e| {
        tracing::warn!(file = %full.display(), error = %e, "asset read failed");
        AppError::AssetNotFound(request_path.to_string())
    })?;
    Ok((bytes, content_type_for(&full)))
}

pub fn content_type_for(path: &Path) -> &'static str {
    let ext = path
        .extension()
        .and_then(|s| s.to_str())
        .unwrap_or_default()
        .to_ascii_lowercase();
    match ext.as_str() {
        "html" => "text/html; charset=utf-8",
        "css" => "text/css; charset=utf-8",
        "js" => "application/javascript; charset=utf-8",
        "json" => "application/json; charset=utf-8",
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "svg" => "image/svg+xml",
        "ico" => "image/x-icon",
        _ => OCTET_STREAM,
    }
}

/// The only failure the asset server reports: 404 with a plain-text body.
fn not_found() -> Response {
    (
        StatusCode::NOT_FOUND,
        [(header::CONTENT_TYPE, "text/plain; charset=utf-8")],
        NOT_FOUND_BODY,
    )
        .into_response()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn content_types_by_extension() {
        assert_eq!(content_type_for(Path::new("a/index.html")), "text/html; charset=utf-8");
        assert_eq!(
            content_type_for(Path::new("app.js")),
            "application/javascript; charset=utf-8"
        );
        assert_eq!(content_type_for(Path::new("x.JPEG")), "image/jpeg");
        assert_eq!(content_type_for(Path::new("x.ico")), "image/x-icon");
        assert_eq!(content_type_for(Path::new("x.wasm")), OCTET_STREAM);
        assert_eq!(content_type_for(Path::new("Makefile")), OCTET_STREAM);
    }

    #[test]
    fn allow_list_is_exact() {
        assert_eq!(allowed_file("/"), Some("index.html"));
        assert_eq!(allowed_file("/index.html"), Some("index.html"));
        assert_eq!(allowed_file("/results.html"), Some("results.html"));
        assert_eq!(allowed_file("/app.js"), Some("app.js"));
        assert_eq!(allowed_file("/app.js/"), None);
        assert_eq!(allowed_file("/../Cargo.toml"), None);
        assert_eq!(allowed_file("/missing.html"), None);
    }

    #[tokio::test]
    async fn read_failure_is_not_found() {
        let tmp = tempfile::tempdir().unwrap();
        let r = read_asset(tmp.path(), "/results.html").await;
        assert_eq!(r, Err(AppError::AssetNotFound("/results.html".into())));
    }

    #[test]
    fn not_found_is_plain_text_404() {
        let r = not_found();
        assert_eq!(r.status(), StatusCode::NOT_FOUND);
        assert_eq!(
            r.headers().get(header::CONTENT_TYPE).unwrap(),
            "text/plain; charset=utf-8"
        );
    }
}
