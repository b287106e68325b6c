// src/info.rs
//! Client for the remote info endpoint (`POST {base}/api/info`).

use std::time::Duration;

use anyhow::Context;
use metrics::counter;
use serde::Serialize;
use serde_json::Value;
use url::Url;

use crate::error::AppError;
use crate::normalize::InfoResponse;

pub const INFO_PATH: &str = "/api/info";
const FALLBACK_FAILURE: &str = "Request failed";
const MALFORMED_RESPONSE: &str = "Malformed response";

/// Anything that can resolve a post URL to an info body.
/// The HTTP client is the production implementation; tests may plug in their own.
#[async_trait::async_trait]
pub trait InfoBackend: Send + Sync {
    async fn fetch_info(&self, url: &str) -> Result<InfoResponse, AppError>;
}

#[derive(Serialize)]
struct InfoRequest<'a> {
    url: &'a str,
    db_cache: bool,
}

#[derive(Clone)]
pub struct HttpInfoClient {
    http: reqwest::Client,
    endpoint: Url,
}

impl HttpInfoClient {
    pub fn new(
        api_base: &Url,
        connect_timeout: Duration,
        timeout: Duration,
    ) -> anyhow::Result<Self> {
        let http = reqwest::Client::builder()
            .user_agent(concat!("sentirax-web/", env!("CARGO_PKG_VERSION")))
            .connect_timeout(connect_timeout)
            .timeout(timeout)
            .build()
            .context("building info http client")?;
        Ok(Self {
            http,
            endpoint: endpoint_url(api_base, INFO_PATH),
        })
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }
}

#[async_trait::async_trait]
impl InfoBackend for HttpInfoClient {
    async fn fetch_info(&self, url: &str) -> Result<InfoResponse, AppError> {
        let res = self
            .http
            .post(self.endpoint.clone())
            .json(&InfoRequest {
                url,
                db_cache: false,
            })
            .send()
            .await;

        let rsp = match res {
            Ok(r) => r,
            Err(e) => {
                tracing::warn!(error = %e, "info request transport error");
                counter!("info_requests_total", "outcome" => "transport_error").increment(1);
                return Err(AppError::RequestFailed(e.to_string()));
            }
        };

        let status = rsp.status();
        let raw = match rsp.text().await {
            Ok(t) => t,
            Err(e) => {
                tracing::warn!(status = status.as_u16(), error = %e, "info response body read failed");
                counter!("info_requests_total", "outcome" => "transport_error").increment(1);
                return Err(AppError::RequestFailed(e.to_string()));
            }
        };

        if !status.is_success() {
            let body = parse_error_body(&raw);
            let msg = error_message(&body)
                .or_else(|| status.canonical_reason().map(str::to_string))
                .unwrap_or_else(|| FALLBACK_FAILURE.to_string());
            tracing::warn!(status = status.as_u16(), message = %msg, "info endpoint returned error");
            counter!("info_requests_total", "outcome" => "http_error").increment(1);
            return Err(AppError::RequestFailed(msg));
        }

        match serde_json::from_str::<Value>(&raw) {
            Ok(Value::Object(map)) => {
                counter!("info_requests_total", "outcome" => "ok").increment(1);
                Ok(map)
            }
            other => {
                tracing::warn!(parsed = other.is_ok(), "info endpoint returned a non-object body");
                counter!("info_requests_total", "outcome" => "malformed").increment(1);
                Err(AppError::RequestFailed(MALFORMED_RESPONSE.to_string()))
            }
        }
    }
}

/// Join `path` onto the configured backend base, keeping any base path prefix.
/// Query and fragment of the base are dropped.
pub(crate) fn endpoint_url(base: &Url, path: &str) -> Url {
    let mut url = base.clone();
    let joined = format!("{}{}", base.path().trim_end_matches('/'), path);
    url.set_path(&joined);
    url.set_query(None);
    url.set_fragment(None);
    url
}

/// Error body: JSON if it parses, otherwise the raw text wrapped as `{"error": raw}`.
pub(crate) fn parse_error_body(raw: &str) -> Value {
    serde_json::from_str::<Value>(raw).unwrap_or_else(|_| serde_json::json!({ "error": raw }))
}

/// First non-empty of `detail`, `message`, `error`.
pub(crate) fn error_message(body: &Value) -> Option<String> {
    ["detail", "message", "error"].iter().find_map(|k| {
        match body.get(*k)? {
            Value::String(s) if !s.is_empty() => Some(s.clone()),
            Value::Null | Value::Bool(false) => None,
            Value::String(_) => None,
            other => Some(other.to_string()),
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn error_message_prefers_detail_then_message_then_error() {
        let b = json!({ "error": "e", "message": "m", "detail": "d" });
        assert_eq!(error_message(&b).as_deref(), Some("d"));
        let b = json!({ "error": "e", "message": "m" });
        assert_eq!(error_message(&b).as_deref(), Some("m"));
        let b = json!({ "error": "e", "detail": "" });
        assert_eq!(error_message(&b).as_deref(), Some("e"));
        assert_eq!(error_message(&json!({})), None);
    }

    #[test]
    fn non_json_body_is_wrapped_as_error() {
        let v = parse_error_body("<html>Bad Gateway</html>");
        assert_eq!(error_message(&v).as_deref(), Some("<html>Bad Gateway</html>"));
        let empty = parse_error_body("");
        assert_eq!(error_message(&empty), None);
    }

    #[test]
    fn endpoint_keeps_base_prefix() {
        let base = Url::parse("https://api.example.com/v2/").unwrap();
        assert_eq!(
            endpoint_url(&base, INFO_PATH).as_str(),
            "https://api.example.com/v2/api/info"
        );
        let bare = Url::parse("http://127.0.0.1:8080").unwrap();
        assert_eq!(
            endpoint_url(&bare, INFO_PATH).as_str(),
            "http://127.0.0.1:8080/api/info"
        );
    }
}
