//! Error kinds shared by the submission flow, the results flow and the asset server.

use thiserror::Error;

pub const MSG_INVALID_URL: &str = "Please enter a valid URL.";
pub const MSG_GENERIC: &str = "Something went wrong.";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AppError {
    /// Input rejected before any network call.
    #[error("invalid url")]
    InvalidUrl,

    /// Non-2xx, transport failure, or malformed body from the info endpoint.
    #[error("info request failed: {0}")]
    RequestFailed(String),

    /// No stored result, or the stored JSON did not parse.
    #[error("stored result missing or corrupt")]
    StorageMissingOrCorrupt,

    /// Static path outside the allow-list, or the file could not be read.
    #[error("asset not found: {0}")]
    AssetNotFound(String),

    /// A submission is already in flight.
    #[error("a request is already in progress")]
    Busy,
}

impl AppError {
    /// Text shown in the blocking alert for this error.
    pub fn user_message(&self) -> String {
        match self {
            AppError::InvalidUrl => MSG_INVALID_URL.to_string(),
            AppError::RequestFailed(msg) if !msg.trim().is_empty() => msg.clone(),
            AppError::RequestFailed(_) => MSG_GENERIC.to_string(),
            AppError::StorageMissingOrCorrupt => MSG_GENERIC.to_string(),
            AppError::AssetNotFound(_) => "Not found".to_string(),
            AppError::Busy => "Working...".to_string(),
        }
    }
}
