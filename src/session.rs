// src/session.rs
//! Tab-scoped session slot carrying the info result from the home view to the results view.
//!
//! Ownership: the submission flow is the only writer ([`ResultSlot::store`]); the results
//! flow is the only reader, and reading clears the slot ([`ResultSlot::take`]).

use std::collections::HashMap;
use std::sync::Mutex;

use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::error::AppError;
use crate::normalize::InfoResponse;

pub const RESULT_STORAGE_KEY: &str = "sentirax_result";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmissionResult {
    #[serde(default)]
    pub source_url: String,
    #[serde(default)]
    pub data: InfoResponse,
    /// Epoch milliseconds.
    #[serde(default)]
    pub fetched_at: i64,
}

impl SubmissionResult {
    pub fn new(source_url: impl Into<String>, data: InfoResponse) -> Self {
        Self {
            source_url: source_url.into(),
            data,
            fetched_at: Utc::now().timestamp_millis(),
        }
    }
}

/// String key/value store with the semantics of browser session storage.
pub trait SessionStore: Send + Sync {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&self, key: &str, value: String);
    fn clear(&self, key: &str);
}

/// In-process store; lives as long as the "tab" that owns it.
#[derive(Debug, Default)]
pub struct MemorySessionStore {
    inner: Mutex<HashMap<String, String>>,
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SessionStore for MemorySessionStore {
    fn get(&self, key: &str) -> Option<String> {
        let m = self.inner.lock().expect("session mutex poisoned");
        m.get(key).cloned()
    }

    fn set(&self, key: &str, value: String) {
        let mut m = self.inner.lock().expect("session mutex poisoned");
        m.insert(key.to_string(), value);
    }

    fn clear(&self, key: &str) {
        let mut m = self.inner.lock().expect("session mutex poisoned");
        m.remove(key);
    }
}

/// Typed single-slot view over a [`SessionStore`].
pub struct ResultSlot<'a, S: SessionStore + ?Sized> {
    store: &'a S,
}

impl<'a, S: SessionStore + ?Sized> ResultSlot<'a, S> {
    pub fn new(store: &'a S) -> Self {
        Self { store }
    }

    pub fn store(&self, result: &SubmissionResult) {
        // String keys and JSON values only, so serialization cannot fail.
        let raw = serde_json::to_string(result).expect("submission result serializes");
        self.store.set(RESULT_STORAGE_KEY, raw);
    }

    /// Read and clear. Missing or unparseable content is reported the same way.
    pub fn take(&self) -> Result<SubmissionResult, AppError> {
        let raw = self
            .store
            .get(RESULT_STORAGE_KEY)
            .ok_or(AppError::StorageMissingOrCorrupt)?;
        self.store.clear(RESULT_STORAGE_KEY);
        serde_json::from_str::<SubmissionResult>(&raw).map_err(|e| {
            tracing::debug!(error = %e, "stored result did not parse");
            AppError::StorageMissingOrCorrupt
        })
    }

    pub fn is_empty(&self) -> bool {
        self.store.get(RESULT_STORAGE_KEY).is_none()
    }
}
