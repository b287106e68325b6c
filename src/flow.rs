// src/flow.rs
//! Home → results page flows.
//!
//! Submission: validate, call the info endpoint, write the session slot, go to results.
//! Results: take the slot, derive what to show, or bounce back home.

use std::sync::atomic::{AtomicBool, Ordering};

use crate::derive::{derive_results, ResultsView};
use crate::error::AppError;
use crate::info::InfoBackend;
use crate::preview::PreviewTarget;
use crate::session::{ResultSlot, SessionStore, SubmissionResult};

pub const HOME_PAGE: &str = "index.html";
pub const RESULTS_PAGE: &str = "results.html";

const LABEL_IDLE: &str = "Download";
const LABEL_BUSY: &str = "Working...";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Navigation {
    Stay,
    Results,
    Home,
}

impl Navigation {
    pub fn target(self) -> Option<&'static str> {
        match self {
            Navigation::Stay => None,
            Navigation::Results => Some(RESULTS_PAGE),
            Navigation::Home => Some(HOME_PAGE),
        }
    }
}

/// Submit button. Disabled while a request is in flight.
#[derive(Debug, Default)]
pub struct SubmitControl {
    busy: AtomicBool,
}

impl SubmitControl {
    pub fn is_disabled(&self) -> bool {
        self.busy.load(Ordering::Acquire)
    }

    pub fn label(&self) -> &'static str {
        if self.is_disabled() {
            LABEL_BUSY
        } else {
            LABEL_IDLE
        }
    }

    fn begin(&self) -> Result<SubmitGuard<'_>, AppError> {
        self.busy
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .map_err(|_| AppError::Busy)?;
        Ok(SubmitGuard { control: self })
    }
}

/// Re-enables the control however the request ends.
struct SubmitGuard<'a> {
    control: &'a SubmitControl,
}

impl Drop for SubmitGuard<'_> {
    fn drop(&mut self) {
        self.control.busy.store(false, Ordering::Release);
    }
}

/// What the home page shows after a submission attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmitOutcome {
    pub navigation: Navigation,
    pub alert: Option<String>,
}

#[derive(Debug, Default)]
pub struct HomeView {
    pub input: String,
    pub control: SubmitControl,
}

impl HomeView {
    pub fn new(input: impl Into<String>) -> Self {
        Self {
            input: input.into(),
            control: SubmitControl::default(),
        }
    }

    /// Button click. Errors become an alert and leave the page (and the input) as is.
    pub async fn handle_submit<B, S>(&self, backend: &B, store: &S) -> SubmitOutcome
    where
        B: InfoBackend + ?Sized,
        S: SessionStore + ?Sized,
    {
        match submit(&self.input, &self.control, backend, store).await {
            Ok(navigation) => SubmitOutcome {
                navigation,
                alert: None,
            },
            // A second click while busy is swallowed; the button is disabled anyway.
            Err(AppError::Busy) => SubmitOutcome {
                navigation: Navigation::Stay,
                alert: None,
            },
            Err(e) => SubmitOutcome {
                navigation: Navigation::Stay,
                alert: Some(e.user_message()),
            },
        }
    }

    /// Enter in the input submits; other keys do nothing.
    pub async fn handle_key<B, S>(&self, key: &str, backend: &B, store: &S) -> Option<SubmitOutcome>
    where
        B: InfoBackend + ?Sized,
        S: SessionStore + ?Sized,
    {
        if key != "Enter" {
            return None;
        }
        Some(self.handle_submit(backend, store).await)
    }
}

pub async fn submit<B, S>(
    input: &str,
    control: &SubmitControl,
    backend: &B,
    store: &S,
) -> Result<Navigation, AppError>
where
    B: InfoBackend + ?Sized,
    S: SessionStore + ?Sized,
{
    let url = input.trim();
    crate::validate::validate_source_url(url)?;

    let _guard = control.begin()?;
    tracing::info!(source = %url, "requesting media info");
    let data = backend.fetch_info(url).await?;

    ResultSlot::new(store).store(&SubmissionResult::new(url, data));
    Ok(Navigation::Results)
}

/// Results page after a successful load.
#[derive(Debug, Clone, PartialEq)]
pub struct ResultsPage {
    pub view: ResultsView,
    pub preview: Option<PreviewTarget>,
}

impl ResultsPage {
    /// "Download another" goes back home.
    pub fn download_another(&self) -> Navigation {
        Navigation::Home
    }
}

/// Take the stored submission and derive the page. The slot is empty afterwards.
pub fn load_results<S: SessionStore + ?Sized>(store: &S) -> Result<ResultsPage, AppError> {
    let result = ResultSlot::new(store).take()?;
    let view = derive_results(&result);
    let preview = PreviewTarget::resolve(&view);
    Ok(ResultsPage { view, preview })
}

/// Results page entry point: anything unusable in storage redirects home.
pub fn open_results<S: SessionStore + ?Sized>(store: &S) -> Result<ResultsPage, Navigation> {
    load_results(store).map_err(|e| {
        tracing::debug!(error = %e, "no usable stored result, redirecting home");
        Navigation::Home
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::normalize::InfoResponse;
    use crate::session::MemorySessionStore;
    use serde_json::json;
    use std::sync::atomic::AtomicUsize;

    struct Stub {
        reply: Result<InfoResponse, AppError>,
        calls: AtomicUsize,
    }

    #[async_trait::async_trait]
    impl InfoBackend for Stub {
        async fn fetch_info(&self, _url: &str) -> Result<InfoResponse, AppError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.reply.clone()
        }
    }

    fn ok_stub() -> Stub {
        Stub {
            reply: Ok(json!({ "caption": "Cat Video" }).as_object().cloned().unwrap()),
            calls: AtomicUsize::new(0),
        }
    }

    #[tokio::test]
    async fn invalid_url_never_reaches_backend() {
        let stub = ok_stub();
        let store = MemorySessionStore::new();
        let home = HomeView::new("ftp://example.com/x");
        let out = home.handle_submit(&stub, &store).await;
        assert_eq!(out.navigation, Navigation::Stay);
        assert_eq!(out.alert.as_deref(), Some("Please enter a valid URL."));
        assert_eq!(stub.calls.load(Ordering::SeqCst), 0);
        assert_eq!(home.input, "ftp://example.com/x");
    }

    #[tokio::test]
    async fn success_writes_slot_and_navigates() {
        let stub = ok_stub();
        let store = MemorySessionStore::new();
        let home = HomeView::new("  https://www.tiktok.com/@cat/video/1 ");
        let out = home.handle_submit(&stub, &store).await;
        assert_eq!(out.navigation, Navigation::Results);
        assert_eq!(out.navigation.target(), Some(RESULTS_PAGE));
        assert!(!home.control.is_disabled());

        let page = load_results(&store).unwrap();
        assert_eq!(page.view.title, "Cat Video");
        assert_eq!(page.view.source_url, "https://www.tiktok.com/@cat/video/1");
        // read once
        assert_eq!(open_results(&store), Err(Navigation::Home));
    }

    #[tokio::test]
    async fn failure_re_enables_control() {
        let stub = Stub {
            reply: Err(AppError::RequestFailed("rate limited".into())),
            calls: AtomicUsize::new(0),
        };
        let store = MemorySessionStore::new();
        let home = HomeView::new("https://instagram.com/p/x");
        let out = home.handle_submit(&stub, &store).await;
        assert_eq!(out.alert.as_deref(), Some("rate limited"));
        assert_eq!(out.navigation, Navigation::Stay);
        assert!(!home.control.is_disabled());
        assert_eq!(home.control.label(), "Download");
        assert_eq!(open_results(&store), Err(Navigation::Home));
    }

    #[tokio::test]
    async fn busy_control_refuses_second_submission() {
        let stub = ok_stub();
        let store = MemorySessionStore::new();
        let control = SubmitControl::default();
        let _held = control.begin().unwrap();
        assert_eq!(control.label(), "Working...");
        let r = submit("https://instagram.com/p/x", &control, &stub, &store).await;
        assert_eq!(r, Err(AppError::Busy));
        assert_eq!(stub.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn only_enter_submits() {
        let stub = ok_stub();
        let store = MemorySessionStore::new();
        let home = HomeView::new("https://instagram.com/p/x");
        assert!(home.handle_key("a", &stub, &store).await.is_none());
        let out = home.handle_key("Enter", &stub, &store).await.unwrap();
        assert_eq!(out.navigation, Navigation::Results);
    }

    #[test]
    fn download_another_goes_home() {
        let store = MemorySessionStore::new();
        ResultSlot::new(&store)
            .store(&SubmissionResult::new("https://x.com/a", InfoResponse::new()));
        let page = load_results(&store).unwrap();
        assert_eq!(page.download_another().target(), Some(HOME_PAGE));
    }
}
