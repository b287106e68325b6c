// src/preview.rs
//! In-page preview: what to play, and the overlay that shows it.

use url::Url;

use crate::derive::ResultsView;

const EMBED_BASE: &str = "https://www.youtube.com/embed/";
const YOUTUBE_HOSTS: &[&str] = &[
    "youtube.com",
    "m.youtube.com",
    "music.youtube.com",
    "youtube-nocookie.com",
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PreviewTarget {
    Embed { video_id: String, embed_url: String },
    Audio { src: String },
    Image { src: String },
    Video { src: String, poster: Option<String> },
}

impl PreviewTarget {
    /// Preview source is the download URL, then the source URL, then the thumbnail.
    /// `None` leaves the preview control disabled.
    pub fn resolve(view: &ResultsView) -> Option<Self> {
        let src = view
            .download_url
            .clone()
            .or_else(|| (!view.source_url.is_empty()).then(|| view.source_url.clone()))
            .or_else(|| view.thumbnail_url.clone())?;

        let video_id = Url::parse(&src).ok().and_then(|u| youtube_video_id(&u));
        if let Some(video_id) = video_id {
            let embed_url = format!("{EMBED_BASE}{video_id}");
            return Some(PreviewTarget::Embed {
                video_id,
                embed_url,
            });
        }

        Some(match view.media_type.as_str() {
            "audio" => PreviewTarget::Audio { src },
            "image" => PreviewTarget::Image { src },
            _ => PreviewTarget::Video {
                src,
                poster: view.thumbnail_url.clone(),
            },
        })
    }
}

pub fn is_youtube_host(host: &str) -> bool {
    let h = host.to_ascii_lowercase();
    let h = h.strip_prefix("www.").unwrap_or(&h);
    h == "youtu.be" || YOUTUBE_HOSTS.contains(&h)
}

/// Video id from `youtu.be/<id>`, `?v=<id>`, `/shorts/<id>` or `/embed/<id>`.
pub fn youtube_video_id(url: &Url) -> Option<String> {
    let host = url.host_str()?;
    if !is_youtube_host(host) {
        return None;
    }
    let segments: Vec<&str> = url
        .path_segments()
        .map(|s| s.filter(|p| !p.is_empty()).collect())
        .unwrap_or_default();

    let candidate = if host.to_ascii_lowercase().ends_with("youtu.be") {
        segments.last().map(|s| s.to_string())
    } else if let Some((_, v)) = url.query_pairs().find(|(k, _)| k == "v") {
        Some(v.into_owned())
    } else {
        segments
            .windows(2)
            .find(|w| w[0] == "shorts" || w[0] == "embed")
            .map(|w| w[1].to_string())
    };

    candidate.filter(|id| {
        !id.is_empty()
            && id
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
    })
}

// ---------------------------------------------------------------------------
// Overlay
// ---------------------------------------------------------------------------

/// Temporary listeners attached while the overlay is open.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListenerKind {
    CloseControl,
    Backdrop,
    Keydown,
}

const OVERLAY_LISTENERS: [ListenerKind; 3] = [
    ListenerKind::CloseControl,
    ListenerKind::Backdrop,
    ListenerKind::Keydown,
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OverlayEvent {
    CloseClicked,
    Click { inside_content: bool },
    Key(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DismissReason {
    CloseControl,
    ClickOutside,
    EscapeKey,
    Dropped,
}

/// Page-level state the overlay touches. Everything here is restored on close.
#[derive(Debug, Default)]
pub struct Page {
    listeners: Vec<ListenerKind>,
    scroll_locked: bool,
    showing: Option<PreviewTarget>,
}

impl Page {
    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }

    pub fn is_scroll_locked(&self) -> bool {
        self.scroll_locked
    }

    pub fn showing(&self) -> Option<&PreviewTarget> {
        self.showing.as_ref()
    }
}

#[derive(Debug, Default)]
pub struct Overlay {
    page: Page,
}

impl Overlay {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn page(&self) -> &Page {
        &self.page
    }

    /// Show `target`. The returned session owns the listeners until it closes or drops.
    pub fn open(&mut self, target: PreviewTarget) -> OverlaySession<'_> {
        self.page.listeners.extend_from_slice(&OVERLAY_LISTENERS);
        self.page.scroll_locked = true;
        self.page.showing = Some(target);
        OverlaySession {
            page: &mut self.page,
            closed: None,
        }
    }
}

pub struct OverlaySession<'a> {
    page: &'a mut Page,
    closed: Option<DismissReason>,
}

impl OverlaySession<'_> {
    pub fn is_open(&self) -> bool {
        self.closed.is_none()
    }

    pub fn target(&self) -> Option<&PreviewTarget> {
        self.page.showing.as_ref()
    }

    pub fn listener_count(&self) -> usize {
        self.page.listener_count()
    }

    /// Feed a page event. Returns the dismissal reason when the event closes the overlay.
    pub fn dispatch(&mut self, event: OverlayEvent) -> Option<DismissReason> {
        if !self.is_open() {
            return None;
        }
        let reason = match event {
            OverlayEvent::CloseClicked => DismissReason::CloseControl,
            OverlayEvent::Click {
                inside_content: false,
            } => DismissReason::ClickOutside,
            OverlayEvent::Key(k) if k == "Escape" || k == "Esc" => DismissReason::EscapeKey,
            _ => return None,
        };
        self.teardown(reason);
        Some(reason)
    }

    pub fn close(mut self) -> DismissReason {
        self.teardown(DismissReason::CloseControl);
        DismissReason::CloseControl
    }

    fn teardown(&mut self, reason: DismissReason) {
        if self.closed.is_some() {
            return;
        }
        self.page
            .listeners
            .retain(|l| !OVERLAY_LISTENERS.contains(l));
        self.page.scroll_locked = false;
        self.page.showing = None;
        self.closed = Some(reason);
        tracing::trace!(?reason, "preview overlay closed");
    }
}

impl Drop for OverlaySession<'_> {
    fn drop(&mut self) {
        self.teardown(DismissReason::Dropped);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::derive::derive_from_normalized;
    use crate::normalize::NormalizedInfo;

    fn id(u: &str) -> Option<String> {
        youtube_video_id(&Url::parse(u).unwrap())
    }

    #[test]
    fn youtube_id_forms() {
        assert_eq!(id("https://youtu.be/dQw4w9WgXcQ").as_deref(), Some("dQw4w9WgXcQ"));
        assert_eq!(
            id("https://www.youtube.com/watch?v=dQw4w9WgXcQ&t=10").as_deref(),
            Some("dQw4w9WgXcQ")
        );
        assert_eq!(id("https://m.youtube.com/shorts/abc_DEF-123").as_deref(), Some("abc_DEF-123"));
        assert_eq!(id("https://www.youtube.com/embed/xyz").as_deref(), Some("xyz"));
        assert_eq!(id("https://www.youtube.com/feed/trending"), None);
        assert_eq!(id("https://vimeo.com/12345"), None);
        assert_eq!(id("https://notyoutube.com/watch?v=abc"), None);
    }

    fn view(source: &str, info: NormalizedInfo) -> ResultsView {
        derive_from_normalized(source, info)
    }

    #[test]
    fn resolve_priority_and_kinds() {
        let v = view(
            "https://www.tiktok.com/@cat/video/1",
            NormalizedInfo {
                download_url: Some("https://cdn/x.mp4".into()),
                thumbnail_url: Some("https://cdn/t.jpg".into()),
                ..Default::default()
            },
        );
        assert_eq!(
            PreviewTarget::resolve(&v),
            Some(PreviewTarget::Video {
                src: "https://cdn/x.mp4".into(),
                poster: Some("https://cdn/t.jpg".into()),
            })
        );

        let v = view(
            "https://instagram.com/p/x",
            NormalizedInfo {
                media_type: Some("audio".into()),
                ..Default::default()
            },
        );
        assert_eq!(
            PreviewTarget::resolve(&v),
            Some(PreviewTarget::Audio {
                src: "https://instagram.com/p/x".into()
            })
        );

        let v = view(
            "",
            NormalizedInfo {
                media_type: Some("image".into()),
                thumbnail_url: Some("https://cdn/t.jpg".into()),
                ..Default::default()
            },
        );
        assert_eq!(
            PreviewTarget::resolve(&v),
            Some(PreviewTarget::Image {
                src: "https://cdn/t.jpg".into()
            })
        );

        assert_eq!(PreviewTarget::resolve(&view("", NormalizedInfo::default())), None);
    }

    #[test]
    fn youtube_source_becomes_embed() {
        let v = view(
            "https://youtu.be/dQw4w9WgXcQ",
            NormalizedInfo {
                hosting: Some("youtube".into()),
                ..Default::default()
            },
        );
        assert_eq!(
            PreviewTarget::resolve(&v),
            Some(PreviewTarget::Embed {
                video_id: "dQw4w9WgXcQ".into(),
                embed_url: "https://www.youtube.com/embed/dQw4w9WgXcQ".into(),
            })
        );
    }

    fn target() -> PreviewTarget {
        PreviewTarget::Video {
            src: "https://cdn/x.mp4".into(),
            poster: None,
        }
    }

    #[test]
    fn every_dismissal_path_releases_listeners() {
        let cases = [
            (OverlayEvent::CloseClicked, DismissReason::CloseControl),
            (
                OverlayEvent::Click {
                    inside_content: false,
                },
                DismissReason::ClickOutside,
            ),
            (OverlayEvent::Key("Escape".into()), DismissReason::EscapeKey),
            (OverlayEvent::Key("Esc".into()), DismissReason::EscapeKey),
        ];
        let mut overlay = Overlay::new();
        for (event, expected) in cases {
            let mut s = overlay.open(target());
            assert_eq!(s.listener_count(), 3);
            assert_eq!(s.dispatch(OverlayEvent::Key("Enter".into())), None);
            assert_eq!(
                s.dispatch(OverlayEvent::Click {
                    inside_content: true
                }),
                None
            );
            assert!(s.is_open());
            assert_eq!(s.dispatch(event), Some(expected));
            assert!(!s.is_open());
            assert_eq!(s.listener_count(), 0);
            // further events are ignored once closed
            assert_eq!(s.dispatch(OverlayEvent::CloseClicked), None);
            drop(s);
            assert_eq!(overlay.page().listener_count(), 0);
            assert!(!overlay.page().is_scroll_locked());
            assert!(overlay.page().showing().is_none());
        }
    }

    #[test]
    fn dropping_or_closing_session_restores_page() {
        let mut overlay = Overlay::new();
        {
            let s = overlay.open(target());
            assert!(s.target().is_some());
        }
        assert_eq!(overlay.page().listener_count(), 0);
        assert!(!overlay.page().is_scroll_locked());

        let s = overlay.open(target());
        assert_eq!(s.close(), DismissReason::CloseControl);
        assert_eq!(overlay.page().listener_count(), 0);
    }

    #[test]
    fn repeated_opens_do_not_leak_listeners() {
        let mut overlay = Overlay::new();
        for _ in 0..10 {
            let s = overlay.open(target());
            assert_eq!(s.listener_count(), 3);
        }
        assert_eq!(overlay.page().listener_count(), 0);
    }
}
