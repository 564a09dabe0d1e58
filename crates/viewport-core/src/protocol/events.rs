//! Inbound events from the backend for a live session.
//!
//! The same vocabulary arrives over both frame-acquisition strategies: the
//! push channel delivers events as JSON text frames, and the polling path
//! wraps each pulled screenshot in a [`StreamEvent::Frame`].

use serde::{Deserialize, Serialize};

use crate::protocol::commands::TabId;

/// An encoded frame image and the tab it belongs to.
///
/// Immutable once received; the next frame for the same tab supersedes it
/// outright — frames are never merged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ViewportFrame {
    /// The tab this frame was rendered for.
    pub tab_id: TabId,
    /// The encoded image, base64 as delivered by the backend.  Opaque to
    /// the client; only the presentation surface decodes it.
    pub data: String,
    /// URL the tab was showing when the frame was captured.
    #[serde(default)]
    pub url: Option<String>,
}

/// Page/navigation status for one tab.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PageStatus {
    pub tab_id: TabId,
    #[serde(default)]
    pub url: Option<String>,
    /// `true` while a navigation is rendering.
    #[serde(default)]
    pub loading: bool,
    /// Navigation failure reported by the backend, distinct from any
    /// connectivity problem on this side.
    #[serde(default)]
    pub error: Option<String>,
}

/// Events delivered for a live session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum StreamEvent {
    /// A freshly rendered frame for one tab.
    Frame(ViewportFrame),
    /// Page status changed for one tab.
    Status(PageStatus),
    /// The backend closed the session; terminal for its channel.
    SessionClosed { reason: String },
}

// ── Tests ─────────────────────────────────────────────────────────────────────
