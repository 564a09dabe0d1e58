//! Presentation-side state: the frame store and its overlay contract.
//!
//! This is deliberately thin.  The store consumes stream events and the
//! watched connection state, and answers two questions for a host UI: what
//! is the latest frame for a tab, and what overlay (if any) belongs on top
//! of it.  No decoding or drawing happens here.

use std::collections::{HashMap, HashSet};

use viewport_core::{StreamEvent, TabId, ViewportFrame};

use crate::application::connection::ConnectionState;

/// What the host UI should draw over the latest frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Overlay {
    /// Nothing; the latest frame is current.
    Idle,
    /// A navigation is rendering.
    Loading,
    /// Push delivery is down; frames arrive by polling.  Connectivity
    /// feedback, not an error.
    Degraded,
    /// The backend rejected a navigation or interaction.  Distinct from
    /// connectivity loss.
    Error(String),
    /// The session is gone.
    Closed(String),
}

/// Latest frame per tab plus the derived overlay state.
#[derive(Debug, Default)]
pub struct FrameStore {
    frames: HashMap<TabId, ViewportFrame>,
    loading: HashSet<TabId>,
    page_errors: HashMap<TabId, String>,
    interaction_error: Option<String>,
    connection: Option<ConnectionState>,
    closed_reason: Option<String>,
}

impl FrameStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Applies one inbound stream event.  A frame replaces the previous
    /// frame for its tab outright; frames are never merged.
    pub fn apply_event(&mut self, event: StreamEvent) {
        match event {
            StreamEvent::Frame(frame) => {
                self.loading.remove(&frame.tab_id);
                self.frames.insert(frame.tab_id.clone(), frame);
            }
            StreamEvent::Status(status) => {
                if status.loading {
                    self.loading.insert(status.tab_id.clone());
                } else {
                    self.loading.remove(&status.tab_id);
                }
                match status.error {
                    Some(error) => {
                        self.page_errors.insert(status.tab_id, error);
                    }
                    None => {
                        self.page_errors.remove(&status.tab_id);
                    }
                }
            }
            StreamEvent::SessionClosed { reason } => {
                self.closed_reason = Some(reason);
            }
        }
    }

    /// Mirrors the connection state published by the manager.
    pub fn set_connection_state(&mut self, state: ConnectionState) {
        self.connection = Some(state);
    }

    /// Records (or clears) a command rejection surfaced by the dispatcher.
    pub fn set_interaction_error(&mut self, error: Option<String>) {
        self.interaction_error = error;
    }

    /// Latest frame for a tab, if any has arrived.
    pub fn frame(&self, tab: &TabId) -> Option<&ViewportFrame> {
        self.frames.get(tab)
    }

    /// Number of tabs with at least one frame.
    pub fn tab_count(&self) -> usize {
        self.frames.len()
    }

    /// The overlay the host UI should draw for `tab` right now.
    ///
    /// Precedence: a closed session beats everything; then page/interaction
    /// errors; then degraded-connectivity feedback; then loading.
    pub fn overlay(&self, tab: &TabId) -> Overlay {
        if let Some(reason) = &self.closed_reason {
            return Overlay::Closed(reason.clone());
        }
        if let Some(error) = self.page_errors.get(tab) {
            return Overlay::Error(error.clone());
        }
        if let Some(error) = &self.interaction_error {
            return Overlay::Error(error.clone());
        }
        if self.connection == Some(ConnectionState::Degraded) {
            return Overlay::Degraded;
        }
        if self.loading.contains(tab) {
            return Overlay::Loading;
        }
        Overlay::Idle
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
