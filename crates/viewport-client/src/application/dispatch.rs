//! Input command dispatch.
//!
//! The dispatcher glues the pure translator in `viewport-core` to the
//! backend: every local event goes through `ViewportContext::translate`,
//! and any produced command is forwarded through the [`CommandSink`].
//!
//! Command-level failures (the backend rejecting a click or navigation) are
//! a different animal from connectivity loss: they are surfaced to the
//! caller for display, they never touch the connection state, and they
//! never stop further input translation.

use std::sync::Arc;
use std::time::Instant;

use async_trait::async_trait;
use tracing::{debug, warn};

use viewport_core::{DisplaySize, LocalEvent, RemoteCommand, SessionId, ViewportContext};

/// Delivers one command for a session.
///
/// Infrastructure implementations post to the backend; test
/// implementations record calls.  Errors come back as human-readable
/// strings for surfacing, not for matching.
#[async_trait]
pub trait CommandSink: Send + Sync {
    async fn send_command(
        &self,
        session: &SessionId,
        command: RemoteCommand,
    ) -> Result<(), String>;
}

/// Result of feeding one local event through the dispatcher.
#[derive(Debug, Clone, PartialEq)]
pub struct DispatchOutcome {
    /// Whether the host surface must cancel the event's local default
    /// handling.
    pub prevent_default: bool,
    /// Rejection reported by the backend for this command, if any.
    /// Connectivity problems never show up here; they are visible through
    /// the connection state instead.
    pub rejection: Option<String>,
}

/// Per-viewport dispatcher: owns the interaction context and the sink.
pub struct ViewportDispatcher {
    session: SessionId,
    context: ViewportContext,
    sink: Arc<dyn CommandSink>,
}

impl ViewportDispatcher {
    pub fn new(session: SessionId, sink: Arc<dyn CommandSink>) -> Self {
        Self {
            session,
            context: ViewportContext::new(),
            sink,
        }
    }

    /// Records a new measurement of the rendering surface.
    pub fn set_display_size(&mut self, width: f64, height: f64) {
        self.context.set_display_size(DisplaySize::new(width, height));
    }

    /// `true` while the pointer is over the viewport.
    pub fn is_interacting(&self) -> bool {
        self.context.is_interacting()
    }

    /// Translates and dispatches one local event, timestamped now.
    pub async fn handle_event(&mut self, event: LocalEvent) -> DispatchOutcome {
        self.handle_event_at(event, Instant::now()).await
    }

    /// Translates and dispatches one local event with an explicit
    /// timestamp.  Event replay and tests use this to drive the
    /// double-click window deterministically.
    pub async fn handle_event_at(&mut self, event: LocalEvent, now: Instant) -> DispatchOutcome {
        let translation = self.context.translate(event, now);
        let mut outcome = DispatchOutcome {
            prevent_default: translation.prevent_default,
            rejection: None,
        };
        if let Some(command) = translation.command {
            debug!(session = %self.session, endpoint = command.endpoint(), "dispatching command");
            if let Err(rejection) = self.sink.send_command(&self.session, command).await {
                warn!(session = %self.session, "remote command rejected: {rejection}");
                outcome.rejection = Some(rejection);
            }
        }
        outcome
    }

    /// Dispatches a user-initiated navigation.  Navigations bypass the
    /// translator (they originate from the address bar, not the viewport
    /// surface) but share the rejection-surfacing path.
    pub async fn navigate(&self, url: &str) -> Option<String> {
        let command = RemoteCommand::Navigate {
            url: url.to_string(),
        };
        match self.sink.send_command(&self.session, command).await {
            Ok(()) => None,
            Err(rejection) => {
                warn!(session = %self.session, "navigation rejected: {rejection}");
                Some(rejection)
            }
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;
    use viewport_core::Modifiers;

    // ── Test doubles ──────────────────────────────────────────────────────────

    #[derive(Default)]
    struct RecordingSink {
        commands: Mutex<Vec<RemoteCommand>>,
        should_fail: bool,
    }

    #[async_trait]
    impl CommandSink for RecordingSink {
        async fn send_command(
            &self,
            _session: &SessionId,
            command: RemoteCommand,
        ) -> Result<(), String> {
            if self.should_fail {
                return Err("injected rejection".to_string());
            }
            self.commands.lock().unwrap().push(command);
            Ok(())
        }
    }

    fn dispatcher_with(sink: Arc<RecordingSink>) -> ViewportDispatcher {
        let mut dispatcher = ViewportDispatcher::new(SessionId("s-1".to_string()), sink);
        dispatcher.set_display_size(1280.0, 720.0);
        dispatcher
    }

    #[tokio::test]
    async fn test_move_while_interacting_dispatches_move_command() {
        let sink = Arc::new(RecordingSink::default());
        let mut dispatcher = dispatcher_with(Arc::clone(&sink));

        dispatcher.handle_event(LocalEvent::PointerEnter).await;
        let outcome = dispatcher
            .handle_event(LocalEvent::PointerMove { x: 10.0, y: 20.0 })
            .await;

        assert!(outcome.prevent_default);
        assert_eq!(outcome.rejection, None);
        assert_eq!(
            sink.commands.lock().unwrap().as_slice(),
            &[RemoteCommand::Move { x: 10, y: 20 }]
        );
    }

    #[tokio::test]
    async fn test_suppressed_event_sends_nothing() {
        let sink = Arc::new(RecordingSink::default());
        let mut dispatcher = dispatcher_with(Arc::clone(&sink));

        dispatcher.handle_event(LocalEvent::PointerEnter).await;
        let outcome = dispatcher
            .handle_event(LocalEvent::KeyDown {
                key: "w".to_string(),
                key_code: 87,
                modifiers: Modifiers {
                    meta: true,
                    ..Modifiers::default()
                },
            })
            .await;

        assert!(!outcome.prevent_default, "reserved shortcut stays local");
        assert!(sink.commands.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_sink_failure_surfaces_rejection_and_does_not_halt_dispatch() {
        let sink = Arc::new(RecordingSink {
            should_fail: true,
            ..RecordingSink::default()
        });
        let mut dispatcher = dispatcher_with(Arc::clone(&sink));

        dispatcher.handle_event(LocalEvent::PointerEnter).await;
        let outcome = dispatcher
            .handle_event(LocalEvent::Wheel {
                delta_x: 0.0,
                delta_y: 40.0,
            })
            .await;
        assert_eq!(outcome.rejection.as_deref(), Some("injected rejection"));

        // The next event still translates and dispatches.
        let outcome = dispatcher
            .handle_event(LocalEvent::PointerMove { x: 1.0, y: 1.0 })
            .await;
        assert_eq!(outcome.rejection.as_deref(), Some("injected rejection"));
    }

    #[tokio::test]
    async fn test_navigate_reports_rejection() {
        let failing = Arc::new(RecordingSink {
            should_fail: true,
            ..RecordingSink::default()
        });
        let dispatcher = dispatcher_with(failing);

        let rejection = dispatcher.navigate("https://example.com").await;
        assert_eq!(rejection.as_deref(), Some("injected rejection"));
    }

    #[tokio::test]
    async fn test_navigate_dispatches_navigate_command() {
        let sink = Arc::new(RecordingSink::default());
        let dispatcher = dispatcher_with(Arc::clone(&sink));

        let rejection = dispatcher.navigate("https://example.com").await;

        assert_eq!(rejection, None);
        assert_eq!(
            sink.commands.lock().unwrap().as_slice(),
            &[RemoteCommand::Navigate {
                url: "https://example.com".to_string()
            }]
        );
    }
}
