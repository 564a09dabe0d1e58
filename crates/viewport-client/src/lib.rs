//! viewport-client library crate.
//!
//! This crate is the runtime half of the remote viewport client: it keeps a
//! continuously-updated frame visible despite an unreliable push channel and
//! forwards translated input commands to the backend.
//!
//! # Architecture
//!
//! ```text
//! Remote automation backend
//!   (REST + WebSocket)
//!         ↕
//! [viewport-client]
//!   ├── domain/           Pure types: ClientConfig
//!   ├── application/      Connection state machine, command dispatch,
//!   │                     frame store, suggestion debounce
//!   └── infrastructure/
//!         ├── rest/       reqwest client (sessions, commands, frame pull)
//!         └── ws/         tokio-tungstenite push channel
//! ```
//!
//! # Layer rules
//!
//! - `domain` has no I/O and no async.
//! - `application` depends on `domain` and `viewport-core`, and reaches the
//!   network only through the traits it defines (`PushChannel`,
//!   `FramePuller`, `CommandSink`, `SuggestionBackend`).
//! - `infrastructure` implements those traits on top of `reqwest` and
//!   `tokio-tungstenite`.

/// Domain layer: configuration types (no I/O beyond file loading).
pub mod domain;

/// Application layer: connection lifecycle, dispatch, and presentation state.
pub mod application;

/// Infrastructure layer: REST client and WebSocket push channel.
pub mod infrastructure;
