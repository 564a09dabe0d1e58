//! # viewport-core
//!
//! Shared library for the remote viewport client containing the input-event
//! translation logic, coordinate mapping, click classification, the key
//! translation table, and the JSON command/event vocabulary spoken with the
//! remote automation backend.
//!
//! This crate is pure: it has zero dependencies on sockets, async runtimes,
//! or UI frameworks.  Everything here is a deterministic function of its
//! inputs (plus explicit `Instant` arguments for time-sensitive decisions),
//! which is what makes the input pipeline unit-testable without a rendering
//! surface.
//!
//! Module map:
//!
//! - **`domain`** – Coordinate-space mapping between the local display
//!   surface and the backend's fixed 1280×720 logical viewport, the
//!   single-slot double-click classifier, and the event translator that
//!   orchestrates both.
//!
//! - **`keymap`** – Translation from local key identifiers plus modifier
//!   state into the backend's key vocabulary, including the reserved
//!   shortcuts that must never leave the local machine.
//!
//! - **`protocol`** – The typed JSON messages exchanged with the backend:
//!   outbound remote-control commands and inbound frame/status events.

pub mod domain;
pub mod keymap;
pub mod protocol;

pub use domain::click::{ClickClassifier, ClickCount};
pub use domain::geometry::{
    DisplaySize, LogicalPoint, PointerPoint, LOGICAL_HEIGHT, LOGICAL_WIDTH,
};
pub use domain::translator::{LocalEvent, Translation, ViewportContext};
pub use keymap::{KeyCommand, Modifiers};
pub use protocol::commands::{MouseButton, RemoteCommand, SessionId, TabId};
pub use protocol::events::{PageStatus, StreamEvent, ViewportFrame};
