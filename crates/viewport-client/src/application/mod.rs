//! Application layer: connection lifecycle, input dispatch, presentation
//! state, and the debounced suggestion lookup.
//!
//! Everything here reaches the network only through the traits defined in
//! these modules, so the state machines are fully testable with recording
//! fakes.

pub mod connection;
pub mod dispatch;
pub mod renderer;
pub mod suggest;

pub use connection::{
    ConnectionHandle, ConnectionManager, ConnectionState, ConnectionTuning, FramePuller,
    PushChannel, PushStream, TransportError,
};
pub use dispatch::{CommandSink, DispatchOutcome, ViewportDispatcher};
pub use renderer::{FrameStore, Overlay};
pub use suggest::{SuggestionBackend, SuggestionBatch, SuggestionDebouncer};
