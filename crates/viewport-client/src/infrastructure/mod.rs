//! Infrastructure layer: concrete transports behind the application-layer
//! traits.

pub mod rest;
pub mod ws;

pub use rest::{ApiError, BackendApi, SessionInfo, SessionStatus, TabInfo};
pub use ws::WsPushChannel;
