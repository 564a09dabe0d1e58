//! The typed JSON vocabulary exchanged with the remote automation backend:
//! outbound remote-control commands and inbound frame/status events.

pub mod commands;
pub mod events;
