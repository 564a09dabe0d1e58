//! Outbound remote-control commands.
//!
//! Every message is a JSON object with a `"type"` field identifying the
//! variant; all other fields are flattened into the same object:
//!
//! ```json
//! {"type":"click","x":640,"y":360,"button":"primary","click_count":2}
//! ```
//!
//! Positional fields are always in the backend's logical 1280×720 space.
//! Wheel deltas are the exception: they are device-relative and forwarded
//! unscaled.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::keymap::Modifiers;

/// Opaque session identifier issued by the session-management backend.
///
/// The client never generates or validates these; it only threads them
/// through commands and frame events.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionId(pub String);

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Opaque tab identifier issued by the backend.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TabId(pub String);

impl fmt::Display for TabId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Mouse buttons in the backend vocabulary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MouseButton {
    Primary,
    Secondary,
    Middle,
}

impl MouseButton {
    /// Converts a DOM `MouseEvent.button` code: 0 = primary, 1 = middle,
    /// 2 = secondary.  Other codes (back/forward thumb buttons) have no
    /// remote equivalent.
    pub fn from_dom_code(code: u8) -> Option<Self> {
        match code {
            0 => Some(MouseButton::Primary),
            1 => Some(MouseButton::Middle),
            2 => Some(MouseButton::Secondary),
            _ => None,
        }
    }
}

/// The finite command set the remote automation backend understands.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum RemoteCommand {
    /// Absolute cursor position in logical space.
    Move { x: i32, y: i32 },
    /// A classified click at a logical position.
    Click {
        x: i32,
        y: i32,
        button: MouseButton,
        click_count: u8,
    },
    /// Literal text insertion; one character per local key event.
    Type { text: String },
    /// A structured key press with modifier state.
    #[serde(rename = "keypress")]
    KeyPress {
        key: String,
        key_code: u32,
        modifiers: Modifiers,
    },
    /// Device-relative wheel deltas, forwarded unscaled.
    Scroll { delta_x: f64, delta_y: f64 },
    /// User-initiated navigation of the active tab.
    Navigate { url: String },
}

impl RemoteCommand {
    /// The backend endpoint segment this command is dispatched to.
    pub fn endpoint(&self) -> &'static str {
        match self {
            RemoteCommand::Move { .. } => "move",
            RemoteCommand::Click { .. } => "click",
            RemoteCommand::Type { .. } => "type",
            RemoteCommand::KeyPress { .. } => "keypress",
            RemoteCommand::Scroll { .. } => "scroll",
            RemoteCommand::Navigate { .. } => "navigate",
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
