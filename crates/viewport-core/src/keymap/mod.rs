//! Key translation: local key identifier + modifier state → backend key
//! vocabulary.
//!
//! The backend accepts keyboard input in two shapes: a structured key press
//! (named key, key code, modifier flags) or literal text insertion.  Literal
//! insertion is used for bare printable characters because it is more robust
//! across input-method edge cases than synthesizing a key press.  A small
//! set of local shortcuts is reserved and never forwarded at all.

pub mod named;

use serde::{Deserialize, Serialize};

/// Modifier key state, derived fresh from each keyboard event.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Modifiers {
    #[serde(default)]
    pub ctrl: bool,
    #[serde(default)]
    pub alt: bool,
    #[serde(default)]
    pub shift: bool,
    #[serde(default)]
    pub meta: bool,
}

impl Modifiers {
    /// Returns `true` when a chord-forming modifier is held.  Shift alone
    /// does not count: a shifted printable character is still literal text.
    pub fn has_command_modifier(&self) -> bool {
        self.ctrl || self.alt || self.meta
    }
}

/// The translated form of one local key-down event.
#[derive(Debug, Clone, PartialEq)]
pub enum KeyCommand {
    /// Reserved local shortcut; must not be forwarded, and the local
    /// default handling must be allowed to proceed.
    Suppressed,
    /// A structured key press in the backend vocabulary.
    Structured {
        key: String,
        key_code: u32,
        modifiers: Modifiers,
    },
    /// A single printable character, forwarded as text insertion.
    Literal(char),
}

/// Returns `true` for shortcuts that keep their local browser/OS meaning:
/// Ctrl/Cmd + R, T, or W in either case.
fn is_reserved_shortcut(key: &str, modifiers: Modifiers) -> bool {
    (modifiers.ctrl || modifiers.meta) && matches!(key, "r" | "R" | "t" | "T" | "w" | "W")
}

/// Translates a local key identifier plus modifier state into the backend's
/// key vocabulary.
///
/// Decision order:
/// 1. Reserved shortcuts are suppressed outright.
/// 2. Named keys, and any key pressed with a command modifier held, become
///    structured presses — under the canonical name when the table has one,
///    otherwise under the raw identifier.
/// 3. A bare single-character identifier becomes literal text.
/// 4. Anything else falls back to a structured press under its raw
///    identifier, so an unknown key is never an error.
pub fn translate(key: &str, key_code: u32, modifiers: Modifiers) -> KeyCommand {
    if is_reserved_shortcut(key, modifiers) {
        return KeyCommand::Suppressed;
    }

    if let Some(name) = named::canonical_name(key) {
        return KeyCommand::Structured {
            key: name.to_string(),
            key_code,
            modifiers,
        };
    }

    if modifiers.has_command_modifier() {
        return KeyCommand::Structured {
            key: key.to_string(),
            key_code,
            modifiers,
        };
    }

    let mut chars = key.chars();
    if let (Some(c), None) = (chars.next(), chars.next()) {
        return KeyCommand::Literal(c);
    }

    KeyCommand::Structured {
        key: key.to_string(),
        key_code,
        modifiers,
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
