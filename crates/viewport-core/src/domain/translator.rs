//! Local event translation: raw pointer/keyboard/wheel events in, remote
//! commands out.
//!
//! The translator is a pure function of the event, the per-viewport context,
//! and an explicit `now` — independent of whichever UI toolkit delivers the
//! events.  The context owns all mutable interaction state for one viewport:
//! the current display measurement, the interaction-focus flag, the held
//! button flag, and the click classifier.  Nothing here performs I/O; the
//! caller forwards the produced command and applies the `prevent_default`
//! decision to the host surface.

use std::time::Instant;

use crate::domain::click::ClickClassifier;
use crate::domain::geometry::{DisplaySize, LogicalPoint, PointerPoint};
use crate::keymap::{self, KeyCommand, Modifiers};
use crate::protocol::commands::{MouseButton, RemoteCommand};

/// A raw local UI event, already stripped of toolkit specifics.
#[derive(Debug, Clone, PartialEq)]
pub enum LocalEvent {
    /// Pointer entered the viewport surface; claims input focus.
    PointerEnter,
    /// Pointer left the surface; releases focus and any held button so a
    /// drag cannot get stuck across an exit.
    PointerLeave,
    /// A button went down over the surface.
    PointerDown,
    /// A button came back up.
    PointerUp,
    /// Pointer moved to a display-pixel position.
    PointerMove { x: f64, y: f64 },
    /// A completed click of `button` at a display-pixel position.  For the
    /// secondary button this is the context-menu gesture, which must be
    /// kept off the local surface and forwarded instead.
    Click { button: MouseButton, x: f64, y: f64 },
    /// Wheel rotation; deltas are device-relative and stay unscaled.
    Wheel { delta_x: f64, delta_y: f64 },
    /// A key went down with the given identifier and modifier state.
    KeyDown {
        key: String,
        key_code: u32,
        modifiers: Modifiers,
    },
}

/// What the host surface must do with the local event after translation.
#[derive(Debug, Clone, PartialEq)]
pub struct Translation {
    /// Command to forward to the backend, if any.
    pub command: Option<RemoteCommand>,
    /// Whether the host must cancel the event's local default handling.
    /// Reserved shortcuts keep `false` so the local browser/OS action
    /// proceeds.
    pub prevent_default: bool,
}

impl Translation {
    /// Nothing to forward, local handling proceeds.
    fn pass() -> Self {
        Self {
            command: None,
            prevent_default: false,
        }
    }

    /// Nothing to forward, but local handling is cancelled.
    fn suppress_local() -> Self {
        Self {
            command: None,
            prevent_default: true,
        }
    }

    /// Forward a command and cancel local handling.
    fn dispatch(command: RemoteCommand) -> Self {
        Self {
            command: Some(command),
            prevent_default: true,
        }
    }
}

/// Per-viewport interaction state.
///
/// Exactly one context exists per viewport instance; all mutation happens
/// synchronously inside a single event-handling turn, so no locking is
/// involved anywhere in this type.
#[derive(Debug, Default)]
pub struct ViewportContext {
    display: Option<DisplaySize>,
    interacting: bool,
    button_held: bool,
    clicks: ClickClassifier,
}

impl ViewportContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a new measurement of the local surface, replacing the
    /// previous one.  Events translated after this call use the new scale;
    /// events already handled keep the coordinates they were mapped with.
    pub fn set_display_size(&mut self, size: DisplaySize) {
        self.display = Some(size);
    }

    /// `true` while the pointer is over the viewport and input focus is
    /// claimed.
    pub fn is_interacting(&self) -> bool {
        self.interacting
    }

    /// `true` while a pointer button is held over the surface.
    pub fn is_button_held(&self) -> bool {
        self.button_held
    }

    fn map(&self, x: f64, y: f64) -> Option<LogicalPoint> {
        self.display?.map_to_logical(PointerPoint { x, y })
    }

    /// Translates one local event into its outbound effect, updating the
    /// interaction state as a side effect.
    pub fn translate(&mut self, event: LocalEvent, now: Instant) -> Translation {
        match event {
            LocalEvent::PointerEnter => {
                self.interacting = true;
                Translation::pass()
            }
            LocalEvent::PointerLeave => {
                self.interacting = false;
                self.button_held = false;
                Translation::pass()
            }
            LocalEvent::PointerDown => {
                self.button_held = true;
                Translation::pass()
            }
            LocalEvent::PointerUp => {
                self.button_held = false;
                Translation::pass()
            }
            LocalEvent::PointerMove { x, y } => {
                if !self.interacting {
                    return Translation::pass();
                }
                match self.map(x, y) {
                    Some(point) => {
                        Translation::dispatch(RemoteCommand::Move { x: point.x, y: point.y })
                    }
                    // Mapping unavailable until the surface is measured.
                    None => Translation::pass(),
                }
            }
            LocalEvent::Click { button, x, y } => {
                let Some(point) = self.map(x, y) else {
                    // Still keep the gesture off the local surface (the
                    // secondary-button case would otherwise open a menu).
                    return Translation::suppress_local();
                };
                let count = self.clicks.classify(point, now);
                Translation::dispatch(RemoteCommand::Click {
                    x: point.x,
                    y: point.y,
                    button,
                    click_count: count.as_u8(),
                })
            }
            LocalEvent::Wheel { delta_x, delta_y } => {
                Translation::dispatch(RemoteCommand::Scroll { delta_x, delta_y })
            }
            LocalEvent::KeyDown {
                key,
                key_code,
                modifiers,
            } => {
                if !self.interacting {
                    return Translation::pass();
                }
                match keymap::translate(&key, key_code, modifiers) {
                    // Reserved shortcut: no command, and the local default
                    // must be allowed to fire.
                    KeyCommand::Suppressed => Translation::pass(),
                    KeyCommand::Literal(c) => {
                        Translation::dispatch(RemoteCommand::Type { text: c.to_string() })
                    }
                    KeyCommand::Structured {
                        key,
                        key_code,
                        modifiers,
                    } => Translation::dispatch(RemoteCommand::KeyPress {
                        key,
                        key_code,
                        modifiers,
                    }),
                }
            }
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn measured_context() -> ViewportContext {
        let mut context = ViewportContext::new();
        context.set_display_size(DisplaySize::new(640.0, 360.0));
        context.translate(LocalEvent::PointerEnter, Instant::now());
        context
    }

    fn key_down(key: &str, key_code: u32, modifiers: Modifiers) -> LocalEvent {
        LocalEvent::KeyDown {
            key: key.to_string(),
            key_code,
            modifiers,
        }
    }

    // ── Interaction focus ─────────────────────────────────────────────────────

    #[test]
    fn test_pointer_enter_claims_focus_and_leave_releases_it() {
        let mut context = ViewportContext::new();
        assert!(!context.is_interacting());

        context.translate(LocalEvent::PointerEnter, Instant::now());
        assert!(context.is_interacting());

        context.translate(LocalEvent::PointerLeave, Instant::now());
        assert!(!context.is_interacting());
    }

    #[test]
    fn test_pointer_leave_clears_held_button() {
        let mut context = measured_context();
        context.translate(LocalEvent::PointerDown, Instant::now());
        assert!(context.is_button_held());

        context.translate(LocalEvent::PointerLeave, Instant::now());
        assert!(!context.is_button_held(), "leave must not leave a stuck drag");
    }

    #[test]
    fn test_move_is_ignored_while_not_interacting() {
        let mut context = ViewportContext::new();
        context.set_display_size(DisplaySize::new(640.0, 360.0));

        let translation =
            context.translate(LocalEvent::PointerMove { x: 10.0, y: 10.0 }, Instant::now());

        assert_eq!(translation.command, None);
        assert!(!translation.prevent_default);
    }

    #[test]
    fn test_keydown_is_ignored_while_not_interacting() {
        let mut context = ViewportContext::new();
        context.set_display_size(DisplaySize::new(640.0, 360.0));

        let translation = context.translate(
            key_down("a", 65, Modifiers::default()),
            Instant::now(),
        );

        assert_eq!(translation.command, None);
    }

    // ── Coordinate mapping ────────────────────────────────────────────────────

    #[test]
    fn test_move_maps_into_logical_space() {
        let mut context = measured_context();

        let translation =
            context.translate(LocalEvent::PointerMove { x: 320.0, y: 180.0 }, Instant::now());

        assert_eq!(
            translation.command,
            Some(RemoteCommand::Move { x: 640, y: 360 })
        );
        assert!(translation.prevent_default);
    }

    #[test]
    fn test_move_before_measurement_dispatches_nothing() {
        let mut context = ViewportContext::new();
        context.translate(LocalEvent::PointerEnter, Instant::now());

        let translation =
            context.translate(LocalEvent::PointerMove { x: 320.0, y: 180.0 }, Instant::now());

        assert_eq!(translation.command, None);
    }

    #[test]
    fn test_click_before_measurement_suppresses_without_command() {
        let mut context = ViewportContext::new();
        context.translate(LocalEvent::PointerEnter, Instant::now());

        let translation = context.translate(
            LocalEvent::Click {
                button: MouseButton::Secondary,
                x: 10.0,
                y: 10.0,
            },
            Instant::now(),
        );

        assert_eq!(translation.command, None);
        assert!(translation.prevent_default, "context menu must stay suppressed");
    }

    #[test]
    fn test_resize_applies_to_the_next_event() {
        let mut context = measured_context();
        context.set_display_size(DisplaySize::new(1280.0, 720.0));

        let translation =
            context.translate(LocalEvent::PointerMove { x: 320.0, y: 180.0 }, Instant::now());

        assert_eq!(
            translation.command,
            Some(RemoteCommand::Move { x: 320, y: 180 })
        );
    }

    // ── Clicks ────────────────────────────────────────────────────────────────

    #[test]
    fn test_center_click_then_rapid_second_click_is_a_double() {
        let mut context = measured_context();
        let t = Instant::now();
        let click = LocalEvent::Click {
            button: MouseButton::Primary,
            x: 320.0,
            y: 180.0,
        };

        let first = context.translate(click.clone(), t);
        let second = context.translate(click, t + Duration::from_millis(150));

        assert_eq!(
            first.command,
            Some(RemoteCommand::Click {
                x: 640,
                y: 360,
                button: MouseButton::Primary,
                click_count: 1,
            })
        );
        assert_eq!(
            second.command,
            Some(RemoteCommand::Click {
                x: 640,
                y: 360,
                button: MouseButton::Primary,
                click_count: 2,
            })
        );
    }

    #[test]
    fn test_secondary_click_is_forwarded_and_menu_suppressed() {
        let mut context = measured_context();

        let translation = context.translate(
            LocalEvent::Click {
                button: MouseButton::Secondary,
                x: 0.0,
                y: 0.0,
            },
            Instant::now(),
        );

        assert!(translation.prevent_default);
        assert!(matches!(
            translation.command,
            Some(RemoteCommand::Click {
                button: MouseButton::Secondary,
                click_count: 1,
                ..
            })
        ));
    }

    // ── Wheel ─────────────────────────────────────────────────────────────────

    #[test]
    fn test_wheel_deltas_are_forwarded_unscaled() {
        // Display is half the logical size, but scroll deltas are
        // device-relative and must not pick up the coordinate scale.
        let mut context = measured_context();

        let translation = context.translate(
            LocalEvent::Wheel {
                delta_x: -3.0,
                delta_y: 120.0,
            },
            Instant::now(),
        );

        assert_eq!(
            translation.command,
            Some(RemoteCommand::Scroll {
                delta_x: -3.0,
                delta_y: 120.0,
            })
        );
    }

    // ── Keyboard ──────────────────────────────────────────────────────────────

    #[test]
    fn test_reserved_shortcut_produces_no_command_and_keeps_local_default() {
        let mut context = measured_context();
        let modifiers = Modifiers {
            ctrl: true,
            ..Modifiers::default()
        };

        let translation = context.translate(key_down("r", 82, modifiers), Instant::now());

        assert_eq!(translation.command, None);
        assert!(
            !translation.prevent_default,
            "reserved shortcuts must proceed locally"
        );
    }

    #[test]
    fn test_printable_key_without_modifiers_becomes_type_command() {
        let mut context = measured_context();

        let translation = context.translate(
            key_down("a", 65, Modifiers::default()),
            Instant::now(),
        );

        assert_eq!(
            translation.command,
            Some(RemoteCommand::Type { text: "a".to_string() })
        );
        assert!(translation.prevent_default);
    }

    #[test]
    fn test_escape_becomes_keypress_never_type() {
        let mut context = measured_context();

        let translation = context.translate(
            key_down("Escape", 27, Modifiers::default()),
            Instant::now(),
        );

        match translation.command {
            Some(RemoteCommand::KeyPress { key, key_code, .. }) => {
                assert_eq!(key, "Escape");
                assert_eq!(key_code, 27);
            }
            other => panic!("expected KeyPress, got {other:?}"),
        }
    }

    #[test]
    fn test_modifier_chord_becomes_keypress_with_modifier_state() {
        let mut context = measured_context();
        let modifiers = Modifiers {
            ctrl: true,
            shift: true,
            ..Modifiers::default()
        };

        let translation = context.translate(key_down("c", 67, modifiers), Instant::now());

        match translation.command {
            Some(RemoteCommand::KeyPress { key, modifiers, .. }) => {
                assert_eq!(key, "c");
                assert!(modifiers.ctrl);
                assert!(modifiers.shift);
            }
            other => panic!("expected KeyPress, got {other:?}"),
        }
    }
}
