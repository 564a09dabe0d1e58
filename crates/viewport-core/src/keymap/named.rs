//! Canonical backend names for structured keys.
//!
//! Local key identifiers arrive in DOM `KeyboardEvent.key` form.  Keys in
//! this table are always forwarded as structured key presses under their
//! canonical backend name; everything else is decided by the rules in the
//! parent module.  The only identifier that is renamed in transit is the
//! space bar, whose local identifier is a literal `" "`.

/// Returns the canonical backend name for a named key, or `None` when the
/// identifier is not in the named-key table.
pub fn canonical_name(key: &str) -> Option<&'static str> {
    Some(match key {
        "Enter" => "Enter",
        "Tab" => "Tab",
        "Backspace" => "Backspace",
        "Delete" => "Delete",
        "Escape" => "Escape",
        "ArrowUp" => "ArrowUp",
        "ArrowDown" => "ArrowDown",
        "ArrowLeft" => "ArrowLeft",
        "ArrowRight" => "ArrowRight",
        "Home" => "Home",
        "End" => "End",
        "PageUp" => "PageUp",
        "PageDown" => "PageDown",
        " " => "Space",
        "F1" => "F1",
        "F2" => "F2",
        "F3" => "F3",
        "F4" => "F4",
        "F5" => "F5",
        "F6" => "F6",
        "F7" => "F7",
        "F8" => "F8",
        "F9" => "F9",
        "F10" => "F10",
        "F11" => "F11",
        "F12" => "F12",
        _ => return None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_named_keys_resolve_to_themselves_except_space() {
        let identity_keys = [
            "Enter", "Tab", "Backspace", "Delete", "Escape", "ArrowUp", "ArrowDown", "ArrowLeft",
            "ArrowRight", "Home", "End", "PageUp", "PageDown", "F1", "F2", "F3", "F4", "F5", "F6",
            "F7", "F8", "F9", "F10", "F11", "F12",
        ];
        for key in identity_keys {
            assert_eq!(canonical_name(key), Some(key), "{key} should map to itself");
        }
    }

    #[test]
    fn test_space_bar_identifier_maps_to_space() {
        assert_eq!(canonical_name(" "), Some("Space"));
    }

    #[test]
    fn test_printable_characters_are_not_named_keys() {
        for key in ["a", "Z", "1", "/", "é"] {
            assert_eq!(canonical_name(key), None, "{key:?} should not be named");
        }
    }

    #[test]
    fn test_unlisted_special_keys_are_not_named() {
        // These exist locally but have no canonical entry; they fall through
        // to the raw-identifier fallback in the translator.
        for key in ["Insert", "CapsLock", "MediaPlayPause", "F13"] {
            assert_eq!(canonical_name(key), None);
        }
    }
}
