//! Single-vs-double click classification.
//!
//! The backend accepts a `click_count` of 1 or 2 on click commands.  The
//! classifier keeps exactly one record — the last classified click — and
//! pairs a new click with it when both the timing window and the position
//! tolerance hold.  The record is replaced unconditionally after every
//! classification, so there is no triple-click escalation: three rapid
//! clicks at the same point classify as single, double, single (the third
//! click compares against the second, which was already consumed as the
//! tail of a double).

use std::time::{Duration, Instant};

use crate::domain::geometry::LogicalPoint;

/// Maximum gap between two clicks that can pair into a double click.
const DOUBLE_CLICK_WINDOW: Duration = Duration::from_millis(300);

/// Maximum per-axis distance, in logical pixels, between paired clicks.
const DOUBLE_CLICK_RADIUS: i32 = 10;

/// How many clicks a classified click represents.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClickCount {
    Single,
    Double,
}

impl ClickCount {
    /// The `click_count` value carried on the wire.
    pub fn as_u8(self) -> u8 {
        match self {
            ClickCount::Single => 1,
            ClickCount::Double => 2,
        }
    }
}

/// The last classified click; one mutable slot per viewport.
#[derive(Debug, Clone, Copy)]
struct ClickRecord {
    at: Instant,
    point: LogicalPoint,
    /// What the stored click itself classified as.  A click consumed as the
    /// tail of a double is not available for further pairing.
    count: ClickCount,
}

/// Classifies a stream of clicks as single or double.
#[derive(Debug, Default)]
pub struct ClickClassifier {
    last: Option<ClickRecord>,
}

impl ClickClassifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Classifies a click at `point` occurring at `now`, then replaces the
    /// stored record with this click.
    ///
    /// A click is a double iff the stored click was a single, lands within
    /// [`DOUBLE_CLICK_WINDOW`], and is within [`DOUBLE_CLICK_RADIUS`] on
    /// both axes.
    pub fn classify(&mut self, point: LogicalPoint, now: Instant) -> ClickCount {
        let count = match self.last {
            Some(last)
                if last.count == ClickCount::Single
                    && now.duration_since(last.at) < DOUBLE_CLICK_WINDOW
                    && (point.x - last.point.x).abs() < DOUBLE_CLICK_RADIUS
                    && (point.y - last.point.y).abs() < DOUBLE_CLICK_RADIUS =>
            {
                ClickCount::Double
            }
            _ => ClickCount::Single,
        };
        self.last = Some(ClickRecord { at: now, point, count });
        count
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
