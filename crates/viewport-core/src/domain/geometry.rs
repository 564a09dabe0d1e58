//! Coordinate mapping between the local display surface and the backend's
//! fixed logical viewport.
//!
//! The remote automation backend renders every session at a fixed logical
//! size and expects all positional commands in that space, never in local
//! display pixels.  The local rendering surface can be any size; the scale
//! factor is recomputed from the current measurement on every event, so a
//! resize takes effect for the very next event with no cached state to
//! invalidate.

use serde::{Deserialize, Serialize};

/// Width of the backend's logical coordinate space, in pixels.
pub const LOGICAL_WIDTH: u32 = 1280;

/// Height of the backend's logical coordinate space, in pixels.
pub const LOGICAL_HEIGHT: u32 = 720;

/// Current pixel dimensions of the local rendering surface.
///
/// Replaced wholesale when the surface is resized; events translated after
/// the replacement use the new scale, events already handled keep the
/// coordinates they were mapped with.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DisplaySize {
    /// Measured width in display pixels.
    pub width: f64,
    /// Measured height in display pixels.
    pub height: f64,
}

/// A pointer position in local display pixels, produced per raw event.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerPoint {
    pub x: f64,
    pub y: f64,
}

/// An integer position in the backend's logical coordinate space.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LogicalPoint {
    pub x: i32,
    pub y: i32,
}

impl DisplaySize {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// Returns `true` once both dimensions have a usable (strictly positive)
    /// measurement.
    pub fn is_measured(&self) -> bool {
        self.width > 0.0 && self.height > 0.0
    }

    /// Maps a local pointer position into the logical viewport space,
    /// rounding to the nearest integer pixel.
    ///
    /// Returns `None` while the surface is unmeasured (a zero or negative
    /// dimension); callers must skip dispatch in that case rather than send
    /// a malformed coordinate.
    pub fn map_to_logical(&self, point: PointerPoint) -> Option<LogicalPoint> {
        if !self.is_measured() {
            return None;
        }
        let scale_x = f64::from(LOGICAL_WIDTH) / self.width;
        let scale_y = f64::from(LOGICAL_HEIGHT) / self.height;
        Some(LogicalPoint {
            x: (point.x * scale_x).round() as i32,
            y: (point.y * scale_y).round() as i32,
        })
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
