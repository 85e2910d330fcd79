//! Cursor tracking and pinch debouncing.
//!
//! Turns per-frame landmark detections into a smoothed on-screen cursor
//! (driven by the thumb tip) and a three-level pinch signal:
//!
//! - `touching`: raw thumb/index distance below threshold this frame
//! - `pinch_active`: touching for at least `debounce_frames` consecutive frames
//! - `pinch_rising_edge`: the single frame where `pinch_active` turns on
//!
//! This is the only place pinch edges are computed.  Losing the hand for
//! one frame clears everything, so a pinch is never carried across a
//! detection gap.

use serde::Serialize;
use tracing::debug;

use super::landmarks::LandmarkSet;
use crate::geometry::Point;

/// Reference capture size the pinch distance was tuned at.
pub const REFERENCE_WIDTH: f32 = 1280.0;
pub const REFERENCE_HEIGHT: f32 = 720.0;

// ── Config ─────────────────────────────────────────────────

/// Tuning constants for cursor smoothing and pinch detection.
#[derive(Debug, Clone)]
pub struct TrackerConfig {
    /// Exponential smoothing factor in (0, 1].  Higher follows the hand
    /// faster but passes more detector jitter through; lower is steadier
    /// but lags.  Deployed builds have used values between 0.2 and 0.7.
    pub smoothing: f32,
    /// Thumb/index distance (pixels) below which the fingers are touching.
    pub pinch_distance_px: f32,
    /// Consecutive touching frames before a pinch is confirmed.
    pub debounce_frames: u32,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            smoothing: 0.7,
            pinch_distance_px: 40.0,
            debounce_frames: 2,
        }
    }
}

impl TrackerConfig {
    /// Scale the pinch distance from the 1280x720 reference to another
    /// capture size, proportionally to the frame diagonal.
    pub fn scaled_for(mut self, width: f32, height: f32) -> Self {
        let reference = (REFERENCE_WIDTH * REFERENCE_WIDTH + REFERENCE_HEIGHT * REFERENCE_HEIGHT).sqrt();
        let actual = (width * width + height * height).sqrt();
        if actual > 0.0 {
            self.pinch_distance_px *= actual / reference;
        }
        self
    }
}

// ── Sample ─────────────────────────────────────────────────

/// Tracker output for one frame.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct CursorSample {
    /// Smoothed cursor, absent when no hand is detected.
    pub cursor: Option<Point>,
    pub touching: bool,
    pub pinch_active: bool,
    pub pinch_rising_edge: bool,
}

impl CursorSample {
    /// Output for a frame with no hand.
    pub const ABSENT: Self = Self {
        cursor: None,
        touching: false,
        pinch_active: false,
        pinch_rising_edge: false,
    };
}

// ── Tracker ────────────────────────────────────────────────

/// Stateful cursor/pinch tracker.  Mutated once per frame.
pub struct CursorTracker {
    pub config: TrackerConfig,
    /// Smoothed cursor position.
    position: Option<Point>,
    /// Consecutive touching frames.
    run_length: u32,
    /// Debounced pinch state from the previous frame.
    pinch_active: bool,
    /// Rising edges seen since creation (status only).
    pinch_count: u64,
}

impl CursorTracker {
    pub fn new(config: TrackerConfig) -> Self {
        Self {
            config,
            position: None,
            run_length: 0,
            pinch_active: false,
            pinch_count: 0,
        }
    }

    /// Process one frame.  `None` means no hand was detected.
    pub fn update(&mut self, hand: Option<&LandmarkSet>) -> CursorSample {
        let Some(hand) = hand else {
            self.reset();
            return CursorSample::ABSENT;
        };

        let thumb = hand.thumb_tip();
        let index = hand.index_tip();

        let cursor = match self.position {
            None => thumb,
            Some(old) => old.lerp(&thumb, self.config.smoothing),
        };
        self.position = Some(cursor);

        // Distance is measured on raw keypoints, never the smoothed cursor
        let touching = thumb.distance(&index) < self.config.pinch_distance_px;
        if touching {
            self.run_length = self.run_length.saturating_add(1);
        } else {
            self.run_length = 0;
        }

        let pinch_active = self.run_length >= self.config.debounce_frames;
        let pinch_rising_edge = pinch_active && !self.pinch_active;
        self.pinch_active = pinch_active;

        if pinch_rising_edge {
            self.pinch_count += 1;
            debug!("Pinch started at ({:.0}, {:.0})", cursor.x, cursor.y);
        }

        CursorSample {
            cursor: Some(cursor),
            touching,
            pinch_active,
            pinch_rising_edge,
        }
    }

    /// Forget the cursor and any pinch in progress.
    pub fn reset(&mut self) {
        self.position = None;
        self.run_length = 0;
        self.pinch_active = false;
    }

    pub fn position(&self) -> Option<Point> {
        self.position
    }

    pub fn run_length(&self) -> u32 {
        self.run_length
    }

    /// Generate s-expression for status logging.
    pub fn status_sexp(&self) -> String {
        let cursor = self
            .position
            .map(|p| format!("({:.0} {:.0})", p.x, p.y))
            .unwrap_or_else(|| "nil".to_string());
        format!(
            "(:cursor {} :run-length {} :pinch-active {} :pinch-count {} :smoothing {:.2} :pinch-distance-px {:.1})",
            cursor,
            self.run_length,
            if self.pinch_active { "t" } else { "nil" },
            self.pinch_count,
            self.config.smoothing,
            self.config.pinch_distance_px,
        )
    }
}

// ── Test helpers ───────────────────────────────────────────

#[cfg(test)]
pub(crate) fn make_hand(thumb: Point, index: Point) -> LandmarkSet {
    use super::landmarks::{HandLandmark, LANDMARK_COUNT};

    let mut set = LandmarkSet::new([Point::new(thumb.x, thumb.y + 80.0); LANDMARK_COUNT]);
    set.set(HandLandmark::ThumbTip, thumb);
    set.set(HandLandmark::IndexTip, index);
    set
}

// ── Tests ──────────────────────────────────────────────────
