//! Aggregated dashboard configuration.
//!
//! Every tuned constant lives in a component config with a `Default`
//! impl.  Thresholds are calibrated for a 1280x720 camera at 60 fps;
//! `for_resolution` rescales the pixel thresholds for other capture sizes.

use anyhow::{bail, Result};

use crate::geometry::Rect;
use crate::session::SessionConfig;
use crate::tracking::TrackerConfig;
use crate::ui::RouterConfig;

#[derive(Debug, Clone)]
pub struct DashboardConfig {
    pub tracker: TrackerConfig,
    pub session: SessionConfig,
    pub router: RouterConfig,
    /// Capture (and screen) width in pixels.
    pub frame_width: u32,
    /// Capture (and screen) height in pixels.
    pub frame_height: u32,
    /// Frame loop cap in Hz; 0 runs uncapped.
    pub frame_rate: u32,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            tracker: TrackerConfig::default(),
            session: SessionConfig::default(),
            router: RouterConfig::default(),
            frame_width: 1280,
            frame_height: 720,
            frame_rate: 60,
        }
    }
}

impl DashboardConfig {
    /// Defaults for a given capture size, with the pinch distance scaled.
    pub fn for_resolution(width: u32, height: u32) -> Self {
        Self {
            tracker: TrackerConfig::default().scaled_for(width as f32, height as f32),
            frame_width: width,
            frame_height: height,
            ..Self::default()
        }
    }

    /// Floor plan area used to place room zones (the whole frame).
    pub fn floorplan(&self) -> Rect {
        Rect::new(0.0, 0.0, self.frame_width as f32, self.frame_height as f32)
    }

    pub fn validate(&self) -> Result<()> {
        let smoothing = self.tracker.smoothing;
        if !(smoothing > 0.0 && smoothing <= 1.0) {
            bail!("smoothing must be in (0, 1], got {}", smoothing);
        }
        if !(self.tracker.pinch_distance_px > 0.0) {
            bail!(
                "pinch distance must be positive, got {}",
                self.tracker.pinch_distance_px
            );
        }
        if self.tracker.debounce_frames == 0 {
            bail!("pinch debounce must be at least 1 frame");
        }
        if self.session.login_confirm_frames == 0 {
            bail!("login confirmation must be at least 1 frame");
        }
        if self.router.exit_confirm_frames == 0 {
            bail!("exit confirmation window must be at least 1 frame");
        }
        if self.frame_width == 0 || self.frame_height == 0 {
            bail!(
                "resolution must be non-zero, got {}x{}",
                self.frame_width,
                self.frame_height
            );
        }
        Ok(())
    }

    /// Generate s-expression describing the active configuration.
    pub fn config_sexp(&self) -> String {
        format!(
            "(:resolution \"{}x{}\" :frame-rate {} :smoothing {:.2} :pinch-distance-px {:.1} :debounce-frames {} :login-confirm-frames {} :logout-cooldown-frames {} :exit-confirm-frames {})",
            self.frame_width,
            self.frame_height,
            self.frame_rate,
            self.tracker.smoothing,
            self.tracker.pinch_distance_px,
            self.tracker.debounce_frames,
            self.session.login_confirm_frames,
            self.session.logout_cooldown_frames,
            self.router.exit_confirm_frames,
        )
    }
}

/// Parse a "WxH" resolution string.  Returns (width, height) or None.
pub fn parse_resolution(s: &str) -> Option<(u32, u32)> {
    let (w, h) = s.trim().split_once('x')?;
    let w = w.parse::<u32>().ok()?;
    let h = h.parse::<u32>().ok()?;
    if w > 0 && h > 0 {
        Some((w, h))
    } else {
        None
    }
}
