//! Toggle + drag-panel device widget.
//!
//! Lights and blinds share one state machine, parameterized by the panel
//! axis and the snap-to-off tolerance.  A pinch edge on the body toggles
//! the device; holding a pinch inside the open panel drags the level.
//! Body and panel never overlap, so one edge cannot do both.

use serde::Serialize;
use tracing::debug;

use crate::geometry::{Point, Rect};

/// Gap between a widget body and its panel.
const PANEL_GAP: f32 = 10.0;
/// Thickness of the slider panel across its axis.
const PANEL_THICKNESS: f32 = 40.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum WidgetKind {
    Light,
    Blind,
}

impl WidgetKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Light => "light",
            Self::Blind => "blind",
        }
    }
}

/// Direction a panel maps cursor position to level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum SliderAxis {
    /// Left = 0, right = 100.
    Horizontal,
    /// Top = 100, bottom = 0.
    VerticalInverted,
}

impl SliderAxis {
    /// Map a point inside `panel` to a level in 0..=100 (truncating).
    pub fn level_at(&self, panel: Rect, p: Point) -> u8 {
        let level = match self {
            Self::Horizontal => {
                let rel = (p.x - panel.x).clamp(0.0, panel.width);
                (rel / panel.width * 100.0) as i32
            }
            Self::VerticalInverted => {
                let rel = (p.y - panel.y).clamp(0.0, panel.height);
                100 - (rel / panel.height * 100.0) as i32
            }
        };
        level.clamp(0, 100) as u8
    }
}

/// State change worth recording in the activity log.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WidgetChange {
    SwitchedOn { level: u8 },
    SwitchedOff,
    /// Dragged to the bottom of the panel.
    SnappedOff,
}

impl WidgetChange {
    pub fn describe(&self) -> String {
        match self {
            Self::SwitchedOn { level } => format!("switched on ({}%)", level),
            Self::SwitchedOff => "switched off".to_string(),
            Self::SnappedOff => "switched off by slider".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct SliderWidget {
    pub kind: WidgetKind,
    pub label: String,
    pub body: Rect,
    pub panel: Rect,
    pub axis: SliderAxis,
    /// Levels at or below this snap to 0 and switch the device off.
    pub snap_off_at: u8,
    /// Light is on / blind is open.
    active: bool,
    level: u8,
    panel_open: bool,
    last_nonzero: u8,
    hovered: bool,
}

impl SliderWidget {
    /// Dimmable light: starts off, remembers full brightness, panel below.
    pub fn light(label: &str, body: Rect) -> Self {
        let panel = Rect::new(body.x, body.bottom() + PANEL_GAP, body.width, PANEL_THICKNESS);
        Self {
            kind: WidgetKind::Light,
            label: label.to_string(),
            body,
            panel,
            axis: SliderAxis::Horizontal,
            snap_off_at: 0,
            active: false,
            level: 100,
            panel_open: false,
            last_nonzero: 100,
            hovered: false,
        }
    }

    /// Window blind: starts fully open with its panel showing, panel to the right.
    pub fn blind(label: &str, body: Rect) -> Self {
        let panel = Rect::new(body.right() + PANEL_GAP, body.y, PANEL_THICKNESS, body.height);
        Self {
            kind: WidgetKind::Blind,
            label: label.to_string(),
            body,
            panel,
            axis: SliderAxis::VerticalInverted,
            snap_off_at: 2,
            active: true,
            level: 100,
            panel_open: true,
            last_nonzero: 100,
            hovered: false,
        }
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn level(&self) -> u8 {
        self.level
    }

    pub fn panel_open(&self) -> bool {
        self.panel_open
    }

    pub fn last_nonzero(&self) -> u8 {
        self.last_nonzero
    }

    pub fn hovered(&self) -> bool {
        self.hovered
    }

    /// Set the remembered level restored on the next switch-on.
    pub fn set_last_nonzero(&mut self, level: u8) {
        if level > self.snap_off_at {
            self.last_nonzero = level.min(100);
        }
    }

    /// Drive the widget for one frame.
    pub fn update(
        &mut self,
        cursor: Option<Point>,
        pinch_rising_edge: bool,
        pinch_active: bool,
    ) -> Option<WidgetChange> {
        let Some(p) = cursor else {
            self.hovered = false;
            return None;
        };

        self.hovered = self.body.contains(p);

        if pinch_rising_edge && self.body.contains(p) {
            return Some(self.toggle());
        }

        if self.active && self.panel_open && pinch_active && self.panel.contains(p) {
            return self.drag_to(self.axis.level_at(self.panel, p));
        }

        None
    }

    fn toggle(&mut self) -> WidgetChange {
        self.active = !self.active;
        if self.active {
            self.level = self.last_nonzero;
            self.panel_open = true;
            debug!("{} {} on at {}%", self.label, self.kind.as_str(), self.level);
            WidgetChange::SwitchedOn { level: self.level }
        } else {
            // Remembered level is kept for the next switch-on
            self.panel_open = false;
            debug!("{} {} off", self.label, self.kind.as_str());
            WidgetChange::SwitchedOff
        }
    }

    fn drag_to(&mut self, level: u8) -> Option<WidgetChange> {
        if level <= self.snap_off_at {
            self.level = 0;
            self.active = false;
            self.panel_open = false;
            debug!("{} {} dragged off", self.label, self.kind.as_str());
            return Some(WidgetChange::SnappedOff);
        }
        self.level = level;
        self.last_nonzero = level;
        None
    }
}

// ── Tests ──────────────────────────────────────────────────
