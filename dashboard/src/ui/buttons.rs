//! Fixed-position buttons: menu toggle, logout, exit and per-room back.

use serde::Serialize;
use tracing::debug;

use crate::geometry::{Point, Rect};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum ButtonKind {
    Menu,
    Logout,
    Exit,
    Back,
}

impl ButtonKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Menu => "menu",
            Self::Logout => "logout",
            Self::Exit => "exit",
            Self::Back => "back",
        }
    }

    /// Standard screen position for this button.
    pub fn default_rect(&self) -> Rect {
        match self {
            Self::Menu => Rect::new(20.0, 20.0, 80.0, 60.0),
            Self::Logout => Rect::new(20.0, 90.0, 200.0, 60.0),
            Self::Exit => Rect::new(20.0, 160.0, 120.0, 50.0),
            Self::Back => Rect::new(110.0, 20.0, 80.0, 60.0),
        }
    }
}

/// Axis-aligned push button with cosmetic hover/pressed flags.
#[derive(Debug, Clone, Serialize)]
pub struct Button {
    pub kind: ButtonKind,
    pub rect: Rect,
    pub hovered: bool,
    pub pressed: bool,
}

impl Button {
    pub fn new(kind: ButtonKind) -> Self {
        Self::with_rect(kind, kind.default_rect())
    }

    pub fn with_rect(kind: ButtonKind, rect: Rect) -> Self {
        Self {
            kind,
            rect,
            hovered: false,
            pressed: false,
        }
    }

    pub fn hit(&self, p: Point) -> bool {
        self.rect.contains(p)
    }

    pub fn update_hover(&mut self, cursor: Option<Point>) {
        self.hovered = cursor.is_some_and(|p| self.hit(p));
    }
}

// ── Exit button ────────────────────────────────────────────

/// Result of pinching the exit button.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitPress {
    /// First press: waiting for confirmation.
    Armed,
    /// Second press while armed: leave the program.
    Confirmed,
}

/// Exit button requiring two presses within a frame window.
#[derive(Debug, Clone, Serialize)]
pub struct ExitButton {
    #[serde(flatten)]
    pub button: Button,
    /// Frames left before an armed button disarms itself.
    confirm_remaining: Option<u32>,
    #[serde(skip)]
    confirm_frames: u32,
}

impl ExitButton {
    pub fn new(confirm_frames: u32) -> Self {
        Self {
            button: Button::new(ButtonKind::Exit),
            confirm_remaining: None,
            confirm_frames,
        }
    }

    pub fn confirming(&self) -> bool {
        self.confirm_remaining.is_some()
    }

    pub fn press(&mut self) -> ExitPress {
        if self.confirming() {
            self.disarm();
            ExitPress::Confirmed
        } else {
            self.confirm_remaining = Some(self.confirm_frames);
            self.button.pressed = true;
            ExitPress::Armed
        }
    }

    /// Count down the confirmation window.  Called once per tick.
    pub fn tick(&mut self) {
        if let Some(remaining) = self.confirm_remaining {
            if remaining <= 1 {
                debug!("Exit confirmation expired");
                self.disarm();
            } else {
                self.confirm_remaining = Some(remaining - 1);
            }
        }
    }

    pub fn disarm(&mut self) {
        self.confirm_remaining = None;
        self.button.pressed = false;
    }
}
