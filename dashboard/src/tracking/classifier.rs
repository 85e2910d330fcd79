//! Login gesture classification from a single landmark set.
//!
//! Stateless: compares each finger's tip against its base knuckle on the
//! vertical axis.  Image y grows downwards, so curled fingers have their
//! tips *below* (numerically greater than) the knuckle.

use serde::Serialize;

use super::landmarks::{HandLandmark, LandmarkSet};

/// Coarse hand shape used to identify a user at login.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum LoginGesture {
    /// All four finger tips below their knuckles.
    Fist,
    /// All four finger tips above their knuckles.
    OpenHand,
    /// Mixed or ambiguous finger states.
    None,
}

impl LoginGesture {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Fist => "fist",
            Self::OpenHand => "open-hand",
            Self::None => "none",
        }
    }

    /// The user this gesture logs in, if any.
    pub fn user(&self) -> Option<UserId> {
        match self {
            Self::Fist => Some(UserId::ONE),
            Self::OpenHand => Some(UserId::TWO),
            Self::None => None,
        }
    }
}

/// Identity of a logged-in user (1 or 2).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct UserId(pub u8);

impl UserId {
    pub const ONE: Self = Self(1);
    pub const TWO: Self = Self(2);

    /// Label used in activity log entries.
    pub fn label(&self) -> String {
        format!("User {}", self.0)
    }
}

/// Classify a hand into fist, open hand, or neither.
pub fn classify(hand: &LandmarkSet) -> LoginGesture {
    let pairs = HandLandmark::finger_pairs();

    let curled = pairs
        .iter()
        .all(|(tip, base)| hand.get(*tip).y > hand.get(*base).y);
    if curled {
        return LoginGesture::Fist;
    }

    let extended = pairs
        .iter()
        .all(|(tip, base)| hand.get(*tip).y < hand.get(*base).y);
    if extended {
        return LoginGesture::OpenHand;
    }

    LoginGesture::None
}

// ── Tests ──────────────────────────────────────────────────
