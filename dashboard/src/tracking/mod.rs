//! Hand tracking: landmark model, login gesture classification, and the
//! smoothed cursor with debounced pinch detection.

pub mod classifier;
pub mod cursor;
pub mod landmarks;

pub use classifier::{classify, LoginGesture, UserId};
pub use cursor::{CursorSample, CursorTracker, TrackerConfig};
pub use landmarks::{HandLandmark, LandmarkSet, LANDMARK_COUNT};
