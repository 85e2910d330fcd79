//! Hand landmark data structures.
//!
//! Models the 21 keypoints per hand produced by the landmark detector
//! (wrist, then four points per finger from base to tip).  A `LandmarkSet`
//! is ephemeral: it is produced fresh for each frame and never retained.

use tracing::debug;

use crate::geometry::Point;

// ── Landmark definitions ───────────────────────────────────

/// The 21 anatomical hand keypoints, in detector index order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HandLandmark {
    Wrist,
    ThumbCmc,
    ThumbMcp,
    ThumbIp,
    ThumbTip,
    IndexMcp,
    IndexPip,
    IndexDip,
    IndexTip,
    MiddleMcp,
    MiddlePip,
    MiddleDip,
    MiddleTip,
    RingMcp,
    RingPip,
    RingDip,
    RingTip,
    LittleMcp,
    LittlePip,
    LittleDip,
    LittleTip,
}

/// Total number of landmarks per hand.
pub const LANDMARK_COUNT: usize = 21;

impl HandLandmark {
    /// Detector index (0-20).
    pub fn index(&self) -> usize {
        *self as usize
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Wrist => "wrist",
            Self::ThumbCmc => "thumb-cmc",
            Self::ThumbMcp => "thumb-mcp",
            Self::ThumbIp => "thumb-ip",
            Self::ThumbTip => "thumb-tip",
            Self::IndexMcp => "index-mcp",
            Self::IndexPip => "index-pip",
            Self::IndexDip => "index-dip",
            Self::IndexTip => "index-tip",
            Self::MiddleMcp => "middle-mcp",
            Self::MiddlePip => "middle-pip",
            Self::MiddleDip => "middle-dip",
            Self::MiddleTip => "middle-tip",
            Self::RingMcp => "ring-mcp",
            Self::RingPip => "ring-pip",
            Self::RingDip => "ring-dip",
            Self::RingTip => "ring-tip",
            Self::LittleMcp => "little-mcp",
            Self::LittlePip => "little-pip",
            Self::LittleDip => "little-dip",
            Self::LittleTip => "little-tip",
        }
    }

    /// (tip, base knuckle) pairs for the four non-thumb fingers.
    pub fn finger_pairs() -> [(HandLandmark, HandLandmark); 4] {
        [
            (Self::IndexTip, Self::IndexMcp),
            (Self::MiddleTip, Self::MiddleMcp),
            (Self::RingTip, Self::RingMcp),
            (Self::LittleTip, Self::LittleMcp),
        ]
    }
}

// ── Landmark set ───────────────────────────────────────────

/// One detected hand: 21 keypoints in image pixel space.
#[derive(Debug, Clone, PartialEq)]
pub struct LandmarkSet {
    points: [Point; LANDMARK_COUNT],
}

impl LandmarkSet {
    pub fn new(points: [Point; LANDMARK_COUNT]) -> Self {
        Self { points }
    }

    /// Build from a slice; `None` unless it holds exactly 21 points.
    pub fn from_slice(points: &[Point]) -> Option<Self> {
        if points.len() != LANDMARK_COUNT {
            debug!(
                "Landmark set: expected {} points, got {}",
                LANDMARK_COUNT,
                points.len(),
            );
            return None;
        }
        let mut arr = [Point::ORIGIN; LANDMARK_COUNT];
        arr.copy_from_slice(points);
        Some(Self { points: arr })
    }

    /// Build from normalized (0..1) coordinates scaled to a frame size.
    pub fn from_normalized(points: &[[f32; 2]], width: f32, height: f32) -> Option<Self> {
        let scaled: Vec<Point> = points
            .iter()
            .map(|[x, y]| Point::new(x * width, y * height))
            .collect();
        Self::from_slice(&scaled)
    }

    pub fn get(&self, landmark: HandLandmark) -> Point {
        self.points[landmark.index()]
    }

    pub fn set(&mut self, landmark: HandLandmark, p: Point) {
        self.points[landmark.index()] = p;
    }

    pub fn points(&self) -> &[Point; LANDMARK_COUNT] {
        &self.points
    }

    pub fn thumb_tip(&self) -> Point {
        self.get(HandLandmark::ThumbTip)
    }

    pub fn index_tip(&self) -> Point {
        self.get(HandLandmark::IndexTip)
    }
}

// ── Tests ──────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detector_indices() {
        assert_eq!(HandLandmark::Wrist.index(), 0);
        assert_eq!(HandLandmark::ThumbTip.index(), 4);
        assert_eq!(HandLandmark::IndexMcp.index(), 5);
        assert_eq!(HandLandmark::IndexTip.index(), 8);
        assert_eq!(HandLandmark::MiddleMcp.index(), 9);
        assert_eq!(HandLandmark::RingTip.index(), 16);
        assert_eq!(HandLandmark::LittleMcp.index(), 17);
        assert_eq!(HandLandmark::LittleTip.index(), 20);
    }

    #[test]
    fn test_finger_pairs() {
        let idx: Vec<(usize, usize)> = HandLandmark::finger_pairs()
            .iter()
            .map(|(t, b)| (t.index(), b.index()))
            .collect();
        assert_eq!(idx, vec![(8, 5), (12, 9), (16, 13), (20, 17)]);
    }

    #[test]
    fn test_from_slice_length_check() {
        assert!(LandmarkSet::from_slice(&[Point::ORIGIN; 20]).is_none());
        assert!(LandmarkSet::from_slice(&[Point::ORIGIN; 22]).is_none());
        assert!(LandmarkSet::from_slice(&[Point::ORIGIN; 21]).is_some());
    }

    #[test]
    fn test_from_normalized_scales() {
        let mut pts = [[0.0f32, 0.0f32]; LANDMARK_COUNT];
        pts[4] = [0.5, 0.25];
        let set = LandmarkSet::from_normalized(&pts, 1280.0, 720.0).unwrap();
        assert_eq!(set.thumb_tip(), Point::new(640.0, 180.0));
    }

    #[test]
    fn test_set_and_get() {
        let mut set = LandmarkSet::new([Point::ORIGIN; LANDMARK_COUNT]);
        set.set(HandLandmark::IndexTip, Point::new(3.0, 4.0));
        assert_eq!(set.index_tip(), Point::new(3.0, 4.0));
        assert_eq!(HandLandmark::IndexTip.as_str(), "index-tip");
    }
}
