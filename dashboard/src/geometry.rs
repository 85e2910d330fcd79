//! Screen-space geometry -- points, axis-aligned rectangles, and polygons.
//!
//! All hit tests in the dashboard go through this module.  Rectangles are
//! half-open (`x <= px < x + width`), and the polygon ray-casting test
//! agrees with that convention for axis-aligned shapes: the minimum corner
//! is inside, the maximum corner is outside.

use serde::Serialize;

// ── Point ───────────────────────────────────────────────────

/// A 2D position in screen pixels.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub const ORIGIN: Self = Self { x: 0.0, y: 0.0 };

    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Euclidean distance to another point.
    pub fn distance(&self, other: &Point) -> f32 {
        let dx = other.x - self.x;
        let dy = other.y - self.y;
        (dx * dx + dy * dy).sqrt()
    }

    /// Linear interpolation towards `target` by factor `t` (0 = self, 1 = target).
    pub fn lerp(&self, target: &Point, t: f32) -> Point {
        Point {
            x: self.x * (1.0 - t) + target.x * t,
            y: self.y * (1.0 - t) + target.y * t,
        }
    }
}

// ── Rect ────────────────────────────────────────────────────

/// Axis-aligned rectangle in screen pixels.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }

    /// Half-open containment: left/top edges inclusive, right/bottom exclusive.
    pub fn contains(&self, p: Point) -> bool {
        p.x >= self.x && p.x < self.right() && p.y >= self.y && p.y < self.bottom()
    }

    /// Whether two rectangles share any area.
    pub fn intersects(&self, other: &Rect) -> bool {
        self.x < other.right()
            && other.x < self.right()
            && self.y < other.bottom()
            && other.y < self.bottom()
    }

    /// Map a normalized point (0..1 on both axes) into this rectangle.
    pub fn denormalize(&self, nx: f32, ny: f32) -> Point {
        Point::new(self.x + nx * self.width, self.y + ny * self.height)
    }
}

// ── Polygon ─────────────────────────────────────────────────

/// Closed polygon with a cached bounding box for fast rejection.
///
/// Serializes as `{"vertices": [...]}`; the bounding box is derived.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Polygon {
    vertices: Vec<Point>,
    #[serde(skip)]
    min: Point,
    #[serde(skip)]
    max: Point,
}

impl Polygon {
    /// Build a polygon.  Returns `None` for fewer than three vertices.
    pub fn new(vertices: Vec<Point>) -> Option<Self> {
        if vertices.len() < 3 {
            return None;
        }
        let mut min = vertices[0];
        let mut max = vertices[0];
        for v in &vertices[1..] {
            min.x = min.x.min(v.x);
            min.y = min.y.min(v.y);
            max.x = max.x.max(v.x);
            max.y = max.y.max(v.y);
        }
        Some(Self { vertices, min, max })
    }

    /// Convenience constructor for an axis-aligned rectangle outline.
    pub fn from_rect(r: Rect) -> Self {
        Self {
            vertices: vec![
                Point::new(r.x, r.y),
                Point::new(r.right(), r.y),
                Point::new(r.right(), r.bottom()),
                Point::new(r.x, r.bottom()),
            ],
            min: Point::new(r.x, r.y),
            max: Point::new(r.right(), r.bottom()),
        }
    }

    pub fn vertices(&self) -> &[Point] {
        &self.vertices
    }

    /// Arithmetic mean of the vertices (label anchor).
    pub fn centroid(&self) -> Point {
        let n = self.vertices.len() as f32;
        let (sx, sy) = self
            .vertices
            .iter()
            .fold((0.0, 0.0), |(sx, sy), v| (sx + v.x, sy + v.y));
        Point::new(sx / n, sy / n)
    }

    /// Point-in-polygon by ray casting along +x, after a bounding-box check.
    ///
    /// An edge counts as crossed when exactly one endpoint lies strictly
    /// below the ray (`y1 > py` differs from `y2 > py`) and the intersection
    /// lies strictly to the right of the point.  Odd crossings = inside.
    pub fn contains(&self, p: Point) -> bool {
        if p.x < self.min.x || p.x > self.max.x || p.y < self.min.y || p.y > self.max.y {
            return false;
        }

        let mut inside = false;
        let n = self.vertices.len();
        for i in 0..n {
            let a = self.vertices[i];
            let b = self.vertices[(i + 1) % n];
            if (a.y > p.y) != (b.y > p.y) {
                let x_cross = a.x + (p.y - a.y) * (b.x - a.x) / (b.y - a.y);
                if x_cross > p.x {
                    inside = !inside;
                }
            }
        }
        inside
    }
}

// ── Tests ───────────────────────────────────────────────────
