//! Room identities and floor-plan hit-test zones.
//!
//! Zones are loaded once at startup from a JSON object mapping room name
//! to normalized polygon points.  Object order is kept, and overlapping
//! zones resolve to the one declared first.  Missing or unusable geometry
//! falls back to the built-in layout.

use std::path::Path;

use anyhow::{bail, Context};
use serde::Serialize;
use serde_json::{Map, Value};
use tracing::{debug, info, warn};

use crate::geometry::{Point, Polygon, Rect};

// ── RoomId ─────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum RoomId {
    Bathroom,
    Bedroom,
    LivingRoom,
    Kitchen,
    Hallway,
}

impl RoomId {
    pub const ALL: [RoomId; 5] = [
        Self::Bathroom,
        Self::Bedroom,
        Self::LivingRoom,
        Self::Kitchen,
        Self::Hallway,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Bathroom => "bathroom",
            Self::Bedroom => "bedroom",
            Self::LivingRoom => "living-room",
            Self::Kitchen => "kitchen",
            Self::Hallway => "hallway",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Bathroom => "Bathroom",
            Self::Bedroom => "Bedroom",
            Self::LivingRoom => "Living Room",
            Self::Kitchen => "Kitchen",
            Self::Hallway => "Hallway",
        }
    }

    /// Parse a room from its id, display name or German floor-plan label.
    pub fn from_name(name: &str) -> Option<Self> {
        match name.trim().to_lowercase().as_str() {
            "bathroom" | "badezimmer" => Some(Self::Bathroom),
            "bedroom" | "schlafzimmer" => Some(Self::Bedroom),
            "living-room" | "living room" | "wohnzimmer" => Some(Self::LivingRoom),
            "kitchen" | "kueche" | "küche" => Some(Self::Kitchen),
            "hallway" | "flur" => Some(Self::Hallway),
            _ => None,
        }
    }

    /// Rooms with a detail view navigate on pinch; others toggle power.
    pub fn has_detail_view(&self) -> bool {
        !matches!(self, Self::Hallway)
    }
}

// ── Zones ──────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize)]
pub struct RoomZone {
    pub room: RoomId,
    pub polygon: Polygon,
}

/// Built-in zones as normalized (x, y, w, h) over the floor plan.
const DEFAULT_ZONES: [(RoomId, [f32; 4]); 5] = [
    (RoomId::Bathroom, [0.136, 0.123, 0.246, 0.277]),
    (RoomId::Bedroom, [0.545, 0.092, 0.346, 0.370]),
    (RoomId::LivingRoom, [0.109, 0.462, 0.364, 0.400]),
    (RoomId::Kitchen, [0.509, 0.492, 0.418, 0.370]),
    (RoomId::Hallway, [0.391, 0.123, 0.145, 0.323]),
];

/// Ordered set of room zones partitioning the home view.
#[derive(Debug, Clone)]
pub struct RoomLayout {
    zones: Vec<RoomZone>,
}

impl RoomLayout {
    pub fn new(zones: Vec<RoomZone>) -> Self {
        Self { zones }
    }

    /// Built-in layout scaled onto the floor-plan rectangle.
    pub fn defaults(floorplan: Rect) -> Self {
        let zones = DEFAULT_ZONES
            .iter()
            .map(|(room, [x, y, w, h])| {
                let origin = floorplan.denormalize(*x, *y);
                let far = floorplan.denormalize(x + w, y + h);
                RoomZone {
                    room: *room,
                    polygon: Polygon::from_rect(Rect::new(
                        origin.x,
                        origin.y,
                        far.x - origin.x,
                        far.y - origin.y,
                    )),
                }
            })
            .collect();
        Self { zones }
    }

    /// Parse a JSON room geometry document.
    ///
    /// Bad entries are skipped with a warning; an error is returned only
    /// when the document is malformed or no usable zone remains.
    pub fn from_json(text: &str, floorplan: Rect) -> anyhow::Result<Self> {
        let doc: Map<String, Value> =
            serde_json::from_str(text).context("room geometry is not a JSON object")?;

        let mut zones: Vec<RoomZone> = Vec::new();
        for (name, value) in doc {
            let Some(room) = RoomId::from_name(&name) else {
                warn!("Room geometry: unknown room '{}', skipping", name);
                continue;
            };
            if zones.iter().any(|z| z.room == room) {
                warn!("Room geometry: duplicate entry for {}, skipping", room.as_str());
                continue;
            }
            let points: Vec<[f32; 2]> = match serde_json::from_value(value) {
                Ok(p) => p,
                Err(e) => {
                    warn!("Room geometry: bad points for {}: {}", room.as_str(), e);
                    continue;
                }
            };
            let vertices = points
                .iter()
                .map(|[x, y]| floorplan.denormalize(*x, *y))
                .collect();
            match Polygon::new(vertices) {
                Some(polygon) => {
                    debug!(
                        "Room geometry: {} with {} vertices",
                        room.as_str(),
                        polygon.vertices().len(),
                    );
                    zones.push(RoomZone { room, polygon });
                }
                None => warn!(
                    "Room geometry: {} has {} points, need at least 3",
                    room.as_str(),
                    points.len(),
                ),
            }
        }

        if zones.is_empty() {
            bail!("room geometry contains no usable zones");
        }
        Ok(Self { zones })
    }

    pub fn try_load(path: &Path, floorplan: Rect) -> anyhow::Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read room geometry '{}'", path.display()))?;
        Self::from_json(&text, floorplan)
            .with_context(|| format!("failed to parse room geometry '{}'", path.display()))
    }

    /// Load geometry from `path`, falling back to the built-in layout.
    pub fn load(path: Option<&Path>, floorplan: Rect) -> Self {
        let Some(path) = path else {
            info!("Room geometry: using built-in layout");
            return Self::defaults(floorplan);
        };
        match Self::try_load(path, floorplan) {
            Ok(layout) => {
                info!(
                    "Room geometry: loaded {} zones from {}",
                    layout.zones.len(),
                    path.display(),
                );
                layout
            }
            Err(e) => {
                warn!("{:#}; using built-in layout", e);
                Self::defaults(floorplan)
            }
        }
    }

    /// First zone in declaration order that contains `p`.
    pub fn zone_at(&self, p: Point) -> Option<&RoomZone> {
        self.zones.iter().find(|z| z.polygon.contains(p))
    }

    pub fn zones(&self) -> &[RoomZone] {
        &self.zones
    }
}

// ── Tests ──────────────────────────────────────────────────
