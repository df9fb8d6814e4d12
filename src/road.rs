//! Road network
//!
//! Roads are axis-aligned rectangles on the ground plane. The excavator's base
//! pivot must stay on one of them.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// One straight stretch of road
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RoadSegment {
    /// Center on the ground plane (x, z)
    pub center: Vec2,
    /// Extent along x
    pub width: f32,
    /// Extent along z
    pub depth: f32,
}

impl RoadSegment {
    pub const fn new(x: f32, z: f32, width: f32, depth: f32) -> Self {
        Self {
            center: Vec2::new(x, z),
            width,
            depth,
        }
    }

    pub fn min(&self) -> Vec2 {
        self.center - Vec2::new(self.width, self.depth) / 2.0
    }

    pub fn max(&self) -> Vec2 {
        self.center + Vec2::new(self.width, self.depth) / 2.0
    }

    /// Inclusive on every edge
    pub fn contains(&self, point: Vec2) -> bool {
        let (min, max) = (self.min(), self.max());
        point.x >= min.x && point.x <= max.x && point.y >= min.y && point.y <= max.y
    }
}

/// Default layout: an east-west spine with branches to the piles (east) and pits (west)
pub const DEFAULT_SEGMENTS: [RoadSegment; 5] = [
    RoadSegment::new(0.0, 0.0, 25.0, 4.0),
    RoadSegment::new(5.0, 0.0, 4.0, 18.0),
    RoadSegment::new(10.0, 0.0, 4.0, 10.0),
    RoadSegment::new(-5.0, 0.0, 4.0, 18.0),
    RoadSegment::new(-8.0, 0.0, 4.0, 10.0),
];

/// All drivable road
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoadNetwork {
    pub segments: Vec<RoadSegment>,
}

impl Default for RoadNetwork {
    fn default() -> Self {
        Self {
            segments: DEFAULT_SEGMENTS.to_vec(),
        }
    }
}

impl RoadNetwork {
    pub fn new(segments: Vec<RoadSegment>) -> Self {
        Self { segments }
    }

    /// Whether ground point (x, z) is on any segment
    pub fn is_on_road(&self, x: f32, z: f32) -> bool {
        let point = Vec2::new(x, z);
        self.segments.iter().any(|s| s.contains(point))
    }
}
