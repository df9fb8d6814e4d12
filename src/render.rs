//! Render snapshot
//!
//! Flat, GPU-uploadable copies of everything the renderer draws each frame.
//! The renderer never touches the soil world directly.

use bytemuck::{Pod, Zeroable};

use crate::sim::{SoilWorld, Zone};

/// Edge length of a soil cube
pub const SOIL_SIZE: f32 = 0.3;
/// Edge length of a debris cube at full life
pub const DEBRIS_SIZE: f32 = 0.1;
/// Pit discs are drawn translucent
pub const PIT_ALPHA: f32 = 0.5;
/// Pit discs sit just above the ground
pub const PIT_HEIGHT: f32 = 0.05;

/// One instanced cube
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct CubeInstance {
    pub position: [f32; 3],
    pub size: f32,
    pub color: [f32; 4],
}

/// One pit disc
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct DiscInstance {
    pub center: [f32; 3],
    pub radius: f32,
    pub color: [f32; 4],
}

impl DiscInstance {
    pub fn from_zone(zone: &Zone) -> Self {
        let mut color = zone.color.rgba();
        color[3] = PIT_ALPHA;
        Self {
            center: [zone.center.x, PIT_HEIGHT, zone.center.y],
            radius: zone.radius,
            color,
        }
    }
}

/// Everything to draw for the soil layer this frame
#[derive(Debug, Clone, Default)]
pub struct RenderSnapshot {
    pub soil: Vec<CubeInstance>,
    /// Parallel to `soil`: whether the cube is riding in the bucket
    pub carried: Vec<bool>,
    pub debris: Vec<CubeInstance>,
    pub pits: Vec<DiscInstance>,
}

impl RenderSnapshot {
    pub fn capture(world: &SoilWorld) -> Self {
        let particles = world.particles();
        Self {
            soil: particles
                .iter()
                .map(|p| CubeInstance {
                    position: p.position.to_array(),
                    size: SOIL_SIZE,
                    color: p.color.rgba(),
                })
                .collect(),
            carried: particles.iter().map(|p| p.is_attached()).collect(),
            debris: world
                .effects
                .iter()
                .map(|e| CubeInstance {
                    position: e.pos.to_array(),
                    size: DEBRIS_SIZE * e.size,
                    color: e.color.rgba(),
                })
                .collect(),
            pits: world.zones().iter().map(DiscInstance::from_zone).collect(),
        }
    }

    /// Raw bytes of the soil instance buffer
    pub fn soil_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.soil)
    }

    pub fn debris_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.debris)
    }

    pub fn pit_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.pits)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::SoilColor;
    use glam::Vec3;

    #[test]
    fn test_capture() {
        let mut world = SoilWorld::new(1);
        world.place_particle(Vec3::new(1.0, 0.15, 2.0), SoilColor::Red);
        world.spawn_zone(-5.0, 5.0, SoilColor::Blue);

        let snap = RenderSnapshot::capture(&world);
        assert_eq!(snap.soil.len(), 1);
        assert_eq!(snap.soil[0].position, [1.0, 0.15, 2.0]);
        assert_eq!(snap.carried, vec![false]);
        assert_eq!(snap.pits[0].center, [-5.0, 0.05, 5.0]);
        assert_eq!(snap.pits[0].color, [0.0, 0.0, 1.0, 0.5]);
        assert!(snap.debris.is_empty());
    }

    #[test]
    fn test_instance_layout() {
        assert_eq!(std::mem::size_of::<CubeInstance>(), 32);
        assert_eq!(std::mem::size_of::<DiscInstance>(), 32);

        let mut world = SoilWorld::new(1);
        world.spawn_pile(0.0, 0.0, 4, SoilColor::Brown);
        let snap = RenderSnapshot::capture(&world);
        assert_eq!(snap.soil_bytes().len(), 4 * 32);
        assert!(snap.pit_bytes().is_empty());
        assert!(snap.debris_bytes().is_empty());
    }
}
