//! Track actors: obstacles and ground tiles
//!
//! Actors keep their spawn coordinates for bookkeeping, but every collision
//! test reads the live `position`, which the tick scrolls toward the camera.

use glam::{Mat4, Quat, Vec3};
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::collision::{Aabb, Footprint};
use crate::consts::{GROUND_SEGMENT_SIZE, GROUND_Y};
use crate::mesh::{Mesh, create_box, create_cylinder, create_icosahedron, palette};

/// Half width/depth of an obstacle box at scale 1
pub const OBSTACLE_HALF_EXTENT: f32 = 250.0;
/// Height of an obstacle box at scale 1
pub const OBSTACLE_HEIGHT: f32 = 1150.0;
/// Base height of trees (their trunk sits in the ground)
pub const TREE_BASE_Y: f32 = -400.0;
/// Base height of asteroids
pub const ASTEROID_BASE_Y: f32 = 0.0;

/// Obstacle flavours; rows alternate between the two
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ObstacleKind {
    Tree,
    Asteroid,
}

impl ObstacleKind {
    pub fn base_y(self) -> f32 {
        match self {
            ObstacleKind::Tree => TREE_BASE_Y,
            ObstacleKind::Asteroid => ASTEROID_BASE_Y,
        }
    }

    pub fn toggled(self) -> Self {
        match self {
            ObstacleKind::Tree => ObstacleKind::Asteroid,
            ObstacleKind::Asteroid => ObstacleKind::Tree,
        }
    }
}

/// A scaled obstacle sitting in one lane
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Obstacle {
    pub kind: ObstacleKind,
    /// Where the obstacle was spawned
    pub spawn: Vec3,
    /// Live position (scrolls every tick)
    pub position: Vec3,
    /// Uniform scale
    pub scale: f32,
}

impl Obstacle {
    pub fn new(kind: ObstacleKind, x: f32, z: f32, scale: f32) -> Self {
        let spawn = Vec3::new(x, kind.base_y(), z);
        Self {
            kind,
            spawn,
            position: spawn,
            scale,
        }
    }

    /// Collision box from the live position and the scaled per-type size
    pub fn bounds(&self) -> Aabb {
        let half = self.scale * OBSTACLE_HALF_EXTENT;
        Aabb::new(
            Vec3::new(self.position.x - half, self.position.y, self.position.z - half),
            Vec3::new(
                self.position.x + half,
                self.position.y + self.scale * OBSTACLE_HEIGHT,
                self.position.z + half,
            ),
        )
    }

    pub fn collides(&self, other: &Aabb) -> bool {
        self.bounds().overlaps(other)
    }

    /// Geometry in local space (unscaled, origin at the base)
    ///
    /// Asteroid roughness is seeded from the spawn point, so a rock keeps
    /// its shape from frame to frame.
    pub fn mesh(&self) -> Mesh {
        match self.kind {
            ObstacleKind::Tree => {
                let layers = [
                    create_cylinder(1.0, 300.0, 300.0, 4, palette::GREEN, Vec3::new(0.0, 1000.0, 0.0)),
                    create_cylinder(1.0, 400.0, 400.0, 4, palette::GREEN, Vec3::new(0.0, 800.0, 0.0)),
                    create_cylinder(1.0, 500.0, 500.0, 4, palette::GREEN, Vec3::new(0.0, 500.0, 0.0)),
                    create_cylinder(100.0, 100.0, 250.0, 32, palette::BROWN_DARK, Vec3::new(0.0, 125.0, 0.0)),
                ];
                Mesh::merge(layers.iter())
            }
            ObstacleKind::Asteroid => {
                let seed = (u64::from(self.spawn.x.to_bits()) << 32) | u64::from(self.spawn.z.to_bits());
                let mut rng = Pcg32::seed_from_u64(seed);
                let mut mesh = create_icosahedron(600.0, palette::BLUE, Vec3::ZERO);
                // Irregular rock
                for v in &mut mesh.vertices {
                    for c in &mut v.position {
                        *c += rng.random_range(-25.0..25.0);
                    }
                }
                mesh
            }
        }
    }

    /// Geometry scaled and moved to the live position
    pub fn world_mesh(&self) -> Mesh {
        let transform =
            Mat4::from_scale_rotation_translation(Vec3::splat(self.scale), Quat::IDENTITY, self.position);
        self.mesh().transformed(transform)
    }
}

/// One tile of ground under the track
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroundSegment {
    pub position: Vec3,
}

impl GroundSegment {
    pub fn new(z: f32) -> Self {
        Self {
            position: Vec3::new(0.0, GROUND_Y, z),
        }
    }

    /// Square X/Z footprint around the live position
    pub fn footprint(&self) -> Footprint {
        Footprint::square(self.position.x, self.position.z, GROUND_SEGMENT_SIZE)
    }

    /// Whether the tile is under any part of `other` (height ignored)
    pub fn supports(&self, other: &Aabb) -> bool {
        self.footprint().supports(&other.footprint())
    }

    pub fn mesh(&self) -> Mesh {
        create_box(
            Vec3::new(GROUND_SEGMENT_SIZE * 2.0, 20.0, GROUND_SEGMENT_SIZE),
            palette::CHERRY,
            Vec3::ZERO,
        )
    }

    pub fn world_mesh(&self) -> Mesh {
        self.mesh().transformed(Mat4::from_translation(self.position))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn character_box_at(x: f32, y: f32, z: f32) -> Aabb {
        Aabb::new(
            Vec3::new(x - 115.0, y - 310.0, z - 40.0),
            Vec3::new(x + 115.0, y + 320.0, z + 40.0),
        )
    }

    #[test]
    fn test_collides_uses_live_position() {
        let mut obstacle = Obstacle::new(ObstacleKind::Asteroid, 0.0, -10000.0, 1.0);
        let character = character_box_at(0.0, 0.0, -4000.0);
        assert!(!obstacle.collides(&character));

        obstacle.position.z = -4000.0;
        assert!(obstacle.collides(&character));
        assert_eq!(obstacle.spawn.z, -10000.0);
    }

    #[test]
    fn test_scale_grows_box() {
        let small = Obstacle::new(ObstacleKind::Tree, 800.0, -4000.0, 0.5);
        let big = Obstacle::new(ObstacleKind::Tree, 800.0, -4000.0, 2.0);
        // Character in the middle lane, obstacle in the right lane
        let character = character_box_at(0.0, 0.0, -4000.0);
        assert!(!small.collides(&character));
        // 2.0 * 250 = 500 reaches back to x = 300, still clear of 115
        assert!(!big.collides(&character));
        let huge = Obstacle::new(ObstacleKind::Tree, 800.0, -4000.0, 3.0);
        assert!(huge.collides(&character));
    }

    #[test]
    fn test_jumping_over_tree() {
        let tree = Obstacle::new(ObstacleKind::Tree, 0.0, -4000.0, 0.5);
        // Tree top at -400 + 575 = 175; feet at y - 310
        assert!(!tree.collides(&character_box_at(0.0, 1000.0, -4000.0)));
        assert!(tree.collides(&character_box_at(0.0, 10.0, -4000.0)));
    }

    #[test]
    fn test_ground_supports() {
        let ground = GroundSegment::new(-4000.0);
        assert!(ground.supports(&character_box_at(0.0, 0.0, -4000.0)));
        assert!(ground.supports(&character_box_at(0.0, 2000.0, -4700.0)));
        assert!(!ground.supports(&character_box_at(0.0, 0.0, -5500.0)));
    }

    #[test]
    fn test_meshes_build() {
        let tree = Obstacle::new(ObstacleKind::Tree, 0.0, 0.0, 1.0);
        assert!(tree.mesh().triangle_count() > 0);
        let rock = Obstacle::new(ObstacleKind::Asteroid, 0.0, 0.0, 1.0);
        assert_eq!(rock.mesh().vertices.len(), 12);
        assert_eq!(GroundSegment::new(0.0).mesh().vertices.len(), 8);
    }

    #[test]
    fn test_asteroid_keeps_its_shape() {
        let mut rock = Obstacle::new(ObstacleKind::Asteroid, 800.0, -9000.0, 1.0);
        let first = rock.mesh();
        rock.position.z += 3000.0;
        assert_eq!(rock.mesh(), first);
        let other = Obstacle::new(ObstacleKind::Asteroid, -800.0, -9000.0, 1.0);
        assert_ne!(other.mesh(), first);
    }

    #[test]
    fn test_world_mesh_follows_live_position() {
        let mut tree = Obstacle::new(ObstacleKind::Tree, 800.0, -9000.0, 0.5);
        tree.position.z = -4000.0;
        let mesh = tree.world_mesh();
        for v in &mesh.vertices {
            // Widest cone layer is 500 across at scale 1
            assert!((v.position[0] - 800.0).abs() <= 250.0 + 1e-3);
            assert!((v.position[2] + 4000.0).abs() <= 250.0 + 1e-3);
        }
        let ground = GroundSegment::new(-1500.0).world_mesh();
        assert!(ground.vertices.iter().all(|v| (v.position[1] - GROUND_Y).abs() <= 10.0));
    }
}
