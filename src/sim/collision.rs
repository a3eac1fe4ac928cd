//! Axis-aligned bounding box tests
//!
//! Every hazard in the runner is a box. Obstacles test all three axes;
//! ground tiles only test the X/Z footprint since they answer "is something
//! standing here", not "did something hit".

use glam::{Vec2, Vec3};
use serde::{Deserialize, Serialize};

/// Axis-aligned box in world space
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Aabb {
    pub min: Vec3,
    pub max: Vec3,
}

impl Aabb {
    pub fn new(min: Vec3, max: Vec3) -> Self {
        Self { min, max }
    }

    /// Box centred on `center` with the given half extents
    pub fn from_center(center: Vec3, half: Vec3) -> Self {
        Self {
            min: center - half,
            max: center + half,
        }
    }

    /// Overlap on all three axes. Touching faces count as overlap.
    #[inline]
    pub fn overlaps(&self, other: &Aabb) -> bool {
        self.min.x <= other.max.x
            && self.max.x >= other.min.x
            && self.min.y <= other.max.y
            && self.max.y >= other.min.y
            && self.min.z <= other.max.z
            && self.max.z >= other.min.z
    }

    /// Projection onto the ground plane
    pub fn footprint(&self) -> Footprint {
        Footprint {
            min: Vec2::new(self.min.x, self.min.z),
            max: Vec2::new(self.max.x, self.max.z),
        }
    }

    pub fn center(&self) -> Vec3 {
        (self.min + self.max) * 0.5
    }
}

/// Rectangle on the X/Z plane (x in `.x`, z in `.y`)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Footprint {
    pub min: Vec2,
    pub max: Vec2,
}

impl Footprint {
    /// Square footprint of edge `size` centred on (x, z)
    pub fn square(x: f32, z: f32, size: f32) -> Self {
        let half = size / 2.0;
        Self {
            min: Vec2::new(x - half, z - half),
            max: Vec2::new(x + half, z + half),
        }
    }

    /// Strict overlap: a box that only shares an edge is not supported
    #[inline]
    pub fn supports(&self, other: &Footprint) -> bool {
        other.max.x > self.min.x
            && other.min.x < self.max.x
            && other.max.y > self.min.y
            && other.min.y < self.max.y
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn arb_box() -> impl Strategy<Value = Aabb> {
        (
            -5000.0f32..5000.0,
            -5000.0f32..5000.0,
            -5000.0f32..5000.0,
            0.0f32..2000.0,
            0.0f32..2000.0,
            0.0f32..2000.0,
        )
            .prop_map(|(x, y, z, w, h, d)| {
                Aabb::new(Vec3::new(x, y, z), Vec3::new(x + w, y + h, z + d))
            })
    }

    #[test]
    fn test_touching_faces_overlap() {
        let a = Aabb::new(Vec3::ZERO, Vec3::ONE);
        let b = Aabb::new(Vec3::new(1.0, 0.0, 0.0), Vec3::new(2.0, 1.0, 1.0));
        assert!(a.overlaps(&b));
    }

    #[test]
    fn test_separated_on_one_axis() {
        let a = Aabb::new(Vec3::ZERO, Vec3::ONE);
        let b = Aabb::new(Vec3::new(0.0, 0.0, 1.5), Vec3::new(1.0, 1.0, 2.5));
        assert!(!a.overlaps(&b));
    }

    #[test]
    fn test_footprint_ignores_height() {
        let ground = Footprint::square(0.0, -4000.0, 1500.0);
        let high = Aabb::from_center(
            Vec3::new(0.0, 5000.0, -4000.0),
            Vec3::new(115.0, 300.0, 40.0),
        );
        assert!(ground.supports(&high.footprint()));
    }

    proptest! {
        #[test]
        fn prop_overlap_symmetric(a in arb_box(), b in arb_box()) {
            prop_assert_eq!(a.overlaps(&b), b.overlaps(&a));
        }

        #[test]
        fn prop_overlap_reflexive(a in arb_box()) {
            prop_assert!(a.overlaps(&a));
        }

        #[test]
        fn prop_outside_footprint_never_supported(
            gx in -3000.0f32..3000.0,
            gz in -3000.0f32..3000.0,
            dx in 1.0f32..2000.0,
            dz in -2000.0f32..2000.0,
        ) {
            let ground = Footprint::square(gx, gz, 1500.0);
            // Entirely to the right of the tile, any z
            let min_x = ground.max.x + dx;
            let fp = Footprint {
                min: Vec2::new(min_x, gz + dz - 40.0),
                max: Vec2::new(min_x + 230.0, gz + dz + 40.0),
            };
            prop_assert!(!ground.supports(&fp));
        }
    }
}
