//! Santa Arcade - a handful of small browser games behind one arcade menu
//!
//! Core modules:
//! - `sim`: Endless runner simulation (collisions, character, streaming track)
//! - `maze`: Maze-ball game (generation, rapier2d physics, level state machine)
//! - `rings`: Fly-through-rings game driven by hand tracking
//! - `input`: Key codes, touch repeat, face/hand tracking adapters
//! - `mesh`: CPU-side vertex buffers for the scene primitives
//! - `frame`: Per-frame geometry and view handed to the page
//! - `arcade`: Game selection and session ownership

pub mod arcade;
pub mod error;
pub mod frame;
pub mod input;
pub mod maze;
pub mod mesh;
pub mod rings;
pub mod settings;
pub mod sim;

pub use arcade::{Arcade, GameKind, Listeners, Session};
pub use error::ArcadeError;
pub use frame::SceneFrame;
pub use settings::ArcadeSettings;

/// Game configuration constants
pub mod consts {
    /// Fixed simulation timestep (one display frame at 60 Hz)
    pub const SIM_DT: f32 = 1.0 / 60.0;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 4;

    /// Horizontal distance between lanes
    pub const LANE_WIDTH: f32 = 800.0;
    /// Number of lanes (-1, 0, +1)
    pub const LANE_COUNT: usize = 3;

    /// Character rest position along the track
    pub const CHARACTER_Z: f32 = -4000.0;
    /// Character bounding box extents relative to its origin
    pub const CHARACTER_HALF_WIDTH: f32 = 115.0;
    pub const CHARACTER_BELOW: f32 = 310.0;
    pub const CHARACTER_ABOVE: f32 = 320.0;
    pub const CHARACTER_HALF_DEPTH: f32 = 40.0;

    /// Ground tile edge length (square footprint)
    pub const GROUND_SEGMENT_SIZE: f32 = 1500.0;
    /// Ground height below the track
    pub const GROUND_Y: f32 = -700.0;
}

/// Degrees to radians
pub const DEG2RAD: f32 = std::f32::consts::PI / 180.0;

/// Value of a sinusoid oscillating between `minimum` and `maximum`
///
/// `frequency` is in oscillations per second, `phase_deg` in degrees and
/// `time` in seconds.
#[inline]
pub fn sinusoid(frequency: f32, minimum: f32, maximum: f32, phase_deg: f32, time: f32) -> f32 {
    let amplitude = 0.5 * (maximum - minimum);
    let angular_frequency = std::f32::consts::TAU * frequency;
    let phase = phase_deg * DEG2RAD;
    let average = (minimum + maximum) / 2.0;
    average + amplitude * (angular_frequency * time + phase).sin()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sinusoid_bounds() {
        for i in 0..100 {
            let t = i as f32 * 0.037;
            let v = sinusoid(2.0, -70.0, 50.0, 180.0, t);
            assert!((-70.0..=50.0).contains(&v));
        }
    }

    #[test]
    fn test_sinusoid_phase_zero_starts_at_average() {
        assert!((sinusoid(4.0, 0.0, 20.0, 0.0, 0.0) - 10.0).abs() < 1e-5);
    }
}
