//! Deterministic endless runner simulation
//!
//! All runner gameplay lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only
//! - Scene graph nodes in creation order
//! - No rendering or platform dependencies

pub mod actor;
pub mod character;
pub mod collision;
pub mod events;
pub mod rank;
pub mod scene;
pub mod state;
pub mod tick;

pub use actor::{GroundSegment, Obstacle, ObstacleKind};
pub use character::{Action, Character};
pub use collision::{Aabb, Footprint};
pub use events::{GameEvent, Output};
pub use rank::{Rank, rank_summary};
pub use scene::{NodeId, SceneGraph};
pub use state::{Modes, RunnerState, RunnerTuning, THANKS_MESSAGE};
pub use tick::{GroundCheck, TickInput, check_ground, collisions_detected, handle_key, tick};
