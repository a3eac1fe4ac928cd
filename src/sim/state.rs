//! Runner state and tuning
//!
//! All state the endless runner needs lives here. Same seed plus the same
//! input sequence reproduces the same run.

use std::collections::BTreeMap;

use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::actor::{GroundSegment, Obstacle, ObstacleKind};
use super::character::Character;
use super::events::{GameEvent, Output};
use crate::consts::GROUND_SEGMENT_SIZE;

/// Credit line shown when a run starts
pub const THANKS_MESSAGE: &str = "We thank Wan Fung Chui for the inspiration.";

/// Gameplay balance for the runner
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunnerTuning {
    /// Distance everything scrolls toward the camera per tick
    pub advance_per_tick: f32,
    /// Distance between obstacle rows
    pub obstacle_row_spacing: f32,
    /// Obstacle rows generated per batch
    pub obstacle_rows_per_batch: usize,
    /// Distance between ground rows
    pub ground_row_spacing: f32,
    /// Ground rows generated per batch
    pub ground_rows_per_batch: usize,
    /// Solid rows required at the head of a batch and between gaps
    pub min_solid_rows: usize,
    /// Chance that an eligible ground row is a gap
    pub gap_probability: f32,
    /// Generate another batch when fewer live actors remain
    pub refill_threshold: usize,
    /// Above this height the character clears a gap
    pub safe_jump_height: f32,
    /// Status report interval while nothing happens
    pub status_interval_ticks: u64,
    pub score_per_tick: u64,
    /// Below this score a row holds at most one obstacle
    pub one_lane_below: u64,
    /// Below this score a row holds at most two obstacles
    pub two_lanes_below: u64,
    pub initial_fog_distance: f32,
    pub initial_presence_probability: f32,
    pub min_obstacle_scale: f32,
    pub initial_max_obstacle_scale: f32,
    /// Difficulty points per level
    pub level_length: u32,
}

impl Default for RunnerTuning {
    fn default() -> Self {
        Self {
            advance_per_tick: 100.0,
            obstacle_row_spacing: 3000.0,
            obstacle_rows_per_batch: 60,
            ground_row_spacing: GROUND_SEGMENT_SIZE,
            ground_rows_per_batch: 61,
            min_solid_rows: 20,
            gap_probability: 0.15,
            refill_threshold: 20,
            safe_jump_height: 400.0,
            status_interval_ticks: 150,
            score_per_tick: 10,
            one_lane_below: 62_000,
            two_lanes_below: 124_000,
            initial_fog_distance: 40_000.0,
            initial_presence_probability: 0.2,
            min_obstacle_scale: 0.5,
            initial_max_obstacle_scale: 0.5,
            level_length: 30,
        }
    }
}

impl RunnerTuning {
    /// How many lanes of a single row may hold an obstacle at this score
    pub fn max_lanes(&self, score: u64) -> usize {
        if score < self.one_lane_below {
            1
        } else if score < self.two_lanes_below {
            2
        } else {
            crate::consts::LANE_COUNT
        }
    }
}

/// Rule relaxations that turn a fatal hazard into narration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Modes {
    /// Survive falling into gaps
    pub superman: bool,
    /// Pass through obstacles
    pub ghost: bool,
}

impl Default for Modes {
    fn default() -> Self {
        Self {
            superman: true,
            ghost: false,
        }
    }
}

/// Complete runner state
#[derive(Debug, Clone)]
pub struct RunnerState {
    pub seed: u64,
    pub(crate) rng: Pcg32,
    pub tuning: RunnerTuning,
    pub modes: Modes,
    pub score: u64,
    /// Obstacle rows scrolled past so far
    pub difficulty: u32,
    pub fog_distance: f32,
    pub presence_probability: f32,
    pub max_obstacle_scale: f32,
    /// Live obstacles, ordered by spawn
    pub obstacles: Vec<Obstacle>,
    /// Live ground tiles, ordered by spawn
    pub grounds: Vec<GroundSegment>,
    /// Ground rows ahead of the camera: track position -> is hole
    pub hole_rows: BTreeMap<i64, bool>,
    /// Obstacle rows ahead of the camera: track position -> occupied
    pub obstacle_rows: BTreeMap<i64, bool>,
    /// Total distance scrolled
    pub scroll: f32,
    /// Track position of the next obstacle row to generate
    pub(crate) obstacle_frontier: f32,
    /// Track position of the next ground row to generate
    pub(crate) ground_frontier: f32,
    pub(crate) next_kind: ObstacleKind,
    pub character: Character,
    pub paused: bool,
    pub game_over: bool,
    /// Unpaused ticks simulated
    pub time_ticks: u64,
    /// Simulation clock in seconds (stops while paused)
    pub clock: f32,
    /// Events not yet drained by the host
    pub events: Vec<GameEvent>,
}

impl RunnerState {
    /// Create a paused run with the initial track generated
    pub fn new(seed: u64, modes: Modes) -> Self {
        Self::with_tuning(seed, modes, RunnerTuning::default())
    }

    pub fn with_tuning(seed: u64, modes: Modes, tuning: RunnerTuning) -> Self {
        let mut rng = Pcg32::seed_from_u64(seed);
        let character = Character::new(&mut rng, 0.0);
        let mut state = Self {
            seed,
            rng,
            modes,
            score: 0,
            difficulty: 0,
            fog_distance: tuning.initial_fog_distance,
            presence_probability: tuning.initial_presence_probability,
            max_obstacle_scale: tuning.initial_max_obstacle_scale,
            tuning,
            obstacles: Vec::new(),
            grounds: Vec::new(),
            hole_rows: BTreeMap::new(),
            obstacle_rows: BTreeMap::new(),
            scroll: 0.0,
            obstacle_frontier: 0.0,
            ground_frontier: 0.0,
            next_kind: ObstacleKind::Tree,
            character,
            paused: true,
            game_over: false,
            time_ticks: 0,
            clock: 0.0,
            events: Vec::new(),
        };

        super::tick::generate_ground_batch(&mut state);
        super::tick::generate_obstacle_batch(&mut state);
        state.events.push(GameEvent::Output(Output::message(THANKS_MESSAGE)));
        log::info!(
            "Runner ready (seed {}): {} obstacles, {} ground tiles",
            seed,
            state.obstacles.len(),
            state.grounds.len()
        );
        state
    }

    /// Track key for a world z at the current scroll
    pub(crate) fn track_key(&self, world_z: f32) -> i64 {
        (world_z - self.scroll).round() as i64
    }

    /// Whether the ground row at `world_z` is a hole, if that row is known
    pub fn is_hole_at(&self, world_z: f32) -> Option<bool> {
        self.hole_rows.get(&self.track_key(world_z)).copied()
    }

    /// Take all pending events
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_run_is_paused_with_track() {
        let state = RunnerState::new(42, Modes::default());
        assert!(state.paused);
        assert!(!state.game_over);
        assert_eq!(state.score, 0);
        assert_eq!(state.grounds.len() + state.hole_rows.values().filter(|h| **h).count(), 61);
        assert!(state.obstacles.len() <= 60);
        assert!(matches!(state.events[0], GameEvent::Output(_)));
    }

    #[test]
    fn test_max_lanes_tiers() {
        let tuning = RunnerTuning::default();
        assert_eq!(tuning.max_lanes(0), 1);
        assert_eq!(tuning.max_lanes(50_000), 1);
        assert_eq!(tuning.max_lanes(62_000), 2);
        assert_eq!(tuning.max_lanes(80_000), 2);
        assert_eq!(tuning.max_lanes(124_000), 3);
        assert_eq!(tuning.max_lanes(130_000), 3);
    }

    #[test]
    fn test_first_rows_are_solid() {
        let state = RunnerState::new(3, Modes::default());
        for i in 0..=20 {
            let z = -(i as f32) * GROUND_SEGMENT_SIZE;
            assert_eq!(state.is_hole_at(z), Some(false), "row {} should be solid", i);
        }
    }
}
