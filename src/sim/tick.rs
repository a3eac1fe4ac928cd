//! Fixed timestep runner tick
//!
//! One call advances the track, streams new rows in ahead of the player,
//! animates the character and resolves hazards.

use rand::Rng;

use super::actor::{GroundSegment, Obstacle};
use super::character::Action;
use super::events::{GameEvent, Output};
use super::rank::rank_summary;
use super::state::RunnerState;
use crate::consts::{LANE_WIDTH, SIM_DT};
use crate::input::keys;

/// Input commands for a single tick (deterministic)
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Key codes pressed since the last tick, in order
    pub pressed: Vec<u32>,
}

impl TickInput {
    pub fn key(code: u32) -> Self {
        Self {
            pressed: vec![code],
        }
    }
}

/// Outcome of the ground check under the character
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GroundCheck {
    /// Some tile is under the character
    Supported,
    /// Over a gap, but high enough to clear it
    Airborne,
    /// Over a gap and too low: falling
    Falling,
}

/// Advance the run by one fixed timestep
pub fn tick(state: &mut RunnerState, input: &TickInput) {
    for &code in &input.pressed {
        handle_key(state, code);
    }

    // Don't tick if paused or game over
    if state.paused || state.game_over {
        return;
    }

    state.time_ticks += 1;
    state.clock += SIM_DT;

    // Scroll the track toward the camera
    let step = state.tuning.advance_per_tick;
    state.scroll += step;
    for obstacle in &mut state.obstacles {
        obstacle.position.z += step;
    }
    for ground in &mut state.grounds {
        ground.position.z += step;
    }

    // Forget whatever passed the camera
    state.obstacles.retain(|o| o.position.z < 0.0);
    state.grounds.retain(|g| g.position.z < 0.0);
    // Row keys are fixed track positions; a row has reached the camera once
    // its key is at or above -scroll
    let horizon = -(state.scroll.round() as i64);
    state.hole_rows.retain(|&key, _| key < horizon);
    state.obstacle_rows.retain(|&key, _| key < horizon);

    update_difficulty(state);

    // Sparse batches keep the live count low; lookahead stays under two batches
    let threshold = state.tuning.refill_threshold;
    if state.obstacles.len() < threshold
        && state.obstacle_rows.len() < 2 * state.tuning.obstacle_rows_per_batch
    {
        generate_obstacle_batch(state);
    }
    if state.grounds.len() < threshold && state.hole_rows.len() < 2 * state.tuning.ground_rows_per_batch {
        generate_ground_batch(state);
    }

    state.character.update(state.clock);

    let mut narrated = false;
    match check_ground(state) {
        GroundCheck::Falling if state.modes.superman => {
            narrate(state, "You would have fallen... but you're superman");
            narrated = true;
        }
        GroundCheck::Falling => {
            log::info!("Fell into a gap at score {}", state.score);
            end_game(state);
        }
        GroundCheck::Airborne => {
            narrate(state, "Nice jump!");
            narrated = true;
        }
        GroundCheck::Supported => {}
    }

    if !state.game_over && collisions_detected(state) {
        if state.modes.ghost {
            narrate(state, "Ghost mode: you passed through an obstacle");
            narrated = true;
        } else {
            log::info!("Hit an obstacle at score {}", state.score);
            end_game(state);
        }
    }

    let interval = state.tuning.status_interval_ticks.max(1);
    if !state.game_over && !narrated && state.time_ticks % interval == 0 {
        let report = Output {
            score: Some(state.score),
            msg: rank_summary(state.score, false),
            ..Default::default()
        };
        state.events.push(GameEvent::Collision(report));
    }

    state.score += state.tuning.score_per_tick;
    state.events.push(GameEvent::Score(state.score));
}

/// Apply a key press: resume, pause or queue a movement
pub fn handle_key(state: &mut RunnerState, code: u32) {
    if state.game_over {
        return;
    }
    if state.paused && code > keys::MODIFIER_MAX && !collisions_detected(state) {
        state.paused = false;
        state.character.on_unpause(state.clock);
        state.events.push(GameEvent::Resumed);
        return;
    }
    if code == keys::P {
        state.paused = true;
        state.character.on_pause(state.clock);
        state.events.push(GameEvent::Paused);
        return;
    }
    if state.paused {
        return;
    }
    match code {
        keys::ARROW_UP => state.character.queue(Action::Up),
        keys::ARROW_LEFT => state.character.queue(Action::Left),
        keys::ARROW_RIGHT => state.character.queue(Action::Right),
        _ => {}
    }
}

/// Whether the character overlaps any live obstacle
pub fn collisions_detected(state: &RunnerState) -> bool {
    let bounds = state.character.bounds();
    state.obstacles.iter().any(|o| o.collides(&bounds))
}

/// Classify the character's footing
pub fn check_ground(state: &RunnerState) -> GroundCheck {
    let bounds = state.character.bounds();
    if state.grounds.iter().any(|g| g.supports(&bounds)) {
        GroundCheck::Supported
    } else if state.character.position().y <= state.tuning.safe_jump_height {
        GroundCheck::Falling
    } else {
        GroundCheck::Airborne
    }
}

fn narrate(state: &mut RunnerState, msg: &str) {
    let out = Output::message(msg).with_score(state.score);
    state.events.push(GameEvent::Collision(out));
}

fn end_game(state: &mut RunnerState) {
    state.game_over = true;
    state.paused = true;
    state.character.on_pause(state.clock);
    let summary = Output {
        score: Some(state.score),
        msg: rank_summary(state.score, true),
        ..Default::default()
    };
    state.events.push(GameEvent::Collision(summary));
}

/// Raise difficulty for every obstacle row scrolled past
fn update_difficulty(state: &mut RunnerState) {
    let rows_passed = (state.scroll / state.tuning.obstacle_row_spacing).floor() as u32;
    while state.difficulty < rows_passed {
        state.difficulty += 1;
        apply_difficulty_level(state);
    }
}

/// Obstacle density per level and fog closing in on the late levels
fn apply_difficulty_level(state: &mut RunnerState) {
    let level_length = state.tuning.level_length.max(1);
    let difficulty = state.difficulty;

    if difficulty % level_length == 0 {
        let (probability, max_scale) = match difficulty / level_length {
            1 => (0.35, 0.5),
            2 => (0.35, 0.85),
            3 => (0.5, 0.85),
            4 | 5 => (0.5, 1.1),
            6 => (0.55, 1.1),
            _ => (0.55, 1.15),
        };
        state.presence_probability = probability;
        state.max_obstacle_scale = max_scale;
        log::debug!(
            "Level {}: presence {} max scale {}",
            difficulty / level_length,
            probability,
            max_scale
        );
    }

    let level_length_f = level_length as f32;
    if (5 * level_length..6 * level_length).contains(&difficulty) {
        state.fog_distance -= 25_000.0 / level_length_f;
    } else if (8 * level_length..9 * level_length).contains(&difficulty) {
        state.fog_distance -= 5_000.0 / level_length_f;
    }
}

/// Generate one row of obstacles at world `z`, returning how many spawned
///
/// Each lane rolls independently; lanes beyond the score tier's cap are
/// skipped. Row flavour alternates between trees and asteroids.
pub fn generate_obstacle_row(state: &mut RunnerState, z: f32) -> usize {
    state.next_kind = state.next_kind.toggled();
    let kind = state.next_kind;
    let cap = state.tuning.max_lanes(state.score);
    let min_scale = state.tuning.min_obstacle_scale;
    let max_scale = state.max_obstacle_scale;
    let mut occupied = 0;

    for lane in -1..=1 {
        if state.rng.random::<f32>() >= state.presence_probability {
            continue;
        }
        if occupied >= cap {
            continue;
        }
        let scale = min_scale + (max_scale - min_scale) * state.rng.random::<f32>();
        state
            .obstacles
            .push(Obstacle::new(kind, lane as f32 * LANE_WIDTH, z, scale));
        occupied += 1;
    }

    let key = state.track_key(z);
    state.obstacle_rows.insert(key, occupied > 0);
    occupied
}

/// Queue a batch of obstacle rows beyond the current frontier
pub fn generate_obstacle_batch(state: &mut RunnerState) {
    let spacing = state.tuning.obstacle_row_spacing;
    for _ in 0..state.tuning.obstacle_rows_per_batch {
        let z = state.obstacle_frontier + state.scroll;
        generate_obstacle_row(state, z);
        state.obstacle_frontier -= spacing;
    }
    log::debug!(
        "Obstacle batch up to track {}: {} live",
        state.obstacle_frontier,
        state.obstacles.len()
    );
}

/// Queue a batch of ground rows with occasional gaps
///
/// The head of each batch stays solid and consecutive gaps are separated
/// by at least `min_solid_rows` tiles.
pub fn generate_ground_batch(state: &mut RunnerState) {
    let spacing = state.tuning.ground_row_spacing;
    let min_solid = state.tuning.min_solid_rows;
    let mut since_last_gap = min_solid;

    for i in 0..state.tuning.ground_rows_per_batch {
        let z = state.ground_frontier + state.scroll;
        let attempt_gap = state.rng.random::<f32>() < state.tuning.gap_probability;
        let hole = i > min_solid && attempt_gap && since_last_gap >= min_solid;
        if hole {
            since_last_gap = 0;
        } else {
            since_last_gap += 1;
            state.grounds.push(GroundSegment::new(z));
        }
        let key = state.track_key(z);
        state.hole_rows.insert(key, hole);
        state.ground_frontier -= spacing;
    }
}
