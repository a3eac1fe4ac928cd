//! Doughnut stars: fly a hand-steered ball through incoming rings
//!
//! The ring travels toward the camera along +z. Threading the player's
//! ball through it scores a point and speeds the next one up.

use glam::{Vec2, Vec3};
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use crate::input::{Direction, hand_to_plane, keys};
use crate::sim::events::{GameEvent, Output};

pub const PLAYER_Z: f32 = -10.0;
pub const CAMERA_Z: f32 = 5.0;
/// Rings past the camera by this much are recycled
pub const RESET_MARGIN: f32 = 5.0;
/// Recycled rings restart this far back
pub const RESPAWN_Z: f32 = -50.0;
/// Half extent of the square recycled rings are centred in
pub const RESPAWN_SPREAD: f32 = 5.0;
/// Opening of the ring the ball must fit through
pub const RING_INNER_RADIUS: f32 = 1.5;
/// Depth tolerance for a pass
pub const PASS_DEPTH: f32 = 0.1;
pub const SPEED_STEP: i32 = 5;
pub const START_SPEED: i32 = 5;
/// Star field drift per tick and its wrap-around bounds
pub const STAR_DRIFT: f32 = 0.1;
pub const STAR_WRAP: f32 = 50.0;

#[derive(Debug, Clone)]
pub struct RingsGame {
    rng: Pcg32,
    pub torus: Vec3,
    pub player: Vec3,
    /// Ring speed in hundredths of a unit per tick
    speed: i32,
    score: u64,
    stopped: bool,
    /// Set once the current ring has scored
    scored_this_pass: bool,
    /// Next respawn goes to the origin instead of a random spot
    recenter: bool,
    pub star_offset: f32,
    events: Vec<GameEvent>,
}

impl RingsGame {
    pub fn new(seed: u64) -> Self {
        let mut game = Self {
            rng: Pcg32::seed_from_u64(seed),
            torus: Vec3::ZERO,
            player: Vec3::new(0.0, 0.0, PLAYER_Z),
            speed: START_SPEED,
            score: 0,
            stopped: false,
            scored_this_pass: false,
            recenter: false,
            star_offset: 0.0,
            events: Vec::new(),
        };
        game.report();
        log::info!("Rings ready (seed {})", seed);
        game
    }

    pub fn score(&self) -> u64 {
        self.score
    }

    pub fn speed(&self) -> i32 {
        self.speed
    }

    pub fn is_stopped(&self) -> bool {
        self.stopped
    }

    fn report(&mut self) {
        let out = Output {
            score: Some(self.score),
            speed: Some(self.speed as f32),
            msg: vec![format!("Speed: {}", self.speed)],
        };
        self.events.push(GameEvent::Output(out));
    }

    /// Advance the ring, score a pass and recycle rings behind the camera
    pub fn tick(&mut self) {
        let previous_z = self.torus.z;
        if !self.stopped {
            self.torus.z += self.speed as f32 / 100.0;
        }

        if self.threaded(previous_z) && !self.scored_this_pass {
            self.scored_this_pass = true;
            self.speed += SPEED_STEP;
            self.score += 1;
            log::debug!("Ring passed: score {} speed {}", self.score, self.speed);
            self.report();
        }

        if self.torus.z > CAMERA_Z + RESET_MARGIN {
            self.scored_this_pass = false;
            self.respawn();
        }

        self.star_offset += STAR_DRIFT;
        if self.star_offset > STAR_WRAP {
            self.star_offset = -STAR_WRAP;
        }
    }

    /// Ball inside the ring opening, at or crossing its plane this tick
    fn threaded(&self, previous_z: f32) -> bool {
        let near = (self.player.z - self.torus.z).abs() < PASS_DEPTH;
        let crossed = previous_z < self.player.z && self.torus.z >= self.player.z;
        let offset = self.player.truncate() - self.torus.truncate();
        (near || crossed) && offset.length() < RING_INNER_RADIUS
    }

    fn respawn(&mut self) {
        self.torus.z = RESPAWN_Z;
        if self.recenter {
            self.torus.x = 0.0;
            self.torus.y = 0.0;
            self.recenter = false;
        } else {
            self.torus.x = self.rng.random_range(-RESPAWN_SPREAD..RESPAWN_SPREAD);
            self.torus.y = self.rng.random_range(-RESPAWN_SPREAD..RESPAWN_SPREAD);
        }
    }

    pub fn key(&mut self, code: u32) {
        match code {
            keys::S => {
                self.stopped = !self.stopped;
                log::info!("Rings {}", if self.stopped { "stopped" } else { "moving" });
            }
            keys::A => {
                self.speed += SPEED_STEP;
                self.report();
            }
            keys::D => {
                self.speed -= SPEED_STEP;
                self.report();
            }
            keys::R => self.recenter = true,
            _ => {
                if let Some(direction) = Direction::from_key(code) {
                    self.nudge(direction);
                }
            }
        }
    }

    /// Move the ball one unit
    pub fn nudge(&mut self, direction: Direction) {
        let step = direction.axis();
        self.player.x += step.x;
        self.player.y += step.y;
    }

    /// Place the ball from a tracked wrist landmark
    pub fn set_hand(&mut self, wrist: Vec2) {
        let p = hand_to_plane(wrist);
        self.player.x = p.x;
        self.player.y = p.y;
    }

    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }
}
