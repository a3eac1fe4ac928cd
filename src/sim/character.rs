//! The runner character
//!
//! Locomotion is a tiny action queue: jump and lane-switch requests are
//! queued and consumed one at a time, only when no other action is in
//! progress. The limb rig lives in a `SceneGraph` and is animated from the
//! simulation clock.

use std::collections::VecDeque;

use glam::Vec3;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::collision::Aabb;
use super::scene::{NodeId, SceneGraph};
use crate::consts::*;
use crate::mesh::{Mesh, create_box, palette};
use crate::{DEG2RAD, sinusoid};

/// Jump apex above the running height
pub const JUMP_HEIGHT: f32 = 2000.0;
/// Jump duration in seconds
pub const JUMP_DURATION: f32 = 0.6;
/// Steps per second while running
pub const STEP_FREQ: f32 = 2.0;
/// Sideways distance covered per tick while switching lanes
pub const LANE_SWITCH_STEP: f32 = 200.0;

/// A queued locomotion request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Action {
    Up,
    Left,
    Right,
}

/// Scene nodes of the character rig
#[derive(Debug, Clone, Copy)]
pub struct Rig {
    pub root: NodeId,
    pub head: NodeId,
    pub torso: NodeId,
    pub left_arm: NodeId,
    pub left_lower_arm: NodeId,
    pub right_arm: NodeId,
    pub right_lower_arm: NodeId,
    pub left_leg: NodeId,
    pub left_lower_leg: NodeId,
    pub right_leg: NodeId,
    pub right_lower_leg: NodeId,
}

#[derive(Debug, Clone)]
pub struct Character {
    pub graph: SceneGraph,
    pub rig: Rig,
    pub is_jumping: bool,
    pub is_switching_left: bool,
    pub is_switching_right: bool,
    /// Current lane (-1, 0, +1)
    pub current_lane: i32,
    pub running_start_time: f32,
    pub pause_start_time: f32,
    pub jump_start_time: f32,
    pub queued_actions: VecDeque<Action>,
}

/// Limb with its rotation axis at the top: the box hangs below the group origin
fn add_limb(
    graph: &mut SceneGraph,
    parent: NodeId,
    size: Vec3,
    color: u32,
    pivot: Vec3,
) -> NodeId {
    let limb = graph.add_group(Some(parent), pivot);
    let offset = -(size.x.max(size.z) / 2.0 + size.y / 2.0);
    graph.add_mesh(Some(limb), Vec3::new(0.0, offset, 0.0), create_box(size, color, Vec3::ZERO));
    limb
}

fn add_box(graph: &mut SceneGraph, parent: NodeId, size: Vec3, color: u32, at: Vec3) -> NodeId {
    graph.add_mesh(Some(parent), at, create_box(size, color, Vec3::ZERO))
}

impl Character {
    /// Build the rig at the rest position; `now` starts the running clock
    pub fn new(rng: &mut impl Rng, now: f32) -> Self {
        let skin = if rng.random::<f32>() > 0.4 { palette::BROWN } else { palette::WHITE };
        let shirt = if rng.random::<f32>() > 0.4 { palette::BLUE } else { palette::YELLOW };
        let hair = palette::BLACK;
        let shorts = palette::OLIVE;

        let mut graph = SceneGraph::new();
        let root = graph.add_group(None, Vec3::new(0.0, 0.0, CHARACTER_Z));

        let head = graph.add_group(Some(root), Vec3::new(0.0, 260.0, -25.0));
        add_box(&mut graph, head, Vec3::new(100.0, 100.0, 60.0), skin, Vec3::ZERO);
        add_box(&mut graph, head, Vec3::new(105.0, 20.0, 65.0), hair, Vec3::new(0.0, 50.0, 0.0));

        let torso = add_box(&mut graph, root, Vec3::new(150.0, 190.0, 40.0), shirt, Vec3::new(0.0, 100.0, 0.0));

        let left_arm = add_limb(&mut graph, root, Vec3::new(30.0, 140.0, 40.0), skin, Vec3::new(-100.0, 190.0, -10.0));
        let left_lower_arm = add_limb(&mut graph, left_arm, Vec3::new(20.0, 120.0, 30.0), skin, Vec3::new(0.0, -170.0, 0.0));
        let right_arm = add_limb(&mut graph, root, Vec3::new(30.0, 140.0, 40.0), skin, Vec3::new(100.0, 190.0, -10.0));
        let right_lower_arm = add_limb(&mut graph, right_arm, Vec3::new(20.0, 120.0, 30.0), skin, Vec3::new(0.0, -170.0, 0.0));
        let left_leg = add_limb(&mut graph, root, Vec3::new(50.0, 170.0, 50.0), shorts, Vec3::new(-50.0, -10.0, 30.0));
        let left_lower_leg = add_limb(&mut graph, left_leg, Vec3::new(40.0, 200.0, 40.0), skin, Vec3::new(0.0, -200.0, 0.0));
        let right_leg = add_limb(&mut graph, root, Vec3::new(50.0, 170.0, 50.0), shorts, Vec3::new(50.0, -10.0, 30.0));
        let right_lower_leg = add_limb(&mut graph, right_leg, Vec3::new(40.0, 200.0, 40.0), skin, Vec3::new(0.0, -200.0, 0.0));

        Self {
            graph,
            rig: Rig {
                root,
                head,
                torso,
                left_arm,
                left_lower_arm,
                right_arm,
                right_lower_arm,
                left_leg,
                left_lower_leg,
                right_leg,
                right_lower_leg,
            },
            is_jumping: false,
            is_switching_left: false,
            is_switching_right: false,
            current_lane: 0,
            running_start_time: now,
            pause_start_time: now,
            jump_start_time: now,
            queued_actions: VecDeque::new(),
        }
    }

    /// Current root position
    pub fn position(&self) -> Vec3 {
        self.graph.node(self.rig.root).position
    }

    fn position_mut(&mut self) -> &mut Vec3 {
        &mut self.graph.node_mut(self.rig.root).position
    }

    /// Collision box around the live root position
    pub fn bounds(&self) -> Aabb {
        let p = self.position();
        Aabb::new(
            Vec3::new(
                p.x - CHARACTER_HALF_WIDTH,
                p.y - CHARACTER_BELOW,
                p.z - CHARACTER_HALF_DEPTH,
            ),
            Vec3::new(
                p.x + CHARACTER_HALF_WIDTH,
                p.y + CHARACTER_ABOVE,
                p.z + CHARACTER_HALF_DEPTH,
            ),
        )
    }

    /// True while a jump or lane switch is underway
    pub fn is_busy(&self) -> bool {
        self.is_jumping || self.is_switching_left || self.is_switching_right
    }

    pub fn queue(&mut self, action: Action) {
        self.queued_actions.push_back(action);
    }

    /// Advance animation and locomotion to time `now` (seconds)
    pub fn update(&mut self, now: f32) {
        if !self.is_busy() {
            match self.queued_actions.pop_front() {
                Some(Action::Up) => {
                    self.is_jumping = true;
                    self.jump_start_time = now;
                }
                Some(Action::Left) => self.is_switching_left = self.current_lane != -1,
                Some(Action::Right) => self.is_switching_right = self.current_lane != 1,
                None => {}
            }
        }

        if self.is_jumping {
            let jump_clock = now - self.jump_start_time;
            let bob = sinusoid(
                2.0 * STEP_FREQ,
                0.0,
                20.0,
                0.0,
                self.jump_start_time - self.running_start_time,
            );
            self.position_mut().y =
                JUMP_HEIGHT * (std::f32::consts::PI * jump_clock / JUMP_DURATION).sin() + bob;
            if jump_clock > JUMP_DURATION {
                self.is_jumping = false;
                self.running_start_time += JUMP_DURATION;
            }
            return;
        }

        let t = now - self.running_start_time;
        self.position_mut().y = sinusoid(2.0 * STEP_FREQ, 0.0, 20.0, 0.0, t);
        self.animate_limbs(t);

        if self.is_switching_left {
            self.position_mut().x -= LANE_SWITCH_STEP;
            let offset = self.current_lane as f32 * LANE_WIDTH - self.position().x;
            if offset > LANE_WIDTH {
                self.current_lane -= 1;
                self.position_mut().x = self.current_lane as f32 * LANE_WIDTH;
                self.is_switching_left = false;
            }
        }
        if self.is_switching_right {
            self.position_mut().x += LANE_SWITCH_STEP;
            let offset = self.position().x - self.current_lane as f32 * LANE_WIDTH;
            if offset > LANE_WIDTH {
                self.current_lane += 1;
                self.position_mut().x = self.current_lane as f32 * LANE_WIDTH;
                self.is_switching_right = false;
            }
        }
    }

    fn animate_limbs(&mut self, t: f32) {
        let f = STEP_FREQ;
        // (node, frequency, min, max, phase) in degrees
        let table = [
            (self.rig.head, 2.0 * f, -10.0, -5.0, 0.0),
            (self.rig.torso, 2.0 * f, -10.0, -5.0, 180.0),
            (self.rig.left_arm, f, -70.0, 50.0, 180.0),
            (self.rig.right_arm, f, -70.0, 50.0, 0.0),
            (self.rig.left_lower_arm, f, 70.0, 140.0, 180.0),
            (self.rig.right_lower_arm, f, 70.0, 140.0, 0.0),
            (self.rig.left_leg, f, -20.0, 80.0, 0.0),
            (self.rig.right_leg, f, -20.0, 80.0, 180.0),
            (self.rig.left_lower_leg, f, -130.0, 5.0, 240.0),
            (self.rig.right_lower_leg, f, -130.0, 5.0, 60.0),
        ];
        for (node, freq, min, max, phase) in table {
            self.graph.node_mut(node).rotation.x = sinusoid(freq, min, max, phase, t) * DEG2RAD;
        }
    }

    pub fn on_pause(&mut self, now: f32) {
        self.pause_start_time = now;
    }

    /// Shift the clocks so the pause does not count as elapsed time
    pub fn on_unpause(&mut self, now: f32) {
        let pause_duration = now - self.pause_start_time;
        self.running_start_time += pause_duration;
        if self.is_jumping {
            self.jump_start_time += pause_duration;
        }
    }

    /// All rig geometry in world space, merged
    pub fn mesh(&self) -> Mesh {
        let mut merged = Mesh::new();
        for (id, transform) in self.graph.meshes_under(self.rig.root) {
            if let Some(mesh) = &self.graph.node(id).mesh {
                merged.append(&mesh.transformed(transform));
            }
        }
        merged
    }
}
