//! Maze physics world
//!
//! A zero-gravity rapier world holding one dynamic ball and one fixed unit
//! box per wall cell. Stepped at the simulation rate with 8 velocity and
//! 3 stabilization iterations.

use std::num::NonZeroUsize;

use glam::Vec2;
use rapier2d::prelude::*;

use super::generate::MazeGrid;
use crate::consts::SIM_DT;

pub const BALL_RADIUS: f32 = 0.25;
pub const BALL_DENSITY: f32 = 1.0;
pub const BALL_FRICTION: f32 = 0.0;
pub const BALL_RESTITUTION: f32 = 0.25;
/// Velocity kept per step, the maze's stand-in for rolling friction
pub const VELOCITY_DAMPING: f32 = 0.95;
/// Impulse per unit of input axis, scaled by the ball's mass
pub const IMPULSE_PER_MASS: f32 = 0.25 * 8.0;
/// Where the ball is dropped in every new maze
pub const BALL_START: Vec2 = Vec2::new(1.0, 1.0);

pub struct MazePhysics {
    pipeline: PhysicsPipeline,
    params: IntegrationParameters,
    islands: IslandManager,
    broad_phase: DefaultBroadPhase,
    narrow_phase: NarrowPhase,
    bodies: RigidBodySet,
    colliders: ColliderSet,
    impulse_joints: ImpulseJointSet,
    multibody_joints: MultibodyJointSet,
    ccd: CCDSolver,
    query_pipeline: QueryPipeline,
    ball: RigidBodyHandle,
    wall_count: usize,
}

impl std::fmt::Debug for MazePhysics {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MazePhysics")
            .field("ball", &self.ball_position())
            .field("walls", &self.wall_count)
            .finish()
    }
}

impl MazePhysics {
    /// Build the world for `grid`: ball at the start cell, a box per wall
    pub fn new(grid: &MazeGrid) -> Self {
        let mut bodies = RigidBodySet::new();
        let mut colliders = ColliderSet::new();

        let ball_body = RigidBodyBuilder::dynamic()
            .translation(vector![BALL_START.x, BALL_START.y])
            .build();
        let ball = bodies.insert(ball_body);
        let ball_collider = ColliderBuilder::ball(BALL_RADIUS)
            .density(BALL_DENSITY)
            .friction(BALL_FRICTION)
            .restitution(BALL_RESTITUTION)
            .build();
        colliders.insert_with_parent(ball_collider, ball, &mut bodies);

        let mut wall_count = 0;
        for (x, y) in grid.walls() {
            let wall = ColliderBuilder::cuboid(0.5, 0.5)
                .translation(vector![x as f32, y as f32])
                .build();
            colliders.insert(wall);
            wall_count += 1;
        }

        let mut params = IntegrationParameters::default();
        params.dt = SIM_DT;
        params.num_solver_iterations = NonZeroUsize::new(8).unwrap_or(NonZeroUsize::MIN);
        params.num_internal_stabilization_iterations = 3;

        log::debug!("Maze physics: {} wall colliders", wall_count);

        Self {
            pipeline: PhysicsPipeline::new(),
            params,
            islands: IslandManager::new(),
            broad_phase: DefaultBroadPhase::new(),
            narrow_phase: NarrowPhase::new(),
            bodies,
            colliders,
            impulse_joints: ImpulseJointSet::new(),
            multibody_joints: MultibodyJointSet::new(),
            ccd: CCDSolver::new(),
            query_pipeline: QueryPipeline::new(),
            ball,
            wall_count,
        }
    }

    pub fn wall_count(&self) -> usize {
        self.wall_count
    }

    /// Damp, push along `axis`, then advance one fixed step
    pub fn step(&mut self, axis: Vec2) {
        if let Some(body) = self.bodies.get_mut(self.ball) {
            let damped = *body.linvel() * VELOCITY_DAMPING;
            body.set_linvel(damped, true);
            let impulse = axis * body.mass() * IMPULSE_PER_MASS;
            if impulse != Vec2::ZERO {
                body.apply_impulse(vector![impulse.x, impulse.y], true);
            }
        }

        self.pipeline.step(
            &vector![0.0, 0.0],
            &self.params,
            &mut self.islands,
            &mut self.broad_phase,
            &mut self.narrow_phase,
            &mut self.bodies,
            &mut self.colliders,
            &mut self.impulse_joints,
            &mut self.multibody_joints,
            &mut self.ccd,
            Some(&mut self.query_pipeline),
            &(),
            &(),
        );
    }

    pub fn ball_position(&self) -> Vec2 {
        self.bodies
            .get(self.ball)
            .map(|body| {
                let t = body.translation();
                Vec2::new(t.x, t.y)
            })
            .unwrap_or(BALL_START)
    }

    pub fn ball_velocity(&self) -> Vec2 {
        self.bodies
            .get(self.ball)
            .map(|body| {
                let v = body.linvel();
                Vec2::new(v.x, v.y)
            })
            .unwrap_or(Vec2::ZERO)
    }

    /// Move the ball and stop it
    pub fn teleport_ball(&mut self, to: Vec2) {
        if let Some(body) = self.bodies.get_mut(self.ball) {
            body.set_translation(vector![to.x, to.y], true);
            body.set_linvel(vector![0.0, 0.0], true);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn physics(dim: usize) -> (MazeGrid, MazePhysics) {
        let mut rng = Pcg32::seed_from_u64(11);
        let mut grid = MazeGrid::generate(dim, &mut rng).unwrap();
        grid.open_exit();
        let physics = MazePhysics::new(&grid);
        (grid, physics)
    }

    #[test]
    fn test_one_collider_per_wall() {
        let (grid, physics) = physics(11);
        assert_eq!(physics.wall_count(), grid.walls().count());
        assert_eq!(physics.ball_position(), BALL_START);
    }

    #[test]
    fn test_ball_rests_without_input() {
        let (_, mut physics) = physics(11);
        for _ in 0..60 {
            physics.step(Vec2::ZERO);
        }
        assert!((physics.ball_position() - BALL_START).length() < 1e-3);
    }

    #[test]
    fn test_impulse_moves_ball_and_damping_slows_it() {
        let (grid, mut physics) = physics(11);
        // Find an open direction out of the start cell
        let axis = if !grid.is_wall(2, 1) { Vec2::X } else { Vec2::Y };
        physics.step(axis);
        let v0 = physics.ball_velocity().length();
        assert!(v0 > 0.0);
        for _ in 0..5 {
            physics.step(Vec2::ZERO);
        }
        assert!(physics.ball_velocity().length() < v0);
        assert!(physics.ball_position().dot(axis) > BALL_START.dot(axis));
    }

    #[test]
    fn test_walls_stop_the_ball() {
        let (_, mut physics) = physics(11);
        // The border wall at x = 0 is directly west of the start
        for _ in 0..120 {
            physics.step(Vec2::new(-1.0, 0.0));
        }
        assert!(physics.ball_position().x > 0.5);
    }

    #[test]
    fn test_teleport() {
        let (_, mut physics) = physics(11);
        physics.teleport_ball(Vec2::new(3.0, 5.0));
        assert_eq!(physics.ball_position(), Vec2::new(3.0, 5.0));
        assert_eq!(physics.ball_velocity(), Vec2::ZERO);
    }
}
