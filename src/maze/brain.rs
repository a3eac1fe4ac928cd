//! Maze level progression
//!
//! Each tick runs exactly one state of
//! `Initialize -> FadeIn -> Play -> FadeOut -> Initialize`. Every new level
//! grows the maze by two cells per side.

use glam::{Quat, Vec2, Vec3};
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::generate::MazeGrid;
use super::physics::{BALL_RADIUS, BALL_START, MazePhysics};
use crate::error::ArcadeError;
use crate::input::{Direction, FaceZone, TouchRepeat, keys};
use crate::mesh::Mesh;
use crate::sim::events::{GameEvent, Output};

/// Dimension of the first level
pub const START_DIMENSION: usize = 11;
/// Camera height above the maze floor
pub const CAMERA_HEIGHT: f32 = 5.0;
/// Fraction of the remaining distance the camera covers per tick
pub const CAMERA_EASE: f32 = 0.1;
/// Light sits this far below the camera
pub const LIGHT_BELOW_CAMERA: f32 = 3.7;
/// Fraction of the remaining intensity gap closed per tick
pub const LIGHT_EASE: f32 = 0.1;
pub const FADE_IN_SNAP: f32 = 0.05;
pub const FADE_OUT_SNAP: f32 = 0.1;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MazeState {
    Initialize,
    FadeIn,
    Play,
    FadeOut,
}

impl MazeState {
    /// Whether `next` may directly follow `self`
    pub fn can_follow(self, next: MazeState) -> bool {
        use MazeState::*;
        matches!(
            (self, next),
            (Initialize, FadeIn)
                | (FadeIn, FadeIn)
                | (FadeIn, Play)
                | (Play, Play)
                | (Play, FadeOut)
                | (FadeOut, FadeOut)
                | (FadeOut, Initialize)
        )
    }
}

/// Everything a renderer needs to draw the maze this frame
#[derive(Debug, Clone, PartialEq)]
pub struct MazeView {
    pub ball_position: Vec3,
    pub ball_rotation: Quat,
    pub camera: Vec3,
    pub light: Vec3,
    pub light_intensity: f32,
}

impl MazeView {
    fn reset() -> Self {
        Self {
            ball_position: BALL_START.extend(BALL_RADIUS),
            ball_rotation: Quat::IDENTITY,
            camera: BALL_START.extend(CAMERA_HEIGHT),
            light: BALL_START.extend(CAMERA_HEIGHT - LIGHT_BELOW_CAMERA),
            light_intensity: 0.0,
        }
    }

    /// Follow the ball: roll it by the distance travelled, ease the camera
    fn follow(&mut self, ball: Vec2) {
        let step = ball - self.ball_position.truncate();
        self.ball_position.x += step.x;
        self.ball_position.y += step.y;

        let roll_y = Quat::from_axis_angle(Vec3::Y, step.x / BALL_RADIUS);
        let roll_x = Quat::from_axis_angle(Vec3::X, -step.y / BALL_RADIUS);
        self.ball_rotation = (roll_x * roll_y * self.ball_rotation).normalize();

        self.camera.x += (self.ball_position.x - self.camera.x) * CAMERA_EASE;
        self.camera.y += (self.ball_position.y - self.camera.y) * CAMERA_EASE;
        self.camera.z += (CAMERA_HEIGHT - self.camera.z) * CAMERA_EASE;
        self.light = self.camera - Vec3::Z * LIGHT_BELOW_CAMERA;
    }
}

/// Per-level world: the grid, its physics and the merged wall mesh
#[derive(Debug)]
struct Level {
    grid: MazeGrid,
    physics: MazePhysics,
    wall_mesh: Mesh,
}

#[derive(Debug)]
pub struct MazeBrain {
    rng: Pcg32,
    state: MazeState,
    dimension: usize,
    level: Option<Level>,
    /// Pending push, consumed by the next physics step
    key_axis: Vec2,
    view: MazeView,
    touch: TouchRepeat,
    face_control: bool,
    ticks: u64,
    events: Vec<GameEvent>,
}

/// Level number shown for a maze of `dimension` cells
pub fn level_number(dimension: usize) -> usize {
    ((dimension - 1) / 2).saturating_sub(4)
}

impl MazeBrain {
    pub fn new(seed: u64, touch_repeat_ticks: u32) -> Self {
        Self {
            rng: Pcg32::seed_from_u64(seed),
            state: MazeState::Initialize,
            dimension: START_DIMENSION,
            level: None,
            key_axis: Vec2::ZERO,
            view: MazeView::reset(),
            touch: TouchRepeat::new(touch_repeat_ticks),
            face_control: false,
            ticks: 0,
            events: Vec::new(),
        }
    }

    /// Start from a custom maze size instead of level 1
    pub fn with_dimension(seed: u64, touch_repeat_ticks: u32, dimension: usize) -> Result<Self, ArcadeError> {
        MazeGrid::solid(dimension)?;
        let mut brain = Self::new(seed, touch_repeat_ticks);
        brain.dimension = dimension;
        Ok(brain)
    }

    pub fn state(&self) -> MazeState {
        self.state
    }

    /// Dimension of the maze being played, or of the next one after a win
    pub fn dimension(&self) -> usize {
        self.dimension
    }

    pub fn view(&self) -> &MazeView {
        &self.view
    }

    pub fn grid(&self) -> Option<&MazeGrid> {
        self.level.as_ref().map(|l| &l.grid)
    }

    pub fn wall_mesh(&self) -> Option<&Mesh> {
        self.level.as_ref().map(|l| &l.wall_mesh)
    }

    pub fn physics_mut(&mut self) -> Option<&mut MazePhysics> {
        self.level.as_mut().map(|l| &mut l.physics)
    }

    pub fn face_control(&self) -> bool {
        self.face_control
    }

    pub fn toggle_face_control(&mut self) -> bool {
        self.face_control = !self.face_control;
        log::info!("Maze face control {}", if self.face_control { "on" } else { "off" });
        self.face_control
    }

    /// A discrete push: replaces any push not yet consumed
    pub fn press(&mut self, direction: Direction) {
        self.key_axis = direction.axis();
    }

    pub fn touch_start(&mut self, direction: Direction) {
        self.touch.touch_start(direction);
    }

    pub fn touch_end(&mut self) {
        self.touch.touch_end();
    }

    pub fn key(&mut self, code: u32) {
        if let Some(direction) = Direction::from_key(code) {
            self.press(direction);
        } else if code == keys::F {
            self.toggle_face_control();
        }
    }

    /// Steer from a detected face, when face control is on
    pub fn face_detected(&mut self, center_x: f32, frame_width: f32) {
        if !self.face_control {
            return;
        }
        if let Some(direction) = FaceZone::classify(center_x, frame_width).and_then(FaceZone::direction) {
            self.press(direction);
        }
    }

    /// Run one state of the level loop
    pub fn tick(&mut self) {
        match self.state {
            MazeState::Initialize => self.initialize(),
            MazeState::FadeIn => {
                self.ease_light(1.0);
                if (self.view.light_intensity - 1.0).abs() < FADE_IN_SNAP {
                    self.view.light_intensity = 1.0;
                    self.state = MazeState::Play;
                }
            }
            MazeState::Play => {
                self.step_physics();
                let ball = self.view.ball_position;
                let cell_x = (ball.x + 0.5).floor() as i64;
                let cell_y = (ball.y + 0.5).floor() as i64;
                if cell_x == self.dimension as i64 && cell_y == self.dimension as i64 - 2 {
                    log::info!("Maze {} solved", self.dimension);
                    self.dimension += 2;
                    self.state = MazeState::FadeOut;
                }
            }
            MazeState::FadeOut => {
                self.step_physics();
                self.ease_light(0.0);
                if self.view.light_intensity.abs() < FADE_OUT_SNAP {
                    self.view.light_intensity = 0.0;
                    self.state = MazeState::Initialize;
                }
            }
        }

        self.ticks += 1;
        if let Some(direction) = self.touch.poll(self.ticks) {
            self.press(direction);
        }
    }

    fn initialize(&mut self) {
        let mut grid = match MazeGrid::generate(self.dimension, &mut self.rng) {
            Ok(grid) => grid,
            Err(e) => {
                log::error!("Cannot build maze: {}", e);
                return;
            }
        };
        grid.open_exit();
        let physics = MazePhysics::new(&grid);
        let wall_mesh = grid.wall_mesh();
        self.level = Some(Level {
            grid,
            physics,
            wall_mesh,
        });
        self.view = MazeView::reset();
        self.key_axis = Vec2::ZERO;

        let level = level_number(self.dimension);
        log::info!("Maze level {} ({}x{})", level, self.dimension, self.dimension);
        self.events
            .push(GameEvent::Output(Output::message(format!("Level {}", level))));
        self.state = MazeState::FadeIn;
    }

    fn step_physics(&mut self) {
        let axis = std::mem::take(&mut self.key_axis);
        if let Some(level) = self.level.as_mut() {
            level.physics.step(axis);
            let ball = level.physics.ball_position();
            self.view.follow(ball);
        }
    }

    fn ease_light(&mut self, target: f32) {
        self.view.light_intensity += LIGHT_EASE * (target - self.view.light_intensity);
    }

    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn run_until(brain: &mut MazeBrain, state: MazeState, max_ticks: usize) {
        for _ in 0..max_ticks {
            if brain.state() == state {
                return;
            }
            brain.tick();
        }
        panic!("never reached {:?}", state);
    }

    #[test]
    fn test_initialize_goes_to_fade_in() {
        let mut brain = MazeBrain::new(1, 10);
        assert_eq!(brain.state(), MazeState::Initialize);
        brain.tick();
        assert_eq!(brain.state(), MazeState::FadeIn);
        assert_eq!(brain.view().light_intensity, 0.0);
        assert_eq!(brain.grid().map(|g| g.dimension()), Some(11));

        let events = brain.drain_events();
        assert_eq!(events, vec![GameEvent::Output(Output::message("Level 1"))]);
    }

    #[test]
    fn test_fade_in_snaps_to_full_light() {
        let mut brain = MazeBrain::new(1, 10);
        brain.tick();
        run_until(&mut brain, MazeState::Play, 100);
        assert_eq!(brain.view().light_intensity, 1.0);
    }

    #[test]
    fn test_reaching_exit_advances_level() {
        let mut brain = MazeBrain::new(2, 10);
        run_until(&mut brain, MazeState::Play, 100);
        brain.drain_events();

        let dim = brain.dimension();
        if let Some(physics) = brain.physics_mut() {
            physics.teleport_ball(Vec2::new(dim as f32, dim as f32 - 2.0));
        }
        brain.tick();
        assert_eq!(brain.state(), MazeState::FadeOut);
        assert_eq!(brain.dimension(), dim + 2);

        run_until(&mut brain, MazeState::Initialize, 100);
        assert_eq!(brain.view().light_intensity, 0.0);
        brain.tick();
        assert_eq!(brain.state(), MazeState::FadeIn);
        assert_eq!(brain.grid().map(|g| g.dimension()), Some(dim + 2));
        assert_eq!(
            brain.drain_events(),
            vec![GameEvent::Output(Output::message("Level 2"))]
        );
    }

    #[test]
    fn test_press_is_consumed_once() {
        let mut brain = MazeBrain::new(3, 10);
        run_until(&mut brain, MazeState::Play, 100);
        let open_east = brain.grid().map(|g| !g.is_wall(2, 1)).unwrap_or(false);
        brain.press(if open_east { Direction::Right } else { Direction::Up });
        brain.tick();
        assert_eq!(brain.key_axis, Vec2::ZERO);
        assert_ne!(brain.view().ball_position, BALL_START.extend(BALL_RADIUS));
    }

    #[test]
    fn test_camera_eases_toward_ball() {
        let mut view = MazeView::reset();
        view.follow(Vec2::new(3.0, 1.0));
        assert_eq!(view.ball_position.x, 3.0);
        assert!((view.camera.x - 1.2).abs() < 1e-5);
        assert!((view.light.z - (view.camera.z - LIGHT_BELOW_CAMERA)).abs() < 1e-5);
        assert!(view.ball_rotation.is_normalized());
    }

    #[test]
    fn test_touch_hold_repeats_press() {
        let mut brain = MazeBrain::new(4, 5);
        brain.touch_start(Direction::Left);
        for _ in 0..4 {
            brain.tick();
        }
        assert_eq!(brain.key_axis, Vec2::ZERO);
        brain.tick();
        assert_eq!(brain.key_axis, Direction::Left.axis());
        brain.touch_end();
    }

    #[test]
    fn test_face_steering_needs_toggle() {
        let mut brain = MazeBrain::new(5, 10);
        brain.face_detected(550.0, 600.0);
        assert_eq!(brain.key_axis, Vec2::ZERO);
        brain.key(keys::F);
        assert!(brain.face_control());
        brain.face_detected(550.0, 600.0);
        assert_eq!(brain.key_axis, Direction::Left.axis());
    }

    #[test]
    fn test_custom_dimension_is_validated() {
        assert!(MazeBrain::with_dimension(0, 10, 8).is_err());
        let brain = MazeBrain::with_dimension(0, 10, 15).unwrap();
        assert_eq!(brain.dimension(), 15);
        assert_eq!(level_number(15), 3);
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(16))]

        #[test]
        fn prop_states_never_skip(seed in 0u64..1000, presses in proptest::collection::vec(0u8..5, 0..300)) {
            let mut brain = MazeBrain::new(seed, 10);
            let mut previous = brain.state();
            for p in presses {
                match p {
                    0 => brain.press(Direction::Left),
                    1 => brain.press(Direction::Right),
                    2 => brain.press(Direction::Up),
                    3 => brain.press(Direction::Down),
                    _ => {}
                }
                brain.tick();
                let next = brain.state();
                prop_assert!(previous.can_follow(next), "{:?} -> {:?}", previous, next);
                previous = next;
            }
        }
    }
}
