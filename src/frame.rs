//! Per-frame scene snapshot for the host page
//!
//! The page owns the canvas. After each `advance` it asks for the current
//! frame: world-space geometry packed into one vertex/index buffer plus the
//! camera, light and fog it should draw with.

use glam::{Mat4, Vec3};

use crate::maze::MazeBrain;
use crate::maze::physics::BALL_RADIUS;
use crate::mesh::{Mesh, create_icosahedron, create_torus, palette};
use crate::rings::{CAMERA_Z, RingsGame};
use crate::sim::state::RunnerState;

/// Fixed runner camera, behind and above the character
pub const RUNNER_CAMERA: Vec3 = Vec3::new(0.0, 1500.0, -2000.0);
/// Ring size (centre-line radius, tube radius)
pub const TORUS_RADIUS: f32 = 2.0;
pub const TORUS_TUBE: f32 = 0.5;
pub const PLAYER_RADIUS: f32 = 1.5;

/// Number of floats in [`SceneFrame::view_params`]
pub const VIEW_PARAMS_LEN: usize = 11;

/// Geometry and view for one drawn frame
#[derive(Debug, Clone, PartialEq)]
pub struct SceneFrame {
    /// Every visible object, already in world space
    pub mesh: Mesh,
    pub camera: Vec3,
    /// Point the camera looks at
    pub target: Vec3,
    /// Point light position, if the scene is lit by one
    pub light: Option<Vec3>,
    pub light_intensity: f32,
    /// Far fog distance, if the scene is fogged
    pub fog_distance: Option<f32>,
}

impl SceneFrame {
    /// Flat view parameters for the page
    ///
    /// Layout: camera xyz, target xyz, light xyz (camera when unlit),
    /// light intensity, fog distance (0 when unfogged).
    pub fn view_params(&self) -> [f32; VIEW_PARAMS_LEN] {
        let light = self.light.unwrap_or(self.camera);
        [
            self.camera.x,
            self.camera.y,
            self.camera.z,
            self.target.x,
            self.target.y,
            self.target.z,
            light.x,
            light.y,
            light.z,
            self.light_intensity,
            self.fog_distance.unwrap_or(0.0),
        ]
    }
}

/// Track, obstacles and the character, seen from the chase camera
pub fn runner_frame(state: &RunnerState) -> SceneFrame {
    let mut mesh = Mesh::new();
    for ground in &state.grounds {
        mesh.append(&ground.world_mesh());
    }
    for obstacle in &state.obstacles {
        mesh.append(&obstacle.world_mesh());
    }
    mesh.append(&state.character.mesh());

    let character = &state.character;
    SceneFrame {
        mesh,
        camera: RUNNER_CAMERA,
        target: character.graph.world_position(character.rig.root),
        light: None,
        light_intensity: 1.0,
        fog_distance: Some(state.fog_distance),
    }
}

/// Maze walls and the rolling ball under the follow camera
pub fn maze_frame(brain: &MazeBrain) -> SceneFrame {
    let view = brain.view();
    let mut mesh = brain.wall_mesh().cloned().unwrap_or_default();
    let ball = create_icosahedron(BALL_RADIUS, palette::IRON, Vec3::ZERO)
        .transformed(Mat4::from_rotation_translation(view.ball_rotation, view.ball_position));
    mesh.append(&ball);

    SceneFrame {
        mesh,
        camera: view.camera,
        target: view.ball_position,
        light: Some(view.light),
        light_intensity: view.light_intensity,
        fog_distance: None,
    }
}

/// The incoming ring and the player's ball
pub fn rings_frame(game: &RingsGame) -> SceneFrame {
    let mut mesh = create_torus(TORUS_RADIUS, TORUS_TUBE, 16, 100, palette::LIME, game.torus);
    mesh.append(&create_icosahedron(PLAYER_RADIUS, palette::ROYAL, game.player));

    SceneFrame {
        mesh,
        camera: Vec3::new(0.0, 0.0, CAMERA_Z),
        target: game.player,
        light: None,
        light_intensity: 1.0,
        fog_distance: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::state::Modes;

    #[test]
    fn test_runner_frame_holds_every_actor() {
        let state = RunnerState::new(4, Modes::default());
        let frame = runner_frame(&state);
        let expected: usize = state.grounds.iter().map(|g| g.world_mesh().vertices.len()).sum::<usize>()
            + state.obstacles.iter().map(|o| o.world_mesh().vertices.len()).sum::<usize>()
            + state.character.mesh().vertices.len();
        assert_eq!(frame.mesh.vertices.len(), expected);
        assert!(frame.mesh.indices.iter().all(|&i| (i as usize) < frame.mesh.vertices.len()));
        assert_eq!(frame.target, state.character.position());
        assert_eq!(frame.fog_distance, Some(state.fog_distance));
    }

    #[test]
    fn test_maze_frame_follows_view() {
        let mut brain = MazeBrain::new(3, 10);
        brain.tick();
        let frame = maze_frame(&brain);
        let walls = brain.wall_mesh().map(|m| m.vertices.len()).unwrap_or(0);
        assert!(walls > 0);
        assert_eq!(frame.mesh.vertices.len(), walls + 12);
        assert_eq!(frame.camera, brain.view().camera);
        assert_eq!(frame.light, Some(brain.view().light));
        // Ball vertices sit on a sphere around the ball position
        for v in &frame.mesh.vertices[walls..] {
            let r = (Vec3::from_array(v.position) - brain.view().ball_position).length();
            assert!((r - BALL_RADIUS).abs() < 1e-4);
        }
    }

    #[test]
    fn test_rings_frame_and_view_params() {
        let mut game = RingsGame::new(2);
        game.torus = Vec3::new(1.0, -1.0, -30.0);
        let frame = rings_frame(&game);
        let torus_vertices = 16 * 100;
        let ring_center: Vec3 = frame.mesh.vertices[..torus_vertices]
            .iter()
            .map(|v| Vec3::from_array(v.position))
            .sum::<Vec3>()
            / torus_vertices as f32;
        assert!((ring_center - game.torus).length() < 1e-2);

        let params = frame.view_params();
        assert_eq!(params[..3], [0.0, 0.0, CAMERA_Z]);
        assert_eq!(params[3..6], game.player.to_array());
        // Unlit scenes report the camera as the light
        assert_eq!(params[6..9], params[..3]);
        assert_eq!(params[10], 0.0);
    }
}
