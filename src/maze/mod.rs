//! Maze ball game
//!
//! A generated maze, a rapier world for the ball and the level loop that
//! ties them together.

pub mod brain;
pub mod generate;
pub mod physics;

pub use brain::{MazeBrain, MazeState, MazeView, START_DIMENSION, level_number};
pub use generate::MazeGrid;
pub use physics::MazePhysics;
