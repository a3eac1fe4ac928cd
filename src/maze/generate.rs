//! Square maze generation
//!
//! Cells live on odd coordinates; even coordinates are walls that get
//! carved away as the backtracker walks. The outer ring always stays solid
//! until the exit is opened.

use glam::Vec3;
use rand::Rng;
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};

use crate::error::ArcadeError;
use crate::mesh::{Mesh, create_box, palette};

/// Smallest maze that still has a corridor to walk
pub const MIN_DIMENSION: usize = 5;

/// Square wall grid, `true` = wall, indexed `(x, y)`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MazeGrid {
    dimension: usize,
    cells: Vec<bool>,
}

impl MazeGrid {
    /// A grid with every cell walled
    pub fn solid(dimension: usize) -> Result<Self, ArcadeError> {
        if dimension < MIN_DIMENSION || dimension % 2 == 0 {
            return Err(ArcadeError::InvalidMazeDimension(dimension));
        }
        Ok(Self {
            dimension,
            cells: vec![true; dimension * dimension],
        })
    }

    /// Carve a perfect maze with a randomized depth-first backtracker from (1, 1)
    pub fn generate(dimension: usize, rng: &mut impl Rng) -> Result<Self, ArcadeError> {
        let mut grid = Self::solid(dimension)?;
        grid.set_wall(1, 1, false);

        let mut stack = vec![(1usize, 1usize)];
        while let Some(&(x, y)) = stack.last() {
            let mut options: Vec<(usize, usize)> = [(2isize, 0isize), (-2, 0), (0, 2), (0, -2)]
                .iter()
                .filter_map(|&(dx, dy)| {
                    let nx = x.checked_add_signed(dx)?;
                    let ny = y.checked_add_signed(dy)?;
                    let inside = nx > 0 && ny > 0 && nx < dimension - 1 && ny < dimension - 1;
                    (inside && grid.is_wall(nx, ny)).then_some((nx, ny))
                })
                .collect();

            if options.is_empty() {
                stack.pop();
                continue;
            }
            options.shuffle(rng);
            let (nx, ny) = options[0];
            grid.set_wall((x + nx) / 2, (y + ny) / 2, false);
            grid.set_wall(nx, ny, false);
            stack.push((nx, ny));
        }

        log::debug!("Generated {}x{} maze", dimension, dimension);
        Ok(grid)
    }

    pub fn dimension(&self) -> usize {
        self.dimension
    }

    /// Out-of-range coordinates read as open floor
    pub fn is_wall(&self, x: usize, y: usize) -> bool {
        x < self.dimension && y < self.dimension && self.cells[x * self.dimension + y]
    }

    pub fn set_wall(&mut self, x: usize, y: usize, wall: bool) {
        if x < self.dimension && y < self.dimension {
            self.cells[x * self.dimension + y] = wall;
        }
    }

    /// Exit cell on the east edge, one row below the top corner
    pub fn exit(&self) -> (usize, usize) {
        (self.dimension - 1, self.dimension - 2)
    }

    pub fn open_exit(&mut self) {
        let (x, y) = self.exit();
        self.set_wall(x, y, false);
    }

    /// Wall cell coordinates in x-major order
    pub fn walls(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        let dim = self.dimension;
        (0..dim)
            .flat_map(move |x| (0..dim).map(move |y| (x, y)))
            .filter(|&(x, y)| self.is_wall(x, y))
    }

    /// One unit cube per wall, merged into a single buffer
    pub fn wall_mesh(&self) -> Mesh {
        let cube = Vec3::ONE;
        let mut mesh = Mesh::new();
        for (x, y) in self.walls() {
            mesh.append(&create_box(
                cube,
                palette::BRICK,
                Vec3::new(x as f32, y as f32, 0.5),
            ));
        }
        mesh
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;
    use std::collections::{HashSet, VecDeque};

    fn reachable(grid: &MazeGrid, from: (usize, usize)) -> HashSet<(usize, usize)> {
        let mut seen = HashSet::from([from]);
        let mut queue = VecDeque::from([from]);
        while let Some((x, y)) = queue.pop_front() {
            for (dx, dy) in [(1isize, 0isize), (-1, 0), (0, 1), (0, -1)] {
                let (Some(nx), Some(ny)) = (x.checked_add_signed(dx), y.checked_add_signed(dy)) else {
                    continue;
                };
                if nx < grid.dimension() && ny < grid.dimension() && !grid.is_wall(nx, ny) && seen.insert((nx, ny)) {
                    queue.push_back((nx, ny));
                }
            }
        }
        seen
    }

    #[test]
    fn test_rejects_bad_dimensions() {
        let mut rng = Pcg32::seed_from_u64(0);
        assert_eq!(MazeGrid::generate(10, &mut rng), Err(ArcadeError::InvalidMazeDimension(10)));
        assert_eq!(MazeGrid::generate(3, &mut rng), Err(ArcadeError::InvalidMazeDimension(3)));
        assert!(MazeGrid::generate(5, &mut rng).is_ok());
    }

    #[test]
    fn test_every_cell_reachable_and_border_solid() {
        let mut rng = Pcg32::seed_from_u64(42);
        let grid = MazeGrid::generate(11, &mut rng).unwrap();
        let open = reachable(&grid, (1, 1));
        for x in (1..11).step_by(2) {
            for y in (1..11).step_by(2) {
                assert!(open.contains(&(x, y)), "cell ({}, {}) unreachable", x, y);
            }
        }
        for i in 0..11 {
            assert!(grid.is_wall(0, i) && grid.is_wall(10, i));
            assert!(grid.is_wall(i, 0) && grid.is_wall(i, 10));
        }
    }

    #[test]
    fn test_exit_connects_to_start() {
        let mut rng = Pcg32::seed_from_u64(7);
        let mut grid = MazeGrid::generate(13, &mut rng).unwrap();
        grid.open_exit();
        assert_eq!(grid.exit(), (12, 11));
        assert!(reachable(&grid, (1, 1)).contains(&(12, 11)));
    }

    #[test]
    fn test_same_seed_same_maze() {
        let a = MazeGrid::generate(15, &mut Pcg32::seed_from_u64(3)).unwrap();
        let b = MazeGrid::generate(15, &mut Pcg32::seed_from_u64(3)).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_wall_mesh_has_cube_per_wall() {
        let grid = MazeGrid::generate(7, &mut Pcg32::seed_from_u64(1)).unwrap();
        let walls = grid.walls().count();
        assert_eq!(grid.wall_mesh().vertices.len(), walls * 8);
        assert_eq!(grid.wall_mesh().triangle_count(), walls * 12);
    }
}
