//! Player input shared by the games
//!
//! Key codes, discrete direction presses, touch-hold re-triggering and the
//! mappings from detector output (face boxes, hand landmarks) to game input.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// DOM `keyCode` values the games react to
pub mod keys {
    /// Shift, Control and Alt are 16..=18; anything above resumes a paused run
    pub const MODIFIER_MAX: u32 = 18;
    pub const ARROW_LEFT: u32 = 37;
    pub const ARROW_UP: u32 = 38;
    pub const ARROW_RIGHT: u32 = 39;
    pub const ARROW_DOWN: u32 = 40;
    pub const A: u32 = 65;
    pub const D: u32 = 68;
    pub const F: u32 = 70;
    pub const P: u32 = 80;
    pub const R: u32 = 82;
    pub const S: u32 = 83;
}

/// A discrete directional press
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    Left,
    Right,
    Up,
    Down,
}

impl Direction {
    /// Unit axis in maze/plane coordinates (+y is up)
    pub fn axis(self) -> Vec2 {
        match self {
            Direction::Left => Vec2::new(-1.0, 0.0),
            Direction::Right => Vec2::new(1.0, 0.0),
            Direction::Up => Vec2::new(0.0, 1.0),
            Direction::Down => Vec2::new(0.0, -1.0),
        }
    }

    pub fn from_key(code: u32) -> Option<Self> {
        match code {
            keys::ARROW_LEFT => Some(Direction::Left),
            keys::ARROW_RIGHT => Some(Direction::Right),
            keys::ARROW_UP => Some(Direction::Up),
            keys::ARROW_DOWN => Some(Direction::Down),
            _ => None,
        }
    }

    pub fn key_code(self) -> u32 {
        match self {
            Direction::Left => keys::ARROW_LEFT,
            Direction::Right => keys::ARROW_RIGHT,
            Direction::Up => keys::ARROW_UP,
            Direction::Down => keys::ARROW_DOWN,
        }
    }
}

/// Re-fires a held touch button every `interval` ticks
///
/// Buttons act as discrete presses, so holding a finger down has to be
/// turned back into a stream of clicks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TouchRepeat {
    interval: u32,
    held: Option<Direction>,
}

impl TouchRepeat {
    pub fn new(interval: u32) -> Self {
        Self {
            interval: interval.max(1),
            held: None,
        }
    }

    pub fn touch_start(&mut self, direction: Direction) {
        self.held = Some(direction);
    }

    pub fn touch_end(&mut self) {
        self.held = None;
    }

    pub fn held(&self) -> Option<Direction> {
        self.held
    }

    /// The press to replay on tick `tick`, if any
    pub fn poll(&self, tick: u64) -> Option<Direction> {
        self.held
            .filter(|_| tick % u64::from(self.interval) == 0)
    }
}

/// Side length of the square drawn around a detected face, in pixels
pub const FACE_BOX_SIZE: f32 = 100.0;
/// Share of the face box (percent) a zone must cover to count
pub const FACE_ZONE_THRESHOLD: f32 = 60.0;

/// Horizontal third of the (mirrored) camera view holding the face
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FaceZone {
    Left,
    Center,
    Right,
}

impl FaceZone {
    /// Classify a face centred at `center_x` in a camera frame `width` wide
    ///
    /// The view is shown mirrored, so zones are measured in display space.
    /// Returns `None` when no third covers enough of the face box.
    pub fn classify(center_x: f32, width: f32) -> Option<Self> {
        let display_x = width - center_x;
        let start = display_x - FACE_BOX_SIZE / 2.0;
        let end = start + FACE_BOX_SIZE;
        let third = width / 3.0;

        let coverage = |zone_start: f32, zone_end: f32| {
            let overlap = (end.min(zone_end) - start.max(zone_start)).max(0.0);
            overlap / FACE_BOX_SIZE * 100.0
        };

        if coverage(0.0, third) >= FACE_ZONE_THRESHOLD {
            Some(FaceZone::Left)
        } else if coverage(2.0 * third, width) >= FACE_ZONE_THRESHOLD {
            Some(FaceZone::Right)
        } else if coverage(third, 2.0 * third) >= FACE_ZONE_THRESHOLD {
            Some(FaceZone::Center)
        } else {
            None
        }
    }

    /// Steering press for this zone
    pub fn direction(self) -> Option<Direction> {
        match self {
            FaceZone::Left => Some(Direction::Left),
            FaceZone::Right => Some(Direction::Right),
            FaceZone::Center => None,
        }
    }
}

/// Half extent of the plane hand positions are mapped onto
pub const HAND_PLANE_SCALE: f32 = 20.0;

/// Map a normalised wrist landmark to the rings play plane
///
/// Landmarks are in [0, 1] image space with y down; the camera image is
/// mirrored so x flips.
pub fn hand_to_plane(wrist: Vec2) -> Vec2 {
    Vec2::new(
        -(wrist.x - 0.5) * HAND_PLANE_SCALE,
        (0.5 - wrist.y) * HAND_PLANE_SCALE,
    )
}
