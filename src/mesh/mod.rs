//! CPU-side scene geometry
//!
//! Builds packed vertex/index buffers for the primitives the games are made
//! of. Uploading and drawing them is left to the host page.

pub mod shapes;
pub mod vertex;

pub use shapes::{Mesh, create_box, create_cylinder, create_icosahedron, create_torus};
pub use vertex::{Vertex, rgb_hex};

/// Named scene colors (0xRRGGBB)
pub mod palette {
    pub const CHERRY: u32 = 0xe35d6a;
    pub const BLUE: u32 = 0x1560bd;
    pub const WHITE: u32 = 0xd8d0d1;
    pub const BLACK: u32 = 0x000000;
    pub const BROWN: u32 = 0x59332e;
    pub const YELLOW: u32 = 0xffff00;
    pub const OLIVE: u32 = 0x556b2f;
    pub const BROWN_DARK: u32 = 0x23190f;
    pub const GREEN: u32 = 0x669900;
    pub const BRICK: u32 = 0xb5533c;
    pub const IRON: u32 = 0x8a8d8f;
    pub const LIME: u32 = 0x00ff00;
    pub const ROYAL: u32 = 0x0000ff;
}
