//! Vertex types for scene geometry

use bytemuck::{Pod, Zeroable};

/// 3D vertex with position and color, laid out for direct upload
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct Vertex {
    pub position: [f32; 3],
    pub color: [f32; 4],
}

impl Vertex {
    pub const fn new(x: f32, y: f32, z: f32, color: [f32; 4]) -> Self {
        Self {
            position: [x, y, z],
            color,
        }
    }

    /// Stride in bytes of one vertex in a packed buffer
    pub const fn stride() -> usize {
        std::mem::size_of::<Vertex>()
    }
}

/// Convert a packed 0xRRGGBB color to normalized RGBA
pub fn rgb_hex(hex: u32) -> [f32; 4] {
    [
        ((hex >> 16) & 0xff) as f32 / 255.0,
        ((hex >> 8) & 0xff) as f32 / 255.0,
        (hex & 0xff) as f32 / 255.0,
        1.0,
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vertex_is_tightly_packed() {
        assert_eq!(Vertex::stride(), 7 * 4);
        let verts = [Vertex::new(1.0, 2.0, 3.0, [0.0; 4]); 2];
        let bytes: &[u8] = bytemuck::cast_slice(&verts);
        assert_eq!(bytes.len(), 2 * Vertex::stride());
    }

    #[test]
    fn test_rgb_hex() {
        let c = rgb_hex(0xff0000);
        assert_eq!(c, [1.0, 0.0, 0.0, 1.0]);
    }
}
