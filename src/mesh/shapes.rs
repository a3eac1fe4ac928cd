//! Shape generation for 3D primitives

use glam::{Mat4, Vec3};
use std::f32::consts::TAU;

use super::vertex::{Vertex, rgb_hex};

/// Indexed triangle mesh
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Mesh {
    pub vertices: Vec<Vertex>,
    pub indices: Vec<u32>,
}

impl Mesh {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Append another mesh, rebasing its indices
    pub fn append(&mut self, other: &Mesh) {
        let base = self.vertices.len() as u32;
        self.vertices.extend_from_slice(&other.vertices);
        self.indices.extend(other.indices.iter().map(|i| i + base));
    }

    /// Merge many meshes into a single buffer
    pub fn merge<'a>(meshes: impl IntoIterator<Item = &'a Mesh>) -> Mesh {
        let mut merged = Mesh::new();
        for mesh in meshes {
            merged.append(mesh);
        }
        merged
    }

    /// Copy with every vertex moved by `transform`
    pub fn transformed(&self, transform: Mat4) -> Mesh {
        let mut placed = self.clone();
        for v in &mut placed.vertices {
            v.position = transform.transform_point3(Vec3::from_array(v.position)).to_array();
        }
        placed
    }

    /// Raw bytes of the vertex buffer
    pub fn vertex_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.vertices)
    }
}

/// Box of size (dx, dy, dz) centred on `center`
pub fn create_box(size: Vec3, color: u32, center: Vec3) -> Mesh {
    let half = size * 0.5;
    let rgba = rgb_hex(color);
    let mut mesh = Mesh::new();

    for i in 0..8u32 {
        let sx = if i & 1 == 0 { -1.0 } else { 1.0 };
        let sy = if i & 2 == 0 { -1.0 } else { 1.0 };
        let sz = if i & 4 == 0 { -1.0 } else { 1.0 };
        let p = center + Vec3::new(sx, sy, sz) * half;
        mesh.vertices.push(Vertex::new(p.x, p.y, p.z, rgba));
    }

    // Two triangles per face, counter-clockwise seen from outside
    const FACES: [[u32; 4]; 6] = [
        [0, 2, 3, 1], // -z
        [4, 5, 7, 6], // +z
        [0, 1, 5, 4], // -y
        [2, 6, 7, 3], // +y
        [0, 4, 6, 2], // -x
        [1, 3, 7, 5], // +x
    ];
    for [a, b, c, d] in FACES {
        mesh.indices.extend_from_slice(&[a, b, c, a, c, d]);
    }
    mesh
}

/// Possibly tapered cylinder along +y, centred on `center`
///
/// A top radius of 1 with a wide bottom gives the cone layers of a tree.
pub fn create_cylinder(
    radius_top: f32,
    radius_bottom: f32,
    height: f32,
    radial_segments: u32,
    color: u32,
    center: Vec3,
) -> Mesh {
    let segments = radial_segments.max(3);
    let rgba = rgb_hex(color);
    let half = height / 2.0;
    let mut mesh = Mesh::new();

    for ring in [(radius_top, half), (radius_bottom, -half)] {
        let (radius, y) = ring;
        for s in 0..segments {
            let theta = s as f32 / segments as f32 * TAU;
            let p = center + Vec3::new(radius * theta.cos(), y, radius * theta.sin());
            mesh.vertices.push(Vertex::new(p.x, p.y, p.z, rgba));
        }
    }
    let top_center = segments * 2;
    let bottom_center = top_center + 1;
    for c in [center + Vec3::Y * half, center - Vec3::Y * half] {
        mesh.vertices.push(Vertex::new(c.x, c.y, c.z, rgba));
    }

    for s in 0..segments {
        let next = (s + 1) % segments;
        let (t0, t1) = (s, next);
        let (b0, b1) = (s + segments, next + segments);
        mesh.indices.extend_from_slice(&[t0, b0, b1, t0, b1, t1]);
        mesh.indices.extend_from_slice(&[top_center, t1, t0]);
        mesh.indices.extend_from_slice(&[bottom_center, b0, b1]);
    }
    mesh
}

/// Regular icosahedron of circumradius `radius` centred on `center`
pub fn create_icosahedron(radius: f32, color: u32, center: Vec3) -> Mesh {
    let t = (1.0 + 5.0f32.sqrt()) / 2.0;
    let raw = [
        (-1.0, t, 0.0),
        (1.0, t, 0.0),
        (-1.0, -t, 0.0),
        (1.0, -t, 0.0),
        (0.0, -1.0, t),
        (0.0, 1.0, t),
        (0.0, -1.0, -t),
        (0.0, 1.0, -t),
        (t, 0.0, -1.0),
        (t, 0.0, 1.0),
        (-t, 0.0, -1.0),
        (-t, 0.0, 1.0),
    ];
    let rgba = rgb_hex(color);
    let mut mesh = Mesh::new();
    for (x, y, z) in raw {
        let p = center + Vec3::new(x, y, z).normalize() * radius;
        mesh.vertices.push(Vertex::new(p.x, p.y, p.z, rgba));
    }
    mesh.indices.extend_from_slice(&[
        0, 11, 5, 0, 5, 1, 0, 1, 7, 0, 7, 10, 0, 10, 11, 1, 5, 9, 5, 11, 4, 11, 10, 2, 10, 7, 6,
        7, 1, 8, 3, 9, 4, 3, 4, 2, 3, 2, 6, 3, 6, 8, 3, 8, 9, 4, 9, 5, 2, 4, 11, 6, 2, 10, 8, 6,
        7, 9, 8, 1,
    ]);
    mesh
}

/// Torus in the XY plane around `center`, facing +z
pub fn create_torus(
    radius: f32,
    tube: f32,
    radial_segments: u32,
    tubular_segments: u32,
    color: u32,
    center: Vec3,
) -> Mesh {
    let radial = radial_segments.max(3);
    let tubular = tubular_segments.max(3);
    let rgba = rgb_hex(color);
    let mut mesh = Mesh::new();

    for j in 0..radial {
        let v = j as f32 / radial as f32 * TAU;
        for i in 0..tubular {
            let u = i as f32 / tubular as f32 * TAU;
            let ring = radius + tube * v.cos();
            let p = center + Vec3::new(ring * u.cos(), ring * u.sin(), tube * v.sin());
            mesh.vertices.push(Vertex::new(p.x, p.y, p.z, rgba));
        }
    }

    for j in 0..radial {
        let j1 = (j + 1) % radial;
        for i in 0..tubular {
            let i1 = (i + 1) % tubular;
            let a = j * tubular + i;
            let b = j1 * tubular + i;
            let c = j1 * tubular + i1;
            let d = j * tubular + i1;
            mesh.indices.extend_from_slice(&[a, b, d, b, c, d]);
        }
    }
    mesh
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_box_corners() {
        let mesh = create_box(Vec3::new(2.0, 4.0, 6.0), 0xffffff, Vec3::new(10.0, 0.0, 0.0));
        assert_eq!(mesh.vertices.len(), 8);
        assert_eq!(mesh.triangle_count(), 12);
        let xs: Vec<f32> = mesh.vertices.iter().map(|v| v.position[0]).collect();
        assert!(xs.iter().all(|&x| x == 9.0 || x == 11.0));
    }

    #[test]
    fn test_cylinder_counts() {
        let mesh = create_cylinder(1.0, 500.0, 300.0, 4, 0x669900, Vec3::ZERO);
        assert_eq!(mesh.vertices.len(), 4 * 2 + 2);
        assert_eq!(mesh.triangle_count(), 4 * 4);
        assert!(mesh.indices.iter().all(|&i| (i as usize) < mesh.vertices.len()));
    }

    #[test]
    fn test_icosahedron_on_sphere() {
        let mesh = create_icosahedron(600.0, 0x1560bd, Vec3::ZERO);
        assert_eq!(mesh.vertices.len(), 12);
        assert_eq!(mesh.triangle_count(), 20);
        for v in &mesh.vertices {
            let r = Vec3::from_array(v.position).length();
            assert!((r - 600.0).abs() < 0.01);
        }
    }

    #[test]
    fn test_torus_leaves_an_opening() {
        let mesh = create_torus(2.0, 0.5, 16, 100, 0xffff00, Vec3::ZERO);
        assert_eq!(mesh.vertices.len(), 16 * 100);
        assert_eq!(mesh.triangle_count(), 2 * 16 * 100);
        assert!(mesh.indices.iter().all(|&i| (i as usize) < mesh.vertices.len()));
        for v in &mesh.vertices {
            let r = Vec3::from_array(v.position).truncate().length();
            assert!(r >= 1.5 - 1e-4 && r <= 2.5 + 1e-4);
        }
    }

    #[test]
    fn test_transformed_moves_vertices() {
        let mesh = create_box(Vec3::ONE, 0, Vec3::ZERO);
        let moved = mesh.transformed(Mat4::from_translation(Vec3::new(0.0, 0.0, -10.0)));
        assert_eq!(moved.indices, mesh.indices);
        assert!(moved.vertices.iter().all(|v| v.position[2] == -10.5 || v.position[2] == -9.5));
    }

    #[test]
    fn test_merge_rebases_indices() {
        let a = create_box(Vec3::ONE, 0, Vec3::ZERO);
        let b = create_box(Vec3::ONE, 0, Vec3::X * 3.0);
        let merged = Mesh::merge([&a, &b]);
        assert_eq!(merged.vertices.len(), 16);
        assert_eq!(merged.indices.iter().copied().max(), Some(15));
        assert_eq!(merged.vertex_bytes().len(), 16 * Vertex::stride());
    }
}
