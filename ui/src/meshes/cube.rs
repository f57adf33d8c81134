use glam::Vec3;

use crate::render::renderer::vertex::Vertex;

/// Outward normal and the two in-plane axes (u, v) of each face.
/// `u x v == normal`, so corners come out counter-clockwise seen from outside.
const FACES: [(Vec3, Vec3, Vec3); 6] = [
    (Vec3::X,     Vec3::NEG_Z, Vec3::Y),
    (Vec3::NEG_X, Vec3::Z,     Vec3::Y),
    (Vec3::Y,     Vec3::X,     Vec3::NEG_Z),
    (Vec3::NEG_Y, Vec3::X,     Vec3::Z),
    (Vec3::Z,     Vec3::X,     Vec3::Y),
    (Vec3::NEG_Z, Vec3::NEG_X, Vec3::Y),
];

/// Cube with edge `size` centered on the origin.
///
/// 24 vertices (4 per face) so each face can have its own normal and UV coords.
pub fn cube(size: f32) -> (Vec<Vertex>, Vec<u32>) {
    let h = size / 2.0;
    let mut vertices = Vec::with_capacity(24);
    let mut indices = Vec::with_capacity(36);

    for (normal, u, v) in FACES {
        let base = vertices.len() as u32;
        for (du, dv) in [(-1.0, -1.0), (1.0, -1.0), (1.0, 1.0), (-1.0, 1.0)] {
            let p = (normal + u * du + v * dv) * h;
            vertices.push(Vertex {
                position: p.to_array(),
                normal: normal.to_array(),
                uv: [(du + 1.0) / 2.0, (dv + 1.0) / 2.0],
            });
        }
        // 2 triangles per face
        indices.extend_from_slice(&[base, base + 1, base + 2, base, base + 2, base + 3]);
    }

    (vertices, indices)
}
