use bytemuck::{Pod, Zeroable};
use glam::Vec3;

/// Number of vertices in the cube mesh (6 faces x 2 triangles x 3).
pub const CUBE_VERTEX_COUNT: u32 = 36;

#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
pub struct Vertex {
    pub position: [f32; 3],
    pub uv: [f32; 2],
    pub normal: [f32; 3],
}

/// Face normal plus the in-plane U and V axes, with `u x v == normal`.
const FACES: [(Vec3, Vec3, Vec3); 6] = [
    (Vec3::X, Vec3::NEG_Z, Vec3::Y),
    (Vec3::NEG_X, Vec3::Z, Vec3::Y),
    (Vec3::Y, Vec3::X, Vec3::NEG_Z),
    (Vec3::NEG_Y, Vec3::X, Vec3::Z),
    (Vec3::Z, Vec3::X, Vec3::Y),
    (Vec3::NEG_Z, Vec3::NEG_X, Vec3::Y),
];

/// Non-indexed cube centred on the origin, counter-clockwise outward faces.
///
/// `uv_scale` shrinks the sampled texture region; 1.0 maps the whole image to
/// every face.
pub fn cube_vertices(half_extent: f32, uv_scale: f32) -> Vec<Vertex> {
    // Quad corners in (s, t), split into two triangles.
    const CORNERS: [(f32, f32); 6] = [
        (-1.0, -1.0),
        (1.0, -1.0),
        (1.0, 1.0),
        (1.0, 1.0),
        (-1.0, 1.0),
        (-1.0, -1.0),
    ];

    let mut verts = Vec::with_capacity(CUBE_VERTEX_COUNT as usize);
    for (normal, u, v) in FACES {
        for (s, t) in CORNERS {
            let p = (normal + u * s + v * t) * half_extent;
            verts.push(Vertex {
                position: p.to_array(),
                // Texture rows run top to bottom.
                uv: [(s + 1.0) * 0.5 * uv_scale, (1.0 - t) * 0.5 * uv_scale],
                normal: normal.to_array(),
            });
        }
    }
    verts
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn thirty_six_vertices() {
        assert_eq!(cube_vertices(0.5, 1.0).len(), CUBE_VERTEX_COUNT as usize);
    }

    #[test]
    fn positions_on_surface() {
        for v in cube_vertices(1.0, 1.0) {
            let p = Vec3::from_array(v.position);
            assert_eq!(p.abs().max_element(), 1.0);
            let n = Vec3::from_array(v.normal);
            assert!((n.length() - 1.0).abs() < 1e-6);
            // The vertex lies on the face its normal points out of.
            assert_eq!(p.dot(n), 1.0);
        }
    }

    #[test]
    fn triangles_wind_outward() {
        let verts = cube_vertices(0.5, 1.0);
        for tri in verts.chunks(3) {
            let a = Vec3::from_array(tri[0].position);
            let b = Vec3::from_array(tri[1].position);
            let c = Vec3::from_array(tri[2].position);
            let face = (b - a).cross(c - a).normalize();
            let n = Vec3::from_array(tri[0].normal);
            assert!((face - n).length() < 1e-5);
        }
    }

    #[test]
    fn uv_scale_limits_range() {
        for v in cube_vertices(0.5, 0.5) {
            assert!(v.uv[0] >= 0.0 && v.uv[0] <= 0.5);
            assert!(v.uv[1] >= 0.0 && v.uv[1] <= 0.5);
        }
    }
}
