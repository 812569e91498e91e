//! Built-in mesh generators.
//!
//! Primitive meshes are generated on the CPU once at startup and uploaded
//! via the [`MeshStore`](super::mesh::MeshStore). All triangles use
//! counter-clockwise winding viewed from outside, matching the pipeline's
//! `FrontFace::Ccw` + backface culling, and every vertex carries an
//! outward unit normal for lighting.
//!
//! The cube needs 4 vertices per face (24 total, not 8): vertices on shared
//! edges carry a different normal per face, and sharing them would bleed
//! lighting across edges.

use super::vertex::MeshVertex;

use std::f32::consts::PI;

/// A unit cube centered at the origin (side length 1.0).
///
/// 24 vertices (4 per face) and 36 indices.
pub(crate) fn cube() -> (Vec<MeshVertex>, Vec<u32>) {
    let mut vertices = Vec::with_capacity(24);
    let mut indices = Vec::with_capacity(36);

    // (normal, tangent_u, tangent_v) per face.
    let faces: [([f32; 3], [f32; 3], [f32; 3]); 6] = [
        ([1.0, 0.0, 0.0], [0.0, 0.0, -1.0], [0.0, 1.0, 0.0]),
        ([-1.0, 0.0, 0.0], [0.0, 0.0, 1.0], [0.0, 1.0, 0.0]),
        ([0.0, 1.0, 0.0], [1.0, 0.0, 0.0], [0.0, 0.0, -1.0]),
        ([0.0, -1.0, 0.0], [1.0, 0.0, 0.0], [0.0, 0.0, 1.0]),
        ([0.0, 0.0, 1.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]),
        ([0.0, 0.0, -1.0], [-1.0, 0.0, 0.0], [0.0, 1.0, 0.0]),
    ];

    // Corners of a face in (u, v) with matching UVs.
    let corners: [([f32; 2], [f32; 2]); 4] = [
        ([-1.0, -1.0], [0.0, 1.0]),
        ([1.0, -1.0], [1.0, 1.0]),
        ([1.0, 1.0], [1.0, 0.0]),
        ([-1.0, 1.0], [0.0, 0.0]),
    ];

    for (normal, u_dir, v_dir) in &faces {
        let base = vertices.len() as u32;
        let h = 0.5_f32;

        for (corner, uv) in &corners {
            let position = [
                normal[0] * h + u_dir[0] * corner[0] * h + v_dir[0] * corner[1] * h,
                normal[1] * h + u_dir[1] * corner[0] * h + v_dir[1] * corner[1] * h,
                normal[2] * h + u_dir[2] * corner[0] * h + v_dir[2] * corner[1] * h,
            ];
            vertices.push(MeshVertex {
                position,
                normal: *normal,
                uv: *uv,
            });
        }

        indices.extend_from_slice(&[base, base + 1, base + 2, base, base + 2, base + 3]);
    }

    (vertices, indices)
}

/// A unit plane on the XZ plane (normal +Y), centered at the origin.
pub(crate) fn plane() -> (Vec<MeshVertex>, Vec<u32>) {
    let h = 0.5_f32;
    let vertices = vec![
        MeshVertex { position: [-h, 0.0, h], normal: [0.0, 1.0, 0.0], uv: [0.0, 0.0] },
        MeshVertex { position: [h, 0.0, h], normal: [0.0, 1.0, 0.0], uv: [1.0, 0.0] },
        MeshVertex { position: [h, 0.0, -h], normal: [0.0, 1.0, 0.0], uv: [1.0, 1.0] },
        MeshVertex { position: [-h, 0.0, -h], normal: [0.0, 1.0, 0.0], uv: [0.0, 1.0] },
    ];
    let indices = vec![0, 1, 2, 0, 2, 3];
    (vertices, indices)
}

/// A UV sphere centered at the origin with radius 0.5.
///
/// Equirectangular UV mapping: U wraps longitude, V runs pole to pole.
pub(crate) fn sphere(segments: u32, rings: u32) -> (Vec<MeshVertex>, Vec<u32>) {
    let radius = 0.5_f32;
    let mut vertices = Vec::with_capacity(((rings + 1) * (segments + 1)) as usize);
    let mut indices = Vec::with_capacity((rings * segments * 6) as usize);

    for ring in 0..=rings {
        let v = ring as f32 / rings as f32;
        let phi = v * PI; // 0 at the north pole, π at the south

        for seg in 0..=segments {
            let u = seg as f32 / segments as f32;
            let theta = u * 2.0 * PI;

            let x = phi.sin() * theta.cos();
            let y = phi.cos();
            let z = phi.sin() * theta.sin();

            vertices.push(MeshVertex {
                position: [x * radius, y * radius, z * radius],
                normal: [x, y, z],
                uv: [u, v],
            });
        }
    }

    for ring in 0..rings {
        for seg in 0..segments {
            let current = ring * (segments + 1) + seg;
            let next = current + segments + 1;
            indices.extend_from_slice(&[current, next, current + 1]);
            indices.extend_from_slice(&[current + 1, next, next + 1]);
        }
    }

    (vertices, indices)
}

/// A cylinder along the Y axis: radius and half-height as given, with smooth
/// side normals and fanned caps.
pub(crate) fn cylinder(radius: f32, half_height: f32, segments: u32) -> (Vec<MeshVertex>, Vec<u32>) {
    let seg = segments.max(3);
    let mut vertices = Vec::new();
    let mut indices = Vec::new();

    let tau = 2.0 * PI;

    // Side: two rings with seg+1 vertices each for the UV seam.
    for i in 0..=seg {
        let u = i as f32 / seg as f32;
        let theta = u * tau;
        let (sin, cos) = theta.sin_cos();

        vertices.push(MeshVertex {
            position: [cos * radius, half_height, sin * radius],
            normal: [cos, 0.0, sin],
            uv: [u, 0.0],
        });
        vertices.push(MeshVertex {
            position: [cos * radius, -half_height, sin * radius],
            normal: [cos, 0.0, sin],
            uv: [u, 1.0],
        });
    }

    for i in 0..seg {
        let top0 = i * 2;
        let bot0 = top0 + 1;
        let top1 = top0 + 2;
        let bot1 = top0 + 3;
        indices.extend_from_slice(&[top0, bot0, bot1, top0, bot1, top1]);
    }

    // Caps: a center vertex plus a rim, fanned.
    for &(y, ny) in &[(half_height, 1.0_f32), (-half_height, -1.0_f32)] {
        let center = vertices.len() as u32;
        vertices.push(MeshVertex {
            position: [0.0, y, 0.0],
            normal: [0.0, ny, 0.0],
            uv: [0.5, 0.5],
        });
        for i in 0..seg {
            let theta = i as f32 / seg as f32 * tau;
            let (sin, cos) = theta.sin_cos();
            vertices.push(MeshVertex {
                position: [cos * radius, y, sin * radius],
                normal: [0.0, ny, 0.0],
                uv: [0.5 + cos * 0.5, 0.5 + sin * 0.5],
            });
        }
        for i in 0..seg {
            let curr = center + 1 + i;
            let next = center + 1 + (i + 1) % seg;
            if ny > 0.0 {
                indices.extend_from_slice(&[center, curr, next]);
            } else {
                indices.extend_from_slice(&[center, next, curr]);
            }
        }
    }

    (vertices, indices)
}

/// A torus in the XZ plane: `radius` from the center to the tube's center,
/// `tube` the tube's own radius.
///
/// Parametrized by the ring angle (u, around Y) and the tube angle (v,
/// around the ring). Normals point radially out of the tube.
pub(crate) fn torus(radius: f32, tube: f32, ring_segments: u32, tube_segments: u32) -> (Vec<MeshVertex>, Vec<u32>) {
    let su = ring_segments.max(3);
    let sv = tube_segments.max(3);
    let mut vertices = Vec::with_capacity(((su + 1) * (sv + 1)) as usize);
    let mut indices = Vec::with_capacity((su * sv * 6) as usize);

    let tau = 2.0 * PI;

    for iu in 0..=su {
        let u = iu as f32 / su as f32;
        let (sin_u, cos_u) = (u * tau).sin_cos();

        for iv in 0..=sv {
            let v = iv as f32 / sv as f32;
            let (sin_v, cos_v) = (v * tau).sin_cos();

            let ring = radius + tube * cos_v;
            vertices.push(MeshVertex {
                position: [ring * cos_u, tube * sin_v, ring * sin_u],
                normal: [cos_v * cos_u, sin_v, cos_v * sin_u],
                uv: [u, v],
            });
        }
    }

    for iu in 0..su {
        for iv in 0..sv {
            let current = iu * (sv + 1) + iv;
            let next = current + sv + 1;
            indices.extend_from_slice(&[current, current + 1, next]);
            indices.extend_from_slice(&[current + 1, next + 1, next]);
        }
    }

    (vertices, indices)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_unit_normals(vertices: &[MeshVertex]) {
        for v in vertices {
            let len =
                (v.normal[0].powi(2) + v.normal[1].powi(2) + v.normal[2].powi(2)).sqrt();
            assert!((len - 1.0).abs() < 1e-5, "normal length {len}");
        }
    }

    fn assert_indices_in_range(vertices: &[MeshVertex], indices: &[u32]) {
        for &idx in indices {
            assert!((idx as usize) < vertices.len(), "index {idx} out of range");
        }
    }

    #[test]
    fn cube_counts() {
        let (verts, idxs) = cube();
        assert_eq!(verts.len(), 24);
        assert_eq!(idxs.len(), 36);
        assert_indices_in_range(&verts, &idxs);
        assert_unit_normals(&verts);
    }

    #[test]
    fn plane_counts_and_normals() {
        let (verts, idxs) = plane();
        assert_eq!(verts.len(), 4);
        assert_eq!(idxs.len(), 6);
        for v in &verts {
            assert_eq!(v.normal, [0.0, 1.0, 0.0]);
        }
    }

    #[test]
    fn sphere_counts() {
        let (verts, idxs) = sphere(32, 16);
        assert_eq!(verts.len(), (17 * 33) as usize);
        assert_eq!(idxs.len(), (16 * 32 * 6) as usize);
        assert_indices_in_range(&verts, &idxs);
        assert_unit_normals(&verts);
    }

    #[test]
    fn cylinder_well_formed() {
        let (verts, idxs) = cylinder(0.5, 0.5, 32);
        assert_indices_in_range(&verts, &idxs);
        assert_unit_normals(&verts);
        // side + two caps
        assert_eq!(idxs.len(), (32 * 6 + 32 * 3 + 32 * 3) as usize);
    }

    #[test]
    fn torus_well_formed() {
        let (verts, idxs) = torus(1.0, 0.25, 48, 24);
        assert_eq!(verts.len(), (49 * 25) as usize);
        assert_eq!(idxs.len(), (48 * 24 * 6) as usize);
        assert_indices_in_range(&verts, &idxs);
        assert_unit_normals(&verts);
    }

    #[test]
    fn torus_vertices_lie_on_the_tube() {
        let (radius, tube) = (2.0, 0.3);
        let (verts, _) = torus(radius, tube, 16, 8);
        for v in &verts {
            // Distance from the ring circle (radius in XZ) must equal tube.
            let ring_dist = (v.position[0].powi(2) + v.position[2].powi(2)).sqrt();
            let d = ((ring_dist - radius).powi(2) + v.position[1].powi(2)).sqrt();
            assert!((d - tube).abs() < 1e-4);
        }
    }
}
