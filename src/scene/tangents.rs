use glam::{Vec2, Vec3};

/// Per-vertex tangents and bitangents from triangle UV gradients.
/// Contributions of all triangles sharing a vertex are summed, then normalised.
/// Faces that are not triangles or have degenerate UVs contribute nothing.
pub fn compute_tangent_space(
    positions: &[[f32; 3]],
    tex_coords: &[[f32; 2]],
    faces: &[Vec<u32>],
) -> (Vec<[f32; 3]>, Vec<[f32; 3]>) {
    let mut tangents = vec![Vec3::ZERO; positions.len()];
    let mut bitangents = vec![Vec3::ZERO; positions.len()];

    for face in faces {
        let [a, b, c] = match face.as_slice() {
            &[a, b, c] => [a as usize, b as usize, c as usize],
            _ => continue,
        };
        if [a, b, c].iter().any(|&i| i >= positions.len() || i >= tex_coords.len()) {
            continue;
        }

        let (p0, p1, p2) = (Vec3::from(positions[a]), Vec3::from(positions[b]), Vec3::from(positions[c]));
        let (t0, t1, t2) = (Vec2::from(tex_coords[a]), Vec2::from(tex_coords[b]), Vec2::from(tex_coords[c]));

        let edge1 = p1 - p0;
        let edge2 = p2 - p0;
        let duv1 = t1 - t0;
        let duv2 = t2 - t0;

        let det = duv1.x * duv2.y - duv2.x * duv1.y;
        if det.abs() < f32::EPSILON {
            continue;
        }
        let r = 1.0 / det;

        let tangent = (edge1 * duv2.y - edge2 * duv1.y) * r;
        let bitangent = (edge2 * duv1.x - edge1 * duv2.x) * r;

        for i in [a, b, c] {
            tangents[i] += tangent;
            bitangents[i] += bitangent;
        }
    }

    (
        tangents.into_iter().map(|t| t.normalize_or_zero().to_array()).collect(),
        bitangents.into_iter().map(|b| b.normalize_or_zero().to_array()).collect(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_axis_aligned_quad() {
        let positions = [[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [1.0, 1.0, 0.0], [0.0, 1.0, 0.0]];
        let tex_coords = [[0.0, 0.0], [1.0, 0.0], [1.0, 1.0], [0.0, 1.0]];
        let faces = vec![vec![0, 1, 2], vec![0, 2, 3]];

        let (tangents, bitangents) = compute_tangent_space(&positions, &tex_coords, &faces);
        for (tangent, bitangent) in tangents.iter().zip(&bitangents) {
            assert_relative_eq!(tangent[0], 1.0, epsilon = 1e-5);
            assert_relative_eq!(tangent[1], 0.0, epsilon = 1e-5);
            assert_relative_eq!(bitangent[1], 1.0, epsilon = 1e-5);
            assert_relative_eq!(bitangent[0], 0.0, epsilon = 1e-5);
        }
    }

    #[test]
    fn test_degenerate_uvs_leave_zero_vectors() {
        let positions = [[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]];
        let tex_coords = [[0.5, 0.5]; 3];
        let (tangents, bitangents) = compute_tangent_space(&positions, &tex_coords, &[vec![0, 1, 2]]);
        assert_eq!(tangents, vec![[0.0; 3]; 3]);
        assert_eq!(bitangents, vec![[0.0; 3]; 3]);
    }
}
