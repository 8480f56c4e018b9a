use std::f32::consts::PI;

use crate::gfx::scene::ModelData;

/// Generate a wireframe floor grid on the XZ plane at y = 0.
///
/// `dimension` is the half-extent of the grid; `lines` is the number of
/// cells per side (clamped to at least 1).
pub fn generate_floor(dimension: f32, lines: u32) -> ModelData {
    let lines = lines.max(1);
    let increment = 2.0 * dimension / lines as f32;

    let mut vertices = Vec::with_capacity(12 * (lines as usize + 1));

    // Lines running along X
    for l in 0..=lines {
        let offset = -dimension + l as f32 * increment;
        vertices.extend_from_slice(&[-dimension, 0.0, offset, dimension, 0.0, offset]);
    }

    // Lines running along Z
    for l in 0..=lines {
        let offset = -dimension + l as f32 * increment;
        vertices.extend_from_slice(&[offset, 0.0, -dimension, offset, 0.0, dimension]);
    }

    let indices: Vec<u16> = (0..4 * (lines as u16 + 1)).collect();

    ModelData {
        alias: Some("floor".to_string()),
        vertices,
        indices,
        wireframe: true,
        ..Default::default()
    }
}

/// Generate a wireframe axis cross centered at the origin.
///
/// The X and Z arms span the full dimension; the Y arm spans half of it.
pub fn generate_axis(dimension: f32) -> ModelData {
    #[rustfmt::skip]
    let vertices = vec![
        -dimension, 0.0, 0.0,
        dimension, 0.0, 0.0,
        0.0, -dimension / 2.0, 0.0,
        0.0, dimension / 2.0, 0.0,
        0.0, 0.0, -dimension,
        0.0, 0.0, dimension,
    ];

    ModelData {
        alias: Some("axis".to_string()),
        vertices,
        indices: vec![0, 1, 2, 3, 4, 5],
        wireframe: true,
        ..Default::default()
    }
}

/// Generate a solid cone with its base on the XZ plane and apex at
/// `(0, height, 0)`.
pub fn generate_cone(radius: f32, height: f32, segments: u32) -> ModelData {
    let segments = segments.max(3);

    let mut vertices = Vec::with_capacity(3 * (segments as usize + 2));
    let mut indices = Vec::with_capacity(6 * segments as usize);

    // Apex, then the base ring, then the base center.
    vertices.extend_from_slice(&[0.0, height, 0.0]);

    for segment in 0..segments {
        let angle = segment as f32 * 2.0 * PI / segments as f32;
        vertices.extend_from_slice(&[radius * angle.cos(), 0.0, radius * angle.sin()]);
    }

    let center = vertices.len() as u16 / 3;
    vertices.extend_from_slice(&[0.0, 0.0, 0.0]);

    for segment in 0..segments as u16 {
        let current = 1 + segment;
        let next = 1 + (segment + 1) % segments as u16;

        // Side triangle
        indices.extend_from_slice(&[0, next, current]);
        // Base triangle
        indices.extend_from_slice(&[center, current, next]);
    }

    ModelData {
        alias: Some("cone".to_string()),
        vertices,
        indices,
        ..Default::default()
    }
}

/// Generate a solid UV sphere centered at the origin.
pub fn generate_sphere(radius: f32, longitude_segments: u32, latitude_segments: u32) -> ModelData {
    let long_segs = longitude_segments.max(3);
    let lat_segs = latitude_segments.max(2);

    let mut vertices = Vec::new();
    let mut indices = Vec::new();

    for lat in 0..=lat_segs {
        let theta = lat as f32 * PI / lat_segs as f32;
        let sin_theta = theta.sin();
        let cos_theta = theta.cos();

        for long in 0..=long_segs {
            let phi = long as f32 * 2.0 * PI / long_segs as f32;

            vertices.extend_from_slice(&[
                radius * sin_theta * phi.cos(),
                radius * cos_theta,
                radius * sin_theta * phi.sin(),
            ]);
        }
    }

    for lat in 0..lat_segs as u16 {
        for long in 0..long_segs as u16 {
            let first = lat * (long_segs as u16 + 1) + long;
            let second = first + long_segs as u16 + 1;

            indices.extend_from_slice(&[first, second, first + 1]);
            indices.extend_from_slice(&[second, second + 1, first + 1]);
        }
    }

    ModelData {
        alias: Some("sphere".to_string()),
        vertices,
        indices,
        ..Default::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn floor_grid_shape() {
        let floor = generate_floor(80.0, 2);

        // (lines + 1) lines in each direction, 2 points each, 3 floats per point.
        assert_eq!(floor.vertices.len(), 36);
        assert_eq!(floor.indices.len(), 12);
        assert!(floor.wireframe);

        let max_index = *floor.indices.iter().max().unwrap() as usize;
        assert!(max_index < floor.vertices.len() / 3);
    }

    #[test]
    fn axis_cross_shape() {
        let axis = generate_axis(82.0);

        assert_eq!(axis.vertices.len(), 18);
        assert_eq!(axis.indices, vec![0, 1, 2, 3, 4, 5]);
        assert!(axis.wireframe);

        // Y arm spans half the dimension.
        assert_eq!(axis.vertices[7], -41.0);
        assert_eq!(axis.vertices[10], 41.0);
    }

    #[test]
    fn cone_indices_stay_in_bounds() {
        let cone = generate_cone(2.0, 5.0, 16);

        let vertex_count = cone.vertices.len() / 3;
        assert_eq!(vertex_count, 18); // apex + ring + base center
        assert_eq!(cone.indices.len(), 16 * 6);
        assert!(cone
            .indices
            .iter()
            .all(|index| (*index as usize) < vertex_count));
        assert!(!cone.wireframe);
    }

    #[test]
    fn sphere_vertices_sit_on_the_radius() {
        let sphere = generate_sphere(3.0, 8, 6);

        for point in sphere.vertices.chunks_exact(3) {
            let length = (point[0] * point[0] + point[1] * point[1] + point[2] * point[2]).sqrt();
            assert!((length - 3.0).abs() < 1e-4);
        }

        let vertex_count = sphere.vertices.len() / 3;
        assert!(sphere
            .indices
            .iter()
            .all(|index| (*index as usize) < vertex_count));
    }
}
