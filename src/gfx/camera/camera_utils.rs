use cgmath::{InnerSpace, Matrix3, Matrix4, Rad, SquareMatrix, Vector3};

/// Smallest length a vector may have before it is treated as degenerate.
pub const AXIS_EPSILON: f32 = 1e-6;

pub fn convert_matrix4_to_array(matrix4: Matrix4<f32>) -> [[f32; 4]; 4] {
    let mut result = [[0.0; 4]; 4];

    for i in 0..4 {
        for j in 0..4 {
            result[i][j] = matrix4[i][j];
        }
    }

    result
}

/// Rotation of `angle` radians about `axis`. A zero axis yields the identity.
pub fn axis_angle(axis: Vector3<f32>, angle: f32) -> Matrix3<f32> {
    let length = axis.magnitude();
    if length < AXIS_EPSILON {
        return Matrix3::identity();
    }
    Matrix3::from_axis_angle(axis / length, Rad(angle))
}

/// Rebuilds an orthonormal (dir, up, right) frame with `right = dir x up`.
///
/// `dir` keeps its direction; `up` is made perpendicular to it. When `up` is
/// parallel to `dir` an arbitrary perpendicular is chosen.
pub fn orthonormal_frame(
    dir: Vector3<f32>,
    up: Vector3<f32>,
) -> (Vector3<f32>, Vector3<f32>, Vector3<f32>) {
    let dir = dir.normalize();
    let mut up = up - dir * dir.dot(up);
    if up.magnitude() < AXIS_EPSILON {
        let fallback = if dir.x.abs() < 0.9 {
            Vector3::unit_x()
        } else {
            Vector3::unit_y()
        };
        up = fallback - dir * dir.dot(fallback);
    }
    let up = up.normalize();
    let right = dir.cross(up);
    (dir, up, right)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn frame_is_orthonormal() {
        let (d, u, r) = orthonormal_frame(Vector3::new(1.0, 0.2, 0.0), Vector3::new(0.1, 1.0, 0.3));
        assert!((d.magnitude() - 1.0).abs() < 1e-5);
        assert!((u.magnitude() - 1.0).abs() < 1e-5);
        assert!((r.magnitude() - 1.0).abs() < 1e-5);
        assert!(d.dot(u).abs() < 1e-5);
        assert!(d.dot(r).abs() < 1e-5);
        assert!(u.dot(r).abs() < 1e-5);
    }

    #[test]
    fn parallel_up_still_produces_a_frame() {
        let (d, u, _) = orthonormal_frame(Vector3::unit_y(), Vector3::unit_y());
        assert!(d.dot(u).abs() < 1e-5);
        assert!((u.magnitude() - 1.0).abs() < 1e-5);
    }

    #[test]
    fn zero_axis_is_identity() {
        let m = axis_angle(Vector3::new(0.0, 0.0, 0.0), 1.0);
        assert_eq!(m, Matrix3::identity());
    }

    #[test]
    fn array_conversion_is_column_major() {
        let m = Matrix4::from_translation(Vector3::new(1.0, 2.0, 3.0));
        let a = convert_matrix4_to_array(m);
        assert_eq!(a[3], [1.0, 2.0, 3.0, 1.0]);
    }
}
