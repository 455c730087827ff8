//! Bounding spheres used for visibility culling.

use cgmath::{EuclideanSpace, InnerSpace, Matrix4, Point3, Transform as _, Vector3};

/// Plane `normal . p = constant`; the positive side is "inside".
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Plane {
    pub normal: Vector3<f32>,
    pub constant: f32,
}

impl Plane {
    /// Plane through `point` with the given unit `normal`.
    pub fn from_point(normal: Vector3<f32>, point: Point3<f32>) -> Self {
        Self {
            normal,
            constant: normal.dot(point.to_vec()),
        }
    }

    pub fn signed_distance(&self, point: Point3<f32>) -> f32 {
        self.normal.dot(point.to_vec()) - self.constant
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingSphere {
    pub center: Point3<f32>,
    pub radius: f32,
}

impl BoundingSphere {
    pub fn new(center: Point3<f32>, radius: f32) -> Self {
        Self { center, radius }
    }

    /// Sphere centered at the average of `points`, just large enough to hold
    /// all of them. Returns `None` for an empty slice.
    pub fn from_points(points: &[[f32; 3]]) -> Option<Self> {
        if points.is_empty() {
            return None;
        }

        let sum = points
            .iter()
            .fold(Vector3::new(0.0, 0.0, 0.0), |acc, p| acc + Vector3::from(*p));
        let center = Point3::from_vec(sum / points.len() as f32);
        let radius = points
            .iter()
            .map(|p| (Point3::from(*p) - center).magnitude())
            .fold(0.0_f32, f32::max);

        Some(Self { center, radius })
    }

    /// The sphere after `matrix` is applied; the radius grows by the largest
    /// axis scale of the matrix.
    pub fn transformed(&self, matrix: &Matrix4<f32>) -> Self {
        let scale = [matrix.x, matrix.y, matrix.z]
            .iter()
            .map(|column| column.truncate().magnitude())
            .fold(0.0_f32, f32::max);
        Self {
            center: matrix.transform_point(self.center),
            radius: self.radius * scale,
        }
    }

    /// Smallest sphere containing both spheres.
    pub fn merged(&self, other: &BoundingSphere) -> Self {
        let offset = other.center - self.center;
        let distance = offset.magnitude();

        if distance + other.radius <= self.radius {
            return *self;
        }
        if distance + self.radius <= other.radius {
            return *other;
        }

        let radius = 0.5 * (distance + self.radius + other.radius);
        let center = self.center + offset * ((radius - self.radius) / distance);
        Self { center, radius }
    }

    /// -1 when the sphere is strictly on the negative side of `plane`, +1
    /// when strictly on the positive side, 0 when it straddles or touches it.
    pub fn which_side(&self, plane: &Plane) -> i32 {
        let distance = plane.signed_distance(self.center);
        if distance < -self.radius {
            -1
        } else if distance > self.radius {
            1
        } else {
            0
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_points_uses_average_center() {
        let sphere = BoundingSphere::from_points(&[[-1.0, 0.0, 0.0], [1.0, 0.0, 0.0]]).unwrap();
        assert_eq!(sphere.center, Point3::new(0.0, 0.0, 0.0));
        assert!((sphere.radius - 1.0).abs() < 1e-6);
        assert!(BoundingSphere::from_points(&[]).is_none());
    }

    #[test]
    fn transform_moves_and_scales() {
        let sphere = BoundingSphere::new(Point3::new(0.0, 0.0, 0.0), 1.0);
        let m = Matrix4::from_translation(Vector3::new(3.0, 0.0, 0.0)) * Matrix4::from_scale(2.0);
        let moved = sphere.transformed(&m);
        assert_eq!(moved.center, Point3::new(3.0, 0.0, 0.0));
        assert!((moved.radius - 2.0).abs() < 1e-6);
    }

    #[test]
    fn merge_encloses_both() {
        let a = BoundingSphere::new(Point3::new(-2.0, 0.0, 0.0), 1.0);
        let b = BoundingSphere::new(Point3::new(4.0, 0.0, 0.0), 1.0);
        let m = a.merged(&b);
        assert!((m.radius - 4.0).abs() < 1e-5);
        assert!((m.center - Point3::new(1.0, 0.0, 0.0)).magnitude() < 1e-5);

        let inner = BoundingSphere::new(Point3::new(0.5, 0.0, 0.0), 0.1);
        assert_eq!(m.merged(&inner), m);
        assert_eq!(inner.merged(&m), m);
    }

    #[test]
    fn sides_of_a_plane() {
        let plane = Plane::from_point(Vector3::unit_x(), Point3::new(1.0, 0.0, 0.0));
        let inside = BoundingSphere::new(Point3::new(3.0, 0.0, 0.0), 1.0);
        let touching = BoundingSphere::new(Point3::new(0.0, 0.0, 0.0), 1.0);
        let straddling = BoundingSphere::new(Point3::new(1.5, 0.0, 0.0), 1.0);
        let outside = BoundingSphere::new(Point3::new(-1.0, 0.0, 0.0), 1.0);
        assert_eq!(inside.which_side(&plane), 1);
        assert_eq!(touching.which_side(&plane), 0);
        assert_eq!(straddling.which_side(&plane), 0);
        assert_eq!(outside.which_side(&plane), -1);
    }
}
