//! Camera model
//!
//! A camera is a coordinate frame (position plus direction/up/right axes)
//! and a perspective frustum. Camera space has `right` as +x, `up` as +y and
//! `direction` as +z, so view depth is positive in front of the camera.

use cgmath::{EuclideanSpace, InnerSpace, Matrix4, Point3, Vector3};

use super::camera_utils::orthonormal_frame;

/// Perspective frustum parameters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Frustum {
    /// Vertical field of view in degrees.
    pub fov_y_degrees: f32,
    pub aspect: f32,
    pub near: f32,
    pub far: f32,
}

impl Frustum {
    /// Tangent of half the vertical field of view.
    pub fn tan_half_fov_y(&self) -> f32 {
        (self.fov_y_degrees.to_radians() * 0.5).tan()
    }
}

impl Default for Frustum {
    fn default() -> Self {
        Self {
            fov_y_degrees: 60.0,
            aspect: 1.0,
            near: 0.1,
            far: 100.0,
        }
    }
}

/// The camera's orientation axes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraAxes {
    pub direction: Vector3<f32>,
    pub up: Vector3<f32>,
    pub right: Vector3<f32>,
}

#[derive(Debug, Clone)]
pub struct Camera {
    position: Point3<f32>,
    axes: CameraAxes,
    frustum: Frustum,
    depth_range_01: bool,
}

impl Camera {
    /// Creates a camera at the origin looking down -z with y up.
    ///
    /// `depth_range_01` selects the clip-space depth convention and is fixed
    /// for the lifetime of the camera: `true` maps depth to [0, 1] (wgpu,
    /// Direct3D), `false` to [-1, 1] (OpenGL).
    pub fn new(depth_range_01: bool) -> Self {
        let direction = -Vector3::unit_z();
        let up = Vector3::unit_y();
        Self {
            position: Point3::origin(),
            axes: CameraAxes {
                direction,
                up,
                right: direction.cross(up),
            },
            frustum: Frustum::default(),
            depth_range_01,
        }
    }

    pub fn set_frustum(&mut self, fov_y_degrees: f32, aspect: f32, near: f32, far: f32) {
        self.frustum = Frustum {
            fov_y_degrees,
            aspect,
            near,
            far,
        };
    }

    pub fn frustum(&self) -> Frustum {
        self.frustum
    }

    /// Sets position and axes at once.
    ///
    /// The axes are stored as given: callers supply `right = dir x up` and
    /// keep the basis orthonormal.
    pub fn set_frame(
        &mut self,
        position: Point3<f32>,
        direction: Vector3<f32>,
        up: Vector3<f32>,
        right: Vector3<f32>,
    ) {
        self.position = position;
        self.set_axes(direction, up, right);
    }

    pub fn set_position(&mut self, position: Point3<f32>) {
        self.position = position;
    }

    pub fn position(&self) -> Point3<f32> {
        self.position
    }

    pub fn set_axes(&mut self, direction: Vector3<f32>, up: Vector3<f32>, right: Vector3<f32>) {
        self.axes = CameraAxes {
            direction,
            up,
            right,
        };
    }

    /// Re-derives an orthonormal frame from `direction` and `up`, recomputing
    /// `right` from them.
    pub fn set_axes_orthonormal(&mut self, direction: Vector3<f32>, up: Vector3<f32>) {
        let (direction, up, right) = orthonormal_frame(direction, up);
        self.set_axes(direction, up, right);
    }

    pub fn axes(&self) -> CameraAxes {
        self.axes
    }

    pub fn direction(&self) -> Vector3<f32> {
        self.axes.direction
    }

    pub fn up(&self) -> Vector3<f32> {
        self.axes.up
    }

    pub fn right(&self) -> Vector3<f32> {
        self.axes.right
    }

    pub fn has_depth_range_01(&self) -> bool {
        self.depth_range_01
    }

    /// World-to-camera matrix whose rows are (right, up, direction).
    pub fn view_matrix(&self) -> Matrix4<f32> {
        let CameraAxes {
            direction: d,
            up: u,
            right: r,
        } = self.axes;
        let eye = self.position.to_vec();

        #[rustfmt::skip]
        let view = Matrix4::new(
            r.x, u.x, d.x, 0.0,
            r.y, u.y, d.y, 0.0,
            r.z, u.z, d.z, 0.0,
            -r.dot(eye), -u.dot(eye), -d.dot(eye), 1.0,
        );
        view
    }

    /// Perspective projection for positive camera-space depth.
    pub fn projection_matrix(&self) -> Matrix4<f32> {
        let Frustum {
            aspect, near, far, ..
        } = self.frustum;
        let tan_half = self.frustum.tan_half_fov_y();
        let x_scale = 1.0 / (aspect * tan_half);
        let y_scale = 1.0 / tan_half;
        let inv_depth = 1.0 / (far - near);

        let (a, b) = if self.depth_range_01 {
            (far * inv_depth, -far * near * inv_depth)
        } else {
            ((far + near) * inv_depth, -2.0 * far * near * inv_depth)
        };

        #[rustfmt::skip]
        let projection = Matrix4::new(
            x_scale, 0.0, 0.0, 0.0,
            0.0, y_scale, 0.0, 0.0,
            0.0, 0.0, a, 1.0,
            0.0, 0.0, b, 0.0,
        );
        projection
    }

    pub fn projection_view_matrix(&self) -> Matrix4<f32> {
        self.projection_matrix() * self.view_matrix()
    }
}

impl Default for Camera {
    fn default() -> Self {
        Self::new(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cgmath::Vector4;

    fn facing_plus_z() -> Camera {
        let mut camera = Camera::new(true);
        let d = Vector3::unit_z();
        let u = Vector3::unit_y();
        camera.set_frame(Point3::new(0.0, 0.0, -2.5), d, u, d.cross(u));
        camera.set_frustum(60.0, 1.0, 0.1, 100.0);
        camera
    }

    fn clip(camera: &Camera, p: Point3<f32>) -> Vector4<f32> {
        camera.projection_view_matrix() * p.to_homogeneous()
    }

    #[test]
    fn right_is_dir_cross_up() {
        let camera = facing_plus_z();
        assert_eq!(camera.right(), Vector3::new(-1.0, 0.0, 0.0));
    }

    #[test]
    fn view_puts_target_on_positive_depth() {
        let camera = facing_plus_z();
        let v = camera.view_matrix() * Point3::new(0.0, 0.0, 10.0).to_homogeneous();
        assert!((v.z - 12.5).abs() < 1e-5);
        assert!(v.x.abs() < 1e-5 && v.y.abs() < 1e-5);
    }

    #[test]
    fn near_and_far_map_to_zero_and_one() {
        let camera = facing_plus_z();
        let near = clip(&camera, Point3::new(0.0, 0.0, -2.4));
        let far = clip(&camera, Point3::new(0.0, 0.0, 97.5));
        assert!((near.z / near.w).abs() < 1e-4);
        assert!((far.z / far.w - 1.0).abs() < 1e-4);
    }

    #[test]
    fn gl_depth_range_maps_near_to_minus_one() {
        let mut camera = Camera::new(false);
        camera.set_frustum(60.0, 1.0, 1.0, 10.0);
        let near = camera.projection_view_matrix() * Point3::new(0.0, 0.0, -1.0).to_homogeneous();
        assert!((near.z / near.w + 1.0).abs() < 1e-4);
    }

    #[test]
    fn camera_right_lands_on_positive_ndc_x() {
        let camera = facing_plus_z();
        let p = clip(&camera, Point3::new(-1.0, 0.0, 5.0));
        assert!(p.x / p.w > 0.0);
    }

    #[test]
    fn frustum_round_trips() {
        let mut camera = Camera::default();
        camera.set_frustum(45.0, 1.5, 0.5, 50.0);
        let f = camera.frustum();
        assert_eq!((f.fov_y_degrees, f.aspect, f.near, f.far), (45.0, 1.5, 0.5, 50.0));
    }

    #[test]
    fn orthonormal_setter_recomputes_right() {
        let mut camera = Camera::default();
        camera.set_axes_orthonormal(Vector3::new(2.0, 0.0, 0.0), Vector3::new(0.3, 1.0, 0.0));
        let axes = camera.axes();
        assert!((axes.right - axes.direction.cross(axes.up)).magnitude() < 1e-5);
        assert!(axes.direction.dot(axes.up).abs() < 1e-5);
    }
}
