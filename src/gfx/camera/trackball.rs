//! Trackball controller
//!
//! Maps a drag across the viewport onto a virtual sphere and turns the arc
//! between the press point and the current point into a rotation. The
//! rotation is applied to the camera as if the scene were being spun about
//! the pivot: the camera orbits the pivot by the inverse rotation.

use cgmath::{EuclideanSpace, InnerSpace, Matrix, Point3, Vector3};

use super::{
    camera::{Camera, CameraAxes},
    camera_utils::{axis_angle, AXIS_EPSILON},
};

#[derive(Debug, Clone, Copy)]
struct DragStart {
    position: Point3<f32>,
    axes: CameraAxes,
}

#[derive(Debug, Clone)]
pub struct Trackball {
    x_size: u32,
    y_size: u32,
    active: bool,
    initial: (f32, f32),
    last: (f32, f32),
    pivot: Point3<f32>,
    start: Option<DragStart>,
}

impl Trackball {
    pub fn new(x_size: u32, y_size: u32) -> Self {
        Self {
            x_size: x_size.max(1),
            y_size: y_size.max(1),
            active: false,
            initial: (0.0, 0.0),
            last: (0.0, 0.0),
            pivot: Point3::origin(),
            start: None,
        }
    }

    pub fn set_window_size(&mut self, x_size: u32, y_size: u32) {
        self.x_size = x_size.max(1);
        self.y_size = y_size.max(1);
    }

    pub fn set_active(&mut self, active: bool) {
        self.active = active;
        if !active {
            self.start = None;
        }
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Point the camera orbits while dragging.
    pub fn pivot(&self) -> Point3<f32> {
        self.pivot
    }

    /// Records the drag origin in pixels (bottom-left origin) and the camera
    /// frame the drag starts from.
    pub fn set_initial_point(&mut self, x: i32, y: i32, camera: &Camera) {
        self.initial = self.normalize(x, y);
        self.last = self.initial;
        self.start = Some(DragStart {
            position: camera.position(),
            axes: camera.axes(),
        });
    }

    /// Rotates the camera by the arc from the initial point to `(x, y)`.
    ///
    /// Each call is relative to the initial point, not to the previous final
    /// point. Does nothing while inactive or before an initial point was
    /// recorded; returns whether the camera was changed.
    pub fn set_final_point(&mut self, x: i32, y: i32, camera: &mut Camera) -> bool {
        if !self.active {
            return false;
        }
        let Some(start) = self.start else {
            return false;
        };

        let point = self.normalize(x, y);
        if point == self.initial {
            return false;
        }
        self.last = point;

        let (axis, angle) = arc_rotation(self.initial, point);
        let world_axis =
            start.axes.direction * axis.x + start.axes.up * axis.y + start.axes.right * axis.z;
        let rotation = axis_angle(world_axis, angle);
        // Spinning the scene by `rotation` is the camera orbiting by its inverse.
        let inverse = rotation.transpose();

        let offset = start.position - self.pivot;
        camera.set_position(self.pivot + inverse * offset);
        camera.set_axes_orthonormal(inverse * start.axes.direction, inverse * start.axes.up);
        true
    }

    /// Initial point in normalized viewport coordinates.
    pub fn initial_point(&self) -> (f32, f32) {
        self.initial
    }

    /// Most recent final point in normalized viewport coordinates.
    pub fn final_point(&self) -> (f32, f32) {
        self.last
    }

    // Pixels to [-1, 1] along the shorter window side.
    fn normalize(&self, x: i32, y: i32) -> (f32, f32) {
        let mult = 1.0 / self.x_size.min(self.y_size) as f32;
        (
            (2.0 * x as f32 - self.x_size as f32) * mult,
            (2.0 * y as f32 - self.y_size as f32) * mult,
        )
    }
}

// Projects a normalized point onto the back hemisphere, expressed in
// (direction, up, right) camera components.
fn sphere_point((x, y): (f32, f32)) -> Vector3<f32> {
    let sqr_length = x * x + y * y;
    if sqr_length > 1.0 {
        let length = sqr_length.sqrt();
        Vector3::new(0.0, y / length, x / length)
    } else {
        Vector3::new(-(1.0 - sqr_length).sqrt(), y, x)
    }
}

// Axis (camera components) and angle of the great-circle arc between two
// drag points.
fn arc_rotation(p0: (f32, f32), p1: (f32, f32)) -> (Vector3<f32>, f32) {
    let v0 = sphere_point(p0);
    let v1 = sphere_point(p1);
    let axis = v0.cross(v1);
    let dot = v0.dot(v1);

    if axis.magnitude() > AXIS_EPSILON {
        return (axis.normalize(), dot.clamp(-1.0, 1.0).acos());
    }

    if dot < 0.0 {
        // Antipodal points: half a turn about any axis perpendicular to them.
        let length = (p0.0 * p0.0 + p0.1 * p0.1).sqrt().max(AXIS_EPSILON);
        (
            Vector3::new(p0.1 / length, -p0.0 / length, 0.0),
            std::f32::consts::PI,
        )
    } else {
        (Vector3::new(1.0, 0.0, 0.0), 0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f32 = 1e-5;

    fn camera() -> Camera {
        let mut camera = Camera::new(true);
        let d = Vector3::unit_z();
        let u = Vector3::unit_y();
        camera.set_frame(Point3::new(0.0, 0.0, -5.0), d, u, d.cross(u));
        camera
    }

    #[test]
    fn final_point_is_ignored_while_inactive() {
        let mut trackball = Trackball::new(512, 512);
        let mut cam = camera();
        let before = (cam.position(), cam.axes());

        assert!(!trackball.set_final_point(400, 300, &mut cam));
        assert_eq!((cam.position(), cam.axes()), before);

        trackball.set_initial_point(256, 256, &cam);
        assert!(!trackball.set_final_point(400, 300, &mut cam));
        assert_eq!((cam.position(), cam.axes()), before);
    }

    #[test]
    fn dragging_orbits_the_pivot() {
        let mut trackball = Trackball::new(512, 512);
        let mut cam = camera();
        trackball.set_active(true);
        trackball.set_initial_point(256, 256, &cam);
        assert!(trackball.set_final_point(356, 256, &mut cam));

        let distance = (cam.position() - trackball.pivot()).magnitude();
        assert!((distance - 5.0).abs() < 1e-4);
        assert!(cam.position() != Point3::new(0.0, 0.0, -5.0));

        let axes = cam.axes();
        assert!(axes.direction.dot(axes.up).abs() < EPS);
        assert!((axes.right - axes.direction.cross(axes.up)).magnitude() < EPS);
        // Still looking at the pivot.
        let to_pivot = (trackball.pivot() - cam.position()).normalize();
        assert!((to_pivot - axes.direction).magnitude() < 1e-4);
    }

    #[test]
    fn rotation_is_relative_to_the_initial_point() {
        let mut trackball = Trackball::new(512, 512);
        let mut cam = camera();
        trackball.set_active(true);
        trackball.set_initial_point(256, 256, &cam);

        trackball.set_final_point(300, 280, &mut cam);
        let first = (cam.position(), cam.axes());
        trackball.set_final_point(300, 280, &mut cam);
        let second = (cam.position(), cam.axes());
        assert!((first.0 - second.0).magnitude() < EPS);
        assert!((first.1.direction - second.1.direction).magnitude() < EPS);
    }

    #[test]
    fn returning_to_the_press_point_restores_the_frame() {
        let mut trackball = Trackball::new(640, 480);
        let mut cam = camera();
        trackball.set_active(true);
        trackball.set_initial_point(320, 240, &cam);
        trackball.set_final_point(420, 200, &mut cam);
        trackball.set_final_point(321, 240, &mut cam);
        assert!((cam.position() - Point3::new(0.0, 0.0, -5.0)).magnitude() < 0.05);
    }

    #[test]
    fn deactivation_forgets_the_drag() {
        let mut trackball = Trackball::new(512, 512);
        let mut cam = camera();
        trackball.set_active(true);
        trackball.set_initial_point(256, 256, &cam);
        trackball.set_active(false);
        trackball.set_active(true);
        assert!(!trackball.set_final_point(300, 256, &mut cam));
    }

    #[test]
    fn pixels_normalize_against_the_short_side() {
        let mut trackball = Trackball::new(800, 400);
        let cam = camera();
        trackball.set_initial_point(800, 400, &cam);
        assert_eq!(trackball.initial_point(), (2.0, 1.0));
    }
}
