//! Free-fly camera rig
//!
//! Input triggers (key codes, mouse impulses, anything hashable) are bound
//! to logical motions. A pressed trigger activates its motion, a released
//! trigger deactivates it, and [`CameraRig::move_rig`] integrates every
//! active motion once per frame against the elapsed time.

use std::collections::HashMap;
use std::hash::Hash;

use cgmath::{EuclideanSpace, Point3, Vector3};

use super::{camera::Camera, camera_utils::axis_angle};

/// A logical camera motion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Motion {
    MoveForward,
    MoveBackward,
    MoveUp,
    MoveDown,
    MoveRight,
    MoveLeft,
    TurnRight,
    TurnLeft,
    LookUp,
    LookDown,
}

impl Motion {
    pub const ALL: [Motion; 10] = [
        Motion::MoveForward,
        Motion::MoveBackward,
        Motion::MoveUp,
        Motion::MoveDown,
        Motion::MoveRight,
        Motion::MoveLeft,
        Motion::TurnRight,
        Motion::TurnLeft,
        Motion::LookUp,
        Motion::LookDown,
    ];

    pub fn is_translation(self) -> bool {
        matches!(
            self,
            Motion::MoveForward
                | Motion::MoveBackward
                | Motion::MoveUp
                | Motion::MoveDown
                | Motion::MoveRight
                | Motion::MoveLeft
        )
    }
}

pub struct CameraRig<K> {
    bindings: HashMap<K, Motion>,
    // Triggers currently held. A motion stays active while any of them maps
    // to it.
    held: Vec<K>,
    active: Vec<Motion>,
    translation_speed: f32,
    rotation_speed: f32,
    // Rig-local (direction, up, right). Turns rotate these, looks do not, so
    // forward motion and turning stay in the plane captured by
    // `compute_world_axes`.
    world_axes: [Vector3<f32>; 3],
}

impl<K: Copy + Eq + Hash> CameraRig<K> {
    /// Creates a rig with no bindings.
    ///
    /// `translation_speed` is in world units per second and
    /// `rotation_speed` in radians per second.
    pub fn new(translation_speed: f32, rotation_speed: f32) -> Self {
        Self {
            bindings: HashMap::new(),
            held: Vec::new(),
            active: Vec::with_capacity(Motion::ALL.len()),
            translation_speed,
            rotation_speed,
            world_axes: [Vector3::unit_z(), Vector3::unit_y(), -Vector3::unit_x()],
        }
    }

    /// Binds `trigger` to `motion`. Returns false if the trigger is already bound.
    pub fn register(&mut self, motion: Motion, trigger: K) -> bool {
        if self.bindings.contains_key(&trigger) {
            return false;
        }
        self.bindings.insert(trigger, motion);
        true
    }

    pub fn motion_for(&self, trigger: K) -> Option<Motion> {
        self.bindings.get(&trigger).copied()
    }

    /// Activates the motion bound to `trigger`.
    ///
    /// Returns true when the trigger is bound (the event is consumed).
    /// Activating an already active motion leaves a single instance.
    pub fn push_motion(&mut self, trigger: K) -> bool {
        let Some(motion) = self.motion_for(trigger) else {
            return false;
        };
        if !self.held.contains(&trigger) {
            self.held.push(trigger);
        }
        if !self.active.contains(&motion) {
            self.active.push(motion);
        }
        true
    }

    /// Releases `trigger`. Its motion stops once no other held trigger is
    /// bound to it.
    ///
    /// Returns false for unbound triggers and for triggers that were not held.
    pub fn pop_motion(&mut self, trigger: K) -> bool {
        let Some(motion) = self.motion_for(trigger) else {
            return false;
        };
        let Some(index) = self.held.iter().position(|t| *t == trigger) else {
            return false;
        };
        self.held.swap_remove(index);

        let still_held = self
            .held
            .iter()
            .any(|t| self.bindings.get(t) == Some(&motion));
        if !still_held {
            self.active.retain(|m| *m != motion);
        }
        true
    }

    /// Releases every held trigger.
    pub fn clear_motions(&mut self) {
        self.held.clear();
        self.active.clear();
    }

    pub fn is_active(&self, motion: Motion) -> bool {
        self.active.contains(&motion)
    }

    pub fn active_motions(&self) -> &[Motion] {
        &self.active
    }

    pub fn set_translation_speed(&mut self, speed: f32) {
        self.translation_speed = speed;
    }

    pub fn translation_speed(&self) -> f32 {
        self.translation_speed
    }

    pub fn set_rotation_speed(&mut self, speed: f32) {
        self.rotation_speed = speed;
    }

    pub fn rotation_speed(&self) -> f32 {
        self.rotation_speed
    }

    /// Resynchronizes the rig's motion axes with the camera's orientation.
    ///
    /// Must be called after the camera frame is set from outside the rig.
    pub fn compute_world_axes(&mut self, camera: &Camera) {
        let axes = camera.axes();
        self.world_axes = [axes.direction, axes.up, axes.right];
    }

    pub fn world_axes(&self) -> [Vector3<f32>; 3] {
        self.world_axes
    }

    /// Integrates all active motions over `elapsed` seconds.
    ///
    /// Translations use the axes as they were at the start of the call, so
    /// combining a move with a turn in one tick gives the same displacement
    /// as the move alone. Returns true if any motion was applied.
    pub fn move_rig(&mut self, camera: &mut Camera, elapsed: f32) -> bool {
        if self.active.is_empty() {
            return false;
        }

        let step = self.translation_speed * elapsed;
        let [forward, up, right] = self.world_axes;
        let mut displacement = Vector3::new(0.0, 0.0, 0.0);
        for motion in self.active.iter().filter(|m| m.is_translation()) {
            let axis = match motion {
                Motion::MoveForward => forward,
                Motion::MoveBackward => -forward,
                Motion::MoveUp => up,
                Motion::MoveDown => -up,
                Motion::MoveRight => right,
                Motion::MoveLeft => -right,
                _ => continue,
            };
            displacement += axis * step;
        }
        if displacement != Vector3::new(0.0, 0.0, 0.0) {
            let position = camera.position().to_vec() + displacement;
            camera.set_position(Point3::from_vec(position));
        }

        let angle = self.rotation_speed * elapsed;
        for motion in self.active.clone() {
            match motion {
                Motion::TurnRight => self.turn(camera, -angle),
                Motion::TurnLeft => self.turn(camera, angle),
                Motion::LookUp => self.look(camera, angle),
                Motion::LookDown => self.look(camera, -angle),
                _ => {}
            }
        }

        true
    }

    // Rotation about the rig's up axis; also carries the rig's forward and
    // right axes along.
    fn turn(&mut self, camera: &mut Camera, angle: f32) {
        let incr = axis_angle(self.world_axes[1], angle);
        self.world_axes[0] = incr * self.world_axes[0];
        self.world_axes[2] = incr * self.world_axes[2];
        let axes = camera.axes();
        camera.set_axes_orthonormal(incr * axes.direction, incr * axes.up);
    }

    // Rotation about the rig's right axis; camera only.
    fn look(&mut self, camera: &mut Camera, angle: f32) {
        let incr = axis_angle(self.world_axes[2], angle);
        let axes = camera.axes();
        camera.set_axes_orthonormal(incr * axes.direction, incr * axes.up);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cgmath::InnerSpace;

    const EPS: f32 = 1e-5;

    fn camera_facing_plus_z() -> Camera {
        let mut camera = Camera::new(true);
        let d = Vector3::unit_z();
        let u = Vector3::unit_y();
        camera.set_frame(Point3::new(0.0, 0.0, 0.0), d, u, d.cross(u));
        camera
    }

    fn rig_with_all_bindings(camera: &Camera) -> CameraRig<u32> {
        let mut rig = CameraRig::new(2.0, 0.5);
        for (code, motion) in Motion::ALL.iter().enumerate() {
            assert!(rig.register(*motion, code as u32));
        }
        rig.compute_world_axes(camera);
        rig
    }

    fn code(motion: Motion) -> u32 {
        Motion::ALL.iter().position(|m| *m == motion).unwrap() as u32
    }

    fn assert_orthonormal(camera: &Camera) {
        let a = camera.axes();
        assert!((a.direction.magnitude() - 1.0).abs() < EPS);
        assert!((a.up.magnitude() - 1.0).abs() < EPS);
        assert!((a.right.magnitude() - 1.0).abs() < EPS);
        assert!(a.direction.dot(a.up).abs() < EPS);
        assert!(a.direction.dot(a.right).abs() < EPS);
        assert!(a.up.dot(a.right).abs() < EPS);
    }

    #[test]
    fn duplicate_trigger_is_rejected() {
        let mut rig: CameraRig<u32> = CameraRig::new(1.0, 1.0);
        assert!(rig.register(Motion::MoveForward, 7));
        assert!(!rig.register(Motion::MoveBackward, 7));
        assert_eq!(rig.motion_for(7), Some(Motion::MoveForward));
    }

    #[test]
    fn pushing_twice_keeps_one_active_instance() {
        let camera = camera_facing_plus_z();
        let mut rig = rig_with_all_bindings(&camera);
        assert!(rig.push_motion(code(Motion::MoveForward)));
        assert!(rig.push_motion(code(Motion::MoveForward)));
        assert_eq!(rig.active_motions(), &[Motion::MoveForward]);
        assert!(rig.pop_motion(code(Motion::MoveForward)));
        assert!(rig.active_motions().is_empty());
    }

    #[test]
    fn unbound_and_inactive_pops_are_not_handled() {
        let camera = camera_facing_plus_z();
        let mut rig = rig_with_all_bindings(&camera);
        assert!(!rig.push_motion(999));
        assert!(!rig.pop_motion(999));
        assert!(!rig.pop_motion(code(Motion::LookUp)));
        assert!(rig.active_motions().is_empty());
    }

    #[test]
    fn motion_survives_release_of_one_of_two_triggers() {
        let camera = camera_facing_plus_z();
        let mut rig = rig_with_all_bindings(&camera);
        assert!(rig.register(Motion::TurnRight, 100));

        rig.push_motion(code(Motion::TurnRight));
        rig.push_motion(100);
        assert_eq!(rig.active_motions(), &[Motion::TurnRight]);

        assert!(rig.pop_motion(100));
        assert!(rig.is_active(Motion::TurnRight));
        assert!(!rig.pop_motion(100));
        assert!(rig.pop_motion(code(Motion::TurnRight)));
        assert!(rig.active_motions().is_empty());
    }

    #[test]
    fn clearing_releases_everything() {
        let camera = camera_facing_plus_z();
        let mut rig = rig_with_all_bindings(&camera);
        rig.push_motion(code(Motion::MoveForward));
        rig.push_motion(code(Motion::LookUp));
        rig.clear_motions();
        assert!(rig.active_motions().is_empty());
        assert!(!rig.pop_motion(code(Motion::MoveForward)));
    }

    #[test]
    fn move_without_active_motions_reports_nothing() {
        let mut camera = camera_facing_plus_z();
        let mut rig = rig_with_all_bindings(&camera);
        assert!(!rig.move_rig(&mut camera, 0.016));
        assert_eq!(camera.position(), Point3::new(0.0, 0.0, 0.0));
    }

    #[test]
    fn forward_displacement_is_linear_in_ticks() {
        let mut camera = camera_facing_plus_z();
        let mut rig = rig_with_all_bindings(&camera);
        rig.push_motion(code(Motion::MoveForward));
        rig.push_motion(code(Motion::LookUp));

        let (n, dt) = (25, 0.02);
        for _ in 0..n {
            assert!(rig.move_rig(&mut camera, dt));
        }

        let travelled = camera.position().to_vec().dot(Vector3::unit_z());
        assert!((travelled - n as f32 * 2.0 * dt).abs() < 1e-4);
        assert!(camera.position().y.abs() < EPS);
    }

    #[test]
    fn turning_in_the_same_tick_does_not_change_displacement() {
        let mut straight = camera_facing_plus_z();
        let mut rig = rig_with_all_bindings(&straight);
        rig.push_motion(code(Motion::MoveForward));
        rig.move_rig(&mut straight, 0.1);

        let mut turning = camera_facing_plus_z();
        let mut rig = rig_with_all_bindings(&turning);
        rig.push_motion(code(Motion::TurnLeft));
        rig.push_motion(code(Motion::MoveForward));
        rig.move_rig(&mut turning, 0.1);

        assert!((straight.position().to_vec() - turning.position().to_vec()).magnitude() < EPS);
        assert!(turning.direction() != straight.direction());
    }

    #[test]
    fn turn_right_swings_direction_towards_right_axis() {
        let mut camera = camera_facing_plus_z();
        let mut rig = rig_with_all_bindings(&camera);
        let right = camera.right();
        rig.push_motion(code(Motion::TurnRight));
        rig.move_rig(&mut camera, 0.2);
        assert!(camera.direction().dot(right) > 0.0);
        assert!((camera.up() - Vector3::unit_y()).magnitude() < EPS);
    }

    #[test]
    fn look_up_raises_direction() {
        let mut camera = camera_facing_plus_z();
        let mut rig = rig_with_all_bindings(&camera);
        rig.push_motion(code(Motion::LookUp));
        rig.move_rig(&mut camera, 0.2);
        assert!(camera.direction().y > 0.0);
        // Looking does not tilt the rig's own forward axis.
        assert!((rig.world_axes()[0] - Vector3::unit_z()).magnitude() < EPS);
    }

    #[test]
    fn axes_stay_orthonormal_under_long_rotation_sequences() {
        let mut camera = camera_facing_plus_z();
        let mut rig = rig_with_all_bindings(&camera);
        let pattern = [
            Motion::TurnLeft,
            Motion::LookUp,
            Motion::TurnRight,
            Motion::LookDown,
            Motion::LookUp,
        ];
        for i in 0..2000 {
            let motion = pattern[i % pattern.len()];
            rig.push_motion(code(motion));
            rig.move_rig(&mut camera, 0.013 * (1 + i % 7) as f32);
            if i % 3 == 0 {
                rig.pop_motion(code(motion));
            }
            assert_orthonormal(&camera);
        }
    }

    #[test]
    fn world_axes_follow_external_frame_changes_only_after_resync() {
        let mut camera = camera_facing_plus_z();
        let mut rig = rig_with_all_bindings(&camera);
        let d = Vector3::unit_x();
        let u = Vector3::unit_y();
        camera.set_frame(Point3::new(0.0, 0.0, 0.0), d, u, d.cross(u));

        rig.push_motion(code(Motion::MoveForward));
        rig.move_rig(&mut camera, 1.0);
        // Stale axes still move along +z.
        assert!((camera.position().z - 2.0).abs() < EPS);

        rig.compute_world_axes(&camera);
        rig.move_rig(&mut camera, 1.0);
        assert!((camera.position().x - 2.0).abs() < EPS);
    }

    #[test]
    fn speeds_are_plain_setters() {
        let mut rig: CameraRig<u32> = CameraRig::new(1.0, 1.0);
        rig.set_translation_speed(0.25);
        rig.set_rotation_speed(4.0);
        assert_eq!(rig.translation_speed(), 0.25);
        assert_eq!(rig.rotation_speed(), 4.0);
    }
}
