pub mod camera;
pub mod camera_rig;
pub mod camera_utils;
pub mod trackball;

// Re-export main types
pub use camera::{Camera, CameraAxes, Frustum};
pub use camera_rig::{CameraRig, Motion};
pub use trackball::Trackball;
