//! Viewer configuration.
//!
//! Everything a viewer needs before it opens a window. Built with
//! chained `with_*` calls:
//!
//! ```rust
//! use wiremesh::config::{SceneLayout, ViewerConfig};
//!
//! let config = ViewerConfig::default()
//!     .with_title("Rings")
//!     .with_size(800, 600)
//!     .with_layout(SceneLayout::Rings)
//!     .with_mouse_look(true);
//! assert_eq!(config.width, 800);
//! ```

use std::path::{Path, PathBuf};

use cgmath::{Point3, Vector3};

/// Initial camera pose, frustum and rig speeds.
#[derive(Debug, Clone, PartialEq)]
pub struct CameraSettings {
    pub fov_y_degrees: f32,
    pub near: f32,
    pub far: f32,
    /// World units per second.
    pub translation_speed: f32,
    /// Radians per second.
    pub rotation_speed: f32,
    pub position: Point3<f32>,
    pub direction: Vector3<f32>,
    pub up: Vector3<f32>,
}

impl Default for CameraSettings {
    fn default() -> Self {
        let (position, direction, up) = SceneLayout::default().camera_pose();
        Self {
            fov_y_degrees: 60.0,
            near: 0.1,
            far: 100.0,
            translation_speed: 2.0,
            rotation_speed: 1.0,
            position,
            direction,
            up,
        }
    }
}

/// Which scene the viewer builds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SceneLayout {
    /// One sphere at the origin.
    Single,
    /// Two rows of spheres, a column of tori and a column of octahedra.
    #[default]
    Rings,
}

impl SceneLayout {
    /// Camera position, direction and up the layout is meant to be seen from.
    pub fn camera_pose(self) -> (Point3<f32>, Vector3<f32>, Vector3<f32>) {
        match self {
            SceneLayout::Single => (
                Point3::new(0.0, 0.0, 2.5),
                -Vector3::unit_z(),
                Vector3::unit_y(),
            ),
            SceneLayout::Rings => (
                Point3::new(0.0, 0.0, -2.5),
                Vector3::unit_z(),
                Vector3::unit_y(),
            ),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ViewerConfig {
    pub title: String,
    pub width: u32,
    pub height: u32,
    pub camera: CameraSettings,
    pub layout: SceneLayout,
    pub mesh_color: [f32; 4],
    pub edge_color: [f32; 4],
    pub clear_color: [f32; 4],
    pub text_color: [f32; 4],
    /// Searched in order, before the `WIREMESH_PATH` root.
    pub shader_dirs: Vec<PathBuf>,
    /// Mouse motion without a drag turns the camera.
    pub mouse_look: bool,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            title: "WireMesh".to_string(),
            width: 512,
            height: 512,
            camera: CameraSettings::default(),
            layout: SceneLayout::default(),
            mesh_color: [0.0, 0.0, 1.0, 1.0],
            edge_color: [0.0, 0.0, 0.0, 1.0],
            clear_color: [0.0, 0.0, 0.0, 1.0],
            text_color: [1.0, 1.0, 1.0, 1.0],
            shader_dirs: vec![Path::new(env!("CARGO_MANIFEST_DIR")).join("shaders")],
            mouse_look: false,
        }
    }
}

impl ViewerConfig {
    pub fn with_title(mut self, title: &str) -> Self {
        self.title = title.to_owned();
        self
    }

    pub fn with_size(mut self, width: u32, height: u32) -> Self {
        self.width = width.max(1);
        self.height = height.max(1);
        self
    }

    /// Selects the scene and moves the camera to the layout's pose.
    pub fn with_layout(mut self, layout: SceneLayout) -> Self {
        let (position, direction, up) = layout.camera_pose();
        self.layout = layout;
        self.camera.position = position;
        self.camera.direction = direction;
        self.camera.up = up;
        self
    }

    pub fn with_camera(mut self, camera: CameraSettings) -> Self {
        self.camera = camera;
        self
    }

    pub fn with_speeds(mut self, translation_speed: f32, rotation_speed: f32) -> Self {
        self.camera.translation_speed = translation_speed;
        self.camera.rotation_speed = rotation_speed;
        self
    }

    pub fn with_colors(mut self, mesh_color: [f32; 4], edge_color: [f32; 4]) -> Self {
        self.mesh_color = mesh_color;
        self.edge_color = edge_color;
        self
    }

    pub fn with_clear_color(mut self, color: [f32; 4]) -> Self {
        self.clear_color = color;
        self
    }

    pub fn with_shader_dir(mut self, directory: impl Into<PathBuf>) -> Self {
        self.shader_dirs.push(directory.into());
        self
    }

    pub fn with_mouse_look(mut self, enabled: bool) -> Self {
        self.mouse_look = enabled;
        self
    }

    pub fn aspect_ratio(&self) -> f32 {
        self.width as f32 / self.height.max(1) as f32
    }
}
