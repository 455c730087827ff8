//! The wire-mesh viewer: scene setup, per-frame driver and input routing.
//!
//! A [`WireMeshViewer`] owns the camera, its free-fly rig and trackball, the
//! scene graph, the constant buffers and the PVW registry. The window layer
//! forwards its callbacks here and hands over the graphics engine for the
//! calls that draw.

use cgmath::{Point3, Vector3};
use winit::{event::MouseButton, keyboard::KeyCode};

use crate::{
    config::{SceneLayout, ViewerConfig},
    environment::Environment,
    error::SetupError,
    gfx::{
        camera::{Camera, CameraRig, Motion, Trackball},
        geometry::{MeshData, MeshFactory},
        rendering::engine::{GraphicsEngine, MeshId, ProgramId},
        resources::{
            constant_buffer::{BufferId, BufferPool, ConstantBuffer},
            pvw_matrices::{PvwMatrices, PVW_MATRIX_SIZE},
            wire_effect::{
                WireEffect, WireParameters, PVW_MATRIX_BINDING, WIRE_PARAMETERS_BINDING,
            },
        },
        scene::{
            culler::Culler,
            node::{GroupId, NodeId, SceneGraph, Visual},
        },
    },
    performance::FrameTimer,
};

/// Shader file of the wire-mesh program.
pub const WIRE_SHADER: &str = "wire_mesh.wgsl";

/// Degrees added or removed by one heading key press.
pub const HEADING_STEP_DEGREES: f32 = 60.0;

/// Anything that can drive a rig motion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Trigger {
    Key(KeyCode),
    /// One-tick impulse from mouse look.
    Mouse(Motion),
}

/// Default keyboard layout of the free-fly rig.
pub const KEY_BINDINGS: [(Motion, KeyCode); 10] = [
    (Motion::MoveForward, KeyCode::ArrowUp),
    (Motion::MoveBackward, KeyCode::ArrowDown),
    (Motion::MoveUp, KeyCode::Home),
    (Motion::MoveDown, KeyCode::End),
    (Motion::MoveRight, KeyCode::ArrowRight),
    (Motion::MoveLeft, KeyCode::ArrowLeft),
    (Motion::TurnRight, KeyCode::Delete),
    (Motion::TurnLeft, KeyCode::Insert),
    (Motion::LookUp, KeyCode::PageUp),
    (Motion::LookDown, KeyCode::PageDown),
];

const MOUSE_LOOK: [Motion; 4] = [
    Motion::TurnLeft,
    Motion::TurnRight,
    Motion::LookUp,
    Motion::LookDown,
];

pub struct WireMeshViewer {
    config: ViewerConfig,
    environment: Environment,
    camera: Camera,
    rig: CameraRig<Trigger>,
    trackball: Trackball,
    scene: SceneGraph,
    buffers: BufferPool,
    pvw: PvwMatrices,
    culler: Culler,
    timer: FrameTimer,
    program: ProgramId,
    wire_parameters: BufferId,
    width: u32,
    height: u32,
    heading_degrees: f32,
    impulses: Vec<Trigger>,
    last_cursor: Option<(i32, i32)>,
}

impl WireMeshViewer {
    /// Resolves the shader, compiles the wire program and builds the scene.
    ///
    /// Any failure means the viewer was not created; nothing is drawn.
    pub fn new<E: GraphicsEngine>(config: ViewerConfig, engine: &mut E) -> Result<Self, SetupError> {
        let environment = Environment::from_directories(&config.shader_dirs)?;
        let shader_path = environment.require(WIRE_SHADER)?;
        let program = engine.create_program(&shader_path).inspect_err(|error| {
            log::error!("{error}");
        })?;

        let settings = &config.camera;
        let mut camera = Camera::new(engine.has_depth_range_01());
        camera.set_frustum(
            settings.fov_y_degrees,
            config.aspect_ratio(),
            settings.near,
            settings.far,
        );
        camera.set_position(settings.position);
        camera.set_axes_orthonormal(settings.direction, settings.up);

        let mut rig = CameraRig::new(settings.translation_speed, settings.rotation_speed);
        for (motion, key) in KEY_BINDINGS {
            rig.register(motion, Trigger::Key(key));
        }
        for motion in MOUSE_LOOK {
            rig.register(motion, Trigger::Mouse(motion));
        }
        rig.compute_world_axes(&camera);

        engine.set_clear_color(config.clear_color);

        let mut buffers = BufferPool::new();
        let wire_parameters = buffers.create(ConstantBuffer::with_value(
            WIRE_PARAMETERS_BINDING,
            &WireParameters::new(
                config.mesh_color,
                config.edge_color,
                config.width,
                config.height,
            ),
        ));

        let direction = camera.direction();
        let heading_degrees = direction.x.atan2(direction.z).to_degrees().rem_euclid(360.0);

        let mut viewer = Self {
            trackball: Trackball::new(config.width, config.height),
            width: config.width,
            height: config.height,
            environment,
            camera,
            rig,
            scene: SceneGraph::new(),
            buffers,
            pvw: PvwMatrices::new(),
            culler: Culler::new(),
            timer: FrameTimer::new(),
            program,
            wire_parameters,
            heading_degrees,
            impulses: Vec::new(),
            last_cursor: None,
            config,
        };
        viewer.create_scene(engine);
        viewer.scene.update();
        viewer.pvw.update(&viewer.camera, &viewer.scene, &mut viewer.buffers);
        viewer
            .culler
            .compute_visible_set(&viewer.camera, &viewer.scene);

        log::info!(
            "Viewer created: {} visuals, {} visible",
            viewer.scene.visuals().count(),
            viewer.culler.visible_set().len()
        );
        Ok(viewer)
    }

    fn create_scene<E: GraphicsEngine>(&mut self, engine: &mut E) {
        let factory = MeshFactory;
        let root = self.scene.root();

        match self.config.layout {
            SceneLayout::Single => {
                let sphere_data = factory.create_sphere(16, 16, 1.0);
                let sphere = engine.create_mesh(&sphere_data);
                self.add_visual(root, "sphere", sphere, &sphere_data, [0.0, 0.0, 0.0]);
            }
            SceneLayout::Rings => {
                let sphere_data = factory.create_sphere(16, 16, 1.0);
                let torus_data = factory.create_torus(16, 16, 1.0, 0.5);
                let octahedron_data = factory.create_octahedron();
                let sphere = engine.create_mesh(&sphere_data);
                let torus = engine.create_mesh(&torus_data);
                let octahedron = engine.create_mesh(&octahedron_data);

                let front = self.scene.add_group(root, "front spheres");
                let back = self.scene.add_group(root, "back spheres");
                let tori = self.scene.add_group(root, "tori");
                let octahedra = self.scene.add_group(root, "octahedra");

                for i in 0..10 {
                    let offset = 2.0 * i as f32;
                    let name = format!("sphere {i}");
                    self.add_visual(front, &name, sphere, &sphere_data, [offset - 9.0, 0.0, 10.0]);
                    self.add_visual(back, &name, sphere, &sphere_data, [offset - 9.0, 0.0, -10.0]);
                    let name = format!("torus {i}");
                    self.add_visual(tori, &name, torus, &torus_data, [-9.0, 0.0, 9.0 - offset]);
                    let name = format!("octahedron {i}");
                    self.add_visual(
                        octahedra,
                        &name,
                        octahedron,
                        &octahedron_data,
                        [10.0, 0.0, 9.0 - offset],
                    );
                }
            }
        }
    }

    fn add_visual(
        &mut self,
        parent: GroupId,
        name: &str,
        mesh: MeshId,
        data: &MeshData,
        [x, y, z]: [f32; 3],
    ) {
        let Some(model_bound) = data.model_bound() else {
            log::warn!("Skipping empty mesh for {name}");
            return;
        };
        let pvw_matrix = self
            .buffers
            .create(ConstantBuffer::new(PVW_MATRIX_BINDING, PVW_MATRIX_SIZE));
        let visual = Visual {
            mesh,
            effect: WireEffect {
                program: self.program,
                parameters: self.wire_parameters,
                pvw_matrix,
            },
            model_bound,
        };

        let id = self.scene.attach_visual(parent, name, visual);
        if let Some(local) = self.scene.local_transform_mut(id) {
            local.set_translation(x, y, z);
        }
        self.pvw.subscribe(id, pvw_matrix);
    }

    /// One idle tick, timed by the viewer's own clock.
    pub fn on_idle<E: GraphicsEngine>(&mut self, engine: &mut E) {
        let elapsed = self.timer.measure();
        self.tick(engine, elapsed);
    }

    /// One idle tick with an explicit elapsed time in seconds.
    ///
    /// Moves the camera, refreshes the PVW matrices, culls against the moved
    /// camera and draws exactly the visible set followed by the frame rate.
    pub fn tick<E: GraphicsEngine>(&mut self, engine: &mut E, elapsed: f32) {
        self.rig.move_rig(&mut self.camera, elapsed);
        for trigger in self.impulses.drain(..) {
            self.rig.pop_motion(trigger);
        }

        self.pvw.update(&self.camera, &self.scene, &mut self.buffers);
        self.culler.compute_visible_set(&self.camera, &self.scene);

        engine.clear_buffers();
        self.buffers.flush(|id, buffer| engine.update(id, buffer));
        for &id in self.culler.visible_set() {
            if let Some(visual) = self.scene.visual(id) {
                engine.draw(visual);
            }
        }

        let text_y = self.height as i32 - 8;
        engine.draw_text(8, text_y, self.config.text_color, &self.timer.fps_text());
        engine.display_color_buffer();

        self.timer.update_frame_count();
    }

    pub fn on_resize(&mut self, width: u32, height: u32) {
        if width == 0 || height == 0 {
            return;
        }
        self.width = width;
        self.height = height;

        let frustum = self.camera.frustum();
        self.camera.set_frustum(
            frustum.fov_y_degrees,
            width as f32 / height as f32,
            frustum.near,
            frustum.far,
        );
        self.trackball.set_window_size(width, height);

        if let Some(buffer) = self.buffers.get_mut(self.wire_parameters) {
            if let Some(mut parameters) = buffer.get::<WireParameters>() {
                parameters.set_window_size(width, height);
                buffer.set(&parameters);
            }
        }

        self.pvw.update(&self.camera, &self.scene, &mut self.buffers);
        self.culler.compute_visible_set(&self.camera, &self.scene);
    }

    /// Character keys: `t`/`T` halve/double the translation speed, `r`/`R`
    /// the rotation speed, `p`/`o` step the heading.
    pub fn on_char_press(&mut self, key: char) -> bool {
        match key {
            't' => self
                .rig
                .set_translation_speed(self.rig.translation_speed() * 0.5),
            'T' => self
                .rig
                .set_translation_speed(self.rig.translation_speed() * 2.0),
            'r' => self.rig.set_rotation_speed(self.rig.rotation_speed() * 0.5),
            'R' => self.rig.set_rotation_speed(self.rig.rotation_speed() * 2.0),
            'p' => self.step_heading(HEADING_STEP_DEGREES),
            'o' => self.step_heading(-HEADING_STEP_DEGREES),
            _ => return false,
        }
        true
    }

    fn step_heading(&mut self, degrees: f32) {
        self.heading_degrees = (self.heading_degrees + degrees).rem_euclid(360.0);
        let (sin, cos) = self.heading_degrees.to_radians().sin_cos();
        self.camera
            .set_axes_orthonormal(Vector3::new(sin, 0.0, cos), Vector3::unit_y());
        self.rig.compute_world_axes(&self.camera);
        self.pvw.update(&self.camera, &self.scene, &mut self.buffers);
        log::debug!("Heading {:.0} degrees", self.heading_degrees);
    }

    pub fn on_key_down(&mut self, key: KeyCode) -> bool {
        self.rig.push_motion(Trigger::Key(key))
    }

    pub fn on_key_up(&mut self, key: KeyCode) -> bool {
        self.rig.pop_motion(Trigger::Key(key))
    }

    /// Left button press starts a trackball drag at `(x, y)` (pixels, origin
    /// top-left); release ends it.
    pub fn on_mouse_click(&mut self, button: MouseButton, pressed: bool, x: i32, y: i32) -> bool {
        if button != MouseButton::Left {
            return false;
        }

        self.last_cursor = Some((x, y));
        if pressed {
            self.trackball.set_active(true);
            self.trackball
                .set_initial_point(x, self.flip_y(y), &self.camera);
        } else {
            self.trackball.set_active(false);
        }
        true
    }

    /// Cursor motion: drags the trackball, or with mouse look enabled turns
    /// the camera for one tick along the dominant motion axis.
    pub fn on_mouse_motion(&mut self, x: i32, y: i32) -> bool {
        let previous = self.last_cursor.replace((x, y));

        if self.trackball.is_active() {
            let flipped = self.flip_y(y);
            if self.trackball.set_final_point(x, flipped, &mut self.camera) {
                self.rig.compute_world_axes(&self.camera);
                self.pvw.update(&self.camera, &self.scene, &mut self.buffers);
            }
            return true;
        }

        if !self.config.mouse_look {
            return false;
        }
        let Some((last_x, last_y)) = previous else {
            return false;
        };

        let (dx, dy) = (x - last_x, y - last_y);
        if dx == 0 && dy == 0 {
            return false;
        }
        let motion = if dx.abs() >= dy.abs() {
            if dx > 0 {
                Motion::TurnRight
            } else {
                Motion::TurnLeft
            }
        } else if dy > 0 {
            Motion::LookUp
        } else {
            Motion::LookDown
        };

        let trigger = Trigger::Mouse(motion);
        if self.rig.push_motion(trigger) && !self.impulses.contains(&trigger) {
            self.impulses.push(trigger);
        }
        true
    }

    /// Window lost focus: key releases will not arrive, so every held motion
    /// and pending impulse is dropped, and the clock restarts on the next tick.
    pub fn on_focus_lost(&mut self) {
        self.rig.clear_motions();
        self.impulses.clear();
        self.trackball.set_active(false);
        self.timer.reset();
    }

    /// Moves the camera and resynchronizes the rig and the PVW buffers.
    pub fn set_camera_frame(
        &mut self,
        position: Point3<f32>,
        direction: Vector3<f32>,
        up: Vector3<f32>,
    ) {
        self.camera.set_position(position);
        self.camera.set_axes_orthonormal(direction, up);
        self.rig.compute_world_axes(&self.camera);
        self.pvw.update(&self.camera, &self.scene, &mut self.buffers);
    }

    fn flip_y(&self, y: i32) -> i32 {
        self.height as i32 - 1 - y
    }

    pub fn config(&self) -> &ViewerConfig {
        &self.config
    }

    pub fn environment(&self) -> &Environment {
        &self.environment
    }

    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    pub fn rig(&self) -> &CameraRig<Trigger> {
        &self.rig
    }

    pub fn trackball(&self) -> &Trackball {
        &self.trackball
    }

    pub fn scene(&self) -> &SceneGraph {
        &self.scene
    }

    pub fn buffers(&self) -> &BufferPool {
        &self.buffers
    }

    pub fn pvw_matrices(&self) -> &PvwMatrices {
        &self.pvw
    }

    pub fn visible_set(&self) -> &[NodeId] {
        self.culler.visible_set()
    }

    pub fn wire_parameters(&self) -> BufferId {
        self.wire_parameters
    }

    pub fn heading_degrees(&self) -> f32 {
        self.heading_degrees
    }

    pub fn window_size(&self) -> (u32, u32) {
        (self.width, self.height)
    }
}
