use std::sync::Arc;
use winit::{
    application::ApplicationHandler,
    dpi::{PhysicalPosition, PhysicalSize},
    event::{ElementState, KeyEvent, WindowEvent},
    event_loop::{ActiveEventLoop, ControlFlow, EventLoop},
    keyboard::{KeyCode, PhysicalKey},
    window::{Window, WindowAttributes},
};

use crate::{
    config::ViewerConfig,
    error::SetupError,
    gfx::rendering::RenderEngine,
    viewer::WireMeshViewer,
};

/// Window shell around a [`WireMeshViewer`].
pub struct WireMeshApp {
    event_loop: EventLoop<()>,
    app_state: AppState,
}

struct AppState {
    config: ViewerConfig,
    window: Option<Arc<Window>>,
    render_engine: Option<RenderEngine>,
    viewer: Option<WireMeshViewer>,
    cursor: PhysicalPosition<f64>,
    setup_error: Option<SetupError>,
}

impl WireMeshApp {
    pub fn new(config: ViewerConfig) -> anyhow::Result<Self> {
        let event_loop = EventLoop::new()?;

        Ok(Self {
            event_loop,
            app_state: AppState {
                config,
                window: None,
                render_engine: None,
                viewer: None,
                cursor: PhysicalPosition::new(0.0, 0.0),
                setup_error: None,
            },
        })
    }

    /// Runs the event loop until the window closes. A viewer that could not
    /// be created ends the loop at once and its error is returned.
    pub fn run(mut self) -> anyhow::Result<()> {
        self.event_loop.set_control_flow(ControlFlow::Poll);
        self.event_loop.run_app(&mut self.app_state)?;

        match self.app_state.setup_error.take() {
            Some(error) => Err(error.into()),
            None => Ok(()),
        }
    }
}

impl AppState {
    fn create(&mut self, event_loop: &ActiveEventLoop) -> Result<(), SetupError> {
        let attributes = WindowAttributes::default()
            .with_title(self.config.title.clone())
            .with_inner_size(PhysicalSize::new(self.config.width, self.config.height));
        let window = event_loop
            .create_window(attributes)
            .map(Arc::new)
            .map_err(|e| SetupError::Surface(e.to_string()))?;
        self.window = Some(window.clone());

        let mut render_engine = pollster::block_on(RenderEngine::new(window))?;
        let (width, height) = render_engine.get_surface_size();
        let config = self.config.clone().with_size(width, height);
        let viewer = WireMeshViewer::new(config, &mut render_engine)?;

        self.render_engine = Some(render_engine);
        self.viewer = Some(viewer);
        Ok(())
    }

    fn cursor_pixels(&self) -> (i32, i32) {
        (self.cursor.x as i32, self.cursor.y as i32)
    }
}

impl ApplicationHandler for AppState {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }

        if let Err(error) = self.create(event_loop) {
            log::error!("Viewer not created: {error}");
            self.setup_error = Some(error);
            event_loop.exit();
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: winit::window::WindowId,
        event: WindowEvent,
    ) {
        let cursor = self.cursor_pixels();
        let (Some(render_engine), Some(viewer)) =
            (self.render_engine.as_mut(), self.viewer.as_mut())
        else {
            return;
        };

        match event {
            WindowEvent::CloseRequested => {
                event_loop.exit();
            }
            WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        physical_key: PhysicalKey::Code(key_code),
                        state,
                        text,
                        ..
                    },
                ..
            } => {
                if key_code == KeyCode::Escape {
                    event_loop.exit();
                    return;
                }
                match state {
                    ElementState::Pressed => {
                        viewer.on_key_down(key_code);
                        for key in text.iter().flat_map(|t| t.chars()) {
                            viewer.on_char_press(key);
                        }
                    }
                    ElementState::Released => {
                        viewer.on_key_up(key_code);
                    }
                }
            }
            WindowEvent::Focused(false) => {
                viewer.on_focus_lost();
            }
            WindowEvent::MouseInput { state, button, .. } => {
                let (x, y) = cursor;
                viewer.on_mouse_click(button, state == ElementState::Pressed, x, y);
            }
            WindowEvent::CursorMoved { position, .. } => {
                self.cursor = position;
                viewer.on_mouse_motion(position.x as i32, position.y as i32);
            }
            WindowEvent::Resized(PhysicalSize { width, height }) => {
                render_engine.resize(width, height);
                viewer.on_resize(width, height);
            }
            WindowEvent::RedrawRequested => {
                viewer.on_idle(render_engine);
            }
            _ => (),
        }
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(ref window) = self.window {
            window.request_redraw();
        }
    }
}
