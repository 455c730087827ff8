// src/ui/manager.rs
//! ImGui overlay manager
//!
//! Handles ImGui integration with wgpu and winit. The viewer uses it to
//! draw screen-space text (the frame rate) on top of the 3D scene.

use imgui::{Context, FontConfig, FontSource};
use imgui_wgpu::{Renderer, RendererConfig};
use imgui_winit_support::{HiDpiMode, WinitPlatform};
use std::time::Instant;
use wgpu::{CommandEncoder, Device, Queue, TextureFormat, TextureView};
use winit::window::Window;

/// A line of text queued for the next overlay pass.
#[derive(Debug, Clone, PartialEq)]
pub struct OverlayText {
    /// Left edge in pixels.
    pub x: f32,
    /// Baseline in pixels, origin top-left.
    pub y: f32,
    pub color: [f32; 4],
    pub text: String,
}

pub struct UiManager {
    pub context: Context,
    platform: WinitPlatform,
    renderer: Renderer,
    last_frame: Instant,
}

impl UiManager {
    pub fn new(
        device: &Device,
        queue: &Queue,
        output_color_format: TextureFormat,
        window: &Window,
    ) -> Self {
        let mut context = Context::create();
        context.set_ini_filename(None);

        let mut platform = WinitPlatform::new(&mut context);
        platform.attach_window(context.io_mut(), window, HiDpiMode::Locked(1.0));

        let font_size = 16.0;
        context.fonts().add_font(&[FontSource::DefaultFontData {
            config: Some(FontConfig {
                oversample_h: 1,
                pixel_snap_h: true,
                size_pixels: font_size,
                ..Default::default()
            }),
        }]);

        let renderer_config = RendererConfig {
            texture_format: output_color_format,
            ..Default::default()
        };
        let renderer = Renderer::new(&mut context, device, queue, renderer_config);

        Self {
            context,
            platform,
            renderer,
            last_frame: Instant::now(),
        }
    }

    pub fn update_display_size(&mut self, width: u32, height: u32) {
        self.context.io_mut().display_size = [width as f32, height as f32];
    }

    /// Builds an ImGui frame holding `texts` and renders it over
    /// `color_attachment`, keeping what is already there.
    pub fn draw_texts(
        &mut self,
        device: &Device,
        queue: &Queue,
        encoder: &mut CommandEncoder,
        window: &Window,
        color_attachment: &TextureView,
        texts: &[OverlayText],
    ) {
        let now = Instant::now();
        self.context
            .io_mut()
            .update_delta_time(now - self.last_frame);
        self.last_frame = now;

        if let Err(error) = self.platform.prepare_frame(self.context.io_mut(), window) {
            log::warn!("Skipping overlay, frame preparation failed: {error}");
            return;
        }

        let ui = self.context.frame();
        let line_height = ui.current_font_size();
        let draw_list = ui.get_foreground_draw_list();
        for item in texts {
            draw_list.add_text([item.x, item.y - line_height], item.color, &item.text);
        }
        drop(draw_list);
        self.platform.prepare_render(ui, window);

        let draw_data = self.context.render();
        if draw_data.display_size[0] <= 0.0 || draw_data.display_size[1] <= 0.0 {
            return;
        }

        let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("overlay_render_pass"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view: color_attachment,
                resolve_target: None,
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Load,
                    store: wgpu::StoreOp::Store,
                },
            })],
            depth_stencil_attachment: None,
            timestamp_writes: None,
            occlusion_query_set: None,
        });

        if let Err(error) = self
            .renderer
            .render(draw_data, queue, device, &mut render_pass)
        {
            log::warn!("Overlay render failed: {error}");
        }
    }
}
