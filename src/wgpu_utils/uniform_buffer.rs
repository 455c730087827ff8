// src/wgpu_utils/uniform_buffer.rs
//! GPU mirror of a CPU-side constant buffer.

/// A uniform buffer written from raw bytes.
///
/// Writes whose contents match the previous upload are skipped.
pub struct UniformBuffer {
    buffer: wgpu::Buffer,
    previous_content: Vec<u8>,
}

impl UniformBuffer {
    pub fn new(device: &wgpu::Device, label: &str, size: usize) -> Self {
        let buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some(&format!("UniformBuffer: {label}")),
            size: size as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        UniformBuffer {
            buffer,
            previous_content: Vec::new(),
        }
    }

    pub fn update_content(&mut self, queue: &wgpu::Queue, content: &[u8]) {
        if self.previous_content == content {
            return;
        }
        self.force_update_content(queue, content);
    }

    pub fn force_update_content(&mut self, queue: &wgpu::Queue, content: &[u8]) {
        queue.write_buffer(&self.buffer, 0, content);
        self.previous_content.clear();
        self.previous_content.extend_from_slice(content);
    }

    pub fn binding_resource(&self) -> wgpu::BindingResource<'_> {
        self.buffer.as_entire_binding()
    }

    pub fn size(&self) -> u64 {
        self.buffer.size()
    }
}
