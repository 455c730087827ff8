//! CPU-side constant buffers.
//!
//! Shader constants are written here first and uploaded to the graphics
//! engine in a batch once per frame. Each buffer tracks whether it changed
//! since its last upload.

use bytemuck::Pod;

/// Handle to a [`ConstantBuffer`] inside a [`BufferPool`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BufferId(usize);

impl BufferId {
    pub fn new(index: usize) -> Self {
        Self(index)
    }

    pub fn index(self) -> usize {
        self.0
    }
}

#[derive(Debug, Clone)]
pub struct ConstantBuffer {
    label: String,
    data: Vec<u8>,
    dirty: bool,
}

impl ConstantBuffer {
    /// Zero-filled buffer of `size` bytes.
    pub fn new(label: &str, size: usize) -> Self {
        Self {
            label: label.to_string(),
            data: vec![0; size],
            dirty: true,
        }
    }

    pub fn with_value<T: Pod>(label: &str, value: &T) -> Self {
        Self {
            label: label.to_string(),
            data: bytemuck::bytes_of(value).to_vec(),
            dirty: true,
        }
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn size(&self) -> usize {
        self.data.len()
    }

    /// Overwrites the contents with `value`, resizing to fit.
    pub fn set<T: Pod>(&mut self, value: &T) {
        let bytes = bytemuck::bytes_of(value);
        self.data.clear();
        self.data.extend_from_slice(bytes);
        self.dirty = true;
    }

    /// Reads the contents back as `T`, or `None` when the sizes differ.
    pub fn get<T: Pod>(&self) -> Option<T> {
        (self.data.len() == std::mem::size_of::<T>())
            .then(|| bytemuck::pod_read_unaligned(&self.data))
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn mark_clean(&mut self) {
        self.dirty = false;
    }
}

/// Owns every constant buffer of a scene.
#[derive(Debug, Clone, Default)]
pub struct BufferPool {
    buffers: Vec<ConstantBuffer>,
}

impl BufferPool {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn create(&mut self, buffer: ConstantBuffer) -> BufferId {
        self.buffers.push(buffer);
        BufferId(self.buffers.len() - 1)
    }

    pub fn get(&self, id: BufferId) -> Option<&ConstantBuffer> {
        self.buffers.get(id.0)
    }

    pub fn get_mut(&mut self, id: BufferId) -> Option<&mut ConstantBuffer> {
        self.buffers.get_mut(id.0)
    }

    pub fn len(&self) -> usize {
        self.buffers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buffers.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (BufferId, &ConstantBuffer)> {
        self.buffers
            .iter()
            .enumerate()
            .map(|(index, buffer)| (BufferId(index), buffer))
    }

    /// Hands every dirty buffer to `upload` and marks it clean. Returns the
    /// number of buffers uploaded.
    pub fn flush(&mut self, mut upload: impl FnMut(BufferId, &ConstantBuffer)) -> usize {
        let mut count = 0;
        for (index, buffer) in self.buffers.iter_mut().enumerate() {
            if buffer.dirty {
                upload(BufferId(index), buffer);
                buffer.dirty = false;
                count += 1;
            }
        }
        count
    }
}
