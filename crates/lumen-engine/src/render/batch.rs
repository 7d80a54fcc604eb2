use crate::device::RawTexture;
use crate::state::BlendMode;

use super::{DrawItem, GpuContext, ObjectRenderer, QuadVertex};

/// Run of consecutive quads sharing texture and blend mode.
#[derive(Debug, Copy, Clone, PartialEq)]
struct Run {
    texture: Option<RawTexture>,
    blend_mode: BlendMode,
    start: usize,
    len: usize,
}

/// Quad batcher: buffers items in submission order and draws each run of
/// equal texture + blend mode with one call.
///
/// Performance characteristics:
/// - `render()` is O(1) amortised and never touches the GPU
/// - buffers keep their capacity across flushes
#[derive(Debug)]
pub struct SpriteBatch {
    name: &'static str,
    vertices: Vec<QuadVertex>,
    runs: Vec<Run>,
    draw_calls: u64,
}

impl Default for SpriteBatch {
    fn default() -> Self {
        Self::new()
    }
}

impl SpriteBatch {
    pub fn new() -> Self {
        Self::with_name("sprite")
    }

    pub fn with_name(name: &'static str) -> Self {
        Self {
            name,
            vertices: Vec::new(),
            runs: Vec::new(),
            draw_calls: 0,
        }
    }

    /// Quads buffered and not yet flushed.
    #[inline]
    pub fn pending(&self) -> usize {
        self.vertices.len() / 4
    }

    /// Draw calls issued since creation.
    #[inline]
    pub fn draw_calls(&self) -> u64 {
        self.draw_calls
    }
}

impl ObjectRenderer for SpriteBatch {
    fn name(&self) -> &'static str {
        self.name
    }

    fn render(&mut self, item: &DrawItem) {
        let start = self.vertices.len();
        self.vertices.extend_from_slice(&item.vertices);

        match self.runs.last_mut() {
            Some(run) if run.texture == item.texture && run.blend_mode == item.blend_mode => {
                run.len += 4;
            }
            _ => self.runs.push(Run {
                texture: item.texture,
                blend_mode: item.blend_mode,
                start,
                len: 4,
            }),
        }
    }

    fn flush(&mut self, gpu: &mut GpuContext<'_>) {
        if self.runs.is_empty() {
            return;
        }

        for run in &self.runs {
            gpu.state.set_blend_mode(&mut *gpu.driver, run.blend_mode);
            gpu.driver
                .draw_quads(run.texture, &self.vertices[run.start..run.start + run.len]);
        }

        self.draw_calls += self.runs.len() as u64;
        log::trace!("{}: flushed {} quads in {} draws", self.name, self.pending(), self.runs.len());

        self.vertices.clear();
        self.runs.clear();
    }

    fn discard(&mut self) {
        log::trace!("{}: dropped {} quads", self.name, self.pending());
        self.vertices.clear();
        self.runs.clear();
    }
}
