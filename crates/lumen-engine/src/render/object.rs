use crate::device::{GlDriver, RawTexture};
use crate::state::{BlendMode, StateTracker};

use super::QuadVertex;

/// Driver and state tracker, borrowed together for the duration of a call.
pub struct GpuContext<'a> {
    pub driver: &'a mut dyn GlDriver,
    pub state: &'a mut StateTracker,
}

impl<'a> GpuContext<'a> {
    #[inline]
    pub fn new(driver: &'a mut dyn GlDriver, state: &'a mut StateTracker) -> Self {
        Self { driver, state }
    }
}

/// One object's geometry, resolved against the current context.
#[derive(Debug, Clone, PartialEq)]
pub struct DrawItem {
    /// Resident texture, or `None` for untextured geometry.
    pub texture: Option<RawTexture>,
    pub blend_mode: BlendMode,
    pub vertices: [QuadVertex; 4],
}

/// A batch-type rendering plugin.
///
/// The renderer keeps exactly one plugin active. Before any subsystem changes
/// global GPU state (masks, render targets) it calls [`stop`](Self::stop) on
/// the active plugin so no buffered geometry is drawn under the wrong state.
pub trait ObjectRenderer {
    /// Lookup key used by [`Drawable::plugin`](super::Drawable::plugin).
    fn name(&self) -> &'static str;

    /// Called when the plugin becomes active.
    fn start(&mut self, _gpu: &mut GpuContext<'_>) {}

    /// Buffers one object. Must not touch the GPU.
    fn render(&mut self, item: &DrawItem);

    /// Draws everything buffered and clears the buffer.
    fn flush(&mut self, gpu: &mut GpuContext<'_>);

    fn stop(&mut self, gpu: &mut GpuContext<'_>) {
        self.flush(gpu);
    }

    /// Drops buffered objects without drawing them. Called when the context
    /// they were buffered for is gone.
    fn discard(&mut self) {}
}
