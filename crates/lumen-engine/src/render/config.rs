use crate::coords::Viewport;
use crate::state::RenderState;

/// Renderer configuration.
///
/// Keep this structure small. Values apply for the renderer's lifetime.
#[derive(Debug, Clone, PartialEq)]
pub struct RendererConfig {
    /// Device pixels per logical pixel.
    pub resolution: f32,

    /// Clip axis-aligned rectangular masks with the scissor test instead of
    /// the stencil buffer.
    pub enable_scissor: bool,

    /// Logical size of the screen (root) target.
    pub screen: Viewport,

    /// State applied at creation and after a context restore.
    pub default_state: RenderState,
}

impl Default for RendererConfig {
    fn default() -> Self {
        Self {
            resolution: 1.0,
            enable_scissor: true,
            screen: Viewport::new(800.0, 600.0),
            default_state: RenderState::default(),
        }
    }
}
