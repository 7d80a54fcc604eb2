use super::{ContextAttributes, GlDriver};

/// Vertex-array-object extension names, in lookup order.
pub const VAO_EXTENSIONS: [&str; 3] = [
    "OES_vertex_array_object",
    "MOZ_OES_vertex_array_object",
    "WEBKIT_OES_vertex_array_object",
];

/// What the context can do, queried once at creation.
///
/// Immutable afterwards; a restored context is renegotiated from scratch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Capabilities {
    /// Name of the VAO extension found, if any.
    pub vao_extension: Option<&'static str>,
    pub max_vertex_attribs: u32,
    pub attributes: ContextAttributes,
}

impl Capabilities {
    pub fn negotiate(driver: &dyn GlDriver) -> Self {
        let vao_extension = VAO_EXTENSIONS
            .iter()
            .copied()
            .find(|name| driver.has_extension(name));

        let caps = Self {
            vao_extension,
            max_vertex_attribs: driver.max_vertex_attribs(),
            attributes: driver.context_attributes(),
        };

        log::debug!(
            "context caps: vao={:?} max_attribs={} stencil={}",
            caps.vao_extension,
            caps.max_vertex_attribs,
            caps.attributes.stencil
        );

        caps
    }

    #[inline]
    pub fn has_vao(&self) -> bool {
        self.vao_extension.is_some()
    }
}

/// Surfaces advisory problems with the context.
///
/// Returns `false` when something was reported. Rendering proceeds either way.
pub fn validate_context(caps: &Capabilities) -> bool {
    if !caps.attributes.stencil {
        log::warn!(
            "provided context does not have a stencil buffer, masks may not render correctly"
        );
        return false;
    }
    true
}
