use crate::coords::Vec2;
use crate::render::QuadVertex;
use crate::texture::{PixelSource, ScaleMode, WrapMode};

/// Fixed-function switches toggled with enable/disable.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum Capability {
    Blend,
    DepthTest,
    CullFace,
    ScissorTest,
    StencilTest,
}

/// Front-face winding order.
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq, Hash)]
pub enum Winding {
    #[default]
    Ccw,
    Cw,
}

#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum BlendFactor {
    Zero,
    One,
    SrcColor,
    OneMinusSrcColor,
    SrcAlpha,
    OneMinusSrcAlpha,
    DstColor,
    OneMinusDstColor,
    DstAlpha,
    OneMinusDstAlpha,
}

#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum StencilFunc {
    Always,
    Equal,
    NotEqual,
}

/// Operation applied when both stencil and depth tests pass.
/// Failing fragments always keep the stored value.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum StencilOp {
    Keep,
    Incr,
    Decr,
}

/// Driver-side texture name. Only meaningful to the driver that issued it.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct RawTexture(pub u32);

/// Driver-side framebuffer name backing a render target.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct RawFramebuffer(pub u32);

/// Storage parameters fixed at texture creation.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct TextureDesc {
    pub width: u32,
    pub height: u32,
    /// 1 for no mip chain.
    pub mip_levels: u32,
    /// Multiply RGB by alpha while uploading.
    pub premultiplied_alpha: bool,
}

/// Sampling parameters applied to a texture after upload.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct SamplerParams {
    pub wrap: WrapMode,
    pub filter: ScaleMode,
    pub mipmapped: bool,
}

/// Attributes the context was created with.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct ContextAttributes {
    pub stencil: bool,
    pub depth: bool,
    pub antialias: bool,
}

impl Default for ContextAttributes {
    fn default() -> Self {
        Self {
            stencil: true,
            depth: false,
            antialias: false,
        }
    }
}

/// Low-level GPU primitives.
///
/// One method per driver call. Implementations must not deduplicate; the
/// state tracker above them is responsible for that, and tests count calls
/// at this layer.
pub trait GlDriver {
    // ── capability queries ───────────────────────────────────────────────

    fn context_attributes(&self) -> ContextAttributes;
    fn has_extension(&self, name: &str) -> bool;
    fn max_vertex_attribs(&self) -> u32;

    // ── fixed-function state ─────────────────────────────────────────────

    fn set_enabled(&mut self, capability: Capability, enabled: bool);
    fn front_face(&mut self, winding: Winding);
    fn blend_func(&mut self, src: BlendFactor, dst: BlendFactor);
    fn disable_vertex_attrib_array(&mut self, index: u32);
    /// Unbinds the current vertex array object through the VAO extension.
    fn unbind_vertex_array(&mut self);
    fn set_unpack_flip_y(&mut self, flip: bool);
    /// Scissor rectangle in device pixels, origin bottom-left.
    fn scissor(&mut self, x: i32, y: i32, width: i32, height: i32);

    // ── stencil ──────────────────────────────────────────────────────────

    fn clear_stencil(&mut self);
    fn stencil_func(&mut self, func: StencilFunc, reference: u32, mask: u32);
    fn stencil_op(&mut self, op: StencilOp);
    fn color_mask(&mut self, write: bool);

    // ── textures ─────────────────────────────────────────────────────────

    fn create_texture(&mut self, desc: &TextureDesc) -> RawTexture;
    /// Uploads `source` as level 0 and fills `mip_levels - 1` further levels.
    /// Storage is reallocated when the size or level count differs from the
    /// texture's current storage.
    fn upload_texture(&mut self, texture: RawTexture, source: &PixelSource, mip_levels: u32);
    fn set_sampler(&mut self, texture: RawTexture, params: SamplerParams);
    fn delete_texture(&mut self, texture: RawTexture);

    /// Creates a framebuffer with a colour texture of `width`×`height` device pixels.
    fn create_render_target(
        &mut self,
        width: u32,
        height: u32,
        filter: ScaleMode,
    ) -> (RawFramebuffer, RawTexture);
    /// Reallocates the colour storage of an existing render target.
    fn resize_render_target(&mut self, framebuffer: RawFramebuffer, width: u32, height: u32);
    /// Frees the framebuffer and its colour texture.
    fn delete_render_target(&mut self, framebuffer: RawFramebuffer);
    /// Directs subsequent draws into `framebuffer`, or into the default
    /// (screen) target for `None`.
    fn bind_render_target(&mut self, framebuffer: Option<RawFramebuffer>);

    // ── draws ────────────────────────────────────────────────────────────

    /// Draws a triangle list with the current state (stencil geometry).
    fn draw_geometry(&mut self, triangles: &[Vec2]);
    /// Draws textured quads (4 vertices each) with the current state.
    fn draw_quads(&mut self, texture: Option<RawTexture>, vertices: &[QuadVertex]);
}
