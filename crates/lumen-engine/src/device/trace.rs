use crate::coords::Vec2;
use crate::render::QuadVertex;
use crate::texture::{PixelSource, ScaleMode};

use super::{
    BlendFactor, Capability, ContextAttributes, GlDriver, RawFramebuffer, RawTexture,
    SamplerParams, StencilFunc, StencilOp, TextureDesc, Winding,
};

/// One recorded driver call.
#[derive(Debug, Clone, PartialEq)]
pub enum GlCall {
    Enable(Capability),
    Disable(Capability),
    FrontFace(Winding),
    BlendFunc(BlendFactor, BlendFactor),
    DisableVertexAttribArray(u32),
    UnbindVertexArray,
    UnpackFlipY(bool),
    Scissor { x: i32, y: i32, width: i32, height: i32 },
    ClearStencil,
    StencilFunc { func: StencilFunc, reference: u32, mask: u32 },
    StencilOp(StencilOp),
    ColorMask(bool),
    CreateTexture { texture: RawTexture, desc: TextureDesc },
    UploadTexture { texture: RawTexture, width: u32, height: u32, mip_levels: u32 },
    SetSampler { texture: RawTexture, params: SamplerParams },
    DeleteTexture(RawTexture),
    CreateRenderTarget { framebuffer: RawFramebuffer, texture: RawTexture, width: u32, height: u32 },
    ResizeRenderTarget { framebuffer: RawFramebuffer, width: u32, height: u32 },
    DeleteRenderTarget(RawFramebuffer),
    BindRenderTarget(Option<RawFramebuffer>),
    DrawGeometry { vertices: usize },
    DrawQuads { texture: Option<RawTexture>, vertices: usize },
}

impl GlCall {
    /// True for the enable/disable/winding/blend-function primitives the
    /// state tracker deduplicates.
    pub fn is_state_change(&self) -> bool {
        matches!(
            self,
            GlCall::Enable(Capability::Blend | Capability::DepthTest | Capability::CullFace)
                | GlCall::Disable(Capability::Blend | Capability::DepthTest | Capability::CullFace)
                | GlCall::FrontFace(_)
                | GlCall::BlendFunc(..)
        )
    }
}

/// Headless driver that records every primitive instead of executing it.
///
/// Names are handed out sequentially starting at 1, shared between textures
/// and framebuffers.
#[derive(Debug)]
pub struct TraceDriver {
    calls: Vec<GlCall>,
    extensions: Vec<String>,
    max_vertex_attribs: u32,
    attributes: ContextAttributes,
    next_name: u32,
}

impl Default for TraceDriver {
    fn default() -> Self {
        Self::new()
    }
}

impl TraceDriver {
    pub fn new() -> Self {
        Self {
            calls: Vec::new(),
            extensions: Vec::new(),
            max_vertex_attribs: 16,
            attributes: ContextAttributes::default(),
            next_name: 1,
        }
    }

    pub fn with_extension(mut self, name: impl Into<String>) -> Self {
        self.extensions.push(name.into());
        self
    }

    pub fn with_max_vertex_attribs(mut self, count: u32) -> Self {
        self.max_vertex_attribs = count;
        self
    }

    pub fn without_stencil(mut self) -> Self {
        self.attributes.stencil = false;
        self
    }

    #[inline]
    pub fn calls(&self) -> &[GlCall] {
        &self.calls
    }

    /// Returns and clears the recorded calls.
    pub fn take_calls(&mut self) -> Vec<GlCall> {
        std::mem::take(&mut self.calls)
    }

    pub fn clear(&mut self) {
        self.calls.clear();
    }

    pub fn count(&self, pred: impl Fn(&GlCall) -> bool) -> usize {
        self.calls.iter().filter(|c| pred(c)).count()
    }

    fn next_name(&mut self) -> u32 {
        let name = self.next_name;
        self.next_name += 1;
        name
    }
}

impl GlDriver for TraceDriver {
    fn context_attributes(&self) -> ContextAttributes {
        self.attributes
    }

    fn has_extension(&self, name: &str) -> bool {
        self.extensions.iter().any(|e| e == name)
    }

    fn max_vertex_attribs(&self) -> u32 {
        self.max_vertex_attribs
    }

    fn set_enabled(&mut self, capability: Capability, enabled: bool) {
        self.calls.push(if enabled {
            GlCall::Enable(capability)
        } else {
            GlCall::Disable(capability)
        });
    }

    fn front_face(&mut self, winding: Winding) {
        self.calls.push(GlCall::FrontFace(winding));
    }

    fn blend_func(&mut self, src: BlendFactor, dst: BlendFactor) {
        self.calls.push(GlCall::BlendFunc(src, dst));
    }

    fn disable_vertex_attrib_array(&mut self, index: u32) {
        self.calls.push(GlCall::DisableVertexAttribArray(index));
    }

    fn unbind_vertex_array(&mut self) {
        self.calls.push(GlCall::UnbindVertexArray);
    }

    fn set_unpack_flip_y(&mut self, flip: bool) {
        self.calls.push(GlCall::UnpackFlipY(flip));
    }

    fn scissor(&mut self, x: i32, y: i32, width: i32, height: i32) {
        self.calls.push(GlCall::Scissor { x, y, width, height });
    }

    fn clear_stencil(&mut self) {
        self.calls.push(GlCall::ClearStencil);
    }

    fn stencil_func(&mut self, func: StencilFunc, reference: u32, mask: u32) {
        self.calls.push(GlCall::StencilFunc { func, reference, mask });
    }

    fn stencil_op(&mut self, op: StencilOp) {
        self.calls.push(GlCall::StencilOp(op));
    }

    fn color_mask(&mut self, write: bool) {
        self.calls.push(GlCall::ColorMask(write));
    }

    fn create_texture(&mut self, desc: &TextureDesc) -> RawTexture {
        let texture = RawTexture(self.next_name());
        self.calls.push(GlCall::CreateTexture { texture, desc: *desc });
        texture
    }

    fn upload_texture(&mut self, texture: RawTexture, source: &PixelSource, mip_levels: u32) {
        self.calls.push(GlCall::UploadTexture {
            texture,
            width: source.width(),
            height: source.height(),
            mip_levels,
        });
    }

    fn set_sampler(&mut self, texture: RawTexture, params: SamplerParams) {
        self.calls.push(GlCall::SetSampler { texture, params });
    }

    fn delete_texture(&mut self, texture: RawTexture) {
        self.calls.push(GlCall::DeleteTexture(texture));
    }

    fn create_render_target(
        &mut self,
        width: u32,
        height: u32,
        _filter: ScaleMode,
    ) -> (RawFramebuffer, RawTexture) {
        let framebuffer = RawFramebuffer(self.next_name());
        let texture = RawTexture(self.next_name());
        self.calls.push(GlCall::CreateRenderTarget {
            framebuffer,
            texture,
            width,
            height,
        });
        (framebuffer, texture)
    }

    fn resize_render_target(&mut self, framebuffer: RawFramebuffer, width: u32, height: u32) {
        self.calls.push(GlCall::ResizeRenderTarget {
            framebuffer,
            width,
            height,
        });
    }

    fn delete_render_target(&mut self, framebuffer: RawFramebuffer) {
        self.calls.push(GlCall::DeleteRenderTarget(framebuffer));
    }

    fn bind_render_target(&mut self, framebuffer: Option<RawFramebuffer>) {
        self.calls.push(GlCall::BindRenderTarget(framebuffer));
    }

    fn draw_geometry(&mut self, triangles: &[Vec2]) {
        self.calls.push(GlCall::DrawGeometry {
            vertices: triangles.len(),
        });
    }

    fn draw_quads(&mut self, texture: Option<RawTexture>, vertices: &[QuadVertex]) {
        self.calls.push(GlCall::DrawQuads {
            texture,
            vertices: vertices.len(),
        });
    }
}
