//! [`GlDriver`] over wgpu.
//!
//! wgpu has no global fixed-function state: blending, culling, winding and
//! stencil testing are baked into render pipelines, and scissor is a render
//! pass command. This driver therefore tracks the state the core asks for and
//! exposes it as a [`PipelineKey`]; every draw is recorded as a [`DrawCall`]
//! carrying the key that was current when it was issued. The pipeline owner
//! (shaders are not this crate's concern) replays draw calls into its passes.
//!
//! Textures and render targets are real wgpu resources.

use std::collections::HashMap;

use anyhow::Result;
use bytemuck::{Pod, Zeroable};

use crate::coords::Vec2;
use crate::render::QuadVertex;
use crate::texture::{mip_level_count, PixelSource, ScaleMode, WrapMode};

use super::{
    BlendFactor, Capability, ContextAttributes, GlDriver, Gpu, RawFramebuffer, RawTexture,
    SamplerParams, StencilFunc, StencilOp, TextureDesc, Winding,
};

const TEXTURE_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Rgba8Unorm;

// ── pipeline key ──────────────────────────────────────────────────────────

/// Stencil configuration folded from `stencil_func` / `stencil_op` calls.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct StencilKey {
    pub func: StencilFunc,
    pub reference: u32,
    pub mask: u32,
    pub pass_op: StencilOp,
}

/// Snapshot of the fixed-function state a draw was issued under.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct PipelineKey {
    /// `None` when blending is disabled.
    pub blend: Option<(BlendFactor, BlendFactor)>,
    pub depth_test: bool,
    pub cull_face: bool,
    pub front_face: Winding,
    /// `None` when the stencil test is disabled.
    pub stencil: Option<StencilKey>,
    pub color_write: bool,
}

impl PipelineKey {
    pub fn blend_state(&self) -> Option<wgpu::BlendState> {
        self.blend.map(|(src, dst)| {
            let component = wgpu::BlendComponent {
                src_factor: map_blend_factor(src),
                dst_factor: map_blend_factor(dst),
                operation: wgpu::BlendOperation::Add,
            };
            wgpu::BlendState {
                color: component,
                alpha: component,
            }
        })
    }

    pub fn primitive_state(&self) -> wgpu::PrimitiveState {
        wgpu::PrimitiveState {
            topology: wgpu::PrimitiveTopology::TriangleList,
            strip_index_format: None,
            front_face: match self.front_face {
                Winding::Ccw => wgpu::FrontFace::Ccw,
                Winding::Cw => wgpu::FrontFace::Cw,
            },
            cull_mode: self.cull_face.then_some(wgpu::Face::Back),
            polygon_mode: wgpu::PolygonMode::Fill,
            unclipped_depth: false,
            conservative: false,
        }
    }

    pub fn depth_compare(&self) -> wgpu::CompareFunction {
        if self.depth_test {
            wgpu::CompareFunction::Less
        } else {
            wgpu::CompareFunction::Always
        }
    }

    /// Stencil state for a depth/stencil attachment. Disabled stencil maps to
    /// an always-pass, never-write state.
    pub fn stencil_state(&self) -> wgpu::StencilState {
        let Some(stencil) = self.stencil else {
            return wgpu::StencilState {
                front: wgpu::StencilFaceState::IGNORE,
                back: wgpu::StencilFaceState::IGNORE,
                read_mask: 0,
                write_mask: 0,
            };
        };

        let face = wgpu::StencilFaceState {
            compare: match stencil.func {
                StencilFunc::Always => wgpu::CompareFunction::Always,
                StencilFunc::Equal => wgpu::CompareFunction::Equal,
                StencilFunc::NotEqual => wgpu::CompareFunction::NotEqual,
            },
            fail_op: wgpu::StencilOperation::Keep,
            depth_fail_op: wgpu::StencilOperation::Keep,
            pass_op: match stencil.pass_op {
                StencilOp::Keep => wgpu::StencilOperation::Keep,
                StencilOp::Incr => wgpu::StencilOperation::IncrementClamp,
                StencilOp::Decr => wgpu::StencilOperation::DecrementClamp,
            },
        };

        wgpu::StencilState {
            front: face,
            back: face,
            read_mask: stencil.mask,
            write_mask: 0xff,
        }
    }

    /// Reference value to pass to `set_stencil_reference`.
    pub fn stencil_reference(&self) -> u32 {
        self.stencil.map_or(0, |s| s.reference)
    }

    pub fn color_writes(&self) -> wgpu::ColorWrites {
        if self.color_write {
            wgpu::ColorWrites::ALL
        } else {
            wgpu::ColorWrites::empty()
        }
    }
}

fn map_blend_factor(f: BlendFactor) -> wgpu::BlendFactor {
    match f {
        BlendFactor::Zero => wgpu::BlendFactor::Zero,
        BlendFactor::One => wgpu::BlendFactor::One,
        BlendFactor::SrcColor => wgpu::BlendFactor::Src,
        BlendFactor::OneMinusSrcColor => wgpu::BlendFactor::OneMinusSrc,
        BlendFactor::SrcAlpha => wgpu::BlendFactor::SrcAlpha,
        BlendFactor::OneMinusSrcAlpha => wgpu::BlendFactor::OneMinusSrcAlpha,
        BlendFactor::DstColor => wgpu::BlendFactor::Dst,
        BlendFactor::OneMinusDstColor => wgpu::BlendFactor::OneMinusDst,
        BlendFactor::DstAlpha => wgpu::BlendFactor::DstAlpha,
        BlendFactor::OneMinusDstAlpha => wgpu::BlendFactor::OneMinusDstAlpha,
    }
}

// ── draw calls ────────────────────────────────────────────────────────────

/// Scissor rectangle as issued by the core: device pixels, origin bottom-left.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct ScissorRect {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl ScissorRect {
    /// Converts to wgpu's top-left origin for a target `target_height` pixels
    /// tall. Returns `None` for an empty rectangle.
    pub fn to_top_left(self, target_width: u32, target_height: u32) -> Option<(u32, u32, u32, u32)> {
        let x0 = self.x.clamp(0, target_width as i32);
        let x1 = (self.x + self.width).clamp(0, target_width as i32);
        let top = (target_height as i32 - self.y - self.height).clamp(0, target_height as i32);
        let bottom = (target_height as i32 - self.y).clamp(0, target_height as i32);

        let w = x1 - x0;
        let h = bottom - top;
        if w <= 0 || h <= 0 {
            None
        } else {
            Some((x0 as u32, top as u32, w as u32, h as u32))
        }
    }
}

#[repr(C)]
#[derive(Debug, Copy, Clone, Pod, Zeroable)]
struct GeometryVertex {
    pos: [f32; 2],
}

#[derive(Debug, Clone)]
pub enum DrawGeometry {
    /// Untextured triangle list (stencil writes).
    Triangles(Vec<Vec2>),
    /// Textured quads, 4 vertices each.
    Quads(Vec<QuadVertex>),
}

/// One recorded draw, ready to be replayed by a pipeline owner.
#[derive(Debug, Clone)]
pub struct DrawCall {
    /// Render target drawn into; `None` for the screen.
    pub target: Option<RawFramebuffer>,
    pub key: PipelineKey,
    /// `None` when the scissor test was disabled.
    pub scissor: Option<ScissorRect>,
    pub texture: Option<RawTexture>,
    pub geometry: DrawGeometry,
}

impl DrawCall {
    /// Vertex data laid out for a vertex buffer upload.
    pub fn vertex_bytes(&self) -> Vec<u8> {
        match &self.geometry {
            DrawGeometry::Triangles(points) => {
                let verts: Vec<GeometryVertex> = points
                    .iter()
                    .map(|p| GeometryVertex { pos: [p.x, p.y] })
                    .collect();
                bytemuck::cast_slice(&verts).to_vec()
            }
            DrawGeometry::Quads(quads) => bytemuck::cast_slice(quads).to_vec(),
        }
    }
}

// ── resources ─────────────────────────────────────────────────────────────

struct TextureSlot {
    texture: wgpu::Texture,
    view: wgpu::TextureView,
    desc: TextureDesc,
    sampler: Option<SamplerParams>,
}

#[derive(Debug, Copy, Clone)]
struct FixedFunction {
    blend: bool,
    blend_factors: (BlendFactor, BlendFactor),
    depth_test: bool,
    cull_face: bool,
    front_face: Winding,
    stencil_test: bool,
    stencil: StencilKey,
    color_write: bool,
    scissor_test: bool,
    scissor: ScissorRect,
    flip_y: bool,
    target: Option<RawFramebuffer>,
}

impl Default for FixedFunction {
    fn default() -> Self {
        // GL initial state.
        Self {
            blend: false,
            blend_factors: (BlendFactor::One, BlendFactor::Zero),
            depth_test: false,
            cull_face: false,
            front_face: Winding::Ccw,
            stencil_test: false,
            stencil: StencilKey {
                func: StencilFunc::Always,
                reference: 0,
                mask: 0xff,
                pass_op: StencilOp::Keep,
            },
            color_write: true,
            scissor_test: false,
            scissor: ScissorRect {
                x: 0,
                y: 0,
                width: 0,
                height: 0,
            },
            flip_y: false,
            target: None,
        }
    }
}

/// wgpu-backed driver for one device.
pub struct WgpuDriver {
    device: wgpu::Device,
    queue: wgpu::Queue,
    attributes: ContextAttributes,
    max_vertex_attribs: u32,

    state: FixedFunction,

    textures: HashMap<u32, TextureSlot>,
    render_targets: HashMap<u32, u32>,
    samplers: HashMap<SamplerParams, wgpu::Sampler>,
    next_name: u32,

    draws: Vec<DrawCall>,
}

impl WgpuDriver {
    pub fn new(gpu: &Gpu) -> Result<Self> {
        let limits = gpu.device().limits();
        anyhow::ensure!(
            limits.max_vertex_attributes > 0,
            "device reports no vertex attributes"
        );

        Ok(Self {
            device: gpu.device().clone(),
            queue: gpu.queue().clone(),
            attributes: ContextAttributes {
                stencil: gpu.has_stencil(),
                depth: gpu.has_stencil(),
                antialias: false,
            },
            max_vertex_attribs: limits.max_vertex_attributes,
            state: FixedFunction::default(),
            textures: HashMap::new(),
            render_targets: HashMap::new(),
            samplers: HashMap::new(),
            next_name: 1,
            draws: Vec::new(),
        })
    }

    /// Fixed-function state as it stands now.
    pub fn pipeline_key(&self) -> PipelineKey {
        let s = &self.state;
        PipelineKey {
            blend: s.blend.then_some(s.blend_factors),
            depth_test: s.depth_test,
            cull_face: s.cull_face,
            front_face: s.front_face,
            stencil: s.stencil_test.then_some(s.stencil),
            color_write: s.color_write,
        }
    }

    /// Returns and clears the draws recorded since the last call.
    pub fn take_draw_calls(&mut self) -> Vec<DrawCall> {
        std::mem::take(&mut self.draws)
    }

    pub fn texture_view(&self, texture: RawTexture) -> Option<&wgpu::TextureView> {
        self.textures.get(&texture.0).map(|slot| &slot.view)
    }

    pub fn sampler(&self, texture: RawTexture) -> Option<&wgpu::Sampler> {
        let params = self.textures.get(&texture.0)?.sampler?;
        self.samplers.get(&params)
    }

    /// Colour view of a render target, for use as a pass attachment.
    pub fn render_target_view(&self, framebuffer: RawFramebuffer) -> Option<&wgpu::TextureView> {
        let texture = *self.render_targets.get(&framebuffer.0)?;
        self.textures.get(&texture).map(|slot| &slot.view)
    }

    pub fn texture_count(&self) -> usize {
        self.textures.len()
    }

    fn next_name(&mut self) -> u32 {
        let name = self.next_name;
        self.next_name += 1;
        name
    }

    fn allocate(&self, desc: &TextureDesc, usage: wgpu::TextureUsages, label: &str) -> TextureSlot {
        let texture = self.device.create_texture(&wgpu::TextureDescriptor {
            label: Some(label),
            size: wgpu::Extent3d {
                width: desc.width.max(1),
                height: desc.height.max(1),
                depth_or_array_layers: 1,
            },
            mip_level_count: desc.mip_levels.max(1),
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: TEXTURE_FORMAT,
            usage,
            view_formats: &[],
        });
        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());

        TextureSlot {
            texture,
            view,
            desc: *desc,
            sampler: None,
        }
    }

    fn write_level(&self, texture: &wgpu::Texture, level: u32, width: u32, height: u32, data: &[u8]) {
        self.queue.write_texture(
            wgpu::TexelCopyTextureInfo {
                texture,
                mip_level: level,
                origin: wgpu::Origin3d::ZERO,
                aspect: wgpu::TextureAspect::All,
            },
            data,
            wgpu::TexelCopyBufferLayout {
                offset: 0,
                bytes_per_row: Some(4 * width),
                rows_per_image: Some(height),
            },
            wgpu::Extent3d {
                width,
                height,
                depth_or_array_layers: 1,
            },
        );
    }

    fn record(&mut self, texture: Option<RawTexture>, geometry: DrawGeometry) {
        let scissor = self.state.scissor_test.then_some(self.state.scissor);
        self.draws.push(DrawCall {
            target: self.state.target,
            key: self.pipeline_key(),
            scissor,
            texture,
            geometry,
        });
    }
}

impl GlDriver for WgpuDriver {
    fn context_attributes(&self) -> ContextAttributes {
        self.attributes
    }

    fn has_extension(&self, name: &str) -> bool {
        // Vertex layouts live in pipelines, which is what the VAO extension
        // emulates on GL.
        name == super::VAO_EXTENSIONS[0]
    }

    fn max_vertex_attribs(&self) -> u32 {
        self.max_vertex_attribs
    }

    fn set_enabled(&mut self, capability: Capability, enabled: bool) {
        match capability {
            Capability::Blend => self.state.blend = enabled,
            Capability::DepthTest => self.state.depth_test = enabled,
            Capability::CullFace => self.state.cull_face = enabled,
            Capability::ScissorTest => self.state.scissor_test = enabled,
            Capability::StencilTest => self.state.stencil_test = enabled,
        }
    }

    fn front_face(&mut self, winding: Winding) {
        self.state.front_face = winding;
    }

    fn blend_func(&mut self, src: BlendFactor, dst: BlendFactor) {
        self.state.blend_factors = (src, dst);
    }

    fn disable_vertex_attrib_array(&mut self, _index: u32) {}

    fn unbind_vertex_array(&mut self) {}

    fn set_unpack_flip_y(&mut self, flip: bool) {
        self.state.flip_y = flip;
    }

    fn scissor(&mut self, x: i32, y: i32, width: i32, height: i32) {
        self.state.scissor = ScissorRect { x, y, width, height };
    }

    fn clear_stencil(&mut self) {
        // The pipeline owner clears the attachment when it opens the next pass.
        log::trace!("stencil clear requested");
    }

    fn stencil_func(&mut self, func: StencilFunc, reference: u32, mask: u32) {
        self.state.stencil.func = func;
        self.state.stencil.reference = reference;
        self.state.stencil.mask = mask;
    }

    fn stencil_op(&mut self, op: StencilOp) {
        self.state.stencil.pass_op = op;
    }

    fn color_mask(&mut self, write: bool) {
        self.state.color_write = write;
    }

    fn create_texture(&mut self, desc: &TextureDesc) -> RawTexture {
        let name = self.next_name();
        let slot = self.allocate(
            desc,
            wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
            "lumen texture",
        );
        self.textures.insert(name, slot);
        RawTexture(name)
    }

    fn upload_texture(&mut self, texture: RawTexture, source: &PixelSource, mip_levels: u32) {
        let Some(slot) = self.textures.get(&texture.0) else {
            log::warn!("upload to unknown texture {}", texture.0);
            return;
        };
        let mut desc = slot.desc;
        let mip_levels = mip_levels.clamp(1, mip_level_count(source.width(), source.height()));

        if desc.width != source.width()
            || desc.height != source.height()
            || desc.mip_levels != mip_levels
        {
            // Size or mip chain changed since creation; reallocate storage.
            desc.width = source.width();
            desc.height = source.height();
            desc.mip_levels = mip_levels;
            let mut fresh = self.allocate(
                &desc,
                wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
                "lumen texture",
            );
            fresh.sampler = slot.sampler;
            if let Some(old) = self.textures.insert(texture.0, fresh) {
                old.texture.destroy();
            }
        }

        let mut pixels = source.pixels().to_vec();
        if self.state.flip_y {
            flip_rows(&mut pixels, source.width(), source.height());
        }
        if desc.premultiplied_alpha {
            premultiply(&mut pixels);
        }

        let Some(slot) = self.textures.get(&texture.0) else {
            return;
        };

        let (mut w, mut h) = (source.width(), source.height());
        self.write_level(&slot.texture, 0, w, h, &pixels);

        for level in 1..desc.mip_levels {
            let (next, nw, nh) = downsample(&pixels, w, h);
            self.write_level(&slot.texture, level, nw, nh, &next);
            pixels = next;
            w = nw;
            h = nh;
        }
    }

    fn set_sampler(&mut self, texture: RawTexture, params: SamplerParams) {
        let Some(slot) = self.textures.get_mut(&texture.0) else {
            return;
        };
        slot.sampler = Some(params);

        if !self.samplers.contains_key(&params) {
            let address = match params.wrap {
                WrapMode::Clamp => wgpu::AddressMode::ClampToEdge,
                WrapMode::Repeat => wgpu::AddressMode::Repeat,
                WrapMode::MirroredRepeat => wgpu::AddressMode::MirrorRepeat,
            };
            let filter = match params.filter {
                ScaleMode::Linear => wgpu::FilterMode::Linear,
                ScaleMode::Nearest => wgpu::FilterMode::Nearest,
            };
            let mipmap_filter = match (params.mipmapped, params.filter) {
                (true, ScaleMode::Linear) => wgpu::MipmapFilterMode::Linear,
                _ => wgpu::MipmapFilterMode::Nearest,
            };
            let sampler = self.device.create_sampler(&wgpu::SamplerDescriptor {
                label: Some("lumen sampler"),
                address_mode_u: address,
                address_mode_v: address,
                address_mode_w: address,
                mag_filter: filter,
                min_filter: filter,
                mipmap_filter,
                ..Default::default()
            });
            self.samplers.insert(params, sampler);
        }
    }

    fn delete_texture(&mut self, texture: RawTexture) {
        if let Some(slot) = self.textures.remove(&texture.0) {
            slot.texture.destroy();
        }
    }

    fn create_render_target(
        &mut self,
        width: u32,
        height: u32,
        filter: ScaleMode,
    ) -> (RawFramebuffer, RawTexture) {
        let framebuffer = self.next_name();
        let texture = self.next_name();
        let desc = TextureDesc {
            width,
            height,
            mip_levels: 1,
            premultiplied_alpha: false,
        };
        let slot = self.allocate(&desc, render_target_usage(), "lumen render target");
        self.textures.insert(texture, slot);
        self.render_targets.insert(framebuffer, texture);
        self.set_sampler(
            RawTexture(texture),
            SamplerParams {
                wrap: WrapMode::Clamp,
                filter,
                mipmapped: false,
            },
        );
        (RawFramebuffer(framebuffer), RawTexture(texture))
    }

    fn resize_render_target(&mut self, framebuffer: RawFramebuffer, width: u32, height: u32) {
        let Some(&texture) = self.render_targets.get(&framebuffer.0) else {
            return;
        };
        let Some(old) = self.textures.get(&texture) else {
            return;
        };
        let desc = TextureDesc {
            width,
            height,
            ..old.desc
        };
        let sampler = old.sampler;
        let mut slot = self.allocate(&desc, render_target_usage(), "lumen render target");
        slot.sampler = sampler;
        if let Some(old) = self.textures.insert(texture, slot) {
            old.texture.destroy();
        }
    }

    fn delete_render_target(&mut self, framebuffer: RawFramebuffer) {
        if self.state.target == Some(framebuffer) {
            self.state.target = None;
        }
        if let Some(texture) = self.render_targets.remove(&framebuffer.0) {
            self.delete_texture(RawTexture(texture));
        }
    }

    fn bind_render_target(&mut self, framebuffer: Option<RawFramebuffer>) {
        if let Some(fb) = framebuffer {
            if !self.render_targets.contains_key(&fb.0) {
                log::warn!("bind of unknown render target {}", fb.0);
                return;
            }
        }
        self.state.target = framebuffer;
    }

    fn draw_geometry(&mut self, triangles: &[Vec2]) {
        self.record(None, DrawGeometry::Triangles(triangles.to_vec()));
    }

    fn draw_quads(&mut self, texture: Option<RawTexture>, vertices: &[QuadVertex]) {
        self.record(texture, DrawGeometry::Quads(vertices.to_vec()));
    }
}

fn render_target_usage() -> wgpu::TextureUsages {
    wgpu::TextureUsages::RENDER_ATTACHMENT
        | wgpu::TextureUsages::TEXTURE_BINDING
        | wgpu::TextureUsages::COPY_SRC
}

// ── cpu pixel helpers ─────────────────────────────────────────────────────

fn premultiply(rgba: &mut [u8]) {
    for px in rgba.chunks_exact_mut(4) {
        let a = px[3] as u16;
        for c in &mut px[..3] {
            *c = ((*c as u16 * a + 127) / 255) as u8;
        }
    }
}

fn flip_rows(rgba: &mut [u8], width: u32, height: u32) {
    let row = (width * 4) as usize;
    let h = height as usize;
    for y in 0..h / 2 {
        let (top, bottom) = rgba.split_at_mut((h - 1 - y) * row);
        top[y * row..(y + 1) * row].swap_with_slice(&mut bottom[..row]);
    }
}

/// 2×2 box filter. Odd edges reuse the last column/row.
fn downsample(rgba: &[u8], width: u32, height: u32) -> (Vec<u8>, u32, u32) {
    let nw = (width / 2).max(1);
    let nh = (height / 2).max(1);
    let mut out = vec![0u8; (nw * nh * 4) as usize];

    let at = |x: u32, y: u32, c: usize| -> u32 {
        let x = x.min(width - 1);
        let y = y.min(height - 1);
        rgba[((y * width + x) * 4) as usize + c] as u32
    };

    for y in 0..nh {
        for x in 0..nw {
            for c in 0..4 {
                let sum = at(2 * x, 2 * y, c)
                    + at(2 * x + 1, 2 * y, c)
                    + at(2 * x, 2 * y + 1, c)
                    + at(2 * x + 1, 2 * y + 1, c);
                out[((y * nw + x) * 4) as usize + c] = ((sum + 2) / 4) as u8;
            }
        }
    }

    (out, nw, nh)
}
