//! GPU driver seam + context capability negotiation.
//!
//! This module is responsible for:
//! - the [`GlDriver`] trait every subsystem issues its primitives through
//! - capability negotiation and context validation at creation time
//! - a recording driver for headless use ([`TraceDriver`])
//! - the wgpu device and the wgpu-backed driver ([`Gpu`], [`WgpuDriver`])

mod caps;
mod driver;
mod gpu;
mod trace;
mod wgpu_driver;

pub use caps::{validate_context, Capabilities, VAO_EXTENSIONS};
pub use driver::{
    BlendFactor, Capability, ContextAttributes, GlDriver, RawFramebuffer, RawTexture,
    SamplerParams, StencilFunc, StencilOp, TextureDesc, Winding,
};
pub use gpu::{Gpu, GpuInit};
pub use trace::{GlCall, TraceDriver};
pub use wgpu_driver::{DrawCall, DrawGeometry, PipelineKey, ScissorRect, StencilKey, WgpuDriver};
