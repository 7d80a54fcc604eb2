//! Mask compositing.
//!
//! [`MaskManager`] picks one of three strategies per mask and keeps a LIFO
//! stack mirroring the scene traversal:
//!
//! - scissor: axis-aligned rectangles, one fixed-function switch, no draw
//! - stencil: arbitrary geometry, drawn into the stencil buffer
//! - sprite: image masks, realised as an alpha-mask filter pass
//!
//! The stencil buffer and filter passes are driven through the
//! [`StencilSubsystem`] and [`FilterPipeline`] seams.

mod filter;
mod manager;
mod shape;
mod stencil;

pub use filter::{AlphaMaskFilter, FilterPipeline, FilterStack, FilterStackFrame, FilterTarget, TargetNode};
pub use manager::{classify, MaskContext, MaskEntry, MaskManager, MaskStrategy};
pub use shape::{MaskGeometry, MaskShape, ShapeMask, SpriteMask};
pub use stencil::{StencilManager, StencilSubsystem};
