//! Fixed-function render state with redundant-call elimination.
//!
//! [`StateTracker`] remembers what the driver was last told and only issues
//! the primitives for fields that differ. Unknown fields (after creation or a
//! reset) always emit.

mod blend;
mod tracker;

pub use blend::{BlendMode, BlendTable};
pub use tracker::{RenderState, StateTracker};
