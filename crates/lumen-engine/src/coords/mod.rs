//! Coordinate and geometry types shared by the texture, state and mask code.
//!
//! Canonical CPU space:
//! - Logical pixels (resolution-independent)
//! - Origin top-left
//! - +X right, +Y down
//!
//! Conversion to device pixels multiplies by the renderer resolution; the
//! scissor path additionally flips Y for root (screen) targets.

mod rect;
mod transform;
mod vec2;
mod viewport;

pub use rect::Rect;
pub use transform::Transform2D;
pub use vec2::Vec2;
pub use viewport::Viewport;
