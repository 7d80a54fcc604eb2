//! Frame-level rendering.
//!
//! [`Renderer`] owns one rendering context: driver, state tracker, texture
//! manager, mask manager and the batch plugins. Plugins implement
//! [`ObjectRenderer`] and only touch GPU state inside `start`/`flush`/`stop`,
//! through a [`GpuContext`].
//!
//! Convention:
//! - CPU geometry is in logical pixels (top-left origin, +Y down).
//! - Vertex positions handed to the driver are world-space logical pixels;
//!   projection is the pipeline owner's concern.

mod batch;
mod config;
mod object;
mod renderer;
mod sprite;
mod vertex;

pub use batch::SpriteBatch;
pub use config::RendererConfig;
pub use object::{DrawItem, GpuContext, ObjectRenderer};
pub use renderer::Renderer;
pub use sprite::{Drawable, Sprite};
pub use vertex::{QuadVertex, QUAD_INDICES};
