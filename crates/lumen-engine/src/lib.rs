//! Lumen engine crate.
//!
//! This crate owns the GPU-facing core of the 2D renderer: render-state
//! tracking, texture residency per rendering context, and mask compositing.
//! The scene graph, shaders and asset loading live above it.

pub mod coords;
pub mod device;
pub mod logging;
pub mod mask;
pub mod render;
pub mod state;
pub mod texture;
