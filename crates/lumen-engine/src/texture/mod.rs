//! Texture residency.
//!
//! A [`LogicalTexture`] describes pixels independently of any GPU. Each
//! rendering context owns a [`TextureManager`] that makes logical textures
//! resident on demand and keeps the resulting handles in its own
//! [`HandleArena`]; the texture only remembers `context → handle index`.
//!
//! Lifecycle notifications travel the other way: a texture posts
//! [`TextureEvent`]s into the [`Mailbox`] of every context that subscribed to
//! it, and [`TextureManager::sync`] drains them once per frame.

mod arena;
mod events;
mod logical;
mod manager;
mod source;

pub use arena::{GpuTextureHandle, HandleArena, HandleIndex, RenderTargetHandle, RenderTargetInfo};
pub use events::{Mailbox, TextureEvent};
pub use logical::{LogicalTexture, TextureId, TextureKind, TextureStore};
pub use manager::{ContextId, TextureManager};
pub use source::{is_power_of_two, mip_level_count, PixelSource, ScaleMode, WrapMode};
