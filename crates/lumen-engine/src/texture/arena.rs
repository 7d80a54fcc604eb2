use crate::coords::Viewport;
use crate::device::{GlDriver, RawFramebuffer, RawTexture};

use super::{ScaleMode, WrapMode};

/// Generational index into a [`HandleArena`].
///
/// A stale index (its slot was freed or the arena was cleared) never resolves,
/// even after the slot is reused.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct HandleIndex {
    slot: u32,
    generation: u32,
}

impl HandleIndex {
    #[inline]
    pub const fn from_parts(slot: u32, generation: u32) -> Self {
        Self { slot, generation }
    }

    #[inline]
    pub fn slot(self) -> u32 {
        self.slot
    }

    #[inline]
    pub fn generation(self) -> u32 {
        self.generation
    }
}

#[derive(Debug)]
struct Slot<T> {
    generation: u32,
    value: Option<T>,
}

/// Slot storage with free-list reuse.
#[derive(Debug)]
pub struct HandleArena<T> {
    slots: Vec<Slot<T>>,
    free: Vec<u32>,
    len: usize,
}

impl<T> Default for HandleArena<T> {
    fn default() -> Self {
        Self {
            slots: Vec::new(),
            free: Vec::new(),
            len: 0,
        }
    }
}

impl<T> HandleArena<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, value: T) -> HandleIndex {
        self.len += 1;
        if let Some(slot) = self.free.pop() {
            let entry = &mut self.slots[slot as usize];
            entry.value = Some(value);
            return HandleIndex::from_parts(slot, entry.generation);
        }

        let slot = self.slots.len() as u32;
        self.slots.push(Slot {
            generation: 0,
            value: Some(value),
        });
        HandleIndex::from_parts(slot, 0)
    }

    pub fn get(&self, index: HandleIndex) -> Option<&T> {
        let entry = self.slots.get(index.slot as usize)?;
        if entry.generation != index.generation {
            return None;
        }
        entry.value.as_ref()
    }

    pub fn get_mut(&mut self, index: HandleIndex) -> Option<&mut T> {
        let entry = self.slots.get_mut(index.slot as usize)?;
        if entry.generation != index.generation {
            return None;
        }
        entry.value.as_mut()
    }

    pub fn remove(&mut self, index: HandleIndex) -> Option<T> {
        let entry = self.slots.get_mut(index.slot as usize)?;
        if entry.generation != index.generation {
            return None;
        }
        let value = entry.value.take()?;
        entry.generation = entry.generation.wrapping_add(1);
        self.free.push(index.slot);
        self.len -= 1;
        Some(value)
    }

    /// Removes every value, returning them. Outstanding indices go stale.
    pub fn drain(&mut self) -> Vec<T> {
        let mut out = Vec::with_capacity(self.len);
        for (slot, entry) in self.slots.iter_mut().enumerate() {
            if let Some(value) = entry.value.take() {
                entry.generation = entry.generation.wrapping_add(1);
                self.free.push(slot as u32);
                out.push(value);
            }
        }
        self.len = 0;
        out
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
}

/// Size and orientation of the render target currently drawn into.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct RenderTargetInfo {
    /// Logical size.
    pub size: Viewport,
    /// True for the default (screen) target, whose Y axis is flipped relative
    /// to render textures.
    pub root: bool,
}

impl RenderTargetInfo {
    pub fn screen(size: Viewport) -> Self {
        Self { size, root: true }
    }
}

/// Framebuffer backing a render texture.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderTargetHandle {
    pub framebuffer: RawFramebuffer,
    size: Viewport,
    resolution: f32,
    /// Allocated device-pixel storage. Never shrinks.
    capacity: (u32, u32),
}

impl RenderTargetHandle {
    pub fn create(driver: &mut dyn GlDriver, size: Viewport, resolution: f32, filter: ScaleMode) -> (Self, RawTexture) {
        let (w, h) = size.physical(resolution);
        let capacity = (w.max(1), h.max(1));
        let (framebuffer, texture) = driver.create_render_target(capacity.0, capacity.1, filter);
        (
            Self {
                framebuffer,
                size,
                resolution,
                capacity,
            },
            texture,
        )
    }

    /// Updates the logical size. Storage is reallocated only when the new
    /// device-pixel size exceeds what is allocated. Returns `true` if it was.
    pub fn resize(&mut self, driver: &mut dyn GlDriver, size: Viewport, resolution: f32) -> bool {
        self.size = size;
        self.resolution = resolution;

        let (w, h) = size.physical(resolution);
        if w <= self.capacity.0 && h <= self.capacity.1 {
            return false;
        }

        self.capacity = (w.max(self.capacity.0), h.max(self.capacity.1));
        driver.resize_render_target(self.framebuffer, self.capacity.0, self.capacity.1);
        log::debug!(
            "render target {:?} grown to {}x{}",
            self.framebuffer,
            self.capacity.0,
            self.capacity.1
        );
        true
    }

    #[inline]
    pub fn size(&self) -> Viewport {
        self.size
    }

    #[inline]
    pub fn resolution(&self) -> f32 {
        self.resolution
    }

    #[inline]
    pub fn capacity(&self) -> (u32, u32) {
        self.capacity
    }

    /// Render textures are never the root target.
    pub fn info(&self) -> RenderTargetInfo {
        RenderTargetInfo {
            size: self.size,
            root: false,
        }
    }
}

/// GPU copy of a logical texture in one rendering context.
#[derive(Debug, Clone, PartialEq)]
pub struct GpuTextureHandle {
    pub texture: RawTexture,
    /// Device pixels.
    pub width: u32,
    pub height: u32,
    /// Effective wrap (clamped for non-power-of-two).
    pub wrap_mode: WrapMode,
    pub scale_mode: ScaleMode,
    pub mip_levels: u32,
    pub power_of_two: bool,
    pub premultiplied_alpha: bool,
    /// `update_count` of the logical texture at the last upload or resize.
    pub uploaded_version: u64,
    /// Present for render textures.
    pub render_target: Option<RenderTargetHandle>,
}

impl GpuTextureHandle {
    #[inline]
    pub fn is_render_target(&self) -> bool {
        self.render_target.is_some()
    }

    /// Frees the driver objects behind this handle.
    pub fn destroy(self, driver: &mut dyn GlDriver) {
        match self.render_target {
            Some(rt) => driver.delete_render_target(rt.framebuffer),
            None => driver.delete_texture(self.texture),
        }
    }
}
