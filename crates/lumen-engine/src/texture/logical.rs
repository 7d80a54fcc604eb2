use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};

use smallvec::SmallVec;

use super::{is_power_of_two, ContextId, HandleIndex, Mailbox, PixelSource, ScaleMode, TextureEvent, WrapMode};

static NEXT_TEXTURE_ID: AtomicU64 = AtomicU64::new(1);

/// Process-unique identity of a logical texture.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Ord, PartialOrd)]
pub struct TextureId(u64);

impl TextureId {
    pub fn next() -> Self {
        Self(NEXT_TEXTURE_ID.fetch_add(1, Ordering::Relaxed))
    }

    #[inline]
    pub fn raw(self) -> u64 {
        self.0
    }
}

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum TextureKind {
    /// Pixels come from a [`PixelSource`].
    Image,
    /// Pixels are rendered into; backed by a framebuffer on the GPU.
    RenderTarget,
}

/// Source-agnostic texture description.
///
/// Holds at most one handle index per rendering context. The handle itself
/// lives in that context's [`TextureManager`](super::TextureManager).
#[derive(Debug)]
pub struct LogicalTexture {
    id: TextureId,
    kind: TextureKind,
    source: Option<PixelSource>,

    /// Logical size (device pixels divided by resolution).
    width: f32,
    height: f32,
    real_width: u32,
    real_height: u32,
    resolution: f32,
    power_of_two: bool,

    pub scale_mode: ScaleMode,
    pub wrap_mode: WrapMode,
    /// Generate a mip chain when the texture is power-of-two.
    pub mipmap: bool,

    loaded: bool,
    loading: bool,
    update_count: u64,

    handles: SmallVec<[(ContextId, HandleIndex); 2]>,
    observers: SmallVec<[(ContextId, Mailbox); 2]>,
}

impl LogicalTexture {
    fn blank(kind: TextureKind) -> Self {
        Self {
            id: TextureId::next(),
            kind,
            source: None,
            width: 100.0,
            height: 100.0,
            real_width: 100,
            real_height: 100,
            resolution: 1.0,
            power_of_two: false,
            scale_mode: ScaleMode::default(),
            wrap_mode: WrapMode::default(),
            mipmap: true,
            loaded: false,
            loading: false,
            update_count: 0,
            handles: SmallVec::new(),
            observers: SmallVec::new(),
        }
    }

    /// An image texture whose source has not arrived yet.
    pub fn new() -> Self {
        Self::blank(TextureKind::Image)
    }

    /// An image texture that is loaded immediately.
    pub fn from_source(source: PixelSource) -> Self {
        let mut tex = Self::blank(TextureKind::Image);
        tex.apply_source(source);
        tex.loaded = true;
        tex
    }

    /// A render texture of `width`×`height` logical pixels. Render textures
    /// are always loaded.
    pub fn render_target(width: f32, height: f32, resolution: f32) -> Self {
        let mut tex = Self::blank(TextureKind::RenderTarget);
        tex.resolution = resolution;
        tex.set_logical_size(width, height);
        tex.mipmap = false;
        tex.loaded = true;
        tex
    }

    // ── accessors ─────────────────────────────────────────────────────────

    #[inline]
    pub fn id(&self) -> TextureId {
        self.id
    }

    #[inline]
    pub fn kind(&self) -> TextureKind {
        self.kind
    }

    #[inline]
    pub fn is_render_target(&self) -> bool {
        self.kind == TextureKind::RenderTarget
    }

    #[inline]
    pub fn is_loaded(&self) -> bool {
        self.loaded
    }

    #[inline]
    pub fn is_loading(&self) -> bool {
        self.loading
    }

    #[inline]
    pub fn width(&self) -> f32 {
        self.width
    }

    #[inline]
    pub fn height(&self) -> f32 {
        self.height
    }

    #[inline]
    pub fn real_width(&self) -> u32 {
        self.real_width
    }

    #[inline]
    pub fn real_height(&self) -> u32 {
        self.real_height
    }

    #[inline]
    pub fn resolution(&self) -> f32 {
        self.resolution
    }

    /// Computed from the device-pixel size.
    #[inline]
    pub fn is_power_of_two(&self) -> bool {
        self.power_of_two
    }

    /// Bumped on every content change; the manager compares it against the
    /// version it last uploaded.
    #[inline]
    pub fn update_count(&self) -> u64 {
        self.update_count
    }

    #[inline]
    pub fn source(&self) -> Option<&PixelSource> {
        self.source.as_ref()
    }

    /// Mutable pixels. Call [`update`](Self::update) afterwards.
    #[inline]
    pub fn source_mut(&mut self) -> Option<&mut PixelSource> {
        self.source.as_mut()
    }

    /// Changes the resolution. Takes effect on the next source load or resize.
    pub fn set_resolution(&mut self, resolution: f32) {
        self.resolution = resolution;
    }

    // ── lifecycle ─────────────────────────────────────────────────────────

    pub fn begin_loading(&mut self) {
        self.loading = true;
    }

    /// Installs decoded pixels and marks the texture loaded.
    pub fn load_source(&mut self, source: PixelSource) {
        self.apply_source(source);
        self.loading = false;
        self.loaded = true;
        self.bump();
        self.emit(TextureEvent::Updated);
        self.emit(TextureEvent::Loaded);
    }

    pub fn fail_loading(&mut self) {
        self.loading = false;
        self.emit(TextureEvent::Error);
    }

    /// Signals that the source content changed.
    ///
    /// Dimensions are re-read from the source. No-op until loaded.
    pub fn update(&mut self) {
        if !self.loaded {
            return;
        }
        if let Some(source) = self.source.take() {
            self.apply_source(source);
        }
        self.bump();
        self.emit(TextureEvent::Updated);
    }

    /// Resizes a render texture (logical pixels).
    pub fn resize(&mut self, width: f32, height: f32) {
        if !self.is_render_target() {
            log::warn!("resize ignored on image texture {:?}", self.id);
            return;
        }
        self.set_logical_size(width, height);
        self.bump();
        self.emit(TextureEvent::Updated);
    }

    /// Asks every context to free its GPU copy. The texture stays usable and
    /// is made resident again on next use.
    pub fn dispose(&mut self) {
        self.emit(TextureEvent::Disposed);
    }

    /// Drops the source and disposes. The texture is no longer loaded.
    pub fn destroy(&mut self) {
        if self.kind == TextureKind::Image {
            self.source = None;
            self.loaded = false;
        }
        self.dispose();
    }

    // ── per-context bookkeeping (owned by TextureManager) ─────────────────

    pub fn handle(&self, context: ContextId) -> Option<HandleIndex> {
        self.handles
            .iter()
            .find(|(c, _)| *c == context)
            .map(|(_, h)| *h)
    }

    pub(crate) fn set_handle(&mut self, context: ContextId, handle: HandleIndex) {
        match self.handles.iter_mut().find(|(c, _)| *c == context) {
            Some(entry) => entry.1 = handle,
            None => self.handles.push((context, handle)),
        }
    }

    pub(crate) fn take_handle(&mut self, context: ContextId) -> Option<HandleIndex> {
        let pos = self.handles.iter().position(|(c, _)| *c == context)?;
        Some(self.handles.swap_remove(pos).1)
    }

    pub fn is_subscribed(&self, context: ContextId) -> bool {
        self.observers.iter().any(|(c, _)| *c == context)
    }

    pub(crate) fn subscribe(&mut self, context: ContextId, mailbox: Mailbox) {
        if !self.is_subscribed(context) {
            self.observers.push((context, mailbox));
        }
    }

    pub(crate) fn unsubscribe(&mut self, context: ContextId) {
        self.observers.retain(|(c, _)| *c != context);
    }

    fn emit(&self, event: TextureEvent) {
        for (_, mailbox) in &self.observers {
            mailbox.post(self.id, event);
        }
    }

    fn bump(&mut self) {
        self.update_count = self.update_count.wrapping_add(1);
    }

    fn apply_source(&mut self, source: PixelSource) {
        self.real_width = source.width();
        self.real_height = source.height();
        self.width = self.real_width as f32 / self.resolution;
        self.height = self.real_height as f32 / self.resolution;
        self.power_of_two = is_power_of_two(self.real_width, self.real_height);
        self.source = Some(source);
    }

    fn set_logical_size(&mut self, width: f32, height: f32) {
        self.width = width;
        self.height = height;
        self.real_width = (width * self.resolution).ceil().max(1.0) as u32;
        self.real_height = (height * self.resolution).ceil().max(1.0) as u32;
        self.power_of_two = is_power_of_two(self.real_width, self.real_height);
    }
}

impl Default for LogicalTexture {
    fn default() -> Self {
        Self::new()
    }
}

/// Owner of every logical texture in the scene.
#[derive(Debug, Default)]
pub struct TextureStore {
    textures: HashMap<TextureId, LogicalTexture>,
}

impl TextureStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, texture: LogicalTexture) -> TextureId {
        let id = texture.id();
        self.textures.insert(id, texture);
        id
    }

    pub fn get(&self, id: TextureId) -> Option<&LogicalTexture> {
        self.textures.get(&id)
    }

    pub fn get_mut(&mut self, id: TextureId) -> Option<&mut LogicalTexture> {
        self.textures.get_mut(&id)
    }

    /// Removes the texture. Callers release its GPU copies first.
    pub fn remove(&mut self, id: TextureId) -> Option<LogicalTexture> {
        self.textures.remove(&id)
    }

    pub fn len(&self) -> usize {
        self.textures.len()
    }

    pub fn is_empty(&self) -> bool {
        self.textures.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &LogicalTexture> {
        self.textures.values()
    }
}
