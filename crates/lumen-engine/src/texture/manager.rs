use std::collections::HashMap;
use std::sync::atomic::{AtomicU32, Ordering};

use crate::coords::Viewport;
use crate::device::{GlDriver, SamplerParams, TextureDesc};

use super::{
    mip_level_count, GpuTextureHandle, HandleArena, HandleIndex, LogicalTexture, Mailbox,
    RenderTargetHandle, TextureEvent, TextureId, TextureStore, WrapMode,
};

static NEXT_CONTEXT_ID: AtomicU32 = AtomicU32::new(1);

/// Identity of one rendering context.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct ContextId(u32);

impl ContextId {
    pub fn next() -> Self {
        Self(NEXT_CONTEXT_ID.fetch_add(1, Ordering::Relaxed))
    }

    #[inline]
    pub const fn from_raw(raw: u32) -> Self {
        Self(raw)
    }

    #[inline]
    pub fn raw(self) -> u32 {
        self.0
    }
}

/// Owns the GPU copies of logical textures for one rendering context.
///
/// Performance characteristics:
/// - `ensure_resident` on an up-to-date texture issues no driver calls
/// - handles live in a generational arena; lookups are O(1)
#[derive(Debug)]
pub struct TextureManager {
    context: ContextId,
    arena: HandleArena<GpuTextureHandle>,
    /// Textures with a live handle (or that had one before a context loss).
    managed: Vec<TextureId>,
    /// Live handle per texture, so a handle can be freed after its texture
    /// left the store.
    resident: HashMap<TextureId, HandleIndex>,
    mailbox: Mailbox,
}

impl TextureManager {
    pub fn new(context: ContextId) -> Self {
        Self {
            context,
            arena: HandleArena::new(),
            managed: Vec::new(),
            resident: HashMap::new(),
            mailbox: Mailbox::new(),
        }
    }

    #[inline]
    pub fn context(&self) -> ContextId {
        self.context
    }

    #[inline]
    pub fn handle(&self, index: HandleIndex) -> Option<&GpuTextureHandle> {
        self.arena.get(index)
    }

    /// Handle of `texture` in this context, if resident.
    pub fn handle_for(&self, texture: &LogicalTexture) -> Option<&GpuTextureHandle> {
        self.arena.get(texture.handle(self.context)?)
    }

    #[inline]
    pub fn resident_count(&self) -> usize {
        self.arena.len()
    }

    pub fn is_managed(&self, id: TextureId) -> bool {
        self.managed.contains(&id)
    }

    #[inline]
    pub fn managed_count(&self) -> usize {
        self.managed.len()
    }

    /// Events posted by subscribed textures and not yet processed.
    #[inline]
    pub fn pending_events(&self) -> usize {
        self.mailbox.len()
    }

    /// Makes `texture` resident in this context and brings it up to date.
    ///
    /// Returns `None` without touching the driver while the texture is not
    /// loaded; callers retry next frame.
    ///
    /// - render textures: the backing target is resized to the logical size
    ///   (no reallocation unless it grows)
    /// - images: pixels are re-uploaded only if the content changed since the
    ///   last upload
    pub fn ensure_resident(
        &mut self,
        driver: &mut dyn GlDriver,
        texture: &mut LogicalTexture,
    ) -> Option<HandleIndex> {
        if !texture.is_loaded() {
            // A destroyed texture may still hold the copy of its old content.
            if texture.handle(self.context).is_some() {
                self.release(driver, texture, false);
            }
            return None;
        }

        if let Some(index) = texture.handle(self.context) {
            if let Some(handle) = self.arena.get_mut(index) {
                refresh(driver, handle, texture);
                return Some(index);
            }
            // Stale after a context loss.
            texture.take_handle(self.context);
        }

        let handle = if texture.is_render_target() {
            create_render_texture(driver, texture)
        } else {
            create_image_texture(driver, texture)?
        };

        log::debug!(
            "texture {:?} resident in context {:?} as {:?} ({}x{}, mips {})",
            texture.id(),
            self.context,
            handle.texture,
            handle.width,
            handle.height,
            handle.mip_levels
        );

        let index = self.arena.insert(handle);
        texture.set_handle(self.context, index);
        self.resident.insert(texture.id(), index);
        texture.subscribe(self.context, self.mailbox.clone());
        if !self.managed.contains(&texture.id()) {
            self.managed.push(texture.id());
        }

        Some(index)
    }

    /// Frees the GPU copy of `texture` in this context and stops listening to
    /// it. With `skip_unregister` the texture stays in the managed set (used
    /// while iterating that set).
    pub fn release(
        &mut self,
        driver: &mut dyn GlDriver,
        texture: &mut LogicalTexture,
        skip_unregister: bool,
    ) {
        let Some(index) = texture.take_handle(self.context) else {
            return;
        };

        self.resident.remove(&texture.id());
        if let Some(handle) = self.arena.remove(index) {
            log::debug!("texture {:?} released from context {:?}", texture.id(), self.context);
            handle.destroy(driver);
        }

        texture.unsubscribe(self.context);

        if !skip_unregister {
            let id = texture.id();
            self.managed.retain(|m| *m != id);
        }
    }

    /// Forgets every handle without destroying anything on the GPU.
    ///
    /// Used after the context was lost: the driver objects are already gone.
    /// Textures stay managed and subscribed and are recreated on next use.
    pub fn invalidate_all(&mut self, store: &mut TextureStore) {
        let dropped = self.arena.drain().len();
        self.resident.clear();
        for id in &self.managed {
            if let Some(texture) = store.get_mut(*id) {
                texture.take_handle(self.context);
            }
        }
        log::debug!("context {:?}: invalidated {} texture handles", self.context, dropped);
    }

    /// Releases every managed texture and clears the managed set.
    pub fn shutdown(&mut self, driver: &mut dyn GlDriver, store: &mut TextureStore) {
        let managed = std::mem::take(&mut self.managed);
        for id in managed {
            if let Some(texture) = store.get_mut(id) {
                self.release(driver, texture, true);
            }
        }

        // Handles whose logical texture left the store without being released.
        for orphan in self.arena.drain() {
            orphan.destroy(driver);
        }
        self.resident.clear();

        self.mailbox.drain();
        log::debug!("context {:?}: texture manager shut down", self.context);
    }

    /// Processes lifecycle events posted since the last call.
    ///
    /// `Updated` re-syncs the GPU copy, `Disposed` releases it. Returns the
    /// number of events handled.
    pub fn sync(&mut self, driver: &mut dyn GlDriver, store: &mut TextureStore) -> usize {
        let events = self.mailbox.drain();
        let count = events.len();

        for (id, event) in events {
            let Some(texture) = store.get_mut(id) else {
                if event == TextureEvent::Disposed {
                    self.release_orphan(driver, id);
                }
                continue;
            };
            match event {
                TextureEvent::Updated => {
                    if texture.handle(self.context).is_some() {
                        self.ensure_resident(driver, texture);
                    }
                }
                TextureEvent::Disposed => self.release(driver, texture, false),
                TextureEvent::Loaded | TextureEvent::Error => {}
            }
        }

        count
    }

    /// Frees the handle of a texture that is no longer in the store.
    fn release_orphan(&mut self, driver: &mut dyn GlDriver, id: TextureId) {
        self.managed.retain(|m| *m != id);
        let Some(index) = self.resident.remove(&id) else {
            return;
        };
        if let Some(handle) = self.arena.remove(index) {
            log::debug!("texture {id:?} released from context {:?} after removal", self.context);
            handle.destroy(driver);
        }
    }
}

fn create_render_texture(driver: &mut dyn GlDriver, texture: &LogicalTexture) -> GpuTextureHandle {
    let size = Viewport::new(texture.width(), texture.height());
    let (target, raw) =
        RenderTargetHandle::create(driver, size, texture.resolution(), texture.scale_mode);
    let (width, height) = target.capacity();

    GpuTextureHandle {
        texture: raw,
        width,
        height,
        wrap_mode: WrapMode::Clamp,
        scale_mode: texture.scale_mode,
        mip_levels: 1,
        power_of_two: texture.is_power_of_two(),
        premultiplied_alpha: true,
        uploaded_version: texture.update_count(),
        render_target: Some(target),
    }
}

fn create_image_texture(
    driver: &mut dyn GlDriver,
    texture: &LogicalTexture,
) -> Option<GpuTextureHandle> {
    let source = texture.source()?;
    let sampler = sampler_params(texture);
    let mip_levels = if sampler.mipmapped {
        mip_level_count(source.width(), source.height())
    } else {
        1
    };

    let desc = TextureDesc {
        width: source.width(),
        height: source.height(),
        mip_levels,
        premultiplied_alpha: true,
    };
    let raw = driver.create_texture(&desc);
    driver.upload_texture(raw, source, mip_levels);
    driver.set_sampler(raw, sampler);

    Some(GpuTextureHandle {
        texture: raw,
        width: desc.width,
        height: desc.height,
        wrap_mode: sampler.wrap,
        scale_mode: sampler.filter,
        mip_levels,
        power_of_two: texture.is_power_of_two(),
        premultiplied_alpha: true,
        uploaded_version: texture.update_count(),
        render_target: None,
    })
}

/// Mipmaps and non-clamp wrapping need power-of-two dimensions.
fn sampler_params(texture: &LogicalTexture) -> SamplerParams {
    let pot = texture.is_power_of_two();
    SamplerParams {
        wrap: if pot { texture.wrap_mode } else { WrapMode::Clamp },
        filter: texture.scale_mode,
        mipmapped: pot && texture.mipmap,
    }
}

fn refresh(driver: &mut dyn GlDriver, handle: &mut GpuTextureHandle, texture: &LogicalTexture) {
    if let Some(target) = handle.render_target.as_mut() {
        let size = Viewport::new(texture.width(), texture.height());
        target.resize(driver, size, texture.resolution());
        (handle.width, handle.height) = target.capacity();
        handle.uploaded_version = texture.update_count();
        return;
    }

    if handle.uploaded_version == texture.update_count() {
        return;
    }
    let Some(source) = texture.source() else {
        return;
    };

    let sampler = sampler_params(texture);
    let mip_levels = if sampler.mipmapped {
        mip_level_count(source.width(), source.height())
    } else {
        1
    };
    driver.upload_texture(handle.texture, source, mip_levels);

    let dims_changed = handle.width != source.width() || handle.height != source.height();
    if dims_changed
        || mip_levels != handle.mip_levels
        || sampler.wrap != handle.wrap_mode
        || sampler.filter != handle.scale_mode
    {
        driver.set_sampler(handle.texture, sampler);
    }

    handle.mip_levels = mip_levels;
    handle.width = source.width();
    handle.height = source.height();
    handle.wrap_mode = sampler.wrap;
    handle.scale_mode = sampler.filter;
    handle.power_of_two = texture.is_power_of_two();
    handle.uploaded_version = texture.update_count();
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::device::{GlCall, RawTexture, TraceDriver};
    use crate::texture::{PixelSource, ScaleMode};

    fn setup() -> (TextureManager, TraceDriver, TextureStore) {
        (TextureManager::new(ContextId::next()), TraceDriver::new(), TextureStore::new())
    }

    fn uploads(driver: &TraceDriver) -> usize {
        driver.count(|c| matches!(c, GlCall::UploadTexture { .. }))
    }

    // ── residency ─────────────────────────────────────────────────────────

    #[test]
    fn unloaded_texture_never_gets_a_handle() {
        let (mut mgr, mut driver, _) = setup();
        let mut tex = LogicalTexture::new();
        tex.begin_loading();

        assert_eq!(mgr.ensure_resident(&mut driver, &mut tex), None);
        assert_eq!(mgr.ensure_resident(&mut driver, &mut tex), None);

        assert!(driver.calls().is_empty());
        assert_eq!(tex.handle(mgr.context()), None);
        assert_eq!(mgr.resident_count(), 0);
        assert_eq!(mgr.managed_count(), 0);
    }

    #[test]
    fn power_of_two_image_after_load() {
        let (mut mgr, mut driver, _) = setup();
        let mut tex = LogicalTexture::new();
        tex.wrap_mode = WrapMode::Repeat;
        tex.begin_loading();
        assert!(mgr.ensure_resident(&mut driver, &mut tex).is_none());

        tex.load_source(PixelSource::solid(256, 256, [255; 4]));
        let index = mgr.ensure_resident(&mut driver, &mut tex);
        let handle = mgr.handle(index.unwrap()).unwrap();

        assert!(handle.power_of_two);
        assert_eq!(handle.mip_levels, 9);
        assert_eq!(handle.wrap_mode, WrapMode::Repeat);
        assert!(handle.premultiplied_alpha);
        assert_eq!(
            driver.calls(),
            &[
                GlCall::CreateTexture {
                    texture: RawTexture(1),
                    desc: TextureDesc {
                        width: 256,
                        height: 256,
                        mip_levels: 9,
                        premultiplied_alpha: true,
                    },
                },
                GlCall::UploadTexture {
                    texture: RawTexture(1),
                    width: 256,
                    height: 256,
                    mip_levels: 9,
                },
                GlCall::SetSampler {
                    texture: RawTexture(1),
                    params: SamplerParams {
                        wrap: WrapMode::Repeat,
                        filter: ScaleMode::Linear,
                        mipmapped: true,
                    },
                },
            ]
        );
    }

    #[test]
    fn non_power_of_two_forces_clamp_and_no_mips() {
        let (mut mgr, mut driver, _) = setup();
        let mut tex = LogicalTexture::from_source(PixelSource::solid(100, 64, [0; 4]));
        tex.wrap_mode = WrapMode::MirroredRepeat;
        tex.scale_mode = ScaleMode::Nearest;

        let index = mgr.ensure_resident(&mut driver, &mut tex).unwrap();
        let handle = mgr.handle(index).unwrap();

        assert!(!handle.power_of_two);
        assert_eq!(handle.mip_levels, 1);
        assert_eq!(handle.wrap_mode, WrapMode::Clamp);
        assert_eq!(handle.scale_mode, ScaleMode::Nearest);
    }

    #[test]
    fn mipmap_flag_off_skips_chain() {
        let (mut mgr, mut driver, _) = setup();
        let mut tex = LogicalTexture::from_source(PixelSource::solid(64, 64, [0; 4]));
        tex.mipmap = false;

        let index = mgr.ensure_resident(&mut driver, &mut tex).unwrap();
        assert_eq!(mgr.handle(index).unwrap().mip_levels, 1);
    }

    #[test]
    fn ensure_resident_is_idempotent_without_updates() {
        let (mut mgr, mut driver, _) = setup();
        let mut tex = LogicalTexture::from_source(PixelSource::solid(16, 16, [0; 4]));

        let first = mgr.ensure_resident(&mut driver, &mut tex);
        driver.clear();
        let second = mgr.ensure_resident(&mut driver, &mut tex);

        assert_eq!(first, second);
        assert!(driver.calls().is_empty());
        assert_eq!(mgr.managed_count(), 1);
    }

    #[test]
    fn content_update_reuploads_once() {
        let (mut mgr, mut driver, _) = setup();
        let mut tex = LogicalTexture::from_source(PixelSource::solid(16, 16, [0; 4]));
        mgr.ensure_resident(&mut driver, &mut tex);
        driver.clear();

        tex.update();
        mgr.ensure_resident(&mut driver, &mut tex);
        mgr.ensure_resident(&mut driver, &mut tex);

        assert_eq!(uploads(&driver), 1);
        assert_eq!(driver.count(|c| matches!(c, GlCall::CreateTexture { .. })), 0);
    }

    #[test]
    fn render_texture_resizes_instead_of_uploading() {
        let (mut mgr, mut driver, _) = setup();
        let mut tex = LogicalTexture::render_target(32.0, 32.0, 1.0);

        let index = mgr.ensure_resident(&mut driver, &mut tex).unwrap();
        assert!(mgr.handle(index).unwrap().is_render_target());
        assert!(matches!(
            driver.calls(),
            [GlCall::CreateRenderTarget { width: 32, height: 32, .. }]
        ));
        driver.clear();

        // Same size: nothing.
        mgr.ensure_resident(&mut driver, &mut tex);
        assert!(driver.calls().is_empty());

        tex.resize(64.0, 16.0);
        mgr.ensure_resident(&mut driver, &mut tex);
        assert!(matches!(
            driver.calls(),
            [GlCall::ResizeRenderTarget { width: 64, height: 32, .. }]
        ));
        assert_eq!(uploads(&driver), 0);
    }

    #[test]
    fn losing_power_of_two_drops_the_mip_chain() {
        let (mut mgr, mut driver, _) = setup();
        let mut tex = LogicalTexture::from_source(PixelSource::solid(64, 64, [0; 4]));
        let index = mgr.ensure_resident(&mut driver, &mut tex).unwrap();
        assert_eq!(mgr.handle(index).unwrap().mip_levels, 7);
        driver.clear();

        tex.load_source(PixelSource::solid(100, 64, [0; 4]));
        mgr.ensure_resident(&mut driver, &mut tex);

        assert_eq!(
            driver.calls(),
            &[
                GlCall::UploadTexture {
                    texture: RawTexture(1),
                    width: 100,
                    height: 64,
                    mip_levels: 1,
                },
                GlCall::SetSampler {
                    texture: RawTexture(1),
                    params: SamplerParams {
                        wrap: WrapMode::Clamp,
                        filter: ScaleMode::Linear,
                        mipmapped: false,
                    },
                },
            ]
        );
        let handle = mgr.handle(index).unwrap();
        assert_eq!(handle.mip_levels, 1);
        assert!(!handle.power_of_two);
    }

    // ── release / invalidation ────────────────────────────────────────────

    #[test]
    fn release_destroys_and_unsubscribes() {
        let (mut mgr, mut driver, _) = setup();
        let mut tex = LogicalTexture::from_source(PixelSource::solid(4, 4, [0; 4]));
        mgr.ensure_resident(&mut driver, &mut tex);
        assert!(tex.is_subscribed(mgr.context()));
        driver.clear();

        mgr.release(&mut driver, &mut tex, false);

        assert_eq!(driver.calls(), &[GlCall::DeleteTexture(RawTexture(1))]);
        assert!(!tex.is_subscribed(mgr.context()));
        assert_eq!(tex.handle(mgr.context()), None);
        assert!(!mgr.is_managed(tex.id()));
        assert_eq!(mgr.resident_count(), 0);
    }

    #[test]
    fn release_skip_unregister_keeps_managed_entry() {
        let (mut mgr, mut driver, _) = setup();
        let mut tex = LogicalTexture::from_source(PixelSource::solid(4, 4, [0; 4]));
        mgr.ensure_resident(&mut driver, &mut tex);

        mgr.release(&mut driver, &mut tex, true);
        assert!(mgr.is_managed(tex.id()));
    }

    #[test]
    fn release_without_handle_is_noop() {
        let (mut mgr, mut driver, _) = setup();
        let mut tex = LogicalTexture::from_source(PixelSource::solid(4, 4, [0; 4]));
        mgr.release(&mut driver, &mut tex, false);
        assert!(driver.calls().is_empty());
    }

    #[test]
    fn render_texture_release_deletes_framebuffer() {
        let (mut mgr, mut driver, _) = setup();
        let mut tex = LogicalTexture::render_target(8.0, 8.0, 1.0);
        let index = mgr.ensure_resident(&mut driver, &mut tex).unwrap();
        let fb = mgr.handle(index).unwrap().render_target.as_ref().unwrap().framebuffer;
        driver.clear();

        mgr.release(&mut driver, &mut tex, false);
        assert_eq!(driver.calls(), &[GlCall::DeleteRenderTarget(fb)]);
    }

    #[test]
    fn invalidate_all_issues_no_gpu_calls_and_recreates_lazily() {
        let (mut mgr, mut driver, mut store) = setup();
        let id = store.insert(LogicalTexture::from_source(PixelSource::solid(4, 4, [0; 4])));
        let old = mgr.ensure_resident(&mut driver, store.get_mut(id).unwrap()).unwrap();
        driver.clear();

        mgr.invalidate_all(&mut store);

        assert!(driver.calls().is_empty());
        assert_eq!(mgr.resident_count(), 0);
        assert_eq!(mgr.handle(old), None);
        let tex = store.get_mut(id).unwrap();
        assert_eq!(tex.handle(mgr.context()), None);

        let new = mgr.ensure_resident(&mut driver, tex).unwrap();
        assert_ne!(old, new);
        assert_eq!(driver.count(|c| matches!(c, GlCall::CreateTexture { .. })), 1);
        assert_eq!(mgr.managed_count(), 1);
    }

    #[test]
    fn shutdown_releases_everything() {
        let (mut mgr, mut driver, mut store) = setup();
        let a = store.insert(LogicalTexture::from_source(PixelSource::solid(4, 4, [0; 4])));
        let b = store.insert(LogicalTexture::render_target(4.0, 4.0, 1.0));
        mgr.ensure_resident(&mut driver, store.get_mut(a).unwrap());
        mgr.ensure_resident(&mut driver, store.get_mut(b).unwrap());
        driver.clear();

        mgr.shutdown(&mut driver, &mut store);

        assert_eq!(driver.count(|c| matches!(c, GlCall::DeleteTexture(_))), 1);
        assert_eq!(driver.count(|c| matches!(c, GlCall::DeleteRenderTarget(_))), 1);
        assert_eq!(mgr.managed_count(), 0);
        assert_eq!(mgr.resident_count(), 0);
    }

    // ── notifications ─────────────────────────────────────────────────────

    #[test]
    fn sync_reuploads_on_update() {
        let (mut mgr, mut driver, mut store) = setup();
        let id = store.insert(LogicalTexture::from_source(PixelSource::solid(4, 4, [0; 4])));
        mgr.ensure_resident(&mut driver, store.get_mut(id).unwrap());
        driver.clear();

        store.get_mut(id).unwrap().update();
        assert_eq!(mgr.pending_events(), 1);

        assert_eq!(mgr.sync(&mut driver, &mut store), 1);
        assert_eq!(uploads(&driver), 1);
        assert_eq!(mgr.pending_events(), 0);
    }

    #[test]
    fn sync_releases_on_dispose() {
        let (mut mgr, mut driver, mut store) = setup();
        let id = store.insert(LogicalTexture::from_source(PixelSource::solid(4, 4, [0; 4])));
        mgr.ensure_resident(&mut driver, store.get_mut(id).unwrap());
        driver.clear();

        store.get_mut(id).unwrap().dispose();
        mgr.sync(&mut driver, &mut store);

        assert_eq!(driver.count(|c| matches!(c, GlCall::DeleteTexture(_))), 1);
        assert!(!mgr.is_managed(id));

        // Still loaded: next use makes it resident again.
        assert!(mgr.ensure_resident(&mut driver, store.get_mut(id).unwrap()).is_some());
    }

    #[test]
    fn destroyed_texture_is_released_and_not_recreated() {
        let (mut mgr, mut driver, mut store) = setup();
        let id = store.insert(LogicalTexture::from_source(PixelSource::solid(4, 4, [0; 4])));
        mgr.ensure_resident(&mut driver, store.get_mut(id).unwrap());

        store.get_mut(id).unwrap().destroy();
        mgr.sync(&mut driver, &mut store);

        let tex = store.get_mut(id).unwrap();
        assert_eq!(tex.handle(mgr.context()), None);
        assert!(mgr.ensure_resident(&mut driver, tex).is_none());
    }

    #[test]
    fn destroyed_texture_loses_its_handle_on_next_use() {
        let (mut mgr, mut driver, mut store) = setup();
        let id = store.insert(LogicalTexture::from_source(PixelSource::solid(4, 4, [0; 4])));
        mgr.ensure_resident(&mut driver, store.get_mut(id).unwrap());
        driver.clear();

        let tex = store.get_mut(id).unwrap();
        tex.destroy();
        assert!(mgr.ensure_resident(&mut driver, tex).is_none());

        assert_eq!(driver.calls(), &[GlCall::DeleteTexture(RawTexture(1))]);
        assert_eq!(store.get(id).unwrap().handle(mgr.context()), None);
        assert_eq!(mgr.resident_count(), 0);

        // The queued dispose finds nothing left to free.
        mgr.sync(&mut driver, &mut store);
        assert_eq!(driver.count(|c| matches!(c, GlCall::DeleteTexture(_))), 1);
    }

    #[test]
    fn destroyed_then_removed_texture_is_freed_on_sync() {
        let (mut mgr, mut driver, mut store) = setup();
        let id = store.insert(LogicalTexture::from_source(PixelSource::solid(4, 4, [0; 4])));
        mgr.ensure_resident(&mut driver, store.get_mut(id).unwrap());
        driver.clear();

        store.get_mut(id).unwrap().destroy();
        store.remove(id);
        assert_eq!(mgr.sync(&mut driver, &mut store), 1);

        assert_eq!(driver.calls(), &[GlCall::DeleteTexture(RawTexture(1))]);
        assert_eq!(mgr.resident_count(), 0);
        assert!(!mgr.is_managed(id));
    }

    #[test]
    fn contexts_keep_separate_handles() {
        let mut driver_a = TraceDriver::new();
        let mut driver_b = TraceDriver::new();
        let mut a = TextureManager::new(ContextId::next());
        let mut b = TextureManager::new(ContextId::next());
        let mut tex = LogicalTexture::from_source(PixelSource::solid(4, 4, [0; 4]));

        a.ensure_resident(&mut driver_a, &mut tex);
        b.ensure_resident(&mut driver_b, &mut tex);
        a.release(&mut driver_a, &mut tex, false);

        assert_eq!(tex.handle(a.context()), None);
        assert!(tex.handle(b.context()).is_some());
        assert!(driver_b.count(|c| matches!(c, GlCall::DeleteTexture(_))) == 0);
    }
}
