use anyhow::{ensure, Context, Result};

use crate::coords::Viewport;
use crate::device::{validate_context, Capabilities, GlDriver};
use crate::mask::{
    FilterPipeline, FilterStack, FilterTarget, MaskContext, MaskManager, MaskShape, MaskStrategy,
    StencilManager, StencilSubsystem,
};
use crate::state::StateTracker;
use crate::texture::{ContextId, RenderTargetInfo, TextureId, TextureManager, TextureStore};

use super::{DrawItem, Drawable, GpuContext, ObjectRenderer, RendererConfig, SpriteBatch};

/// One rendering context and the subsystems scoped to it.
///
/// Single-threaded: every call happens on the thread that owns the driver.
/// Calls follow scene traversal order, and every `push_mask` is matched by a
/// `pop_mask` before the parent finishes.
pub struct Renderer<D: GlDriver> {
    driver: D,
    config: RendererConfig,
    caps: Capabilities,
    context: ContextId,

    state: StateTracker,
    textures: TextureManager,
    masks: MaskManager,
    stencil: Box<dyn StencilSubsystem>,
    filters: Box<dyn FilterPipeline>,

    plugins: Vec<Box<dyn ObjectRenderer>>,
    current: Option<usize>,

    screen: RenderTargetInfo,
    active_target: RenderTargetInfo,
    /// Render texture bound as the active target, if not the screen.
    bound_texture: Option<TextureId>,
}

impl<D: GlDriver> Renderer<D> {
    /// Creates a renderer with the default stencil scheme, filter stack and a
    /// sprite batch plugin.
    pub fn new(driver: D, config: RendererConfig) -> Self {
        Self::with_subsystems(
            driver,
            config,
            Box::new(StencilManager::new()),
            Box::new(FilterStack::new()),
        )
    }

    pub fn with_subsystems(
        mut driver: D,
        config: RendererConfig,
        stencil: Box<dyn StencilSubsystem>,
        filters: Box<dyn FilterPipeline>,
    ) -> Self {
        let caps = Capabilities::negotiate(&driver);
        validate_context(&caps);

        let mut state = StateTracker::new(&caps);
        state.reset_to_default(&mut driver, config.default_state);

        let context = ContextId::next();
        let screen = RenderTargetInfo::screen(config.screen);
        log::debug!("renderer created for context {context:?}");

        Self {
            driver,
            caps,
            context,
            state,
            textures: TextureManager::new(context),
            masks: MaskManager::new(config.enable_scissor),
            stencil,
            filters,
            plugins: vec![Box::new(SpriteBatch::new())],
            current: None,
            screen,
            active_target: screen,
            bound_texture: None,
            config,
        }
    }

    // ── accessors ─────────────────────────────────────────────────────────

    #[inline]
    pub fn driver(&self) -> &D {
        &self.driver
    }

    #[inline]
    pub fn driver_mut(&mut self) -> &mut D {
        &mut self.driver
    }

    #[inline]
    pub fn config(&self) -> &RendererConfig {
        &self.config
    }

    #[inline]
    pub fn capabilities(&self) -> &Capabilities {
        &self.caps
    }

    #[inline]
    pub fn context(&self) -> ContextId {
        self.context
    }

    #[inline]
    pub fn state(&self) -> &StateTracker {
        &self.state
    }

    #[inline]
    pub fn textures(&self) -> &TextureManager {
        &self.textures
    }

    #[inline]
    pub fn masks(&self) -> &MaskManager {
        &self.masks
    }

    #[inline]
    pub fn stencil_depth(&self) -> usize {
        self.stencil.depth()
    }

    #[inline]
    pub fn filter_depth(&self) -> usize {
        self.filters.depth()
    }

    #[inline]
    pub fn active_target(&self) -> RenderTargetInfo {
        self.active_target
    }

    /// Name of the active plugin.
    pub fn current_plugin(&self) -> Option<&'static str> {
        self.current.map(|i| self.plugins[i].name())
    }

    // ── plugins ───────────────────────────────────────────────────────────

    /// Adds a plugin. A plugin with the same name is replaced.
    pub fn register_plugin(&mut self, plugin: Box<dyn ObjectRenderer>) {
        let name = plugin.name();
        match self.plugins.iter().position(|p| p.name() == name) {
            Some(i) => {
                if self.current == Some(i) {
                    self.flush();
                    self.current = None;
                }
                self.plugins[i] = plugin;
            }
            None => self.plugins.push(plugin),
        }
    }

    /// Makes `name` the active plugin, stopping the previous one. No-op if it
    /// already is. Returns `false` for an unknown name.
    pub fn set_object_renderer(&mut self, name: &str) -> bool {
        let Some(index) = self.plugins.iter().position(|p| p.name() == name) else {
            log::warn!("no object renderer named {name:?}");
            return false;
        };
        if self.current == Some(index) {
            return true;
        }

        let mut gpu = GpuContext::new(&mut self.driver, &mut self.state);
        if let Some(previous) = self.current {
            self.plugins[previous].stop(&mut gpu);
        }
        self.plugins[index].start(&mut gpu);
        self.current = Some(index);
        true
    }

    /// Stops the active plugin, drawing everything it buffered.
    pub fn flush(&mut self) {
        if let Some(index) = self.current {
            let mut gpu = GpuContext::new(&mut self.driver, &mut self.state);
            self.plugins[index].stop(&mut gpu);
        }
    }

    // ── frame ─────────────────────────────────────────────────────────────

    /// Buffers `object` in its plugin, making its texture resident first.
    ///
    /// Returns `false` if nothing was buffered: the object is not renderable,
    /// its texture is unknown or not loaded yet, or its plugin is missing.
    pub fn render(&mut self, object: &dyn Drawable, store: &mut TextureStore) -> bool {
        if !object.is_renderable() {
            return false;
        }

        let texture = match object.texture() {
            Some(id) => {
                let Some(logical) = store.get_mut(id) else {
                    return false;
                };
                let Some(index) = self.textures.ensure_resident(&mut self.driver, logical) else {
                    return false;
                };
                self.textures.handle(index).map(|h| h.texture)
            }
            None => None,
        };

        if !self.set_object_renderer(object.plugin()) {
            return false;
        }

        let item = DrawItem {
            texture,
            blend_mode: object.blend_mode(),
            vertices: object.vertices(),
        };
        if let Some(index) = self.current {
            self.plugins[index].render(&item);
        }
        true
    }

    /// Processes texture lifecycle events. Call once per frame before
    /// rendering.
    pub fn sync_textures(&mut self, store: &mut TextureStore) -> usize {
        self.textures.sync(&mut self.driver, store)
    }

    /// Applies `mask` to `target`'s subtree.
    pub fn push_mask(
        &mut self,
        target: &mut dyn FilterTarget,
        mask: &mut dyn MaskShape,
        store: &mut TextureStore,
    ) -> MaskStrategy {
        // The alpha-mask pass samples the mask texture.
        if let Some(logical) = mask.texture().and_then(|id| store.get_mut(id)) {
            self.textures.ensure_resident(&mut self.driver, logical);
        }

        let mut cx = MaskContext {
            gpu: GpuContext::new(&mut self.driver, &mut self.state),
            stencil: self.stencil.as_mut(),
            filters: self.filters.as_mut(),
            batch: match self.current {
                Some(i) => Some(self.plugins[i].as_mut()),
                None => None,
            },
            render_target: self.active_target,
            resolution: self.config.resolution,
        };
        self.masks.push_mask(&mut cx, target, mask)
    }

    /// Reverts the innermost mask, which must be `mask`.
    pub fn pop_mask(&mut self, mask: &dyn MaskShape) -> MaskStrategy {
        let mut cx = MaskContext {
            gpu: GpuContext::new(&mut self.driver, &mut self.state),
            stencil: self.stencil.as_mut(),
            filters: self.filters.as_mut(),
            batch: match self.current {
                Some(i) => Some(self.plugins[i].as_mut()),
                None => None,
            },
            render_target: self.active_target,
            resolution: self.config.resolution,
        };
        self.masks.pop_mask(&mut cx, mask)
    }

    // ── render targets ────────────────────────────────────────────────────

    /// Directs subsequent drawing into render texture `id`.
    pub fn bind_render_texture(&mut self, id: TextureId, store: &mut TextureStore) -> Result<()> {
        let logical = store
            .get_mut(id)
            .with_context(|| format!("texture {id:?} is not in the store"))?;
        ensure!(logical.is_render_target(), "texture {id:?} is not a render texture");

        self.flush();

        let index = self
            .textures
            .ensure_resident(&mut self.driver, logical)
            .with_context(|| format!("render texture {id:?} could not be made resident"))?;
        let (framebuffer, info) = self
            .textures
            .handle(index)
            .and_then(|h| h.render_target.as_ref())
            .map(|rt| (rt.framebuffer, rt.info()))
            .with_context(|| format!("texture {id:?} has no render target"))?;

        self.driver.bind_render_target(Some(framebuffer));
        self.active_target = info;
        self.bound_texture = Some(id);
        Ok(())
    }

    /// Directs subsequent drawing back to the screen.
    pub fn bind_screen(&mut self) {
        if self.bound_texture.is_none() {
            return;
        }
        self.flush();
        self.driver.bind_render_target(None);
        self.active_target = self.screen;
        self.bound_texture = None;
    }

    /// Render texture currently bound, if any.
    #[inline]
    pub fn bound_texture(&self) -> Option<TextureId> {
        self.bound_texture
    }

    /// Changes the logical size of the screen target.
    pub fn resize_screen(&mut self, size: Viewport) {
        if !size.is_valid() {
            log::warn!("ignoring screen resize to {}x{}", size.width, size.height);
            return;
        }
        self.config.screen = size;
        self.screen = RenderTargetInfo::screen(size);
        if self.bound_texture.is_none() {
            self.active_target = self.screen;
        }
    }

    // ── context lifecycle ─────────────────────────────────────────────────

    /// The driver lost its context: every GPU object is gone. Handles are
    /// dropped without destroy calls and recreated on next use.
    ///
    /// No driver call is made. Buffered geometry and applied masks belong to
    /// the dead context and are dropped.
    pub fn context_lost(&mut self, store: &mut TextureStore) {
        log::warn!("context {:?} lost", self.context);
        if let Some(index) = self.current.take() {
            self.plugins[index].discard();
        }
        self.masks.reset();
        self.stencil.reset();
        self.filters.reset();
        self.textures.invalidate_all(store);
        self.bound_texture = None;
        self.active_target = self.screen;
    }

    /// The driver has a fresh context. Capabilities are renegotiated and the
    /// default state applied.
    pub fn context_restored(&mut self) {
        self.caps = Capabilities::negotiate(&self.driver);
        validate_context(&self.caps);
        self.state = StateTracker::new(&self.caps);
        self.state
            .reset_to_default(&mut self.driver, self.config.default_state);
        self.driver.bind_render_target(None);
        log::debug!("context {:?} restored", self.context);
    }

    /// Flushes and frees every texture this context made resident.
    pub fn destroy(&mut self, store: &mut TextureStore) {
        self.flush();
        self.current = None;
        self.textures.shutdown(&mut self.driver, store);
        log::debug!("renderer for context {:?} destroyed", self.context);
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use super::*;
    use crate::coords::{Rect, Transform2D, Vec2};
    use crate::device::{Capability, GlCall, RawTexture, TraceDriver};
    use crate::mask::{ShapeMask, SpriteMask, TargetNode};
    use crate::render::Sprite;
    use crate::state::RenderState;
    use crate::texture::{LogicalTexture, PixelSource};

    fn renderer() -> Renderer<TraceDriver> {
        let mut r = Renderer::new(TraceDriver::new(), RendererConfig::default());
        r.driver_mut().clear();
        r
    }

    fn image(store: &mut TextureStore, w: u32, h: u32) -> TextureId {
        store.insert(LogicalTexture::from_source(PixelSource::solid(w, h, [255; 4])))
    }

    /// Plugin that logs its lifecycle into a shared journal.
    struct Journal {
        name: &'static str,
        log: Rc<RefCell<Vec<String>>>,
    }

    impl ObjectRenderer for Journal {
        fn name(&self) -> &'static str {
            self.name
        }

        fn start(&mut self, _gpu: &mut GpuContext<'_>) {
            self.log.borrow_mut().push(format!("{}:start", self.name));
        }

        fn render(&mut self, _item: &DrawItem) {
            self.log.borrow_mut().push(format!("{}:render", self.name));
        }

        fn flush(&mut self, _gpu: &mut GpuContext<'_>) {
            self.log.borrow_mut().push(format!("{}:flush", self.name));
        }

        fn discard(&mut self) {
            self.log.borrow_mut().push(format!("{}:discard", self.name));
        }
    }

    // ── creation ──────────────────────────────────────────────────────────

    #[test]
    fn creation_resets_state() {
        let r = Renderer::new(TraceDriver::new(), RendererConfig::default());
        assert_eq!(r.state().active(), Some(RenderState::default()));
        assert!(r.driver().calls().contains(&GlCall::UnpackFlipY(false)));
        assert!(r.active_target().root);
    }

    // ── rendering ─────────────────────────────────────────────────────────

    #[test]
    fn render_batches_until_flush() {
        let mut r = renderer();
        let mut store = TextureStore::new();
        let tex = image(&mut store, 32, 32);
        let sprite = Sprite::new(Some(tex), Vec2::new(32.0, 32.0));

        assert!(r.render(&sprite, &mut store));
        assert!(r.render(&sprite, &mut store));
        assert_eq!(r.driver().count(|c| matches!(c, GlCall::DrawQuads { .. })), 0);

        r.flush();
        assert_eq!(
            r.driver().count(|c| matches!(c, GlCall::DrawQuads { .. })),
            1
        );
        assert!(r
            .driver()
            .calls()
            .contains(&GlCall::DrawQuads { texture: Some(RawTexture(1)), vertices: 8 }));
    }

    #[test]
    fn render_skips_unloaded_texture() {
        let mut r = renderer();
        let mut store = TextureStore::new();
        let tex = store.insert(LogicalTexture::new());
        let sprite = Sprite::new(Some(tex), Vec2::new(8.0, 8.0));

        assert!(!r.render(&sprite, &mut store));
        assert!(r.driver().calls().is_empty());
        assert_eq!(r.current_plugin(), None);
    }

    #[test]
    fn plugin_switch_stops_previous_once() {
        let mut r = renderer();
        let log = Rc::new(RefCell::new(Vec::new()));
        r.register_plugin(Box::new(Journal { name: "a", log: log.clone() }));
        r.register_plugin(Box::new(Journal { name: "b", log: log.clone() }));
        let mut store = TextureStore::new();

        let mut sprite = Sprite::new(None, Vec2::new(1.0, 1.0));
        sprite.plugin = "a";
        r.render(&sprite, &mut store);
        r.render(&sprite, &mut store);
        sprite.plugin = "b";
        r.render(&sprite, &mut store);

        assert_eq!(
            *log.borrow(),
            vec!["a:start", "a:render", "a:render", "a:flush", "b:start", "b:render"]
        );
    }

    #[test]
    fn unknown_plugin_is_rejected() {
        let mut r = renderer();
        assert!(!r.set_object_renderer("nope"));
        let mut sprite = Sprite::new(None, Vec2::new(1.0, 1.0));
        sprite.plugin = "nope";
        assert!(!r.render(&sprite, &mut TextureStore::new()));
    }

    // ── masks ─────────────────────────────────────────────────────────────

    #[test]
    fn stencil_mask_flushes_pending_sprites_first() {
        let mut r = renderer();
        let mut store = TextureStore::new();
        let sprite = Sprite::new(None, Vec2::new(4.0, 4.0));
        r.render(&sprite, &mut store);

        let mut mask = ShapeMask::rect(Rect::new(0.0, 0.0, 10.0, 10.0))
            .with_transform(Transform2D::rotation(45f32.to_radians()));
        let strategy = r.push_mask(&mut TargetNode::default(), &mut mask, &mut store);

        assert_eq!(strategy, MaskStrategy::Stencil);
        let calls = r.driver().calls();
        let draw = calls
            .iter()
            .position(|c| matches!(c, GlCall::DrawQuads { .. }))
            .unwrap();
        let stencil = calls
            .iter()
            .position(|c| *c == GlCall::Enable(Capability::StencilTest))
            .unwrap();
        assert!(draw < stencil);
        assert_eq!(r.stencil_depth(), 1);

        r.pop_mask(&mask);
        assert_eq!(r.stencil_depth(), 0);
    }

    #[test]
    fn scissor_on_screen_flips_y() {
        let mut r = Renderer::new(
            TraceDriver::new(),
            RendererConfig {
                screen: Viewport::new(200.0, 100.0),
                ..RendererConfig::default()
            },
        );
        let mut mask = ShapeMask::rect(Rect::new(10.0, 10.0, 20.0, 30.0));

        r.push_mask(&mut TargetNode::default(), &mut mask, &mut TextureStore::new());

        assert!(r
            .driver()
            .calls()
            .contains(&GlCall::Scissor { x: 10, y: 60, width: 20, height: 30 }));
    }

    #[test]
    fn scissor_in_render_texture_keeps_y() {
        let mut r = renderer();
        let mut store = TextureStore::new();
        let rt = store.insert(LogicalTexture::render_target(64.0, 64.0, 1.0));
        r.bind_render_texture(rt, &mut store).unwrap();
        assert!(!r.active_target().root);

        let mut mask = ShapeMask::rect(Rect::new(10.0, 10.0, 20.0, 30.0));
        r.push_mask(&mut TargetNode::default(), &mut mask, &mut store);

        assert!(r
            .driver()
            .calls()
            .contains(&GlCall::Scissor { x: 10, y: 10, width: 20, height: 30 }));
    }

    #[test]
    fn sprite_mask_makes_mask_texture_resident() {
        let mut r = renderer();
        let mut store = TextureStore::new();
        let tex = image(&mut store, 16, 16);
        let mut mask = SpriteMask::new(tex, Vec2::new(16.0, 16.0), Transform2D::IDENTITY);

        assert_eq!(
            r.push_mask(&mut TargetNode::default(), &mut mask, &mut store),
            MaskStrategy::Sprite
        );
        assert!(r.textures().handle_for(store.get(tex).unwrap()).is_some());
        assert_eq!(r.filter_depth(), 1);

        r.pop_mask(&mask);
        assert_eq!(r.filter_depth(), 0);
    }

    // ── render targets ────────────────────────────────────────────────────

    #[test]
    fn binding_image_texture_fails() {
        let mut r = renderer();
        let mut store = TextureStore::new();
        let tex = image(&mut store, 4, 4);

        let err = r.bind_render_texture(tex, &mut store).unwrap_err();
        assert!(err.to_string().contains("not a render texture"));
        assert!(r.active_target().root);
    }

    #[test]
    fn bind_screen_restores_root() {
        let mut r = renderer();
        let mut store = TextureStore::new();
        let rt = store.insert(LogicalTexture::render_target(32.0, 16.0, 1.0));

        r.bind_render_texture(rt, &mut store).unwrap();
        assert_eq!(r.bound_texture(), Some(rt));
        assert_eq!(r.active_target().size, Viewport::new(32.0, 16.0));

        r.bind_screen();
        assert_eq!(r.bound_texture(), None);
        assert!(r.active_target().root);
        assert_eq!(r.active_target().size, Viewport::new(800.0, 600.0));
    }

    #[test]
    fn target_switch_flushes_before_binding() {
        let mut r = renderer();
        let mut store = TextureStore::new();
        let tex = image(&mut store, 8, 8);
        let rt = store.insert(LogicalTexture::render_target(32.0, 32.0, 1.0));
        let sprite = Sprite::new(Some(tex), Vec2::new(8.0, 8.0));

        r.render(&sprite, &mut store);
        r.bind_render_texture(rt, &mut store).unwrap();
        let fb = r
            .textures()
            .handle_for(store.get(rt).unwrap())
            .and_then(|h| h.render_target.as_ref())
            .map(|t| t.framebuffer)
            .unwrap();
        r.render(&sprite, &mut store);
        r.bind_screen();
        r.render(&sprite, &mut store);
        r.flush();

        let order: Vec<String> = r
            .driver()
            .calls()
            .iter()
            .filter_map(|c| match c {
                GlCall::DrawQuads { .. } => Some("draw".to_string()),
                GlCall::BindRenderTarget(t) => Some(format!("bind {t:?}")),
                _ => None,
            })
            .collect();
        assert_eq!(
            order,
            vec![
                "draw".to_string(),
                format!("bind {:?}", Some(fb)),
                "draw".to_string(),
                "bind None".to_string(),
                "draw".to_string(),
            ]
        );
    }

    #[test]
    fn bind_screen_without_target_is_silent() {
        let mut r = renderer();
        r.bind_screen();
        assert!(r.driver().calls().is_empty());
    }

    #[test]
    fn invalid_screen_resize_is_ignored() {
        let mut r = renderer();
        r.resize_screen(Viewport::new(0.0, 480.0));
        assert_eq!(r.active_target().size, Viewport::new(800.0, 600.0));

        r.resize_screen(Viewport::new(640.0, 480.0));
        assert_eq!(r.active_target().size, Viewport::new(640.0, 480.0));
        assert_eq!(r.config().screen, Viewport::new(640.0, 480.0));
    }

    // ── context lifecycle ─────────────────────────────────────────────────

    #[test]
    fn context_loss_recreates_textures_lazily() {
        let mut r = renderer();
        let mut store = TextureStore::new();
        let tex = image(&mut store, 8, 8);
        let sprite = Sprite::new(Some(tex), Vec2::new(8.0, 8.0));
        r.render(&sprite, &mut store);
        r.flush();
        r.driver_mut().clear();

        r.context_lost(&mut store);
        assert!(r.driver().calls().is_empty());
        assert_eq!(r.textures().resident_count(), 0);

        r.context_restored();
        assert!(r.render(&sprite, &mut store));
        assert_eq!(
            r.driver().count(|c| matches!(c, GlCall::CreateTexture { .. })),
            1
        );
        assert_eq!(r.driver().count(|c| matches!(c, GlCall::DeleteTexture(_))), 0);
    }

    #[test]
    fn context_loss_drops_buffered_work_and_masks() {
        let mut r = renderer();
        let log = Rc::new(RefCell::new(Vec::new()));
        r.register_plugin(Box::new(Journal { name: "j", log: log.clone() }));
        let mut store = TextureStore::new();
        let rt = store.insert(LogicalTexture::render_target(16.0, 16.0, 1.0));
        r.bind_render_texture(rt, &mut store).unwrap();

        let mut sprite = Sprite::new(None, Vec2::new(4.0, 4.0));
        sprite.plugin = "j";
        r.render(&sprite, &mut store);
        let mut stencil = ShapeMask::rect(Rect::new(0.0, 0.0, 8.0, 8.0))
            .with_transform(Transform2D::rotation(30f32.to_radians()));
        r.push_mask(&mut TargetNode::default(), &mut stencil, &mut store);
        let tex = image(&mut store, 4, 4);
        let mut sprite_mask = SpriteMask::new(tex, Vec2::new(4.0, 4.0), Transform2D::IDENTITY);
        r.push_mask(&mut TargetNode::default(), &mut sprite_mask, &mut store);
        r.render(&sprite, &mut store);
        log.borrow_mut().clear();
        r.driver_mut().clear();

        r.context_lost(&mut store);

        assert!(r.driver().calls().is_empty());
        assert_eq!(*log.borrow(), vec!["j:discard"]);
        assert_eq!(r.current_plugin(), None);
        assert_eq!(r.stencil_depth(), 0);
        assert_eq!(r.filter_depth(), 0);
        assert_eq!(r.masks().depth(), 0);
        assert_eq!(r.bound_texture(), None);

        r.context_restored();
        assert_eq!(r.driver().calls().last(), Some(&GlCall::BindRenderTarget(None)));
        r.flush();
        assert!(log.borrow().iter().all(|e| e != "j:flush"));
    }

    #[test]
    fn destroy_flushes_and_frees() {
        let mut r = renderer();
        let mut store = TextureStore::new();
        let tex = image(&mut store, 8, 8);
        r.render(&Sprite::new(Some(tex), Vec2::new(8.0, 8.0)), &mut store);
        r.driver_mut().clear();

        r.destroy(&mut store);

        let calls = r.driver().calls();
        assert!(matches!(calls[calls.len() - 2], GlCall::DrawQuads { .. }));
        assert_eq!(calls.last(), Some(&GlCall::DeleteTexture(RawTexture(1))));
        assert_eq!(r.textures().managed_count(), 0);
    }

    #[test]
    fn sync_textures_reuploads_updated_content() {
        let mut r = renderer();
        let mut store = TextureStore::new();
        let tex = image(&mut store, 8, 8);
        r.render(&Sprite::new(Some(tex), Vec2::new(8.0, 8.0)), &mut store);
        r.driver_mut().clear();

        store.get_mut(tex).unwrap().update();
        assert_eq!(r.sync_textures(&mut store), 1);
        assert_eq!(
            r.driver().count(|c| matches!(c, GlCall::UploadTexture { .. })),
            1
        );
    }
}
