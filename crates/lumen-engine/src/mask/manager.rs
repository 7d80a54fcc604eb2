use crate::coords::Rect;
use crate::device::Capability;
use crate::render::{GpuContext, ObjectRenderer};
use crate::texture::{RenderTargetInfo, TextureId};

use super::{AlphaMaskFilter, FilterPipeline, FilterTarget, MaskShape, StencilSubsystem};

#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum MaskStrategy {
    Scissor,
    Stencil,
    Sprite,
}

/// Chooses how `mask` is applied.
///
/// - textured masks are always sprites
/// - a rectangle whose world rotation, rounded to whole degrees, is a
///   multiple of 90° is scissored, provided scissor masking is enabled and
///   neither a scissor nor a stencil mask is already active
/// - everything else goes to the stencil buffer
pub fn classify(
    mask: &dyn MaskShape,
    enable_scissor: bool,
    scissor_active: bool,
    stencil_depth: usize,
) -> MaskStrategy {
    if mask.texture().is_some() {
        return MaskStrategy::Sprite;
    }

    if enable_scissor && !scissor_active && stencil_depth == 0 && mask.is_fast_rect() {
        let degrees = mask.world_transform().rotation_angle().to_degrees().round() as i32;
        if degrees % 90 == 0 {
            return MaskStrategy::Scissor;
        }
        log::debug!("mask rotated {degrees}°, falling back to stencil");
    }

    MaskStrategy::Stencil
}

/// One applied mask, with what is needed to revert it.
#[derive(Debug, Clone, PartialEq)]
pub enum MaskEntry {
    Scissor {
        target: RenderTargetInfo,
        /// Logical bounds after fitting into the target.
        bounds: Rect,
    },
    Stencil {
        /// Stencil depth after the push.
        depth: usize,
    },
    Sprite {
        pool_index: usize,
        mask: TextureId,
    },
}

impl MaskEntry {
    pub fn strategy(&self) -> MaskStrategy {
        match self {
            MaskEntry::Scissor { .. } => MaskStrategy::Scissor,
            MaskEntry::Stencil { .. } => MaskStrategy::Stencil,
            MaskEntry::Sprite { .. } => MaskStrategy::Sprite,
        }
    }
}

/// Everything a mask push/pop touches besides the manager itself.
pub struct MaskContext<'a> {
    pub gpu: GpuContext<'a>,
    pub stencil: &'a mut dyn StencilSubsystem,
    pub filters: &'a mut dyn FilterPipeline,
    /// The active batch plugin; stopped before any GPU state changes.
    pub batch: Option<&'a mut dyn ObjectRenderer>,
    pub render_target: RenderTargetInfo,
    pub resolution: f32,
}

impl MaskContext<'_> {
    fn stop_batch(&mut self) {
        if let Some(batch) = self.batch.as_deref_mut() {
            batch.stop(&mut self.gpu);
        }
    }
}

/// Applies and reverts masks in traversal order.
#[derive(Debug)]
pub struct MaskManager {
    pub enable_scissor: bool,

    /// Target the active scissor rectangle was computed against.
    scissor_target: Option<RenderTargetInfo>,

    /// Alpha-mask filters indexed by sprite-mask depth. Grows, never shrinks.
    alpha_mask_pool: Vec<AlphaMaskFilter>,
    alpha_mask_index: usize,

    entries: Vec<MaskEntry>,
}

impl MaskManager {
    pub fn new(enable_scissor: bool) -> Self {
        Self {
            enable_scissor,
            scissor_target: None,
            alpha_mask_pool: Vec::new(),
            alpha_mask_index: 0,
            entries: Vec::new(),
        }
    }

    #[inline]
    pub fn is_scissor_active(&self) -> bool {
        self.scissor_target.is_some()
    }

    #[inline]
    pub fn scissor_target(&self) -> Option<RenderTargetInfo> {
        self.scissor_target
    }

    /// Number of masks currently applied, all strategies.
    #[inline]
    pub fn depth(&self) -> usize {
        self.entries.len()
    }

    /// Forgets every applied mask. The alpha-mask pool is kept.
    pub fn reset(&mut self) {
        self.entries.clear();
        self.scissor_target = None;
        self.alpha_mask_index = 0;
    }

    #[inline]
    pub fn alpha_mask_depth(&self) -> usize {
        self.alpha_mask_index
    }

    #[inline]
    pub fn alpha_mask_pool_len(&self) -> usize {
        self.alpha_mask_pool.len()
    }

    /// Strategy of the innermost mask.
    pub fn active_strategy(&self) -> Option<MaskStrategy> {
        self.entries.last().map(MaskEntry::strategy)
    }

    #[inline]
    pub fn entries(&self) -> &[MaskEntry] {
        &self.entries
    }

    /// Applies `mask` to everything drawn until the matching
    /// [`pop_mask`](Self::pop_mask).
    pub fn push_mask(
        &mut self,
        cx: &mut MaskContext<'_>,
        target: &mut dyn FilterTarget,
        mask: &mut dyn MaskShape,
    ) -> MaskStrategy {
        let strategy = classify(
            mask,
            self.enable_scissor,
            self.is_scissor_active(),
            cx.stencil.depth(),
        );
        log::debug!("push {strategy:?} mask (depth {})", self.entries.len());

        cx.stop_batch();

        match (strategy, mask.texture()) {
            (MaskStrategy::Sprite, Some(texture)) => {
                self.push_sprite_mask(cx, target, mask, texture)
            }
            (MaskStrategy::Scissor, _) => self.push_scissor_mask(cx, mask),
            _ => self.push_stencil_mask(cx, mask),
        }

        strategy
    }

    /// Reverts the innermost mask.
    ///
    /// The strategy is re-derived from `mask` and the current stencil depth
    /// exactly as the push chose it.
    ///
    /// # Panics
    ///
    /// If no mask is applied, or `mask` does not match the innermost one.
    pub fn pop_mask(&mut self, cx: &mut MaskContext<'_>, mask: &dyn MaskShape) -> MaskStrategy {
        let Some(entry) = self.entries.pop() else {
            panic!("pop_mask called with an empty mask stack");
        };

        let strategy = if mask.texture().is_some() {
            MaskStrategy::Sprite
        } else if self.enable_scissor && cx.stencil.depth() == 0 {
            MaskStrategy::Scissor
        } else {
            MaskStrategy::Stencil
        };
        assert_eq!(strategy, entry.strategy(), "mask popped out of order");
        log::trace!("pop {strategy:?} mask (depth {})", self.entries.len());

        cx.stop_batch();

        match strategy {
            MaskStrategy::Sprite => self.pop_sprite_mask(cx),
            MaskStrategy::Scissor => self.pop_scissor_mask(cx),
            MaskStrategy::Stencil => cx.stencil.pop_stencil(&mut *cx.gpu.driver),
        }

        strategy
    }

    // ── sprite ────────────────────────────────────────────────────────────

    fn push_sprite_mask(
        &mut self,
        cx: &mut MaskContext<'_>,
        target: &mut dyn FilterTarget,
        mask: &dyn MaskShape,
        texture: TextureId,
    ) {
        let index = self.alpha_mask_index;
        if index == self.alpha_mask_pool.len() {
            self.alpha_mask_pool.push(AlphaMaskFilter {
                mask: texture,
                mask_transform: mask.world_transform(),
                resolution: cx.resolution,
            });
        }

        let filter = &mut self.alpha_mask_pool[index];
        filter.resolution = cx.resolution;
        filter.set_mask(mask);

        target.set_filter_area(Some(mask.bounds()));
        cx.filters
            .push_filter(target, std::slice::from_ref(&self.alpha_mask_pool[index]));

        self.alpha_mask_index += 1;
        self.entries.push(MaskEntry::Sprite {
            pool_index: index,
            mask: texture,
        });
    }

    fn pop_sprite_mask(&mut self, cx: &mut MaskContext<'_>) {
        cx.filters.pop_filter();
        self.alpha_mask_index -= 1;
    }

    // ── stencil ───────────────────────────────────────────────────────────

    fn push_stencil_mask(&mut self, cx: &mut MaskContext<'_>, mask: &dyn MaskShape) {
        cx.stencil.push_stencil(&mut *cx.gpu.driver, mask);
        self.entries.push(MaskEntry::Stencil {
            depth: cx.stencil.depth(),
        });
    }

    // ── scissor ───────────────────────────────────────────────────────────

    fn push_scissor_mask(&mut self, cx: &mut MaskContext<'_>, mask: &mut dyn MaskShape) {
        let target = cx.render_target;

        mask.set_renderable(true);
        let bounds = mask.bounds().fit(target.size.as_rect());
        mask.set_renderable(false);

        // Root targets have their origin at the bottom.
        let y = if target.root {
            target.size.height - bounds.y() - bounds.height()
        } else {
            bounds.y()
        };

        let res = cx.resolution;
        let driver = &mut *cx.gpu.driver;
        driver.set_enabled(Capability::ScissorTest, true);
        driver.scissor(
            (bounds.x() * res) as i32,
            (y * res) as i32,
            (bounds.width() * res) as i32,
            (bounds.height() * res) as i32,
        );

        self.scissor_target = Some(target);
        self.entries.push(MaskEntry::Scissor { target, bounds });
    }

    fn pop_scissor_mask(&mut self, cx: &mut MaskContext<'_>) {
        self.scissor_target = None;
        cx.gpu.driver.set_enabled(Capability::ScissorTest, false);
    }
}
