use crate::coords::Vec2;
use crate::device::{Capability, GlDriver, StencilFunc, StencilOp};

use super::MaskShape;

/// Stencil-buffer clipping with its own nesting stack.
pub trait StencilSubsystem {
    fn push_stencil(&mut self, driver: &mut dyn GlDriver, mask: &dyn MaskShape);

    /// # Panics
    ///
    /// Implementations panic when nothing was pushed.
    fn pop_stencil(&mut self, driver: &mut dyn GlDriver);

    /// Number of stencil masks currently applied.
    fn depth(&self) -> usize;

    /// Forgets every applied mask without touching the GPU.
    fn reset(&mut self);
}

/// Increment/decrement stencil scheme.
///
/// Each nested mask increments the stencil value inside its geometry; the
/// test passes where the value is non-zero under a mask of the current depth.
/// Popping redraws the geometry with decrement, so the stack keeps it.
#[derive(Debug, Default)]
pub struct StencilManager {
    stack: Vec<Vec<Vec2>>,
}

impl StencilManager {
    pub fn new() -> Self {
        Self::default()
    }

    fn write(driver: &mut dyn GlDriver, geometry: &[Vec2], op: StencilOp, depth: usize) {
        driver.color_mask(false);
        driver.stencil_op(op);
        driver.draw_geometry(geometry);
        driver.color_mask(true);
        driver.stencil_func(StencilFunc::NotEqual, 0, depth as u32);
        driver.stencil_op(StencilOp::Keep);
    }
}

impl StencilSubsystem for StencilManager {
    fn push_stencil(&mut self, driver: &mut dyn GlDriver, mask: &dyn MaskShape) {
        if self.stack.is_empty() {
            driver.set_enabled(Capability::StencilTest, true);
            driver.clear_stencil();
            driver.stencil_func(StencilFunc::Always, 1, 1);
        }

        self.stack.push(mask.stencil_geometry());
        let depth = self.stack.len();
        Self::write(driver, &self.stack[depth - 1], StencilOp::Incr, depth);
    }

    fn reset(&mut self) {
        self.stack.clear();
    }

    fn pop_stencil(&mut self, driver: &mut dyn GlDriver) {
        let Some(geometry) = self.stack.pop() else {
            panic!("pop_stencil called with an empty stencil stack");
        };

        if self.stack.is_empty() {
            driver.set_enabled(Capability::StencilTest, false);
        } else {
            Self::write(driver, &geometry, StencilOp::Decr, self.stack.len());
        }
    }

    fn depth(&self) -> usize {
        self.stack.len()
    }
}
