use crate::coords::{Rect, Transform2D};
use crate::texture::TextureId;

use super::MaskShape;

/// Object a filter pass is applied to.
pub trait FilterTarget {
    /// Region the filter pipeline renders, if restricted.
    fn filter_area(&self) -> Option<Rect>;
    fn set_filter_area(&mut self, area: Option<Rect>);
}

/// Minimal [`FilterTarget`] for callers without a scene node of their own.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TargetNode {
    pub filter_area: Option<Rect>,
}

impl FilterTarget for TargetNode {
    fn filter_area(&self) -> Option<Rect> {
        self.filter_area
    }

    fn set_filter_area(&mut self, area: Option<Rect>) {
        self.filter_area = area;
    }
}

/// Filter pass multiplying the target by a mask texture's alpha.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct AlphaMaskFilter {
    pub mask: TextureId,
    /// World transform of the mask sprite, used to map target pixels to mask
    /// texture coordinates.
    pub mask_transform: Transform2D,
    pub resolution: f32,
}

impl AlphaMaskFilter {
    pub fn new(mask: &dyn MaskShape, resolution: f32) -> Option<Self> {
        Some(Self {
            mask: mask.texture()?,
            mask_transform: mask.world_transform(),
            resolution,
        })
    }

    /// Points this filter at another mask sprite.
    pub fn set_mask(&mut self, mask: &dyn MaskShape) {
        if let Some(texture) = mask.texture() {
            self.mask = texture;
        }
        self.mask_transform = mask.world_transform();
    }
}

/// Stack-shaped filter pipeline.
pub trait FilterPipeline {
    fn push_filter(&mut self, target: &mut dyn FilterTarget, filters: &[AlphaMaskFilter]);

    /// # Panics
    ///
    /// Implementations panic when nothing was pushed.
    fn pop_filter(&mut self);

    fn depth(&self) -> usize;

    /// Drops every frame; the passes will never run.
    fn reset(&mut self);
}

/// One pushed region and the passes applied to it.
#[derive(Debug, Clone, PartialEq)]
pub struct FilterStackFrame {
    /// `None` when the target did not restrict its filter area.
    pub region: Option<Rect>,
    pub filters: Vec<AlphaMaskFilter>,
}

/// Default [`FilterPipeline`]: records frames for a pass renderer to consume.
#[derive(Debug, Default)]
pub struct FilterStack {
    frames: Vec<FilterStackFrame>,
}

impl FilterStack {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn frames(&self) -> &[FilterStackFrame] {
        &self.frames
    }

    #[inline]
    pub fn top(&self) -> Option<&FilterStackFrame> {
        self.frames.last()
    }
}

impl FilterPipeline for FilterStack {
    fn push_filter(&mut self, target: &mut dyn FilterTarget, filters: &[AlphaMaskFilter]) {
        self.frames.push(FilterStackFrame {
            region: target.filter_area(),
            filters: filters.to_vec(),
        });
    }

    fn pop_filter(&mut self) {
        assert!(self.frames.pop().is_some(), "pop_filter called with an empty filter stack");
    }

    fn depth(&self) -> usize {
        self.frames.len()
    }

    fn reset(&mut self) {
        self.frames.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coords::Vec2;
    use crate::mask::{ShapeMask, SpriteMask};

    #[test]
    fn filter_requires_textured_mask() {
        let shape = ShapeMask::rect(Rect::new(0.0, 0.0, 1.0, 1.0));
        assert!(AlphaMaskFilter::new(&shape, 1.0).is_none());

        let sprite = SpriteMask::new(TextureId::next(), Vec2::new(1.0, 1.0), Transform2D::IDENTITY);
        assert!(AlphaMaskFilter::new(&sprite, 2.0).is_some());
    }

    #[test]
    fn stack_records_target_region() {
        let sprite = SpriteMask::new(TextureId::next(), Vec2::new(4.0, 4.0), Transform2D::IDENTITY);
        let filter = AlphaMaskFilter::new(&sprite, 1.0).unwrap();
        let mut target = TargetNode { filter_area: Some(Rect::new(1.0, 2.0, 3.0, 4.0)) };
        let mut stack = FilterStack::new();

        stack.push_filter(&mut target, &[filter]);

        assert_eq!(stack.depth(), 1);
        assert_eq!(stack.top().unwrap().region, Some(Rect::new(1.0, 2.0, 3.0, 4.0)));
        assert_eq!(stack.top().unwrap().filters, vec![filter]);

        stack.pop_filter();
        assert_eq!(stack.depth(), 0);
    }

    #[test]
    #[should_panic(expected = "empty filter stack")]
    fn pop_underflow_panics() {
        FilterStack::new().pop_filter();
    }
}
