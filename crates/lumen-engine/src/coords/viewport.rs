use super::Rect;

/// Render-target size in logical pixels.
///
/// The screen target and every render texture carry one; the scissor path
/// clips mask bounds against it before converting to device pixels.
#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
}

impl Viewport {
    #[inline]
    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    #[inline]
    pub fn is_valid(self) -> bool {
        self.width > 0.0 && self.height > 0.0 && self.width.is_finite() && self.height.is_finite()
    }

    /// The viewport as a rectangle anchored at the origin.
    #[inline]
    pub fn as_rect(self) -> Rect {
        Rect::new(0.0, 0.0, self.width, self.height)
    }

    /// Size in device pixels, rounded up so a fractional resolution never
    /// truncates the last row or column.
    #[inline]
    pub fn physical(self, resolution: f32) -> (u32, u32) {
        let w = (self.width * resolution).ceil().max(0.0) as u32;
        let h = (self.height * resolution).ceil().max(0.0) as u32;
        (w, h)
    }
}
