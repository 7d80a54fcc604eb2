use crate::device::BlendFactor;

/// Compositing modes a display object can request.
///
/// Only the first four have a fixed-function equivalent; the others render as
/// [`Normal`](BlendMode::Normal) unless a filter implements them.
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq, Hash)]
pub enum BlendMode {
    #[default]
    Normal,
    Add,
    Multiply,
    Screen,
    Overlay,
    Darken,
    Lighten,
    ColorDodge,
    ColorBurn,
    HardLight,
    SoftLight,
    Difference,
    Exclusion,
    Hue,
    Saturation,
    Color,
    Luminosity,
}

impl BlendMode {
    pub const ALL: [BlendMode; 17] = [
        BlendMode::Normal,
        BlendMode::Add,
        BlendMode::Multiply,
        BlendMode::Screen,
        BlendMode::Overlay,
        BlendMode::Darken,
        BlendMode::Lighten,
        BlendMode::ColorDodge,
        BlendMode::ColorBurn,
        BlendMode::HardLight,
        BlendMode::SoftLight,
        BlendMode::Difference,
        BlendMode::Exclusion,
        BlendMode::Hue,
        BlendMode::Saturation,
        BlendMode::Color,
        BlendMode::Luminosity,
    ];

    #[inline]
    pub fn index(self) -> usize {
        self as usize
    }
}

/// Blend mode → (src, dst) factor pair. Built once, read-only afterwards.
///
/// Factors assume premultiplied-alpha colour.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlendTable {
    factors: [(BlendFactor, BlendFactor); 17],
}

impl BlendTable {
    pub fn new() -> Self {
        use BlendFactor::*;

        let normal = (One, OneMinusSrcAlpha);
        let mut factors = [normal; 17];
        factors[BlendMode::Add.index()] = (One, DstAlpha);
        factors[BlendMode::Multiply.index()] = (DstColor, OneMinusSrcAlpha);
        factors[BlendMode::Screen.index()] = (One, OneMinusSrcColor);

        Self { factors }
    }

    #[inline]
    pub fn factors(&self, mode: BlendMode) -> (BlendFactor, BlendFactor) {
        self.factors[mode.index()]
    }
}

impl Default for BlendTable {
    fn default() -> Self {
        Self::new()
    }
}
