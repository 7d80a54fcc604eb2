use anyhow::{ensure, Result};

/// Sampling filter.
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq, Hash)]
pub enum ScaleMode {
    #[default]
    Linear,
    Nearest,
}

/// Addressing mode outside `[0, 1]`.
///
/// Only honoured for power-of-two textures; everything else is clamped.
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq, Hash)]
pub enum WrapMode {
    #[default]
    Clamp,
    Repeat,
    MirroredRepeat,
}

/// Decoded RGBA8 pixels, row-major, top row first.
#[derive(Debug, Clone, PartialEq)]
pub struct PixelSource {
    width: u32,
    height: u32,
    pixels: Vec<u8>,
}

impl PixelSource {
    pub fn new(width: u32, height: u32, pixels: Vec<u8>) -> Result<Self> {
        ensure!(width > 0 && height > 0, "pixel source must not be empty ({width}x{height})");
        let expected = width as usize * height as usize * 4;
        ensure!(
            pixels.len() == expected,
            "pixel source {width}x{height} needs {expected} bytes, got {}",
            pixels.len()
        );
        Ok(Self { width, height, pixels })
    }

    /// A source filled with one colour.
    pub fn solid(width: u32, height: u32, rgba: [u8; 4]) -> Self {
        let count = width.max(1) as usize * height.max(1) as usize;
        Self {
            width: width.max(1),
            height: height.max(1),
            pixels: rgba.repeat(count),
        }
    }

    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    #[inline]
    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    #[inline]
    pub fn pixels_mut(&mut self) -> &mut [u8] {
        &mut self.pixels
    }
}

#[inline]
pub fn is_power_of_two(width: u32, height: u32) -> bool {
    width.is_power_of_two() && height.is_power_of_two()
}

/// Full mip chain length for a `width`×`height` texture.
#[inline]
pub fn mip_level_count(width: u32, height: u32) -> u32 {
    32 - width.max(height).max(1).leading_zeros()
}
