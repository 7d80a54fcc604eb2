use crate::coords::{Rect, Transform2D, Vec2};
use crate::state::BlendMode;
use crate::texture::TextureId;

use super::QuadVertex;

/// Something the renderer can draw as one quad.
pub trait Drawable {
    fn texture(&self) -> Option<TextureId>;
    fn blend_mode(&self) -> BlendMode;

    /// Name of the [`ObjectRenderer`](super::ObjectRenderer) that batches it.
    fn plugin(&self) -> &'static str {
        "sprite"
    }

    fn is_renderable(&self) -> bool {
        true
    }

    /// World-space corners, clockwise from top-left.
    fn vertices(&self) -> [QuadVertex; 4];
}

/// Textured, transformed rectangle.
#[derive(Debug, Clone, PartialEq)]
pub struct Sprite {
    pub texture: Option<TextureId>,
    pub transform: Transform2D,
    /// Logical size before transformation.
    pub size: Vec2,
    /// Origin as a fraction of `size` (0,0 = top-left).
    pub anchor: Vec2,
    pub tint: [f32; 3],
    pub alpha: f32,
    pub blend_mode: BlendMode,
    pub visible: bool,
    pub plugin: &'static str,
}

impl Sprite {
    pub fn new(texture: Option<TextureId>, size: Vec2) -> Self {
        Self {
            texture,
            transform: Transform2D::IDENTITY,
            size,
            anchor: Vec2::zero(),
            tint: [1.0; 3],
            alpha: 1.0,
            blend_mode: BlendMode::Normal,
            visible: true,
            plugin: "sprite",
        }
    }

    pub fn with_transform(mut self, transform: Transform2D) -> Self {
        self.transform = transform;
        self
    }

    pub fn with_blend_mode(mut self, mode: BlendMode) -> Self {
        self.blend_mode = mode;
        self
    }

    /// Untransformed rectangle, offset by the anchor.
    pub fn local_rect(&self) -> Rect {
        let offset = self.anchor.hadamard(self.size);
        Rect::new(-offset.x, -offset.y, self.size.x, self.size.y)
    }

    /// Axis-aligned world bounds.
    pub fn bounds(&self) -> Rect {
        self.transform.transform_rect(self.local_rect())
    }
}

impl Drawable for Sprite {
    fn texture(&self) -> Option<TextureId> {
        self.texture
    }

    fn blend_mode(&self) -> BlendMode {
        self.blend_mode
    }

    fn plugin(&self) -> &'static str {
        self.plugin
    }

    fn is_renderable(&self) -> bool {
        self.visible && self.alpha > 0.0
    }

    fn vertices(&self) -> [QuadVertex; 4] {
        let a = self.alpha;
        let color = [self.tint[0] * a, self.tint[1] * a, self.tint[2] * a, a];
        let uvs = [[0.0, 0.0], [1.0, 0.0], [1.0, 1.0], [0.0, 1.0]];
        let corners = self.local_rect().corners();

        std::array::from_fn(|i| {
            let p = self.transform.apply(corners[i]);
            QuadVertex {
                pos: [p.x, p.y],
                uv: uvs[i],
                color,
            }
        })
    }
}
