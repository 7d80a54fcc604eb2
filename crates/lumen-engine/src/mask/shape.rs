use crate::coords::{Rect, Transform2D, Vec2};
use crate::texture::TextureId;

/// A display object used as a clip region.
pub trait MaskShape {
    /// Image masks carry a texture and are always composited as sprites.
    fn texture(&self) -> Option<TextureId>;

    /// True if the shape is a single rectangle, so that under an
    /// axis-aligned transform it can be clipped by scissor.
    fn is_fast_rect(&self) -> bool;

    fn world_transform(&self) -> Transform2D;

    /// World-space axis-aligned bounds.
    fn bounds(&self) -> Rect;

    fn renderable(&self) -> bool;
    fn set_renderable(&mut self, renderable: bool);

    /// World-space triangle list written into the stencil buffer.
    fn stencil_geometry(&self) -> Vec<Vec2>;
}

/// Local-space geometry of a [`ShapeMask`].
#[derive(Debug, Clone, PartialEq)]
pub enum MaskGeometry {
    Rect(Rect),
    /// Pre-tessellated triangle list.
    Triangles(Vec<Vec2>),
}

/// Vector mask: a rectangle or arbitrary triangles under a transform.
#[derive(Debug, Clone, PartialEq)]
pub struct ShapeMask {
    pub geometry: MaskGeometry,
    pub transform: Transform2D,
    renderable: bool,
}

impl ShapeMask {
    pub fn new(geometry: MaskGeometry, transform: Transform2D) -> Self {
        Self {
            geometry,
            transform,
            renderable: true,
        }
    }

    pub fn rect(rect: Rect) -> Self {
        Self::new(MaskGeometry::Rect(rect), Transform2D::IDENTITY)
    }

    pub fn with_transform(mut self, transform: Transform2D) -> Self {
        self.transform = transform;
        self
    }
}

impl MaskShape for ShapeMask {
    fn texture(&self) -> Option<TextureId> {
        None
    }

    fn is_fast_rect(&self) -> bool {
        matches!(self.geometry, MaskGeometry::Rect(_))
    }

    fn world_transform(&self) -> Transform2D {
        self.transform
    }

    fn bounds(&self) -> Rect {
        match &self.geometry {
            MaskGeometry::Rect(r) => self.transform.transform_rect(*r),
            MaskGeometry::Triangles(points) => {
                let world: Vec<Vec2> = points.iter().map(|p| self.transform.apply(*p)).collect();
                Rect::from_points(&world)
            }
        }
    }

    fn renderable(&self) -> bool {
        self.renderable
    }

    fn set_renderable(&mut self, renderable: bool) {
        self.renderable = renderable;
    }

    fn stencil_geometry(&self) -> Vec<Vec2> {
        match &self.geometry {
            MaskGeometry::Rect(r) => rect_triangles(*r, self.transform),
            MaskGeometry::Triangles(points) => {
                points.iter().map(|p| self.transform.apply(*p)).collect()
            }
        }
    }
}

/// Image mask: the alpha channel of a texture clips.
#[derive(Debug, Clone, PartialEq)]
pub struct SpriteMask {
    pub texture: TextureId,
    pub transform: Transform2D,
    /// Logical size before transformation.
    pub size: Vec2,
    renderable: bool,
}

impl SpriteMask {
    pub fn new(texture: TextureId, size: Vec2, transform: Transform2D) -> Self {
        Self {
            texture,
            transform,
            size,
            renderable: true,
        }
    }

    fn local_rect(&self) -> Rect {
        Rect::new(0.0, 0.0, self.size.x, self.size.y)
    }
}

impl MaskShape for SpriteMask {
    fn texture(&self) -> Option<TextureId> {
        Some(self.texture)
    }

    fn is_fast_rect(&self) -> bool {
        false
    }

    fn world_transform(&self) -> Transform2D {
        self.transform
    }

    fn bounds(&self) -> Rect {
        self.transform.transform_rect(self.local_rect())
    }

    fn renderable(&self) -> bool {
        self.renderable
    }

    fn set_renderable(&mut self, renderable: bool) {
        self.renderable = renderable;
    }

    fn stencil_geometry(&self) -> Vec<Vec2> {
        rect_triangles(self.local_rect(), self.transform)
    }
}

fn rect_triangles(rect: Rect, transform: Transform2D) -> Vec<Vec2> {
    let [a, b, c, d] = rect.corners().map(|p| transform.apply(p));
    vec![a, b, c, a, c, d]
}
