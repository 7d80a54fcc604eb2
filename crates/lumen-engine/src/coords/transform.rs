use super::{Rect, Vec2};

/// 2×3 affine transform in the usual 2D-canvas layout:
///
/// ```text
/// | a  c  tx |
/// | b  d  ty |
/// ```
///
/// Display objects carry one as their world transform; the mask path reads
/// its rotation to decide whether a rectangle can be clipped by scissor.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Transform2D {
    pub a: f32,
    pub b: f32,
    pub c: f32,
    pub d: f32,
    pub tx: f32,
    pub ty: f32,
}

impl Default for Transform2D {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Transform2D {
    pub const IDENTITY: Transform2D = Transform2D {
        a: 1.0,
        b: 0.0,
        c: 0.0,
        d: 1.0,
        tx: 0.0,
        ty: 0.0,
    };

    #[inline]
    pub const fn translation(tx: f32, ty: f32) -> Self {
        Self { tx, ty, ..Self::IDENTITY }
    }

    #[inline]
    pub const fn scale(sx: f32, sy: f32) -> Self {
        Self { a: sx, d: sy, ..Self::IDENTITY }
    }

    /// Counter-clockwise rotation in radians (clockwise on screen, +Y down).
    #[inline]
    pub fn rotation(radians: f32) -> Self {
        let (sin, cos) = radians.sin_cos();
        Self {
            a: cos,
            b: sin,
            c: -sin,
            d: cos,
            tx: 0.0,
            ty: 0.0,
        }
    }

    /// Returns `self * other`: `other` is applied first.
    pub fn then(self, other: Transform2D) -> Transform2D {
        Transform2D {
            a: self.a * other.a + self.c * other.b,
            b: self.b * other.a + self.d * other.b,
            c: self.a * other.c + self.c * other.d,
            d: self.b * other.c + self.d * other.d,
            tx: self.a * other.tx + self.c * other.ty + self.tx,
            ty: self.b * other.tx + self.d * other.ty + self.ty,
        }
    }

    #[inline]
    pub fn apply(self, p: Vec2) -> Vec2 {
        Vec2::new(
            self.a * p.x + self.c * p.y + self.tx,
            self.b * p.x + self.d * p.y + self.ty,
        )
    }

    /// Rotation angle of the x basis vector, in radians.
    #[inline]
    pub fn rotation_angle(self) -> f32 {
        self.b.atan2(self.a)
    }

    /// Axis-aligned bounds of `rect` after transformation.
    pub fn transform_rect(self, rect: Rect) -> Rect {
        let corners = rect.corners().map(|p| self.apply(p));
        Rect::from_points(&corners)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: f32, b: f32) -> bool {
        (a - b).abs() < 1e-4
    }

    #[test]
    fn rotation_angle_roundtrips() {
        let t = Transform2D::rotation(30f32.to_radians());
        assert!(approx(t.rotation_angle().to_degrees(), 30.0));
    }

    #[test]
    fn then_applies_right_operand_first() {
        let t = Transform2D::translation(10.0, 0.0).then(Transform2D::scale(2.0, 2.0));
        let p = t.apply(Vec2::new(1.0, 1.0));
        assert!(approx(p.x, 12.0) && approx(p.y, 2.0));
    }

    #[test]
    fn transform_rect_translated_is_exact() {
        let t = Transform2D::translation(5.0, 7.0);
        assert_eq!(t.transform_rect(Rect::new(0.0, 0.0, 10.0, 20.0)), Rect::new(5.0, 7.0, 10.0, 20.0));
    }

    #[test]
    fn transform_rect_rotated_grows_bounds() {
        let t = Transform2D::rotation(45f32.to_radians());
        let b = t.transform_rect(Rect::new(0.0, 0.0, 10.0, 10.0));
        assert!(approx(b.size.x, 10.0 * 2f32.sqrt()));
        assert!(approx(b.size.y, 10.0 * 2f32.sqrt()));
    }
}
