use super::Vec2;

/// Axis-aligned rectangle in logical pixels (top-left origin).
#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct Rect {
    pub origin: Vec2,
    pub size: Vec2,
}

impl Rect {
    #[inline]
    pub const fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self {
            origin: Vec2::new(x, y),
            size: Vec2::new(w, h),
        }
    }

    /// Smallest rectangle containing every point. Empty input yields a zero rect.
    pub fn from_points(points: &[Vec2]) -> Self {
        let Some((&first, rest)) = points.split_first() else {
            return Rect::default();
        };
        let (lo, hi) = rest.iter().fold((first, first), |(lo, hi), &p| (lo.min(p), hi.max(p)));
        Rect::new(lo.x, lo.y, hi.x - lo.x, hi.y - lo.y)
    }

    #[inline]
    pub fn x(self) -> f32 {
        self.origin.x
    }

    #[inline]
    pub fn y(self) -> f32 {
        self.origin.y
    }

    #[inline]
    pub fn width(self) -> f32 {
        self.size.x
    }

    #[inline]
    pub fn height(self) -> f32 {
        self.size.y
    }

    #[inline]
    pub fn max(self) -> Vec2 {
        Vec2::new(self.origin.x + self.size.x, self.origin.y + self.size.y)
    }

    /// The four corners, clockwise from top-left.
    #[inline]
    pub fn corners(self) -> [Vec2; 4] {
        let max = self.max();
        [
            self.origin,
            Vec2::new(max.x, self.origin.y),
            max,
            Vec2::new(self.origin.x, max.y),
        ]
    }

    #[inline]
    pub fn is_empty(self) -> bool {
        self.size.x <= 0.0 || self.size.y <= 0.0
    }

    /// Normalizes the rectangle so width/height are non-negative.
    #[inline]
    pub fn normalized(self) -> Self {
        let mut x = self.origin.x;
        let mut y = self.origin.y;
        let mut w = self.size.x;
        let mut h = self.size.y;

        if w < 0.0 {
            x += w;
            w = -w;
        }
        if h < 0.0 {
            y += h;
            h = -h;
        }

        Rect::new(x, y, w, h)
    }

    #[inline]
    pub fn intersect(self, other: Rect) -> Option<Rect> {
        let a = self.normalized();
        let b = other.normalized();

        let x0 = a.origin.x.max(b.origin.x);
        let y0 = a.origin.y.max(b.origin.y);
        let x1 = (a.origin.x + a.size.x).min(b.origin.x + b.size.x);
        let y1 = (a.origin.y + a.size.y).min(b.origin.y + b.size.y);

        let w = x1 - x0;
        let h = y1 - y0;

        if w <= 0.0 || h <= 0.0 {
            None
        } else {
            Some(Rect::new(x0, y0, w, h))
        }
    }

    /// Clamps this rectangle into `bounds`.
    ///
    /// Unlike [`intersect`](Self::intersect) this never fails: a rectangle lying
    /// entirely outside collapses to zero width/height on the nearest edge.
    pub fn fit(self, bounds: Rect) -> Rect {
        let r = self.normalized();
        let b = bounds.normalized();
        let b_max = b.max();

        let x0 = r.origin.x.clamp(b.origin.x, b_max.x);
        let y0 = r.origin.y.clamp(b.origin.y, b_max.y);
        let x1 = (r.origin.x + r.size.x).clamp(b.origin.x, b_max.x);
        let y1 = (r.origin.y + r.size.y).clamp(b.origin.y, b_max.y);

        Rect::new(x0, y0, (x1 - x0).max(0.0), (y1 - y0).max(0.0))
    }

    /// Scales origin and size uniformly (logical → device pixels).
    #[inline]
    pub fn scale(self, factor: f32) -> Rect {
        Rect {
            origin: self.origin * factor,
            size: self.size * factor,
        }
    }
}
