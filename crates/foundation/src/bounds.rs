/// Axis-aligned rectangle in CSS pixels, as reported by layout.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct Rect {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub fn new(left: f64, top: f64, width: f64, height: f64) -> Self {
        Rect {
            left,
            top,
            width,
            height,
        }
    }

    pub fn right(&self) -> f64 {
        self.left + self.width
    }

    pub fn bottom(&self) -> f64 {
        self.top + self.height
    }

    pub fn translate(&self, dx: f64, dy: f64) -> Rect {
        Rect::new(self.left + dx, self.top + dy, self.width, self.height)
    }

    /// True when the two rectangles intersect once each edge is allowed to
    /// miss by up to `tolerance` pixels. Touching edges count as overlap.
    pub fn overlaps_within(&self, other: &Rect, tolerance: f64) -> bool {
        self.left <= other.right() + tolerance
            && other.left <= self.right() + tolerance
            && self.top <= other.bottom() + tolerance
            && other.top <= self.bottom() + tolerance
    }
}
