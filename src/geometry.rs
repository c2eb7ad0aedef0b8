use crate::config::{NARROW_LANE_FRACTION, NARROW_VIEWPORT_PX, WIDE_LANE_FRACTION};

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub const fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    #[inline]
    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    #[inline]
    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.width <= 0.0 || self.height <= 0.0
    }

    /// Open-interval overlap: rectangles that only share an edge do not collide, and an
    /// empty rectangle overlaps nothing.
    #[inline]
    pub fn overlaps(&self, other: &Rect) -> bool {
        !self.is_empty()
            && !other.is_empty()
            && self.x < other.right()
            && self.right() > other.x
            && self.y < other.bottom()
            && self.bottom() > other.y
    }

    pub fn contains_rect(&self, other: &Rect) -> bool {
        other.x >= self.x
            && other.y >= self.y
            && other.right() <= self.right()
            && other.bottom() <= self.bottom()
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
    pub lane_width: f64,
}

impl Viewport {
    /// `css_width` picks the breakpoint; the lane is a fraction of the canvas width.
    pub fn new(width: f64, height: f64, css_width: f64) -> Self {
        let fraction = if css_width < NARROW_VIEWPORT_PX {
            NARROW_LANE_FRACTION
        } else {
            WIDE_LANE_FRACTION
        };
        Self {
            width,
            height,
            lane_width: width * fraction,
        }
    }

    #[inline]
    pub fn center_x(&self) -> f64 {
        self.width * 0.5
    }

    #[inline]
    pub fn lane_left(&self) -> f64 {
        self.center_x() - self.lane_width * 0.5
    }

    #[inline]
    pub fn lane_right(&self) -> f64 {
        self.center_x() + self.lane_width * 0.5
    }

    #[inline]
    pub fn side_width(&self) -> f64 {
        ((self.width - self.lane_width) * 0.5).max(0.0)
    }

    pub fn side_regions(&self) -> [Rect; 2] {
        let side = self.side_width();
        [
            Rect::new(0.0, 0.0, side, self.height),
            Rect::new(self.width - side, 0.0, side, self.height),
        ]
    }
}
