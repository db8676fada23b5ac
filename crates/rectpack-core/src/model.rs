use serde::{Deserialize, Serialize};

/// A point on the packing surface.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct Point {
    pub x: u32,
    pub y: u32,
}

impl Point {
    pub fn new(x: u32, y: u32) -> Self {
        Self { x, y }
    }
}

/// Axis-aligned rectangle. `x,y` is the bottom-left corner; `w,h` are sizes.
///
/// Edges are half-open: a rect covers `[x, x + w) × [y, y + h)`, so `right()`
/// and `top()` are exclusive and two rects sharing an edge do not overlap.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct Rect {
    pub x: u32,
    pub y: u32,
    pub w: u32,
    pub h: u32,
}

impl Rect {
    pub fn new(x: u32, y: u32, w: u32, h: u32) -> Self {
        Self { x, y, w, h }
    }
    #[inline]
    pub fn left(&self) -> u32 {
        self.x
    }
    /// Exclusive right edge (`x + w`).
    #[inline]
    pub fn right(&self) -> u32 {
        self.x + self.w
    }
    #[inline]
    pub fn bottom(&self) -> u32 {
        self.y
    }
    /// Exclusive top edge (`y + h`).
    #[inline]
    pub fn top(&self) -> u32 {
        self.y + self.h
    }
    pub fn area(&self) -> u64 {
        self.w as u64 * self.h as u64
    }
    pub fn corner_bottom_left(&self) -> Point {
        Point::new(self.left(), self.bottom())
    }
    pub fn corner_top_right(&self) -> Point {
        Point::new(self.right(), self.top())
    }
    /// Returns true if `r` is fully inside `self`.
    pub fn contains(&self, r: &Rect) -> bool {
        r.x >= self.x && r.y >= self.y && r.right() <= self.right() && r.top() <= self.top()
    }
    /// Returns true if the two rects share interior area. With `edges` set,
    /// rects touching only along an edge or at a corner also count.
    pub fn intersects(&self, r: &Rect, edges: bool) -> bool {
        if edges {
            !(self.bottom() > r.top()
                || self.top() < r.bottom()
                || self.left() > r.right()
                || self.right() < r.left())
        } else {
            !(self.bottom() >= r.top()
                || self.top() <= r.bottom()
                || self.left() >= r.right()
                || self.right() <= r.left())
        }
    }
    /// Grows `self` into the union with `other` when that union is itself a
    /// rectangle. Returns false and leaves `self` untouched otherwise.
    pub fn join(&mut self, other: &Rect) -> bool {
        if self.contains(other) {
            return true;
        }
        if other.contains(self) {
            *self = *other;
            return true;
        }
        if !self.intersects(other, true) {
            return false;
        }
        // stacked vertically
        if self.left() == other.left() && self.w == other.w {
            let y_min = self.bottom().min(other.bottom());
            let y_max = self.top().max(other.top());
            self.y = y_min;
            self.h = y_max - y_min;
            return true;
        }
        // side by side
        if self.bottom() == other.bottom() && self.h == other.h {
            let x_min = self.left().min(other.left());
            let x_max = self.right().max(other.right());
            self.x = x_min;
            self.w = x_max - x_min;
            return true;
        }
        false
    }
}

/// One horizontal span of a skyline: `[x, x + len)` at height `y`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct Segment {
    pub x: u32,
    pub y: u32,
    pub len: u32,
}

impl Segment {
    pub fn new(x: u32, y: u32, len: u32) -> Self {
        Self { x, y, len }
    }
    #[inline]
    pub fn left(&self) -> u32 {
        self.x
    }
    #[inline]
    pub fn right(&self) -> u32 {
        self.x + self.len
    }
    #[inline]
    pub fn top(&self) -> u32 {
        self.y
    }
}

/// A rectangle placed inside a bin, with the caller's identifier.
///
/// `width`/`height` reflect the orientation the rectangle was placed in.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Rectangle<K = String> {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
    pub rid: Option<K>,
}

impl<K> Rectangle<K> {
    pub fn new(x: u32, y: u32, width: u32, height: u32, rid: Option<K>) -> Self {
        Self {
            x,
            y,
            width,
            height,
            rid,
        }
    }
    #[inline]
    pub fn left(&self) -> u32 {
        self.x
    }
    #[inline]
    pub fn right(&self) -> u32 {
        self.x + self.width
    }
    #[inline]
    pub fn bottom(&self) -> u32 {
        self.y
    }
    #[inline]
    pub fn top(&self) -> u32 {
        self.y + self.height
    }
    pub fn area(&self) -> u64 {
        self.width as u64 * self.height as u64
    }
    /// Geometry of this rectangle without the identifier.
    pub fn rect(&self) -> Rect {
        Rect::new(self.x, self.y, self.width, self.height)
    }
}

/// A placement record returned to callers: which bin, where, and how big.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Placement<K = String> {
    /// Index of the bin in the packer's bin sequence (closed bins first).
    pub bin: usize,
    pub x: u32,
    pub y: u32,
    /// Placed width (post-rotation).
    pub width: u32,
    /// Placed height (post-rotation).
    pub height: u32,
    pub rid: Option<K>,
}

impl<K> Placement<K> {
    pub fn rect(&self) -> Rect {
        Rect::new(self.x, self.y, self.width, self.height)
    }
}

/// Statistics about packing efficiency.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct PackStats {
    /// Number of bins that were opened.
    pub num_bins: usize,
    /// Number of rectangles placed.
    pub num_rects: usize,
    /// Sum of width * height for each opened bin.
    pub total_bin_area: u64,
    /// Sum of placed rectangle areas.
    pub used_area: u64,
    /// used_area / total_bin_area (0.0 to 1.0).
    pub occupancy: f64,
}

impl PackStats {
    /// Returns a human-readable summary of the statistics.
    pub fn summary(&self) -> String {
        format!(
            "Bins: {}, Rects: {}, Occupancy: {:.2}%, Total Area: {}, Used Area: {}",
            self.num_bins,
            self.num_rects,
            self.occupancy * 100.0,
            self.total_bin_area,
            self.used_area,
        )
    }

    pub fn wasted_area(&self) -> u64 {
        self.total_bin_area.saturating_sub(self.used_area)
    }
}
