use crate::model::Rectangle;

pub mod skyline;
pub mod waste;

/// A packing algorithm places rectangles onto one surface.
///
/// Implementations must ensure no overlaps and keep every rectangle inside
/// the surface. `add_rect` returns `None` if the rectangle cannot be placed.
pub trait PackingAlgorithm<K> {
    /// Score the best position for a `width × height` rectangle without
    /// placing it. Lower is better; `None` means it does not fit.
    fn fitness(&self, width: u32, height: u32) -> Option<u64>;
    fn add_rect(&mut self, width: u32, height: u32, rid: Option<K>) -> Option<Rectangle<K>>;
    fn reset(&mut self);
    fn rectangles(&self) -> &[Rectangle<K>];

    fn len(&self) -> usize {
        self.rectangles().len()
    }
    fn is_empty(&self) -> bool {
        self.rectangles().is_empty()
    }
    /// Total area of the rectangles placed so far.
    fn used_area(&self) -> u64 {
        self.rectangles().iter().map(Rectangle::area).sum()
    }
}
