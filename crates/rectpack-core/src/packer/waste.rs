use super::PackingAlgorithm;
use crate::model::{Rect, Rectangle};

/// Free-section list that recycles space trapped below a skyline.
///
/// Sections are chosen by best area fit and split along the axis that leaves
/// the smaller leftover area. New sections are joined with existing ones
/// whenever their union is still a rectangle.
#[derive(Debug, Clone)]
pub struct WasteManager<K> {
    sections: Vec<Rect>,
    rectangles: Vec<Rectangle<K>>,
    allow_rotation: bool,
}

impl<K> WasteManager<K> {
    pub fn new(allow_rotation: bool) -> Self {
        Self {
            sections: Vec::new(),
            rectangles: Vec::new(),
            allow_rotation,
        }
    }

    /// Register a free area. Degenerate areas are ignored.
    pub fn add_waste(&mut self, x: u32, y: u32, width: u32, height: u32) {
        if width == 0 || height == 0 {
            return;
        }
        self.add_section(Rect::new(x, y, width, height));
    }

    /// Free sections currently tracked.
    pub fn sections(&self) -> &[Rect] {
        &self.sections
    }

    fn add_section(&mut self, mut section: Rect) {
        // Keep absorbing neighbours until a full pass joins nothing.
        loop {
            let before = self.sections.len();
            if before == 0 {
                break;
            }
            self.sections.retain(|s| !section.join(s));
            if self.sections.len() == before {
                break;
            }
        }
        self.sections.push(section);
    }

    fn score(section: &Rect, w: u32, h: u32) -> Option<u64> {
        if w > section.w || h > section.h {
            return None;
        }
        Some(section.area() - w as u64 * h as u64)
    }

    fn choose(&self, w: u32, h: u32) -> Option<(usize, Rect, bool)> {
        let mut best: Option<(u64, usize, Rect, bool)> = None;
        for (i, s) in self.sections.iter().enumerate() {
            if let Some(score) = Self::score(s, w, h) {
                if best.is_none_or(|(b, ..)| score < b) {
                    best = Some((score, i, Rect::new(s.x, s.y, w, h), false));
                }
            }
        }
        if self.allow_rotation {
            for (i, s) in self.sections.iter().enumerate() {
                if let Some(score) = Self::score(s, h, w) {
                    if best.is_none_or(|(b, ..)| score < b) {
                        best = Some((score, i, Rect::new(s.x, s.y, h, w), true));
                    }
                }
            }
        }
        best.map(|(_, idx, rect, rotated)| (idx, rect, rotated))
    }

    fn split(&mut self, section: &Rect, w: u32, h: u32) {
        let leftover_h = section.h - h;
        let leftover_w = section.w - w;
        if w as u64 * leftover_h as u64 >= h as u64 * leftover_w as u64 {
            self.split_horizontal(section, w, h);
        } else {
            self.split_vertical(section, w, h);
        }
    }

    // The placed rect sits in the section's bottom-left corner; the cut runs
    // along its top edge across the whole section.
    fn split_horizontal(&mut self, section: &Rect, w: u32, h: u32) {
        if h < section.h {
            self.add_section(Rect::new(section.x, section.y + h, section.w, section.h - h));
        }
        if w < section.w {
            self.add_section(Rect::new(section.x + w, section.y, section.w - w, h));
        }
    }

    // The cut runs along the placed rect's right edge across the whole section.
    fn split_vertical(&mut self, section: &Rect, w: u32, h: u32) {
        if h < section.h {
            self.add_section(Rect::new(section.x, section.y + h, w, section.h - h));
        }
        if w < section.w {
            self.add_section(Rect::new(section.x + w, section.y, section.w - w, section.h));
        }
    }
}

impl<K: Clone> PackingAlgorithm<K> for WasteManager<K> {
    fn fitness(&self, width: u32, height: u32) -> Option<u64> {
        if width == 0 || height == 0 {
            return None;
        }
        let (idx, rect, _) = self.choose(width, height)?;
        Self::score(&self.sections[idx], rect.w, rect.h)
    }

    fn add_rect(&mut self, width: u32, height: u32, rid: Option<K>) -> Option<Rectangle<K>> {
        if width == 0 || height == 0 {
            return None;
        }
        let (idx, place, _rotated) = self.choose(width, height)?;
        let section = self.sections.remove(idx);
        self.split(&section, place.w, place.h);
        let rect = Rectangle::new(place.x, place.y, place.w, place.h, rid);
        self.rectangles.push(rect.clone());
        Some(rect)
    }

    fn reset(&mut self) {
        self.sections.clear();
        self.rectangles.clear();
    }

    fn rectangles(&self) -> &[Rectangle<K>] {
        &self.rectangles
    }
}
