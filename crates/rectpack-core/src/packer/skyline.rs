use tracing::trace;

use super::PackingAlgorithm;
use super::waste::WasteManager;
use crate::config::{SkylineHeuristic, SkylineParams};
use crate::error::{RectPackError, Result};
use crate::model::{Rect, Rectangle, Segment};

/// A candidate position plus the skyline span under it.
#[derive(Clone, Copy, Debug)]
struct Candidate {
    rect: Rect,
    left: usize,
    right: usize,
}

/// Skyline bin packer (Jylänki, "A Thousand Ways to Pack the Bin").
///
/// The skyline is the list of horizontal segments on top of the placed
/// rectangles. It always tiles `[0, width)` in ascending order and no two
/// neighbouring segments have the same height.
#[derive(Debug, Clone)]
pub struct Skyline<K> {
    width: u32,
    height: u32,
    params: SkylineParams,
    skyline: Vec<Segment>,
    waste: WasteManager<K>,
    rectangles: Vec<Rectangle<K>>,
}

impl<K> Skyline<K> {
    pub fn new(width: u32, height: u32, params: SkylineParams) -> Self {
        Self {
            width,
            height,
            params,
            skyline: vec![Segment::new(0, 0, width)],
            waste: WasteManager::new(params.allow_rotation),
            rectangles: Vec::new(),
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }
    pub fn height(&self) -> u32 {
        self.height
    }
    pub fn params(&self) -> &SkylineParams {
        &self.params
    }
    /// Current skyline segments, left to right.
    pub fn skyline(&self) -> &[Segment] {
        &self.skyline
    }
    pub fn waste(&self) -> &WasteManager<K> {
        &self.waste
    }

    /// Whether a `width × height` rectangle fits an empty surface of this
    /// size, rotating it if allowed and needed.
    pub fn fits_surface(&self, width: u32, height: u32) -> bool {
        if width == 0 || height == 0 {
            return false;
        }
        let (mut w, mut h) = (width, height);
        if self.params.allow_rotation && (w > self.width || h > self.height) {
            std::mem::swap(&mut w, &mut h);
        }
        w <= self.width && h <= self.height
    }

    /// Cheap rejection before any search: zero sides or a side longer than
    /// both surface sides.
    fn rejects(&self, width: u32, height: u32) -> bool {
        let max_side = self.width.max(self.height);
        width == 0 || height == 0 || width > max_side || height > max_side
    }

    /// X coordinates worth trying for a rectangle of `width`: every segment's
    /// left edge and every segment's right edge minus `width`, ascending.
    /// May contain duplicates; they are cheaper to evaluate twice than to remove.
    fn placement_points(&self, width: u32) -> Vec<u32> {
        let sky_l = self.skyline[0].left();
        let sky_r = self.skyline[self.skyline.len() - 1].right();
        if width > sky_r - sky_l {
            return Vec::new();
        }

        // Subtraction only; `x + width` can overflow on very wide surfaces.
        let lefts = self
            .skyline
            .iter()
            .map(Segment::left)
            .filter(|&x| x <= sky_r - width);
        let rights = self
            .skyline
            .iter()
            .filter(|s| s.right() - sky_l >= width)
            .map(|s| s.right() - width);

        let mut points: Vec<u32> = lefts.chain(rights).collect();
        points.sort();
        points
    }

    fn generate_placements(&self, width: u32, height: u32) -> Vec<Candidate> {
        let skyline = &self.skyline;
        let mut out = Vec::new();

        let mut left_index = 0usize;
        let mut right_index = 0usize;
        let mut support_index = 0usize;
        let mut support_height = skyline[0].top();

        for p in self.placement_points(width) {
            // `p + width` stays within the skyline, see `placement_points`.
            let end = p + width;
            // Right edge moved onto later segments: extend the support.
            if end > skyline[right_index].right() {
                for i in right_index + 1..skyline.len() {
                    right_index = i;
                    if skyline[i].top() >= support_height {
                        support_index = i;
                        support_height = skyline[i].top();
                    }
                    if end <= skyline[i].right() {
                        break;
                    }
                }
            }

            if p >= skyline[left_index].right() {
                left_index += 1;
            }

            // Support slid out on the left, rescan the span.
            if support_index < left_index {
                support_index = left_index;
                support_height = skyline[left_index].top();
                for (i, seg) in skyline
                    .iter()
                    .enumerate()
                    .take(right_index + 1)
                    .skip(left_index)
                {
                    if seg.top() >= support_height {
                        support_index = i;
                        support_height = seg.top();
                    }
                }
            }

            if height <= self.height - support_height {
                out.push(Candidate {
                    rect: Rect::new(p, support_height, width, height),
                    left: left_index,
                    right: right_index,
                });
            }
        }
        out
    }

    /// Area between the skyline and the bottom of `c.rect`.
    fn wasted_area(&self, c: &Candidate) -> u64 {
        let r = &c.rect;
        self.skyline[c.left..=c.right]
            .iter()
            .map(|seg| {
                let overlap = r.right().min(seg.right()).saturating_sub(r.left().max(seg.left()));
                let gap = r.bottom().saturating_sub(seg.top());
                overlap as u64 * gap as u64
            })
            .sum()
    }

    fn rect_fitness(&self, c: &Candidate) -> u64 {
        match self.params.heuristic {
            SkylineHeuristic::BottomLeft => c.rect.top() as u64,
            SkylineHeuristic::MinWaste => self.wasted_area(c),
            SkylineHeuristic::MinWasteLowProfile => self
                .wasted_area(c)
                .saturating_mul(self.width as u64)
                .saturating_mul(self.height as u64)
                .saturating_add(c.rect.top() as u64),
        }
    }

    /// Best position over both orientations; the first candidate wins ties.
    fn select_position(&self, width: u32, height: u32) -> Option<(Rect, u64)> {
        let mut candidates = self.generate_placements(width, height);
        if self.params.allow_rotation && width != height {
            candidates.extend(self.generate_placements(height, width));
        }
        let mut best: Option<(Rect, u64)> = None;
        for c in &candidates {
            let fitness = self.rect_fitness(c);
            if best.is_none_or(|(_, b)| fitness < b) {
                best = Some((c.rect, fitness));
            }
        }
        best
    }

    fn push_merged(out: &mut Vec<Segment>, seg: Segment) {
        match out.last_mut() {
            Some(last) if last.top() == seg.top() => last.len += seg.len,
            _ => out.push(seg),
        }
    }

    /// Raise the skyline over `rect`, recording trapped space as waste.
    fn add_skyline(&mut self, rect: &Rect) {
        let old = std::mem::take(&mut self.skyline);
        let mut new: Vec<Segment> = Vec::with_capacity(old.len() + 2);

        for mut sky in old {
            if sky.right() <= rect.left() || sky.left() >= rect.right() {
                Self::push_merged(&mut new, sky);
                continue;
            }

            // Part sticking out on the left survives.
            if sky.left() < rect.left() && sky.right() > rect.left() {
                Self::push_merged(&mut new, Segment::new(sky.x, sky.y, rect.left() - sky.left()));
                sky = Segment::new(rect.left(), sky.y, sky.right() - rect.left());
            }

            if sky.left() < rect.right() {
                if sky.left() == rect.left() {
                    Self::push_merged(&mut new, Segment::new(rect.left(), rect.top(), rect.w));
                }
                // Part sticking out on the right survives.
                if sky.right() > rect.right() {
                    Self::push_merged(
                        &mut new,
                        Segment::new(rect.right(), sky.y, sky.right() - rect.right()),
                    );
                    sky = Segment::new(sky.x, sky.y, rect.right() - sky.left());
                }
            }

            if sky.left() >= rect.left() && sky.right() <= rect.right() {
                if self.params.waste_management && sky.top() < rect.bottom() {
                    self.waste
                        .add_waste(sky.left(), sky.top(), sky.len, rect.bottom() - sky.top());
                }
            } else {
                Self::push_merged(&mut new, sky);
            }
        }

        self.skyline = new;
    }

    /// Check every rectangle lies inside the surface and no two overlap.
    /// `bin` is only used to label errors.
    pub fn validate_packing(&self, bin: usize) -> Result<()> {
        let surface = Rect::new(0, 0, self.width, self.height);
        for r in &self.rectangles {
            if !surface.contains(&r.rect()) {
                return Err(RectPackError::OutOfBounds { bin, rect: r.rect() });
            }
        }
        for (i, a) in self.rectangles.iter().enumerate() {
            for b in &self.rectangles[i + 1..] {
                if a.rect().intersects(&b.rect(), false) {
                    return Err(RectPackError::Collision {
                        bin,
                        first: a.rect(),
                        second: b.rect(),
                    });
                }
            }
        }
        Ok(())
    }
}

impl<K: Clone> PackingAlgorithm<K> for Skyline<K> {
    fn fitness(&self, width: u32, height: u32) -> Option<u64> {
        if self.rejects(width, height) {
            return None;
        }
        // Room in wasted space is a free placement.
        if self.params.waste_management && self.waste.fitness(width, height).is_some() {
            return Some(0);
        }
        self.select_position(width, height).map(|(_, fitness)| fitness)
    }

    fn add_rect(&mut self, width: u32, height: u32, rid: Option<K>) -> Option<Rectangle<K>> {
        if self.rejects(width, height) {
            return None;
        }

        let mut placed = None;
        if self.params.waste_management {
            placed = self.waste.add_rect(width, height, rid.clone()).map(|r| r.rect());
            if let Some(r) = &placed {
                trace!(x = r.x, y = r.y, w = r.w, h = r.h, "placed in waste");
            }
        }

        if placed.is_none() {
            let (rect, _) = self.select_position(width, height)?;
            self.add_skyline(&rect);
            trace!(x = rect.x, y = rect.y, w = rect.w, h = rect.h, "placed on skyline");
            placed = Some(rect);
        }

        let r = placed?;
        let rect = Rectangle::new(r.x, r.y, r.w, r.h, rid);
        self.rectangles.push(rect.clone());
        Some(rect)
    }

    fn reset(&mut self) {
        self.rectangles.clear();
        self.skyline = vec![Segment::new(0, 0, self.width)];
        self.waste.reset();
    }

    fn rectangles(&self) -> &[Rectangle<K>] {
        &self.rectangles
    }
}
