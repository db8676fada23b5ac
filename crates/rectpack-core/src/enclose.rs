use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use crate::config::{BinSelection, PackerConfig, PackingMode, SkylineHeuristic, SortOrder};
use crate::engine::Packer;
use crate::model::Placement;
use crate::packer::PackingAlgorithm;

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// Smallest container found for a set of rectangles.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Enclosure {
    pub width: u32,
    pub height: u32,
    /// Placements inside the container; `rid` is the rectangle's insertion index.
    pub placements: Vec<Placement<usize>>,
}

impl Enclosure {
    pub fn area(&self) -> u64 {
        self.width as u64 * self.height as u64
    }
}

/// Searches for the minimal-area rectangle enclosing a set of rectangles.
///
/// Candidate container widths come from running sums of the rectangle sides;
/// each candidate is packed with a bottom-left skyline and the tightest
/// result wins.
#[derive(Debug, Clone)]
pub struct Enclose {
    rectangles: Vec<(u32, u32)>,
    max_width: Option<u32>,
    max_height: Option<u32>,
    rotation: bool,
    parallel: bool,
}

impl Default for Enclose {
    fn default() -> Self {
        Self {
            rectangles: Vec::new(),
            max_width: None,
            max_height: None,
            rotation: true,
            parallel: false,
        }
    }
}

impl Enclose {
    pub fn new() -> Self {
        Self::default()
    }

    /// Caps the container width.
    pub fn max_width(mut self, v: Option<u32>) -> Self {
        self.max_width = v;
        self
    }
    /// Caps the container height.
    pub fn max_height(mut self, v: Option<u32>) -> Self {
        self.max_height = v;
        self
    }
    pub fn rotation(mut self, v: bool) -> Self {
        self.rotation = v;
        self
    }
    /// Evaluate candidates in parallel when the `parallel` feature is on.
    pub fn parallel(mut self, v: bool) -> Self {
        self.parallel = v;
        self
    }

    /// Adds another rectangle to enclose.
    pub fn add_rect(&mut self, width: u32, height: u32) {
        self.rectangles.push((width, height));
    }

    pub fn len(&self) -> usize {
        self.rectangles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rectangles.is_empty()
    }

    /// Container candidates as `(width, max_height)`, in evaluation order.
    pub fn container_candidates(&self) -> Vec<(u32, u32)> {
        if self.rectangles.is_empty() {
            return Vec::new();
        }

        let (mut sides, max_height, min_width, max_width): (Vec<u64>, u64, u64, u64) =
            if self.rotation {
                let sides = self
                    .rectangles
                    .iter()
                    .flat_map(|&(w, h)| [w as u64, h as u64])
                    .collect();
                let max_height: u64 = self.rectangles.iter().map(|&(w, h)| w.max(h) as u64).sum();
                let min_width = self
                    .rectangles
                    .iter()
                    .map(|&(w, h)| w.min(h) as u64)
                    .max()
                    .unwrap_or(0);
                (sides, max_height, min_width, max_height)
            } else {
                let sides: Vec<u64> = self.rectangles.iter().map(|&(w, _)| w as u64).collect();
                let max_height: u64 = self.rectangles.iter().map(|&(_, h)| h as u64).sum();
                let min_width = sides.iter().copied().max().unwrap_or(0);
                let max_width = sides.iter().sum();
                (sides, max_height, min_width, max_width)
            };
        sides.sort_unstable();

        let cap = |v: u64, limit: Option<u32>| match limit {
            Some(l) if (l as u64) < v => l as u64,
            _ => v.min(u32::MAX as u64),
        };
        let max_width = cap(max_width, self.max_width);
        let max_height = cap(max_height, self.max_height);

        if max_width < min_width {
            debug!(max_width, min_width, "no container width is possible");
            return Vec::new();
        }

        let mut candidates = vec![max_width, min_width];
        let mut width = 0u64;
        for s in sides.iter().rev() {
            width += s;
            candidates.push(width);
        }
        width = 0;
        for s in &sides {
            width += s;
            candidates.push(width);
        }

        let mut seen = Vec::with_capacity(candidates.len());
        for c in candidates {
            if !seen.contains(&c) {
                seen.push(c);
            }
        }

        let min_area: u64 = self
            .rectangles
            .iter()
            .map(|&(w, h)| w as u64 * h as u64)
            .sum();
        seen.into_iter()
            .filter(|&c| c >= min_width && c <= max_width)
            .filter(|&c| c.saturating_mul(max_height) >= min_area)
            .map(|c| (c as u32, max_height as u32))
            .collect()
    }

    /// Packs everything into a `width × height` bin and shrinks the height
    /// to the highest rectangle. `None` if something didn't fit.
    fn refine_candidate(&self, width: u32, height: u32) -> Option<Enclosure> {
        let cfg = PackerConfig {
            mode: PackingMode::Offline,
            bin_selection: BinSelection::BestFit,
            heuristic: SkylineHeuristic::BottomLeft,
            waste_management: true,
            sort_order: SortOrder::LongSide,
            allow_rotation: self.rotation,
        };
        let mut packer: Packer<usize> = Packer::new(cfg).ok()?;
        packer.add_bin(width, height, 1);
        for (i, &(w, h)) in self.rectangles.iter().enumerate() {
            packer.add_rect(w, h, Some(i));
        }
        packer.pack();

        let bin = packer.get(0)?;
        if bin.len() != self.rectangles.len() {
            return None;
        }
        let new_height = bin.rectangles().iter().map(|r| r.top()).max()?;
        Some(Enclosure {
            width,
            height: new_height,
            placements: packer.rect_list(),
        })
    }

    /// Finds the smallest-area enclosing rectangle, or `None` when no
    /// candidate width can hold every rectangle.
    #[instrument(skip_all, fields(rects = self.rectangles.len()))]
    pub fn generate(&self) -> Option<Enclosure> {
        let candidates = self.container_candidates();
        if candidates.is_empty() {
            return None;
        }
        debug!(candidates = candidates.len(), "evaluating container candidates");

        let containers = self.refine_all(&candidates);

        // First minimum wins, so the result doesn't depend on evaluation order.
        let mut best: Option<Enclosure> = None;
        for c in containers.into_iter().flatten() {
            if best.as_ref().is_none_or(|b| c.area() < b.area()) {
                best = Some(c);
            }
        }
        if let Some(b) = &best {
            debug!(width = b.width, height = b.height, "enclosure found");
        }
        best
    }

    fn refine_all(&self, candidates: &[(u32, u32)]) -> Vec<Option<Enclosure>> {
        #[cfg(feature = "parallel")]
        {
            if self.parallel {
                return candidates
                    .par_iter()
                    .map(|&(w, h)| self.refine_candidate(w, h))
                    .collect();
            }
        }
        #[cfg(not(feature = "parallel"))]
        {
            if self.parallel {
                debug!("parallel evaluation needs the `parallel` feature; running sequentially");
            }
        }
        candidates
            .iter()
            .map(|&(w, h)| self.refine_candidate(w, h))
            .collect()
    }
}
