use std::collections::{BTreeMap, VecDeque};
use std::ops::Index;

use slotmap::{SlotMap, new_key_type};
use tracing::{debug, instrument};

use crate::bins::BinFactory;
use crate::config::{BinSelection, PackerConfig, PackingMode, SortOrder};
use crate::error::Result;
use crate::model::{PackStats, Placement, Rectangle};
use crate::packer::PackingAlgorithm;
use crate::packer::skyline::Skyline;

new_key_type! {
    /// Stable handle of a rectangle still waiting for a bin.
    struct PendingKey;
}

/// What happened to a rectangle handed to [`Packer::add_rect`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Admission<K> {
    /// Packed immediately (online mode).
    Placed(Placement<K>),
    /// Stored until [`Packer::pack`] runs (offline mode).
    Queued,
    /// No bin could hold it, or it has a zero side; the rectangle is dropped.
    Rejected,
}

impl<K> Admission<K> {
    pub fn placement(&self) -> Option<&Placement<K>> {
        match self {
            Admission::Placed(p) => Some(p),
            Admission::Queued | Admission::Rejected => None,
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct BinRequest {
    width: u32,
    height: u32,
    count: usize,
}

#[derive(Debug, Clone)]
struct RectRequest<K> {
    width: u32,
    height: u32,
    rid: Option<K>,
}

/// Multi-bin packer: keeps open and closed bins plus factories of bins not
/// opened yet, and dispatches rectangles with the configured bin selection.
///
/// Bins are addressed by their position in `closed ++ open`; bins that were
/// never opened are not part of that sequence. Positions never change during
/// a packing run.
pub struct Packer<K> {
    config: PackerConfig,
    closed_bins: Vec<Skyline<K>>,
    open_bins: VecDeque<Skyline<K>>,
    /// Unopened bins keyed by registration order.
    empty_bins: BTreeMap<usize, BinFactory<K>>,
    bin_count: usize,
    // Offline input, kept across `pack()` runs.
    avail_bins: Vec<BinRequest>,
    avail_rects: Vec<RectRequest<K>>,
}

impl<K: Clone> Packer<K> {
    /// Creates an empty packer. Fails for combinations that have no
    /// implementation, e.g. global best fit in online mode.
    pub fn new(config: PackerConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            config,
            closed_bins: Vec::new(),
            open_bins: VecDeque::new(),
            empty_bins: BTreeMap::new(),
            bin_count: 0,
            avail_bins: Vec::new(),
            avail_rects: Vec::new(),
        })
    }

    pub fn config(&self) -> &PackerConfig {
        &self.config
    }

    /// Adds `count` bins of `width × height`. Requests with a zero count or
    /// a zero side are ignored.
    pub fn add_bin(&mut self, width: u32, height: u32, count: usize) {
        if count == 0 || width == 0 || height == 0 {
            debug!(width, height, count, "ignoring empty bin request");
            return;
        }
        match self.config.mode {
            PackingMode::Online => self.register_bin(width, height, count),
            PackingMode::Offline => self.avail_bins.push(BinRequest {
                width,
                height,
                count,
            }),
        }
    }

    /// Online: packs the rectangle now. Offline: queues it for [`Packer::pack`].
    /// A rectangle with a zero side is rejected in either mode.
    pub fn add_rect(&mut self, width: u32, height: u32, rid: Option<K>) -> Admission<K> {
        if width == 0 || height == 0 {
            debug!(width, height, "zero-sized rectangle rejected");
            return Admission::Rejected;
        }
        match self.config.mode {
            PackingMode::Offline => {
                self.avail_rects.push(RectRequest { width, height, rid });
                Admission::Queued
            }
            PackingMode::Online => match self.dispatch(width, height, rid) {
                Some(p) => Admission::Placed(p),
                None => {
                    debug!(width, height, "rectangle rejected");
                    Admission::Rejected
                }
            },
        }
    }

    /// Packs every queued rectangle into the queued bins, discarding the
    /// result of any previous run. Does nothing in online mode.
    #[instrument(skip_all, fields(rects = self.avail_rects.len(), bins = self.avail_bins.len()))]
    pub fn pack(&mut self) {
        if self.config.mode == PackingMode::Online {
            debug!("online packer places rectangles as they are added");
            return;
        }
        self.reset_bins();
        if self.avail_rects.is_empty() || self.avail_bins.is_empty() {
            debug!("nothing to pack");
            return;
        }

        for b in self.avail_bins.clone() {
            self.register_bin(b.width, b.height, b.count);
        }

        match self.config.bin_selection {
            BinSelection::GlobalBestFit => self.pack_global(),
            BinSelection::NextFit | BinSelection::FirstFit | BinSelection::BestFit => {
                let sorted = sorted_requests(&self.avail_rects, self.config.effective_sort_order());
                let mut rejected = 0usize;
                for r in sorted {
                    if self.dispatch(r.width, r.height, r.rid).is_none() {
                        debug!(width = r.width, height = r.height, "rectangle rejected");
                        rejected += 1;
                    }
                }
                debug!(bins = self.len(), rejected, "packing finished");
            }
        }
    }

    /// Clears bins, placements and queued input.
    pub fn reset(&mut self) {
        self.reset_bins();
        self.avail_bins.clear();
        self.avail_rects.clear();
    }

    fn reset_bins(&mut self) {
        self.closed_bins.clear();
        self.open_bins.clear();
        self.empty_bins.clear();
        self.bin_count = 0;
    }

    fn register_bin(&mut self, width: u32, height: u32, count: usize) {
        let factory = BinFactory::new(width, height, count, self.config.skyline_params());
        self.empty_bins.insert(self.bin_count, factory);
        self.bin_count += 1;
    }

    /// Rectangles queued for the next offline run.
    pub fn pending_rects(&self) -> usize {
        self.avail_rects.len()
    }

    /// Unopened bins still available.
    pub fn unopened_bins(&self) -> usize {
        self.empty_bins.values().map(BinFactory::remaining).sum()
    }

    fn dispatch(&mut self, width: u32, height: u32, rid: Option<K>) -> Option<Placement<K>> {
        // No bin takes these; next fit would close its bin for nothing.
        if width == 0 || height == 0 {
            return None;
        }
        match self.config.bin_selection {
            // Global fills bins itself; single insertions fall back to next fit.
            BinSelection::NextFit | BinSelection::GlobalBestFit => {
                self.add_next_fit(width, height, rid)
            }
            BinSelection::FirstFit => self.add_first_fit(width, height, rid),
            BinSelection::BestFit => self.add_best_fit(width, height, rid),
        }
    }

    fn placement(&self, bin: usize, r: Rectangle<K>) -> Placement<K> {
        Placement {
            bin,
            x: r.x,
            y: r.y,
            width: r.width,
            height: r.height,
            rid: r.rid,
        }
    }

    /// Opens a bin from the first factory whose empty bin can hold the
    /// rectangle. Exhausted factories are dropped.
    fn new_open_bin(&mut self, width: u32, height: u32) -> bool {
        let mut exhausted = None;
        let mut opened = false;
        for (&key, factory) in self.empty_bins.iter_mut() {
            if !factory.fits_inside(width, height) {
                continue;
            }
            let Some(bin) = factory.new_bin() else {
                continue;
            };
            debug!(
                bin = self.closed_bins.len() + self.open_bins.len(),
                width = bin.width(),
                height = bin.height(),
                "opened bin"
            );
            self.open_bins.push_back(bin);
            if factory.is_empty() {
                exhausted = Some(key);
            }
            opened = true;
            break;
        }
        if let Some(key) = exhausted {
            self.empty_bins.remove(&key);
        }
        opened
    }

    fn close_front(&mut self) {
        if let Some(bin) = self.open_bins.pop_front() {
            debug!(bin = self.closed_bins.len(), rects = bin.len(), "closed bin");
            self.closed_bins.push(bin);
        }
    }

    /// Keeps opening bins until one accepts the rectangle or no factory can
    /// provide another. Every iteration consumes one factory bin.
    fn add_to_new_bin(&mut self, width: u32, height: u32, rid: Option<K>) -> Option<Placement<K>> {
        loop {
            if !self.new_open_bin(width, height) {
                return None;
            }
            let i = self.open_bins.len() - 1;
            if let Some(r) = self.open_bins[i].add_rect(width, height, rid.clone()) {
                return Some(self.placement(self.closed_bins.len() + i, r));
            }
        }
    }

    fn add_next_fit(&mut self, width: u32, height: u32, rid: Option<K>) -> Option<Placement<K>> {
        loop {
            if self.open_bins.is_empty() && !self.new_open_bin(width, height) {
                return None;
            }
            if let Some(r) = self.open_bins[0].add_rect(width, height, rid.clone()) {
                return Some(self.placement(self.closed_bins.len(), r));
            }
            // Doesn't fit: close this bin and move on.
            self.close_front();
        }
    }

    fn add_first_fit(&mut self, width: u32, height: u32, rid: Option<K>) -> Option<Placement<K>> {
        for i in 0..self.open_bins.len() {
            if let Some(r) = self.open_bins[i].add_rect(width, height, rid.clone()) {
                return Some(self.placement(self.closed_bins.len() + i, r));
            }
        }
        self.add_to_new_bin(width, height, rid)
    }

    fn add_best_fit(&mut self, width: u32, height: u32, rid: Option<K>) -> Option<Placement<K>> {
        let best = self
            .open_bins
            .iter()
            .enumerate()
            .filter_map(|(i, b)| b.fitness(width, height).map(|f| (f, i)))
            .min_by_key(|&(f, _)| f);
        if let Some((_, i)) = best {
            if let Some(r) = self.open_bins[i].add_rect(width, height, rid.clone()) {
                return Some(self.placement(self.closed_bins.len() + i, r));
            }
        }
        self.add_to_new_bin(width, height, rid)
    }

    /// For each bin, place the fittest remaining rectangle until none fits,
    /// then open the next bin that can hold at least one of the rest.
    fn pack_global(&mut self) {
        let mut remaining: SlotMap<PendingKey, RectRequest<K>> = SlotMap::with_key();
        for r in &self.avail_rects {
            remaining.insert(r.clone());
        }

        while !remaining.is_empty() {
            if !self.open_global_bin(&remaining) {
                break;
            }
            loop {
                let Some(key) = self.fittest_pending(&remaining) else {
                    self.close_front();
                    break;
                };
                let Some(r) = remaining.remove(key) else {
                    break;
                };
                let placed = self
                    .open_bins
                    .front_mut()
                    .and_then(|bin| bin.add_rect(r.width, r.height, r.rid));
                if placed.is_none() {
                    debug!(width = r.width, height = r.height, "fitness estimate disagreed with insertion");
                    self.close_front();
                    break;
                }
            }
        }
        debug!(bins = self.len(), rejected = remaining.len(), "global packing finished");
    }

    fn fittest_pending(&self, remaining: &SlotMap<PendingKey, RectRequest<K>>) -> Option<PendingKey> {
        let bin = self.open_bins.front()?;
        remaining
            .iter()
            .filter_map(|(k, r)| bin.fitness(r.width, r.height).map(|f| (f, k)))
            .min_by_key(|&(f, _)| f)
            .map(|(_, k)| k)
    }

    /// Opens the next bin that fits at least one remaining rectangle.
    /// Factories that fit none of them are discarded.
    fn open_global_bin(&mut self, remaining: &SlotMap<PendingKey, RectRequest<K>>) -> bool {
        let mut discard = Vec::new();
        let mut opened = false;
        for (&key, factory) in self.empty_bins.iter_mut() {
            let any_fits = remaining
                .values()
                .any(|r| factory.fits_inside(r.width, r.height));
            if !any_fits {
                discard.push(key);
                continue;
            }
            let Some(bin) = factory.new_bin() else {
                continue;
            };
            debug!(
                bin = self.closed_bins.len() + self.open_bins.len(),
                width = bin.width(),
                height = bin.height(),
                "opened bin"
            );
            self.open_bins.push_back(bin);
            if factory.is_empty() {
                discard.push(key);
            }
            opened = true;
            break;
        }
        for key in discard {
            self.empty_bins.remove(&key);
        }
        opened
    }

    /// Number of opened bins (closed and open).
    pub fn len(&self) -> usize {
        self.closed_bins.len() + self.open_bins.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn get(&self, index: usize) -> Option<&Skyline<K>> {
        if index < self.closed_bins.len() {
            self.closed_bins.get(index)
        } else {
            self.open_bins.get(index - self.closed_bins.len())
        }
    }

    /// Opened bins: closed bins first, then open ones.
    pub fn iter(&self) -> impl Iterator<Item = &Skyline<K>> {
        self.closed_bins.iter().chain(self.open_bins.iter())
    }

    /// Every placed rectangle as `(bin, x, y, width, height, rid)`.
    pub fn rect_list(&self) -> Vec<Placement<K>> {
        let mut out = Vec::new();
        for (bin, b) in self.iter().enumerate() {
            for r in b.rectangles() {
                out.push(self.placement(bin, r.clone()));
            }
        }
        out
    }

    /// `(width, height)` of every opened bin.
    pub fn bin_list(&self) -> Vec<(u32, u32)> {
        self.iter().map(|b| (b.width(), b.height())).collect()
    }

    /// Checks containment and overlap in every opened bin.
    pub fn validate_packing(&self) -> Result<()> {
        for (i, b) in self.iter().enumerate() {
            b.validate_packing(i)?;
        }
        Ok(())
    }

    /// Computes packing statistics over the opened bins.
    pub fn stats(&self) -> PackStats {
        let mut num_rects = 0;
        let mut total_bin_area = 0u64;
        let mut used_area = 0u64;
        for b in self.iter() {
            total_bin_area += b.width() as u64 * b.height() as u64;
            used_area += b.used_area();
            num_rects += b.len();
        }
        let occupancy = if total_bin_area > 0 {
            used_area as f64 / total_bin_area as f64
        } else {
            0.0
        };
        PackStats {
            num_bins: self.len(),
            num_rects,
            total_bin_area,
            used_area,
            occupancy,
        }
    }
}

impl<K: Clone> Index<usize> for Packer<K> {
    type Output = Skyline<K>;

    fn index(&self, index: usize) -> &Self::Output {
        match self.get(index) {
            Some(bin) => bin,
            None => panic!("bin index {index} out of range for {} opened bins", self.len()),
        }
    }
}

/// Stable descending sort of the queued rectangles.
fn sorted_requests<K: Clone>(rects: &[RectRequest<K>], order: SortOrder) -> Vec<RectRequest<K>> {
    let mut out = rects.to_vec();
    if order != SortOrder::None {
        out.sort_by(|a, b| order.compare((a.width, a.height), (b.width, b.height)));
    }
    out
}
