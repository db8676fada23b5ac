use std::cell::OnceCell;
use std::fmt;

use crate::config::SkylineParams;
use crate::packer::PackingAlgorithm;
use crate::packer::skyline::Skyline;

/// `count` identical bins that have not been opened yet.
///
/// Feasibility checks run against a reference bin that is created on first
/// use and never receives rectangles.
#[derive(Clone)]
pub struct BinFactory<K> {
    width: u32,
    height: u32,
    remaining: usize,
    params: SkylineParams,
    reference: OnceCell<Skyline<K>>,
}

impl<K> BinFactory<K> {
    pub fn new(width: u32, height: u32, count: usize, params: SkylineParams) -> Self {
        Self {
            width,
            height,
            remaining: count,
            params,
            reference: OnceCell::new(),
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }
    pub fn height(&self) -> u32 {
        self.height
    }
    /// Bins this factory can still hand out.
    pub fn remaining(&self) -> usize {
        self.remaining
    }
    pub fn is_empty(&self) -> bool {
        self.remaining < 1
    }

    fn create_bin(&self) -> Skyline<K> {
        Skyline::new(self.width, self.height, self.params)
    }

    fn reference_bin(&self) -> &Skyline<K> {
        self.reference.get_or_init(|| self.create_bin())
    }

    /// Whether the reference bin has been built yet.
    pub fn has_reference_bin(&self) -> bool {
        self.reference.get().is_some()
    }

    /// Whether a `width × height` rectangle fits an empty bin from this factory.
    pub fn fits_inside(&self, width: u32, height: u32) -> bool {
        self.reference_bin().fits_surface(width, height)
    }

    /// Hand out a fresh bin, or `None` once the factory is exhausted.
    pub fn new_bin(&mut self) -> Option<Skyline<K>> {
        if self.remaining > 0 {
            self.remaining -= 1;
            Some(self.create_bin())
        } else {
            None
        }
    }
}

impl<K: Clone> BinFactory<K> {
    /// Fitness of a `width × height` rectangle in an empty bin from this factory.
    pub fn fitness(&self, width: u32, height: u32) -> Option<u64> {
        self.reference_bin().fitness(width, height)
    }
}

impl<K> fmt::Debug for BinFactory<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BinFactory")
            .field("width", &self.width)
            .field("height", &self.height)
            .field("remaining", &self.remaining)
            .field("params", &self.params)
            .finish()
    }
}
