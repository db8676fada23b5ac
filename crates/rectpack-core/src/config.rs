use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::str::FromStr;

use crate::error::{RectPackError, Result};

/// When rectangles are packed.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum PackingMode {
    /// Rectangles are packed as soon as they are added.
    Online,
    /// Rectangles are queued and packed together by `pack()`, optionally sorted first.
    Offline,
}

impl FromStr for PackingMode {
    type Err = ();
    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "online" => Ok(Self::Online),
            "offline" => Ok(Self::Offline),
            _ => Err(()),
        }
    }
}

/// Bin selection strategies.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum BinSelection {
    /// One open bin at a time; a rectangle that doesn't fit closes it.
    NextFit,
    /// First open bin that accepts the rectangle.
    FirstFit,
    /// Open bin reporting the lowest fitness.
    BestFit,
    /// Offline only: fill each bin with the fittest remaining rectangle until none fits.
    GlobalBestFit,
}

impl FromStr for BinSelection {
    type Err = ();
    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "bnf" | "next_fit" | "nextfit" => Ok(Self::NextFit),
            "bff" | "first_fit" | "firstfit" => Ok(Self::FirstFit),
            "bbf" | "best_fit" | "bestfit" => Ok(Self::BestFit),
            "global" | "global_best_fit" | "globalbestfit" => Ok(Self::GlobalBestFit),
            _ => Err(()),
        }
    }
}

/// Skyline fitness heuristics. Lower fitness is better.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum SkylineHeuristic {
    /// Resulting top edge of the rectangle.
    BottomLeft,
    /// Area left unusable below the rectangle.
    MinWaste,
    /// Wasted area first, resulting top edge as tie-breaker.
    MinWasteLowProfile,
}

impl FromStr for SkylineHeuristic {
    type Err = ();
    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "bl" | "bottomleft" | "bottom_left" => Ok(Self::BottomLeft),
            "mwf" | "minwaste" | "min_waste" => Ok(Self::MinWaste),
            "mwfl" | "minwastelowprofile" | "min_waste_low_profile" => {
                Ok(Self::MinWasteLowProfile)
            }
            _ => Err(()),
        }
    }
}

/// Sort keys applied to rectangles before offline packing. All sorts are
/// descending and stable.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum SortOrder {
    Area,
    Perimeter,
    /// Absolute difference between the sides.
    Difference,
    /// Short side first, long side as tie-breaker.
    ShortSide,
    /// Long side first, short side as tie-breaker.
    LongSide,
    /// Width / height.
    Ratio,
    None,
}

impl FromStr for SortOrder {
    type Err = ();
    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "area" => Ok(Self::Area),
            "perimeter" | "peri" => Ok(Self::Perimeter),
            "difference" | "diff" => Ok(Self::Difference),
            "short_side" | "sside" => Ok(Self::ShortSide),
            "long_side" | "lside" => Ok(Self::LongSide),
            "ratio" => Ok(Self::Ratio),
            "none" => Ok(Self::None),
            _ => Err(()),
        }
    }
}

impl SortOrder {
    /// Ordering of two `(width, height)` sizes, larger key first.
    /// Equal keys compare `Equal` so a stable sort keeps insertion order.
    pub fn compare(&self, a: (u32, u32), b: (u32, u32)) -> Ordering {
        let (aw, ah) = (a.0 as u64, a.1 as u64);
        let (bw, bh) = (b.0 as u64, b.1 as u64);
        match self {
            SortOrder::Area => (bw * bh).cmp(&(aw * ah)),
            SortOrder::Perimeter => (bw + bh).cmp(&(aw + ah)),
            SortOrder::Difference => bw.abs_diff(bh).cmp(&aw.abs_diff(ah)),
            SortOrder::ShortSide => (bw.min(bh), bw.max(bh)).cmp(&(aw.min(ah), aw.max(ah))),
            SortOrder::LongSide => (bw.max(bh), bw.min(bh)).cmp(&(aw.max(ah), aw.min(ah))),
            // bw/bh vs aw/ah without division
            SortOrder::Ratio => (bw * ah).cmp(&(aw * bh)),
            SortOrder::None => Ordering::Equal,
        }
    }
}

/// Per-bin algorithm parameters, shared by every bin a factory creates.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct SkylineParams {
    pub heuristic: SkylineHeuristic,
    pub waste_management: bool,
    pub allow_rotation: bool,
}

impl Default for SkylineParams {
    fn default() -> Self {
        Self {
            heuristic: default_heuristic(),
            waste_management: false,
            allow_rotation: true,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PackerConfig {
    #[serde(default = "default_mode")]
    pub mode: PackingMode,
    #[serde(default = "default_bin_selection")]
    pub bin_selection: BinSelection,
    #[serde(default = "default_heuristic")]
    pub heuristic: SkylineHeuristic,
    /// Reuse space trapped below the skyline.
    #[serde(default)]
    pub waste_management: bool,
    /// Offline pre-sort. Ignored in online mode and by `GlobalBestFit`.
    #[serde(default = "default_sort_order")]
    pub sort_order: SortOrder,
    /// Allow 90° rotations for placements where beneficial.
    #[serde(default = "default_rotation")]
    pub allow_rotation: bool,
}

impl Default for PackerConfig {
    fn default() -> Self {
        Self {
            mode: default_mode(),
            bin_selection: default_bin_selection(),
            heuristic: default_heuristic(),
            waste_management: false,
            sort_order: default_sort_order(),
            allow_rotation: default_rotation(),
        }
    }
}

impl PackerConfig {
    /// Validates the mode / bin selection combination.
    ///
    /// `GlobalBestFit` needs the whole rectangle set up front, so it is only
    /// available in offline mode.
    pub fn validate(&self) -> Result<()> {
        match (self.mode, self.bin_selection) {
            (PackingMode::Online, BinSelection::GlobalBestFit) => {
                Err(RectPackError::UnsupportedCombination {
                    mode: self.mode,
                    bin_selection: self.bin_selection,
                })
            }
            (PackingMode::Online, _) | (PackingMode::Offline, _) => Ok(()),
        }
    }

    /// Parameters handed to every bin the packer creates.
    pub fn skyline_params(&self) -> SkylineParams {
        SkylineParams {
            heuristic: self.heuristic,
            waste_management: self.waste_management,
            allow_rotation: self.allow_rotation,
        }
    }

    /// Sort order actually applied by `pack()`.
    pub fn effective_sort_order(&self) -> SortOrder {
        match (self.mode, self.bin_selection) {
            (PackingMode::Online, _) | (_, BinSelection::GlobalBestFit) => SortOrder::None,
            (PackingMode::Offline, _) => self.sort_order,
        }
    }
}

fn default_mode() -> PackingMode {
    PackingMode::Offline
}
fn default_bin_selection() -> BinSelection {
    BinSelection::BestFit
}
fn default_heuristic() -> SkylineHeuristic {
    SkylineHeuristic::BottomLeft
}
fn default_sort_order() -> SortOrder {
    SortOrder::Area
}
fn default_rotation() -> bool {
    true
}

/// Builder for `PackerConfig` for ergonomic construction.
#[derive(Debug, Default, Clone)]
pub struct PackerConfigBuilder {
    cfg: PackerConfig,
}

impl PackerConfigBuilder {
    pub fn new() -> Self {
        Self {
            cfg: PackerConfig::default(),
        }
    }
    pub fn mode(mut self, v: PackingMode) -> Self {
        self.cfg.mode = v;
        self
    }
    pub fn bin_selection(mut self, v: BinSelection) -> Self {
        self.cfg.bin_selection = v;
        self
    }
    pub fn heuristic(mut self, v: SkylineHeuristic) -> Self {
        self.cfg.heuristic = v;
        self
    }
    pub fn waste_management(mut self, v: bool) -> Self {
        self.cfg.waste_management = v;
        self
    }
    pub fn sort_order(mut self, v: SortOrder) -> Self {
        self.cfg.sort_order = v;
        self
    }
    pub fn allow_rotation(mut self, v: bool) -> Self {
        self.cfg.allow_rotation = v;
        self
    }
    pub fn build(self) -> PackerConfig {
        self.cfg
    }
}

impl PackerConfig {
    /// Create a fluent builder for `PackerConfig`.
    pub fn builder() -> PackerConfigBuilder {
        PackerConfigBuilder::new()
    }
}
