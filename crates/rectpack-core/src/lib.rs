//! Two-dimensional rectangle bin packing.
//!
//! - Algorithm: Skyline (BL/MW/MWL) with an optional waste manager that reuses
//!   space trapped below the skyline
//! - Engine: `Packer` spreads rectangles over any number of bins, online or
//!   offline, with next/first/best/global best fit bin selection
//! - `Enclose` searches for the smallest container holding a set of rectangles
//! - Data model is serde-serializable; JSON helpers live in `export`.
//!
//! Quick example:
//! ```
//! use rectpack_core::prelude::*;
//! # fn main() -> rectpack_core::Result<()> {
//! let cfg = PackerConfig::builder().bin_selection(BinSelection::BestFit).build();
//! let mut packer: Packer<&str> = Packer::new(cfg)?;
//! packer.add_bin(64, 64, 2);
//! packer.add_rect(30, 40, Some("a"));
//! packer.add_rect(20, 20, Some("b"));
//! packer.pack();
//! assert_eq!(packer.rect_list().len(), 2);
//! packer.validate_packing()?;
//! # Ok(()) }
//! ```

pub mod bins;
pub mod config;
pub mod enclose;
pub mod engine;
pub mod error;
pub mod export;
pub mod model;
pub mod packer;

pub use bins::*;
pub use config::*;
pub use enclose::*;
pub use engine::*;
pub use error::*;
pub use export::*;
pub use model::*;
pub use packer::*;

/// Convenience prelude for common types and functions.
/// Importing `rectpack_core::prelude::*` brings the primary APIs into scope.
pub mod prelude {
    pub use crate::bins::BinFactory;
    pub use crate::config::{
        BinSelection, PackerConfig, PackerConfigBuilder, PackingMode, SkylineHeuristic,
        SkylineParams, SortOrder,
    };
    pub use crate::enclose::{Enclose, Enclosure};
    pub use crate::engine::{Admission, Packer};
    pub use crate::model::{PackStats, Placement, Rect, Rectangle, Segment};
    pub use crate::packer::skyline::Skyline;
    pub use crate::packer::waste::WasteManager;
    pub use crate::packer::PackingAlgorithm;
}
