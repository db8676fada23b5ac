use thiserror::Error;

use crate::config::{BinSelection, PackingMode};
use crate::model::Rect;

#[derive(Debug, Error)]
pub enum RectPackError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Bin selection {bin_selection:?} is not available in {mode:?} mode")]
    UnsupportedCombination {
        mode: PackingMode,
        bin_selection: BinSelection,
    },
    #[error("Rectangle {rect:?} lies outside bin {bin}")]
    OutOfBounds { bin: usize, rect: Rect },
    #[error("Rectangles {first:?} and {second:?} overlap in bin {bin}")]
    Collision { bin: usize, first: Rect, second: Rect },
}

pub type Result<T> = std::result::Result<T, RectPackError>;
