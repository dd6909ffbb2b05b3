//! Error types for grid construction and asset-name decoding.

use thiserror::Error;

/// Rejected grid or session configuration.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum GridError {
    #[error("grid dimensions must be at least 1x1, got {width}x{height}")]
    InvalidDimensions { width: u32, height: u32 },

    #[error("grid {width}x{height} exceeds {max} cells", max = crate::constants::MAX_GRID_CELLS)]
    TooManyCells { width: u32, height: u32 },

    #[error("grid prefix must be non-empty")]
    EmptyPrefix,

    #[error("grid prefix {0:?} is not a plain directory name")]
    PrefixSeparator(String),

    #[error("{name} must be positive and finite, got {value}")]
    InvalidValue { name: &'static str, value: f64 },
}

/// A string that does not follow the asset-name grammar.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AssetNameError {
    #[error("asset name {0:?} does not end in .webp")]
    Extension(String),

    #[error("asset name {0:?} has too few fields")]
    FieldCount(String),

    #[error("field `{field}` is missing its `{tag}` tag in {value:?}")]
    MissingTag {
        field: &'static str,
        tag: &'static str,
        value: String,
    },

    #[error("field `{field}` is not a valid number: {value:?}")]
    Number { field: &'static str, value: String },

    #[error("index {index} does not match cell ({x}, {y})")]
    Inconsistent { index: u32, x: u32, y: u32 },

    #[error("asset name {0:?} is not in canonical form")]
    NonCanonical(String),
}
