//! Validated grid and session configuration.
//!
//! Everything here is read once when a grid is (re)generated; there is no
//! mid-session reconfiguration short of loading a new [`GridSpec`].

use crate::constants::{
    DEFAULT_ASSET_ROOT, DEFAULT_PREFIX, DEFAULT_X_STEPS, DEFAULT_Y_STEPS, FIXED_RADIUS, FPS,
    MAX_GRID_CELLS, PUPIL_BOUND, ROTATE_BOUND,
};
use crate::error::GridError;
use serde::{Deserialize, Serialize};

/// Dimensions and asset prefix of one pose grid.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "RawGridSpec")]
pub struct GridSpec {
    width: u32,
    height: u32,
    prefix: String,
}

#[derive(Deserialize)]
struct RawGridSpec {
    width: u32,
    height: u32,
    prefix: String,
}

impl TryFrom<RawGridSpec> for GridSpec {
    type Error = GridError;

    fn try_from(raw: RawGridSpec) -> Result<Self, Self::Error> {
        GridSpec::new(raw.width, raw.height, raw.prefix)
    }
}

impl GridSpec {
    pub fn new(width: u32, height: u32, prefix: impl Into<String>) -> Result<Self, GridError> {
        if width < 1 || height < 1 {
            return Err(GridError::InvalidDimensions { width, height });
        }
        match width.checked_mul(height) {
            Some(cells) if cells <= MAX_GRID_CELLS => {}
            _ => return Err(GridError::TooManyCells { width, height }),
        }
        let prefix = prefix.into();
        if prefix.is_empty() {
            return Err(GridError::EmptyPrefix);
        }
        if prefix.contains(['/', '\\']) || prefix == "." || prefix == ".." {
            return Err(GridError::PrefixSeparator(prefix));
        }
        Ok(Self {
            width,
            height,
            prefix,
        })
    }

    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    #[inline]
    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.width as usize * self.height as usize
    }

    /// Always false for a validated spec; present for clippy's `len_without_is_empty`.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for GridSpec {
    fn default() -> Self {
        Self {
            width: DEFAULT_X_STEPS,
            height: DEFAULT_Y_STEPS,
            prefix: DEFAULT_PREFIX.to_string(),
        }
    }
}

/// Symmetric pose limits: head rotation in `[-rotate, rotate]`, pupils in `[-pupil, pupil]`.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    pub rotate: f64,
    pub pupil: f64,
}

impl Default for Bounds {
    fn default() -> Self {
        Self {
            rotate: ROTATE_BOUND,
            pupil: PUPIL_BOUND,
        }
    }
}

impl Bounds {
    pub fn validate(&self) -> Result<(), GridError> {
        positive("rotate bound", self.rotate)?;
        positive("pupil bound", self.pupil)
    }
}

/// Full viewer configuration for one active photo.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GazeConfig {
    pub grid: GridSpec,
    pub bounds: Bounds,
    pub fps: f64,
    pub fixed_radius: f32,
    pub asset_root: String,
}

impl Default for GazeConfig {
    fn default() -> Self {
        Self {
            grid: GridSpec::default(),
            bounds: Bounds::default(),
            fps: FPS,
            fixed_radius: FIXED_RADIUS,
            asset_root: DEFAULT_ASSET_ROOT.to_string(),
        }
    }
}

impl GazeConfig {
    pub fn with_grid(grid: GridSpec) -> Self {
        Self {
            grid,
            ..Self::default()
        }
    }

    pub fn validate(&self) -> Result<(), GridError> {
        self.bounds.validate()?;
        positive("fps", self.fps)?;
        positive("fixed radius", self.fixed_radius as f64)
    }
}

fn positive(name: &'static str, value: f64) -> Result<(), GridError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(GridError::InvalidValue { name, value })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_zero_dimensions() {
        assert_eq!(
            GridSpec::new(0, 4, "p"),
            Err(GridError::InvalidDimensions {
                width: 0,
                height: 4
            })
        );
        assert!(GridSpec::new(3, 0, "p").is_err());
        assert!(GridSpec::new(1, 1, "p").is_ok());
    }

    #[test]
    fn rejects_oversized_grids() {
        assert_eq!(
            GridSpec::new(70_000, 70_000, "p"),
            Err(GridError::TooManyCells {
                width: 70_000,
                height: 70_000
            })
        );
        assert!(GridSpec::new(u32::MAX, 2, "p").is_err());
        assert!(GridSpec::new(MAX_GRID_CELLS + 1, 1, "p").is_err());
        assert!(GridSpec::new(MAX_GRID_CELLS, 1, "p").is_ok());
        assert!(GridSpec::new(100, 100, "p").is_ok());
    }

    #[test]
    fn rejects_bad_prefixes() {
        assert_eq!(GridSpec::new(2, 2, ""), Err(GridError::EmptyPrefix));
        assert!(matches!(
            GridSpec::new(2, 2, "../etc"),
            Err(GridError::PrefixSeparator(_))
        ));
        assert!(GridSpec::new(2, 2, "..").is_err());
    }

    #[test]
    fn config_deserializes_with_defaults_and_validation() {
        let cfg: GazeConfig =
            serde_json::from_str(r#"{"grid":{"width":25,"height":25,"prefix":"wes-big"}}"#)
                .unwrap();
        assert_eq!(cfg.grid.width(), 25);
        assert_eq!(cfg.fps, FPS);
        assert!(cfg.validate().is_ok());

        let bad = serde_json::from_str::<GazeConfig>(
            r#"{"grid":{"width":0,"height":25,"prefix":"wes-big"}}"#,
        );
        assert!(bad.is_err());
    }

    #[test]
    fn config_rejects_non_positive_fps() {
        let cfg = GazeConfig {
            fps: 0.0,
            ..GazeConfig::default()
        };
        assert!(matches!(
            cfg.validate(),
            Err(GridError::InvalidValue { name: "fps", .. })
        ));
    }
}
