//! Pose grid generation.
//!
//! A grid is a row-major `height × width` collection of [`Sample`]s. Each
//! sample carries a head pose interpolated linearly across the grid extent and
//! the asset filename the image generator writes for that pose.

use crate::asset_name::AssetName;
use crate::config::{Bounds, GridSpec};
use crate::constants::POSE_PRECISION;
use crate::error::GridError;
use crate::mapper::GridCoord;
use serde::{Deserialize, Serialize};

/// Simulated head and eye orientation of one sample.
///
/// `yaw` > 0 looks left, `pitch` > 0 looks down. `pupil_y` runs opposite to
/// pitch: the bottom row has pupils raised.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Pose {
    pub yaw: f64,
    pub pitch: f64,
    pub pupil_x: f64,
    pub pupil_y: f64,
}

impl Pose {
    /// Pose for cell `(x, y)` of a `width × height` grid.
    pub fn at(x: u32, y: u32, width: u32, height: u32, bounds: Bounds) -> Self {
        let tx = axis_fraction(x, width);
        let ty = axis_fraction(y, height);
        Self {
            yaw: tx.map_or(0.0, |t| round_pose(lerp_bound(bounds.rotate, t))),
            pitch: ty.map_or(0.0, |t| round_pose(lerp_bound(bounds.rotate, t))),
            pupil_x: tx.map_or(0.0, |t| round_pose(lerp_bound(bounds.pupil, t))),
            pupil_y: ty.map_or(0.0, |t| round_pose(-lerp_bound(bounds.pupil, t))),
        }
    }
}

/// One cell of the grid.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Sample {
    pub x: u32,
    pub y: u32,
    pub index: u32,
    #[serde(flatten)]
    pub pose: Pose,
    pub filename: String,
}

impl Sample {
    #[inline]
    pub fn coord(&self) -> GridCoord {
        GridCoord::new(self.x, self.y)
    }

    pub fn asset_name(&self, prefix: &str) -> AssetName {
        AssetName {
            prefix: prefix.to_string(),
            index: self.index,
            x: self.x,
            y: self.y,
            pose: self.pose,
        }
    }
}

/// Generated pose grid for one [`GridSpec`].
#[derive(Clone, Debug, PartialEq)]
pub struct Grid {
    spec: GridSpec,
    bounds: Bounds,
    samples: Vec<Sample>,
}

/// Generate a grid with the default pose bounds.
pub fn generate(width: u32, height: u32, prefix: &str) -> Result<Grid, GridError> {
    let spec = GridSpec::new(width, height, prefix)?;
    Grid::new(spec, Bounds::default())
}

impl Grid {
    pub fn new(spec: GridSpec, bounds: Bounds) -> Result<Self, GridError> {
        bounds.validate()?;
        let (width, height) = (spec.width(), spec.height());
        let mut samples = Vec::with_capacity(spec.len());
        for y in 0..height {
            for x in 0..width {
                let index = y * width + x;
                let pose = Pose::at(x, y, width, height, bounds);
                let filename = AssetName {
                    prefix: spec.prefix().to_string(),
                    index,
                    x,
                    y,
                    pose,
                }
                .encode();
                samples.push(Sample {
                    x,
                    y,
                    index,
                    pose,
                    filename,
                });
            }
        }
        log::debug!(
            "[grid] generated {}x{} grid for {:?}",
            width,
            height,
            spec.prefix()
        );
        Ok(Self {
            spec,
            bounds,
            samples,
        })
    }

    #[inline]
    pub fn spec(&self) -> &GridSpec {
        &self.spec
    }

    #[inline]
    pub fn bounds(&self) -> Bounds {
        self.bounds
    }

    #[inline]
    pub fn width(&self) -> u32 {
        self.spec.width()
    }

    #[inline]
    pub fn height(&self) -> u32 {
        self.spec.height()
    }

    #[inline]
    pub fn prefix(&self) -> &str {
        self.spec.prefix()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn get(&self, x: u32, y: u32) -> Option<&Sample> {
        if x >= self.width() || y >= self.height() {
            return None;
        }
        self.samples.get((y * self.width() + x) as usize)
    }

    #[inline]
    pub fn at(&self, coord: GridCoord) -> Option<&Sample> {
        self.get(coord.x, coord.y)
    }

    #[inline]
    pub fn by_index(&self, index: u32) -> Option<&Sample> {
        self.samples.get(index as usize)
    }

    /// Row-major flat view, matching video frame order.
    #[inline]
    pub fn samples(&self) -> &[Sample] {
        &self.samples
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Sample> {
        self.samples.iter()
    }

    pub fn rows(&self) -> std::slice::Chunks<'_, Sample> {
        self.samples.chunks(self.width() as usize)
    }

    /// Resting cell used before the first pointer event.
    pub fn center(&self) -> GridCoord {
        GridCoord::new(self.width() / 2, self.height() / 2)
    }

    pub fn filenames(&self) -> impl Iterator<Item = &str> + '_ {
        self.samples.iter().map(|s| s.filename.as_str())
    }
}

impl<'a> IntoIterator for &'a Grid {
    type Item = &'a Sample;
    type IntoIter = std::slice::Iter<'a, Sample>;

    fn into_iter(self) -> Self::IntoIter {
        self.samples.iter()
    }
}

/// `step / (steps - 1)`, or `None` on a single-step axis.
#[inline]
fn axis_fraction(step: u32, steps: u32) -> Option<f64> {
    (steps > 1).then(|| step as f64 / (steps - 1) as f64)
}

#[inline]
fn lerp_bound(bound: f64, t: f64) -> f64 {
    bound * 2.0 * t - bound
}

/// Round half up to one decimal, the rounding existing asset sets were named with.
#[inline]
fn round_pose(value: f64) -> f64 {
    (value * POSE_PRECISION + 0.5).floor() / POSE_PRECISION + 0.0
}
