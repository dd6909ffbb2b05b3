//! Normalized pointer vector → grid coordinate mapping.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Integer cell position inside a grid.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GridCoord {
    pub x: u32,
    pub y: u32,
}

impl GridCoord {
    #[inline]
    pub const fn new(x: u32, y: u32) -> Self {
        Self { x, y }
    }

    /// Row-major linear index; equals the generated sample's `index`.
    #[inline]
    pub fn frame_index(self, width: u32) -> u32 {
        self.y * width + self.x
    }

    /// Seek position of this cell in a video assembled at `fps`.
    #[inline]
    pub fn frame_time(self, width: u32, fps: f64) -> f64 {
        self.frame_index(width) as f64 / fps
    }

    /// Inverse of [`GridCoord::frame_index`]. `width` must be at least 1.
    #[inline]
    pub fn from_frame_index(index: u32, width: u32) -> Self {
        Self::new(index % width, index / width)
    }
}

/// Map `n ∈ [-1, 1]` onto `0..steps`, rounding half away from zero.
///
/// Values outside `[-1, 1]` saturate at the ends; NaN maps to the first step.
#[inline]
pub fn to_index(n: f32, steps: u32) -> u32 {
    if steps <= 1 {
        return 0;
    }
    let max = (steps - 1) as f32;
    let scaled = ((n.clamp(-1.0, 1.0) + 1.0) / 2.0 * max).round();
    // `as` saturates and maps NaN to 0
    (scaled as u32).min(steps - 1)
}

#[inline]
pub fn map_grid(n: Vec2, width: u32, height: u32) -> GridCoord {
    GridCoord::new(to_index(n.x, width), to_index(n.y, height))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn to_index_rounds_half_away_from_zero() {
        // (0 + 1) / 2 * 3 = 1.5 -> 2
        assert_eq!(to_index(0.0, 4), 2);
        assert_eq!(to_index(0.0, 10), 5);
        assert_eq!(to_index(0.0, 5), 2);
    }

    #[test]
    fn to_index_saturates_out_of_range_and_nan() {
        assert_eq!(to_index(-3.0, 10), 0);
        assert_eq!(to_index(7.5, 10), 9);
        assert_eq!(to_index(f32::NAN, 10), 0);
        assert_eq!(to_index(0.3, 1), 0);
    }

    #[test]
    fn frame_index_round_trips() {
        let c = GridCoord::new(3, 7);
        assert_eq!(c.frame_index(10), 73);
        assert_eq!(GridCoord::from_frame_index(73, 10), c);
        assert!((c.frame_time(10, 60.0) - 73.0 / 60.0).abs() < 1e-12);
    }
}
