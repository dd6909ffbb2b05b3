//! Pointer position → clamped unit vector.
//!
//! Two reference frames are supported: a container rectangle (the whole
//! container spans `[-1, 1]`) and a fixed radius around some element center
//! (many elements reacting independently to one pointer). Both saturate at
//! `±1` per axis and return `None` instead of dividing by zero.

use crate::mapper::GridCoord;
use glam::Vec2;
use instant::Instant;

/// Axis-aligned client-space rectangle, as reported by `getBoundingClientRect`.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Rect {
    pub left: f32,
    pub top: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub const fn new(left: f32, top: f32, width: f32, height: f32) -> Self {
        Self {
            left,
            top,
            width,
            height,
        }
    }

    #[inline]
    pub fn center(&self) -> Vec2 {
        Vec2::new(self.left + self.width / 2.0, self.top + self.height / 2.0)
    }

    #[inline]
    pub fn half_extent(&self) -> Vec2 {
        Vec2::new(self.width / 2.0, self.height / 2.0)
    }
}

/// Which reference frame a renderer normalizes against.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Normalization {
    /// Divide by half the container's width/height, measured from its center.
    Container(Rect),
    /// Divide by a constant distance from `center`.
    FixedRadius { center: Vec2, radius: f32 },
}

impl Normalization {
    pub fn apply(&self, pointer: Vec2) -> Option<Vec2> {
        match *self {
            Normalization::Container(rect) => normalize_in_rect(pointer, rect),
            Normalization::FixedRadius { center, radius } => {
                normalize_from_center(pointer, center, radius)
            }
        }
    }
}

/// Container-relative normalization.
pub fn normalize_in_rect(pointer: Vec2, rect: Rect) -> Option<Vec2> {
    normalize_offset(pointer - rect.center(), rect.half_extent())
}

/// Fixed-radius normalization around `center`.
pub fn normalize_from_center(pointer: Vec2, center: Vec2, radius: f32) -> Option<Vec2> {
    normalize_offset(pointer - center, Vec2::splat(radius))
}

fn normalize_offset(delta: Vec2, divisor: Vec2) -> Option<Vec2> {
    if !(divisor.x > 0.0 && divisor.y > 0.0) || !divisor.is_finite() || !delta.is_finite() {
        return None;
    }
    Some((delta / divisor).clamp(Vec2::NEG_ONE, Vec2::ONE))
}

/// Ephemeral pointer tracking owned by the session.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PointerState {
    pub normalized: Vec2,
    pub cell: GridCoord,
    pub last_update: Option<Instant>,
}

impl PointerState {
    /// Resting state: pointer at the origin, cell at the grid center.
    pub fn centered(cell: GridCoord) -> Self {
        Self {
            normalized: Vec2::ZERO,
            cell,
            last_update: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn container_edges_map_to_unit_square() {
        let rect = Rect::new(100.0, 50.0, 400.0, 200.0);
        assert_eq!(
            normalize_in_rect(Vec2::new(100.0, 50.0), rect),
            Some(Vec2::new(-1.0, -1.0))
        );
        assert_eq!(
            normalize_in_rect(Vec2::new(300.0, 150.0), rect),
            Some(Vec2::ZERO)
        );
        assert_eq!(
            normalize_in_rect(Vec2::new(400.0, 100.0), rect),
            Some(Vec2::new(0.5, -0.5))
        );
    }

    #[test]
    fn zero_sized_rect_is_skipped() {
        let rect = Rect::new(10.0, 10.0, 0.0, 30.0);
        assert_eq!(normalize_in_rect(Vec2::new(12.0, 12.0), rect), None);
        assert_eq!(normalize_from_center(Vec2::ONE, Vec2::ZERO, 0.0), None);
    }

    #[test]
    fn non_finite_pointer_is_skipped() {
        let rect = Rect::new(0.0, 0.0, 10.0, 10.0);
        assert_eq!(normalize_in_rect(Vec2::new(f32::NAN, 1.0), rect), None);
    }
}
