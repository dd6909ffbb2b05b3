//! Renderer dispatch.
//!
//! Each renderer turns a [`Frame`] into one platform side effect: swapping
//! image sources, seeking a video or swapping mesh textures. The platform part
//! sits behind a small surface trait so the same logic drives the DOM and the
//! host-side tests.

use crate::assets::{resolve_pair, AssetCache, AssetLayout, Generation, Resolved};
use crate::constants::{DEFAULT_DISPLACEMENT_SCALE, MAX_DISPLACEMENT_SCALE};
use crate::grid::{Grid, Sample};
use crate::mapper::{map_grid, GridCoord};
use crate::pointer::{Normalization, Rect};
use glam::Vec2;
use std::cell::RefCell;
use std::rc::Rc;

/// Everything a renderer may read for one accepted pointer event.
pub struct Frame<'a, H> {
    /// Client-space pointer position; `None` when presenting the resting cell.
    pub pointer: Option<Vec2>,
    pub resting: GridCoord,
    pub generation: Generation,
    pub grid: &'a Grid,
    pub layout: &'a AssetLayout,
    pub images: &'a AssetCache<H>,
    pub depths: &'a AssetCache<H>,
    pub fps: f64,
    pub fixed_radius: f32,
}

/// A pointer resolved to a grid cell.
#[derive(Clone, Copy, Debug)]
pub struct Located<'a> {
    pub normalized: Vec2,
    pub sample: &'a Sample,
}

impl<'a, H> Frame<'a, H> {
    /// Normalize the pointer against `reference` and pick the matching sample.
    ///
    /// Without a pointer this yields the resting cell. `None` means the
    /// reference has no usable extent and the renderer should skip this frame.
    pub fn locate(&self, reference: Normalization) -> Option<Located<'a>> {
        let (normalized, cell) = match self.pointer {
            Some(p) => {
                let n = reference.apply(p)?;
                (n, map_grid(n, self.grid.width(), self.grid.height()))
            }
            None => (Vec2::ZERO, self.resting),
        };
        self.grid
            .at(cell)
            .map(|sample| Located { normalized, sample })
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FrameOutcome {
    /// The visible frame changed.
    Applied,
    /// Already showing the requested cell.
    Unchanged,
    /// Asset not loaded yet; the previous frame stays up.
    Pending,
    /// Reference geometry unusable (e.g. hidden element).
    Skipped,
}

pub trait Renderer<H> {
    fn name(&self) -> &'static str;
    fn apply_frame(&mut self, frame: &Frame<'_, H>) -> FrameOutcome;
}

// Lets the platform keep a handle to a renderer (e.g. for UI controls)
// while the session dispatches to it.
impl<H, R: Renderer<H>> Renderer<H> for Rc<RefCell<R>> {
    fn name(&self) -> &'static str {
        self.borrow().name()
    }

    fn apply_frame(&mut self, frame: &Frame<'_, H>) -> FrameOutcome {
        self.borrow_mut().apply_frame(frame)
    }
}

// ---------------- Image grid ----------------

/// A set of image elements, each gazing at the pointer from its own center.
pub trait ImageSurface {
    fn element_count(&self) -> usize;
    /// Client-space center of element `i`, or `None` if it has no layout box.
    fn element_center(&self, i: usize) -> Option<Vec2>;
    fn set_source(&mut self, i: usize, url: &str);
}

pub struct ImageGridRenderer<S> {
    surface: S,
    shown: Vec<Option<GridCoord>>,
    generation: Option<Generation>,
}

impl<S: ImageSurface> ImageGridRenderer<S> {
    pub fn new(surface: S) -> Self {
        Self {
            surface,
            shown: Vec::new(),
            generation: None,
        }
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }
}

impl<H, S: ImageSurface> Renderer<H> for ImageGridRenderer<S> {
    fn name(&self) -> &'static str {
        "image-grid"
    }

    fn apply_frame(&mut self, frame: &Frame<'_, H>) -> FrameOutcome {
        let count = self.surface.element_count();
        if self.generation != Some(frame.generation) || self.shown.len() != count {
            self.shown = vec![None; count];
            self.generation = Some(frame.generation);
        }
        // without a pointer each element keeps its own preview pose
        if frame.pointer.is_none() {
            return FrameOutcome::Unchanged;
        }

        let (mut applied, mut pending, mut skipped) = (0usize, 0usize, 0usize);
        for i in 0..count {
            let Some(center) = self.surface.element_center(i) else {
                skipped += 1;
                continue;
            };
            let reference = Normalization::FixedRadius {
                center,
                radius: frame.fixed_radius,
            };
            let Some(hit) = frame.locate(reference) else {
                skipped += 1;
                continue;
            };
            let cell = hit.sample.coord();
            if self.shown[i] == Some(cell) {
                continue;
            }
            match frame.images.resolve(hit.sample) {
                Resolved::Ready(_) => {
                    self.surface
                        .set_source(i, &frame.layout.image(&hit.sample.filename));
                    self.shown[i] = Some(cell);
                    applied += 1;
                }
                Resolved::Pending => pending += 1,
            }
        }

        if applied > 0 {
            FrameOutcome::Applied
        } else if pending > 0 {
            FrameOutcome::Pending
        } else if count > 0 && skipped == count {
            FrameOutcome::Skipped
        } else {
            FrameOutcome::Unchanged
        }
    }
}

// ---------------- Video ----------------

/// A video of the whole grid, one sample per frame in row-major order.
pub trait VideoSurface {
    fn container(&self) -> Rect;
    /// True once the element can show the frame at its current position.
    fn has_current_data(&self) -> bool;
    fn seek(&mut self, seconds: f64);
}

pub struct VideoRenderer<S> {
    surface: S,
    last_seek: Option<(Generation, GridCoord)>,
}

impl<S: VideoSurface> VideoRenderer<S> {
    pub fn new(surface: S) -> Self {
        Self {
            surface,
            last_seek: None,
        }
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }
}

impl<H, S: VideoSurface> Renderer<H> for VideoRenderer<S> {
    fn name(&self) -> &'static str {
        "video"
    }

    fn apply_frame(&mut self, frame: &Frame<'_, H>) -> FrameOutcome {
        let Some(hit) = frame.locate(Normalization::Container(self.surface.container())) else {
            return FrameOutcome::Skipped;
        };
        let cell = hit.sample.coord();
        if self.last_seek == Some((frame.generation, cell)) {
            return FrameOutcome::Unchanged;
        }
        if !self.surface.has_current_data() {
            return FrameOutcome::Pending;
        }
        let seconds = cell.frame_time(frame.grid.width(), frame.fps);
        self.surface.seek(seconds);
        self.last_seek = Some((frame.generation, cell));
        FrameOutcome::Applied
    }
}

// ---------------- Displacement mesh ----------------

pub trait DisplacementTarget {
    fn set_displacement_scale(&mut self, scale: f32);
}

/// A displaced plane whose material takes a color map and a depth map.
pub trait MeshSurface<H>: DisplacementTarget {
    fn container(&self) -> Rect;
    fn set_textures(&mut self, color: &H, depth: Option<&H>);
}

pub struct MeshRenderer<S> {
    surface: S,
    current: Option<(Generation, GridCoord)>,
    displacement_scale: f32,
}

impl<S> MeshRenderer<S> {
    pub fn new(surface: S) -> Self {
        Self {
            surface,
            current: None,
            displacement_scale: DEFAULT_DISPLACEMENT_SCALE,
        }
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    #[inline]
    pub fn displacement_scale(&self) -> f32 {
        self.displacement_scale
    }

    /// Clamp into `[0, MAX_DISPLACEMENT_SCALE]` and push to the material.
    pub fn set_displacement_scale(&mut self, scale: f32) -> f32
    where
        S: DisplacementTarget,
    {
        let scale = if scale.is_finite() {
            scale.clamp(0.0, MAX_DISPLACEMENT_SCALE)
        } else {
            DEFAULT_DISPLACEMENT_SCALE
        };
        self.displacement_scale = scale;
        self.surface.set_displacement_scale(scale);
        scale
    }
}

impl<H, S: MeshSurface<H>> Renderer<H> for MeshRenderer<S> {
    fn name(&self) -> &'static str {
        "mesh"
    }

    fn apply_frame(&mut self, frame: &Frame<'_, H>) -> FrameOutcome {
        let Some(hit) = frame.locate(Normalization::Container(self.surface.container())) else {
            return FrameOutcome::Skipped;
        };
        let key = (frame.generation, hit.sample.coord());
        if self.current == Some(key) {
            return FrameOutcome::Unchanged;
        }
        // commit the cell only once color is in, so a later event retries it
        match resolve_pair(hit.sample, frame.images, frame.depths) {
            Resolved::Ready(pair) => {
                self.surface.set_textures(pair.color, pair.depth);
                self.current = Some(key);
                FrameOutcome::Applied
            }
            Resolved::Pending => FrameOutcome::Pending,
        }
    }
}
