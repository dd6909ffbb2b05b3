//! Session context: the single owner of the active grid and its state.
//!
//! Loading a photo swaps the grid, bumps the [`Generation`], clears both asset
//! caches and recenters the pointer. A failed load leaves the previous grid in
//! place. Pointer events pass one shared [`FrameRateGate`] and are then
//! dispatched to every renderer with the same [`Frame`].

use crate::assets::{preload_plan, AssetCache, AssetLayout, Generation, PreloadRequest};
use crate::config::{GazeConfig, GridSpec};
use crate::error::GridError;
use crate::gate::FrameRateGate;
use crate::grid::Grid;
use crate::mapper::map_grid;
use crate::pointer::{normalize_in_rect, PointerState, Rect};
use crate::renderer::{Frame, FrameOutcome, Renderer};
use glam::Vec2;
use instant::Instant;

pub struct GazeSession<H> {
    config: GazeConfig,
    grid: Grid,
    layout: AssetLayout,
    generation: Generation,
    images: AssetCache<H>,
    depths: AssetCache<H>,
    pointer: PointerState,
    reference: Option<Rect>,
    gate: FrameRateGate,
}

impl<H> GazeSession<H> {
    pub fn new(config: GazeConfig) -> Result<Self, GridError> {
        config.validate()?;
        let grid = Grid::new(config.grid.clone(), config.bounds)?;
        let generation = Generation(1);
        log::info!(
            "[session] loaded {:?} {}x{} (gen {})",
            grid.prefix(),
            grid.width(),
            grid.height(),
            generation.0
        );
        Ok(Self {
            layout: AssetLayout::new(&config.asset_root, grid.prefix()),
            pointer: PointerState::centered(grid.center()),
            gate: FrameRateGate::new(config.fps),
            images: AssetCache::new(generation),
            depths: AssetCache::new(generation),
            reference: None,
            generation,
            grid,
            config,
        })
    }

    /// Switch to a new configuration. Reloading an identical one is a no-op.
    pub fn load(&mut self, config: GazeConfig) -> Result<Generation, GridError> {
        if config == self.config {
            return Ok(self.generation);
        }
        config.validate()?;
        let grid = Grid::new(config.grid.clone(), config.bounds)?;
        self.generation = self.generation.next();
        self.images.reset(self.generation);
        self.depths.reset(self.generation);
        self.layout = AssetLayout::new(&config.asset_root, grid.prefix());
        self.pointer = PointerState::centered(grid.center());
        self.gate = FrameRateGate::new(config.fps);
        log::info!(
            "[session] loaded {:?} {}x{} (gen {})",
            grid.prefix(),
            grid.width(),
            grid.height(),
            self.generation.0
        );
        self.grid = grid;
        self.config = config;
        Ok(self.generation)
    }

    /// Switch photo while keeping bounds, fps and asset root.
    pub fn load_grid(&mut self, spec: GridSpec) -> Result<Generation, GridError> {
        let config = GazeConfig {
            grid: spec,
            ..self.config.clone()
        };
        self.load(config)
    }

    #[inline]
    pub fn config(&self) -> &GazeConfig {
        &self.config
    }

    #[inline]
    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    #[inline]
    pub fn layout(&self) -> &AssetLayout {
        &self.layout
    }

    #[inline]
    pub fn generation(&self) -> Generation {
        self.generation
    }

    #[inline]
    pub fn pointer(&self) -> &PointerState {
        &self.pointer
    }

    #[inline]
    pub fn images(&self) -> &AssetCache<H> {
        &self.images
    }

    #[inline]
    pub fn depths(&self) -> &AssetCache<H> {
        &self.depths
    }

    /// Container the tracked [`PointerState`] is normalized against.
    pub fn set_reference(&mut self, rect: Option<Rect>) {
        self.reference = rect;
    }

    pub fn preload_plan(&self) -> Vec<Vec<PreloadRequest>> {
        preload_plan(&self.grid, &self.layout, self.generation)
    }

    pub fn insert_image(&mut self, generation: Generation, filename: &str, handle: H) -> bool {
        self.images.insert(generation, filename, handle)
    }

    pub fn insert_depth(&mut self, generation: Generation, filename: &str, handle: H) -> bool {
        self.depths.insert(generation, filename, handle)
    }

    /// Feed one pointer-move event. Returns `None` when the gate drops it,
    /// otherwise one outcome per renderer in order.
    pub fn pointer_moved(
        &mut self,
        at: Instant,
        position: Vec2,
        renderers: &mut [Box<dyn Renderer<H>>],
    ) -> Option<Vec<FrameOutcome>> {
        if !self.gate.admit(at) {
            return None;
        }
        self.pointer.last_update = Some(at);
        if let Some(n) = self.reference.and_then(|r| normalize_in_rect(position, r)) {
            self.pointer.normalized = n;
            self.pointer.cell = map_grid(n, self.grid.width(), self.grid.height());
        }
        log::trace!(
            "[pointer] ({:.1},{:.1}) -> cell ({},{})",
            position.x,
            position.y,
            self.pointer.cell.x,
            self.pointer.cell.y
        );
        Some(self.dispatch(Some(position), renderers))
    }

    /// Render the current resting cell without a pointer, bypassing the gate.
    /// Used once assets finish loading so the first frame is not blank.
    pub fn present(&self, renderers: &mut [Box<dyn Renderer<H>>]) -> Vec<FrameOutcome> {
        self.dispatch(None, renderers)
    }

    fn dispatch(
        &self,
        pointer: Option<Vec2>,
        renderers: &mut [Box<dyn Renderer<H>>],
    ) -> Vec<FrameOutcome> {
        let frame = Frame {
            pointer,
            resting: self.pointer.cell,
            generation: self.generation,
            grid: &self.grid,
            layout: &self.layout,
            images: &self.images,
            depths: &self.depths,
            fps: self.config.fps,
            fixed_radius: self.config.fixed_radius,
        };
        renderers
            .iter_mut()
            .map(|r| {
                let outcome = r.apply_frame(&frame);
                if outcome == FrameOutcome::Pending {
                    log::trace!("[{}] asset pending, keeping previous frame", r.name());
                }
                outcome
            })
            .collect()
    }
}
