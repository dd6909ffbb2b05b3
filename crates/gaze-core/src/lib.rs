//! Gaze grid engine: pose-grid generation, pointer mapping, throttling and
//! asset resolution shared by the web and native frontends.

pub mod asset_name;
pub mod assets;
pub mod config;
pub mod constants;
pub mod error;
pub mod gate;
pub mod grid;
pub mod mapper;
pub mod pointer;
pub mod renderer;
pub mod session;

pub use asset_name::{AssetName, PoseValue, ASSET_NAME_VERSION};
pub use assets::{
    preload_plan, resolve_pair, AssetCache, AssetLayout, Generation, PreloadRequest, Resolved,
    TexturePair,
};
pub use config::{Bounds, GazeConfig, GridSpec};
pub use constants::*;
pub use error::{AssetNameError, GridError};
pub use gate::{should_update, FrameRateGate};
pub use grid::{generate, Grid, Pose, Sample};
pub use mapper::{map_grid, to_index, GridCoord};
pub use pointer::{normalize_from_center, normalize_in_rect, Normalization, PointerState, Rect};
pub use renderer::{
    DisplacementTarget, Frame, FrameOutcome, ImageGridRenderer, ImageSurface, Located,
    MeshRenderer, MeshSurface, Renderer, VideoRenderer, VideoSurface,
};
pub use session::GazeSession;
