// Shared grid and interaction tuning constants used by both web and native frontends.

// Pose bounds (degrees for rotation, model units for pupils)
pub const ROTATE_BOUND: f64 = 20.0; // 20 = look left/down, -20 = look right/up
pub const PUPIL_BOUND: f64 = 15.0;

// Pose values are rounded to 1/POSE_PRECISION before they enter a filename
pub const POSE_PRECISION: f64 = 10.0;

// Default grid selection
pub const DEFAULT_X_STEPS: u32 = 10;
pub const DEFAULT_Y_STEPS: u32 = 10;
pub const DEFAULT_PREFIX: &str = "wes-avatar";
pub const MAX_GRID_CELLS: u32 = 10_000; // keeps y * width + x inside u32 and the preload bounded

// Playback / throttle cadence shared by every renderer
pub const FPS: f64 = 60.0;

// Fixed-radius normalization distance (CSS px) for per-element gaze
pub const FIXED_RADIUS: f32 = 500.0;

// Asset layout
pub const DEFAULT_ASSET_ROOT: &str = "./outputs";
pub const ASSET_EXTENSION: &str = "webp";
pub const DEPTH_DIR: &str = "depth";
pub const DEPTH_SUFFIX: &str = ".depth.png";
pub const VIDEO_EXTENSION: &str = "mp4";

// Background preload batch size
pub const PRELOAD_BATCH_SIZE: usize = 10;

// Mesh displacement
pub const DEFAULT_DISPLACEMENT_SCALE: f32 = 0.5;
pub const MAX_DISPLACEMENT_SCALE: f32 = 5.0;

// Generation job defaults consumed by the external image model
pub const CROP_FACTOR: f64 = 1.5; // lowest the model accepts
pub const OUTPUT_QUALITY: u32 = 100;
pub const COST_PER_IMAGE_USD: f64 = 0.00098;
