/// DOM wiring and presentation constants for the web frontend.
///
/// Engine tuning (bounds, fps, radius) lives in `gaze_core::constants`; this
/// module only names the page elements and the events the page exchanges
/// with outside scripts.
// Page elements
pub const PREVIEW_ID: &str = "preview";
pub const VIDEO_CONTAINER_ID: &str = "video-container";
pub const VIEWER_3D_ID: &str = "viewer-3d";
pub const DEPTH_CONTROL_ID: &str = "depth-control";
pub const HINT_OVERLAY_ID: &str = "hint-overlay";

// CSS classes applied to elements created here
pub const VIDEO_CONTAINER_CLASS: &str = "video-container";
pub const DEPTH_CONTROL_CLASS: &str = "depth-control";

// CSS custom properties that size the preview grid
pub const CSS_X_STEPS: &str = "--x-steps";
pub const CSS_Y_STEPS: &str = "--y-steps";

// Events dispatched on the 3D container for an external scene to consume
pub const TEXTURES_EVENT: &str = "gaze:textures";
pub const DISPLACEMENT_EVENT: &str = "gaze:displacement";

// HTMLMediaElement.HAVE_CURRENT_DATA
pub const HAVE_CURRENT_DATA: u16 = 2;

// Displacement slider granularity
pub const DEPTH_CONTROL_STEP: f32 = 0.1;
