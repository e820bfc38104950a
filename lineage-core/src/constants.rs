/// Layout and rendering constants, in layout units (CSS pixels at zoom 1).
/// Fixed width of every node block.
pub const NODE_WIDTH: f64 = 280.0;
/// Vertical distance between text lines inside a node.
pub const NODE_LINE_SPACING: f64 = 18.0;
/// Extra height added around the text stack.
pub const NODE_PADDING: f64 = 30.0;
/// Horizontal node size hint; separations are multiples of this.
pub const NODE_SIZE_X: f64 = 80.0;
/// Vertical distance between generations.
pub const NODE_SIZE_Y: f64 = 240.0;
pub const SEPARATION_SIBLINGS: f64 = 4.0;
pub const SEPARATION_NON_SIBLINGS: f64 = 5.0;
/// Initial vertical offset of the root in a fresh view.
pub const INITIAL_TRANSLATE_Y: f64 = 100.0;

pub const ZOOM_STEP: f64 = 0.2;
pub const ZOOM_MIN: f64 = 0.2;
pub const ZOOM_MAX: f64 = 3.0;
/// Zoom factor per pixel of wheel delta; one notch (100) is about 20%.
pub const WHEEL_ZOOM_RATE: f64 = 0.0018;

/// Delay before auto-fit reads bounds after the filtered data changes (ms).
pub const AUTO_FIT_SETTLE_MS: u32 = 300;
/// Readiness polling defaults.
pub const READINESS_MAX_ATTEMPTS: u32 = 20;
pub const READINESS_INTERVAL_MS: u32 = 150;

pub const LINK_STROKE: &str = "#555";
