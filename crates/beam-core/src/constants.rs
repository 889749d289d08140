//! Beam geometry and timing constants shared by the engine and the web host.

// Opacity band driven by scroll progress
pub const OPACITY_MIN: f64 = 0.839322;
pub const OPACITY_RANGE: f64 = 0.160678; // 1 - OPACITY_MIN

// Conic gradient anchors (percent of element width)
pub const LEFT_ANCHOR_START_PCT: f64 = 90.0;
pub const RIGHT_ANCHOR_START_PCT: f64 = 10.0;
pub const ANCHOR_TRAVEL_PCT: f64 = 90.0;
pub const LEFT_SIZE_START_PCT: f64 = 150.0;
pub const LEFT_SIZE_TRAVEL_PCT: f64 = 50.0;

// Vertical mask
pub const MASK_STOP_START_PCT: f64 = 50.0;
pub const MASK_STOP_TRAVEL_PCT: f64 = 45.0;
pub const FIXED_MASK_OPAQUE_PCT: f64 = 25.0;
pub const FIXED_MASK_TRANSPARENT_PCT: f64 = 95.0;

// Update scheduling
pub const PROGRESS_EPSILON: f64 = 0.001; // writes closer than this are suppressed
pub const LAYOUT_SETTLE_DELAY_MS: u64 = 100; // one-shot geometry refresh after bind

// Dust particles
pub const DUST_BASE_DURATION_SEC: f64 = 3.0;
pub const DUST_DURATION_SPREAD_SEC: f64 = 4.0; // 3-7s before dividing by speed
pub const DUST_RISE_MIN_PX: f64 = 20.0;
pub const DUST_RISE_SPREAD_PX: f64 = 30.0; // 20-50px upward
pub const DUST_DRIFT_MAX_PX: f64 = 10.0; // +/- horizontal
pub const DUST_FADE_FACTOR: f64 = 0.5; // opacity at the top of the float

// Mist layers
pub const MIST_OPACITY_FACTOR: f64 = 0.6;
pub const MIST_BASE_DURATION_SEC: f64 = 8.0;
pub const MIST_DURATION_STEP_SEC: f64 = 3.0; // per layer index
pub const MIST_DELAY_STEP_SEC: f64 = 1.5;
pub const MIST_SCALE_STEP: f64 = 0.2;
pub const MIST_FADE_OUT_FRACTION: f64 = 0.2; // of the drift duration
pub const MIST_TRAVEL_PCT: f64 = 100.0; // drifts from -100% to +100%

// Pulse
pub const PULSE_MAX_MULTIPLIER: f64 = 2.0;
