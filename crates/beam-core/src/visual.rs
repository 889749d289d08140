use crate::constants::{
    ANCHOR_TRAVEL_PCT, LEFT_ANCHOR_START_PCT, LEFT_SIZE_START_PCT, LEFT_SIZE_TRAVEL_PCT,
    MASK_STOP_START_PCT, MASK_STOP_TRAVEL_PCT, OPACITY_MIN, OPACITY_RANGE, RIGHT_ANCHOR_START_PCT,
};

/// Visual parameters derived from one progress value. Overwritten on every
/// update; never queued.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct VisualState {
    pub progress: f64,
    pub left_anchor_pct: f64,
    pub right_anchor_pct: f64,
    pub left_size_pct: f64,
    pub base_opacity: f64,
    /// `None` selects the fixed 25% → 95% mask band.
    pub mask_stop_pct: Option<f64>,
}

/// Map progress in \[0, 1\] to gradient geometry, opacity and mask stop.
pub fn map_to_visual(progress: f64, mask_by_progress: bool) -> VisualState {
    let p = if progress.is_nan() {
        0.0
    } else {
        progress.clamp(0.0, 1.0)
    };
    VisualState {
        progress: p,
        left_anchor_pct: LEFT_ANCHOR_START_PCT - p * ANCHOR_TRAVEL_PCT,
        right_anchor_pct: RIGHT_ANCHOR_START_PCT + p * ANCHOR_TRAVEL_PCT,
        left_size_pct: LEFT_SIZE_START_PCT - p * LEFT_SIZE_TRAVEL_PCT,
        base_opacity: (OPACITY_MIN + OPACITY_RANGE * p).clamp(OPACITY_MIN, 1.0),
        mask_stop_pct: mask_by_progress.then(|| MASK_STOP_START_PCT + p * MASK_STOP_TRAVEL_PCT),
    }
}
