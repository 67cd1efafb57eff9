use crate::shared::constants::{
    DEFAULT_MIN_NEIGHBORS, DEFAULT_SCALE_FACTOR, MAX_NEIGHBORS, MAX_SCALE_FACTOR, MIN_NEIGHBORS,
    MIN_SCALE_FACTOR, SCALE_FACTOR_STEP,
};

/// Detector sensitivity.
///
/// `scale_factor` is the multiplicative step between scanned pyramid scales;
/// `min_neighbors` is how much overlapping raw evidence a face needs.
/// Both are kept inside their slider bounds by [`DetectionParams::new`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DetectionParams {
    scale_factor: f64,
    min_neighbors: u32,
}

impl DetectionParams {
    /// Clamps both values into range and snaps `scale_factor` to the 0.05 grid.
    pub fn new(scale_factor: f64, min_neighbors: u32) -> Self {
        Self {
            scale_factor: snap_scale_factor(scale_factor),
            min_neighbors: min_neighbors.clamp(MIN_NEIGHBORS, MAX_NEIGHBORS),
        }
    }

    pub fn scale_factor(&self) -> f64 {
        self.scale_factor
    }

    pub fn min_neighbors(&self) -> u32 {
        self.min_neighbors
    }
}

impl Default for DetectionParams {
    fn default() -> Self {
        Self::new(DEFAULT_SCALE_FACTOR, DEFAULT_MIN_NEIGHBORS)
    }
}

fn snap_scale_factor(value: f64) -> f64 {
    if !value.is_finite() {
        return DEFAULT_SCALE_FACTOR;
    }
    let clamped = value.clamp(MIN_SCALE_FACTOR, MAX_SCALE_FACTOR);
    let steps = ((clamped - MIN_SCALE_FACTOR) / SCALE_FACTOR_STEP).round();
    // Round to 2 decimals so 1.05 + 1 * 0.05 reads back as exactly 1.1
    let snapped = ((MIN_SCALE_FACTOR + steps * SCALE_FACTOR_STEP) * 100.0).round() / 100.0;
    snapped.clamp(MIN_SCALE_FACTOR, MAX_SCALE_FACTOR)
}
