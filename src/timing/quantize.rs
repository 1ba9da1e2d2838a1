// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Tick quantization with residual carry.
//!
//! Note durations such as triplets land between ticks. Each delta time is
//! rounded to a whole tick and the signed rounding error is folded into the
//! next rounding decision, so the cumulative error of a sequence stays below
//! one tick no matter how long it runs.

use tracing::trace;

/// Distance from a whole tick under which a value is treated as that tick
pub const SNAP_TOLERANCE: f64 = 1e-6;

/// Snap a value to the nearest integer if it is within `tolerance` of it
pub fn rounded_if_close(value: f64, tolerance: f64) -> f64 {
    let rounded = value.round();
    if (rounded - value).abs() < tolerance {
        rounded
    } else {
        value
    }
}

/// Quantize an ideal offset given the residual carried from the previous call.
///
/// Returns the whole-tick offset and the residual to pass to the next call.
/// The residual is the part of the ideal timeline not yet emitted, so it is
/// always within half a tick of zero for non-negative input.
pub fn quantize(ideal: f64, residual: f64, tolerance: f64) -> (u32, f64) {
    let target = rounded_if_close(ideal + residual, tolerance);
    let rounded = target.round().clamp(0.0, u32::MAX as f64);
    (rounded as u32, target - rounded)
}

/// Stateful quantizer for one walk over a track
#[derive(Debug, Clone, Copy)]
pub struct Quantizer {
    residual: f64,
    tolerance: f64,
}

impl Quantizer {
    /// Create a quantizer with no carried residual
    pub fn new(tolerance: f64) -> Self {
        Self {
            residual: 0.0,
            tolerance,
        }
    }

    /// Quantize the next ideal offset
    pub fn next(&mut self, ideal: f64) -> u32 {
        let (ticks, residual) = quantize(ideal, self.residual, self.tolerance);
        if residual != 0.0 {
            trace!(ideal, ticks, residual, "carrying quantization residual");
        }
        self.residual = residual;
        ticks
    }

    /// Current carried residual
    pub fn residual(&self) -> f64 {
        self.residual
    }

    /// Drop the carried residual
    pub fn reset(&mut self) {
        self.residual = 0.0;
    }
}

impl Default for Quantizer {
    fn default() -> Self {
        Self::new(SNAP_TOLERANCE)
    }
}
