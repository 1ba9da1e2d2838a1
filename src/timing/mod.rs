// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Timing module.
//!
//! This module provides note duration parsing and the tick quantizer
//! used when assigning absolute times to track events.

pub mod duration;
pub mod quantize;

pub use duration::Duration;
pub use quantize::{quantize, rounded_if_close, Quantizer, SNAP_TOLERANCE};
