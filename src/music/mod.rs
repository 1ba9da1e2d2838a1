// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Music theory utilities.
//!
//! This module provides pitch-name parsing and key signature lookup
//! for building note and meta events.

pub mod pitch;

pub use pitch::{KeySignature, MidiNote, Note, Pitch};
