// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Track assembly for Standard MIDI Files.
//!
//! Events are added to a [`Track`] either in playback order, each timed
//! relative to the one before, or pinned to an absolute tick. Building the
//! track merges both into one ordered stream and encodes it as the body of
//! an `MTrk` chunk, with the 4-byte length alongside.
//!
//! ```
//! use trackweave::{NoteEvent, Track};
//!
//! let mut track = Track::new();
//! track.set_tempo(100.0, None)?;
//! track.add_event(NoteEvent::builder().pitches(["C4", "E4", "G4"]).duration("2").build()?)?;
//! track.add_event(NoteEvent::builder().pitch("B3").duration("8").start_tick(64).build()?)?;
//! track.build()?;
//!
//! assert_eq!(track.size(), (track.data().len() as u32).to_be_bytes());
//! # Ok::<(), trackweave::EventError>(())
//! ```

pub mod config;
pub mod events;
pub mod music;
pub mod timing;
pub mod track;

pub use config::EngineConfig;
pub use events::{
    EventError, EventKind, Message, NoteBuilder, NoteEvent, NoteOverrides, TextKind, TrackEvent,
    TrackItem,
};
pub use music::{KeySignature, Pitch};
pub use timing::{Duration, Quantizer};
pub use track::Track;
