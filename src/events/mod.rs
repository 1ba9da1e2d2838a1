// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Track events.
//!
//! This module provides:
//! - Event messages and their byte encodings
//! - Timed track events (absolute tick, delta, payload)
//! - Paired note entities that expand into note-on/note-off events
//! - Variable-length quantity encoding

pub mod message;
pub mod note;
pub mod vlq;

pub use message::{channel_nibble, scale_velocity, Message, TextKind};
pub use note::{NoteBuilder, NoteEvent, NoteOverrides};

use thiserror::Error;

/// Errors raised while constructing events
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EventError {
    #[error("invalid duration '{0}'")]
    InvalidDuration(String),

    #[error("invalid pitch '{0}'")]
    InvalidPitch(String),

    #[error("note has no pitches")]
    MissingPitch,

    #[error("invalid key signature '{0}'")]
    InvalidKey(String),

    #[error("velocity {0} is outside 1-100")]
    VelocityOutOfRange(u8),

    #[error("channel {0} is outside 1-16")]
    ChannelOutOfRange(u8),

    #[error("{name} {value} is outside 0-127")]
    DataByteOutOfRange { name: &'static str, value: u8 },

    #[error("tempo {0} bpm cannot be encoded")]
    InvalidTempo(f64),

    #[error("invalid time signature {numerator}/{denominator}")]
    InvalidTimeSignature { numerator: u8, denominator: u8 },

    #[error("pitch bend {0} is outside -1.0 to 1.0")]
    PitchBendOutOfRange(f64),

    #[error("pitch bend value {0} is outside 0-16383")]
    PitchBendValueOutOfRange(u16),

    #[error("gap of {0} ticks does not fit in a delta time")]
    DeltaTooLarge(u64),
}

/// How an event takes part in timing and ordering
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventKind {
    /// Note on or off; offsets go through the quantizer
    Note,
    /// Tempo change; sorts first among events at the same tick
    Tempo,
    /// Everything else
    Generic,
}

/// An event placed on a track
#[derive(Debug, Clone, PartialEq)]
pub struct TrackEvent {
    message: Message,
    /// Absolute tick, once known
    tick: Option<u64>,
    /// Ticks since the previous event
    delta: u32,
    /// Ideal offset from the previous event while `tick` is unknown
    wait: f64,
    /// Encoded message without delta
    payload: Vec<u8>,
}

impl TrackEvent {
    /// Create an event positioned by insertion order
    pub fn new(message: Message) -> Self {
        let payload = message.render();
        Self {
            message,
            tick: None,
            delta: 0,
            wait: 0.0,
            payload,
        }
    }

    /// Pin the event to an absolute tick
    pub fn at_tick(mut self, tick: u64) -> Self {
        self.tick = Some(tick);
        self
    }

    /// Set the ideal offset from the previous event, in ticks
    pub fn with_wait(mut self, wait: f64) -> Self {
        self.wait = wait.max(0.0);
        self
    }

    /// The message
    pub fn message(&self) -> &Message {
        &self.message
    }

    /// Timing class
    pub fn kind(&self) -> EventKind {
        self.message.kind()
    }

    /// Name of the message type
    pub fn name(&self) -> &'static str {
        self.message.name()
    }

    /// Absolute tick, if assigned
    pub fn tick(&self) -> Option<u64> {
        self.tick
    }

    /// Ticks since the previous event
    pub fn delta(&self) -> u32 {
        self.delta
    }

    /// Ideal offset from the previous event
    pub fn wait(&self) -> f64 {
        self.wait
    }

    /// Encoded message bytes
    pub fn payload(&self) -> &[u8] {
        &self.payload
    }

    /// Whether this is an end-of-track marker
    pub fn is_end_of_track(&self) -> bool {
        matches!(self.message, Message::EndOfTrack)
    }

    pub(crate) fn set_tick(&mut self, tick: u64) {
        self.tick = Some(tick);
    }

    pub(crate) fn set_delta(&mut self, delta: u32) {
        self.delta = delta;
    }

    /// Append `delta ++ payload` to `out`
    pub fn write_to(&self, out: &mut Vec<u8>) {
        vlq::write(out, self.delta);
        out.extend_from_slice(&self.payload);
    }
}

impl From<Message> for TrackEvent {
    fn from(message: Message) -> Self {
        TrackEvent::new(message)
    }
}

/// Anything that can be added to a track
#[derive(Debug, Clone, PartialEq)]
pub enum TrackItem {
    /// A paired note, expanded on insertion or merge
    Note(NoteEvent),
    /// A single event
    Event(TrackEvent),
}

impl TrackItem {
    /// Explicit absolute tick, if the item carries one
    pub fn explicit_tick(&self) -> Option<u64> {
        match self {
            TrackItem::Note(note) => note.start_tick(),
            TrackItem::Event(event) => event.tick(),
        }
    }
}

impl From<NoteEvent> for TrackItem {
    fn from(note: NoteEvent) -> Self {
        TrackItem::Note(note)
    }
}

impl From<TrackEvent> for TrackItem {
    fn from(event: TrackEvent) -> Self {
        TrackItem::Event(event)
    }
}

impl From<Message> for TrackItem {
    fn from(message: Message) -> Self {
        TrackItem::Event(TrackEvent::new(message))
    }
}
