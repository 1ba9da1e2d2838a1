// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Track assembly.
//!
//! A [`Track`] collects events in two timing models and turns them into a
//! single `MTrk` body:
//! - events without an explicit tick are placed by insertion order, each at
//!   an offset from the previous one
//! - events with an explicit tick are queued and spliced into the ordered
//!   sequence when the track is built
//!
//! Building is a two-phase pipeline. The *stage* phase assigns an absolute
//! tick to every queued event (running the quantizer over note offsets) and
//! splices the explicit queue into place. The *materialize* phase walks the
//! ordered events once and emits `delta ++ payload` for each.

mod helpers;
mod merge;

use tracing::debug;

use crate::config::EngineConfig;
use crate::events::{
    vlq, EventError, EventKind, Message, NoteEvent, NoteOverrides, TrackEvent, TrackItem,
};
use crate::timing::{rounded_if_close, Quantizer};

/// Ticks between two absolute positions, capped at the largest delta time
fn delta_between(previous: u64, tick: u64) -> u32 {
    tick.saturating_sub(previous).min(vlq::MAX as u64) as u32
}

/// Ticks between two absolute positions, if they fit in a delta time
fn checked_delta(previous: u64, tick: u64) -> Result<u32, EventError> {
    let gap = tick.saturating_sub(previous);
    if gap > vlq::MAX as u64 {
        return Err(EventError::DeltaTooLarge(gap));
    }
    Ok(gap as u32)
}

/// A single track of a MIDI file
#[derive(Debug, Clone)]
pub struct Track {
    /// Resolution and note defaults
    config: EngineConfig,
    /// Ordered events
    events: Vec<TrackEvent>,
    /// Items with an explicit tick, waiting to be spliced
    explicit_tick_events: Vec<TrackItem>,
    /// Absolute tick reached by the last build
    tick_pointer: u64,
    /// Encoded track body
    data: Vec<u8>,
    /// Big-endian length of `data`
    size: [u8; 4],
}

impl Track {
    /// Create an empty track with the default configuration
    pub fn new() -> Self {
        Self::with_config(EngineConfig::default())
    }

    /// Create an empty track with the given configuration
    pub fn with_config(config: EngineConfig) -> Self {
        Self {
            config,
            events: Vec::new(),
            explicit_tick_events: Vec::new(),
            tick_pointer: 0,
            data: Vec::new(),
            size: [0; 4],
        }
    }

    /// Configuration
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Ordered events
    pub fn events(&self) -> &[TrackEvent] {
        &self.events
    }

    /// Items waiting to be merged by tick
    pub fn explicit_tick_events(&self) -> &[TrackItem] {
        &self.explicit_tick_events
    }

    /// Absolute tick reached by the last build
    pub fn tick_pointer(&self) -> u64 {
        self.tick_pointer
    }

    /// Encoded track body from the last build
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Length of [`data`](Self::data) as a 4-byte big-endian integer
    pub fn size(&self) -> [u8; 4] {
        self.size
    }

    /// Add a note or event.
    ///
    /// Items carrying an explicit tick are queued for the merge; notes
    /// without one are expanded into their on/off events immediately.
    pub fn add_event(&mut self, item: impl Into<TrackItem>) -> Result<&mut Self, EventError> {
        self.insert(item.into())?;
        Ok(self)
    }

    /// Add several notes or events, in order
    pub fn add_events<I>(&mut self, items: I) -> Result<&mut Self, EventError>
    where
        I: IntoIterator,
        I::Item: Into<TrackItem>,
    {
        for item in items {
            self.insert(item.into())?;
        }
        Ok(self)
    }

    /// Add several items, letting `transform` adjust each note first.
    ///
    /// `transform` receives the item's index and the note, and returns the
    /// fields to replace. The note is rebuilt with those fields; events
    /// pass through untouched.
    pub fn add_events_with<I, F>(&mut self, items: I, mut transform: F) -> Result<&mut Self, EventError>
    where
        I: IntoIterator,
        I::Item: Into<TrackItem>,
        F: FnMut(usize, &NoteEvent) -> NoteOverrides,
    {
        for (index, item) in items.into_iter().enumerate() {
            let item = match item.into() {
                TrackItem::Note(note) => {
                    let overrides = transform(index, &note);
                    TrackItem::Note(note.with_overrides(overrides)?)
                }
                event => event,
            };
            self.insert(item)?;
        }
        Ok(self)
    }

    fn insert(&mut self, item: TrackItem) -> Result<(), EventError> {
        if let TrackItem::Event(event) = &item {
            event.message().validate()?;
        }
        if item.explicit_tick().is_some() {
            self.explicit_tick_events.push(item);
            return Ok(());
        }

        match item {
            TrackItem::Note(note) => {
                let expanded = note.expand_relative(&self.config)?;
                self.events.extend(expanded);
            }
            TrackItem::Event(event) => self.events.push(event),
        }
        Ok(())
    }

    /// Build the encoded track body.
    ///
    /// Assigns absolute ticks, merges explicitly timed events, then encodes
    /// every event. An end-of-track marker is appended to the data unless
    /// the last event already is one. Fails if two consecutive events are
    /// further apart than a delta time can express.
    pub fn build(&mut self) -> Result<&mut Self, EventError> {
        self.assign_times();
        self.splice_pending()?;
        self.materialize()?;
        Ok(self)
    }

    /// Give every event without a tick its absolute position.
    ///
    /// Note offsets go through the quantizer with the residual carried from
    /// note to note; other offsets are whole ticks. Events that already have
    /// a tick keep it.
    fn assign_times(&mut self) {
        let mut quantizer = Quantizer::new(self.config.snap_tolerance);
        let tolerance = self.config.snap_tolerance;
        let mut cursor = 0u64;

        for event in &mut self.events {
            let tick = match event.tick() {
                Some(tick) => tick,
                None => {
                    let offset = match event.kind() {
                        EventKind::Note => quantizer.next(event.wait()) as u64,
                        EventKind::Tempo | EventKind::Generic => {
                            rounded_if_close(event.wait(), tolerance).round() as u64
                        }
                    };
                    cursor + offset
                }
            };
            event.set_tick(tick);
            event.set_delta(delta_between(cursor, tick));
            cursor = cursor.max(tick);
        }

        self.tick_pointer = cursor;
    }

    /// Encode the ordered events into `data` and `size`.
    ///
    /// On error `data` is left empty and `size` zero.
    fn materialize(&mut self) -> Result<(), EventError> {
        self.data.clear();
        self.size = [0; 4];
        self.tick_pointer = 0;

        for event in &mut self.events {
            let tick = event.tick().unwrap_or(self.tick_pointer);
            let delta = match checked_delta(self.tick_pointer, tick) {
                Ok(delta) => delta,
                Err(err) => {
                    self.data.clear();
                    return Err(err);
                }
            };
            event.set_delta(delta);
            self.tick_pointer = self.tick_pointer.max(tick);
            event.write_to(&mut self.data);
        }

        if !self.events.last().is_some_and(TrackEvent::is_end_of_track) {
            TrackEvent::new(Message::EndOfTrack).write_to(&mut self.data);
        }

        self.size = (self.data.len() as u32).to_be_bytes();
        debug!(
            events = self.events.len(),
            bytes = self.data.len(),
            end_tick = self.tick_pointer,
            "materialized track"
        );
        Ok(())
    }

    /// Recompute deltas from ticks, starting at `start`
    fn refresh_deltas_from(&mut self, start: usize) {
        for i in start.max(1)..self.events.len() {
            if let (Some(previous), Some(tick)) = (self.events[i - 1].tick(), self.events[i].tick()) {
                self.events[i].set_delta(delta_between(previous, tick));
            }
        }
        if start == 0 {
            if let Some(first) = self.events.first_mut() {
                if let Some(tick) = first.tick() {
                    first.set_delta(delta_between(0, tick));
                }
            }
        }
    }

    /// Remove every event whose message name matches `name`.
    ///
    /// Returns the number of events removed. Deltas of the remaining timed
    /// events are recomputed so they stay consistent with their ticks.
    pub fn remove_events_by_name(&mut self, name: &str) -> usize {
        let before = self.events.len();
        self.events.retain(|event| event.name() != name);
        let removed = before - self.events.len();

        if removed > 0 {
            self.refresh_deltas_from(0);
            debug!(name, removed, "removed events");
        }
        removed
    }
}

impl Default for Track {
    fn default() -> Self {
        Self::new()
    }
}
