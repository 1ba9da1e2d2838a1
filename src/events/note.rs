// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Paired note entity.
//!
//! A [`NoteEvent`] is what a caller thinks of as "a note": one or more
//! pitches held for a duration. It is expanded into note-on and note-off
//! [`TrackEvent`]s when it is added to a track (relative timing) or when
//! the track merges its explicitly timed events (absolute timing).

use super::{channel_nibble, scale_velocity, EventError, Message, TrackEvent};
use crate::config::EngineConfig;
use crate::music::Pitch;
use crate::timing::{rounded_if_close, Duration};

/// A note or chord, expanded into on/off events when placed on a track
#[derive(Debug, Clone, PartialEq)]
pub struct NoteEvent {
    pitches: Vec<Pitch>,
    duration: Duration,
    wait: Duration,
    velocity: Option<u8>,
    channel: Option<u8>,
    sequential: bool,
    repeat: u32,
    start_tick: Option<u64>,
}

impl NoteEvent {
    /// Start building a note
    pub fn builder() -> NoteBuilder {
        NoteBuilder::default()
    }

    /// Pitches sounded by this note
    pub fn pitches(&self) -> &[Pitch] {
        &self.pitches
    }

    /// How long each pitch is held
    pub fn duration(&self) -> &Duration {
        &self.duration
    }

    /// Rest before the note starts, for relatively timed notes
    pub fn wait(&self) -> &Duration {
        &self.wait
    }

    /// Velocity on the 1-100 scale, if set
    pub fn velocity(&self) -> Option<u8> {
        self.velocity
    }

    /// Channel 1-16, if set
    pub fn channel(&self) -> Option<u8> {
        self.channel
    }

    /// Whether pitches are played one after another
    pub fn is_sequential(&self) -> bool {
        self.sequential
    }

    /// Number of times the note is played
    pub fn repeat(&self) -> u32 {
        self.repeat
    }

    /// Explicit absolute start tick
    pub fn start_tick(&self) -> Option<u64> {
        self.start_tick
    }

    /// Number of track events this note expands into
    pub fn event_count(&self) -> usize {
        self.pitches.len() * 2 * self.repeat as usize
    }

    /// Return a copy of this note with the given fields replaced
    pub fn with_overrides(&self, overrides: NoteOverrides) -> Result<Self, EventError> {
        let note = NoteEvent {
            pitches: overrides.pitches.unwrap_or_else(|| self.pitches.clone()),
            duration: overrides.duration.unwrap_or_else(|| self.duration.clone()),
            wait: overrides.wait.unwrap_or_else(|| self.wait.clone()),
            velocity: overrides.velocity.or(self.velocity),
            channel: overrides.channel.or(self.channel),
            sequential: overrides.sequential.unwrap_or(self.sequential),
            repeat: overrides.repeat.unwrap_or(self.repeat).max(1),
            start_tick: overrides.start_tick.or(self.start_tick),
        };
        note.validate()?;
        Ok(note)
    }

    fn validate(&self) -> Result<(), EventError> {
        if self.pitches.is_empty() {
            return Err(EventError::MissingPitch);
        }
        if let Some(velocity) = self.velocity {
            scale_velocity(velocity)?;
        }
        if let Some(channel) = self.channel {
            channel_nibble(channel)?;
        }
        Ok(())
    }

    fn messages(&self, pitch: Pitch, config: &EngineConfig) -> Result<(Message, Message), EventError> {
        let channel = self.channel.unwrap_or(config.default_channel);
        let velocity = self.velocity.unwrap_or(config.default_velocity);
        Ok((
            Message::note_on(channel, pitch, velocity)?,
            Message::note_off(channel, pitch, velocity)?,
        ))
    }

    /// Expand into relatively timed events.
    ///
    /// The first note-on of each repetition waits for [`wait`](Self::wait);
    /// the first note-off of a chord waits for the duration and the other
    /// pitches follow at zero offset. Sequential notes alternate on/off.
    pub fn expand_relative(&self, config: &EngineConfig) -> Result<Vec<TrackEvent>, EventError> {
        let duration = self.duration.ticks(config.ticks_per_beat);
        let wait = self.wait.ticks(config.ticks_per_beat);
        let mut events = Vec::with_capacity(self.event_count());

        for _ in 0..self.repeat {
            if self.sequential {
                for (i, &pitch) in self.pitches.iter().enumerate() {
                    let (on, off) = self.messages(pitch, config)?;
                    let lead = if i == 0 { wait } else { 0.0 };
                    events.push(TrackEvent::new(on).with_wait(lead));
                    events.push(TrackEvent::new(off).with_wait(duration));
                }
            } else {
                let mut offs = Vec::with_capacity(self.pitches.len());
                for (i, &pitch) in self.pitches.iter().enumerate() {
                    let (on, off) = self.messages(pitch, config)?;
                    events.push(TrackEvent::new(on).with_wait(if i == 0 { wait } else { 0.0 }));
                    offs.push(TrackEvent::new(off).with_wait(if i == 0 { duration } else { 0.0 }));
                }
                events.extend(offs);
            }
        }

        Ok(events)
    }

    /// Expand into events pinned at absolute ticks, starting at `start_tick`.
    ///
    /// Positions are computed on the fractional timeline and rounded one by
    /// one, so they never drift. Repetitions after the first are preceded by
    /// the wait.
    pub fn expand_absolute(
        &self,
        start_tick: u64,
        config: &EngineConfig,
    ) -> Result<Vec<TrackEvent>, EventError> {
        let duration = self.duration.ticks(config.ticks_per_beat);
        let wait = self.wait.ticks(config.ticks_per_beat);
        let at = |position: f64| rounded_if_close(position, config.snap_tolerance).round() as u64;

        let mut events = Vec::with_capacity(self.event_count());
        let mut position = start_tick as f64;

        for repetition in 0..self.repeat {
            if repetition > 0 {
                position += wait;
            }
            if self.sequential {
                for &pitch in &self.pitches {
                    let (on, off) = self.messages(pitch, config)?;
                    events.push(TrackEvent::new(on).at_tick(at(position)));
                    position += duration;
                    events.push(TrackEvent::new(off).at_tick(at(position)));
                }
            } else {
                let mut offs = Vec::with_capacity(self.pitches.len());
                for &pitch in &self.pitches {
                    let (on, off) = self.messages(pitch, config)?;
                    events.push(TrackEvent::new(on).at_tick(at(position)));
                    offs.push(off);
                }
                position += duration;
                events.extend(offs.into_iter().map(|off| TrackEvent::new(off).at_tick(at(position))));
            }
        }

        Ok(events)
    }
}

/// Field replacements applied to a [`NoteEvent`] by [`NoteEvent::with_overrides`]
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NoteOverrides {
    pub pitches: Option<Vec<Pitch>>,
    pub duration: Option<Duration>,
    pub wait: Option<Duration>,
    pub velocity: Option<u8>,
    pub channel: Option<u8>,
    pub sequential: Option<bool>,
    pub repeat: Option<u32>,
    pub start_tick: Option<u64>,
}

/// Builder for [`NoteEvent`]
///
/// Pitches and durations are given in their text form and parsed by
/// [`build`](Self::build), which reports the first invalid field.
#[derive(Debug, Clone)]
pub struct NoteBuilder {
    pitches: Vec<String>,
    duration: String,
    wait: String,
    velocity: Option<u8>,
    channel: Option<u8>,
    sequential: bool,
    repeat: u32,
    start_tick: Option<u64>,
}

impl Default for NoteBuilder {
    fn default() -> Self {
        Self {
            pitches: Vec::new(),
            duration: "4".to_string(),
            wait: "0".to_string(),
            velocity: None,
            channel: None,
            sequential: false,
            repeat: 1,
            start_tick: None,
        }
    }
}

impl NoteBuilder {
    /// Add a pitch, by name (`"C4"`) or MIDI number
    pub fn pitch(mut self, pitch: impl ToString) -> Self {
        self.pitches.push(pitch.to_string());
        self
    }

    /// Add several pitches
    pub fn pitches<I, P>(mut self, pitches: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: ToString,
    {
        self.pitches.extend(pitches.into_iter().map(|p| p.to_string()));
        self
    }

    /// Set the duration (`"4"`, `"d8"`, `"8t"`, `"T96"`)
    pub fn duration(mut self, duration: impl Into<String>) -> Self {
        self.duration = duration.into();
        self
    }

    /// Set the rest before the note
    pub fn wait(mut self, wait: impl Into<String>) -> Self {
        self.wait = wait.into();
        self
    }

    /// Set velocity (1-100)
    pub fn velocity(mut self, velocity: u8) -> Self {
        self.velocity = Some(velocity);
        self
    }

    /// Set MIDI channel (1-16)
    pub fn channel(mut self, channel: u8) -> Self {
        self.channel = Some(channel);
        self
    }

    /// Play pitches one after another instead of as a chord
    pub fn sequential(mut self, sequential: bool) -> Self {
        self.sequential = sequential;
        self
    }

    /// Play the note this many times
    pub fn repeat(mut self, repeat: u32) -> Self {
        self.repeat = repeat.max(1);
        self
    }

    /// Pin the note to an absolute tick
    pub fn start_tick(mut self, tick: u64) -> Self {
        self.start_tick = Some(tick);
        self
    }

    /// Parse and validate all fields
    pub fn build(self) -> Result<NoteEvent, EventError> {
        let pitches = self
            .pitches
            .iter()
            .map(|p| p.parse())
            .collect::<Result<Vec<Pitch>, _>>()?;

        let note = NoteEvent {
            pitches,
            duration: self.duration.parse()?,
            wait: self.wait.parse()?,
            velocity: self.velocity,
            channel: self.channel,
            sequential: self.sequential,
            repeat: self.repeat,
            start_tick: self.start_tick,
        };
        note.validate()?;
        Ok(note)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::EventKind;

    fn config() -> EngineConfig {
        EngineConfig::default()
    }

    fn ticks(events: &[TrackEvent]) -> Vec<Option<u64>> {
        events.iter().map(|e| e.tick()).collect()
    }

    fn waits(events: &[TrackEvent]) -> Vec<f64> {
        events.iter().map(|e| e.wait()).collect()
    }

    #[test]
    fn test_builder_defaults() {
        let note = NoteEvent::builder().pitch("C4").build().unwrap();
        assert_eq!(note.pitches(), &[Pitch::new(60).unwrap()]);
        assert_eq!(note.duration(), &Duration::quarter());
        assert_eq!(note.repeat(), 1);
        assert_eq!(note.start_tick(), None);
        assert_eq!(note.event_count(), 2);
    }

    #[test]
    fn test_builder_rejects_bad_fields() {
        assert_eq!(
            NoteEvent::builder().build(),
            Err(EventError::MissingPitch)
        );
        assert_eq!(
            NoteEvent::builder().pitch("Q4").build(),
            Err(EventError::InvalidPitch("Q4".to_string()))
        );
        assert_eq!(
            NoteEvent::builder().pitch(60).duration("5").build(),
            Err(EventError::InvalidDuration("5".to_string()))
        );
        assert_eq!(
            NoteEvent::builder().pitch(60).velocity(0).build(),
            Err(EventError::VelocityOutOfRange(0))
        );
        assert_eq!(
            NoteEvent::builder().pitch(60).channel(17).build(),
            Err(EventError::ChannelOutOfRange(17))
        );
    }

    #[test]
    fn test_single_note_expands_to_pair() {
        let note = NoteEvent::builder().pitch("C4").wait("8").build().unwrap();
        let events = note.expand_relative(&config()).unwrap();

        assert_eq!(events.len(), 2);
        assert_eq!(events[0].name(), "NoteOn");
        assert_eq!(events[1].name(), "NoteOff");
        assert_eq!(waits(&events), vec![64.0, 128.0]);
        assert!(events.iter().all(|e| e.kind() == EventKind::Note));
        // Default velocity 50 scales to 64
        assert_eq!(events[0].payload(), &[0x90, 60, 64]);
    }

    #[test]
    fn test_chord_expansion() {
        let note = NoteEvent::builder()
            .pitches(["C4", "E4", "G4"])
            .duration("2")
            .build()
            .unwrap();
        let events = note.expand_relative(&config()).unwrap();

        let names: Vec<_> = events.iter().map(|e| e.name()).collect();
        assert_eq!(
            names,
            vec!["NoteOn", "NoteOn", "NoteOn", "NoteOff", "NoteOff", "NoteOff"]
        );
        assert_eq!(waits(&events), vec![0.0, 0.0, 0.0, 256.0, 0.0, 0.0]);
    }

    #[test]
    fn test_sequential_repeat_expansion() {
        let note = NoteEvent::builder()
            .pitches(["C4", "D4"])
            .duration("8")
            .wait("16")
            .sequential(true)
            .repeat(2)
            .build()
            .unwrap();
        let events = note.expand_relative(&config()).unwrap();

        assert_eq!(events.len(), note.event_count());
        assert_eq!(
            waits(&events),
            vec![32.0, 64.0, 0.0, 64.0, 32.0, 64.0, 0.0, 64.0]
        );
    }

    #[test]
    fn test_absolute_expansion() {
        let note = NoteEvent::builder()
            .pitches(["C4", "E4"])
            .duration("8t")
            .repeat(3)
            .wait("0")
            .build()
            .unwrap();
        let events = note.expand_absolute(100, &config()).unwrap();

        // Triplet eighths at 128 ticks per beat are 42.67 ticks long
        assert_eq!(
            ticks(&events),
            vec![
                Some(100), Some(100), Some(143), Some(143),
                Some(143), Some(143), Some(185), Some(185),
                Some(185), Some(185), Some(228), Some(228),
            ]
        );
    }

    #[test]
    fn test_channel_override() {
        let note = NoteEvent::builder().pitch(64).channel(10).velocity(100).build().unwrap();
        let events = note.expand_relative(&config()).unwrap();
        assert_eq!(events[0].payload(), &[0x99, 64, 127]);
        assert_eq!(events[1].payload(), &[0x89, 64, 127]);
    }

    #[test]
    fn test_overrides_return_new_note() {
        let original = NoteEvent::builder().pitch("C4").build().unwrap();
        let changed = original
            .with_overrides(NoteOverrides {
                velocity: Some(80),
                start_tick: Some(32),
                ..Default::default()
            })
            .unwrap();

        assert_eq!(original.velocity(), None);
        assert_eq!(original.start_tick(), None);
        assert_eq!(changed.velocity(), Some(80));
        assert_eq!(changed.start_tick(), Some(32));
        assert_eq!(changed.pitches(), original.pitches());

        assert!(original
            .with_overrides(NoteOverrides {
                channel: Some(0),
                ..Default::default()
            })
            .is_err());
    }
}
