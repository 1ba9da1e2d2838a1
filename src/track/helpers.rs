// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Shortcuts for adding common events to a track.

use super::Track;
use crate::events::{EventError, Message, TextKind, TrackEvent, TrackItem};
use crate::music::KeySignature;

/// Controller number for "all notes off"
const ALL_NOTES_OFF: u8 = 123;

impl Track {
    fn push_message(&mut self, message: Message) -> &mut Self {
        self.events.push(TrackEvent::new(message));
        self
    }

    /// Set the tempo in BPM, optionally at an explicit tick
    pub fn set_tempo(&mut self, bpm: f64, tick: Option<u64>) -> Result<&mut Self, EventError> {
        let event = TrackEvent::new(Message::tempo(bpm)?);
        let event = match tick {
            Some(tick) => event.at_tick(tick),
            None => event,
        };
        self.add_event(TrackItem::Event(event))
    }

    /// Set the time signature, e.g. `(6, 8)`
    pub fn set_time_signature(&mut self, numerator: u8, denominator: u8) -> Result<&mut Self, EventError> {
        Ok(self.push_message(Message::time_signature(numerator, denominator)?))
    }

    /// Set the key signature from a key name such as `"Bb"` or `"F#m"`
    pub fn set_key_signature(&mut self, key: &str) -> Result<&mut Self, EventError> {
        let key: KeySignature = key.parse()?;
        Ok(self.push_message(Message::KeySignature(key)))
    }

    /// Add a text event
    pub fn add_text(&mut self, text: &str) -> &mut Self {
        self.push_message(Message::text(TextKind::Text, text))
    }

    /// Add a copyright notice
    pub fn add_copyright(&mut self, text: &str) -> &mut Self {
        self.push_message(Message::text(TextKind::Copyright, text))
    }

    /// Name the track
    pub fn add_track_name(&mut self, text: &str) -> &mut Self {
        self.push_message(Message::text(TextKind::TrackName, text))
    }

    /// Name the instrument
    pub fn add_instrument_name(&mut self, text: &str) -> &mut Self {
        self.push_message(Message::text(TextKind::InstrumentName, text))
    }

    /// Add a marker
    pub fn add_marker(&mut self, text: &str) -> &mut Self {
        self.push_message(Message::text(TextKind::Marker, text))
    }

    /// Add a cue point
    pub fn add_cue_point(&mut self, text: &str) -> &mut Self {
        self.push_message(Message::text(TextKind::CuePoint, text))
    }

    /// Add a lyric
    pub fn add_lyric(&mut self, text: &str) -> &mut Self {
        self.push_message(Message::text(TextKind::Lyric, text))
    }

    /// Select a program (instrument) on a channel
    pub fn set_program(&mut self, channel: u8, program: u8) -> Result<&mut Self, EventError> {
        Ok(self.push_message(Message::program_change(channel, program)?))
    }

    /// Bend pitch on a channel, from -1.0 to 1.0
    pub fn set_pitch_bend(&mut self, channel: u8, bend: f64) -> Result<&mut Self, EventError> {
        Ok(self.push_message(Message::pitch_bend(channel, bend)?))
    }

    /// Send a controller change
    pub fn controller_change(
        &mut self,
        channel: u8,
        controller: u8,
        value: u8,
    ) -> Result<&mut Self, EventError> {
        Ok(self.push_message(Message::controller_change(channel, controller, value)?))
    }

    /// Silence every sounding note on a channel
    pub fn all_notes_off(&mut self, channel: u8) -> Result<&mut Self, EventError> {
        self.controller_change(channel, ALL_NOTES_OFF, 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_meta_shortcuts() {
        let mut track = Track::new();
        track
            .add_track_name("Piano")
            .add_instrument_name("Grand")
            .add_copyright("(c) nobody")
            .add_text("hello")
            .add_marker("A")
            .add_cue_point("go")
            .add_lyric("la");
        track.set_time_signature(3, 4).unwrap().set_key_signature("D").unwrap();

        let names: Vec<_> = track.events().iter().map(|e| e.name()).collect();
        assert_eq!(
            names,
            vec![
                "TrackName",
                "InstrumentName",
                "Copyright",
                "Text",
                "Marker",
                "CuePoint",
                "Lyric",
                "TimeSignature",
                "KeySignature",
            ]
        );
        assert_eq!(track.events()[8].payload(), &[0xFF, 0x59, 0x02, 2, 0]);
    }

    #[test]
    fn test_tempo_shortcut() {
        let mut track = Track::new();
        track.set_tempo(120.0, None).unwrap();
        track.set_tempo(90.0, Some(512)).unwrap();

        assert_eq!(track.events().len(), 1);
        assert_eq!(track.explicit_tick_events().len(), 1);
        assert!(track.set_tempo(0.0, None).is_err());
    }

    #[test]
    fn test_channel_shortcuts() {
        let mut track = Track::new();
        track
            .set_program(1, 0)
            .unwrap()
            .set_pitch_bend(1, 0.0)
            .unwrap()
            .controller_change(2, 7, 100)
            .unwrap()
            .all_notes_off(1)
            .unwrap();

        let payloads: Vec<&[u8]> = track.events().iter().map(|e| e.payload()).collect();
        assert_eq!(
            payloads,
            vec![
                &[0xC0, 0][..],
                &[0xE0, 0x00, 0x40][..],
                &[0xB1, 7, 100][..],
                &[0xB0, 123, 0][..],
            ]
        );
    }

    #[test]
    fn test_invalid_shortcuts() {
        let mut track = Track::new();
        assert!(track.set_key_signature("H").is_err());
        assert!(track.set_time_signature(4, 3).is_err());
        assert!(track.set_program(0, 1).is_err());
        assert!(track.set_pitch_bend(1, -2.0).is_err());
        assert!(track.all_notes_off(17).is_err());
        assert!(track.events().is_empty());
    }
}
