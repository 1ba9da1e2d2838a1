// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Event messages and their Standard MIDI File encodings.
//!
//! Channel numbers taken by constructors are 1-16; the stored value is the
//! 0-15 nibble written to the status byte.

use super::{vlq, EventError, EventKind};
use crate::music::{KeySignature, Pitch};

/// Meta event types that carry free text
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextKind {
    Text,
    Copyright,
    TrackName,
    InstrumentName,
    Lyric,
    Marker,
    CuePoint,
}

impl TextKind {
    /// Meta event type byte
    pub fn meta_type(self) -> u8 {
        match self {
            TextKind::Text => 0x01,
            TextKind::Copyright => 0x02,
            TextKind::TrackName => 0x03,
            TextKind::InstrumentName => 0x04,
            TextKind::Lyric => 0x05,
            TextKind::Marker => 0x06,
            TextKind::CuePoint => 0x07,
        }
    }

    fn name(self) -> &'static str {
        match self {
            TextKind::Text => "Text",
            TextKind::Copyright => "Copyright",
            TextKind::TrackName => "TrackName",
            TextKind::InstrumentName => "InstrumentName",
            TextKind::Lyric => "Lyric",
            TextKind::Marker => "Marker",
            TextKind::CuePoint => "CuePoint",
        }
    }
}

/// A track event message
#[derive(Debug, Clone, PartialEq)]
pub enum Message {
    NoteOn {
        channel: u8,
        key: u8,
        velocity: u8,
    },
    NoteOff {
        channel: u8,
        key: u8,
        velocity: u8,
    },
    ProgramChange {
        channel: u8,
        program: u8,
    },
    ControllerChange {
        channel: u8,
        controller: u8,
        value: u8,
    },
    PitchBend {
        channel: u8,
        /// 14-bit value, 0x2000 is centre
        value: u16,
    },
    Tempo {
        micros_per_quarter: u32,
    },
    TimeSignature {
        numerator: u8,
        /// Denominator as a power of two
        denominator_power: u8,
        clocks_per_click: u8,
        thirty_seconds_per_quarter: u8,
    },
    KeySignature(KeySignature),
    Text {
        kind: TextKind,
        text: String,
    },
    EndOfTrack,
}

/// Convert a 1-16 channel number to its status nibble
pub fn channel_nibble(channel: u8) -> Result<u8, EventError> {
    if !(1..=16).contains(&channel) {
        return Err(EventError::ChannelOutOfRange(channel));
    }
    Ok(channel - 1)
}

/// Scale a 1-100 velocity to the 0-127 MIDI range
pub fn scale_velocity(percent: u8) -> Result<u8, EventError> {
    if !(1..=100).contains(&percent) {
        return Err(EventError::VelocityOutOfRange(percent));
    }
    Ok((percent as f64 * 127.0 / 100.0).round() as u8)
}

fn data_byte(name: &'static str, value: u8) -> Result<u8, EventError> {
    if value > 0x7F {
        return Err(EventError::DataByteOutOfRange { name, value });
    }
    Ok(value)
}

/// Check a stored 0-15 channel nibble
fn stored_channel(channel: u8) -> Result<(), EventError> {
    if channel > 0x0F {
        return Err(EventError::ChannelOutOfRange(channel.saturating_add(1)));
    }
    Ok(())
}

impl Message {
    /// Note on; `velocity` is on the 1-100 scale
    pub fn note_on(channel: u8, pitch: Pitch, velocity: u8) -> Result<Self, EventError> {
        Ok(Message::NoteOn {
            channel: channel_nibble(channel)?,
            key: pitch.midi(),
            velocity: scale_velocity(velocity)?,
        })
    }

    /// Note off; `velocity` is on the 1-100 scale
    pub fn note_off(channel: u8, pitch: Pitch, velocity: u8) -> Result<Self, EventError> {
        Ok(Message::NoteOff {
            channel: channel_nibble(channel)?,
            key: pitch.midi(),
            velocity: scale_velocity(velocity)?,
        })
    }

    /// Program change
    pub fn program_change(channel: u8, program: u8) -> Result<Self, EventError> {
        Ok(Message::ProgramChange {
            channel: channel_nibble(channel)?,
            program: data_byte("program", program)?,
        })
    }

    /// Controller change
    pub fn controller_change(channel: u8, controller: u8, value: u8) -> Result<Self, EventError> {
        Ok(Message::ControllerChange {
            channel: channel_nibble(channel)?,
            controller: data_byte("controller", controller)?,
            value: data_byte("controller value", value)?,
        })
    }

    /// Pitch bend from -1.0 (full down) through 0.0 (centre) to 1.0 (full up)
    pub fn pitch_bend(channel: u8, bend: f64) -> Result<Self, EventError> {
        if !(-1.0..=1.0).contains(&bend) {
            return Err(EventError::PitchBendOutOfRange(bend));
        }
        let value = if bend <= 0.0 {
            (16384.0 * (bend + 1.0) / 2.0).floor()
        } else {
            (16383.0 * (bend + 1.0) / 2.0).floor()
        };
        Ok(Message::PitchBend {
            channel: channel_nibble(channel)?,
            value: value as u16,
        })
    }

    /// Tempo in beats per minute
    pub fn tempo(bpm: f64) -> Result<Self, EventError> {
        if !bpm.is_finite() || bpm <= 0.0 {
            return Err(EventError::InvalidTempo(bpm));
        }
        let micros = (60_000_000.0 / bpm).round();
        if !(1.0..=0xFF_FFFF as f64).contains(&micros) {
            return Err(EventError::InvalidTempo(bpm));
        }
        Ok(Message::Tempo {
            micros_per_quarter: micros as u32,
        })
    }

    /// Time signature with the default metronome settings
    pub fn time_signature(numerator: u8, denominator: u8) -> Result<Self, EventError> {
        Self::time_signature_with(numerator, denominator, 24, 8)
    }

    /// Time signature with explicit metronome clocks and 32nd-note grouping
    pub fn time_signature_with(
        numerator: u8,
        denominator: u8,
        clocks_per_click: u8,
        thirty_seconds_per_quarter: u8,
    ) -> Result<Self, EventError> {
        if numerator == 0 || !denominator.is_power_of_two() {
            return Err(EventError::InvalidTimeSignature {
                numerator,
                denominator,
            });
        }
        Ok(Message::TimeSignature {
            numerator,
            denominator_power: denominator.trailing_zeros() as u8,
            clocks_per_click,
            thirty_seconds_per_quarter,
        })
    }

    /// Text-like meta event
    pub fn text(kind: TextKind, text: impl Into<String>) -> Self {
        Message::Text {
            kind,
            text: text.into(),
        }
    }

    /// Check the stored fields against what the encoding can carry.
    ///
    /// Messages from the constructors always pass. Tracks run this on every
    /// event added, so variants built by hand are rejected before encoding.
    pub fn validate(&self) -> Result<(), EventError> {
        match self {
            Message::NoteOn {
                channel,
                key,
                velocity,
            }
            | Message::NoteOff {
                channel,
                key,
                velocity,
            } => {
                stored_channel(*channel)?;
                data_byte("key", *key)?;
                data_byte("velocity", *velocity)?;
            }
            Message::ProgramChange { channel, program } => {
                stored_channel(*channel)?;
                data_byte("program", *program)?;
            }
            Message::ControllerChange {
                channel,
                controller,
                value,
            } => {
                stored_channel(*channel)?;
                data_byte("controller", *controller)?;
                data_byte("controller value", *value)?;
            }
            Message::PitchBend { channel, value } => {
                stored_channel(*channel)?;
                if *value > 0x3FFF {
                    return Err(EventError::PitchBendValueOutOfRange(*value));
                }
            }
            Message::Tempo { micros_per_quarter } => {
                if !(1..=0xFF_FFFF).contains(micros_per_quarter) {
                    return Err(EventError::InvalidTempo(
                        60_000_000.0 / *micros_per_quarter as f64,
                    ));
                }
            }
            Message::TimeSignature {
                numerator,
                denominator_power,
                ..
            } => {
                if *numerator == 0 || *denominator_power > 7 {
                    return Err(EventError::InvalidTimeSignature {
                        numerator: *numerator,
                        denominator: 1u8.checked_shl(*denominator_power as u32).unwrap_or(0),
                    });
                }
            }
            Message::KeySignature(key) => {
                KeySignature::new(key.sharps, key.minor)?;
            }
            Message::Text { .. } | Message::EndOfTrack => {}
        }
        Ok(())
    }

    /// Timing class of this message
    pub fn kind(&self) -> EventKind {
        match self {
            Message::NoteOn { .. } | Message::NoteOff { .. } => EventKind::Note,
            Message::Tempo { .. } => EventKind::Tempo,
            Message::ProgramChange { .. }
            | Message::ControllerChange { .. }
            | Message::PitchBend { .. }
            | Message::TimeSignature { .. }
            | Message::KeySignature(_)
            | Message::Text { .. }
            | Message::EndOfTrack => EventKind::Generic,
        }
    }

    /// Name used to select events for removal
    pub fn name(&self) -> &'static str {
        match self {
            Message::NoteOn { .. } => "NoteOn",
            Message::NoteOff { .. } => "NoteOff",
            Message::ProgramChange { .. } => "ProgramChange",
            Message::ControllerChange { .. } => "ControllerChange",
            Message::PitchBend { .. } => "PitchBend",
            Message::Tempo { .. } => "Tempo",
            Message::TimeSignature { .. } => "TimeSignature",
            Message::KeySignature(_) => "KeySignature",
            Message::Text { kind, .. } => kind.name(),
            Message::EndOfTrack => "EndOfTrack",
        }
    }

    /// Encode the message, without its delta time
    pub fn render(&self) -> Vec<u8> {
        match self {
            Message::NoteOn {
                channel,
                key,
                velocity,
            } => vec![0x90 | (channel & 0x0F), key & 0x7F, velocity & 0x7F],
            Message::NoteOff {
                channel,
                key,
                velocity,
            } => vec![0x80 | (channel & 0x0F), key & 0x7F, velocity & 0x7F],
            Message::ProgramChange { channel, program } => {
                vec![0xC0 | (channel & 0x0F), program & 0x7F]
            }
            Message::ControllerChange {
                channel,
                controller,
                value,
            } => vec![0xB0 | (channel & 0x0F), controller & 0x7F, value & 0x7F],
            Message::PitchBend { channel, value } => {
                let value = *value;
                vec![0xE0 | (channel & 0x0F), (value & 0x7F) as u8, ((value >> 7) & 0x7F) as u8]
            }
            Message::Tempo { micros_per_quarter } => {
                let [_, high, mid, low] = micros_per_quarter.to_be_bytes();
                vec![0xFF, 0x51, 0x03, high, mid, low]
            }
            Message::TimeSignature {
                numerator,
                denominator_power,
                clocks_per_click,
                thirty_seconds_per_quarter,
            } => vec![
                0xFF,
                0x58,
                0x04,
                *numerator,
                *denominator_power,
                *clocks_per_click,
                *thirty_seconds_per_quarter,
            ],
            Message::KeySignature(key) => {
                vec![0xFF, 0x59, 0x02, key.sharps as u8, key.minor as u8]
            }
            Message::Text { kind, text } => {
                let bytes = text.as_bytes();
                let mut data = vec![0xFF, kind.meta_type()];
                vlq::write(&mut data, bytes.len() as u32);
                data.extend_from_slice(bytes);
                data
            }
            Message::EndOfTrack => vec![0xFF, 0x2F, 0x00],
        }
    }
}
