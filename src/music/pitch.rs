// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Pitch names and key signatures.
//!
//! Pitches use the MIDI octave convention (middle C = C4 = 60). Key
//! signatures are derived from the spelled tonic, so `"F#"` and `"Gb"`
//! give six sharps and six flats respectively.

use std::fmt;
use std::str::FromStr;

use crate::events::EventError;

/// MIDI note number type (0-127)
pub type MidiNote = u8;

/// Note names (pitch classes)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Note {
    C,
    Cs, // C# / Db
    D,
    Ds, // D# / Eb
    E,
    F,
    Fs, // F# / Gb
    G,
    Gs, // G# / Ab
    A,
    As, // A# / Bb
    B,
}

impl Note {
    /// All notes in chromatic order
    pub const ALL: [Note; 12] = [
        Note::C,
        Note::Cs,
        Note::D,
        Note::Ds,
        Note::E,
        Note::F,
        Note::Fs,
        Note::G,
        Note::Gs,
        Note::A,
        Note::As,
        Note::B,
    ];

    /// Get note from pitch class
    pub fn from_pitch_class(pc: u8) -> Self {
        Note::ALL[(pc % 12) as usize]
    }
}

impl fmt::Display for Note {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Note::C => "C",
            Note::Cs => "C#",
            Note::D => "D",
            Note::Ds => "D#",
            Note::E => "E",
            Note::F => "F",
            Note::Fs => "F#",
            Note::G => "G",
            Note::Gs => "G#",
            Note::A => "A",
            Note::As => "A#",
            Note::B => "B",
        };
        write!(f, "{}", name)
    }
}

/// A spelled note name: natural letter plus accidentals
struct Spelling {
    /// Position on the circle of fifths relative to C
    fifths: i32,
    /// Semitones above C, may leave 0..12 with accidentals
    semitones: i32,
}

/// Split a leading spelled note name off `s`, returning it and the rest
fn split_spelling(s: &str) -> Option<(Spelling, &str)> {
    let mut chars = s.char_indices();
    let (_, letter) = chars.next()?;
    let (fifths, semitones) = match letter.to_ascii_uppercase() {
        'F' => (-1, 5),
        'C' => (0, 0),
        'G' => (1, 7),
        'D' => (2, 2),
        'A' => (3, 9),
        'E' => (4, 4),
        'B' => (5, 11),
        _ => return None,
    };

    let mut spelling = Spelling { fifths, semitones };
    let mut rest = &s[letter.len_utf8()..];
    loop {
        if let Some(r) = rest.strip_prefix('#') {
            spelling.fifths += 7;
            spelling.semitones += 1;
            rest = r;
        } else if let Some(r) = rest.strip_prefix('b') {
            spelling.fifths -= 7;
            spelling.semitones -= 1;
            rest = r;
        } else {
            break;
        }
    }
    Some((spelling, rest))
}

/// A MIDI pitch (0-127)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Pitch(MidiNote);

impl Pitch {
    /// Create a pitch from a MIDI note number
    pub fn new(note: MidiNote) -> Result<Self, EventError> {
        if note > 127 {
            return Err(EventError::InvalidPitch(note.to_string()));
        }
        Ok(Self(note))
    }

    /// MIDI note number
    pub fn midi(self) -> MidiNote {
        self.0
    }

    /// Pitch class of this pitch
    pub fn note(self) -> Note {
        Note::from_pitch_class(self.0)
    }

    /// Octave, middle C being in octave 4
    pub fn octave(self) -> i8 {
        (self.0 / 12) as i8 - 1
    }
}

impl FromStr for Pitch {
    type Err = EventError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || EventError::InvalidPitch(s.to_string());
        let trimmed = s.trim();

        if trimmed.chars().all(|c| c.is_ascii_digit()) {
            let number: u32 = trimmed.parse().map_err(|_| invalid())?;
            return u8::try_from(number)
                .map_err(|_| invalid())
                .and_then(|n| Self::new(n).map_err(|_| invalid()));
        }

        let (spelling, octave) = split_spelling(trimmed).ok_or_else(invalid)?;
        let octave: i32 = octave.parse().map_err(|_| invalid())?;
        let midi = (octave + 1) * 12 + spelling.semitones;
        if !(0..=127).contains(&midi) {
            return Err(invalid());
        }
        Ok(Self(midi as MidiNote))
    }
}

impl TryFrom<&str> for Pitch {
    type Error = EventError;

    fn try_from(s: &str) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl TryFrom<u8> for Pitch {
    type Error = EventError;

    fn try_from(note: u8) -> Result<Self, Self::Error> {
        Self::new(note)
    }
}

impl fmt::Display for Pitch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.note(), self.octave())
    }
}

/// Key signature as encoded in a key signature meta event
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct KeySignature {
    /// Sharps (positive) or flats (negative), -7 to 7
    pub sharps: i8,
    /// Minor mode
    pub minor: bool,
}

impl KeySignature {
    /// Create from an accidental count and mode
    pub fn new(sharps: i8, minor: bool) -> Result<Self, EventError> {
        if !(-7..=7).contains(&sharps) {
            return Err(EventError::InvalidKey(sharps.to_string()));
        }
        Ok(Self { sharps, minor })
    }
}

impl FromStr for KeySignature {
    type Err = EventError;

    /// Parse a key name such as `"C"`, `"Bb"`, `"F#m"` or `"Eb minor"`
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || EventError::InvalidKey(s.to_string());
        let (spelling, mode) = split_spelling(s.trim()).ok_or_else(invalid)?;

        let minor = match mode.trim().to_lowercase().as_str() {
            "" | "maj" | "major" => false,
            "m" | "min" | "minor" => true,
            _ => return Err(invalid()),
        };

        let sharps = if minor {
            spelling.fifths - 3
        } else {
            spelling.fifths
        };
        if !(-7..=7).contains(&sharps) {
            return Err(invalid());
        }

        Ok(Self {
            sharps: sharps as i8,
            minor,
        })
    }
}
