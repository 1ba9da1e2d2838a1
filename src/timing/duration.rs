// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Note duration notation.
//!
//! Durations are written the way they are read off a score:
//! - `"4"` quarter, `"8"` eighth, `"1"` whole (any power of two)
//! - `"d4"` dotted quarter, `"dd4"` double dotted
//! - `"8t"` triplet eighth, `"4t5"` quintuplet quarter
//! - `"T96"` an explicit count of 96 ticks
//! - `"4+8"` the sum of several parts
//!
//! Values are resolved to ticks against the track resolution, and may be
//! fractional; the quantizer turns them into whole ticks.

use std::fmt;
use std::str::FromStr;

use crate::events::EventError;

/// One term of a duration
#[derive(Debug, Clone, Copy, PartialEq)]
enum Part {
    /// Length relative to a quarter note
    Quarters(f64),
    /// Fixed tick count, independent of resolution
    Ticks(u32),
}

/// A note duration, possibly the sum of several parts
#[derive(Debug, Clone, PartialEq)]
pub struct Duration {
    parts: Vec<Part>,
    source: String,
}

impl Duration {
    /// A quarter note
    pub fn quarter() -> Self {
        Self {
            parts: vec![Part::Quarters(1.0)],
            source: "4".to_string(),
        }
    }

    /// A fixed number of ticks
    pub fn from_ticks(ticks: u32) -> Self {
        Self {
            parts: vec![Part::Ticks(ticks)],
            source: format!("T{}", ticks),
        }
    }

    /// Resolve to (possibly fractional) ticks at the given resolution
    pub fn ticks(&self, ticks_per_beat: u16) -> f64 {
        self.parts
            .iter()
            .map(|part| match part {
                Part::Quarters(q) => q * ticks_per_beat as f64,
                Part::Ticks(t) => *t as f64,
            })
            .sum()
    }

    fn parse_part(s: &str) -> Option<Part> {
        if s == "0" {
            return Some(Part::Quarters(0.0));
        }

        if let Some(count) = s.strip_prefix('T') {
            return count.parse::<u32>().ok().map(Part::Ticks);
        }

        let dots = s.chars().take_while(|&c| c == 'd').count();
        let rest = &s[dots..];
        let digits = rest.chars().take_while(|c| c.is_ascii_digit()).count();
        if digits == 0 {
            return None;
        }
        let base: u32 = rest[..digits].parse().ok()?;
        if base == 0 || !base.is_power_of_two() {
            return None;
        }

        let mut quarters = 4.0 / base as f64;
        if dots > 0 {
            let divisor = 2f64.powi(dots as i32);
            quarters += quarters * ((divisor - 1.0) / divisor);
        }

        let tail = &rest[digits..];
        if let Some(tuplet) = tail.strip_prefix('t') {
            let notes: u32 = if tuplet.is_empty() {
                3
            } else {
                tuplet.parse().ok()?
            };
            if notes == 0 {
                return None;
            }
            quarters = quarters * 2.0 / notes as f64;
        } else if !tail.is_empty() {
            return None;
        }

        Some(Part::Quarters(quarters))
    }
}

impl Default for Duration {
    fn default() -> Self {
        Self::quarter()
    }
}

impl FromStr for Duration {
    type Err = EventError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let source = s.trim();
        let parts = source
            .split('+')
            .map(|part| Self::parse_part(part.trim()))
            .collect::<Option<Vec<_>>>()
            .filter(|parts| !parts.is_empty())
            .ok_or_else(|| EventError::InvalidDuration(s.to_string()))?;

        Ok(Self {
            parts,
            source: source.to_string(),
        })
    }
}

impl TryFrom<&str> for Duration {
    type Error = EventError;

    fn try_from(s: &str) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl fmt::Display for Duration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.source)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ticks(s: &str) -> f64 {
        s.parse::<Duration>().unwrap().ticks(128)
    }

    #[test]
    fn test_plain_values() {
        assert_eq!(ticks("1"), 512.0);
        assert_eq!(ticks("2"), 256.0);
        assert_eq!(ticks("4"), 128.0);
        assert_eq!(ticks("8"), 64.0);
        assert_eq!(ticks("16"), 32.0);
        assert_eq!(ticks("0"), 0.0);
    }

    #[test]
    fn test_dotted_values() {
        assert_eq!(ticks("d4"), 192.0);
        assert_eq!(ticks("dd4"), 224.0);
        assert_eq!(ticks("d2"), 384.0);
    }

    #[test]
    fn test_tuplets() {
        assert!((ticks("8t") - 128.0 / 3.0).abs() < 1e-9);
        assert!((ticks("4t") - 256.0 / 3.0).abs() < 1e-9);
        assert!((ticks("4t5") - 256.0 / 5.0).abs() < 1e-9);
    }

    #[test]
    fn test_explicit_ticks() {
        assert_eq!(ticks("T96"), 96.0);
        assert_eq!(Duration::from_ticks(7).ticks(480), 7.0);
    }

    #[test]
    fn test_sum() {
        assert_eq!(ticks("4+8"), 192.0);
        assert_eq!(ticks("2 + T10"), 266.0);
    }

    #[test]
    fn test_resolution() {
        let quarter = Duration::quarter();
        assert_eq!(quarter.ticks(480), 480.0);
        assert_eq!(quarter.ticks(96), 96.0);
    }

    #[test]
    fn test_invalid() {
        for bad in ["", "3", "x", "4x", "T", "Tfoo", "d", "8t0", "4+"] {
            assert_eq!(
                bad.parse::<Duration>(),
                Err(EventError::InvalidDuration(bad.to_string())),
                "{:?} should be rejected",
                bad
            );
        }
    }
}
