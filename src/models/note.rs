//! Timed notes and time signatures
//!
//! The analysis timeline is measured in quarter-note beats: one quarter
//! note equals one beat regardless of how the input declares durations.

use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::error::AnalysisError;

/// Reduce a MIDI pitch to its pitch class (0-11, C = 0).
pub fn pitch_class(pitch: i32) -> u8 {
    pitch.rem_euclid(12) as u8
}

/// A single note on the beat timeline, as produced by the parsing layer.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Note {
    /// MIDI pitch (C4 = 60)
    pub pitch: i32,

    /// Onset in beats from the start of the passage
    pub onset: f64,

    /// Duration in beats (> 0)
    pub duration: f64,
}

impl Note {
    pub fn new(pitch: i32, onset: f64, duration: f64) -> Self {
        Self { pitch, onset, duration }
    }

    /// Beat position where the note stops sounding
    pub fn end(&self) -> f64 {
        self.onset + self.duration
    }

    pub fn pitch_class(&self) -> u8 {
        pitch_class(self.pitch)
    }
}

/// Time signature with derived beat and bar lengths.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeSignature {
    pub numerator: u32,
    pub denominator: u32,
}

impl TimeSignature {
    /// Create a time signature; both parts must be positive.
    pub fn new(numerator: u32, denominator: u32) -> Result<Self, AnalysisError> {
        if numerator == 0 || denominator == 0 {
            return Err(AnalysisError::InvalidTimeSignature(format!(
                "{numerator}/{denominator}"
            )));
        }
        Ok(Self { numerator, denominator })
    }

    /// Length of one notated beat in quarter-note beats (4/den)
    pub fn beat_len(&self) -> f64 {
        4.0 / self.denominator as f64
    }

    /// Length of one bar in quarter-note beats
    pub fn bar_len(&self) -> f64 {
        self.numerator as f64 * self.beat_len()
    }
}

impl Default for TimeSignature {
    /// Common time (4/4)
    fn default() -> Self {
        Self { numerator: 4, denominator: 4 }
    }
}

impl FromStr for TimeSignature {
    type Err = AnalysisError;

    /// Parse "4/4", "3/4", "6/8" etc.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || AnalysisError::InvalidTimeSignature(s.to_string());
        let (num, den) = s.trim().split_once('/').ok_or_else(invalid)?;
        let numerator: u32 = num.parse().map_err(|_| invalid())?;
        let denominator: u32 = den.parse().map_err(|_| invalid())?;
        TimeSignature::new(numerator, denominator).map_err(|_| invalid())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_time_signature() {
        let sig: TimeSignature = "6/8".parse().unwrap();
        assert_eq!(sig.numerator, 6);
        assert_eq!(sig.denominator, 8);
        assert_eq!(sig.beat_len(), 0.5);
        assert_eq!(sig.bar_len(), 3.0);
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!("44".parse::<TimeSignature>().is_err());
        assert!("4/".parse::<TimeSignature>().is_err());
        assert!("a/b".parse::<TimeSignature>().is_err());
        assert!("0/4".parse::<TimeSignature>().is_err());
        assert!("4/0".parse::<TimeSignature>().is_err());
    }

    #[test]
    fn test_pitch_class_wraps_negative() {
        assert_eq!(pitch_class(60), 0);
        assert_eq!(pitch_class(61), 1);
        assert_eq!(pitch_class(-1), 11);
    }
}
