//! Chord quality catalogue and chord naming
//!
//! The catalogue is a fixed closed set of twelve qualities. Each entry
//! lists the semitone intervals that count as chord members, the minimal
//! subset that must be present for the quality to be considered at all,
//! and an integer complexity used as a flat search penalty.

use once_cell::sync::Lazy;
use std::collections::HashMap;

/// One chord quality in the static catalogue.
#[derive(Debug, PartialEq, Eq)]
pub struct ChordQuality {
    /// Canonical name ("major", "dominant_7", ...)
    pub name: &'static str,

    /// Display suffix appended to the root note name ("", "m", "7", ...)
    pub suffix: &'static str,

    /// Semitone offsets from the root that count as chord members
    pub intervals: &'static [u8],

    /// Intervals that must all be present among sounding pitch classes
    pub required: &'static [u8],

    /// Complexity level 1-4
    pub complexity: u32,
}

/// The full catalogue, in scoring enumeration order.
pub const CHORD_QUALITIES: &[ChordQuality] = &[
    ChordQuality { name: "major", suffix: "", intervals: &[0, 4, 7], required: &[0, 4], complexity: 1 },
    ChordQuality { name: "minor", suffix: "m", intervals: &[0, 3, 7], required: &[0, 3], complexity: 1 },
    ChordQuality { name: "diminished", suffix: "dim", intervals: &[0, 3, 6], required: &[0, 3, 6], complexity: 2 },
    ChordQuality { name: "augmented", suffix: "aug", intervals: &[0, 4, 8], required: &[0, 4, 8], complexity: 2 },
    ChordQuality { name: "dominant_7", suffix: "7", intervals: &[0, 4, 7, 10], required: &[0, 4, 10], complexity: 3 },
    ChordQuality { name: "major_7", suffix: "maj7", intervals: &[0, 4, 7, 11], required: &[0, 4, 11], complexity: 3 },
    ChordQuality { name: "minor_7", suffix: "m7", intervals: &[0, 3, 7, 10], required: &[0, 3, 10], complexity: 3 },
    ChordQuality { name: "half_dim_7", suffix: "m7b5", intervals: &[0, 3, 6, 10], required: &[0, 3, 6, 10], complexity: 4 },
    ChordQuality { name: "dim_7", suffix: "dim7", intervals: &[0, 3, 6, 9], required: &[0, 3, 6, 9], complexity: 4 },
    ChordQuality { name: "min_maj_7", suffix: "m(maj7)", intervals: &[0, 3, 7, 11], required: &[0, 3, 11], complexity: 4 },
    ChordQuality { name: "major_6", suffix: "6", intervals: &[0, 4, 7, 9], required: &[0, 4, 9], complexity: 3 },
    ChordQuality { name: "minor_6", suffix: "m6", intervals: &[0, 3, 7, 9], required: &[0, 3, 9], complexity: 3 },
];

/// Display names for the twelve pitch classes (flats preferred)
pub const NOTE_NAMES: [&str; 12] = [
    "C", "Db", "D", "Eb", "E", "F", "F#", "G", "Ab", "A", "Bb", "B",
];

static QUALITY_BY_NAME: Lazy<HashMap<&'static str, &'static ChordQuality>> = Lazy::new(|| {
    CHORD_QUALITIES.iter().map(|q| (q.name, q)).collect()
});

/// Look up a catalogue entry by canonical name.
pub fn quality_by_name(name: &str) -> Option<&'static ChordQuality> {
    QUALITY_BY_NAME.get(name).copied()
}

/// Display name for a pitch class (e.g. 0 -> "C", 10 -> "Bb").
pub fn pitch_class_name(pc: u8) -> &'static str {
    NOTE_NAMES[(pc % 12) as usize]
}

/// Display name for a chord, e.g. (0, "major") -> "C", (9, "minor_7") -> "Am7".
pub fn chord_name(root: u8, quality: &str) -> String {
    match quality_by_name(quality) {
        Some(q) => format!("{}{}", pitch_class_name(root), q.suffix),
        None => format!("{}{}", pitch_class_name(root), quality),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalogue_has_twelve_qualities() {
        assert_eq!(CHORD_QUALITIES.len(), 12);
        for q in CHORD_QUALITIES {
            assert!(q.intervals.contains(&0), "{} lacks a root interval", q.name);
            assert!((1..=4).contains(&q.complexity));
            for r in q.required {
                assert!(q.intervals.contains(r), "{} requires a non-member", q.name);
            }
        }
    }

    #[test]
    fn test_quality_lookup() {
        let dom7 = quality_by_name("dominant_7").unwrap();
        assert_eq!(dom7.intervals, &[0, 4, 7, 10]);
        assert_eq!(dom7.required, &[0, 4, 10]);
        assert!(quality_by_name("power_chord").is_none());
    }

    #[test]
    fn test_chord_names() {
        assert_eq!(chord_name(0, "major"), "C");
        assert_eq!(chord_name(9, "minor_7"), "Am7");
        assert_eq!(chord_name(7, "dominant_7"), "G7");
        assert_eq!(chord_name(3, "half_dim_7"), "Ebm7b5");
    }
}
