//! Scientific pitch notation (SPN) parsing and formatting
//!
//! Accepts note names A-G (either case) with up to double sharps/flats and
//! a single-digit octave, optionally negative: "C4", "Eb3", "F#5", "B-1".
//! Superscript octave digits ("C⁴") are normalized before parsing.

use crate::models::{pitch_class, pitch_class_name};

/// Replace superscript digits and minus with their ASCII forms.
pub fn normalize_superscripts(s: &str) -> String {
    s.chars()
        .map(|c| match c {
            '⁰' => '0',
            '¹' => '1',
            '²' => '2',
            '³' => '3',
            '⁴' => '4',
            '⁵' => '5',
            '⁶' => '6',
            '⁷' => '7',
            '⁸' => '8',
            '⁹' => '9',
            '⁻' => '-',
            other => other,
        })
        .collect()
}

/// Parse the leading "letter + accidentals + octave digit" of `chars`.
/// Returns the MIDI pitch and the number of chars consumed.
fn parse_pitch_prefix(chars: &[char]) -> Option<(i32, usize)> {
    let base = match chars.first()?.to_ascii_uppercase() {
        'C' => 0,
        'D' => 2,
        'E' => 4,
        'F' => 5,
        'G' => 7,
        'A' => 9,
        'B' => 11,
        _ => return None,
    };
    let mut i = 1;
    let mut offset = 0i32;
    if chars.get(i) == Some(&'#') {
        offset = 1;
        i += 1;
        if chars.get(i) == Some(&'#') {
            offset = 2;
            i += 1;
        }
    } else if chars.get(i) == Some(&'b') {
        offset = -1;
        i += 1;
        if chars.get(i) == Some(&'b') {
            offset = -2;
            i += 1;
        }
    }
    let negative = chars.get(i) == Some(&'-');
    if negative {
        i += 1;
    }
    let digit = chars.get(i)?.to_digit(10)? as i32;
    i += 1;
    let octave = if negative { -digit } else { digit };
    Some(((octave + 1) * 12 + base + offset, i))
}

/// Parse "C4", "Eb3", "F#5" etc. to a MIDI pitch. Returns `None` on failure.
pub fn parse_spn(s: &str) -> Option<i32> {
    let chars: Vec<char> = normalize_superscripts(s).chars().collect();
    let (pitch, consumed) = parse_pitch_prefix(&chars)?;
    if consumed == chars.len() {
        Some(pitch)
    } else {
        None
    }
}

/// Parse a voice token: SPN plus an optional duration-multiplier suffix
/// ("C42" is C4 lasting twice the base duration). Returns the MIDI pitch
/// and the multiplier, if any.
pub fn parse_note_token(token: &str) -> Option<(i32, Option<f64>)> {
    let chars: Vec<char> = normalize_superscripts(token).chars().collect();
    let (pitch, consumed) = parse_pitch_prefix(&chars)?;
    if consumed == chars.len() {
        return Some((pitch, None));
    }
    let rest: String = chars[consumed..].iter().collect();
    if !is_valid_multiplier(&rest) {
        return None;
    }
    let mult: f64 = rest.parse().ok()?;
    if !mult.is_finite() || mult <= 0.0 {
        return None;
    }
    Some((pitch, Some(mult)))
}

/// Digits with at most one interior decimal point ("2", "1.5")
fn is_valid_multiplier(s: &str) -> bool {
    let (int_part, frac_part) = match s.split_once('.') {
        Some((i, f)) => (i, Some(f)),
        None => (s, None),
    };
    let digits = |p: &str| !p.is_empty() && p.chars().all(|c| c.is_ascii_digit());
    digits(int_part) && frac_part.map_or(true, digits)
}

/// Format a MIDI pitch as an SPN string for display.
pub fn midi_to_spn(midi: i32) -> String {
    let octave = midi.div_euclid(12) - 1;
    format!("{}{}", pitch_class_name(pitch_class(midi)), octave)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_spn_basics() {
        assert_eq!(parse_spn("C4"), Some(60));
        assert_eq!(parse_spn("c4"), Some(60));
        assert_eq!(parse_spn("A4"), Some(69));
        assert_eq!(parse_spn("Eb3"), Some(51));
        assert_eq!(parse_spn("F#5"), Some(78));
        assert_eq!(parse_spn("Bb2"), Some(46));
        assert_eq!(parse_spn("C##4"), Some(62));
        assert_eq!(parse_spn("Dbb4"), Some(60));
        assert_eq!(parse_spn("B-1"), Some(11));
    }

    #[test]
    fn test_parse_spn_superscript_octave() {
        assert_eq!(parse_spn("C⁴"), Some(60));
        assert_eq!(parse_spn("G⁻¹"), Some(7));
    }

    #[test]
    fn test_parse_spn_rejects_garbage() {
        assert_eq!(parse_spn(""), None);
        assert_eq!(parse_spn("H4"), None);
        assert_eq!(parse_spn("C"), None);
        assert_eq!(parse_spn("C#"), None);
        assert_eq!(parse_spn("C4x"), None);
    }

    #[test]
    fn test_parse_note_token_multiplier() {
        assert_eq!(parse_note_token("C4"), Some((60, None)));
        assert_eq!(parse_note_token("C42"), Some((60, Some(2.0))));
        assert_eq!(parse_note_token("Eb31.5"), Some((51, Some(1.5))));
        assert_eq!(parse_note_token("C40"), None); // zero multiplier
        assert_eq!(parse_note_token("C4."), None);
        assert_eq!(parse_note_token("C4-2"), None);
    }

    #[test]
    fn test_midi_to_spn_round_trip() {
        for (name, midi) in [("C4", 60), ("Eb3", 51), ("F#5", 78), ("Bb2", 46)] {
            assert_eq!(midi_to_spn(midi), name);
            assert_eq!(parse_spn(name), Some(midi));
        }
    }
}
