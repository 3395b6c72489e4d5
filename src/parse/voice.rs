//! Voice parsing: whitespace-separated note tokens into timed notes
//!
//! A voice string is a sequence of SPN tokens, each advancing the onset
//! cursor by its duration. "L:x/y" tokens switch the running base duration
//! (one quarter note = one beat, so L:1/8 means half a beat), and a numeric
//! suffix on a note multiplies the base duration for that note only.

use crate::error::AnalysisError;
use crate::models::Note;
use crate::parse::spn::parse_note_token;

/// Parse an "L:x/y" length declaration. Returns `Ok(None)` when the token
/// is not a length declaration at all, and an error when it is one with a
/// zero numerator or denominator.
pub fn parse_length_decl(token: &str) -> Result<Option<f64>, AnalysisError> {
    let rest = match token.strip_prefix("L:").or_else(|| token.strip_prefix("l:")) {
        Some(rest) => rest,
        None => return Ok(None),
    };
    let Some((num, den)) = rest.split_once('/') else {
        return Ok(None);
    };
    let all_digits = |p: &str| !p.is_empty() && p.chars().all(|c| c.is_ascii_digit());
    if !all_digits(num) || !all_digits(den) {
        return Ok(None);
    }
    let invalid = || AnalysisError::InvalidLengthDeclaration(token.to_string());
    let num: u32 = num.parse().map_err(|_| invalid())?;
    let den: u32 = den.parse().map_err(|_| invalid())?;
    if num == 0 || den == 0 {
        return Err(invalid());
    }
    Ok(Some(4.0 * num as f64 / den as f64))
}

/// Parse a voice input string into notes with cumulative onsets.
/// Empty input yields an empty list.
pub fn parse_voice(input: &str, default_duration: f64) -> Result<Vec<Note>, AnalysisError> {
    let mut notes = Vec::new();
    let mut onset = 0.0;
    let mut base_duration = default_duration;
    for token in input.split_whitespace() {
        if let Some(len) = parse_length_decl(token)? {
            base_duration = len;
            continue;
        }
        let (pitch, mult) = parse_note_token(token)
            .ok_or_else(|| AnalysisError::InvalidNoteToken(token.to_string()))?;
        let duration = base_duration * mult.unwrap_or(1.0);
        notes.push(Note::new(pitch, onset, duration));
        onset += duration;
    }
    Ok(notes)
}

/// Merge two voices into one list sorted by (onset, pitch).
pub fn merge_voices(mut v1: Vec<Note>, v2: Vec<Note>) -> Vec<Note> {
    v1.extend(v2);
    v1.sort_by(|a, b| a.onset.total_cmp(&b.onset).then(a.pitch.cmp(&b.pitch)));
    v1
}
