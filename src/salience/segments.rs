//! Segment builder: beat-boundary slicing and melodic-approach weights

use crate::models::{pitch_class, Note, Segment, TimeSignature};

/// Multiplier for the melodic interval by which a note is approached.
/// Leap arrivals by fourth, fifth or octave assert themselves; stepwise
/// motion is discounted.
pub fn approach_multiplier(interval: Option<i32>) -> f64 {
    let Some(interval) = interval else {
        return 1.0;
    };
    match interval.abs() {
        0 => 1.0,
        1 | 2 => 0.8,
        3 | 4 => 1.0,
        5 | 7 | 12 => 1.2,
        _ => 1.0,
    }
}

/// Split notes at every beat boundary they span.
///
/// Each note's approach multiplier comes from the nearest note (any voice)
/// with a strictly earlier onset; every slice inherits it. The result is
/// sorted by (onset, pitch). Pure and deterministic: the same note list
/// always yields the same segments.
pub fn build_segments(notes: &[Note], sig: &TimeSignature) -> Vec<Segment> {
    let mut ordered = notes.to_vec();
    ordered.sort_by(|a, b| a.onset.total_cmp(&b.onset).then(a.pitch.cmp(&b.pitch)));

    let beat_len = sig.beat_len();
    let mut segments = Vec::new();
    for (i, note) in ordered.iter().enumerate() {
        let prev = ordered[..i].iter().rev().find(|p| p.onset < note.onset);
        let approach = approach_multiplier(prev.map(|p| note.pitch - p.pitch));

        let end = note.end();
        let mut cursor = note.onset;
        while cursor < end - 1e-9 {
            let beat_index = (cursor / beat_len).floor();
            let next_boundary = (beat_index + 1.0) * beat_len;
            let slice_end = end.min(next_boundary);
            if slice_end <= cursor {
                break;
            }
            segments.push(Segment {
                pitch: note.pitch,
                pitch_class: pitch_class(note.pitch),
                onset: cursor,
                duration: slice_end - cursor,
                approach,
            });
            cursor = slice_end;
        }
    }
    segments.sort_by(|a, b| a.onset.total_cmp(&b.onset).then(a.pitch.cmp(&b.pitch)));
    segments
}
