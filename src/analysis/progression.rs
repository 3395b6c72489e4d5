//! Progression strings and unharmonised-note collection

use crate::scoring::NonChordTone;
use crate::search::PathStep;

/// Format a path as a chord progression string. Adjacent identical chords
/// merge into one entry with a repeat count: "C -> G7(x2) -> C". Beats
/// without a chord are dropped; an all-empty path renders "(none)".
pub fn progression_string(path: &[PathStep]) -> String {
    let mut parts: Vec<(String, usize)> = Vec::new();
    for step in path {
        let name = step
            .chord
            .as_ref()
            .map_or_else(|| "-".to_string(), |c| c.name());
        match parts.last_mut() {
            Some((last, count)) if *last == name => *count += 1,
            _ => parts.push((name, 1)),
        }
    }
    let joined = parts
        .iter()
        .filter(|(name, _)| name != "-")
        .map(|(name, count)| {
            if *count > 1 {
                format!("{name}(x{count})")
            } else {
                name.clone()
            }
        })
        .collect::<Vec<_>>()
        .join(" -> ");
    if joined.is_empty() {
        "(none)".to_string()
    } else {
        joined
    }
}

/// All non-chord tones with a positive penalty across a path.
pub fn unharmonised_notes(path: &[PathStep]) -> Vec<NonChordTone> {
    let mut notes = Vec::new();
    for step in path {
        if let Some(chord) = &step.chord {
            for n in &chord.nct {
                if n.penalty > 0.0 {
                    notes.push(*n);
                }
            }
        }
    }
    notes
}
