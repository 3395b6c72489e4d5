//! Path-dependent DP: chord runs claim notes up to a boundary
//!
//! The state key folds in the latest onset already claimed by the active
//! chord run. Continuing the same chord sees every visible note; switching
//! chords only sees notes strictly after the predecessor's boundary, so a
//! note claimed by one chord run can never also support a different one.

use indexmap::IndexMap;

use crate::error::AnalysisError;
use crate::models::{AnalysisParams, Segment, TimeSignature, WeightedNote, CHORD_QUALITIES};
use crate::salience::{collect, SaliencePolicy};
use crate::scoring::{find_candidates, pitch_class_set, score_chord};
use crate::search::{PathStep, PdState, PdTable, NO_CHORD_KEY};

/// Full state key: chord key (or "null") plus the claim boundary.
fn state_key(chord_key: &str, boundary: f64) -> String {
    format!("{chord_key}|{boundary}")
}

/// Run the path-dependent DP over `num_beats` beats and backtrack the
/// best final state.
pub fn path_dependent_dp(
    segments: &[Segment],
    num_beats: usize,
    policy: SaliencePolicy,
    sig: &TimeSignature,
    params: &AnalysisParams,
) -> Result<(PdTable, Vec<PathStep>), AnalysisError> {
    let mut table: PdTable = Vec::with_capacity(num_beats);
    for b in 0..num_beats {
        let all_notes = collect(segments, b, policy, sig, params);
        let mut states: IndexMap<String, PdState> = IndexMap::new();

        if b == 0 {
            states.insert(
                state_key(NO_CHORD_KEY, f64::NEG_INFINITY),
                PdState {
                    total: 0.0,
                    prev: None,
                    chord: None,
                    chain: 0,
                    boundary: f64::NEG_INFINITY,
                },
            );
            for c in find_candidates(&all_notes, false, params) {
                let boundary = c.matched_boundary().unwrap_or(f64::NEG_INFINITY);
                let key = state_key(&c.key(), boundary);
                let total = c.penalized_score(params);
                match states.get(&key) {
                    Some(existing) if existing.total >= total => {}
                    _ => {
                        states.insert(
                            key,
                            PdState { total, prev: None, chord: Some(c), chain: 1, boundary },
                        );
                    }
                }
            }
            table.push(states);
            continue;
        }

        let pcs = pitch_class_set(&all_notes);
        let prev_states = &table[b - 1];
        for (prev_key, prev_state) in prev_states {
            let prev_chord_key = prev_state.chord.as_ref().map(|c| c.key());

            // Carry forward as "no chord", keeping the boundary
            let null_key = state_key(NO_CHORD_KEY, prev_state.boundary);
            match states.get(&null_key) {
                Some(existing) if existing.total >= prev_state.total => {}
                _ => {
                    states.insert(
                        null_key,
                        PdState {
                            total: prev_state.total,
                            prev: Some(prev_key.clone()),
                            chord: None,
                            chain: 0,
                            boundary: prev_state.boundary,
                        },
                    );
                }
            }

            for root in 0..12u8 {
                if pcs & (1 << root) == 0 {
                    continue;
                }
                for quality in CHORD_QUALITIES {
                    let cand_key = format!("{root}-{}", quality.name);
                    let same = prev_chord_key.as_deref() == Some(cand_key.as_str());
                    let result = if same {
                        score_chord(root, quality, &all_notes, false, params)
                    } else {
                        let unclaimed: Vec<WeightedNote> = all_notes
                            .iter()
                            .copied()
                            .filter(|n| n.onset > prev_state.boundary)
                            .collect();
                        score_chord(root, quality, &unclaimed, false, params)
                    };
                    let Some(c) = result else { continue };

                    let chain = if same { prev_state.chain + 1 } else { 1 };
                    let total = prev_state.total + c.penalized_score(params);
                    let boundary = c.matched_boundary().unwrap_or(prev_state.boundary);
                    let key = state_key(&cand_key, boundary);
                    match states.get(&key) {
                        Some(existing) if existing.total >= total => {}
                        _ => {
                            states.insert(
                                key,
                                PdState {
                                    total,
                                    prev: Some(prev_key.clone()),
                                    chord: Some(c),
                                    chain,
                                    boundary,
                                },
                            );
                        }
                    }
                }
            }
        }
        table.push(states);
    }

    let last = table
        .last()
        .ok_or_else(|| AnalysisError::Internal("empty DP table".to_string()))?;
    let best = best_final_key(last)
        .ok_or_else(|| AnalysisError::Internal("no final DP state".to_string()))?
        .to_string();
    let path = backtrack(&table, num_beats - 1, &best)?;
    Ok((table, path))
}

/// Final state with maximal total; chord states preferred over the bare
/// no-chord carryovers, first-seen order breaking exact ties.
pub fn best_final_key(states: &IndexMap<String, PdState>) -> Option<&str> {
    let mut best: Option<(&str, f64)> = None;
    let mut best_chord: Option<(&str, f64)> = None;
    for (key, state) in states {
        if best.map_or(true, |(_, t)| state.total > t) {
            best = Some((key, state.total));
        }
        if state.chord.is_some() && best_chord.map_or(true, |(_, t)| state.total > t) {
            best_chord = Some((key, state.total));
        }
    }
    best_chord.or(best).map(|(key, _)| key)
}

/// Follow predecessor links from a state at `beat` back to beat 0.
/// Path steps expose the chord key without the boundary suffix.
pub fn backtrack(
    table: &PdTable,
    beat: usize,
    state_key: &str,
) -> Result<Vec<PathStep>, AnalysisError> {
    let mut steps = Vec::with_capacity(beat + 1);
    let mut cursor = state_key.to_string();
    for b in (0..=beat).rev() {
        let state = table[b].get(&cursor).ok_or_else(|| {
            AnalysisError::Internal(format!("missing DP state \"{cursor}\" at beat {b}"))
        })?;
        steps.push(PathStep {
            beat: b,
            key: state
                .chord
                .as_ref()
                .map_or_else(|| NO_CHORD_KEY.to_string(), |c| c.key()),
            chord: state.chord.clone(),
            total: state.total,
            chain: state.chain,
            boundary: Some(state.boundary),
        });
        if b > 0 {
            cursor = state.prev.clone().ok_or_else(|| {
                AnalysisError::Internal(format!("state \"{cursor}\" at beat {b} has no predecessor"))
            })?;
        }
    }
    steps.reverse();
    Ok(steps)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Note;
    use crate::salience::build_segments;

    #[test]
    fn test_boundary_recorded_in_states() {
        let sig = TimeSignature::default();
        let params = AnalysisParams::default();
        let segments = build_segments(
            &[Note::new(60, 0.0, 1.0), Note::new(64, 1.0, 1.0), Note::new(67, 2.0, 1.0)],
            &sig,
        );
        let (table, path) =
            path_dependent_dp(&segments, 3, SaliencePolicy::PastOnly, &sig, &params).unwrap();
        assert_eq!(table.len(), 3);
        assert_eq!(path.len(), 3);
        // Any chord state's boundary must be one of its matched onsets.
        for states in &table {
            for state in states.values() {
                if let Some(chord) = &state.chord {
                    let onsets: Vec<f64> = chord.matched.iter().map(|m| m.onset).collect();
                    assert!(onsets.iter().any(|o| *o == state.boundary));
                }
            }
        }
    }

    #[test]
    fn test_no_chord_state_present_every_beat() {
        let sig = TimeSignature::default();
        let params = AnalysisParams::default();
        let segments =
            build_segments(&[Note::new(60, 0.0, 1.0), Note::new(64, 1.0, 1.0)], &sig);
        let (table, _) =
            path_dependent_dp(&segments, 2, SaliencePolicy::Bidirectional, &sig, &params).unwrap();
        for states in &table {
            assert!(states.keys().any(|k| k.starts_with(NO_CHORD_KEY)));
        }
    }
}
