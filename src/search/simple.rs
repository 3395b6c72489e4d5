//! Forward and backward DP over per-beat candidate sets
//!
//! Chord changes carry no transition penalty, so each beat's best total is
//! the best predecessor total plus the beat's own penalized score. The
//! "no chord" state carries the best predecessor total forward unchanged.

use indexmap::IndexMap;

use crate::error::AnalysisError;
use crate::models::AnalysisParams;
use crate::scoring::ChordCandidate;
use crate::search::{DpState, DpTable, PathStep, NO_CHORD_KEY};

/// Build a forward DP table over per-beat candidate lists.
pub fn forward_dp(beat_data: &[Vec<ChordCandidate>], params: &AnalysisParams) -> DpTable {
    let mut table: DpTable = Vec::with_capacity(beat_data.len());
    for (b, candidates) in beat_data.iter().enumerate() {
        let mut states: IndexMap<String, DpState> = IndexMap::new();
        if b == 0 {
            states.insert(
                NO_CHORD_KEY.to_string(),
                DpState { total: 0.0, link: None, chord: None, chain: 0 },
            );
            for c in candidates {
                states.insert(
                    c.key(),
                    DpState {
                        total: c.penalized_score(params),
                        link: None,
                        chord: Some(c.clone()),
                        chain: 1,
                    },
                );
            }
            table.push(states);
            continue;
        }

        let prev = &table[b - 1];
        let mut best_null_total = f64::NEG_INFINITY;
        let mut best_null_link = None;
        for (pk, ps) in prev {
            if ps.total > best_null_total {
                best_null_total = ps.total;
                best_null_link = Some(pk.clone());
            }
        }
        states.insert(
            NO_CHORD_KEY.to_string(),
            DpState { total: best_null_total, link: best_null_link, chord: None, chain: 0 },
        );

        for c in candidates {
            let step = c.penalized_score(params);
            let mut best_total = f64::NEG_INFINITY;
            let mut best_link = None;
            let mut best_chain = 1;
            for (pk, ps) in prev {
                let chain = match &ps.chord {
                    Some(pc) if pc.is_same_chord(c) => ps.chain + 1,
                    _ => 1,
                };
                let total = ps.total + step;
                if total > best_total {
                    best_total = total;
                    best_link = Some(pk.clone());
                    best_chain = chain;
                }
            }
            let key = c.key();
            match states.get(&key) {
                Some(existing) if existing.total >= best_total => {}
                _ => {
                    states.insert(
                        key,
                        DpState {
                            total: best_total,
                            link: best_link,
                            chord: Some(c.clone()),
                            chain: best_chain,
                        },
                    );
                }
            }
        }
        table.push(states);
    }
    table
}

/// Build a backward DP table (totals accumulate from the final beat).
pub fn backward_dp(beat_data: &[Vec<ChordCandidate>], params: &AnalysisParams) -> DpTable {
    let n = beat_data.len();
    let mut table: DpTable = vec![IndexMap::new(); n];
    for b in (0..n).rev() {
        let candidates = &beat_data[b];
        let mut states: IndexMap<String, DpState> = IndexMap::new();
        if b == n - 1 {
            states.insert(
                NO_CHORD_KEY.to_string(),
                DpState { total: 0.0, link: None, chord: None, chain: 0 },
            );
            for c in candidates {
                states.insert(
                    c.key(),
                    DpState {
                        total: c.penalized_score(params),
                        link: None,
                        chord: Some(c.clone()),
                        chain: 1,
                    },
                );
            }
            table[b] = states;
            continue;
        }

        let next = &table[b + 1];
        let mut best_null_total = f64::NEG_INFINITY;
        let mut best_null_link = None;
        for (nk, ns) in next {
            if ns.total > best_null_total {
                best_null_total = ns.total;
                best_null_link = Some(nk.clone());
            }
        }
        states.insert(
            NO_CHORD_KEY.to_string(),
            DpState { total: best_null_total, link: best_null_link, chord: None, chain: 0 },
        );

        for c in candidates {
            let step = c.penalized_score(params);
            let mut best_total = f64::NEG_INFINITY;
            let mut best_link = None;
            let mut best_chain = 1;
            for (nk, ns) in next {
                let chain = match &ns.chord {
                    Some(nc) if nc.is_same_chord(c) => ns.chain + 1,
                    _ => 1,
                };
                let total = ns.total + step;
                if total > best_total {
                    best_total = total;
                    best_link = Some(nk.clone());
                    best_chain = chain;
                }
            }
            let key = c.key();
            match states.get(&key) {
                Some(existing) if existing.total >= best_total => {}
                _ => {
                    states.insert(
                        key,
                        DpState {
                            total: best_total,
                            link: best_link,
                            chord: Some(c.clone()),
                            chain: best_chain,
                        },
                    );
                }
            }
        }
        table[b] = states;
    }
    table
}

/// Final state with maximal total. Chord states are preferred; the bare
/// "no chord" state only wins when no chord state exists at this beat.
/// First-seen insertion order breaks exact ties.
pub fn best_final_key(states: &IndexMap<String, DpState>) -> Option<&str> {
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
/// A missing predecessor is a table-construction bug and aborts.
pub fn backtrack(table: &DpTable, beat: usize, key: &str) -> Result<Vec<PathStep>, AnalysisError> {
    let mut steps = Vec::with_capacity(beat + 1);
    let mut cursor = key.to_string();
    for b in (0..=beat).rev() {
        let state = table[b].get(&cursor).ok_or_else(|| {
            AnalysisError::Internal(format!("missing DP state \"{cursor}\" at beat {b}"))
        })?;
        steps.push(PathStep {
            beat: b,
            key: cursor.clone(),
            chord: state.chord.clone(),
            total: state.total,
            chain: state.chain,
            boundary: None,
        });
        if b > 0 {
            cursor = state.link.clone().ok_or_else(|| {
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
    use crate::models::quality_by_name;
    use crate::scoring::score_chord;
    use crate::models::WeightedNote;

    fn params() -> AnalysisParams {
        AnalysisParams::default()
    }

    fn c_major(score_scale: f64) -> ChordCandidate {
        let notes = vec![
            WeightedNote { pitch: 60, pitch_class: 0, onset: 0.0, salience: score_scale, decay: 1.0 },
            WeightedNote { pitch: 64, pitch_class: 4, onset: 0.0, salience: score_scale, decay: 1.0 },
        ];
        score_chord(0, quality_by_name("major").unwrap(), &notes, false, &params()).unwrap()
    }

    fn g_major(score_scale: f64) -> ChordCandidate {
        let notes = vec![
            WeightedNote { pitch: 67, pitch_class: 7, onset: 0.0, salience: score_scale, decay: 1.0 },
            WeightedNote { pitch: 71, pitch_class: 11, onset: 0.0, salience: score_scale, decay: 1.0 },
        ];
        score_chord(7, quality_by_name("major").unwrap(), &notes, false, &params()).unwrap()
    }

    #[test]
    fn test_every_beat_has_a_no_chord_state() {
        let beat_data = vec![vec![], vec![c_major(1.0)], vec![]];
        let table = forward_dp(&beat_data, &params());
        for states in &table {
            assert!(states.contains_key(NO_CHORD_KEY));
        }
        // With no candidates anywhere after beat 1, the no-chord total
        // carries the accumulated maximum forward unchanged.
        assert_eq!(table[2][NO_CHORD_KEY].total, table[1].values().map(|s| s.total).fold(f64::NEG_INFINITY, f64::max));
    }

    #[test]
    fn test_forward_dp_accumulates_and_chains() {
        let beat_data = vec![vec![c_major(1.0)], vec![c_major(1.0)], vec![g_major(2.0)]];
        let table = forward_dp(&beat_data, &params());
        let c_key = beat_data[0][0].key();
        assert_eq!(table[1][&c_key].chain, 2);
        let g_key = beat_data[2][0].key();
        assert_eq!(table[2][&g_key].chain, 1);
        let expected = beat_data[0][0].penalized_score(&params())
            + beat_data[1][0].penalized_score(&params())
            + beat_data[2][0].penalized_score(&params());
        assert!((table[2][&g_key].total - expected).abs() < 1e-12);
    }

    #[test]
    fn test_backtrack_follows_predecessors() {
        let beat_data = vec![vec![c_major(1.0)], vec![g_major(2.0)]];
        let table = forward_dp(&beat_data, &params());
        let best = best_final_key(&table[1]).unwrap().to_string();
        let path = backtrack(&table, 1, &best).unwrap();
        assert_eq!(path.len(), 2);
        assert_eq!(path[0].beat, 0);
        assert_eq!(path[1].key, best);
    }

    #[test]
    fn test_best_final_key_prefers_chord_states() {
        // A negative-scoring chord still outranks the bare no-chord state.
        let mut weak = c_major(0.01);
        weak.score = -0.5;
        let beat_data = vec![vec![weak]];
        let table = forward_dp(&beat_data, &params());
        let best = best_final_key(&table[0]).unwrap();
        assert_ne!(best, NO_CHORD_KEY);
    }

    #[test]
    fn test_backward_dp_mirrors_forward() {
        let beat_data = vec![vec![c_major(1.0)], vec![c_major(1.0)]];
        let fwd = forward_dp(&beat_data, &params());
        let bwd = backward_dp(&beat_data, &params());
        let key = beat_data[0][0].key();
        // Total through both beats is the same seen from either end.
        assert!((fwd[1][&key].total - bwd[0][&key].total).abs() < 1e-12);
    }
}
