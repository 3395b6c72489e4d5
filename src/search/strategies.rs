//! The four competing search strategies
//!
//! A and D run the path-dependent DP (bidirectional and past-only salience
//! respectively). B and C are two-pass: a positive-only pass 1 produces a
//! provisional path whose note claims constrain pass 2's full-scoring
//! forward DP. B's pass 1 combines a forward and a backward DP per beat;
//! C's pass 1 is forward-only.

use serde::{Deserialize, Serialize};

use crate::error::AnalysisError;
use crate::models::{AnalysisParams, Segment, TimeSignature, WeightedNote, CHORD_QUALITIES};
use crate::salience::{collect, SaliencePolicy};
use crate::scoring::{find_candidates, pitch_class_set, score_chord, ChordCandidate};
use crate::search::path_dependent::path_dependent_dp;
use crate::search::simple::{backtrack, backward_dp, best_final_key, forward_dp};
use crate::search::{DpTable, PathStep, PdTable, NO_CHORD_KEY};

/// The four search strategies, in ranking order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Strategy {
    /// A: bidirectional salience, path-dependent claim boundary
    BidirectionalBoundary,
    /// B: two-pass, pass 1 combines forward and backward DP
    CombinedTwoPass,
    /// C: two-pass, pass 1 forward-only
    ForwardTwoPass,
    /// D: past-only salience, path-dependent claim boundary
    PastOnlyBoundary,
}

impl Strategy {
    pub const ALL: [Strategy; 4] = [
        Strategy::BidirectionalBoundary,
        Strategy::CombinedTwoPass,
        Strategy::ForwardTwoPass,
        Strategy::PastOnlyBoundary,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Strategy::BidirectionalBoundary => "A - bidirectional, path-dependent boundary",
            Strategy::CombinedTwoPass => "B - forward+backward combined two-pass",
            Strategy::ForwardTwoPass => "C - forward-only two-pass",
            Strategy::PastOnlyBoundary => "D - past-only, path-dependent boundary",
        }
    }
}

/// Retained DP tables for diagnostic display.
#[derive(Clone, Debug, Serialize)]
pub enum StrategyTrace {
    PathDependent { table: PdTable },
    TwoPass(TwoPassTrace),
}

/// Everything a two-pass strategy computed along the way.
#[derive(Clone, Debug, Serialize)]
pub struct TwoPassTrace {
    /// Provisional path from the positive-only pass 1
    pub pass1_path: Vec<PathStep>,
    pub pass1_forward: DpTable,
    /// Present for the combined strategy only
    pub pass1_backward: Option<DpTable>,
    pub pass2_table: DpTable,
    pub pass1_candidates: Vec<Vec<ChordCandidate>>,
    pub pass2_candidates: Vec<Vec<ChordCandidate>>,
}

/// Outcome of one strategy over one segment set.
#[derive(Clone, Debug, Serialize)]
pub struct StrategyRun {
    pub strategy: Strategy,
    pub path: Vec<PathStep>,
    pub final_total: f64,
    pub trace: StrategyTrace,
}

/// Run one strategy over a segment set.
pub fn run_strategy(
    strategy: Strategy,
    segments: &[Segment],
    num_beats: usize,
    sig: &TimeSignature,
    params: &AnalysisParams,
) -> Result<StrategyRun, AnalysisError> {
    match strategy {
        Strategy::BidirectionalBoundary => {
            path_dependent(strategy, SaliencePolicy::Bidirectional, segments, num_beats, sig, params)
        }
        Strategy::CombinedTwoPass => two_pass(strategy, true, segments, num_beats, sig, params),
        Strategy::ForwardTwoPass => two_pass(strategy, false, segments, num_beats, sig, params),
        Strategy::PastOnlyBoundary => {
            path_dependent(strategy, SaliencePolicy::PastOnly, segments, num_beats, sig, params)
        }
    }
}

fn path_dependent(
    strategy: Strategy,
    policy: SaliencePolicy,
    segments: &[Segment],
    num_beats: usize,
    sig: &TimeSignature,
    params: &AnalysisParams,
) -> Result<StrategyRun, AnalysisError> {
    let (table, path) = path_dependent_dp(segments, num_beats, policy, sig, params)?;
    let final_total = path.last().map_or(f64::NEG_INFINITY, |p| p.total);
    Ok(StrategyRun {
        strategy,
        path,
        final_total,
        trace: StrategyTrace::PathDependent { table },
    })
}

fn two_pass(
    strategy: Strategy,
    with_backward: bool,
    segments: &[Segment],
    num_beats: usize,
    sig: &TimeSignature,
    params: &AnalysisParams,
) -> Result<StrategyRun, AnalysisError> {
    // Pass 1: positive-only scoring; penalties are withheld because no
    // note has been assigned to any chord yet.
    let mut pass1_candidates = Vec::with_capacity(num_beats);
    for b in 0..num_beats {
        let notes = collect(segments, b, SaliencePolicy::PastOnly, sig, params);
        pass1_candidates.push(find_candidates(&notes, true, params));
    }
    let pass1_forward = forward_dp(&pass1_candidates, params);

    let (pass1_backward, pass1_path) = if with_backward {
        let bwd = backward_dp(&pass1_candidates, params);
        let mut path = Vec::with_capacity(num_beats);
        for b in 0..num_beats {
            let mut best_key = NO_CHORD_KEY.to_string();
            let mut best_combined = f64::NEG_INFINITY;
            let mut best_chord: Option<ChordCandidate> = None;
            for (key, forward_state) in &pass1_forward[b] {
                let Some(backward_state) = bwd[b].get(key) else {
                    continue;
                };
                // Both totals include this beat's own score once each.
                let local = forward_state
                    .chord
                    .as_ref()
                    .map_or(0.0, |c| c.penalized_score(params));
                let combined = forward_state.total + backward_state.total - local;
                if combined > best_combined {
                    best_combined = combined;
                    best_key = key.clone();
                    best_chord = forward_state.chord.clone();
                }
            }
            path.push(PathStep {
                beat: b,
                key: best_key,
                chord: best_chord,
                total: best_combined,
                chain: 0,
                boundary: None,
            });
        }
        (Some(bwd), path)
    } else {
        let best = best_final_key(&pass1_forward[num_beats - 1])
            .ok_or_else(|| AnalysisError::Internal("no pass-1 final state".to_string()))?
            .to_string();
        (None, backtrack(&pass1_forward, num_beats - 1, &best)?)
    };

    // Note claims made by the provisional path: chord key plus the onsets
    // of its matched notes, per beat.
    let claims: Vec<(String, Vec<f64>)> = pass1_path
        .iter()
        .map(|p| match &p.chord {
            Some(c) => (c.key(), c.matched.iter().map(|m| m.onset).collect()),
            None => (NO_CHORD_KEY.to_string(), Vec::new()),
        })
        .collect();

    // Pass 2: full scoring, but a candidate does not pay for notes the
    // provisional path already assigned to a different chord before that
    // chord's claim boundary.
    let mut pass2_candidates = Vec::with_capacity(num_beats);
    for b in 0..num_beats {
        let all_notes = collect(segments, b, SaliencePolicy::PastOnly, sig, params);
        let pcs = pitch_class_set(&all_notes);
        let mut candidates = Vec::new();
        for root in 0..12u8 {
            if pcs & (1 << root) == 0 {
                continue;
            }
            for quality in CHORD_QUALITIES {
                let cand_key = format!("{root}-{}", quality.name);
                let mut boundary = f64::NEG_INFINITY;
                for (claimed_by, onsets) in &claims[..b] {
                    if claimed_by == &cand_key || claimed_by == NO_CHORD_KEY {
                        continue;
                    }
                    for onset in onsets {
                        if *onset > boundary {
                            boundary = *onset;
                        }
                    }
                }
                let visible: Vec<WeightedNote> = all_notes
                    .iter()
                    .copied()
                    .filter(|n| {
                        let note_beat = n.onset.floor() as usize;
                        (note_beat < claims.len() && claims[note_beat].0 == cand_key)
                            || n.onset > boundary
                    })
                    .collect();
                if let Some(c) = score_chord(root, quality, &visible, false, params) {
                    candidates.push(c);
                }
            }
        }
        candidates.sort_by(|a, b| b.score.total_cmp(&a.score));
        pass2_candidates.push(candidates);
    }

    let pass2_table = forward_dp(&pass2_candidates, params);
    let best = best_final_key(&pass2_table[num_beats - 1])
        .ok_or_else(|| AnalysisError::Internal("no pass-2 final state".to_string()))?
        .to_string();
    let path = backtrack(&pass2_table, num_beats - 1, &best)?;
    let final_total = path.last().map_or(f64::NEG_INFINITY, |p| p.total);

    Ok(StrategyRun {
        strategy,
        path,
        final_total,
        trace: StrategyTrace::TwoPass(TwoPassTrace {
            pass1_path,
            pass1_forward,
            pass1_backward,
            pass2_table,
            pass1_candidates,
            pass2_candidates,
        }),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Note;
    use crate::salience::build_segments;

    fn run_all(notes: &[Note], num_beats: usize) -> Vec<StrategyRun> {
        let sig = TimeSignature::default();
        let params = AnalysisParams::default();
        let segments = build_segments(notes, &sig);
        Strategy::ALL
            .iter()
            .map(|s| run_strategy(*s, &segments, num_beats, &sig, &params).unwrap())
            .collect()
    }

    #[test]
    fn test_all_strategies_produce_full_paths() {
        let notes = vec![
            Note::new(60, 0.0, 1.0),
            Note::new(64, 1.0, 1.0),
            Note::new(67, 2.0, 1.0),
        ];
        for run in run_all(&notes, 3) {
            assert_eq!(run.path.len(), 3, "{}", run.strategy.label());
            for (b, step) in run.path.iter().enumerate() {
                assert_eq!(step.beat, b);
            }
        }
    }

    #[test]
    fn test_two_pass_traces_retain_pass1() {
        let notes = vec![Note::new(60, 0.0, 1.0), Note::new(64, 1.0, 1.0)];
        for run in run_all(&notes, 2) {
            match (&run.strategy, &run.trace) {
                (Strategy::CombinedTwoPass, StrategyTrace::TwoPass(trace)) => {
                    assert!(trace.pass1_backward.is_some());
                    assert_eq!(trace.pass1_path.len(), 2);
                }
                (Strategy::ForwardTwoPass, StrategyTrace::TwoPass(trace)) => {
                    assert!(trace.pass1_backward.is_none());
                    assert_eq!(trace.pass1_path.len(), 2);
                }
                (Strategy::BidirectionalBoundary | Strategy::PastOnlyBoundary,
                    StrategyTrace::PathDependent { table }) => {
                    assert_eq!(table.len(), 2);
                }
                (s, _) => panic!("unexpected trace shape for {}", s.label()),
            }
        }
    }
}
