//! Salience model: metric weighting and time-decayed collection
//!
//! A segment's salience as heard from an evaluation beat combines its
//! duration (past a passing-note threshold), the metric strength of its
//! onset, how it was approached melodically, and a linear decay with the
//! beat distance from its home beat.

use serde::{Deserialize, Serialize};

use crate::models::{AnalysisParams, Segment, TimeSignature, WeightedNote};

/// Which segments an evaluation beat may observe.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum SaliencePolicy {
    /// Only segments at or before the evaluation beat (causal)
    PastOnly,
    /// All segments, decayed by absolute beat distance
    Bidirectional,
}

/// Metric strength of an onset within the bar.
pub fn metric_weight(onset: f64, sig: &TimeSignature) -> f64 {
    let bar_len = sig.bar_len();
    let beat_len = sig.beat_len();
    let eps = 0.01;

    let pos = onset.rem_euclid(bar_len);
    if pos < eps || (pos - bar_len).abs() < eps {
        return 1.2; // bar downbeat
    }
    // Secondary accent mid-bar, where musically plausible
    if sig.numerator >= 4 && sig.numerator % 2 == 0 && (pos - bar_len / 2.0).abs() < eps {
        return 1.0;
    }
    let beat_pos = (pos / beat_len).fract();
    if beat_pos < eps || (beat_pos - 1.0).abs() < eps {
        return 0.75; // other beat boundary
    }
    let half_beat = beat_len / 2.0;
    if half_beat > 0.0 && (pos / half_beat).fract().abs() < eps {
        return 0.5; // exact half-beat
    }
    0.4
}

/// Salience of one segment under a given decay factor.
fn segment_salience(seg: &Segment, decay: f64, sig: &TimeSignature, params: &AnalysisParams) -> f64 {
    let raw = (seg.duration - params.passing_note_threshold)
        * metric_weight(seg.onset, sig)
        * seg.approach;
    raw.max(params.min_salience) * decay
}

/// Collect the weighted notes visible from `beat` under `policy`.
/// Segments whose decay reaches zero are excluded. Expects `segments`
/// sorted by onset (as the segment builder produces them).
pub fn collect(
    segments: &[Segment],
    beat: usize,
    policy: SaliencePolicy,
    sig: &TimeSignature,
    params: &AnalysisParams,
) -> Vec<WeightedNote> {
    let mut out = Vec::new();
    for seg in segments {
        let home_beat = seg.onset.floor() as i64;
        let distance = match policy {
            SaliencePolicy::PastOnly => {
                if home_beat > beat as i64 {
                    break;
                }
                (beat as i64 - home_beat) as f64
            }
            SaliencePolicy::Bidirectional => (beat as i64 - home_beat).abs() as f64,
        };
        let decay = (1.0 - distance * params.decay_rate).max(0.0);
        if decay <= 0.0 {
            continue;
        }
        out.push(WeightedNote {
            pitch: seg.pitch,
            pitch_class: seg.pitch_class,
            onset: seg.onset,
            salience: segment_salience(seg, decay, sig, params),
            decay,
        });
    }
    out
}
