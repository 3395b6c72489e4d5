//! Chord scoring: matching weighted notes against the quality catalogue
//!
//! A candidate chord collects the salience of matching notes (weighted by
//! which chord member they hit), pays for non-chord tones, and scales the
//! whole score by what sits in the bass. Candidates are only produced when
//! every required interval of the quality is present among the sounding
//! pitch classes and at least two notes are supplied.

use serde::Serialize;

use crate::models::{chord_name, AnalysisParams, ChordQuality, WeightedNote, CHORD_QUALITIES};

/// A note that matched a chord member.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct MatchedNote {
    pub pitch: i32,
    pub pitch_class: u8,
    pub onset: f64,
    pub salience: f64,
    /// Member weight for the interval this note landed on
    pub weight: f64,
    /// salience * weight
    pub contribution: f64,
}

/// A sounding note outside the chord's defining intervals.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct NonChordTone {
    pub pitch: i32,
    pub pitch_class: u8,
    pub onset: f64,
    pub salience: f64,
    /// Score subtracted for this note (zero under positive-only scoring)
    pub penalty: f64,
}

/// A scored chord hypothesis at one evaluation beat.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ChordCandidate {
    /// Root pitch class (0-11)
    pub root: u8,
    /// Catalogue quality name
    pub quality: &'static str,
    /// (matched salience - NCT penalty) * bass multiplier
    pub score: f64,
    pub matched: Vec<MatchedNote>,
    pub nct: Vec<NonChordTone>,
    pub matched_salience: f64,
    pub nct_penalty: f64,
    pub bass_mult: f64,
    pub complexity: u32,
}

impl ChordCandidate {
    /// Key identifying root + quality, e.g. "0-major".
    pub fn key(&self) -> String {
        format!("{}-{}", self.root, self.quality)
    }

    /// Display name, e.g. "C", "Am7".
    pub fn name(&self) -> String {
        chord_name(self.root, self.quality)
    }

    /// Score after the flat complexity penalty used by the path search.
    pub fn penalized_score(&self, params: &AnalysisParams) -> f64 {
        self.score - self.complexity as f64 * params.complexity_penalty
    }

    /// Latest onset among matched notes, if any.
    pub fn matched_boundary(&self) -> Option<f64> {
        self.matched
            .iter()
            .map(|m| m.onset)
            .fold(None, |acc: Option<f64>, o| Some(acc.map_or(o, |a| a.max(o))))
    }

    /// Same harmonic choice (root and quality), ignoring score detail.
    pub fn is_same_chord(&self, other: &ChordCandidate) -> bool {
        self.root == other.root && self.quality == other.quality
    }
}

/// Weight of a chord member by its interval above the root.
pub fn member_weight(interval: i32) -> f64 {
    match interval.rem_euclid(12) {
        0 => 1.1,
        3 | 4 => 1.0,
        7 | 10 | 11 => 0.8,
        _ => 0.6,
    }
}

/// Bitset of pitch classes present among `notes`.
pub(crate) fn pitch_class_set(notes: &[WeightedNote]) -> u16 {
    notes.iter().fold(0u16, |set, n| set | 1 << n.pitch_class)
}

/// Score one (root, quality) hypothesis against a set of weighted notes.
///
/// Returns `None` when a required interval is absent or fewer than two
/// notes are supplied; otherwise always returns a candidate, even with a
/// negative score. Under `positive_only`, non-chord tones cost nothing
/// (used for exploratory passes before any note is claimed).
pub fn score_chord(
    root: u8,
    quality: &ChordQuality,
    notes: &[WeightedNote],
    positive_only: bool,
    params: &AnalysisParams,
) -> Option<ChordCandidate> {
    let pcs = pitch_class_set(notes);
    for req in quality.required {
        if pcs & (1 << ((root + req) % 12)) == 0 {
            return None;
        }
    }
    if notes.len() < 2 {
        return None;
    }

    let mut lowest_pitch = i32::MAX;
    let mut lowest_interval = 0u8;
    for n in notes {
        if n.pitch < lowest_pitch {
            lowest_pitch = n.pitch;
            lowest_interval = (n.pitch_class + 12 - root) % 12;
        }
    }
    let bass_mult = match lowest_interval {
        0 => 1.1,
        7 => 0.9,
        10 | 11 => 0.8,
        _ => 1.0,
    };

    let mut matched = Vec::new();
    let mut nct = Vec::new();
    let mut matched_salience = 0.0;
    let mut nct_penalty = 0.0;
    for n in notes {
        let interval = (n.pitch_class + 12 - root) % 12;
        if quality.intervals.contains(&interval) {
            let weight = member_weight(interval as i32);
            matched_salience += n.salience * weight;
            matched.push(MatchedNote {
                pitch: n.pitch,
                pitch_class: n.pitch_class,
                onset: n.onset,
                salience: n.salience,
                weight,
                contribution: n.salience * weight,
            });
        } else {
            let penalty = if positive_only {
                0.0
            } else {
                (n.salience - params.non_chord_tone_floor).max(0.0)
            };
            nct_penalty += penalty;
            nct.push(NonChordTone {
                pitch: n.pitch,
                pitch_class: n.pitch_class,
                onset: n.onset,
                salience: n.salience,
                penalty,
            });
        }
    }

    Some(ChordCandidate {
        root,
        quality: quality.name,
        score: (matched_salience - nct_penalty) * bass_mult,
        matched,
        nct,
        matched_salience,
        nct_penalty,
        bass_mult,
        complexity: quality.complexity,
    })
}

/// Enumerate every viable (root, quality) candidate for a note set,
/// sorted by score descending. Roots are restricted to pitch classes
/// actually present.
pub fn find_candidates(
    notes: &[WeightedNote],
    positive_only: bool,
    params: &AnalysisParams,
) -> Vec<ChordCandidate> {
    let pcs = pitch_class_set(notes);
    let mut candidates = Vec::new();
    for root in 0..12u8 {
        if pcs & (1 << root) == 0 {
            continue;
        }
        for quality in CHORD_QUALITIES {
            if let Some(c) = score_chord(root, quality, notes, positive_only, params) {
                candidates.push(c);
            }
        }
    }
    candidates.sort_by(|a, b| b.score.total_cmp(&a.score));
    candidates
}
