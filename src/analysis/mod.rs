//! Analysis entry point and result selection
//!
//! Runs all four search strategies over one note set and reports the one
//! with the highest final total, keeping every strategy's full path and
//! DP tables for diagnostic display.

pub mod progression;

use serde::Serialize;

use crate::error::AnalysisError;
use crate::models::{AnalysisParams, Note, TimeSignature};
use crate::salience::build_segments;
use crate::search::{run_strategy, Strategy, StrategyRun};

pub use progression::{progression_string, unharmonised_notes};

/// The chord chosen at one beat, by display name.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct BeatChoice {
    pub beat: usize,
    /// None when the beat is left unharmonised
    pub chord: Option<String>,
}

/// Compact per-strategy result.
#[derive(Clone, Debug, Serialize)]
pub struct StrategySummary {
    pub strategy: Strategy,
    pub progression: String,
    pub final_total: f64,
    pub beats: Vec<BeatChoice>,
}

/// Full analysis outcome: summaries for ranking plus complete runs
/// (paths and DP tables) for diagnostics.
#[derive(Clone, Debug, Serialize)]
pub struct Analysis {
    pub num_beats: usize,
    pub time_signature: TimeSignature,
    pub runs: Vec<StrategyRun>,
    pub summaries: Vec<StrategySummary>,
    /// Strategy with the strictly greatest final total; first-seen order
    /// breaks ties
    pub best: Strategy,
}

impl Analysis {
    /// Summary of the winning strategy.
    pub fn best_summary(&self) -> &StrategySummary {
        // `best` is always drawn from `summaries`
        self.summaries
            .iter()
            .find(|s| s.strategy == self.best)
            .unwrap_or(&self.summaries[0])
    }
}

/// Infer the chord progression underlying `notes`.
///
/// Fails fast on fewer than two notes; beat count is the ceiling of the
/// latest note end. The same input always produces bit-identical output.
pub fn analyze(
    notes: &[Note],
    sig: TimeSignature,
    params: &AnalysisParams,
) -> Result<Analysis, AnalysisError> {
    if notes.len() < 2 {
        return Err(AnalysisError::NotEnoughNotes(notes.len()));
    }
    let max_end = notes.iter().map(Note::end).fold(0.0_f64, f64::max);
    let num_beats = (max_end.ceil() as usize).max(1);
    let segments = build_segments(notes, &sig);
    log::debug!(
        "analyzing {} notes ({} segments) over {} beats in {}/{}",
        notes.len(),
        segments.len(),
        num_beats,
        sig.numerator,
        sig.denominator
    );

    let mut runs = Vec::with_capacity(Strategy::ALL.len());
    for strategy in Strategy::ALL {
        runs.push(run_strategy(strategy, &segments, num_beats, &sig, params)?);
    }

    let summaries: Vec<StrategySummary> = runs
        .iter()
        .map(|run| StrategySummary {
            strategy: run.strategy,
            progression: progression_string(&run.path),
            final_total: run.final_total,
            beats: run
                .path
                .iter()
                .map(|p| BeatChoice {
                    beat: p.beat,
                    chord: p.chord.as_ref().map(|c| c.name()),
                })
                .collect(),
        })
        .collect();

    let mut best = summaries[0].strategy;
    let mut best_total = summaries[0].final_total;
    for s in &summaries[1..] {
        if s.final_total > best_total {
            best = s.strategy;
            best_total = s.final_total;
        }
    }
    log::info!("best strategy: {} (total {:.3})", best.label(), best_total);

    Ok(Analysis { num_beats, time_signature: sig, runs, summaries, best })
}
