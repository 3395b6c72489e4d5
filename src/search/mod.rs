//! Path search: dynamic programming over the beat timeline
//!
//! Every strategy chooses, per beat, either "no chord" or one chord
//! candidate, maximizing accumulated penalized score. DP tables are
//! insertion-ordered maps so that exact ties keep the first-seen state,
//! which makes every strategy fully deterministic.

pub mod path_dependent;
pub mod simple;
pub mod strategies;

use indexmap::IndexMap;
use serde::Serialize;

use crate::scoring::ChordCandidate;

pub use strategies::{run_strategy, Strategy, StrategyRun, StrategyTrace, TwoPassTrace};

/// State key for the "no chord" choice.
pub const NO_CHORD_KEY: &str = "null";

/// One DP state in a simple (non-path-dependent) table.
///
/// `link` is the predecessor key in forward tables and the successor key
/// in backward tables.
#[derive(Clone, Debug, Serialize)]
pub struct DpState {
    /// Best achievable total ending (or, backward, starting) in this state
    pub total: f64,
    pub link: Option<String>,
    pub chord: Option<ChordCandidate>,
    /// Consecutive beats holding this same chord; diagnostic only, never
    /// fed back into scoring
    pub chain: u32,
}

/// One DP state in a path-dependent table. The boundary (latest onset
/// already claimed by the active chord run) is folded into the state key.
#[derive(Clone, Debug, Serialize)]
pub struct PdState {
    pub total: f64,
    pub prev: Option<String>,
    pub chord: Option<ChordCandidate>,
    pub chain: u32,
    /// Latest onset claimed by the current chord run; negative infinity
    /// when nothing is claimed yet
    pub boundary: f64,
}

/// Per-beat state maps, in beat order.
pub type DpTable = Vec<IndexMap<String, DpState>>;
pub type PdTable = Vec<IndexMap<String, PdState>>;

/// One beat of a backtracked path.
#[derive(Clone, Debug, Serialize)]
pub struct PathStep {
    pub beat: usize,
    /// Chord key ("root-quality") or [`NO_CHORD_KEY`]
    pub key: String,
    pub chord: Option<ChordCandidate>,
    /// Accumulated total through this beat
    pub total: f64,
    pub chain: u32,
    /// Claim boundary, for path-dependent strategies only
    #[serde(skip_serializing_if = "Option::is_none")]
    pub boundary: Option<f64>,
}
