//! Harmonic progression inference for short melodic passages
//!
//! Given one or two melodic voices as timed pitches, this crate infers the
//! most plausible chord-per-beat progression. Notes are sliced into
//! sub-beat segments, weighted by a time-decayed perceptual salience model
//! (metric position, duration, melodic approach), scored against a fixed
//! catalogue of twelve chord qualities, and searched by four competing
//! dynamic-programming strategies; the best-scoring strategy wins.
//!
//! The core is a pure, synchronous library: no shared state, no I/O. The
//! `parse` module is a thin convenience layer for SPN text input.

pub mod analysis;
pub mod error;
pub mod models;
pub mod parse;
pub mod salience;
pub mod scoring;
pub mod search;

// Re-export the primary API surface
pub use analysis::{analyze, progression_string, unharmonised_notes, Analysis, BeatChoice, StrategySummary};
pub use error::AnalysisError;
pub use models::{AnalysisParams, Note, TimeSignature};
pub use search::{Strategy, StrategyRun, StrategyTrace};
