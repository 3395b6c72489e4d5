//! Error types for harmonic analysis
//!
//! Malformed input fails fast before any search runs; internal errors
//! indicate a DP table-construction bug and abort the affected analysis.

use thiserror::Error;

/// Top-level analysis error type
#[derive(Debug, Clone, Error, PartialEq)]
pub enum AnalysisError {
    /// Time signature is not "N/D" with positive integers
    #[error("invalid time signature \"{0}\": expected \"N/D\" with positive integers")]
    InvalidTimeSignature(String),

    /// Analysis needs at least two notes in total
    #[error("need at least 2 notes, got {0}")]
    NotEnoughNotes(usize),

    /// A voice token could not be parsed as a note
    #[error("cannot parse note \"{0}\": use SPN (C4/Eb3/F#5), optional superscript octave (C⁴), optional duration multiplier suffix")]
    InvalidNoteToken(String),

    /// An L:x/y length declaration with a zero numerator or denominator
    #[error("invalid length declaration \"{0}\"")]
    InvalidLengthDeclaration(String),

    /// Internal analysis error (should be rare, indicates a bug)
    #[error("internal analysis error: {0}")]
    Internal(String),
}
