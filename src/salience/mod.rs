//! Salience module: segment preprocessing and perceptual weighting
//!
//! The segment builder slices notes at beat boundaries; the collector
//! turns segments into weighted notes as observed from an evaluation
//! beat under one of two causality policies. The time signature is an
//! explicit parameter throughout so analyses stay reentrant.

pub mod collect;
pub mod segments;

// Re-export commonly used functions
pub use collect::{collect, metric_weight, SaliencePolicy};
pub use segments::{approach_multiplier, build_segments};
