//! Data models for harmonic analysis
//!
//! Notes and time signatures arrive from the parsing layer; segments and
//! weighted notes are derived views used by the salience model and the
//! chord scorer. Everything here is immutable once constructed.

pub mod chord;
pub mod note;
pub mod params;
pub mod segment;

// Re-export commonly used types
pub use chord::{chord_name, pitch_class_name, quality_by_name, ChordQuality, CHORD_QUALITIES, NOTE_NAMES};
pub use note::{pitch_class, Note, TimeSignature};
pub use params::AnalysisParams;
pub use segment::{Segment, WeightedNote};
