//! Parsing module: SPN note input
//!
//! Thin input layer ahead of the analysis core: converts voice strings
//! into timed note lists. The core itself only consumes parsed notes.

pub mod spn;
pub mod voice;

// Re-export commonly used functions
pub use spn::{midi_to_spn, parse_note_token, parse_spn};
pub use voice::{merge_voices, parse_length_decl, parse_voice};
