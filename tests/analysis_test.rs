// End-to-end analysis scenarios: SPN voices in, progressions out

use harmonic_lab::parse::{merge_voices, parse_voice};
use harmonic_lab::{analyze, Analysis, AnalysisParams, TimeSignature};

/// Helper to run a one- or two-voice analysis with quarter-note defaults
fn run(v1: &str, v2: &str) -> Analysis {
    let v1 = parse_voice(v1, 1.0).unwrap();
    let v2 = parse_voice(v2, 1.0).unwrap();
    let notes = merge_voices(v1, v2);
    analyze(&notes, TimeSignature::default(), &AnalysisParams::default()).unwrap()
}

#[test]
fn test_arpeggiated_c_major_agrees_across_strategies() {
    // C4 E4 G4 C4, quarters in 4/4: no competing chord tone anywhere.
    let analysis = run("C4 E4 G4 C4", "");
    assert_eq!(analysis.num_beats, 4);
    for summary in &analysis.summaries {
        assert_eq!(summary.progression, "C", "{:?}", summary.strategy);
        assert_eq!(summary.beats.len(), 4);
        // The final beat always carries the chord.
        assert_eq!(summary.beats[3].chord.as_deref(), Some("C"));
    }
    assert_eq!(analysis.best_summary().progression, "C");
    assert!(analysis.best_summary().final_total > 0.0);
}

#[test]
fn test_bidirectional_strategy_harmonises_the_first_beat() {
    // Past-only strategies see a single note at beat 0 (no candidates);
    // the bidirectional strategy already sees the whole arpeggio.
    let analysis = run("C4 E4 G4 C4", "");
    let a = &analysis.summaries[0];
    assert_eq!(a.strategy, harmonic_lab::Strategy::BidirectionalBoundary);
    for beat in &a.beats {
        assert_eq!(beat.chord.as_deref(), Some("C"), "beat {}", beat.beat);
    }
}

#[test]
fn test_doubled_root_in_bass_gets_bass_multiplier() {
    // V1 arpeggiates C major while V2 pedals C3 below it.
    let analysis = run("C4 E4 G4", "C3 C3 C3");
    for strategy_run in &analysis.runs {
        let mut saw_chord = false;
        for step in &strategy_run.path {
            if let Some(chord) = &step.chord {
                saw_chord = true;
                assert_eq!(chord.root, 0, "{:?}", strategy_run.strategy);
                assert_eq!(chord.quality, "major");
                assert_eq!(chord.bass_mult, 1.1, "root in bass");
            }
        }
        assert!(saw_chord, "{:?} found no chord at all", strategy_run.strategy);
    }
    for summary in &analysis.summaries {
        assert_eq!(summary.progression, "C");
    }
}

#[test]
fn test_no_unharmonised_notes_in_pure_arpeggio() {
    let analysis = run("C4 E4 G4 C4", "");
    for strategy_run in &analysis.runs {
        let stray = harmonic_lab::unharmonised_notes(&strategy_run.path);
        assert!(stray.is_empty(), "{:?}: {:?}", strategy_run.strategy, stray);
    }
}

#[test]
fn test_analysis_is_idempotent() {
    let first = run("C4 D4 E4 F4 G4", "C3 G3 C3 G3 C3");
    let second = run("C4 D4 E4 F4 G4", "C3 G3 C3 G3 C3");
    // Bit-identical output, DP tables included: no hidden map-ordering
    // nondeterminism anywhere.
    let a = serde_json::to_string(&first).unwrap();
    let b = serde_json::to_string(&second).unwrap();
    assert_eq!(a, b);
}

#[test]
fn test_summary_serializes_to_json() {
    let analysis = run("C4 E4 G4 C4", "");
    let value = serde_json::to_value(&analysis).unwrap();
    assert_eq!(value["num_beats"], 4);
    let summaries = value["summaries"].as_array().unwrap();
    assert_eq!(summaries.len(), 4);
    for s in summaries {
        assert_eq!(s["progression"], "C");
        assert!(s["final_total"].as_f64().unwrap() > 0.0);
    }
}

#[test]
fn test_malformed_input_fails_before_analysis() {
    use harmonic_lab::AnalysisError;

    assert!(matches!(
        parse_voice("C4 nonsense", 1.0),
        Err(AnalysisError::InvalidNoteToken(t)) if t == "nonsense"
    ));
    assert!("7".parse::<TimeSignature>().is_err());

    let one_note = parse_voice("C4", 1.0).unwrap();
    assert_eq!(
        analyze(&one_note, TimeSignature::default(), &AnalysisParams::default()).unwrap_err(),
        AnalysisError::NotEnoughNotes(1)
    );
}
