//! Integration tests for the interaction loop
//!
//! Scenarios run through the public API with in-memory and JSON-lines sinks:
//! - faithful baseline (no collapse)
//! - literal echo of the resurfacing prompt (preservation-streak collapse)
//! - empty generation (drift collapse on turn 1)

use pretty_assertions::assert_eq;
use serde_json::Value;

use midas::core::{from_fn, EchoGenerator, Harness, JsonLinesSink, MemorySink, RepeatGenerator};
use midas::types::{CollapseCause, Event, HarnessConfig, HarnessError, HarnessState};
use midas::COLLAPSE_REASON;

const SEED: &str = "Seed text for turn 0.";

// =============================================================================
// SCENARIO 1: Identity models, invariants off
// =============================================================================

#[test]
fn test_identity_baseline_ten_turns() {
    let mut harness = Harness::new(HarnessConfig::new(10, false), MemorySink::new());
    let report = harness
        .run(&mut EchoGenerator, &mut RepeatGenerator, SEED)
        .unwrap();

    assert_eq!(report.state, HarnessState::Completed);
    assert_eq!(report.turns_executed, 10);
    assert!(report.collapse.is_none());
    assert!(report.drift.iter().all(|&d| d == 0.0));
    assert!(report.preservation.iter().all(|&p| p == 1.0));

    let mut expected = Vec::new();
    for t in 1..=10 {
        expected.push(Event::metrics(t, 0.0, 1.0));
        expected.push(Event::state(t, SEED));
    }
    assert_eq!(harness.sink().events(), expected.as_slice());
}

#[test]
fn test_identity_baseline_with_invariants() {
    let mut harness = Harness::new(HarnessConfig::new(10, true), MemorySink::new());
    let report = harness
        .run(&mut EchoGenerator, &mut RepeatGenerator, SEED)
        .unwrap();

    assert_eq!(report.state, HarnessState::Completed);
    assert_eq!(report.final_text, SEED);
    assert_eq!(harness.sink().events().len(), 20);
}

// =============================================================================
// SCENARIO 2: Model B echoes the whole prompt
// =============================================================================

#[test]
fn test_literal_echo_collapses_on_preservation_streak() {
    let mut harness = Harness::new(HarnessConfig::new(10, false), MemorySink::new());
    let report = harness
        .run(&mut EchoGenerator, &mut EchoGenerator, SEED)
        .unwrap();

    // "Repeat exactly:\n" prefix wrecks positional preservation every turn
    assert!(report.preservation.iter().all(|&p| p < 0.8));
    assert!(report.drift.iter().all(|&d| d == 0.0));

    assert_eq!(report.state, HarnessState::Collapsed);
    assert_eq!(report.turns_executed, 3);
    assert_eq!(report.causes, vec![CollapseCause::PreservationStreak]);
    assert_eq!(
        harness.sink().tags(),
        vec!["metrics", "state", "metrics", "state", "metrics", "state", "collapse"]
    );
    let turns: Vec<usize> = harness.sink().events().iter().map(Event::turn).collect();
    assert_eq!(turns, vec![1, 1, 2, 2, 3, 3, 3]);
    assert_eq!(
        harness.sink().events().last(),
        Some(&Event::collapse(3, COLLAPSE_REASON))
    );
}

#[test]
fn test_literal_echo_with_invariants_grows_state() {
    let mut harness = Harness::new(HarnessConfig::new(10, true), MemorySink::new());
    let report = harness
        .run(&mut EchoGenerator, &mut EchoGenerator, SEED)
        .unwrap();

    // The carried state is R_t, which accumulates one prefix per turn
    assert_eq!(report.turns_executed, 3);
    assert_eq!(
        report.final_text,
        format!("{}{}", "Repeat exactly:\n".repeat(3), SEED)
    );
}

// =============================================================================
// SCENARIO 3: Empty generation on turn 1
// =============================================================================

#[test]
fn test_empty_generation_collapses_turn_one() {
    let mut model_a = from_fn(|_prompt| Ok(String::new()));
    let mut harness = Harness::new(HarnessConfig::default(), MemorySink::new());
    let report = harness
        .run(&mut model_a, &mut RepeatGenerator, SEED)
        .unwrap();

    assert_eq!(report.state, HarnessState::Collapsed);
    assert_eq!(report.drift, vec![1.0]);
    assert_eq!(report.preservation, vec![0.0]);
    assert_eq!(report.causes, vec![CollapseCause::Drift]);
    assert_eq!(
        harness.sink().events(),
        &[
            Event::metrics(1, 1.0, 0.0),
            Event::state(1, ""),
            Event::collapse(1, COLLAPSE_REASON),
        ]
    );
}

// =============================================================================
// Collapse policy edges
// =============================================================================

#[test]
fn test_drift_at_threshold_does_not_collapse() {
    // drift("ac", "ab") == 0.5, threshold is strict
    let mut model_a = from_fn(|_prompt| Ok("ac".to_string()));
    let mut harness = Harness::new(HarnessConfig::new(2, true), MemorySink::new());
    let report = harness
        .run(&mut model_a, &mut RepeatGenerator, "ab")
        .unwrap();

    assert_eq!(report.drift, vec![0.5, 0.0]);
    assert_eq!(report.state, HarnessState::Completed);
}

#[test]
fn test_custom_thresholds_respected() {
    let config = HarnessConfig {
        turns: 5,
        drift_collapse_threshold: 0.2,
        ..HarnessConfig::default()
    };
    let mut model_a = from_fn(|_prompt| Ok("ac".to_string()));
    let mut harness = Harness::new(config, MemorySink::new());
    let report = harness
        .run(&mut model_a, &mut RepeatGenerator, "ab")
        .unwrap();

    assert_eq!(report.collapse.map(|c| c.turn), Some(1));
}

#[test]
fn test_streak_of_two_collapses_on_turn_two() {
    let config = HarnessConfig {
        turns: 10,
        invariants_enabled: false,
        preservation_streak: 2,
        ..HarnessConfig::default()
    };
    let mut model_b = from_fn(|_prompt| Ok("zzzz".to_string()));
    let mut harness = Harness::new(config, MemorySink::new());
    let report = harness
        .run(&mut EchoGenerator, &mut model_b, "abcd")
        .unwrap();

    assert_eq!(report.preservation, vec![0.0, 0.0]);
    assert_eq!(report.turns_executed, 2);
    assert_eq!(report.causes, vec![CollapseCause::PreservationStreak]);
}

#[test]
fn test_recovery_breaks_streak() {
    // Low, low, perfect, low, low: never three in a row
    let mut call = 0;
    let mut model_b = from_fn(|prompt| {
        call += 1;
        let target = prompt.trim_start_matches("Repeat exactly:\n");
        if call == 3 {
            Ok(target.to_string())
        } else {
            Ok("x".repeat(target.chars().count()))
        }
    });
    let mut harness = Harness::new(HarnessConfig::new(5, false), MemorySink::new());
    let report = harness
        .run(&mut EchoGenerator, &mut model_b, "seed")
        .unwrap();

    assert_eq!(report.preservation, vec![0.0, 0.0, 1.0, 0.0, 0.0]);
    assert_eq!(report.state, HarnessState::Completed);
}

#[test]
fn test_negative_turns_run_nothing() {
    let config = HarnessConfig::from_json(r#"{"turns": -3, "invariants_enabled": false}"#).unwrap();
    let mut harness = Harness::new(config, MemorySink::new());
    let report = harness
        .run(&mut EchoGenerator, &mut RepeatGenerator, SEED)
        .unwrap();

    assert!(harness.sink().events().is_empty());
    assert_eq!(report.state, HarnessState::Completed);
    assert_eq!(report.turns_executed, 0);
    assert_eq!(report.final_text, SEED);
}

// =============================================================================
// Failure semantics
// =============================================================================

#[test]
fn test_generator_failure_emits_no_collapse() {
    let mut turn = 0;
    let mut model_a = from_fn(|prompt| {
        turn += 1;
        if turn == 2 {
            Err(HarnessError::generator("model A crashed"))
        } else {
            Ok(prompt.to_string())
        }
    });
    let mut harness = Harness::new(HarnessConfig::new(10, true), MemorySink::new());
    let result = harness.run(&mut model_a, &mut RepeatGenerator, SEED);

    assert!(result.is_err());
    assert_eq!(harness.sink().tags(), vec!["metrics", "state"]);
    // Aborted runs never reach a terminal state
    assert_eq!(harness.state(), HarnessState::Running);
    assert!(!harness.state().is_terminal());
}

// =============================================================================
// Wire output
// =============================================================================

#[test]
fn test_json_lines_output() {
    let mut model_a = from_fn(|_prompt| Ok(String::new()));
    let mut harness = Harness::new(HarnessConfig::default(), JsonLinesSink::new(Vec::new()));
    harness
        .run(&mut model_a, &mut RepeatGenerator, SEED)
        .unwrap();

    let out = String::from_utf8(harness.into_sink().into_inner()).unwrap();
    let records: Vec<Value> = out
        .lines()
        .map(|line| serde_json::from_str(line).unwrap())
        .collect();

    assert_eq!(records.len(), 3);
    for record in &records {
        let object = record.as_object().unwrap();
        assert_eq!(object.len(), 2);
        assert!(object.contains_key("event"));
        assert!(object.contains_key("data"));
    }
    assert_eq!(records[0]["data"]["D"], 1.0);
    assert_eq!(records[0]["data"]["P"], 0.0);
    assert_eq!(records[1]["data"]["text"], "");
    assert_eq!(records[2]["event"], "collapse");
    assert_eq!(records[2]["data"]["reason"], "collapse condition met");
}
