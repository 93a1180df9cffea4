//! Interaction loop: the harness state machine
//!
//! Per turn t (1-based):
//! 1. S_t = A(previous_state)
//! 2. R_t = B("Repeat exactly:\n" + S_t)
//! 3. P(t), D(t) appended, metrics event
//! 4. If invariants on and a contradiction is detected, S_t = B(correction prompt)
//! 5. previous_state = R_t (invariants on) or S_t (off), state event
//! 6. Collapse on D(t) > threshold, a low-P streak ending at t-1, or repetition
//!
//! RUNNING → COLLAPSED on collapse, RUNNING → COMPLETED when turns run out.

use chrono::Utc;
use tracing::{debug, info, warn};

use crate::core::detectors::{Detectors, InertDetectors};
use crate::core::emitter::EventSink;
use crate::core::generator::Generator;
use crate::core::metrics::{drift, preservation};
use crate::types::{
    CollapseCause, CollapseEvent, Event, GeneratorRole, HarnessConfig, HarnessResult,
    HarnessState, MetricSequences, RunReport, TurnRecord,
};
use crate::{COLLAPSE_REASON, REPETITION_WINDOW, RESURFACE_PREFIX};

/// Prompt asking Model B to reproduce `text` verbatim
pub fn resurface_prompt(text: &str) -> String {
    format!("{RESURFACE_PREFIX}{text}")
}

/// Prompt asking Model B to resolve contradictions in `current` against `previous`
pub fn correction_prompt(previous: &str, current: &str) -> String {
    format!(
        "INSTRUCTION: Identify contradictions between the two statements below.\n\
         STATEMENT A (Previous):\n{previous}\n\
         STATEMENT B (Current):\n{current}\n\
         TASK: Output only the corrected version of STATEMENT B with contradictions resolved.\n\
         Do NOT add explanations or commentary."
    )
}

/// Dual-model interaction harness
#[derive(Debug)]
pub struct Harness<S: EventSink, D: Detectors = InertDetectors> {
    config: HarnessConfig,
    detectors: D,
    sink: S,
    state: HarnessState,
}

impl<S: EventSink> Harness<S, InertDetectors> {
    /// Harness with the default (inert) detectors
    pub fn new(config: HarnessConfig, sink: S) -> Self {
        Self::with_detectors(config, sink, InertDetectors)
    }
}

impl<S: EventSink, D: Detectors> Harness<S, D> {
    /// Harness with caller-supplied detector strategies
    pub fn with_detectors(config: HarnessConfig, sink: S, detectors: D) -> Self {
        Self {
            config,
            detectors,
            sink,
            state: HarnessState::Running,
        }
    }

    /// Run the loop from `seed_text`
    ///
    /// Generator errors abort the run and are returned as-is; events already
    /// emitted stay emitted, nothing else is salvaged. An aborted run reaches
    /// no terminal state, so `state()` keeps reporting RUNNING afterwards.
    pub fn run<A, B>(
        &mut self,
        model_a: &mut A,
        model_b: &mut B,
        seed_text: &str,
    ) -> HarnessResult<RunReport>
    where
        A: Generator + ?Sized,
        B: Generator + ?Sized,
    {
        let started_at = Utc::now();
        self.state = HarnessState::Running;

        let mut previous_state = seed_text.to_string();
        let mut metrics = MetricSequences::new();
        let mut collapse = None;
        let mut causes = Vec::new();

        info!(
            turns = self.config.turns,
            invariants_enabled = self.config.invariants_enabled,
            "starting interaction run"
        );

        for t in 1..=self.config.turns {
            let record = self.execute_turn(t, &previous_state, &mut metrics, model_a, model_b)?;
            debug!(
                turn = t,
                drift = record.drift,
                preservation = record.preservation,
                corrected = record.corrected,
                "turn measured"
            );

            let TurnRecord { generated, resurfaced, drift: d_t, .. } = record;

            previous_state = if self.config.invariants_enabled {
                resurfaced
            } else {
                generated.clone()
            };
            self.sink.emit(&Event::state(t, previous_state.as_str()))?;

            causes = self.collapse_causes(d_t, &metrics, &generated);
            if !causes.is_empty() {
                let event = CollapseEvent {
                    turn: t,
                    reason: COLLAPSE_REASON.to_string(),
                };
                self.sink.emit(&Event::Collapse(event.clone()))?;
                self.state = HarnessState::Collapsed;
                info!(turn = t, causes = ?causes, "collapse condition met");
                collapse = Some(event);
                break;
            }
        }

        if !self.state.is_terminal() {
            self.state = HarnessState::Completed;
            info!(turns = metrics.len(), "run completed without collapse");
        }

        let turns_executed = metrics.len();
        let (preservation, drift) = metrics.into_parts();
        Ok(RunReport {
            state: self.state,
            turns_executed,
            preservation,
            drift,
            collapse,
            causes,
            final_text: previous_state,
            started_at,
            finished_at: Utc::now(),
        })
    }

    /// Steps 1-4 of a turn: generate, resurface, measure, correct
    fn execute_turn<A, B>(
        &mut self,
        t: usize,
        previous_state: &str,
        metrics: &mut MetricSequences,
        model_a: &mut A,
        model_b: &mut B,
    ) -> HarnessResult<TurnRecord>
    where
        A: Generator + ?Sized,
        B: Generator + ?Sized,
    {
        let generated = model_a
            .generate(previous_state)
            .map_err(|e| e.with_role(GeneratorRole::A))?;

        let resurfaced = model_b
            .generate(&resurface_prompt(&generated))
            .map_err(|e| e.with_role(GeneratorRole::B))?;

        let p_t = preservation(&resurfaced, &generated);
        let d_t = drift(&generated, previous_state);
        metrics.push(p_t, d_t);
        self.sink.emit(&Event::metrics(t, d_t, p_t))?;

        let mut generated = generated;
        let mut corrected = false;
        if self.config.invariants_enabled
            && self.detectors.contradiction_detected(&generated, previous_state)
        {
            warn!(turn = t, "contradiction detected, requesting correction");
            generated = model_b
                .generate(&correction_prompt(previous_state, &generated))
                .map_err(|e| e.with_role(GeneratorRole::B))?;
            corrected = true;
        }

        Ok(TurnRecord {
            turn: t,
            generated,
            resurfaced,
            drift: d_t,
            preservation: p_t,
            corrected,
        })
    }

    /// Step 6: every collapse condition that holds for the turn just measured
    fn collapse_causes(
        &self,
        d_t: f64,
        metrics: &MetricSequences,
        generated: &str,
    ) -> Vec<CollapseCause> {
        let mut causes = Vec::new();
        if d_t > self.config.drift_collapse_threshold {
            causes.push(CollapseCause::Drift);
        }
        // P(t) sits at index t-1, the last entry
        let low_streak = metrics.last_index().is_some_and(|index| {
            self.detectors.low_preservation_streak(
                metrics.preservation(),
                index,
                self.config.preservation_threshold,
                self.config.preservation_streak,
            )
        });
        if low_streak {
            causes.push(CollapseCause::PreservationStreak);
        }
        if self.detectors.repetition_detected(generated, REPETITION_WINDOW) {
            causes.push(CollapseCause::Repetition);
        }
        causes
    }

    /// Current run state
    pub fn state(&self) -> HarnessState {
        self.state
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn into_sink(self) -> S {
        self.sink
    }
}

// =============================================================================
// TESTS
// =============================================================================
