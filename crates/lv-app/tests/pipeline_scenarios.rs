//! End-to-end calculation scenarios against stub evaluators.

mod support;

use std::time::Duration;

use lv_app::{
    AppError, CalculationSlot, GRID_SIZE, LotkaVolterraSession, ResultView, SlotEvent,
    SlotStatus, SubmitOutcome,
};
use lv_core::{ModelParams, ParamInput, SAMPLE_COUNT};
use serde_json::{Value, json};
use support::{
    FailingEvaluator, GatedEvaluator, QueuedEvaluator, ScriptedEvaluator, kernel_rows,
    unique_temp_dir,
};

const WAIT: Duration = Duration::from_secs(5);

#[test]
fn default_parameters_render_all_views() {
    let evaluator = ScriptedEvaluator::new(kernel_rows());
    let mut session = LotkaVolterraSession::new(evaluator.clone(), Duration::from_millis(50));

    assert_eq!(session.calculate().unwrap(), SubmitOutcome::Started);
    assert!(session.is_running());
    let event = session.wait(WAIT).expect("calculation should finish");
    assert!(matches!(event, SlotEvent::Completed(_)));
    assert!(!session.is_running());

    let run = session.view().rendered().expect("charts should be rendered");
    assert_eq!(run.params, ModelParams::default());
    assert_eq!(run.population.prey.len(), SAMPLE_COUNT);
    assert_eq!(run.population.predators.len(), SAMPLE_COUNT);
    assert_eq!(run.phase.trajectory.len(), SAMPLE_COUNT);
    assert_eq!(run.vector_field.origins.len(), GRID_SIZE * GRID_SIZE);
    assert_eq!(run.animation.frame_count(), SAMPLE_COUNT);
    assert_eq!(run.animation.frame(), 0);
    assert!(!run.animation.is_playing());

    let t = run.series.t();
    assert_eq!(t[0], 0.0);
    assert!((t[SAMPLE_COUNT - 1] - 50.0).abs() < 1e-9);
    assert!(t.windows(2).all(|w| w[1] > w[0]));

    assert_eq!(evaluator.calls(), 1);
    let expressions = evaluator.expressions.lock().unwrap();
    let expression = &expressions[0];
    assert!(expression.contains("NDSolve"));
    assert!(expression.contains("x[0] == (10)"));
}

#[test]
fn empty_field_is_rejected_before_evaluation() {
    let evaluator = ScriptedEvaluator::new(kernel_rows());
    let mut session = LotkaVolterraSession::new(evaluator.clone(), Duration::from_millis(50));
    session.input.gamma.clear();

    let err = session.calculate().unwrap_err();
    assert!(matches!(err, AppError::Validation(_)));
    assert!(!session.is_running());
    assert_eq!(session.status(), &SlotStatus::Idle);
    assert_eq!(evaluator.calls(), 0);
}

#[test]
fn unparsable_field_is_rejected_before_evaluation() {
    let evaluator = ScriptedEvaluator::new(kernel_rows());
    let mut slot = CalculationSlot::new(evaluator.clone());
    let input = ParamInput {
        beta: "lots".to_string(),
        ..ParamInput::default()
    };

    assert!(matches!(slot.submit(&input), Err(AppError::Validation(_))));
    assert_eq!(evaluator.calls(), 0);
}

#[test]
fn null_result_fails_with_empty_result() {
    let evaluator = ScriptedEvaluator::new(Value::Null);
    let mut session = LotkaVolterraSession::new(evaluator, Duration::from_millis(50));

    session.calculate().unwrap();
    match session.wait(WAIT) {
        Some(SlotEvent::Failed(message)) => assert!(message.contains("empty result"), "{message}"),
        other => panic!("expected failure, got {:?}", other),
    }
    assert!(matches!(session.view(), ResultView::Error(_)));
    assert!(matches!(session.status(), SlotStatus::Failed(_)));
    assert!(session.current().is_none());
}

#[test]
fn non_list_result_is_malformed() {
    let evaluator = ScriptedEvaluator::new(json!({"unexpected": true}));
    let mut slot = CalculationSlot::new(evaluator);

    slot.submit(&ParamInput::default()).unwrap();
    match slot.wait(WAIT) {
        Some(SlotEvent::Failed(message)) => assert!(message.contains("Malformed"), "{message}"),
        other => panic!("expected failure, got {:?}", other),
    }
}

#[test]
fn kernel_failure_returns_slot_to_idle() {
    let mut slot = CalculationSlot::new(std::sync::Arc::new(FailingEvaluator));

    slot.submit(&ParamInput::default()).unwrap();
    assert!(matches!(slot.wait(WAIT), Some(SlotEvent::Failed(_))));
    assert!(!slot.is_running());

    // The slot accepts new work after a failure.
    assert_eq!(slot.submit(&ParamInput::default()).unwrap(), SubmitOutcome::Started);
    assert!(matches!(slot.wait(WAIT), Some(SlotEvent::Failed(_))));
}

#[test]
fn rapid_double_submit_evaluates_once() {
    let (evaluator, release) = GatedEvaluator::new(kernel_rows());
    let mut slot = CalculationSlot::new(evaluator.clone());

    assert_eq!(slot.submit(&ParamInput::default()).unwrap(), SubmitOutcome::Started);
    assert_eq!(
        slot.submit(&ParamInput::default()).unwrap(),
        SubmitOutcome::AlreadyRunning
    );
    assert!(matches!(slot.status(), SlotStatus::Running { .. }));

    evaluator.wait_for_calls(1);
    release.send(()).unwrap();
    assert!(matches!(slot.wait(WAIT), Some(SlotEvent::Completed(_))));
    assert!(slot.poll().is_none());
    assert_eq!(evaluator.calls(), 1);
}

#[test]
fn clear_while_running_suppresses_result() {
    let (evaluator, release) = GatedEvaluator::new(kernel_rows());
    let mut slot = CalculationSlot::new(evaluator.clone());

    slot.submit(&ParamInput::default()).unwrap();
    evaluator.wait_for_calls(1);
    slot.clear();

    assert_eq!(evaluator.aborts(), 1);
    assert_eq!(slot.status(), &SlotStatus::Idle);
    assert!(!slot.is_running());

    // The aborted evaluation finishes late; nothing may surface.
    release.send(()).unwrap();
    std::thread::sleep(Duration::from_millis(50));
    assert!(slot.poll().is_none());
    assert!(slot.wait(Duration::from_millis(50)).is_none());
    assert_eq!(slot.status(), &SlotStatus::Idle);

    // A fresh submission completes normally.
    slot.submit(&ParamInput::default()).unwrap();
    evaluator.wait_for_calls(2);
    release.send(()).unwrap();
    assert!(matches!(slot.wait(WAIT), Some(SlotEvent::Completed(_))));
}

#[test]
fn cleared_request_is_refused_before_evaluation() {
    let (evaluator, release) = QueuedEvaluator::new(kernel_rows());
    let mut slot = CalculationSlot::new(evaluator.clone());

    slot.submit(&ParamInput::default()).unwrap();
    evaluator.wait_until(|e| e.entered() == 1);
    slot.clear();

    release.send(()).unwrap();
    evaluator.wait_until(|e| e.refused() == 1);
    assert_eq!(evaluator.answered(), 0);

    slot.submit(&ParamInput::default()).unwrap();
    evaluator.wait_until(|e| e.entered() == 2);
    release.send(()).unwrap();
    assert!(matches!(slot.wait(WAIT), Some(SlotEvent::Completed(_))));
    assert_eq!(evaluator.answered(), 1);
}

#[cfg(unix)]
#[test]
fn clear_then_resubmit_evaluates_once_on_real_process() {
    use lv_kernel::{KernelConfig, KernelSession};

    let dir = unique_temp_dir("lv_app_slow_kernel");
    std::fs::create_dir_all(&dir).unwrap();
    let log = dir.join("answered.log");
    let script = format!(
        "while read -r line; do sleep 1; echo hit >> '{}'; \
         printf '<<lvsim:begin>>\\n[[0,10,5],[0.1,11,4]]\\n<<lvsim:end>>\\n'; done",
        log.display()
    );
    let session = std::sync::Arc::new(KernelSession::new(KernelConfig {
        command: "sh".to_string(),
        args: vec!["-c".to_string(), script],
    }));
    let mut slot = CalculationSlot::new(session);

    slot.submit(&ParamInput::default()).unwrap();
    slot.clear();
    slot.submit(&ParamInput::default()).unwrap();
    assert!(matches!(slot.wait(WAIT), Some(SlotEvent::Completed(_))));

    let answered = std::fs::read_to_string(&log).unwrap();
    assert_eq!(answered.lines().count(), 1);
}

#[test]
fn clear_when_idle_does_not_abort() {
    let (evaluator, _release) = GatedEvaluator::new(kernel_rows());
    let mut slot = CalculationSlot::new(evaluator.clone());
    slot.clear();
    assert_eq!(evaluator.aborts(), 0);
    assert_eq!(slot.status(), &SlotStatus::Idle);
}

#[test]
fn session_clear_restores_defaults() {
    let evaluator = ScriptedEvaluator::new(kernel_rows());
    let mut session = LotkaVolterraSession::new(evaluator, Duration::from_millis(50));
    session.input.alpha = "0.4".to_string();
    session.calculate().unwrap();
    session.wait(WAIT).unwrap();
    assert!(session.current().is_some());

    session.clear();
    assert_eq!(session.input, ParamInput::default());
    assert_eq!(session.view(), &ResultView::Placeholder);
    assert!(session.current().is_none());
    assert!(session.record_id().is_none());
}

#[test]
fn animation_plays_through_session() {
    let evaluator = ScriptedEvaluator::new(kernel_rows());
    let mut session = LotkaVolterraSession::new(evaluator, Duration::from_millis(50));
    session.calculate().unwrap();
    session.wait(WAIT).unwrap();

    let anim = session.animation_mut().expect("animation after a result");
    anim.play();
    assert_eq!(anim.advance(Duration::from_millis(150)), 3);
    assert_eq!(anim.frame(), 3);

    let run = session.view().rendered().unwrap();
    let frame = run.animation.view(&run.series).unwrap();
    assert_eq!(frame.trail_x.len(), 4);
    assert!(frame.readout().starts_with("Time: 0.3"));
}
