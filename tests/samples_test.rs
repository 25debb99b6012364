// End-to-end runs of the bundled sample scripts

use std::time::Duration;

use steplet::interpreter::engine::{Engine, RunOutcome};
use steplet::runtime::value::Value;
use steplet::samples::{self, Sample};
use steplet::script::Script;
use steplet::snapshot::{Snapshot, StepKind};

fn run_sample(sample: Sample) -> (Engine, Vec<Snapshot>, RunOutcome) {
    let script = Script::parse(sample.source).expect("sample should validate");
    let mut engine = Engine::new(script, Duration::ZERO);
    let mut snapshots: Vec<Snapshot> = Vec::new();
    let outcome = engine.run(&mut snapshots);
    (engine, snapshots, outcome)
}

#[test]
fn test_array_sum_sample() {
    let (engine, snapshots, outcome) = run_sample(samples::ARRAY_SUM);

    assert_eq!(outcome, RunOutcome::Completed);
    assert_eq!(snapshots.len(), 19);
    assert_eq!(engine.env().get("sum"), Some(&Value::Number(25.0)));
    assert_eq!(engine.env().get("average"), Some(&Value::Number(5.0)));
}

#[test]
fn test_fibonacci_sample() {
    let (engine, _, outcome) = run_sample(samples::FIBONACCI);

    // Nine iterations of the rolling pair leave the ninth Fibonacci
    // number in `a`.
    assert_eq!(outcome, RunOutcome::Completed);
    assert_eq!(engine.env().get("a"), Some(&Value::Number(34.0)));
    assert_eq!(engine.env().get("b"), Some(&Value::Number(55.0)));
    assert_eq!(engine.env().get("i"), Some(&Value::Number(9.0)));
}

#[test]
fn test_factorial_sample() {
    let (engine, _, outcome) = run_sample(samples::FACTORIAL);

    assert_eq!(outcome, RunOutcome::Completed);
    assert_eq!(engine.env().get("factorial"), Some(&Value::Number(120.0)));
    assert_eq!(engine.env().get("i"), Some(&Value::Number(6.0)));
}

#[test]
fn test_find_max_sample() {
    let (engine, snapshots, outcome) = run_sample(samples::FIND_MAX);

    assert_eq!(outcome, RunOutcome::Completed);
    assert_eq!(engine.env().get("max"), Some(&Value::Number(9.0)));
    assert_eq!(engine.env().get("current"), Some(&Value::Number(5.0)));

    // Only the iterations where the candidate beat the running max assign
    let assigns = snapshots
        .iter()
        .filter(|s| s.kind == StepKind::Assign)
        .count();
    assert_eq!(assigns, 2);
}

#[test]
fn test_every_sample_completes() {
    for sample in samples::ALL {
        let (_, snapshots, outcome) = run_sample(sample);

        assert_eq!(
            outcome,
            RunOutcome::Completed,
            "sample {} should complete",
            sample.name
        );
        let last = snapshots.last().expect("at least one snapshot");
        assert!(last.is_terminal());
        assert_eq!(
            last.log.last().map(String::as_str),
            Some("✓ Execution completed!")
        );
    }
}
