// Execution engine for the stepping interpreter

use crate::interpreter::errors::{EvalError, RunError};
use crate::interpreter::eval::{eval_rhs, evaluate};
use crate::runtime::env::Environment;
use crate::runtime::value::Value;
use crate::script::blocks::{extract_body, BodyLine};
use crate::script::line::{classify, Line, LoopHeader};
use crate::script::Script;
use crate::snapshot::{ArrayView, RunStatus, Snapshot, SnapshotSink, StepKind, VarCard};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

/// Iteration ceiling for a single loop. Scripts are didactic and small; a
/// loop that runs this long is a runaway condition, not a real workload.
pub const MAX_LOOP_STEPS: usize = 10_000;

/// Shared flag that asks a running engine to stop at its next pause.
#[derive(Debug, Clone, Default)]
pub struct CancelToken {
    flag: Arc<AtomicBool>,
}

impl CancelToken {
    pub fn new() -> Self {
        CancelToken::default()
    }

    /// Request a stop. The engine notices at its next suspension point.
    pub fn cancel(&self) {
        self.flag.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.flag.load(Ordering::Relaxed)
    }

    fn clear(&self) {
        self.flag.store(false, Ordering::Relaxed);
    }
}

/// Lifecycle of the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunState {
    Idle,
    Running,
    Completed,
    Failed,
}

/// How a call to [`Engine::run`] ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunOutcome {
    Completed,
    Failed(String),
    Cancelled,
}

/// The interpreter proper: walks a validated script statement by statement,
/// mutating the environment and emitting a snapshot after every observable
/// step.
pub struct Engine {
    /// Validated script being executed.
    script: Script,

    /// Pause inserted after each emitted snapshot. Zero skips the sleep,
    /// which is what tests use.
    step_delay: Duration,

    /// Cooperative stop flag, checked after every pause.
    cancel: CancelToken,

    /// Lifecycle state.
    state: RunState,

    /// Variable bindings in declaration order.
    env: Environment,

    /// Zero-based line the engine is currently on, if any.
    cursor: Option<usize>,

    /// Log transcript, one entry per event.
    log: Vec<String>,

    /// Name of the most recently written array variable. The items are
    /// re-read from the environment at emit time so rebinding stays fresh.
    array_view: Option<String>,

    /// Highlighted slot in the array view, following the loop variable.
    highlighted: Option<usize>,

    /// Snapshots emitted so far.
    steps: usize,
}

impl Engine {
    pub fn new(script: Script, step_delay: Duration) -> Self {
        Engine {
            script,
            step_delay,
            cancel: CancelToken::new(),
            state: RunState::Idle,
            env: Environment::new(),
            cursor: None,
            log: Vec::new(),
            array_view: None,
            highlighted: None,
            steps: 0,
        }
    }

    /// Handle for stopping this engine from another thread.
    pub fn cancel_token(&self) -> CancelToken {
        self.cancel.clone()
    }

    /// Execute the script from the top with fresh state, emitting a snapshot
    /// after every step. A cancelled run returns the engine to `Idle` and
    /// emits no terminal snapshot; completion and failure each emit one.
    pub fn run<S: SnapshotSink>(&mut self, sink: &mut S) -> RunOutcome {
        self.reset();
        self.state = RunState::Running;
        self.log.push("Starting execution...".to_string());

        match self.execute(sink) {
            Ok(()) => {
                self.state = RunState::Completed;
                self.cursor = None;
                self.highlighted = None;
                self.log.push("✓ Execution completed!".to_string());
                self.emit_with_status(sink, StepKind::Complete, RunStatus::Completed);
                RunOutcome::Completed
            }
            Err(RunError::Interrupted) => {
                self.state = RunState::Idle;
                RunOutcome::Cancelled
            }
            Err(err) => {
                let message = err.to_string();
                self.state = RunState::Failed;
                self.log.push(format!("✗ Error: {}", message));
                self.emit_with_status(sink, StepKind::Fail, RunStatus::Failed(message.clone()));
                RunOutcome::Failed(message)
            }
        }
    }

    /// Drop all run state, ready for a fresh run. Also clears a pending
    /// cancel request.
    pub fn reset(&mut self) {
        self.cancel.clear();
        self.state = RunState::Idle;
        self.env = Environment::new();
        self.cursor = None;
        self.log.clear();
        self.array_view = None;
        self.highlighted = None;
        self.steps = 0;
    }

    /// Walk the top-level lines. Classification happens per visit; lines the
    /// classifier does not recognize are skipped without a log entry.
    fn execute<S: SnapshotSink>(&mut self, sink: &mut S) -> Result<(), RunError> {
        let mut index = 0;
        while index < self.script.line_count() {
            let raw = self.script.lines()[index].clone();
            match classify(&raw) {
                Line::Blank | Line::Comment | Line::Unrecognized => {
                    index += 1;
                }
                Line::Declaration { name, rhs } => {
                    self.cursor = Some(index);
                    self.log_visit(index, &raw);
                    let value = eval_rhs(&rhs, &self.env)?;
                    self.bind(&name, value);
                    self.emit_and_pause(sink, StepKind::Declare)?;
                    index += 1;
                }
                Line::Assignment { name, rhs } => {
                    self.cursor = Some(index);
                    self.log_visit(index, &raw);
                    let value = eval_rhs(&rhs, &self.env)?;
                    self.bind(&name, value);
                    self.emit_and_pause(sink, StepKind::Assign)?;
                    index += 1;
                }
                Line::LoopHeader(header) => {
                    self.cursor = Some(index);
                    self.log_visit(index, &raw);
                    let (body, end) = extract_body(self.script.lines(), index);
                    self.run_loop(sink, index, &header, &body)?;
                    index = end + 1;
                }
                Line::Conditional { condition } => {
                    self.cursor = Some(index);
                    self.log_visit(index, &raw);
                    let taken = evaluate(&condition, &self.env)?.is_truthy();
                    index = self.exec_consequence(sink, index, taken)?;
                }
            }
        }
        Ok(())
    }

    /// The consequence of a top-level conditional is the next statement line
    /// after it; blanks and comments in between are not candidates. The
    /// statement line is consumed whether or not the branch was taken, and
    /// only an assignment counts as a consequence.
    fn exec_consequence<S: SnapshotSink>(
        &mut self,
        sink: &mut S,
        header: usize,
        taken: bool,
    ) -> Result<usize, RunError> {
        let mut next = header + 1;
        while next < self.script.line_count() {
            let raw = self.script.lines()[next].clone();
            match classify(&raw) {
                Line::Blank | Line::Comment => {
                    next += 1;
                }
                line => {
                    if taken {
                        if let Line::Assignment { name, rhs } = line {
                            self.cursor = Some(next);
                            self.log_visit(next, &raw);
                            let value = eval_rhs(&rhs, &self.env)?;
                            self.bind(&name, value);
                            self.emit_and_pause(sink, StepKind::Assign)?;
                        }
                    }
                    return Ok(next + 1);
                }
            }
        }
        Ok(next)
    }

    /// Drive one counting loop. The condition is checked before each
    /// iteration binds the loop variable, so a loop over an n-element array
    /// produces exactly n bind steps. After the body, the variable advances
    /// and a second step shows the new value before the next check.
    fn run_loop<S: SnapshotSink>(
        &mut self,
        sink: &mut S,
        header_line: usize,
        header: &LoopHeader,
        body: &[BodyLine],
    ) -> Result<(), RunError> {
        let mut current = self.eval_number(&header.start)?;
        let mut iterations = 0;

        loop {
            let bound = self.eval_number(&header.bound)?;
            if !header.op.compare(current, bound) {
                break;
            }
            if iterations >= MAX_LOOP_STEPS {
                return Err(RunError::LoopLimit {
                    var: header.var.clone(),
                    limit: MAX_LOOP_STEPS,
                });
            }
            iterations += 1;

            self.cursor = Some(header_line);
            self.bind(&header.var, Value::Number(current));
            self.highlighted = self.slot_index(current);
            self.emit_and_pause(sink, StepKind::LoopBind)?;

            self.run_body(sink, body)?;

            current = header.step.apply(current);
            self.cursor = Some(header_line);
            self.bind(&header.var, Value::Number(current));
            self.highlighted = self.slot_index(current);
            self.emit_and_pause(sink, StepKind::LoopAdvance)?;
        }

        self.highlighted = None;
        Ok(())
    }

    /// Execute the lines of a loop body once. Nested loop headers are not
    /// entered; their own body lines already belong to this body.
    fn run_body<S: SnapshotSink>(
        &mut self,
        sink: &mut S,
        body: &[BodyLine],
    ) -> Result<(), RunError> {
        let mut pos = 0;
        while pos < body.len() {
            let (line_index, raw) = body[pos].clone();
            match classify(&raw) {
                Line::Declaration { name, rhs } => {
                    self.cursor = Some(line_index);
                    self.log_body(&raw);
                    let value = eval_rhs(&rhs, &self.env)?;
                    self.bind(&name, value);
                    self.emit_and_pause(sink, StepKind::Declare)?;
                    pos += 1;
                }
                Line::Assignment { name, rhs } => {
                    self.cursor = Some(line_index);
                    self.log_body(&raw);
                    let value = eval_rhs(&rhs, &self.env)?;
                    self.bind(&name, value);
                    self.emit_and_pause(sink, StepKind::Assign)?;
                    pos += 1;
                }
                Line::Conditional { condition } => {
                    self.cursor = Some(line_index);
                    self.log_body(&raw);
                    let taken = evaluate(&condition, &self.env)?.is_truthy();
                    pos += 1;
                    // A comment between the header and its statement is not
                    // the consequence
                    while pos < body.len()
                        && matches!(classify(&body[pos].1), Line::Blank | Line::Comment)
                    {
                        pos += 1;
                    }
                    if pos < body.len() {
                        if taken {
                            let (next_index, next_raw) = body[pos].clone();
                            if let Line::Assignment { name, rhs } = classify(&next_raw) {
                                self.cursor = Some(next_index);
                                self.log_body(&next_raw);
                                let value = eval_rhs(&rhs, &self.env)?;
                                self.bind(&name, value);
                                self.emit_and_pause(sink, StepKind::Assign)?;
                            }
                        }
                        pos += 1;
                    }
                }
                Line::Blank | Line::Comment | Line::LoopHeader(_) | Line::Unrecognized => {
                    pos += 1;
                }
            }
        }
        Ok(())
    }

    /// Bind a variable, keeping the array view pointed at the latest array.
    fn bind(&mut self, name: &str, value: Value) {
        if matches!(value, Value::Array(_)) {
            self.array_view = Some(name.to_string());
        }
        self.env.bind(name, value);
    }

    /// Evaluate an expression that must produce a number.
    fn eval_number(&self, expr: &str) -> Result<f64, RunError> {
        let value = evaluate(expr, &self.env)?;
        match value.as_number() {
            Some(n) => Ok(n),
            None => Err(RunError::Eval(EvalError::TypeError {
                expected: "a number",
                found: value.type_tag(),
                expr: expr.to_string(),
            })),
        }
    }

    /// Map a loop variable value onto a slot of the current array view.
    fn slot_index(&self, value: f64) -> Option<usize> {
        let name = self.array_view.as_ref()?;
        let items = match self.env.get(name) {
            Some(Value::Array(items)) => items,
            _ => return None,
        };
        if value.fract() != 0.0 || value < 0.0 {
            return None;
        }
        let idx = value as usize;
        (idx < items.len()).then_some(idx)
    }

    fn log_visit(&mut self, index: usize, raw: &str) {
        self.log.push(format!("Line {}: {}", index + 1, raw.trim()));
    }

    fn log_body(&mut self, raw: &str) {
        self.log.push(format!("  Body: {}", raw.trim()));
    }

    /// Emit a snapshot, pause for the step delay, then honor a pending
    /// cancel request. Every statement step flows through here; it is the
    /// only suspension point.
    fn emit_and_pause<S: SnapshotSink>(
        &mut self,
        sink: &mut S,
        kind: StepKind,
    ) -> Result<(), RunError> {
        self.emit_with_status(sink, kind, RunStatus::Running);
        if !self.step_delay.is_zero() {
            std::thread::sleep(self.step_delay);
        }
        if self.cancel.is_cancelled() {
            return Err(RunError::Interrupted);
        }
        Ok(())
    }

    fn emit_with_status<S: SnapshotSink>(
        &mut self,
        sink: &mut S,
        kind: StepKind,
        status: RunStatus,
    ) {
        let array_view = self.array_view.as_ref().and_then(|name| match self.env.get(name) {
            Some(Value::Array(items)) => Some(ArrayView {
                name: name.clone(),
                items: items.clone(),
            }),
            _ => None,
        });

        let snapshot = Snapshot {
            step: self.steps,
            kind,
            current_line: self.cursor,
            variables: VarCard::collect(&self.env),
            array_view,
            highlighted: self.highlighted,
            log: self.log.clone(),
            status,
        };
        self.steps += 1;
        sink.emit(snapshot);
    }

    // ========== Getter methods for UI and tests ==========

    /// Current lifecycle state.
    pub fn state(&self) -> RunState {
        self.state
    }

    /// The environment as of the last step.
    pub fn env(&self) -> &Environment {
        &self.env
    }

    /// Zero-based line the engine stopped on, if any.
    pub fn cursor(&self) -> Option<usize> {
        self.cursor
    }

    /// Log transcript so far.
    pub fn log(&self) -> &[String] {
        &self.log
    }

    /// Number of snapshots emitted.
    pub fn steps(&self) -> usize {
        self.steps
    }
}
