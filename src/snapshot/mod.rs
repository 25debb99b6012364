//! Execution snapshots
//!
//! The engine never renders anything itself. After every observable step it
//! captures a [`Snapshot`] — a complete, self-contained picture of the run at
//! that instant — and hands it to a [`SnapshotSink`]. The terminal UI feeds
//! snapshots through an mpsc channel and draws the latest one; tests collect
//! them into a `Vec` and assert on the sequence.
//!
//! Snapshots are deliberately plain data: strings and numbers, no borrowed
//! state. That is what lets them cross a thread boundary and what makes
//! [`SnapshotHistory`] review (stepping back through a finished run) free.

use crate::runtime::env::Environment;
use crate::runtime::value::Value;
use std::sync::mpsc;

/// What kind of step produced a snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepKind {
    /// A `let` statement bound a new variable.
    Declare,
    /// An assignment rebound an existing variable.
    Assign,
    /// A loop iteration started and the loop variable was (re)bound.
    LoopBind,
    /// A loop finished an iteration and advanced its variable.
    LoopAdvance,
    /// The run reached the end of the script.
    Complete,
    /// The run stopped on an error.
    Fail,
}

/// Run state as seen from outside the engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunStatus {
    Running,
    Completed,
    Failed(String),
}

/// One variable as it should appear in the variables pane.
#[derive(Debug, Clone, PartialEq)]
pub struct VarCard {
    pub name: String,
    /// Display form of the value, already formatted.
    pub value: String,
    pub type_tag: &'static str,
}

impl VarCard {
    pub fn new(name: &str, value: &Value) -> Self {
        VarCard {
            name: name.to_string(),
            value: value.to_string(),
            type_tag: value.type_tag(),
        }
    }

    /// Every variable in the environment, in declaration order.
    pub fn collect(env: &Environment) -> Vec<VarCard> {
        env.iter()
            .map(|(name, value)| VarCard::new(name, value))
            .collect()
    }
}

/// The most recently declared or assigned array, shown as labelled slots.
#[derive(Debug, Clone, PartialEq)]
pub struct ArrayView {
    pub name: String,
    pub items: Vec<f64>,
}

/// A complete picture of the run after one step.
#[derive(Debug, Clone, PartialEq)]
pub struct Snapshot {
    /// Position in the run, starting at 0.
    pub step: usize,
    pub kind: StepKind,
    /// Zero-based source line the step belongs to, if any.
    pub current_line: Option<usize>,
    pub variables: Vec<VarCard>,
    pub array_view: Option<ArrayView>,
    /// Slot index highlighted in the array view.
    pub highlighted: Option<usize>,
    /// Full log transcript up to and including this step.
    pub log: Vec<String>,
    pub status: RunStatus,
}

impl Snapshot {
    /// Look up a variable card by name.
    pub fn variable(&self, name: &str) -> Option<&VarCard> {
        self.variables.iter().find(|card| card.name == name)
    }

    /// True for the final snapshot of a run.
    pub fn is_terminal(&self) -> bool {
        matches!(self.kind, StepKind::Complete | StepKind::Fail)
    }
}

/// Where the engine delivers snapshots.
pub trait SnapshotSink {
    fn emit(&mut self, snapshot: Snapshot);
}

impl SnapshotSink for Vec<Snapshot> {
    fn emit(&mut self, snapshot: Snapshot) {
        self.push(snapshot);
    }
}

impl SnapshotSink for mpsc::Sender<Snapshot> {
    fn emit(&mut self, snapshot: Snapshot) {
        // A closed receiver means the watcher went away; the cancel flag is
        // the mechanism that actually stops the run.
        let _ = self.send(snapshot);
    }
}

/// All snapshots from a run, kept for review after it finishes.
#[derive(Debug, Clone, Default)]
pub struct SnapshotHistory {
    snapshots: Vec<Snapshot>,
}

impl SnapshotHistory {
    pub fn new() -> Self {
        SnapshotHistory::default()
    }

    pub fn push(&mut self, snapshot: Snapshot) {
        self.snapshots.push(snapshot);
    }

    pub fn get(&self, index: usize) -> Option<&Snapshot> {
        self.snapshots.get(index)
    }

    pub fn latest(&self) -> Option<&Snapshot> {
        self.snapshots.last()
    }

    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }

    pub fn clear(&mut self) {
        self.snapshots.clear();
    }
}
