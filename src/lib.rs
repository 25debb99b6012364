//! # Introduction
//!
//! Steplet executes a restricted, line-oriented teaching script one statement
//! at a time, capturing a snapshot of the full interpreter state after every
//! mutation.  Snapshots stream to an observer — by default a terminal UI built
//! with [ratatui](https://docs.rs/ratatui) that shows the source, the variable
//! table, the current array as labelled boxes, and the execution log.
//!
//! ## Execution pipeline
//!
//! ```text
//! Source → Validator → Classifier → Engine → Snapshots → TUI
//! ```
//!
//! 1. [`script`] — validates the source against foreign-dialect syntax,
//!    classifies each line into a statement shape, and extracts loop bodies.
//! 2. [`interpreter`] — evaluates expressions and drives the paced,
//!    cancellable execution loop, emitting [`snapshot::Snapshot`]s at each
//!    step.
//! 3. [`runtime`] — tagged [`runtime::value::Value`] variants stored in an
//!    insertion-ordered [`runtime::env::Environment`].
//! 4. [`snapshot`] — immutable per-step state projections, the
//!    [`snapshot::SnapshotSink`] seam, and a history buffer for review.
//! 5. [`ui`] — ratatui-based TUI; not part of the stable library API.
//!
//! ## Supported script subset
//!
//! Statements: `let` declarations, assignments, three-clause `for` loops
//! (one nesting level), single-line `if` consequences, `//` comments.
//! Values: 64-bit floats, flat number arrays, booleans.
//! Expressions: `+ - * /`, `< <= > >= == !=`, `name[index]`, `.length`,
//! parentheses.

pub mod interpreter;
pub mod runtime;
pub mod samples;
pub mod script;
pub mod snapshot;
pub mod ui;
