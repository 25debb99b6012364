//! Script execution engine
//!
//! This module provides the core execution logic:
//! - [`engine`]: the stepping state machine that drives a run
//! - [`eval`]: expression evaluation against the live environment
//! - [`errors`]: evaluation and run error types
//!
//! # Execution Model
//!
//! The engine walks the script line by line, executes one statement at a
//! time, and after every mutation emits an immutable snapshot to the caller's
//! sink, then sleeps the configured step delay and checks for cancellation.
//! All failures are caught and reported as a terminal `Failed` outcome; the
//! engine never panics outward.

pub mod engine;
pub mod errors;
pub mod eval;
