//! Runtime state for a single script run
//!
//! This module provides the two pieces of state the engine mutates:
//! - [`value`]: tagged runtime value representation (Number, Array, Bool)
//! - [`env`]: the variable table, insertion-ordered for display
//!
//! There is no heap, no call stack and no addresses: the script language has
//! exactly one scope, and arrays are plain owned vectors of numbers.

pub mod env;
pub mod value;
