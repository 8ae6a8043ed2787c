//! Memory model for the interpreter
//!
//! The language has a single store:
//! - [`stack`]: The value stack of signed integers, with the `roll` primitive
//!
//! # Numeric Model
//!
//! Values are `i64`. Arithmetic wraps on overflow rather than panicking, so
//! no program can bring down the engine through its own arithmetic.

pub mod stack;

pub use stack::{RollError, Stack, Value};
