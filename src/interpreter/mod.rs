//! Interpreter execution engine
//!
//! This module provides the core execution logic:
//! - [`engine`]: The main loop, stack semantics, and the [`Interpreter`] entry point
//! - [`cursor`]: Direction pointer, chooser, and exit-codel selection
//! - [`operation`]: The color-transition operation table and operand requirements
//! - [`ops`]: Applying a selected operation to the machine
//! - [`control`]: The pause/resume/step/cancel state machine
//! - [`events`]: Observer interface for debug hosts
//! - [`io`]: UTF-8 input and output channels
//! - [`errors`]: Program-level failures and host faults
//!
//! # Execution Model
//!
//! The grid is segmented once per run. The engine then repeatedly locates the
//! region under the cursor, searches for an exit, and applies the operation
//! selected by the color change across that exit. White codels are slid over
//! without executing anything. The run halts when a region has no exit or a
//! white slide can only revisit codels it has already crossed.
//!
//! In debug mode every iteration first passes a gate that applies the step
//! delay and blocks while the run is paused.
//!
//! [`Interpreter`]: engine::Interpreter

pub mod constants;
pub mod control;
pub mod cursor;
pub mod engine;
pub mod errors;
pub mod events;
pub mod io;
pub mod operation;
pub mod ops;
