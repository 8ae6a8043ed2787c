//! # Introduction
//!
//! PieTTY interprets programs in Piet, the esoteric language whose programs
//! are grids of colored codels. Execution can run straight through or under a
//! debugger that pauses, single-steps, and cancels the run while watching the
//! stack, the direction pointer, and the chooser. The debugger front end is a
//! terminal UI built with [ratatui](https://docs.rs/ratatui).
//!
//! ## Execution pipeline
//!
//! ```text
//! Grid → Regions → Exit search → Operation → Stack / IO → Events → TUI
//! ```
//!
//! 1. [`grid`] — codels, the color model, region segmentation, and a plain
//!    text notation for writing grids by hand.
//! 2. [`interpreter`] — the traversal loop, the operation table, the
//!    execution state machine, and observer events.
//! 3. [`memory`] — the value stack and its `roll` primitive.
//! 4. [`snapshot`] — a shared output sink and a [`snapshot::Snapshot`] of
//!    machine state rebuilt from events.
//! 5. [`ui`] — ratatui-based debugger; not part of the stable library API.
//!
//! ## Example
//!
//! ```
//! use pietty::grid::Grid;
//! use pietty::interpreter::engine::Interpreter;
//!
//! // push 1 (lR -> R), then stop in the white strip
//! let grid: Grid = "lR R W W".parse().unwrap();
//! let result = Interpreter::new().interpret(&grid, Vec::new(), std::io::empty()).unwrap();
//! assert_eq!(result.stack, vec![1]);
//! ```

pub mod grid;
pub mod interpreter;
pub mod memory;
pub mod snapshot;
pub mod ui;
