//! Terminal debugger built on [ratatui](https://github.com/ratatui-org/ratatui).
//!
//! The UI is organized into three layers:
//!
//! - **[`app`]** — application state, keyboard event loop, the interpreter
//!   worker thread, and the event channel
//! - **[`panes`]** — stateless render functions for each visible pane (grid,
//!   machine state, program output, status bar)
//! - **[`theme`]** — centralized color palette used by all panes
//!
//! The entry point for consumers is [`App`]: construct it with a [`Grid`] and
//! call [`App::run`] to start the event loop.
//!
//! [`Grid`]: crate::grid::Grid
//! [`App::run`]: app::App::run

pub mod app;
pub mod panes;
pub mod theme;

pub use app::App;
