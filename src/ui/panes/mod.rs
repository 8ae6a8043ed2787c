//! TUI pane rendering modules
//!
//! # Pane Modules
//!
//! - [`grid`]: The program grid, with the current region and cursor marked
//! - [`stack`]: Machine state (DP, CC, region, last operation) and the value stack
//! - [`terminal`]: Program output
//! - [`status`]: Status bar with keybindings and execution state
//!
//! Each pane module exports a primary `render_*` function that takes the
//! frame, its area, the data to show, and (for scrollable panes) a scroll
//! offset it clamps in place.

pub mod grid;
pub mod stack;
pub mod status;
pub mod terminal;

pub use grid::render_grid_pane;
pub use stack::render_stack_pane;
pub use status::render_status_bar;
pub use terminal::render_terminal_pane;

use crate::ui::theme::DEFAULT_THEME;
use ratatui::style::{Modifier, Style};

/// Border style shared by all panes
pub(crate) fn border_style(is_focused: bool) -> Style {
    if is_focused {
        Style::default()
            .fg(DEFAULT_THEME.border_focused)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(DEFAULT_THEME.border_normal)
    }
}

/// Clamp a scroll offset so the last page stays full
pub(crate) fn clamp_scroll(offset: &mut usize, total_items: usize, visible_height: usize) {
    if total_items > visible_height {
        *offset = (*offset).min(total_items - visible_height);
    } else {
        *offset = 0;
    }
}
