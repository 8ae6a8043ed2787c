//! Grid pane rendering
//!
//! Each codel is drawn two cells wide in its own color. Codels of the region
//! the cursor is in carry a dot, and the cursor codel shows the DP arrow. The
//! view scrolls so the cursor stays visible on grids larger than the pane.

use super::border_style;
use crate::grid::region::Regions;
use crate::grid::color::Color;
use crate::grid::{Grid, Position};
use crate::snapshot::Snapshot;
use crate::ui::theme::{codel_color, marker_color};
use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

const CODEL_WIDTH: usize = 2;

/// First visible index so that `focus` stays within a window of `visible`
fn window_start(focus: usize, visible: usize, total: usize) -> usize {
    if total <= visible || focus < visible {
        0
    } else {
        (focus + 1 - visible).min(total - visible)
    }
}

/// Render the grid pane
pub fn render_grid_pane(
    frame: &mut Frame,
    area: Rect,
    grid: &Grid,
    regions: &Regions,
    snapshot: &Snapshot,
    title: &str,
    is_focused: bool,
) {
    let block = Block::default()
        .title(format!(" {} ", title))
        .borders(Borders::ALL)
        .border_style(border_style(is_focused));

    let visible_rows = area.height.saturating_sub(2).max(1) as usize;
    let visible_cols = (area.width.saturating_sub(2) as usize / CODEL_WIDTH).max(1);
    let cursor = snapshot.position;
    let first_row = window_start(cursor.y, visible_rows, grid.height());
    let first_col = window_start(cursor.x, visible_cols, grid.width());

    let current_region = grid
        .contains(cursor)
        .then(|| regions.id_at(cursor))
        .filter(|_| snapshot.region.is_some());

    let lines: Vec<Line> = (first_row..grid.height().min(first_row + visible_rows))
        .map(|y| {
            let spans: Vec<Span> = (first_col..grid.width().min(first_col + visible_cols))
                .map(|x| {
                    let pos = Position::new(x, y);
                    let color = grid.color_at(pos).unwrap_or(Color::Black);
                    let marker = if pos == cursor {
                        format!("{} ", snapshot.dp.arrow())
                    } else if current_region == Some(regions.id_at(pos)) {
                        "· ".to_string()
                    } else {
                        "  ".to_string()
                    };
                    Span::styled(
                        marker,
                        Style::default()
                            .bg(codel_color(color))
                            .fg(marker_color(color))
                            .add_modifier(Modifier::BOLD),
                    )
                })
                .collect();
            Line::from(spans)
        })
        .collect();

    frame.render_widget(Paragraph::new(lines).block(block), area);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_window_start_keeps_focus_visible() {
        assert_eq!(window_start(3, 10, 5), 0);
        assert_eq!(window_start(9, 10, 40), 0);
        assert_eq!(window_start(10, 10, 40), 1);
        assert_eq!(window_start(39, 10, 40), 30);
    }
}
