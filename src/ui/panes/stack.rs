//! Machine pane rendering: cursor state and the value stack
//!
//! The top of the pane summarizes DP, CC, the current region, and the most
//! recent operation (with its failure, if it was skipped). Below that the
//! stack is listed top-first, so the value the next operation sees is always
//! on the first row.

use super::{border_style, clamp_scroll};
use crate::snapshot::Snapshot;
use crate::ui::theme::{codel_color, DEFAULT_THEME};
use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem},
    Frame,
};

fn label(text: &str) -> Span<'static> {
    Span::styled(format!("{:<8}", text), Style::default().fg(DEFAULT_THEME.comment))
}

fn summary_lines(snapshot: &Snapshot) -> Vec<Line<'static>> {
    let mut lines = vec![
        Line::from(vec![
            label("DP"),
            Span::styled(
                format!("{} {}", snapshot.dp.arrow(), snapshot.dp),
                Style::default().fg(DEFAULT_THEME.primary),
            ),
        ]),
        Line::from(vec![
            label("CC"),
            Span::styled(
                snapshot.cc.to_string(),
                Style::default().fg(DEFAULT_THEME.primary),
            ),
        ]),
    ];

    let region_line = match snapshot.region {
        Some(region) => Line::from(vec![
            label("Region"),
            Span::styled("  ", Style::default().bg(codel_color(region.color))),
            Span::styled(
                format!(" {} · {} codel{}", region.color, region.size, if region.size == 1 { "" } else { "s" }),
                Style::default().fg(DEFAULT_THEME.fg),
            ),
        ]),
        None => Line::from(vec![
            label("Region"),
            Span::styled("(white)", Style::default().fg(DEFAULT_THEME.comment)),
        ]),
    };
    lines.push(region_line);

    let mut op_spans = vec![label("Op")];
    match snapshot.last_operation {
        Some(op) => op_spans.push(Span::styled(
            op.to_string(),
            Style::default()
                .fg(DEFAULT_THEME.function)
                .add_modifier(Modifier::BOLD),
        )),
        None => op_spans.push(Span::styled("-", Style::default().fg(DEFAULT_THEME.comment))),
    }
    if let Some((_, failure)) = snapshot.last_failure {
        op_spans.push(Span::styled(
            format!("  skipped: {}", failure),
            Style::default().fg(DEFAULT_THEME.error),
        ));
    }
    lines.push(Line::from(op_spans));

    lines.push(Line::from(vec![
        label("Steps"),
        Span::styled(
            format!("{} ({} skipped)", snapshot.operations, snapshot.failures),
            Style::default().fg(DEFAULT_THEME.fg),
        ),
    ]));
    lines.push(Line::from(Span::styled(
        "─ stack (top first) ─",
        Style::default().fg(DEFAULT_THEME.comment),
    )));
    lines
}

/// Render the machine pane
pub fn render_stack_pane(
    frame: &mut Frame,
    area: Rect,
    snapshot: &Snapshot,
    is_focused: bool,
    scroll_offset: &mut usize,
) {
    let block = Block::default()
        .title(" Machine ")
        .borders(Borders::ALL)
        .border_style(border_style(is_focused));

    let header = summary_lines(snapshot);
    let visible_height = (area.height.saturating_sub(2) as usize)
        .saturating_sub(header.len())
        .max(1);

    let mut items: Vec<ListItem> = header.into_iter().map(ListItem::new).collect();

    if snapshot.stack.is_empty() {
        items.push(ListItem::new("(empty)").style(Style::default().fg(DEFAULT_THEME.comment)));
    } else {
        clamp_scroll(scroll_offset, snapshot.stack.len(), visible_height);
        let depth = snapshot.stack.len();
        items.extend(
            snapshot
                .stack
                .iter()
                .rev()
                .enumerate()
                .skip(*scroll_offset)
                .take(visible_height)
                .map(|(i, value)| {
                    let printable = u32::try_from(*value)
                        .ok()
                        .and_then(char::from_u32)
                        .filter(|c| !c.is_control())
                        .map(|c| format!("  '{}'", c))
                        .unwrap_or_default();
                    ListItem::new(Line::from(vec![
                        Span::styled(
                            format!("{:>4} ", depth - i),
                            Style::default().fg(DEFAULT_THEME.comment),
                        ),
                        Span::styled(
                            value.to_string(),
                            Style::default().fg(DEFAULT_THEME.number),
                        ),
                        Span::styled(printable, Style::default().fg(DEFAULT_THEME.comment)),
                    ]))
                }),
        );
    }

    frame.render_widget(List::new(items).block(block), area);
}
