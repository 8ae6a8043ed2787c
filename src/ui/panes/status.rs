//! Status bar rendering with keybindings and state indicators

use crate::interpreter::control::ExecutionState;
use crate::ui::theme::DEFAULT_THEME;
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

/// Render the status bar at the bottom.
///
/// `is_error` colors the message as a fault; `is_finished` marks a run that
/// has ended and can be restarted.
pub fn render_status_bar(
    frame: &mut Frame,
    area: Rect,
    message: &str,
    state: ExecutionState,
    operations: u64,
    is_finished: bool,
    is_error: bool,
) {
    let layout = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(area);

    let badge_bg = if is_error {
        DEFAULT_THEME.error
    } else {
        match state {
            ExecutionState::Running => DEFAULT_THEME.success,
            ExecutionState::Paused | ExecutionState::OneMoreStep => DEFAULT_THEME.secondary,
            ExecutionState::Idle => DEFAULT_THEME.primary,
        }
    };

    let left_spans = vec![
        Span::styled(
            format!(" Op {} ", operations),
            Style::default()
                .bg(badge_bg)
                .fg(Color::Black)
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled(
            " | ",
            Style::default()
                .bg(DEFAULT_THEME.current_line_bg)
                .fg(DEFAULT_THEME.comment),
        ),
        Span::styled(
            format!(" {} ", message),
            Style::default()
                .bg(DEFAULT_THEME.current_line_bg)
                .fg(if is_error {
                    DEFAULT_THEME.error
                } else {
                    DEFAULT_THEME.fg
                }),
        ),
    ];

    let left_paragraph = Paragraph::new(Line::from(left_spans))
        .style(Style::default().bg(DEFAULT_THEME.current_line_bg))
        .alignment(Alignment::Left);

    frame.render_widget(left_paragraph, layout[0]);

    let key_style = Style::default().bg(DEFAULT_THEME.comment).fg(Color::Black);
    let desc_style = Style::default()
        .bg(DEFAULT_THEME.current_line_bg)
        .fg(DEFAULT_THEME.fg);
    let sep_style = Style::default()
        .bg(DEFAULT_THEME.current_line_bg)
        .fg(DEFAULT_THEME.comment);

    let mut right_spans = Vec::new();
    for (key, desc) in [
        (" ⎵ ", " pause/resume "),
        (" →/s ", " step "),
        (" c ", " cancel "),
        (" r ", " restart "),
        (" q ", " quit "),
    ] {
        if !right_spans.is_empty() {
            right_spans.push(Span::styled("│", sep_style));
            right_spans.push(Span::styled(" ", desc_style));
        }
        right_spans.push(Span::styled(key, key_style));
        right_spans.push(Span::styled(desc, desc_style));
    }

    let indicator = if is_finished {
        Some((" END ", DEFAULT_THEME.error))
    } else {
        match state {
            ExecutionState::Running => Some((" ▶ RUNNING ", DEFAULT_THEME.success)),
            ExecutionState::Paused => Some((" ⏸ PAUSED ", DEFAULT_THEME.secondary)),
            ExecutionState::OneMoreStep => Some((" ⏭ STEP ", DEFAULT_THEME.secondary)),
            ExecutionState::Idle => None,
        }
    };
    if let Some((text, bg)) = indicator {
        right_spans.push(Span::styled("│", sep_style));
        right_spans.push(Span::styled(
            text,
            Style::default()
                .bg(bg)
                .fg(Color::Black)
                .add_modifier(Modifier::BOLD),
        ));
    }

    let right_paragraph = Paragraph::new(Line::from(right_spans))
        .style(Style::default().bg(DEFAULT_THEME.current_line_bg))
        .alignment(Alignment::Right);

    frame.render_widget(right_paragraph, layout[1]);
}
