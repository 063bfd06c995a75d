//! Risks view rendering.
//!
//! Two lists side by side: critical metrics and metrics in the warning
//! band, built fresh from the latest classified snapshots.

use ratatui::{
    layout::{Constraint, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use crate::app::App;

/// Render the Risks view.
pub fn render(frame: &mut Frame, app: &mut App, area: Rect) {
    let columns =
        Layout::horizontal([Constraint::Percentage(50), Constraint::Percentage(50)]).split(area);

    render_list(
        frame,
        app,
        columns[0],
        " Critical ",
        &app.board.risks.critical,
        Style::default().fg(app.theme.critical).add_modifier(Modifier::BOLD),
        "No critical metrics.",
    );
    render_list(
        frame,
        app,
        columns[1],
        " Warning ",
        &app.board.risks.warning,
        Style::default().fg(app.theme.warning),
        "No metrics in the warning band.",
    );
}

fn render_list(
    frame: &mut Frame,
    app: &App,
    area: Rect,
    title: &str,
    names: &[String],
    style: Style,
    empty_text: &str,
) {
    let lines: Vec<Line> = if names.is_empty() {
        vec![Line::from(Span::styled(
            format!(" {}", empty_text),
            Style::default().add_modifier(Modifier::DIM),
        ))]
    } else {
        names
            .iter()
            .map(|name| {
                Line::from(vec![Span::styled(" ● ", style), Span::raw(name.clone())])
            })
            .collect()
    };

    let block = Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_type(app.theme.border_type)
        .border_style(style);

    frame.render_widget(Paragraph::new(lines).block(block), area);
}
