//! Common UI components shared across views.
//!
//! This module contains the header bar, tab bar, status bar, and help overlay.

use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Tabs},
    Frame,
};

use crate::app::{App, View};

/// Render the header bar with the overall board status.
///
/// Displays: status indicator, metric counts by status, snapshot count.
pub fn render_header(frame: &mut Frame, app: &App, area: Rect) {
    use crate::data::status::DisplayStatus;

    let (ok, warning, critical, no_data) = app.board.status_counts();
    let total = app.catalog.metric_count();

    // Overall status indicator: worst card wins
    let overall = if critical > 0 {
        DisplayStatus::Critical
    } else if warning > 0 {
        DisplayStatus::Warning
    } else if ok > 0 {
        DisplayStatus::Ok
    } else {
        DisplayStatus::NoData
    };

    let line = Line::from(vec![
        Span::styled(" ● ", app.theme.status_style(overall)),
        Span::styled("KPI BOARD ", Style::default().add_modifier(Modifier::BOLD)),
        Span::raw("│ "),
        Span::styled(format!("{}", ok), Style::default().fg(app.theme.ok)),
        Span::raw(" ok "),
        if warning > 0 {
            Span::styled(format!("{}", warning), Style::default().fg(app.theme.warning))
        } else {
            Span::styled("0", Style::default().add_modifier(Modifier::DIM))
        },
        Span::raw(" warn "),
        if critical > 0 {
            Span::styled(
                format!("{}", critical),
                Style::default().fg(app.theme.critical).add_modifier(Modifier::BOLD),
            )
        } else {
            Span::styled("0", Style::default().add_modifier(Modifier::DIM))
        },
        Span::raw(" crit "),
        Span::styled(
            format!("{}", no_data),
            Style::default().fg(app.theme.no_data),
        ),
        Span::raw(" no-data │ "),
        Span::styled(format!("{}", total), Style::default().add_modifier(Modifier::BOLD)),
        Span::raw(" metrics │ "),
        Span::raw(format!("{} snapshots", app.store.len())),
    ]);

    frame.render_widget(Paragraph::new(line), area);
}

/// Render the tab bar showing available views.
pub fn render_tabs(frame: &mut Frame, app: &App, area: Rect) {
    let titles: Vec<Line> = vec![
        Line::from(" 1:Board "),
        Line::from(" 2:Entry "),
        Line::from(" 3:Risks "),
    ];

    let selected = match app.current_view {
        View::Board => 0,
        View::Entry => 1,
        View::Risks => 2,
    };

    let tabs = Tabs::new(titles)
        .select(selected)
        .style(app.theme.tab_inactive)
        .highlight_style(app.theme.tab_active)
        .divider("|");

    frame.render_widget(tabs, area);
}

/// Render the status bar at the bottom.
///
/// Shows: data source, time since last reload, context-sensitive controls.
/// Also displays temporary status messages and load errors.
pub fn render_status_bar(frame: &mut Frame, app: &App, area: Rect) {
    // Check for temporary status message first
    if let Some(msg) = app.get_status_message() {
        let paragraph =
            Paragraph::new(format!(" {} ", msg)).style(Style::default().fg(app.theme.highlight));
        frame.render_widget(paragraph, area);
        return;
    }

    let status = if let Some(ref err) = app.load_error {
        format!(" History unavailable: {} | showing empty board | r:retry q:quit", err)
    } else {
        let elapsed = app.board.last_updated.elapsed();
        let controls = match app.current_view {
            View::Board => "↑↓:scroll Tab:switch e:export r:reload ?:help q:quit",
            View::Entry => "↑↓:row ←→:field Space:direction Ctrl+S:save Esc:back ?:help",
            View::Risks => "Tab:switch e:export r:reload ?:help q:quit",
        };
        format!(
            " {} | {} | Updated {:.1}s ago | {}",
            app.current_view.label(),
            app.source_description(),
            elapsed.as_secs_f64(),
            controls,
        )
    };

    let paragraph = Paragraph::new(status).style(Style::default().add_modifier(Modifier::DIM));

    frame.render_widget(paragraph, area);
}

/// Render the help overlay with keyboard shortcuts.
///
/// Displayed as a centered modal on top of the current view.
pub fn render_help(frame: &mut Frame, app: &App, area: Rect) {
    let help_text = vec![
        Line::from(vec![Span::styled("Keyboard Shortcuts", app.theme.header)]),
        Line::from(""),
        Line::from(vec![Span::styled(
            " Navigation",
            Style::default().add_modifier(Modifier::BOLD),
        )]),
        Line::from("  Tab / ←→   Switch views"),
        Line::from("  1/2/3      Board / Entry / Risks"),
        Line::from("  ↑/↓ j/k    Scroll"),
        Line::from("  PgUp/PgDn  Jump 10 lines"),
        Line::from(""),
        Line::from(vec![Span::styled(
            " Entry form",
            Style::default().add_modifier(Modifier::BOLD),
        )]),
        Line::from("  ↑/↓        Select metric"),
        Line::from("  ←/→        Select field"),
        Line::from("  0-9 . , -  Edit number"),
        Line::from("  Space      Toggle direction"),
        Line::from("  Del        Clear field"),
        Line::from("  Ctrl+S     Save snapshot"),
        Line::from("  Esc        Back to board"),
        Line::from(""),
        Line::from(vec![Span::styled(
            " General",
            Style::default().add_modifier(Modifier::BOLD),
        )]),
        Line::from("  r          Reload history"),
        Line::from("  e          Export to JSON"),
        Line::from("  q          Quit"),
        Line::from(""),
        Line::from(vec![Span::styled(
            "Press any key to close",
            Style::default().add_modifier(Modifier::DIM),
        )]),
    ];

    let block = Block::default()
        .title(" Help ")
        .borders(Borders::ALL)
        .border_type(app.theme.border_type)
        .border_style(Style::default().fg(app.theme.highlight));

    let paragraph = Paragraph::new(help_text).block(block);

    // Center the help overlay - responsive to terminal size
    let help_width = 42u16.min(area.width.saturating_sub(4));
    let help_height = 28u16.min(area.height.saturating_sub(2));
    let x = area.x + (area.width.saturating_sub(help_width)) / 2;
    let y = area.y + (area.height.saturating_sub(help_height)) / 2;
    let help_area = Rect::new(x, y, help_width, help_height);

    // Clear the area behind the help
    frame.render_widget(ratatui::widgets::Clear, help_area);
    frame.render_widget(paragraph, help_area);
}

/// Format a metric value for display, dropping a trailing ".0".
pub fn format_value(v: f64) -> String {
    if v.fract() == 0.0 && v.abs() < 1e12 {
        format!("{}", v as i64)
    } else {
        format!("{:.2}", v)
    }
}
