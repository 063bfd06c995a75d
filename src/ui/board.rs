//! Board view rendering.
//!
//! Metric cards grouped by category in two columns, each with a status
//! dot, the current value against its thresholds, and a value sparkline.

use ratatui::{
    layout::{Constraint, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use crate::app::App;
use crate::data::status::DisplayStatus;
use crate::data::MetricCard;
use crate::ui::common::format_value;

/// Sparkline characters (8 levels of height).
const SPARKLINE_CHARS: [char; 8] = ['▁', '▂', '▃', '▄', '▅', '▆', '▇', '█'];

/// Width of the trend sparkline in cells.
const TREND_WIDTH: usize = 24;

/// Render the Board view: categories split over two columns, cards stacked
/// inside each category block.
pub fn render(frame: &mut Frame, app: &mut App, area: Rect) {
    let columns =
        Layout::horizontal([Constraint::Percentage(50), Constraint::Percentage(50)]).split(area);

    // Alternate categories over the two columns, like the original
    // two-column board layout
    let mut left: Vec<Line> = Vec::new();
    let mut right: Vec<Line> = Vec::new();
    for (i, category) in app.board.categories.iter().enumerate() {
        let target = if i % 2 == 0 { &mut left } else { &mut right };
        target.push(Line::from(Span::styled(
            format!(" {} ", category.name),
            app.theme.header,
        )));
        for card in &category.cards {
            push_card_lines(target, card, app);
        }
        target.push(Line::from(""));
    }

    let scroll = app.board_scroll;
    for (lines, column) in [(left, columns[0]), (right, columns[1])] {
        let block = Block::default()
            .borders(Borders::ALL)
            .border_type(app.theme.border_type)
            .border_style(Style::default().fg(app.theme.border));
        let paragraph = Paragraph::new(lines).block(block).scroll((scroll, 0));
        frame.render_widget(paragraph, column);
    }
}

fn push_card_lines(lines: &mut Vec<Line<'static>>, card: &MetricCard, app: &App) {
    let status_style = app.theme.status_style(card.status);

    // Title line: status dot + name + current value
    let value_text = match &card.latest {
        Some(s) => format_value(s.value),
        None => "–".to_string(),
    };
    lines.push(Line::from(vec![
        Span::styled(" ● ", status_style),
        Span::styled(card.name.clone(), Style::default().add_modifier(Modifier::BOLD)),
        Span::raw("  "),
        Span::styled(value_text, status_style.add_modifier(Modifier::BOLD)),
        Span::raw("  "),
        Span::styled(
            format!("[{}]", card.status.symbol()),
            status_style,
        ),
    ]));

    // Threshold caption
    match &card.latest {
        Some(s) => {
            lines.push(Line::from(Span::styled(
                format!(
                    "   target {} | warning {} | {}",
                    format_value(s.target),
                    format_value(s.warning),
                    s.direction.label(),
                ),
                Style::default().add_modifier(Modifier::DIM),
            )));
        }
        None => {
            lines.push(Line::from(Span::styled(
                "   no data yet for this metric",
                Style::default().fg(app.theme.no_data),
            )));
        }
    }

    // Trend line: sparkline when there are at least two observations
    match card.trend_values() {
        Some(values) => {
            lines.push(Line::from(vec![
                Span::raw("   "),
                Span::styled(sparkline(&values, TREND_WIDTH), Style::default().fg(app.theme.highlight)),
                Span::styled(
                    format!(" ({} entries)", values.len()),
                    Style::default().add_modifier(Modifier::DIM),
                ),
            ]));
        }
        None if card.status != DisplayStatus::NoData => {
            lines.push(Line::from(Span::styled(
                "   no trend yet (single entry)",
                Style::default().add_modifier(Modifier::DIM),
            )));
        }
        None => {}
    }
    lines.push(Line::from(""));
}

/// Render a value series as a fixed-width sparkline.
///
/// Values are normalized over the series min/max into the 8 bar levels; a
/// flat series renders at mid height. Only the most recent `width` values
/// are shown.
pub fn sparkline(values: &[f64], width: usize) -> String {
    let tail: Vec<f64> = values.iter().rev().take(width).rev().copied().collect();
    if tail.is_empty() {
        return String::new();
    }

    let min = tail.iter().copied().fold(f64::INFINITY, f64::min);
    let max = tail.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let range = max - min;

    tail.iter()
        .map(|&v| {
            let level = if range > 0.0 {
                (((v - min) / range) * 7.0).round() as usize
            } else {
                4
            };
            SPARKLINE_CHARS[level.min(7)]
        })
        .collect()
}
