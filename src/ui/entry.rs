//! Entry form rendering.
//!
//! A table with one row per catalog metric and editable value, target,
//! warning and direction cells. The selected cell is rendered reversed
//! with a cursor mark; a preview column shows how the current input would
//! classify.

use ratatui::{
    layout::{Constraint, Rect},
    style::{Modifier, Style},
    widgets::{Block, Borders, Cell, Row, Table, TableState},
    Frame,
};

use crate::app::{App, EntryRow, Field};
use crate::data::status::{classify, parse_field, DisplayStatus};

/// Render the Entry view.
pub fn render(frame: &mut Frame, app: &mut App, area: Rect) {
    let header = Row::new(vec![
        Cell::from("Category"),
        Cell::from("Metric"),
        Cell::from("Value"),
        Cell::from("Target"),
        Cell::from("Warning"),
        Cell::from("Dir"),
        Cell::from("Preview"),
    ])
    .height(1)
    .style(app.theme.header);

    let selected_row = app.form.selected_row;
    let selected_field = app.form.selected_field;

    let rows: Vec<Row> = app
        .form
        .rows
        .iter()
        .enumerate()
        .map(|(i, row)| {
            let is_selected = i == selected_row;
            let preview = preview_status(row);
            let preview_style = app.theme.status_style(preview);

            Row::new(vec![
                Cell::from(row.category.clone())
                    .style(Style::default().add_modifier(Modifier::DIM)),
                Cell::from(row.metric.clone()),
                field_cell(&row.value, is_selected, selected_field == Field::Value),
                field_cell(&row.target, is_selected, selected_field == Field::Target),
                field_cell(&row.warning, is_selected, selected_field == Field::Warning),
                field_cell(
                    &format!("{} {}", row.direction.arrow(), row.direction.label()),
                    is_selected,
                    selected_field == Field::Direction,
                ),
                Cell::from(preview.symbol()).style(preview_style),
            ])
        })
        .collect();

    let widths = [
        Constraint::Fill(1),   // Category
        Constraint::Fill(3),   // Metric
        Constraint::Length(10),
        Constraint::Length(10),
        Constraint::Length(10),
        Constraint::Length(8),
        Constraint::Length(7),
    ];

    let title = format!(
        " Enter snapshot ({} metrics) [Ctrl+S: save one row per metric] ",
        app.form.rows.len()
    );

    let table = Table::new(rows, widths)
        .header(header)
        .block(
            Block::default()
                .title(title)
                .borders(Borders::ALL)
                .border_type(app.theme.border_type)
                .border_style(Style::default().fg(app.theme.border)),
        )
        .row_highlight_style(app.theme.selected)
        .highlight_symbol("▶ ");

    let mut state = TableState::default();
    state.select(Some(selected_row));

    frame.render_stateful_widget(table, area, &mut state);
}

/// Build a cell for an editable field; the active cell gets a cursor mark
/// and reversed style.
fn field_cell(text: &str, row_selected: bool, field_selected: bool) -> Cell<'static> {
    if row_selected && field_selected {
        Cell::from(format!("{}_", text))
            .style(Style::default().add_modifier(Modifier::REVERSED))
    } else {
        Cell::from(text.to_string())
    }
}

/// Classify the row's current input, or `NoData` while any field doesn't
/// parse. Gives immediate feedback before the snapshot is saved.
fn preview_status(row: &EntryRow) -> DisplayStatus {
    let parsed = (
        parse_field(&row.metric, "value", &row.value),
        parse_field(&row.metric, "target", &row.target),
        parse_field(&row.metric, "warning", &row.warning),
    );
    match parsed {
        (Ok(value), Ok(target), Ok(warning)) => {
            DisplayStatus::from(classify(value, target, warning, row.direction))
        }
        _ => DisplayStatus::NoData,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::status::Direction;

    fn row(value: &str, target: &str, warning: &str) -> EntryRow {
        EntryRow {
            category: "TEST".to_string(),
            metric: "A".to_string(),
            value: value.to_string(),
            target: target.to_string(),
            warning: warning.to_string(),
            direction: Direction::Up,
        }
    }

    #[test]
    fn test_preview_classifies_valid_input() {
        assert_eq!(preview_status(&row("850", "900", "820")), DisplayStatus::Warning);
        assert_eq!(preview_status(&row("920", "900", "820")), DisplayStatus::Ok);
    }

    #[test]
    fn test_preview_is_no_data_while_typing() {
        assert_eq!(preview_status(&row("", "900", "820")), DisplayStatus::NoData);
        assert_eq!(preview_status(&row("8x", "900", "820")), DisplayStatus::NoData);
    }
}
