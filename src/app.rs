//! Application state, the entry form, and navigation logic.

use std::collections::BTreeMap;
use std::time::Instant;

use anyhow::Result;
use chrono::{DateTime, Utc};

use crate::catalog::Catalog;
use crate::data::status::{parse_field, Direction, DisplayStatus};
use crate::data::BoardData;
use crate::error::BoardError;
use crate::store::{Snapshot, SnapshotBackend, SnapshotStore};
use crate::ui::Theme;

/// The current view/tab in the TUI.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    /// Metric cards grouped by category, with trends.
    Board,
    /// Form for entering a new snapshot.
    Entry,
    /// Critical and warning metric lists.
    Risks,
}

impl View {
    /// Cycle to the next view.
    pub fn next(self) -> Self {
        match self {
            View::Board => View::Entry,
            View::Entry => View::Risks,
            View::Risks => View::Board,
        }
    }

    /// Cycle to the previous view.
    pub fn prev(self) -> Self {
        match self {
            View::Board => View::Risks,
            View::Entry => View::Board,
            View::Risks => View::Entry,
        }
    }

    /// Returns the display label for this view.
    pub fn label(&self) -> &'static str {
        match self {
            View::Board => "Board",
            View::Entry => "Entry",
            View::Risks => "Risks",
        }
    }
}

/// The editable column of an entry form row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Field {
    #[default]
    Value,
    Target,
    Warning,
    Direction,
}

impl Field {
    pub fn next(self) -> Self {
        match self {
            Field::Value => Field::Target,
            Field::Target => Field::Warning,
            Field::Warning => Field::Direction,
            Field::Direction => Field::Value,
        }
    }

    pub fn prev(self) -> Self {
        match self {
            Field::Value => Field::Direction,
            Field::Target => Field::Value,
            Field::Warning => Field::Target,
            Field::Direction => Field::Warning,
        }
    }
}

/// One editable row of the entry form.
///
/// Numeric fields are kept as text buffers while editing; they are parsed
/// only on save, so a half-typed value never crashes the form.
#[derive(Debug, Clone)]
pub struct EntryRow {
    pub category: String,
    pub metric: String,
    pub value: String,
    pub target: String,
    pub warning: String,
    pub direction: Direction,
}

/// The entry form: one row per catalog metric.
#[derive(Debug, Clone)]
pub struct EntryForm {
    pub rows: Vec<EntryRow>,
    pub selected_row: usize,
    pub selected_field: Field,
}

fn fmt_num(v: f64) -> String {
    // f64 Display already drops the trailing ".0" for whole numbers
    format!("{}", v)
}

impl EntryForm {
    /// Build the form from the catalog, prefilled with the latest stored
    /// snapshot per metric, falling back to the catalog defaults.
    pub fn prefilled(catalog: &Catalog, latest: &BTreeMap<String, Snapshot>) -> Self {
        let rows = catalog
            .metrics()
            .map(|(category, def)| match latest.get(&def.name) {
                Some(s) => EntryRow {
                    category: category.to_string(),
                    metric: def.name.clone(),
                    value: fmt_num(s.value),
                    target: fmt_num(s.target),
                    warning: fmt_num(s.warning),
                    direction: s.direction,
                },
                None => EntryRow {
                    category: category.to_string(),
                    metric: def.name.clone(),
                    value: fmt_num(def.default_value),
                    target: fmt_num(def.target),
                    warning: fmt_num(def.warning),
                    direction: def.direction,
                },
            })
            .collect();

        Self {
            rows,
            selected_row: 0,
            selected_field: Field::default(),
        }
    }

    /// Parse every row into snapshot rows sharing one timestamp.
    ///
    /// All fields are validated before anything is returned: a single bad
    /// field rejects the whole submission with
    /// [`BoardError::InvalidMetricValue`].
    pub fn to_snapshots(&self, now: DateTime<Utc>) -> Result<Vec<Snapshot>, BoardError> {
        let mut rows = Vec::with_capacity(self.rows.len());
        for row in &self.rows {
            rows.push(Snapshot {
                date: now,
                metric: row.metric.clone(),
                value: parse_field(&row.metric, "value", &row.value)?,
                target: parse_field(&row.metric, "target", &row.target)?,
                warning: parse_field(&row.metric, "warning", &row.warning)?,
                direction: row.direction,
            });
        }
        Ok(rows)
    }

    pub fn select_next(&mut self, n: usize) {
        let max = self.rows.len().saturating_sub(1);
        self.selected_row = (self.selected_row + n).min(max);
    }

    pub fn select_prev(&mut self, n: usize) {
        self.selected_row = self.selected_row.saturating_sub(n);
    }

    pub fn next_field(&mut self) {
        self.selected_field = self.selected_field.next();
    }

    pub fn prev_field(&mut self) {
        self.selected_field = self.selected_field.prev();
    }

    /// The text buffer under the cursor, if the selected field is numeric.
    fn active_buffer(&mut self) -> Option<&mut String> {
        let row = self.rows.get_mut(self.selected_row)?;
        match self.selected_field {
            Field::Value => Some(&mut row.value),
            Field::Target => Some(&mut row.target),
            Field::Warning => Some(&mut row.warning),
            Field::Direction => None,
        }
    }

    /// Type a character into the selected field. On the direction field,
    /// any accepted key toggles up/down.
    pub fn push_char(&mut self, c: char) {
        if self.selected_field == Field::Direction {
            if c == ' ' {
                self.toggle_direction();
            }
            return;
        }
        if c.is_ascii_digit() || matches!(c, '.' | ',' | '-') {
            if let Some(buf) = self.active_buffer() {
                buf.push(c);
            }
        }
    }

    pub fn pop_char(&mut self) {
        if let Some(buf) = self.active_buffer() {
            buf.pop();
        }
    }

    /// Clear the selected numeric field.
    pub fn clear_field(&mut self) {
        if let Some(buf) = self.active_buffer() {
            buf.clear();
        }
    }

    pub fn toggle_direction(&mut self) {
        if let Some(row) = self.rows.get_mut(self.selected_row) {
            row.direction = row.direction.toggle();
        }
    }
}

/// Main application state.
pub struct App {
    pub running: bool,
    pub current_view: View,
    pub show_help: bool,

    pub catalog: Catalog,
    pub store: SnapshotStore,
    pub board: BoardData,
    pub form: EntryForm,
    pub load_error: Option<String>,

    /// Scroll offset for the Board view (in lines).
    pub board_scroll: u16,

    pub theme: Theme,

    // Temporary feedback shown in the status bar
    status_message: Option<(String, Instant)>,
}

impl App {
    /// Create the app over a catalog and a persistence backend.
    ///
    /// Loads existing history immediately; a backend failure degrades to an
    /// empty board with the error shown in the status bar.
    pub fn new(catalog: Catalog, backend: Box<dyn SnapshotBackend>) -> Self {
        let store = SnapshotStore::new(backend);
        let load_error = store.last_error().map(String::from);
        let board = BoardData::build(&catalog, &store);
        let form = EntryForm::prefilled(&catalog, &store.latest_per_metric());

        Self {
            running: true,
            current_view: View::Board,
            show_help: false,
            catalog,
            store,
            board,
            form,
            load_error,
            board_scroll: 0,
            theme: Theme::auto_detect(),
            status_message: None,
        }
    }

    /// Returns a description of the persistence backend.
    pub fn source_description(&self) -> &str {
        self.store.description()
    }

    /// Set a temporary status message shown for a few seconds.
    pub fn set_status_message(&mut self, message: String) {
        self.status_message = Some((message, Instant::now()));
    }

    /// Get the current status message if it hasn't expired (3 seconds).
    pub fn get_status_message(&self) -> Option<&str> {
        if let Some((msg, time)) = &self.status_message {
            if time.elapsed() < std::time::Duration::from_secs(3) {
                return Some(msg);
            }
        }
        None
    }

    /// Re-read history from the backend and rebuild the board.
    ///
    /// The entry form is left alone so a reload never clobbers half-typed
    /// input; it is re-prefilled only after a successful save.
    pub fn reload_data(&mut self) {
        self.store.reload();
        self.load_error = self.store.last_error().map(String::from);
        self.board = BoardData::build(&self.catalog, &self.store);
    }

    /// Validate the entry form and append one snapshot per metric.
    ///
    /// On validation failure nothing is persisted and the message names the
    /// offending metric and field.
    pub fn save_form(&mut self) {
        let rows = match self.form.to_snapshots(Utc::now()) {
            Ok(rows) => rows,
            Err(e) => {
                self.set_status_message(e.to_string());
                return;
            }
        };

        let count = rows.len();
        match self.store.append(rows) {
            Ok(()) => {
                self.board = BoardData::build(&self.catalog, &self.store);
                self.form = EntryForm::prefilled(&self.catalog, &self.store.latest_per_metric());
                self.load_error = None;
                self.set_status_message(format!("Snapshot saved ({} rows)", count));
            }
            Err(e) => {
                log::warn!("snapshot save failed: {}", e);
                self.set_status_message(format!("Save failed: {}", e));
            }
        }
    }

    /// Switch to the next view (Board → Entry → Risks).
    pub fn next_view(&mut self) {
        self.current_view = self.current_view.next();
    }

    /// Switch to the previous view.
    pub fn prev_view(&mut self) {
        self.current_view = self.current_view.prev();
    }

    /// Switch to a specific view.
    pub fn set_view(&mut self, view: View) {
        self.current_view = view;
    }

    /// Scroll the Board view down by n lines.
    pub fn scroll_down(&mut self, n: u16) {
        self.board_scroll = self.board_scroll.saturating_add(n);
    }

    /// Scroll the Board view up by n lines.
    pub fn scroll_up(&mut self, n: u16) {
        self.board_scroll = self.board_scroll.saturating_sub(n);
    }

    /// Toggle the help overlay.
    pub fn toggle_help(&mut self) {
        self.show_help = !self.show_help;
    }

    /// Signal the application to quit.
    pub fn quit(&mut self) {
        self.running = false;
    }

    /// Export current board state to a JSON file.
    pub fn export_state(&self, path: &std::path::Path) -> Result<()> {
        use std::io::Write;

        let (ok, warning, critical, no_data) = self.board.status_counts();

        let cards: Vec<serde_json::Value> = self
            .board
            .categories
            .iter()
            .flat_map(|category| {
                category.cards.iter().map(move |card| {
                    serde_json::json!({
                        "category": category.name,
                        "metric": card.name,
                        "status": status_export_label(card.status),
                        "value": card.latest.as_ref().map(|s| s.value),
                        "target": card.latest.as_ref().map(|s| s.target),
                        "warning": card.latest.as_ref().map(|s| s.warning),
                        "direction": card.latest.as_ref().map(|s| s.direction.label()),
                        "observations": card.series.len(),
                    })
                })
            })
            .collect();

        let export = serde_json::json!({
            "summary": {
                "total_metrics": self.catalog.metric_count(),
                "ok": ok,
                "warning": warning,
                "critical": critical,
                "no_data": no_data,
            },
            "metrics": cards,
            "risks": {
                "critical": self.board.risks.critical,
                "warning": self.board.risks.warning,
            },
        });

        let json = serde_json::to_string_pretty(&export)?;
        let mut file = std::fs::File::create(path)?;
        file.write_all(json.as_bytes())?;

        Ok(())
    }
}

fn status_export_label(status: DisplayStatus) -> &'static str {
    match status {
        DisplayStatus::Ok => "OK",
        DisplayStatus::Warning => "WARNING",
        DisplayStatus::Critical => "CRITICAL",
        DisplayStatus::NoData => "NO_DATA",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::tests::snap;
    use crate::store::MemoryBackend;

    fn test_app() -> App {
        App::new(Catalog::board_defaults(), Box::new(MemoryBackend::new()))
    }

    #[test]
    fn test_view_cycle_is_closed() {
        let mut view = View::Board;
        for _ in 0..3 {
            view = view.next();
        }
        assert_eq!(view, View::Board);
        assert_eq!(View::Board.prev(), View::Risks);
    }

    #[test]
    fn test_form_prefilled_from_defaults_when_store_empty() {
        let app = test_app();
        assert_eq!(app.form.rows.len(), 16);

        let row = &app.form.rows[0];
        assert_eq!(row.metric, "Pelaajamäärä yht.");
        assert_eq!(row.value, "850");
        assert_eq!(row.target, "900");
        assert_eq!(row.warning, "820");
        assert_eq!(row.direction, Direction::Up);
    }

    #[test]
    fn test_form_prefilled_from_latest_snapshot() {
        let mut row = snap(10, "Pelaajamäärä yht.", 875.0);
        row.target = 910.0;
        row.warning = 830.0;
        let backend = MemoryBackend::with_rows(vec![row]);

        let app = App::new(Catalog::board_defaults(), Box::new(backend));
        let form_row = &app.form.rows[0];
        assert_eq!(form_row.value, "875");
        assert_eq!(form_row.target, "910");
        assert_eq!(form_row.warning, "830");
    }

    #[test]
    fn test_save_form_appends_one_row_per_metric() {
        let mut app = test_app();
        assert!(app.store.is_empty());

        app.save_form();

        assert_eq!(app.store.len(), 16);
        // All rows share the submission timestamp
        let latest = app.store.latest_per_metric();
        let dates: Vec<_> = latest.values().map(|s| s.date).collect();
        assert!(dates.windows(2).all(|w| w[0] == w[1]));
        // Board now has data for every metric
        assert_eq!(app.board.status_counts().3, 0);
    }

    #[test]
    fn test_invalid_field_rejects_whole_submission() {
        let mut app = test_app();
        app.form.rows[3].value = "ei tiedossa".to_string();

        app.save_form();

        assert!(app.store.is_empty(), "nothing may be persisted");
        let msg = app.get_status_message().unwrap();
        assert!(msg.contains("invalid value"));
        assert!(msg.contains(&app.form.rows[3].metric));
    }

    #[test]
    fn test_form_editing_keys() {
        let mut app = test_app();
        app.form.clear_field();
        app.form.push_char('9');
        app.form.push_char('0');
        app.form.push_char('x'); // ignored
        assert_eq!(app.form.rows[0].value, "90");

        app.form.pop_char();
        assert_eq!(app.form.rows[0].value, "9");

        app.form.selected_field = Field::Direction;
        app.form.push_char(' ');
        assert_eq!(app.form.rows[0].direction, Direction::Down);
    }

    #[test]
    fn test_form_row_selection_clamps() {
        let mut app = test_app();
        app.form.select_next(100);
        assert_eq!(app.form.selected_row, 15);
        app.form.select_prev(100);
        assert_eq!(app.form.selected_row, 0);
    }

    #[test]
    fn test_export_state_shape() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("export.json");

        let mut app = test_app();
        app.save_form();
        app.export_state(&path).unwrap();

        let raw = std::fs::read_to_string(&path).unwrap();
        let json: serde_json::Value = serde_json::from_str(&raw).unwrap();
        assert_eq!(json["summary"]["total_metrics"], 16);
        assert_eq!(json["metrics"].as_array().unwrap().len(), 16);
        assert!(json["risks"]["critical"].is_array());
    }

    #[test]
    fn test_status_message_expires_logically() {
        let mut app = test_app();
        assert!(app.get_status_message().is_none());
        app.set_status_message("saved".to_string());
        assert_eq!(app.get_status_message(), Some("saved"));
    }
}
