// Binary includes library modules - some public API items are only for library consumers
#![allow(unused)]

use std::io;
use std::path::PathBuf;
use std::time::{Duration, Instant};

use anyhow::Result;
use clap::Parser;
use crossterm::{
    event::Event,
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Layout},
    Terminal,
};

mod app;
mod catalog;
mod data;
mod error;
mod events;
mod store;
mod ui;

use app::{App, View};
use catalog::Catalog;
use store::{FileBackend, SnapshotBackend};

#[derive(Parser, Debug)]
#[command(name = "kpiboard")]
#[command(about = "Terminal dashboard for a board-level KPI scorecard")]
struct Args {
    /// Path to the snapshot history file (JSON)
    #[arg(short, long, default_value = "kpi_snapshots.json")]
    store: PathBuf,

    /// Path to a metric catalog file (TOML/JSON/YAML); built-in board
    /// catalog when omitted
    #[arg(short, long)]
    catalog: Option<PathBuf>,

    /// History refresh interval in seconds
    #[arg(short, long, default_value = "2")]
    refresh: u64,

    /// Export current board state to a JSON file and exit
    #[arg(short, long)]
    export: Option<PathBuf>,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let args = Args::parse();

    let catalog = match &args.catalog {
        Some(path) => Catalog::load(path)?,
        None => Catalog::board_defaults(),
    };

    let backend: Box<dyn SnapshotBackend> = Box::new(FileBackend::new(&args.store));

    // Handle export mode (non-interactive)
    if let Some(export_path) = args.export {
        let app = App::new(catalog, backend);
        if let Some(err) = app.load_error.as_deref() {
            log::warn!("exporting with empty history: {}", err);
        }
        app.export_state(&export_path)?;
        println!("Exported board state to: {}", export_path.display());
        return Ok(());
    }

    run_tui(catalog, backend, Duration::from_secs(args.refresh))
}

/// Run the TUI against the given catalog and persistence backend
fn run_tui(
    catalog: Catalog,
    backend: Box<dyn SnapshotBackend>,
    refresh_interval: Duration,
) -> Result<()> {
    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let terminal_backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(terminal_backend)?;

    // Setup panic hook to restore terminal
    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic| {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
        original_hook(panic);
    }));

    let mut app = App::new(catalog, backend);

    // Run the main loop
    let result = run_app(&mut terminal, &mut app, refresh_interval);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}

fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
    refresh_interval: Duration,
) -> Result<()> {
    let mut last_refresh = Instant::now();

    // Minimum terminal size for usable display
    const MIN_WIDTH: u16 = 70;
    const MIN_HEIGHT: u16 = 14;

    while app.running {
        // Draw UI
        terminal.draw(|frame| {
            let area = frame.area();

            // Check for minimum terminal size
            if area.width < MIN_WIDTH || area.height < MIN_HEIGHT {
                let msg = format!(
                    "Terminal too small: {}x{}\nMinimum: {}x{}\n\nResize to continue",
                    area.width, area.height, MIN_WIDTH, MIN_HEIGHT
                );
                let paragraph = ratatui::widgets::Paragraph::new(msg)
                    .alignment(ratatui::layout::Alignment::Center)
                    .style(ratatui::style::Style::default().fg(ratatui::style::Color::Yellow));
                let centered = ratatui::layout::Rect::new(0, area.height / 2 - 2, area.width, 5);
                frame.render_widget(paragraph, centered);
                return;
            }

            let chunks = Layout::vertical([
                Constraint::Length(1), // Header bar
                Constraint::Length(1), // Tabs
                Constraint::Min(8),    // Content
                Constraint::Length(1), // Status bar
            ])
            .split(area);

            // Render header with board status counts
            ui::common::render_header(frame, app, chunks[0]);

            // Render tabs
            ui::common::render_tabs(frame, app, chunks[1]);

            // Render current view
            match app.current_view {
                View::Board => ui::board::render(frame, app, chunks[2]),
                View::Entry => ui::entry::render(frame, app, chunks[2]),
                View::Risks => ui::risks::render(frame, app, chunks[2]),
            }

            // Render status bar
            ui::common::render_status_bar(frame, app, chunks[3]);

            // Render help overlay if active
            if app.show_help {
                ui::common::render_help(frame, app, area);
            }
        })?;

        // Poll for events with a short timeout
        if let Some(event) = events::poll_event(Duration::from_millis(100))? {
            match event {
                Event::Key(key) => events::handle_key_event(app, key),
                Event::Resize(_, _) => {
                    // Terminal will redraw on next iteration
                }
                _ => {}
            }
        }

        // Re-read history periodically so an externally updated file shows
        // up; the entry form is never clobbered by a refresh
        if last_refresh.elapsed() >= refresh_interval {
            app.reload_data();
            last_refresh = Instant::now();
        }
    }

    Ok(())
}
