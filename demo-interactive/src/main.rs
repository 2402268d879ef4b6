//! Interactive Force Grid Demo
//!
//! A terminal dashboard for the sensor grid. A simulated bite drives the
//! grid; the panel on the right shows the live statistics and the force
//! history runs along the bottom.
//!
//! # Usage
//!
//! ```bash
//! cargo run --package demo-interactive
//! ```
//!
//! # Keys
//!
//! - `space` - Play / pause
//! - `n` - Single step while paused
//! - `+` / `-` - Raise / lower sensitivity
//! - arrow keys - Move the cursor, `enter` selects the sensor under it
//! - `esc` - Clear the selection
//! - `r` - Reset the 3D bar camera
//! - `q` - Quit
//!
//! Logs go to `demo-interactive.log` (filter with `RUST_LOG`).

use force_grid_core::dashboard::GRID_VIEW;
use force_grid_core::events::ClickEvent;
use force_grid_core::{
    ArchLayout, Dashboard, Playback, Rgb, Sensitivity, Session, SimulatedSource, StepReport,
    VisualizerConfig, HW_COLS, HW_ROWS,
};
use ratatui::crossterm::event::{self, Event, KeyCode, KeyEventKind};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    symbols,
    text::{Line, Span},
    widgets::{Axis, Block, Borders, Chart, Dataset, GraphType, Paragraph},
    DefaultTerminal, Frame,
};
use std::fs::File;
use std::io;
use std::sync::Mutex;
use std::time::Instant;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

/// Length of the simulated recording in seconds
const TIMELINE_SECONDS: f64 = 120.0;
const SOURCE_SEED: u64 = 7;
const SENSITIVITY_STEP: f64 = 1.25;

struct App {
    session: Session<SimulatedSource>,
    cursor: (usize, usize),
    last_report: Option<StepReport>,
    message: String,
}

fn main() -> io::Result<()> {
    init_logging();

    let config = VisualizerConfig::default();
    let fps = config.fps;
    let layout = ArchLayout::new(HW_ROWS, HW_COLS);
    let dashboard = Dashboard::new(config, &layout).map_err(|e| {
        error!("Failed to build dashboard: {}", e);
        io::Error::other(e)
    })?;
    let source = SimulatedSource::new(dashboard.sensor_count(), SOURCE_SEED);
    let session = Session::new(
        dashboard,
        Playback::from_duration(TIMELINE_SECONDS, fps),
        source,
    );

    let mut app = App {
        session,
        cursor: (HW_ROWS / 10, HW_COLS / 2),
        last_report: None,
        message: "Press space to play.".to_string(),
    };

    let mut terminal = ratatui::init();
    let result = run(&mut terminal, &mut app);
    ratatui::restore();
    app.session.close();
    result
}

fn init_logging() {
    let Ok(file) = File::create("demo-interactive.log") else {
        return;
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .try_init();
}

fn run(terminal: &mut DefaultTerminal, app: &mut App) -> io::Result<()> {
    let mut last_tick = Instant::now();
    loop {
        terminal.draw(|frame| draw(frame, app))?;

        let interval = app.session.interval();
        let timeout = interval.saturating_sub(last_tick.elapsed());
        if event::poll(timeout)? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press && handle_key(app, key.code) {
                    break;
                }
            }
        }

        if last_tick.elapsed() >= interval {
            if let Some(report) = app.session.tick() {
                app.last_report = Some(report);
            }
            last_tick = Instant::now();
        }
    }
    info!("Quit requested");
    Ok(())
}

/// Returns true when the app should exit
fn handle_key(app: &mut App, code: KeyCode) -> bool {
    match code {
        KeyCode::Char('q') => return true,
        KeyCode::Char(' ') => match app.session.toggle() {
            Ok(state) => app.message = format!("{state:?}"),
            Err(e) => {
                error!("Cannot toggle playback: {}", e);
                app.message = e.to_string();
            }
        },
        KeyCode::Char('n') => {
            if app.session.is_playing() {
                app.message = "Pause before stepping.".to_string();
            } else if let Some(report) = app.session.step() {
                app.last_report = Some(report);
            }
        }
        KeyCode::Char('+' | '=') => {
            let next = app.session.sensitivity().value() * SENSITIVITY_STEP;
            app.session.set_sensitivity(Sensitivity::new(next));
        }
        KeyCode::Char('-') => {
            let next = app.session.sensitivity().value() / SENSITIVITY_STEP;
            app.session.set_sensitivity(Sensitivity::new(next));
        }
        KeyCode::Char('r') => {
            app.session.dashboard_mut().reset_bar_camera();
            app.message = "Bar camera reset.".to_string();
        }
        KeyCode::Up => app.cursor.0 = app.cursor.0.saturating_sub(1),
        KeyCode::Down => app.cursor.0 = (app.cursor.0 + 1).min(HW_ROWS - 1),
        KeyCode::Left => app.cursor.1 = app.cursor.1.saturating_sub(1),
        KeyCode::Right => app.cursor.1 = (app.cursor.1 + 1).min(HW_COLS - 1),
        KeyCode::Enter => {
            let (row, col) = app.cursor;
            let dashboard = app.session.dashboard_mut();
            let point = dashboard.config().geometry.cell_center(row, col);
            dashboard.click(&ClickEvent::at(GRID_VIEW, point));
        }
        KeyCode::Esc => app.session.dashboard_mut().click(&ClickEvent::outside()),
        _ => {}
    }
    false
}

fn draw(frame: &mut Frame, app: &App) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(HW_ROWS as u16 / 2 + 2), Constraint::Length(12)])
        .split(frame.area());
    let top = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Length(HW_COLS as u16 + 2), Constraint::Min(30)])
        .split(rows[0]);

    draw_grid(frame, top[0], app);
    draw_status(frame, top[1], app);
    draw_history(frame, rows[1], app);
}

fn to_color(rgb: Rgb) -> Color {
    let [r, g, b] = rgb.to_rgb8();
    Color::Rgb(r, g, b)
}

/// Two grid rows per terminal line using the upper half block
fn draw_grid(frame: &mut Frame, area: Rect, app: &App) {
    let dashboard = app.session.dashboard();
    let scene = dashboard.scene();
    let grid = dashboard.grid();
    let background = scene
        .view(GRID_VIEW)
        .map_or(Rgb::WHITE, force_grid_core::scene::View::background);

    let cell_color = |row: usize, col: usize| {
        if (row, col) == app.cursor {
            return Color::White;
        }
        grid.cell_region(scene, row, col)
            .map_or(to_color(background), |region| {
                to_color(region.color.over(background, region.opacity))
            })
    };

    let lines: Vec<Line> = (0..HW_ROWS)
        .step_by(2)
        .map(|row| {
            let spans: Vec<Span> = (0..HW_COLS)
                .map(|col| {
                    let top = cell_color(row, col);
                    let bottom = if row + 1 < HW_ROWS {
                        cell_color(row + 1, col)
                    } else {
                        to_color(background)
                    };
                    Span::styled("▀", Style::default().fg(top).bg(bottom))
                })
                .collect();
            Line::from(spans)
        })
        .collect();

    let title = grid
        .time_label()
        .and_then(|id| scene.view(GRID_VIEW)?.label(id))
        .map_or_else(|| "HW Grid".to_string(), |label| label.text.clone());
    let block = Block::default().borders(Borders::ALL).title(title);
    frame.render_widget(Paragraph::new(lines).block(block), area);
}

fn draw_status(frame: &mut Frame, area: Rect, app: &App) {
    let session = &app.session;
    let dashboard = session.dashboard();
    let bold = Style::default().add_modifier(Modifier::BOLD);

    let state = if session.is_playing() {
        "Playing"
    } else {
        "Paused"
    };
    let mut lines = vec![
        Line::from(vec![Span::styled("State: ", bold), Span::raw(state)]),
        Line::from(format!("Sensitivity: {}", session.sensitivity())),
        Line::from(format!(
            "Sensors: {} of {}",
            dashboard.sensor_count(),
            HW_ROWS * HW_COLS
        )),
        Line::from(format!(
            "Step time: {:.2} ms (avg {:.2})",
            session.timer().last_frame_time_ms(),
            session.timer().average_ms()
        )),
        Line::from(""),
    ];

    if let Some(report) = app.last_report {
        lines.push(Line::from(vec![
            Span::styled("T: ", bold),
            Span::raw(format!("{:.1}s", report.timestamp)),
        ]));
        lines.push(Line::from(format!("Total force: {}", report.sample.total)));
        lines.push(Line::from(format!("Peak force: {}", report.sample.peak)));
        lines.push(Line::from(format!("Active sensors: {}", report.sample.active)));
    }

    lines.push(Line::from(""));
    lines.push(Line::from(format!("Cursor: ({}, {})", app.cursor.0, app.cursor.1)));
    lines.push(Line::from(dashboard.detail_text()));
    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
        app.message.clone(),
        Style::default().fg(Color::Yellow),
    )));
    lines.push(Line::from(
        "space play/pause  n step  +/- sensitivity  enter select  q quit",
    ));

    let block = Block::default().borders(Borders::ALL).title("Status");
    frame.render_widget(Paragraph::new(lines).block(block), area);
}

fn draw_history(frame: &mut Frame, area: Rect, app: &App) {
    let history = app.session.dashboard().history();
    let block = Block::default().borders(Borders::ALL).title("Force history");
    let Some((t0, t1)) = history.time_bounds() else {
        frame.render_widget(Paragraph::new("No samples yet.").block(block), area);
        return;
    };
    let t1 = if t1 > t0 { t1 } else { t0 + 1.0 };
    let top = (*history.max_total()).max(1.0);

    let totals = history.total_series();
    let peaks = history.peak_series();
    let datasets = vec![
        Dataset::default()
            .name("total")
            .marker(symbols::Marker::Braille)
            .graph_type(GraphType::Line)
            .style(Style::default().fg(Color::Cyan))
            .data(&totals),
        Dataset::default()
            .name("peak")
            .marker(symbols::Marker::Braille)
            .graph_type(GraphType::Line)
            .style(Style::default().fg(Color::LightRed))
            .data(&peaks),
    ];

    let chart = Chart::new(datasets)
        .block(block)
        .x_axis(
            Axis::default()
                .title("t (s)")
                .bounds([t0, t1])
                .labels([format!("{t0:.1}"), format!("{t1:.1}")]),
        )
        .y_axis(
            Axis::default()
                .title("force")
                .bounds([0.0, top])
                .labels(["0".to_string(), format!("{top:.0}")]),
        );
    frame.render_widget(chart, area);
}
