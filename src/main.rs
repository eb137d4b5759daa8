//! fid-probe - measure first input delay of a terminal session
//!
//! Terminal input is replayed as page interaction events through the
//! recorder, so the first key press or click shows its input delay.

use anyhow::{Context, Result};
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout},
    style::Style,
    widgets::{Block, Borders, Paragraph},
    Terminal,
};
use std::fs::File;
use std::io::stdout;
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use first_input_delay::{
    config::Config,
    ui::{App, AppState, EventLog, ResultsPanel, StatusBar, ThemeColors},
};

fn init_logging() -> Result<()> {
    let file = File::create("fid-probe.log").context("creating fid-probe.log")?;
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn"))
        .target(env_logger::Target::Pipe(Box::new(file)))
        .init();
    Ok(())
}

fn restore_terminal() {
    let _ = disable_raw_mode();
    let _ = execute!(stdout(), LeaveAlternateScreen, DisableMouseCapture);
}

fn main() -> Result<()> {
    init_logging()?;

    let config = Config::load().unwrap_or_else(|e| {
        log::warn!("using default configuration: {}", e);
        Config::default()
    });
    let colors = ThemeColors::from_theme(config.ui.theme);
    let tick_rate = config.refresh_interval();

    let interrupted = Arc::new(AtomicBool::new(false));
    {
        let interrupted = Arc::clone(&interrupted);
        ctrlc::set_handler(move || interrupted.store(true, Ordering::SeqCst))
            .context("installing interrupt handler")?;
    }

    // Setup terminal
    enable_raw_mode()?;
    let mut out = stdout();
    execute!(out, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(out);
    let mut terminal = Terminal::new(backend)?;

    // The recorder starts listening here, before any input is read.
    let mut app = App::new(config);

    let result = run(&mut terminal, &mut app, colors, tick_rate, &interrupted);

    restore_terminal();
    terminal.show_cursor()?;
    result?;

    match app.recorder.first_input() {
        Some(record) => println!(
            "First input delay: {:.2} ms ({})",
            record.delay(),
            record.event().kind
        ),
        None => println!("No qualifying input was recorded."),
    }
    println!("Events dispatched: {}", app.total_events);
    println!("Session duration: {}", app.elapsed_formatted());

    Ok(())
}

fn run(
    terminal: &mut Terminal<CrosstermBackend<std::io::Stdout>>,
    app: &mut App,
    colors: ThemeColors,
    tick_rate: std::time::Duration,
    interrupted: &AtomicBool,
) -> Result<()> {
    loop {
        terminal.draw(|frame| {
            let chunks = Layout::default()
                .direction(Direction::Vertical)
                .constraints([
                    Constraint::Length(3),  // Title
                    Constraint::Length(10), // Results
                    Constraint::Min(5),     // Event log
                    Constraint::Length(1),  // Status bar
                ])
                .split(frame.area());

            let title = Paragraph::new(" Press a key or click to measure first input delay. e: export, q/Esc: quit")
                .style(Style::default().fg(colors.fg).bg(colors.bg))
                .block(
                    Block::default()
                        .title(" fid-probe ")
                        .borders(Borders::ALL)
                        .border_style(Style::default().fg(colors.accent)),
                );
            frame.render_widget(title, chunks[0]);

            let results = app.results();
            frame.render_widget(ResultsPanel::new(&results, " First Input ", colors), chunks[1]);

            let log = app.log();
            frame.render_widget(EventLog::new(&log, colors), chunks[2]);

            let elapsed = app.elapsed_formatted();
            let status = StatusBar::new(app.state.label(), &elapsed, app.total_events, colors)
                .message(app.get_status());
            frame.render_widget(status, chunks[3]);
        })?;

        if event::poll(tick_rate)? {
            let time_stamp = app.now();
            let ev = event::read()?;
            app.handle_terminal_event(&ev, time_stamp);

            if let Event::Key(key) = ev {
                if key.kind == KeyEventKind::Press {
                    match key.code {
                        KeyCode::Char('q') | KeyCode::Esc => app.quit(),
                        KeyCode::Char('e') => {
                            let filename = PathBuf::from(format!(
                                "fid_report_{}.json",
                                chrono::Utc::now().format("%Y%m%d_%H%M%S")
                            ));
                            if let Err(e) = app.export_report(&filename) {
                                app.set_status(format!("Export failed: {}", e));
                            }
                        }
                        _ => {}
                    }
                }
            }
        }

        if interrupted.load(Ordering::SeqCst) {
            app.quit();
        }
        if app.state == AppState::Quitting {
            return Ok(());
        }
    }
}
