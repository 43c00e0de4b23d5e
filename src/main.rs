use std::io;
use std::process::ExitCode;
use std::time::Instant;

use anyhow::{Context, Result};
use chrono::Local;
use crossterm::cursor::Show;
use crossterm::event::{self, Event};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::prelude::*;

use nfl_terminal::config::Config;
use nfl_terminal::logging;
use nfl_terminal::refresh::{Action, Flow, LoopEvent, RefreshLoop};
use nfl_terminal::scoreboard::{EspnSource, ScoreSource};
use nfl_terminal::ui;

fn main() -> ExitCode {
    let _ = dotenvy::from_filename(".env.local");
    let _ = dotenvy::from_filename(".env");

    let config = Config::from_env();
    if let Err(err) = logging::init(&config) {
        eprintln!("warning: logging disabled: {err:#}");
    }

    let source = EspnSource::new(config.scoreboard_url.clone());
    let Some(refresh) = RefreshLoop::start(source, Instant::now(), Local::now()) else {
        println!("No game data available. Exiting.");
        return ExitCode::SUCCESS;
    };

    match run(refresh) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            tracing::error!("ui runtime failed: {err:#}");
            eprintln!("Alas, there's been an error: {err:#}");
            ExitCode::FAILURE
        }
    }
}

fn run<S: ScoreSource>(mut refresh: RefreshLoop<S>) -> Result<()> {
    enable_raw_mode().context("failed to enable raw mode")?;
    let res = enter_and_run(&mut refresh);
    first_error(res, restore_terminal())
}

fn enter_and_run<S: ScoreSource>(refresh: &mut RefreshLoop<S>) -> Result<()> {
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen).context("failed to enter alternate screen")?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend).context("failed to start terminal")?;
    run_app(&mut terminal, refresh)
}

/// Every step runs even when an earlier one fails.
fn restore_terminal() -> Result<()> {
    let raw = disable_raw_mode().context("failed to disable raw mode");
    let screen = execute!(io::stdout(), LeaveAlternateScreen, Show)
        .context("failed to leave alternate screen");
    raw.and(screen)
}

/// The run's own error wins over a teardown error.
fn first_error(res: Result<()>, restored: Result<()>) -> Result<()> {
    if let (Err(_), Err(teardown)) = (&res, &restored) {
        tracing::warn!("terminal restore failed: {teardown:#}");
    }
    res.and(restored)
}

fn run_app<B: Backend, S: ScoreSource>(
    terminal: &mut Terminal<B>,
    refresh: &mut RefreshLoop<S>,
) -> Result<()> {
    loop {
        terminal
            .draw(|f| ui::draw(f, refresh.state(), refresh.phase()))
            .context("failed to draw frame")?;

        if refresh.tick_due(Instant::now()) {
            refresh.begin_refresh();
            terminal
                .draw(|f| ui::draw(f, refresh.state(), refresh.phase()))
                .context("failed to draw frame")?;
            refresh.finish_refresh(Instant::now(), Local::now);
            continue;
        }

        let timeout = refresh.until_next_tick(Instant::now());
        if !event::poll(timeout).context("failed to poll terminal events")? {
            continue;
        }
        if let Event::Key(key) = event::read().context("failed to read terminal event")?
            && let Some(action) = Action::from_key(key)
            && refresh.handle(LoopEvent::Key(action)) == Flow::Quit
        {
            return Ok(());
        }
    }
}
