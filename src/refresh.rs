use std::time::{Duration, Instant};

use chrono::{DateTime, Local};
use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use tracing::{debug, info};

use crate::config::REFRESH_INTERVAL;
use crate::scoreboard::ScoreSource;
use crate::state::AppState;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Idle,
    Refreshing,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Up,
    Down,
    Toggle,
    Quit,
}

impl Action {
    pub fn from_key(key: KeyEvent) -> Option<Self> {
        if key.kind != KeyEventKind::Press {
            return None;
        }
        match key.code {
            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                Some(Action::Quit)
            }
            KeyCode::Char('q') => Some(Action::Quit),
            KeyCode::Up | KeyCode::Char('k') => Some(Action::Up),
            KeyCode::Down | KeyCode::Char('j') => Some(Action::Down),
            KeyCode::Enter | KeyCode::Char(' ') => Some(Action::Toggle),
            _ => None,
        }
    }
}

#[derive(Debug, Clone)]
pub enum LoopEvent {
    Tick {
        now: Instant,
        wall_clock: DateTime<Local>,
    },
    Key(Action),
}

/// Owns the dashboard state and the poll timer. Ticks fetch, format and
/// replace rows; keys move the cursor and toggle selections.
pub struct RefreshLoop<S> {
    source: S,
    state: AppState,
    phase: Phase,
    next_tick: Instant,
}

impl<S: ScoreSource> RefreshLoop<S> {
    /// Runs the first fetch. `None` when the source has no games at all.
    pub fn start(mut source: S, now: Instant, wall_clock: DateTime<Local>) -> Option<Self> {
        let scoreboard = source.fetch();
        if scoreboard.is_empty() {
            return None;
        }
        info!(
            games = scoreboard.games.len(),
            week = scoreboard.week_number,
            season = scoreboard.season_year,
            "initial scoreboard loaded"
        );
        Some(Self {
            source,
            state: AppState::new(scoreboard, wall_clock),
            phase: Phase::Idle,
            next_tick: now + REFRESH_INTERVAL,
        })
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn tick_due(&self, now: Instant) -> bool {
        now >= self.next_tick
    }

    pub fn until_next_tick(&self, now: Instant) -> Duration {
        self.next_tick.saturating_duration_since(now)
    }

    pub fn begin_refresh(&mut self) {
        self.phase = Phase::Refreshing;
    }

    /// Blocks on the fetch, swaps in the new rows and schedules the next
    /// tick one interval after `now`. `wall_clock` is read once the fetch
    /// has returned.
    pub fn finish_refresh(
        &mut self,
        now: Instant,
        wall_clock: impl FnOnce() -> DateTime<Local>,
    ) {
        let scoreboard = self.source.fetch();
        debug!(games = scoreboard.games.len(), "refresh complete");
        self.state.apply_scoreboard(scoreboard, wall_clock());
        self.next_tick = now + REFRESH_INTERVAL;
        self.phase = Phase::Idle;
    }

    pub fn on_key(&mut self, action: Action) -> Flow {
        match action {
            Action::Quit => return Flow::Quit,
            Action::Up => self.state.move_cursor(-1),
            Action::Down => self.state.move_cursor(1),
            Action::Toggle => self.state.toggle_cursor_row(),
        }
        Flow::Continue
    }

    pub fn handle(&mut self, event: LoopEvent) -> Flow {
        match event {
            LoopEvent::Tick { now, wall_clock } => {
                self.begin_refresh();
                self.finish_refresh(now, || wall_clock);
                Flow::Continue
            }
            LoopEvent::Key(action) => self.on_key(action),
        }
    }

    pub fn into_source(self) -> S {
        self.source
    }
}
