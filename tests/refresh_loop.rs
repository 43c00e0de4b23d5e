use std::cell::Cell;
use std::collections::VecDeque;
use std::rc::Rc;
use std::time::{Duration, Instant};

use chrono::{DateTime, Local, TimeZone};
use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use nfl_terminal::config::REFRESH_INTERVAL;
use nfl_terminal::refresh::{Action, Flow, LoopEvent, Phase, RefreshLoop};
use nfl_terminal::rows::NO_SELECTION_TEXT;
use nfl_terminal::scoreboard::{
    Competitor, GameRecord, GameStatus, ScoreSource, Scoreboard,
};

/// Hands out queued boards, then empty ones.
struct ScriptedSource {
    boards: VecDeque<Scoreboard>,
    calls: usize,
}

impl ScriptedSource {
    fn new(boards: Vec<Scoreboard>) -> Self {
        Self {
            boards: boards.into(),
            calls: 0,
        }
    }
}

impl ScoreSource for ScriptedSource {
    fn fetch(&mut self) -> Scoreboard {
        self.calls += 1;
        self.boards.pop_front().unwrap_or_default()
    }
}

fn at(h: u32, m: u32, s: u32) -> DateTime<Local> {
    Local
        .with_ymd_and_hms(2026, 10, 18, h, m, s)
        .single()
        .expect("valid local time")
}

fn game(id: &str, status: GameStatus) -> GameRecord {
    GameRecord {
        id: id.to_string(),
        name: String::new(),
        competitors: [
            Competitor {
                id: "1".to_string(),
                abbreviation: "ABC".to_string(),
                score: "0".to_string(),
                ..Competitor::default()
            },
            Competitor {
                id: "2".to_string(),
                abbreviation: "XYZ".to_string(),
                score: "0".to_string(),
                ..Competitor::default()
            },
        ],
        status,
        short_detail: String::new(),
        detail: String::new(),
        last_play: None,
    }
}

fn board(games: Vec<GameRecord>) -> Scoreboard {
    Scoreboard {
        season_year: 2026,
        week_number: 7,
        games,
    }
}

fn row_ids<S: ScoreSource>(refresh: &RefreshLoop<S>) -> Vec<String> {
    refresh
        .state()
        .list
        .rows()
        .iter()
        .map(|row| row.game_id.clone())
        .collect()
}

#[test]
fn empty_first_fetch_skips_the_ui() {
    let source = ScriptedSource::new(Vec::new());
    assert!(RefreshLoop::start(source, Instant::now(), at(12, 0, 0)).is_none());
}

#[test]
fn start_builds_rows_and_waits_a_full_interval() {
    let t0 = Instant::now();
    let source = ScriptedSource::new(vec![board(vec![
        game("a", GameStatus::Final),
        game("b", GameStatus::InProgress),
    ])]);
    let refresh = RefreshLoop::start(source, t0, at(12, 0, 0)).expect("games present");

    assert_eq!(refresh.phase(), Phase::Idle);
    assert_eq!(row_ids(&refresh), ["b", "a"]);
    assert_eq!(refresh.state().header(), "NFL Games for Week 7, 2026");
    assert_eq!(refresh.state().list.last_updated(), Some(at(12, 0, 0)));
    assert!(!refresh.tick_due(t0));
    assert_eq!(refresh.until_next_tick(t0), REFRESH_INTERVAL);
    assert!(refresh.tick_due(t0 + REFRESH_INTERVAL));
    assert_eq!(REFRESH_INTERVAL, Duration::from_secs(15));
}

#[test]
fn tick_replaces_rows_and_reschedules() {
    let t0 = Instant::now();
    let source = ScriptedSource::new(vec![
        board(vec![game("a", GameStatus::Scheduled)]),
        board(vec![
            game("a", GameStatus::InProgress),
            game("b", GameStatus::Final),
        ]),
    ]);
    let mut refresh = RefreshLoop::start(source, t0, at(12, 0, 0)).expect("games present");

    let t1 = t0 + REFRESH_INTERVAL;
    let flow = refresh.handle(LoopEvent::Tick {
        now: t1,
        wall_clock: at(12, 0, 15),
    });
    assert_eq!(flow, Flow::Continue);
    assert_eq!(refresh.phase(), Phase::Idle);
    assert_eq!(row_ids(&refresh), ["a", "b"]);
    assert_eq!(refresh.state().list.last_updated(), Some(at(12, 0, 15)));
    assert!(!refresh.tick_due(t1));
    assert!(refresh.tick_due(t1 + REFRESH_INTERVAL));
    assert_eq!(refresh.into_source().calls, 2);
}

#[test]
fn failed_refresh_empties_rows_but_keeps_header() {
    let source = ScriptedSource::new(vec![board(vec![
        game("a", GameStatus::InProgress),
        game("b", GameStatus::InProgress),
    ])]);
    let mut refresh = RefreshLoop::start(source, Instant::now(), at(12, 0, 0)).expect("games");
    refresh.on_key(Action::Down);
    refresh.on_key(Action::Toggle);

    refresh.handle(LoopEvent::Tick {
        now: Instant::now(),
        wall_clock: at(12, 0, 15),
    });

    let list = &refresh.state().list;
    assert!(list.rows().is_empty());
    assert_eq!(list.cursor(), 0);
    assert_eq!(list.selection().ids(), ["b"]);
    assert_eq!(refresh.state().header(), "NFL Games for Week 7, 2026");
}

#[test]
fn selection_comes_back_after_a_transient_empty_fetch() {
    let games = || {
        board(vec![
            game("a", GameStatus::InProgress),
            game("b", GameStatus::InProgress),
        ])
    };
    let source = ScriptedSource::new(vec![games(), Scoreboard::default(), games()]);
    let mut refresh = RefreshLoop::start(source, Instant::now(), at(12, 0, 0)).expect("games");
    refresh.on_key(Action::Toggle);
    assert!(refresh.state().list.is_selected(0));

    refresh.handle(LoopEvent::Tick {
        now: Instant::now(),
        wall_clock: at(12, 0, 15),
    });
    assert!(refresh.state().list.rows().is_empty());

    refresh.handle(LoopEvent::Tick {
        now: Instant::now(),
        wall_clock: at(12, 0, 30),
    });
    assert!(refresh.state().list.is_selected(0));
    assert!(!refresh.state().list.is_selected(1));
    assert_ne!(
        refresh.state().detail_lines(),
        [NO_SELECTION_TEXT.to_string()]
    );
}

/// Flags when its fetch has run.
struct FlaggingSource {
    fetched: Rc<Cell<bool>>,
}

impl ScoreSource for FlaggingSource {
    fn fetch(&mut self) -> Scoreboard {
        self.fetched.set(true);
        board(vec![game("a", GameStatus::InProgress)])
    }
}

#[test]
fn update_time_is_read_after_the_fetch_returns() {
    let fetched = Rc::new(Cell::new(false));
    let source = FlaggingSource {
        fetched: Rc::clone(&fetched),
    };
    let mut refresh = RefreshLoop::start(source, Instant::now(), at(12, 0, 0)).expect("games");
    fetched.set(false);

    refresh.begin_refresh();
    refresh.finish_refresh(Instant::now(), || {
        assert!(fetched.get(), "clock read before the fetch finished");
        at(12, 0, 27)
    });
    assert_eq!(refresh.state().list.last_updated(), Some(at(12, 0, 27)));
}

#[test]
fn keys_move_cursor_and_toggle_without_changing_phase() {
    let source = ScriptedSource::new(vec![board(vec![
        game("a", GameStatus::InProgress),
        game("b", GameStatus::InProgress),
        game("c", GameStatus::InProgress),
    ])]);
    let mut refresh = RefreshLoop::start(source, Instant::now(), at(12, 0, 0)).expect("games");

    assert_eq!(refresh.handle(LoopEvent::Key(Action::Up)), Flow::Continue);
    assert_eq!(refresh.state().list.cursor(), 0);
    refresh.handle(LoopEvent::Key(Action::Down));
    refresh.handle(LoopEvent::Key(Action::Down));
    refresh.handle(LoopEvent::Key(Action::Down));
    assert_eq!(refresh.state().list.cursor(), 2);

    refresh.handle(LoopEvent::Key(Action::Toggle));
    assert!(refresh.state().list.is_selected(2));
    refresh.handle(LoopEvent::Key(Action::Up));
    refresh.handle(LoopEvent::Key(Action::Toggle));
    assert!(refresh.state().list.is_selected(1));
    assert!(refresh.state().list.is_selected(2));
    assert_eq!(refresh.phase(), Phase::Idle);

    assert_eq!(refresh.handle(LoopEvent::Key(Action::Quit)), Flow::Quit);
}

#[test]
fn selection_survives_a_game_changing_bucket() {
    let source = ScriptedSource::new(vec![
        board(vec![
            game("a", GameStatus::InProgress),
            game("b", GameStatus::InProgress),
        ]),
        board(vec![
            game("a", GameStatus::Final),
            game("b", GameStatus::InProgress),
        ]),
    ]);
    let mut refresh = RefreshLoop::start(source, Instant::now(), at(12, 0, 0)).expect("games");
    refresh.on_key(Action::Toggle);
    assert!(refresh.state().list.is_selected(0));

    refresh.handle(LoopEvent::Tick {
        now: Instant::now(),
        wall_clock: at(12, 0, 15),
    });

    assert_eq!(row_ids(&refresh), ["b", "a"]);
    assert!(!refresh.state().list.is_selected(0));
    assert!(refresh.state().list.is_selected(1));
}

#[test]
fn begin_refresh_enters_refreshing() {
    let source = ScriptedSource::new(vec![board(vec![game("a", GameStatus::Final)])]);
    let mut refresh = RefreshLoop::start(source, Instant::now(), at(12, 0, 0)).expect("games");
    refresh.begin_refresh();
    assert_eq!(refresh.phase(), Phase::Refreshing);
    refresh.finish_refresh(Instant::now(), || at(12, 0, 15));
    assert_eq!(refresh.phase(), Phase::Idle);
}

#[test]
fn key_bindings_map_to_actions() {
    let press = |code| KeyEvent::new(code, KeyModifiers::NONE);
    assert_eq!(Action::from_key(press(KeyCode::Up)), Some(Action::Up));
    assert_eq!(Action::from_key(press(KeyCode::Char('k'))), Some(Action::Up));
    assert_eq!(Action::from_key(press(KeyCode::Down)), Some(Action::Down));
    assert_eq!(Action::from_key(press(KeyCode::Char('j'))), Some(Action::Down));
    assert_eq!(Action::from_key(press(KeyCode::Enter)), Some(Action::Toggle));
    assert_eq!(Action::from_key(press(KeyCode::Char(' '))), Some(Action::Toggle));
    assert_eq!(Action::from_key(press(KeyCode::Char('q'))), Some(Action::Quit));
    assert_eq!(Action::from_key(press(KeyCode::Char('x'))), None);
    assert_eq!(
        Action::from_key(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL)),
        Some(Action::Quit)
    );
    assert_eq!(
        Action::from_key(KeyEvent::new_with_kind(
            KeyCode::Char('j'),
            KeyModifiers::NONE,
            KeyEventKind::Release,
        )),
        None
    );
}
