use std::collections::BTreeSet;

use chrono::{DateTime, Local};

use crate::rows::{self, DisplayRow};
use crate::scoreboard::{GameKey, Scoreboard};

/// Selected games, keyed by game id so a refresh that reorders rows keeps
/// pointing at the same games.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selection {
    Single(Option<GameKey>),
    Multi(BTreeSet<GameKey>),
}

impl Default for Selection {
    fn default() -> Self {
        Selection::Multi(BTreeSet::new())
    }
}

impl Selection {
    pub fn single() -> Self {
        Selection::Single(None)
    }

    pub fn multi() -> Self {
        Selection::Multi(BTreeSet::new())
    }

    pub fn contains(&self, id: &str) -> bool {
        match self {
            Selection::Single(selected) => selected.as_deref() == Some(id),
            Selection::Multi(set) => set.contains(id),
        }
    }

    pub fn is_empty(&self) -> bool {
        match self {
            Selection::Single(selected) => selected.is_none(),
            Selection::Multi(set) => set.is_empty(),
        }
    }

    pub fn ids(&self) -> Vec<&str> {
        match self {
            Selection::Single(selected) => selected.as_deref().into_iter().collect(),
            Selection::Multi(set) => set.iter().map(String::as_str).collect(),
        }
    }

    /// Single overwrites; multi flips membership.
    #[must_use]
    pub fn toggle(self, id: GameKey) -> Self {
        match self {
            Selection::Single(_) => Selection::Single(Some(id)),
            Selection::Multi(mut set) => {
                if !set.remove(&id) {
                    set.insert(id);
                }
                Selection::Multi(set)
            }
        }
    }
}

/// Rows on screen plus cursor and selection. Every transition consumes the
/// state and returns the next one.
///
/// Invariant: `cursor < rows.len()` whenever rows is non-empty, else 0.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListState {
    rows: Vec<DisplayRow>,
    cursor: usize,
    selection: Selection,
    last_updated: Option<DateTime<Local>>,
}

impl ListState {
    pub fn new(selection: Selection) -> Self {
        Self {
            selection,
            ..Self::default()
        }
    }

    pub fn rows(&self) -> &[DisplayRow] {
        &self.rows
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn cursor_row(&self) -> Option<&DisplayRow> {
        self.rows.get(self.cursor)
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    pub fn last_updated(&self) -> Option<DateTime<Local>> {
        self.last_updated
    }

    pub fn is_selected(&self, index: usize) -> bool {
        self.rows
            .get(index)
            .is_some_and(|row| self.selection.contains(&row.game_id))
    }

    #[must_use]
    pub fn move_cursor(mut self, delta: isize) -> Self {
        if self.rows.is_empty() {
            return self;
        }
        let last = self.rows.len() - 1;
        self.cursor = self.cursor.saturating_add_signed(delta).min(last);
        self
    }

    /// Out-of-range indices leave the selection untouched.
    #[must_use]
    pub fn toggle_select(mut self, index: usize) -> Self {
        let Some(id) = self.rows.get(index).map(|row| row.game_id.clone()) else {
            return self;
        };
        self.selection = self.selection.toggle(id);
        self
    }

    /// Clamps the cursor into the new bounds. The selection is carried over
    /// as-is: ids missing from `rows` match nothing until their game returns.
    #[must_use]
    pub fn replace_rows(mut self, rows: Vec<DisplayRow>) -> Self {
        self.cursor = self.cursor.min(rows.len().saturating_sub(1));
        self.rows = rows;
        self
    }

    #[must_use]
    pub fn touch(mut self, now: DateTime<Local>) -> Self {
        self.last_updated = Some(now);
        self
    }
}

/// Everything the dashboard knows: the latest scoreboard and the list built
/// from it.
#[derive(Debug, Clone, Default)]
pub struct AppState {
    pub scoreboard: Scoreboard,
    pub list: ListState,
    header: String,
}

impl AppState {
    pub fn new(scoreboard: Scoreboard, now: DateTime<Local>) -> Self {
        let mut state = Self::default();
        state.apply_scoreboard(scoreboard, now);
        state
    }

    /// Rebuild rows from a fresh scoreboard. An empty board still clears the
    /// rows; the header keeps the last known week.
    pub fn apply_scoreboard(&mut self, scoreboard: Scoreboard, now: DateTime<Local>) {
        if !scoreboard.is_empty() || self.header.is_empty() {
            self.header = scoreboard.header();
        }
        let rows = rows::format_rows(&scoreboard.games);
        self.list = std::mem::take(&mut self.list).replace_rows(rows).touch(now);
        self.scoreboard = scoreboard;
    }

    pub fn move_cursor(&mut self, delta: isize) {
        self.list = std::mem::take(&mut self.list).move_cursor(delta);
    }

    pub fn toggle_cursor_row(&mut self) {
        let cursor = self.list.cursor();
        self.list = std::mem::take(&mut self.list).toggle_select(cursor);
    }

    pub fn header(&self) -> &str {
        &self.header
    }

    pub fn detail_lines(&self) -> Vec<String> {
        rows::detail_lines(&self.scoreboard, self.list.selection())
    }
}
