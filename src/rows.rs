use crate::scoreboard::{GameKey, GameRecord, GameStatus, Scoreboard};
use crate::state::Selection;

pub const NO_SELECTION_TEXT: &str = "Make a selection for additional info.";
pub const NO_LAST_PLAY_TEXT: &str = "No recent play information available.";

/// Display grouping. Declaration order is the on-screen order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Bucket {
    InProgress,
    Scheduled,
    Final,
}

impl Bucket {
    /// Unrecognised statuses land in the in-progress group.
    pub fn for_status(status: GameStatus) -> Self {
        match status {
            GameStatus::Final => Bucket::Final,
            GameStatus::Scheduled => Bucket::Scheduled,
            GameStatus::InProgress | GameStatus::Unknown => Bucket::InProgress,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisplayRow {
    pub game_id: GameKey,
    pub text: String,
    pub bucket: Bucket,
}

/// One row per record: in-progress first, then scheduled, then final, each
/// group in feed order.
pub fn format_rows(records: &[GameRecord]) -> Vec<DisplayRow> {
    let mut rows: Vec<DisplayRow> = records.iter().map(format_row).collect();
    // stable sort keeps feed order inside a bucket
    rows.sort_by_key(|row| row.bucket);
    rows
}

pub fn format_row(record: &GameRecord) -> DisplayRow {
    let bucket = Bucket::for_status(record.status);
    let mut text = score_line(record);
    if bucket == Bucket::InProgress
        && let Some(play) = record.last_play.as_ref()
        && !play.text.trim().is_empty()
    {
        let team = record
            .abbreviation_for(play.team_id.as_deref())
            .unwrap_or_default();
        text.push_str(&format!(" - ({team}): {}", play.text));
    }
    DisplayRow {
        game_id: record.id.clone(),
        text,
        bucket,
    }
}

fn score_line(record: &GameRecord) -> String {
    let [a, b] = &record.competitors;
    format!(
        "{:>3} {:<2}-{:>2} {:>3}: {}",
        a.abbreviation,
        a.score,
        b.score,
        b.abbreviation,
        record.status_detail()
    )
}

/// Lines for the detail panel: a heading and last play for every selected
/// game still on the board.
pub fn detail_lines(board: &Scoreboard, selection: &Selection) -> Vec<String> {
    let games: Vec<&GameRecord> = board
        .games
        .iter()
        .filter(|game| selection.contains(&game.id))
        .collect();
    if games.is_empty() {
        return vec![NO_SELECTION_TEXT.to_string()];
    }

    let mut lines = Vec::with_capacity(games.len() * 2);
    for game in games {
        let [a, b] = &game.competitors;
        lines.push(format!(
            "{} {} - {} {}: {}",
            a.abbreviation,
            a.score,
            b.score,
            b.abbreviation,
            if game.detail.trim().is_empty() {
                game.status_detail()
            } else {
                game.detail.as_str()
            }
        ));
        lines.push(format!("  {}", last_play_line(game)));
    }
    lines
}

pub fn last_play_line(game: &GameRecord) -> String {
    match game.last_play.as_ref() {
        Some(play) if !play.text.trim().is_empty() => {
            let team = game
                .abbreviation_for(play.team_id.as_deref())
                .unwrap_or_default();
            format!("({team}): {}", play.text)
        }
        _ => NO_LAST_PLAY_TEXT.to_string(),
    }
}
