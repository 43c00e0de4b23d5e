use reqwest::StatusCode;
use serde::{Deserialize, Deserializer};
use serde_json::Value;
use tracing::{debug, info, instrument, warn};

use crate::error::{FetchError, Result};
use crate::http_client::http_client;

/// Game identifier used to key selections across refreshes.
pub type GameKey = String;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Scoreboard {
    pub season_year: i32,
    pub week_number: i32,
    pub games: Vec<GameRecord>,
}

impl Scoreboard {
    pub fn is_empty(&self) -> bool {
        self.games.is_empty()
    }

    pub fn header(&self) -> String {
        format!(
            "NFL Games for Week {}, {}",
            self.week_number, self.season_year
        )
    }

    pub fn game(&self, id: &str) -> Option<&GameRecord> {
        self.games.iter().find(|game| game.id == id)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameRecord {
    pub id: GameKey,
    pub name: String,
    /// Competitors in feed order.
    pub competitors: [Competitor; 2],
    pub status: GameStatus,
    pub short_detail: String,
    pub detail: String,
    pub last_play: Option<LastPlay>,
}

impl GameRecord {
    /// Short status line, falling back to the long form when the feed leaves
    /// it blank.
    pub fn status_detail(&self) -> &str {
        if self.short_detail.trim().is_empty() {
            &self.detail
        } else {
            &self.short_detail
        }
    }

    /// Abbreviation of the competitor whose id matches `team_id`.
    pub fn abbreviation_for(&self, team_id: Option<&str>) -> Option<&str> {
        let team_id = team_id?;
        self.competitors
            .iter()
            .find(|c| c.id == team_id)
            .map(|c| c.abbreviation.as_str())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Competitor {
    pub id: String,
    pub abbreviation: String,
    pub display_name: String,
    pub home_away: String,
    /// Kept as text so non-numeric values survive.
    pub score: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LastPlay {
    pub text: String,
    pub team_id: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GameStatus {
    Scheduled,
    InProgress,
    Final,
    Unknown,
}

impl GameStatus {
    pub fn from_type_name(name: &str) -> Self {
        match name {
            "STATUS_SCHEDULED" => GameStatus::Scheduled,
            "STATUS_IN_PROGRESS" => GameStatus::InProgress,
            "STATUS_FINAL" => GameStatus::Final,
            _ => GameStatus::Unknown,
        }
    }
}

/// Anything the refresh loop can poll for a fresh scoreboard.
pub trait ScoreSource {
    /// Never fails: an empty scoreboard means "no data this cycle".
    fn fetch(&mut self) -> Scoreboard;
}

#[derive(Debug, Clone)]
pub struct EspnSource {
    url: String,
}

impl EspnSource {
    pub fn new(url: impl Into<String>) -> Self {
        Self { url: url.into() }
    }
}

impl ScoreSource for EspnSource {
    fn fetch(&mut self) -> Scoreboard {
        fetch(&self.url)
    }
}

/// Fetch the scoreboard, logging and swallowing every failure.
pub fn fetch(url: &str) -> Scoreboard {
    match fetch_scoreboard(url) {
        Ok(board) => {
            if board.is_empty() {
                warn!(url, "no events found in the scoreboard response");
            }
            board
        }
        Err(FetchError::NotFound) => {
            info!(
                url,
                "scoreboard endpoint not found; offseason or the endpoint moved"
            );
            Scoreboard::default()
        }
        Err(err) => {
            warn!(url, error = %err, "scoreboard fetch failed");
            Scoreboard::default()
        }
    }
}

#[instrument(level = "debug")]
pub fn fetch_scoreboard(url: &str) -> Result<Scoreboard> {
    let client = http_client()?;
    let resp = client.get(url).send().map_err(|source| FetchError::Http {
        url: url.to_string(),
        source,
    })?;
    let status = resp.status();
    let body = resp.text().map_err(|source| FetchError::Body {
        url: url.to_string(),
        source,
    })?;

    if !status.is_success() {
        if status == StatusCode::NOT_FOUND {
            return Err(FetchError::NotFound);
        }
        return match parse_scoreboard_json(&body) {
            Err(FetchError::NotFound) => Err(FetchError::NotFound),
            _ => Err(FetchError::UnexpectedStatus {
                url: url.to_string(),
                status,
            }),
        };
    }

    let board = parse_scoreboard_json(&body)?;
    debug!(games = board.games.len(), "parsed scoreboard");
    Ok(board)
}

pub fn parse_scoreboard_json(raw: &str) -> Result<Scoreboard> {
    let trimmed = raw.trim();
    if trimmed.is_empty() || trimmed == "null" {
        return Ok(Scoreboard::default());
    }
    let data: EspnResponse = serde_json::from_str(trimmed)?;
    if data.code == Some(404) {
        return Err(FetchError::NotFound);
    }
    Ok(build_scoreboard(data))
}

fn build_scoreboard(data: EspnResponse) -> Scoreboard {
    let mut games = Vec::with_capacity(data.events.len());
    for (idx, event) in data.events.into_iter().enumerate() {
        match build_game(idx, event) {
            Some(game) => games.push(game),
            None => debug!(index = idx, "skipping event without two competitors"),
        }
    }
    Scoreboard {
        season_year: data.season.map(|s| s.year).unwrap_or_default(),
        week_number: data.week.map(|w| w.number).unwrap_or_default(),
        games,
    }
}

fn build_game(idx: usize, event: EspnEvent) -> Option<GameRecord> {
    let competition = event.competitions.into_iter().next()?;
    let mut competitors = competition.competitors.into_iter().map(build_competitor);
    let first = competitors.next()?;
    let second = competitors.next()?;

    let last_play = competition
        .situation
        .and_then(|s| s.last_play)
        .map(|play| LastPlay {
            text: play.text,
            team_id: play.team.and_then(|t| t.id).and_then(non_empty),
        });

    let id = if event.id.trim().is_empty() {
        idx.to_string()
    } else {
        event.id
    };

    Some(GameRecord {
        id,
        name: event.name,
        competitors: [first, second],
        status: GameStatus::from_type_name(&event.status.kind.name),
        short_detail: event.status.kind.short_detail,
        detail: event.status.kind.detail,
        last_play,
    })
}

fn build_competitor(raw: EspnCompetitor) -> Competitor {
    let id = non_empty(raw.id)
        .or(raw.team.id)
        .unwrap_or_default();
    Competitor {
        id,
        abbreviation: raw.team.abbreviation,
        display_name: raw.team.display_name,
        home_away: raw.home_away,
        score: raw.score,
    }
}

fn non_empty(val: String) -> Option<String> {
    if val.trim().is_empty() {
        None
    } else {
        Some(val)
    }
}

/// Accepts a JSON string, number or null and yields display text.
fn lenient_text<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(s)) => s,
        Some(other) => other.to_string(),
    })
}

fn lenient_opt_text<'de, D>(deserializer: D) -> std::result::Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    lenient_text(deserializer).map(non_empty)
}

#[derive(Debug, Deserialize)]
struct EspnResponse {
    #[serde(default)]
    code: Option<i64>,
    #[serde(default)]
    season: Option<EspnSeason>,
    #[serde(default)]
    week: Option<EspnWeek>,
    #[serde(default)]
    events: Vec<EspnEvent>,
}

#[derive(Debug, Deserialize)]
struct EspnSeason {
    #[serde(default)]
    year: i32,
}

#[derive(Debug, Deserialize)]
struct EspnWeek {
    #[serde(default)]
    number: i32,
}

#[derive(Debug, Deserialize)]
struct EspnEvent {
    #[serde(default, deserialize_with = "lenient_text")]
    id: String,
    #[serde(default)]
    name: String,
    #[serde(default)]
    competitions: Vec<EspnCompetition>,
    #[serde(default)]
    status: EspnStatus,
}

#[derive(Debug, Deserialize)]
struct EspnCompetition {
    #[serde(default)]
    competitors: Vec<EspnCompetitor>,
    #[serde(default)]
    situation: Option<EspnSituation>,
}

#[derive(Debug, Deserialize)]
struct EspnCompetitor {
    #[serde(default, deserialize_with = "lenient_text")]
    id: String,
    #[serde(default)]
    team: EspnTeam,
    #[serde(rename = "homeAway", default)]
    home_away: String,
    #[serde(default, deserialize_with = "lenient_text")]
    score: String,
}

#[derive(Debug, Default, Deserialize)]
struct EspnTeam {
    #[serde(default, deserialize_with = "lenient_opt_text")]
    id: Option<String>,
    #[serde(default)]
    abbreviation: String,
    #[serde(rename = "displayName", default)]
    display_name: String,
}

#[derive(Debug, Default, Deserialize)]
struct EspnStatus {
    #[serde(rename = "type", default)]
    kind: EspnStatusType,
}

#[derive(Debug, Default, Deserialize)]
struct EspnStatusType {
    #[serde(default)]
    name: String,
    #[serde(rename = "shortDetail", default)]
    short_detail: String,
    #[serde(default)]
    detail: String,
}

#[derive(Debug, Deserialize)]
struct EspnSituation {
    #[serde(rename = "lastPlay", default)]
    last_play: Option<EspnLastPlay>,
}

#[derive(Debug, Deserialize)]
struct EspnLastPlay {
    #[serde(default)]
    text: String,
    #[serde(default)]
    team: Option<EspnPlayTeam>,
}

#[derive(Debug, Deserialize)]
struct EspnPlayTeam {
    #[serde(default, deserialize_with = "lenient_opt_text")]
    id: Option<String>,
}
