use std::env;
use std::path::PathBuf;
use std::time::Duration;

pub const SCOREBOARD_URL: &str =
    "https://site.api.espn.com/apis/site/v2/sports/football/nfl/scoreboard";

/// Fixed poll period. Not configurable at runtime.
pub const REFRESH_INTERVAL: Duration = Duration::from_secs(15);

const LOG_FILE: &str = "nfl_terminal.log";

#[derive(Debug, Clone)]
pub struct Config {
    pub scoreboard_url: String,
    pub log_path: PathBuf,
}

impl Config {
    pub fn from_env() -> Self {
        let scoreboard_url = env::var("NFL_SCOREBOARD_URL")
            .ok()
            .and_then(non_empty)
            .unwrap_or_else(|| SCOREBOARD_URL.to_string());
        let log_path = env::var("NFL_TERMINAL_LOG")
            .ok()
            .and_then(non_empty)
            .map(PathBuf::from)
            .unwrap_or_else(|| env::temp_dir().join(LOG_FILE));
        Self {
            scoreboard_url,
            log_path,
        }
    }
}

fn non_empty(val: String) -> Option<String> {
    let trimmed = val.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}
