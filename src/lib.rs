pub mod config;
pub mod error;
pub mod http_client;
pub mod logging;
pub mod refresh;
pub mod rows;
pub mod scoreboard;
pub mod state;
pub mod ui;
