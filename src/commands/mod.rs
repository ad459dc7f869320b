//! Command implementations for the scrape, export and analyze subcommands

pub mod common;
pub mod export;
pub mod home_away;
pub mod leaderboard;
pub mod split_history;
pub mod team_splits;

pub use common::{resolve_data_dir, resolve_path, RunSummary};
