//! Entry point: parse CLI and dispatch to command handlers.

use clap::Parser;
use diamond_scrape::{
    analysis::DEFAULT_METRICS,
    cli::{AnalyzeCmd, Commands, Diamond, ScrapeCmd},
    commands::{
        export::handle_export, home_away::handle_home_away, leaderboard::handle_leaderboard,
        resolve_data_dir, split_history::handle_split_history, team_splits::handle_team_splits,
    },
    Result, SeasonRange,
};
use tracing_subscriber::EnvFilter;

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_target(false)
        .init();
}

/// Run the CLI.
#[tokio::main]
async fn main() -> Result<()> {
    let app = Diamond::parse();
    init_tracing(app.verbose);

    let data_dir = resolve_data_dir(app.data_dir);

    match app.command {
        Commands::Scrape { cmd } => match cmd {
            ScrapeCmd::Leaderboard { session, url, db } => {
                handle_leaderboard(&session, &url, db, &data_dir).await?
            }

            ScrapeCmd::TeamSplits {
                session,
                team,
                season,
                db,
            } => handle_team_splits(&session, &team, season, db, &data_dir).await?,

            ScrapeCmd::SplitHistory {
                session,
                team,
                from,
                to,
                split_filter,
                db,
            } => {
                let seasons = SeasonRange::new(from, to)?;
                handle_split_history(&session, &team, seasons, &split_filter, db, &data_dir)
                    .await?
            }
        },

        Commands::Export { db, out } => handle_export(db, out, &data_dir)?,

        Commands::Analyze { cmd } => match cmd {
            AnalyzeCmd::HomeAway {
                team,
                db,
                chart,
                metrics,
            } => {
                let metrics = metrics.unwrap_or_else(|| {
                    DEFAULT_METRICS.iter().map(|m| m.to_string()).collect()
                });
                handle_home_away(&team, db, chart, metrics, &data_dir)?
            }
        },
    }

    Ok(())
}
