use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use env_logger::Env;
use log::info;
use serde::Serialize;

use bepro_analytics::auth::UserTable;
use bepro_analytics::{
    AnalyticsConfig, DetailedCache, EventStore, Selection, SelectorOptions, match_report,
    player_report, refresh, team_report,
};

#[derive(Parser, Debug)]
#[command(
    name = "bepro-analytics",
    about = "Team, player and match analytics over football event data",
    version
)]
struct Cli {
    /// Directory holding the parquet tables
    #[arg(long = "data-dir", env = "BEPRO_DATA_DIR", global = true)]
    data_dir: Option<PathBuf>,

    /// Substring identifying the club's teams in the selectors
    #[arg(long, env = "BEPRO_CLUB", global = true)]
    club: Option<String>,

    /// JSON configuration file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[arg(long = "log-level", default_value = "info", global = true)]
    log_level: String,

    /// Pretty-print the JSON output
    #[arg(long, global = true)]
    pretty: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Rows and columns of every source table
    Inspect,
    /// Selector options for a (partial) selection. Choices the data no
    /// longer offers are dropped from the echoed selection.
    Catalog {
        #[arg(long)]
        team: Option<String>,
        #[arg(long)]
        season: Option<String>,
        #[arg(long = "match-id")]
        match_id: Option<String>,
        #[arg(long = "player-id")]
        player_id: Option<String>,
    },
    /// Team page charts for a team and season ("Todas" for every season)
    Team {
        #[arg(long)]
        team: String,
        #[arg(long)]
        season: String,
        /// Narrow the charts to a single match
        #[arg(long = "match-id")]
        match_id: Option<String>,
    },
    /// Player page charts
    Player {
        #[arg(long = "player-id")]
        player_id: String,
        #[arg(long = "season-id", required = true)]
        season_ids: Vec<String>,
    },
    /// Check a username/password against the users table
    Login {
        #[arg(long)]
        username: String,
        #[arg(long)]
        password: String,
    },
}

#[derive(Serialize)]
struct CatalogView {
    selection: Selection,
    options: SelectorOptions,
}

#[derive(Serialize)]
struct LoginOutcome<'a> {
    username: &'a str,
    allowed: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    env_logger::Builder::from_env(Env::default().default_filter_or(cli.log_level.as_str()))
        .format_timestamp(None)
        .init();

    let config = load_config(&cli)?;

    if let Command::Login { username, password } = &cli.command {
        let users = UserTable::load(&config.users_path)?;
        let allowed = users.check(username, password);
        emit(&LoginOutcome { username, allowed }, cli.pretty)?;
        if !allowed {
            std::process::exit(1);
        }
        return Ok(());
    }

    let store = Arc::new(EventStore::open(&config));
    info!("event store ready from {}", config.data_dir.display());

    match &cli.command {
        Command::Inspect => emit(&store.describe(), cli.pretty),
        Command::Catalog {
            team,
            season,
            match_id,
            player_id,
        } => {
            let selection = Selection::new(team.clone(), season.clone())
                .with_match(match_id.clone())
                .with_player(player_id.clone());
            let (selection, options) = refresh(store.events()?, &config, &selection)?;
            emit(&CatalogView { selection, options }, cli.pretty)
        }
        Command::Team {
            team,
            season,
            match_id,
        } => {
            let cache = DetailedCache::new();
            let selection = Selection::new(Some(team.clone()), Some(season.clone()))
                .with_match(match_id.clone());
            let report = if selection.match_id.is_some() {
                match_report(&store, Some(&cache), &config, &selection)
            } else {
                team_report(&store, Some(&cache), &config, &selection)
            };
            emit(&report, cli.pretty)
        }
        Command::Player {
            player_id,
            season_ids,
        } => emit(&player_report(&store, &config, player_id, season_ids), cli.pretty),
        Command::Login { .. } => Ok(()),
    }
}

fn load_config(cli: &Cli) -> Result<AnalyticsConfig> {
    let mut config = match &cli.config {
        Some(path) => AnalyticsConfig::from_json_file(path)
            .with_context(|| format!("reading config {}", path.display()))?,
        None => AnalyticsConfig::default(),
    };
    if let Some(dir) = &cli.data_dir {
        config.data_dir = dir.clone();
    }
    if let Some(club) = &cli.club {
        config.club_filter = club.clone();
    }
    Ok(config)
}

fn emit<T: Serialize>(value: &T, pretty: bool) -> Result<()> {
    let out = if pretty {
        serde_json::to_string_pretty(value)?
    } else {
        serde_json::to_string(value)?
    };
    println!("{}", out);
    Ok(())
}
