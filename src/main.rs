// SPDX-License-Identifier: MIT

use anyhow::Result;
use clap::builder::styling::{AnsiColor, Effects, Styles};
use clap::{Parser, Subcommand};
use std::fs::File;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::prelude::*;

use flick::Config;
use flick::commands::{self, App};
use flick::models::MediaType;

fn cargo_style() -> Styles {
    Styles::styled()
        .header(AnsiColor::Green.on_default() | Effects::BOLD)
        .usage(AnsiColor::Green.on_default() | Effects::BOLD)
        .literal(AnsiColor::Cyan.on_default() | Effects::BOLD)
        .placeholder(AnsiColor::Cyan.on_default())
}

#[derive(Parser)]
#[command(name = "flick")]
#[command(about = "Browse movie/TV metadata and resolve embed playback URLs")]
#[command(version)]
#[command(styles = cargo_style())]
struct Cli {
    /// Enable verbose (debug) logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Enable debug logging to file (flick_debug.log)
    #[arg(long, global = true)]
    debug_log: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Front page: trending plus popular movies and shows
    Home {
        #[arg(short, long, default_value_t = 1)]
        page: u32,
    },

    /// Titles trending this week
    Trending {
        #[arg(short, long, default_value_t = 1)]
        page: u32,
    },

    /// Popular titles, filtered to the configured streaming providers
    Discover {
        /// Media type (movie or tv)
        media: MediaType,
        #[arg(short, long, default_value_t = 1)]
        page: u32,
        /// Restrict to a genre id (see the catalog's genre list)
        #[arg(short, long)]
        genre: Option<u64>,
    },

    /// Search movies and TV shows
    Search {
        query: String,
        #[arg(short, long, default_value_t = 1)]
        page: u32,
    },

    /// Full details for one title: cast, similar titles, where to stream
    Details {
        /// Media type (movie or tv)
        media: MediaType,
        id: u64,
    },

    /// Resolve an embed URL for a title and record it in history
    Watch {
        /// Media type (movie or tv)
        media: MediaType,
        id: u64,
        /// Server index (1-based as listed by this command)
        #[arg(short, long)]
        server: Option<usize>,
        /// Season number (tv only)
        #[arg(long)]
        season: Option<u32>,
        /// Episode number (tv only)
        #[arg(short, long)]
        episode: Option<u32>,
    },

    /// Manage the watchlist
    #[command(subcommand)]
    Watchlist(WatchlistCommand),

    /// Manage the watch history
    #[command(subcommand)]
    History(HistoryCommand),

    /// Show or edit configuration
    #[command(subcommand)]
    Config(ConfigCommand),
}

#[derive(Subcommand)]
enum WatchlistCommand {
    /// Add a title
    Add { media: MediaType, id: u64 },
    /// Remove a title
    Remove { media: MediaType, id: u64 },
    /// List all entries
    List,
}

#[derive(Subcommand)]
enum HistoryCommand {
    /// List history, most recent first
    List,
    /// Clear all history
    Clear,
}

#[derive(Subcommand)]
enum ConfigCommand {
    /// Print the active configuration
    Show,
    /// Set the catalog credential (prompts when omitted)
    SetKey { key: Option<String> },
    /// Set the watch region (prompts when omitted)
    SetRegion { region: Option<String> },
}

/// The CLI takes 1-based server numbers; the selection is 0-based.
fn server_flag_to_index(server: Option<usize>) -> Result<Option<usize>> {
    match server {
        Some(0) => anyhow::bail!("Server numbers start at 1"),
        Some(number) => Ok(Some(number - 1)),
        None => Ok(None),
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Setup logging
    if cli.debug_log {
        let file = File::create("flick_debug.log")?;
        let file_layer = tracing_subscriber::fmt::layer()
            .with_writer(file)
            .with_ansi(false)
            .with_level(true)
            .with_file(true)
            .with_line_number(true);

        tracing_subscriber::registry()
            .with(file_layer)
            .with(
                EnvFilter::from_default_env()
                    .add_directive("flick=debug".parse()?)
                    .add_directive("hyper_util=error".parse()?),
            )
            .init();
    } else if cli.verbose {
        tracing_subscriber::fmt()
            .with_env_filter(
                EnvFilter::from_default_env()
                    .add_directive(tracing::Level::DEBUG.into())
                    .add_directive("hyper_util=error".parse()?),
            )
            .init();
    } else if std::env::var("RUST_LOG").is_ok() {
        tracing_subscriber::fmt()
            .with_env_filter(
                EnvFilter::from_default_env().add_directive("hyper_util=error".parse()?),
            )
            .init();
    }

    let config_path = Config::default_path();
    let mut config = if config_path.exists() {
        Config::load_or_default(&config_path)
    } else {
        Config::default_with_providers()
    };

    // Config edits run before the credential check so a first run can
    // configure things non-interactively.
    if let Commands::Config(cmd) = &cli.command {
        match cmd {
            ConfigCommand::Show => commands::config::show(&config),
            ConfigCommand::SetKey { key } => {
                commands::config::set_key(&mut config, &config_path, key.clone())?;
            }
            ConfigCommand::SetRegion { region } => {
                commands::config::set_region(&mut config, &config_path, region.clone())?;
            }
        }
        return Ok(());
    }

    commands::config::ensure_credential(&mut config, &config_path)?;

    let mut app = App::new(config)?;

    match cli.command {
        Commands::Home { page } => commands::browse::home(&app, page).await?,
        Commands::Trending { page } => commands::browse::trending(&app, page).await?,
        Commands::Discover { media, page, genre } => {
            commands::browse::discover(&app, media, page, genre).await?;
        }
        Commands::Search { query, page } => commands::browse::search(&app, &query, page).await?,
        Commands::Details { media, id } => commands::browse::details(&app, media, id).await?,
        Commands::Watch {
            media,
            id,
            server,
            season,
            episode,
        } => {
            let server = server_flag_to_index(server)?;
            commands::watch::run(&mut app, media, id, server, season, episode).await?;
        }
        Commands::Watchlist(cmd) => match cmd {
            WatchlistCommand::Add { media, id } => {
                commands::ledger::watchlist_add(&mut app, media, id).await?;
            }
            WatchlistCommand::Remove { media, id } => {
                commands::ledger::watchlist_remove(&mut app, media, id)?;
            }
            WatchlistCommand::List => commands::ledger::watchlist_list(&app),
        },
        Commands::History(cmd) => match cmd {
            HistoryCommand::List => commands::ledger::history_list(&app),
            HistoryCommand::Clear => commands::ledger::history_clear(&mut app),
        },
        Commands::Config(_) => unreachable!("handled above"),
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn server_flag_maps_one_based_numbers_to_indexes() {
        assert_eq!(server_flag_to_index(None).unwrap(), None);
        assert_eq!(server_flag_to_index(Some(1)).unwrap(), Some(0));
        assert_eq!(server_flag_to_index(Some(9)).unwrap(), Some(8));
        assert!(server_flag_to_index(Some(0)).is_err());
    }
}
