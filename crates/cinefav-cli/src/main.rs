mod render;

use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use cinefav_api::TmdbClient;
use cinefav_core::config::AppConfig;
use cinefav_core::favorites::FavoritesStore;
use cinefav_core::fetcher::DetailFetcher;
use cinefav_core::screen::{AddOutcome, DetailScreen};

#[derive(Debug, Parser)]
#[command(name = "cinefav", version, about = "Browse movie details and keep a favorites list")]
struct Cli {
    /// Config file to use instead of the user config.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Enable debug logging.
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Show the detail screen for one or more movies.
    Show {
        /// TMDB movie ids.
        #[arg(required = true)]
        ids: Vec<String>,

        /// Add each successfully loaded movie to favorites.
        #[arg(long)]
        favorite: bool,

        /// Print screen snapshots as JSON.
        #[arg(long)]
        json: bool,
    },
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => AppConfig::load_from(path)?,
        None => AppConfig::load()?,
    };

    let filter = if cli.verbose {
        EnvFilter::new("cinefav=debug")
    } else {
        EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(&config.general.log_filter))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Command::Show {
            ids,
            favorite,
            json,
        } => show(&config, ids, favorite, json).await,
    }
}

async fn show(
    config: &AppConfig,
    ids: Vec<String>,
    favorite: bool,
    json: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    if config.api.access_token.is_none() && config.api.api_key.is_none() {
        tracing::warn!(
            path = %AppConfig::config_path().display(),
            "No TMDB credentials configured, requests will likely be rejected"
        );
    }

    let fetcher = Arc::new(DetailFetcher::new(TmdbClient::new(&config.api)));
    let favorites = FavoritesStore::new();
    let mut screen = DetailScreen::new(Arc::clone(&fetcher), favorites.clone());

    for id in ids {
        let Some(ticket) = screen.view(id) else {
            continue;
        };
        let (ticket, state) = tokio::spawn(screen.fetch_task(ticket)).await?;
        screen.complete(ticket, state);

        if favorite {
            match screen.on_add_favorite() {
                AddOutcome::Added => {}
                AddOutcome::AlreadyFavorite => {
                    tracing::info!(movie_id = %screen.movie_id(), "Already a favorite")
                }
                AddOutcome::Unavailable => {
                    tracing::info!(movie_id = %screen.movie_id(), "Nothing to add, detail not loaded")
                }
            }
        }

        if json {
            println!("{}", serde_json::to_string_pretty(&screen.snapshot())?);
        } else {
            print!("{}", render::render_screen(&screen.snapshot(), &config.images));
        }
        screen.dismiss_confirmation();
    }
    screen.close();

    let stats = fetcher.stats();
    tracing::debug!(
        remote_calls = stats.remote_calls,
        cache_hits = stats.cache_hits,
        "Fetch stats"
    );

    if favorite {
        print!("{}", render::render_favorites(&favorites.snapshot()));
    }
    Ok(())
}
