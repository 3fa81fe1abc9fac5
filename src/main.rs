mod app;
mod config;
mod error;
mod logging;
mod playlist;
mod ports;
mod resolver;
mod services;
#[cfg(test)]
mod test_utils;

use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use color_eyre::{Result, eyre::Context};

use crate::{
    app::export_playlist,
    config::{Config, FailurePolicy},
    logging::setup_logging,
    services::catalog::{Catalog, Endpoints, HttpCatalogLookup},
};

/// Resolve a text playlist of tracks, albums and artists into Spotify track URIs
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Playlist to read, one query per line
    #[arg(default_value = "input.txt")]
    input: PathBuf,

    /// Where to write the resolved URIs
    #[arg(default_value = "output.txt")]
    output: PathBuf,

    /// The config file to use
    #[arg(short, long, env = "PLAYLIST_RESOLVER_CONFIG")]
    config: Option<PathBuf>,

    /// Bearer token sent with every catalog request
    #[arg(long, env = "SPOTIFY_ACCESS_TOKEN", hide_env_values = true)]
    access_token: Option<String>,

    /// What to do when a line cannot be resolved
    #[arg(long, value_enum)]
    on_query_failure: Option<FailurePolicy>,

    /// Take at most this many tracks from each album
    #[arg(long)]
    max_tracks_per_album: Option<i64>,

    /// Write a default config file, if it doesn't exist, and exit
    #[arg(long)]
    create_default_config: bool,

    /// Console log level
    #[arg(long, default_value = "warn", env = "LOG_LEVEL")]
    log_level: log::LevelFilter,

    /// File log level
    #[arg(long, default_value = "debug")]
    log_file_level: log::LevelFilter,

    /// Path to log file
    #[arg(long, env = "PLAYLIST_RESOLVER_LOG_FILE")]
    log_file: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;

    let args = Args::parse();
    setup_logging(args.log_level, args.log_file.clone(), args.log_file_level)?;

    if args.create_default_config {
        let path = Config::create_default()?;
        println!("{}", path.display());
        return Ok(());
    }

    log::debug!("Loading configuration");
    let mut config = {
        if let Some(config) = &args.config {
            Config::from_file(config)
        } else {
            Config::load()
        }
    }
    .wrap_err("Failed to load playlist-resolver config")?;

    if let Some(token) = args.access_token {
        config.access_token = Some(token);
    }
    if let Some(policy) = args.on_query_failure {
        config.on_query_failure = policy;
    }
    if let Some(limit) = args.max_tracks_per_album {
        config.max_tracks_per_album = Some(limit);
    }

    let lookup = HttpCatalogLookup::new(
        config.request_spacing(),
        config.request_timeout(),
        config.access_token.clone(),
    );
    let catalog = Catalog::new(Arc::new(lookup), Endpoints::new(&config.api_base_url)?)
        .with_failure_policy(config.on_query_failure);

    let written = export_playlist(
        &args.input,
        &args.output,
        &catalog,
        config.max_tracks_per_album,
    )
    .await?;

    log::info!("Wrote {} tracks to {}", written, args.output.display());

    Ok(())
}
