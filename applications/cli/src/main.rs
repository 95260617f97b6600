/// Cadence - command-line front end for the playback engine
use anyhow::Context;
use cadence_cli::{commands, config::AppConfig, simulate::SimulatedOutput};
use cadence_core::format::format_seconds;
use cadence_playback::{PlaybackEngine, PlaybackEvent};
use cadence_spotify::{SpotifyClient, StaticToken};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::time::Duration;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "cadence")]
#[command(about = "Cadence music player engine", long_about = None)]
struct Cli {
    /// Configuration file path (defaults to ./cadence.toml when present)
    #[arg(short, long, global = true, env = "CADENCE_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Search the streaming API for tracks
    Search {
        /// Free text or filters such as "genre:latin"
        query: String,
    },
    /// Show the playlist the player would start with
    Playlist,
    /// Show the album digest for the landing view
    Albums,
    /// Dry-run the engine against a virtual output
    Simulate {
        /// Virtual seconds to play
        #[arg(short, long, default_value_t = 120)]
        seconds: u64,
        /// Length of every simulated track in seconds
        #[arg(long, default_value_t = 30)]
        track_length: u64,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing (stderr, so command output stays clean)
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "cadence_cli=info,cadence_playback=info,cadence_spotify=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    let config = AppConfig::load(cli.config.as_deref())?;
    config.validate()?;

    match cli.command {
        Commands::Search { query } => search(&config, &query).await?,
        Commands::Playlist => playlist(&config).await?,
        Commands::Albums => albums(&config).await?,
        Commands::Simulate {
            seconds,
            track_length,
        } => simulate(&config, seconds, track_length).await?,
    }

    Ok(())
}

fn client(config: &AppConfig) -> anyhow::Result<SpotifyClient<StaticToken>> {
    SpotifyClient::new(config.spotify_config(), config.token())
        .context("Failed to create streaming API client")
}

/// Client only when a token is configured
fn optional_client(config: &AppConfig) -> anyhow::Result<Option<SpotifyClient<StaticToken>>> {
    if config.has_token() {
        Ok(Some(client(config)?))
    } else {
        tracing::info!("No access token configured, using local catalog");
        Ok(None)
    }
}

async fn search(config: &AppConfig, query: &str) -> anyhow::Result<()> {
    let client = client(config)?;
    let tracks = commands::search(&client, query).await?;

    if tracks.is_empty() {
        println!("No tracks found for {:?}", query);
    }
    for (i, track) in tracks.iter().enumerate() {
        println!("{:>2}. {}", i + 1, commands::describe_track(track));
    }
    Ok(())
}

async fn playlist(config: &AppConfig) -> anyhow::Result<()> {
    let client = optional_client(config)?;
    let songs = commands::resolve_playlist(client.as_ref(), &config.engine, config.catalog()?).await;

    for (i, song) in songs.iter().enumerate() {
        let marker = if song.is_playable() { "" } else { " [unplayable]" };
        println!("{:>2}. {}{}", i + 1, song, marker);
    }
    Ok(())
}

async fn albums(config: &AppConfig) -> anyhow::Result<()> {
    let client = client(config)?;
    let digest = commands::albums(&client).await;

    if digest.is_empty() {
        println!("No albums available");
        return Ok(());
    }
    for (title, shelf) in [
        ("Featured", &digest.featured),
        ("New releases", &digest.new_releases),
        ("Popular", &digest.popular),
    ] {
        println!("{}:", title);
        for album in shelf.iter() {
            println!("  {} - {}", album.artist, album.name);
        }
    }
    Ok(())
}

async fn simulate(config: &AppConfig, seconds: u64, track_length: u64) -> anyhow::Result<()> {
    let output = SimulatedOutput::new(Duration::from_secs(track_length.max(1)));
    let mut engine = PlaybackEngine::new(output, config.engine.clone());
    if let Some(songs) = config.catalog()? {
        engine = engine.with_catalog(songs);
    }

    let client = optional_client(config)?;
    engine.initialize(client.as_ref()).await;

    let report = commands::run_simulation(
        &mut engine,
        Duration::from_secs(seconds),
        Duration::from_millis(250),
        |event| match event {
            PlaybackEvent::SongChanged { song, .. } => println!("> {}", song),
            PlaybackEvent::SongFinished { song } => println!("  finished {}", song),
            PlaybackEvent::Error { message, .. } => println!("  error: {}", message),
            _ => {}
        },
    );

    let snapshot = engine.snapshot();
    println!(
        "{} songs finished; now at #{} ({} / {}), {}",
        report.songs_finished,
        snapshot.current_index + 1,
        format_seconds(snapshot.current_time),
        format_seconds(snapshot.duration),
        snapshot.status.as_str()
    );
    Ok(())
}
