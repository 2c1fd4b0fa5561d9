/// Riff - headless music player
use clap::{Parser, Subcommand, ValueEnum};
use riff_catalog::{CatalogAlbum, CatalogArtist, CatalogClient, CatalogSong};
use riff_cli::commands::{self, App, PlayOptions, SettingsUpdate};
use riff_cli::config::RiffConfig;
use riff_core::RepeatMode;
use riff_playback::{PlaybackState, PlayerEvent};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "riff")]
#[command(about = "Search, queue and play songs from the catalog", long_about = None)]
struct Cli {
    /// Configuration file path
    #[arg(short, long, env = "RIFF_CONFIG", global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Search the catalog for songs
    Search {
        /// Search terms
        query: String,
        /// Number of result pages to fetch (songs), or the page to show
        #[arg(short, long, default_value_t = 1)]
        pages: u32,
        /// What to search for
        #[arg(short, long, value_enum, default_value_t = SearchKind::Songs)]
        kind: SearchKind,
    },
    /// Show an artist and a page of their songs
    Artist {
        artist_id: String,
        #[arg(short, long, default_value_t = 1)]
        page: u32,
    },
    /// Inspect or edit the queue
    Queue {
        #[command(subcommand)]
        action: QueueCommand,
    },
    /// Show or change shuffle, repeat and volume
    Settings {
        #[arg(long)]
        shuffle: Option<Toggle>,
        #[arg(long)]
        repeat: Option<RepeatArg>,
        /// Volume between 0 and 1
        #[arg(long)]
        volume: Option<f32>,
    },
    /// Play the queue through the simulated driver
    Play {
        /// How long to play, in seconds
        #[arg(short, long, default_value_t = 30)]
        seconds: u64,
        /// Playback speed multiplier
        #[arg(long, default_value_t = 1.0)]
        speed: f64,
        /// Start at this queued song id
        #[arg(short, long)]
        track: Option<String>,
    },
}

#[derive(Subcommand)]
enum QueueCommand {
    /// List queued songs
    List,
    /// Add a song by catalog id
    Add {
        song_id: String,
        /// Also queue up to this many suggested songs
        #[arg(short, long, default_value_t = 0)]
        suggestions: usize,
    },
    /// Add a page of an artist's songs
    AddArtist {
        artist_id: String,
        #[arg(short, long, default_value_t = 1)]
        page: u32,
    },
    /// Remove a song by id
    Remove { song_id: String },
    /// Move a song between positions (1-based)
    Move { from: usize, to: usize },
    /// Remove everything
    Clear,
}

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
enum SearchKind {
    Songs,
    Albums,
    Artists,
}

#[derive(Clone, Copy, ValueEnum)]
enum Toggle {
    On,
    Off,
}

#[derive(Clone, Copy, ValueEnum)]
enum RepeatArg {
    Off,
    One,
    All,
}

impl From<RepeatArg> for RepeatMode {
    fn from(arg: RepeatArg) -> Self {
        match arg {
            RepeatArg::Off => RepeatMode::Off,
            RepeatArg::One => RepeatMode::One,
            RepeatArg::All => RepeatMode::All,
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "riff=info,riff_cli=info,riff_playback=info,riff_catalog=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    let config = RiffConfig::load(cli.config.as_deref())?;
    config.validate()?;

    match cli.command {
        Commands::Search { query, pages, kind } => {
            let catalog = CatalogClient::new(config.catalog_config())?;
            match kind {
                SearchKind::Songs => {
                    let results = commands::search(catalog, &query, pages).await?;
                    print_songs(&results);
                }
                SearchKind::Albums => {
                    let found = commands::search_albums(&catalog, &query, pages).await?;
                    print_albums(&found.results, found.total);
                }
                SearchKind::Artists => {
                    let found = commands::search_artists(&catalog, &query, pages).await?;
                    print_artists(&found.results, found.total);
                }
            }
        }
        Commands::Artist { artist_id, page } => {
            let catalog = CatalogClient::new(config.catalog_config())?;
            let (artist, songs) = commands::artist(&catalog, &artist_id, page).await?;
            println!(
                "{} ({})  {}",
                artist.name,
                artist.id,
                artist.dominant_language.as_deref().unwrap_or("")
            );
            print_songs(&songs);
        }
        Commands::Queue { action } => {
            let app = App::open(config)?;
            run_queue(&app, action).await?;
        }
        Commands::Settings {
            shuffle,
            repeat,
            volume,
        } => {
            let app = App::open(config)?;
            let update = SettingsUpdate {
                shuffle: shuffle.map(|toggle| matches!(toggle, Toggle::On)),
                repeat: repeat.map(RepeatMode::from),
                volume,
            };
            let settings = commands::settings(&app, update)?;
            println!(
                "shuffle: {}  repeat: {}  volume: {:.2}",
                if settings.shuffle { "on" } else { "off" },
                settings.repeat,
                settings.volume
            );
        }
        Commands::Play {
            seconds,
            speed,
            track,
        } => {
            let app = App::open(config)?;
            let options = PlayOptions {
                seconds,
                speed,
                track,
            };
            let final_state = commands::play(&app, options, print_event).await?;
            print_queue(&final_state);
        }
    }

    Ok(())
}

async fn run_queue(app: &App, action: QueueCommand) -> anyhow::Result<()> {
    match action {
        QueueCommand::List => print_queue(&commands::queue_list(app)),
        QueueCommand::Add {
            song_id,
            suggestions,
        } => {
            let catalog = app.catalog()?;
            let added = commands::queue_add(app, &catalog, &song_id, suggestions).await?;
            for entry in added {
                println!("+ {} - {} ({})", entry.title, entry.artist, entry.id);
            }
        }
        QueueCommand::AddArtist { artist_id, page } => {
            let catalog = app.catalog()?;
            let added = commands::queue_add_artist(app, &catalog, &artist_id, page).await?;
            if added.is_empty() {
                println!("No songs found for {artist_id}");
            }
            for entry in added {
                println!("+ {} - {} ({})", entry.title, entry.artist, entry.id);
            }
        }
        QueueCommand::Remove { song_id } => {
            if commands::queue_remove(app, &song_id) {
                println!("Removed {song_id}");
            } else {
                println!("{song_id} is not queued");
            }
        }
        QueueCommand::Move { from, to } => {
            commands::queue_move(app, from, to)?;
            print_queue(&commands::queue_list(app));
        }
        QueueCommand::Clear => {
            commands::queue_clear(app);
            println!("Queue cleared");
        }
    }
    Ok(())
}

fn print_songs(songs: &[CatalogSong]) {
    if songs.is_empty() {
        println!("No results");
        return;
    }
    for (index, song) in songs.iter().enumerate() {
        println!(
            "{:>3}. {} - {} [{}]  id={}",
            index + 1,
            song.name,
            song.primary_artists
                .as_deref()
                .filter(|artists| !artists.is_empty())
                .unwrap_or(riff_catalog::UNKNOWN_ARTIST),
            commands::format_duration(song.duration),
            song.id
        );
    }
}

fn print_albums(albums: &[CatalogAlbum], total: usize) {
    if albums.is_empty() {
        println!("No results");
        return;
    }
    for (index, album) in albums.iter().enumerate() {
        println!(
            "{:>3}. {} - {} ({})  id={}",
            index + 1,
            album.name,
            album.primary_artists.as_deref().unwrap_or(riff_catalog::UNKNOWN_ARTIST),
            album.year.as_deref().unwrap_or("?"),
            album.id
        );
    }
    println!("{} of {total}", albums.len());
}

fn print_artists(artists: &[CatalogArtist], total: usize) {
    if artists.is_empty() {
        println!("No results");
        return;
    }
    for (index, artist) in artists.iter().enumerate() {
        println!("{:>3}. {}  id={}", index + 1, artist.name, artist.id);
    }
    println!("{} of {total}", artists.len());
}

fn print_queue(state: &PlaybackState) {
    if state.queue.is_empty() {
        println!("Queue is empty");
        return;
    }
    for (index, entry) in state.queue.iter().enumerate() {
        let marker = if state.current_track_id.as_deref() == Some(entry.id.as_str()) {
            '>'
        } else {
            ' '
        };
        println!(
            "{marker}{:>3}. {} - {} [{}]  id={}",
            index + 1,
            entry.title,
            entry.artist,
            commands::format_duration(entry.duration_seconds),
            entry.id
        );
    }
}

fn print_event(event: &PlayerEvent) {
    match event {
        PlayerEvent::TrackChanged { track_id, .. } => {
            println!("now playing: {}", track_id.as_deref().unwrap_or("-"));
        }
        PlayerEvent::StateChanged { is_playing } => {
            println!("{}", if *is_playing { "playing" } else { "paused" });
        }
        PlayerEvent::QueueChanged { length } => println!("queue: {length} songs"),
        PlayerEvent::LoadFailed { track_id, message } => {
            println!("could not load {track_id}: {message}");
        }
        PlayerEvent::PlaybackEnded { track_id } => println!("finished after {track_id}"),
    }
}
