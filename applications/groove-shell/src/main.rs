/// Groove Shell - drive a player session from the terminal
mod commands;
mod config;

use anyhow::Context;
use clap::Parser;
use commands::Command;
use config::ShellConfig;
use groove_core::{CollectionLookup, MemoryCollection};
use groove_playback::{Action, DirectoryStorage, MessageSink, Player, PlayerEvent, TrackSource};
use std::io::{BufRead, Write};
use std::path::PathBuf;
use std::time::Instant;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "groove-shell")]
#[command(about = "Drive a Groove player session from stdin", long_about = None)]
struct Cli {
    /// Configuration file path
    #[arg(short, long, env = "GROOVE_CONFIG")]
    config: Option<PathBuf>,

    /// Collection cache (JSON array of collection records)
    #[arg(long)]
    collection: Option<PathBuf>,

    /// Directory for persisted player state
    #[arg(long)]
    state_dir: Option<PathBuf>,
}

/// Prints what would go out on the server socket
struct StdoutSink;

impl MessageSink for StdoutSink {
    fn send(&mut self, text: &str) -> groove_playback::Result<()> {
        println!("-> {text}");
        Ok(())
    }
}

fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "groove_shell=info,groove_playback=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    let mut config = ShellConfig::load(cli.config.as_deref())?;
    if let Some(collection) = cli.collection {
        config.collection = Some(collection);
    }
    if let Some(state_dir) = cli.state_dir {
        config.state_dir = state_dir;
    }

    let collection = match &config.collection {
        Some(path) => {
            let json = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read collection {}", path.display()))?;
            MemoryCollection::from_json(&json)?
        }
        None => MemoryCollection::new(),
    };
    tracing::info!(entries = collection.len(), "Collection loaded");

    let storage = DirectoryStorage::open(&config.state_dir)?;
    tracing::info!(state_dir = %config.state_dir.display(), "Starting Groove shell");

    let mut player = Player::new(
        collection,
        Box::new(storage),
        Box::new(StdoutSink),
        config.player.clone(),
    )?;

    run(&mut player)
}

fn run(player: &mut Player<MemoryCollection>) -> anyhow::Result<()> {
    let stdin = std::io::stdin();
    let mut stdout = std::io::stdout();

    print!("> ");
    stdout.flush()?;

    for line in stdin.lock().lines() {
        let line = line?;
        match commands::parse(&line) {
            Ok(Some(Command::Quit)) => break,
            Ok(Some(command)) => execute(player, command),
            Ok(None) => {}
            Err(e) => println!("error: {e:#}"),
        }

        for event in player.drain_events() {
            print_event(&event);
        }
        print!("> ");
        stdout.flush()?;
    }

    player.save()?;
    Ok(())
}

fn execute(player: &mut Player<MemoryCollection>, command: Command) {
    match command {
        Command::Dispatch(action) => {
            player.dispatch_view(action);
        }
        Command::Ended => {
            let now_playing = player.now_playing();
            let action = Action::Ended {
                source: now_playing.source().unwrap_or(TrackSource::Playlist),
                repeat: now_playing.repeat(),
            };
            player.dispatch_view(action);
        }
        Command::Back => {
            player.press_back(Instant::now());
        }
        Command::Show => show(player),
        Command::Connect => player.outbox_mut().open(),
        Command::Disconnect => player.outbox_mut().close(),
        Command::Receive(text) => {
            if let Err(e) = player.receive(&text) {
                println!("error: {e}");
            }
        }
        Command::Help => println!("{}", commands::HELP),
        Command::Quit => {}
    }
}

fn print_event(event: &PlayerEvent) {
    match serde_json::to_string(event) {
        Ok(json) => println!("event {json}"),
        Err(e) => tracing::warn!(error = %e, "Failed to encode event"),
    }
}

fn show(player: &Player<MemoryCollection>) {
    let playlist = player.playlist();
    let current = playlist.current();

    println!("playlist ({} items, {} tracks)", playlist.len(), playlist.track_count());
    for (item_index, item) in playlist.items().iter().enumerate() {
        println!("  [{item_index}] {}", item.root());
        for track_index in 0..item.len() {
            let Some(path) = item.track_path(track_index) else {
                continue;
            };
            let playing = current
                .is_some_and(|c| c.item_index == item_index && c.track_index == track_index);
            let marker = if playing { '*' } else { ' ' };
            let title = player
                .collection()
                .resolve_track(&path)
                .map_or("?", |track| track.title.as_str());
            println!("    {marker} {path}  {title}");
        }
    }

    let now_playing = player.now_playing();
    let volume = now_playing.volume();
    println!(
        "now playing: {} (source {:?}, playing {}, repeat {}, volume {:.2}{})",
        now_playing.track().map_or("-", |t| t.title.as_str()),
        now_playing.source(),
        now_playing.is_playing(),
        now_playing.repeat(),
        volume.level(),
        if volume.is_muted() { " muted" } else { "" },
    );

    let status = player.status();
    println!(
        "status: {:.1}s / {:.1}s, buffered {:.1}s{}",
        status.current_time(),
        status.duration(),
        status.buffered(),
        status.error().map(|e| format!(", error: {}", e.message)).unwrap_or_default(),
    );

    let cursor = player.cursor();
    let slot = |position: Option<&groove_playback::Position>| {
        position.map_or("-".to_string(), |p| format!("{}:{}", p.index, p.path))
    };
    println!(
        "cursor: {} | {} | {}",
        slot(cursor.previous()),
        slot(cursor.current()),
        slot(cursor.next())
    );
    println!(
        "socket: {} ({} pending)",
        if player.outbox().is_open() { "open" } else { "closed" },
        player.outbox().pending_len()
    );
}
