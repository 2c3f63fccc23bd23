//! Bookshelf CLI - Headless Host for the Bookshelf Core
//!
//! Drives the core from a frame loop without a renderer: models "load" on
//! background tasks with random delays, commands come from stdin or a
//! script file, and the scene graph only traces what it would draw.
//!
//! # Usage
//!
//! ```bash
//! # 85 mock books, commands from stdin
//! bookshelf
//!
//! # Catalog file and a script, events as JSON lines
//! bookshelf --catalog books.json --script tour.txt --json
//!
//! # Verbose logging
//! RUST_LOG=trace bookshelf --books 20 --books-per-shelf 8
//! ```
//!
//! The process prints the visit URL and exits once a visit cinematic
//! finishes, or exits on `quit`, end of input or Ctrl-C.

mod loader;
mod scene;
mod script;
mod session;

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use tokio::io::{AsyncBufReadExt, AsyncRead, BufReader};
use tokio::time::{Instant, MissedTickBehavior};
use tracing::{info, warn};

use bookshelf_core::{
    default_config_path, load_config_from_path, Bookshelf, Catalog, ConfigOverrides,
};

use loader::SimulatedLoader;
use script::Command;
use session::{Flow, Session};

/// Bookshelf - page through a virtual bookshelf from the terminal
#[derive(Parser, Debug)]
#[command(name = "bookshelf")]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Configuration file path
    #[arg(short = 'c', long, env = "BOOKSHELF_CONFIG", value_name = "FILE")]
    config: Option<PathBuf>,

    /// Catalog JSON file (mock catalog when absent)
    #[arg(long, value_name = "FILE")]
    catalog: Option<PathBuf>,

    /// Number of mock books
    #[arg(long, default_value_t = 85, conflicts_with = "catalog")]
    books: usize,

    /// Seed for the mock catalog and load delays
    #[arg(long, default_value_t = 7)]
    seed: u64,

    /// Read commands from this file instead of stdin
    #[arg(short = 's', long, value_name = "FILE")]
    script: Option<PathBuf>,

    /// Frames per second
    #[arg(long, default_value_t = 60, value_parser = clap::value_parser!(u32).range(1..=240))]
    fps: u32,

    /// Longest simulated model load, in milliseconds
    #[arg(long, default_value_t = 300)]
    max_load_delay_ms: u64,

    /// Books per shelf
    #[arg(long)]
    books_per_shelf: Option<usize>,

    /// Animation duration in seconds
    #[arg(long)]
    duration: Option<f32>,

    /// Release a stalled shelf transition after this many seconds
    #[arg(long)]
    lock_timeout: Option<f32>,

    /// Print every event as a JSON line on stdout
    #[arg(long)]
    json: bool,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short = 'l', long, env = "BOOKSHELF_LOG_LEVEL", default_value = "info")]
    log_level: String,
}

impl Args {
    fn overrides(&self) -> ConfigOverrides {
        let mut overrides = ConfigOverrides::new();
        if let Some(n) = self.books_per_shelf {
            overrides = overrides.with_books_per_shelf(n);
        }
        if let Some(secs) = self.duration {
            overrides = overrides.with_duration_secs(secs);
        }
        if let Some(secs) = self.lock_timeout {
            overrides = overrides.with_lock_timeout_secs(secs);
        }
        overrides
    }
}

/// Initialize logging with the specified level
fn init_logging(level: &str) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        tracing_subscriber::EnvFilter::new(format!("bookshelf={level},bookshelf_core={level}"))
    });

    // stdout carries URLs and JSON events
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();
}

type Input = tokio::io::Lines<BufReader<Box<dyn AsyncRead + Unpin + Send>>>;

async fn open_input(script: Option<&PathBuf>) -> Result<Input> {
    let reader: Box<dyn AsyncRead + Unpin + Send> = match script {
        Some(path) => Box::new(
            tokio::fs::File::open(path)
                .await
                .with_context(|| format!("Failed to open script: {}", path.display()))?,
        ),
        None => Box::new(tokio::io::stdin()),
    };
    Ok(BufReader::new(reader).lines())
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(&args.log_level);

    info!("Bookshelf starting");
    info!("Version: {}", env!("CARGO_PKG_VERSION"));

    let mut config = load_config_from_path(args.config.clone().or_else(default_config_path))
        .context("Failed to load configuration")?;
    args.overrides().apply(&mut config);
    config.validate().context("Invalid configuration")?;
    info!(source = %config.source(), "Configuration ready");

    let catalog = match &args.catalog {
        Some(path) => Catalog::from_path(path)?,
        None => Catalog::mock(args.books, args.seed),
    };

    let shelf = Bookshelf::with_timeline(&catalog, config)?;
    let (mut loader, mut loaded) =
        SimulatedLoader::new(args.seed, Duration::from_millis(args.max_load_delay_ms));
    shelf.request_assets(&mut loader);
    drop(loader);

    let mut session = Session::new(shelf, args.json);
    let mut input = open_input(args.script.as_ref()).await?;

    let frame = Duration::from_secs(1) / args.fps;
    let mut ticker = tokio::time::interval(frame);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

    let ctrl_c = tokio::signal::ctrl_c();
    tokio::pin!(ctrl_c);

    let mut last_frame = Instant::now();
    let mut resume_at: Option<Instant> = None;
    let mut quitting = false;

    loop {
        let reading = session.is_ready() && resume_at.is_none() && !quitting;

        tokio::select! {
            biased;

            _ = &mut ctrl_c => {
                info!("Received Ctrl-C, shutting down");
                break;
            }

            Some((book, geometry)) = loaded.recv() => {
                session.geometry_loaded(book, geometry);
            }

            _ = ticker.tick() => {
                let now = Instant::now();
                if let Some(url) = session.frame(now - last_frame) {
                    println!("{url}");
                    return Ok(());
                }
                last_frame = now;

                if resume_at.is_some_and(|at| now >= at) {
                    resume_at = None;
                }
                if quitting && !session.is_leaving() {
                    break;
                }
            }

            line = input.next_line(), if reading => {
                let Some(line) = line.context("Failed to read input")? else {
                    // End of input: finish a running visit, otherwise stop
                    quitting = true;
                    continue;
                };
                match Command::parse_line(&line) {
                    Ok(Some(command)) => match session.run(command) {
                        Flow::Continue => {}
                        Flow::Wait(duration) => resume_at = Some(Instant::now() + duration),
                        Flow::Quit => quitting = true,
                    },
                    Ok(None) => {}
                    Err(e) => warn!(error = %e, line = %line, "Skipping input line"),
                }
            }
        }
    }

    let scene = session.scene();
    info!(
        status = %session.status(),
        shelves = scene.shelves(),
        books = scene.books(),
        updates = scene.updates(),
        current = session.shelf().state().current_shelf(),
        "Bookshelf stopped"
    );
    Ok(())
}
