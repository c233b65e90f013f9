use std::io;
use std::path::PathBuf;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::{
    event::Event,
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use tracing::{error, info, warn};

use dpswatch::config::{Settings, ThemeChoice};
use dpswatch::data::duration::parse_duration;
use dpswatch::feed::{FeedError, FeedHandle, FeedSource};
use dpswatch::{
    events, logging, shared_state, ui, App, EnvelopeLog, RankOptions, ReplaySource,
    WebSocketSource,
};

/// How long to wait for the feed connection to be released on exit.
const SHUTDOWN_TIMEOUT: Duration = Duration::from_secs(2);

#[derive(Parser, Debug)]
#[command(name = "dpswatch")]
#[command(about = "Live terminal damage meter for ACT/OverlayPlugin combat data")]
struct Args {
    /// WebSocket endpoint of the feed (e.g. ws://localhost:10501/MiniParse)
    #[arg(short, long, conflicts_with = "replay")]
    url: Option<String>,

    /// Replay a recorded envelope log instead of connecting
    #[arg(short, long)]
    replay: Option<PathBuf>,

    /// Delay between replayed envelopes (e.g. "250ms", "1s")
    #[arg(long, requires = "replay")]
    replay_interval: Option<String>,

    /// Path to a config file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Show the limit break as a combatant row
    #[arg(long)]
    include_limit_break: bool,

    /// Append received envelopes to this file
    #[arg(long, conflicts_with = "no_event_log")]
    event_log: Option<PathBuf>,

    /// Do not record received envelopes
    #[arg(long)]
    no_event_log: bool,

    /// Redraws per second
    #[arg(long)]
    fps: Option<u32>,

    /// Colour theme
    #[arg(long, value_enum)]
    theme: Option<ThemeChoice>,
}

impl Args {
    /// Apply command-line flags on top of the loaded settings.
    fn apply(&self, settings: &mut Settings) -> Result<()> {
        if let Some(ref url) = self.url {
            settings.socket_url = url.clone();
        }
        if let Some(ref interval) = self.replay_interval {
            settings.replay_interval = parse_duration(interval)
                .with_context(|| format!("Invalid --replay-interval: {}", interval))?;
        }
        if self.include_limit_break {
            settings.include_limit_break = true;
        }
        if let Some(ref path) = self.event_log {
            settings.event_log = path.clone();
            settings.record_envelopes = true;
        }
        if self.no_event_log {
            settings.record_envelopes = false;
        }
        if let Some(fps) = self.fps {
            settings.fps = fps.clamp(dpswatch::config::MIN_FPS, dpswatch::config::MAX_FPS);
        }
        if let Some(theme) = self.theme {
            settings.theme = theme;
        }
        Ok(())
    }
}

fn main() -> Result<()> {
    let args = Args::parse();

    let mut settings = Settings::load(args.config.as_deref())?;
    args.apply(&mut settings)?;

    // Held until exit so buffered log lines are flushed
    let _log_guard = logging::init(&settings.log_file, &settings.log_level);

    // The receive cycle runs on this runtime while the main thread draws
    let rt = tokio::runtime::Runtime::new()?;
    let _enter = rt.enter();

    let source = rt.block_on(open_source(&args, &settings))?;

    // Replays are read from a log; recording them again would duplicate it
    let journal = if settings.record_envelopes && args.replay.is_none() {
        match EnvelopeLog::open(&settings.event_log) {
            Ok(journal) => Some(journal),
            Err(e) => {
                warn!(path = %settings.event_log.display(), error = %e, "envelope log disabled");
                None
            }
        }
    } else {
        None
    };

    let (writer, reader) = shared_state();
    let mut feed = FeedHandle::spawn(source, writer, journal);

    let app = App::new(reader, feed.description())
        .with_rank_options(RankOptions {
            include_limit_break: settings.include_limit_break,
        })
        .with_theme(ui::Theme::from_choice(settings.theme));

    let result = run_tui(app, &mut feed, settings.frame_interval());

    // Release the connection before exiting
    let task = feed.shutdown();
    if rt.block_on(tokio::time::timeout(SHUTDOWN_TIMEOUT, task)).is_err() {
        warn!("feed did not shut down within {:?}", SHUTDOWN_TIMEOUT);
    }

    match result? {
        Some(e) => Err(anyhow::Error::new(e).context("Feed connection lost")),
        None => {
            info!("exiting on user request");
            Ok(())
        }
    }
}

/// Connect to the live feed, or open a replay
async fn open_source(args: &Args, settings: &Settings) -> Result<Box<dyn FeedSource>> {
    if let Some(ref path) = args.replay {
        let source = ReplaySource::open(path, settings.replay_interval).await?;
        info!(path = %path.display(), frames = source.remaining(), "replaying envelope log");
        return Ok(Box::new(source));
    }

    println!("Connecting to {}...", settings.socket_url);
    match WebSocketSource::connect(&settings.socket_url).await {
        Ok(source) => Ok(Box::new(source)),
        Err(e) => {
            error!(error = %e, "could not connect to feed");
            Err(e.into())
        }
    }
}

/// Run the TUI until the user quits or the feed fails.
///
/// Returns the feed error that ended the session, if any.
fn run_tui(
    mut app: App,
    feed: &mut FeedHandle,
    frame_interval: Duration,
) -> Result<Option<FeedError>> {
    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Setup panic hook to restore terminal
    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic| {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
        original_hook(panic);
    }));

    // Run the main loop
    let result = run_app(&mut terminal, &mut app, feed, frame_interval);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}

fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
    feed: &mut FeedHandle,
    frame_interval: Duration,
) -> Result<Option<FeedError>> {
    let mut next_tick = Instant::now();

    while app.running {
        app.refresh();
        terminal.draw(|frame| ui::render(frame, app))?;

        if let Some(exit) = feed.poll_exit() {
            app.record_feed_exit(&exit);
            if let Err(e) = exit {
                return Ok(Some(e));
            }
        }

        // Fixed cadence; after a stall, resume from now instead of bursting
        next_tick += frame_interval;
        let now = Instant::now();
        if next_tick < now {
            next_tick = now;
        }

        // Handle input until the next tick is due
        while app.running {
            let timeout = next_tick.saturating_duration_since(Instant::now());
            match events::poll_event(timeout)? {
                Some(Event::Key(key)) => events::handle_key_event(app, key),
                // Resize needs nothing: every draw reads the current size
                Some(_) => {}
                None => break,
            }
        }
    }

    Ok(None)
}
