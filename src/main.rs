mod app;
mod browser;
mod components;
mod config;
mod error;
mod event;
mod handler;
mod results;
mod session;
mod theme;
mod tui;
mod ui;

use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;
use tracing::{info, warn};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{filter::LevelFilter, fmt, prelude::*};

use crate::app::App;
use crate::config::{AppConfig, LogConfig, SearchConfig, ThemeConfig};
use crate::event::{Event, EventHandler};
use crate::session::{ReplaySession, Session};
use crate::tui::{install_panic_hook, Tui};

/// Exit status for a configuration the program cannot start with.
const EXIT_CONFIG: i32 = 2;

const TICK_RATE: Duration = Duration::from_millis(250);

/// Search a file-sharing network and browse the results as compacted trees.
#[derive(Parser, Debug)]
#[command(name = "simpleseek", version, about)]
struct Cli {
    /// Query to search for right away
    query: Option<String>,

    /// Config file to load on top of the default locations
    #[arg(long)]
    config: Option<PathBuf>,

    /// JSON result library answering searches
    #[arg(long)]
    library: Option<PathBuf>,

    /// Color scheme: dark, light or custom
    #[arg(long)]
    theme: Option<String>,

    /// Log level: error, warn, info, debug or trace
    #[arg(long)]
    log_level: Option<String>,
}

impl Cli {
    fn overrides(&self) -> AppConfig {
        AppConfig {
            search: SearchConfig {
                library: self.library.as_ref().map(|p| p.display().to_string()),
                ..Default::default()
            },
            log: LogConfig {
                level: self.log_level.clone(),
                ..Default::default()
            },
            theme: ThemeConfig {
                scheme: self.theme.clone(),
                custom: None,
            },
            ..Default::default()
        }
    }
}

/// Route `tracing` output to a daily log file. Logging is best effort: the
/// program runs without it if the directory cannot be used.
fn init_logging(config: &AppConfig) -> Option<WorkerGuard> {
    let level = config.log_level().parse::<LevelFilter>().unwrap_or_else(|_| {
        eprintln!(
            "Warning: unknown log level {:?}, using info",
            config.log_level()
        );
        LevelFilter::INFO
    });

    let log_dir = config.log_dir();
    if let Err(e) = std::fs::create_dir_all(&log_dir) {
        eprintln!("Warning: cannot create log directory {}: {e}", log_dir.display());
        return None;
    }
    let appender = match RollingFileAppender::builder()
        .rotation(Rotation::DAILY)
        .max_log_files(14)
        .filename_prefix("simpleseek")
        .filename_suffix("log")
        .build(&log_dir)
    {
        Ok(appender) => appender,
        Err(e) => {
            eprintln!("Warning: cannot open log file in {}: {e}", log_dir.display());
            return None;
        }
    };

    let (writer, guard) = tracing_appender::non_blocking(appender);
    let layer = fmt::layer()
        .with_writer(writer)
        .with_ansi(false)
        .with_filter(level);
    if tracing_subscriber::registry().with(layer).try_init().is_err() {
        return None;
    }
    Some(guard)
}

fn dispatch(app: &mut App, event: Event, session: &mut dyn Session) {
    match event {
        Event::Key(key) => handler::handle_key_event(app, key, session),
        Event::Tick => app.clear_expired_status(),
        Event::Resize(_, height) => app.resize(height),
        Event::SearchResult(result) => app.handle_search_result(result),
        Event::Transfer(update) => app.handle_transfer(update),
    }
}

/// Draw, then block for one event and drain whatever queued up behind it
/// before drawing again.
async fn run(
    tui: &mut Tui,
    app: &mut App,
    events: &mut EventHandler,
    session: &mut dyn Session,
) -> error::Result<()> {
    loop {
        tui.terminal_mut().draw(|frame| ui::render(app, frame))?;

        let mut event = events.next().await?;
        loop {
            dispatch(app, event, session);
            if app.should_quit {
                return Ok(());
            }
            match events.try_next() {
                Some(next) => event = next,
                None => break,
            }
        }
    }
}

#[tokio::main]
async fn main() -> error::Result<()> {
    let cli = Cli::parse();

    let config = AppConfig::load(cli.config.as_deref(), Some(&cli.overrides()))?;
    let credentials = match config.credentials() {
        Ok(credentials) => credentials,
        Err(e) => {
            eprintln!("simpleseek: {e}");
            std::process::exit(EXIT_CONFIG);
        }
    };

    let _log_guard = init_logging(&config);
    info!(
        version = env!("CARGO_PKG_VERSION"),
        theme = config.theme_scheme(),
        "starting simpleseek"
    );

    let mut events = EventHandler::new();
    let library = config.library_path();
    let mut session = ReplaySession::connect(
        &credentials,
        library.as_deref(),
        events.sender(),
        config.response_limit(),
    )?;
    if session.peer_count() == 0 {
        warn!("result library is empty");
    }

    install_panic_hook();
    let mut tui = Tui::new()?;
    let mut app = App::new(theme::resolve_theme(&config.theme), tui.height()?);
    events.listen(TICK_RATE);

    if let Some(query) = &cli.query {
        for c in query.chars() {
            app.input_char(c);
        }
        app.submit_search(&mut session);
    }

    let result = run(&mut tui, &mut app, &mut events, &mut session).await;
    tui.restore()?;
    info!("exiting");
    result
}
