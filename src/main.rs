//! FlixTUI - streaming catalog browser for the terminal
//!
//! Browse popular and top-rated movies and TV shows, search the catalog and
//! keep a personal My List, all from the keyboard.
//!
//! # Usage
//!
//! ```bash
//! # Launch interactive TUI
//! flixtui
//!
//! # CLI mode (for automation)
//! flixtui search "blade runner" --sort rating
//! flixtui list add 78 --type movie
//! flixtui feed --json
//! ```

use std::io::{stdout, Stdout};
use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::Result;
use clap::Parser;
use crossterm::{
    event::{self, Event, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tracing::{error, info};

use flixtui::api::TmdbClient;
use flixtui::app::{self, App, AppCommand, AppMessage};
use flixtui::cli::{Cli, Command, ExitCode, Output};
use flixtui::commands;
use flixtui::config::{Config, ConfigError};
use flixtui::logging::{self, LogTarget};
use flixtui::profile::ProfileGate;
use flixtui::storage::{FileStore, KeyValueStore, MemoryStore};
use flixtui::ui;
use flixtui::watchlist::Watchlist;

/// Terminal type alias for convenience
type Tui = Terminal<CrosstermBackend<Stdout>>;

#[tokio::main]
async fn main() -> std::process::ExitCode {
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => Config::load_from(path),
        None => Config::load(),
    };
    let config = match config {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {}", e);
            return ExitCode::InvalidArgs.into();
        }
    };

    let store = open_store(&cli, &config);

    if cli.is_cli_mode() {
        // CLI mode: execute command and exit
        if let Err(e) = logging::init(LogTarget::Stderr, cli.verbose, cli.quiet) {
            eprintln!("Warning: logging disabled: {}", e);
        }
        run_cli(cli, config, store).await.into()
    } else {
        // TUI mode: launch interactive interface
        let log_file = config.log_file();
        if let Err(e) = logging::init(LogTarget::File(&log_file), cli.verbose, cli.quiet) {
            eprintln!("Warning: logging disabled: {}", e);
        }
        let client = match config.api_key() {
            Ok(key) => TmdbClient::new(key),
            Err(e) => {
                eprintln!("Error: {}", e);
                return ExitCode::InvalidArgs.into();
            }
        };
        match run_tui(client, store, &config).await {
            Ok(()) => ExitCode::Success.into(),
            Err(e) => {
                error!(error = %e, "TUI exited with error");
                eprintln!("Error: {:#}", e);
                ExitCode::Error.into()
            }
        }
    }
}

/// File-backed store in the data dir, or memory-only with `--ephemeral`
fn open_store(cli: &Cli, config: &Config) -> Arc<dyn KeyValueStore> {
    if cli.ephemeral {
        Arc::new(MemoryStore::new())
    } else {
        Arc::new(FileStore::new(config.data_dir()))
    }
}

/// Run CLI command and return exit code
async fn run_cli(cli: Cli, config: Config, store: Arc<dyn KeyValueStore>) -> ExitCode {
    let output = Output::new(&cli);
    let client = config.api_key().map(TmdbClient::new);

    // Commands that only touch local state run without a key
    let command = match cli.command {
        Some(Command::List(args)) => {
            return commands::list_cmd(client.as_ref().ok(), args.action, store, &output).await
        }
        Some(Command::Profile(args)) => return commands::profile_cmd(args.action, store, &output),
        Some(command) => command,
        None => return ExitCode::Success,
    };

    let client = match client {
        Ok(client) => client,
        Err(e @ ConfigError::MissingApiKey) => return output.error(e.to_string(), ExitCode::InvalidArgs),
        Err(e) => return output.error(e.to_string(), ExitCode::Error),
    };

    match command {
        Command::Popular(cmd) => commands::popular_cmd(&client, cmd, &output).await,
        Command::TopRated(cmd) => commands::top_rated_cmd(&client, cmd, &output).await,
        Command::Trending(cmd) => commands::trending_cmd(&client, cmd, &output).await,
        Command::Genres => commands::genres_cmd(&client, &output).await,
        Command::Discover(cmd) => commands::discover_cmd(&client, cmd, &output).await,
        Command::Search(cmd) => commands::search_cmd(&client, cmd, &output).await,
        Command::Info(cmd) => commands::info_cmd(&client, cmd, &output).await,
        Command::Season(cmd) => commands::season_cmd(&client, cmd, &output).await,
        Command::Feed(cmd) => commands::feed_cmd(&client, cmd, config.recency_days, &output).await,
        Command::List(_) | Command::Profile(_) => ExitCode::Success,
    }
}

// =============================================================================
// TUI Mode
// =============================================================================

/// Initialize the terminal for TUI mode
fn init_terminal() -> Result<Tui> {
    enable_raw_mode()?;
    let mut stdout = stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let terminal = Terminal::new(backend)?;
    Ok(terminal)
}

/// Restore terminal to normal state
fn restore_terminal(terminal: &mut Tui) -> Result<()> {
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;
    Ok(())
}

/// Run interactive TUI
async fn run_tui(client: TmdbClient, store: Arc<dyn KeyValueStore>, config: &Config) -> Result<()> {
    let watchlist = Watchlist::load(store.clone());
    let gate = ProfileGate::restore(store);
    let mut app = App::new(watchlist, gate).with_config(config);

    let client = Arc::new(client);
    let (tx, rx) = mpsc::unbounded_channel();

    info!("Starting TUI");
    let mut terminal = init_terminal()?;

    if let Some(command) = app.start() {
        spawn_command(&client, &tx, command);
    }

    // Run the main event loop
    let result = run_event_loop(&mut terminal, &mut app, &client, &tx, rx).await;

    // Always restore terminal, even on error
    restore_terminal(&mut terminal)?;
    info!("TUI closed");

    result
}

/// Run a fetch on its own task; the result comes back over the channel
fn spawn_command(client: &Arc<TmdbClient>, tx: &UnboundedSender<AppMessage>, command: AppCommand) {
    let client = Arc::clone(client);
    let tx = tx.clone();
    tokio::spawn(async move {
        let message = app::execute(&client, command).await;
        // The receiver only goes away on shutdown
        let _ = tx.send(message);
    });
}

/// Main event loop - handles input, applies fetch results, renders UI
async fn run_event_loop(
    terminal: &mut Tui,
    app: &mut App,
    client: &Arc<TmdbClient>,
    tx: &UnboundedSender<AppMessage>,
    mut rx: UnboundedReceiver<AppMessage>,
) -> Result<()> {
    const TICK_RATE: Duration = Duration::from_millis(50);

    while app.running {
        // Render current state
        terminal.draw(|frame| ui::render(frame, app))?;

        // Poll for events with timeout so timers and fetch results keep flowing
        if event::poll(TICK_RATE)? {
            if let Event::Key(key) = event::read()? {
                // Only handle key press events (ignore releases on Windows)
                if key.kind == KeyEventKind::Press {
                    if let Some(command) = app.handle_key(key) {
                        spawn_command(client, tx, command);
                    }
                }
            }
        }

        while let Ok(message) = rx.try_recv() {
            if let Some(command) = app.handle_message(message) {
                spawn_command(client, tx, command);
            }
        }

        if let Some(command) = app.tick(Instant::now()) {
            spawn_command(client, tx, command);
        }
    }

    Ok(())
}
