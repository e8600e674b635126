//! CLI - Command Line Interface for FlixTUI
//!
//! Every catalog view and watch-list action is scriptable. All output is
//! JSON-parseable.
//!
//! # Examples
//!
//! ```bash
//! # Browse
//! flixtui popular --type tv --limit 5
//! flixtui feed --json
//!
//! # Search with filter and sort
//! flixtui search "the matrix" --filter movie --sort rating
//!
//! # Manage My List
//! flixtui list add 603 --type movie
//! flixtui list
//! ```

use clap::{Args, Parser, Subcommand, ValueEnum};
use serde::{Deserialize, Serialize};
use std::io::IsTerminal;
use std::path::PathBuf;

use crate::models::MediaType;
use crate::search::{SearchFilter, SearchSort};

// =============================================================================
// Exit Codes
// =============================================================================

/// Exit codes for CLI operations (semantic for scripting)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum ExitCode {
    /// Success
    Success = 0,
    /// General error
    Error = 1,
    /// Invalid arguments or missing API key
    InvalidArgs = 2,
    /// Network error
    NetworkError = 3,
    /// Title not found
    NotFound = 4,
    /// Title already in My List
    AlreadyInList = 5,
}

impl From<ExitCode> for i32 {
    fn from(code: ExitCode) -> i32 {
        code as i32
    }
}

impl From<ExitCode> for std::process::ExitCode {
    fn from(code: ExitCode) -> std::process::ExitCode {
        std::process::ExitCode::from(code as u8)
    }
}

// =============================================================================
// Main CLI Structure
// =============================================================================

/// FlixTUI - streaming catalog browser for the terminal
///
/// Run without arguments to launch interactive TUI.
/// Use subcommands for scriptable automation.
#[derive(Parser, Debug)]
#[command(
    name = "flixtui",
    version,
    about = "Streaming catalog browser for the terminal",
    long_about = "Browse movies and TV shows from TMDB, search the catalog, \
                  and keep a personal My List.\n\n\
                  Run without arguments to launch the interactive TUI.\n\
                  Use subcommands for automation and scripting.",
    after_help = "EXAMPLES:\n\
                  flixtui                                  Launch interactive TUI\n\
                  flixtui search \"dune\" --sort rating      Search the catalog\n\
                  flixtui info 603 --type movie            Show title details\n\
                  flixtui list add 1399 --type tv          Add to My List"
)]
pub struct Cli {
    /// Output format as JSON (default for non-TTY)
    #[arg(long, short = 'j', global = true)]
    pub json: bool,

    /// Suppress non-essential output
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,

    /// Debug logging
    #[arg(long, short = 'v', global = true)]
    pub verbose: bool,

    /// Path to config file
    #[arg(long, short = 'c', global = true)]
    pub config: Option<PathBuf>,

    /// Keep My List and profile in memory only
    #[arg(long, global = true)]
    pub ephemeral: bool,

    /// Subcommand to run (omit for TUI mode)
    #[command(subcommand)]
    pub command: Option<Command>,
}

impl Cli {
    /// Check if running in CLI mode (has subcommand)
    pub fn is_cli_mode(&self) -> bool {
        self.command.is_some()
    }

    /// Check if JSON output should be used
    pub fn should_json(&self) -> bool {
        self.json || !std::io::stdout().is_terminal()
    }
}

// =============================================================================
// Subcommands
// =============================================================================

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Popular movies or TV shows
    #[command(visible_alias = "p")]
    Popular(ListCmd),

    /// Top rated movies or TV shows
    TopRated(ListCmd),

    /// Trending TV shows this week
    #[command(visible_alias = "tr")]
    Trending(TrendingCmd),

    /// Movie genre list
    Genres,

    /// Movies in a genre
    Discover(DiscoverCmd),

    /// Search for movies and TV shows
    #[command(visible_alias = "s")]
    Search(SearchCmd),

    /// Details for a movie or show
    #[command(visible_alias = "i")]
    Info(InfoCmd),

    /// Episodes of one season
    Season(SeasonCmd),

    /// Home feed rows with badges
    Feed(FeedCmd),

    /// Show or edit My List
    #[command(visible_alias = "l")]
    List(ListArgs),

    /// Show or change the active profile
    Profile(ProfileArgs),
}

/// Movie or TV selector
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum KindArg {
    #[default]
    Movie,
    Tv,
}

impl From<KindArg> for MediaType {
    fn from(kind: KindArg) -> Self {
        match kind {
            KindArg::Movie => MediaType::Movie,
            KindArg::Tv => MediaType::Tv,
        }
    }
}

// =============================================================================
// Browse Commands
// =============================================================================

/// Options shared by popular and top-rated
#[derive(Args, Debug)]
pub struct ListCmd {
    /// Movies or TV shows
    #[arg(long = "type", short = 't', value_enum, default_value = "movie")]
    pub kind: KindArg,

    /// Maximum number of results
    #[arg(long, short = 'l', default_value = "20")]
    pub limit: usize,
}

#[derive(Args, Debug)]
pub struct TrendingCmd {
    /// Maximum number of results
    #[arg(long, short = 'l', default_value = "20")]
    pub limit: usize,
}

#[derive(Args, Debug)]
pub struct DiscoverCmd {
    /// TMDB genre id (see `flixtui genres`)
    #[arg(long, short = 'g')]
    pub genre: u32,

    /// Maximum number of results
    #[arg(long, short = 'l', default_value = "20")]
    pub limit: usize,
}

#[derive(Args, Debug)]
pub struct FeedCmd {
    /// "Recently Added" window in days (defaults to config)
    #[arg(long)]
    pub days: Option<u32>,
}

// =============================================================================
// Search Command
// =============================================================================

/// Search for movies and TV shows by query
#[derive(Args, Debug)]
pub struct SearchCmd {
    /// Search query (title, keywords)
    #[arg(required = true)]
    pub query: String,

    /// all, movie or tv
    #[arg(long, short = 'f', default_value = "all")]
    pub filter: SearchFilter,

    /// relevance, rating, date or popularity
    #[arg(long, short = 's', default_value = "relevance")]
    pub sort: SearchSort,

    /// First page to fetch
    #[arg(long, short = 'p', default_value = "1")]
    pub page: u32,

    /// Number of pages to accumulate
    #[arg(long, default_value = "1")]
    pub pages: u32,
}

// =============================================================================
// Detail Commands
// =============================================================================

/// Detailed information about a movie or TV show
#[derive(Args, Debug)]
pub struct InfoCmd {
    /// TMDB id
    #[arg(required = true)]
    pub id: u64,

    /// Movie or TV show
    #[arg(long = "type", short = 't', value_enum, default_value = "movie")]
    pub kind: KindArg,
}

#[derive(Args, Debug)]
pub struct SeasonCmd {
    /// TMDB TV show id
    pub id: u64,

    /// Season number (0 for specials)
    pub season: u16,
}

// =============================================================================
// My List / Profile
// =============================================================================

#[derive(Args, Debug)]
pub struct ListArgs {
    #[command(subcommand)]
    pub action: Option<ListAction>,
}

#[derive(Subcommand, Debug)]
pub enum ListAction {
    /// Add a title (fetches its details first)
    Add {
        id: u64,
        #[arg(long = "type", short = 't', value_enum, default_value = "movie")]
        kind: KindArg,
    },
    /// Remove a title by id
    #[command(visible_alias = "rm")]
    Remove { id: u64 },
    /// Remove everything
    Clear,
}

#[derive(Args, Debug)]
pub struct ProfileArgs {
    #[command(subcommand)]
    pub action: Option<ProfileAction>,
}

#[derive(Subcommand, Debug)]
pub enum ProfileAction {
    /// Choose a profile by id
    Select { id: String },
    /// Forget the saved profile
    Switch,
}

// =============================================================================
// JSON Output Types
// =============================================================================

/// Generic JSON output wrapper with status
#[derive(Debug, Serialize, Deserialize)]
pub struct JsonOutput<T: Serialize> {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "is_zero")]
    pub exit_code: i32,
}

fn is_zero(n: &i32) -> bool {
    *n == 0
}

impl<T: Serialize> JsonOutput<T> {
    /// Create success output with data
    pub fn success(data: T) -> Self {
        Self {
            data: Some(data),
            error: None,
            exit_code: 0,
        }
    }

    /// Create error output (no data)
    pub fn error_msg(msg: impl Into<String>, code: ExitCode) -> JsonOutput<()> {
        JsonOutput::<()> {
            data: None,
            error: Some(msg.into()),
            exit_code: code.into(),
        }
    }
}

/// Status OK response
#[derive(Debug, Serialize)]
pub struct StatusOk {
    pub status: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl StatusOk {
    pub fn with_message(message: impl Into<String>) -> Self {
        Self {
            status: "ok",
            message: Some(message.into()),
        }
    }
}

impl Default for StatusOk {
    fn default() -> Self {
        Self {
            status: "ok",
            message: None,
        }
    }
}

// =============================================================================
// Output Helpers
// =============================================================================

/// Output handler for consistent formatting
pub struct Output {
    pub json: bool,
    pub quiet: bool,
}

impl Output {
    pub fn new(cli: &Cli) -> Self {
        Self {
            json: cli.should_json(),
            quiet: cli.quiet,
        }
    }

    /// Print success data
    pub fn print<T: Serialize>(&self, data: T) -> anyhow::Result<()> {
        if self.json {
            let output = JsonOutput::success(data);
            println!("{}", serde_json::to_string_pretty(&output)?);
        } else {
            println!("{}", serde_json::to_string_pretty(&data)?);
        }
        Ok(())
    }

    /// Print data as JSON, or the given text for humans
    pub fn print_or<T: Serialize>(&self, data: T, text: impl FnOnce(&T) -> String) -> anyhow::Result<()> {
        if self.json {
            self.print(data)
        } else {
            println!("{}", text(&data));
            Ok(())
        }
    }

    /// Print error and return exit code
    pub fn error(&self, msg: impl Into<String>, code: ExitCode) -> ExitCode {
        let msg = msg.into();
        if self.json {
            let output = JsonOutput::<()>::error_msg(&msg, code);
            if let Ok(json) = serde_json::to_string_pretty(&output) {
                eprintln!("{}", json);
            }
        } else if !self.quiet {
            eprintln!("Error: {}", msg);
        }
        code
    }

    /// Print info message (suppressed in quiet mode)
    pub fn info(&self, msg: impl std::fmt::Display) {
        if !self.quiet && !self.json {
            eprintln!("{}", msg);
        }
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn verify_cli() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_no_args_is_tui_mode() {
        let cli = Cli::parse_from(["flixtui"]);
        assert!(!cli.is_cli_mode());
    }

    #[test]
    fn test_search_command() {
        let cli = Cli::parse_from([
            "flixtui", "search", "matrix", "--filter", "movie", "--sort", "rating", "--pages", "2",
        ]);
        let Some(Command::Search(cmd)) = cli.command else {
            panic!("Expected Search command");
        };
        assert_eq!(cmd.query, "matrix");
        assert_eq!(cmd.filter, SearchFilter::Movie);
        assert_eq!(cmd.sort, SearchSort::Rating);
        assert_eq!(cmd.page, 1);
        assert_eq!(cmd.pages, 2);
    }

    #[test]
    fn test_search_rejects_unknown_sort() {
        assert!(Cli::try_parse_from(["flixtui", "search", "x", "--sort", "loudness"]).is_err());
    }

    #[test]
    fn test_global_flags() {
        let cli = Cli::parse_from(["flixtui", "--json", "--quiet", "--ephemeral", "genres"]);
        assert!(cli.json);
        assert!(cli.quiet);
        assert!(cli.ephemeral);
        assert!(matches!(cli.command, Some(Command::Genres)));
    }

    #[test]
    fn test_list_add() {
        let cli = Cli::parse_from(["flixtui", "list", "add", "1399", "--type", "tv"]);
        let Some(Command::List(ListArgs {
            action: Some(ListAction::Add { id, kind }),
        })) = cli.command
        else {
            panic!("Expected list add");
        };
        assert_eq!(id, 1399);
        assert_eq!(MediaType::from(kind), MediaType::Tv);
    }

    #[test]
    fn test_bare_list_shows() {
        let cli = Cli::parse_from(["flixtui", "list"]);
        assert!(matches!(cli.command, Some(Command::List(ListArgs { action: None }))));
    }

    #[test]
    fn test_exit_codes() {
        assert_eq!(i32::from(ExitCode::Success), 0);
        assert_eq!(i32::from(ExitCode::Error), 1);
        assert_eq!(i32::from(ExitCode::InvalidArgs), 2);
        assert_eq!(i32::from(ExitCode::NetworkError), 3);
        assert_eq!(i32::from(ExitCode::NotFound), 4);
        assert_eq!(i32::from(ExitCode::AlreadyInList), 5);
    }
}
