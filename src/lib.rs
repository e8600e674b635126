//! FlixTUI - streaming catalog browser for the terminal
//!
//! Browse movies and TV shows from TMDB in feed rows, search with filters and
//! sorting, and keep a persistent My List.
//!
//! # Modules
//!
//! - `models` - Catalog items, details, watch-list entries, notifications
//! - `api` - TMDB client
//! - `storage` - Key-value persistence (file or memory)
//! - `watchlist` - My List store
//! - `feed` - Feed row and badge derivations
//! - `search` - Search parameters, debounce and paged sessions
//! - `profile` - Profile gate
//! - `toast` - Notification display state
//! - `ui` - TUI components
//! - `app` - Application state and navigation
//! - `cli` / `commands` - Scriptable subcommands

pub mod api;
pub mod app;
pub mod cli;
pub mod commands;
pub mod config;
pub mod feed;
pub mod logging;
pub mod models;
pub mod profile;
pub mod search;
pub mod storage;
pub mod toast;
pub mod ui;
pub mod watchlist;

// Re-export commonly used types
pub use models::{
    CatalogItem, Credits, Episode, MediaType, MovieDetail, Notification, NotificationKind,
    SearchPage, TvDetail, Video, WatchlistEntry,
};

pub use api::{TmdbClient, TmdbError};
pub use app::{App, AppState};
pub use feed::Feed;
pub use search::{SearchFilter, SearchParams, SearchSort};
pub use watchlist::Watchlist;
