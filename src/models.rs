//! Data structures and types for FlixTUI
//!
//! Contains all shared models used across the application organized by domain:
//! - **Catalog**: TMDB list items, details, seasons, episodes, videos, credits
//! - **Search**: paged search responses
//! - **My List**: persisted watch-list entries
//! - **Notifications**: transient toast payloads

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

/// Base URL for TMDB image assets
pub const IMAGE_BASE_URL: &str = "https://image.tmdb.org/t/p";

/// Shown wherever an image path is missing
pub const PLACEHOLDER_IMAGE: &str = "(no image)";

/// Fixed TMDB genre table used for card labels
const GENRES: &[(u32, &str)] = &[
    (28, "Action"),
    (12, "Adventure"),
    (16, "Animation"),
    (35, "Comedy"),
    (80, "Crime"),
    (99, "Documentary"),
    (18, "Drama"),
    (10751, "Family"),
    (14, "Fantasy"),
    (36, "History"),
    (27, "Horror"),
    (10402, "Music"),
    (9648, "Mystery"),
    (10749, "Romance"),
    (878, "Science Fiction"),
    (10770, "TV Movie"),
    (53, "Thriller"),
    (10752, "War"),
    (37, "Western"),
];

/// Look up a genre name by TMDB genre id
pub fn genre_name(id: u32) -> Option<&'static str> {
    GENRES.iter().find(|(gid, _)| *gid == id).map(|(_, name)| *name)
}

/// Build a full image URL for a TMDB path fragment
pub fn image_url(path: Option<&str>, size: &str) -> String {
    match path {
        Some(p) if !p.is_empty() => format!("{}/{}{}", IMAGE_BASE_URL, size, p),
        _ => PLACEHOLDER_IMAGE.to_string(),
    }
}

/// Parse a TMDB date string ("2022-03-04"); empty or malformed yields None
pub fn parse_date(date: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(date, "%Y-%m-%d").ok()
}

/// Extract year from a date string like "2022-03-04"
pub fn extract_year(date: &str) -> Option<u16> {
    date.get(..4).and_then(|y| y.parse().ok())
}

// =============================================================================
// Catalog Models (TMDB)
// =============================================================================

/// Media type discriminator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaType {
    Movie,
    Tv,
}

impl MediaType {
    /// Path segment used by TMDB endpoints
    pub fn as_path(&self) -> &'static str {
        match self {
            MediaType::Movie => "movie",
            MediaType::Tv => "tv",
        }
    }
}

impl fmt::Display for MediaType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MediaType::Movie => write!(f, "Movie"),
            MediaType::Tv => write!(f, "TV Show"),
        }
    }
}

/// A movie or TV series as returned by TMDB list and search endpoints
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogItem {
    pub id: u64,
    pub media_type: MediaType,
    pub title: String,
    pub overview: String,
    pub poster_path: Option<String>,
    pub backdrop_path: Option<String>,
    pub vote_average: f32,
    pub vote_count: u32,
    /// Release date for movies, first air date for series
    pub release_date: Option<String>,
    pub genre_ids: Vec<u32>,
}

impl CatalogItem {
    pub fn year(&self) -> Option<u16> {
        self.release_date.as_deref().and_then(extract_year)
    }

    pub fn release_naive_date(&self) -> Option<NaiveDate> {
        self.release_date.as_deref().and_then(parse_date)
    }

    pub fn poster_url(&self) -> String {
        image_url(self.poster_path.as_deref(), "w500")
    }

    pub fn backdrop_url(&self) -> String {
        image_url(self.backdrop_path.as_deref(), "original")
    }

    /// Up to three genre names for card display
    pub fn genre_names(&self) -> Vec<&'static str> {
        self.genre_ids
            .iter()
            .take(3)
            .filter_map(|id| genre_name(*id))
            .collect()
    }
}

impl fmt::Display for CatalogItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let year_str = self.year().map(|y| format!(" ({})", y)).unwrap_or_default();
        write!(f, "{}{} [{}]", self.title, year_str, self.media_type)
    }
}

/// Genre entry from the genre list endpoint
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Genre {
    pub id: u32,
    pub name: String,
}

/// Summary of a TV season (used in TvDetail)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SeasonSummary {
    pub season_number: u16,
    pub episode_count: u16,
    pub name: Option<String>,
    pub air_date: Option<String>,
    pub overview: String,
}

impl fmt::Display for SeasonSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.name {
            Some(name) => write!(f, "{} ({} episodes)", name, self.episode_count),
            None => write!(
                f,
                "Season {} ({} episodes)",
                self.season_number, self.episode_count
            ),
        }
    }
}

/// Detailed movie information from TMDB
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MovieDetail {
    pub id: u64,
    pub title: String,
    pub tagline: Option<String>,
    pub release_date: Option<String>,
    pub runtime: Option<u32>,
    pub genres: Vec<Genre>,
    pub overview: String,
    pub vote_average: f32,
    pub vote_count: u32,
    pub poster_path: Option<String>,
    pub backdrop_path: Option<String>,
}

impl MovieDetail {
    pub fn year(&self) -> Option<u16> {
        self.release_date.as_deref().and_then(extract_year)
    }

    /// Runtime formatted as "2h 56m"
    pub fn runtime_str(&self) -> Option<String> {
        self.runtime.filter(|r| *r > 0).map(|r| {
            let hours = r / 60;
            let mins = r % 60;
            if hours > 0 {
                format!("{}h {}m", hours, mins)
            } else {
                format!("{}m", mins)
            }
        })
    }

    /// Project the detail record into a catalog item
    pub fn to_item(&self) -> CatalogItem {
        CatalogItem {
            id: self.id,
            media_type: MediaType::Movie,
            title: self.title.clone(),
            overview: self.overview.clone(),
            poster_path: self.poster_path.clone(),
            backdrop_path: self.backdrop_path.clone(),
            vote_average: self.vote_average,
            vote_count: self.vote_count,
            release_date: self.release_date.clone(),
            genre_ids: self.genres.iter().map(|g| g.id).collect(),
        }
    }
}

impl fmt::Display for MovieDetail {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let year = self.year().map(|y| y.to_string()).unwrap_or_else(|| "N/A".into());
        match self.runtime_str() {
            Some(rt) => write!(f, "{} ({}) - {} - ★ {:.1}", self.title, year, rt, self.vote_average),
            None => write!(f, "{} ({}) - ★ {:.1}", self.title, year, self.vote_average),
        }
    }
}

/// Detailed TV show information from TMDB
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TvDetail {
    pub id: u64,
    pub name: String,
    pub tagline: Option<String>,
    pub first_air_date: Option<String>,
    pub last_air_date: Option<String>,
    pub status: Option<String>,
    pub number_of_seasons: u16,
    pub number_of_episodes: u32,
    pub seasons: Vec<SeasonSummary>,
    pub genres: Vec<Genre>,
    pub networks: Vec<String>,
    pub created_by: Vec<String>,
    pub overview: String,
    pub vote_average: f32,
    pub vote_count: u32,
    pub poster_path: Option<String>,
    pub backdrop_path: Option<String>,
}

impl TvDetail {
    pub fn year(&self) -> Option<u16> {
        self.first_air_date.as_deref().and_then(extract_year)
    }

    pub fn to_item(&self) -> CatalogItem {
        CatalogItem {
            id: self.id,
            media_type: MediaType::Tv,
            title: self.name.clone(),
            overview: self.overview.clone(),
            poster_path: self.poster_path.clone(),
            backdrop_path: self.backdrop_path.clone(),
            vote_average: self.vote_average,
            vote_count: self.vote_count,
            release_date: self.first_air_date.clone(),
            genre_ids: self.genres.iter().map(|g| g.id).collect(),
        }
    }
}

impl fmt::Display for TvDetail {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let year = self.year().map(|y| y.to_string()).unwrap_or_else(|| "N/A".into());
        write!(
            f,
            "{} ({}) - {} seasons - ★ {:.1}",
            self.name, year, self.number_of_seasons, self.vote_average
        )
    }
}

/// TV episode information
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Episode {
    pub season: u16,
    pub episode: u16,
    pub name: String,
    pub overview: String,
    pub runtime: Option<u32>,
    pub air_date: Option<String>,
    pub vote_average: f32,
    pub still_path: Option<String>,
}

impl fmt::Display for Episode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "S{:02}E{:02} - {}", self.season, self.episode, self.name)
    }
}

/// Video attached to a movie or show (trailers, teasers, clips)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Video {
    pub key: String,
    pub name: String,
    pub site: String,
    #[serde(rename = "type")]
    pub kind: String,
}

impl Video {
    pub fn is_youtube_trailer(&self) -> bool {
        self.site == "YouTube" && self.kind == "Trailer"
    }

    pub fn youtube_url(&self) -> String {
        format!("https://www.youtube.com/watch?v={}", self.key)
    }
}

/// Pick the first YouTube trailer from a video list
pub fn find_trailer(videos: &[Video]) -> Option<&Video> {
    videos.iter().find(|v| v.is_youtube_trailer())
}

/// Cast and crew for a movie
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Credits {
    pub director: Option<String>,
    pub cast: Vec<String>,
}

// =============================================================================
// Search Models
// =============================================================================

/// One page of search results with pagination totals
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SearchPage {
    pub page: u32,
    pub results: Vec<CatalogItem>,
    pub total_results: u32,
    pub total_pages: u32,
}

// =============================================================================
// My List Models
// =============================================================================

/// Entry in the persisted watch list
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WatchlistEntry {
    pub id: u64,
    #[serde(rename = "type")]
    pub kind: MediaType,
    pub title: String,
    pub poster_path: Option<String>,
    #[serde(default)]
    pub backdrop_path: Option<String>,
    pub vote_average: f32,
    #[serde(default)]
    pub release_date: Option<String>,
    #[serde(default)]
    pub overview: String,
    #[serde(default)]
    pub genre_ids: Vec<u32>,
}

impl WatchlistEntry {
    pub fn year(&self) -> Option<u16> {
        self.release_date.as_deref().and_then(extract_year)
    }

    /// Name used in notifications, falling back when the title is blank
    pub fn display_name(&self) -> &str {
        if self.title.trim().is_empty() {
            "Item"
        } else {
            &self.title
        }
    }
}

impl From<&CatalogItem> for WatchlistEntry {
    fn from(item: &CatalogItem) -> Self {
        Self {
            id: item.id,
            kind: item.media_type,
            title: item.title.clone(),
            poster_path: item.poster_path.clone(),
            backdrop_path: item.backdrop_path.clone(),
            vote_average: item.vote_average,
            release_date: item.release_date.clone(),
            overview: item.overview.clone(),
            genre_ids: item.genre_ids.clone(),
        }
    }
}

impl From<CatalogItem> for WatchlistEntry {
    fn from(item: CatalogItem) -> Self {
        Self::from(&item)
    }
}

impl From<&WatchlistEntry> for CatalogItem {
    fn from(entry: &WatchlistEntry) -> Self {
        Self {
            id: entry.id,
            media_type: entry.kind,
            title: entry.title.clone(),
            overview: entry.overview.clone(),
            poster_path: entry.poster_path.clone(),
            backdrop_path: entry.backdrop_path.clone(),
            vote_average: entry.vote_average,
            vote_count: 0,
            release_date: entry.release_date.clone(),
            genre_ids: entry.genre_ids.clone(),
        }
    }
}

// =============================================================================
// Notification Models
// =============================================================================

/// Default time a notification stays visible
pub const DEFAULT_NOTIFICATION_DURATION: Duration = Duration::from_millis(3000);

/// Notification category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationKind {
    Success,
    Error,
}

/// Transient status message produced by a watch-list mutation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    pub message: String,
    pub kind: NotificationKind,
    #[serde(skip, default = "default_duration")]
    pub duration: Duration,
}

fn default_duration() -> Duration {
    DEFAULT_NOTIFICATION_DURATION
}

impl Notification {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            kind: NotificationKind::Success,
            duration: DEFAULT_NOTIFICATION_DURATION,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            kind: NotificationKind::Error,
            duration: DEFAULT_NOTIFICATION_DURATION,
        }
    }

    /// Override how long the notification stays visible
    pub fn with_duration(mut self, duration: Duration) -> Self {
        self.duration = duration;
        self
    }

    pub fn is_error(&self) -> bool {
        self.kind == NotificationKind::Error
    }
}

impl fmt::Display for Notification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let icon = match self.kind {
            NotificationKind::Success => "✓",
            NotificationKind::Error => "✗",
        };
        write!(f, "{} {}", icon, self.message)
    }
}

// =============================================================================
// Tests
// =============================================================================
