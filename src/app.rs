//! App state and core application logic
//!
//! Manages the screen state machine, navigation stack and key handling.
//! Key handling is synchronous: it mutates state and may return an
//! [`AppCommand`] describing a fetch. The event loop runs commands on tokio
//! tasks via [`execute`] and feeds the resulting [`AppMessage`]s back through
//! [`App::handle_message`]. Each fetch slot keeps the token of its latest
//! request so late responses for abandoned requests are ignored.

use anyhow::Result;
use chrono::NaiveDate;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use std::time::{Duration, Instant};
use tracing::{debug, warn};

use crate::api::TmdbClient;
use crate::config::Config;
use crate::feed::{Feed, DEFAULT_RECENCY_DAYS};
use crate::models::*;
use crate::profile::{GateState, ProfileGate, INTRO_DURATION, PROFILES};
use crate::search::{Debouncer, RequestToken, SearchParams, SearchSession};
use crate::toast::ToastState;
use crate::ui::hero::HeroState;
use crate::watchlist::Watchlist;

/// Shown whenever a fetch fails
pub const FETCH_ERROR: &str = "Something went wrong. Press r to retry.";

// =============================================================================
// App State Enum
// =============================================================================

/// Current screen
#[derive(Debug, Clone, PartialEq, Default)]
pub enum AppState {
    #[default]
    Home,
    Movies,
    TvShows,
    MyList,
    Search,
    Detail { id: u64, kind: MediaType },
}

impl AppState {
    pub fn label(&self) -> &'static str {
        match self {
            AppState::Home => "Home",
            AppState::Movies => "Movies",
            AppState::TvShows => "TV Shows",
            AppState::MyList => "My List",
            AppState::Search => "Search",
            AppState::Detail { .. } => "Details",
        }
    }
}

// =============================================================================
// Input Mode
// =============================================================================

/// Current input mode for keyboard handling
#[derive(Debug, Clone, PartialEq, Default)]
pub enum InputMode {
    /// Normal navigation mode
    #[default]
    Normal,
    /// Text input mode (search box focused)
    Editing,
}

// =============================================================================
// Loading State
// =============================================================================

/// Loading state for async operations
#[derive(Debug, Clone, PartialEq, Default)]
pub enum LoadingState {
    /// Idle - no loading in progress
    #[default]
    Idle,
    /// Loading with optional message
    Loading(Option<String>),
    /// Error with message
    Error(String),
}

impl LoadingState {
    pub fn is_loading(&self) -> bool {
        matches!(self, LoadingState::Loading(_))
    }

    pub fn is_error(&self) -> bool {
        matches!(self, LoadingState::Error(_))
    }

    pub fn message(&self) -> Option<&str> {
        match self {
            LoadingState::Loading(Some(msg)) => Some(msg),
            LoadingState::Error(msg) => Some(msg),
            _ => None,
        }
    }
}

// =============================================================================
// Selection State (per-view)
// =============================================================================

/// Selection state for list views
#[derive(Debug, Clone, Default)]
pub struct ListState {
    /// Currently selected index
    pub selected: usize,
    /// Scroll offset for viewport
    pub offset: usize,
    /// Total number of items
    pub len: usize,
}

impl ListState {
    pub fn new(len: usize) -> Self {
        Self {
            selected: 0,
            offset: 0,
            len,
        }
    }

    /// Move selection up
    pub fn up(&mut self) {
        if self.selected > 0 {
            self.selected -= 1;
            if self.selected < self.offset {
                self.offset = self.selected;
            }
        }
    }

    /// Move selection down
    pub fn down(&mut self) {
        if self.len > 0 && self.selected < self.len - 1 {
            self.selected += 1;
        }
    }

    /// Jump to first item
    pub fn first(&mut self) {
        self.selected = 0;
        self.offset = 0;
    }

    /// Jump to last item
    pub fn last(&mut self) {
        if self.len > 0 {
            self.selected = self.len - 1;
        }
    }

    /// Update offset to keep selected item visible
    pub fn scroll_into_view(&mut self, visible: usize) {
        if self.selected < self.offset {
            self.offset = self.selected;
        } else if visible > 0 && self.selected >= self.offset + visible {
            self.offset = self.selected - visible + 1;
        }
    }

    /// Update length (e.g., when new results come in)
    pub fn set_len(&mut self, len: usize) {
        self.len = len;
        if len == 0 {
            self.selected = 0;
            self.offset = 0;
        } else if self.selected >= len {
            self.selected = len - 1;
        }
    }
}

// =============================================================================
// View-Specific State
// =============================================================================

/// Rows of cards with a 2-D cursor (row, column)
#[derive(Debug, Clone, Default)]
pub struct FeedView {
    pub feed: Feed,
    pub loading: LoadingState,
    pub row: usize,
    /// Column per row, so moving between rows keeps each row's position
    pub cols: Vec<usize>,
    pub loaded: bool,
}

impl FeedView {
    pub fn set_feed(&mut self, feed: Feed) {
        self.cols = vec![0; feed.rows.len()];
        self.row = 0;
        self.feed = feed;
        self.loading = LoadingState::Idle;
        self.loaded = true;
    }

    pub fn up(&mut self) {
        self.row = self.row.saturating_sub(1);
    }

    pub fn down(&mut self) {
        if self.row + 1 < self.feed.rows.len() {
            self.row += 1;
        }
    }

    pub fn left(&mut self) {
        if let Some(col) = self.cols.get_mut(self.row) {
            *col = col.saturating_sub(1);
        }
    }

    pub fn right(&mut self) {
        let len = self.feed.rows.get(self.row).map_or(0, |r| r.items.len());
        if let Some(col) = self.cols.get_mut(self.row) {
            if *col + 1 < len {
                *col += 1;
            }
        }
    }

    pub fn col(&self, row: usize) -> usize {
        self.cols.get(row).copied().unwrap_or(0)
    }

    pub fn selected_item(&self) -> Option<&CatalogItem> {
        self.feed
            .rows
            .get(self.row)
            .and_then(|r| r.items.get(self.col(self.row)))
    }
}

/// Detail page contents once loaded
#[derive(Debug, Clone)]
pub enum DetailContent {
    Pending,
    Movie {
        detail: MovieDetail,
        credits: Credits,
        similar: Vec<CatalogItem>,
        similar_list: ListState,
    },
    Tv {
        detail: TvDetail,
        season_list: ListState,
        episodes: Vec<Episode>,
        episode_list: ListState,
        episodes_loading: LoadingState,
    },
}

/// Detail view state (movie or TV show)
#[derive(Debug, Clone)]
pub struct DetailState {
    pub id: u64,
    pub kind: MediaType,
    /// Card data known before the fetch completes
    pub item: Option<CatalogItem>,
    pub loading: LoadingState,
    pub content: DetailContent,
    pub trailer: Option<HeroState>,
}

impl DetailState {
    pub fn pending(id: u64, kind: MediaType, item: Option<CatalogItem>) -> Self {
        Self {
            id,
            kind,
            item,
            loading: LoadingState::Loading(None),
            content: DetailContent::Pending,
            trailer: None,
        }
    }

    /// Title for the header, from whatever is known so far
    pub fn title(&self) -> &str {
        match &self.content {
            DetailContent::Movie { detail, .. } => &detail.title,
            DetailContent::Tv { detail, .. } => &detail.name,
            DetailContent::Pending => self.item.as_ref().map_or("", |i| i.title.as_str()),
        }
    }

    /// Catalog view of this title, for My List
    pub fn as_item(&self) -> Option<CatalogItem> {
        match &self.content {
            DetailContent::Movie { detail, .. } => Some(detail.to_item()),
            DetailContent::Tv { detail, .. } => Some(detail.to_item()),
            DetailContent::Pending => self.item.clone(),
        }
    }

    /// Season currently selected on a TV page
    pub fn selected_season(&self) -> Option<&SeasonSummary> {
        match &self.content {
            DetailContent::Tv {
                detail,
                season_list,
                ..
            } => detail.seasons.get(season_list.selected),
            _ => None,
        }
    }
}

/// Search view state
#[derive(Debug, Clone, Default)]
pub struct SearchView {
    /// Search query
    pub query: String,
    /// Cursor position in query (in chars)
    pub cursor: usize,
    pub params: SearchParams,
    pub session: SearchSession,
    pub debouncer: Debouncer,
    /// Results list state
    pub list: ListState,
    pub loading: LoadingState,
}

impl SearchView {
    fn byte_index(&self) -> usize {
        self.query
            .char_indices()
            .nth(self.cursor)
            .map_or(self.query.len(), |(i, _)| i)
    }

    fn char_len(&self) -> usize {
        self.query.chars().count()
    }

    /// Insert character at cursor
    pub fn insert(&mut self, c: char) {
        let idx = self.byte_index();
        self.query.insert(idx, c);
        self.cursor += 1;
    }

    /// Delete character before cursor
    pub fn backspace(&mut self) -> bool {
        if self.cursor == 0 {
            return false;
        }
        self.cursor -= 1;
        let idx = self.byte_index();
        self.query.remove(idx);
        true
    }

    /// Delete character at cursor
    pub fn delete(&mut self) -> bool {
        if self.cursor >= self.char_len() {
            return false;
        }
        let idx = self.byte_index();
        self.query.remove(idx);
        true
    }

    pub fn cursor_left(&mut self) {
        self.cursor = self.cursor.saturating_sub(1);
    }

    pub fn cursor_right(&mut self) {
        if self.cursor < self.char_len() {
            self.cursor += 1;
        }
    }

    pub fn cursor_home(&mut self) {
        self.cursor = 0;
    }

    pub fn cursor_end(&mut self) {
        self.cursor = self.char_len();
    }

    /// Split query at the cursor for rendering
    pub fn split_at_cursor(&self) -> (&str, &str) {
        self.query.split_at(self.byte_index())
    }

    /// Current params with the typed query
    pub fn current_params(&self) -> SearchParams {
        SearchParams {
            query: self.query.trim().to_string(),
            ..self.params.clone()
        }
    }

    pub fn selected_result(&self) -> Option<&CatalogItem> {
        self.session.results().get(self.list.selected)
    }
}

// =============================================================================
// Commands & Messages
// =============================================================================

/// Fetch requested by the UI
#[derive(Debug, Clone, PartialEq)]
pub enum AppCommand {
    LoadHome { token: RequestToken },
    LoadMovies { token: RequestToken },
    LoadTv { token: RequestToken },
    LoadMovieDetail { token: RequestToken, id: u64 },
    LoadTvDetail { token: RequestToken, id: u64 },
    LoadSeason { token: RequestToken, id: u64, season: u16 },
    Search { token: RequestToken, params: SearchParams, page: u32 },
}

#[derive(Debug, Clone)]
pub struct HomeData {
    pub movies: Vec<CatalogItem>,
    pub tv: Vec<CatalogItem>,
    pub hero_detail: Option<MovieDetail>,
    pub hero_videos: Vec<Video>,
}

#[derive(Debug, Clone)]
pub struct MoviesData {
    pub popular: Vec<CatalogItem>,
    pub top_rated: Vec<CatalogItem>,
    pub now_playing: Vec<CatalogItem>,
}

#[derive(Debug, Clone)]
pub struct TvData {
    pub popular: Vec<CatalogItem>,
    pub top_rated: Vec<CatalogItem>,
    pub trending: Vec<CatalogItem>,
}

#[derive(Debug, Clone)]
pub struct MovieDetailData {
    pub detail: MovieDetail,
    pub videos: Vec<Video>,
    pub credits: Credits,
    pub similar: Vec<CatalogItem>,
}

#[derive(Debug, Clone)]
pub struct TvDetailData {
    pub detail: TvDetail,
    pub videos: Vec<Video>,
}

/// Completed fetch; errors are carried as display strings
#[derive(Debug, Clone)]
pub enum AppMessage {
    HomeLoaded { token: RequestToken, result: Result<HomeData, String> },
    MoviesLoaded { token: RequestToken, result: Result<MoviesData, String> },
    TvLoaded { token: RequestToken, result: Result<TvData, String> },
    MovieDetailLoaded { token: RequestToken, result: Result<MovieDetailData, String> },
    TvDetailLoaded { token: RequestToken, result: Result<TvDetailData, String> },
    SeasonLoaded { token: RequestToken, season: u16, result: Result<Vec<Episode>, String> },
    SearchLoaded { token: RequestToken, result: Result<SearchPage, String> },
}

/// Latest token per fetch slot
#[derive(Debug, Clone, Default)]
struct Tokens {
    home: RequestToken,
    movies: RequestToken,
    tv: RequestToken,
    detail: RequestToken,
    season: RequestToken,
}

fn issue(slot: &mut RequestToken) -> RequestToken {
    *slot = slot.next();
    *slot
}

// =============================================================================
// Main Application State
// =============================================================================

/// Main application state
pub struct App {
    /// Current state/screen
    pub state: AppState,
    /// Navigation history stack
    pub nav_stack: Vec<AppState>,
    /// Whether the app is running
    pub running: bool,
    /// Current input mode
    pub input_mode: InputMode,

    pub gate: ProfileGate,
    pub watchlist: Watchlist,
    pub toast: ToastState,
    /// Cursor on the profile picker
    pub profile_list: ListState,
    intro_started: Instant,

    // View-specific states
    pub home: FeedView,
    pub home_hero: Option<HeroState>,
    pub movies: FeedView,
    pub tv: FeedView,
    pub detail: Option<DetailState>,
    pub my_list: ListState,
    pub search: SearchView,

    tokens: Tokens,
    /// Fixed date for badge windows; `None` follows the local clock
    pub today: Option<NaiveDate>,
    pub recency_days: u32,
    toast_duration: Duration,
}

impl App {
    pub fn new(watchlist: Watchlist, gate: ProfileGate) -> Self {
        Self {
            state: AppState::Home,
            nav_stack: Vec::new(),
            running: true,
            input_mode: InputMode::Normal,

            gate,
            my_list: ListState::new(watchlist.len()),
            watchlist,
            toast: ToastState::default(),
            profile_list: ListState::new(PROFILES.len()),
            intro_started: Instant::now(),

            home: FeedView::default(),
            home_hero: None,
            movies: FeedView::default(),
            tv: FeedView::default(),
            detail: None,
            search: SearchView::default(),

            tokens: Tokens::default(),
            today: None,
            recency_days: DEFAULT_RECENCY_DAYS,
            toast_duration: DEFAULT_NOTIFICATION_DURATION,
        }
    }

    /// Apply the tunables from the config file
    pub fn with_config(mut self, config: &Config) -> Self {
        self.recency_days = config.recency_days;
        self.toast_duration = config.toast_duration();
        self.search.debouncer = Debouncer::new(config.search_debounce());
        self
    }

    /// Initial fetch when a saved profile skipped the gate
    pub fn start(&mut self) -> Option<AppCommand> {
        self.intro_started = Instant::now();
        if self.in_main_app() {
            Some(self.enter_feed(AppState::Home))
        } else {
            None
        }
    }

    pub fn in_main_app(&self) -> bool {
        matches!(self.gate.state(), GateState::MainApp { .. })
    }

    /// Navigate to a new state, pushing current to stack
    pub fn navigate(&mut self, state: AppState) {
        if self.state != state {
            self.nav_stack.push(self.state.clone());
            self.state = state;
        }
        self.input_mode = InputMode::Normal;
    }

    /// Go back to previous state; re-entering a detail page refetches it
    pub fn back(&mut self) -> (bool, Option<AppCommand>) {
        if self.input_mode == InputMode::Editing {
            self.input_mode = InputMode::Normal;
            return (true, None);
        }

        match self.nav_stack.pop() {
            Some(prev) => {
                self.state = prev.clone();
                let command = match prev {
                    AppState::Detail { id, kind } => Some(self.load_detail(id, kind, None)),
                    AppState::Home if !self.home.loaded => Some(self.enter_feed(AppState::Home)),
                    AppState::Movies if !self.movies.loaded => {
                        Some(self.enter_feed(AppState::Movies))
                    }
                    AppState::TvShows if !self.tv.loaded => Some(self.enter_feed(AppState::TvShows)),
                    _ => None,
                };
                (true, command)
            }
            None => (false, None),
        }
    }

    /// Quit the application
    pub fn quit(&mut self) {
        self.running = false;
    }

    /// Show a notification from a watch-list mutation
    pub fn notify(&mut self, notification: Notification) {
        let notification = if notification.duration == DEFAULT_NOTIFICATION_DURATION {
            notification.with_duration(self.toast_duration)
        } else {
            notification
        };
        self.toast.show(notification, Instant::now());
    }

    /// Date the recency window ends on, read on every feed build
    pub fn today(&self) -> NaiveDate {
        self.today
            .unwrap_or_else(|| chrono::Local::now().date_naive())
    }

    // -------------------------------------------------------------------------
    // Fetch issuing
    // -------------------------------------------------------------------------

    /// Switch to a feed screen and (re)fetch its lists
    fn enter_feed(&mut self, screen: AppState) -> AppCommand {
        let loading = LoadingState::Loading(Some("Loading...".into()));
        let command = match screen {
            AppState::Movies => {
                self.movies.loading = loading;
                AppCommand::LoadMovies {
                    token: issue(&mut self.tokens.movies),
                }
            }
            AppState::TvShows => {
                self.tv.loading = loading;
                AppCommand::LoadTv {
                    token: issue(&mut self.tokens.tv),
                }
            }
            _ => {
                self.home.loading = loading;
                AppCommand::LoadHome {
                    token: issue(&mut self.tokens.home),
                }
            }
        };
        self.state = screen;
        command
    }

    /// Navbar switch: tab screens reset the history
    fn switch_tab(&mut self, screen: AppState) -> Option<AppCommand> {
        self.nav_stack.clear();
        self.input_mode = InputMode::Normal;
        match screen {
            AppState::Home | AppState::Movies | AppState::TvShows => Some(self.enter_feed(screen)),
            AppState::MyList => {
                self.my_list.set_len(self.watchlist.len());
                self.state = AppState::MyList;
                None
            }
            other => {
                self.state = other;
                None
            }
        }
    }

    fn load_detail(&mut self, id: u64, kind: MediaType, item: Option<CatalogItem>) -> AppCommand {
        self.detail = Some(DetailState::pending(id, kind, item));
        let token = issue(&mut self.tokens.detail);
        // A season request for the previous page is now irrelevant
        issue(&mut self.tokens.season);
        match kind {
            MediaType::Movie => AppCommand::LoadMovieDetail { token, id },
            MediaType::Tv => AppCommand::LoadTvDetail { token, id },
        }
    }

    /// Push a detail page for a card
    pub fn open_detail(&mut self, item: CatalogItem) -> AppCommand {
        let (id, kind) = (item.id, item.media_type);
        self.navigate(AppState::Detail { id, kind });
        self.load_detail(id, kind, Some(item))
    }

    fn load_season(&mut self) -> Option<AppCommand> {
        let detail = self.detail.as_mut()?;
        let season = detail.selected_season()?.season_number;
        let id = detail.id;
        if let DetailContent::Tv {
            episodes,
            episode_list,
            episodes_loading,
            ..
        } = &mut detail.content
        {
            episodes.clear();
            episode_list.set_len(0);
            *episodes_loading = LoadingState::Loading(None);
        }
        Some(AppCommand::LoadSeason {
            token: issue(&mut self.tokens.season),
            id,
            season,
        })
    }

    /// Fire a search for the current query/filter/sort; blank queries clear results
    fn issue_search(&mut self) -> Option<AppCommand> {
        self.search.debouncer.cancel();
        let params = self.search.current_params();
        self.search.params = params.clone();
        self.search.list.set_len(0);
        self.search.list.first();

        if params.is_blank() {
            self.search.session.reset(params);
            self.search.loading = LoadingState::Idle;
            return None;
        }

        let token = self.search.session.begin(params.clone());
        self.search.loading = LoadingState::Loading(Some("Searching...".into()));
        Some(AppCommand::Search {
            token,
            params,
            page: 1,
        })
    }

    fn load_more(&mut self) -> Option<AppCommand> {
        let (token, page) = self.search.session.begin_next_page()?;
        self.search.loading = LoadingState::Loading(Some("Loading more...".into()));
        Some(AppCommand::Search {
            token,
            params: self.search.session.params().clone(),
            page,
        })
    }

    /// Re-issue the failed fetch for the current screen
    fn retry(&mut self) -> Option<AppCommand> {
        match self.state.clone() {
            AppState::Home | AppState::Movies | AppState::TvShows => {
                Some(self.enter_feed(self.state.clone()))
            }
            AppState::Detail { id, kind } => {
                let item = self.detail.as_ref().and_then(|d| d.item.clone());
                Some(self.load_detail(id, kind, item))
            }
            AppState::Search => self.issue_search(),
            AppState::MyList => None,
        }
    }

    // -------------------------------------------------------------------------
    // Watch list
    // -------------------------------------------------------------------------

    /// Add a card to My List (duplicates produce the "already" notification)
    pub fn add_to_list(&mut self, item: &CatalogItem) {
        let notification = self.watchlist.add(WatchlistEntry::from(item));
        self.my_list.set_len(self.watchlist.len());
        self.notify(notification);
    }

    /// Detail page button: add or remove
    pub fn toggle_in_list(&mut self, item: &CatalogItem) {
        if let Some(notification) = self.watchlist.toggle(WatchlistEntry::from(item)) {
            self.notify(notification);
        }
        self.my_list.set_len(self.watchlist.len());
    }

    pub fn remove_from_list(&mut self, id: u64) {
        if let Some(notification) = self.watchlist.remove(id) {
            self.notify(notification);
        }
        self.my_list.set_len(self.watchlist.len());
    }

    pub fn clear_list(&mut self) {
        self.watchlist.clear();
        self.my_list.set_len(0);
    }

    // -------------------------------------------------------------------------
    // Time
    // -------------------------------------------------------------------------

    /// Advance timers: toast expiry, intro splash and search debounce
    pub fn tick(&mut self, now: Instant) -> Option<AppCommand> {
        self.toast.tick(now);

        if self.gate.state() == &GateState::Loading
            && now.saturating_duration_since(self.intro_started) >= INTRO_DURATION
        {
            self.gate.finish_intro();
        }

        if self.search.debouncer.fire(now) {
            return self.issue_search();
        }
        None
    }

    // -------------------------------------------------------------------------
    // Async results
    // -------------------------------------------------------------------------

    /// Apply a completed fetch if it is still the latest for its slot
    pub fn handle_message(&mut self, message: AppMessage) -> Option<AppCommand> {
        match message {
            AppMessage::HomeLoaded { token, result } => {
                if token != self.tokens.home {
                    debug!("Dropping stale home response");
                    return None;
                }
                match result {
                    Ok(data) => {
                        self.home_hero = data.movies.first().cloned().map(|item| {
                            HeroState::new(item, data.hero_detail, &data.hero_videos)
                        });
                        let feed = Feed::home(&data.movies, &data.tv, self.today(), self.recency_days);
                        self.home.set_feed(feed);
                    }
                    Err(e) => {
                        warn!(error = %e, "Home fetch failed");
                        self.home.loading = LoadingState::Error(FETCH_ERROR.into());
                    }
                }
                None
            }
            AppMessage::MoviesLoaded { token, result } => {
                if token != self.tokens.movies {
                    return None;
                }
                match result {
                    Ok(data) => {
                        let feed = Feed::movies(
                            &data.popular,
                            &data.top_rated,
                            &data.now_playing,
                            self.today(),
                            self.recency_days,
                        );
                        self.movies.set_feed(feed);
                    }
                    Err(e) => {
                        warn!(error = %e, "Movies fetch failed");
                        self.movies.loading = LoadingState::Error(FETCH_ERROR.into());
                    }
                }
                None
            }
            AppMessage::TvLoaded { token, result } => {
                if token != self.tokens.tv {
                    return None;
                }
                match result {
                    Ok(data) => {
                        let feed = Feed::tv(
                            &data.popular,
                            &data.top_rated,
                            &data.trending,
                            self.today(),
                            self.recency_days,
                        );
                        self.tv.set_feed(feed);
                    }
                    Err(e) => {
                        warn!(error = %e, "TV fetch failed");
                        self.tv.loading = LoadingState::Error(FETCH_ERROR.into());
                    }
                }
                None
            }
            AppMessage::MovieDetailLoaded { token, result } => {
                if token != self.tokens.detail {
                    return None;
                }
                let detail = self.detail.as_mut()?;
                match result {
                    Ok(data) => {
                        let item = data.detail.to_item();
                        let mut similar = data.similar;
                        similar.truncate(6);
                        detail.trailer = Some(HeroState::new(item, None, &data.videos));
                        detail.content = DetailContent::Movie {
                            similar_list: ListState::new(similar.len()),
                            detail: data.detail,
                            credits: data.credits,
                            similar,
                        };
                        detail.loading = LoadingState::Idle;
                    }
                    Err(e) => {
                        warn!(error = %e, "Movie detail fetch failed");
                        detail.loading = LoadingState::Error(FETCH_ERROR.into());
                    }
                }
                None
            }
            AppMessage::TvDetailLoaded { token, result } => {
                if token != self.tokens.detail {
                    return None;
                }
                let detail = self.detail.as_mut()?;
                match result {
                    Ok(data) => {
                        detail.trailer =
                            Some(HeroState::new(data.detail.to_item(), None, &data.videos));
                        detail.content = DetailContent::Tv {
                            season_list: ListState::new(data.detail.seasons.len()),
                            detail: data.detail,
                            episodes: Vec::new(),
                            episode_list: ListState::new(0),
                            episodes_loading: LoadingState::Idle,
                        };
                        detail.loading = LoadingState::Idle;
                        self.load_season()
                    }
                    Err(e) => {
                        warn!(error = %e, "TV detail fetch failed");
                        detail.loading = LoadingState::Error(FETCH_ERROR.into());
                        None
                    }
                }
            }
            AppMessage::SeasonLoaded {
                token,
                season,
                result,
            } => {
                if token != self.tokens.season {
                    return None;
                }
                if let Some(DetailState {
                    content:
                        DetailContent::Tv {
                            episodes,
                            episode_list,
                            episodes_loading,
                            ..
                        },
                    ..
                }) = self.detail.as_mut()
                {
                    match result {
                        Ok(list) => {
                            episode_list.set_len(list.len());
                            episode_list.first();
                            *episodes = list;
                            *episodes_loading = LoadingState::Idle;
                        }
                        Err(e) => {
                            warn!(error = %e, season, "Season fetch failed");
                            *episodes_loading = LoadingState::Error(FETCH_ERROR.into());
                        }
                    }
                }
                None
            }
            AppMessage::SearchLoaded { token, result } => {
                match result {
                    Ok(page) => {
                        if self.search.session.apply(token, page) {
                            self.search.list.set_len(self.search.session.results().len());
                            self.search.loading = LoadingState::Idle;
                        }
                    }
                    Err(e) => {
                        if self.search.session.fail(token) {
                            warn!(error = %e, "Search failed");
                            self.search.loading = LoadingState::Error(FETCH_ERROR.into());
                        }
                    }
                }
                None
            }
        }
    }

    // -------------------------------------------------------------------------
    // Keyboard Event Handling
    // -------------------------------------------------------------------------

    /// Handle keyboard event, possibly requesting a fetch
    pub fn handle_key(&mut self, key: KeyEvent) -> Option<AppCommand> {
        if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
            self.quit();
            return None;
        }

        match self.gate.state().clone() {
            GateState::Loading => {
                // Any key skips the intro
                self.gate.finish_intro();
                None
            }
            GateState::ProfileSelection => self.handle_profile_key(key),
            GateState::MainApp { .. } => {
                if self.input_mode == InputMode::Editing {
                    self.handle_editing_key(key)
                } else {
                    self.handle_normal_key(key)
                }
            }
        }
    }

    fn handle_profile_key(&mut self, key: KeyEvent) -> Option<AppCommand> {
        let chosen = match key.code {
            KeyCode::Left | KeyCode::Char('h') | KeyCode::Up | KeyCode::Char('k') => {
                self.profile_list.up();
                None
            }
            KeyCode::Right | KeyCode::Char('l') | KeyCode::Down | KeyCode::Char('j') => {
                self.profile_list.down();
                None
            }
            KeyCode::Enter => PROFILES.get(self.profile_list.selected),
            KeyCode::Char(c @ '1'..='9') => PROFILES.get((c as usize) - ('1' as usize)),
            KeyCode::Char('q') => {
                self.quit();
                None
            }
            _ => None,
        }?;

        self.gate.select(chosen.id)?;
        self.nav_stack.clear();
        Some(self.enter_feed(AppState::Home))
    }

    /// Handle keys in editing (text input) mode
    fn handle_editing_key(&mut self, key: KeyEvent) -> Option<AppCommand> {
        let now = Instant::now();
        match key.code {
            KeyCode::Esc => {
                self.input_mode = InputMode::Normal;
                None
            }
            KeyCode::Enter | KeyCode::Down => {
                self.input_mode = InputMode::Normal;
                // Submit now instead of waiting out the debounce
                if self.search.debouncer.is_pending() {
                    self.issue_search()
                } else {
                    None
                }
            }
            KeyCode::Tab => {
                self.search.params.filter = self.search.params.filter.next();
                self.issue_search()
            }
            KeyCode::BackTab => {
                self.search.params.sort = self.search.params.sort.next();
                self.issue_search()
            }
            KeyCode::Char(c) => {
                self.search.insert(c);
                self.search.debouncer.touch(now);
                None
            }
            KeyCode::Backspace => {
                if self.search.backspace() {
                    self.search.debouncer.touch(now);
                }
                None
            }
            KeyCode::Delete => {
                if self.search.delete() {
                    self.search.debouncer.touch(now);
                }
                None
            }
            KeyCode::Left => {
                self.search.cursor_left();
                None
            }
            KeyCode::Right => {
                self.search.cursor_right();
                None
            }
            KeyCode::Home => {
                self.search.cursor_home();
                None
            }
            KeyCode::End => {
                self.search.cursor_end();
                None
            }
            _ => None,
        }
    }

    /// Handle keys in normal navigation mode
    fn handle_normal_key(&mut self, key: KeyEvent) -> Option<AppCommand> {
        // Global shortcuts
        match key.code {
            KeyCode::Char('q') => {
                self.quit();
                return None;
            }
            KeyCode::Char('/') => {
                self.navigate(AppState::Search);
                self.input_mode = InputMode::Editing;
                return None;
            }
            KeyCode::Esc => {
                if self.toast.is_visible() {
                    self.toast.close();
                    return None;
                }
                return self.back().1;
            }
            KeyCode::Char('x') => {
                self.toast.close();
                return None;
            }
            KeyCode::Char('1') => return self.switch_tab(AppState::Home),
            KeyCode::Char('2') => return self.switch_tab(AppState::TvShows),
            KeyCode::Char('3') => return self.switch_tab(AppState::Movies),
            KeyCode::Char('4') => return self.switch_tab(AppState::MyList),
            KeyCode::Char('p') => {
                self.gate.switch_profile();
                self.profile_list.first();
                return None;
            }
            KeyCode::Char('r') => return self.retry(),
            _ => {}
        }

        match self.state.clone() {
            AppState::Home | AppState::Movies | AppState::TvShows => self.handle_feed_key(key),
            AppState::MyList => self.handle_my_list_key(key),
            AppState::Search => self.handle_search_key(key),
            AppState::Detail { .. } => self.handle_detail_key(key),
        }
    }

    fn feed_mut(&mut self) -> &mut FeedView {
        match self.state {
            AppState::Movies => &mut self.movies,
            AppState::TvShows => &mut self.tv,
            _ => &mut self.home,
        }
    }

    fn handle_feed_key(&mut self, key: KeyEvent) -> Option<AppCommand> {
        match key.code {
            KeyCode::Up | KeyCode::Char('k') => self.feed_mut().up(),
            KeyCode::Down | KeyCode::Char('j') => self.feed_mut().down(),
            KeyCode::Left | KeyCode::Char('h') => self.feed_mut().left(),
            KeyCode::Right | KeyCode::Char('l') => self.feed_mut().right(),
            KeyCode::Enter => {
                let item = self.feed_mut().selected_item().cloned()?;
                return Some(self.open_detail(item));
            }
            KeyCode::Char('m') => {
                let item = self.feed_mut().selected_item().cloned()?;
                self.add_to_list(&item);
            }
            // Hero banner (Home only)
            KeyCode::Char('i') if self.state == AppState::Home => {
                let item = self.home_hero.as_ref()?.item.clone();
                return Some(self.open_detail(item));
            }
            KeyCode::Char('a') if self.state == AppState::Home => {
                let item = self.home_hero.as_ref()?.item.clone();
                self.toggle_in_list(&item);
            }
            KeyCode::Char('u') if self.state == AppState::Home => {
                if let Some(hero) = self.home_hero.as_mut() {
                    hero.toggle_mute();
                }
            }
            KeyCode::Char('v') if self.state == AppState::Home => {
                if let Some(hero) = self.home_hero.as_mut() {
                    hero.toggle_video();
                }
            }
            _ => {}
        }
        None
    }

    fn handle_my_list_key(&mut self, key: KeyEvent) -> Option<AppCommand> {
        match key.code {
            KeyCode::Up | KeyCode::Char('k') => self.my_list.up(),
            KeyCode::Down | KeyCode::Char('j') => self.my_list.down(),
            KeyCode::Enter => {
                let entry = self.watchlist.entries().get(self.my_list.selected)?;
                let item = CatalogItem::from(entry);
                return Some(self.open_detail(item));
            }
            KeyCode::Char('d') | KeyCode::Delete => {
                let id = self.watchlist.entries().get(self.my_list.selected)?.id;
                self.remove_from_list(id);
            }
            KeyCode::Char('C') => self.clear_list(),
            _ => {}
        }
        None
    }

    fn handle_search_key(&mut self, key: KeyEvent) -> Option<AppCommand> {
        match key.code {
            KeyCode::Char('s') | KeyCode::Char('i') => {
                self.input_mode = InputMode::Editing;
                None
            }
            KeyCode::Up | KeyCode::Char('k') => {
                if self.search.list.selected == 0 {
                    self.input_mode = InputMode::Editing;
                } else {
                    self.search.list.up();
                }
                None
            }
            KeyCode::Down | KeyCode::Char('j') => {
                self.search.list.down();
                None
            }
            KeyCode::Home => {
                self.search.list.first();
                None
            }
            KeyCode::End => {
                self.search.list.last();
                None
            }
            KeyCode::Tab | KeyCode::Char('f') => {
                self.search.params.filter = self.search.params.filter.next();
                self.issue_search()
            }
            KeyCode::BackTab | KeyCode::Char('o') => {
                self.search.params.sort = self.search.params.sort.next();
                self.issue_search()
            }
            KeyCode::Char('n') => self.load_more(),
            KeyCode::Char('m') => {
                let item = self.search.selected_result()?.clone();
                self.add_to_list(&item);
                None
            }
            KeyCode::Enter => {
                let item = self.search.selected_result()?.clone();
                Some(self.open_detail(item))
            }
            _ => None,
        }
    }

    fn handle_detail_key(&mut self, key: KeyEvent) -> Option<AppCommand> {
        let detail = self.detail.as_mut()?;
        match key.code {
            KeyCode::Char('m') | KeyCode::Char('a') => {
                let item = detail.as_item()?;
                self.toggle_in_list(&item);
                None
            }
            KeyCode::Char('u') => {
                if let Some(trailer) = detail.trailer.as_mut() {
                    trailer.toggle_mute();
                }
                None
            }
            KeyCode::Char('v') => {
                if let Some(trailer) = detail.trailer.as_mut() {
                    trailer.toggle_video();
                }
                None
            }
            KeyCode::Up | KeyCode::Char('k') => {
                match &mut detail.content {
                    DetailContent::Movie { similar_list, .. } => similar_list.up(),
                    DetailContent::Tv { episode_list, .. } => episode_list.up(),
                    DetailContent::Pending => {}
                }
                None
            }
            KeyCode::Down | KeyCode::Char('j') => {
                match &mut detail.content {
                    DetailContent::Movie { similar_list, .. } => similar_list.down(),
                    DetailContent::Tv { episode_list, .. } => episode_list.down(),
                    DetailContent::Pending => {}
                }
                None
            }
            KeyCode::Left | KeyCode::Char('h') | KeyCode::Right | KeyCode::Char('l') => {
                let forward = matches!(key.code, KeyCode::Right | KeyCode::Char('l'));
                let changed = match &mut detail.content {
                    DetailContent::Tv { season_list, .. } => {
                        let before = season_list.selected;
                        if forward {
                            season_list.down();
                        } else {
                            season_list.up();
                        }
                        season_list.selected != before
                    }
                    _ => false,
                };
                if changed {
                    self.load_season()
                } else {
                    None
                }
            }
            KeyCode::Enter => {
                let item = match &detail.content {
                    DetailContent::Movie {
                        similar,
                        similar_list,
                        ..
                    } => similar.get(similar_list.selected).cloned(),
                    _ => None,
                }?;
                Some(self.open_detail(item))
            }
            _ => None,
        }
    }
}

// =============================================================================
// Command execution
// =============================================================================

async fn load_home(client: &TmdbClient) -> Result<HomeData> {
    let (movies, tv) = tokio::try_join!(client.popular_movies(), client.popular_tv())?;

    // The banner is optional: a failed hero fetch still shows the rows
    let (hero_detail, hero_videos) = match movies.first() {
        Some(first) => {
            match tokio::try_join!(client.movie_detail(first.id), client.movie_videos(first.id)) {
                Ok((detail, videos)) => (Some(detail), videos),
                Err(e) => {
                    warn!(error = %e, id = first.id, "Hero fetch failed");
                    (None, Vec::new())
                }
            }
        }
        None => (None, Vec::new()),
    };

    Ok(HomeData {
        movies,
        tv,
        hero_detail,
        hero_videos,
    })
}

async fn load_movies(client: &TmdbClient) -> Result<MoviesData> {
    let (popular, top_rated, now_playing) = tokio::try_join!(
        client.popular_movies(),
        client.top_rated_movies(),
        client.now_playing_movies()
    )?;
    Ok(MoviesData {
        popular,
        top_rated,
        now_playing,
    })
}

async fn load_tv(client: &TmdbClient) -> Result<TvData> {
    let (popular, top_rated, trending) = tokio::try_join!(
        client.popular_tv(),
        client.top_rated_tv(),
        client.trending_tv()
    )?;
    Ok(TvData {
        popular,
        top_rated,
        trending,
    })
}

async fn load_movie_detail(client: &TmdbClient, id: u64) -> Result<MovieDetailData> {
    let (detail, videos, credits, similar) = tokio::try_join!(
        client.movie_detail(id),
        client.movie_videos(id),
        client.movie_credits(id),
        client.similar_movies(id)
    )?;
    Ok(MovieDetailData {
        detail,
        videos,
        credits,
        similar,
    })
}

async fn load_tv_detail(client: &TmdbClient, id: u64) -> Result<TvDetailData> {
    let (detail, videos) = tokio::try_join!(client.tv_detail(id), client.tv_videos(id))?;
    Ok(TvDetailData { detail, videos })
}

/// Run one command against the catalog client
pub async fn execute(client: &TmdbClient, command: AppCommand) -> AppMessage {
    debug!(?command, "Executing");
    let err = |e: anyhow::Error| format!("{:#}", e);
    match command {
        AppCommand::LoadHome { token } => AppMessage::HomeLoaded {
            token,
            result: load_home(client).await.map_err(err),
        },
        AppCommand::LoadMovies { token } => AppMessage::MoviesLoaded {
            token,
            result: load_movies(client).await.map_err(err),
        },
        AppCommand::LoadTv { token } => AppMessage::TvLoaded {
            token,
            result: load_tv(client).await.map_err(err),
        },
        AppCommand::LoadMovieDetail { token, id } => AppMessage::MovieDetailLoaded {
            token,
            result: load_movie_detail(client, id).await.map_err(err),
        },
        AppCommand::LoadTvDetail { token, id } => AppMessage::TvDetailLoaded {
            token,
            result: load_tv_detail(client, id).await.map_err(err),
        },
        AppCommand::LoadSeason { token, id, season } => AppMessage::SeasonLoaded {
            token,
            season,
            result: client.tv_season(id, season).await.map_err(err),
        },
        AppCommand::Search {
            token,
            params,
            page,
        } => AppMessage::SearchLoaded {
            token,
            result: client
                .search(&params.query, params.filter, page)
                .await
                .map_err(err),
        },
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::{KeyValueStore, MemoryStore};
    use std::sync::Arc;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn app() -> App {
        let store: Arc<dyn KeyValueStore> = Arc::new(MemoryStore::new());
        let mut gate = ProfileGate::restore(store.clone());
        gate.finish_intro();
        gate.select("1");
        App::new(Watchlist::load(store), gate)
    }

    fn item(id: u64, kind: MediaType) -> CatalogItem {
        CatalogItem {
            id,
            media_type: kind,
            title: format!("Title {}", id),
            overview: String::new(),
            poster_path: None,
            backdrop_path: None,
            vote_average: 7.0,
            vote_count: 2000,
            release_date: None,
            genre_ids: vec![28],
        }
    }

    // -------------------------------------------------------------------------
    // ListState Tests
    // -------------------------------------------------------------------------

    #[test]
    fn test_list_state_navigation() {
        let mut list = ListState::new(5);
        list.down();
        list.down();
        list.down();
        list.down();
        list.down();
        assert_eq!(list.selected, 4);
        list.up();
        assert_eq!(list.selected, 3);
        list.first();
        assert_eq!(list.selected, 0);
        list.last();
        assert_eq!(list.selected, 4);
    }

    #[test]
    fn test_list_state_set_len() {
        let mut list = ListState::new(10);
        list.selected = 8;
        list.set_len(5);
        assert_eq!(list.selected, 4);
        list.set_len(0);
        assert_eq!(list.selected, 0);
    }

    // -------------------------------------------------------------------------
    // SearchView Tests
    // -------------------------------------------------------------------------

    #[test]
    fn test_search_editing_multibyte() {
        let mut search = SearchView::default();
        for c in "amélie".chars() {
            search.insert(c);
        }
        search.cursor_left();
        search.cursor_left();
        search.cursor_left();
        search.insert('X');
        assert_eq!(search.query, "améXlie");
        search.backspace();
        search.cursor_left();
        search.insert('X');
        assert_eq!(search.query, "amXélie");
        search.backspace();
        assert_eq!(search.query, "amélie");
        search.cursor_end();
        assert_eq!(search.split_at_cursor(), ("amélie", ""));
    }

    // -------------------------------------------------------------------------
    // App Tests
    // -------------------------------------------------------------------------

    #[test]
    fn test_start_loads_home_for_saved_profile() {
        let mut app = app();
        assert!(matches!(app.start(), Some(AppCommand::LoadHome { .. })));
        assert!(app.home.loading.is_loading());
    }

    #[test]
    fn test_stale_home_response_ignored() {
        let mut app = app();
        let first = app.start();
        let second = app.retry();
        let (Some(AppCommand::LoadHome { token: old }), Some(AppCommand::LoadHome { token: new })) =
            (first, second)
        else {
            panic!("expected two home loads");
        };

        let data = HomeData {
            movies: vec![item(1, MediaType::Movie)],
            tv: vec![],
            hero_detail: None,
            hero_videos: vec![],
        };
        app.handle_message(AppMessage::HomeLoaded {
            token: old,
            result: Ok(data.clone()),
        });
        assert!(!app.home.loaded);

        app.handle_message(AppMessage::HomeLoaded {
            token: new,
            result: Ok(data),
        });
        assert!(app.home.loaded);
        assert_eq!(app.home_hero.as_ref().unwrap().item.id, 1);
    }

    #[test]
    fn test_fetch_error_shows_retry_message() {
        let mut app = app();
        let Some(AppCommand::LoadHome { token }) = app.start() else {
            panic!("expected home load");
        };
        app.handle_message(AppMessage::HomeLoaded {
            token,
            result: Err("boom".into()),
        });
        assert_eq!(app.home.loading.message(), Some(FETCH_ERROR));
        assert!(matches!(
            app.handle_key(key(KeyCode::Char('r'))),
            Some(AppCommand::LoadHome { .. })
        ));
    }

    #[test]
    fn test_badges_follow_the_date_of_each_fetch() {
        let mut app = app();
        let mut fresh = item(1, MediaType::Movie);
        fresh.release_date = Some("2024-06-10".into());
        let data = HomeData {
            movies: vec![fresh],
            tv: vec![],
            hero_detail: None,
            hero_videos: vec![],
        };

        app.today = NaiveDate::from_ymd_opt(2024, 6, 15);
        let Some(AppCommand::LoadHome { token }) = app.start() else {
            panic!("expected home load");
        };
        app.handle_message(AppMessage::HomeLoaded {
            token,
            result: Ok(data.clone()),
        });
        assert!(app.home.feed.badges.is_recent(1));

        // A later refresh in the same session uses the new date
        app.today = NaiveDate::from_ymd_opt(2024, 8, 1);
        let Some(AppCommand::LoadHome { token }) = app.retry() else {
            panic!("expected home load");
        };
        app.handle_message(AppMessage::HomeLoaded {
            token,
            result: Ok(data),
        });
        assert!(!app.home.feed.badges.is_recent(1));
    }

    #[test]
    fn test_notify_keeps_explicit_duration() {
        let mut app = app();
        app.toast_duration = Duration::from_millis(5000);

        app.notify(Notification::success("Saved"));
        assert_eq!(app.toast.current().unwrap().duration, Duration::from_millis(5000));

        app.notify(Notification::error("Oops").with_duration(Duration::from_millis(800)));
        assert_eq!(app.toast.current().unwrap().duration, Duration::from_millis(800));
    }

    #[test]
    fn test_add_duplicate_shows_error_toast() {
        let mut app = app();
        let it = item(7, MediaType::Movie);
        app.add_to_list(&it);
        assert!(!app.toast.current().unwrap().is_error());
        app.add_to_list(&it);
        assert!(app.toast.current().unwrap().is_error());
        assert_eq!(app.watchlist.len(), 1);
    }

    #[test]
    fn test_open_detail_and_back() {
        let mut app = app();
        app.start();
        let cmd = app.open_detail(item(5, MediaType::Tv));
        assert!(matches!(cmd, AppCommand::LoadTvDetail { id: 5, .. }));
        assert_eq!(app.state, AppState::Detail { id: 5, kind: MediaType::Tv });

        let (handled, _) = app.back();
        assert!(handled);
        assert_eq!(app.state, AppState::Home);
    }

    #[test]
    fn test_tv_detail_loads_first_season() {
        let mut app = app();
        let AppCommand::LoadTvDetail { token, .. } = app.open_detail(item(5, MediaType::Tv)) else {
            panic!("expected tv detail");
        };
        let detail = TvDetail {
            id: 5,
            name: "Show".into(),
            tagline: None,
            first_air_date: None,
            last_air_date: None,
            status: None,
            number_of_seasons: 2,
            number_of_episodes: 16,
            seasons: vec![
                SeasonSummary {
                    season_number: 0,
                    episode_count: 2,
                    name: Some("Specials".into()),
                    air_date: None,
                    overview: String::new(),
                },
                SeasonSummary {
                    season_number: 1,
                    episode_count: 8,
                    name: None,
                    air_date: None,
                    overview: String::new(),
                },
            ],
            genres: vec![],
            networks: vec![],
            created_by: vec![],
            overview: String::new(),
            vote_average: 8.0,
            vote_count: 10,
            poster_path: None,
            backdrop_path: None,
        };
        let next = app.handle_message(AppMessage::TvDetailLoaded {
            token,
            result: Ok(TvDetailData {
                detail,
                videos: vec![],
            }),
        });
        assert!(matches!(next, Some(AppCommand::LoadSeason { season: 0, id: 5, .. })));

        // Moving right selects the next season and fetches it
        let next = app.handle_key(key(KeyCode::Right));
        assert!(matches!(next, Some(AppCommand::LoadSeason { season: 1, .. })));
    }

    #[test]
    fn test_typing_debounces_search() {
        let mut app = app();
        app.handle_key(key(KeyCode::Char('/')));
        assert_eq!(app.input_mode, InputMode::Editing);
        for c in "matrix".chars() {
            assert!(app.handle_key(key(KeyCode::Char(c))).is_none());
        }
        assert!(app.tick(Instant::now()).is_none());
        let cmd = app.tick(Instant::now() + Duration::from_secs(1));
        match cmd {
            Some(AppCommand::Search { params, page, .. }) => {
                assert_eq!(params.query, "matrix");
                assert_eq!(page, 1);
            }
            other => panic!("expected search, got {:?}", other),
        }
    }

    #[test]
    fn test_profile_switch_returns_to_picker() {
        let mut app = app();
        app.handle_key(key(KeyCode::Char('p')));
        assert_eq!(app.gate.state(), &GateState::ProfileSelection);
        let cmd = app.handle_key(key(KeyCode::Char('2')));
        assert!(matches!(cmd, Some(AppCommand::LoadHome { .. })));
        assert_eq!(app.gate.profile().unwrap().id, "2");
    }
}
