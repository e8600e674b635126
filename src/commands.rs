//! CLI Command Handlers
//!
//! Implements all CLI commands by calling the catalog client and the local
//! stores. Each handler takes CLI args and Output, returns ExitCode.

use serde::Serialize;
use std::sync::Arc;

use crate::api::{TmdbClient, TmdbError};
use crate::cli::{
    DiscoverCmd, ExitCode, FeedCmd, InfoCmd, KindArg, ListAction, ListCmd, Output, ProfileAction,
    SearchCmd, SeasonCmd, StatusOk, TrendingCmd,
};
use crate::config::API_KEY_ENV;
use crate::feed::Feed;
use crate::models::{
    find_trailer, CatalogItem, Credits, Episode, MediaType, MovieDetail, TvDetail, WatchlistEntry,
};
use crate::profile::{ProfileGate, PROFILES};
use crate::search::{SearchParams, SearchSession};
use crate::storage::KeyValueStore;
use crate::watchlist::Watchlist;

/// Map a fetch failure to an exit code: missing titles are 4, everything else 3
fn fetch_error(output: &Output, context: &str, err: anyhow::Error) -> ExitCode {
    let code = match err.downcast_ref::<TmdbError>() {
        Some(TmdbError::NotFound) => ExitCode::NotFound,
        _ => ExitCode::NetworkError,
    };
    output.error(format!("{}: {:#}", context, err), code)
}

fn emit<T: Serialize>(output: &Output, data: T, text: impl FnOnce(&T) -> String) -> ExitCode {
    match output.print_or(data, text) {
        Ok(()) => ExitCode::Success,
        Err(e) => output.error(format!("Failed to serialize: {}", e), ExitCode::Error),
    }
}

fn item_lines(items: &Vec<CatalogItem>) -> String {
    items
        .iter()
        .map(|item| format!("{:>8}  {}  ★ {:.1}", item.id, item, item.vote_average))
        .collect::<Vec<_>>()
        .join("\n")
}

fn print_items(output: &Output, mut items: Vec<CatalogItem>, limit: usize) -> ExitCode {
    items.truncate(limit);
    emit(output, items, item_lines)
}

// =============================================================================
// Browse Commands
// =============================================================================

pub async fn popular_cmd(client: &TmdbClient, cmd: ListCmd, output: &Output) -> ExitCode {
    let result = match cmd.kind {
        KindArg::Movie => client.popular_movies().await,
        KindArg::Tv => client.popular_tv().await,
    };
    match result {
        Ok(items) => print_items(output, items, cmd.limit),
        Err(e) => fetch_error(output, "Popular fetch failed", e),
    }
}

pub async fn top_rated_cmd(client: &TmdbClient, cmd: ListCmd, output: &Output) -> ExitCode {
    let result = match cmd.kind {
        KindArg::Movie => client.top_rated_movies().await,
        KindArg::Tv => client.top_rated_tv().await,
    };
    match result {
        Ok(items) => print_items(output, items, cmd.limit),
        Err(e) => fetch_error(output, "Top rated fetch failed", e),
    }
}

pub async fn trending_cmd(client: &TmdbClient, cmd: TrendingCmd, output: &Output) -> ExitCode {
    output.info("Fetching trending TV (week)...");
    match client.trending_tv().await {
        Ok(items) => print_items(output, items, cmd.limit),
        Err(e) => fetch_error(output, "Trending fetch failed", e),
    }
}

pub async fn genres_cmd(client: &TmdbClient, output: &Output) -> ExitCode {
    match client.movie_genres().await {
        Ok(genres) => emit(output, genres, |genres| {
            genres
                .iter()
                .map(|g| format!("{:>6}  {}", g.id, g.name))
                .collect::<Vec<_>>()
                .join("\n")
        }),
        Err(e) => fetch_error(output, "Genre fetch failed", e),
    }
}

pub async fn discover_cmd(client: &TmdbClient, cmd: DiscoverCmd, output: &Output) -> ExitCode {
    match client.movies_by_genre(cmd.genre).await {
        Ok(items) => print_items(output, items, cmd.limit),
        Err(e) => fetch_error(output, "Discover failed", e),
    }
}

// =============================================================================
// Search Command
// =============================================================================

#[derive(Debug, Serialize)]
pub struct SearchOutput {
    pub query: String,
    pub filter: String,
    pub sort: String,
    pub page: u32,
    pub total_pages: u32,
    pub total_results: u32,
    pub results: Vec<CatalogItem>,
}

pub async fn search_cmd(client: &TmdbClient, cmd: SearchCmd, output: &Output) -> ExitCode {
    let params = SearchParams::new(cmd.query.trim())
        .with_filter(cmd.filter)
        .with_sort(cmd.sort);
    if params.is_blank() {
        return output.error("Search query is empty", ExitCode::InvalidArgs);
    }

    output.info(format!("Searching for: {}", params.query));

    let mut session = SearchSession::new();
    let mut token = session.begin(params.clone());
    let mut page = cmd.page.max(1);

    // Accumulate pages exactly as "load more" does in the TUI
    for _ in 0..cmd.pages.max(1) {
        match client.search(&params.query, params.filter, page).await {
            Ok(response) => {
                session.apply(token, response);
            }
            Err(e) => return fetch_error(output, "Search failed", e),
        }
        match session.begin_next_page() {
            Some((next_token, next_page)) => {
                token = next_token;
                page = next_page;
            }
            None => break,
        }
    }

    let result = SearchOutput {
        query: params.query.clone(),
        filter: params.filter.to_string(),
        sort: params.sort.to_string(),
        page: session.page(),
        total_pages: session.total_pages(),
        total_results: session.total_results(),
        results: session.results().to_vec(),
    };
    emit(output, result, |r| {
        format!(
            "{}\n\n{} of {} results (page {} of {})",
            item_lines(&r.results),
            r.results.len(),
            r.total_results,
            r.page,
            r.total_pages
        )
    })
}

// =============================================================================
// Detail Commands
// =============================================================================

#[derive(Debug, Serialize)]
pub struct MovieInfo {
    #[serde(flatten)]
    pub detail: MovieDetail,
    pub credits: Credits,
    pub trailer: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct TvInfo {
    #[serde(flatten)]
    pub detail: TvDetail,
    pub trailer: Option<String>,
}

pub async fn info_cmd(client: &TmdbClient, cmd: InfoCmd, output: &Output) -> ExitCode {
    output.info(format!("Getting info for: {}", cmd.id));

    match cmd.kind {
        KindArg::Movie => {
            let fetched = tokio::try_join!(
                client.movie_detail(cmd.id),
                client.movie_videos(cmd.id),
                client.movie_credits(cmd.id)
            );
            match fetched {
                Ok((detail, videos, credits)) => {
                    let info = MovieInfo {
                        trailer: find_trailer(&videos).map(|v| v.youtube_url()),
                        detail,
                        credits,
                    };
                    emit(output, info, |i| {
                        let mut text = i.detail.to_string();
                        if let Some(director) = &i.credits.director {
                            text.push_str(&format!("\nDirector: {}", director));
                        }
                        if !i.credits.cast.is_empty() {
                            text.push_str(&format!("\nCast: {}", i.credits.cast.join(", ")));
                        }
                        if let Some(trailer) = &i.trailer {
                            text.push_str(&format!("\nTrailer: {}", trailer));
                        }
                        format!("{}\n\n{}", text, i.detail.overview)
                    })
                }
                Err(e) => fetch_error(output, "Movie info failed", e),
            }
        }
        KindArg::Tv => {
            match tokio::try_join!(client.tv_detail(cmd.id), client.tv_videos(cmd.id)) {
                Ok((detail, videos)) => {
                    let info = TvInfo {
                        trailer: find_trailer(&videos).map(|v| v.youtube_url()),
                        detail,
                    };
                    emit(output, info, |i| {
                        let seasons: Vec<String> =
                            i.detail.seasons.iter().map(|s| format!("  {}", s)).collect();
                        format!(
                            "{}\n{}\n\n{}",
                            i.detail,
                            seasons.join("\n"),
                            i.detail.overview
                        )
                    })
                }
                Err(e) => fetch_error(output, "TV info failed", e),
            }
        }
    }
}

pub async fn season_cmd(client: &TmdbClient, cmd: SeasonCmd, output: &Output) -> ExitCode {
    match client.tv_season(cmd.id, cmd.season).await {
        Ok(episodes) => emit(output, episodes, |eps: &Vec<Episode>| {
            eps.iter()
                .map(|ep| ep.to_string())
                .collect::<Vec<_>>()
                .join("\n")
        }),
        Err(e) => fetch_error(output, "Season fetch failed", e),
    }
}

// =============================================================================
// Feed Command
// =============================================================================

pub async fn feed_cmd(client: &TmdbClient, cmd: FeedCmd, days: u32, output: &Output) -> ExitCode {
    let days = cmd.days.unwrap_or(days);
    let (movies, tv) = match tokio::try_join!(client.popular_movies(), client.popular_tv()) {
        Ok(lists) => lists,
        Err(e) => return fetch_error(output, "Feed fetch failed", e),
    };

    let today = chrono::Local::now().date_naive();
    let feed = Feed::home(&movies, &tv, today, days);
    emit(output, feed, |feed| {
        let mut text = String::new();
        for row in &feed.rows {
            text.push_str(&format!("== {} ==\n", row.title));
            for (i, item) in row.items.iter().enumerate() {
                let rank = if row.ranked { format!("{:>2}. ", i + 1) } else { String::new() };
                let mut badges = String::new();
                if feed.badges.is_top_ten(item.id) {
                    badges.push_str(" [TOP 10]");
                }
                if feed.badges.is_recent(item.id) {
                    badges.push_str(" [Recently Added]");
                }
                text.push_str(&format!("  {}{}{}\n", rank, item, badges));
            }
        }
        text.trim_end().to_string()
    })
}

// =============================================================================
// My List Command
// =============================================================================

pub async fn list_cmd(
    client: Option<&TmdbClient>,
    action: Option<ListAction>,
    store: Arc<dyn KeyValueStore>,
    output: &Output,
) -> ExitCode {
    let mut watchlist = Watchlist::load(store);

    match action {
        None => emit(output, watchlist.entries().to_vec(), |entries| {
            if entries.is_empty() {
                return "My List is empty".to_string();
            }
            entries
                .iter()
                .map(|e| {
                    let year = e.year().map(|y| format!(" ({})", y)).unwrap_or_default();
                    format!("{:>8}  {}{} [{}]", e.id, e.display_name(), year, e.kind)
                })
                .collect::<Vec<_>>()
                .join("\n")
        }),
        Some(ListAction::Add { id, kind }) => {
            if watchlist.contains(id) {
                return output.error(crate::watchlist::ALREADY_IN_LIST, ExitCode::AlreadyInList);
            }
            let Some(client) = client else {
                return output.error(format!("{} is not set", API_KEY_ENV), ExitCode::InvalidArgs);
            };
            let item = match MediaType::from(kind) {
                MediaType::Movie => client.movie_detail(id).await.map(|d| d.to_item()),
                MediaType::Tv => client.tv_detail(id).await.map(|d| d.to_item()),
            };
            let item = match item {
                Ok(item) => item,
                Err(e) => return fetch_error(output, "Lookup failed", e),
            };

            let notification = watchlist.add(WatchlistEntry::from(item));
            if notification.is_error() {
                return output.error(notification.message, ExitCode::AlreadyInList);
            }
            emit(output, StatusOk::with_message(notification.message), |s| {
                s.message.clone().unwrap_or_default()
            })
        }
        Some(ListAction::Remove { id }) => match watchlist.remove(id) {
            Some(notification) => emit(output, StatusOk::with_message(notification.message), |s| {
                s.message.clone().unwrap_or_default()
            }),
            None => output.error(format!("{} is not in My List", id), ExitCode::NotFound),
        },
        Some(ListAction::Clear) => {
            watchlist.clear();
            emit(output, StatusOk::with_message("My List cleared"), |s| {
                s.message.clone().unwrap_or_default()
            })
        }
    }
}

// =============================================================================
// Profile Command
// =============================================================================

#[derive(Debug, Serialize)]
pub struct ProfileStatus {
    pub selected: Option<&'static str>,
    pub profiles: Vec<crate::profile::Profile>,
}

pub fn profile_cmd(
    action: Option<ProfileAction>,
    store: Arc<dyn KeyValueStore>,
    output: &Output,
) -> ExitCode {
    let mut gate = ProfileGate::restore(store);

    match action {
        None => {
            let status = ProfileStatus {
                selected: gate.profile().map(|p| p.id),
                profiles: PROFILES.to_vec(),
            };
            emit(output, status, |s| {
                s.profiles
                    .iter()
                    .map(|p| {
                        let marker = if s.selected == Some(p.id) { "*" } else { " " };
                        format!("{} {}  {}", marker, p.id, p.name)
                    })
                    .collect::<Vec<_>>()
                    .join("\n")
            })
        }
        Some(ProfileAction::Select { id }) => {
            gate.finish_intro();
            match gate.select(&id) {
                Some(profile) => emit(
                    output,
                    StatusOk::with_message(format!("Watching as {}", profile.name)),
                    |s| s.message.clone().unwrap_or_default(),
                ),
                None => output.error(format!("Unknown profile '{}'", id), ExitCode::InvalidArgs),
            }
        }
        Some(ProfileAction::Switch) => {
            gate.switch_profile();
            emit(output, StatusOk::with_message("Profile cleared"), |s| {
                s.message.clone().unwrap_or_default()
            })
        }
    }
}
