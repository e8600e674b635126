//! TMDB (The Movie Database) API client
//!
//! Provides catalog lists, details and search for movies and TV shows.
//! API docs: https://developer.themoviedb.org/docs
//!
//! Every call is a single GET: no retry, no caching, no client timeout.

use anyhow::Result;
use reqwest::StatusCode;
use serde::Deserialize;
use thiserror::Error;
use tracing::debug;

use crate::models::{
    CatalogItem, Credits, Episode, Genre, MediaType, MovieDetail, SearchPage, SeasonSummary,
    TvDetail, Video,
};
use crate::search::SearchFilter;

/// Default TMDB v3 endpoint
pub const DEFAULT_BASE_URL: &str = "https://api.themoviedb.org/3";

/// Keys at least this long are v4 read tokens and go in the Authorization header
const BEARER_TOKEN_MIN_LEN: usize = 64;

/// TMDB API error types
#[derive(Error, Debug)]
pub enum TmdbError {
    #[error("Resource not found (404)")]
    NotFound,

    #[error("Rate limited (429)")]
    RateLimited,

    #[error("Server error: {0}")]
    ServerError(u16),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Request failed: {0}")]
    RequestFailed(#[from] reqwest::Error),
}

/// TMDB API client
pub struct TmdbClient {
    api_key: String,
    base_url: String,
    client: reqwest::Client,
}

impl TmdbClient {
    /// Create a new TMDB client with the given API key
    pub fn new(api_key: impl Into<String>) -> Self {
        Self::with_base_url(api_key, DEFAULT_BASE_URL)
    }

    /// Create a client with a custom base URL (for testing)
    pub fn with_base_url(api_key: impl Into<String>, base_url: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            client: reqwest::Client::new(),
        }
    }

    fn uses_bearer(&self) -> bool {
        self.api_key.len() >= BEARER_TOKEN_MIN_LEN
    }

    /// Make an authenticated GET request and decode the JSON body
    async fn get<T: for<'de> Deserialize<'de>>(
        &self,
        endpoint: &str,
        params: &[(&str, String)],
    ) -> Result<T> {
        let mut query: Vec<String> = params
            .iter()
            .map(|(k, v)| format!("{}={}", k, urlencoding::encode(v)))
            .collect();

        if !self.uses_bearer() {
            query.insert(0, format!("api_key={}", urlencoding::encode(&self.api_key)));
        }

        let url = if query.is_empty() {
            format!("{}{}", self.base_url, endpoint)
        } else {
            format!("{}{}?{}", self.base_url, endpoint, query.join("&"))
        };

        debug!(endpoint, "TMDB request");

        let mut request = self.client.get(&url).header("Accept", "application/json");
        if self.uses_bearer() {
            request = request.header("Authorization", format!("Bearer {}", self.api_key));
        }

        let response = request.send().await.map_err(TmdbError::RequestFailed)?;

        match response.status() {
            status if status.is_success() => {
                let body = response.text().await.map_err(TmdbError::RequestFailed)?;
                let parsed: T = serde_json::from_str(&body).map_err(|e| {
                    TmdbError::InvalidResponse(format!("JSON parse error: {}", e))
                })?;
                Ok(parsed)
            }
            StatusCode::NOT_FOUND => Err(TmdbError::NotFound.into()),
            StatusCode::TOO_MANY_REQUESTS => Err(TmdbError::RateLimited.into()),
            status => Err(TmdbError::ServerError(status.as_u16()).into()),
        }
    }

    async fn list(&self, endpoint: &str, kind: MediaType) -> Result<Vec<CatalogItem>> {
        let response: ListResponse = self.get(endpoint, &[]).await?;
        Ok(response.into_items(kind))
    }

    // =========================================================================
    // Lists
    // =========================================================================

    pub async fn popular_movies(&self) -> Result<Vec<CatalogItem>> {
        self.list("/movie/popular", MediaType::Movie).await
    }

    pub async fn top_rated_movies(&self) -> Result<Vec<CatalogItem>> {
        self.list("/movie/top_rated", MediaType::Movie).await
    }

    pub async fn now_playing_movies(&self) -> Result<Vec<CatalogItem>> {
        self.list("/movie/now_playing", MediaType::Movie).await
    }

    pub async fn popular_tv(&self) -> Result<Vec<CatalogItem>> {
        self.list("/tv/popular", MediaType::Tv).await
    }

    pub async fn top_rated_tv(&self) -> Result<Vec<CatalogItem>> {
        self.list("/tv/top_rated", MediaType::Tv).await
    }

    /// Weekly trending series
    pub async fn trending_tv(&self) -> Result<Vec<CatalogItem>> {
        self.list("/trending/tv/week", MediaType::Tv).await
    }

    /// Official movie genre list
    pub async fn movie_genres(&self) -> Result<Vec<Genre>> {
        let response: GenreListResponse = self.get("/genre/movie/list", &[]).await?;
        Ok(response
            .genres
            .into_iter()
            .map(|g| Genre { id: g.id, name: g.name })
            .collect())
    }

    /// Movies tagged with a genre id
    pub async fn movies_by_genre(&self, genre_id: u32) -> Result<Vec<CatalogItem>> {
        let response: ListResponse = self
            .get("/discover/movie", &[("with_genres", genre_id.to_string())])
            .await?;
        Ok(response.into_items(MediaType::Movie))
    }

    // =========================================================================
    // Movie details
    // =========================================================================

    pub async fn movie_detail(&self, id: u64) -> Result<MovieDetail> {
        let response: MovieResponse = self.get(&format!("/movie/{}", id), &[]).await?;
        Ok(response.into_detail())
    }

    pub async fn movie_videos(&self, id: u64) -> Result<Vec<Video>> {
        let response: VideosResponse = self.get(&format!("/movie/{}/videos", id), &[]).await?;
        Ok(response.results)
    }

    /// Director (first crew member with job "Director") and the first ten cast names
    pub async fn movie_credits(&self, id: u64) -> Result<Credits> {
        let response: CreditsResponse = self.get(&format!("/movie/{}/credits", id), &[]).await?;
        Ok(response.into_credits())
    }

    pub async fn similar_movies(&self, id: u64) -> Result<Vec<CatalogItem>> {
        self.list(&format!("/movie/{}/similar", id), MediaType::Movie)
            .await
    }

    // =========================================================================
    // TV details
    // =========================================================================

    pub async fn tv_detail(&self, id: u64) -> Result<TvDetail> {
        let response: TvResponse = self.get(&format!("/tv/{}", id), &[]).await?;
        Ok(response.into_detail())
    }

    pub async fn tv_videos(&self, id: u64) -> Result<Vec<Video>> {
        let response: VideosResponse = self.get(&format!("/tv/{}/videos", id), &[]).await?;
        Ok(response.results)
    }

    /// Get episodes for a TV season
    pub async fn tv_season(&self, id: u64, season: u16) -> Result<Vec<Episode>> {
        let endpoint = format!("/tv/{}/season/{}", id, season);
        let response: SeasonResponse = self.get(&endpoint, &[]).await?;
        Ok(response.into_episodes(season))
    }

    // =========================================================================
    // Search
    // =========================================================================

    /// Search movies and TV shows together; person results are dropped
    pub async fn search_multi(&self, query: &str, page: u32) -> Result<SearchPage> {
        let response: PagedResponse = self.get("/search/multi", &search_params(query, page)).await?;
        Ok(response.into_page(None))
    }

    pub async fn search_movies(&self, query: &str, page: u32) -> Result<SearchPage> {
        let response: PagedResponse = self.get("/search/movie", &search_params(query, page)).await?;
        Ok(response.into_page(Some(MediaType::Movie)))
    }

    pub async fn search_tv(&self, query: &str, page: u32) -> Result<SearchPage> {
        let response: PagedResponse = self.get("/search/tv", &search_params(query, page)).await?;
        Ok(response.into_page(Some(MediaType::Tv)))
    }

    /// Dispatch to the search endpoint matching the filter
    pub async fn search(&self, query: &str, filter: SearchFilter, page: u32) -> Result<SearchPage> {
        match filter {
            SearchFilter::All => self.search_multi(query, page).await,
            SearchFilter::Movie => self.search_movies(query, page).await,
            SearchFilter::Tv => self.search_tv(query, page).await,
        }
    }
}

fn search_params(query: &str, page: u32) -> [(&'static str, String); 2] {
    [("query", query.to_string()), ("page", page.max(1).to_string())]
}

// =============================================================================
// Response Structures (internal deserialization)
// =============================================================================

#[derive(Debug, Deserialize)]
struct ListResponse {
    #[serde(default)]
    results: Vec<ItemRaw>,
}

impl ListResponse {
    fn into_items(self, kind: MediaType) -> Vec<CatalogItem> {
        self.results
            .into_iter()
            .filter_map(|r| r.into_item(Some(kind)))
            .collect()
    }
}

#[derive(Debug, Deserialize)]
struct PagedResponse {
    #[serde(default)]
    page: u32,
    #[serde(default)]
    results: Vec<ItemRaw>,
    #[serde(default)]
    total_results: u32,
    #[serde(default)]
    total_pages: u32,
}

impl PagedResponse {
    fn into_page(self, kind: Option<MediaType>) -> SearchPage {
        SearchPage {
            page: self.page,
            results: self
                .results
                .into_iter()
                .filter_map(|r| r.into_item(kind))
                .collect(),
            total_results: self.total_results,
            total_pages: self.total_pages,
        }
    }
}

#[derive(Debug, Deserialize)]
struct ItemRaw {
    id: u64,
    media_type: Option<String>,
    // Movies use "title", TV uses "name"
    title: Option<String>,
    name: Option<String>,
    // Movies use "release_date", TV uses "first_air_date"
    release_date: Option<String>,
    first_air_date: Option<String>,
    overview: Option<String>,
    poster_path: Option<String>,
    backdrop_path: Option<String>,
    vote_average: Option<f32>,
    vote_count: Option<u32>,
    #[serde(default)]
    genre_ids: Vec<u32>,
}

impl ItemRaw {
    /// `kind` is fixed by typed endpoints; multi-search relies on `media_type`
    fn into_item(self, kind: Option<MediaType>) -> Option<CatalogItem> {
        let media_type = match kind {
            Some(kind) => kind,
            None => match self.media_type.as_deref() {
                Some("movie") => MediaType::Movie,
                Some("tv") => MediaType::Tv,
                _ => return None, // Filter out "person" and other types
            },
        };

        let release_date = self
            .release_date
            .or(self.first_air_date)
            .filter(|d| !d.is_empty());

        Some(CatalogItem {
            id: self.id,
            media_type,
            title: self.title.or(self.name).unwrap_or_default(),
            overview: self.overview.unwrap_or_default(),
            poster_path: self.poster_path,
            backdrop_path: self.backdrop_path,
            vote_average: self.vote_average.unwrap_or(0.0),
            vote_count: self.vote_count.unwrap_or(0),
            release_date,
            genre_ids: self.genre_ids,
        })
    }
}

#[derive(Debug, Deserialize)]
struct GenreListResponse {
    #[serde(default)]
    genres: Vec<GenreRaw>,
}

#[derive(Debug, Deserialize)]
struct GenreRaw {
    id: u32,
    name: String,
}

#[derive(Debug, Deserialize)]
struct MovieResponse {
    id: u64,
    title: String,
    tagline: Option<String>,
    release_date: Option<String>,
    runtime: Option<u32>,
    #[serde(default)]
    genres: Vec<GenreRaw>,
    overview: Option<String>,
    vote_average: Option<f32>,
    vote_count: Option<u32>,
    poster_path: Option<String>,
    backdrop_path: Option<String>,
}

impl MovieResponse {
    fn into_detail(self) -> MovieDetail {
        MovieDetail {
            id: self.id,
            title: self.title,
            tagline: self.tagline.filter(|t| !t.is_empty()),
            release_date: self.release_date.filter(|d| !d.is_empty()),
            runtime: self.runtime,
            genres: self
                .genres
                .into_iter()
                .map(|g| Genre { id: g.id, name: g.name })
                .collect(),
            overview: self.overview.unwrap_or_default(),
            vote_average: self.vote_average.unwrap_or(0.0),
            vote_count: self.vote_count.unwrap_or(0),
            poster_path: self.poster_path,
            backdrop_path: self.backdrop_path,
        }
    }
}

#[derive(Debug, Deserialize)]
struct NamedRaw {
    name: String,
}

#[derive(Debug, Deserialize)]
struct TvResponse {
    id: u64,
    name: String,
    tagline: Option<String>,
    first_air_date: Option<String>,
    last_air_date: Option<String>,
    status: Option<String>,
    number_of_seasons: Option<u16>,
    number_of_episodes: Option<u32>,
    #[serde(default)]
    seasons: Vec<SeasonRaw>,
    #[serde(default)]
    genres: Vec<GenreRaw>,
    #[serde(default)]
    networks: Vec<NamedRaw>,
    #[serde(default)]
    created_by: Vec<NamedRaw>,
    overview: Option<String>,
    vote_average: Option<f32>,
    vote_count: Option<u32>,
    poster_path: Option<String>,
    backdrop_path: Option<String>,
}

impl TvResponse {
    fn into_detail(self) -> TvDetail {
        let seasons: Vec<SeasonSummary> =
            self.seasons.into_iter().map(|s| s.into_summary()).collect();

        TvDetail {
            id: self.id,
            name: self.name,
            tagline: self.tagline.filter(|t| !t.is_empty()),
            first_air_date: self.first_air_date.filter(|d| !d.is_empty()),
            last_air_date: self.last_air_date.filter(|d| !d.is_empty()),
            status: self.status,
            number_of_seasons: self.number_of_seasons.unwrap_or(seasons.len() as u16),
            number_of_episodes: self.number_of_episodes.unwrap_or(0),
            seasons,
            genres: self
                .genres
                .into_iter()
                .map(|g| Genre { id: g.id, name: g.name })
                .collect(),
            networks: self.networks.into_iter().map(|n| n.name).collect(),
            created_by: self.created_by.into_iter().map(|n| n.name).collect(),
            overview: self.overview.unwrap_or_default(),
            vote_average: self.vote_average.unwrap_or(0.0),
            vote_count: self.vote_count.unwrap_or(0),
            poster_path: self.poster_path,
            backdrop_path: self.backdrop_path,
        }
    }
}

#[derive(Debug, Deserialize)]
struct SeasonRaw {
    season_number: u16,
    #[serde(default)]
    episode_count: u16,
    name: Option<String>,
    air_date: Option<String>,
    overview: Option<String>,
}

impl SeasonRaw {
    fn into_summary(self) -> SeasonSummary {
        SeasonSummary {
            season_number: self.season_number,
            episode_count: self.episode_count,
            name: self.name,
            air_date: self.air_date,
            overview: self.overview.unwrap_or_default(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct SeasonResponse {
    #[serde(default)]
    episodes: Vec<EpisodeRaw>,
}

impl SeasonResponse {
    fn into_episodes(self, season: u16) -> Vec<Episode> {
        self.episodes
            .into_iter()
            .map(|e| e.into_episode(season))
            .collect()
    }
}

#[derive(Debug, Deserialize)]
struct EpisodeRaw {
    episode_number: u16,
    name: String,
    overview: Option<String>,
    runtime: Option<u32>,
    air_date: Option<String>,
    vote_average: Option<f32>,
    still_path: Option<String>,
}

impl EpisodeRaw {
    fn into_episode(self, season: u16) -> Episode {
        Episode {
            season,
            episode: self.episode_number,
            name: self.name,
            overview: self.overview.unwrap_or_default(),
            runtime: self.runtime,
            air_date: self.air_date,
            vote_average: self.vote_average.unwrap_or(0.0),
            still_path: self.still_path,
        }
    }
}

#[derive(Debug, Deserialize)]
struct VideosResponse {
    #[serde(default)]
    results: Vec<Video>,
}

#[derive(Debug, Deserialize)]
struct CreditsResponse {
    #[serde(default)]
    cast: Vec<NamedRaw>,
    #[serde(default)]
    crew: Vec<CrewRaw>,
}

#[derive(Debug, Deserialize)]
struct CrewRaw {
    name: String,
    job: Option<String>,
}

impl CreditsResponse {
    fn into_credits(self) -> Credits {
        Credits {
            director: self
                .crew
                .into_iter()
                .find(|c| c.job.as_deref() == Some("Director"))
                .map(|c| c.name),
            cast: self.cast.into_iter().take(10).map(|c| c.name).collect(),
        }
    }
}
