//! TMDB API client tests
//!
//! Tests lists, details, search, authentication and error handling.

use flixtui::api::{TmdbClient, TmdbError};
use flixtui::models::MediaType;
use flixtui::search::SearchFilter;
use mockito::{Matcher, Server};

const SHORT_KEY: &str = "test_key";

fn long_key() -> String {
    "eyJhbGciOiJIUzI1NiJ9".repeat(4)
}

// =============================================================================
// Authentication
// =============================================================================

#[tokio::test]
async fn test_short_key_sent_as_query_param() {
    let mut server = Server::new_async().await;

    let mock = server
        .mock("GET", "/movie/popular")
        .match_query(Matcher::UrlEncoded("api_key".into(), SHORT_KEY.into()))
        .match_header("authorization", Matcher::Missing)
        .with_status(200)
        .with_body(r#"{"results": []}"#)
        .create_async()
        .await;

    let client = TmdbClient::with_base_url(SHORT_KEY, server.url());
    let items = client.popular_movies().await.unwrap();

    mock.assert_async().await;
    assert!(items.is_empty());
}

#[tokio::test]
async fn test_long_key_sent_as_bearer() {
    let mut server = Server::new_async().await;
    let key = long_key();

    let mock = server
        .mock("GET", "/tv/popular")
        .match_header("authorization", format!("Bearer {}", key).as_str())
        .with_status(200)
        .with_body(r#"{"results": []}"#)
        .create_async()
        .await;

    let client = TmdbClient::with_base_url(key, server.url());
    client.popular_tv().await.unwrap();

    mock.assert_async().await;
}

// =============================================================================
// Lists
// =============================================================================

#[tokio::test]
async fn test_popular_movies_parses_items() {
    let mut server = Server::new_async().await;

    let body = r#"{
        "page": 1,
        "results": [
            {
                "id": 693134,
                "title": "Dune: Part Two",
                "overview": "Paul Atreides unites with Chani",
                "poster_path": "/1pdfLvkbY9ohJlCjQH2CZjjYVvJ.jpg",
                "backdrop_path": "/xOMo8BRK7PfcJv9JCnx7s5hj0PX.jpg",
                "release_date": "2024-02-27",
                "vote_average": 8.2,
                "vote_count": 5400,
                "genre_ids": [878, 12]
            },
            {
                "id": 2,
                "title": "Untitled",
                "release_date": "",
                "genre_ids": []
            }
        ],
        "total_pages": 1,
        "total_results": 2
    }"#;

    server
        .mock("GET", "/movie/popular")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(body)
        .create_async()
        .await;

    let client = TmdbClient::with_base_url(SHORT_KEY, server.url());
    let items = client.popular_movies().await.unwrap();

    assert_eq!(items.len(), 2);
    assert_eq!(items[0].id, 693134);
    assert_eq!(items[0].media_type, MediaType::Movie);
    assert_eq!(items[0].year(), Some(2024));
    assert_eq!(items[0].vote_count, 5400);
    assert_eq!(items[0].genre_names(), vec!["Science Fiction", "Adventure"]);
    assert!(items[0].poster_url().ends_with("/w500/1pdfLvkbY9ohJlCjQH2CZjjYVvJ.jpg"));

    // Missing optional fields fall back to defaults
    assert_eq!(items[1].release_date, None);
    assert_eq!(items[1].vote_average, 0.0);
    assert!(items[1].overview.is_empty());
}

#[tokio::test]
async fn test_tv_lists_use_name_and_first_air_date() {
    let mut server = Server::new_async().await;

    server
        .mock("GET", "/trending/tv/week")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_body(
            r#"{"results": [{"id": 1396, "name": "Breaking Bad", "first_air_date": "2008-01-20", "vote_average": 8.9}]}"#,
        )
        .create_async()
        .await;

    let client = TmdbClient::with_base_url(SHORT_KEY, server.url());
    let items = client.trending_tv().await.unwrap();

    assert_eq!(items[0].title, "Breaking Bad");
    assert_eq!(items[0].media_type, MediaType::Tv);
    assert_eq!(items[0].year(), Some(2008));
}

#[tokio::test]
async fn test_discover_sends_genre() {
    let mut server = Server::new_async().await;

    let mock = server
        .mock("GET", "/discover/movie")
        .match_query(Matcher::AllOf(vec![
            Matcher::UrlEncoded("api_key".into(), SHORT_KEY.into()),
            Matcher::UrlEncoded("with_genres".into(), "28".into()),
        ]))
        .with_status(200)
        .with_body(r#"{"results": [{"id": 10, "title": "Heat", "genre_ids": [28, 80]}]}"#)
        .create_async()
        .await;

    let client = TmdbClient::with_base_url(SHORT_KEY, server.url());
    let items = client.movies_by_genre(28).await.unwrap();

    mock.assert_async().await;
    assert_eq!(items[0].title, "Heat");
}

#[tokio::test]
async fn test_movie_genres() {
    let mut server = Server::new_async().await;

    server
        .mock("GET", "/genre/movie/list")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_body(r#"{"genres": [{"id": 28, "name": "Action"}, {"id": 35, "name": "Comedy"}]}"#)
        .create_async()
        .await;

    let client = TmdbClient::with_base_url(SHORT_KEY, server.url());
    let genres = client.movie_genres().await.unwrap();

    assert_eq!(genres.len(), 2);
    assert_eq!(genres[1].name, "Comedy");
}

// =============================================================================
// Details
// =============================================================================

#[tokio::test]
async fn test_movie_detail() {
    let mut server = Server::new_async().await;

    server
        .mock("GET", "/movie/603")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_body(
            r#"{
                "id": 603,
                "title": "The Matrix",
                "tagline": "Welcome to the Real World.",
                "release_date": "1999-03-30",
                "runtime": 136,
                "genres": [{"id": 28, "name": "Action"}, {"id": 878, "name": "Science Fiction"}],
                "overview": "Set in the 22nd century",
                "vote_average": 8.2,
                "vote_count": 25000,
                "poster_path": "/f89U3ADr1oiB1s9GkdPOEpXUk5H.jpg",
                "backdrop_path": null
            }"#,
        )
        .create_async()
        .await;

    let client = TmdbClient::with_base_url(SHORT_KEY, server.url());
    let detail = client.movie_detail(603).await.unwrap();

    assert_eq!(detail.title, "The Matrix");
    assert_eq!(detail.year(), Some(1999));
    assert_eq!(detail.runtime_str().as_deref(), Some("2h 16m"));
    assert_eq!(detail.genres.len(), 2);

    let item = detail.to_item();
    assert_eq!(item.genre_ids, vec![28, 878]);
    assert_eq!(item.media_type, MediaType::Movie);
}

#[tokio::test]
async fn test_movie_credits_picks_director() {
    let mut server = Server::new_async().await;

    server
        .mock("GET", "/movie/603/credits")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_body(
            r#"{
                "cast": [{"name": "Keanu Reeves"}, {"name": "Laurence Fishburne"}],
                "crew": [
                    {"name": "Bill Pope", "job": "Director of Photography"},
                    {"name": "Lana Wachowski", "job": "Director"},
                    {"name": "Lilly Wachowski", "job": "Director"}
                ]
            }"#,
        )
        .create_async()
        .await;

    let client = TmdbClient::with_base_url(SHORT_KEY, server.url());
    let credits = client.movie_credits(603).await.unwrap();

    assert_eq!(credits.director.as_deref(), Some("Lana Wachowski"));
    assert_eq!(credits.cast, vec!["Keanu Reeves", "Laurence Fishburne"]);
}

#[tokio::test]
async fn test_movie_videos_trailer() {
    let mut server = Server::new_async().await;

    server
        .mock("GET", "/movie/603/videos")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_body(
            r#"{"results": [
                {"key": "abc", "name": "Behind the scenes", "site": "YouTube", "type": "Featurette"},
                {"key": "vKQi3bBA1y8", "name": "Official Trailer", "site": "YouTube", "type": "Trailer"}
            ]}"#,
        )
        .create_async()
        .await;

    let client = TmdbClient::with_base_url(SHORT_KEY, server.url());
    let videos = client.movie_videos(603).await.unwrap();
    let trailer = flixtui::models::find_trailer(&videos).unwrap();

    assert_eq!(trailer.key, "vKQi3bBA1y8");
    assert_eq!(trailer.youtube_url(), "https://www.youtube.com/watch?v=vKQi3bBA1y8");
}

#[tokio::test]
async fn test_tv_detail_and_season() {
    let mut server = Server::new_async().await;

    server
        .mock("GET", "/tv/1396")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_body(
            r#"{
                "id": 1396,
                "name": "Breaking Bad",
                "first_air_date": "2008-01-20",
                "status": "Ended",
                "number_of_seasons": 5,
                "number_of_episodes": 62,
                "seasons": [
                    {"season_number": 0, "episode_count": 9, "name": "Specials"},
                    {"season_number": 1, "episode_count": 7, "name": "Season 1"}
                ],
                "networks": [{"name": "AMC"}],
                "created_by": [{"name": "Vince Gilligan"}],
                "vote_average": 8.9
            }"#,
        )
        .create_async()
        .await;

    server
        .mock("GET", "/tv/1396/season/1")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_body(
            r#"{"episodes": [
                {"episode_number": 1, "name": "Pilot", "runtime": 58, "air_date": "2008-01-20"},
                {"episode_number": 2, "name": "Cat's in the Bag...", "runtime": 48}
            ]}"#,
        )
        .create_async()
        .await;

    let client = TmdbClient::with_base_url(SHORT_KEY, server.url());
    let detail = client.tv_detail(1396).await.unwrap();

    assert_eq!(detail.name, "Breaking Bad");
    assert_eq!(detail.seasons.len(), 2);
    assert_eq!(detail.networks, vec!["AMC"]);
    assert_eq!(detail.created_by, vec!["Vince Gilligan"]);

    let episodes = client.tv_season(1396, 1).await.unwrap();
    assert_eq!(episodes.len(), 2);
    assert_eq!(episodes[0].season, 1);
    assert_eq!(episodes[0].episode, 1);
    assert_eq!(episodes[1].runtime, Some(48));
}

// =============================================================================
// Search
// =============================================================================

#[tokio::test]
async fn test_multi_search_filters_people() {
    let mut server = Server::new_async().await;

    let mock = server
        .mock("GET", "/search/multi")
        .match_query(Matcher::AllOf(vec![
            Matcher::UrlEncoded("query".into(), "the matrix".into()),
            Matcher::UrlEncoded("page".into(), "1".into()),
        ]))
        .with_status(200)
        .with_body(
            r#"{
                "page": 1,
                "results": [
                    {"id": 603, "media_type": "movie", "title": "The Matrix", "vote_average": 8.2},
                    {"id": 6384, "media_type": "person", "name": "Keanu Reeves"},
                    {"id": 1, "media_type": "tv", "name": "The Matrix Files"}
                ],
                "total_pages": 3,
                "total_results": 55
            }"#,
        )
        .create_async()
        .await;

    let client = TmdbClient::with_base_url(SHORT_KEY, server.url());
    let page = client.search("the matrix", SearchFilter::All, 1).await.unwrap();

    mock.assert_async().await;
    assert_eq!(page.results.len(), 2);
    assert!(page.results.iter().all(|r| r.id != 6384));
    assert_eq!(page.results[1].media_type, MediaType::Tv);
    assert_eq!(page.total_pages, 3);
    assert_eq!(page.total_results, 55);
}

#[tokio::test]
async fn test_filtered_search_uses_typed_endpoint() {
    let mut server = Server::new_async().await;

    let mock = server
        .mock("GET", "/search/tv")
        .match_query(Matcher::UrlEncoded("page".into(), "2".into()))
        .with_status(200)
        .with_body(r#"{"page": 2, "results": [{"id": 5, "name": "Dark"}], "total_pages": 2}"#)
        .create_async()
        .await;

    let client = TmdbClient::with_base_url(SHORT_KEY, server.url());
    let page = client.search("dark", SearchFilter::Tv, 2).await.unwrap();

    mock.assert_async().await;
    assert_eq!(page.page, 2);
    assert_eq!(page.results[0].media_type, MediaType::Tv);
}

// =============================================================================
// Errors
// =============================================================================

#[tokio::test]
async fn test_not_found() {
    let mut server = Server::new_async().await;

    server
        .mock("GET", "/movie/999999")
        .match_query(Matcher::Any)
        .with_status(404)
        .with_body(r#"{"status_message": "The resource you requested could not be found."}"#)
        .create_async()
        .await;

    let client = TmdbClient::with_base_url(SHORT_KEY, server.url());
    let err = client.movie_detail(999999).await.unwrap_err();

    assert!(matches!(err.downcast_ref::<TmdbError>(), Some(TmdbError::NotFound)));
}

#[tokio::test]
async fn test_rate_limited_and_server_error() {
    let mut server = Server::new_async().await;

    server
        .mock("GET", "/movie/popular")
        .match_query(Matcher::Any)
        .with_status(429)
        .create_async()
        .await;
    server
        .mock("GET", "/movie/top_rated")
        .match_query(Matcher::Any)
        .with_status(503)
        .create_async()
        .await;

    let client = TmdbClient::with_base_url(SHORT_KEY, server.url());

    let err = client.popular_movies().await.unwrap_err();
    assert!(matches!(err.downcast_ref::<TmdbError>(), Some(TmdbError::RateLimited)));

    let err = client.top_rated_movies().await.unwrap_err();
    assert!(matches!(err.downcast_ref::<TmdbError>(), Some(TmdbError::ServerError(503))));
}

#[tokio::test]
async fn test_invalid_json() {
    let mut server = Server::new_async().await;

    server
        .mock("GET", "/tv/popular")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_body("<html>not json</html>")
        .create_async()
        .await;

    let client = TmdbClient::with_base_url(SHORT_KEY, server.url());
    let err = client.popular_tv().await.unwrap_err();

    assert!(matches!(
        err.downcast_ref::<TmdbError>(),
        Some(TmdbError::InvalidResponse(_))
    ));
}

#[tokio::test]
async fn test_trailing_slash_in_base_url() {
    let mut server = Server::new_async().await;

    let mock = server
        .mock("GET", "/movie/now_playing")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_body(r#"{"results": []}"#)
        .create_async()
        .await;

    let client = TmdbClient::with_base_url(SHORT_KEY, format!("{}/", server.url()));
    client.now_playing_movies().await.unwrap();

    mock.assert_async().await;
}
