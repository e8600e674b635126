//! Feed derivation tests
//!
//! Builds the Home, Movies and TV feeds from fixed lists and checks row
//! composition and badges.

use chrono::NaiveDate;
use flixtui::feed::{Feed, ROW_LEN};
use flixtui::models::{CatalogItem, MediaType};

fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 6, 15).unwrap()
}

fn catalog(kind: MediaType, ids: std::ops::Range<u64>) -> Vec<CatalogItem> {
    ids.map(|id| CatalogItem {
        id,
        media_type: kind,
        title: format!("Title {}", id),
        overview: String::new(),
        poster_path: None,
        backdrop_path: None,
        vote_average: (id % 10) as f32,
        vote_count: (id as u32) * 100,
        release_date: Some("2019-01-01".to_string()),
        genre_ids: if id % 2 == 0 { vec![28] } else { vec![18, 35] },
    })
    .collect()
}

fn row<'a>(feed: &'a Feed, title: &str) -> &'a flixtui::feed::Row {
    feed.rows
        .iter()
        .find(|r| r.title == title)
        .unwrap_or_else(|| panic!("missing row {}", title))
}

fn ids(items: &[CatalogItem]) -> Vec<u64> {
    items.iter().map(|i| i.id).collect()
}

#[test]
fn test_home_feed_rows() {
    let movies = catalog(MediaType::Movie, 1..21);
    let tv = catalog(MediaType::Tv, 101..121);
    let feed = Feed::home(&movies, &tv, today(), 30);

    let top_movies = row(&feed, "Top 10 Movies Today");
    assert!(top_movies.ranked);
    assert_eq!(ids(&top_movies.items), (1..11).collect::<Vec<_>>());

    assert_eq!(ids(&row(&feed, "New on FlixTUI").items), (2..12).collect::<Vec<_>>());
    assert_eq!(
        ids(&row(&feed, "Critically Acclaimed TV Shows").items),
        (106..116).collect::<Vec<_>>()
    );

    // Only 5 movies remain after offset 15
    assert_eq!(row(&feed, "Continue Watching").items.len(), 5);

    let action = row(&feed, "Get In on the Action");
    assert!(action.items.iter().all(|i| i.genre_ids.contains(&28)));
    assert!(action.items.len() <= ROW_LEN);

    // Most voted first, minimum 1000 votes (id >= 10)
    let picks = ids(&row(&feed, "Today's Top Picks for You").items);
    assert_eq!(picks.first(), Some(&20));
    assert!(picks.iter().all(|id| *id >= 10));
}

#[test]
fn test_top_ten_badge_follows_ranking() {
    let movies = catalog(MediaType::Movie, 1..21);
    let tv = catalog(MediaType::Tv, 101..121);
    let feed = Feed::home(&movies, &tv, today(), 30);

    assert!(feed.badges.is_top_ten(1));
    assert!(feed.badges.is_top_ten(10));
    assert!(!feed.badges.is_top_ten(11));
    assert!(feed.badges.is_top_ten(101));
}

#[test]
fn test_recently_added_badge() {
    let mut movies = catalog(MediaType::Movie, 1..6);
    movies[0].release_date = Some("2024-06-10".to_string());
    movies[1].release_date = Some("2023-05-12".to_string());
    // Future release is not "recently added"
    movies[2].release_date = Some("2024-07-01".to_string());

    let feed = Feed::home(&movies, &[], today(), 30);

    assert!(feed.badges.is_recent(1));
    assert!(!feed.badges.is_recent(2));
    assert!(!feed.badges.is_recent(3));
}

#[test]
fn test_empty_lists_produce_no_rows() {
    let feed = Feed::home(&[], &[], today(), 30);
    assert!(feed.rows.is_empty());
}

#[test]
fn test_movies_feed_new_releases() {
    let mut popular = catalog(MediaType::Movie, 1..11);
    popular[3].release_date = Some("2024-06-01".to_string());
    let mut now_playing = catalog(MediaType::Movie, 50..55);
    now_playing[0].release_date = Some("2024-06-12".to_string());
    let top_rated = catalog(MediaType::Movie, 30..35);

    let feed = Feed::movies(&popular, &top_rated, &now_playing, today(), 30);

    assert_eq!(ids(&row(&feed, "New Releases").items), vec![50, 4]);
    assert!(row(&feed, "Comedy Movies")
        .items
        .iter()
        .all(|i| i.genre_ids.contains(&35)));
}

#[test]
fn test_tv_feed_rows() {
    let popular = catalog(MediaType::Tv, 1..13);
    let top_rated = catalog(MediaType::Tv, 20..25);
    let trending = catalog(MediaType::Tv, 40..45);

    let feed = Feed::tv(&popular, &top_rated, &trending, today(), 30);

    assert_eq!(row(&feed, "Popular TV Shows").items.len(), ROW_LEN);
    assert_eq!(ids(&row(&feed, "Trending Now").items), (40..45).collect::<Vec<_>>());
    assert_eq!(ids(&row(&feed, "Top Rated").items), (20..25).collect::<Vec<_>>());
    assert!(row(&feed, "Drama Series")
        .items
        .iter()
        .all(|i| i.genre_ids.contains(&18)));
}
