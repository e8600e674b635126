//! Catalog derivations
//!
//! Pure transforms over fetched lists: windows, genre filters, sorts,
//! de-duplication and the "Top 10" / "Recently Added" badge sets. Everything
//! here is recomputed from scratch after each fetch and never persisted.

use chrono::NaiveDate;
use serde::Serialize;
use std::cmp::Ordering;
use std::collections::HashSet;

use crate::models::CatalogItem;

/// Cards per row
pub const ROW_LEN: usize = 10;

/// Minimum vote count for "Today's Top Picks"
pub const TOP_PICKS_MIN_VOTES: u32 = 1000;

/// Default "Recently Added" window in days
pub const DEFAULT_RECENCY_DAYS: u32 = 30;

// =============================================================================
// Primitive transforms
// =============================================================================

/// Ordering applied to a list before display
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortKey {
    /// Keep API order
    #[default]
    Relevance,
    /// vote_average, highest first
    Rating,
    /// Release date, newest first, undated last
    Date,
    /// vote_count, highest first
    Votes,
}

/// Slice `items[start..start + len]`, clamped to bounds
pub fn window(items: &[CatalogItem], start: usize, len: usize) -> Vec<CatalogItem> {
    let start = start.min(items.len());
    let end = start.saturating_add(len).min(items.len());
    items[start..end].to_vec()
}

/// Items tagged with `genre_id`
pub fn with_genre(items: &[CatalogItem], genre_id: u32) -> Vec<CatalogItem> {
    with_any_genre(items, &[genre_id])
}

/// Items tagged with at least one of `genre_ids`
pub fn with_any_genre(items: &[CatalogItem], genre_ids: &[u32]) -> Vec<CatalogItem> {
    items
        .iter()
        .filter(|item| item.genre_ids.iter().any(|g| genre_ids.contains(g)))
        .cloned()
        .collect()
}

fn by_date_desc(a: &CatalogItem, b: &CatalogItem) -> Ordering {
    match (a.release_naive_date(), b.release_naive_date()) {
        (Some(da), Some(db)) => db.cmp(&da),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

/// Stable in-place sort
pub fn sort_items(items: &mut [CatalogItem], key: SortKey) {
    match key {
        SortKey::Relevance => {}
        SortKey::Rating => items.sort_by(|a, b| b.vote_average.total_cmp(&a.vote_average)),
        SortKey::Date => items.sort_by(by_date_desc),
        SortKey::Votes => items.sort_by(|a, b| b.vote_count.cmp(&a.vote_count)),
    }
}

/// Sorted copy
pub fn sorted(items: &[CatalogItem], key: SortKey) -> Vec<CatalogItem> {
    let mut out = items.to_vec();
    sort_items(&mut out, key);
    out
}

/// Concatenate lists keeping the first occurrence of each id
pub fn dedupe_by_id(lists: &[&[CatalogItem]]) -> Vec<CatalogItem> {
    let mut seen = HashSet::new();
    lists
        .iter()
        .flat_map(|list| list.iter())
        .filter(|item| seen.insert(item.id))
        .cloned()
        .collect()
}

/// Items with at least `min_votes` votes, most voted first, capped at `n`
pub fn top_picks(items: &[CatalogItem], min_votes: u32, n: usize) -> Vec<CatalogItem> {
    let mut picks: Vec<CatalogItem> = items
        .iter()
        .filter(|item| item.vote_count >= min_votes)
        .cloned()
        .collect();
    sort_items(&mut picks, SortKey::Votes);
    picks.truncate(n);
    picks
}

/// Whether `date` falls in the `days`-day window ending at `today` (inclusive)
pub fn is_recent(date: NaiveDate, today: NaiveDate, days: u32) -> bool {
    if date > today {
        return false;
    }
    (today - date).num_days() <= i64::from(days)
}

/// Items released within the last `days` days; undated and future items excluded
pub fn recently_added(items: &[CatalogItem], today: NaiveDate, days: u32) -> Vec<CatalogItem> {
    items
        .iter()
        .filter(|item| {
            item.release_naive_date()
                .is_some_and(|d| is_recent(d, today, days))
        })
        .cloned()
        .collect()
}

/// Ids of the first ten entries of a ranked list
pub fn top_ten_ids(ranked: &[CatalogItem]) -> HashSet<u64> {
    ranked.iter().take(ROW_LEN).map(|item| item.id).collect()
}

// =============================================================================
// Badges
// =============================================================================

/// Card badges, derived once per fetch
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Badges {
    pub recent: HashSet<u64>,
    pub top_ten: HashSet<u64>,
}

impl Badges {
    /// `fetched` is every list from the fetch; `ranked` are the popularity
    /// rankings whose first ten earn the "Top 10" badge.
    pub fn compute(
        fetched: &[&[CatalogItem]],
        ranked: &[&[CatalogItem]],
        today: NaiveDate,
        days: u32,
    ) -> Self {
        let union = dedupe_by_id(fetched);
        Self {
            recent: recently_added(&union, today, days)
                .into_iter()
                .map(|item| item.id)
                .collect(),
            top_ten: ranked.iter().flat_map(|list| top_ten_ids(list)).collect(),
        }
    }

    pub fn is_recent(&self, id: u64) -> bool {
        self.recent.contains(&id)
    }

    pub fn is_top_ten(&self, id: u64) -> bool {
        self.top_ten.contains(&id)
    }
}

// =============================================================================
// Rows
// =============================================================================

/// A titled, horizontally scrolling row of cards
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Row {
    pub title: String,
    pub items: Vec<CatalogItem>,
    /// Show 1..10 rank numbers on the cards
    pub ranked: bool,
}

impl Row {
    pub fn new(title: impl Into<String>, items: Vec<CatalogItem>) -> Self {
        Self {
            title: title.into(),
            items,
            ranked: false,
        }
    }

    pub fn ranked(title: impl Into<String>, items: Vec<CatalogItem>) -> Self {
        Self {
            ranked: true,
            ..Self::new(title, items)
        }
    }
}

/// Rows plus badges for one screen
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Feed {
    pub rows: Vec<Row>,
    pub badges: Badges,
}

impl Feed {
    fn from_rows(rows: Vec<Row>, badges: Badges) -> Self {
        Self {
            rows: rows.into_iter().filter(|r| !r.items.is_empty()).collect(),
            badges,
        }
    }

    /// Home screen from popular movies and popular series
    pub fn home(movies: &[CatalogItem], tv: &[CatalogItem], today: NaiveDate, days: u32) -> Self {
        let mut action = with_genre(movies, 28);
        action.truncate(ROW_LEN);

        let rows = vec![
            Row::new("New on FlixTUI", window(movies, 1, ROW_LEN)),
            Row::ranked("Top 10 Movies Today", window(movies, 0, ROW_LEN)),
            Row::ranked("Top 10 TV Shows Today", window(tv, 0, ROW_LEN)),
            Row::new("Critically Acclaimed TV Shows", window(tv, 5, ROW_LEN)),
            Row::new("Get In on the Action", action),
            Row::new("Continue Watching", window(movies, 15, ROW_LEN)),
            Row::new(
                "Today's Top Picks for You",
                top_picks(movies, TOP_PICKS_MIN_VOTES, ROW_LEN),
            ),
        ];

        Self::from_rows(rows, Badges::compute(&[movies, tv], &[movies, tv], today, days))
    }

    /// Movies screen from popular, top rated and now playing lists
    pub fn movies(
        popular: &[CatalogItem],
        top_rated: &[CatalogItem],
        now_playing: &[CatalogItem],
        today: NaiveDate,
        days: u32,
    ) -> Self {
        let all = dedupe_by_id(&[popular, top_rated, now_playing]);
        let genre_row = |ids: &[u32]| {
            let mut items = with_any_genre(&all, ids);
            items.truncate(ROW_LEN);
            items
        };
        let mut new_releases = recently_added(&all, today, days);
        sort_items(&mut new_releases, SortKey::Date);
        new_releases.truncate(ROW_LEN);

        let rows = vec![
            Row::new("Popular Movies", window(popular, 0, ROW_LEN)),
            Row::new("Action & Adventure", genre_row(&[28, 12])),
            Row::new("Comedy Movies", genre_row(&[35])),
            Row::new("Drama", genre_row(&[18])),
            Row::new("New Releases", new_releases),
        ];

        Self::from_rows(
            rows,
            Badges::compute(&[popular, top_rated, now_playing], &[popular], today, days),
        )
    }

    /// TV screen from popular, top rated and trending lists
    pub fn tv(
        popular: &[CatalogItem],
        top_rated: &[CatalogItem],
        trending: &[CatalogItem],
        today: NaiveDate,
        days: u32,
    ) -> Self {
        let all = dedupe_by_id(&[popular, trending, top_rated]);
        let genre_row = |id: u32| {
            let mut items = with_genre(&all, id);
            items.truncate(ROW_LEN);
            items
        };

        let rows = vec![
            Row::new("Popular TV Shows", window(popular, 0, ROW_LEN)),
            Row::new("Trending Now", window(trending, 0, ROW_LEN)),
            Row::new("Top Rated", window(top_rated, 0, ROW_LEN)),
            Row::new("Drama Series", genre_row(18)),
            Row::new("Comedy Shows", genre_row(35)),
        ];

        Self::from_rows(
            rows,
            Badges::compute(&[popular, top_rated, trending], &[popular], today, days),
        )
    }
}
