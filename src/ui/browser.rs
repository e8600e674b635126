//! Content browser view
//!
//! Horizontal rows of title cards, one row per feed section. The focused row
//! scrolls vertically; each row scrolls horizontally to keep its cursor in view.

use ratatui::{
    prelude::*,
    widgets::{Block, BorderType, Borders, Paragraph},
};

use super::hero::render_hero;
use super::{render_loading, Theme};
use crate::app::{App, FeedView};
use crate::feed::{Badges, Row};
use crate::models::CatalogItem;

/// Card width including its border
pub const CARD_WIDTH: u16 = 24;
/// Row height: title line plus a bordered card
pub const ROW_HEIGHT: u16 = 7;
/// Hero banner height on Home
const HERO_HEIGHT: u16 = 10;

/// Trim to `max` chars, appending an ellipsis when cut
pub fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let cut: String = s.chars().take(max.saturating_sub(1)).collect();
        format!("{}…", cut)
    }
}

/// Lines inside one card
pub fn card_lines(item: &CatalogItem, rank: Option<usize>, badges: &Badges, width: usize) -> Vec<Line<'static>> {
    let mut title_spans = Vec::new();
    let mut title_width = width;
    if let Some(rank) = rank {
        let label = format!("{} ", rank);
        title_width = title_width.saturating_sub(label.chars().count());
        title_spans.push(Span::styled(label, Theme::rank()));
    }
    title_spans.push(Span::styled(truncate(&item.title, title_width), Theme::title()));

    let mut meta = Vec::new();
    if let Some(year) = item.year() {
        meta.push(Span::styled(year.to_string(), Theme::year()));
        meta.push(Span::raw(" "));
    }
    meta.push(Span::styled(format!("★ {:.1}", item.vote_average), Theme::rating()));

    let genres = item.genre_names().join(" • ");

    let mut badge_spans = Vec::new();
    if badges.is_top_ten(item.id) {
        badge_spans.push(Span::styled("TOP 10", Theme::badge_top_ten()));
        badge_spans.push(Span::raw(" "));
    }
    if badges.is_recent(item.id) {
        badge_spans.push(Span::styled("Recently Added", Theme::badge_new()));
    }

    vec![
        Line::from(title_spans),
        Line::from(meta),
        Line::from(Span::styled(truncate(&genres, width), Theme::genre())),
        Line::from(badge_spans),
    ]
}

/// First card index to draw so `col` stays visible
fn row_offset(col: usize, visible: usize) -> usize {
    if visible == 0 {
        0
    } else {
        (col + 1).saturating_sub(visible)
    }
}

fn render_row(frame: &mut Frame, area: Rect, row: &Row, badges: &Badges, focused: bool, col: usize) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(1), Constraint::Min(1)])
        .split(area);

    let title_style = if focused { Theme::selected() } else { Theme::secondary() };
    frame.render_widget(
        Paragraph::new(Span::styled(format!(" {}", row.title), title_style)),
        chunks[0],
    );

    let visible = (chunks[1].width / CARD_WIDTH).max(1) as usize;
    let offset = row_offset(col, visible);

    for (slot, (index, item)) in row
        .items
        .iter()
        .enumerate()
        .skip(offset)
        .take(visible)
        .enumerate()
    {
        let card_area = Rect {
            x: chunks[1].x + slot as u16 * CARD_WIDTH,
            y: chunks[1].y,
            width: CARD_WIDTH.min(chunks[1].width),
            height: chunks[1].height,
        };
        let selected = focused && index == col;
        let block = Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(if selected { Theme::border_focused() } else { Theme::border() })
            .style(if selected { Theme::card_selected() } else { Theme::card() });
        let inner_width = card_area.width.saturating_sub(2) as usize;
        let rank = row.ranked.then_some(index + 1);
        let card = Paragraph::new(card_lines(item, rank, badges, inner_width)).block(block);
        frame.render_widget(card, card_area);
    }
}

/// Draw a feed's rows, scrolled so the focused row is on screen
pub fn render_rows(frame: &mut Frame, area: Rect, view: &FeedView) {
    if view.feed.rows.is_empty() {
        let empty = Paragraph::new("No titles to show")
            .style(Theme::dimmed())
            .alignment(Alignment::Center);
        frame.render_widget(empty, area);
        return;
    }

    let visible = (area.height / ROW_HEIGHT).max(1) as usize;
    let first = row_offset(view.row, visible);

    for (slot, (index, row)) in view
        .feed
        .rows
        .iter()
        .enumerate()
        .skip(first)
        .take(visible)
        .enumerate()
    {
        let y = area.y + slot as u16 * ROW_HEIGHT;
        let row_area = Rect {
            x: area.x,
            y,
            width: area.width,
            height: ROW_HEIGHT.min(area.bottom().saturating_sub(y)),
        };
        render_row(
            frame,
            row_area,
            row,
            &view.feed.badges,
            index == view.row,
            view.col(index),
        );
    }
}

/// Movies or TV Shows screen
pub fn render_feed(frame: &mut Frame, area: Rect, view: &FeedView) {
    if !view.loading.is_loading() && !view.loading.is_error() {
        render_rows(frame, area, view);
    } else {
        render_loading(frame, area, &view.loading);
    }
}

/// Home: hero banner above the rows
pub fn render_home(frame: &mut Frame, area: Rect, app: &App) {
    if app.home.loading.is_loading() || app.home.loading.is_error() {
        render_loading(frame, area, &app.home.loading);
        return;
    }

    match &app.home_hero {
        Some(hero) if area.height > HERO_HEIGHT + ROW_HEIGHT => {
            let chunks = Layout::default()
                .direction(Direction::Vertical)
                .constraints([Constraint::Length(HERO_HEIGHT), Constraint::Min(1)])
                .split(area);
            let in_list = app.watchlist.contains(hero.item.id);
            render_hero(frame, chunks[0], hero, in_list);
            render_rows(frame, chunks[1], &app.home);
        }
        _ => render_rows(frame, area, &app.home),
    }
}
