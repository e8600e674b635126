//! Detail view for movies and TV shows
//!
//! Info panel on top (metadata, credits, overview, trailer). Below it a movie
//! shows "More Like This"; a TV show shows its seasons and the episodes of
//! the selected season.

use ratatui::{
    prelude::*,
    widgets::{Block, BorderType, Borders, List, ListItem, Paragraph, Wrap},
};

use super::browser::truncate;
use super::hero::media_lines;
use super::{render_loading, Theme};
use crate::app::{App, DetailContent, DetailState, ListState, LoadingState};
use crate::models::{CatalogItem, Credits, Episode, Genre, MovieDetail, SeasonSummary, TvDetail};

fn panel(title: String, focused: bool) -> Block<'static> {
    Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(if focused { Theme::border_focused() } else { Theme::border() })
        .title(Span::styled(title, Theme::title()))
}

fn genres_str(genres: &[Genre]) -> String {
    genres
        .iter()
        .map(|g| g.name.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}

fn list_button(in_list: bool) -> Line<'static> {
    Line::from(vec![
        Span::styled(" m ", Theme::highlighted()),
        Span::styled(
            if in_list { " ✓ In My List" } else { " + Add to My List" },
            Theme::keybind_desc(),
        ),
    ])
}

/// Header and metadata lines for a movie
pub fn movie_lines(detail: &MovieDetail, credits: &Credits, in_list: bool) -> Vec<Line<'static>> {
    let mut lines = vec![Line::from(vec![
        Span::styled(detail.title.clone(), Theme::title()),
        Span::styled(
            detail.year().map(|y| format!(" ({})", y)).unwrap_or_default(),
            Theme::year(),
        ),
    ])];

    if let Some(tagline) = detail.tagline.as_deref().filter(|t| !t.is_empty()) {
        lines.push(Line::from(Span::styled(tagline.to_string(), Theme::dimmed())));
    }

    let mut meta = vec![Span::styled(
        format!("★ {:.1} ({} votes)", detail.vote_average, detail.vote_count),
        Theme::rating(),
    )];
    if let Some(runtime) = detail.runtime_str() {
        meta.push(Span::styled(" │ ", Theme::dimmed()));
        meta.push(Span::styled(runtime, Theme::duration()));
    }
    lines.push(Line::from(meta));

    let genres = genres_str(&detail.genres);
    if !genres.is_empty() {
        lines.push(Line::from(vec![
            Span::styled("Genres: ", Theme::dimmed()),
            Span::styled(genres, Theme::text()),
        ]));
    }
    if let Some(director) = &credits.director {
        lines.push(Line::from(vec![
            Span::styled("Director: ", Theme::dimmed()),
            Span::styled(director.clone(), Theme::text()),
        ]));
    }
    if !credits.cast.is_empty() {
        lines.push(Line::from(vec![
            Span::styled("Cast: ", Theme::dimmed()),
            Span::styled(credits.cast.join(", "), Theme::text()),
        ]));
    }

    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(detail.overview.clone(), Theme::text())));
    lines.push(Line::from(""));
    lines.push(list_button(in_list));
    lines
}

/// Header and metadata lines for a TV show
pub fn tv_lines(detail: &TvDetail, in_list: bool) -> Vec<Line<'static>> {
    let mut lines = vec![Line::from(vec![
        Span::styled(detail.name.clone(), Theme::title()),
        Span::styled(
            detail.year().map(|y| format!(" ({})", y)).unwrap_or_default(),
            Theme::year(),
        ),
    ])];

    if let Some(tagline) = detail.tagline.as_deref().filter(|t| !t.is_empty()) {
        lines.push(Line::from(Span::styled(tagline.to_string(), Theme::dimmed())));
    }

    let mut meta = vec![
        Span::styled(format!("★ {:.1}", detail.vote_average), Theme::rating()),
        Span::styled(" │ ", Theme::dimmed()),
        Span::styled(
            format!(
                "{} seasons, {} episodes",
                detail.number_of_seasons, detail.number_of_episodes
            ),
            Theme::secondary(),
        ),
    ];
    if let Some(status) = &detail.status {
        meta.push(Span::styled(" │ ", Theme::dimmed()));
        meta.push(Span::styled(status.clone(), Theme::secondary()));
    }
    lines.push(Line::from(meta));

    let genres = genres_str(&detail.genres);
    if !genres.is_empty() {
        lines.push(Line::from(vec![
            Span::styled("Genres: ", Theme::dimmed()),
            Span::styled(genres, Theme::text()),
        ]));
    }
    if !detail.created_by.is_empty() {
        lines.push(Line::from(vec![
            Span::styled("Created by: ", Theme::dimmed()),
            Span::styled(detail.created_by.join(", "), Theme::text()),
        ]));
    }
    if !detail.networks.is_empty() {
        lines.push(Line::from(vec![
            Span::styled("Networks: ", Theme::dimmed()),
            Span::styled(detail.networks.join(", "), Theme::text()),
        ]));
    }

    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(detail.overview.clone(), Theme::text())));
    lines.push(Line::from(""));
    lines.push(list_button(in_list));
    lines
}

fn render_info(frame: &mut Frame, area: Rect, state: &DetailState, lines: Vec<Line<'static>>) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(65), Constraint::Percentage(35)])
        .split(area);

    frame.render_widget(
        Paragraph::new(lines)
            .wrap(Wrap { trim: true })
            .block(panel(" INFO ".into(), false)),
        chunks[0],
    );

    let trailer = match &state.trailer {
        Some(hero) => media_lines(hero),
        None => vec![Line::from(Span::styled("No trailer available", Theme::dimmed()))],
    };
    frame.render_widget(
        Paragraph::new(trailer)
            .wrap(Wrap { trim: true })
            .block(panel(" TRAILER ".into(), false)),
        chunks[1],
    );
}

fn render_similar(frame: &mut Frame, area: Rect, similar: &[CatalogItem], list: &ListState) {
    let block = panel(format!(" MORE LIKE THIS ({}) ", similar.len()), true);

    if similar.is_empty() {
        let empty = Paragraph::new("No similar titles")
            .style(Theme::dimmed())
            .alignment(Alignment::Center)
            .block(block);
        frame.render_widget(empty, area);
        return;
    }

    let items: Vec<ListItem> = similar
        .iter()
        .enumerate()
        .map(|(i, item)| {
            let is_selected = i == list.selected;
            let marker = if is_selected { "▸ " } else { "  " };
            ListItem::new(Line::from(vec![
                Span::styled(marker, if is_selected { Theme::accent() } else { Theme::dimmed() }),
                Span::styled(
                    item.title.clone(),
                    if is_selected { Theme::list_item_selected() } else { Theme::text() },
                ),
                Span::styled(
                    item.year().map(|y| format!(" ({})", y)).unwrap_or_default(),
                    Theme::year(),
                ),
                Span::styled(format!("  ★ {:.1}", item.vote_average), Theme::rating()),
            ]))
        })
        .collect();

    frame.render_widget(List::new(items).block(block), area);
}

fn render_seasons(frame: &mut Frame, area: Rect, seasons: &[SeasonSummary], list: &ListState) {
    let block = panel(format!(" SEASONS ({}) ", seasons.len()), false);

    if seasons.is_empty() {
        let empty = Paragraph::new("No seasons")
            .style(Theme::dimmed())
            .alignment(Alignment::Center)
            .block(block);
        frame.render_widget(empty, area);
        return;
    }

    let items: Vec<ListItem> = seasons
        .iter()
        .enumerate()
        .map(|(i, season)| {
            let is_selected = i == list.selected;
            let marker = if is_selected { "◂ " } else { "  " };
            ListItem::new(Line::from(vec![
                Span::styled(marker, if is_selected { Theme::accent() } else { Theme::dimmed() }),
                Span::styled(
                    season.to_string(),
                    if is_selected { Theme::list_item_selected() } else { Theme::text() },
                ),
            ]))
        })
        .collect();

    frame.render_widget(List::new(items).block(block), area);
}

/// One episode row: `S01E05 - Name (45m)`
pub fn episode_line(ep: &Episode, is_selected: bool, width: usize) -> Line<'static> {
    let marker = if is_selected { "▸ " } else { "  " };
    let mut spans = vec![
        Span::styled(marker, if is_selected { Theme::accent() } else { Theme::dimmed() }),
        Span::styled(format!("S{:02}E{:02}", ep.season, ep.episode), Theme::secondary()),
        Span::styled(" - ", Theme::dimmed()),
        Span::styled(
            truncate(&ep.name, width.saturating_sub(20).max(10)),
            if is_selected { Theme::list_item_selected() } else { Theme::text() },
        ),
    ];
    if let Some(runtime) = ep.runtime {
        spans.push(Span::styled(format!(" ({}m)", runtime), Theme::duration()));
    }
    Line::from(spans)
}

fn render_episodes(
    frame: &mut Frame,
    area: Rect,
    episodes: &[Episode],
    list: &ListState,
    loading: &LoadingState,
) {
    let block = panel(format!(" EPISODES ({}) ", episodes.len()), true);
    let inner = block.inner(area);

    if loading.is_loading() || loading.is_error() {
        frame.render_widget(block, area);
        render_loading(frame, inner, loading);
        return;
    }

    if episodes.is_empty() {
        let empty = Paragraph::new("No episodes")
            .style(Theme::dimmed())
            .alignment(Alignment::Center)
            .block(block);
        frame.render_widget(empty, area);
        return;
    }

    let visible_height = inner.height as usize;
    let mut view = list.clone();
    view.scroll_into_view(visible_height);

    let items: Vec<ListItem> = episodes
        .iter()
        .enumerate()
        .skip(view.offset)
        .take(visible_height)
        .map(|(i, ep)| ListItem::new(episode_line(ep, i == list.selected, inner.width as usize)))
        .collect();

    frame.render_widget(List::new(items).block(block), area);
}

/// Render the detail page for whatever is loaded
pub fn render_detail(frame: &mut Frame, area: Rect, app: &App) {
    let Some(state) = &app.detail else {
        return;
    };

    if !matches!(state.loading, LoadingState::Idle) {
        render_loading(frame, area, &state.loading);
        return;
    }

    let in_list = app.watchlist.contains(state.id);
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Percentage(55), Constraint::Percentage(45)])
        .split(area);

    match &state.content {
        DetailContent::Pending => render_loading(frame, area, &LoadingState::Loading(None)),
        DetailContent::Movie {
            detail,
            credits,
            similar,
            similar_list,
        } => {
            render_info(frame, chunks[0], state, movie_lines(detail, credits, in_list));
            render_similar(frame, chunks[1], similar, similar_list);
        }
        DetailContent::Tv {
            detail,
            season_list,
            episodes,
            episode_list,
            episodes_loading,
        } => {
            render_info(frame, chunks[0], state, tv_lines(detail, in_list));
            let bottom = Layout::default()
                .direction(Direction::Horizontal)
                .constraints([Constraint::Percentage(30), Constraint::Percentage(70)])
                .split(chunks[1]);
            render_seasons(frame, bottom[0], &detail.seasons, season_list);
            render_episodes(frame, bottom[1], episodes, episode_list, episodes_loading);
        }
    }
}
