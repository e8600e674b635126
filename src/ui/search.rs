//! Search view component
//!
//! Query input, filter and sort bar, and the accumulated result list with a
//! "load more" footer while further pages exist.

use ratatui::{
    prelude::*,
    widgets::{Block, BorderType, Borders, List, ListItem, Paragraph},
};

use super::{render_loading, Theme};
use crate::app::{App, InputMode, SearchView};
use crate::models::{CatalogItem, MediaType};
use crate::search::{SearchFilter, SearchSort};

fn render_input(frame: &mut Frame, area: Rect, search: &SearchView, editing: bool) {
    let text = if editing {
        let (before, after) = search.split_at_cursor();
        format!("⌕ {}│{}", before, after)
    } else if search.query.is_empty() {
        "⌕ Titles, people, genres".to_string()
    } else {
        format!("⌕ {}", search.query)
    };

    let input = Paragraph::new(text)
        .style(if editing { Theme::input().fg(Theme::HIGHLIGHT) } else { Theme::input() })
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_type(BorderType::Rounded)
                .border_style(if editing { Theme::border_focused() } else { Theme::border() })
                .title(Span::styled(" SEARCH ", Theme::title())),
        );
    frame.render_widget(input, area);
}

/// Filter and sort options with the active ones highlighted
pub fn options_line(filter: SearchFilter, sort: SearchSort) -> Line<'static> {
    let mut spans = vec![Span::styled("Filter: ", Theme::dimmed())];
    for option in [SearchFilter::All, SearchFilter::Movie, SearchFilter::Tv] {
        let style = if option == filter { Theme::highlighted() } else { Theme::secondary() };
        spans.push(Span::styled(format!(" {} ", option.label()), style));
    }
    spans.push(Span::styled("   Sort: ", Theme::dimmed()));
    for option in [
        SearchSort::Relevance,
        SearchSort::Rating,
        SearchSort::Date,
        SearchSort::Popularity,
    ] {
        let style = if option == sort { Theme::highlighted() } else { Theme::secondary() };
        spans.push(Span::styled(format!(" {} ", option.label()), style));
    }
    Line::from(spans)
}

fn result_line(item: &CatalogItem, is_selected: bool, in_list: bool) -> Line<'static> {
    let marker = if is_selected { "▸ " } else { "  " };
    let kind = match item.media_type {
        MediaType::Movie => "MOVIE",
        MediaType::Tv => "TV",
    };
    let mut spans = vec![
        Span::styled(marker, if is_selected { Theme::accent() } else { Theme::dimmed() }),
        Span::styled(
            item.title.clone(),
            if is_selected { Theme::list_item_selected() } else { Theme::text() },
        ),
        Span::styled(
            item.year().map(|y| format!(" ({})", y)).unwrap_or_default(),
            Theme::year(),
        ),
        Span::raw(" "),
        Span::styled(format!("[{}]", kind), Theme::secondary()),
        Span::raw(" "),
        Span::styled(format!("★ {:.1}", item.vote_average), Theme::rating()),
    ];
    if in_list {
        spans.push(Span::styled("  ✓", Theme::success()));
    }
    Line::from(spans)
}

fn render_results(frame: &mut Frame, area: Rect, app: &App) {
    let search = &app.search;
    let session = &search.session;
    let results = session.results();

    let title = if session.params().is_blank() {
        " RESULTS ".to_string()
    } else {
        format!(
            " RESULTS for \"{}\" ({} of {}) ",
            session.params().query,
            results.len(),
            session.total_results()
        )
    };
    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Theme::border())
        .title(Span::styled(title, Theme::title()));
    let inner = block.inner(area);

    if results.is_empty() {
        frame.render_widget(block, area);
        if search.loading.is_loading() || search.loading.is_error() {
            render_loading(frame, inner, &search.loading);
        } else {
            let hint = if session.params().is_blank() {
                "Type / to search movies and TV shows"
            } else {
                "No results found"
            };
            frame.render_widget(
                Paragraph::new(Span::styled(hint, Theme::dimmed())).alignment(Alignment::Center),
                inner,
            );
        }
        return;
    }

    // Footer line for load-more state
    let visible_height = (inner.height as usize).saturating_sub(1);
    let mut view = search.list.clone();
    view.scroll_into_view(visible_height);

    let mut items: Vec<ListItem> = results
        .iter()
        .enumerate()
        .skip(view.offset)
        .take(visible_height)
        .map(|(i, item)| {
            ListItem::new(result_line(
                item,
                i == search.list.selected,
                app.watchlist.contains(item.id),
            ))
        })
        .collect();

    let footer = if search.loading.is_loading() {
        Line::from(Span::styled("Loading more...", Theme::loading()))
    } else if let Some(msg) = search.loading.message() {
        Line::from(Span::styled(msg.to_string(), Theme::error()))
    } else if session.has_more() {
        Line::from(vec![
            Span::styled(" n ", Theme::keybind()),
            Span::styled(
                format!("Load more (page {} of {})", session.page(), session.total_pages()),
                Theme::keybind_desc(),
            ),
        ])
    } else {
        Line::from(Span::styled("End of results", Theme::dimmed()))
    };
    items.push(ListItem::new(footer));

    frame.render_widget(List::new(items).block(block), area);
}

pub fn render_search(frame: &mut Frame, area: Rect, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Input
            Constraint::Length(1), // Filter / sort
            Constraint::Min(1),    // Results
        ])
        .split(area);

    render_input(frame, chunks[0], &app.search, app.input_mode == InputMode::Editing);
    frame.render_widget(
        Paragraph::new(options_line(app.search.params.filter, app.search.params.sort)),
        chunks[1],
    );
    render_results(frame, chunks[2], app);
}
