//! My List screen

use ratatui::{
    prelude::*,
    widgets::{Block, BorderType, Borders, List, ListItem, Paragraph},
};

use super::Theme;
use crate::app::App;
use crate::models::WatchlistEntry;

/// `▸ Title (Year) [MOVIE] ★ 8.5`
pub fn entry_line(entry: &WatchlistEntry, is_selected: bool) -> Line<'static> {
    let marker = if is_selected { "▸ " } else { "  " };
    Line::from(vec![
        Span::styled(marker, if is_selected { Theme::accent() } else { Theme::dimmed() }),
        Span::styled(
            entry.display_name().to_string(),
            if is_selected { Theme::list_item_selected() } else { Theme::text() },
        ),
        Span::styled(
            entry.year().map(|y| format!(" ({})", y)).unwrap_or_default(),
            Theme::year(),
        ),
        Span::raw(" "),
        Span::styled(
            format!("[{}]", entry.kind.to_string().to_uppercase()),
            Theme::secondary(),
        ),
        Span::raw(" "),
        Span::styled(format!("★ {:.1}", entry.vote_average), Theme::rating()),
    ])
}

pub fn render_my_list(frame: &mut Frame, area: Rect, app: &App) {
    let entries = app.watchlist.entries();
    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Theme::border_focused())
        .title(Span::styled(
            format!(" MY LIST ({}) ", entries.len()),
            Theme::title(),
        ));

    if entries.is_empty() {
        let empty = Paragraph::new(vec![
            Line::from(""),
            Line::from(Span::styled("Your list is empty", Theme::title())),
            Line::from(Span::styled(
                "Press m on any title to add it here",
                Theme::dimmed(),
            )),
        ])
        .alignment(Alignment::Center)
        .block(block);
        frame.render_widget(empty, area);
        return;
    }

    let visible_height = block.inner(area).height as usize;
    let mut view = app.my_list.clone();
    view.scroll_into_view(visible_height);

    let items: Vec<ListItem> = entries
        .iter()
        .enumerate()
        .skip(view.offset)
        .take(visible_height)
        .map(|(i, entry)| ListItem::new(entry_line(entry, i == app.my_list.selected)))
        .collect();

    frame.render_widget(List::new(items).block(block), area);
}
