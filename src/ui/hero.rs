//! Hero banner
//!
//! Featured title with trailer info. A terminal cannot play video, so the
//! "player" is the YouTube link plus the mute and video toggles.

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Paragraph, Wrap},
    Frame,
};

use super::Theme;
use crate::models::{find_trailer, CatalogItem, MovieDetail, Video, PLACEHOLDER_IMAGE};

/// Banner state: starts muted with the video showing
#[derive(Debug, Clone, PartialEq)]
pub struct HeroState {
    pub item: CatalogItem,
    pub detail: Option<MovieDetail>,
    pub trailer: Option<Video>,
    pub muted: bool,
    pub show_video: bool,
}

impl HeroState {
    pub fn new(item: CatalogItem, detail: Option<MovieDetail>, videos: &[Video]) -> Self {
        Self {
            item,
            detail,
            trailer: find_trailer(videos).cloned(),
            muted: true,
            show_video: true,
        }
    }

    pub fn toggle_mute(&mut self) {
        self.muted = !self.muted;
    }

    pub fn toggle_video(&mut self) {
        self.show_video = !self.show_video;
    }

    /// Trailer is actually on screen
    pub fn is_playing(&self) -> bool {
        self.show_video && self.trailer.is_some()
    }

    pub fn title(&self) -> &str {
        self.detail
            .as_ref()
            .map(|d| d.title.as_str())
            .unwrap_or(&self.item.title)
    }

    pub fn overview(&self) -> &str {
        self.detail
            .as_ref()
            .map(|d| d.overview.as_str())
            .unwrap_or(&self.item.overview)
    }
}

/// Lines describing the trailer or backdrop
pub fn media_lines(hero: &HeroState) -> Vec<Line<'static>> {
    match (&hero.trailer, hero.show_video) {
        (Some(trailer), true) => vec![
            Line::from(vec![
                Span::styled("▶ ", Theme::logo()),
                Span::styled(trailer.name.clone(), Theme::title()),
            ]),
            Line::from(Span::styled(trailer.youtube_url(), Theme::secondary())),
            Line::from(Span::styled(
                if hero.muted { "🔇 Muted" } else { "🔊 Sound on" },
                Theme::dimmed(),
            )),
        ],
        _ => {
            let backdrop = hero.item.backdrop_url();
            let text = if backdrop == PLACEHOLDER_IMAGE {
                "No trailer available".to_string()
            } else {
                format!("Backdrop: {}", backdrop)
            };
            vec![Line::from(Span::styled(text, Theme::dimmed()))]
        }
    }
}

/// Render the banner with title, overview and trailer info
pub fn render_hero(frame: &mut Frame, area: Rect, hero: &HeroState, in_list: bool) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Theme::border());
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
        .split(inner);

    let mut lines = vec![
        Line::from(Span::styled(hero.title().to_uppercase(), Theme::title())),
        Line::from(""),
    ];
    if let Some(year) = hero.item.year() {
        lines.push(Line::from(vec![
            Span::styled(year.to_string(), Theme::year()),
            Span::raw("  "),
            Span::styled(format!("★ {:.1}", hero.item.vote_average), Theme::rating()),
        ]));
    }
    lines.push(Line::from(Span::styled(hero.overview().to_string(), Theme::text())));
    lines.push(Line::from(""));
    lines.push(Line::from(vec![
        Span::styled(" i ", Theme::highlighted()),
        Span::styled(" More Info  ", Theme::keybind_desc()),
        Span::styled(" a ", Theme::highlighted()),
        Span::styled(
            if in_list { " ✓ My List  " } else { " + My List  " },
            Theme::keybind_desc(),
        ),
        Span::styled(" u ", Theme::keybind()),
        Span::styled(" Mute  ", Theme::keybind_desc()),
        Span::styled(" v ", Theme::keybind()),
        Span::styled(" Video", Theme::keybind_desc()),
    ]));

    frame.render_widget(
        Paragraph::new(lines).wrap(Wrap { trim: true }),
        chunks[0],
    );
    frame.render_widget(
        Paragraph::new(media_lines(hero)).wrap(Wrap { trim: true }),
        chunks[1],
    );
}
