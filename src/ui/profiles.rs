//! Intro splash and "Who's watching?" picker

use ratatui::{
    prelude::*,
    widgets::{Block, BorderType, Borders, Paragraph},
};

use super::Theme;
use crate::app::App;
use crate::profile::PROFILES;

const TILE_WIDTH: u16 = 16;
const TILE_HEIGHT: u16 = 5;

/// Brand splash shown while the intro plays
pub fn render_intro(frame: &mut Frame, area: Rect) {
    let y = area.y + area.height / 2;
    let logo = Rect {
        x: area.x,
        y,
        width: area.width,
        height: 1.min(area.height),
    };
    frame.render_widget(
        Paragraph::new(Span::styled("F L I X T U I", Theme::logo())).alignment(Alignment::Center),
        logo,
    );
}

/// Profile tiles in a centered row
pub fn render_picker(frame: &mut Frame, area: Rect, app: &App) {
    let total_width = TILE_WIDTH * PROFILES.len() as u16;
    let x0 = area.x + area.width.saturating_sub(total_width) / 2;
    let y0 = area.y + area.height.saturating_sub(TILE_HEIGHT + 4) / 2;

    frame.render_widget(
        Paragraph::new(Span::styled("Who's watching?", Theme::title())).alignment(Alignment::Center),
        Rect {
            x: area.x,
            y: y0,
            width: area.width,
            height: 1.min(area.height),
        },
    );

    for (i, profile) in PROFILES.iter().enumerate() {
        let tile = Rect {
            x: x0 + i as u16 * TILE_WIDTH,
            y: y0 + 2,
            width: TILE_WIDTH.min(area.width),
            height: TILE_HEIGHT.min(area.height.saturating_sub(2)),
        }
        .intersection(area);
        let selected = i == app.profile_list.selected;

        let initial = profile.name.chars().next().unwrap_or('?').to_string();
        let content = vec![
            Line::from(Span::styled(
                initial,
                if selected { Theme::highlighted() } else { Theme::logo() },
            )),
            Line::from(Span::styled(
                profile.name,
                if selected { Theme::selected() } else { Theme::dimmed() },
            )),
            Line::from(Span::styled(format!("[{}]", profile.id), Theme::keybind_desc())),
        ];

        let block = Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(if selected { Theme::border_focused() } else { Theme::border() });
        frame.render_widget(
            Paragraph::new(content).alignment(Alignment::Center).block(block),
            tile,
        );
    }

    let hint = Rect {
        x: area.x,
        y: (y0 + TILE_HEIGHT + 3).min(area.bottom().saturating_sub(1)),
        width: area.width,
        height: 1.min(area.height),
    };
    frame.render_widget(
        Paragraph::new(Span::styled(
            "←→ choose  Enter select  1-4 quick pick  q quit",
            Theme::keybind_desc(),
        ))
        .alignment(Alignment::Center),
        hint,
    );
}
