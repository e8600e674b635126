//! Toast overlay for watch-list notifications

use ratatui::{
    prelude::*,
    widgets::{Block, BorderType, Borders, Clear, Paragraph, Wrap},
};

use super::Theme;
use crate::models::Notification;

const TOAST_WIDTH: u16 = 40;

/// Top-right corner popup area
pub fn toast_area(area: Rect) -> Rect {
    let width = TOAST_WIDTH.min(area.width);
    Rect {
        x: area.right().saturating_sub(width + 1).max(area.x),
        y: area.y + 1.min(area.height),
        width,
        height: 3,
    }
    .intersection(area)
}

/// Render a notification, green for success and red for errors
pub fn render_toast(frame: &mut Frame, area: Rect, notification: &Notification) {
    let popup = toast_area(area);
    let style = if notification.is_error() {
        Theme::toast_error()
    } else {
        Theme::toast_success()
    };

    frame.render_widget(Clear, popup);
    let toast = Paragraph::new(Line::from(vec![
        Span::styled(notification.to_string(), style),
        Span::styled("  x", style),
    ]))
    .wrap(Wrap { trim: true })
    .style(style)
    .block(
        Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(style),
    );
    frame.render_widget(toast, popup);
}
