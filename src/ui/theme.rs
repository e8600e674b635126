//! Streaming-service theme for FlixTUI
//!
//! Dark zinc backdrop, signature red, white text. Color palette and style
//! helpers for the TUI.

use ratatui::style::{Color, Modifier, Style};

/// Color palette
pub struct Theme;

impl Theme {
    // ═══════════════════════════════════════════════════════════════════════
    // CORE PALETTE
    // ═══════════════════════════════════════════════════════════════════════

    /// Background: #18181b (zinc-900)
    pub const BACKGROUND: Color = Color::Rgb(0x18, 0x18, 0x1b);

    /// Primary: #e50914 (brand red)
    pub const PRIMARY: Color = Color::Rgb(0xe5, 0x09, 0x14);

    /// Secondary: #d4d4d8 (zinc-300)
    pub const SECONDARY: Color = Color::Rgb(0xd4, 0xd4, 0xd8);

    /// Accent: #facc15 (rating star yellow)
    pub const ACCENT: Color = Color::Rgb(0xfa, 0xcc, 0x15);

    /// Highlight: #ffffff (focused card)
    pub const HIGHLIGHT: Color = Color::Rgb(0xff, 0xff, 0xff);

    /// Text: #f4f4f5 (zinc-100)
    pub const TEXT: Color = Color::Rgb(0xf4, 0xf4, 0xf5);

    /// Dim: #a1a1aa (zinc-400)
    pub const DIM: Color = Color::Rgb(0xa1, 0xa1, 0xaa);

    /// Success: #16a34a (green-600, success toast)
    pub const SUCCESS: Color = Color::Rgb(0x16, 0xa3, 0x4a);

    /// Error: #dc2626 (red-600, error toast)
    pub const ERROR: Color = Color::Rgb(0xdc, 0x26, 0x26);

    /// Match/"New" badge: #46d369
    pub const BADGE_NEW: Color = Color::Rgb(0x46, 0xd3, 0x69);

    // ═══════════════════════════════════════════════════════════════════════
    // DERIVED COLORS (for UI elements)
    // ═══════════════════════════════════════════════════════════════════════

    /// Card/panel background (zinc-800)
    pub const BACKGROUND_LIGHT: Color = Color::Rgb(0x27, 0x27, 0x2a);

    /// Border color (zinc-700)
    pub const BORDER: Color = Color::Rgb(0x3f, 0x3f, 0x46);

    /// Border color when focused
    pub const BORDER_FOCUSED: Color = Self::HIGHLIGHT;

    // ═══════════════════════════════════════════════════════════════════════
    // STYLE HELPERS
    // ═══════════════════════════════════════════════════════════════════════

    /// Default text style
    pub fn text() -> Style {
        Style::default().fg(Self::TEXT).bg(Self::BACKGROUND)
    }

    /// Highlighted text (white on red)
    pub fn highlighted() -> Style {
        Style::default()
            .fg(Self::HIGHLIGHT)
            .bg(Self::PRIMARY)
            .add_modifier(Modifier::BOLD)
    }

    /// Selected item style
    pub fn selected() -> Style {
        Style::default()
            .fg(Self::HIGHLIGHT)
            .add_modifier(Modifier::BOLD)
    }

    /// Dimmed/muted text
    pub fn dimmed() -> Style {
        Style::default().fg(Self::DIM)
    }

    pub fn error() -> Style {
        Style::default()
            .fg(Self::ERROR)
            .add_modifier(Modifier::BOLD)
    }

    pub fn success() -> Style {
        Style::default()
            .fg(Self::SUCCESS)
            .add_modifier(Modifier::BOLD)
    }

    /// Title/header style
    pub fn title() -> Style {
        Style::default()
            .fg(Self::TEXT)
            .add_modifier(Modifier::BOLD)
    }

    /// Brand logo style
    pub fn logo() -> Style {
        Style::default()
            .fg(Self::PRIMARY)
            .add_modifier(Modifier::BOLD)
    }

    pub fn secondary() -> Style {
        Style::default().fg(Self::SECONDARY)
    }

    /// Accent text style (yellow)
    pub fn accent() -> Style {
        Style::default()
            .fg(Self::ACCENT)
            .add_modifier(Modifier::BOLD)
    }

    /// Normal/unfocused border
    pub fn border() -> Style {
        Style::default().fg(Self::BORDER)
    }

    /// Focused border
    pub fn border_focused() -> Style {
        Style::default()
            .fg(Self::BORDER_FOCUSED)
            .add_modifier(Modifier::BOLD)
    }

    // ═══════════════════════════════════════════════════════════════════════
    // COMPONENT STYLES
    // ═══════════════════════════════════════════════════════════════════════

    /// Card background
    pub fn card() -> Style {
        Style::default().fg(Self::TEXT).bg(Self::BACKGROUND_LIGHT)
    }

    /// Focused card
    pub fn card_selected() -> Style {
        Style::default()
            .fg(Self::BACKGROUND)
            .bg(Self::HIGHLIGHT)
            .add_modifier(Modifier::BOLD)
    }

    /// Style for list items (normal state)
    pub fn list_item() -> Style {
        Style::default().fg(Self::TEXT)
    }

    /// Style for list items (selected/highlighted)
    pub fn list_item_selected() -> Style {
        Self::highlighted()
    }

    /// Style for input fields
    pub fn input() -> Style {
        Style::default().fg(Self::TEXT).bg(Self::BACKGROUND_LIGHT)
    }

    /// Keybinding hint style
    pub fn keybind() -> Style {
        Style::default().fg(Self::TEXT).add_modifier(Modifier::BOLD)
    }

    /// Keybinding description style
    pub fn keybind_desc() -> Style {
        Style::default().fg(Self::DIM)
    }

    pub fn status_bar() -> Style {
        Style::default().fg(Self::TEXT).bg(Self::BACKGROUND_LIGHT)
    }

    /// Loading/spinner indicator
    pub fn loading() -> Style {
        Style::default()
            .fg(Self::PRIMARY)
            .add_modifier(Modifier::BOLD)
    }

    /// Rank numbers on "Top 10" rows
    pub fn rank() -> Style {
        Style::default()
            .fg(Self::DIM)
            .add_modifier(Modifier::BOLD)
    }

    /// "TOP 10" badge
    pub fn badge_top_ten() -> Style {
        Style::default()
            .fg(Self::HIGHLIGHT)
            .bg(Self::PRIMARY)
            .add_modifier(Modifier::BOLD)
    }

    /// "Recently Added" badge
    pub fn badge_new() -> Style {
        Style::default()
            .fg(Self::BADGE_NEW)
            .add_modifier(Modifier::BOLD)
    }

    /// Star rating
    pub fn rating() -> Style {
        Style::default().fg(Self::ACCENT)
    }

    /// Year/date metadata
    pub fn year() -> Style {
        Style::default().fg(Self::SECONDARY)
    }

    /// Genre tags
    pub fn genre() -> Style {
        Style::default().fg(Self::DIM)
    }

    /// Duration text
    pub fn duration() -> Style {
        Style::default().fg(Self::DIM)
    }

    /// Toast popup for a success notification
    pub fn toast_success() -> Style {
        Style::default()
            .fg(Self::HIGHLIGHT)
            .bg(Self::SUCCESS)
            .add_modifier(Modifier::BOLD)
    }

    /// Toast popup for an error notification
    pub fn toast_error() -> Style {
        Style::default()
            .fg(Self::HIGHLIGHT)
            .bg(Self::ERROR)
            .add_modifier(Modifier::BOLD)
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// COLOR UTILITIES
// ═══════════════════════════════════════════════════════════════════════════

/// Calculate relative luminance for a color (used in contrast ratio)
/// Formula: https://www.w3.org/TR/WCAG20/#relativeluminancedef
pub fn relative_luminance(r: u8, g: u8, b: u8) -> f64 {
    fn channel_luminance(c: u8) -> f64 {
        let c = c as f64 / 255.0;
        if c <= 0.03928 {
            c / 12.92
        } else {
            ((c + 0.055) / 1.055).powf(2.4)
        }
    }

    0.2126 * channel_luminance(r) + 0.7152 * channel_luminance(g) + 0.0722 * channel_luminance(b)
}

/// Contrast ratio between 1 (same color) and 21 (black/white).
/// WCAG AA requires >= 4.5:1 for normal text, >= 3:1 for large text
pub fn contrast_ratio(fg: (u8, u8, u8), bg: (u8, u8, u8)) -> f64 {
    let l1 = relative_luminance(fg.0, fg.1, fg.2);
    let l2 = relative_luminance(bg.0, bg.1, bg.2);

    let (lighter, darker) = if l1 > l2 { (l1, l2) } else { (l2, l1) };

    (lighter + 0.05) / (darker + 0.05)
}

pub fn meets_wcag_aa(fg: (u8, u8, u8), bg: (u8, u8, u8)) -> bool {
    contrast_ratio(fg, bg) >= 4.5
}

pub fn meets_wcag_aa_large(fg: (u8, u8, u8), bg: (u8, u8, u8)) -> bool {
    contrast_ratio(fg, bg) >= 3.0
}

/// Extract RGB tuple from ratatui Color (only works for Rgb variant)
pub fn color_to_rgb(color: Color) -> Option<(u8, u8, u8)> {
    match color {
        Color::Rgb(r, g, b) => Some((r, g, b)),
        _ => None,
    }
}
