//! Terminal UI components
//!
//! Built with ratatui. Keyboard-first navigation throughout.
//! [`render`] is the single entry point; it draws the gate screens until a
//! profile is chosen, then the navbar, the current screen, the status bar
//! and the toast overlay.

pub mod browser;
pub mod detail;
pub mod hero;
pub mod mylist;
pub mod profiles;
pub mod search;
pub mod theme;
pub mod toast;

pub use theme::Theme;

use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Clear, Paragraph},
    Frame,
};

use crate::app::{App, AppState, InputMode, LoadingState};
use crate::profile::GateState;

/// Navbar entries with their shortcut keys
const NAV_ITEMS: &[(&str, AppState)] = &[
    ("1", AppState::Home),
    ("2", AppState::TvShows),
    ("3", AppState::Movies),
    ("4", AppState::MyList),
];

/// Main render function - dispatches to view-specific renderers
pub fn render(frame: &mut Frame, app: &App) {
    let area = frame.area();

    // Clear with background color
    frame.render_widget(Clear, area);
    frame.render_widget(Block::default().style(Theme::text()), area);

    match app.gate.state() {
        GateState::Loading => profiles::render_intro(frame, area),
        GateState::ProfileSelection => profiles::render_picker(frame, area, app),
        GateState::MainApp { .. } => {
            let chunks = Layout::default()
                .direction(Direction::Vertical)
                .constraints([
                    Constraint::Length(3), // Navbar
                    Constraint::Min(1),    // Content
                    Constraint::Length(1), // Status bar
                ])
                .split(area);

            render_navbar(frame, chunks[0], app);
            render_content(frame, chunks[1], app);
            render_status_bar(frame, chunks[2], app);
        }
    }

    if let Some(notification) = app.toast.current() {
        toast::render_toast(frame, area, notification);
    }
}

/// Logo, screen tabs, search hint and active profile
fn render_navbar(frame: &mut Frame, area: Rect, app: &App) {
    let block = Block::default()
        .borders(Borders::BOTTOM)
        .border_type(BorderType::Plain)
        .border_style(Theme::border());
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Length(10), // Logo
            Constraint::Min(1),     // Tabs
            Constraint::Length(24), // Search + profile
        ])
        .split(inner);

    frame.render_widget(
        Paragraph::new(Span::styled(" FLIXTUI", Theme::logo())),
        chunks[0],
    );

    let mut tabs = Vec::new();
    for (key, screen) in NAV_ITEMS {
        let active = tab_of(&app.state, app) == Some(screen);
        tabs.push(Span::styled(format!(" {} ", key), Theme::keybind_desc()));
        tabs.push(Span::styled(
            screen.label(),
            if active { Theme::selected() } else { Theme::secondary() },
        ));
        if *screen == AppState::MyList && !app.watchlist.is_empty() {
            tabs.push(Span::styled(
                format!(" ({})", app.watchlist.len()),
                Theme::dimmed(),
            ));
        }
        tabs.push(Span::raw("  "));
    }
    frame.render_widget(Paragraph::new(Line::from(tabs)), chunks[1]);

    let profile = app.gate.profile().map_or("", |p| p.name);
    let right = Line::from(vec![
        Span::styled("/ ", Theme::keybind()),
        Span::styled("Search  ", Theme::keybind_desc()),
        Span::styled(profile.to_string(), Theme::accent()),
    ]);
    frame.render_widget(
        Paragraph::new(right).alignment(Alignment::Right),
        chunks[2],
    );
}

/// Tab highlighted for the current screen; detail pages highlight where they came from
fn tab_of<'a>(state: &'a AppState, app: &'a App) -> Option<&'a AppState> {
    match state {
        AppState::Home | AppState::Movies | AppState::TvShows | AppState::MyList => Some(state),
        AppState::Search => None,
        AppState::Detail { .. } => app
            .nav_stack
            .iter()
            .rev()
            .find(|s| !matches!(s, AppState::Detail { .. } | AppState::Search)),
    }
}

/// Render the main content area based on current state
fn render_content(frame: &mut Frame, area: Rect, app: &App) {
    match &app.state {
        AppState::Home => browser::render_home(frame, area, app),
        AppState::Movies => browser::render_feed(frame, area, &app.movies),
        AppState::TvShows => browser::render_feed(frame, area, &app.tv),
        AppState::MyList => mylist::render_my_list(frame, area, app),
        AppState::Search => search::render_search(frame, area, app),
        AppState::Detail { .. } => detail::render_detail(frame, area, app),
    }
}

/// Centered loading or error message
pub fn render_loading(frame: &mut Frame, area: Rect, loading: &LoadingState) {
    let line = match loading {
        LoadingState::Loading(msg) => Line::from(Span::styled(
            msg.clone().unwrap_or_else(|| "Loading...".into()),
            Theme::loading(),
        )),
        LoadingState::Error(msg) => Line::from(Span::styled(msg.clone(), Theme::error())),
        LoadingState::Idle => Line::from(""),
    };

    let y = area.y + area.height / 2;
    let centered = Rect {
        x: area.x,
        y,
        width: area.width,
        height: 1.min(area.height),
    };
    frame.render_widget(Paragraph::new(line).alignment(Alignment::Center), centered);
}

/// Render status bar at bottom
fn render_status_bar(frame: &mut Frame, area: Rect, app: &App) {
    let mode_indicator = match app.input_mode {
        InputMode::Normal => Span::styled(" NORMAL ", Theme::highlighted()),
        InputMode::Editing => Span::styled(" INSERT ", Theme::badge_top_ten()),
    };

    let state_indicator = Span::styled(
        format!(" {} ", app.state.label().to_uppercase()),
        Theme::dimmed(),
    );

    let help = match (&app.state, &app.input_mode) {
        (_, InputMode::Editing) => " type to search  Tab:filter  S-Tab:sort  Enter:done  Esc:cancel ",
        (AppState::Home, _) => " ←↑↓→:move  Enter:open  m:add  i:info  a:list  u:mute  v:video  q:quit ",
        (AppState::Movies | AppState::TvShows, _) => " ←↑↓→:move  Enter:open  m:add  r:retry  q:quit ",
        (AppState::MyList, _) => " ↑↓:move  Enter:open  d:remove  C:clear  Esc:back ",
        (AppState::Search, _) => " /:edit  f:filter  o:sort  n:more  m:add  Enter:open  Esc:back ",
        (AppState::Detail { .. }, _) => " m:my list  ←→:season  ↑↓:move  u:mute  v:video  Esc:back ",
    };

    let status_line = Line::from(vec![
        mode_indicator,
        state_indicator,
        Span::raw("│"),
        Span::styled(help, Theme::keybind_desc()),
        Span::styled(" p:profile", Theme::keybind_desc()),
    ]);

    frame.render_widget(Paragraph::new(status_line).style(Theme::status_bar()), area);
}
