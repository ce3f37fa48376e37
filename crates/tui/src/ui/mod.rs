pub mod components;
pub mod keymap;
pub mod screens;

mod terminal;
mod theme;

use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::Style,
    text::{Line, Span},
    widgets::Paragraph,
};

use budget_client::Route;

use crate::app::AppState;

pub use terminal::{AppTerminal as Terminal, restore_terminal, setup_terminal};
pub use theme::Theme;

pub fn render(frame: &mut Frame<'_>, state: &AppState) {
    let area = frame.area();
    let theme = Theme::default();

    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // Info bar
            Constraint::Length(2), // Tab bar
            Constraint::Min(0),    // Main content
            Constraint::Length(1), // Bottom bar
        ])
        .split(area);

    render_info_bar(frame, layout[0], state, &theme);
    components::tabs::render_tabs(frame, layout[1], state.route(), &theme);

    let content = layout[2];
    match state.route() {
        Route::Dashboard => screens::dashboard::render(frame, content, state),
        Route::Transactions(_) => screens::transactions::render(frame, content, state),
        Route::Categories(_) => screens::categories::render(frame, content, state),
        Route::Items(_) => screens::items::render(frame, content, state),
        Route::Analytics => screens::analytics::render(frame, content, state),
    }

    render_bottom_bar(frame, layout[3], state, &theme);
    components::dialog::render(frame, area, state);
    components::help_overlay::render(frame, area, state);
    components::toast::render(frame, area, state.toast.as_ref());
}

fn busy(state: &AppState) -> bool {
    match state.route() {
        Route::Dashboard => {
            state.dashboard.spending.is_loading() || state.dashboard.trends.is_loading()
        }
        Route::Transactions(_) => state.transactions.page.is_loading(),
        Route::Categories(_) => state.categories.page.is_loading(),
        Route::Items(_) => {
            state.items.page.is_loading()
                || state
                    .items
                    .detail
                    .as_ref()
                    .is_some_and(|detail| detail.comments.is_loading())
        }
        Route::Analytics => state.insights.is_loading(),
    }
}

fn render_info_bar(frame: &mut Frame<'_>, area: Rect, state: &AppState, theme: &Theme) {
    let (status, status_style) = if busy(state) {
        ("Loading", Style::default().fg(theme.warning))
    } else {
        ("Idle", Style::default().fg(theme.positive))
    };

    let line = Line::from(vec![
        Span::styled("Location", Style::default().fg(theme.dim)),
        Span::raw(format!(": {}  ", state.route())),
        Span::styled("API", Style::default().fg(theme.dim)),
        Span::raw(format!(": {}  ", state.base_url)),
        Span::styled(status, status_style),
    ]);

    frame.render_widget(Paragraph::new(line), area);
}

fn render_bottom_bar(frame: &mut Frame<'_>, area: Rect, state: &AppState, theme: &Theme) {
    let mut parts = components::tabs::tab_shortcuts(theme);

    let context = components::hints::context_hints(state);
    if !context.is_empty() {
        parts.push(components::hints::hint_separator(theme));
        parts.extend(components::hints::hints_to_spans(&context, theme));
    }

    parts.push(components::hints::hint_separator(theme));
    parts.push(Span::styled("?", Style::default().fg(theme.accent)));
    parts.push(Span::raw(" help  "));
    parts.push(Span::styled("q", Style::default().fg(theme.accent)));
    parts.push(Span::raw(" quit"));

    frame.render_widget(Paragraph::new(Line::from(parts)), area);
}
