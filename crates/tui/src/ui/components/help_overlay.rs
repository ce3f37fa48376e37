use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::Style,
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
};

use budget_client::Route;

use crate::{
    app::{AppState, Overlay},
    ui::{
        components::{centered_rect, tabs},
        theme::Theme,
    },
};

pub fn render(frame: &mut Frame<'_>, area: Rect, state: &AppState) {
    if !matches!(state.overlay, Overlay::Help) {
        return;
    }

    let theme = Theme::default();
    let popup = centered_rect(70, 70, area);
    frame.render_widget(Clear, popup);
    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Min(0)])
        .split(popup);

    let title = Line::from(vec![
        Span::styled("Help", Style::default().fg(theme.accent)),
        Span::raw("  "),
        Span::styled("Esc", Style::default().fg(theme.dim)),
        Span::raw(" close"),
    ]);
    frame.render_widget(
        Paragraph::new(title).block(
            Block::default()
                .title("Keybinds")
                .borders(Borders::ALL)
                .border_style(Style::default().fg(theme.accent)),
        ),
        layout[0],
    );

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(theme.accent));
    frame.render_widget(
        Paragraph::new(help_lines(state.route(), &theme)).block(block),
        layout[1],
    );
}

fn keys(pairs: &[(&'static str, &'static str)], theme: &Theme) -> Line<'static> {
    let mut spans = Vec::new();
    for (key, action) in pairs {
        spans.push(Span::styled(*key, Style::default().fg(theme.accent)));
        spans.push(Span::raw(format!(" {action}  ")));
    }
    Line::from(spans)
}

fn help_lines(route: &Route, theme: &Theme) -> Vec<Line<'static>> {
    let mut lines = vec![Line::from(tabs::tab_shortcuts(theme))];
    lines.push(keys(
        &[("?", "help"), ("r", "refresh"), ("b", "back"), ("q", "quit")],
        theme,
    ));
    lines.push(Line::raw(""));

    match route {
        Route::Dashboard => {
            lines.push(Line::from("Dashboard: spending by category and monthly trends."));
        }
        Route::Transactions(_) | Route::Categories(_) => {
            lines.push(Line::from(format!("{}:", route.title())));
            lines.push(keys(&[("j/k", "select"), ("n/p", "page"), ("/", "filters")], theme));
            lines.push(keys(&[("a", "add"), ("e", "edit"), ("x", "delete")], theme));
        }
        Route::Items(_) => {
            lines.push(Line::from("Items:"));
            lines.push(keys(&[("j/k", "select"), ("n/p", "page"), ("Enter", "comments")], theme));
            lines.push(keys(
                &[("a", "comment"), ("e", "edit own"), ("x", "delete own"), ("Esc", "close")],
                theme,
            ));
        }
        Route::Analytics => {
            lines.push(Line::from("Analytics: behavior insights from your items."));
        }
    }

    lines.push(Line::raw(""));
    lines.push(Line::from("Forms:"));
    lines.push(keys(&[("Tab", "next field"), ("←/→", "change"), ("Enter", "save")], theme));
    lines.push(keys(&[("Ctrl+R", "reset filters"), ("Esc", "cancel")], theme));

    lines
}
