use ratatui::{
    Frame,
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
};

use budget_client::Route;

use crate::ui::theme::Theme;

/// Tab labels in the order of the `1`..`5` shortcuts.
pub const TABS: [&str; 5] = ["Dashboard", "Transactions", "Categories", "Items", "Analytics"];

pub fn render_tabs(frame: &mut Frame<'_>, area: Rect, active: &Route, theme: &Theme) {
    let mut spans = vec![Span::raw(" ")];

    for (i, label) in TABS.iter().enumerate() {
        if i > 0 {
            spans.push(Span::raw("  "));
        }
        let number = Span::styled(format!("{} ", i + 1), Style::default().fg(theme.dim));
        if *label == active.title() {
            spans.push(number);
            spans.push(Span::styled("[", Style::default().fg(theme.accent)));
            spans.push(Span::styled(
                *label,
                Style::default()
                    .fg(theme.accent)
                    .add_modifier(Modifier::BOLD),
            ));
            spans.push(Span::styled("]", Style::default().fg(theme.accent)));
        } else {
            spans.push(number);
            spans.push(Span::styled(*label, Style::default().fg(theme.dim)));
        }
    }

    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

pub fn tab_shortcuts(theme: &Theme) -> Vec<Span<'static>> {
    vec![
        Span::styled("1-5", Style::default().fg(theme.accent)),
        Span::raw(" nav"),
    ]
}
