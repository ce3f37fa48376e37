pub mod analytics;
pub mod categories;
pub mod dashboard;
pub mod items;
pub mod transactions;

use std::sync::Arc;

use ratatui::{
    Frame,
    layout::{Alignment, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
};

use budget_client::{ListState, query::page_count};

use crate::{app::Remote, ui::theme::Theme};

/// What an empty list says, as a title and a hint.
pub struct EmptyText {
    pub title: &'static str,
    pub hint: &'static str,
}

/// Returns the value to draw, or draws the loading or error state in its
/// place.
pub fn ready_or_placeholder<'a, T>(
    frame: &mut Frame<'_>,
    area: Rect,
    remote: &'a Remote<T>,
    failed: &str,
    theme: &Theme,
) -> Option<&'a Arc<T>> {
    if let Some(value) = remote.value() {
        return Some(value);
    }

    let lines = match remote {
        Remote::Failed(message) => vec![
            Line::styled(failed.to_string(), Style::default().fg(theme.error)),
            Line::styled(message.clone(), Style::default().fg(theme.dim)),
            Line::raw(""),
            Line::from(vec![
                Span::raw("Press "),
                Span::styled("r", Style::default().fg(theme.accent)),
                Span::raw(" to retry."),
            ]),
        ],
        _ => vec![Line::styled("Loading...", Style::default().fg(theme.dim))],
    };
    frame.render_widget(centered_lines(lines, area), area);
    None
}

pub fn render_empty(frame: &mut Frame<'_>, area: Rect, text: &EmptyText, theme: &Theme) {
    let lines = vec![
        Line::styled(
            text.title,
            Style::default().fg(theme.text).add_modifier(Modifier::BOLD),
        ),
        Line::styled(text.hint, Style::default().fg(theme.dim)),
    ];
    frame.render_widget(centered_lines(lines, area), area);
}

fn centered_lines(mut lines: Vec<Line<'static>>, area: Rect) -> Paragraph<'static> {
    let pad = usize::from(area.height.saturating_sub(lines.len() as u16) / 2);
    let mut padded = vec![Line::raw(""); pad];
    padded.append(&mut lines);
    Paragraph::new(padded).alignment(Alignment::Center)
}

/// `Page 2 of 5 · 93 total`, with a marker while a refetch is running.
pub fn page_footer(
    list: &ListState,
    total: u64,
    page_size: u64,
    loading: bool,
    theme: &Theme,
) -> Line<'static> {
    let pages = page_count(total, page_size);
    let mut spans = vec![Span::styled(
        format!("Page {} of {pages} · {total} total", list.page()),
        Style::default().fg(theme.dim),
    )];
    if loading {
        spans.push(Span::styled("  updating...", Style::default().fg(theme.warning)));
    }
    Line::from(spans)
}

/// Active filters as `name=value` pairs, for the line above a list.
pub fn filter_summary(list: &ListState, theme: &Theme) -> Line<'static> {
    let filters = list.filters();
    if filters.is_empty() {
        return Line::styled("No filters", Style::default().fg(theme.dim));
    }
    let mut spans = vec![Span::styled("Filters: ", Style::default().fg(theme.dim))];
    for (i, (name, value)) in filters.iter().enumerate() {
        if i > 0 {
            spans.push(Span::raw("  "));
        }
        spans.push(Span::styled(name.to_string(), Style::default().fg(theme.accent)));
        spans.push(Span::raw(format!("={value}")));
    }
    Line::from(spans)
}

#[cfg(test)]
mod tests {
    use budget_client::query::TRANSACTION_FILTERS;

    use super::*;

    fn text(line: &Line<'_>) -> String {
        line.spans.iter().map(|span| span.content.as_ref()).collect()
    }

    #[test]
    fn footer_counts_pages() {
        let theme = Theme::default();
        let list = ListState::new().with_page(2);
        assert_eq!(text(&page_footer(&list, 93, 20, false, &theme)), "Page 2 of 5 · 93 total");
        assert_eq!(text(&page_footer(&ListState::new(), 0, 20, false, &theme)), "Page 1 of 1 · 0 total");
    }

    #[test]
    fn summary_lists_active_filters() {
        let theme = Theme::default();
        assert_eq!(text(&filter_summary(&ListState::new(), &theme)), "No filters");

        let list = ListState::parse(&TRANSACTION_FILTERS, "transactionType=expense");
        assert_eq!(text(&filter_summary(&list, &theme)), "Filters: transactionType=expense");
    }
}
