use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Cell, List, ListItem, ListState, Paragraph, Row, Table, TableState, Wrap},
};

use api_types::comment::Comment;
use budget_client::Route;
use uuid::Uuid;

use crate::{
    app::{AppState, ItemDetail},
    ui::{
        components::card::Card,
        screens::{self, EmptyText},
        theme::Theme,
    },
};

const EMPTY: EmptyText = EmptyText {
    title: "You don't have any items yet",
    hint: "Items you create show up here",
};

const NO_COMMENTS: EmptyText = EmptyText {
    title: "No comments yet",
    hint: "Be the first to comment!",
};

const VISIBLE_TAGS: usize = 3;

pub fn render(frame: &mut Frame<'_>, area: Rect, state: &AppState) {
    match &state.items.detail {
        Some(detail) => {
            let columns = Layout::default()
                .direction(Direction::Horizontal)
                .constraints([Constraint::Percentage(45), Constraint::Percentage(55)])
                .split(area);
            render_list(frame, columns[0], state);
            render_detail(frame, columns[1], state, detail);
        }
        None => render_list(frame, area, state),
    }
}

/// First few tags, then a `+N` for the rest.
fn tag_summary(tags: &[String]) -> String {
    if tags.is_empty() {
        return "-".to_string();
    }
    let mut summary = tags
        .iter()
        .take(VISIBLE_TAGS)
        .map(String::as_str)
        .collect::<Vec<_>>()
        .join(", ");
    if tags.len() > VISIBLE_TAGS {
        summary.push_str(&format!(" +{}", tags.len() - VISIBLE_TAGS));
    }
    summary
}

fn render_list(frame: &mut Frame<'_>, area: Rect, state: &AppState) {
    let theme = Theme::default();
    let Route::Items(list) = state.route() else {
        return;
    };
    let view = &state.items;

    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(0), Constraint::Length(1)])
        .split(area);

    let inner = Card::new("Items", &theme)
        .badge(view.page.value().map(|page| page.total))
        .refreshing(view.page.is_loading())
        .focused(view.detail.is_none())
        .render_frame(frame, layout[0]);
    let Some(page) =
        screens::ready_or_placeholder(frame, inner, &view.page, "Failed to load items", &theme)
    else {
        return;
    };

    if page.items.is_empty() {
        screens::render_empty(frame, inner, &EMPTY, &theme);
    } else {
        let rows = page.items.iter().map(|item| {
            Row::new([
                Cell::from(item.title.as_str()),
                Cell::from(item.description.as_deref().unwrap_or("N/A")),
                Cell::from(Span::styled(tag_summary(&item.tags), Style::default().fg(theme.accent))),
            ])
        });
        let table = Table::new(
            rows,
            [
                Constraint::Percentage(30),
                Constraint::Percentage(45),
                Constraint::Percentage(25),
            ],
        )
        .header(Row::new(["Title", "Description", "Tags"]).style(Style::default().fg(theme.dim)))
        .row_highlight_style(
            Style::default()
                .fg(theme.accent)
                .add_modifier(Modifier::BOLD),
        )
        .highlight_symbol("» ");

        let mut table_state = TableState::default().with_selected(Some(view.selected));
        frame.render_stateful_widget(table, inner, &mut table_state);
    }

    frame.render_widget(
        Paragraph::new(screens::page_footer(
            list,
            page.total,
            state.items_page_size,
            view.page.is_loading(),
            &theme,
        )),
        layout[1],
    );
}

fn render_detail(frame: &mut Frame<'_>, area: Rect, state: &AppState, detail: &ItemDetail) {
    let theme = Theme::default();
    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(6), Constraint::Min(0)])
        .split(area);

    let item = &detail.item;
    let inner = Card::new(item.title.as_str(), &theme).render_frame(frame, layout[0]);
    let lines = vec![
        Line::raw(item.description.clone().unwrap_or_else(|| "N/A".to_string())),
        Line::from(vec![
            Span::styled("Tags", Style::default().fg(theme.dim)),
            Span::raw(": "),
            Span::styled(
                if item.tags.is_empty() {
                    "-".to_string()
                } else {
                    item.tags.join(", ")
                },
                Style::default().fg(theme.accent),
            ),
        ]),
    ];
    frame.render_widget(Paragraph::new(lines).wrap(Wrap { trim: true }), inner);

    let count = detail.comments.value().map_or(0, |page| page.items.len());
    let title = format!("Comments ({count})");
    let inner = Card::new(title, &theme)
        .refreshing(detail.comments.is_loading())
        .focused(true)
        .render_frame(frame, layout[1]);
    let Some(page) = screens::ready_or_placeholder(
        frame,
        inner,
        &detail.comments,
        "Failed to load comments",
        &theme,
    ) else {
        return;
    };
    if page.items.is_empty() {
        screens::render_empty(frame, inner, &NO_COMMENTS, &theme);
        return;
    }

    let me = state.current_user.value().map(|user| user.id);
    let entries = page
        .items
        .iter()
        .map(|comment| comment_entry(comment, me, &theme))
        .collect::<Vec<_>>();
    let list = List::new(entries)
        .highlight_style(Style::default().add_modifier(Modifier::BOLD))
        .highlight_symbol("» ");
    let mut list_state = ListState::default().with_selected(Some(detail.selected));
    frame.render_stateful_widget(list, inner, &mut list_state);
}

fn comment_entry(comment: &Comment, me: Option<Uuid>, theme: &Theme) -> ListItem<'static> {
    let author = comment.author_name.clone().unwrap_or_else(|| "Anonymous".to_string());
    let mut header = vec![
        Span::styled(author, Style::default().fg(theme.accent)),
        Span::styled(
            format!("  {}", comment.created_at.format("%Y-%m-%d %H:%M")),
            Style::default().fg(theme.dim),
        ),
    ];
    if comment.is_edited() {
        header.push(Span::styled(" (edited)", Style::default().fg(theme.dim)));
    }
    if me.is_some_and(|id| comment.is_authored_by(id)) {
        header.push(Span::styled("  you", Style::default().fg(theme.positive)));
    }

    ListItem::new(vec![
        Line::from(header),
        Line::raw(format!("  {}", comment.content)),
    ])
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tags(names: &[&str]) -> Vec<String> {
        names.iter().map(|name| name.to_string()).collect()
    }

    #[test]
    fn tags_collapse_after_three() {
        assert_eq!(tag_summary(&[]), "-");
        assert_eq!(tag_summary(&tags(&["a", "b"])), "a, b");
        assert_eq!(tag_summary(&tags(&["a", "b", "c", "d", "e"])), "a, b, c +2");
    }
}
