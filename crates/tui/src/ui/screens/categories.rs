use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    widgets::{Cell, Paragraph, Row, Table, TableState},
};

use budget_client::Route;

use crate::{
    app::AppState,
    ui::{
        components::card::Card,
        screens::{self, EmptyText},
        theme::Theme,
    },
};

const EMPTY: EmptyText = EmptyText {
    title: "You don't have any categories yet",
    hint: "Add a category to group your transactions",
};

pub fn render(frame: &mut Frame<'_>, area: Rect, state: &AppState) {
    let theme = Theme::default();
    let Route::Categories(list) = state.route() else {
        return;
    };
    let view = &state.categories;

    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Min(0),
            Constraint::Length(1),
        ])
        .split(area);
    frame.render_widget(Paragraph::new(screens::filter_summary(list, &theme)), layout[0]);

    let inner = Card::new("Categories", &theme)
        .badge(view.page.value().map(|page| page.total))
        .refreshing(view.page.is_loading())
        .render_frame(frame, layout[1]);
    let Some(page) =
        screens::ready_or_placeholder(frame, inner, &view.page, "Failed to load categories", &theme)
    else {
        return;
    };

    if page.items.is_empty() {
        screens::render_empty(frame, inner, &EMPTY, &theme);
    } else {
        let rows = page.items.iter().map(|category| {
            Row::new([
                Cell::from(category.name.as_str()),
                Cell::from(category.description.as_deref().unwrap_or("-")),
                Cell::from(
                    category
                        .created_at
                        .map(|at| at.format("%Y-%m-%d").to_string())
                        .unwrap_or_default(),
                ),
            ])
        });
        let table = Table::new(
            rows,
            [
                Constraint::Length(24),
                Constraint::Min(20),
                Constraint::Length(12),
            ],
        )
        .header(Row::new(["Name", "Description", "Created"]).style(Style::default().fg(theme.dim)))
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
            state.page_size,
            view.page.is_loading(),
            &theme,
        )),
        layout[2],
    );
}
