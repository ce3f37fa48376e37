use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::Span,
    widgets::{Cell, Paragraph, Row, Table, TableState},
};

use api_types::transaction::{PaymentMethod, Transaction};
use budget_client::Route;

use crate::{
    app::AppState,
    ui::{
        components::{card::Card, money},
        screens::{self, EmptyText},
        theme::Theme,
    },
};

const EMPTY: EmptyText = EmptyText {
    title: "You don't have any transactions yet",
    hint: "Add a new transaction to get started",
};

pub fn render(frame: &mut Frame<'_>, area: Rect, state: &AppState) {
    let theme = Theme::default();
    let Route::Transactions(list) = state.route() else {
        return;
    };
    let view = &state.transactions;

    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Min(0),
            Constraint::Length(1),
        ])
        .split(area);
    frame.render_widget(Paragraph::new(screens::filter_summary(list, &theme)), layout[0]);

    let inner = Card::new("Transactions", &theme)
        .badge(view.page.value().map(|page| page.total))
        .refreshing(view.page.is_loading())
        .render_frame(frame, layout[1]);
    let Some(page) =
        screens::ready_or_placeholder(frame, inner, &view.page, "Failed to load transactions", &theme)
    else {
        return;
    };

    if page.items.is_empty() {
        screens::render_empty(frame, inner, &EMPTY, &theme);
    } else {
        let rows = page.items.iter().map(|tx| row(tx, state, &theme));
        let header = Row::new(["Date", "Type", "Category", "Amount", "Payment", "Description"])
            .style(Style::default().fg(theme.dim));
        let table = Table::new(
            rows,
            [
                Constraint::Length(12),
                Constraint::Length(9),
                Constraint::Length(18),
                Constraint::Length(14),
                Constraint::Length(8),
                Constraint::Min(10),
            ],
        )
        .header(header)
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

fn row<'a>(tx: &'a Transaction, state: &'a AppState, theme: &Theme) -> Row<'a> {
    let category = tx
        .category
        .as_ref()
        .map(|category| category.name.clone())
        .or_else(|| state.category_name(tx.category_id).map(str::to_string))
        .unwrap_or_else(|| format!("#{}", tx.category_id));
    let payment = tx.payment_method.map_or("-", PaymentMethod::as_str);

    Row::new([
        Cell::from(tx.transaction_date.format("%Y-%m-%d").to_string()),
        Cell::from(tx.transaction_type.as_str()),
        Cell::from(category),
        Cell::from(money::styled_amount(tx.amount, tx.transaction_type, theme)),
        Cell::from(payment),
        Cell::from(Span::styled(
            tx.description.as_deref().unwrap_or(""),
            Style::default().fg(theme.text),
        )),
    ])
}
