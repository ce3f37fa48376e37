use chrono::NaiveDate;
use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::Style,
    text::{Line, Span},
    widgets::Paragraph,
};

use api_types::stats::{CategorySpending, MonthlyTrend};

use crate::{
    app::AppState,
    ui::{
        components::{
            card::{Card, StatCard},
            charts::{self, Series},
            money,
        },
        screens::{self, EmptyText},
        theme::Theme,
    },
};

const BAR_WIDTH: usize = 20;

pub fn render(frame: &mut Frame<'_>, area: Rect, state: &AppState) {
    let theme = Theme::default();
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(4), Constraint::Min(0)])
        .split(area);
    render_summary(frame, rows[0], state, &theme);

    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(45), Constraint::Percentage(55)])
        .split(rows[1]);
    render_spending(frame, columns[0], state, &theme);
    render_trends(frame, columns[1], state, &theme);
}

fn render_summary(frame: &mut Frame<'_>, area: Rect, state: &AppState, theme: &Theme) {
    let cards = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Ratio(1, 3); 3])
        .split(area);

    let spending = state.dashboard.spending.value();
    let total = spending.map(|rows| rows.iter().map(|row| row.total_amount).sum::<f64>());
    let count = spending.map(|rows| rows.iter().map(|row| row.transaction_count).sum::<u64>());
    let latest = state
        .dashboard
        .trends
        .value()
        .and_then(|trends| trends.last().cloned());

    StatCard::amount("Total spent", total, theme)
        .subtitle(count.map_or(String::new(), |n| format!("{n} transactions")))
        .render(frame, cards[0]);
    StatCard::amount("Income this month", latest.as_ref().map(|t| t.income), theme)
        .subtitle(latest.as_ref().map_or(String::new(), month_label))
        .render(frame, cards[1]);
    StatCard::amount("Net this month", latest.as_ref().map(|t| t.net), theme)
        .subtitle(latest.as_ref().map_or(String::new(), |t| {
            format!("expense {}", money::format_amount(t.expense))
        }))
        .render(frame, cards[2]);
}

fn render_spending(frame: &mut Frame<'_>, area: Rect, state: &AppState, theme: &Theme) {
    let inner = Card::new("Category Spending", theme).render_frame(frame, area);
    let Some(rows) = screens::ready_or_placeholder(
        frame,
        inner,
        &state.dashboard.spending,
        "Failed to load spending data",
        theme,
    ) else {
        return;
    };
    if rows.is_empty() {
        screens::render_empty(
            frame,
            inner,
            &EmptyText {
                title: "No spending data yet.",
                hint: "Expenses show up here by category",
            },
            theme,
        );
        return;
    }

    frame.render_widget(Paragraph::new(spending_lines(rows, theme)), inner);
}

fn spending_lines(rows: &[CategorySpending], theme: &Theme) -> Vec<Line<'static>> {
    let total: f64 = rows.iter().map(|row| row.total_amount).sum();
    let max = rows.iter().map(|row| row.total_amount).fold(0.0, f64::max);
    let count: u64 = rows.iter().map(|row| row.transaction_count).sum();

    let mut lines = Vec::with_capacity(rows.len() * 2 + 2);
    for row in rows {
        lines.push(Line::from(vec![
            Span::styled(format!("{:<18}", row.category_name), Style::default().fg(theme.text)),
            Span::raw(format!("{:>12}", money::format_amount(row.total_amount))),
            Span::styled(
                format!("  {:.1}%", charts::share(row.total_amount, total)),
                Style::default().fg(theme.dim),
            ),
        ]));
        lines.push(Line::styled(
            charts::ascii_bar(row.total_amount, max, BAR_WIDTH),
            Style::default().fg(theme.accent),
        ));
    }
    lines.push(Line::raw(""));
    lines.push(Line::styled(
        format!("Total spent: {} / {count} transactions", money::format_amount(total)),
        Style::default().fg(theme.dim),
    ));
    lines
}

fn month_label(trend: &MonthlyTrend) -> String {
    NaiveDate::from_ymd_opt(trend.year, trend.month, 1)
        .map(|date| date.format("%b %Y").to_string())
        .unwrap_or_else(|| format!("{}-{:02}", trend.year, trend.month))
}

fn render_trends(frame: &mut Frame<'_>, area: Rect, state: &AppState, theme: &Theme) {
    let inner = Card::new("Monthly Trends (last 6 months)", theme).render_frame(frame, area);
    let Some(trends) = screens::ready_or_placeholder(
        frame,
        inner,
        &state.dashboard.trends,
        "Failed to load trends data",
        theme,
    ) else {
        return;
    };
    if trends.is_empty() {
        screens::render_empty(
            frame,
            inner,
            &EmptyText {
                title: "No trend data yet.",
                hint: "Income and expenses show up here by month",
            },
            theme,
        );
        return;
    }

    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(6),
            Constraint::Length(trends.len() as u16 + 1),
        ])
        .split(inner);

    let points = |value: fn(&MonthlyTrend) -> f64| {
        trends
            .iter()
            .enumerate()
            .map(|(i, trend)| (i as f64, value(trend)))
            .collect::<Vec<_>>()
    };
    let series = [
        Series {
            name: "income",
            color: theme.positive,
            points: points(|t| t.income),
        },
        Series {
            name: "expense",
            color: theme.negative,
            points: points(|t| t.expense),
        },
        Series {
            name: "net",
            color: theme.accent,
            points: points(|t| t.net),
        },
    ];
    let labels = trends
        .iter()
        .map(|trend| {
            NaiveDate::from_ymd_opt(trend.year, trend.month, 1)
                .map(|date| date.format("%b").to_string())
                .unwrap_or_default()
        })
        .collect();
    charts::render_trend_chart(frame, layout[0], &series, labels, theme);

    let mut lines = vec![Line::styled(
        format!("{:<10}{:>12}{:>12}{:>12}", "Month", "Income", "Expense", "Net"),
        Style::default().fg(theme.dim),
    )];
    for trend in trends.iter() {
        lines.push(Line::from(vec![
            Span::raw(format!("{:<10}", month_label(trend))),
            Span::styled(
                format!("{:>12}", money::format_amount(trend.income)),
                Style::default().fg(theme.positive),
            ),
            Span::styled(
                format!("{:>12}", money::format_amount(trend.expense)),
                Style::default().fg(theme.negative),
            ),
            Span::styled(
                format!("{:>12}", money::format_amount(trend.net)),
                money::signed_style(trend.net, theme),
            ),
        ]));
    }
    frame.render_widget(Paragraph::new(lines), layout[1]);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn spending_shows_share_and_totals() {
        let rows = vec![
            CategorySpending {
                category_id: 1,
                category_name: "Food".into(),
                total_amount: 75.0,
                transaction_count: 3,
            },
            CategorySpending {
                category_id: 2,
                category_name: "Rent".into(),
                total_amount: 25.0,
                transaction_count: 1,
            },
        ];
        let lines = spending_lines(&rows, &Theme::default());
        let text: Vec<String> = lines
            .iter()
            .map(|line| line.spans.iter().map(|span| span.content.as_ref()).collect())
            .collect();
        assert!(text[0].starts_with("Food"));
        assert!(text[0].ends_with("75.0%"));
        assert!(text[2].ends_with("25.0%"));
        assert_eq!(text.last().map(String::as_str), Some("Total spent: 100 / 4 transactions"));
    }

    #[test]
    fn months_render_by_name() {
        let trend = MonthlyTrend {
            year: 2024,
            month: 3,
            income: 0.0,
            expense: 0.0,
            net: 0.0,
        };
        assert_eq!(month_label(&trend), "Mar 2024");
    }
}
