use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Paragraph, Wrap},
};

use api_types::stats::{ActivityTrend, BehaviorInsights};

use crate::{
    app::AppState,
    ui::{
        components::card::{Card, StatCard},
        screens::{self, EmptyText},
        theme::Theme,
    },
};

const NO_INSIGHTS: EmptyText = EmptyText {
    title: "No insights available.",
    hint: "Create some items to see your behavior patterns!",
};

pub fn render(frame: &mut Frame<'_>, area: Rect, state: &AppState) {
    let theme = Theme::default();
    let Some(insights) = screens::ready_or_placeholder(
        frame,
        area,
        &state.insights,
        "Failed to load insights",
        &theme,
    ) else {
        return;
    };
    if insights.total_items == 0 {
        screens::render_empty(frame, area, &NO_INSIGHTS, &theme);
        return;
    }

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(4),
            Constraint::Length(7),
            Constraint::Min(0),
        ])
        .split(area);
    render_summary(frame, rows[0], insights, &theme);
    render_patterns(frame, rows[1], insights, &theme);

    let tags = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(rows[2]);
    render_tags(
        frame,
        tags[0],
        "Your Top Tags",
        &insights.top_tags,
        "No tags yet",
        &theme,
    );
    render_tags(
        frame,
        tags[1],
        "Predicted Tags for Your Next Item",
        &insights.predicted_next_tags,
        "Create more items to get predictions!",
        &theme,
    );
}

fn render_summary(frame: &mut Frame<'_>, area: Rect, insights: &BehaviorInsights, theme: &Theme) {
    let cards = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Ratio(1, 3); 3])
        .split(area);
    StatCard::new("Total items", insights.total_items.to_string(), theme)
        .subtitle("Activity Summary")
        .render(frame, cards[0]);
    StatCard::new("Total comments", insights.total_comments.to_string(), theme)
        .render(frame, cards[1]);
    StatCard::new(
        "Items per day",
        format!("{:.1}", insights.average_items_per_day),
        theme,
    )
    .subtitle("average")
    .render(frame, cards[2]);
}

fn trend_color(trend: ActivityTrend, theme: &Theme) -> Color {
    match trend {
        ActivityTrend::Increasing => theme.positive,
        ActivityTrend::Decreasing => theme.negative,
        ActivityTrend::Stable => Color::Blue,
    }
}

fn render_patterns(frame: &mut Frame<'_>, area: Rect, insights: &BehaviorInsights, theme: &Theme) {
    let inner = Card::new("Activity Patterns", theme).render_frame(frame, area);
    let label = |text: &'static str| Span::styled(format!("{text:<18}"), Style::default().fg(theme.dim));
    let lines = vec![
        Line::from(vec![
            label("Most Active Hour"),
            Span::raw(insights.most_active_window()),
        ]),
        Line::from(vec![
            label("Most Active Day"),
            Span::raw(insights.most_active_day_name().unwrap_or("-")),
        ]),
        Line::from(vec![
            label("Activity Trend"),
            Span::styled(
                insights.activity_trend.as_str().to_uppercase(),
                Style::default()
                    .fg(trend_color(insights.activity_trend, theme))
                    .add_modifier(Modifier::BOLD),
            ),
        ]),
    ];
    frame.render_widget(Paragraph::new(lines), inner);
}

fn render_tags(
    frame: &mut Frame<'_>,
    area: Rect,
    title: &str,
    tags: &[String],
    empty: &'static str,
    theme: &Theme,
) {
    let inner = Card::new(title, theme).render_frame(frame, area);
    let line = if tags.is_empty() {
        Line::styled(empty, Style::default().fg(theme.dim))
    } else {
        let mut spans = Vec::with_capacity(tags.len() * 2);
        for tag in tags {
            spans.push(Span::styled(format!("#{tag}"), Style::default().fg(theme.accent)));
            spans.push(Span::raw("  "));
        }
        Line::from(spans)
    };
    frame.render_widget(Paragraph::new(line).wrap(Wrap { trim: true }), inner);
}
