use ratatui::{
    Frame,
    layout::Rect,
    style::{Color, Style},
    symbols,
    text::Span,
    widgets::{Axis, Chart, Dataset, GraphType},
};

use crate::ui::theme::Theme;

/// A horizontal bar like `████████░░░░` for `value` out of `max`.
#[must_use]
pub fn ascii_bar(value: f64, max: f64, width: usize) -> String {
    if max <= 0.0 || !value.is_finite() {
        return "░".repeat(width);
    }

    let ratio = (value / max).clamp(0.0, 1.0);
    let filled = ((ratio * width as f64).round() as usize).min(width);
    let empty = width.saturating_sub(filled);

    format!("{}{}", "█".repeat(filled), "░".repeat(empty))
}

/// `value` as a percentage of `total`, `0.0` when there is no total.
#[must_use]
pub fn share(value: f64, total: f64) -> f64 {
    if total <= 0.0 {
        return 0.0;
    }
    (value / total * 100.0).clamp(0.0, 100.0)
}

/// One line of a trend chart.
pub struct Series<'a> {
    pub name: &'a str,
    pub color: Color,
    pub points: Vec<(f64, f64)>,
}

/// Y bounds covering every point, always including zero.
#[must_use]
pub fn value_bounds(series: &[Series<'_>]) -> [f64; 2] {
    let (min, max) = series
        .iter()
        .flat_map(|s| s.points.iter().map(|(_, y)| *y))
        .fold((0.0_f64, 0.0_f64), |(min, max), y| (min.min(y), max.max(y)));
    if min == max { [min, min + 1.0] } else { [min, max] }
}

/// Line chart with one x step per label.
pub fn render_trend_chart(
    frame: &mut Frame<'_>,
    area: Rect,
    series: &[Series<'_>],
    x_labels: Vec<String>,
    theme: &Theme,
) {
    let datasets = series
        .iter()
        .map(|s| {
            Dataset::default()
                .name(s.name.to_string())
                .marker(symbols::Marker::Braille)
                .graph_type(GraphType::Line)
                .style(Style::default().fg(s.color))
                .data(&s.points)
        })
        .collect::<Vec<_>>();

    let [low, high] = value_bounds(series);
    let x_max = x_labels.len().saturating_sub(1).max(1) as f64;
    let y_labels = [low, (low + high) / 2.0, high]
        .into_iter()
        .map(|value| Span::styled(super::money::compact(value), Style::default().fg(theme.dim)))
        .collect::<Vec<_>>();
    let x_labels = x_labels
        .into_iter()
        .map(|label| Span::styled(label, Style::default().fg(theme.dim)))
        .collect::<Vec<_>>();

    let chart = Chart::new(datasets)
        .x_axis(
            Axis::default()
                .style(Style::default().fg(theme.border))
                .bounds([0.0, x_max])
                .labels(x_labels),
        )
        .y_axis(
            Axis::default()
                .style(Style::default().fg(theme.border))
                .bounds([low, high])
                .labels(y_labels),
        );

    frame.render_widget(chart, area);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bar_fills_proportionally() {
        assert_eq!(ascii_bar(5.0, 10.0, 4), "██░░");
        assert_eq!(ascii_bar(20.0, 10.0, 3), "███");
        assert_eq!(ascii_bar(1.0, 0.0, 2), "░░");
    }

    #[test]
    fn share_handles_empty_totals() {
        assert_eq!(share(25.0, 100.0), 25.0);
        assert_eq!(share(3.0, 0.0), 0.0);
    }

    #[test]
    fn bounds_include_zero_and_negative_net() {
        let series = [
            Series {
                name: "income",
                color: Color::Green,
                points: vec![(0.0, 300.0), (1.0, 120.0)],
            },
            Series {
                name: "net",
                color: Color::Blue,
                points: vec![(0.0, -50.0), (1.0, 20.0)],
            },
        ];
        assert_eq!(value_bounds(&series), [-50.0, 300.0]);
        assert_eq!(value_bounds(&[]), [0.0, 1.0]);
    }
}
