use ratatui::{
    Frame,
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Paragraph},
};

use crate::ui::{components::money, theme::Theme};

/// Panel around one block of server data. The title carries a count badge
/// and a refresh marker while a newer copy loads behind the shown one.
pub struct Card<'a> {
    title: String,
    badge: Option<String>,
    refreshing: bool,
    focused: bool,
    theme: &'a Theme,
}

impl<'a> Card<'a> {
    pub fn new(title: impl Into<String>, theme: &'a Theme) -> Self {
        Self {
            title: title.into(),
            badge: None,
            refreshing: false,
            focused: false,
            theme,
        }
    }

    pub fn focused(mut self, focused: bool) -> Self {
        self.focused = focused;
        self
    }

    /// Row count shown after the title, e.g. `(42)`.
    pub fn badge(mut self, count: Option<u64>) -> Self {
        self.badge = count.map(|count| format!("({count})"));
        self
    }

    pub fn refreshing(mut self, refreshing: bool) -> Self {
        self.refreshing = refreshing;
        self
    }

    fn title_line(&self) -> Line<'static> {
        let mut spans = vec![Span::styled(
            format!(" {} ", self.title),
            Style::default().fg(self.theme.accent),
        )];
        if let Some(badge) = &self.badge {
            spans.push(Span::styled(
                format!("{badge} "),
                Style::default().fg(self.theme.dim),
            ));
        }
        if self.refreshing {
            spans.push(Span::styled("↻ ", Style::default().fg(self.theme.warning)));
        }
        Line::from(spans)
    }

    pub fn block(&self) -> Block<'static> {
        let border = if self.focused {
            self.theme.border_focused
        } else {
            self.theme.border
        };
        Block::default()
            .title(self.title_line())
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(border))
    }

    /// Draws the frame and returns the area inside it.
    pub fn render_frame(&self, frame: &mut Frame<'_>, area: Rect) -> Rect {
        let block = self.block();
        let inner = block.inner(area);
        frame.render_widget(block, area);
        inner
    }
}

/// One headline figure. Amounts are coloured by sign; a missing value
/// renders as `-` until its query lands.
pub struct StatCard<'a> {
    title: &'a str,
    value: Option<String>,
    style: Style,
    subtitle: Option<String>,
    theme: &'a Theme,
}

impl<'a> StatCard<'a> {
    pub fn new(title: &'a str, value: impl Into<String>, theme: &'a Theme) -> Self {
        Self {
            title,
            value: Some(value.into()),
            style: Style::default().fg(theme.text),
            subtitle: None,
            theme,
        }
    }

    pub fn amount(title: &'a str, amount: Option<f64>, theme: &'a Theme) -> Self {
        Self {
            title,
            value: amount.map(money::format_amount),
            style: amount.map_or(Style::default().fg(theme.dim), |value| {
                money::signed_style(value, theme)
            }),
            subtitle: None,
            theme,
        }
    }

    pub fn subtitle(mut self, subtitle: impl Into<String>) -> Self {
        self.subtitle = Some(subtitle.into()).filter(|text| !text.is_empty());
        self
    }

    fn lines(&self) -> Vec<Line<'static>> {
        let value = self.value.clone().unwrap_or_else(|| "-".to_string());
        let mut lines = vec![Line::styled(value, self.style.add_modifier(Modifier::BOLD))];
        if let Some(subtitle) = &self.subtitle {
            lines.push(Line::styled(subtitle.clone(), Style::default().fg(self.theme.dim)));
        }
        lines
    }

    pub fn render(&self, frame: &mut Frame<'_>, area: Rect) {
        let inner = Card::new(self.title, self.theme).render_frame(frame, area);
        frame.render_widget(Paragraph::new(self.lines()), inner);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text(line: &Line<'_>) -> String {
        line.spans.iter().map(|span| span.content.as_ref()).collect()
    }

    #[test]
    fn title_shows_count_and_refresh_marker() {
        let theme = Theme::default();
        let card = Card::new("Transactions", &theme).badge(Some(42));
        assert_eq!(text(&card.title_line()), " Transactions (42) ");

        let card = card.refreshing(true);
        assert!(text(&card.title_line()).ends_with("↻ "));
    }

    #[test]
    fn missing_amount_renders_as_dash() {
        let theme = Theme::default();
        let lines = StatCard::amount("Net", None, &theme).subtitle("").lines();
        assert_eq!(lines.len(), 1);
        assert_eq!(text(&lines[0]), "-");

        let lines = StatCard::amount("Net", Some(-1250.0), &theme).lines();
        assert_eq!(text(&lines[0]), "-1,250");
    }
}
