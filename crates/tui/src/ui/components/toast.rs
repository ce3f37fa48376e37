use ratatui::{
    Frame,
    layout::Rect,
    style::Style,
    text::Line,
    widgets::{Block, BorderType, Borders, Clear, Paragraph},
};

use budget_client::NoticeLevel;

use crate::{app::Toast, ui::theme::Theme};

/// Bottom-right notification; expires on its own.
pub fn render(frame: &mut Frame<'_>, area: Rect, toast: Option<&Toast>) {
    let Some(toast) = toast else {
        return;
    };
    let theme = Theme::default();
    let message = toast.notice.message.as_str();
    let width = (message.chars().count() + 4).min(area.width as usize) as u16;
    let height = 3u16;
    let rect = Rect {
        x: area.x + area.width.saturating_sub(width),
        y: area.y.saturating_add(area.height.saturating_sub(height + 1)),
        width,
        height: height.min(area.height),
    };

    let style = match toast.notice.level {
        NoticeLevel::Info => Style::default().fg(theme.text),
        NoticeLevel::Success => Style::default().fg(theme.positive),
        NoticeLevel::Error => Style::default().fg(theme.error),
    };

    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(style);
    frame.render_widget(Clear, rect);
    frame.render_widget(Paragraph::new(Line::from(message)).style(style).block(block), rect);
}
