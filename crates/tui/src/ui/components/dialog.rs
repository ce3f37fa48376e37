//! Modal forms: mutation dialogs and the filter panel.

use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Clear, Paragraph, Wrap},
};

use budget_client::{MutationStatus, ValidationErrors};

use crate::{
    app::{AppState, FieldKind, FieldView, FilterDraft, Overlay},
    ui::{
        components::{centered_fixed, hints},
        theme::Theme,
    },
};

pub fn render(frame: &mut Frame<'_>, area: Rect, state: &AppState) {
    let theme = Theme::default();
    let categories = state.categories_for_pickers();
    match &state.overlay {
        Overlay::Dialog(id) => {
            let dialog = state.dialog(*id);
            let body = Body {
                title: id.title(),
                confirmation: id.confirmation(),
                fields: dialog.editor().fields(categories),
                errors: Some(dialog.errors()),
                status: Some(dialog.status()),
            };
            body.render(frame, area, state.focus, &theme);
        }
        Overlay::Filter(draft) => {
            let title = match draft {
                FilterDraft::Transactions(_) => "Filter Transactions",
                FilterDraft::Categories(_) => "Filter Categories",
            };
            let body = Body {
                title,
                confirmation: None,
                fields: draft.editor().fields(categories),
                errors: None,
                status: None,
            };
            body.render(frame, area, state.focus, &theme);
        }
        Overlay::None | Overlay::Help => {}
    }
}

struct Body<'a> {
    title: &'static str,
    confirmation: Option<&'static str>,
    fields: Vec<FieldView>,
    errors: Option<&'a ValidationErrors>,
    status: Option<&'a MutationStatus>,
}

impl Body<'_> {
    fn render(&self, frame: &mut Frame<'_>, area: Rect, focus: usize, theme: &Theme) {
        let mut lines = Vec::new();

        if let Some(text) = self.confirmation {
            lines.push(Line::raw(""));
            lines.push(Line::styled(text, Style::default().fg(theme.warning)));
        }

        for (idx, field) in self.fields.iter().enumerate() {
            lines.push(field_line(field, idx == focus, theme));
            if let Some(message) = self.errors.and_then(|errors| errors.for_field(field.key)) {
                lines.push(Line::styled(
                    format!("    {message}"),
                    Style::default().fg(theme.error),
                ));
            }
        }

        lines.push(Line::raw(""));
        match self.status {
            Some(MutationStatus::Pending) => {
                lines.push(Line::styled("Saving...", Style::default().fg(theme.dim)));
            }
            Some(MutationStatus::Error(message)) => {
                lines.push(Line::styled(message.clone(), Style::default().fg(theme.error)));
            }
            _ => {}
        }

        let mut footer = if self.confirmation.is_some() {
            vec![
                hints::KeyHint::new("Enter", "confirm"),
                hints::KeyHint::new("Esc", "cancel"),
            ]
        } else if self.status.is_some() {
            vec![
                hints::KeyHint::new("Enter", "save"),
                hints::KeyHint::new("Esc", "cancel"),
            ]
        } else {
            vec![
                hints::KeyHint::new("Enter", "apply"),
                hints::KeyHint::new("Ctrl+R", "reset"),
                hints::KeyHint::new("Esc", "cancel"),
            ]
        };
        if self.fields.iter().any(|field| field.kind == FieldKind::Choice) {
            footer.insert(0, hints::KeyHint::new("←/→", "change"));
        }
        if self.fields.len() > 1 {
            footer.insert(0, hints::KeyHint::new("Tab", "next"));
        }

        let height = (lines.len() as u16 + 4).max(7);
        let popup = centered_fixed(60, height, area);
        frame.render_widget(Clear, popup);

        let block = Block::default()
            .title(format!(" {} ", self.title))
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(theme.border_focused));
        let inner = block.inner(popup);
        frame.render_widget(block, popup);

        let layout = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(0), Constraint::Length(1)])
            .split(inner);
        frame.render_widget(Paragraph::new(lines).wrap(Wrap { trim: false }), layout[0]);
        frame.render_widget(
            Paragraph::new(Line::from(hints::hints_to_spans(&footer, theme))),
            layout[1],
        );
    }
}

fn field_line(field: &FieldView, focused: bool, theme: &Theme) -> Line<'static> {
    let label_style = if focused {
        Style::default().fg(theme.accent).add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(theme.dim)
    };
    let marker = if focused { "› " } else { "  " };
    let value = match field.kind {
        FieldKind::Choice => format!("‹ {} ›", field.value),
        FieldKind::Text if focused => format!("{}_", field.value),
        FieldKind::Text => field.value.clone(),
    };

    Line::from(vec![
        Span::styled(marker, label_style),
        Span::styled(format!("{:<12}", field.label), label_style),
        Span::styled(value, Style::default().fg(theme.text)),
    ])
}

