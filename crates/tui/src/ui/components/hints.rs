use ratatui::{style::Style, text::Span};

use budget_client::Route;

use crate::{
    app::{AppState, Overlay},
    ui::theme::Theme,
};

/// A keyboard hint consisting of a key and its action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyHint {
    pub key: &'static str,
    pub action: &'static str,
}

impl KeyHint {
    pub const fn new(key: &'static str, action: &'static str) -> Self {
        Self { key, action }
    }
}

pub fn hints_to_spans(hints: &[KeyHint], theme: &Theme) -> Vec<Span<'static>> {
    let mut spans = Vec::new();

    for (i, hint) in hints.iter().enumerate() {
        if i > 0 {
            spans.push(Span::raw("  "));
        }
        spans.push(Span::styled(hint.key, Style::default().fg(theme.accent)));
        spans.push(Span::raw(format!(" {}", hint.action)));
    }

    spans
}

pub fn hint_separator(theme: &Theme) -> Span<'static> {
    Span::styled("  │  ", Style::default().fg(theme.border))
}

const PAGING: [KeyHint; 2] = [KeyHint::new("n/p", "page"), KeyHint::new("j/k", "select")];

/// Hints for whatever currently has the keyboard.
pub fn context_hints(state: &AppState) -> Vec<KeyHint> {
    match &state.overlay {
        Overlay::Help => return vec![KeyHint::new("Esc", "close")],
        Overlay::Filter(_) => {
            return vec![
                KeyHint::new("Tab", "next"),
                KeyHint::new("←/→", "change"),
                KeyHint::new("Enter", "apply"),
                KeyHint::new("Ctrl+R", "reset"),
                KeyHint::new("Esc", "cancel"),
            ];
        }
        Overlay::Dialog(_) => {
            return vec![
                KeyHint::new("Tab", "next"),
                KeyHint::new("←/→", "change"),
                KeyHint::new("Enter", "save"),
                KeyHint::new("Esc", "cancel"),
            ];
        }
        Overlay::None => {}
    }

    let mut hints = Vec::new();
    match state.route() {
        Route::Dashboard | Route::Analytics => {}
        Route::Transactions(_) | Route::Categories(_) => {
            hints.extend(PAGING);
            hints.extend([
                KeyHint::new("/", "filter"),
                KeyHint::new("a", "add"),
                KeyHint::new("e", "edit"),
                KeyHint::new("x", "delete"),
            ]);
        }
        Route::Items(_) if state.items.detail.is_some() => hints.extend([
            KeyHint::new("j/k", "select"),
            KeyHint::new("a", "comment"),
            KeyHint::new("e", "edit"),
            KeyHint::new("x", "delete"),
            KeyHint::new("Esc", "close"),
        ]),
        Route::Items(_) => {
            hints.extend(PAGING);
            hints.push(KeyHint::new("Enter", "open"));
        }
    }
    hints.push(KeyHint::new("r", "refresh"));
    if state.history.can_go_back() {
        hints.push(KeyHint::new("b", "back"));
    }
    hints
}

#[cfg(test)]
mod tests {
    use super::*;

    fn state(location: &str) -> AppState {
        AppState::new(Route::parse(location), String::new(), 20, 5)
    }

    #[test]
    fn list_screens_offer_mutations() {
        let hints = context_hints(&state("/transactions"));
        assert!(hints.contains(&KeyHint::new("a", "add")));
        assert!(hints.contains(&KeyHint::new("/", "filter")));
        assert!(!hints.iter().any(|hint| hint.key == "b"));
    }

    #[test]
    fn items_list_opens_details() {
        let hints = context_hints(&state("/items"));
        assert!(hints.contains(&KeyHint::new("Enter", "open")));
        assert!(!hints.iter().any(|hint| hint.action == "add"));
    }

    #[test]
    fn spans_alternate_key_and_action() {
        let theme = Theme::default();
        let spans = hints_to_spans(&[KeyHint::new("q", "quit"), KeyHint::new("?", "help")], &theme);
        assert_eq!(spans.len(), 5);
        assert_eq!(spans[0].content, "q");
        assert_eq!(spans[1].content, " quit");
    }
}
