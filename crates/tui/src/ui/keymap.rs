use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppAction {
    Quit,
    Help,
    /// Switch to the tab at this index.
    Tab(usize),
    Back,
    Refresh,
    NextPage,
    PrevPage,
    Up,
    Down,
    Filter,
    Add,
    Edit,
    Delete,
    Open,
    Cancel,
    NextField,
    PrevField,
    CycleNext,
    CyclePrev,
    Submit,
    Backspace,
    ResetFilters,
    Input(char),
    None,
}

/// Whether a form is taking typed text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputMode {
    Browse,
    Edit,
}

pub fn map_key(key: KeyEvent, mode: InputMode) -> AppAction {
    if key.modifiers.contains(KeyModifiers::CONTROL) {
        return match key.code {
            KeyCode::Char('c') => AppAction::Quit,
            KeyCode::Char('r') if mode == InputMode::Edit => AppAction::ResetFilters,
            _ => AppAction::None,
        };
    }

    match mode {
        InputMode::Browse => map_browse(key.code),
        InputMode::Edit => map_edit(key.code),
    }
}

fn map_browse(code: KeyCode) -> AppAction {
    match code {
        KeyCode::Char('q') => AppAction::Quit,
        KeyCode::Char('?') => AppAction::Help,
        KeyCode::Char(ch @ '1'..='5') => AppAction::Tab(usize::from(ch as u8 - b'1')),
        KeyCode::Char('b') | KeyCode::Backspace => AppAction::Back,
        KeyCode::Char('r') => AppAction::Refresh,
        KeyCode::Char('n') | KeyCode::Right => AppAction::NextPage,
        KeyCode::Char('p') | KeyCode::Left => AppAction::PrevPage,
        KeyCode::Char('j') | KeyCode::Down => AppAction::Down,
        KeyCode::Char('k') | KeyCode::Up => AppAction::Up,
        KeyCode::Char('/') => AppAction::Filter,
        KeyCode::Char('a') => AppAction::Add,
        KeyCode::Char('e') => AppAction::Edit,
        KeyCode::Char('x') | KeyCode::Delete => AppAction::Delete,
        KeyCode::Enter => AppAction::Open,
        KeyCode::Esc => AppAction::Cancel,
        _ => AppAction::None,
    }
}

fn map_edit(code: KeyCode) -> AppAction {
    match code {
        KeyCode::Esc => AppAction::Cancel,
        KeyCode::Tab | KeyCode::Down => AppAction::NextField,
        KeyCode::BackTab | KeyCode::Up => AppAction::PrevField,
        KeyCode::Right => AppAction::CycleNext,
        KeyCode::Left => AppAction::CyclePrev,
        KeyCode::Enter => AppAction::Submit,
        KeyCode::Backspace => AppAction::Backspace,
        KeyCode::Char(ch) => AppAction::Input(ch),
        _ => AppAction::None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn q_quits_only_while_browsing() {
        assert_eq!(map_key(key(KeyCode::Char('q')), InputMode::Browse), AppAction::Quit);
        assert_eq!(
            map_key(key(KeyCode::Char('q')), InputMode::Edit),
            AppAction::Input('q')
        );
    }

    #[test]
    fn ctrl_c_always_quits() {
        let ctrl_c = KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL);
        assert_eq!(map_key(ctrl_c, InputMode::Browse), AppAction::Quit);
        assert_eq!(map_key(ctrl_c, InputMode::Edit), AppAction::Quit);
    }

    #[test]
    fn digits_switch_tabs() {
        assert_eq!(map_key(key(KeyCode::Char('1')), InputMode::Browse), AppAction::Tab(0));
        assert_eq!(map_key(key(KeyCode::Char('5')), InputMode::Browse), AppAction::Tab(4));
        assert_eq!(map_key(key(KeyCode::Char('6')), InputMode::Browse), AppAction::None);
    }

    #[test]
    fn arrows_move_fields_and_cycle_choices_in_forms() {
        assert_eq!(map_key(key(KeyCode::Down), InputMode::Edit), AppAction::NextField);
        assert_eq!(map_key(key(KeyCode::Left), InputMode::Edit), AppAction::CyclePrev);
        assert_eq!(map_key(key(KeyCode::Left), InputMode::Browse), AppAction::PrevPage);
        let reset = KeyEvent::new(KeyCode::Char('r'), KeyModifiers::CONTROL);
        assert_eq!(map_key(reset, InputMode::Edit), AppAction::ResetFilters);
    }
}
