use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

#[derive(Debug, Clone, PartialEq)]
pub enum UserAction {
    Quit,
    ToggleHelp,
    FocusNext,
    FocusPrev,
    /// Previous option in the focused selector.
    Up,
    /// Next option in the focused selector.
    Down,
    Toggle,
    Submit,
    Input(char),
    Backspace,
    Back,
    OpenResult,
    PickMood(u8),
}

/// Maps a key press to an action. While a text field has focus, printable
/// keys are typed into it instead of acting as shortcuts.
pub fn map_key_to_action(key: KeyEvent, editing_text: bool) -> Option<UserAction> {
    if key.modifiers.contains(KeyModifiers::CONTROL) {
        return match key.code {
            KeyCode::Char('c') => Some(UserAction::Quit),
            _ => None,
        };
    }

    match key.code {
        KeyCode::F(1) => return Some(UserAction::ToggleHelp),
        KeyCode::Tab => return Some(UserAction::FocusNext),
        KeyCode::BackTab => return Some(UserAction::FocusPrev),
        KeyCode::Enter => return Some(UserAction::Submit),
        KeyCode::Esc => return Some(UserAction::Back),
        _ => {}
    }

    if editing_text {
        return match key.code {
            KeyCode::Char(c) => Some(UserAction::Input(c)),
            KeyCode::Backspace => Some(UserAction::Backspace),
            KeyCode::Up => Some(UserAction::FocusPrev),
            KeyCode::Down => Some(UserAction::FocusNext),
            _ => None,
        };
    }

    match key.code {
        KeyCode::Char('q') => Some(UserAction::Quit),
        KeyCode::Char('?') => Some(UserAction::ToggleHelp),
        KeyCode::Up | KeyCode::Char('k') | KeyCode::Left | KeyCode::Char('h') => Some(UserAction::Up),
        KeyCode::Down | KeyCode::Char('j') | KeyCode::Right | KeyCode::Char('l') => Some(UserAction::Down),
        KeyCode::Char(' ') => Some(UserAction::Toggle),
        KeyCode::Char('o') => Some(UserAction::OpenResult),
        KeyCode::Char(c @ '1'..='8') => Some(UserAction::PickMood(c as u8 - b'0')),
        _ => None,
    }
}
