use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppAction {
    Quit,
    MoveUp,
    MoveDown,
    MoveToTop,
    MoveToBottom,
    Search,
    Analyze,
    Reanalyze,
    CycleSort,
    IncreaseCount,
    DecreaseCount,
    OpenInBrowser,
    ResetDatabase,
    ShowHelp,
    HideHelp,
    // Product input actions
    EditProduct,
    ProductInputChar(char),
    ProductInputBackspace,
    ProductInputConfirm,
    ProductInputCancel,
}

pub fn handle_key_event(
    key: KeyEvent,
    product_input_active: bool,
    show_help: bool,
) -> Option<AppAction> {
    // If help is showing, any key closes it
    if show_help {
        return Some(AppAction::HideHelp);
    }

    // Product input mode
    if product_input_active {
        return match key.code {
            KeyCode::Enter => Some(AppAction::ProductInputConfirm),
            KeyCode::Esc => Some(AppAction::ProductInputCancel),
            KeyCode::Backspace => Some(AppAction::ProductInputBackspace),
            KeyCode::Char(c) => Some(AppAction::ProductInputChar(c)),
            _ => None,
        };
    }

    // Normal mode
    match (key.code, key.modifiers) {
        (KeyCode::Char('q'), _) => Some(AppAction::Quit),
        (KeyCode::Char('c'), KeyModifiers::CONTROL) => Some(AppAction::Quit),

        (KeyCode::Char('j'), _) | (KeyCode::Down, _) => Some(AppAction::MoveDown),
        (KeyCode::Char('k'), _) | (KeyCode::Up, _) => Some(AppAction::MoveUp),
        (KeyCode::Char('<'), _) => Some(AppAction::MoveToTop),
        (KeyCode::Char('>'), _) => Some(AppAction::MoveToBottom),

        (KeyCode::Char('/'), _) | (KeyCode::Char('p'), _) => Some(AppAction::EditProduct),
        (KeyCode::Char('s'), _) => Some(AppAction::Search),
        (KeyCode::Enter, _) | (KeyCode::Char('a'), _) => Some(AppAction::Analyze),
        (KeyCode::Char('g'), _) => Some(AppAction::Reanalyze),
        (KeyCode::Char('f'), _) => Some(AppAction::CycleSort),
        (KeyCode::Char('+'), _) | (KeyCode::Char('='), _) => Some(AppAction::IncreaseCount),
        (KeyCode::Char('-'), _) => Some(AppAction::DecreaseCount),
        (KeyCode::Char('o'), _) => Some(AppAction::OpenInBrowser),
        (KeyCode::Char('X'), _) => Some(AppAction::ResetDatabase),

        (KeyCode::Char('?'), _) => Some(AppAction::ShowHelp),

        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn help_swallows_any_key() {
        assert_eq!(
            handle_key_event(key(KeyCode::Char('q')), false, true),
            Some(AppAction::HideHelp)
        );
    }

    #[test]
    fn input_mode_captures_characters() {
        assert_eq!(
            handle_key_event(key(KeyCode::Char('q')), true, false),
            Some(AppAction::ProductInputChar('q'))
        );
        assert_eq!(
            handle_key_event(key(KeyCode::Enter), true, false),
            Some(AppAction::ProductInputConfirm)
        );
        assert_eq!(
            handle_key_event(key(KeyCode::Esc), true, false),
            Some(AppAction::ProductInputCancel)
        );
    }

    #[test]
    fn normal_mode_bindings() {
        assert_eq!(handle_key_event(key(KeyCode::Char('a')), false, false), Some(AppAction::Analyze));
        assert_eq!(handle_key_event(key(KeyCode::Char('g')), false, false), Some(AppAction::Reanalyze));
        assert_eq!(
            handle_key_event(KeyEvent::new(KeyCode::Char('X'), KeyModifiers::SHIFT), false, false),
            Some(AppAction::ResetDatabase)
        );
        assert_eq!(
            handle_key_event(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL), false, false),
            Some(AppAction::Quit)
        );
        assert_eq!(handle_key_event(key(KeyCode::F(5)), false, false), None);
    }
}
