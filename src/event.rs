use std::time::Duration;

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use crate::app::JumpEdit;
use crate::calendar::Navigation;

/// What a key press asks the app to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Quit,
    Help,
    CloseHelp,
    ShiftDays(i64),
    Navigate(Navigation),
    Today,
    Refresh,
    ToggleRoutine,
    NextRoutine,
    OpenJump,
    Jump(JumpEdit),
}

/// Which set of key bindings is live.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputMode {
    Normal,
    Help,
    Jump,
}

pub fn next_key_event(timeout: Duration) -> color_eyre::Result<Option<KeyEvent>> {
    if !event::poll(timeout)? {
        return Ok(None);
    }
    match event::read()? {
        Event::Key(key) if key.kind == KeyEventKind::Press => Ok(Some(key)),
        _ => Ok(None),
    }
}

pub fn action_for(key: KeyEvent, mode: InputMode) -> Option<Action> {
    match mode {
        InputMode::Help => {
            return matches!(key.code, KeyCode::Esc | KeyCode::Char('?') | KeyCode::Char('q'))
                .then_some(Action::CloseHelp);
        }
        InputMode::Jump => return jump_action(key),
        InputMode::Normal => {}
    }

    let action = match (key.code, key.modifiers) {
        (KeyCode::Char('q'), _) | (KeyCode::Char('c'), KeyModifiers::CONTROL) => Action::Quit,
        (KeyCode::Char('?'), _) => Action::Help,
        (KeyCode::Left, _) | (KeyCode::Char('h'), _) => Action::ShiftDays(-1),
        (KeyCode::Right, _) | (KeyCode::Char('l'), _) => Action::ShiftDays(1),
        (KeyCode::Up, _) | (KeyCode::Char('k'), _) => Action::ShiftDays(-7),
        (KeyCode::Down, _) | (KeyCode::Char('j'), _) => Action::ShiftDays(7),
        (KeyCode::Char('['), _) => Action::Navigate(Navigation::Previous),
        (KeyCode::Char(']'), _) => Action::Navigate(Navigation::Next),
        (KeyCode::Char('{'), _) => Action::Navigate(Navigation::PreviousYear),
        (KeyCode::Char('}'), _) => Action::Navigate(Navigation::NextYear),
        (KeyCode::Char('t'), _) => Action::Today,
        (KeyCode::Char('r'), _) => Action::Refresh,
        (KeyCode::Char(' '), _) => Action::ToggleRoutine,
        (KeyCode::Tab, _) => Action::NextRoutine,
        (KeyCode::Char('g'), _) => Action::OpenJump,
        _ => return None,
    };
    Some(action)
}

fn jump_action(key: KeyEvent) -> Option<Action> {
    let edit = match key.code {
        KeyCode::Enter => JumpEdit::Submit,
        KeyCode::Esc => JumpEdit::Cancel,
        KeyCode::Backspace => JumpEdit::Pop,
        KeyCode::Char(c) if c.is_ascii_digit() || c == '-' => JumpEdit::Push(c),
        _ => return None,
    };
    Some(Action::Jump(edit))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn maps_navigation_keys() {
        assert_eq!(
            action_for(key(KeyCode::Char(']')), InputMode::Normal),
            Some(Action::Navigate(Navigation::Next))
        );
        assert_eq!(action_for(key(KeyCode::Char('k')), InputMode::Normal), Some(Action::ShiftDays(-7)));
        assert_eq!(
            action_for(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL), InputMode::Normal),
            Some(Action::Quit)
        );
        assert_eq!(action_for(key(KeyCode::Char('x')), InputMode::Normal), None);
    }

    #[test]
    fn help_swallows_other_keys() {
        assert_eq!(action_for(key(KeyCode::Char('q')), InputMode::Help), Some(Action::CloseHelp));
        assert_eq!(action_for(key(KeyCode::Char(']')), InputMode::Help), None);
    }

    #[test]
    fn jump_prompt_takes_digits_and_dashes() {
        assert_eq!(action_for(key(KeyCode::Char('g')), InputMode::Normal), Some(Action::OpenJump));
        assert_eq!(
            action_for(key(KeyCode::Char('7')), InputMode::Jump),
            Some(Action::Jump(JumpEdit::Push('7')))
        );
        assert_eq!(
            action_for(key(KeyCode::Char('-')), InputMode::Jump),
            Some(Action::Jump(JumpEdit::Push('-')))
        );
        assert_eq!(
            action_for(key(KeyCode::Enter), InputMode::Jump),
            Some(Action::Jump(JumpEdit::Submit))
        );
        assert_eq!(
            action_for(key(KeyCode::Esc), InputMode::Jump),
            Some(Action::Jump(JumpEdit::Cancel))
        );
        assert_eq!(action_for(key(KeyCode::Char('q')), InputMode::Jump), None);
    }
}
