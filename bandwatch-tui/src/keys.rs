//! Keybinding definitions for the TUI.

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Quit,
    OpenSelector,
    MoveUp,
    MoveDown,
    CutoffUp,
    CutoffDown,
    Confirm,
    Cancel,
    PauseUpdates,
    OpenHelp,
}

pub fn map_key(event: KeyEvent) -> Option<Action> {
    let KeyEvent {
        code,
        modifiers,
        kind,
        ..
    } = event;

    if kind == KeyEventKind::Release {
        return None;
    }

    if modifiers.contains(KeyModifiers::CONTROL) {
        return match code {
            KeyCode::Char('c') => Some(Action::Quit),
            _ => None,
        };
    }

    match code {
        KeyCode::Char('q') => Some(Action::Quit),
        KeyCode::Char('?') => Some(Action::OpenHelp),
        KeyCode::Char('c') => Some(Action::OpenSelector),
        KeyCode::Char('p') => Some(Action::PauseUpdates),
        KeyCode::Enter => Some(Action::Confirm),
        KeyCode::Esc => Some(Action::Cancel),
        KeyCode::Up | KeyCode::Char('k') => Some(Action::MoveUp),
        KeyCode::Down | KeyCode::Char('j') => Some(Action::MoveDown),
        KeyCode::Right | KeyCode::Char('l') | KeyCode::Char('+') => Some(Action::CutoffUp),
        KeyCode::Left | KeyCode::Char('h') | KeyCode::Char('-') => Some(Action::CutoffDown),
        _ => None,
    }
}
