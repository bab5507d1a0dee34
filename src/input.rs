//! Keyboard bindings for the interactive mode

use crate::driver::{DriverEvent, STRENGTH_STEP};
use crossterm::event::{KeyCode, KeyModifiers};

/// Steps per press when Shift is held
const COARSE: f64 = 10.0;

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Action {
    Quit,
    Event(DriverEvent),
    SavePreset(u8),
    LoadPreset(u8),
    ToggleHelp,
}

fn nudge(param: usize, direction: f64) -> Option<Action> {
    Some(Action::Event(DriverEvent::Nudge { param, direction }))
}

/// Translate a key press, `None` for unbound keys
pub fn map_key(code: KeyCode, modifiers: KeyModifiers) -> Option<Action> {
    let coarse = if modifiers.contains(KeyModifiers::SHIFT) { COARSE } else { 1.0 };

    match code {
        KeyCode::Char('c') if modifiers.contains(KeyModifiers::CONTROL) => Some(Action::Quit),
        KeyCode::Char('q') | KeyCode::Esc => Some(Action::Quit),

        KeyCode::Up => nudge(1, coarse),
        KeyCode::Down => nudge(1, -coarse),
        KeyCode::Right => nudge(2, coarse),
        KeyCode::Left => nudge(2, -coarse),
        // Uppercase means Shift is already applied
        KeyCode::Char('w') => nudge(3, 1.0),
        KeyCode::Char('s') => nudge(3, -1.0),
        KeyCode::Char('W') => nudge(3, COARSE),
        KeyCode::Char('S') => nudge(3, -COARSE),
        KeyCode::Char('d') => nudge(4, 1.0),
        KeyCode::Char('a') => nudge(4, -1.0),
        KeyCode::Char('D') => nudge(4, COARSE),
        KeyCode::Char('A') => nudge(4, -COARSE),

        KeyCode::Tab | KeyCode::Char('n') => Some(Action::Event(DriverEvent::NextEntry)),
        KeyCode::BackTab | KeyCode::Char('p') => Some(Action::Event(DriverEvent::PrevEntry)),
        KeyCode::Char(' ') => Some(Action::Event(DriverEvent::TogglePause)),
        KeyCode::Char('m') => Some(Action::Event(DriverEvent::CycleMapping)),
        KeyCode::Char('r') => Some(Action::Event(DriverEvent::ResetParams)),
        KeyCode::Char('+') | KeyCode::Char('=') => Some(Action::Event(DriverEvent::Strength(STRENGTH_STEP))),
        KeyCode::Char('-') | KeyCode::Char('_') => Some(Action::Event(DriverEvent::Strength(-STRENGTH_STEP))),

        KeyCode::F(n @ 1..=4) => Some(Action::SavePreset(n)),
        // Shift+number produces symbols
        KeyCode::Char('!') => Some(Action::SavePreset(1)),
        KeyCode::Char('@') => Some(Action::SavePreset(2)),
        KeyCode::Char('#') => Some(Action::SavePreset(3)),
        KeyCode::Char('$') => Some(Action::SavePreset(4)),
        KeyCode::Char(c @ '1'..='4') => c.to_digit(10).map(|n| Action::LoadPreset(n as u8)),

        KeyCode::Char('?') | KeyCode::Char('h') => Some(Action::ToggleHelp),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(code: KeyCode) -> Option<Action> {
        map_key(code, KeyModifiers::NONE)
    }

    #[test]
    fn parameter_keys() {
        assert_eq!(key(KeyCode::Up), nudge(1, 1.0));
        assert_eq!(key(KeyCode::Left), nudge(2, -1.0));
        assert_eq!(key(KeyCode::Char('s')), nudge(3, -1.0));
        assert_eq!(key(KeyCode::Char('d')), nudge(4, 1.0));
        assert_eq!(map_key(KeyCode::Down, KeyModifiers::SHIFT), nudge(1, -COARSE));
    }

    #[test]
    fn preset_keys() {
        assert_eq!(key(KeyCode::F(3)), Some(Action::SavePreset(3)));
        assert_eq!(key(KeyCode::F(5)), None);
        assert_eq!(key(KeyCode::Char('$')), Some(Action::SavePreset(4)));
        assert_eq!(key(KeyCode::Char('2')), Some(Action::LoadPreset(2)));
        assert_eq!(key(KeyCode::Char('5')), None);
    }

    #[test]
    fn quit_keys() {
        assert_eq!(key(KeyCode::Esc), Some(Action::Quit));
        assert_eq!(map_key(KeyCode::Char('c'), KeyModifiers::CONTROL), Some(Action::Quit));
        assert_eq!(key(KeyCode::Char('c')), None);
    }
}
