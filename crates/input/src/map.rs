//! Key mapping from terminal events to session commands.

use crate::types::{Command, Direction};
use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

/// Map keyboard input to a command.
///
/// Key releases are ignored so terminals that report them do not roll twice.
pub fn handle_key_event(key: KeyEvent) -> Option<Command> {
    if key.kind == KeyEventKind::Release {
        return None;
    }
    if should_quit(key) {
        return Some(Command::Quit);
    }

    match key.code {
        // Movement
        KeyCode::Up | KeyCode::Char('k') | KeyCode::Char('K') | KeyCode::Char('w') | KeyCode::Char('W') => {
            Some(Command::Move(Direction::Up))
        }
        KeyCode::Down | KeyCode::Char('j') | KeyCode::Char('J') | KeyCode::Char('s') | KeyCode::Char('S') => {
            Some(Command::Move(Direction::Down))
        }
        KeyCode::Left | KeyCode::Char('h') | KeyCode::Char('H') | KeyCode::Char('a') | KeyCode::Char('A') => {
            Some(Command::Move(Direction::Left))
        }
        KeyCode::Right | KeyCode::Char('l') | KeyCode::Char('L') | KeyCode::Char('d') | KeyCode::Char('D') => {
            Some(Command::Move(Direction::Right))
        }

        // Split control
        KeyCode::Tab | KeyCode::Char('b') | KeyCode::Char('B') => Some(Command::ToggleActiveSubBlock),

        KeyCode::Char('r') | KeyCode::Char('R') => Some(Command::RestartLevel),
        KeyCode::Char('v') | KeyCode::Char('V') => Some(Command::ToggleView),
        KeyCode::Char('?') => Some(Command::Hint),

        _ => None,
    }
}

/// Check if key should quit the game.
pub fn should_quit(key: KeyEvent) -> bool {
    matches!(key.code, KeyCode::Char('q') | KeyCode::Char('Q'))
        || (key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::{KeyCode, KeyEvent, KeyEventState, KeyModifiers};

    fn key(code: KeyCode) -> Option<Command> {
        handle_key_event(KeyEvent::from(code))
    }

    #[test]
    fn test_movement_keys() {
        let up = Some(Command::Move(Direction::Up));
        let down = Some(Command::Move(Direction::Down));
        let left = Some(Command::Move(Direction::Left));
        let right = Some(Command::Move(Direction::Right));

        assert_eq!(key(KeyCode::Up), up);
        assert_eq!(key(KeyCode::Char('w')), up);
        assert_eq!(key(KeyCode::Char('K')), up);
        assert_eq!(key(KeyCode::Down), down);
        assert_eq!(key(KeyCode::Char('S')), down);
        assert_eq!(key(KeyCode::Char('j')), down);
        assert_eq!(key(KeyCode::Left), left);
        assert_eq!(key(KeyCode::Char('a')), left);
        assert_eq!(key(KeyCode::Char('h')), left);
        assert_eq!(key(KeyCode::Right), right);
        assert_eq!(key(KeyCode::Char('D')), right);
        assert_eq!(key(KeyCode::Char('l')), right);
    }

    #[test]
    fn test_action_keys() {
        assert_eq!(key(KeyCode::Char('b')), Some(Command::ToggleActiveSubBlock));
        assert_eq!(key(KeyCode::Tab), Some(Command::ToggleActiveSubBlock));
        assert_eq!(key(KeyCode::Char('r')), Some(Command::RestartLevel));
        assert_eq!(key(KeyCode::Char('v')), Some(Command::ToggleView));
        assert_eq!(key(KeyCode::Char('?')), Some(Command::Hint));
        assert_eq!(key(KeyCode::Char('x')), None);
        assert_eq!(key(KeyCode::Char(' ')), None);
    }

    #[test]
    fn test_release_ignored() {
        let release = KeyEvent {
            code: KeyCode::Left,
            modifiers: KeyModifiers::NONE,
            kind: KeyEventKind::Release,
            state: KeyEventState::NONE,
        };
        assert_eq!(handle_key_event(release), None);
    }

    #[test]
    fn test_quit_keys() {
        assert!(should_quit(KeyEvent::from(KeyCode::Char('q'))));
        assert!(should_quit(KeyEvent::new(
            KeyCode::Char('c'),
            KeyModifiers::CONTROL
        )));
        assert!(!should_quit(KeyEvent::from(KeyCode::Char('x'))));
        assert_eq!(key(KeyCode::Char('Q')), Some(Command::Quit));
        assert_eq!(
            handle_key_event(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL)),
            Some(Command::Quit)
        );
    }
}
