//! Directional-pad key dispatch for the app list.
//!
//! Each key press is handled on its own: the only input is the current
//! anchor row and the number of rows, the output is what to do with it.

use crossterm::event::KeyCode;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DpadKey {
    Up,
    Down,
    Left,
    Right,
    Center,
}

impl DpadKey {
    /// Map a terminal key to a d-pad key. Enter doubles as center.
    #[must_use]
    pub fn from_key_code(code: KeyCode) -> Option<Self> {
        match code {
            KeyCode::Up => Some(Self::Up),
            KeyCode::Down => Some(Self::Down),
            KeyCode::Left => Some(Self::Left),
            KeyCode::Right => Some(Self::Right),
            KeyCode::Enter => Some(Self::Center),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dispatch {
    /// Move the anchor to this row
    ScrollTo(usize),
    /// Launch the app on this row
    Launch(usize),
    /// Handled, nothing to do
    Consumed,
    /// Not a d-pad key, fall through to default handling
    Unhandled,
}

impl Dispatch {
    #[must_use]
    pub fn is_consumed(self) -> bool {
        self != Self::Unhandled
    }
}

#[must_use]
pub fn dispatch(key: Option<DpadKey>, anchor: usize, row_count: usize) -> Dispatch {
    let Some(key) = key else {
        return Dispatch::Unhandled;
    };

    match key {
        DpadKey::Down if anchor + 1 < row_count => Dispatch::ScrollTo(anchor + 1),
        DpadKey::Up if anchor > 0 && row_count > 0 => Dispatch::ScrollTo(anchor - 1),
        // Left/Right are reserved
        DpadKey::Down | DpadKey::Up | DpadKey::Left | DpadKey::Right => Dispatch::Consumed,
        DpadKey::Center if anchor < row_count => Dispatch::Launch(anchor),
        DpadKey::Center => Dispatch::Consumed,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_mapping() {
        assert_eq!(DpadKey::from_key_code(KeyCode::Up), Some(DpadKey::Up));
        assert_eq!(DpadKey::from_key_code(KeyCode::Enter), Some(DpadKey::Center));
        assert_eq!(DpadKey::from_key_code(KeyCode::Char('q')), None);
        assert_eq!(DpadKey::from_key_code(KeyCode::Tab), None);
    }

    #[test]
    fn test_down_moves_one_row() {
        assert_eq!(dispatch(Some(DpadKey::Down), 0, 3), Dispatch::ScrollTo(1));
        assert_eq!(dispatch(Some(DpadKey::Down), 1, 3), Dispatch::ScrollTo(2));
    }

    #[test]
    fn test_down_at_last_row_is_noop() {
        assert_eq!(dispatch(Some(DpadKey::Down), 2, 3), Dispatch::Consumed);
    }

    #[test]
    fn test_up_moves_one_row() {
        assert_eq!(dispatch(Some(DpadKey::Up), 2, 3), Dispatch::ScrollTo(1));
    }

    #[test]
    fn test_up_at_first_row_is_noop() {
        assert_eq!(dispatch(Some(DpadKey::Up), 0, 3), Dispatch::Consumed);
    }

    #[test]
    fn test_navigation_on_empty_list() {
        assert_eq!(dispatch(Some(DpadKey::Down), 0, 0), Dispatch::Consumed);
        assert_eq!(dispatch(Some(DpadKey::Up), 0, 0), Dispatch::Consumed);
        assert_eq!(dispatch(Some(DpadKey::Center), 0, 0), Dispatch::Consumed);
    }

    #[test]
    fn test_left_right_reserved() {
        assert_eq!(dispatch(Some(DpadKey::Left), 1, 3), Dispatch::Consumed);
        assert_eq!(dispatch(Some(DpadKey::Right), 1, 3), Dispatch::Consumed);
    }

    #[test]
    fn test_center_launches_anchor() {
        assert_eq!(dispatch(Some(DpadKey::Center), 1, 3), Dispatch::Launch(1));
    }

    #[test]
    fn test_other_keys_fall_through() {
        let result = dispatch(None, 0, 3);
        assert_eq!(result, Dispatch::Unhandled);
        assert!(!result.is_consumed());
        assert!(Dispatch::Consumed.is_consumed());
    }
}
