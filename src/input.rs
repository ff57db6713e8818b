use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

/// Canonical movement directions for snake input.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    /// Returns the opposite direction.
    #[must_use]
    pub fn opposite(self) -> Self {
        match self {
            Self::Up => Self::Down,
            Self::Down => Self::Up,
            Self::Left => Self::Right,
            Self::Right => Self::Left,
        }
    }

    /// Unit step `(dx, dy)`; y grows downward.
    #[must_use]
    pub fn delta(self) -> (i32, i32) {
        match self {
            Self::Up => (0, -1),
            Self::Down => (0, 1),
            Self::Left => (-1, 0),
            Self::Right => (1, 0),
        }
    }
}

/// High-level input events consumed by the session.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum GameInput {
    Direction(Direction),
    /// Space/Enter: start, pause, resume or submit depending on phase.
    Confirm,
    Pause,
    Restart,
    /// A letter typed while entering initials.
    Letter(char),
    /// Leaves initials entry without submitting.
    Cancel,
    Quit,
}

/// How raw keys are interpreted.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum InputMode {
    /// Letters steer (WASD) or trigger actions.
    Steering,
    /// Letters are typed into the initials slots.
    TextEntry,
}

/// Returns whether a queued direction may replace `current`: never the
/// same direction and never an immediate 180° turn.
#[must_use]
pub fn direction_change_is_valid(current: Direction, next: Direction) -> bool {
    next != current && next != current.opposite()
}

/// Maps one key press to a game input. Unrecognized keys yield `None`.
#[must_use]
pub fn map_key(key: KeyEvent, mode: InputMode) -> Option<GameInput> {
    if key.kind == KeyEventKind::Release {
        return None;
    }

    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        return Some(GameInput::Quit);
    }

    let input = match key.code {
        KeyCode::Up => GameInput::Direction(Direction::Up),
        KeyCode::Down => GameInput::Direction(Direction::Down),
        KeyCode::Left => GameInput::Direction(Direction::Left),
        KeyCode::Right => GameInput::Direction(Direction::Right),
        KeyCode::Enter => GameInput::Confirm,
        KeyCode::Char(' ') => GameInput::Confirm,
        KeyCode::Esc => match mode {
            InputMode::Steering => GameInput::Quit,
            InputMode::TextEntry => GameInput::Cancel,
        },
        KeyCode::Char(c) => match mode {
            InputMode::TextEntry if c.is_ascii_alphabetic() => {
                GameInput::Letter(c.to_ascii_uppercase())
            }
            InputMode::TextEntry => return None,
            InputMode::Steering => match c.to_ascii_lowercase() {
                'w' => GameInput::Direction(Direction::Up),
                's' => GameInput::Direction(Direction::Down),
                'a' => GameInput::Direction(Direction::Left),
                'd' => GameInput::Direction(Direction::Right),
                'p' => GameInput::Pause,
                'r' => GameInput::Restart,
                'q' => GameInput::Quit,
                _ => return None,
            },
        },
        _ => return None,
    };

    Some(input)
}

/// Classifies a drag by its dominant axis. Drags shorter than `threshold`
/// on both axes are taps and yield `None`.
#[must_use]
pub fn classify_swipe(dx: f32, dy: f32, threshold: f32) -> Option<Direction> {
    if dx.abs() < threshold && dy.abs() < threshold {
        return None;
    }

    if dx.abs() > dy.abs() {
        Some(if dx > 0.0 {
            Direction::Right
        } else {
            Direction::Left
        })
    } else {
        Some(if dy > 0.0 {
            Direction::Down
        } else {
            Direction::Up
        })
    }
}

/// Remembers where a pointer drag started.
#[derive(Debug, Clone, Copy, Default)]
pub struct SwipeTracker {
    start: Option<(f32, f32)>,
}

impl SwipeTracker {
    pub fn begin(&mut self, x: f32, y: f32) {
        self.start = Some((x, y));
    }

    /// Finishes the drag at `(x, y)` and returns its direction, if any.
    pub fn end(&mut self, x: f32, y: f32, threshold: f32) -> Option<Direction> {
        let (start_x, start_y) = self.start.take()?;
        classify_swipe(x - start_x, y - start_y, threshold)
    }
}

#[cfg(test)]
mod tests {
    use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

    use super::{
        Direction, GameInput, InputMode, SwipeTracker, classify_swipe, direction_change_is_valid,
        map_key,
    };

    #[test]
    fn opposite_direction_is_correct() {
        assert_eq!(Direction::Up.opposite(), Direction::Down);
        assert_eq!(Direction::Down.opposite(), Direction::Up);
        assert_eq!(Direction::Left.opposite(), Direction::Right);
        assert_eq!(Direction::Right.opposite(), Direction::Left);
    }

    #[test]
    fn direction_change_rejects_reverse_and_repeat() {
        assert!(!direction_change_is_valid(Direction::Right, Direction::Left));
        assert!(!direction_change_is_valid(Direction::Right, Direction::Right));
        assert!(!direction_change_is_valid(Direction::Up, Direction::Down));

        assert!(direction_change_is_valid(Direction::Right, Direction::Down));
        assert!(direction_change_is_valid(Direction::Up, Direction::Left));
    }

    #[test]
    fn arrows_and_wasd_map_to_directions() {
        let press = |code| KeyEvent::new(code, KeyModifiers::NONE);

        assert_eq!(
            map_key(press(KeyCode::Up), InputMode::Steering),
            Some(GameInput::Direction(Direction::Up))
        );
        assert_eq!(
            map_key(press(KeyCode::Char('a')), InputMode::Steering),
            Some(GameInput::Direction(Direction::Left))
        );
        assert_eq!(
            map_key(press(KeyCode::Char('D')), InputMode::Steering),
            Some(GameInput::Direction(Direction::Right))
        );
        assert_eq!(
            map_key(press(KeyCode::Char(' ')), InputMode::Steering),
            Some(GameInput::Confirm)
        );
        assert_eq!(map_key(press(KeyCode::Char('x')), InputMode::Steering), None);
        assert_eq!(map_key(press(KeyCode::F(5)), InputMode::Steering), None);
    }

    #[test]
    fn text_entry_types_letters_instead_of_steering() {
        let press = |code| KeyEvent::new(code, KeyModifiers::NONE);

        assert_eq!(
            map_key(press(KeyCode::Char('w')), InputMode::TextEntry),
            Some(GameInput::Letter('W'))
        );
        assert_eq!(
            map_key(press(KeyCode::Esc), InputMode::TextEntry),
            Some(GameInput::Cancel)
        );
        assert_eq!(map_key(press(KeyCode::Char('7')), InputMode::TextEntry), None);
    }

    #[test]
    fn ctrl_c_always_quits() {
        let key = KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL);

        assert_eq!(map_key(key, InputMode::TextEntry), Some(GameInput::Quit));
    }

    #[test]
    fn swipe_uses_dominant_axis() {
        assert_eq!(classify_swipe(40.0, 10.0, 20.0), Some(Direction::Right));
        assert_eq!(classify_swipe(-40.0, 30.0, 20.0), Some(Direction::Left));
        assert_eq!(classify_swipe(5.0, -25.0, 20.0), Some(Direction::Up));
        assert_eq!(classify_swipe(0.0, 21.0, 20.0), Some(Direction::Down));
    }

    #[test]
    fn short_drag_is_a_tap() {
        assert_eq!(classify_swipe(19.0, -19.0, 20.0), None);

        let mut tracker = SwipeTracker::default();
        tracker.begin(100.0, 100.0);
        assert_eq!(tracker.end(110.0, 105.0, 20.0), None);
        assert_eq!(tracker.end(200.0, 100.0, 20.0), None);
    }
}
