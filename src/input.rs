#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Direction {
    Left,
    Right,
    Up,
    Down,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct InputState {
    pub left: bool,
    pub right: bool,
    pub up: bool,
    pub down: bool,
}

impl InputState {
    pub fn set(&mut self, direction: Direction, held: bool) {
        match direction {
            Direction::Left => self.left = held,
            Direction::Right => self.right = held,
            Direction::Up => self.up = held,
            Direction::Down => self.down = held,
        }
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }

    /// Unit steps on each axis; right and down win when both keys of an axis are held.
    pub fn axes(&self) -> (f64, f64) {
        let dx = if self.right {
            1.0
        } else if self.left {
            -1.0
        } else {
            0.0
        };
        let dy = if self.down {
            1.0
        } else if self.up {
            -1.0
        } else {
            0.0
        };
        (dx, dy)
    }
}

/// Maps a `KeyboardEvent.key` value to a direction. Letters are case-insensitive.
pub fn direction_for_key(key: &str) -> Option<Direction> {
    match key {
        "ArrowLeft" => return Some(Direction::Left),
        "ArrowRight" => return Some(Direction::Right),
        "ArrowUp" => return Some(Direction::Up),
        "ArrowDown" => return Some(Direction::Down),
        _ => {}
    }

    match key.to_ascii_lowercase().as_str() {
        "a" => Some(Direction::Left),
        "d" => Some(Direction::Right),
        "w" => Some(Direction::Up),
        "s" => Some(Direction::Down),
        _ => None,
    }
}

pub fn is_restart_key(key: &str) -> bool {
    key == "Enter" || key.eq_ignore_ascii_case("r")
}

/// On-screen touch buttons by element id.
pub const TOUCH_BUTTONS: [(&str, Direction); 4] = [
    ("btnLeft", Direction::Left),
    ("btnRight", Direction::Right),
    ("btnUp", Direction::Up),
    ("btnDown", Direction::Down),
];
