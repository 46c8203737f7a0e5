/// Board vocabulary: cell contents, positions, directions and commands.
/// Cell semantics are queried via methods so the rules live here.

#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub enum Cell {
    #[default]
    Empty,
    Hazard, // Fire: burns the player, blocks the move
    Coin,
    Item,   // Healing pickup
}

impl Cell {
    /// Can the player step onto this cell?
    pub fn is_walkable(self) -> bool {
        matches!(self, Cell::Empty | Cell::Coin | Cell::Item)
    }

    /// Is this cell free for entity placement?
    pub fn is_empty(self) -> bool {
        matches!(self, Cell::Empty)
    }

    pub fn name(self) -> &'static str {
        match self {
            Cell::Empty => "empty",
            Cell::Hazard => "fire",
            Cell::Coin => "coin",
            Cell::Item => "healing item",
        }
    }

    /// Display / diagram character.
    pub fn symbol(self) -> char {
        match self {
            Cell::Empty => ' ',
            Cell::Hazard => 'F',
            Cell::Coin => 'C',
            Cell::Item => 'H',
        }
    }

    #[allow(dead_code)]
    pub fn from_symbol(ch: char) -> Self {
        match ch {
            'F' => Cell::Hazard,
            'C' => Cell::Coin,
            'H' => Cell::Item,
            _ => Cell::Empty,
        }
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Debug, Default, Hash)]
pub struct Position {
    pub x: usize,
    pub y: usize,
}

impl Position {
    pub const fn new(x: usize, y: usize) -> Self {
        Position { x, y }
    }

    /// Neighbour one step in `dir`, or None when it would go below zero.
    /// The upper bound is the board's business.
    pub fn step(self, dir: MoveDir) -> Option<Position> {
        let (dx, dy) = dir.delta();
        let x = self.x.checked_add_signed(dx)?;
        let y = self.y.checked_add_signed(dy)?;
        Some(Position { x, y })
    }
}

/// Movement direction, one cell per round.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum MoveDir {
    Up,
    Left,
    Down,
    Right,
}

impl MoveDir {
    pub fn delta(self) -> (isize, isize) {
        match self {
            MoveDir::Up => (0, -1),
            MoveDir::Left => (-1, 0),
            MoveDir::Down => (0, 1),
            MoveDir::Right => (1, 0),
        }
    }
}

/// One round's worth of input, decoded from a single character.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Command {
    Move(MoveDir),
    Quit,
    Restart,
    /// Anything else. Still completes a round.
    Idle(char),
}

impl Command {
    /// Commands are case-sensitive, matching the on-screen help.
    pub fn from_char(ch: char) -> Self {
        match ch {
            'w' => Command::Move(MoveDir::Up),
            'a' => Command::Move(MoveDir::Left),
            's' => Command::Move(MoveDir::Down),
            'd' => Command::Move(MoveDir::Right),
            'q' => Command::Quit,
            'r' => Command::Restart,
            other => Command::Idle(other),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn walkable_cells() {
        assert!(Cell::Empty.is_walkable());
        assert!(Cell::Coin.is_walkable());
        assert!(Cell::Item.is_walkable());
        assert!(!Cell::Hazard.is_walkable());
    }

    #[test]
    fn only_empty_is_free() {
        assert!(Cell::Empty.is_empty());
        assert!(!Cell::Hazard.is_empty());
        assert!(!Cell::Coin.is_empty());
        assert!(!Cell::Item.is_empty());
    }

    #[test]
    fn step_below_zero_is_none() {
        let origin = Position::new(0, 0);
        assert_eq!(origin.step(MoveDir::Up), None);
        assert_eq!(origin.step(MoveDir::Left), None);
        assert_eq!(origin.step(MoveDir::Down), Some(Position::new(0, 1)));
        assert_eq!(origin.step(MoveDir::Right), Some(Position::new(1, 0)));
    }

    #[test]
    fn command_decoding() {
        assert_eq!(Command::from_char('w'), Command::Move(MoveDir::Up));
        assert_eq!(Command::from_char('a'), Command::Move(MoveDir::Left));
        assert_eq!(Command::from_char('s'), Command::Move(MoveDir::Down));
        assert_eq!(Command::from_char('d'), Command::Move(MoveDir::Right));
        assert_eq!(Command::from_char('q'), Command::Quit);
        assert_eq!(Command::from_char('r'), Command::Restart);
        assert_eq!(Command::from_char('x'), Command::Idle('x'));
        // Upper case is not a command
        assert_eq!(Command::from_char('W'), Command::Idle('W'));
    }
}
