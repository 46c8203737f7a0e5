/// Player movement rules. Pure functions over Board + Player.
/// No RNG, no side effects beyond the player passed in.

use super::board::Board;
use super::cell::{Cell, MoveDir};
use super::entity::Player;

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum MoveOutcome {
    /// Position updated, step counted.
    Moved,
    /// Destination off-board. Nothing happens.
    OutOfBounds,
    /// Destination is a fire. Player stays put and loses 1 HP.
    Burned,
}

/// Resolve one directional move against the board.
///
/// Empty, Coin and Item cells accept the player; pickups are resolved later
/// in the round by the collision pass, not here.
pub fn resolve_move(board: &Board, player: &mut Player, dir: MoveDir) -> MoveOutcome {
    let Some(dest) = player.pos.step(dir) else {
        return MoveOutcome::OutOfBounds;
    };

    match board.get(dest) {
        None => MoveOutcome::OutOfBounds,
        Some(Cell::Hazard) => {
            player.burn();
            MoveOutcome::Burned
        }
        Some(cell) => {
            debug_assert!(cell.is_walkable());
            player.pos = dest;
            player.steps += 1;
            MoveOutcome::Moved
        }
    }
}

// ══════════════════════════════════════════════════════════════
// Unit tests
// ══════════════════════════════════════════════════════════════
