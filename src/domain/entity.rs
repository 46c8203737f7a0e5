/// Entities that are not grid cells. Today that is only the player;
/// hazards, coin and item are tags on the board.

use super::cell::Position;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Player {
    pub pos: Position,
    pub hp: u32,
    pub max_hp: u32,
    pub steps: u32,
}

impl Player {
    pub fn new(pos: Position, max_hp: u32) -> Self {
        Player { pos, hp: max_hp, max_hp, steps: 0 }
    }

    pub fn is_alive(&self) -> bool {
        self.hp > 0
    }

    /// Lose one HP. Never drops below zero.
    pub fn burn(&mut self) {
        self.hp = self.hp.saturating_sub(1);
    }

    /// Gain one HP if below max. Returns true if healed.
    pub fn heal(&mut self) -> bool {
        if self.hp < self.max_hp {
            self.hp += 1;
            true
        } else {
            false
        }
    }
}
