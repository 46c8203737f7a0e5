/// Events emitted during a round.
/// The session turns these into log lines and the status message.

use crate::domain::cell::Position;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum GameEvent {
    PlayerMoved { x: usize, y: usize },
    PlayerBurned { hp: u32 },
    CoinCollected { points: u32, score: u32 },
    ItemSpawned { x: usize, y: usize },
    PlayerHealed { hp: u32 },
    LevelAdvanced { level: u32 },
    AllLevelsCleared { score: u32 },
    PlayerDied { score: u32 },
    Restarted,
    QuitRequested,
}

impl GameEvent {
    pub fn item_spawned(pos: Position) -> Self {
        GameEvent::ItemSpawned { x: pos.x, y: pos.y }
    }

    pub fn player_moved(pos: Position) -> Self {
        GameEvent::PlayerMoved { x: pos.x, y: pos.y }
    }
}
