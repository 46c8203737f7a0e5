/// WorldState: the complete state of a running session.
///
/// ## Ownership
///
/// The round task owns the world exclusively. Nothing in here is shared
/// across threads; the input task only ever hands over characters.
///
/// ## Lifecycle
///
///   - `init_game`  rebuilds the board and every entity for the current
///     level. Player HP, score and step count survive it.
///   - `reset_game` restores every session field to its default and then
///     calls `init_game`.

use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::config::RulesConfig;
use crate::domain::board::Board;
use crate::domain::cell::{Cell, Position};
use crate::domain::entity::Player;
use crate::error::GameError;

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Outcome {
    Quit,
    Victory,
    GameOver,
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Phase {
    Playing,
    /// A level was just cleared; the next round plays as normal.
    LevelAdvance,
    /// HP ran out; the next command answers "restart? (y/n)".
    GameOverPrompt,
    Terminated(Outcome),
}

impl Phase {
    pub fn is_terminated(self) -> bool {
        matches!(self, Phase::Terminated(_))
    }
}

/// Free cells hazard refresh always leaves behind: room for the
/// healing item and a coin respawn in the same round.
const HAZARD_HEADROOM: usize = 2;

pub struct WorldState {
    pub rules: RulesConfig,

    // ── Board & entities ──
    pub board: Board,
    pub player: Player,
    pub hazards: Vec<Position>,
    pub coin: Position,
    /// `Some` only while the healing item is on the board.
    pub item: Option<Position>,

    // ── Progression ──
    pub level: u32,
    pub score: u32,
    pub coin_target: u32,
    pub fire_count: usize,

    // ── Timers ──
    pub item_timer: u32,
    pub rounds_in_level: u32,

    // ── Meta ──
    pub phase: Phase,
    pub message: String,

    rng: StdRng,
}

// ── Construction ──

impl WorldState {
    /// Build a session at level 1. `seed` makes every random draw repeatable.
    pub fn new(rules: RulesConfig, seed: Option<u64>) -> Result<Self, GameError> {
        let rng = match seed {
            Some(s) => StdRng::seed_from_u64(s),
            None => StdRng::from_entropy(),
        };
        let mut world = WorldState {
            board: Board::for_level(1),
            player: Player::new(Position::default(), rules.max_hp),
            hazards: vec![],
            coin: Position::default(),
            item: None,
            level: 1,
            score: 0,
            coin_target: rules.coin_target,
            fire_count: rules.fire_count,
            item_timer: 0,
            rounds_in_level: 0,
            phase: Phase::Playing,
            message: String::new(),
            rules,
            rng,
        };
        world.reset_game()?;
        Ok(world)
    }

    pub fn rng(&mut self) -> &mut StdRng {
        &mut self.rng
    }

    pub fn set_message(&mut self, msg: &str) {
        self.message = msg.to_string();
    }
}

// ── Level setup ──

impl WorldState {
    /// Rebuild the board for `self.level`: fresh grid, player centred,
    /// `fire_count` fires, one coin, no item.
    pub fn init_game(&mut self) -> Result<(), GameError> {
        self.board = Board::for_level(self.level);
        self.player.pos = Position::new(self.board.width() / 2, self.board.height() / 2);

        self.hazards.clear();
        for _ in 0..self.fire_count {
            let pos = self.board.place_random(&mut self.rng, Cell::Hazard, self.player.pos)?;
            self.hazards.push(pos);
        }

        self.coin = self.board.place_random(&mut self.rng, Cell::Coin, self.player.pos)?;
        self.item = None;
        self.item_timer = 0;
        Ok(())
    }

    /// Back to level 1 with full HP and zero score.
    pub fn reset_game(&mut self) -> Result<(), GameError> {
        self.level = 1;
        self.player.max_hp = self.rules.max_hp;
        self.player.hp = self.rules.max_hp;
        self.player.steps = 0;
        self.score = 0;
        self.coin_target = self.rules.coin_target;
        self.fire_count = self.rules.fire_count;
        self.rounds_in_level = 0;
        self.phase = Phase::Playing;
        self.message.clear();
        self.init_game()
    }
}

// ── Per-round entity refresh ──

impl WorldState {
    /// Fires wanted this round: the base count plus one per ramp period.
    pub fn hazard_target(&self) -> usize {
        self.fire_count + (self.rounds_in_level / self.rules.hazard_ramp_rounds) as usize
    }

    /// Wipe every fire and scatter a fresh set. Returns how many were placed.
    pub fn refresh_hazards(&mut self) -> Result<usize, GameError> {
        self.board.clear_all(Cell::Hazard);
        self.hazards.clear();

        let free = self.board.free_count(self.player.pos);
        let count = self.hazard_target().min(free.saturating_sub(HAZARD_HEADROOM));
        for _ in 0..count {
            let pos = self.board.place_random(&mut self.rng, Cell::Hazard, self.player.pos)?;
            self.hazards.push(pos);
        }
        Ok(count)
    }

    /// Clear the current coin and drop a new one on a random free cell.
    pub fn respawn_coin(&mut self) -> Result<Position, GameError> {
        self.board.clear(self.coin);
        self.coin = self.board.place_random(&mut self.rng, Cell::Coin, self.player.pos)?;
        Ok(self.coin)
    }

    /// Put the healing item on the first free cell, row-major.
    pub fn spawn_item(&mut self) -> Result<Position, GameError> {
        let pos = self.board.place_first_empty(Cell::Item, self.player.pos)?;
        self.item = Some(pos);
        Ok(pos)
    }

    pub fn remove_item(&mut self) {
        if let Some(pos) = self.item.take() {
            self.board.clear(pos);
        }
    }
}
