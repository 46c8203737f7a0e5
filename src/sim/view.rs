/// Render model: everything a display sink needs for one frame,
/// detached from the world so the sink never touches game state.

use crate::domain::cell::{Cell, Position};
use super::world::{Phase, WorldState};

/// What to draw in one board cell.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Glyph {
    Player,
    Hazard,
    Item,
    Coin,
    Empty,
}

impl Glyph {
    pub fn symbol(self) -> char {
        match self {
            Glyph::Player => 'P',
            Glyph::Hazard => Cell::Hazard.symbol(),
            Glyph::Item => Cell::Item.symbol(),
            Glyph::Coin => Cell::Coin.symbol(),
            Glyph::Empty => Cell::Empty.symbol(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RenderModel {
    pub level: u32,
    pub hp: u32,
    pub max_hp: u32,
    pub score: u32,
    pub coin_target: u32,
    pub step_count: u32,
    pub width: usize,
    pub height: usize,
    /// Row-major, `width * height` entries.
    pub glyphs: Vec<Glyph>,
    pub phase: Phase,
    pub message: String,
}

impl RenderModel {
    pub fn from_world(w: &WorldState) -> Self {
        let (width, height) = (w.board.width(), w.board.height());
        let mut glyphs = Vec::with_capacity(width * height);
        for y in 0..height {
            for x in 0..width {
                glyphs.push(glyph_at(w, Position::new(x, y)));
            }
        }

        RenderModel {
            level: w.level,
            hp: w.player.hp,
            max_hp: w.player.max_hp,
            score: w.score,
            coin_target: w.coin_target,
            step_count: w.player.steps,
            width,
            height,
            glyphs,
            phase: w.phase,
            message: w.message.clone(),
        }
    }

    pub fn glyph(&self, x: usize, y: usize) -> Glyph {
        if x < self.width && y < self.height {
            self.glyphs[y * self.width + x]
        } else {
            Glyph::Empty
        }
    }

    /// One string per board row, symbols only.
    pub fn rows(&self) -> Vec<String> {
        (0..self.height)
            .map(|y| (0..self.width).map(|x| self.glyph(x, y).symbol()).collect())
            .collect()
    }
}

/// Priority: player, fire, item (only while present), coin.
fn glyph_at(w: &WorldState, pos: Position) -> Glyph {
    if w.player.pos == pos {
        return Glyph::Player;
    }
    match w.board.get(pos) {
        Some(Cell::Hazard) => Glyph::Hazard,
        Some(Cell::Item) if w.item == Some(pos) => Glyph::Item,
        Some(Cell::Coin) => Glyph::Coin,
        _ => Glyph::Empty,
    }
}
