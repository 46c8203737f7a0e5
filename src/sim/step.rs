/// The step function: advances the world by one round.
///
/// Processing order (Playing / LevelAdvance):
///   1. Quit / restart commands
///   2. Player movement
///   3. Hazard refresh (every fire re-rolled)
///   4. Item timer
///   5. Collisions (coin, healing item)
///   6. Level check
///   7. HP check
///   8. Round counter
///
/// The level check runs before the HP check. Both are evaluated every round.
/// In GameOverPrompt the command is the answer to "restart? (y/n)".

use rand::Rng;

use crate::domain::cell::{Command, MoveDir};
use crate::domain::rules::{self, MoveOutcome};
use crate::error::GameError;
use super::event::GameEvent;
use super::world::{Outcome, Phase, WorldState};

/// A coin is worth this times 1 or 2.
const COIN_VALUE: u32 = 10;

// ══════════════════════════════════════════════════════════════
// Main entry point
// ══════════════════════════════════════════════════════════════

pub fn step(world: &mut WorldState, input: char) -> Result<Vec<GameEvent>, GameError> {
    let mut events = Vec::new();

    match world.phase {
        Phase::Terminated(_) => {}
        Phase::GameOverPrompt => resolve_prompt(world, input, &mut events)?,
        Phase::Playing | Phase::LevelAdvance => {
            world.phase = Phase::Playing;
            play_round(world, Command::from_char(input), &mut events)?;
        }
    }

    Ok(events)
}

fn play_round(world: &mut WorldState, command: Command, events: &mut Vec<GameEvent>) -> Result<(), GameError> {
    match command {
        Command::Quit => {
            world.phase = Phase::Terminated(Outcome::Quit);
            events.push(GameEvent::QuitRequested);
            return Ok(());
        }
        Command::Restart => {
            world.reset_game()?;
            events.push(GameEvent::Restarted);
            return Ok(());
        }
        Command::Move(dir) => resolve_player_movement(world, dir, events),
        Command::Idle(ch) => log::trace!("ignored input {ch:?}"),
    }

    world.refresh_hazards()?;
    resolve_item_timer(world, events)?;
    resolve_coin_pickup(world, events)?;
    resolve_item_pickup(world, events);
    resolve_level(world, events)?;
    resolve_death(world, events);

    world.rounds_in_level += 1;
    Ok(())
}

// ══════════════════════════════════════════════════════════════
// Movement
// ══════════════════════════════════════════════════════════════

fn resolve_player_movement(world: &mut WorldState, dir: MoveDir, events: &mut Vec<GameEvent>) {
    match rules::resolve_move(&world.board, &mut world.player, dir) {
        MoveOutcome::Moved => events.push(GameEvent::player_moved(world.player.pos)),
        MoveOutcome::Burned => events.push(GameEvent::PlayerBurned { hp: world.player.hp }),
        MoveOutcome::OutOfBounds => {}
    }
}

// ══════════════════════════════════════════════════════════════
// Item timer
// ══════════════════════════════════════════════════════════════

/// The timer ticks every round; a spawn happens only while no item is out.
fn resolve_item_timer(world: &mut WorldState, events: &mut Vec<GameEvent>) -> Result<(), GameError> {
    world.item_timer += 1;
    if world.item_timer >= world.rules.item_rounds && world.item.is_none() {
        let pos = world.spawn_item()?;
        world.item_timer = 0;
        events.push(GameEvent::item_spawned(pos));
    }
    Ok(())
}

// ══════════════════════════════════════════════════════════════
// Collisions
// ══════════════════════════════════════════════════════════════

fn resolve_coin_pickup(world: &mut WorldState, events: &mut Vec<GameEvent>) -> Result<(), GameError> {
    if world.player.pos != world.coin { return Ok(()); }

    let points = COIN_VALUE * world.rng().gen_range(1..=2);
    world.score += points;
    world.respawn_coin()?;
    events.push(GameEvent::CoinCollected { points, score: world.score });
    Ok(())
}

/// At full HP the item stays where it is.
fn resolve_item_pickup(world: &mut WorldState, events: &mut Vec<GameEvent>) {
    if world.item != Some(world.player.pos) { return; }

    if world.player.heal() {
        world.remove_item();
        events.push(GameEvent::PlayerHealed { hp: world.player.hp });
    }
}

// ══════════════════════════════════════════════════════════════
// Level / HP transitions
// ══════════════════════════════════════════════════════════════

fn resolve_level(world: &mut WorldState, events: &mut Vec<GameEvent>) -> Result<(), GameError> {
    if world.score < world.coin_target { return Ok(()); }

    if world.level >= world.rules.max_level {
        world.phase = Phase::Terminated(Outcome::Victory);
        events.push(GameEvent::AllLevelsCleared { score: world.score });
        return Ok(());
    }

    world.level += 1;
    world.coin_target += world.rules.coin_target_step;
    world.rounds_in_level = 0;
    world.init_game()?;
    world.phase = Phase::LevelAdvance;
    events.push(GameEvent::LevelAdvanced { level: world.level });
    Ok(())
}

/// A finished game stays finished even if the last round also emptied HP.
fn resolve_death(world: &mut WorldState, events: &mut Vec<GameEvent>) {
    if world.player.is_alive() || world.phase.is_terminated() { return; }

    world.phase = Phase::GameOverPrompt;
    events.push(GameEvent::PlayerDied { score: world.score });
}

fn resolve_prompt(world: &mut WorldState, answer: char, events: &mut Vec<GameEvent>) -> Result<(), GameError> {
    if matches!(answer, 'y' | 'Y') {
        world.reset_game()?;
        events.push(GameEvent::Restarted);
    } else {
        world.phase = Phase::Terminated(Outcome::GameOver);
    }
    Ok(())
}

// ══════════════════════════════════════════════════════════════
// Unit tests
// ══════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RulesConfig;
    use crate::domain::board::Board;
    use crate::domain::cell::{Cell, Position};

    fn world() -> WorldState {
        WorldState::new(RulesConfig::default(), Some(99)).unwrap()
    }

    /// Replace the board with a diagram. 'P' marks the player, 'C' the coin.
    /// Hazards and item are read back from the diagram.
    fn stage(w: &mut WorldState, rows: &[&str]) {
        let board = Board::from_rows(rows);
        for (y, row) in rows.iter().enumerate() {
            for (x, ch) in row.chars().enumerate() {
                if ch == 'P' {
                    w.player.pos = Position::new(x, y);
                }
            }
        }
        w.hazards = board.positions_of(Cell::Hazard).collect();
        w.item = board.positions_of(Cell::Item).next();
        w.coin = board.positions_of(Cell::Coin).next().expect("diagram needs a coin");
        w.board = board;
    }

    /// Move the coin under the player's next step.
    fn coin_right_of_player(w: &mut WorldState) {
        w.board.clear(w.coin);
        let target = Position::new(w.player.pos.x + 1, w.player.pos.y);
        w.board.clear(target);
        w.hazards.retain(|h| *h != target);
        if w.item == Some(target) { w.item = None; }
        w.board.set(target, Cell::Coin);
        w.coin = target;
    }

    #[test]
    fn quit_terminates() {
        let mut w = world();
        let events = step(&mut w, 'q').unwrap();
        assert_eq!(w.phase, Phase::Terminated(Outcome::Quit));
        assert_eq!(events, vec![GameEvent::QuitRequested]);
    }

    #[test]
    fn terminated_ignores_input() {
        let mut w = world();
        step(&mut w, 'q').unwrap();
        let before = w.player.pos;
        assert!(step(&mut w, 'd').unwrap().is_empty());
        assert_eq!(w.player.pos, before);
        assert_eq!(w.phase, Phase::Terminated(Outcome::Quit));
    }

    #[test]
    fn restart_resets_and_skips_round() {
        let mut w = world();
        w.score = 30;
        w.player.hp = 1;
        w.rounds_in_level = 7;
        w.item_timer = 3;
        let events = step(&mut w, 'r').unwrap();
        assert_eq!(events, vec![GameEvent::Restarted]);
        assert_eq!(w.score, 0);
        assert_eq!(w.player.hp, 4);
        // Skipped the rest of the round: no counters advanced
        assert_eq!(w.rounds_in_level, 0);
        assert_eq!(w.item_timer, 0);
    }

    #[test]
    fn unknown_command_still_completes_round() {
        let mut w = world();
        let pos = w.player.pos;
        step(&mut w, 'x').unwrap();
        assert_eq!(w.player.pos, pos);
        assert_eq!(w.rounds_in_level, 1);
        assert_eq!(w.item_timer, 1);
    }

    #[test]
    fn hazards_regenerate_each_round() {
        let mut w = world();
        for round in 0..25u32 {
            assert_eq!(w.rounds_in_level, round);
            step(&mut w, 'x').unwrap();
            let expected = 2 + (round / 10) as usize;
            assert_eq!(w.hazards.len(), expected);
            assert_eq!(w.board.positions_of(Cell::Hazard).count(), expected);
            assert!(!w.hazards.contains(&w.player.pos));
        }
    }

    #[test]
    fn hazard_move_burns_in_place() {
        let mut w = world();
        stage(&mut w, &[
            "C         ",
            "          ",
            "    PF    ",
            "          ",
            "          ",
        ]);
        let events = step(&mut w, 'd').unwrap();
        assert_eq!(w.player.hp, 3);
        assert_eq!(w.player.pos, Position::new(4, 2));
        assert_eq!(w.player.steps, 0);
        assert!(events.contains(&GameEvent::PlayerBurned { hp: 3 }));
    }

    #[test]
    fn off_board_move_costs_nothing() {
        let mut w = world();
        stage(&mut w, &[
            "P        C",
            "          ",
            "          ",
            "          ",
            "          ",
        ]);
        step(&mut w, 'w').unwrap();
        step(&mut w, 'a').unwrap();
        assert_eq!(w.player.pos, Position::new(0, 0));
        assert_eq!(w.player.hp, 4);
        assert_eq!(w.player.steps, 0);
    }

    #[test]
    fn coin_pickup_scores_and_relocates() {
        let mut w = world();
        for _ in 0..20 {
            w.score = 0;
            coin_right_of_player(&mut w);
            let old_coin = w.coin;
            let events = step(&mut w, 'd').unwrap();

            assert!(w.score == 10 || w.score == 20, "score {}", w.score);
            assert_eq!(w.player.pos, old_coin);
            assert_ne!(w.coin, old_coin);
            assert_eq!(w.board.get(w.coin), Some(Cell::Coin));
            assert_eq!(w.board.positions_of(Cell::Coin).count(), 1);
            assert!(matches!(events.last(), Some(GameEvent::CoinCollected { .. })));

            // walk back so the next coin has room on the right
            w.player.pos = Position::new(2, 2);
        }
    }

    #[test]
    fn five_coins_reach_level_two() {
        let mut w = world();
        let mut pickups = 0;
        while w.level == 1 {
            w.player.pos = Position::new(1, 1);
            coin_right_of_player(&mut w);
            step(&mut w, 'd').unwrap();
            pickups += 1;
            assert!(pickups <= 5, "50 points never need more than 5 coins");
        }
        assert!(w.score >= 50);
        assert_eq!(w.level, 2);
        assert_eq!(w.coin_target, 100);
        assert_eq!((w.board.width(), w.board.height()), (15, 8));
        assert_eq!(w.player.pos, Position::new(7, 4));
        assert_eq!(w.phase, Phase::LevelAdvance);
        assert_eq!(w.hazards.len(), 2);
        // counter was reset then counted this round
        assert_eq!(w.rounds_in_level, 1);

        // The next round plays normally
        step(&mut w, 'x').unwrap();
        assert_eq!(w.phase, Phase::Playing);
    }

    #[test]
    fn level_up_keeps_hp() {
        let mut w = world();
        w.player.hp = 2;
        w.score = 45;
        w.player.pos = Position::new(1, 1);
        coin_right_of_player(&mut w);
        step(&mut w, 'd').unwrap();
        assert_eq!(w.level, 2);
        assert_eq!(w.player.hp, 2);
    }

    #[test]
    fn clearing_last_level_is_victory() {
        let mut w = world();
        w.level = 3;
        w.coin_target = 150;
        w.init_game().unwrap();
        w.score = 145;
        coin_right_of_player(&mut w);
        let events = step(&mut w, 'd').unwrap();
        assert_eq!(w.phase, Phase::Terminated(Outcome::Victory));
        assert_eq!(w.level, 3);
        assert!(matches!(events.last(), Some(GameEvent::AllLevelsCleared { .. })));
    }

    #[test]
    fn victory_beats_death_in_same_round() {
        let mut w = world();
        w.level = 3;
        w.init_game().unwrap();
        w.score = w.coin_target;
        w.player.hp = 0;
        step(&mut w, 'x').unwrap();
        assert_eq!(w.phase, Phase::Terminated(Outcome::Victory));
    }

    #[test]
    fn level_advance_then_death_in_same_round() {
        let mut w = world();
        w.score = 50;
        w.player.hp = 0;
        let events = step(&mut w, 'x').unwrap();
        assert_eq!(w.level, 2);
        assert_eq!(w.phase, Phase::GameOverPrompt);
        let level_idx = events.iter().position(|e| matches!(e, GameEvent::LevelAdvanced { .. }));
        let death_idx = events.iter().position(|e| matches!(e, GameEvent::PlayerDied { .. }));
        assert!(level_idx.unwrap() < death_idx.unwrap());
    }

    #[test]
    fn last_hp_into_fire_prompts_then_restart() {
        let mut w = world();
        w.level = 2;
        w.coin_target = 100;
        w.score = 70;
        w.init_game().unwrap();
        w.player.hp = 1;
        stage(&mut w, &[
            "C              ",
            "               ",
            "               ",
            "               ",
            "       PF      ",
            "               ",
            "               ",
            "               ",
        ]);
        step(&mut w, 'd').unwrap();
        assert_eq!(w.player.hp, 0);
        assert_eq!(w.phase, Phase::GameOverPrompt);

        let events = step(&mut w, 'y').unwrap();
        assert_eq!(events, vec![GameEvent::Restarted]);
        assert_eq!(w.phase, Phase::Playing);
        assert_eq!(w.player.hp, 4);
        assert_eq!(w.level, 1);
        assert_eq!(w.score, 0);
        assert_eq!(w.coin_target, 50);
    }

    #[test]
    fn declining_prompt_ends_game() {
        let mut w = world();
        w.player.hp = 0;
        step(&mut w, 'x').unwrap();
        assert_eq!(w.phase, Phase::GameOverPrompt);
        step(&mut w, 'n').unwrap();
        assert_eq!(w.phase, Phase::Terminated(Outcome::GameOver));
    }

    #[test]
    fn prompt_accepts_upper_case_yes() {
        let mut w = world();
        w.player.hp = 0;
        step(&mut w, 'x').unwrap();
        step(&mut w, 'Y').unwrap();
        assert_eq!(w.phase, Phase::Playing);
        assert_eq!(w.player.hp, 4);
    }

    #[test]
    fn item_spawns_after_five_rounds_and_heals() {
        let mut w = world();
        w.player.hp = 3;
        for round in 1..=5u32 {
            step(&mut w, 'x').unwrap();
            if round < 5 {
                assert!(w.item.is_none(), "item too early at round {round}");
            }
        }
        let item = w.item.expect("item after 5 rounds");
        assert_eq!(w.item_timer, 0);
        assert_eq!(w.board.get(item), Some(Cell::Item));

        // First free cell in row-major order once the item is lifted off
        w.board.clear(item);
        let first_free = w.board.free_cells(w.player.pos).next().unwrap();
        w.board.set(item, Cell::Item);
        assert_eq!(item, first_free);

        // Stand right of it and step in
        let from = Position::new(item.x + 1, item.y);
        if w.board.get(from) == Some(Cell::Hazard) {
            w.board.clear(from);
            w.hazards.retain(|h| *h != from);
        }
        w.player.pos = from;
        if w.coin == from {
            w.respawn_coin().unwrap();
        }
        let events = step(&mut w, 'a').unwrap();
        assert_eq!(w.player.pos, item);
        assert_eq!(w.player.hp, 4);
        assert_eq!(w.item, None);
        assert_ne!(w.board.get(item), Some(Cell::Item));
        assert!(events.contains(&GameEvent::PlayerHealed { hp: 4 }));
    }

    #[test]
    fn item_stays_at_full_hp() {
        let mut w = world();
        stage(&mut w, &[
            "C         ",
            "          ",
            "    PH    ",
            "          ",
            "          ",
        ]);
        step(&mut w, 'd').unwrap();
        assert_eq!(w.player.hp, 4);
        assert_eq!(w.item, Some(Position::new(5, 2)));
        assert_eq!(w.board.get(Position::new(5, 2)), Some(Cell::Item));
    }

    #[test]
    fn no_second_item_while_one_is_out() {
        let mut w = world();
        for _ in 0..30 {
            step(&mut w, 'x').unwrap();
            assert!(w.board.positions_of(Cell::Item).count() <= 1);
        }
        assert!(w.item.is_some());
    }
}
