/// Session controller: owns the world for one process run.
///
/// Shows the instructions once, then loops render → wait for a command →
/// step until the world reaches `Terminated`. The input task lives for
/// exactly as long as `run`.

use std::io;

use crate::config::GameConfig;
use crate::error::GameError;
use super::bridge::{InputBridge, InputSource};
use super::event::GameEvent;
use super::step;
use super::view::RenderModel;
use super::world::{Outcome, Phase, WorldState};

/// Where frames go. The terminal renderer is one; tests record frames.
pub trait DisplaySink {
    fn show_instructions(&mut self) -> io::Result<()>;
    fn render(&mut self, model: &RenderModel) -> io::Result<()>;
    fn finish(&mut self, model: &RenderModel, outcome: Outcome) -> io::Result<()>;
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SessionReport {
    pub outcome: Outcome,
    pub score: u32,
    pub level: u32,
}

pub struct Session {
    world: WorldState,
}

impl Session {
    pub fn new(config: &GameConfig) -> Result<Self, GameError> {
        let world = WorldState::new(config.rules.clone(), config.general.seed)?;
        Ok(Self::from_world(world))
    }

    pub fn from_world(world: WorldState) -> Self {
        Session { world }
    }

    #[allow(dead_code)]
    pub fn world(&self) -> &WorldState {
        &self.world
    }

    /// Play until quit, victory or a declined restart.
    pub fn run<S: InputSource, D: DisplaySink>(
        &mut self,
        input: S,
        display: &mut D,
    ) -> Result<SessionReport, GameError> {
        let bridge = InputBridge::spawn(input);
        let result = self.play(&bridge, display);
        bridge.shutdown();
        let outcome = result?;

        log::info!(
            "session over: {:?}, level {}, score {}, steps {}",
            outcome, self.world.level, self.world.score, self.world.player.steps,
        );
        display.finish(&RenderModel::from_world(&self.world), outcome)?;

        Ok(SessionReport {
            outcome,
            score: self.world.score,
            level: self.world.level,
        })
    }

    fn play<D: DisplaySink>(&mut self, bridge: &InputBridge, display: &mut D) -> Result<Outcome, GameError> {
        display.show_instructions()?;
        // Any key leaves the instruction screen
        if bridge.recv().is_none() {
            self.world.phase = Phase::Terminated(Outcome::Quit);
        }

        loop {
            if let Phase::Terminated(outcome) = self.world.phase {
                return Ok(outcome);
            }

            display.render(&RenderModel::from_world(&self.world))?;

            let Some(ch) = bridge.recv() else {
                log::info!("input closed, leaving the game");
                self.world.phase = Phase::Terminated(Outcome::Quit);
                continue;
            };

            self.world.message.clear();
            let events = step::step(&mut self.world, ch)?;
            self.process_events(&events);
        }
    }

    fn process_events(&mut self, events: &[GameEvent]) {
        for event in events {
            match event {
                GameEvent::PlayerMoved { x, y } => {
                    log::trace!("player moved to ({x}, {y})");
                }
                GameEvent::PlayerBurned { hp } => {
                    log::debug!("player burned, hp {hp}");
                    self.world.set_message(&format!("Ouch! That fire burns. HP {hp}."));
                }
                GameEvent::CoinCollected { points, score } => {
                    log::debug!("coin +{points}, score {score}");
                    self.world.set_message(&format!("+{points} coin!"));
                }
                GameEvent::ItemSpawned { x, y } => {
                    log::debug!("healing item at ({x}, {y})");
                    self.world.set_message("A healing item appeared.");
                }
                GameEvent::PlayerHealed { hp } => {
                    log::debug!("player healed, hp {hp}");
                    self.world.set_message(&format!("Healed! HP {hp}."));
                }
                GameEvent::LevelAdvanced { level } => {
                    log::info!("advanced to level {level}");
                    self.world.set_message(&format!(
                        "Congratulations! You collected enough coins to advance to level {level}."
                    ));
                }
                GameEvent::AllLevelsCleared { score } => {
                    log::info!("all levels cleared, score {score}");
                    self.world.set_message("Congratulations! You have completed all levels.");
                }
                GameEvent::PlayerDied { score } => {
                    log::info!("out of HP, score {score}");
                    self.world.set_message(&format!(
                        "Game Over! You ran out of HP. Score {score}. Restart? (y/n)"
                    ));
                }
                GameEvent::Restarted => {
                    log::info!("game restarted");
                    self.world.set_message("Restarting the game...");
                }
                GameEvent::QuitRequested => {
                    log::info!("quit requested");
                }
            }
        }
    }
}
