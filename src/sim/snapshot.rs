//! Read-only view handed to render sinks
//!
//! Nothing in here feeds back into the simulation.

use serde::Serialize;

use super::entity::{Heading, Renderable, Sprite};
use super::state::{EmitterSlot, Session, SessionStatus};
use crate::highscores::HighScoreStore;

#[derive(Debug, Clone, Serialize)]
pub struct Snapshot {
    pub status: SessionStatus,
    pub clock_ms: u64,
    pub score: u64,
    pub health: i32,
    pub wave: u32,
    pub formation_speed: f32,
    pub formation_heading: Heading,
    pub player: Sprite,
    /// All 60 slots, dead ones included
    pub units: Vec<Sprite>,
    pub bonus_ship: Sprite,
    /// Live projectiles of every emitter
    pub projectiles: Vec<Sprite>,
    /// Stored best score, only filled in once the run is over
    pub high_score: Option<u64>,
}

impl<S: HighScoreStore> Session<S> {
    pub fn snapshot(&self) -> Snapshot {
        let world = &self.world;
        let projectiles = EmitterSlot::ALL
            .iter()
            .flat_map(|&slot| world.emitter(slot).projectiles())
            .map(|p| p.sprite())
            .collect();

        Snapshot {
            status: self.status,
            clock_ms: self.clock_ms,
            score: world.scoreboard.score,
            health: world.scoreboard.health,
            wave: world.scoreboard.wave,
            formation_speed: world.formation.speed(),
            formation_heading: world.formation.heading(),
            player: world.player.sprite(),
            units: world.formation.units().iter().map(|u| u.sprite()).collect(),
            bonus_ship: world.bonus.sprite(),
            projectiles,
            high_score: (self.status == SessionStatus::Over).then(|| self.high_scores.load()),
        }
    }
}
