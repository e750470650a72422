//! Session state
//!
//! The session owns every subsystem plus the RNG, clock and event bus. The
//! per-tick logic lives in `tick.rs`.

use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::bonus::BonusShip;
use super::emitter::{Emitter, EmitterConfig, OpponentKind, Opponents};
use super::entity::Player;
use super::events::{EventBus, GameEvent};
use super::formation::Formation;
use super::geometry::Arena;
use super::scoring::Scoreboard;
use super::supply::SupplyDrop;
use crate::error::SimError;
use crate::highscores::HighScoreStore;
use crate::settings::Settings;

/// Session lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SessionStatus {
    /// Simulation advances every tick
    Active,
    /// Frozen after one settling tick, until resumed
    Paused,
    /// A wave was just cleared; frozen until resumed
    NewWave,
    /// Run finished; only restart does anything
    Over,
}

/// The four projectile sources, in hit-resolution order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EmitterSlot {
    Laser,
    FormationBombs,
    ShipBombs,
    SupplyDrops,
}

impl EmitterSlot {
    pub const ALL: [EmitterSlot; 4] = [
        EmitterSlot::Laser,
        EmitterSlot::FormationBombs,
        EmitterSlot::ShipBombs,
        EmitterSlot::SupplyDrops,
    ];
}

/// Everything rebuilt on restart
#[derive(Debug, Clone)]
pub struct World {
    pub player: Player,
    pub formation: Formation,
    pub bonus: BonusShip,
    pub supply: SupplyDrop,
    pub laser: Emitter,
    pub formation_bombs: Emitter,
    pub ship_bombs: Emitter,
    pub supply_drops: Emitter,
    pub scoreboard: Scoreboard,
}

impl World {
    /// Build a fresh world and register every emitter's targets
    pub fn new(arena: Arena, rng: &mut Pcg32) -> Result<Self, SimError> {
        let mut laser = Emitter::new(EmitterConfig::laser());
        laser.add_opponent(OpponentKind::Formation)?;
        laser.add_opponent(OpponentKind::BonusShip)?;

        let mut formation_bombs = Emitter::new(EmitterConfig::formation_bomb());
        formation_bombs.add_opponent(OpponentKind::Player)?;

        let mut ship_bombs = Emitter::new(EmitterConfig::ship_bomb());
        ship_bombs.add_opponent(OpponentKind::Player)?;

        let mut supply_drops = Emitter::new(EmitterConfig::supply());
        supply_drops.add_opponent(OpponentKind::Player)?;

        Ok(Self {
            player: Player::new(arena),
            formation: Formation::new(arena),
            bonus: BonusShip::new(arena, rng, 0),
            supply: SupplyDrop::new(arena),
            laser,
            formation_bombs,
            ship_bombs,
            supply_drops,
            scoreboard: Scoreboard::new(),
        })
    }

    pub fn emitter(&self, slot: EmitterSlot) -> &Emitter {
        match slot {
            EmitterSlot::Laser => &self.laser,
            EmitterSlot::FormationBombs => &self.formation_bombs,
            EmitterSlot::ShipBombs => &self.ship_bombs,
            EmitterSlot::SupplyDrops => &self.supply_drops,
        }
    }

    pub fn emitter_mut(&mut self, slot: EmitterSlot) -> &mut Emitter {
        match slot {
            EmitterSlot::Laser => &mut self.laser,
            EmitterSlot::FormationBombs => &mut self.formation_bombs,
            EmitterSlot::ShipBombs => &mut self.ship_bombs,
            EmitterSlot::SupplyDrops => &mut self.supply_drops,
        }
    }

    /// Run one emitter's hit test against the current targets
    pub fn check_hits(&mut self, slot: EmitterSlot, bus: &mut EventBus) -> usize {
        let World {
            player,
            formation,
            bonus,
            laser,
            formation_bombs,
            ship_bombs,
            supply_drops,
            ..
        } = self;
        let opponents = Opponents {
            units: formation.units(),
            bonus_ship: Some(&*bonus),
            player: Some(&*player),
        };
        let emitter = match slot {
            EmitterSlot::Laser => laser,
            EmitterSlot::FormationBombs => formation_bombs,
            EmitterSlot::ShipBombs => ship_bombs,
            EmitterSlot::SupplyDrops => supply_drops,
        };
        emitter.check_hit(&opponents, bus)
    }
}

/// One playthrough (and its restarts) of the game
pub struct Session<S: HighScoreStore> {
    pub(super) arena: Arena,
    pub(super) tick_ms: u64,
    pub(super) status: SessionStatus,
    /// Whether the one tick allowed after entering Paused/NewWave has run
    pub(super) settled: bool,
    /// Simulated milliseconds since (re)start
    pub(super) clock_ms: u64,
    /// Ticks actually simulated since (re)start
    pub(super) ticks: u64,
    pub(super) world: World,
    /// Pristine copy restored on restart
    pub(super) template: World,
    pub(super) rng: Pcg32,
    pub(super) seed: u64,
    pub(super) bus: EventBus,
    /// Events delivered during the most recent tick
    pub(super) last_events: Vec<GameEvent>,
    pub(super) high_scores: S,
}

impl<S: HighScoreStore> Session<S> {
    /// Create a session. Fails only if emitter wiring is invalid.
    pub fn new(settings: &Settings, seed: u64, high_scores: S) -> Result<Self, SimError> {
        let arena = settings.arena();
        let mut rng = Pcg32::seed_from_u64(seed);
        let template = World::new(arena, &mut rng)?;
        log::info!(
            "Session created: {}x{} arena, {} ms ticks, seed {}",
            arena.width,
            arena.height,
            settings.tick_ms,
            seed
        );

        Ok(Self {
            arena,
            tick_ms: settings.tick_ms,
            status: SessionStatus::Active,
            settled: false,
            clock_ms: 0,
            ticks: 0,
            world: template.clone(),
            template,
            rng,
            seed,
            bus: EventBus::new(),
            last_events: Vec::new(),
            high_scores,
        })
    }

    pub fn status(&self) -> SessionStatus {
        self.status
    }

    pub fn arena(&self) -> Arena {
        self.arena
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn clock_ms(&self) -> u64 {
        self.clock_ms
    }

    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    pub fn world(&self) -> &World {
        &self.world
    }

    /// Mutable access for scenario setup and tooling
    pub fn world_mut(&mut self) -> &mut World {
        &mut self.world
    }

    pub fn last_events(&self) -> &[GameEvent] {
        &self.last_events
    }

    pub fn high_scores(&self) -> &S {
        &self.high_scores
    }
}
