//! Fixed timestep simulation tick
//!
//! Order within one stepped tick: player input, formation, bonus ship and
//! supply drop movement, then for each emitter its hit test followed by event
//! delivery, cull and advance. The wave-completion check runs last, so a
//! wave is advanced at most once per tick.

use super::emitter::Faction;
use super::entity::{Collidable, Direction, Movable};
use super::events::{GameEvent, GameOverCause};
use super::state::{EmitterSlot, Session, SessionStatus};
use crate::error::SimError;
use crate::highscores::HighScoreStore;

/// Input commands for a single tick
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    pub move_left: bool,
    /// Wins over `move_left` when both are held
    pub move_right: bool,
    pub fire: bool,
    pub pause: bool,
    /// Leave Paused or NewWave
    pub resume: bool,
    /// Start over after game over
    pub restart: bool,
}

/// Advance the session by one fixed timestep
///
/// Errors are precondition violations (an entity asked to move where it
/// cannot) and leave the tick half applied.
pub fn tick<S: HighScoreStore>(
    session: &mut Session<S>,
    input: &TickInput,
) -> Result<(), SimError> {
    session.tick(input)
}

impl<S: HighScoreStore> Session<S> {
    /// Advance the session by one fixed timestep
    pub fn tick(&mut self, input: &TickInput) -> Result<(), SimError> {
        self.last_events.clear();

        if self.status == SessionStatus::Active && input.pause {
            log::info!("Paused at {} ms", self.clock_ms);
            self.status = SessionStatus::Paused;
            self.settled = false;
        }

        match self.status {
            SessionStatus::Active => self.advance(input)?,
            SessionStatus::Paused | SessionStatus::NewWave => {
                if !self.settled {
                    self.settled = true;
                    self.advance(input)?;
                } else if input.resume {
                    log::info!("Resumed from {:?} at {} ms", self.status, self.clock_ms);
                    self.status = SessionStatus::Active;
                }
            }
            SessionStatus::Over => {
                if input.restart {
                    self.restart();
                }
            }
        }
        Ok(())
    }

    /// One full simulation step
    fn advance(&mut self, input: &TickInput) -> Result<(), SimError> {
        self.clock_ms += self.tick_ms;
        self.ticks += 1;
        let now = self.clock_ms;

        let world = &mut self.world;
        let speed = world.player.speed;
        if input.move_right {
            world.player.step(Direction::Right, speed)?;
        } else if input.move_left {
            world.player.step(Direction::Left, speed)?;
        }
        if input.fire {
            world.laser.launch(world.player.bounds(), now);
        }

        world.formation.update(&mut self.bus)?;
        if let Some(origin) = world.formation.pick_shooter(&mut self.rng) {
            world.formation_bombs.launch(origin, now);
        }
        if world.bonus.update(now, &mut self.rng)? {
            world.ship_bombs.launch(world.bonus.bounds(), now);
        }
        if let Some(origin) = world.supply.update(now, &mut self.rng) {
            world.supply_drops.launch(origin, now);
        }

        self.dispatch();
        if self.status == SessionStatus::Over {
            return Ok(());
        }

        for slot in EmitterSlot::ALL {
            self.world.check_hits(slot, &mut self.bus);
            self.dispatch();
            if self.status == SessionStatus::Over {
                return Ok(());
            }
            let emitter = self.world.emitter_mut(slot);
            emitter.cull(&self.arena);
            emitter.advance();
        }

        self.world.formation.check_wave_complete(&mut self.bus);
        self.dispatch();
        Ok(())
    }

    /// Deliver every queued event, including ones raised while delivering
    fn dispatch(&mut self) {
        while let Some(event) = self.bus.pop() {
            match event {
                GameEvent::UnitHit { index, points } => {
                    self.world.formation.on_unit_hit(index);
                    self.world.scoreboard.add_points(points as u64);
                }
                GameEvent::BonusShipHit { points } => {
                    self.world.bonus.on_hit();
                    self.world.scoreboard.add_points(points);
                }
                GameEvent::PlayerHit { faction, damage } => {
                    if faction == Faction::Supply {
                        log::debug!("Supply collected");
                    }
                    if self.world.scoreboard.on_player_hit(damage) {
                        self.bus.publish(GameEvent::GameOver {
                            cause: GameOverCause::HealthDepleted,
                        });
                    }
                }
                GameEvent::ReachedBottom => {
                    self.bus.publish(GameEvent::GameOver {
                        cause: GameOverCause::FormationLanded,
                    });
                }
                GameEvent::NewWave { wave } => {
                    if self.status != SessionStatus::Over {
                        self.status = SessionStatus::NewWave;
                        // The tick in flight is the settling tick
                        self.settled = true;
                    }
                    self.world
                        .bonus
                        .on_new_wave(wave, &mut self.rng, self.clock_ms);
                    for slot in EmitterSlot::ALL {
                        self.world.emitter_mut(slot).on_new_wave(wave);
                    }
                    self.world.scoreboard.on_new_wave(wave);
                }
                GameEvent::GameOver { cause } => {
                    if !self.enter_over(cause) {
                        continue;
                    }
                }
            }
            self.last_events.push(event);
        }
    }

    /// Returns false if the session was already over
    fn enter_over(&mut self, cause: GameOverCause) -> bool {
        if self.status == SessionStatus::Over {
            return false;
        }
        self.status = SessionStatus::Over;
        let score = self.world.scoreboard.score;
        let best = self.high_scores.save(score);
        log::info!(
            "Game over ({:?}) in wave {} with score {}{}",
            cause,
            self.world.scoreboard.wave,
            score,
            if best { " - new high score!" } else { "" }
        );
        true
    }

    fn restart(&mut self) {
        log::info!("Restarting session");
        self.world = self.template.clone();
        self.world.bonus.reset(&mut self.rng, 0);
        self.clock_ms = 0;
        self.ticks = 0;
        self.bus.clear();
        self.status = SessionStatus::Active;
        self.settled = false;
    }
}
