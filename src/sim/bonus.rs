//! Bonus ship controller
//!
//! A single high-value target that crosses the top of the arena, waits
//! offscreen for a random delay, then comes back the other way.

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::entity::{Collidable, Direction, Heading, Movable, Renderable, Sprite, SpriteKind};
use super::geometry::{Aabb, Arena};
use crate::consts::*;
use crate::error::SimError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ShipPhase {
    /// Parked outside the arena until the clock reaches `reappear_at_ms`
    Offscreen { reappear_at_ms: u64 },
    Moving,
    /// Shot down; stays down until the next wave
    Destroyed,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BonusShip {
    pub pos: Vec2,
    pub size: Vec2,
    pub heading: Heading,
    pub speed: f32,
    pub point_value: u64,
    phase: ShipPhase,
    arena: Arena,
}

impl BonusShip {
    /// Create the ship parked on a random side, waiting to enter
    pub fn new(arena: Arena, rng: &mut impl Rng, now_ms: u64) -> Self {
        let mut ship = Self {
            pos: Vec2::new(0.0, SHIP_ALTITUDE),
            size: Vec2::new(SHIP_WIDTH, SHIP_HEIGHT),
            heading: Heading::Left,
            speed: SHIP_BASE_SPEED,
            point_value: SHIP_BASE_POINTS,
            phase: ShipPhase::Destroyed,
            arena,
        };
        ship.reset(rng, now_ms);
        ship
    }

    pub fn phase(&self) -> ShipPhase {
        self.phase
    }

    /// Any part of the hull inside the arena's horizontal span
    pub fn is_visible(&self) -> bool {
        self.pos.x + self.size.x > 0.0 && self.pos.x < self.arena.width
    }

    fn roll_delay(rng: &mut impl Rng) -> u64 {
        let (min, max) = SHIP_REAPPEAR_SECS;
        rng.random_range(min..=max) * 1000
    }

    /// Pick a side, park just outside it and start the entry timer
    pub fn reset(&mut self, rng: &mut impl Rng, now_ms: u64) {
        if rng.random_bool(0.5) {
            self.pos.x = self.arena.width + 1.0;
            self.heading = Heading::Left;
        } else {
            self.pos.x = -self.size.x;
            self.heading = Heading::Right;
        }
        self.pos.y = SHIP_ALTITUDE;
        self.phase = ShipPhase::Offscreen {
            reappear_at_ms: now_ms + Self::roll_delay(rng),
        };
    }

    fn has_exited(&self) -> bool {
        match self.heading {
            Heading::Right => self.pos.x >= self.arena.width,
            Heading::Left => self.pos.x + self.size.x <= 0.0,
        }
    }

    /// Advance one tick. Returns true whenever the ship is alive: it tries to
    /// drop a bomb every tick, parked or not, and the emitter's cooldown
    /// decides whether one actually leaves.
    pub fn update(&mut self, now_ms: u64, rng: &mut impl Rng) -> Result<bool, SimError> {
        match self.phase {
            ShipPhase::Destroyed => return Ok(false),
            ShipPhase::Offscreen { reappear_at_ms } => {
                if now_ms >= reappear_at_ms {
                    log::debug!("Bonus ship entering heading {:?}", self.heading);
                    self.phase = ShipPhase::Moving;
                }
            }
            ShipPhase::Moving => {
                if self.has_exited() {
                    self.heading = self.heading.flipped();
                    self.phase = ShipPhase::Offscreen {
                        reappear_at_ms: now_ms + Self::roll_delay(rng),
                    };
                } else {
                    self.step(self.heading.into(), self.speed)?;
                }
            }
        }
        Ok(true)
    }

    pub fn on_hit(&mut self) {
        log::info!("Bonus ship destroyed ({} points)", self.point_value);
        self.phase = ShipPhase::Destroyed;
    }

    /// Re-arm for wave `wave` with more points and, up to a cap, more speed
    pub fn on_new_wave(&mut self, wave: u32, rng: &mut impl Rng, now_ms: u64) {
        self.point_value += SHIP_WAVE_POINTS * wave as u64;
        if wave <= SHIP_SPEEDUP_LAST_WAVE {
            self.speed += SHIP_WAVE_SPEEDUP * wave as f32;
        }
        self.reset(rng, now_ms);
    }
}

impl Movable for BonusShip {
    fn step(&mut self, direction: Direction, distance: f32) -> Result<(), SimError> {
        match direction {
            Direction::Left => self.pos.x -= distance,
            Direction::Right => self.pos.x += distance,
            Direction::Down => {
                return Err(SimError::IllegalMove {
                    entity: "bonus ship",
                    direction,
                });
            }
        }
        Ok(())
    }
}

impl Collidable for BonusShip {
    fn bounds(&self) -> Aabb {
        Aabb::from_pos(self.pos, self.size)
    }

    fn is_alive(&self) -> bool {
        self.phase != ShipPhase::Destroyed
    }
}

impl Renderable for BonusShip {
    fn sprite(&self) -> Sprite {
        Sprite {
            kind: SpriteKind::BonusShip,
            bounds: self.bounds(),
            alive: self.is_alive() && self.is_visible(),
        }
    }
}
