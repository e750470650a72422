//! Formation controller
//!
//! Owns the 6x10 grid of enemy units together with the formation-wide speed
//! and heading. All units move in lockstep: one blocked unit turns the whole
//! formation into a descent and reverses it for the next tick.

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::entity::{Collidable, Direction, FormationUnit, Heading, Movable};
use super::events::{EventBus, GameEvent};
use super::geometry::{Aabb, Arena};
use crate::consts::*;
use crate::error::SimError;

/// What the formation did on one tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FormationStep {
    pub moved: Direction,
    pub reached_bottom: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Formation {
    /// Row-major, index = row * FORMATION_COLS + column
    units: Vec<FormationUnit>,
    heading: Heading,
    /// Shared step length for every unit
    speed: f32,
    /// Wave currently being fought (1-based)
    wave: u32,
    kills_since_speedup: u32,
    arena: Arena,
}

impl Formation {
    pub fn new(arena: Arena) -> Self {
        let (origin_x, origin_y) = FORMATION_ORIGIN;
        let mut units = Vec::with_capacity(FORMATION_SIZE);
        for row in 0..FORMATION_ROWS {
            let points = TOP_ROW_POINTS - ROW_POINT_STEP * row as u32;
            for col in 0..FORMATION_COLS {
                let home = Vec2::new(
                    origin_x + col as f32 * UNIT_SPACING_X,
                    origin_y + row as f32 * UNIT_SPACING_Y,
                );
                units.push(FormationUnit::new(home, row as u8, points));
            }
        }

        Self {
            units,
            heading: Heading::Left,
            speed: FORMATION_BASE_SPEED,
            wave: 1,
            kills_since_speedup: 0,
            arena,
        }
    }

    pub fn units(&self) -> &[FormationUnit] {
        &self.units
    }

    /// Direct access for scenario setup and tooling
    pub fn units_mut(&mut self) -> &mut [FormationUnit] {
        &mut self.units
    }

    pub fn heading(&self) -> Heading {
        self.heading
    }

    pub fn set_heading(&mut self, heading: Heading) {
        self.heading = heading;
    }

    pub fn speed(&self) -> f32 {
        self.speed
    }

    pub fn wave(&self) -> u32 {
        self.wave
    }

    pub fn alive_count(&self) -> usize {
        self.units.iter().filter(|u| u.alive).count()
    }

    /// Unit indices scanned from the leading edge inward, row by row
    fn leading_edge_order(heading: Heading) -> impl Iterator<Item = usize> {
        (0..FORMATION_ROWS).flat_map(move |row| {
            (0..FORMATION_COLS).map(move |col| {
                let col = match heading {
                    Heading::Right => FORMATION_COLS - 1 - col,
                    Heading::Left => col,
                };
                row * FORMATION_COLS + col
            })
        })
    }

    /// Move the whole formation one step.
    ///
    /// If any alive unit would cross a side wall the formation descends instead
    /// and the heading flips for the next tick. A descent that brings an alive
    /// unit onto the bottom line publishes `ReachedBottom`.
    pub fn update(&mut self, bus: &mut EventBus) -> Result<FormationStep, SimError> {
        let blocked = Self::leading_edge_order(self.heading)
            .any(|i| self.units[i].is_blocked(self.heading, self.speed, &self.arena));

        let moved = if blocked {
            self.heading = self.heading.flipped();
            Direction::Down
        } else {
            self.heading.into()
        };

        for unit in &mut self.units {
            unit.step(moved, self.speed)?;
        }

        let reached_bottom = moved == Direction::Down
            && self
                .units
                .iter()
                .any(|u| u.alive && u.has_reached_bottom(&self.arena));
        if reached_bottom {
            log::info!("Formation reached the bottom line in wave {}", self.wave);
            bus.publish(GameEvent::ReachedBottom);
        }

        Ok(FormationStep {
            moved,
            reached_bottom,
        })
    }

    /// Pick one of the grid slots uniformly; only an alive unit gets to fire.
    /// Dead slots simply waste the draw.
    pub fn pick_shooter(&self, rng: &mut impl Rng) -> Option<Aabb> {
        let index = rng.random_range(0..self.units.len());
        let unit = &self.units[index];
        unit.alive.then(|| unit.bounds())
    }

    /// Mark a unit destroyed and apply kill-count speed escalation
    pub fn on_unit_hit(&mut self, index: usize) {
        let Some(unit) = self.units.get_mut(index) else {
            log::warn!("Hit reported for unknown formation slot {}", index);
            return;
        };
        if !unit.alive {
            return;
        }
        unit.alive = false;

        self.kills_since_speedup += 1;
        if self.kills_since_speedup == KILLS_PER_SPEEDUP {
            self.speed += FORMATION_KILL_SPEEDUP;
            self.kills_since_speedup = 0;
            log::debug!("Formation speed up to {:.2}", self.speed);
        }
    }

    /// Advance the wave if every unit is dead. Returns whether it did.
    pub fn check_wave_complete(&mut self, bus: &mut EventBus) -> bool {
        if self.units.iter().any(|u| u.alive) {
            return false;
        }
        self.advance_wave(bus);
        true
    }

    fn advance_wave(&mut self, bus: &mut EventBus) {
        let drop = self.wave.min(WAVE_DROP_MAX_WAVES) as f32 * WAVE_DROP_STEP;
        for unit in &mut self.units {
            unit.alive = true;
            unit.pos = unit.home + Vec2::new(0.0, drop);
            unit.point_value += WAVE_POINT_BONUS;
        }

        // Kill escalation may already have pushed past the wave floor
        let wave_speed = FORMATION_BASE_SPEED + self.wave as f32 * FORMATION_WAVE_SPEEDUP;
        self.speed = self.speed.max(wave_speed);

        self.wave += 1;
        log::info!(
            "Wave {} begins: formation {} below spawn, speed {:.2}",
            self.wave,
            drop,
            self.speed
        );
        bus.publish(GameEvent::NewWave { wave: self.wave });
    }
}
