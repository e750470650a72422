//! Supply drops
//!
//! Rare healing crates released from the top of the arena. The crate itself is
//! a negative-damage projectile owned by the supply emitter; this controller
//! only decides when and where one is released.

use rand::Rng;
use serde::{Deserialize, Serialize};

use super::geometry::{Aabb, Arena};
use crate::consts::*;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SupplyDrop {
    last_drop_ms: u64,
    arena: Arena,
}

impl SupplyDrop {
    pub fn new(arena: Arena) -> Self {
        Self {
            last_drop_ms: 0,
            arena,
        }
    }

    pub fn last_drop_ms(&self) -> u64 {
        self.last_drop_ms
    }

    /// Roll for a drop. Returns the release point when one happens.
    pub fn update(&mut self, now_ms: u64, rng: &mut impl Rng) -> Option<Aabb> {
        if now_ms.saturating_sub(self.last_drop_ms) < SUPPLY_MIN_INTERVAL_MS {
            return None;
        }
        if !rng.random_ratio(1, SUPPLY_CHANCE) {
            return None;
        }

        let x = rng.random_range(0.0..self.arena.width.max(1.0));
        self.last_drop_ms = now_ms;
        log::debug!("Supply drop released at x={:.0}", x);
        Some(Aabb::new(x, SUPPLY_ALTITUDE, 1.0, 1.0))
    }
}
