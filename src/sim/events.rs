//! Session-owned event bus
//!
//! Subsystems publish events while they update; the session drains the queue
//! before the tick returns, so delivery is always synchronous within a tick.

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

use super::emitter::Faction;

/// Why a run ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameOverCause {
    /// Player health dropped to zero or below
    HealthDepleted,
    /// An alive formation unit reached the bottom line
    FormationLanded,
}

/// Everything one subsystem needs to tell another
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    /// A laser destroyed the formation unit at `index`
    UnitHit { index: usize, points: u32 },
    /// A laser destroyed the bonus ship
    BonusShipHit { points: u64 },
    /// A hostile projectile touched the player (negative damage heals)
    PlayerHit { faction: Faction, damage: i32 },
    /// The formation descended onto the bottom line
    ReachedBottom,
    /// The formation was cleared; carries the wave now starting
    NewWave { wave: u32 },
    GameOver { cause: GameOverCause },
}

#[derive(Debug, Default)]
pub struct EventBus {
    queue: VecDeque<GameEvent>,
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn publish(&mut self, event: GameEvent) {
        log::debug!("event: {:?}", event);
        self.queue.push_back(event);
    }

    /// Next undelivered event, oldest first
    pub fn pop(&mut self) -> Option<GameEvent> {
        self.queue.pop_front()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    pub fn len(&self) -> usize {
        self.queue.len()
    }

    /// Drop anything still queued (used on restart)
    pub fn clear(&mut self) {
        self.queue.clear();
    }
}
