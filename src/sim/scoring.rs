//! Score, health and wave bookkeeping for the player

use serde::{Deserialize, Serialize};

use crate::consts::*;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Scoreboard {
    pub score: u64,
    /// May go negative on the killing blow
    pub health: i32,
    pub wave: u32,
}

impl Default for Scoreboard {
    fn default() -> Self {
        Self {
            score: 0,
            health: STARTING_HEALTH,
            wave: 1,
        }
    }
}

impl Scoreboard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_points(&mut self, points: u64) {
        self.score += points;
    }

    /// Apply damage (negative heals). Returns true when the hit was lethal.
    pub fn on_player_hit(&mut self, damage: i32) -> bool {
        self.health -= damage;
        self.health <= 0
    }

    pub fn on_new_wave(&mut self, wave: u32) {
        self.wave = wave;
        self.score += WAVE_SCORE_BONUS * wave as u64;
        self.health += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lethal_hit_leaves_negative_health() {
        let mut board = Scoreboard {
            health: 1,
            ..Scoreboard::default()
        };
        assert!(board.on_player_hit(2));
        assert_eq!(board.health, -1);
    }

    #[test]
    fn test_supply_heals() {
        let mut board = Scoreboard::new();
        assert!(!board.on_player_hit(SUPPLY_DAMAGE));
        assert_eq!(board.health, STARTING_HEALTH + 1);
    }

    #[test]
    fn test_new_wave_bonus() {
        let mut board = Scoreboard::new();
        board.add_points(60);
        board.on_new_wave(2);
        assert_eq!(board.wave, 2);
        assert_eq!(board.score, 260);
        assert_eq!(board.health, STARTING_HEALTH + 1);
    }
}
