//! Rate-limited projectile emitters
//!
//! Each emitter owns its live projectiles, gates launches behind a cooldown,
//! hit-tests against the opponent kinds registered at setup and culls
//! projectiles that leave the arena. Hit tests only read targets; effects are
//! published as events and applied by the session.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::bonus::BonusShip;
use super::entity::{Collidable, FormationUnit, Player, Renderable, Sprite, SpriteKind};
use super::events::{EventBus, GameEvent};
use super::geometry::{Aabb, Arena};
use crate::consts::*;
use crate::error::SimError;

/// Which side an emitter fights for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Faction {
    /// Player laser, travels up
    Laser,
    /// Bombs dropped by formation units
    FormationBomb,
    /// Bombs dropped by the bonus ship
    ShipBomb,
    /// Healing crates
    Supply,
}

impl Faction {
    /// Target kinds this faction may register
    pub fn accepts(self, kind: OpponentKind) -> bool {
        match self {
            Faction::Laser => matches!(kind, OpponentKind::BonusShip | OpponentKind::Formation),
            Faction::FormationBomb | Faction::ShipBomb | Faction::Supply => {
                kind == OpponentKind::Player
            }
        }
    }

    /// Lasers leave from the top edge of their origin, everything else from the bottom
    fn spawns_from_top(self) -> bool {
        self == Faction::Laser
    }

    fn sprite_kind(self) -> SpriteKind {
        match self {
            Faction::Laser => SpriteKind::Laser,
            Faction::FormationBomb => SpriteKind::Bomb,
            Faction::ShipBomb => SpriteKind::ShipBomb,
            Faction::Supply => SpriteKind::Supply,
        }
    }
}

/// Hit-test target kinds, declared in scan priority order
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum OpponentKind {
    BonusShip,
    Formation,
    Player,
}

/// Read-only view of everything an emitter can hit this tick
#[derive(Clone, Copy)]
pub struct Opponents<'a> {
    pub units: &'a [FormationUnit],
    pub bonus_ship: Option<&'a BonusShip>,
    pub player: Option<&'a Player>,
}

/// A projectile in flight
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Projectile {
    pub pos: Vec2,
    /// Vertical only; negative travels up
    pub vel: Vec2,
    pub size: Vec2,
    pub damage: i32,
    pub faction: Faction,
}

impl Projectile {
    pub fn advance(&mut self) {
        self.pos += self.vel;
    }
}

impl Collidable for Projectile {
    fn bounds(&self) -> Aabb {
        Aabb::from_pos(self.pos, self.size)
    }
}

impl Renderable for Projectile {
    fn sprite(&self) -> Sprite {
        Sprite {
            kind: self.faction.sprite_kind(),
            bounds: self.bounds(),
            alive: true,
        }
    }
}

/// Fixed parameters of one emitter
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmitterConfig {
    pub faction: Faction,
    pub velocity: f32,
    pub damage: i32,
    pub cooldown_ms: u64,
    pub size: Vec2,
    /// Clock value treated as the previous launch when the emitter is created;
    /// `None` allows a launch straight away
    pub primed_at_ms: Option<u64>,
}

impl EmitterConfig {
    pub fn laser() -> Self {
        Self {
            faction: Faction::Laser,
            velocity: LASER_VELOCITY,
            damage: LASER_DAMAGE,
            cooldown_ms: LASER_COOLDOWN_MS,
            size: Vec2::new(LASER_WIDTH, LASER_HEIGHT),
            primed_at_ms: None,
        }
    }

    pub fn formation_bomb() -> Self {
        Self {
            faction: Faction::FormationBomb,
            velocity: FORMATION_BOMB_VELOCITY,
            damage: FORMATION_BOMB_DAMAGE,
            cooldown_ms: BOMB_COOLDOWN_MS,
            size: Vec2::new(BOMB_WIDTH, BOMB_HEIGHT),
            primed_at_ms: Some(BOMB_COOLDOWN_MS),
        }
    }

    pub fn ship_bomb() -> Self {
        Self {
            faction: Faction::ShipBomb,
            velocity: SHIP_BOMB_VELOCITY,
            damage: SHIP_BOMB_DAMAGE,
            ..Self::formation_bomb()
        }
    }

    pub fn supply() -> Self {
        Self {
            faction: Faction::Supply,
            velocity: SUPPLY_VELOCITY,
            damage: SUPPLY_DAMAGE,
            size: Vec2::new(SUPPLY_WIDTH, SUPPLY_HEIGHT),
            ..Self::formation_bomb()
        }
    }
}

/// A projectile source bound to one faction
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Emitter {
    config: EmitterConfig,
    /// Current launch velocity (bombs speed up every wave)
    velocity: f32,
    last_launch_ms: Option<u64>,
    projectiles: Vec<Projectile>,
    /// Registered target kinds, kept sorted by scan priority
    opponents: Vec<OpponentKind>,
}

impl Emitter {
    pub fn new(config: EmitterConfig) -> Self {
        Self {
            velocity: config.velocity,
            last_launch_ms: config.primed_at_ms,
            config,
            projectiles: Vec::new(),
            opponents: Vec::new(),
        }
    }

    pub fn faction(&self) -> Faction {
        self.config.faction
    }

    pub fn velocity(&self) -> f32 {
        self.velocity
    }

    pub fn cooldown_ms(&self) -> u64 {
        self.config.cooldown_ms
    }

    pub fn last_launch_ms(&self) -> Option<u64> {
        self.last_launch_ms
    }

    pub fn projectiles(&self) -> &[Projectile] {
        &self.projectiles
    }

    pub fn opponents(&self) -> &[OpponentKind] {
        &self.opponents
    }

    /// Register a target kind for hit tests
    pub fn add_opponent(&mut self, kind: OpponentKind) -> Result<(), SimError> {
        if !self.config.faction.accepts(kind) {
            return Err(SimError::InvalidOpponent {
                faction: self.config.faction,
                opponent: kind,
            });
        }
        if !self.opponents.contains(&kind) {
            self.opponents.push(kind);
            self.opponents.sort();
        }
        Ok(())
    }

    /// Launch a projectile from `origin` unless the cooldown has not yet elapsed.
    /// Returns whether a projectile was created.
    pub fn launch(&mut self, origin: Aabb, now_ms: u64) -> bool {
        let cooling = self
            .last_launch_ms
            .is_some_and(|last| now_ms.saturating_sub(last) <= self.config.cooldown_ms);
        if cooling {
            return false;
        }

        let size = self.config.size;
        let anchor_y = if self.config.faction.spawns_from_top() {
            origin.top()
        } else {
            origin.bottom()
        };
        self.projectiles.push(Projectile {
            pos: Vec2::new(origin.center_x() - size.x / 2.0, anchor_y - size.y),
            vel: Vec2::new(0.0, self.velocity),
            size,
            damage: self.config.damage,
            faction: self.config.faction,
        });
        self.last_launch_ms = Some(now_ms);
        true
    }

    /// Hit-test every live projectile against the registered opponents.
    ///
    /// Each projectile is credited to at most one target: the first match in
    /// scan order (bonus ship, then formation units by index, then the player).
    /// A unit or ship credited earlier in the same pass counts as dead.
    /// Spent projectiles are removed. Returns the number of hits.
    pub fn check_hit(&mut self, opponents: &Opponents, bus: &mut EventBus) -> usize {
        let mut claimed_units: Vec<usize> = Vec::new();
        let mut ship_claimed = false;
        let mut hits = 0;

        let projectiles = std::mem::take(&mut self.projectiles);
        let mut kept = Vec::with_capacity(projectiles.len());

        for projectile in projectiles {
            let bounds = projectile.bounds();
            let mut event = None;

            for kind in &self.opponents {
                event = match kind {
                    OpponentKind::BonusShip => opponents
                        .bonus_ship
                        .filter(|ship| !ship_claimed && ship.is_alive())
                        .filter(|ship| ship.bounds().intersects(&bounds))
                        .map(|ship| {
                            ship_claimed = true;
                            GameEvent::BonusShipHit {
                                points: ship.point_value,
                            }
                        }),
                    OpponentKind::Formation => opponents
                        .units
                        .iter()
                        .enumerate()
                        .find(|(index, unit)| {
                            unit.is_alive()
                                && !claimed_units.contains(index)
                                && unit.bounds().intersects(&bounds)
                        })
                        .map(|(index, unit)| {
                            claimed_units.push(index);
                            GameEvent::UnitHit {
                                index,
                                points: unit.point_value,
                            }
                        }),
                    OpponentKind::Player => opponents
                        .player
                        .filter(|player| player.bounds().intersects(&bounds))
                        .map(|_| GameEvent::PlayerHit {
                            faction: projectile.faction,
                            damage: projectile.damage,
                        }),
                };
                if event.is_some() {
                    break;
                }
            }

            match event {
                Some(event) => {
                    bus.publish(event);
                    hits += 1;
                }
                None => kept.push(projectile),
            }
        }

        self.projectiles = kept;
        hits
    }

    /// Remove projectiles whose vertical position left `[0, arena.height]`
    pub fn cull(&mut self, arena: &Arena) {
        self.projectiles.retain(|p| arena.contains_y(p.pos.y));
    }

    /// Move every live projectile by its velocity
    pub fn advance(&mut self) {
        for projectile in &mut self.projectiles {
            projectile.advance();
        }
    }

    /// Hard reset on wave advance: drop every live projectile and, for
    /// hostile factions, speed up future launches.
    pub fn on_new_wave(&mut self, wave: u32) {
        self.projectiles.clear();
        if self.config.faction != Faction::Laser {
            self.velocity += BOMB_WAVE_SPEEDUP * wave as f32;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn laser_with_targets() -> Emitter {
        let mut laser = Emitter::new(EmitterConfig::laser());
        laser.add_opponent(OpponentKind::Formation).unwrap();
        laser.add_opponent(OpponentKind::BonusShip).unwrap();
        laser
    }

    fn unit_at(x: f32, y: f32) -> FormationUnit {
        FormationUnit::new(Vec2::new(x, y), 0, 60)
    }

    fn projectile_at(faction: Faction, x: f32, y: f32, damage: i32) -> Projectile {
        Projectile {
            pos: Vec2::new(x, y),
            vel: Vec2::ZERO,
            size: Vec2::new(3.0, 12.0),
            damage,
            faction,
        }
    }

    #[test]
    fn test_opponents_sorted_by_scan_priority() {
        let laser = laser_with_targets();
        assert_eq!(
            laser.opponents(),
            &[OpponentKind::BonusShip, OpponentKind::Formation]
        );
    }

    #[test]
    fn test_invalid_opponent_rejected() {
        let mut laser = Emitter::new(EmitterConfig::laser());
        assert_eq!(
            laser.add_opponent(OpponentKind::Player),
            Err(SimError::InvalidOpponent {
                faction: Faction::Laser,
                opponent: OpponentKind::Player,
            })
        );

        let mut bombs = Emitter::new(EmitterConfig::formation_bomb());
        assert!(bombs.add_opponent(OpponentKind::Formation).is_err());
        assert!(bombs.add_opponent(OpponentKind::BonusShip).is_err());
        assert!(bombs.add_opponent(OpponentKind::Player).is_ok());
    }

    #[test]
    fn test_launch_respects_cooldown() {
        let mut laser = Emitter::new(EmitterConfig::laser());
        let origin = Aabb::new(100.0, 500.0, 40.0, 20.0);

        // A fresh laser is ready at once
        assert!(laser.launch(origin, 16));
        // Exactly at the cooldown boundary is still too early
        assert!(!laser.launch(origin, 16 + LASER_COOLDOWN_MS));
        assert!(laser.launch(origin, 17 + LASER_COOLDOWN_MS));
        assert_eq!(laser.last_launch_ms(), Some(17 + LASER_COOLDOWN_MS));
        assert_eq!(laser.projectiles().len(), 2);
    }

    #[test]
    fn test_bombs_primed_with_initial_delay() {
        let mut bombs = Emitter::new(EmitterConfig::formation_bomb());
        let origin = Aabb::new(0.0, 0.0, 30.0, 20.0);
        assert!(!bombs.launch(origin, 2 * BOMB_COOLDOWN_MS));
        assert!(bombs.launch(origin, 2 * BOMB_COOLDOWN_MS + 1));
    }

    #[test]
    fn test_launch_positions() {
        let origin = Aabb::new(100.0, 500.0, 40.0, 20.0);

        let mut laser = Emitter::new(EmitterConfig::laser());
        laser.launch(origin, 1_000);
        let shot = &laser.projectiles()[0];
        assert_eq!(shot.pos.x, 120.0 - LASER_WIDTH / 2.0);
        assert_eq!(shot.pos.y, 500.0 - LASER_HEIGHT);
        assert!(shot.vel.y < 0.0);

        let mut bombs = Emitter::new(EmitterConfig::ship_bomb());
        bombs.launch(origin, 10_000);
        let bomb = &bombs.projectiles()[0];
        assert_eq!(bomb.pos.x, 120.0 - BOMB_WIDTH / 2.0);
        assert_eq!(bomb.pos.y, 520.0 - BOMB_HEIGHT);
        assert_eq!(bomb.damage, SHIP_BOMB_DAMAGE);
        assert!(bomb.vel.y > 0.0);
    }

    #[test]
    fn test_first_alive_unit_in_index_order_credited() {
        let mut laser = laser_with_targets();
        let mut units = vec![unit_at(0.0, 0.0), unit_at(0.0, 0.0), unit_at(0.0, 0.0)];
        units[0].alive = false;
        laser.projectiles.push(projectile_at(Faction::Laser, 5.0, 5.0, 1));

        let mut bus = EventBus::new();
        let opponents = Opponents {
            units: &units,
            bonus_ship: None,
            player: None,
        };
        assert_eq!(laser.check_hit(&opponents, &mut bus), 1);
        assert_eq!(
            bus.pop(),
            Some(GameEvent::UnitHit {
                index: 1,
                points: 60
            })
        );
        assert!(bus.is_empty());
        assert!(laser.projectiles().is_empty());
    }

    #[test]
    fn test_two_projectiles_cannot_claim_same_unit() {
        let mut laser = laser_with_targets();
        let units = vec![unit_at(0.0, 0.0)];
        laser.projectiles.push(projectile_at(Faction::Laser, 5.0, 5.0, 1));
        laser.projectiles.push(projectile_at(Faction::Laser, 10.0, 5.0, 1));

        let mut bus = EventBus::new();
        let opponents = Opponents {
            units: &units,
            bonus_ship: None,
            player: None,
        };
        assert_eq!(laser.check_hit(&opponents, &mut bus), 1);
        assert_eq!(laser.projectiles().len(), 1);
    }

    #[test]
    fn test_bomb_hits_player() {
        let mut bombs = Emitter::new(EmitterConfig::formation_bomb());
        bombs.add_opponent(OpponentKind::Player).unwrap();
        let player = Player::new(Arena::default());
        let p = player.pos;
        bombs
            .projectiles
            .push(projectile_at(Faction::FormationBomb, p.x + 5.0, p.y, 1));
        bombs
            .projectiles
            .push(projectile_at(Faction::FormationBomb, 0.0, 0.0, 1));

        let mut bus = EventBus::new();
        let opponents = Opponents {
            units: &[],
            bonus_ship: None,
            player: Some(&player),
        };
        assert_eq!(bombs.check_hit(&opponents, &mut bus), 1);
        assert_eq!(
            bus.pop(),
            Some(GameEvent::PlayerHit {
                faction: Faction::FormationBomb,
                damage: 1
            })
        );
        assert_eq!(bombs.projectiles().len(), 1);
    }

    #[test]
    fn test_unregistered_emitter_hits_nothing() {
        let mut bombs = Emitter::new(EmitterConfig::formation_bomb());
        let player = Player::new(Arena::default());
        bombs
            .projectiles
            .push(projectile_at(Faction::FormationBomb, player.pos.x, player.pos.y, 1));
        let mut bus = EventBus::new();
        let opponents = Opponents {
            units: &[],
            bonus_ship: None,
            player: Some(&player),
        };
        assert_eq!(bombs.check_hit(&opponents, &mut bus), 0);
        assert_eq!(bombs.projectiles().len(), 1);
    }

    #[test]
    fn test_cull_keeps_inclusive_bounds() {
        let arena = Arena::new(100.0, 100.0);
        let mut bombs = Emitter::new(EmitterConfig::formation_bomb());
        for y in [-1.0, 0.0, 100.0, 101.0] {
            bombs
                .projectiles
                .push(projectile_at(Faction::FormationBomb, 0.0, y, 1));
        }
        bombs.cull(&arena);
        let ys: Vec<f32> = bombs.projectiles().iter().map(|p| p.pos.y).collect();
        assert_eq!(ys, vec![0.0, 100.0]);
    }

    #[test]
    fn test_new_wave_clears_and_speeds_up_bombs() {
        let origin = Aabb::new(0.0, 0.0, 10.0, 10.0);
        let mut bombs = Emitter::new(EmitterConfig::formation_bomb());
        bombs.launch(origin, 10_000);
        bombs.on_new_wave(2);
        assert!(bombs.projectiles().is_empty());
        assert!((bombs.velocity() - (FORMATION_BOMB_VELOCITY + 0.1)).abs() < 1e-6);

        let mut laser = Emitter::new(EmitterConfig::laser());
        laser.launch(origin, 10_000);
        laser.on_new_wave(2);
        assert!(laser.projectiles().is_empty());
        assert_eq!(laser.velocity(), LASER_VELOCITY);
    }
}
