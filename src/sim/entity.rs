//! Mobile entities and the capability traits they compose
//!
//! Every position change in the simulation goes through `Movable::step`, and
//! hit tests only see `Collidable`. `Renderable` exists for the render sink
//! and never feeds back into gameplay.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::geometry::{Aabb, Arena};
use crate::consts::*;
use crate::error::SimError;

/// A single movement step
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Direction {
    Left,
    Right,
    Down,
}

/// Horizontal travel direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Heading {
    Left,
    Right,
}

impl Heading {
    pub fn flipped(self) -> Self {
        match self {
            Heading::Left => Heading::Right,
            Heading::Right => Heading::Left,
        }
    }

    /// Sign of the x axis for this heading
    pub fn sign(self) -> f32 {
        match self {
            Heading::Left => -1.0,
            Heading::Right => 1.0,
        }
    }
}

impl From<Heading> for Direction {
    fn from(heading: Heading) -> Self {
        match heading {
            Heading::Left => Direction::Left,
            Heading::Right => Direction::Right,
        }
    }
}

/// Something that can be moved one step at a time
pub trait Movable {
    /// Move `distance` in `direction`. Fails if the entity cannot take that direction.
    fn step(&mut self, direction: Direction, distance: f32) -> Result<(), SimError>;
}

/// Something projectiles can hit
pub trait Collidable {
    fn bounds(&self) -> Aabb;

    /// Dead entities are skipped by hit tests
    fn is_alive(&self) -> bool {
        true
    }
}

/// What a renderer should draw for an entity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SpriteKind {
    Player,
    Unit { row: u8 },
    BonusShip,
    Laser,
    Bomb,
    ShipBomb,
    Supply,
}

/// Read-only drawing view of an entity
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Sprite {
    pub kind: SpriteKind,
    pub bounds: Aabb,
    pub alive: bool,
}

pub trait Renderable {
    fn sprite(&self) -> Sprite;
}

/// The player's cannon
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    pub pos: Vec2,
    pub size: Vec2,
    pub speed: f32,
    arena: Arena,
}

impl Player {
    /// Spawn centered horizontally, resting above the floor gap
    pub fn new(arena: Arena) -> Self {
        let size = Vec2::new(PLAYER_WIDTH, PLAYER_HEIGHT);
        Self {
            pos: Vec2::new(
                arena.width / 2.0 - size.x / 2.0,
                arena.height - size.y - PLAYER_FLOOR_GAP,
            ),
            size,
            speed: PLAYER_SPEED,
            arena,
        }
    }

    fn slide(&mut self, heading: Heading, distance: f32) {
        let max_x = (self.arena.width - self.size.x).max(0.0);
        self.pos.x = (self.pos.x + heading.sign() * distance).clamp(0.0, max_x);
    }
}

impl Movable for Player {
    fn step(&mut self, direction: Direction, distance: f32) -> Result<(), SimError> {
        match direction {
            Direction::Left => self.slide(Heading::Left, distance),
            Direction::Right => self.slide(Heading::Right, distance),
            Direction::Down => {
                return Err(SimError::IllegalMove {
                    entity: "player",
                    direction,
                });
            }
        }
        Ok(())
    }
}

impl Collidable for Player {
    fn bounds(&self) -> Aabb {
        Aabb::from_pos(self.pos, self.size)
    }
}

impl Renderable for Player {
    fn sprite(&self) -> Sprite {
        Sprite {
            kind: SpriteKind::Player,
            bounds: self.bounds(),
            alive: true,
        }
    }
}

/// One cell of the enemy formation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FormationUnit {
    pub pos: Vec2,
    /// Spawn position; wave resets are measured from here
    pub home: Vec2,
    pub size: Vec2,
    pub row: u8,
    pub alive: bool,
    pub point_value: u32,
}

impl FormationUnit {
    pub fn new(home: Vec2, row: u8, point_value: u32) -> Self {
        Self {
            pos: home,
            home,
            size: Vec2::new(UNIT_WIDTH, UNIT_HEIGHT),
            row,
            alive: true,
            point_value,
        }
    }

    /// Would one more step in `heading` cross the arena's side walls?
    /// Dead units never block.
    pub fn is_blocked(&self, heading: Heading, distance: f32, arena: &Arena) -> bool {
        if !self.alive {
            return false;
        }
        match heading {
            Heading::Right => self.pos.x + self.size.x + distance > arena.width,
            Heading::Left => self.pos.x - distance < 0.0,
        }
    }

    /// Bottom edge at or past the fatal line
    pub fn has_reached_bottom(&self, arena: &Arena) -> bool {
        self.pos.y + self.size.y >= arena.height - BOTTOM_MARGIN
    }

}

/// Units can take every direction, so this never fails
impl Movable for FormationUnit {
    fn step(&mut self, direction: Direction, distance: f32) -> Result<(), SimError> {
        match direction {
            Direction::Left => self.pos.x -= distance,
            Direction::Right => self.pos.x += distance,
            Direction::Down => self.pos.y += distance,
        }
        Ok(())
    }
}

impl Collidable for FormationUnit {
    fn bounds(&self) -> Aabb {
        Aabb::from_pos(self.pos, self.size)
    }

    fn is_alive(&self) -> bool {
        self.alive
    }
}

impl Renderable for FormationUnit {
    fn sprite(&self) -> Sprite {
        Sprite {
            kind: SpriteKind::Unit { row: self.row },
            bounds: self.bounds(),
            alive: self.alive,
        }
    }
}
