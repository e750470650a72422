//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only, owned by the session
//! - Stable iteration order (formation units by index, emitters by slot)
//! - No rendering or platform dependencies

pub mod autopilot;
pub mod bonus;
pub mod emitter;
pub mod entity;
pub mod events;
pub mod formation;
pub mod geometry;
pub mod scoring;
pub mod snapshot;
pub mod state;
pub mod supply;
pub mod tick;

pub use autopilot::autopilot_input;
pub use bonus::{BonusShip, ShipPhase};
pub use emitter::{Emitter, EmitterConfig, Faction, OpponentKind, Opponents, Projectile};
pub use entity::{
    Collidable, Direction, FormationUnit, Heading, Movable, Player, Renderable, Sprite, SpriteKind,
};
pub use events::{EventBus, GameEvent, GameOverCause};
pub use formation::{Formation, FormationStep};
pub use geometry::{Aabb, Arena};
pub use scoring::Scoreboard;
pub use snapshot::Snapshot;
pub use state::{EmitterSlot, Session, SessionStatus, World};
pub use supply::SupplyDrop;
pub use tick::{TickInput, tick};
