//! Errors raised by the simulation core
//!
//! Only setup mistakes and precondition violations live here. Everything the
//! simulation does per tick is total over valid state.

use std::fmt;

use crate::sim::{Direction, Faction, OpponentKind};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SimError {
    /// An emitter was asked to fight a target kind it cannot hit
    InvalidOpponent {
        faction: Faction,
        opponent: OpponentKind,
    },
    /// An entity was asked to move in a direction it cannot take
    IllegalMove {
        entity: &'static str,
        direction: Direction,
    },
}

impl fmt::Display for SimError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidOpponent { faction, opponent } => write!(
                f,
                "invalid opponent: {faction:?} emitter cannot target {opponent:?}"
            ),
            Self::IllegalMove { entity, direction } => {
                write!(f, "illegal move: {entity} cannot go {direction:?}")
            }
        }
    }
}

impl std::error::Error for SimError {}
