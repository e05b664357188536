//! Validation errors raised when invalid data would enter the model.

use thiserror::Error;

use crate::enums::Team;

/// Errors produced by constructors and loaders in the core crate.
///
/// The simulation itself never fails: everything here is raised at the
/// boundary before a value reaches the engine.
#[derive(Error, Debug)]
pub enum CoreError {
    #[error("invalid team tag: {0:?} (expected \"red\" or \"blue\")")]
    InvalidTeam(String),

    #[error("invalid weapon tag: {0:?} (expected \"laser\", \"gun\" or \"rocket\")")]
    InvalidWeapon(String),

    #[error("team {team} composition has {found} weapons, expected {expected}")]
    CompositionSize {
        team: Team,
        expected: usize,
        found: usize,
    },

    #[error("team {team} spawn zone has {found} points, expected at least {expected}")]
    SpawnZone {
        team: Team,
        expected: usize,
        found: usize,
    },

    #[error("spawn points {a} and {b} are only {distance:.2} units apart")]
    SpawnSeparation { a: String, b: String, distance: f64 },

    #[error("arena parse error: {0}")]
    ArenaParse(#[from] serde_json::Error),
}
