//! Management commands sent from tools, tests and the UI to the simulation.
//!
//! Commands are queued and applied at the next tick boundary. Commands naming
//! an unknown robot id are ignored.

use serde::{Deserialize, Serialize};

use crate::enums::*;
use crate::state::TeamConfig;
use crate::types::{Position, Velocity};

/// All possible management actions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum BattleCommand {
    // --- Lifecycle ---
    /// Spawn both rosters and start the first battle.
    StartBattle,
    /// Freeze the simulation.
    Pause,
    /// Unfreeze the simulation.
    Resume,
    /// Set time scale (1.0 = normal, clamped to [0, 4]).
    SetTimeScale { scale: f64 },

    // --- Robot management ---
    SetRobotHealth { robot_id: String, health: f64 },
    SetRobotKills { robot_id: String, kills: u32 },
    SetRobotPosition { robot_id: String, position: Position },
    /// Add an instantaneous velocity change (knockback).
    ApplyImpulse { robot_id: String, impulse: Velocity },
    /// Remove a robot as if it had been destroyed.
    EliminateRobot { robot_id: String },
    /// Re-run captain election for a team.
    ElectCaptain { team: Team },
    /// Fire a projectile on behalf of a robot.
    SpawnProjectile {
        owner_id: String,
        weapon: WeaponType,
        position: Position,
        velocity: Velocity,
        damage: Option<f64>,
    },

    // --- Countdown ---
    PauseCountdown,
    ResumeCountdown,
    ResetCountdown,

    // --- UI flags ---
    OpenStats,
    CloseStats,
    OpenSettings,
    CloseSettings,

    /// Composition to use from the next restart on.
    SetPendingTeamConfig { config: TeamConfig },
}
