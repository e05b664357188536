//! Events emitted by the simulation for effects and UI feedback.

use serde::{Deserialize, Serialize};

use crate::enums::*;

/// Something that happened during a tick.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum BattleEvent {
    /// A robot (or a debug tool on its behalf) fired a projectile.
    ShotFired {
        projectile_id: u64,
        owner_id: String,
        weapon: WeaponType,
    },
    /// A robot lost health.
    RobotHit {
        target_id: String,
        attacker_id: Option<String>,
        damage: f64,
        remaining_health: f64,
    },
    /// A robot dropped to zero health and left the roster.
    RobotEliminated {
        robot_id: String,
        team: Team,
        attacker_id: Option<String>,
    },
    /// A team has a new captain.
    CaptainElected { team: Team, robot_id: String },
    /// The battle reached a terminal state.
    BattleEnded {
        status: BattleStatus,
        winner: Winner,
    },
    /// Fresh rosters were spawned.
    BattleStarted { battle_number: u32 },
}
