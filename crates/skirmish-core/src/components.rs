//! ECS components for hecs entities.
//!
//! Components are plain data structs.
//! Game logic lives in systems, not components.

use serde::{Deserialize, Serialize};

use crate::enums::*;
use crate::error::CoreError;
use crate::types::Position;

/// Identity and loadout of a combat robot.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Robot {
    /// Stable id, e.g. `red-3`.
    pub id: String,
    pub team: Team,
    pub weapon: WeaponType,
    pub is_captain: bool,
}

impl Robot {
    pub fn new(id: impl Into<String>, team: Team, weapon: WeaponType) -> Self {
        Self {
            id: id.into(),
            team,
            weapon,
            is_captain: false,
        }
    }

    /// Build a robot from untyped team/weapon tags, rejecting unknown tags.
    pub fn from_tags(id: impl Into<String>, team: &str, weapon: &str) -> Result<Self, CoreError> {
        Ok(Self::new(id, team.parse()?, weapon.parse()?))
    }
}

/// Hit points, always within `[0, max]`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Health {
    pub current: f64,
    pub max: f64,
}

impl Health {
    pub fn full(max: f64) -> Self {
        Self { current: max, max }
    }

    /// Set health, clamped into `[0, max]`.
    pub fn set(&mut self, value: f64) {
        self.current = value.clamp(0.0, self.max);
    }

    pub fn fraction(&self) -> f64 {
        if self.max > 0.0 {
            self.current / self.max
        } else {
            0.0
        }
    }

    pub fn is_depleted(&self) -> bool {
        self.current <= 0.0
    }
}

/// Per-robot AI memory carried between ticks.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AiState {
    pub behavior_mode: BehaviorMode,
    /// Id of the robot currently being engaged.
    pub target_id: Option<String>,
    /// Assigned cover point while defensive or retreating.
    pub cover_position: Option<Position>,
    /// Simulation time of the last shot, `None` if the robot has never fired.
    pub last_fire_time: Option<f64>,
    /// Desired position relative to the captain.
    pub formation_offset: Position,
}

/// Running combat statistics for one robot.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct RobotStats {
    pub kills: u32,
    pub damage_dealt: f64,
    pub damage_taken: f64,
    pub time_alive: f64,
    pub shots_fired: u32,
}

/// A projectile in flight.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Projectile {
    pub id: u64,
    pub owner_id: String,
    /// Team of the owner at fire time; the owner may be destroyed before impact.
    pub owner_team: Team,
    pub weapon: WeaponType,
    pub damage: f64,
    pub distance_traveled: f64,
    pub max_distance: f64,
    pub spawn_time: f64,
    pub max_lifetime: f64,
    /// Position at the start of the current tick, for swept hit tests.
    pub previous_position: Position,
}
