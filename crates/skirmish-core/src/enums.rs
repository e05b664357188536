//! Enumeration types used throughout the simulation.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// The two sides of a battle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Team {
    Red,
    Blue,
}

impl Team {
    pub const ALL: [Team; 2] = [Team::Red, Team::Blue];

    pub fn opponent(self) -> Team {
        match self {
            Team::Red => Team::Blue,
            Team::Blue => Team::Red,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Team::Red => "red",
            Team::Blue => "blue",
        }
    }
}

impl fmt::Display for Team {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Team {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "red" => Ok(Team::Red),
            "blue" => Ok(Team::Blue),
            other => Err(CoreError::InvalidTeam(other.to_string())),
        }
    }
}

/// Robot weapon. Each one beats exactly one other: laser > gun > rocket > laser.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WeaponType {
    Laser,
    Gun,
    Rocket,
}

impl WeaponType {
    pub const ALL: [WeaponType; 3] = [WeaponType::Laser, WeaponType::Gun, WeaponType::Rocket];

    /// The weapon this one has the advantage over.
    pub fn beats(self) -> WeaponType {
        match self {
            WeaponType::Laser => WeaponType::Gun,
            WeaponType::Gun => WeaponType::Rocket,
            WeaponType::Rocket => WeaponType::Laser,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            WeaponType::Laser => "laser",
            WeaponType::Gun => "gun",
            WeaponType::Rocket => "rocket",
        }
    }
}

impl fmt::Display for WeaponType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for WeaponType {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "laser" => Ok(WeaponType::Laser),
            "gun" => Ok(WeaponType::Gun),
            "rocket" => Ok(WeaponType::Rocket),
            other => Err(CoreError::InvalidWeapon(other.to_string())),
        }
    }
}

/// Per-tick behavior classification of a robot.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BehaviorMode {
    /// Close with the current target.
    #[default]
    Aggressive,
    /// Hold at the nearest cover point.
    Defensive,
    /// Fall back toward the own spawn zone.
    Retreating,
}

/// Target selection heuristic used by every robot.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TargetingRule {
    /// Nearest living enemy, ties broken by id.
    #[default]
    Nearest,
    /// Highest `multiplier * 100 - distance`, ties broken by distance then id.
    WeaponAdvantage,
}

/// Top-level battle lifecycle status.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum BattleStatus {
    #[default]
    Initializing,
    Running,
    Paused,
    Victory,
    SimultaneousElimination,
}

impl BattleStatus {
    /// Whether the battle has ended (victory or mutual wipe).
    pub fn is_terminal(self) -> bool {
        matches!(
            self,
            BattleStatus::Victory | BattleStatus::SimultaneousElimination
        )
    }
}

/// Battle outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Winner {
    Red,
    Blue,
    Draw,
}

impl From<Team> for Winner {
    fn from(team: Team) -> Self {
        match team {
            Team::Red => Winner::Red,
            Team::Blue => Winner::Blue,
        }
    }
}
