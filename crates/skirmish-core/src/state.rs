//! Battle state and the read-only snapshot handed to observers each tick.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::arena::SpawnZone;
use crate::components::{AiState, RobotStats};
use crate::constants::*;
use crate::enums::*;
use crate::error::CoreError;
use crate::events::BattleEvent;
use crate::types::{Position, Rotation, SimTime, Velocity};

/// Count of live robots carrying each weapon.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeaponDistribution {
    pub laser: u32,
    pub gun: u32,
    pub rocket: u32,
}

impl WeaponDistribution {
    pub fn from_weapons(weapons: impl IntoIterator<Item = WeaponType>) -> Self {
        let mut dist = Self::default();
        for weapon in weapons {
            dist.add(weapon);
        }
        dist
    }

    pub fn add(&mut self, weapon: WeaponType) {
        match weapon {
            WeaponType::Laser => self.laser += 1,
            WeaponType::Gun => self.gun += 1,
            WeaponType::Rocket => self.rocket += 1,
        }
    }

    /// Robots counted across all weapons.
    pub fn total(&self) -> u32 {
        self.laser + self.gun + self.rocket
    }
}

/// Team-level statistics. Kill and damage totals accumulate over the battle;
/// the rest is recomputed from the live roster every tick.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct TeamAggregateStats {
    pub total_kills: u32,
    pub total_damage_dealt: f64,
    pub total_damage_taken: f64,
    pub average_health_remaining: f64,
    pub weapon_distribution: WeaponDistribution,
}

/// One side of the battle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TeamState {
    pub name: Team,
    pub active_robots: u32,
    pub eliminated_robots: u32,
    /// Exactly one captain while `active_robots > 0`.
    pub captain_id: Option<String>,
    pub spawn_zone: SpawnZone,
    pub stats: TeamAggregateStats,
}

impl TeamState {
    pub fn new(name: Team, spawn_zone: SpawnZone) -> Self {
        Self {
            name,
            active_robots: 0,
            eliminated_robots: 0,
            captain_id: None,
            spawn_zone,
            stats: TeamAggregateStats::default(),
        }
    }

    /// Return to the pre-spawn state for a restart. The spawn zone is kept.
    pub fn reset(&mut self) {
        self.active_robots = 0;
        self.eliminated_robots = 0;
        self.captain_id = None;
        self.stats = TeamAggregateStats::default();
    }
}

/// Both teams, addressable by tag.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Teams {
    pub red: TeamState,
    pub blue: TeamState,
}

impl Teams {
    pub fn get(&self, team: Team) -> &TeamState {
        match team {
            Team::Red => &self.red,
            Team::Blue => &self.blue,
        }
    }

    pub fn get_mut(&mut self, team: Team) -> &mut TeamState {
        match team {
            Team::Red => &mut self.red,
            Team::Blue => &mut self.blue,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &TeamState> {
        [&self.red, &self.blue].into_iter()
    }
}

/// Weapon composition for both rosters, slot by slot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawTeamConfig")]
pub struct TeamConfig {
    red: Vec<WeaponType>,
    blue: Vec<WeaponType>,
}

impl TeamConfig {
    /// Build a composition; each list must have exactly one weapon per slot.
    pub fn new(red: Vec<WeaponType>, blue: Vec<WeaponType>) -> Result<Self, CoreError> {
        for (team, weapons) in [(Team::Red, &red), (Team::Blue, &blue)] {
            if weapons.len() != ROBOTS_PER_TEAM {
                return Err(CoreError::CompositionSize {
                    team,
                    expected: ROBOTS_PER_TEAM,
                    found: weapons.len(),
                });
            }
        }
        Ok(Self { red, blue })
    }

    pub fn weapons(&self, team: Team) -> &[WeaponType] {
        match team {
            Team::Red => &self.red,
            Team::Blue => &self.blue,
        }
    }
}

#[derive(Deserialize)]
struct RawTeamConfig {
    red: Vec<WeaponType>,
    blue: Vec<WeaponType>,
}

impl TryFrom<RawTeamConfig> for TeamConfig {
    type Error = CoreError;

    fn try_from(raw: RawTeamConfig) -> Result<Self, Self::Error> {
        TeamConfig::new(raw.red, raw.blue)
    }
}

impl Default for TeamConfig {
    fn default() -> Self {
        Self {
            red: RED_WEAPON_CYCLE.to_vec(),
            blue: BLUE_WEAPON_CYCLE.to_vec(),
        }
    }
}

/// Overlay flags toggled by the UI layer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UiFlags {
    pub stats_open: bool,
    pub settings_open: bool,
}

/// Final record of one robot for the post-battle report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RobotRecord {
    pub id: String,
    pub team: Team,
    pub weapon: WeaponType,
    pub health: f64,
    pub eliminated: bool,
    pub stats: RobotStats,
}

/// Team totals captured for the post-battle report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TeamRecord {
    pub team: Team,
    pub active_robots: u32,
    pub eliminated_robots: u32,
    pub stats: TeamAggregateStats,
}

/// Immutable capture taken the moment a battle ends.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PostBattleStats {
    pub status: BattleStatus,
    pub winner: Winner,
    pub captured_at_secs: f64,
    /// Every robot of both rosters, sorted by id.
    pub robots: Vec<RobotRecord>,
    pub teams: Vec<TeamRecord>,
}

/// Lifecycle state owned by the victory/restart controller.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationState {
    pub status: BattleStatus,
    pub winner: Option<Winner>,
    pub simulation_time: f64,
    pub time_scale: f64,
    /// Seconds until auto-restart; `None` while no battle has ended.
    pub auto_restart_countdown: Option<f64>,
    pub countdown_paused: bool,
    /// Composition to apply at the next restart.
    pub pending_team_config: Option<TeamConfig>,
    pub ui: UiFlags,
    pub post_battle_stats: Option<PostBattleStats>,
    /// Number of battles started since the engine was created.
    pub battle_number: u32,
}

impl Default for SimulationState {
    fn default() -> Self {
        Self {
            status: BattleStatus::Initializing,
            winner: None,
            simulation_time: 0.0,
            time_scale: 1.0,
            auto_restart_countdown: None,
            countdown_paused: false,
            pending_team_config: None,
            ui: UiFlags::default(),
            post_battle_stats: None,
            battle_number: 0,
        }
    }
}

/// A robot as seen by observers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RobotView {
    pub id: String,
    pub team: Team,
    pub weapon: WeaponType,
    pub position: Position,
    pub rotation: Rotation,
    pub velocity: Velocity,
    pub health: f64,
    pub max_health: f64,
    pub is_captain: bool,
    pub ai: AiState,
    pub stats: RobotStats,
}

/// A projectile as seen by observers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectileView {
    pub id: u64,
    pub owner_id: String,
    pub weapon: WeaponType,
    pub position: Position,
    pub velocity: Velocity,
    pub damage: f64,
    pub distance_traveled: f64,
    pub max_distance: f64,
    pub spawn_time: f64,
    pub max_lifetime: f64,
}

/// Kinematic state of one body.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PhysicsBody {
    pub position: Position,
    pub velocity: Velocity,
}

/// Every physical body in the world, keyed by id.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PhysicsSnapshot {
    pub robots: BTreeMap<String, PhysicsBody>,
    pub projectiles: BTreeMap<u64, PhysicsBody>,
}

/// Complete observable state, produced after each tick.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BattleSnapshot {
    pub time: SimTime,
    pub state: SimulationState,
    pub robots: Vec<RobotView>,
    pub projectiles: Vec<ProjectileView>,
    pub teams: Teams,
    pub physics: PhysicsSnapshot,
    pub events: Vec<BattleEvent>,
}
