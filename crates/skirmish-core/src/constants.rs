//! Simulation constants and tuning parameters.

use crate::enums::WeaponType;

/// Tick rate (Hz) used by the fixed-step `tick()` driver.
pub const TICK_RATE: u32 = 60;

/// Seconds per tick at the default tick rate.
pub const DT: f64 = 1.0 / TICK_RATE as f64;

/// Maximum time scale multiplier.
pub const MAX_TIME_SCALE: f64 = 4.0;

// --- Rosters ---

/// Robots fielded by each team.
pub const ROBOTS_PER_TEAM: usize = 10;

/// Health every robot spawns with.
pub const ROBOT_MAX_HEALTH: f64 = 100.0;

/// Required pairwise separation between spawn points (units, exclusive).
pub const MIN_SPAWN_SEPARATION: f64 = 2.0;

/// Red weapon cycle, indexed by spawn slot.
pub const RED_WEAPON_CYCLE: [WeaponType; ROBOTS_PER_TEAM] = [
    WeaponType::Laser,
    WeaponType::Gun,
    WeaponType::Rocket,
    WeaponType::Laser,
    WeaponType::Gun,
    WeaponType::Rocket,
    WeaponType::Laser,
    WeaponType::Gun,
    WeaponType::Rocket,
    WeaponType::Laser,
];

/// Blue weapon cycle, indexed by spawn slot.
pub const BLUE_WEAPON_CYCLE: [WeaponType; ROBOTS_PER_TEAM] = [
    WeaponType::Gun,
    WeaponType::Laser,
    WeaponType::Rocket,
    WeaponType::Gun,
    WeaponType::Laser,
    WeaponType::Rocket,
    WeaponType::Gun,
    WeaponType::Laser,
    WeaponType::Rocket,
    WeaponType::Gun,
];

// --- Arena ---

/// Arena half-extent on the ground plane (units).
pub const ARENA_HALF_EXTENT: f64 = 50.0;

/// Arena ceiling (units).
pub const ARENA_HEIGHT: f64 = 10.0;

/// Spawn zone radius (units).
pub const SPAWN_ZONE_RADIUS: f64 = 14.0;

// --- Behavior ---

/// At or below this health a robot retreats.
pub const RETREAT_HEALTH_THRESHOLD: f64 = 20.0;

/// Below this health fraction a robot turns defensive.
pub const DEFENSIVE_HEALTH_RATIO: f64 = 0.45;

/// Below this own/enemy active-robot ratio a robot turns defensive.
pub const DEFENSIVE_STRENGTH_RATIO: f64 = 0.85;

/// Distance of a retreat waypoint from the robot's current position (units).
pub const RETREAT_STEP_DISTANCE: f64 = 12.0;

/// How far a defender leans out of cover along its heading (units).
pub const COVER_PEEK_OFFSET: f64 = 1.5;

/// Robot ground speed (units/s).
pub const ROBOT_MOVE_SPEED: f64 = 6.0;

/// Aggressive robots stop closing at this fraction of their weapon's range.
pub const ENGAGE_STANDOFF_FACTOR: f64 = 0.7;

/// Formation smoothing rate (1/s). Blend alpha per tick is `rate * dt`, capped at 1.
pub const FORMATION_BLEND_RATE: f64 = 2.5;

/// Radius of the formation ring around the captain (units).
pub const FORMATION_RING_RADIUS: f64 = 4.0;

/// Maximum seeded jitter applied to each formation offset axis (units).
pub const FORMATION_JITTER: f64 = 0.5;

// --- Weapons ---

/// Damage multiplier when the attacker's weapon beats the defender's.
pub const ADVANTAGE_MULTIPLIER: f64 = 1.5;

/// Damage multiplier for identical weapons.
pub const NEUTRAL_MULTIPLIER: f64 = 1.0;

/// Damage multiplier when the defender's weapon beats the attacker's.
pub const DISADVANTAGE_MULTIPLIER: f64 = 0.67;

/// Projectile max travel as a multiple of the weapon's effective range.
pub const PROJECTILE_RANGE_FACTOR: f64 = 1.25;

/// Projectile lifetime (seconds).
pub const PROJECTILE_MAX_LIFETIME: f64 = 3.0;

// --- Physics ---

/// Projectile-robot hit radius (units).
pub const COLLISION_RADIUS: f64 = 1.5;

/// Per-tick knockback velocity damping factor.
pub const VELOCITY_DAMPING: f64 = 0.9;

/// Speeds below this snap to rest (units/s).
pub const REST_SPEED_THRESHOLD: f64 = 0.01;

// --- Lifecycle ---

/// Auto-restart countdown after a battle ends (seconds).
pub const AUTO_RESTART_SECS: f64 = 5.0;
