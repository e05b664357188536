//! Static weapon table and the rock-paper-scissors damage matrix.

use serde::{Deserialize, Serialize};

use crate::constants::*;
use crate::enums::WeaponType;

/// Ballistic and damage parameters for one weapon type.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WeaponSpec {
    pub base_damage: f64,
    /// Minimum seconds between shots.
    pub fire_rate_secs: f64,
    /// Projectile speed (units/s).
    pub projectile_speed: f64,
    /// Maximum distance at which the robot will open fire (units).
    pub effective_range: f64,
}

impl WeaponSpec {
    /// Distance a projectile of this weapon may travel before despawning.
    pub fn max_projectile_distance(&self) -> f64 {
        self.effective_range * PROJECTILE_RANGE_FACTOR
    }
}

/// Static table entry for a weapon type.
pub fn weapon_spec(weapon: WeaponType) -> WeaponSpec {
    match weapon {
        WeaponType::Laser => WeaponSpec {
            base_damage: 15.0,
            fire_rate_secs: 1.2,
            projectile_speed: 40.0,
            effective_range: 22.0,
        },
        WeaponType::Gun => WeaponSpec {
            base_damage: 10.0,
            fire_rate_secs: 0.6,
            projectile_speed: 30.0,
            effective_range: 16.0,
        },
        WeaponType::Rocket => WeaponSpec {
            base_damage: 28.0,
            fire_rate_secs: 2.5,
            projectile_speed: 20.0,
            effective_range: 26.0,
        },
    }
}

/// Damage multiplier for `attacker` hitting a robot armed with `defender`.
///
/// Always one of 1.5, 1.0 or 0.67. The losing side of a pair is 0.67,
/// not the reciprocal of 1.5.
pub fn damage_multiplier(attacker: WeaponType, defender: WeaponType) -> f64 {
    if attacker == defender {
        NEUTRAL_MULTIPLIER
    } else if attacker.beats() == defender {
        ADVANTAGE_MULTIPLIER
    } else {
        DISADVANTAGE_MULTIPLIER
    }
}

/// Damage a single projectile fired by `attacker` at `defender` carries.
pub fn shot_damage(attacker: WeaponType, defender: WeaponType) -> f64 {
    weapon_spec(attacker).base_damage * damage_multiplier(attacker, defender)
}
