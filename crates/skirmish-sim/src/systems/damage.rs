//! Damage resolution and elimination.
//!
//! Health is clamped to `[0, max]`. Damage totals accrue the health actually
//! removed, so overkill is not counted. A robot reaching zero health is
//! eliminated in the same call.

use tracing::debug;

use skirmish_core::components::{AiState, Health, Robot, RobotStats};
use skirmish_core::enums::Team;
use skirmish_core::events::BattleEvent;
use skirmish_core::state::RobotRecord;

use crate::systems::captaincy;
use crate::systems::physics::Hit;
use crate::world::BattleWorld;

/// The robot credited with damage or a kill.
#[derive(Debug, Clone, PartialEq)]
pub struct Attacker {
    pub id: String,
    pub team: Team,
}

/// Result of applying damage to one robot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DamageOutcome {
    /// Unknown target or non-positive amount.
    Ignored,
    Damaged,
    Eliminated,
}

/// Apply projectile hits in the order they were detected.
pub fn apply_hits(world: &mut BattleWorld, hits: &[Hit]) {
    for hit in hits {
        let attacker = Attacker {
            id: hit.owner_id.clone(),
            team: hit.owner_team,
        };
        apply_damage(world, &hit.target_id, hit.damage, Some(&attacker));
    }
}

/// Subtract `amount` from a robot's health.
pub fn apply_damage(
    world: &mut BattleWorld,
    target_id: &str,
    amount: f64,
    attacker: Option<&Attacker>,
) -> DamageOutcome {
    if amount.is_nan() || amount <= 0.0 {
        return DamageOutcome::Ignored;
    }
    let Some(entity) = world.robot_entity(target_id) else {
        return DamageOutcome::Ignored;
    };

    let Ok((robot, health, stats)) = world
        .ecs
        .query_one_mut::<(&Robot, &mut Health, &mut RobotStats)>(entity)
    else {
        return DamageOutcome::Ignored;
    };
    let team = robot.team;
    let before = health.current;
    health.set(before - amount);
    let removed = before - health.current;
    let remaining = health.current;
    stats.damage_taken += removed;

    world.teams.get_mut(team).stats.total_damage_taken += removed;
    if let Some(attacker) = attacker {
        if let Some(attacker_entity) = world.robot_entity(&attacker.id) {
            if let Ok(mut attacker_stats) = world.ecs.get::<&mut RobotStats>(attacker_entity) {
                attacker_stats.damage_dealt += removed;
            }
        }
        world.teams.get_mut(attacker.team).stats.total_damage_dealt += removed;
    }

    world.events.push(BattleEvent::RobotHit {
        target_id: target_id.to_string(),
        attacker_id: attacker.map(|a| a.id.clone()),
        damage: removed,
        remaining_health: remaining,
    });

    if remaining <= 0.0 {
        eliminate(world, target_id, attacker);
        DamageOutcome::Eliminated
    } else {
        DamageOutcome::Damaged
    }
}

/// Remove a robot from the battle. Returns `false` for an unknown id.
///
/// The robot's final record goes to the casualty ledger, the attacker (if
/// any) is credited with the kill, robots targeting it lose their target,
/// and a new captain is elected if it led its team.
pub fn eliminate(world: &mut BattleWorld, robot_id: &str, attacker: Option<&Attacker>) -> bool {
    let Some(entity) = world.unregister_robot(robot_id) else {
        return false;
    };

    let record = match world
        .ecs
        .query_one_mut::<(&Robot, &RobotStats)>(entity)
    {
        Ok((robot, stats)) => Some((
            RobotRecord {
                id: robot.id.clone(),
                team: robot.team,
                weapon: robot.weapon,
                health: 0.0,
                eliminated: true,
                stats: *stats,
            },
            robot.is_captain,
        )),
        Err(_) => None,
    };
    let _ = world.ecs.despawn(entity);
    let Some((record, was_captain)) = record else {
        return false;
    };
    let team = record.team;
    world.record_casualty(record);

    let state = world.teams.get_mut(team);
    state.active_robots = state.active_robots.saturating_sub(1);
    state.eliminated_robots += 1;

    if let Some(attacker) = attacker {
        if let Some(attacker_entity) = world.robot_entity(&attacker.id) {
            if let Ok(mut attacker_stats) = world.ecs.get::<&mut RobotStats>(attacker_entity) {
                attacker_stats.kills += 1;
            }
        }
        world.teams.get_mut(attacker.team).stats.total_kills += 1;
    }

    for (_entity, ai) in world.ecs.query_mut::<&mut AiState>() {
        if ai.target_id.as_deref() == Some(robot_id) {
            ai.target_id = None;
        }
    }

    debug!(
        robot = robot_id,
        team = %team,
        attacker = attacker.map(|a| a.id.as_str()).unwrap_or("none"),
        "robot eliminated"
    );
    world.events.push(BattleEvent::RobotEliminated {
        robot_id: robot_id.to_string(),
        team,
        attacker_id: attacker.map(|a| a.id.clone()),
    });

    if was_captain {
        world.teams.get_mut(team).captain_id = None;
        captaincy::elect(world, team);
    }
    true
}
