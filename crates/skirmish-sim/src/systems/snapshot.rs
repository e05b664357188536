//! Snapshot system: reads the battle world and builds observer views.
//!
//! Read-only. Every list is sorted by id so snapshots are comparable across
//! runs.

use skirmish_core::components::*;
use skirmish_core::events::BattleEvent;
use skirmish_core::state::*;
use skirmish_core::types::{Position, Rotation, SimTime, Velocity};

use crate::world::BattleWorld;

/// Build a complete `BattleSnapshot` from the current world state.
pub fn build_snapshot(
    world: &BattleWorld,
    time: &SimTime,
    state: &SimulationState,
    events: Vec<BattleEvent>,
) -> BattleSnapshot {
    BattleSnapshot {
        time: *time,
        state: state.clone(),
        robots: build_robots(world),
        projectiles: build_projectiles(world),
        teams: world.teams.clone(),
        physics: build_physics(world),
        events,
    }
}

/// Every living robot, sorted by id.
pub fn build_robots(world: &BattleWorld) -> Vec<RobotView> {
    let mut robots: Vec<RobotView> = world
        .ecs
        .query::<(&Robot, &Health, &Position, &Rotation, &Velocity, &AiState, &RobotStats)>()
        .iter()
        .map(|(_, (robot, health, pos, rot, vel, ai, stats))| RobotView {
            id: robot.id.clone(),
            team: robot.team,
            weapon: robot.weapon,
            position: *pos,
            rotation: *rot,
            velocity: *vel,
            health: health.current,
            max_health: health.max,
            is_captain: robot.is_captain,
            ai: ai.clone(),
            stats: *stats,
        })
        .collect();
    robots.sort_by(|a, b| a.id.cmp(&b.id));
    robots
}

/// Every projectile in flight, sorted by id.
pub fn build_projectiles(world: &BattleWorld) -> Vec<ProjectileView> {
    let mut projectiles: Vec<ProjectileView> = world
        .ecs
        .query::<(&Projectile, &Position, &Velocity)>()
        .iter()
        .map(|(_, (projectile, pos, vel))| ProjectileView {
            id: projectile.id,
            owner_id: projectile.owner_id.clone(),
            weapon: projectile.weapon,
            position: *pos,
            velocity: *vel,
            damage: projectile.damage,
            distance_traveled: projectile.distance_traveled,
            max_distance: projectile.max_distance,
            spawn_time: projectile.spawn_time,
            max_lifetime: projectile.max_lifetime,
        })
        .collect();
    projectiles.sort_by_key(|p| p.id);
    projectiles
}

/// Position and velocity of every body.
pub fn build_physics(world: &BattleWorld) -> PhysicsSnapshot {
    let mut physics = PhysicsSnapshot::default();
    for (_, (robot, pos, vel)) in world.ecs.query::<(&Robot, &Position, &Velocity)>().iter() {
        physics.robots.insert(
            robot.id.clone(),
            PhysicsBody {
                position: *pos,
                velocity: *vel,
            },
        );
    }
    for (_, (projectile, pos, vel)) in world
        .ecs
        .query::<(&Projectile, &Position, &Velocity)>()
        .iter()
    {
        physics.projectiles.insert(
            projectile.id,
            PhysicsBody {
                position: *pos,
                velocity: *vel,
            },
        );
    }
    physics
}
