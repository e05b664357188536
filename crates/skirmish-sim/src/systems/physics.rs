//! Physics system: robot knockback, projectile flight and projectile hits.
//!
//! Position and velocity components are the single source of truth for every
//! body. Robot velocity only carries impulses (knockback); steering writes
//! positions directly in the squad AI system.

use hecs::Entity;

use skirmish_core::components::{Health, Projectile, Robot};
use skirmish_core::constants::{COLLISION_RADIUS, REST_SPEED_THRESHOLD, VELOCITY_DAMPING};
use skirmish_core::enums::{Team, WeaponType};
use skirmish_core::types::{Position, Velocity};

use crate::world::BattleWorld;

/// A projectile that struck a robot this tick.
#[derive(Debug, Clone, PartialEq)]
pub struct Hit {
    pub projectile_id: u64,
    pub target_id: String,
    pub owner_id: String,
    pub owner_team: Team,
    pub weapon: WeaponType,
    pub damage: f64,
}

/// Advance every body by `dt` and resolve projectile collisions.
///
/// `now` is the simulation time at the end of the step. Projectiles that hit,
/// outrun their range, outlive their lifetime or leave the arena are
/// despawned before this returns.
pub fn run(world: &mut BattleWorld, dt: f64, now: f64, despawn_buffer: &mut Vec<Entity>) -> Vec<Hit> {
    integrate_robots(world, dt);
    integrate_projectiles(world, dt);

    despawn_buffer.clear();
    let hits = resolve_projectiles(world, now, despawn_buffer);
    for entity in despawn_buffer.drain(..) {
        let _ = world.ecs.despawn(entity);
    }
    hits
}

/// Apply robot velocity, clamp to the arena, then damp toward rest.
pub fn integrate_robots(world: &mut BattleWorld, dt: f64) {
    let bounds = world.arena.boundaries;
    for (_entity, (_robot, pos, vel)) in world
        .ecs
        .query_mut::<(&Robot, &mut Position, &mut Velocity)>()
    {
        if vel.is_zero() {
            continue;
        }
        *pos = bounds.clamp(pos.advanced(vel, dt));
        *vel = vel.scaled(VELOCITY_DAMPING);
        if vel.speed() < REST_SPEED_THRESHOLD {
            *vel = Velocity::zero();
        }
    }
}

/// Move projectiles along their velocity, remembering where they started.
pub fn integrate_projectiles(world: &mut BattleWorld, dt: f64) {
    for (_entity, (projectile, pos, vel)) in world
        .ecs
        .query_mut::<(&mut Projectile, &mut Position, &Velocity)>()
    {
        let next = pos.advanced(vel, dt);
        projectile.previous_position = *pos;
        projectile.distance_traveled += pos.distance_to(&next);
        *pos = next;
    }
}

/// Swept hit test of each projectile's path this tick against living
/// opposing robots. The first robot along the path is struck; ties go to
/// the smaller id.
fn resolve_projectiles(world: &BattleWorld, now: f64, despawn_buffer: &mut Vec<Entity>) -> Vec<Hit> {
    let mut targets: Vec<(String, Team, Position)> = world
        .ecs
        .query::<(&Robot, &Health, &Position)>()
        .iter()
        .filter(|(_, (_, health, _))| !health.is_depleted())
        .map(|(_, (robot, _, pos))| (robot.id.clone(), robot.team, *pos))
        .collect();
    targets.sort_by(|a, b| a.0.cmp(&b.0));

    let mut projectiles: Vec<(Entity, Projectile, Position)> = world
        .ecs
        .query::<(&Projectile, &Position)>()
        .iter()
        .map(|(entity, (projectile, pos))| (entity, projectile.clone(), *pos))
        .collect();
    projectiles.sort_by_key(|(_, projectile, _)| projectile.id);

    let bounds = world.arena.boundaries;
    let mut hits = Vec::new();

    for (entity, projectile, pos) in projectiles {
        let start = projectile.previous_position;
        let struck = targets
            .iter()
            .filter(|(_, team, _)| *team != projectile.owner_team)
            .filter(|(_, _, target)| target.distance_to_segment(&start, &pos) <= COLLISION_RADIUS)
            .min_by(|a, b| {
                start
                    .distance_to(&a.2)
                    .total_cmp(&start.distance_to(&b.2))
                    .then_with(|| a.0.cmp(&b.0))
            });

        if let Some((target_id, _, _)) = struck {
            hits.push(Hit {
                projectile_id: projectile.id,
                target_id: target_id.clone(),
                owner_id: projectile.owner_id.clone(),
                owner_team: projectile.owner_team,
                weapon: projectile.weapon,
                damage: projectile.damage,
            });
            despawn_buffer.push(entity);
            continue;
        }

        let expired = projectile.distance_traveled >= projectile.max_distance
            || now - projectile.spawn_time >= projectile.max_lifetime
            || !bounds.contains(&pos);
        if expired {
            despawn_buffer.push(entity);
        }
    }

    hits
}
