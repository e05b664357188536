//! Fire control system: robots with a target in range fire once their weapon
//! has cycled.
//!
//! Shooters are processed in id order. A robot that has never fired may fire
//! immediately.

use tracing::trace;

use skirmish_core::components::{AiState, Health, Projectile, Robot, RobotStats};
use skirmish_core::constants::PROJECTILE_MAX_LIFETIME;
use skirmish_core::enums::{Team, WeaponType};
use skirmish_core::events::BattleEvent;
use skirmish_core::types::{Position, Velocity};
use skirmish_core::weapons::{shot_damage, weapon_spec};

use crate::world::BattleWorld;

/// A projectile launch request.
#[derive(Debug, Clone)]
pub struct ProjectileLaunch {
    pub owner_id: String,
    pub owner_team: Team,
    pub weapon: WeaponType,
    pub position: Position,
    pub velocity: Velocity,
    pub damage: f64,
    pub max_distance: f64,
}

/// Fire every robot whose weapon is ready and whose target is in range.
pub fn run(world: &mut BattleWorld, now: f64) {
    let mut shooters: Vec<_> = world
        .ecs
        .query::<(&Robot, &Health, &Position, &AiState)>()
        .iter()
        .filter(|(_, (_, health, _, _))| !health.is_depleted())
        .filter_map(|(entity, (robot, _, pos, ai))| {
            let target_id = ai.target_id.clone()?;
            Some((entity, robot.clone(), *pos, ai.last_fire_time, target_id))
        })
        .collect();
    shooters.sort_by(|a, b| a.1.id.cmp(&b.1.id));

    for (entity, robot, position, last_fire_time, target_id) in shooters {
        let spec = weapon_spec(robot.weapon);
        if let Some(last) = last_fire_time {
            if now - last < spec.fire_rate_secs {
                continue;
            }
        }

        let Some(target_entity) = world.robot_entity(&target_id) else {
            continue;
        };
        let Ok(target_pos) = world.ecs.get::<&Position>(target_entity).map(|p| *p) else {
            continue;
        };
        let Ok(target_weapon) = world.ecs.get::<&Robot>(target_entity).map(|r| r.weapon) else {
            continue;
        };

        if position.distance_to(&target_pos) > spec.effective_range {
            continue;
        }
        let direction = position.direction_to(&target_pos);
        if direction.length_squared() == 0.0 {
            continue;
        }

        launch_projectile(
            world,
            ProjectileLaunch {
                owner_id: robot.id.clone(),
                owner_team: robot.team,
                weapon: robot.weapon,
                position,
                velocity: Velocity::from_vec(direction * spec.projectile_speed),
                damage: shot_damage(robot.weapon, target_weapon),
                max_distance: spec.max_projectile_distance(),
            },
            now,
        );

        if let Ok((ai, stats)) = world
            .ecs
            .query_one_mut::<(&mut AiState, &mut RobotStats)>(entity)
        {
            ai.last_fire_time = Some(now);
            stats.shots_fired += 1;
        }
    }
}

/// Spawn a projectile entity and return its id.
pub fn launch_projectile(world: &mut BattleWorld, launch: ProjectileLaunch, now: f64) -> u64 {
    let id = world.allocate_projectile_id();
    trace!(
        projectile = id,
        owner = %launch.owner_id,
        weapon = %launch.weapon,
        "shot fired"
    );

    world.events.push(BattleEvent::ShotFired {
        projectile_id: id,
        owner_id: launch.owner_id.clone(),
        weapon: launch.weapon,
    });

    world.ecs.spawn((
        Projectile {
            id,
            owner_id: launch.owner_id,
            owner_team: launch.owner_team,
            weapon: launch.weapon,
            damage: launch.damage,
            distance_traveled: 0.0,
            max_distance: launch.max_distance,
            spawn_time: now,
            max_lifetime: PROJECTILE_MAX_LIFETIME,
            previous_position: launch.position,
        },
        launch.position,
        launch.velocity,
    ));
    id
}
