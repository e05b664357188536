//! Spawn factories for the two rosters.
//!
//! Robots are placed on their team's fixed spawn points, one per roster
//! slot, facing the opposing zone. Slot 0 starts as captain.

use hecs::Entity;
use rand_chacha::ChaCha8Rng;

use skirmish_core::components::*;
use skirmish_core::constants::*;
use skirmish_core::enums::*;
use skirmish_core::events::BattleEvent;
use skirmish_core::state::TeamConfig;
use skirmish_core::types::{Position, Rotation, Velocity};
use skirmish_squad_ai::formation;

use crate::world::BattleWorld;

/// Spawn both rosters for a new battle.
pub fn setup_battle(world: &mut BattleWorld, composition: &TeamConfig, rng: &mut ChaCha8Rng) {
    for team in Team::ALL {
        spawn_team(world, team, composition.weapons(team), rng);
    }
}

/// Spawn one roster. Ids are `<team>-<slot>`; weapons are taken slot by slot.
pub fn spawn_team(
    world: &mut BattleWorld,
    team: Team,
    weapons: &[WeaponType],
    rng: &mut ChaCha8Rng,
) -> Vec<Entity> {
    let zone = world.arena.spawn_zone(team).clone();
    let facing_point = world.arena.spawn_zone(team.opponent()).center;
    debug_assert!(zone.spawn_points.len() >= weapons.len());

    let mut spawned = Vec::with_capacity(weapons.len());
    for (slot, (weapon, point)) in weapons.iter().zip(&zone.spawn_points).enumerate() {
        let id = format!("{}-{}", team.as_str(), slot);
        let rotation = Rotation::from_yaw(point.yaw_to(&facing_point));
        let offset = formation::slot_offset(slot, rng);
        let entity = spawn_robot(world, &id, team, *weapon, *point, rotation, offset);
        spawned.push(entity);
    }

    let captain_id = format!("{}-0", team.as_str());
    let captain = world.robot_entity(&captain_id);
    if let Some(entity) = captain {
        if let Ok(mut robot) = world.ecs.get::<&mut Robot>(entity) {
            robot.is_captain = true;
        }
    }

    let state = world.teams.get_mut(team);
    state.active_robots = spawned.len() as u32;
    state.eliminated_robots = 0;
    if captain.is_some() {
        state.captain_id = Some(captain_id.clone());
        world.events.push(BattleEvent::CaptainElected {
            team,
            robot_id: captain_id,
        });
    }

    spawned
}

/// Spawn a single robot at full health and index it by id.
pub fn spawn_robot(
    world: &mut BattleWorld,
    id: &str,
    team: Team,
    weapon: WeaponType,
    position: Position,
    rotation: Rotation,
    formation_offset: Position,
) -> Entity {
    let ai = AiState {
        formation_offset,
        ..AiState::default()
    };

    let entity = world.ecs.spawn((
        Robot::new(id, team, weapon),
        Health::full(ROBOT_MAX_HEALTH),
        position,
        Velocity::zero(),
        rotation,
        ai,
        RobotStats::default(),
    ));
    world.register_robot(id.to_string(), entity);
    entity
}
