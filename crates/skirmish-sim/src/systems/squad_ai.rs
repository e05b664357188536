//! Squad AI system: target selection, behavior modes, captain directives and
//! movement for every living robot.
//!
//! All decisions are made from a snapshot of the world taken at the start of
//! the system, in robot-id order, then written back in one pass. A robot's
//! decision never observes another robot's update from the same tick.

use std::collections::BTreeMap;

use hecs::Entity;

use skirmish_core::components::{AiState, Health, Robot};
use skirmish_core::constants::ENGAGE_STANDOFF_FACTOR;
use skirmish_core::enums::{BehaviorMode, TargetingRule, Team, WeaponType};
use skirmish_core::types::{Position, Rotation};
use skirmish_core::weapons::weapon_spec;
use skirmish_squad_ai::behavior::{self, BehaviorContext};
use skirmish_squad_ai::movement::{self, MovementContext};
use skirmish_squad_ai::targeting::{self, Shooter, TargetCandidate};

use crate::world::BattleWorld;

/// Read-only view of one robot for the duration of the system.
struct Member {
    entity: Entity,
    id: String,
    team: Team,
    weapon: WeaponType,
    position: Position,
    rotation: Rotation,
    health: f64,
    max_health: f64,
    is_captain: bool,
    formation_offset: Position,
}

/// What a robot decided to do this tick.
struct Decision {
    target_id: Option<String>,
    mode: BehaviorMode,
    cover: Option<Position>,
}

/// Run the squad AI for one tick.
pub fn run(world: &mut BattleWorld, rule: TargetingRule, dt: f64) {
    // 1. Snapshot living robots, sorted by id.
    let mut members: Vec<Member> = world
        .ecs
        .query::<(&Robot, &Health, &Position, &Rotation, &AiState)>()
        .iter()
        .filter(|(_, (_, health, _, _, _))| !health.is_depleted())
        .map(|(entity, (robot, health, pos, rot, ai))| Member {
            entity,
            id: robot.id.clone(),
            team: robot.team,
            weapon: robot.weapon,
            position: *pos,
            rotation: *rot,
            health: health.current,
            max_health: health.max,
            is_captain: robot.is_captain,
            formation_offset: ai.formation_offset,
        })
        .collect();
    members.sort_by(|a, b| a.id.cmp(&b.id));

    if members.is_empty() {
        return;
    }

    let active = |team: Team| members.iter().filter(|m| m.team == team).count() as u32;
    let red_active = active(Team::Red);
    let blue_active = active(Team::Blue);
    let cover_points: Vec<Position> = world.arena.cover_points().collect();

    // 2. Per-robot target, mode and cover.
    let mut decisions: Vec<Decision> = members
        .iter()
        .map(|m| {
            let candidates: Vec<TargetCandidate<'_>> = members
                .iter()
                .filter(|other| other.team != m.team)
                .map(|other| TargetCandidate {
                    id: &other.id,
                    position: other.position,
                    weapon: other.weapon,
                })
                .collect();
            let shooter = Shooter {
                position: m.position,
                weapon: m.weapon,
            };
            let target_id = targeting::select_target(rule, &shooter, &candidates).map(str::to_string);

            let (own_active, enemy_active) = match m.team {
                Team::Red => (red_active, blue_active),
                Team::Blue => (blue_active, red_active),
            };
            let mode = behavior::classify(&BehaviorContext {
                health: m.health,
                max_health: m.max_health,
                own_active,
                enemy_active,
            });
            let cover = behavior::assign_cover(mode, &m.position, cover_points.iter().copied());

            Decision {
                target_id,
                mode,
                cover,
            }
        })
        .collect();

    // 3. Captain directives: the captain's target becomes the squad's target.
    for team in Team::ALL {
        let directive = members
            .iter()
            .position(|m| m.team == team && m.is_captain)
            .and_then(|i| decisions[i].target_id.clone());
        if let Some(target) = directive {
            for (m, d) in members.iter().zip(decisions.iter_mut()) {
                if m.team == team && !m.is_captain {
                    d.target_id = Some(target.clone());
                }
            }
        }
    }

    // 4. Movement, anchored on the captain's position before anyone moves.
    let positions: BTreeMap<&str, Position> =
        members.iter().map(|m| (m.id.as_str(), m.position)).collect();
    let captain_position = |team: Team| {
        members
            .iter()
            .find(|m| m.team == team && m.is_captain)
            .map(|m| m.position)
    };
    let pressing = |team: Team| {
        members
            .iter()
            .zip(&decisions)
            .any(|(m, d)| m.team != team && d.mode != BehaviorMode::Retreating)
    };
    let bounds = world.arena.boundaries;

    let mut updates = Vec::with_capacity(members.len());
    for (m, d) in members.iter().zip(&decisions) {
        let formation_anchor = if m.is_captain {
            None
        } else {
            captain_position(m.team)
                .map(|c| Position::from_vec(c.to_vec() + m.formation_offset.to_vec()))
        };

        let spec = weapon_spec(m.weapon);
        let update = movement::evaluate(&MovementContext {
            position: m.position,
            rotation: m.rotation,
            mode: d.mode,
            target_position: d
                .target_id
                .as_deref()
                .and_then(|id| positions.get(id).copied()),
            cover_position: d.cover,
            spawn_center: world.teams.get(m.team).spawn_zone.center,
            formation_anchor,
            standoff_range: spec.effective_range * ENGAGE_STANDOFF_FACTOR,
            weapon_range: spec.effective_range,
            enemy_pressing: pressing(m.team),
            dt,
            bounds,
        });
        updates.push(update);
    }

    // 5. Write back.
    for ((m, d), update) in members.iter().zip(decisions.drain(..)).zip(updates) {
        if let Ok((pos, rot, ai)) = world
            .ecs
            .query_one_mut::<(&mut Position, &mut Rotation, &mut AiState)>(m.entity)
        {
            *pos = update.next_position;
            *rot = update.rotation;
            ai.behavior_mode = d.mode;
            ai.target_id = d.target_id;
            ai.cover_position = d.cover;
        }
    }
}
