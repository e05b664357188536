//! Captain election for a team.

use tracing::debug;

use skirmish_core::components::{Health, Robot, RobotStats};
use skirmish_core::enums::Team;
use skirmish_core::events::BattleEvent;
use skirmish_core::types::Position;
use skirmish_squad_ai::captain::{self, CaptainCandidate};

use crate::world::BattleWorld;

/// Elect a captain from the team's living robots and update every flag in
/// one pass, so the team never has two captains. Returns the new captain's
/// id, or `None` if the team has nobody left.
pub fn elect(world: &mut BattleWorld, team: Team) -> Option<String> {
    let members: Vec<(String, f64, u32, Position)> = world
        .ecs
        .query::<(&Robot, &Health, &RobotStats, &Position)>()
        .iter()
        .filter(|(_, (robot, _, _, _))| robot.team == team)
        .map(|(_, (robot, health, stats, pos))| {
            (robot.id.clone(), health.current, stats.kills, *pos)
        })
        .collect();

    let candidates: Vec<CaptainCandidate<'_>> = members
        .iter()
        .map(|(id, health, kills, position)| CaptainCandidate {
            id,
            health: *health,
            kills: *kills,
            position: *position,
        })
        .collect();
    let spawn_center = world.teams.get(team).spawn_zone.center;
    let elected = captain::elect(&candidates, &spawn_center).map(str::to_string);

    for (_entity, robot) in world.ecs.query_mut::<&mut Robot>() {
        if robot.team == team {
            robot.is_captain = elected.as_deref() == Some(robot.id.as_str());
        }
    }
    world.teams.get_mut(team).captain_id = elected.clone();

    if let Some(id) = &elected {
        debug!(team = %team, captain = %id, "captain elected");
        world.events.push(BattleEvent::CaptainElected {
            team,
            robot_id: id.clone(),
        });
    }
    elected
}
