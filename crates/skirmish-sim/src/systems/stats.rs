//! Team statistics upkeep.

use skirmish_core::components::{Health, Robot, RobotStats};
use skirmish_core::enums::Team;
use skirmish_core::state::WeaponDistribution;

use crate::world::BattleWorld;

/// Add `dt` to the time alive of every living robot.
pub fn accrue_time_alive(world: &mut BattleWorld, dt: f64) {
    for (_entity, (_robot, stats)) in world.ecs.query_mut::<(&Robot, &mut RobotStats)>() {
        stats.time_alive += dt;
    }
}

/// Recompute roster-derived team fields: active and eliminated counts,
/// average health and live weapon distribution. Kill and damage totals are
/// accumulated elsewhere and left untouched.
pub fn refresh(world: &mut BattleWorld) {
    for team in Team::ALL {
        let mut health_sum = 0.0;
        let mut distribution = WeaponDistribution::default();
        for (_entity, (robot, health)) in world.ecs.query::<(&Robot, &Health)>().iter() {
            if robot.team != team || health.is_depleted() {
                continue;
            }
            health_sum += health.current;
            distribution.add(robot.weapon);
        }
        let active = distribution.total();
        let eliminated = world
            .casualties()
            .iter()
            .filter(|record| record.team == team)
            .count() as u32;

        let state = world.teams.get_mut(team);
        state.active_robots = active;
        state.eliminated_robots = eliminated;
        state.stats.average_health_remaining = if active > 0 {
            health_sum / active as f64
        } else {
            0.0
        };
        state.stats.weapon_distribution = distribution;
    }
}
