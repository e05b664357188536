//! Victory detection, post-battle capture and the auto-restart countdown.
//!
//! The engine calls [`evaluate`] only while a battle is running. Once a
//! terminal outcome is recorded the post-battle stats are captured exactly
//! once and the countdown starts at [`AUTO_RESTART_SECS`].

use tracing::info;

use skirmish_core::components::{Health, Robot, RobotStats};
use skirmish_core::constants::AUTO_RESTART_SECS;
use skirmish_core::enums::{BattleStatus, Team, Winner};
use skirmish_core::events::BattleEvent;
use skirmish_core::state::{PostBattleStats, RobotRecord, SimulationState, TeamRecord};

use crate::world::BattleWorld;

/// Result of checking both rosters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Undecided,
    Victory(Team),
    SimultaneousElimination,
}

impl Outcome {
    fn status(self) -> BattleStatus {
        match self {
            Outcome::Undecided => BattleStatus::Running,
            Outcome::Victory(_) => BattleStatus::Victory,
            Outcome::SimultaneousElimination => BattleStatus::SimultaneousElimination,
        }
    }

    fn winner(self) -> Option<Winner> {
        match self {
            Outcome::Undecided => None,
            Outcome::Victory(team) => Some(Winner::from(team)),
            Outcome::SimultaneousElimination => Some(Winner::Draw),
        }
    }
}

/// Decide the battle from the team active counts.
pub fn evaluate(world: &BattleWorld) -> Outcome {
    let red = world.teams.red.active_robots;
    let blue = world.teams.blue.active_robots;
    match (red, blue) {
        (0, 0) => Outcome::SimultaneousElimination,
        (_, 0) => Outcome::Victory(Team::Red),
        (0, _) => Outcome::Victory(Team::Blue),
        _ => Outcome::Undecided,
    }
}

/// Record a terminal outcome: status, winner, post-battle stats and the
/// restart countdown. Does nothing for [`Outcome::Undecided`].
pub fn conclude(state: &mut SimulationState, world: &mut BattleWorld, outcome: Outcome, now: f64) {
    let Some(winner) = outcome.winner() else {
        return;
    };
    let status = outcome.status();

    state.status = status;
    state.winner = Some(winner);
    state.auto_restart_countdown = Some(AUTO_RESTART_SECS);
    state.countdown_paused = false;
    if state.post_battle_stats.is_none() {
        state.post_battle_stats = Some(capture(world, status, winner, now));
    }

    info!(
        battle = state.battle_number,
        status = ?status,
        winner = ?winner,
        time = now,
        "battle ended"
    );
    world.events.push(BattleEvent::BattleEnded { status, winner });
}

/// Snapshot every robot of both rosters (living and eliminated) and both
/// teams' totals.
pub fn capture(
    world: &BattleWorld,
    status: BattleStatus,
    winner: Winner,
    now: f64,
) -> PostBattleStats {
    let mut robots: Vec<RobotRecord> = world
        .ecs
        .query::<(&Robot, &Health, &RobotStats)>()
        .iter()
        .map(|(_, (robot, health, stats))| RobotRecord {
            id: robot.id.clone(),
            team: robot.team,
            weapon: robot.weapon,
            health: health.current,
            eliminated: false,
            stats: *stats,
        })
        .chain(world.casualties().iter().cloned())
        .collect();
    robots.sort_by(|a, b| a.id.cmp(&b.id));

    let teams = world
        .teams
        .iter()
        .map(|t| TeamRecord {
            team: t.name,
            active_robots: t.active_robots,
            eliminated_robots: t.eliminated_robots,
            stats: t.stats,
        })
        .collect();

    PostBattleStats {
        status,
        winner,
        captured_at_secs: now,
        robots,
        teams,
    }
}

/// Count the restart countdown down by `dt`. Returns `true` when it has run
/// out and the battle should restart.
pub fn tick_countdown(state: &mut SimulationState, dt: f64) -> bool {
    if !state.status.is_terminal() || state.countdown_paused {
        return false;
    }
    let Some(remaining) = state.auto_restart_countdown else {
        return false;
    };
    let remaining = (remaining - dt).max(0.0);
    state.auto_restart_countdown = Some(remaining);
    remaining <= 0.0
}

pub fn pause_countdown(state: &mut SimulationState) {
    state.countdown_paused = true;
}

pub fn resume_countdown(state: &mut SimulationState) {
    state.countdown_paused = false;
}

/// Put the countdown back to its full length. Ignored while no battle has
/// ended.
pub fn reset_countdown(state: &mut SimulationState) {
    if state.auto_restart_countdown.is_some() {
        state.auto_restart_countdown = Some(AUTO_RESTART_SECS);
    }
}
