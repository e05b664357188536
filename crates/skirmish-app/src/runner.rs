//! Headless battle runner.

use serde::Serialize;
use tracing::info;

use skirmish_core::commands::BattleCommand;
use skirmish_core::constants::DT;
use skirmish_core::events::BattleEvent;
use skirmish_core::state::{BattleSnapshot, PostBattleStats};
use skirmish_sim::SimulationEngine;

/// Result of a headless run.
#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    pub simulated_secs: f64,
    /// Post-battle stats of every battle that ended during the run.
    pub battles: Vec<PostBattleStats>,
    /// State at the end of the run.
    pub final_snapshot: BattleSnapshot,
}

/// Start a battle and tick as fast as possible for `seconds` of
/// simulated time, collecting every battle's post-battle stats.
pub fn run_fast(engine: &mut SimulationEngine, seconds: f64) -> RunReport {
    engine.queue_command(BattleCommand::StartBattle);

    let ticks = (seconds / DT).round().max(1.0) as u64;
    let mut battles = Vec::new();
    let mut snapshot = engine.tick();
    collect_ended(&snapshot, &mut battles);

    for _ in 1..ticks {
        snapshot = engine.tick();
        collect_ended(&snapshot, &mut battles);
    }

    info!(
        ticks,
        battles = battles.len(),
        "headless run finished"
    );
    RunReport {
        simulated_secs: snapshot.time.elapsed_secs,
        battles,
        final_snapshot: snapshot,
    }
}

fn collect_ended(snapshot: &BattleSnapshot, battles: &mut Vec<PostBattleStats>) {
    let ended = snapshot
        .events
        .iter()
        .any(|e| matches!(e, BattleEvent::BattleEnded { .. }));
    if !ended {
        return;
    }
    if let Some(stats) = &snapshot.state.post_battle_stats {
        info!(
            winner = ?stats.winner,
            at = stats.captured_at_secs,
            "battle recorded"
        );
        battles.push(stats.clone());
    }
}
