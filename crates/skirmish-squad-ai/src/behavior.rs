//! Behavior-mode classification and cover assignment.

use skirmish_core::constants::*;
use skirmish_core::enums::BehaviorMode;
use skirmish_core::types::Position;

/// Input to the classifier for a single robot.
pub struct BehaviorContext {
    pub health: f64,
    pub max_health: f64,
    /// Living robots on the robot's own team (including itself).
    pub own_active: u32,
    /// Living robots on the opposing team.
    pub enemy_active: u32,
}

/// Classify a robot. Rules are evaluated top-down, first match wins:
/// low health retreats, then weakened robots or an outnumbered team
/// defends, everything else attacks.
pub fn classify(ctx: &BehaviorContext) -> BehaviorMode {
    if ctx.health <= RETREAT_HEALTH_THRESHOLD {
        return BehaviorMode::Retreating;
    }

    let health_ratio = if ctx.max_health > 0.0 {
        ctx.health / ctx.max_health
    } else {
        0.0
    };
    if health_ratio < DEFENSIVE_HEALTH_RATIO || strength_ratio(ctx) < DEFENSIVE_STRENGTH_RATIO {
        return BehaviorMode::Defensive;
    }

    BehaviorMode::Aggressive
}

/// Own/enemy active ratio. With no enemies left the team is never outnumbered.
fn strength_ratio(ctx: &BehaviorContext) -> f64 {
    if ctx.enemy_active == 0 {
        return f64::INFINITY;
    }
    ctx.own_active as f64 / ctx.enemy_active as f64
}

/// Nearest cover point to `position`, ties resolved by list order.
pub fn nearest_cover(
    position: &Position,
    cover_points: impl IntoIterator<Item = Position>,
) -> Option<Position> {
    let mut best: Option<(f64, Position)> = None;
    for cover in cover_points {
        let d = position.ground_distance_to(&cover);
        if best.map_or(true, |(best_d, _)| d < best_d) {
            best = Some((d, cover));
        }
    }
    best.map(|(_, p)| p)
}

/// Cover assignment for a mode: only non-aggressive robots take cover.
pub fn assign_cover(
    mode: BehaviorMode,
    position: &Position,
    cover_points: impl IntoIterator<Item = Position>,
) -> Option<Position> {
    match mode {
        BehaviorMode::Aggressive => None,
        BehaviorMode::Defensive | BehaviorMode::Retreating => {
            nearest_cover(position, cover_points)
        }
    }
}
