//! Per-tick movement for a single robot.
//!
//! Each behavior mode picks a goal point and the robot steps toward it at its
//! ground speed. Non-captains that are not closing on a target are then
//! blended toward their formation slot. The result is clamped into the arena.
//!
//! A robot whose target is out of reach never holds still unless it is
//! falling back from an enemy that is still pressing.

use glam::DVec3;

use skirmish_core::arena::Bounds;
use skirmish_core::constants::*;
use skirmish_core::enums::BehaviorMode;
use skirmish_core::types::{Position, Rotation};

/// Input to the movement evaluator for a single robot.
pub struct MovementContext {
    pub position: Position,
    pub rotation: Rotation,
    pub mode: BehaviorMode,
    /// Position of the current target, if any.
    pub target_position: Option<Position>,
    /// Assigned cover point, if any.
    pub cover_position: Option<Position>,
    /// Center of the robot's own spawn zone.
    pub spawn_center: Position,
    /// `captain position + formation offset`; `None` for the captain itself.
    pub formation_anchor: Option<Position>,
    /// Distance at which a robot stops closing on its target.
    pub standoff_range: f64,
    /// Distance at which the robot's weapon can hit.
    pub weapon_range: f64,
    /// Whether any living enemy is not itself retreating.
    pub enemy_pressing: bool,
    pub dt: f64,
    pub bounds: Bounds,
}

/// Output from the movement evaluator.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MovementUpdate {
    pub next_position: Position,
    pub rotation: Rotation,
}

/// Evaluate movement for one robot.
pub fn evaluate(ctx: &MovementContext) -> MovementUpdate {
    let goal = goal_for_mode(ctx);
    let mut next = step_toward(&ctx.position, &goal, ROBOT_MOVE_SPEED * ctx.dt);

    if let Some(anchor) = ctx.formation_anchor.filter(|_| !is_closing(ctx)) {
        let alpha = (FORMATION_BLEND_RATE * ctx.dt).clamp(0.0, 1.0);
        next = next.lerp(&anchor, alpha);
    }

    let next_position = ctx.bounds.clamp(next);
    MovementUpdate {
        next_position,
        rotation: facing(ctx, &next_position),
    }
}

/// Goal point for the robot's current behavior mode.
pub fn goal_for_mode(ctx: &MovementContext) -> Position {
    match ctx.mode {
        BehaviorMode::Retreating if ctx.enemy_pressing => {
            retreat_point(&ctx.position, &ctx.spawn_center, &ctx.bounds)
        }
        BehaviorMode::Retreating => engage_point(ctx),
        BehaviorMode::Defensive => match ctx.cover_position {
            Some(cover) => {
                let peek = peek_point(&cover, &ctx.rotation, &ctx.bounds);
                let covered_shot = ctx
                    .target_position
                    .map_or(true, |target| peek.distance_to(&target) <= ctx.weapon_range);
                if covered_shot {
                    peek
                } else {
                    engage_point(ctx)
                }
            }
            None => engage_point(ctx),
        },
        BehaviorMode::Aggressive => engage_point(ctx),
    }
}

/// The target while it is beyond standoff range, otherwise hold position.
fn engage_point(ctx: &MovementContext) -> Position {
    match ctx.target_position {
        Some(target) if is_closing(ctx) => target,
        _ => ctx.position,
    }
}

/// True while the robot's target is farther than its standoff range.
fn is_closing(ctx: &MovementContext) -> bool {
    ctx.target_position
        .map_or(false, |target| ctx.position.distance_to(&target) > ctx.standoff_range)
}

/// A point `RETREAT_STEP_DISTANCE` from `position` toward the spawn center.
pub fn retreat_point(position: &Position, spawn_center: &Position, bounds: &Bounds) -> Position {
    let dir = ground_direction(position, spawn_center);
    bounds.clamp(Position::from_vec(
        position.to_vec() + dir * RETREAT_STEP_DISTANCE,
    ))
}

/// Cover point leaned out along the robot's heading.
pub fn peek_point(cover: &Position, rotation: &Rotation, bounds: &Bounds) -> Position {
    bounds.clamp(Position::from_vec(
        cover.to_vec() + rotation.forward() * COVER_PEEK_OFFSET,
    ))
}

/// Move at most `max_step` from `from` toward `to`.
pub fn step_toward(from: &Position, to: &Position, max_step: f64) -> Position {
    let delta = to.to_vec() - from.to_vec();
    let distance = delta.length();
    if distance <= max_step || distance <= f64::EPSILON {
        return *to;
    }
    Position::from_vec(from.to_vec() + delta / distance * max_step)
}

fn ground_direction(from: &Position, to: &Position) -> DVec3 {
    DVec3::new(to.x - from.x, 0.0, to.z - from.z).normalize_or_zero()
}

/// Face the target if there is one, otherwise the direction of travel.
fn facing(ctx: &MovementContext, next: &Position) -> Rotation {
    if let Some(target) = ctx.target_position {
        if next.ground_distance_to(&target) > f64::EPSILON {
            return Rotation::from_yaw(next.yaw_to(&target));
        }
    }
    if ctx.position.ground_distance_to(next) > f64::EPSILON {
        return Rotation::from_yaw(ctx.position.yaw_to(next));
    }
    ctx.rotation
}
