//! ECS systems that operate on the battle world each tick.
//!
//! Systems are free functions over `&mut BattleWorld` (or `&BattleWorld` for
//! read-only work). They do not own state; everything lives in components
//! or in the battle context.

pub mod captaincy;
pub mod damage;
pub mod fire_control;
pub mod physics;
pub mod snapshot;
pub mod squad_ai;
pub mod stats;
pub mod victory;
