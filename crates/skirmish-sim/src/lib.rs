//! Battle simulation engine.
//!
//! Owns the hecs ECS world, runs the squad AI, weapon, physics and victory
//! systems at a fixed tick rate, and produces `BattleSnapshot`s for
//! observers.

pub mod engine;
pub mod systems;
pub mod world;
pub mod world_setup;

pub use engine::{ProjectileSpawn, SimConfig, SimulationEngine};
pub use skirmish_core as core;
pub use world::BattleWorld;

#[cfg(test)]
mod tests;
