//! Squad AI for SKIRMISH.
//!
//! Target selection, behavior-mode classification, cover and formation
//! movement, and captain election. Every function here is pure and works on
//! plain data; the simulation crate gathers inputs from the ECS world and
//! applies the results.

pub mod behavior;
pub mod captain;
pub mod formation;
pub mod movement;
pub mod targeting;

pub use skirmish_core as core;
