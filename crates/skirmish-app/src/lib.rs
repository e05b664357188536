//! Skirmish application layer.
//!
//! Wires the simulation engine to a paced game loop thread, a headless
//! runner and log setup for the `skirmish` binary.

pub mod game_loop;
pub mod logging;
pub mod runner;
pub mod state;

pub use skirmish_core as core;
