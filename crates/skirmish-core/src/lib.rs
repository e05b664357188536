//! Core types and definitions for the SKIRMISH robot battle simulation.
//!
//! This crate defines the vocabulary shared across all other crates:
//! components, commands, state snapshots, events, the weapon table, the
//! arena model and constants. It has no dependency on any runtime.

pub mod arena;
pub mod commands;
pub mod components;
pub mod constants;
pub mod enums;
pub mod error;
pub mod events;
pub mod state;
pub mod types;
pub mod weapons;
