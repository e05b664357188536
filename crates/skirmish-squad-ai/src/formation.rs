//! Formation offsets around the captain.

use rand::Rng;

use skirmish_core::constants::{FORMATION_JITTER, FORMATION_RING_RADIUS, ROBOTS_PER_TEAM};
use skirmish_core::types::Position;

/// Offset from the captain for roster slot `slot`.
///
/// Slot 0 (the initial captain) sits on the anchor. The other slots are
/// spread evenly around a ring, each nudged by a small seeded jitter so
/// squads do not look machine-placed.
pub fn slot_offset<R: Rng>(slot: usize, rng: &mut R) -> Position {
    if slot == 0 {
        return Position::default();
    }

    let ring_slots = (ROBOTS_PER_TEAM - 1) as f64;
    let angle = (slot - 1) as f64 / ring_slots * std::f64::consts::TAU;
    let jitter_x = rng.gen_range(-FORMATION_JITTER..=FORMATION_JITTER);
    let jitter_z = rng.gen_range(-FORMATION_JITTER..=FORMATION_JITTER);

    Position::new(
        FORMATION_RING_RADIUS * angle.sin() + jitter_x,
        0.0,
        FORMATION_RING_RADIUS * angle.cos() + jitter_z,
    )
}
