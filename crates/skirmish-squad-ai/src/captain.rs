//! Captain ranking and election.
//!
//! A team's captain is the living robot ranked first by:
//! 1. highest health,
//! 2. most kills,
//! 3. smallest distance to the team's spawn-zone center,
//! 4. lexicographically smallest id.
//!
//! The ranking is a total order, so an election always yields the same robot
//! for the same inputs regardless of roster order.

use std::cmp::Ordering;

use skirmish_core::types::Position;

/// A robot eligible for captaincy.
#[derive(Debug, Clone, Copy)]
pub struct CaptainCandidate<'a> {
    pub id: &'a str,
    pub health: f64,
    pub kills: u32,
    pub position: Position,
}

/// Compare two candidates. `Less` means `a` ranks ahead of `b`.
pub fn compare_candidates(
    a: &CaptainCandidate<'_>,
    b: &CaptainCandidate<'_>,
    spawn_center: &Position,
) -> Ordering {
    b.health
        .total_cmp(&a.health)
        .then_with(|| b.kills.cmp(&a.kills))
        .then_with(|| {
            a.position
                .distance_to(spawn_center)
                .total_cmp(&b.position.distance_to(spawn_center))
        })
        .then_with(|| a.id.cmp(b.id))
}

/// Sort living candidates best-first. Dead candidates are dropped.
pub fn rank<'a>(
    candidates: &[CaptainCandidate<'a>],
    spawn_center: &Position,
) -> Vec<CaptainCandidate<'a>> {
    let mut ranked: Vec<CaptainCandidate<'a>> = candidates
        .iter()
        .filter(|c| c.health > 0.0)
        .copied()
        .collect();
    ranked.sort_by(|a, b| compare_candidates(a, b, spawn_center));
    ranked
}

/// Id of the elected captain, or `None` if nobody is alive.
pub fn elect<'a>(candidates: &[CaptainCandidate<'a>], spawn_center: &Position) -> Option<&'a str> {
    rank(candidates, spawn_center).first().map(|c| c.id)
}
