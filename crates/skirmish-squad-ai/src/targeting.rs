//! Target selection.

use std::cmp::Ordering;

use skirmish_core::enums::{TargetingRule, WeaponType};
use skirmish_core::types::Position;
use skirmish_core::weapons::damage_multiplier;

/// A living enemy the robot could engage.
#[derive(Debug, Clone, Copy)]
pub struct TargetCandidate<'a> {
    pub id: &'a str,
    pub position: Position,
    pub weapon: WeaponType,
}

/// The shooter choosing a target.
#[derive(Debug, Clone, Copy)]
pub struct Shooter {
    pub position: Position,
    pub weapon: WeaponType,
}

/// Score used by [`TargetingRule::WeaponAdvantage`].
pub fn advantage_score(shooter: &Shooter, candidate: &TargetCandidate<'_>) -> f64 {
    damage_multiplier(shooter.weapon, candidate.weapon) * 100.0
        - shooter.position.distance_to(&candidate.position)
}

/// Pick the best candidate under `rule`. Returns `None` when there are no
/// candidates. Ties always fall back to distance, then id, so the choice is
/// independent of candidate order.
pub fn select_target<'a>(
    rule: TargetingRule,
    shooter: &Shooter,
    candidates: &[TargetCandidate<'a>],
) -> Option<&'a str> {
    candidates
        .iter()
        .min_by(|a, b| compare(rule, shooter, a, b))
        .map(|c| c.id)
}

/// `Less` means `a` is the better target.
fn compare(
    rule: TargetingRule,
    shooter: &Shooter,
    a: &TargetCandidate<'_>,
    b: &TargetCandidate<'_>,
) -> Ordering {
    let by_distance = || {
        let da = shooter.position.distance_to(&a.position);
        let db = shooter.position.distance_to(&b.position);
        da.total_cmp(&db)
    };

    let primary = match rule {
        TargetingRule::Nearest => Ordering::Equal,
        TargetingRule::WeaponAdvantage => {
            advantage_score(shooter, b).total_cmp(&advantage_score(shooter, a))
        }
    };

    primary.then_with(by_distance).then_with(|| a.id.cmp(b.id))
}
