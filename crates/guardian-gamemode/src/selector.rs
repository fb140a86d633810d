use std::collections::{BTreeMap, BTreeSet};

use rand::Rng;

use guardian_core::titan::TitanType;

/// Uniform choice over every archetype.
pub fn select_uniform<R: Rng + ?Sized>(rng: &mut R) -> TitanType {
    TitanType::ALL[rng.random_range(0..TitanType::ALL.len())]
}

/// Weighted archetype selection.
///
/// Excluded archetypes are removed before the total is computed. When nothing
/// with a positive weight remains, selection falls back to uniform over the
/// full [`TitanType::ALL`] set, not the filtered one.
pub fn select_titan_type<R: Rng + ?Sized>(
    weights: &BTreeMap<TitanType, f32>,
    excluded: &BTreeSet<TitanType>,
    rng: &mut R,
) -> TitanType {
    let candidates: Vec<(TitanType, f32)> = weights
        .iter()
        .filter(|(titan_type, _)| !excluded.contains(titan_type))
        .filter(|(_, weight)| weight.is_finite() && **weight > 0.0)
        .map(|(titan_type, weight)| (*titan_type, *weight))
        .collect();
    let total: f32 = candidates.iter().map(|(_, w)| w).sum();
    if candidates.is_empty() || !total.is_finite() || total <= 0.0 {
        return select_uniform(rng);
    }
    let draw: f32 = rng.random();
    pick(&candidates, total, draw)
}

/// Walk the cumulative ratios and return the first one above `draw`.
///
/// `candidates` must be non-empty. If rounding leaves every breakpoint at or
/// below the draw, the last candidate is returned.
fn pick(candidates: &[(TitanType, f32)], total: f32, draw: f32) -> TitanType {
    let mut cumulative = 0.0;
    for &(titan_type, weight) in candidates {
        cumulative += weight / total;
        if draw < cumulative {
            return titan_type;
        }
    }
    candidates[candidates.len() - 1].0
}
