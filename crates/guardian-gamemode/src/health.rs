use rand::Rng;

use guardian_core::settings::HealthMode;

/// Health for a titan of the given size.
///
/// Bounds are inclusive. If they arrive inverted they are swapped, so the
/// roll never panics. `Disabled` means health tracking is skipped.
pub fn roll_health<R: Rng + ?Sized>(
    mode: HealthMode,
    min: u32,
    max: u32,
    size: f32,
    rng: &mut R,
) -> u32 {
    let (lo, hi) = if min <= max { (min, max) } else { (max, min) };
    match mode {
        HealthMode::Fixed => rng.random_range(lo..=hi),
        HealthMode::Scaled => {
            let base = rng.random_range(lo..=hi) as f32;
            let scaled = (size / 4.0 * base).round_ties_even();
            if scaled.is_nan() {
                return lo;
            }
            scaled.clamp(lo as f32, hi as f32) as u32
        },
        HealthMode::Disabled => 0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn disabled_is_always_zero() {
        let mut rng = StdRng::seed_from_u64(3);
        for size in [0.0, 0.7, 4.0, 50.0] {
            assert_eq!(roll_health(HealthMode::Disabled, 10, 20, size, &mut rng), 0);
            assert_eq!(roll_health(HealthMode::Disabled, 500, 900, size, &mut rng), 0);
        }
    }

    #[test]
    fn fixed_is_inclusive() {
        let mut rng = StdRng::seed_from_u64(3);
        let mut seen_min = false;
        let mut seen_max = false;
        for _ in 0..2000 {
            let hp = roll_health(HealthMode::Fixed, 10, 12, 1.0, &mut rng);
            assert!((10..=12).contains(&hp));
            seen_min |= hp == 10;
            seen_max |= hp == 12;
        }
        assert!(seen_min && seen_max, "both bounds must be reachable");
    }

    #[test]
    fn scaled_size_four_stays_in_range() {
        let mut rng = StdRng::seed_from_u64(11);
        for _ in 0..1000 {
            let hp = roll_health(HealthMode::Scaled, 10, 20, 4.0, &mut rng);
            assert!((10..=20).contains(&hp), "hp {hp}");
        }
    }

    #[test]
    fn scaled_small_titan_clamps_to_minimum() {
        let mut rng = StdRng::seed_from_u64(5);
        for _ in 0..100 {
            assert_eq!(roll_health(HealthMode::Scaled, 100, 200, 0.7, &mut rng), 100);
        }
    }

    #[test]
    fn scaled_huge_titan_clamps_to_maximum() {
        let mut rng = StdRng::seed_from_u64(5);
        for _ in 0..100 {
            assert_eq!(roll_health(HealthMode::Scaled, 100, 200, 40.0, &mut rng), 200);
        }
    }

    #[test]
    fn inverted_bounds_do_not_panic() {
        let mut rng = StdRng::seed_from_u64(5);
        let hp = roll_health(HealthMode::Fixed, 20, 10, 1.0, &mut rng);
        assert!((10..=20).contains(&hp));
    }

    #[test]
    fn degenerate_range() {
        let mut rng = StdRng::seed_from_u64(5);
        assert_eq!(roll_health(HealthMode::Fixed, 42, 42, 1.0, &mut rng), 42);
        assert_eq!(roll_health(HealthMode::Scaled, 42, 42, 9.0, &mut rng), 42);
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn scaled_always_within_bounds(
                min in 0u32..5000,
                span in 0u32..5000,
                size in 0.0f32..20.0,
                seed in any::<u64>(),
            ) {
                let max = min + span;
                let mut rng = StdRng::seed_from_u64(seed);
                let hp = roll_health(HealthMode::Scaled, min, max, size, &mut rng);
                prop_assert!(hp >= min && hp <= max);
            }

            #[test]
            fn fixed_always_within_bounds(
                min in 0u32..5000,
                span in 0u32..5000,
                seed in any::<u64>(),
            ) {
                let max = min + span;
                let mut rng = StdRng::seed_from_u64(seed);
                let hp = roll_health(HealthMode::Fixed, min, max, 1.0, &mut rng);
                prop_assert!(hp >= min && hp <= max);
            }
        }
    }
}
