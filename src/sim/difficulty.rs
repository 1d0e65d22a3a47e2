//! Difficulty curve
//!
//! Pure functions of score: every 150 points is a level, and each level
//! spawns toppings more often and makes them fall faster.

use crate::consts::*;

/// Difficulty level for a score
pub fn difficulty_level(score: u64) -> u32 {
    (score / SCORE_PER_LEVEL).min(u32::MAX as u64) as u32
}

/// Frames between spawns at a level
///
/// Level 0: 30, level 1: 25, ... level 4+: 10.
pub fn spawn_interval_frames(level: u32) -> u32 {
    let reduction = level
        .saturating_mul(SPAWN_INTERVAL_STEP)
        .min(MAX_SPAWN_REDUCTION);
    (BASE_SPAWN_INTERVAL - reduction).max(MIN_SPAWN_INTERVAL)
}

/// Fall speed multiplier at a level (1.0x, +0.2x per level, capped at 2.0x)
pub fn speed_multiplier(level: u32) -> f32 {
    (1.0 + level as f32 * SPEED_STEP).min(MAX_SPEED_MULTIPLIER)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_level_boundaries() {
        assert_eq!(difficulty_level(0), 0);
        assert_eq!(difficulty_level(149), 0);
        assert_eq!(difficulty_level(150), 1);
        assert_eq!(difficulty_level(750), 5);
    }

    #[test]
    fn test_score_scenarios() {
        let level = difficulty_level(149);
        assert_eq!(spawn_interval_frames(level), 30);
        assert_eq!(speed_multiplier(level), 1.0);

        let level = difficulty_level(150);
        assert_eq!(spawn_interval_frames(level), 25);
        assert!((speed_multiplier(level) - 1.2).abs() < 1e-6);

        let level = difficulty_level(750);
        assert_eq!(spawn_interval_frames(level), 10);
        assert_eq!(speed_multiplier(level), 2.0);
    }

    #[test]
    fn test_huge_level_does_not_overflow() {
        assert_eq!(spawn_interval_frames(u32::MAX), MIN_SPAWN_INTERVAL);
        assert_eq!(speed_multiplier(u32::MAX), MAX_SPEED_MULTIPLIER);
    }

    proptest! {
        #[test]
        fn prop_level_is_floor_and_monotonic(s in 0u64..10_000_000) {
            prop_assert_eq!(difficulty_level(s) as u64, s / 150);
            prop_assert!(difficulty_level(s + 1) >= difficulty_level(s));
        }

        #[test]
        fn prop_spawn_interval_bounded_non_increasing(level in 0u32..1_000) {
            let interval = spawn_interval_frames(level);
            prop_assert!((10..=30).contains(&interval));
            prop_assert!(spawn_interval_frames(level + 1) <= interval);
        }

        #[test]
        fn prop_speed_multiplier_bounded_non_decreasing(level in 0u32..1_000) {
            let mult = speed_multiplier(level);
            prop_assert!((1.0..=2.0).contains(&mult));
            prop_assert!(speed_multiplier(level + 1) >= mult);
        }
    }
}
