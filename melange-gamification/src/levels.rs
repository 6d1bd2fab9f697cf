use melange_utils::Language;

/// Minimum cumulative points for levels 1 through 6. This table is the
/// single source of truth for level math; the stored `level` column is
/// always recomputed from it.
pub const LEVEL_THRESHOLDS: [i64; 6] = [0, 7, 50, 100, 250, 500];

pub const MAX_LEVEL: i64 = 6;

/// Level for a point total: the greatest index whose threshold is at or
/// below the total, capped at 6. Monotonic in `points`.
pub fn level_for_points(points: i64) -> i64 {
    let mut level = 1;
    for (index, threshold) in LEVEL_THRESHOLDS.iter().enumerate() {
        if points >= *threshold {
            level = index as i64 + 1;
        }
    }
    level
}

/// Minimum point total of the given level.
pub fn lower_threshold(level: i64) -> i64 {
    let index = level.clamp(1, MAX_LEVEL) as usize - 1;
    LEVEL_THRESHOLDS[index]
}

/// Point total at which the next level starts; `None` at the top.
pub fn next_level_threshold(level: i64) -> Option<i64> {
    let level = level.clamp(1, MAX_LEVEL);
    if level >= MAX_LEVEL {
        None
    } else {
        Some(LEVEL_THRESHOLDS[level as usize])
    }
}

/// Progress through the current level as a whole percentage in [0, 100].
/// The top level always reports 100.
pub fn progress_percentage(points: i64, level: i64) -> u8 {
    let Some(upper) = next_level_threshold(level) else {
        return 100;
    };
    let lower = lower_threshold(level);
    let progress = (points - lower) * 100 / (upper - lower);
    progress.clamp(0, 100) as u8
}

/// Localized display name for a level.
pub fn level_name(level: i64, language: Language) -> &'static str {
    match (level.clamp(1, MAX_LEVEL), language) {
        (1, Language::De) => "Anfänger",
        (1, Language::En) => "Beginner",
        (2, _) => "Beginner Foodie",
        (3, _) => "Regular Foodie",
        (4, _) => "Featured Foodie",
        (5, _) => "Expert Foodie",
        (_, _) => "Top Foodie",
    }
}

#[cfg(test)]
mod tests {
    use super::{
        LEVEL_THRESHOLDS, MAX_LEVEL, level_for_points, level_name, lower_threshold,
        next_level_threshold, progress_percentage,
    };
    use melange_utils::Language;

    #[test]
    fn level_boundaries() {
        assert_eq!(level_for_points(0), 1);
        assert_eq!(level_for_points(6), 1);
        assert_eq!(level_for_points(7), 2);
        assert_eq!(level_for_points(49), 2);
        assert_eq!(level_for_points(50), 3);
        assert_eq!(level_for_points(99), 3);
        assert_eq!(level_for_points(100), 4);
        assert_eq!(level_for_points(250), 5);
        assert_eq!(level_for_points(500), 6);
        assert_eq!(level_for_points(10_000), 6);
    }

    #[test]
    fn level_is_monotonic_and_in_range() {
        let mut previous = 1;
        for points in 0..=600 {
            let level = level_for_points(points);
            assert!((1..=MAX_LEVEL).contains(&level));
            assert!(level >= previous, "level regressed at {points} points");
            previous = level;
        }
    }

    #[test]
    fn progress_is_zero_at_the_lower_threshold() {
        for level in 1..MAX_LEVEL {
            assert_eq!(progress_percentage(lower_threshold(level), level), 0);
        }
    }

    #[test]
    fn progress_stays_below_hundred_until_the_next_level() {
        for level in 1..MAX_LEVEL {
            let upper = next_level_threshold(level).unwrap();
            assert!(progress_percentage(upper - 1, level) < 100);
        }
    }

    #[test]
    fn progress_is_clamped_and_full_at_the_top() {
        assert_eq!(progress_percentage(-5, 1), 0);
        assert_eq!(progress_percentage(500, 6), 100);
        assert_eq!(progress_percentage(12_345, 6), 100);
        for points in 0..=600 {
            let pct = progress_percentage(points, level_for_points(points));
            assert!(pct <= 100);
        }
    }

    #[test]
    fn thresholds_are_strictly_ascending() {
        for pair in LEVEL_THRESHOLDS.windows(2) {
            assert!(pair[0] < pair[1]);
        }
    }

    #[test]
    fn level_names_are_localized() {
        assert_eq!(level_name(1, Language::De), "Anfänger");
        assert_eq!(level_name(1, Language::En), "Beginner");
        assert_eq!(level_name(6, Language::De), "Top Foodie");
        // Out-of-range input clamps instead of panicking.
        assert_eq!(level_name(0, Language::En), "Beginner");
        assert_eq!(level_name(42, Language::En), "Top Foodie");
    }
}
