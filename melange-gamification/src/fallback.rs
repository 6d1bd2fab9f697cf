use chrono::{DateTime, Utc};
use uuid::Uuid;

use melange_database::model::{UserProfile, UserStats};

use crate::levels;

/// Points credited per day of account age when synthesizing stats.
const POINTS_PER_DAY: i64 = 15;
/// Synthesized totals never exceed the top-level threshold.
const MAX_POINTS: i64 = 500;
/// Vienna has 23 districts.
const MAX_DISTRICTS: i64 = 23;

/// Deterministic stats estimate for when the store is unreachable or
/// has no row yet. Derived entirely from account age so repeated calls
/// agree; the level comes from the canonical threshold table like every
/// other level in the system. Never written back to the store.
pub fn fallback_stats(user_id: Uuid, created_at: DateTime<Utc>, now: DateTime<Utc>) -> UserStats {
    let age_days = (now - created_at).num_days().max(0);
    let points = (age_days * POINTS_PER_DAY).min(MAX_POINTS);

    UserStats {
        user_id,
        points,
        level: levels::level_for_points(points),
        reviews_count: points / 25,
        comments_count: points / 40,
        photos_count: points / 50,
        visited_restaurants: points / 30,
        districts_visited: (points / 80).min(MAX_DISTRICTS),
        tried_dishes: points / 35,
        updated_at: now,
    }
}

/// Deterministic display profile for a user with no profile row. The
/// username is derived from the user id, so it is stable across calls.
pub fn fallback_profile(user_id: Uuid, now: DateTime<Utc>) -> UserProfile {
    let short_id = user_id.simple().to_string();
    let username = format!("foodie-{}", &short_id[..8]);

    UserProfile {
        user_id,
        display_name: Some(display_name_for(&username)),
        username,
        language: "de".to_string(),
        role: "user".to_string(),
        created_at: now,
        updated_at: now,
    }
}

fn display_name_for(username: &str) -> String {
    let mut chars = username.chars();
    match chars.next() {
        Some(first) => format!("{}{}", first.to_uppercase(), chars.as_str()),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, Utc};
    use uuid::Uuid;

    use super::{fallback_profile, fallback_stats};

    #[test]
    fn fallback_stats_are_deterministic() {
        let user_id = Uuid::new_v4();
        let now = Utc::now();
        let created = now - Duration::days(10);

        let a = fallback_stats(user_id, created, now);
        let b = fallback_stats(user_id, created, now);
        assert_eq!(a.points, b.points);
        assert_eq!(a.level, b.level);
        assert_eq!(a.reviews_count, b.reviews_count);
    }

    #[test]
    fn brand_new_accounts_start_at_level_one() {
        let now = Utc::now();
        let stats = fallback_stats(Uuid::new_v4(), now, now);
        assert_eq!(stats.points, 0);
        assert_eq!(stats.level, 1);
        assert_eq!(stats.reviews_count, 0);
    }

    #[test]
    fn accounts_created_in_the_future_clamp_to_zero_age() {
        let now = Utc::now();
        let stats = fallback_stats(Uuid::new_v4(), now + Duration::days(3), now);
        assert_eq!(stats.points, 0);
        assert_eq!(stats.level, 1);
    }

    #[test]
    fn old_accounts_cap_at_the_top_level() {
        let now = Utc::now();
        let stats = fallback_stats(Uuid::new_v4(), now - Duration::days(3650), now);
        assert_eq!(stats.points, 500);
        assert_eq!(stats.level, 6);
        assert!(stats.districts_visited <= 23);
    }

    #[test]
    fn level_tracks_the_canonical_thresholds() {
        let now = Utc::now();
        // 4 days * 15 points = 60 points, inside level 3.
        let stats = fallback_stats(Uuid::new_v4(), now - Duration::days(4), now);
        assert_eq!(stats.points, 60);
        assert_eq!(stats.level, 3);
    }

    #[test]
    fn fallback_profile_is_stable_per_user() {
        let user_id = Uuid::new_v4();
        let now = Utc::now();

        let a = fallback_profile(user_id, now);
        let b = fallback_profile(user_id, now);
        assert_eq!(a.username, b.username);
        assert!(a.username.starts_with("foodie-"));
        assert_eq!(a.language, "de");
        let display = a.display_name.unwrap();
        assert!(display.starts_with('F'));
    }
}
