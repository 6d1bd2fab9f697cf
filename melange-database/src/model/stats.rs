use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Per-user gamification counters. Created on first activity,
/// incremented on every logged activity. `level` is derived from
/// `points` and stored alongside them; points only ever grow, so the
/// level is monotonic too.
#[derive(Clone, Debug, FromRow, Serialize, Deserialize)]
pub struct UserStats {
    pub user_id: Uuid,
    pub points: i64,
    pub level: i64,
    pub reviews_count: i64,
    pub comments_count: i64,
    pub photos_count: i64,
    pub visited_restaurants: i64,
    pub districts_visited: i64,
    pub tried_dishes: i64,
    pub updated_at: DateTime<Utc>,
}

/// Column deltas applied to a stats row by one logged activity.
/// Built from the activity kind by the gamification engine.
#[derive(Clone, Copy, Debug, Default)]
pub struct StatIncrements {
    pub points: i64,
    pub reviews_count: i64,
    pub comments_count: i64,
    pub photos_count: i64,
    pub visited_restaurants: i64,
    pub districts_visited: i64,
    pub tried_dishes: i64,
}
