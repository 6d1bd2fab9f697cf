use tracing::warn;
use uuid::Uuid;

use crate::cache::{self, DEFAULT_USER_STATS_TTL};
use crate::database::Database;
use crate::model::activity::ActivityRow;
use crate::model::stats::{StatIncrements, UserStats};

/// Fetch a user's stats row, serving from cache when it is fresh.
/// Returns `None` for users with no logged activity yet.
pub async fn get_user_stats(db: &Database, user_id: Uuid) -> anyhow::Result<Option<UserStats>> {
    let cache = db.cache();
    let key = cache::user_stats_key(cache, user_id);

    match cache.get_json::<UserStats>(&key).await {
        Ok(Some(cached)) => return Ok(Some(cached)),
        Ok(None) => {}
        Err(e) => warn!(
            ?e,
            cache_key = %key,
            "stats cache get failed; falling back to database"
        ),
    }

    let row: Option<UserStats> = sqlx::query_as(
        "SELECT user_id, points, level, reviews_count, comments_count, photos_count, \
         visited_restaurants, districts_visited, tried_dishes, updated_at \
         FROM user_stats WHERE user_id = $1",
    )
    .bind(user_id)
    .fetch_optional(db.pool())
    .await?;

    if let Some(stats) = &row {
        if let Err(e) = cache.set_json(&key, stats, DEFAULT_USER_STATS_TTL).await {
            warn!(
                ?e,
                cache_key = %key,
                "stats cache set failed; returning database value"
            );
        }
    }

    Ok(row)
}

/// Record one activity and fold its increments into the stats row in a
/// single transaction. `level_for` recomputes the stored level from the
/// new point total; the canonical threshold table lives in the
/// gamification crate, so it is passed in rather than duplicated here.
pub async fn apply_activity(
    db: &Database,
    user_id: Uuid,
    kind: &str,
    payload: Option<serde_json::Value>,
    increments: StatIncrements,
    level_for: impl Fn(i64) -> i64,
) -> anyhow::Result<UserStats> {
    let mut tx = db.pool().begin().await?;

    sqlx::query("INSERT INTO user_activities (user_id, kind, payload) VALUES ($1, $2, $3)")
        .bind(user_id)
        .bind(kind)
        .bind(payload)
        .execute(&mut *tx)
        .await?;

    let points: i64 = sqlx::query_scalar(
        "INSERT INTO user_stats (user_id, points, level, reviews_count, comments_count, \
         photos_count, visited_restaurants, districts_visited, tried_dishes) \
         VALUES ($1, $2, 1, $3, $4, $5, $6, $7, $8) \
         ON CONFLICT (user_id) DO UPDATE SET \
             points = user_stats.points + EXCLUDED.points, \
             reviews_count = user_stats.reviews_count + EXCLUDED.reviews_count, \
             comments_count = user_stats.comments_count + EXCLUDED.comments_count, \
             photos_count = user_stats.photos_count + EXCLUDED.photos_count, \
             visited_restaurants = user_stats.visited_restaurants + EXCLUDED.visited_restaurants, \
             districts_visited = user_stats.districts_visited + EXCLUDED.districts_visited, \
             tried_dishes = user_stats.tried_dishes + EXCLUDED.tried_dishes, \
             updated_at = NOW() \
         RETURNING points",
    )
    .bind(user_id)
    .bind(increments.points)
    .bind(increments.reviews_count)
    .bind(increments.comments_count)
    .bind(increments.photos_count)
    .bind(increments.visited_restaurants)
    .bind(increments.districts_visited)
    .bind(increments.tried_dishes)
    .fetch_one(&mut *tx)
    .await?;

    let level = level_for(points);

    let stats: UserStats = sqlx::query_as(
        "UPDATE user_stats SET level = $2 WHERE user_id = $1 \
         RETURNING user_id, points, level, reviews_count, comments_count, photos_count, \
         visited_restaurants, districts_visited, tried_dishes, updated_at",
    )
    .bind(user_id)
    .bind(level)
    .fetch_one(&mut *tx)
    .await?;

    tx.commit().await?;

    invalidate_user_caches(db, user_id).await;

    Ok(stats)
}

/// Most recent activities for a user, newest first.
pub async fn recent_activities(
    db: &Database,
    user_id: Uuid,
    limit: i64,
) -> anyhow::Result<Vec<ActivityRow>> {
    let rows: Vec<ActivityRow> = sqlx::query_as(
        "SELECT id, user_id, kind, payload, created_at FROM user_activities \
         WHERE user_id = $1 ORDER BY created_at DESC, id DESC LIMIT $2",
    )
    .bind(user_id)
    .bind(limit)
    .fetch_all(db.pool())
    .await?;

    Ok(rows)
}

/// Drop a user's cached stats and badge ids so the next read sees the
/// committed row. Cache failures are logged, not propagated.
pub async fn invalidate_user_caches(db: &Database, user_id: Uuid) {
    let cache = db.cache();

    let stats_key = cache::user_stats_key(cache, user_id);
    if let Err(e) = cache.del(&stats_key).await {
        warn!(?e, cache_key = %stats_key, "stats cache invalidation failed");
    }

    let badges_key = cache::user_badges_key(cache, user_id);
    if let Err(e) = cache.del(&badges_key).await {
        warn!(?e, cache_key = %badges_key, "badges cache invalidation failed");
    }
}
