use tracing::warn;
use uuid::Uuid;

use crate::cache::{self, DEFAULT_USER_BADGES_TTL};
use crate::database::Database;
use crate::model::badges::EarnedBadge;

/// Ids of every badge the user has earned, cached briefly. The cache is
/// invalidated whenever a badge is awarded.
pub async fn earned_badge_ids(db: &Database, user_id: Uuid) -> anyhow::Result<Vec<String>> {
    let cache = db.cache();
    let key = cache::user_badges_key(cache, user_id);

    cache
        .get_or_load_json(&key, DEFAULT_USER_BADGES_TTL, || async {
            let ids: Vec<String> = sqlx::query_scalar(
                "SELECT badge_id FROM user_badges WHERE user_id = $1 ORDER BY earned_at ASC",
            )
            .bind(user_id)
            .fetch_all(db.pool())
            .await?;

            Ok(ids)
        })
        .await
}

/// Earned badges with their award timestamps, straight from the table.
pub async fn earned_badges(db: &Database, user_id: Uuid) -> anyhow::Result<Vec<EarnedBadge>> {
    let rows: Vec<EarnedBadge> = sqlx::query_as(
        "SELECT user_id, badge_id, earned_at FROM user_badges \
         WHERE user_id = $1 ORDER BY earned_at ASC",
    )
    .bind(user_id)
    .fetch_all(db.pool())
    .await?;

    Ok(rows)
}

/// Award a badge, once. Returns whether the row was newly inserted; the
/// conflict target backs the insert-once invariant even under races.
pub async fn award_badge(db: &Database, user_id: Uuid, badge_id: &str) -> anyhow::Result<bool> {
    let result = sqlx::query(
        "INSERT INTO user_badges (user_id, badge_id) VALUES ($1, $2) \
         ON CONFLICT (user_id, badge_id) DO NOTHING",
    )
    .bind(user_id)
    .bind(badge_id)
    .execute(db.pool())
    .await?;

    let newly_awarded = result.rows_affected() == 1;

    if newly_awarded {
        let key = cache::user_badges_key(db.cache(), user_id);
        if let Err(e) = db.cache().del(&key).await {
            warn!(?e, cache_key = %key, "badges cache invalidation failed");
        }
    }

    Ok(newly_awarded)
}
