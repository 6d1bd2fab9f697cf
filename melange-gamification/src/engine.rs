use tracing::info;
use uuid::Uuid;

use melange_database::model::UserStats;
use melange_database::{Database, impls};

use crate::badges::{self, BadgeDef};
use crate::levels;
use crate::points::ActivityKind;

/// What one logged activity changed: the points it earned, the fresh
/// stats row, and any badges it unlocked.
pub struct ActivityOutcome {
    pub points_earned: i64,
    pub stats: UserStats,
    pub newly_earned: Vec<&'static BadgeDef>,
}

/// Record an activity: persist it, fold its increments into the stats
/// row, recompute the level, then run the badge check against the fresh
/// counters.
pub async fn log_activity(
    db: &Database,
    user_id: Uuid,
    kind: ActivityKind,
    payload: Option<serde_json::Value>,
) -> anyhow::Result<ActivityOutcome> {
    let increments = kind.increments();

    let stats = impls::stats::apply_activity(
        db,
        user_id,
        kind.as_str(),
        payload,
        increments,
        levels::level_for_points,
    )
    .await?;

    info!(
        %user_id,
        kind = kind.as_str(),
        points_earned = increments.points,
        total_points = stats.points,
        level = stats.level,
        "activity logged"
    );

    let newly_earned = award_new_badges(db, &stats).await?;

    Ok(ActivityOutcome {
        points_earned: increments.points,
        stats,
        newly_earned,
    })
}

/// Evaluate the catalog for a user outside the activity path. Returns
/// nothing for users without a stats row; idempotent between activities.
pub async fn check_for_badges(
    db: &Database,
    user_id: Uuid,
) -> anyhow::Result<Vec<&'static BadgeDef>> {
    let Some(stats) = impls::stats::get_user_stats(db, user_id).await? else {
        return Ok(Vec::new());
    };

    award_new_badges(db, &stats).await
}

async fn award_new_badges(
    db: &Database,
    stats: &UserStats,
) -> anyhow::Result<Vec<&'static BadgeDef>> {
    let earned_ids = impls::badges::earned_badge_ids(db, stats.user_id).await?;
    let candidates = badges::newly_earned(stats, &earned_ids);

    let mut awarded = Vec::with_capacity(candidates.len());
    for badge in candidates {
        // A concurrent check may have inserted the same badge; only the
        // writer that actually created the row reports it.
        if impls::badges::award_badge(db, stats.user_id, badge.id).await? {
            info!(user_id = %stats.user_id, badge_id = badge.id, "badge earned");
            awarded.push(badge);
        }
    }

    Ok(awarded)
}
