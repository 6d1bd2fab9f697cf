use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// A badge a user has unlocked. Awarded at most once per (user, badge)
/// and never removed.
#[derive(Clone, Debug, FromRow, Serialize, Deserialize)]
pub struct EarnedBadge {
    pub user_id: Uuid,
    pub badge_id: String,
    pub earned_at: DateTime<Utc>,
}
