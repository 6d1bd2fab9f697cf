use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// One logged user activity, kept as an append-only audit trail for the
/// point bookkeeping.
#[derive(Clone, Debug, FromRow, Serialize, Deserialize)]
pub struct ActivityRow {
    pub id: i64,
    pub user_id: Uuid,
    pub kind: String,
    pub payload: Option<serde_json::Value>,
    pub created_at: DateTime<Utc>,
}
