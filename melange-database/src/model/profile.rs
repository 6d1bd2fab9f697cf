use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Display profile for a user. `created_at` doubles as the account age
/// source for fallback stats when the stats row is unreachable.
#[derive(Clone, Debug, FromRow, Serialize, Deserialize)]
pub struct UserProfile {
    pub user_id: Uuid,
    pub username: String,
    pub display_name: Option<String>,
    pub language: String,
    pub role: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
