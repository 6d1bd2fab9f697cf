use uuid::Uuid;

use crate::database::Database;
use crate::model::profile::UserProfile;

pub async fn get_profile(db: &Database, user_id: Uuid) -> anyhow::Result<Option<UserProfile>> {
    let row: Option<UserProfile> = sqlx::query_as(
        "SELECT user_id, username, display_name, language, role, created_at, updated_at \
         FROM user_profiles WHERE user_id = $1",
    )
    .bind(user_id)
    .fetch_optional(db.pool())
    .await?;

    Ok(row)
}

pub async fn upsert_profile(
    db: &Database,
    user_id: Uuid,
    username: &str,
    display_name: Option<&str>,
    language: &str,
) -> anyhow::Result<UserProfile> {
    let row: UserProfile = sqlx::query_as(
        "INSERT INTO user_profiles (user_id, username, display_name, language) \
         VALUES ($1, $2, $3, $4) \
         ON CONFLICT (user_id) DO UPDATE SET \
             username = EXCLUDED.username, \
             display_name = EXCLUDED.display_name, \
             language = EXCLUDED.language, \
             updated_at = NOW() \
         RETURNING user_id, username, display_name, language, role, created_at, updated_at",
    )
    .bind(user_id)
    .bind(username)
    .bind(display_name)
    .bind(language)
    .fetch_one(db.pool())
    .await?;

    Ok(row)
}
