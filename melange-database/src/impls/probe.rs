use crate::database::Database;

/// Lightweight reachability check used by the connection monitor.
pub async fn ping(db: &Database) -> anyhow::Result<()> {
    sqlx::query("SELECT 1").execute(db.pool()).await?;
    Ok(())
}
