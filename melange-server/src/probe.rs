use async_trait::async_trait;

use melange_connection::ConnectivityProbe;
use melange_database::{Database, impls};

/// Connectivity probe backed by the real PostgreSQL pool.
pub struct PgProbe {
    db: Database,
}

impl PgProbe {
    pub fn new(db: Database) -> Self {
        Self { db }
    }
}

#[async_trait]
impl ConnectivityProbe for PgProbe {
    async fn probe(&self) -> anyhow::Result<()> {
        impls::probe::ping(&self.db).await
    }
}
