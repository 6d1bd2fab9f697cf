use std::sync::Arc;

use melange_connection::ConnectionMonitor;
use melange_database::Database;

pub type Error = anyhow::Error;

/// Shared state handed to every request handler. Built once at startup;
/// the monitor is `Arc`-shared with its background retry task.
#[derive(Clone)]
pub struct AppState {
    pub db: Database,
    pub monitor: Arc<ConnectionMonitor>,
}
