/// Bounded-retry connection monitor with observer fan-out.
pub mod monitor;
/// Connectivity probe seam.
pub mod probe;
/// Connection status and reason enums.
pub mod status;

pub use monitor::{ConnectionMonitor, DEFAULT_MAX_RETRY_ATTEMPTS, DEFAULT_RETRY_DELAY};
pub use probe::ConnectivityProbe;
pub use status::{ConnectionReason, ConnectionSnapshot, ConnectionStatus};
