use async_trait::async_trait;

use crate::status::ConnectionReason;

/// A cheap read-only reachability check against the backing store.
///
/// Production code probes PostgreSQL with a `SELECT 1`; tests drive the
/// monitor with scripted implementations.
#[async_trait]
pub trait ConnectivityProbe: Send + Sync {
    async fn probe(&self) -> anyhow::Result<()>;
}

/// Map a probe failure onto a connection reason by inspecting the error
/// chain. Keyword matching mirrors what the error sources actually emit;
/// anything unrecognized stays `Unknown`.
pub fn classify_probe_error(error: &anyhow::Error) -> ConnectionReason {
    let message = format!("{error:#}").to_ascii_lowercase();

    if message.contains("timed out") || message.contains("timeout") {
        ConnectionReason::Timeout
    } else if message.contains("network")
        || message.contains("connection refused")
        || message.contains("connection reset")
        || message.contains("dns")
    {
        ConnectionReason::Network
    } else if message.contains("auth") || message.contains("password") || message.contains("token")
    {
        ConnectionReason::Auth
    } else if message.contains("database") || message.contains("pool") {
        ConnectionReason::Db
    } else {
        ConnectionReason::Unknown
    }
}

#[cfg(test)]
mod tests {
    use super::classify_probe_error;
    use crate::status::ConnectionReason;

    #[test]
    fn classifies_probe_errors() {
        let cases = [
            ("connection timed out", ConnectionReason::Timeout),
            ("statement timeout exceeded", ConnectionReason::Timeout),
            ("connection refused", ConnectionReason::Network),
            ("dns lookup failed", ConnectionReason::Network),
            ("password authentication failed", ConnectionReason::Auth),
            ("database \"melange\" does not exist", ConnectionReason::Db),
            ("pool closed", ConnectionReason::Db),
            ("something else entirely", ConnectionReason::Unknown),
        ];

        for (message, expected) in cases {
            let error = anyhow::anyhow!("{message}");
            assert_eq!(classify_probe_error(&error), expected, "{message}");
        }
    }

    #[test]
    fn classification_reads_the_whole_chain() {
        let error = anyhow::anyhow!("connection refused").context("probe failed");
        assert_eq!(classify_probe_error(&error), ConnectionReason::Network);
    }
}
