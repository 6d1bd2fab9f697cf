use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use tracing::{info, warn};

use crate::probe::{ConnectivityProbe, classify_probe_error};
use crate::status::{ConnectionReason, ConnectionSnapshot, ConnectionStatus};

/// Delay between scheduled reconnect attempts.
pub const DEFAULT_RETRY_DELAY: Duration = Duration::from_secs(2);
/// Scheduled reconnect attempts before the monitor gives up and waits
/// for a manual `reconnect()`.
pub const DEFAULT_MAX_RETRY_ATTEMPTS: u32 = 3;

type Observer = Box<dyn Fn(ConnectionSnapshot) + Send + Sync>;

/// Tracks backend reachability and drives the bounded retry loop.
///
/// Explicitly constructed and shared via `Arc`; every instance is
/// independent, so tests can run several monitors side by side. Public
/// methods never fail: probe outcomes are surfaced as state.
pub struct ConnectionMonitor {
    probe: Arc<dyn ConnectivityProbe>,
    retry_delay: Duration,
    max_attempts: u32,
    state: Mutex<ConnectionSnapshot>,
    observers: Mutex<Vec<Observer>>,
    attempts: AtomicU32,
    retry_scheduled: AtomicBool,
}

impl ConnectionMonitor {
    pub fn new(
        probe: Arc<dyn ConnectivityProbe>,
        retry_delay: Duration,
        max_attempts: u32,
    ) -> Arc<Self> {
        Arc::new(Self {
            probe,
            retry_delay,
            max_attempts,
            state: Mutex::new(ConnectionSnapshot {
                status: ConnectionStatus::Initializing,
                reason: ConnectionReason::Initial,
            }),
            observers: Mutex::new(Vec::new()),
            attempts: AtomicU32::new(0),
            retry_scheduled: AtomicBool::new(false),
        })
    }

    pub fn with_defaults(probe: Arc<dyn ConnectivityProbe>) -> Arc<Self> {
        Self::new(probe, DEFAULT_RETRY_DELAY, DEFAULT_MAX_RETRY_ATTEMPTS)
    }

    /// Current status and reason.
    pub fn snapshot(&self) -> ConnectionSnapshot {
        *self.state.lock().expect("connection state lock poisoned")
    }

    /// Register an observer. It is invoked once immediately with the
    /// current state, then synchronously on every transition, in
    /// registration order.
    pub fn subscribe(&self, observer: impl Fn(ConnectionSnapshot) + Send + Sync + 'static) {
        // The initial emission runs before the list lock is taken, so an
        // observer may register further observers from inside it.
        let snapshot = self.snapshot();
        observer(snapshot);

        let mut observers = self.observers.lock().expect("observer list lock poisoned");
        observers.push(Box::new(observer));
    }

    /// First probe after startup: `initializing -> connected | error`.
    pub async fn initialize(self: &Arc<Self>) {
        self.transition(ConnectionStatus::Initializing, ConnectionReason::Initial);

        match self.probe.probe().await {
            Ok(()) => {
                self.attempts.store(0, Ordering::SeqCst);
                self.transition(ConnectionStatus::Connected, ConnectionReason::Initial);
                info!("backend connection established");
            }
            Err(error) => {
                let reason = classify_probe_error(&error);
                warn!(?error, reason = reason.as_str(), "initial connection failed");
                self.transition(ConnectionStatus::Error, reason);
                self.schedule_reconnect();
            }
        }
    }

    /// Single out-of-band probe. Returns whether the backend is
    /// reachable; failures become state, never errors.
    pub async fn check_connection(self: &Arc<Self>) -> bool {
        match self.probe.probe().await {
            Ok(()) => {
                self.attempts.store(0, Ordering::SeqCst);
                if self.snapshot().status != ConnectionStatus::Connected {
                    self.transition(ConnectionStatus::Connected, ConnectionReason::Initial);
                }
                true
            }
            Err(error) => {
                let reason = classify_probe_error(&error);
                warn!(?error, reason = reason.as_str(), "connection check failed");
                self.transition(ConnectionStatus::Disconnected, reason);
                self.schedule_reconnect();
                false
            }
        }
    }

    /// Manual reconnect. Resets the retry budget, so it revives a
    /// monitor that has given up on automatic retries.
    pub async fn reconnect(self: &Arc<Self>) -> ConnectionSnapshot {
        info!("manual reconnect requested");
        self.attempts.store(0, Ordering::SeqCst);
        self.probe_cycle().await;
        self.snapshot()
    }

    /// The embedding process saw a network-up signal: short-circuit to
    /// `reconnecting` and probe immediately.
    pub async fn notify_online(self: &Arc<Self>) {
        info!("network up signal received");
        self.transition(ConnectionStatus::Reconnecting, ConnectionReason::Network);
        self.attempts.store(0, Ordering::SeqCst);
        self.probe_cycle().await;
    }

    /// The embedding process saw a network-down signal: transition to
    /// `disconnected` without waiting for a scheduled probe.
    pub fn notify_offline(&self) {
        info!("network down signal received");
        self.transition(ConnectionStatus::Disconnected, ConnectionReason::Network);
    }

    /// One probe attempt plus the follow-up transition.
    async fn probe_cycle(self: &Arc<Self>) {
        match self.probe.probe().await {
            Ok(()) => {
                self.attempts.store(0, Ordering::SeqCst);
                self.transition(ConnectionStatus::Connected, ConnectionReason::Initial);
                info!("reconnected to backend");
            }
            Err(error) => {
                let reason = classify_probe_error(&error);
                warn!(?error, reason = reason.as_str(), "reconnect attempt failed");
                self.transition(ConnectionStatus::Disconnected, reason);
                self.schedule_reconnect();
            }
        }
    }

    /// Queue one delayed retry, unless one is already pending or the
    /// budget is exhausted.
    fn schedule_reconnect(self: &Arc<Self>) {
        if self.retry_scheduled.swap(true, Ordering::SeqCst) {
            return;
        }

        let used = self.attempts.load(Ordering::SeqCst);
        if used >= self.max_attempts {
            self.retry_scheduled.store(false, Ordering::SeqCst);
            warn!(
                max_attempts = self.max_attempts,
                "retry budget exhausted; waiting for manual reconnect"
            );
            return;
        }

        let attempt = self.attempts.fetch_add(1, Ordering::SeqCst) + 1;
        info!(
            attempt,
            max_attempts = self.max_attempts,
            delay_ms = self.retry_delay.as_millis() as u64,
            "scheduling reconnect"
        );
        self.transition(ConnectionStatus::Reconnecting, ConnectionReason::Network);

        let monitor = Arc::clone(self);
        tokio::spawn(async move {
            tokio::time::sleep(monitor.retry_delay).await;
            monitor.retry_scheduled.store(false, Ordering::SeqCst);
            monitor.probe_cycle().await;
        });
    }

    /// Update the state and notify every observer, in registration
    /// order, with the new snapshot.
    fn transition(&self, status: ConnectionStatus, reason: ConnectionReason) {
        let snapshot = ConnectionSnapshot { status, reason };
        *self.state.lock().expect("connection state lock poisoned") = snapshot;

        let observers = self.observers.lock().expect("observer list lock poisoned");
        for observer in observers.iter() {
            observer(snapshot);
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};
    use std::sync::{Arc, Mutex};
    use std::time::Duration;

    use async_trait::async_trait;

    use super::{ConnectionMonitor, DEFAULT_MAX_RETRY_ATTEMPTS, DEFAULT_RETRY_DELAY};
    use crate::probe::ConnectivityProbe;
    use crate::status::{ConnectionReason, ConnectionStatus};

    /// Probe that fails until `set_healthy(true)`, counting every call.
    struct ScriptedProbe {
        healthy: AtomicBool,
        calls: AtomicU32,
    }

    impl ScriptedProbe {
        fn new(healthy: bool) -> Arc<Self> {
            Arc::new(Self {
                healthy: AtomicBool::new(healthy),
                calls: AtomicU32::new(0),
            })
        }

        fn set_healthy(&self, healthy: bool) {
            self.healthy.store(healthy, Ordering::SeqCst);
        }

        fn calls(&self) -> u32 {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl ConnectivityProbe for ScriptedProbe {
        async fn probe(&self) -> anyhow::Result<()> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.healthy.load(Ordering::SeqCst) {
                Ok(())
            } else {
                Err(anyhow::anyhow!("connection refused"))
            }
        }
    }

    #[tokio::test(start_paused = true)]
    async fn healthy_probe_connects_on_initialize() {
        let probe = ScriptedProbe::new(true);
        let monitor = ConnectionMonitor::with_defaults(probe.clone());

        monitor.initialize().await;

        let snapshot = monitor.snapshot();
        assert_eq!(snapshot.status, ConnectionStatus::Connected);
        assert_eq!(snapshot.reason, ConnectionReason::Initial);
        assert_eq!(probe.calls(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn retry_budget_is_bounded_and_manual_reconnect_revives() {
        let probe = ScriptedProbe::new(false);
        let monitor = ConnectionMonitor::with_defaults(probe.clone());

        monitor.initialize().await;
        // The failed probe surfaced as error, then the scheduled retry
        // moved the state to reconnecting.
        assert_eq!(monitor.snapshot().status, ConnectionStatus::Reconnecting);
        assert_eq!(monitor.snapshot().reason, ConnectionReason::Network);

        // Let every scheduled retry fire.
        tokio::time::sleep(DEFAULT_RETRY_DELAY * 10).await;

        // Initial probe plus exactly max_attempts retries.
        assert_eq!(probe.calls(), 1 + DEFAULT_MAX_RETRY_ATTEMPTS);
        assert_eq!(monitor.snapshot().status, ConnectionStatus::Disconnected);

        // Given up: no further automatic probes.
        tokio::time::sleep(Duration::from_secs(60)).await;
        assert_eq!(probe.calls(), 1 + DEFAULT_MAX_RETRY_ATTEMPTS);

        probe.set_healthy(true);
        let snapshot = monitor.reconnect().await;
        assert_eq!(snapshot.status, ConnectionStatus::Connected);
        assert_eq!(probe.calls(), 2 + DEFAULT_MAX_RETRY_ATTEMPTS);
    }

    #[tokio::test(start_paused = true)]
    async fn success_resets_the_retry_counter() {
        let probe = ScriptedProbe::new(false);
        let monitor = ConnectionMonitor::with_defaults(probe.clone());

        monitor.initialize().await;
        // Sleep past the retry deadline and yield so the scheduled probe
        // has definitely fired before the health flip below.
        tokio::time::sleep(DEFAULT_RETRY_DELAY + Duration::from_millis(1)).await;
        tokio::task::yield_now().await;
        assert_eq!(probe.calls(), 2);

        probe.set_healthy(true);
        tokio::time::sleep(DEFAULT_RETRY_DELAY + Duration::from_millis(1)).await;
        tokio::task::yield_now().await;
        assert_eq!(monitor.snapshot().status, ConnectionStatus::Connected);

        // Counter reset: a fresh failure gets the full budget again.
        probe.set_healthy(false);
        assert!(!monitor.check_connection().await);
        tokio::time::sleep(DEFAULT_RETRY_DELAY * 10).await;
        assert_eq!(monitor.snapshot().status, ConnectionStatus::Disconnected);
        // init + failed retry + ok retry + check + 3 retries.
        assert_eq!(probe.calls(), 1 + 1 + 1 + 1 + 3);
    }

    #[tokio::test(start_paused = true)]
    async fn offline_signal_short_circuits_to_disconnected() {
        let probe = ScriptedProbe::new(true);
        let monitor = ConnectionMonitor::with_defaults(probe.clone());

        monitor.initialize().await;
        assert_eq!(monitor.snapshot().status, ConnectionStatus::Connected);

        monitor.notify_offline();
        let snapshot = monitor.snapshot();
        assert_eq!(snapshot.status, ConnectionStatus::Disconnected);
        assert_eq!(snapshot.reason, ConnectionReason::Network);
        // No probe was involved.
        assert_eq!(probe.calls(), 1);

        monitor.notify_online().await;
        assert_eq!(monitor.snapshot().status, ConnectionStatus::Connected);
        assert_eq!(probe.calls(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn observers_fire_in_registration_order() {
        let probe = ScriptedProbe::new(true);
        let monitor = ConnectionMonitor::with_defaults(probe);

        let seen: Arc<Mutex<Vec<String>>> = Arc::new(Mutex::new(Vec::new()));

        let log = seen.clone();
        monitor.subscribe(move |snapshot| {
            log.lock()
                .unwrap()
                .push(format!("first:{}", snapshot.status.as_str()));
        });
        let log = seen.clone();
        monitor.subscribe(move |snapshot| {
            log.lock()
                .unwrap()
                .push(format!("second:{}", snapshot.status.as_str()));
        });

        monitor.notify_offline();

        let seen = seen.lock().unwrap();
        assert_eq!(
            seen.as_slice(),
            [
                // Immediate emission at registration.
                "first:initializing",
                "second:initializing",
                // The offline transition, in registration order.
                "first:disconnected",
                "second:disconnected",
            ]
        );
    }

    #[tokio::test(start_paused = true)]
    async fn observer_can_subscribe_during_its_initial_emission() {
        let probe = ScriptedProbe::new(true);
        let monitor = ConnectionMonitor::with_defaults(probe);

        let seen: Arc<Mutex<Vec<String>>> = Arc::new(Mutex::new(Vec::new()));

        let log = seen.clone();
        let inner_log = seen.clone();
        let chained = monitor.clone();
        let registered = AtomicBool::new(false);
        monitor.subscribe(move |snapshot| {
            log.lock()
                .unwrap()
                .push(format!("outer:{}", snapshot.status.as_str()));
            // Register a second observer from inside the first one's
            // immediate emission; this must not deadlock.
            if !registered.swap(true, Ordering::SeqCst) {
                let log = inner_log.clone();
                chained.subscribe(move |snapshot| {
                    log.lock()
                        .unwrap()
                        .push(format!("inner:{}", snapshot.status.as_str()));
                });
            }
        });

        monitor.notify_offline();

        let seen = seen.lock().unwrap();
        assert_eq!(
            seen.as_slice(),
            [
                "outer:initializing",
                "inner:initializing",
                "outer:disconnected",
                "inner:disconnected",
            ]
        );
    }

    #[tokio::test(start_paused = true)]
    async fn check_connection_reports_reachability() {
        let probe = ScriptedProbe::new(false);
        let monitor = ConnectionMonitor::new(probe.clone(), DEFAULT_RETRY_DELAY, 0);

        assert!(!monitor.check_connection().await);
        assert_eq!(monitor.snapshot().status, ConnectionStatus::Disconnected);

        probe.set_healthy(true);
        assert!(monitor.check_connection().await);
        assert_eq!(monitor.snapshot().status, ConnectionStatus::Connected);
    }
}
