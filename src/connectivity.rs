//! Connectivity monitor: single source of truth for reachability.
//!
//! The monitor is an explicitly-owned service injected into the sync engine
//! (and anything else that cares) rather than ambient global state, which
//! keeps transitions deterministic in tests. It is purely event-driven: the
//! platform's online/offline signals are pushed in via [`ConnectivityMonitor::set_online`],
//! never polled for.

use std::time::Duration;
use tokio::sync::watch;

/// Timeout for the startup reachability probe.
const PROBE_TIMEOUT: Duration = Duration::from_secs(5);

/// Tracks online/offline state and notifies subscribers on every transition.
///
/// Backed by a `tokio::sync::watch` channel: `set_online` wakes every
/// subscriber on every call, so redundant transitions fired by the platform
/// propagate as-is (no de-duplication beyond what the platform guarantees).
/// Cloning shares the underlying channel.
#[derive(Debug, Clone)]
pub struct ConnectivityMonitor {
    tx: watch::Sender<bool>,
}

impl ConnectivityMonitor {
    /// Create a monitor seeded from the platform's reported status.
    pub fn new(initially_online: bool) -> Self {
        let (tx, _rx) = watch::channel(initially_online);
        Self { tx }
    }

    /// Current state, readable synchronously.
    pub fn is_online(&self) -> bool {
        *self.tx.borrow()
    }

    /// Record a platform online/offline signal and notify subscribers.
    pub fn set_online(&self, online: bool) {
        let previous = self.tx.send_replace(online);
        if previous != online {
            tracing::info!(online, "Connectivity changed");
        } else {
            tracing::debug!(online, "Redundant connectivity signal");
        }
    }

    /// Subscribe to state transitions. The receiver observes the current
    /// value immediately and wakes on every subsequent `set_online`.
    pub fn subscribe(&self) -> watch::Receiver<bool> {
        self.tx.subscribe()
    }
}

/// Best-effort startup probe of the platform's current network status.
///
/// Any response at all — even an error status — proves the network path is
/// up; only a transport-level failure or timeout counts as offline.
pub async fn probe(client: &reqwest::Client, url: &str) -> bool {
    let request = client.head(url);
    match tokio::time::timeout(PROBE_TIMEOUT, request.send()).await {
        Ok(Ok(_)) => true,
        Ok(Err(e)) => {
            tracing::debug!(error = %e, url, "Connectivity probe failed");
            false
        }
        Err(_) => {
            tracing::debug!(url, "Connectivity probe timed out");
            false
        }
    }
}
