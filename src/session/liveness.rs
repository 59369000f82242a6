//! Recurring server liveness probe
//!
//! Pings the server, records the outcome, waits a fixed interval and starts
//! over, regardless of whether the last ping succeeded. The loop runs on its
//! own task behind a handle that stops it on [`LivenessProbe::stop`] or drop.

use crate::api::AetherApi;
use chrono::{DateTime, Utc};
use log::{debug, info};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{oneshot, watch};
use tokio::task::JoinHandle;

/// Delay between the end of one probe and the start of the next
pub const DEFAULT_LIVENESS_INTERVAL: Duration = Duration::from_secs(5);

/// Latest outcome of the probe loop
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LivenessStatus {
    /// Whether the last ping succeeded
    pub online: bool,
    /// Completed pings since the probe was created
    pub probes: u64,
    pub last_checked: Option<DateTime<Utc>>,
}

/// One ping collapsed to a success/failure signal
pub async fn ping_alive(api: &dyn AetherApi) -> bool {
    match api.ping().await {
        Ok(()) => true,
        Err(e) => {
            debug!("Liveness check failed: {}", e);
            false
        }
    }
}

pub struct LivenessProbe {
    interval: Duration,
    status_tx: Arc<watch::Sender<LivenessStatus>>,
    stop_tx: Option<oneshot::Sender<()>>,
    handle: Option<JoinHandle<()>>,
}

impl LivenessProbe {
    pub fn new(interval: Duration) -> Self {
        let (status_tx, _) = watch::channel(LivenessStatus::default());
        Self {
            interval,
            status_tx: Arc::new(status_tx),
            stop_tx: None,
            handle: None,
        }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Start the probe loop.
    ///
    /// Returns `false` without spawning anything when a loop is already
    /// running, so re-initialising a screen never doubles the polling.
    pub fn start(&mut self, api: Arc<dyn AetherApi>) -> bool {
        if self.is_running() {
            debug!("Liveness probe already running, ignoring start");
            return false;
        }

        let (stop_tx, stop_rx) = oneshot::channel();
        let handle = tokio::spawn(Self::run(api, self.interval, self.status_tx.clone(), stop_rx));

        self.stop_tx = Some(stop_tx);
        self.handle = Some(handle);
        info!("Liveness probe started ({}s interval)", self.interval.as_secs_f32());
        true
    }

    pub fn is_running(&self) -> bool {
        self.handle.as_ref().is_some_and(|handle| !handle.is_finished())
    }

    pub fn stop(&mut self) {
        if let Some(stop_tx) = self.stop_tx.take() {
            let _ = stop_tx.send(());
        }

        if let Some(handle) = self.handle.take() {
            // A ping may be in flight; don't wait for it
            handle.abort();
            info!("Liveness probe stopped");
        }
    }

    pub fn status(&self) -> LivenessStatus {
        *self.status_tx.borrow()
    }

    pub fn is_online(&self) -> bool {
        self.status().online
    }

    /// Receive every status change
    pub fn subscribe(&self) -> watch::Receiver<LivenessStatus> {
        self.status_tx.subscribe()
    }

    async fn run(
        api: Arc<dyn AetherApi>,
        interval: Duration,
        status_tx: Arc<watch::Sender<LivenessStatus>>,
        mut stop_rx: oneshot::Receiver<()>,
    ) {
        loop {
            let online = ping_alive(api.as_ref()).await;

            status_tx.send_modify(|status| {
                if status.online != online {
                    info!("Server is now {}", if online { "online" } else { "offline" });
                }
                status.online = online;
                status.probes += 1;
                status.last_checked = Some(Utc::now());
            });

            tokio::select! {
                _ = tokio::time::sleep(interval) => {},
                _ = &mut stop_rx => break,
            }
        }
    }
}

impl Default for LivenessProbe {
    fn default() -> Self {
        Self::new(DEFAULT_LIVENESS_INTERVAL)
    }
}

impl Drop for LivenessProbe {
    fn drop(&mut self) {
        self.stop();
    }
}
