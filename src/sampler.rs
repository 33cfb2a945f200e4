// Background rate sampler.
// One task owns the baseline and is the only writer of the published snapshot; readers
// borrow the latest value from a watch channel at their own cadence.

use crate::error::SamplerError;
use crate::interface_repo::InterfaceSource;
use crate::models::{InterfaceHandle, RateSnapshot};
use crate::rate::{Observation, RateTracker};
use crate::selector::{is_still_active, select_active_interface};
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::sync::{oneshot, watch};
use tokio::task::JoinHandle;
use tokio::time::{Duration, Instant};
use tracing::{Instrument, debug, info, warn};

/// Wait used when no interface qualifies or a read failed, independent of the update interval.
pub const DEFAULT_FALLBACK_INTERVAL_MS: u64 = 1000;

/// How long `stop()` waits for the loop to exit before detaching it.
pub const DEFAULT_STOP_TIMEOUT_MS: u64 = 100;

pub const DEFAULT_UPDATE_INTERVAL_MS: u64 = 1000;

/// Rate limit for repeated "no interface" messages while offline.
const NO_INTERFACE_LOG_INTERVAL: Duration = Duration::from_secs(60);

/// Sampler timing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SamplerConfig {
    pub update_interval_ms: u64,
    pub fallback_interval_ms: u64,
    pub stop_timeout_ms: u64,
}

impl Default for SamplerConfig {
    fn default() -> Self {
        Self {
            update_interval_ms: DEFAULT_UPDATE_INTERVAL_MS,
            fallback_interval_ms: DEFAULT_FALLBACK_INTERVAL_MS,
            stop_timeout_ms: DEFAULT_STOP_TIMEOUT_MS,
        }
    }
}

struct Running {
    shutdown_tx: oneshot::Sender<()>,
    handle: JoinHandle<()>,
}

/// Samples the active interface's byte counters and publishes download/upload rates.
///
/// Lifecycle is `Stopped -> Running -> Stopped`; both `start()` and `stop()` are
/// idempotent, and a restart re-primes from scratch. The last published snapshot
/// survives a stop.
pub struct RateSampler<S: InterfaceSource> {
    source: Arc<S>,
    update_interval_ms: Arc<AtomicU64>,
    fallback_interval: Duration,
    stop_timeout: Duration,
    tx: Arc<watch::Sender<RateSnapshot>>,
    /// Bumped on every start and stop; a loop only publishes while it matches.
    generation: Arc<AtomicU64>,
    running: Option<Running>,
}

impl<S: InterfaceSource> RateSampler<S> {
    pub fn new(source: Arc<S>, config: SamplerConfig) -> Result<Self, SamplerError> {
        if config.update_interval_ms == 0 || config.fallback_interval_ms == 0 {
            return Err(SamplerError::InvalidInterval);
        }
        let (tx, _) = watch::channel(RateSnapshot::default());
        Ok(Self {
            source,
            update_interval_ms: Arc::new(AtomicU64::new(config.update_interval_ms)),
            fallback_interval: Duration::from_millis(config.fallback_interval_ms),
            stop_timeout: Duration::from_millis(config.stop_timeout_ms),
            tx: Arc::new(tx),
            generation: Arc::new(AtomicU64::new(0)),
            running: None,
        })
    }

    pub fn is_running(&self) -> bool {
        self.running
            .as_ref()
            .is_some_and(|r| !r.handle.is_finished())
    }

    /// Select an interface, prime the baseline, and spawn the sampling loop.
    /// No-op when already running. Finding no interface is not an error: the loop
    /// keeps retrying selection.
    pub async fn start(&mut self) {
        if self.is_running() {
            debug!("sampler already running");
            return;
        }
        self.running = None;
        let run_generation = self.advance_generation();

        let mut state = LoopState {
            source: self.source.clone(),
            tracker: RateTracker::new(),
            selected: None,
            update_interval_ms: self.update_interval_ms.clone(),
            fallback_interval: self.fallback_interval,
            tx: self.tx.clone(),
            generation: self.generation.clone(),
            run_generation,
            last_no_interface_log: None,
        };
        let primed = state.select_and_prime().await;

        let (shutdown_tx, shutdown_rx) = oneshot::channel();
        let span = tracing::info_span!(
            "sampler",
            update_interval_ms = self.update_interval_ms.load(Ordering::Relaxed)
        );
        let handle = tokio::spawn(state.run(shutdown_rx, primed).instrument(span));
        self.running = Some(Running {
            shutdown_tx,
            handle,
        });
    }

    /// Signal cancellation and wait up to the stop timeout for the loop to exit.
    /// A loop that does not exit in time is detached, not aborted. A detached loop can
    /// finish its in-flight read, but it is superseded here and never publishes again,
    /// so an immediate `start()` has the snapshot cell to itself.
    pub async fn stop(&mut self) {
        let Some(Running {
            shutdown_tx,
            handle,
        }) = self.running.take()
        else {
            return;
        };
        let _ = shutdown_tx.send(());
        self.advance_generation();
        match tokio::time::timeout(self.stop_timeout, handle).await {
            Ok(Ok(())) => debug!("sampler stopped"),
            Ok(Err(e)) => warn!(error = %e, operation = "stop", "sampler task failed"),
            Err(_) => warn!(
                timeout_ms = self.stop_timeout.as_millis() as u64,
                operation = "stop",
                "sampler did not exit in time; detaching"
            ),
        }
    }

    /// New generation number. Bumped under the watch write lock, so once this returns
    /// no loop from an earlier generation can still be mid-publish.
    fn advance_generation(&self) -> u64 {
        let mut next = 0;
        self.tx.send_if_modified(|_| {
            next = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
            false
        });
        next
    }

    pub fn update_interval_ms(&self) -> u64 {
        self.update_interval_ms.load(Ordering::Relaxed)
    }

    /// Takes effect from the next sleep; a sleep already in progress is not shortened.
    pub fn set_update_interval_ms(&self, ms: u64) -> Result<(), SamplerError> {
        if ms == 0 {
            return Err(SamplerError::InvalidInterval);
        }
        self.update_interval_ms.store(ms, Ordering::Relaxed);
        Ok(())
    }

    /// Latest fully published snapshot.
    pub fn latest(&self) -> RateSnapshot {
        *self.tx.borrow()
    }

    /// Receiver marked changed once per publish. Consumers should re-render on their
    /// own timer instead of doing work inside the notification.
    pub fn subscribe(&self) -> watch::Receiver<RateSnapshot> {
        self.tx.subscribe()
    }

    pub fn download_mbytes_per_sec(&self) -> f64 {
        self.latest().download_mbytes_per_sec()
    }

    pub fn upload_mbytes_per_sec(&self) -> f64 {
        self.latest().upload_mbytes_per_sec()
    }

    pub fn download_mbits_per_sec(&self) -> f64 {
        self.latest().download_mbits_per_sec()
    }

    pub fn upload_mbits_per_sec(&self) -> f64 {
        self.latest().upload_mbits_per_sec()
    }
}

impl<S: InterfaceSource> Drop for RateSampler<S> {
    fn drop(&mut self) {
        if let Some(running) = self.running.take() {
            let _ = running.shutdown_tx.send(());
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TickOutcome {
    Published,
    /// Baseline (re)primed without a publish: new interface or clock anomaly.
    Reprimed,
    /// Nothing to sample this tick.
    Unavailable,
    /// A newer start or a stop took over the snapshot cell.
    Superseded,
}

/// State private to the loop task.
struct LoopState<S: InterfaceSource> {
    source: Arc<S>,
    tracker: RateTracker,
    selected: Option<InterfaceHandle>,
    update_interval_ms: Arc<AtomicU64>,
    fallback_interval: Duration,
    tx: Arc<watch::Sender<RateSnapshot>>,
    generation: Arc<AtomicU64>,
    run_generation: u64,
    last_no_interface_log: Option<Instant>,
}

impl<S: InterfaceSource> LoopState<S> {
    async fn run(mut self, mut shutdown_rx: oneshot::Receiver<()>, primed: bool) {
        // A freshly primed baseline needs one full interval before the first rate.
        let mut wait = if primed {
            self.update_interval()
        } else {
            Duration::ZERO
        };

        loop {
            if !wait.is_zero() {
                tokio::select! {
                    _ = tokio::time::sleep(wait) => {}
                    _ = &mut shutdown_rx => break,
                }
            }
            if shutdown_requested(&mut shutdown_rx) {
                break;
            }
            wait = match self.tick().await {
                TickOutcome::Published | TickOutcome::Reprimed => self.update_interval(),
                TickOutcome::Unavailable => self.fallback_interval,
                TickOutcome::Superseded => {
                    debug!("sampler loop superseded");
                    break;
                }
            };
        }
        debug!("sampler loop shutting down");
    }

    fn update_interval(&self) -> Duration {
        Duration::from_millis(self.update_interval_ms.load(Ordering::Relaxed).max(1))
    }

    async fn tick(&mut self) -> TickOutcome {
        if let Some(handle) = &self.selected
            && !is_still_active(self.source.as_ref(), handle).await
        {
            warn!(interface = %handle.name, "interface no longer up; reselecting");
            self.selected = None;
        }

        let Some(handle) = self.selected.clone() else {
            return if self.select_and_prime().await {
                TickOutcome::Reprimed
            } else {
                TickOutcome::Unavailable
            };
        };

        let counters = match self.source.read_counters(&handle.name).await {
            Ok(c) => c,
            Err(e) => {
                // Baseline stays as it was; reselection re-primes before the next rate.
                warn!(
                    error = %e,
                    interface = %handle.name,
                    operation = "read_counters",
                    "counter read failed"
                );
                self.selected = None;
                return TickOutcome::Unavailable;
            }
        };

        match self.tracker.observe(counters, Instant::now()) {
            Observation::Rate(snapshot) => {
                let generation = &self.generation;
                let run_generation = self.run_generation;
                let published = self.tx.send_if_modified(|current| {
                    if generation.load(Ordering::SeqCst) != run_generation {
                        return false;
                    }
                    *current = snapshot;
                    true
                });
                if published {
                    TickOutcome::Published
                } else {
                    TickOutcome::Superseded
                }
            }
            Observation::ClockAnomaly => {
                debug!(interface = %handle.name, "non-positive elapsed time; re-primed");
                TickOutcome::Reprimed
            }
            Observation::Primed => TickOutcome::Reprimed,
        }
    }

    /// Pick an interface and take a fresh baseline from it. Any previous baseline is
    /// discarded so no delta ever spans two interfaces or a read failure.
    async fn select_and_prime(&mut self) -> bool {
        self.tracker.reset();
        self.selected = None;

        let Some(handle) = select_active_interface(self.source.as_ref()).await else {
            self.log_no_interface();
            return false;
        };
        match self.source.read_counters(&handle.name).await {
            Ok(counters) => {
                self.tracker.prime(counters, Instant::now());
                info!(
                    interface = %handle.name,
                    kind = ?handle.kind,
                    "sampling interface"
                );
                self.selected = Some(handle);
                self.last_no_interface_log = None;
                true
            }
            Err(e) => {
                warn!(
                    error = %e,
                    interface = %handle.name,
                    operation = "prime_baseline",
                    "counter read failed"
                );
                false
            }
        }
    }

    fn log_no_interface(&mut self) {
        let should_info = self
            .last_no_interface_log
            .is_none_or(|t| t.elapsed() >= NO_INTERFACE_LOG_INTERVAL);
        if should_info {
            info!("no active network interface found; retrying");
            self.last_no_interface_log = Some(Instant::now());
        } else {
            debug!("still no active network interface");
        }
    }
}

fn shutdown_requested(shutdown_rx: &mut oneshot::Receiver<()>) -> bool {
    !matches!(
        shutdown_rx.try_recv(),
        Err(oneshot::error::TryRecvError::Empty)
    )
}
