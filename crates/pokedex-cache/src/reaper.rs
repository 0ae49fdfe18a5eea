//! Background task that deletes expired cache entries.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Weak};
use std::time::Duration;

use tokio::runtime::Handle;
use tokio::time::{Instant, MissedTickBehavior, interval_at};
use tokio_util::sync::CancellationToken;
use tracing::{debug, error};

use crate::cache::Shared;

/// Name of the OS thread used when no Tokio runtime is available.
const REAPER_THREAD_NAME: &str = "pokedex-cache-reaper";

/// Handle to the reaper task. Dropping it cancels the task.
pub(crate) struct Reaper {
    token: CancellationToken,
    running: Arc<AtomicBool>,
}

impl Reaper {
    /// Start the reaper.
    ///
    /// Runs on the current Tokio runtime if there is one, otherwise on a
    /// dedicated thread with its own single-threaded runtime. Returns `None`
    /// if neither could be started.
    pub(crate) fn spawn(shared: Weak<Shared>, period: Duration) -> Option<Self> {
        let token = CancellationToken::new();
        let running = Arc::new(AtomicBool::new(true));
        let start = Instant::now() + period;
        let task = reap_loop(shared, start, period, token.clone(), Arc::clone(&running));

        match Handle::try_current() {
            Ok(handle) => {
                handle.spawn(task);
            }
            Err(_) => {
                let thread_running = Arc::clone(&running);
                let spawned = std::thread::Builder::new()
                    .name(REAPER_THREAD_NAME.to_string())
                    .spawn(move || {
                        match tokio::runtime::Builder::new_current_thread()
                            .enable_time()
                            .build()
                        {
                            Ok(runtime) => runtime.block_on(task),
                            Err(e) => {
                                thread_running.store(false, Ordering::Release);
                                error!(error = %e, "Failed to build reaper runtime, entries will not expire");
                            }
                        }
                    });

                if let Err(e) = spawned {
                    error!(error = %e, "Failed to start reaper thread, entries will not expire");
                    return None;
                }
            }
        }

        Some(Self { token, running })
    }

    /// Ask the task to stop at its next wake-up.
    pub(crate) fn cancel(&self) {
        self.token.cancel();
    }

    /// Whether the task is still running and has not been cancelled.
    pub(crate) fn is_running(&self) -> bool {
        !self.token.is_cancelled() && self.running.load(Ordering::Acquire)
    }

    /// The flag the task clears when it exits, for observing it after drop.
    #[cfg(test)]
    pub(crate) fn running_flag(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.running)
    }
}

impl Drop for Reaper {
    fn drop(&mut self) {
        self.token.cancel();
    }
}

/// Clears the running flag however the loop exits.
struct RunningGuard(Arc<AtomicBool>);

impl Drop for RunningGuard {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

/// Reap once per `period`, first at `start`.
async fn reap_loop(
    shared: Weak<Shared>,
    start: Instant,
    period: Duration,
    token: CancellationToken,
    running: Arc<AtomicBool>,
) {
    let _running = RunningGuard(running);

    let mut ticker = interval_at(start, period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    debug!(period_ms = period.as_millis() as u64, "Cache reaper started");

    loop {
        tokio::select! {
            _ = token.cancelled() => {
                debug!("Cache reaper cancelled");
                break;
            }
            tick = ticker.tick() => {
                let Some(shared) = shared.upgrade() else {
                    debug!("Cache dropped, stopping reaper");
                    break;
                };
                shared.reap(tick);
            }
        }
    }
}
