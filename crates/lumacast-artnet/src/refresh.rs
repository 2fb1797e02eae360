//! Self-clocked refresh worker
//!
//! The worker runs at the configured refresh rate, independent of the video frame
//! rate. Each tick it takes the latest frame from a [`FrameInbox`] and runs one
//! output pass. Sleeping is drift compensated: the sleep is shortened by however
//! long has passed since the previous tick, so a slow pass is not compounded by a
//! full sleep afterwards.
//!
//! Shutdown is cooperative. The abort flag is checked once per iteration and a
//! pending sleep is never interrupted, so stopping takes at most one period plus
//! one pass.

use std::panic::{self, AssertUnwindSafe};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use tracing::{error, info, warn};

use crate::error::Result;
use crate::inbox::FrameInbox;

/// Lifecycle of a [`RefreshLoop`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopState {
    Idle,
    Running,
    Stopping,
    Stopped,
}

/// Dedicated worker thread that ticks at a fixed rate
pub struct RefreshLoop {
    period: Duration,
    state: LoopState,
    abort: Arc<AtomicBool>,
    worker: Option<JoinHandle<()>>,
}

impl RefreshLoop {
    /// `refresh_rate` is in Hz; zero is treated as 1.
    pub fn new(refresh_rate: u32) -> Self {
        Self {
            period: Duration::from_secs(1) / refresh_rate.max(1),
            state: LoopState::Idle,
            abort: Arc::new(AtomicBool::new(false)),
            worker: None,
        }
    }

    /// Target interval between ticks
    pub fn period(&self) -> Duration {
        self.period
    }

    pub fn state(&self) -> LoopState {
        self.state
    }

    /// Spawn the worker.
    ///
    /// `pass` runs once per tick with the latest frame. Ticks before the first
    /// delivery are skipped. Errors and panics from `pass` are logged and the
    /// loop carries on. Calling `start` on a loop that is not idle does nothing.
    pub fn start<T, F>(&mut self, inbox: Arc<FrameInbox<T>>, mut pass: F) -> Result<()>
    where
        T: Clone + Send + 'static,
        F: FnMut(&T) -> Result<()> + Send + 'static,
    {
        if self.state != LoopState::Idle {
            warn!("Refresh loop already started ({:?})", self.state);
            return Ok(());
        }

        let abort = self.abort.clone();
        let period = self.period;

        let worker = thread::Builder::new()
            .name("artnet-refresh".to_string())
            .spawn(move || {
                info!("Refresh loop started ({:?} period)", period);
                let mut last_tick = Instant::now();

                while !abort.load(Ordering::Acquire) {
                    let elapsed = last_tick.elapsed();
                    if elapsed < period {
                        thread::sleep(period - elapsed);
                    }
                    last_tick = Instant::now();

                    let Some(frame) = inbox.latest() else {
                        continue;
                    };

                    match panic::catch_unwind(AssertUnwindSafe(|| pass(&frame))) {
                        Ok(Ok(())) => {}
                        Ok(Err(e)) => error!("Refresh pass failed: {}", e),
                        Err(payload) => {
                            error!("Refresh pass panicked: {}", panic_message(payload.as_ref()))
                        }
                    }
                }

                info!("Refresh loop stopped");
            })?;

        self.worker = Some(worker);
        self.state = LoopState::Running;
        Ok(())
    }

    /// Signal the worker and block until it has exited.
    pub fn stop(&mut self) {
        let Some(worker) = self.worker.take() else {
            return;
        };

        self.state = LoopState::Stopping;
        self.abort.store(true, Ordering::Release);

        if worker.join().is_err() {
            error!("Refresh worker terminated abnormally");
        }
        self.state = LoopState::Stopped;
    }
}

impl Drop for RefreshLoop {
    fn drop(&mut self) {
        self.stop();
    }
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> &str {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.as_str()
    } else {
        "unknown panic"
    }
}
