//! Process-wide cached `Date` header
//!
//! One background thread rewrites the value once per period; request
//! handlers only ever read it. The value lives behind an [`ArcSwap`], so a
//! reader sees either the previous or the new date and never waits on the
//! writer.

use crate::{Error, Result};
use arc_swap::ArcSwap;
use http::HeaderValue;
use std::sync::Arc;
use std::thread::JoinHandle;
use std::time::{Duration, SystemTime};
use tokio::sync::oneshot;
use tokio::time::MissedTickBehavior;

/// Refresh period used by the server
pub const DEFAULT_INTERVAL: Duration = Duration::from_millis(1000);

/// Cached RFC 1123 date, e.g. `Tue, 02 Jan 2024 15:04:05 GMT`
#[derive(Debug)]
pub struct HttpClock {
    current: ArcSwap<HeaderValue>,
}

impl HttpClock {
    /// Create a clock holding the current wall-clock time
    pub fn new() -> Result<Self> {
        Ok(Self {
            current: ArcSwap::from_pointee(render(SystemTime::now())?),
        })
    }

    /// Last published date
    #[inline]
    pub fn current(&self) -> HeaderValue {
        HeaderValue::clone(&self.current.load())
    }

    /// Format `at` and swap it in as the published date
    pub fn publish_at(&self, at: SystemTime) -> Result<()> {
        self.current.store(Arc::new(render(at)?));
        Ok(())
    }

    fn refresh(&self) {
        match self.publish_at(SystemTime::now()) {
            Ok(()) => tracing::trace!(date = ?self.current(), "date header refreshed"),
            Err(e) => tracing::warn!("keeping previous date header: {}", e),
        }
    }

    /// Start the single writer, ticking every `period`
    ///
    /// The writer runs on its own thread with its own current-thread
    /// runtime, so a saturated request pool cannot hold back a refresh.
    pub fn spawn_updater(self: &Arc<Self>, period: Duration) -> Result<ClockUpdater> {
        let clock = Arc::clone(self);
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_time()
            .build()?;
        let (stop_tx, mut stop_rx) = oneshot::channel::<()>();

        let thread = std::thread::Builder::new()
            .name("hello-clock".to_string())
            .spawn(move || {
                runtime.block_on(async move {
                    let mut ticker = tokio::time::interval(period);
                    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
                    loop {
                        tokio::select! {
                            // Fires on stop() and when the handle is dropped
                            _ = &mut stop_rx => break,
                            _ = ticker.tick() => clock.refresh(),
                        }
                    }
                });
            })?;

        Ok(ClockUpdater {
            stop: Some(stop_tx),
            thread: Some(thread),
        })
    }
}

fn render(at: SystemTime) -> Result<HeaderValue> {
    HeaderValue::from_str(&httpdate::fmt_http_date(at))
        .map_err(|e| Error::InvalidHeader(e.to_string()))
}

/// Handle to the running updater thread; dropping it stops the thread
#[derive(Debug)]
pub struct ClockUpdater {
    stop: Option<oneshot::Sender<()>>,
    thread: Option<JoinHandle<()>>,
}

impl ClockUpdater {
    /// Stop the updater and wait for its thread to exit
    pub fn stop(mut self) {
        if let Some(tx) = self.stop.take() {
            let _ = tx.send(());
        }
        if let Some(thread) = self.thread.take() {
            if thread.join().is_err() {
                tracing::warn!("date updater thread panicked");
            }
        }
    }
}

impl Drop for ClockUpdater {
    fn drop(&mut self) {
        if let Some(tx) = self.stop.take() {
            let _ = tx.send(());
        }
    }
}
