//! Keyed timer registry.
//!
//! Every delayed or periodic callback in the engine is scheduled here under a
//! key naming its logical purpose (`carousel:header:advance`,
//! `popup:autohide`). Scheduling under a key that already has a timer cancels
//! the old one first, so at most one callback is ever pending per key.

use std::{
    collections::HashMap,
    sync::{
        Arc,
        atomic::{AtomicU64, Ordering},
    },
    time::Duration,
};

use parking_lot::Mutex;
use tokio::time::{self, MissedTickBehavior};
use tokio_util::sync::CancellationToken;
use tracing::{trace, warn};

use crate::Result;

/// Shortest period accepted for an interval; `tokio::time::interval` rejects zero.
const MIN_PERIOD: Duration = Duration::from_millis(1);

/// Whether a timer fires once or repeatedly.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerKind {
    /// Fire every `delay`, first after `delay`.
    Interval,
    /// Fire once after `delay`.
    Timeout,
}

struct TimerEntry {
    token: CancellationToken,
    generation: u64,
}

/// Registry of keyed timers backed by the tokio clock.
///
/// Cloning is cheap; clones share the same registry.
#[derive(Clone, Default)]
pub struct TimerRegistry {
    entries: Arc<Mutex<HashMap<String, TimerEntry>>>,
    generations: Arc<AtomicU64>,
}

impl TimerRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Start or replace the timer for `key`.
    ///
    /// The callback's errors are logged and confined to the tick that
    /// produced them; an interval keeps ticking.
    pub fn schedule<F>(&self, key: impl Into<String>, kind: TimerKind, delay: Duration, callback: F)
    where
        F: FnMut() -> Result<()> + Send + 'static,
    {
        let period = match kind {
            TimerKind::Interval => Some(delay),
            TimerKind::Timeout => None,
        };
        self.spawn(key.into(), delay, period, callback);
    }

    /// Start or replace an interval for `key` whose first tick waits `initial`.
    pub fn schedule_repeating<F>(
        &self,
        key: impl Into<String>,
        initial: Duration,
        period: Duration,
        callback: F,
    ) where
        F: FnMut() -> Result<()> + Send + 'static,
    {
        self.spawn(key.into(), initial, Some(period), callback);
    }

    fn spawn<F>(&self, key: String, initial: Duration, period: Option<Duration>, mut callback: F)
    where
        F: FnMut() -> Result<()> + Send + 'static,
    {
        let token = CancellationToken::new();
        let cancel = token.clone();
        let generation = self.generations.fetch_add(1, Ordering::Relaxed);

        // Register before spawning so a zero delay cannot race the insert.
        {
            let mut map = self.entries.lock();
            if let Some(old) = map.insert(key.clone(), TimerEntry { token, generation }) {
                old.token.cancel();
                trace!(timer = %key, "timer_replace");
            }
        }

        let entries = self.entries.clone();
        let fut = async move {
            trace!(
                timer = %key,
                init_ms = initial.as_millis() as u64,
                period_ms = ?period.map(|p| p.as_millis()),
                "timer_start"
            );

            tokio::select! {
                biased;
                _ = cancel.cancelled() => {
                    trace!(timer = %key, "timer_cancelled_initial");
                    return;
                }
                _ = time::sleep(initial) => {}
            }

            let Some(period) = period else {
                // One-shot: retire the entry (unless replaced) before running so
                // the callback may schedule the same key again.
                let ours = {
                    let mut map = entries.lock();
                    match map.get(&key) {
                        Some(e) if e.generation == generation => {
                            map.remove(&key);
                            true
                        }
                        _ => false,
                    }
                };
                if ours && !cancel.is_cancelled() {
                    run_tick(&key, &mut callback);
                }
                return;
            };

            let mut ticker = time::interval(period.max(MIN_PERIOD));
            ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
            loop {
                tokio::select! {
                    biased;
                    _ = cancel.cancelled() => {
                        trace!(timer = %key, "timer_cancelled");
                        return;
                    }
                    _ = ticker.tick() => {
                        run_tick(&key, &mut callback);
                    }
                }
            }
        };
        tokio::spawn(fut);
    }

    /// Cancel and forget the timer for `key`, if any.
    pub fn cancel(&self, key: &str) {
        if let Some(entry) = self.entries.lock().remove(key) {
            entry.token.cancel();
            trace!(timer = %key, "timer_cancel");
        }
    }

    /// Cancel every timer (page teardown).
    pub fn cancel_all(&self) {
        let drained: Vec<(String, TimerEntry)> = self.entries.lock().drain().collect();
        for (_, entry) in &drained {
            entry.token.cancel();
        }
        trace!(count = drained.len(), "timer_cancel_all");
    }

    /// Check if a timer is pending for `key`.
    pub fn is_active(&self, key: &str) -> bool {
        self.entries.lock().contains_key(key)
    }

    /// Number of pending timers.
    pub fn pending(&self) -> usize {
        self.entries.lock().len()
    }
}

fn run_tick<F>(key: &str, callback: &mut F)
where
    F: FnMut() -> Result<()>,
{
    if let Err(e) = callback() {
        warn!(timer = %key, error = %e, "timer_callback_failed");
    }
}
