//! Polling loop: re-read chain state on an interval and on refresh triggers.
//!
//! The latest snapshot is published on a `watch` channel. Between reads the
//! lock countdown is re-derived on its own, slower tick so the display keeps
//! moving without extra RPC traffic.

use crate::config::ClientConfig;
use crate::reader::ChainReader;
use crate::refresh::RefreshSignal;
use crate::snapshot::Snapshot;
use serde::Serialize;
use sphygmos_types::{Address, Clock, RewardAccumulator};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use tokio::sync::watch;
use tokio::time::{interval, MissedTickBehavior};

/// Running counts for one poller.
#[derive(Debug, Default)]
pub struct PollerStats {
    polls: AtomicU64,
    failed_reads: AtomicU64,
    lock_ticks: AtomicU64,
    accumulator_regressions: AtomicU64,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct PollerStatsSnapshot {
    pub polls: u64,
    pub failed_reads: u64,
    pub lock_ticks: u64,
    pub accumulator_regressions: u64,
}

impl PollerStats {
    fn record_poll(&self, failed_reads: usize) {
        self.polls.fetch_add(1, Ordering::Relaxed);
        self.failed_reads.fetch_add(failed_reads as u64, Ordering::Relaxed);
    }

    fn record_accumulator_regression(&self) {
        self.accumulator_regressions.fetch_add(1, Ordering::Relaxed);
    }

    fn record_lock_tick(&self) {
        self.lock_ticks.fetch_add(1, Ordering::Relaxed);
    }

    pub fn snapshot(&self) -> PollerStatsSnapshot {
        PollerStatsSnapshot {
            polls: self.polls.load(Ordering::Relaxed),
            failed_reads: self.failed_reads.load(Ordering::Relaxed),
            lock_ticks: self.lock_ticks.load(Ordering::Relaxed),
            accumulator_regressions: self.accumulator_regressions.load(Ordering::Relaxed),
        }
    }
}

pub struct Poller<R, C> {
    reader: R,
    clock: C,
    config: ClientConfig,
    user: Option<Address>,
    refresh: RefreshSignal,
    publisher: watch::Sender<Option<Snapshot>>,
    /// Highest `accRewardPerUnit` read so far.
    accumulator: Mutex<Option<RewardAccumulator>>,
    stats: Arc<PollerStats>,
}

impl<R: ChainReader, C: Clock> Poller<R, C> {
    pub fn new(
        reader: R,
        clock: C,
        config: ClientConfig,
        user: Option<Address>,
        refresh: RefreshSignal,
    ) -> Self {
        let (publisher, _rx) = watch::channel(None);
        Self {
            reader,
            clock,
            config,
            user,
            refresh,
            publisher,
            accumulator: Mutex::new(None),
            stats: Arc::default(),
        }
    }

    pub fn subscribe(&self) -> watch::Receiver<Option<Snapshot>> {
        self.publisher.subscribe()
    }

    pub fn stats(&self) -> Arc<PollerStats> {
        Arc::clone(&self.stats)
    }

    pub fn reader(&self) -> &R {
        &self.reader
    }

    /// Switch wallets; takes effect on the next poll.
    pub fn set_user(&mut self, user: Option<Address>) {
        self.user = user;
    }

    /// Read once and publish the result.
    ///
    /// A regressed accumulator read is replaced by the last value seen.
    pub async fn poll_once(&self) -> Snapshot {
        let generation = self.refresh.generation();
        let now = self.clock.now();
        let mut snapshot =
            Snapshot::read(&self.reader, &self.config, self.user, generation, now).await;
        let regressed = {
            let mut last = self.accumulator.lock().unwrap_or_else(PoisonError::into_inner);
            snapshot.hold_accumulator(&mut *last, &self.config.params())
        };
        if regressed {
            self.stats.record_accumulator_regression();
        }
        self.stats.record_poll(snapshot.failed_reads.len());
        self.publisher.send_replace(Some(snapshot.clone()));
        snapshot
    }

    /// Re-derive the published snapshot at the current time.
    pub fn tick_lock(&self) {
        let now = self.clock.now();
        let params = self.config.params();
        self.publisher.send_modify(|latest| {
            if let Some(snapshot) = latest {
                snapshot.rederive(now, &params);
            }
        });
        self.stats.record_lock_tick();
    }

    /// Poll until `shutdown` becomes `true` (or its sender is dropped).
    pub async fn run(&self, mut shutdown: watch::Receiver<bool>) {
        let mut refresh_ticker = interval(self.config.refresh_interval());
        refresh_ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        let mut lock_ticker = interval(self.config.lock_tick());
        lock_ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        // The first tick of a tokio interval fires immediately; the first
        // poll covers it.
        lock_ticker.tick().await;

        let mut refresh_rx = self.refresh.subscribe();
        tracing::info!(
            interval_secs = self.config.refresh_interval_secs,
            user = ?self.user,
            "poller started"
        );

        loop {
            tokio::select! {
                _ = refresh_ticker.tick() => {}
                changed = refresh_rx.changed() => {
                    if changed.is_ok() {
                        let generation = *refresh_rx.borrow_and_update();
                        tracing::debug!(generation, "refresh requested");
                    }
                }
                _ = lock_ticker.tick() => {
                    self.tick_lock();
                    continue;
                }
                res = shutdown.changed() => {
                    if res.is_err() || *shutdown.borrow() {
                        break;
                    }
                    continue;
                }
            }
            if *shutdown.borrow() {
                break;
            }
            self.poll_once().await;
        }
        tracing::info!("poller stopped");
    }
}
