use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};

use tokio::sync::{Mutex, MutexGuard};

use crate::api::models::AggregateResponse;
use crate::error::{AppError, Result};

#[derive(Debug, Clone)]
struct CacheEntry {
    data: AggregateResponse,
    captured_at: Instant,
}

impl CacheEntry {
    fn is_valid_at(&self, now: Instant, ttl: Duration) -> bool {
        now.saturating_duration_since(self.captured_at) < ttl
    }
}

pub struct ResponseCache {
    ttl: Duration,
    slot: Mutex<Option<CacheEntry>>,
    // Outcome of the most recently finished refresh, None if it succeeded.
    refresh: Mutex<Option<AppError>>,
    refreshes: AtomicU64,
}

/// Held for the duration of one refresh.
pub struct RefreshGuard<'a> {
    last_failure: MutexGuard<'a, Option<AppError>>,
    refreshes: &'a AtomicU64,
}

impl RefreshGuard<'_> {
    /// The error of the latest refresh, if one finished after `epoch` was
    /// read and it failed. Waiters return this instead of retrying upstream.
    pub fn failed_since(&self, epoch: u64) -> Option<AppError> {
        if self.refreshes.load(Ordering::Acquire) == epoch {
            return None;
        }
        self.last_failure.clone()
    }

    pub fn finish<T>(mut self, outcome: &Result<T>) {
        *self.last_failure = outcome.as_ref().err().cloned();
        self.refreshes.fetch_add(1, Ordering::Release);
    }
}

impl ResponseCache {
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            slot: Mutex::new(None),
            refresh: Mutex::new(None),
            refreshes: AtomicU64::new(0),
        }
    }

    pub async fn is_valid(&self) -> bool {
        self.get().await.is_some()
    }

    /// Returns the stored response if it is younger than the TTL.
    pub async fn get(&self) -> Option<AggregateResponse> {
        self.get_at(Instant::now()).await
    }

    async fn get_at(&self, now: Instant) -> Option<AggregateResponse> {
        let slot = self.slot.lock().await;
        slot.as_ref()
            .filter(|entry| entry.is_valid_at(now, self.ttl))
            .map(|entry| entry.data.clone())
    }

    /// Replaces the slot wholesale.
    pub async fn store(&self, data: AggregateResponse) {
        let mut slot = self.slot.lock().await;
        *slot = Some(CacheEntry {
            data,
            captured_at: Instant::now(),
        });
    }

    /// Count of finished refreshes; read it before [`ResponseCache::lock_refresh`].
    pub fn refresh_epoch(&self) -> u64 {
        self.refreshes.load(Ordering::Acquire)
    }

    /// Serialises refreshes. Holders must re-check [`ResponseCache::get`]
    /// and [`RefreshGuard::failed_since`] after acquiring, since another
    /// request may have refreshed meanwhile.
    pub async fn lock_refresh(&self) -> RefreshGuard<'_> {
        RefreshGuard {
            last_failure: self.refresh.lock().await,
            refreshes: &self.refreshes,
        }
    }
}
