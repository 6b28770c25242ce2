//! Ephemeral in-memory cache for lookup endpoints
//!
//! Entries stay fresh for a fixed window; after that they are still kept
//! around as a stale-but-available fallback for when a refetch fails.

use std::time::{Duration, Instant};

#[derive(Debug, Default)]
pub struct TimedCache<T> {
    entry: Option<(T, Instant)>,
}

impl<T: Clone> TimedCache<T> {
    pub fn new() -> Self {
        Self { entry: None }
    }

    pub fn put(&mut self, value: T) {
        self.entry = Some((value, Instant::now()));
    }

    /// Value if it is younger than `ttl`
    pub fn fresh(&self, ttl: Duration) -> Option<T> {
        self.fresh_at(ttl, Instant::now())
    }

    fn fresh_at(&self, ttl: Duration, now: Instant) -> Option<T> {
        self.entry
            .as_ref()
            .filter(|(_, at)| now.duration_since(*at) < ttl)
            .map(|(v, _)| v.clone())
    }

    /// Value regardless of age, for fallback on fetch failure
    pub fn stale(&self) -> Option<T> {
        self.entry.as_ref().map(|(v, _)| v.clone())
    }

    pub fn clear(&mut self) {
        self.entry = None;
    }
}
