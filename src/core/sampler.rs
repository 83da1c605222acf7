//! Burst-then-throttle sampling of repeated records.
//!
//! Records are bucketed by level and message. Within one tick, the first
//! `initial` records of a bucket pass, after which only every
//! `thereafter`-th record passes (none if `thereafter` is zero). Counters
//! reset when a new tick starts.

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
use std::time::{Duration, Instant};

use dashmap::DashMap;

use crate::core::level::Level;

/// Number of counter buckets per level. Distinct messages that hash to the
/// same bucket share a counter.
const BUCKETS: u64 = 4096;

struct Counter {
    window_start: Instant,
    count: u64,
}

pub struct Sampler {
    initial: u64,
    thereafter: u64,
    tick: Duration,
    counters: DashMap<(Level, u16), Counter>,
}

impl Sampler {
    pub fn new(initial: u64, thereafter: u64, tick: Duration) -> Self {
        Self {
            initial,
            thereafter,
            tick,
            counters: DashMap::new(),
        }
    }

    /// Count one record and report whether it should be written.
    pub fn check(&self, level: Level, message: &str) -> bool {
        let now = Instant::now();
        let mut counter = self
            .counters
            .entry((level, bucket(message)))
            .or_insert_with(|| Counter {
                window_start: now,
                count: 0,
            });

        if now.duration_since(counter.window_start) >= self.tick {
            counter.window_start = now;
            counter.count = 0;
        }
        counter.count += 1;
        let n = counter.count;

        if n <= self.initial {
            return true;
        }
        self.thereafter > 0 && (n - self.initial) % self.thereafter == 0
    }
}

impl std::fmt::Debug for Sampler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Sampler")
            .field("initial", &self.initial)
            .field("thereafter", &self.thereafter)
            .field("tick", &self.tick)
            .finish()
    }
}

fn bucket(message: &str) -> u16 {
    let mut hasher = DefaultHasher::new();
    message.hash(&mut hasher);
    (hasher.finish() % BUCKETS) as u16
}
