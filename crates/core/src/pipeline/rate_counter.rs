use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};

/// Running-average throughput counter.
///
/// The epoch is fixed at construction, so `rate` is the mean rate since
/// start, not a windowed instantaneous rate. Construction *is* the start:
/// incrementing or reading a counter that has not started is
/// unrepresentable. `increment` and `rate` are safe to call concurrently
/// from any thread; neither blocks.
pub struct RateCounter {
    started: Instant,
    count: AtomicU64,
}

impl RateCounter {
    pub fn start() -> Self {
        Self {
            started: Instant::now(),
            count: AtomicU64::new(0),
        }
    }

    pub fn increment(&self) {
        self.count.fetch_add(1, Ordering::Relaxed);
    }

    pub fn count(&self) -> u64 {
        self.count.load(Ordering::Relaxed)
    }

    pub fn elapsed(&self) -> Duration {
        self.started.elapsed()
    }

    /// Increments per second since `start`; 0.0 if no time has elapsed yet.
    pub fn rate(&self) -> f64 {
        let secs = self.started.elapsed().as_secs_f64();
        if secs == 0.0 {
            return 0.0;
        }
        self.count() as f64 / secs
    }
}
