use std::sync::Arc;

use arc_swap::ArcSwapOption;

/// Holds at most one value; writers overwrite, never queue.
///
/// Publication is an atomic `Arc` swap, so a reader observes either the
/// previous value or the new one, never a torn mix. Last-write-wins is the
/// only ordering guarantee. Each pipeline slot has exactly one writer role
/// at a time; readers may be on any thread.
pub struct SharedSlot<T> {
    inner: Arc<ArcSwapOption<T>>,
}

impl<T> SharedSlot<T> {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(ArcSwapOption::empty()),
        }
    }

    pub fn publish(&self, value: T) {
        self.inner.store(Some(Arc::new(value)));
    }

    /// The most recently published value, or `None` if nothing has been
    /// published yet. Once `Some`, the slot never reverts to empty.
    pub fn latest(&self) -> Option<Arc<T>> {
        self.inner.load_full()
    }

    pub fn has_value(&self) -> bool {
        self.inner.load().is_some()
    }
}

impl<T> Clone for SharedSlot<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<T> Default for SharedSlot<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_until_first_publish() {
        let slot: SharedSlot<u32> = SharedSlot::new();
        assert!(slot.latest().is_none());
        assert!(!slot.has_value());
        slot.publish(7);
        assert_eq!(*slot.latest().unwrap(), 7);
        assert!(slot.has_value());
    }

    #[test]
    fn test_publish_overwrites() {
        let slot = SharedSlot::new();
        slot.publish(1);
        slot.publish(2);
        assert_eq!(*slot.latest().unwrap(), 2);
    }

    #[test]
    fn test_clone_shares_the_slot() {
        let slot = SharedSlot::new();
        let reader = slot.clone();
        slot.publish("frame");
        assert_eq!(*reader.latest().unwrap(), "frame");
    }

    #[test]
    fn test_reads_never_observe_torn_values() {
        // One writer publishes buffers whose bytes all equal the sequence
        // number; concurrent readers must only ever see uniform buffers
        // with non-decreasing sequence numbers.
        let slot: SharedSlot<Vec<u8>> = SharedSlot::new();
        let writer_slot = slot.clone();
        let writer = std::thread::spawn(move || {
            for i in 0..=255u8 {
                writer_slot.publish(vec![i; 1024]);
            }
        });

        let mut last_seen = 0u8;
        for _ in 0..10_000 {
            if let Some(buf) = slot.latest() {
                let first = buf[0];
                assert!(buf.iter().all(|&b| b == first), "torn buffer observed");
                assert!(first >= last_seen, "stale value after newer one");
                last_seen = first;
            }
        }
        writer.join().unwrap();
        assert_eq!(*slot.latest().unwrap(), vec![255u8; 1024]);
    }
}
