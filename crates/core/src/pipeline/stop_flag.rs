use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Monotonic stopped flag: once set it never reverts.
///
/// Written by the owning task (self-stop) or the orchestrator (external
/// stop); readable from any thread. Loops poll it at the top of each
/// iteration, so a stop request takes effect within one collaborator call.
#[derive(Clone, Default)]
pub struct StopFlag {
    inner: Arc<AtomicBool>,
}

impl StopFlag {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&self) {
        self.inner.store(true, Ordering::Relaxed);
    }

    pub fn is_set(&self) -> bool {
        self.inner.load(Ordering::Relaxed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_starts_unset() {
        assert!(!StopFlag::new().is_set());
    }

    #[test]
    fn test_set_is_sticky() {
        let flag = StopFlag::new();
        flag.set();
        flag.set();
        assert!(flag.is_set());
    }

    #[test]
    fn test_clones_share_state() {
        let flag = StopFlag::new();
        let observer = flag.clone();
        flag.set();
        assert!(observer.is_set());
    }

    #[test]
    fn test_visible_across_threads() {
        let flag = StopFlag::new();
        let remote = flag.clone();
        let handle = std::thread::spawn(move || {
            remote.set();
        });
        handle.join().unwrap();
        assert!(flag.is_set());
    }
}
