use std::sync::{Arc, Barrier};

use crate::group::domain::process_group::{BarrierError, ProcessGroup};

/// In-process group whose members live on threads of one process.
///
/// Backed by `std::sync::Barrier`; used by tests and by single-machine
/// multi-role runs where separate processes would be overkill.
pub struct LocalGroup {
    rank: usize,
    size: usize,
    barrier: Arc<Barrier>,
}

impl LocalGroup {
    /// Creates one member handle per rank, all sharing one barrier.
    pub fn split(size: usize) -> Vec<LocalGroup> {
        let barrier = Arc::new(Barrier::new(size));
        (0..size)
            .map(|rank| LocalGroup {
                rank,
                size,
                barrier: Arc::clone(&barrier),
            })
            .collect()
    }
}

impl ProcessGroup for LocalGroup {
    fn rank(&self) -> usize {
        self.rank
    }

    fn size(&self) -> usize {
        self.size
    }

    fn barrier(&self) -> Result<(), BarrierError> {
        self.barrier.wait();
        Ok(())
    }
}
