use crate::group::domain::process_group::{BarrierError, ProcessGroup};

/// Degenerate group of one: rank 0, size 1, barrier is a no-op.
///
/// The default when no coordinator is configured, so single-process runs
/// share the same code path as distributed ones.
pub struct SingleProcess;

impl ProcessGroup for SingleProcess {
    fn rank(&self) -> usize {
        0
    }

    fn size(&self) -> usize {
        1
    }

    fn barrier(&self) -> Result<(), BarrierError> {
        Ok(())
    }
}
