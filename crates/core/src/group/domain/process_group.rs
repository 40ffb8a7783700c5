use std::io;
use std::time::Duration;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum BarrierError {
    #[error("barrier timed out after {0:?}")]
    Timeout(Duration),
    #[error("barrier connection to coordinator {addr} failed: {source}")]
    Connect {
        addr: String,
        #[source]
        source: io::Error,
    },
    #[error("a peer disconnected before reaching the barrier")]
    PeerLost,
    #[error("barrier I/O failed: {0}")]
    Io(#[from] io::Error),
}

/// A fixed-size group of cooperating participants.
///
/// Rank selects the participant's role; the barrier is the single
/// rendezvous every participant performs after its loop exits, so no
/// process leaves the program before the others have finished. Barrier
/// failure (a peer crashed or never arrived) is fatal by design; no
/// partial-result recovery is attempted.
pub trait ProcessGroup {
    fn rank(&self) -> usize;

    fn size(&self) -> usize;

    /// Blocks until every participant in the group has called `barrier`.
    fn barrier(&self) -> Result<(), BarrierError>;
}
