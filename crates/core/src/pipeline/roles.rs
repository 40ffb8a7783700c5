use std::path::Path;

use crate::capture::domain::frame_capture::FrameCapture;
use crate::display::domain::frame_output::FrameOutput;
use crate::group::domain::process_group::ProcessGroup;
use crate::logging::infrastructure::file_rate_log::FileRateLog;
use crate::logging::infrastructure::rate_log_output::RateLogOutput;
use crate::pipeline::runner::{run_stream, StreamStats, ThreadingMode};

/// What a participant does with its share of the stream.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Role {
    /// Runs the selected threading mode with the display output.
    Display,
    /// Samples throughput at the same cadence but appends log lines
    /// instead of rendering.
    Log,
    /// No pipeline work; only the final rendezvous.
    Idle,
}

/// Rank-to-role table. Ranks beyond the table are idle, so growing the
/// group needs a table entry, not a new branch.
const ROLE_BY_RANK: &[Role] = &[Role::Display, Role::Log];

pub fn role_for(rank: usize) -> Role {
    ROLE_BY_RANK.get(rank).copied().unwrap_or(Role::Idle)
}

type FactoryResult<T> = Result<T, Box<dyn std::error::Error>>;

/// Runs this participant's role, then rendezvous with the rest of the group.
///
/// Collaborators are opened lazily per role, so an idle rank opens no
/// capture device. The logging role always runs the fully serialized loop:
/// one capture read per log line, matching the one-sample-per-frame cadence
/// of the original logger (a background sink re-presenting the latest frame
/// would duplicate samples).
///
/// The barrier runs even when the role had no work; its failure is fatal
/// and propagates to the caller. Returns `None` for idle ranks.
pub fn run_participant(
    group: &dyn ProcessGroup,
    mode: ThreadingMode,
    open_capture: impl FnOnce() -> FactoryResult<Box<dyn FrameCapture>>,
    open_display: impl FnOnce() -> FactoryResult<Box<dyn FrameOutput>>,
    log_path: &Path,
) -> Result<Option<StreamStats>, Box<dyn std::error::Error>> {
    let rank = group.rank();
    let stats = match role_for(rank) {
        Role::Display => {
            log::info!("process {rank} handling video display ({mode:?} mode)");
            Some(run_stream(mode, open_capture()?, open_display()?)?)
        }
        Role::Log => {
            log::info!("process {rank} handling throughput logging");
            let output = Box::new(RateLogOutput::new(
                Box::new(FileRateLog),
                log_path.to_path_buf(),
            ));
            Some(run_stream(ThreadingMode::None, open_capture()?, output)?)
        }
        Role::Idle => {
            log::info!("process {rank} idle, waiting for the group");
            None
        }
    };

    group.barrier()?;
    Ok(stats)
}
