use std::path::PathBuf;

use crate::display::domain::frame_output::FrameOutput;
use crate::logging::domain::rate_log::RateLog;
use crate::shared::frame::Frame;

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// The logging role's output: appends one timestamped throughput sample per
/// presented frame instead of rendering anything.
///
/// Line format: `<YYYY-MM-DD HH:MM:SS> - Iterations per second: <rate>`.
/// Never requests quit; the run ends when the source does.
pub struct RateLogOutput {
    log: Box<dyn RateLog>,
    path: PathBuf,
}

impl RateLogOutput {
    pub fn new(log: Box<dyn RateLog>, path: PathBuf) -> Self {
        Self { log, path }
    }
}

impl FrameOutput for RateLogOutput {
    fn present(&mut self, _frame: &Frame, rate: f64) -> Result<(), Box<dyn std::error::Error>> {
        let timestamp = chrono::Local::now().format(TIMESTAMP_FORMAT);
        self.log
            .append_line(&self.path, &format!("{timestamp} - Iterations per second: {rate}"))
    }

    fn quit_requested(&mut self) -> bool {
        false
    }
}
