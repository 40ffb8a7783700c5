use std::time::Duration;

use crate::display::domain::frame_output::FrameOutput;
use crate::shared::frame::Frame;

/// Windowless display: reports presented frames via `log::debug!`.
///
/// Stands in for a GUI window on headless machines and in CI. An optional
/// per-present latency emulates a display's refresh cost so threaded modes
/// behave as they would against real hardware, and `quit_after` plays the
/// role of the user pressing the quit key after a number of frames.
pub struct HeadlessOutput {
    window_name: String,
    presented: u64,
    quit_after: Option<u64>,
    present_latency: Duration,
}

impl HeadlessOutput {
    pub fn new(window_name: impl Into<String>) -> Self {
        Self {
            window_name: window_name.into(),
            presented: 0,
            quit_after: None,
            present_latency: Duration::ZERO,
        }
    }

    /// Requests quit once this many frames have been presented.
    pub fn with_quit_after(mut self, frames: Option<u64>) -> Self {
        self.quit_after = frames;
        self
    }

    pub fn with_present_latency(mut self, latency: Duration) -> Self {
        self.present_latency = latency;
        self
    }

    pub fn presented(&self) -> u64 {
        self.presented
    }
}

impl FrameOutput for HeadlessOutput {
    fn present(&mut self, frame: &Frame, rate: f64) -> Result<(), Box<dyn std::error::Error>> {
        if !self.present_latency.is_zero() {
            std::thread::sleep(self.present_latency);
        }
        self.presented += 1;
        log::debug!(
            "{}: frame {} ({}x{}, {rate:.0} iterations/sec)",
            self.window_name,
            frame.index(),
            frame.width(),
            frame.height(),
        );
        Ok(())
    }

    fn quit_requested(&mut self) -> bool {
        self.quit_after.is_some_and(|n| self.presented >= n)
    }
}
