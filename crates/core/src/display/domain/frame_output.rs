use crate::shared::frame::Frame;

/// Presents frames to the user: a window, a log file, or a test recorder.
///
/// `rate` is the running throughput at the time the frame was produced. A
/// window implementation typically ignores it (the overlay is already
/// stamped into the pixels); the logging role consumes the number directly.
pub trait FrameOutput: Send {
    /// Presents one frame. May block briefly on I/O.
    fn present(&mut self, frame: &Frame, rate: f64) -> Result<(), Box<dyn std::error::Error>>;

    /// Non-blocking check for an external quit request (e.g. a keypress or
    /// window close). Polled once per presented frame.
    fn quit_requested(&mut self) -> bool;
}
