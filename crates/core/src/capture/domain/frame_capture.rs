use crate::shared::frame::Frame;

/// Reads frames from a video file, camera, or synthetic source.
///
/// Implementations handle I/O details (codec, device protocol, etc.) while
/// the pipeline works with the abstract `Frame` type. `read_frame` may block
/// until the next frame is available; a cooperative stop request is
/// therefore bounded by one read's latency.
pub trait FrameCapture: Send {
    /// Blocks until the next frame is decoded. Returns `Ok(None)` at
    /// end-of-stream, which the pipeline treats as normal termination.
    fn read_frame(&mut self) -> Result<Option<Frame>, Box<dyn std::error::Error>>;
}

impl std::fmt::Debug for dyn FrameCapture {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("dyn FrameCapture")
    }
}
