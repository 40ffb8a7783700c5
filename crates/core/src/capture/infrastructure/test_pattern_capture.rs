use std::time::Duration;

use crate::capture::domain::frame_capture::FrameCapture;
use crate::shared::frame::{Frame, PixelFormat};

/// Synthetic capture source: a moving diagonal gradient.
///
/// Needs no camera, file, or codec, which makes it the default source and
/// the workhorse of the test suite. An optional per-frame interval paces
/// reads the way a real device would, so threaded modes can be exercised
/// against a "slow" source.
pub struct TestPatternCapture {
    width: u32,
    height: u32,
    remaining: usize,
    next_index: usize,
    frame_interval: Duration,
}

impl TestPatternCapture {
    pub fn new(width: u32, height: u32, frames: usize) -> Self {
        Self {
            width,
            height,
            remaining: frames,
            next_index: 0,
            frame_interval: Duration::ZERO,
        }
    }

    pub fn with_frame_interval(mut self, interval: Duration) -> Self {
        self.frame_interval = interval;
        self
    }

    fn render(&self, index: usize) -> Frame {
        let w = self.width as usize;
        let h = self.height as usize;
        let mut data = vec![0u8; w * h * 3];
        // The gradient shifts by 8 levels per frame so motion is visible.
        let shift = index * 8;
        for y in 0..h {
            for x in 0..w {
                let level = ((x + y + shift) % 256) as u8;
                let at = (y * w + x) * 3;
                data[at] = level;
                data[at + 1] = level.wrapping_add(85);
                data[at + 2] = level.wrapping_add(170);
            }
        }
        Frame::new(data, self.width, self.height, PixelFormat::Rgb8, index)
    }
}

impl FrameCapture for TestPatternCapture {
    fn read_frame(&mut self) -> Result<Option<Frame>, Box<dyn std::error::Error>> {
        if self.remaining == 0 {
            return Ok(None);
        }
        if !self.frame_interval.is_zero() {
            std::thread::sleep(self.frame_interval);
        }
        let frame = self.render(self.next_index);
        self.next_index += 1;
        self.remaining -= 1;
        Ok(Some(frame))
    }
}
