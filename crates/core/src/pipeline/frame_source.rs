use std::sync::Arc;
use std::thread::JoinHandle;

use crate::capture::domain::frame_capture::FrameCapture;
use crate::pipeline::shared_slot::SharedSlot;
use crate::pipeline::stop_flag::StopFlag;
use crate::shared::frame::Frame;

/// Background task that pulls frames from a capture collaborator into a
/// shared latest-frame slot.
///
/// `start` reads the first frame synchronously so `latest_frame` never
/// yields a partially-read frame: after a successful start the slot is
/// either seeded or the source is already stopped (empty stream). The loop
/// self-stops on end-of-stream or read failure; `stop` is cooperative and
/// takes effect within one blocking read.
pub struct FrameSource {
    slot: SharedSlot<Frame>,
    stop: StopFlag,
    handle: Option<JoinHandle<()>>,
}

impl FrameSource {
    pub fn start(mut capture: Box<dyn FrameCapture>) -> Result<Self, Box<dyn std::error::Error>> {
        let slot = SharedSlot::new();
        let stop = StopFlag::new();

        match capture.read_frame()? {
            Some(first) => slot.publish(first),
            None => {
                // Empty stream: nothing to run, report as already stopped.
                stop.set();
                return Ok(Self {
                    slot,
                    stop,
                    handle: None,
                });
            }
        }

        let loop_slot = slot.clone();
        let loop_stop = stop.clone();
        let handle = std::thread::spawn(move || {
            while !loop_stop.is_set() {
                match capture.read_frame() {
                    Ok(Some(frame)) => loop_slot.publish(frame),
                    Ok(None) => {
                        loop_stop.set();
                    }
                    Err(e) => {
                        log::warn!("frame capture failed, stopping source: {e}");
                        loop_stop.set();
                    }
                }
            }
        });

        Ok(Self {
            slot,
            stop,
            handle: Some(handle),
        })
    }

    /// The most recently captured frame. `Some` from the moment `start`
    /// returns, unless the stream was empty.
    pub fn latest_frame(&self) -> Option<Arc<Frame>> {
        self.slot.latest()
    }

    /// Requests a cooperative stop; observed at the next iteration boundary.
    pub fn stop(&self) {
        self.stop.set();
    }

    pub fn is_stopped(&self) -> bool {
        self.stop.is_set()
    }

    /// Waits for the background loop to exit. Callers should `stop` first;
    /// the wait is then bounded by one blocking read.
    pub fn join(mut self) {
        if let Some(handle) = self.handle.take() {
            if handle.join().is_err() {
                log::warn!("frame source thread panicked");
            }
        }
    }
}
