use std::thread::JoinHandle;

use crate::display::domain::frame_output::FrameOutput;
use crate::pipeline::shared_slot::SharedSlot;
use crate::pipeline::stop_flag::StopFlag;
use crate::shared::frame::Frame;

/// A frame paired with the throughput reading current when it was submitted.
pub struct SinkFrame {
    pub frame: Frame,
    pub rate: f64,
}

/// Background task that repeatedly presents the most recent submitted frame
/// to an output collaborator.
///
/// `start` requires a first frame, so the loop always has something to
/// present; the orchestrator obtains one from the capture side before
/// constructing the sink. `submit` is the sole external publish point and
/// overwrites unconditionally. The loop self-stops when the output signals
/// quit or a present call fails; `stop` is cooperative and takes effect
/// within one present call.
pub struct FrameSink {
    slot: SharedSlot<SinkFrame>,
    stop: StopFlag,
    handle: Option<JoinHandle<()>>,
}

impl FrameSink {
    pub fn start(mut output: Box<dyn FrameOutput>, first: Frame) -> Self {
        let slot = SharedSlot::new();
        let stop = StopFlag::new();
        slot.publish(SinkFrame {
            frame: first,
            rate: 0.0,
        });

        let loop_slot = slot.clone();
        let loop_stop = stop.clone();
        let handle = std::thread::spawn(move || {
            while !loop_stop.is_set() {
                let Some(current) = loop_slot.latest() else {
                    break; // unreachable: the slot is seeded before spawn
                };
                if let Err(e) = output.present(&current.frame, current.rate) {
                    log::warn!("frame output failed, stopping sink: {e}");
                    loop_stop.set();
                    break;
                }
                if output.quit_requested() {
                    loop_stop.set();
                }
            }
        });

        Self {
            slot,
            stop,
            handle: Some(handle),
        }
    }

    /// Publishes a new frame for the loop to present. Overwrites whatever
    /// was there; never queues, never blocks.
    pub fn submit(&self, frame: Frame, rate: f64) {
        self.slot.publish(SinkFrame { frame, rate });
    }

    /// Requests a cooperative stop; observed at the next iteration boundary.
    pub fn stop(&self) {
        self.stop.set();
    }

    pub fn is_stopped(&self) -> bool {
        self.stop.is_set()
    }

    /// Waits for the background loop to exit. Callers should `stop` first;
    /// the wait is then bounded by one present call.
    pub fn join(mut self) {
        if let Some(handle) = self.handle.take() {
            if handle.join().is_err() {
                log::warn!("frame sink thread panicked");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::frame::PixelFormat;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::{Arc, Mutex};
    use std::time::Duration;

    fn frame(index: usize) -> Frame {
        Frame::new(vec![index as u8; 12], 2, 2, PixelFormat::Rgb8, index)
    }

    #[derive(Clone)]
    struct RecordingOutput {
        presented: Arc<Mutex<Vec<(usize, f64)>>>,
        quit_after: Option<usize>,
        fail: bool,
    }

    impl RecordingOutput {
        fn new() -> Self {
            Self {
                presented: Arc::new(Mutex::new(Vec::new())),
                quit_after: None,
                fail: false,
            }
        }
    }

    impl FrameOutput for RecordingOutput {
        fn present(&mut self, frame: &Frame, rate: f64) -> Result<(), Box<dyn std::error::Error>> {
            if self.fail {
                return Err("display lost".into());
            }
            // A touch of display latency keeps the re-present spin bounded.
            std::thread::sleep(Duration::from_micros(500));
            self.presented.lock().unwrap().push((frame.index(), rate));
            Ok(())
        }

        fn quit_requested(&mut self) -> bool {
            self.quit_after
                .is_some_and(|n| self.presented.lock().unwrap().len() >= n)
        }
    }

    /// Output that performs one present per ticket, counting calls.
    struct GatedOutput {
        tickets: crossbeam_channel::Receiver<()>,
        presents: Arc<AtomicUsize>,
    }

    impl FrameOutput for GatedOutput {
        fn present(&mut self, _frame: &Frame, _rate: f64) -> Result<(), Box<dyn std::error::Error>> {
            if self.tickets.recv().is_err() {
                return Err("display closed".into());
            }
            self.presents.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }

        fn quit_requested(&mut self) -> bool {
            false
        }
    }

    fn wait_until(deadline: Duration, mut condition: impl FnMut() -> bool) -> bool {
        let start = std::time::Instant::now();
        while start.elapsed() < deadline {
            if condition() {
                return true;
            }
            std::thread::sleep(Duration::from_millis(1));
        }
        condition()
    }

    #[test]
    fn test_presents_the_first_frame() {
        let output = RecordingOutput::new();
        let presented = Arc::clone(&output.presented);
        let sink = FrameSink::start(Box::new(output), frame(0));
        assert!(wait_until(Duration::from_secs(2), || {
            !presented.lock().unwrap().is_empty()
        }));
        sink.stop();
        sink.join();
        assert_eq!(presented.lock().unwrap()[0].0, 0);
    }

    #[test]
    fn test_submit_overwrites_and_indices_never_decrease() {
        let output = RecordingOutput::new();
        let presented = Arc::clone(&output.presented);
        let sink = FrameSink::start(Box::new(output), frame(0));
        for i in 1..=5 {
            sink.submit(frame(i), i as f64);
            std::thread::sleep(Duration::from_millis(2));
        }
        assert!(wait_until(Duration::from_secs(2), || {
            presented.lock().unwrap().iter().any(|&(i, _)| i == 5)
        }));
        sink.stop();
        sink.join();

        let seen = presented.lock().unwrap();
        assert!(seen.windows(2).all(|w| w[0].0 <= w[1].0));
        assert!(seen.iter().all(|&(i, _)| i <= 5));
    }

    #[test]
    fn test_stop_allows_at_most_one_more_present() {
        let (tx, rx) = crossbeam_channel::unbounded();
        let presents = Arc::new(AtomicUsize::new(0));
        let output = GatedOutput {
            tickets: rx,
            presents: Arc::clone(&presents),
        };
        let sink = FrameSink::start(Box::new(output), frame(0));

        tx.send(()).unwrap();
        assert!(wait_until(Duration::from_secs(2), || {
            presents.load(Ordering::SeqCst) == 1
        }));

        sink.stop();
        let presents_at_stop = presents.load(Ordering::SeqCst);
        // Keep tickets coming so a loop that ignored the flag would run on.
        for _ in 0..5 {
            let _ = tx.send(());
        }
        sink.join();
        assert!(presents.load(Ordering::SeqCst) <= presents_at_stop + 1);
    }

    #[test]
    fn test_quit_signal_self_stops() {
        let output = RecordingOutput {
            quit_after: Some(3),
            ..RecordingOutput::new()
        };
        let sink = FrameSink::start(Box::new(output), frame(0));
        assert!(wait_until(Duration::from_secs(2), || sink.is_stopped()));
        sink.join();
    }

    #[test]
    fn test_present_failure_self_stops() {
        let output = RecordingOutput {
            fail: true,
            ..RecordingOutput::new()
        };
        let sink = FrameSink::start(Box::new(output), frame(0));
        assert!(wait_until(Duration::from_secs(2), || sink.is_stopped()));
        sink.join();
    }
}
