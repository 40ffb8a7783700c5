use std::str::FromStr;
use std::time::Duration;

use thiserror::Error;

use crate::capture::domain::frame_capture::FrameCapture;
use crate::display::domain::frame_output::FrameOutput;
use crate::pipeline::frame_sink::FrameSink;
use crate::pipeline::frame_source::FrameSource;
use crate::pipeline::rate_counter::RateCounter;
use crate::pipeline::rate_overlay::stamp_rate;

/// Which pipeline stages run as background threads.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ThreadingMode {
    /// Fully serialized: capture and present inline in the foreground loop.
    None,
    /// Capture runs in a background thread; the foreground presents.
    Get,
    /// Presentation runs in a background thread; the foreground captures.
    Show,
    /// Both capture and presentation run in background threads.
    Both,
}

#[derive(Error, Debug)]
#[error("unknown threading mode '{0}' (expected none, get, show or both)")]
pub struct ModeParseError(String);

impl FromStr for ThreadingMode {
    type Err = ModeParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "none" => Ok(ThreadingMode::None),
            "get" => Ok(ThreadingMode::Get),
            "show" => Ok(ThreadingMode::Show),
            "both" => Ok(ThreadingMode::Both),
            other => Err(ModeParseError(other.to_string())),
        }
    }
}

/// Summary of one orchestration run.
#[derive(Clone, Copy, Debug)]
pub struct StreamStats {
    /// Foreground loop iterations counted by the run's `RateCounter`.
    pub frames: u64,
    pub elapsed: Duration,
    /// Mean iterations per second over the whole run.
    pub mean_rate: f64,
}

impl StreamStats {
    fn from_counter(counter: &RateCounter) -> Self {
        Self {
            frames: counter.count(),
            elapsed: counter.elapsed(),
            mean_rate: counter.rate(),
        }
    }
}

/// Runs one capture-to-present pipeline to completion.
///
/// The foreground loop exits when any participating task stops: source
/// exhaustion, a quit request from the output, or a collaborator failure.
/// On exit every background task is stopped and joined; shutdown is
/// cooperative, so the worst-case stop latency is one blocking collaborator
/// call.
///
/// Measurement note, preserved from the original demos: in `None` mode the
/// counted iteration spans the blocking read *and* the present call, while
/// the threaded modes count only the foreground stamp/dispatch work. The
/// reported rates are therefore not comparable across modes.
pub fn run_stream(
    mode: ThreadingMode,
    capture: Box<dyn FrameCapture>,
    output: Box<dyn FrameOutput>,
) -> Result<StreamStats, Box<dyn std::error::Error>> {
    match mode {
        ThreadingMode::None => run_serial(capture, output),
        ThreadingMode::Get => run_threaded_get(capture, output),
        ThreadingMode::Show => run_threaded_show(capture, output),
        ThreadingMode::Both => run_threaded_both(capture, output),
    }
}

fn run_serial(
    mut capture: Box<dyn FrameCapture>,
    mut output: Box<dyn FrameOutput>,
) -> Result<StreamStats, Box<dyn std::error::Error>> {
    let counter = RateCounter::start();
    loop {
        let Some(mut frame) = capture.read_frame()? else {
            break;
        };
        let rate = counter.rate();
        stamp_rate(&mut frame, rate);
        output.present(&frame, rate)?;
        // Count before polling quit so a quit-terminated run still counts
        // its final presented frame.
        counter.increment();
        if output.quit_requested() {
            break;
        }
    }
    Ok(StreamStats::from_counter(&counter))
}

fn run_threaded_get(
    capture: Box<dyn FrameCapture>,
    mut output: Box<dyn FrameOutput>,
) -> Result<StreamStats, Box<dyn std::error::Error>> {
    let source = FrameSource::start(capture)?;
    let counter = RateCounter::start();
    let mut failure: Option<Box<dyn std::error::Error>> = None;

    while !source.is_stopped() && !output.quit_requested() {
        let Some(latest) = source.latest_frame() else {
            break;
        };
        let mut frame = (*latest).clone();
        let rate = counter.rate();
        stamp_rate(&mut frame, rate);
        if let Err(e) = output.present(&frame, rate) {
            failure = Some(e);
            break;
        }
        counter.increment();
    }

    source.stop();
    source.join();
    match failure {
        Some(e) => Err(e),
        None => Ok(StreamStats::from_counter(&counter)),
    }
}

fn run_threaded_show(
    mut capture: Box<dyn FrameCapture>,
    output: Box<dyn FrameOutput>,
) -> Result<StreamStats, Box<dyn std::error::Error>> {
    // The sink needs a valid first frame before its loop can run.
    let Some(first) = capture.read_frame()? else {
        let counter = RateCounter::start();
        return Ok(StreamStats::from_counter(&counter));
    };
    let sink = FrameSink::start(output, first);
    let counter = RateCounter::start();
    let mut failure: Option<Box<dyn std::error::Error>> = None;

    while !sink.is_stopped() {
        let mut frame = match capture.read_frame() {
            Ok(Some(frame)) => frame,
            Ok(None) => break,
            Err(e) => {
                failure = Some(e);
                break;
            }
        };
        let rate = counter.rate();
        stamp_rate(&mut frame, rate);
        sink.submit(frame, rate);
        counter.increment();
    }

    sink.stop();
    sink.join();
    match failure {
        Some(e) => Err(e),
        None => Ok(StreamStats::from_counter(&counter)),
    }
}

fn run_threaded_both(
    capture: Box<dyn FrameCapture>,
    output: Box<dyn FrameOutput>,
) -> Result<StreamStats, Box<dyn std::error::Error>> {
    let source = FrameSource::start(capture)?;
    let Some(first) = source.latest_frame() else {
        // Empty stream: the source is already stopped, no sink to run.
        source.join();
        let counter = RateCounter::start();
        return Ok(StreamStats::from_counter(&counter));
    };
    let sink = FrameSink::start(output, (*first).clone());
    let counter = RateCounter::start();

    while !source.is_stopped() && !sink.is_stopped() {
        let Some(latest) = source.latest_frame() else {
            break;
        };
        let mut frame = (*latest).clone();
        let rate = counter.rate();
        stamp_rate(&mut frame, rate);
        sink.submit(frame, rate);
        counter.increment();
    }

    source.stop();
    sink.stop();
    source.join();
    sink.join();
    Ok(StreamStats::from_counter(&counter))
}
