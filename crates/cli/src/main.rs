use std::path::PathBuf;
use std::process;
use std::time::Duration;

use clap::Parser;

use streamview_core::capture::infrastructure::capture_factory::open_capture;
use streamview_core::display::domain::frame_output::FrameOutput;
use streamview_core::display::infrastructure::headless_output::HeadlessOutput;
use streamview_core::group::domain::process_group::ProcessGroup;
use streamview_core::group::infrastructure::single_process::SingleProcess;
use streamview_core::group::infrastructure::tcp_group::TcpGroup;
use streamview_core::pipeline::roles::run_participant;
use streamview_core::pipeline::runner::ThreadingMode;
use streamview_core::shared::source_spec::SourceSpec;

/// Threaded video viewing with rank-based process roles.
#[derive(Parser)]
#[command(name = "streamview")]
struct Cli {
    /// Video source: a file path, a numeric camera index, or "pattern".
    #[arg(long, short, default_value = "pattern")]
    source: String,

    /// Threading mode: none, get, show, or both.
    #[arg(long = "thread", short = 't', default_value = "none")]
    thread: String,

    /// Number of frames the built-in pattern source emits.
    #[arg(long, default_value = "300")]
    frames: usize,

    /// File the logging role appends throughput samples to.
    #[arg(long, default_value = "logs/video_log.txt")]
    log_file: PathBuf,

    /// Rank of this process within the group.
    #[arg(long, default_value = "0")]
    rank: usize,

    /// Total number of cooperating processes.
    #[arg(long, default_value = "1")]
    group_size: usize,

    /// Coordinator address (host:port) for the end-of-run rendezvous.
    /// Required when --group-size is greater than 1.
    #[arg(long)]
    coordinator: Option<String>,

    /// Seconds to wait at the rendezvous before giving up.
    #[arg(long, default_value = "30")]
    barrier_timeout: u64,

    /// Stop the display role after this many presented frames.
    #[arg(long)]
    quit_after: Option<u64>,
}

fn main() {
    env_logger::init();

    if let Err(e) = run() {
        eprintln!("Error: {e}");
        process::exit(1);
    }
}

fn run() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Validate everything before any pipeline thread exists.
    let mode: ThreadingMode = cli.thread.parse()?;
    let spec = SourceSpec::parse(&cli.source)?;
    let group = build_group(&cli)?;

    let frames = cli.frames;
    let quit_after = cli.quit_after;
    let stats = run_participant(
        group.as_ref(),
        mode,
        move || open_capture(&spec, frames),
        move || {
            Ok(Box::new(HeadlessOutput::new("Video").with_quit_after(quit_after))
                as Box<dyn FrameOutput>)
        },
        &cli.log_file,
    )?;

    if let Some(stats) = stats {
        log::info!(
            "{} frames in {:.2}s ({:.1} iterations/sec)",
            stats.frames,
            stats.elapsed.as_secs_f64(),
            stats.mean_rate,
        );
    }

    Ok(())
}

fn build_group(cli: &Cli) -> Result<Box<dyn ProcessGroup>, Box<dyn std::error::Error>> {
    if cli.group_size == 0 {
        return Err("--group-size must be at least 1".into());
    }
    if cli.rank >= cli.group_size {
        return Err(format!(
            "--rank {} is out of range for --group-size {}",
            cli.rank, cli.group_size
        )
        .into());
    }

    match &cli.coordinator {
        Some(addr) => Ok(Box::new(TcpGroup::new(
            cli.rank,
            cli.group_size,
            addr.clone(),
            Duration::from_secs(cli.barrier_timeout),
        ))),
        None if cli.group_size > 1 => {
            Err("--coordinator is required when --group-size is greater than 1".into())
        }
        None => Ok(Box::new(SingleProcess)),
    }
}
