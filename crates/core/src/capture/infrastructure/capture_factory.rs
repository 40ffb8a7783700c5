use crate::capture::domain::frame_capture::FrameCapture;
use crate::capture::infrastructure::test_pattern_capture::TestPatternCapture;
use crate::shared::source_spec::SourceSpec;

/// Default dimensions of the built-in pattern source.
const PATTERN_WIDTH: u32 = 640;
const PATTERN_HEIGHT: u32 = 480;
/// Pacing of the built-in pattern source, roughly 30 fps.
const PATTERN_FRAME_INTERVAL_MS: u64 = 33;

/// Opens the capture collaborator for a validated source spec.
///
/// `pattern_frames` bounds the built-in synthetic source; file and camera
/// sources run until the stream ends. File and camera support requires the
/// `ffmpeg` feature; without it those specs fail at open time, before any
/// thread is spawned.
pub fn open_capture(
    spec: &SourceSpec,
    pattern_frames: usize,
) -> Result<Box<dyn FrameCapture>, Box<dyn std::error::Error>> {
    match spec {
        SourceSpec::Pattern => Ok(Box::new(
            TestPatternCapture::new(PATTERN_WIDTH, PATTERN_HEIGHT, pattern_frames)
                .with_frame_interval(std::time::Duration::from_millis(
                    PATTERN_FRAME_INTERVAL_MS,
                )),
        )),
        #[cfg(feature = "ffmpeg")]
        SourceSpec::File(path) => {
            use crate::capture::infrastructure::ffmpeg_capture::FfmpegCapture;
            Ok(Box::new(FfmpegCapture::open(path)?))
        }
        #[cfg(feature = "ffmpeg")]
        SourceSpec::Camera(index) => {
            use crate::capture::infrastructure::ffmpeg_capture::FfmpegCapture;
            Ok(Box::new(FfmpegCapture::open_camera(*index)?))
        }
        #[cfg(not(feature = "ffmpeg"))]
        SourceSpec::File(path) => Err(format!(
            "cannot open {}: built without ffmpeg support (enable the `ffmpeg` feature)",
            path.display()
        )
        .into()),
        #[cfg(not(feature = "ffmpeg"))]
        SourceSpec::Camera(index) => Err(format!(
            "cannot open camera {index}: built without ffmpeg support (enable the `ffmpeg` feature)"
        )
        .into()),
    }
}
