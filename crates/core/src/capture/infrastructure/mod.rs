pub mod capture_factory;
#[cfg(feature = "ffmpeg")]
pub mod ffmpeg_capture;
pub mod test_pattern_capture;
