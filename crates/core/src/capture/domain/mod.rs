pub mod frame_capture;
