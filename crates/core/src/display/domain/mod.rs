pub mod frame_output;
