pub mod frame_sink;
pub mod frame_source;
pub mod rate_counter;
pub mod rate_overlay;
pub mod roles;
pub mod runner;
pub mod shared_slot;
pub mod stop_flag;
