pub mod local_group;
pub mod single_process;
pub mod tcp_group;
