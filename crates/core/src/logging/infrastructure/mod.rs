pub mod file_rate_log;
pub mod rate_log_output;
