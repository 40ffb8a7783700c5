pub mod rate_log;
