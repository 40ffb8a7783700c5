pub mod capture;
pub mod display;
pub mod group;
pub mod logging;
pub mod pipeline;
pub mod shared;
