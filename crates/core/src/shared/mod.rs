pub mod frame;
pub mod source_spec;
