pub mod process_group;
