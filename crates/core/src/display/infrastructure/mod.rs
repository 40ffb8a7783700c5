pub mod headless_output;
