pub mod cli;
pub mod config;
pub mod document;
pub mod fetch;
pub mod loader;
pub mod render;
pub mod util;
