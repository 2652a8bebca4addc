pub mod config;
pub mod fetch;
pub mod logging;
pub mod source;
pub mod ui;
