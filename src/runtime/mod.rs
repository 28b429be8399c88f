//! Runtime concerns shared by the binaries: configuration and logging setup.

mod config;
pub use config::Config;

pub mod logging;
