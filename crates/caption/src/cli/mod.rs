//! Command handlers.

pub mod config;
pub mod describe;
pub mod generate;
pub mod output;
pub mod prompt;
pub mod types;
