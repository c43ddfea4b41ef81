//! CLI subcommands.

pub mod common;
pub mod config;
pub mod resolve;
pub mod serve;
