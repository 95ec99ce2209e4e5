//! CLI subcommands

pub mod completions;
pub mod config;
pub mod update;
