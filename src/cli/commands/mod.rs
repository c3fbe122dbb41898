//! Subcommand handlers

pub mod analyze;
pub mod config;
pub mod languages;
pub mod summary;
