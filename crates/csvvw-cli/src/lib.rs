//! CLI library components for the CSV to Vowpal Wabbit converter.

pub mod cli;
pub mod commands;
pub mod logging;
