//! Command-line front end for binjar.

pub mod cli;
pub mod commands;
pub mod logging;
pub mod summary;
