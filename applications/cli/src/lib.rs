//! Riff Player headless front end
//!
//! Library half of the `riff` binary: configuration, the simulated audio
//! driver and the command implementations.

pub mod commands;
pub mod config;
pub mod driver;
pub mod error;
