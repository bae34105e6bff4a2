//! twitchbot command-line library - configuration and logging for the `twitchbot` binary.
//!
//! Separated from main.rs so the config layer can be tested.

pub mod config;
pub mod logging;
