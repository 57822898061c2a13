//! mocap-rs library
//!
//! Command definitions and terminal rendering helpers behind the `mocap-rs`
//! binary.

pub mod cli;
pub mod commands;
pub mod utils;
