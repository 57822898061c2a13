//! Root CLI structure for mocap-rs

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "mocap-rs")]
#[command(about = "Command-line tools for BVH motion-capture files", long_about = None)]
#[command(version)]
#[command(author)]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,

    /// Verbosity level (can be repeated for more detail)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    pub quiet: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// BVH skeleton and motion operations
    Bvh {
        #[command(subcommand)]
        command: crate::commands::bvh::BvhCommands,
    },

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}
