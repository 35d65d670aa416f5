//! CLI argument parsing for progressstore

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "ps")]
#[command(author, version, about = "Lesson-completion progress tracker", long_about = None)]
pub struct Cli {
    /// Path to config file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Mark a knowledge item as completed
    Mark {
        /// Item id
        #[arg(required = true)]
        id: String,
    },

    /// Remove a knowledge item's completion
    Unmark {
        /// Item id
        #[arg(required = true)]
        id: String,
    },

    /// List completed item ids
    List,

    /// Show completion count and percentage
    Stats,

    /// Clear all progress
    Reset,

    /// Export progress as a JSON snapshot
    Export {
        /// Write to this file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Import progress from a JSON snapshot
    Import {
        /// Snapshot file to import
        #[arg(required = true)]
        file: PathBuf,
    },
}
