//! CLI argument parsing for tutorchat

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::prompts::PromptMode;

#[derive(Parser, Debug)]
#[command(name = "tc")]
#[command(author, version, about = "Chat with the mathtutor study assistant", long_about = None)]
pub struct Cli {
    /// Path to config file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Ask the assistant a question
    Ask {
        /// The question to ask
        #[arg(required = true)]
        question: String,

        /// Prompt mode (knowledge, homework, suggestion)
        #[arg(short, long, value_enum, default_value = "knowledge")]
        mode: ModeArg,

        /// Stream the reply fragment by fragment
        #[arg(short, long)]
        stream: bool,

        /// JSON file holding the knowledge-node list
        #[arg(long)]
        nodes_file: Option<PathBuf>,

        /// Id of the node to build study context from (requires --nodes-file)
        #[arg(long)]
        node: Option<String>,
    },
}

/// Clap-facing mirror of [`PromptMode`]
#[derive(Debug, Clone, Copy, clap::ValueEnum)]
pub enum ModeArg {
    Knowledge,
    Homework,
    Suggestion,
}

impl From<ModeArg> for PromptMode {
    fn from(arg: ModeArg) -> Self {
        match arg {
            ModeArg::Knowledge => PromptMode::Knowledge,
            ModeArg::Homework => PromptMode::Homework,
            ModeArg::Suggestion => PromptMode::Suggestion,
        }
    }
}
