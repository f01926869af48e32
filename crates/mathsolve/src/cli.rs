//! Command-line argument parsing.

use clap::{Parser, Subcommand};
use mathsolve::client::DEFAULT_SERVER;

/// Math problem solver backed by Google Gemini
#[derive(Parser)]
#[command(name = "mathsolve")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Subcommand (runs the server when omitted)
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run the HTTP API server
    Serve,

    /// Solve a problem directly with Gemini, without a server
    Solve {
        problem: String,
        /// Print the raw JSON response
        #[arg(long)]
        json: bool,
    },

    /// Ask a running server to solve a problem
    Ask {
        problem: String,
        /// Base URL of the server
        #[arg(long, default_value = DEFAULT_SERVER)]
        server: String,
        /// Print the raw JSON response
        #[arg(long)]
        json: bool,
    },

    /// List example problems
    Examples,
}
