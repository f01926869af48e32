//! Solves math problems by prompting Gemini, over HTTP or from the terminal.

pub mod api;
pub mod client;
pub mod config;
pub mod cors;
pub mod error;
pub mod extract;
pub mod fallback;
pub mod prompts;
pub mod routes;
pub mod server;
pub mod solver;
pub mod steps;

pub use config::Config;
pub use server::{router, AppState};
pub use solver::{SolveError, Solver};
