//! mathsolve - math problem solver server and terminal client

mod cli;

use anyhow::{bail, Context, Result};
use clap::Parser;
use cli::{Cli, Commands};
use mathsolve::api::SolveResponse;
use mathsolve::client::SolverClient;
use mathsolve::config::Config;
use mathsolve::fallback::SAMPLE_PROBLEMS;
use mathsolve::server;
use mathsolve::solver::Solver;
use mathsolve::steps::render_solution;
use tracing::warn;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    configure_tracing();

    match cli.command.unwrap_or(Commands::Serve) {
        Commands::Serve => server::run(load_config()?).await,
        Commands::Solve { problem, json } => {
            if problem.trim().is_empty() {
                bail!("please enter a math problem");
            }
            let config = load_config()?;
            let Some(caller) = server::build_caller(&config)? else {
                bail!("GEMINI_API_KEY is not set");
            };
            let resp = Solver::new(Some(caller))
                .solve(&problem)
                .await
                .context("failed to solve math problem")?;
            print_solution(&resp, json)
        }
        Commands::Ask {
            problem,
            server,
            json,
        } => {
            let client = SolverClient::new(server)?;
            if !client.health().await {
                warn!(server = client.base_url(), "server health check failed");
            }
            let (resp, demo) = client.solve_or_demo(&problem).await?;
            if demo {
                warn!(
                    server = client.base_url(),
                    "could not reach the server, showing a demo solution"
                );
            }
            print_solution(&resp, json)
        }
        Commands::Examples => {
            for (i, problem) in SAMPLE_PROBLEMS.iter().enumerate() {
                println!("{}. {}", i + 1, problem);
            }
            Ok(())
        }
    }
}

fn load_config() -> Result<Config> {
    Config::from_env().context("invalid configuration")
}

fn print_solution(resp: &SolveResponse, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(resp)?);
    } else {
        println!("{}", render_solution(resp));
    }
    Ok(())
}

fn configure_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,tower_http=info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}
