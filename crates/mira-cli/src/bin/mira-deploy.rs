use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use serde_json::Value;
use tracing::info;

use mira_cli::{client_from_env, init_tracing, load_flow, report_failure, DEFAULT_FLOW_FILE};

/// Deploy a flow to the Mira console
#[derive(Debug, Parser)]
#[command(name = "mira-deploy", version, about)]
struct Args {
    /// Flow file to deploy
    #[arg(long, default_value = DEFAULT_FLOW_FILE)]
    flow: PathBuf,
}

fn run(args: &Args) -> Result<Value> {
    let client = client_from_env()?;
    let flow = load_flow(&args.flow)
        .with_context(|| format!("Failed to load flow from {}", args.flow.display()))?;

    info!(name = %flow.metadata.name, version = %flow.version, "Deploying flow");
    client.flow().deploy(&flow).context("Deployment failed")
}

fn main() -> ExitCode {
    init_tracing();
    let args = Args::parse();

    match run(&args) {
        Ok(response) => {
            println!("{}", response);
            ExitCode::SUCCESS
        }
        Err(err) => report_failure(&err.to_string(), &err),
    }
}
