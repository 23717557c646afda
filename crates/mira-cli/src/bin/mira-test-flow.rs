use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::error::ErrorKind;
use clap::Parser;
use serde_json::Value;

use mira_cli::{client_from_env, init_tracing, load_flow, parse_input, report_failure, DEFAULT_FLOW_FILE};

/// Run the local flow file against the Mira console with the given input
#[derive(Debug, Parser)]
#[command(name = "mira-test-flow", version, about)]
struct Args {
    /// Flow input as a JSON object, e.g. '{"mood": "happy"}'
    input: String,

    /// Flow file to test
    #[arg(long, default_value = DEFAULT_FLOW_FILE)]
    flow: PathBuf,
}

fn run(args: &Args) -> Result<Value> {
    let input = parse_input(&args.input)?;
    let client = client_from_env()?;
    let flow = load_flow(&args.flow)
        .with_context(|| format!("Failed to load flow from {}", args.flow.display()))?;

    client.flow().test(&flow, &input, None).context("Flow test failed")
}

fn main() -> ExitCode {
    init_tracing();

    let args = match Args::try_parse() {
        Ok(args) => args,
        Err(err) if matches!(err.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => err.exit(),
        Err(err) => {
            let details = anyhow::Error::msg(err.to_string().trim().to_string());
            return report_failure("Usage: mira-test-flow '<json object>'", &details);
        }
    };

    match run(&args) {
        Ok(response) => {
            println!("{}", response);
            ExitCode::SUCCESS
        }
        Err(err) => report_failure(&err.to_string(), &err),
    }
}
