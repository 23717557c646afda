//! Shared plumbing for the `mira-deploy` and `mira-test-flow` binaries.

use std::path::Path;
use std::process::ExitCode;

use anyhow::{bail, Context, Result};
use mira_client::MiraClient;
use mira_flow::Flow;
use serde_json::{json, Map, Value};
use tracing::debug;
use tracing_subscriber::EnvFilter;

/// Flow file used when none is given
pub const DEFAULT_FLOW_FILE: &str = "flow.yaml";

/// Install a stderr subscriber filtered by `RUST_LOG` (default `warn`)
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    // A subscriber may already be installed when called from tests
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

/// Build a blocking client from `API_KEY` (and `.env`)
pub fn client_from_env() -> Result<MiraClient> {
    MiraClient::from_env().context("Failed to configure Mira client")
}

/// Load and validate the flow at `path`
pub fn load_flow(path: &Path) -> Result<Flow> {
    let flow = Flow::load(path)?;
    flow.validate()?;
    debug!(path = %path.display(), name = %flow.metadata.name, "Loaded flow");
    Ok(flow)
}

/// Parse the input argument; it must be a JSON object
pub fn parse_input(text: &str) -> Result<Value> {
    let value: Value = serde_json::from_str(text).context("Invalid JSON input")?;
    if !value.is_object() {
        bail!("Flow input must be a JSON object, got: {}", value);
    }
    Ok(value)
}

/// Machine readable failure report written to stderr
pub fn failure_report(error: &str, details: &anyhow::Error) -> Value {
    let mut report = Map::new();
    report.insert("error".to_string(), json!(error));
    report.insert("details".to_string(), json!(format!("{:#}", details)));
    Value::Object(report)
}

/// Write the failure report to stderr; the process should exit with the returned code
pub fn report_failure(error: &str, details: &anyhow::Error) -> ExitCode {
    eprintln!("{}", failure_report(error, details));
    ExitCode::from(1)
}
