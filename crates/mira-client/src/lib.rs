//! # Mira Client
//!
//! HTTP client for the Mira console: test, deploy and execute flows, manage
//! knowledge datasets, and store versioned prompts.
//!
//! [`MiraClient`] sends requests with a blocking transport and
//! [`AsyncMiraClient`] with a `tokio`-based one. Both authenticate with a
//! static API key sent in the `MiraAuthorization` header and return the same
//! [`ClientError`] on failure.
//!
//! ## Example
//!
//! ```no_run
//! use mira_client::{ClientConfig, MiraClient};
//! use mira_flow::Flow;
//! use serde_json::json;
//!
//! # fn main() -> mira_client::Result<()> {
//! let client = MiraClient::new(ClientConfig::new("my-api-key"))?;
//!
//! let flow = Flow::load("flow.yaml")?;
//! let response = client.flow().test(&flow, &json!({"topic": "rust"}), None)?;
//! println!("{}", response);
//! # Ok(())
//! # }
//! ```

mod async_console;
mod client;
mod composio;
mod config;
mod console;
mod error;
mod prompt;
mod request;

pub mod operations;

pub use async_console::AsyncConsole;
pub use client::{AsyncMiraClient, MiraClient};
pub use composio::ComposioConfig;
pub use config::{ClientConfig, API_KEY_ENV, BASE_URL_ENV, DEFAULT_BASE_URL};
pub use console::Console;
pub use error::{ClientError, Result};
pub use operations::{
    AsyncFlowOperations, AsyncKnowledgeOperations, AsyncPromptOperations, FlowOperations,
    KnowledgeOperations, KnowledgeSource, PromptOperations,
};
pub use prompt::Prompt;
pub use request::{ApiRequest, FileUpload, AUTH_HEADER};
