//! # Mira Flow
//!
//! The flow configuration model of the Mira SDK: a flow is a named, versioned
//! prompt template with typed inputs, a model selection, and an optional
//! dataset reference. This crate loads flows from YAML, validates them
//! locally, renders their prompts, and writes them back.
//!
//! ## Features
//!
//! * Strongly typed flow documents with per-field defaults
//! * Cross-checking of prompt placeholders against declared inputs
//! * Order-preserving YAML round-trips
//! * Compound flows passed through as opaque configuration
//!
//! ## Example
//!
//! ```
//! use mira_flow::Flow;
//!
//! let mut flow = Flow::new("story-generator");
//! flow.add_input("character", "Main character")
//!     .add_optional_input("genre", "Story genre")
//!     .set_prompt("Write a story about {character} in {genre}");
//!
//! assert!(flow.validate().is_ok());
//!
//! let prompt = flow
//!     .render_prompt([("character", "a robot"), ("genre", "noir")])
//!     .unwrap();
//! assert_eq!(prompt, "Write a story about a robot in noir");
//! ```

mod compound;
mod definition;
mod document;
mod error;
mod flow;
mod naming;

pub mod models;
pub mod validation;
pub mod yaml;

pub use compound::CompoundFlow;
pub use definition::{DeployTarget, FlowDefinition};
pub use document::{DatasetDefinition, FlowDocument, OutputDefinition, DEFAULT_VERSION, OUTPUT_NAME};
pub use error::{FlowError, LoadError};
pub use flow::{Flow, FlowSource};
pub use models::{Input, Metadata, Model};
pub use naming::{normalize_author, validate_version, QualifiedName};
pub use validation::{error_codes, validate_prompt_variables, ValidationError};
pub use yaml::{load_yaml, save_yaml};

/// Returns a version string for the Mira flow crate
///
/// # Examples
///
/// ```
/// use mira_flow::version;
///
/// let ver = version();
/// assert!(ver.starts_with("0."));
/// ```
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
