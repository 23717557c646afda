use std::collections::BTreeSet;
use std::error::Error;
use std::fmt;

use crate::flow::Flow;

mod prompt;
mod required;

pub use prompt::{extract_prompt_variables, render_template, validate_prompt_variables};
pub(crate) use prompt::format_names;

/// Represents a validation error raised by the flow model
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    /// Error code (should be a constant identifier)
    pub code: &'static str,

    /// Human-readable error message
    pub message: String,

    /// Template variables the error is about (missing or unknown), if any
    pub variables: BTreeSet<String>,
}

impl ValidationError {
    /// Create a validation error that is not about specific variables
    pub fn new(code: &'static str, message: impl Into<String>) -> Self {
        ValidationError {
            code,
            message: message.into(),
            variables: BTreeSet::new(),
        }
    }

    /// Attach the offending variable names
    pub fn with_variables<I, S>(mut self, variables: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.variables = variables.into_iter().map(Into::into).collect();
        self
    }

    /// Prefix the message with context, keeping code and variables
    pub fn context(mut self, context: &str) -> Self {
        self.message = format!("{}: {}", context, self.message);
        self
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.code, self.message)
    }
}

impl Error for ValidationError {}

/// Validation error codes
pub mod error_codes {
    /// A required input is never referenced by the prompt template
    pub const UNUSED_REQUIRED_INPUT: &str = "ERR_FLOW_VALIDATION_UNUSED_REQUIRED_INPUT";

    /// The flow has no name
    pub const MISSING_NAME: &str = "ERR_FLOW_VALIDATION_MISSING_NAME";

    /// The flow has no prompt template
    pub const MISSING_PROMPT: &str = "ERR_FLOW_VALIDATION_MISSING_PROMPT";

    /// Required variables were not supplied when rendering
    pub const MISSING_VARIABLES: &str = "ERR_FLOW_VALIDATION_MISSING_VARIABLES";

    /// The template references a variable that was not supplied
    pub const UNKNOWN_VARIABLE: &str = "ERR_FLOW_VALIDATION_UNKNOWN_VARIABLE";

    /// The template has unbalanced braces
    pub const MALFORMED_TEMPLATE: &str = "ERR_FLOW_VALIDATION_MALFORMED_TEMPLATE";

    /// A qualified name is not of the form `org/name[/version]`
    pub const INVALID_NAME: &str = "ERR_FLOW_VALIDATION_INVALID_NAME";

    /// A version string is not a semantic version
    pub const INVALID_VERSION: &str = "ERR_FLOW_VALIDATION_INVALID_VERSION";
}

/// A check over one aspect of a flow
pub trait Validator {
    /// Validate the flow, returning the first violation found
    fn validate(&self, flow: &Flow) -> Result<(), ValidationError>;
}

/// Checks that every required input is referenced by the prompt
struct PromptVariableValidator;

impl Validator for PromptVariableValidator {
    fn validate(&self, flow: &Flow) -> Result<(), ValidationError> {
        validate_prompt_variables(&flow.prompt, &flow.inputs)
    }
}

/// Validate a flow, stopping at the first failing check.
///
/// Prompt variables are checked before the required fields.
pub fn validate_flow(flow: &Flow) -> Result<(), ValidationError> {
    let validators: [&dyn Validator; 2] = [&PromptVariableValidator, &required::RequiredFieldValidator];

    for validator in validators {
        validator
            .validate(flow)
            .map_err(|err| err.context("Flow validation failed"))?;
    }

    Ok(())
}
