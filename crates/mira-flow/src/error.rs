use std::error::Error as StdError;
use std::fmt;

use thiserror::Error;

use crate::validation::ValidationError;

/// Boxed cause carried by a [`LoadError`]
pub type BoxedCause = Box<dyn StdError + Send + Sync>;

/// Failure to read, decode, or write a flow configuration
#[derive(Debug)]
pub struct LoadError {
    /// Human-readable message, already including the underlying cause
    pub message: String,

    /// The underlying cause, when there is one
    pub source: Option<BoxedCause>,
}

impl LoadError {
    /// Create a load error without an underlying cause
    pub fn new(message: impl Into<String>) -> Self {
        LoadError {
            message: message.into(),
            source: None,
        }
    }

    /// Create a load error whose message is `"<context>: <cause>"`
    pub fn wrap<E>(context: impl fmt::Display, cause: E) -> Self
    where
        E: Into<BoxedCause>,
    {
        let cause = cause.into();
        LoadError {
            message: format!("{}: {}", context, cause),
            source: Some(cause),
        }
    }
}

impl fmt::Display for LoadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

impl StdError for LoadError {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        self.source
            .as_deref()
            .map(|cause| cause as &(dyn StdError + 'static))
    }
}

/// All errors produced by the flow model
#[derive(Error, Debug)]
pub enum FlowError {
    /// Reading, decoding, or writing a flow failed
    #[error("Load error: {0}")]
    Load(#[from] LoadError),

    /// Flow content violates one of its invariants
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

impl FlowError {
    /// Get the error code for this error
    pub fn error_code(&self) -> &'static str {
        match self {
            FlowError::Load(_) => "ERR_FLOW_LOAD",
            FlowError::Validation(err) => err.code,
        }
    }
}
