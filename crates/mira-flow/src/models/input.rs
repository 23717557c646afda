use serde::{Deserialize, Serialize};

use super::deserialize_optional_scalar;

/// One named parameter a flow accepts.
///
/// The name is the key in the owning flow's input map. Unknown keys are
/// rejected when loading.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Input {
    /// Declared type of the value (e.g. "string")
    #[serde(rename = "type")]
    pub input_type: String,

    /// Human-readable description
    pub description: String,

    /// Whether callers must supply this input (defaults to true)
    #[serde(default = "default_true")]
    pub required: bool,

    /// Optional example value
    #[serde(default, deserialize_with = "deserialize_optional_scalar")]
    pub example: Option<String>,
}

impl Input {
    /// Create a required input with no example
    pub fn new(input_type: impl Into<String>, description: impl Into<String>) -> Self {
        Input {
            input_type: input_type.into(),
            description: description.into(),
            required: true,
            example: None,
        }
    }

    /// Builder form of [`Input::make_optional`]
    pub fn optional(mut self) -> Self {
        self.required = false;
        self
    }

    /// Builder form of [`Input::set_example`]
    pub fn with_example(mut self, example: impl Into<String>) -> Self {
        self.example = Some(example.into());
        self
    }

    /// Make this input optional
    pub fn make_optional(&mut self) -> &mut Self {
        self.required = false;
        self
    }

    /// Set an example value
    pub fn set_example(&mut self, example: impl Into<String>) -> &mut Self {
        self.example = Some(example.into());
        self
    }
}

/// Default value for required (true)
fn default_true() -> bool {
    true
}
