use std::fmt;

use mira_flow::{validate_version, QualifiedName, ValidationError};
use serde::Deserialize;
use serde_json::{Map, Value};

/// A named, versioned prompt stored on the console
#[derive(Debug, Clone, PartialEq)]
pub struct Prompt {
    pub org: String,
    pub name: String,
    /// Semantic version, when known
    pub version: Option<String>,
    pub content: String,
    pub variables: Map<String, Value>,
    /// Server-side identifier; set once the prompt is created or fetched
    pub prompt_id: Option<String>,
}

impl Prompt {
    /// Create a prompt from an `org/name` address.
    ///
    /// A given version must be a semantic version.
    pub fn new(
        qualified_name: &str,
        content: impl Into<String>,
        version: Option<&str>,
        variables: Option<Map<String, Value>>,
    ) -> Result<Self, ValidationError> {
        let QualifiedName { org, name, .. } = QualifiedName::parse(qualified_name)?;
        if let Some(version) = version {
            validate_version(version)?;
        }

        Ok(Prompt {
            org,
            name,
            version: version.map(str::to_string),
            content: content.into(),
            variables: variables.unwrap_or_default(),
            prompt_id: None,
        })
    }
}

impl fmt::Display for Prompt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.version {
            Some(version) => write!(f, "{}/{}/{}", self.org, self.name, version),
            None => write!(f, "{}/{}", self.org, self.name),
        }
    }
}

/// Prompt as returned by `GET v1/prompts/{org}/{name}`
#[derive(Debug, Deserialize)]
pub(crate) struct PromptRecord {
    pub author_name: String,
    pub prompt_name: String,
    pub content: String,
    #[serde(default)]
    pub version: Option<String>,
    #[serde(default)]
    pub variables: Option<Map<String, Value>>,
    #[serde(default)]
    pub prompt_id: Value,
}

impl PromptRecord {
    pub fn into_prompt(self) -> Prompt {
        Prompt {
            org: self.author_name,
            name: self.prompt_name,
            version: self.version,
            content: self.content,
            variables: self.variables.unwrap_or_default(),
            prompt_id: id_to_string(&self.prompt_id),
        }
    }
}

/// One entry of `GET v1/prompts/{id}/versions`
#[derive(Debug, Deserialize)]
pub(crate) struct PromptVersionRecord {
    pub content: String,
    #[serde(default)]
    pub version: Option<String>,
    #[serde(default)]
    pub variables: Option<Map<String, Value>>,
}

/// Identifiers come back as strings or numbers
pub(crate) fn id_to_string(id: &Value) -> Option<String> {
    match id {
        Value::String(id) => Some(id.clone()),
        Value::Number(id) => Some(id.to_string()),
        _ => None,
    }
}
