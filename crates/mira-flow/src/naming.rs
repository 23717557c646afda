use std::fmt;
use std::str::FromStr;

use crate::validation::{error_codes, ValidationError};

/// A backend address of the form `[@]org/name[/version]`
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct QualifiedName {
    /// Owning organisation (author), without a leading `@`
    pub org: String,

    /// Flow, prompt, or dataset name
    pub name: String,

    /// Version, when a third segment is given
    pub version: Option<String>,
}

impl QualifiedName {
    /// Parse `org/name` or `org/name/version`.
    ///
    /// Leading `@` characters are stripped from the org. When more than two
    /// segments are given the last one is the version.
    pub fn parse(value: &str) -> Result<Self, ValidationError> {
        let parts: Vec<&str> = value.split('/').collect();
        if parts.len() < 2 {
            return Err(ValidationError::new(
                error_codes::INVALID_NAME,
                format!("Invalid name: {}", value),
            ));
        }

        let version = if parts.len() > 2 {
            parts.last().map(|version| version.to_string())
        } else {
            None
        };

        Ok(QualifiedName {
            org: parts[0].trim_start_matches('@').to_string(),
            name: parts[1].to_string(),
            version,
        })
    }
}

impl FromStr for QualifiedName {
    type Err = ValidationError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        QualifiedName::parse(value)
    }
}

impl fmt::Display for QualifiedName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.version {
            Some(version) => write!(f, "{}/{}/{}", self.org, self.name, version),
            None => write!(f, "{}/{}", self.org, self.name),
        }
    }
}

/// Strip a leading `@` from an author handle (`"@acme"` -> `"acme"`)
pub fn normalize_author(author: &str) -> &str {
    match author.strip_prefix('@') {
        Some(stripped) if !stripped.is_empty() => stripped,
        _ => author,
    }
}

/// Check that `version` is a semantic version
pub fn validate_version(version: &str) -> Result<(), ValidationError> {
    semver::Version::parse(version).map(|_| ()).map_err(|err| {
        ValidationError::new(
            error_codes::INVALID_VERSION,
            format!("Invalid semantic version '{}': {}", version, err),
        )
    })
}
