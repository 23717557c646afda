use serde::{Deserialize, Serialize};

/// Descriptive attributes of a flow.
///
/// `flow_type` is read from flow documents but never written back; the
/// serialized shape is `name, description, author, private, tags`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Metadata {
    /// Flow name
    pub name: String,

    /// Human-readable description
    pub description: String,

    /// Author (organisation) that owns the flow
    pub author: String,

    /// Flow kind, e.g. "primitive"
    #[serde(skip_serializing)]
    pub flow_type: String,

    /// Whether the flow is private on the server
    pub private: bool,

    /// Tags in insertion order, without duplicates when added through `add_tag`
    pub tags: Vec<String>,
}

impl Metadata {
    /// Create metadata for a named flow with all other fields defaulted
    pub fn named(name: impl Into<String>) -> Self {
        Metadata {
            name: name.into(),
            ..Metadata::default()
        }
    }

    /// Add a tag unless it is already present
    pub fn add_tag(&mut self, tag: impl Into<String>) -> &mut Self {
        let tag = tag.into();
        if !self.tags.contains(&tag) {
            self.tags.push(tag);
        }
        self
    }

    /// Remove a tag if present
    pub fn remove_tag(&mut self, tag: &str) -> &mut Self {
        self.tags.retain(|existing| existing != tag);
        self
    }
}

impl Default for Metadata {
    fn default() -> Self {
        Metadata {
            name: "unnamed-flow".to_string(),
            description: String::new(),
            author: String::new(),
            flow_type: "primitive".to_string(),
            private: false,
            tags: Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_tag_is_idempotent() {
        let mut metadata = Metadata::named("story-generator");
        metadata.add_tag("creative").add_tag("fiction").add_tag("creative");

        assert_eq!(metadata.tags, vec!["creative", "fiction"]);
    }

    #[test]
    fn test_remove_tag() {
        let mut metadata = Metadata::named("story-generator");
        metadata.add_tag("a").add_tag("b").remove_tag("a").remove_tag("missing");

        assert_eq!(metadata.tags, vec!["b"]);
    }

    #[test]
    fn test_load_defaults() {
        let metadata: Metadata = serde_yaml::from_str("author: acme\n").unwrap();

        assert_eq!(metadata.name, "unnamed-flow");
        assert_eq!(metadata.author, "acme");
        assert_eq!(metadata.flow_type, "primitive");
        assert!(!metadata.private);
        assert!(metadata.tags.is_empty());
    }

    #[test]
    fn test_flow_type_is_not_serialized() {
        let yaml = serde_yaml::to_string(&Metadata::named("x")).unwrap();
        assert!(!yaml.contains("flow_type"));
    }
}
