use std::path::Path;

use serde_json::Value;

use crate::error::LoadError;
use crate::yaml;

/// A flow defined as a composition of other flows.
///
/// The configuration is kept as an opaque mapping and passed through to the
/// server as-is; only the addressing fields are read from it.
#[derive(Debug, Clone, PartialEq)]
pub struct CompoundFlow {
    /// The raw configuration mapping
    pub config: Value,
}

impl CompoundFlow {
    /// Wrap an already-parsed configuration
    pub fn new(config: Value) -> Self {
        CompoundFlow { config }
    }

    /// Load a compound flow from a YAML file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, LoadError> {
        yaml::load_yaml(path).map(CompoundFlow::new)
    }

    /// `metadata.author`, if present
    pub fn author(&self) -> Option<&str> {
        self.metadata_str("author")
    }

    /// `metadata.name`, if present
    pub fn name(&self) -> Option<&str> {
        self.metadata_str("name")
    }

    /// `metadata.flow_type`, if present
    pub fn flow_type(&self) -> Option<&str> {
        self.metadata_str("flow_type")
    }

    /// Top-level `version`, if present
    pub fn version(&self) -> Option<&str> {
        self.config.get("version").and_then(Value::as_str)
    }

    fn metadata_str(&self, key: &str) -> Option<&str> {
        self.config
            .get("metadata")
            .and_then(|metadata| metadata.get(key))
            .and_then(Value::as_str)
    }
}

impl From<Value> for CompoundFlow {
    fn from(config: Value) -> Self {
        CompoundFlow::new(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_accessors() {
        let flow = CompoundFlow::new(json!({
            "version": "0.2.0",
            "metadata": {"author": "acme", "name": "pipeline", "flow_type": "compound"},
            "workflow": {"steps": []}
        }));

        assert_eq!(flow.author(), Some("acme"));
        assert_eq!(flow.name(), Some("pipeline"));
        assert_eq!(flow.flow_type(), Some("compound"));
        assert_eq!(flow.version(), Some("0.2.0"));
    }

    #[test]
    fn test_missing_fields() {
        let flow = CompoundFlow::new(json!({"workflow": {}}));
        assert_eq!(flow.author(), None);
        assert_eq!(flow.version(), None);
    }

    #[test]
    fn test_load_keeps_config_verbatim() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("compound.yaml");
        std::fs::write(&path, "metadata:\n  name: chain\nflows:\n  - a/b\n  - c/d\n").unwrap();

        let flow = CompoundFlow::load(&path).unwrap();
        assert_eq!(flow.config, json!({"metadata": {"name": "chain"}, "flows": ["a/b", "c/d"]}));
    }
}
