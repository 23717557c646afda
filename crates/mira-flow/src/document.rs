use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::models::{deserialize_scalar, Input, Metadata, Model};

/// The on-disk and on-wire shape of a flow.
///
/// Every key is optional when reading; missing keys take the documented
/// defaults. Writing produces the keys in this order:
/// `version, metadata, inputs, output, model, prompt, readme[, dataset]`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FlowDocument {
    /// Semantic version of the flow (e.g. "1.0.0")
    #[serde(deserialize_with = "deserialize_scalar")]
    pub version: String,

    /// Descriptive metadata
    pub metadata: Metadata,

    /// Inputs keyed by name, in declaration order
    pub inputs: IndexMap<String, Input>,

    /// Output declaration
    pub output: OutputDefinition,

    /// Model selection
    pub model: Model,

    /// Prompt template with `{name}` placeholders
    pub prompt: String,

    /// Free-form documentation
    pub readme: String,

    /// Optional dataset reference
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dataset: Option<DatasetDefinition>,
}

impl Default for FlowDocument {
    fn default() -> Self {
        FlowDocument {
            version: default_version(),
            metadata: Metadata::default(),
            inputs: IndexMap::new(),
            output: OutputDefinition::default(),
            model: Model::default(),
            prompt: String::new(),
            readme: String::new(),
            dataset: None,
        }
    }
}

/// Output declaration of a flow
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputDefinition {
    /// Output name; flows always write "story" here
    pub name: String,

    /// Output type (e.g. "string")
    #[serde(rename = "type")]
    pub output_type: String,
}

impl Default for OutputDefinition {
    fn default() -> Self {
        OutputDefinition {
            name: OUTPUT_NAME.to_string(),
            output_type: "string".to_string(),
        }
    }
}

/// Dataset reference of a flow
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatasetDefinition {
    /// Dataset source identifier
    #[serde(default)]
    pub source: Option<String>,
}

/// Name written to `output.name` for every flow
pub const OUTPUT_NAME: &str = "story";

/// Version given to flows that do not declare one
pub const DEFAULT_VERSION: &str = "1.0.0";

fn default_version() -> String {
    DEFAULT_VERSION.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_empty_mapping_uses_defaults() {
        let doc: FlowDocument = serde_yaml::from_str("{}").unwrap();
        assert_eq!(doc, FlowDocument::default());
    }

    #[test]
    fn test_null_dataset_is_none() {
        let doc: FlowDocument = serde_yaml::from_str("dataset: null\n").unwrap();
        assert_eq!(doc.dataset, None);
    }

    #[test]
    fn test_key_order_on_write() {
        let mut doc = FlowDocument::default();
        doc.dataset = Some(DatasetDefinition {
            source: Some("acme/books".to_string()),
        });

        let yaml = serde_yaml::to_string(&doc).unwrap();
        let keys: Vec<&str> = yaml
            .lines()
            .filter(|line| !line.starts_with(' ') && line.contains(':'))
            .map(|line| line.split(':').next().unwrap())
            .collect();

        assert_eq!(
            keys,
            vec!["version", "metadata", "inputs", "output", "model", "prompt", "readme", "dataset"]
        );
    }
}
