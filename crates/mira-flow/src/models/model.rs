use serde::{Deserialize, Serialize};

/// The model a flow runs against
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Model {
    /// Model provider (e.g. "tric", "anthropic")
    #[serde(default = "default_provider")]
    pub provider: String,

    /// Model name within the provider
    #[serde(default = "default_model_name")]
    pub name: String,
}

impl Model {
    /// Create a model from provider and name
    pub fn new(provider: impl Into<String>, name: impl Into<String>) -> Self {
        Model {
            provider: provider.into(),
            name: name.into(),
        }
    }

    /// A Tric model, e.g. `Model::tric("llama")`
    pub fn tric(model_name: impl Into<String>) -> Self {
        Model::new("tric", model_name)
    }

    /// An Anthropic model, e.g. `Model::anthropic("claude")`
    pub fn anthropic(model_name: impl Into<String>) -> Self {
        Model::new("anthropic", model_name)
    }
}

impl Default for Model {
    fn default() -> Self {
        Model::tric(default_model_name())
    }
}

fn default_provider() -> String {
    "tric".to_string()
}

fn default_model_name() -> String {
    "llama".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_named_constructors() {
        assert_eq!(Model::tric("llama"), Model::new("tric", "llama"));
        assert_eq!(Model::anthropic("claude").provider, "anthropic");
        assert_eq!(Model::default(), Model::tric("llama"));
    }

    #[test]
    fn test_partial_model_uses_defaults() {
        let model: Model = serde_yaml::from_str("provider: anthropic\n").unwrap();
        assert_eq!(model, Model::new("anthropic", "llama"));
    }
}
