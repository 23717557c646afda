use std::collections::{BTreeSet, HashMap};
use std::fmt::Write as _;
use std::path::{Path, PathBuf};

use indexmap::IndexMap;
use tracing::debug;

use crate::document::{DatasetDefinition, FlowDocument, OutputDefinition, DEFAULT_VERSION};
use crate::error::LoadError;
use crate::models::{Input, Metadata, Model};
use crate::validation::{self, error_codes, ValidationError};
use crate::yaml;

/// Where a flow is loaded from
#[derive(Debug, Clone)]
pub enum FlowSource {
    /// A YAML file on disk
    Path(PathBuf),

    /// An already-parsed mapping, e.g. the `data` of a server response
    Mapping(serde_json::Value),

    /// An already-decoded document
    Document(FlowDocument),
}

impl FlowSource {
    /// An empty path or an empty (or null) mapping
    pub fn is_empty(&self) -> bool {
        match self {
            FlowSource::Path(path) => path.as_os_str().is_empty(),
            FlowSource::Mapping(serde_json::Value::Object(map)) => map.is_empty(),
            FlowSource::Mapping(mapping) => mapping.is_null(),
            FlowSource::Document(_) => false,
        }
    }
}

impl From<&str> for FlowSource {
    fn from(path: &str) -> Self {
        FlowSource::Path(PathBuf::from(path))
    }
}

impl From<String> for FlowSource {
    fn from(path: String) -> Self {
        FlowSource::Path(PathBuf::from(path))
    }
}

impl From<&Path> for FlowSource {
    fn from(path: &Path) -> Self {
        FlowSource::Path(path.to_path_buf())
    }
}

impl From<PathBuf> for FlowSource {
    fn from(path: PathBuf) -> Self {
        FlowSource::Path(path)
    }
}

impl From<serde_json::Value> for FlowSource {
    fn from(mapping: serde_json::Value) -> Self {
        FlowSource::Mapping(mapping)
    }
}

impl From<FlowDocument> for FlowSource {
    fn from(document: FlowDocument) -> Self {
        FlowSource::Document(document)
    }
}

/// A named, versioned prompt flow.
///
/// Mutators work in place and return `&mut Self` so calls can be chained:
///
/// ```
/// use mira_flow::Flow;
///
/// let mut flow = Flow::new("story-generator");
/// flow.add_input("character", "Main character")
///     .set_prompt("Write a story about {character}")
///     .set_model("anthropic", "claude");
///
/// assert!(flow.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Flow {
    /// Semantic version of the flow
    pub version: String,

    /// Descriptive metadata
    pub metadata: Metadata,

    /// Inputs keyed by name, in insertion order
    pub inputs: IndexMap<String, Input>,

    /// Declared output type
    pub output_type: String,

    /// Model selection
    pub model: Model,

    /// Optional dataset source identifier
    pub dataset_source: Option<String>,

    /// Prompt template with `{name}` placeholders
    pub prompt: String,

    /// Free-form documentation
    pub readme: String,
}

impl Flow {
    /// Create an empty flow with the given name
    pub fn new(name: impl Into<String>) -> Self {
        Flow {
            version: DEFAULT_VERSION.to_string(),
            metadata: Metadata::named(name),
            inputs: IndexMap::new(),
            output_type: OutputDefinition::default().output_type,
            model: Model::default(),
            dataset_source: None,
            prompt: String::new(),
            readme: String::new(),
        }
    }

    /// Build a flow from an optional name and an optional source.
    ///
    /// With a source, every field comes from it (missing keys take their
    /// defaults) and `name` is ignored. Without one, or with an empty path or
    /// mapping, an empty flow named `name` (or `"unnamed-flow"`) is returned.
    pub fn construct(name: Option<&str>, source: Option<FlowSource>) -> Result<Self, LoadError> {
        match source.filter(|source| !source.is_empty()) {
            Some(source) => Self::from_source(source),
            None => Ok(Self::new(name.unwrap_or("unnamed-flow"))),
        }
    }

    /// Load a flow from a file path, a parsed mapping, or a document
    pub fn from_source(source: impl Into<FlowSource>) -> Result<Self, LoadError> {
        let document = match source.into() {
            FlowSource::Path(path) => yaml::load_yaml::<FlowDocument>(&path),
            FlowSource::Mapping(mapping) => serde_json::from_value::<FlowDocument>(mapping)
                .map_err(|err| LoadError::wrap("Invalid flow mapping", err)),
            FlowSource::Document(document) => Ok(document),
        }
        .map_err(|err| LoadError::wrap("Failed to load flow configuration", err))?;

        Ok(Self::from_document(document))
    }

    /// Load a flow from a YAML file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, LoadError> {
        Self::from_source(path.as_ref())
    }

    /// Build a flow from a decoded document
    pub fn from_document(document: FlowDocument) -> Self {
        Flow {
            version: document.version,
            metadata: document.metadata,
            inputs: document.inputs,
            output_type: document.output.output_type,
            model: document.model,
            dataset_source: document.dataset.and_then(|dataset| dataset.source),
            prompt: document.prompt,
            readme: document.readme,
        }
    }

    /// Add a required string input, replacing any input with the same name
    pub fn add_input(&mut self, name: impl Into<String>, description: impl Into<String>) -> &mut Self {
        self.insert_input(name, Input::new("string", description))
    }

    /// Add an optional string input, replacing any input with the same name
    pub fn add_optional_input(
        &mut self,
        name: impl Into<String>,
        description: impl Into<String>,
    ) -> &mut Self {
        self.insert_input(name, Input::new("string", description).optional())
    }

    /// Insert a fully specified input, replacing any input with the same name
    pub fn insert_input(&mut self, name: impl Into<String>, input: Input) -> &mut Self {
        self.inputs.insert(name.into(), input);
        self
    }

    /// Remove an input; absent names are ignored
    pub fn remove_input(&mut self, name: &str) -> &mut Self {
        self.inputs.shift_remove(name);
        self
    }

    /// Replace the prompt template
    pub fn set_prompt(&mut self, prompt: impl Into<String>) -> &mut Self {
        self.prompt = prompt.into();
        self
    }

    /// Replace the model selection
    pub fn set_model(&mut self, provider: impl Into<String>, name: impl Into<String>) -> &mut Self {
        self.model = Model::new(provider, name);
        self
    }

    /// Replace the dataset source
    pub fn set_dataset(&mut self, source: impl Into<String>) -> &mut Self {
        self.dataset_source = Some(source.into());
        self
    }

    /// Validate the flow.
    ///
    /// Returns `Ok(true)` when every check passes. Nothing is cached; each
    /// call checks the current field values.
    pub fn validate(&self) -> Result<bool, ValidationError> {
        validation::validate_flow(self)?;
        Ok(true)
    }

    /// Render the prompt template with the supplied values.
    ///
    /// Required inputs are checked first; the error then carries exactly the
    /// missing names. A placeholder with no supplied value (e.g. an optional
    /// input left out) fails afterwards during substitution.
    pub fn render_prompt<I, K, V>(&self, values: I) -> Result<String, ValidationError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let values: HashMap<String, String> = values
            .into_iter()
            .map(|(key, value)| (key.into(), value.into()))
            .collect();

        let missing: BTreeSet<&str> = self
            .inputs
            .iter()
            .filter(|(name, input)| input.required && !values.contains_key(name.as_str()))
            .map(|(name, _)| name.as_str())
            .collect();

        if !missing.is_empty() {
            return Err(ValidationError::new(
                error_codes::MISSING_VARIABLES,
                format!(
                    "Missing required variables: {}",
                    validation::format_names(&missing)
                ),
            )
            .with_variables(missing));
        }

        validation::render_template(&self.prompt, &values)
    }

    /// Convert the flow to its document form
    pub fn to_document(&self) -> FlowDocument {
        FlowDocument {
            version: self.version.clone(),
            metadata: self.metadata.clone(),
            inputs: self.inputs.clone(),
            output: OutputDefinition {
                output_type: self.output_type.clone(),
                ..OutputDefinition::default()
            },
            model: self.model.clone(),
            prompt: self.prompt.clone(),
            readme: self.readme.clone(),
            dataset: self
                .dataset_source
                .as_ref()
                .filter(|source| !source.is_empty())
                .map(|source| DatasetDefinition {
                    source: Some(source.clone()),
                }),
        }
    }

    /// Convert the flow to a JSON mapping, as sent to the server
    pub fn to_dict(&self) -> serde_json::Value {
        serde_json::to_value(self.to_document())
            .expect("FlowDocument holds only strings, bools, and string-keyed maps")
    }

    /// Save the flow as YAML
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), LoadError> {
        yaml::save_yaml(&self.to_document(), path)
    }

    /// Human-readable description of the flow
    pub fn describe(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "Flow: {}", self.metadata.name);
        let _ = writeln!(out, "Description: {}", self.metadata.description);
        let _ = writeln!(out, "Author: {}", self.metadata.author);
        let _ = writeln!(out, "Tags: {}", self.metadata.tags.join(", "));
        let _ = writeln!(out, "\nInputs:");

        for (name, input) in &self.inputs {
            let required = if input.required { "(required)" } else { "(optional)" };
            let example = input
                .example
                .as_ref()
                .filter(|example| !example.is_empty())
                .map(|example| format!(" (example: {})", example))
                .unwrap_or_default();
            let _ = writeln!(out, "  - {} {}: {}{}", name, required, input.description, example);
        }

        let _ = writeln!(out, "\nModel: {}/{}", self.model.provider, self.model.name);
        let _ = writeln!(
            out,
            "Dataset source: {}",
            self.dataset_source.as_deref().unwrap_or("None")
        );
        let _ = writeln!(out, "\nPrompt:\n{}", self.prompt);
        let _ = write!(out, "\nReadme:\n{}", self.readme);
        out
    }

    /// Copy the flow by round-tripping it through its mapping form.
    ///
    /// `author` and `flow_name` are accepted for API compatibility but do not
    /// change the copy; it keeps this flow's metadata.
    pub fn clone_as(&self, author: &str, flow_name: &str) -> Result<Flow, LoadError> {
        debug!(author, flow_name, source = %self.metadata.name, "Cloning flow");
        Flow::from_source(self.to_dict())
    }
}

impl Default for Flow {
    fn default() -> Self {
        Flow::new("unnamed-flow")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn story_flow() -> Flow {
        let mut flow = Flow::new("story-generator");
        flow.add_input("character", "Main character")
            .add_optional_input("genre", "Story genre")
            .set_prompt("Write a story about {character} in {genre}");
        flow
    }

    #[test]
    fn test_empty_flow_defaults() {
        let flow = Flow::construct(None, None).unwrap();

        assert_eq!(flow.metadata.name, "unnamed-flow");
        assert_eq!(flow.version, "1.0.0");
        assert_eq!(flow.output_type, "string");
        assert_eq!(flow.model, Model::tric("llama"));
        assert_eq!(flow.metadata.flow_type, "primitive");
        assert!(flow.inputs.is_empty());
        assert!(flow.metadata.tags.is_empty());
        assert_eq!(flow.dataset_source, None);
        assert_eq!(flow.prompt, "");
        assert_eq!(flow.readme, "");
    }

    #[test]
    fn test_construct_with_name() {
        let flow = Flow::construct(Some("named"), None).unwrap();
        assert_eq!(flow.metadata.name, "named");
    }

    #[test]
    fn test_add_input_overwrites_and_remove_is_lenient() {
        let mut flow = Flow::new("x");
        flow.add_input("a", "first")
            .add_input("b", "second")
            .add_optional_input("a", "replaced")
            .remove_input("missing");

        assert_eq!(flow.inputs.keys().collect::<Vec<_>>(), vec!["a", "b"]);
        assert_eq!(flow.inputs["a"].description, "replaced");
        assert!(!flow.inputs["a"].required);

        flow.remove_input("a");
        assert_eq!(flow.inputs.keys().collect::<Vec<_>>(), vec!["b"]);
    }

    #[test]
    fn test_validate_is_idempotent() {
        let flow = story_flow();
        assert_eq!(flow.validate(), Ok(true));
        assert_eq!(flow.validate(), Ok(true));
    }

    #[test]
    fn test_validate_wraps_cause() {
        let mut flow = story_flow();
        flow.set_prompt("No placeholders");

        let err = flow.validate().unwrap_err();
        assert_eq!(err.code, error_codes::UNUSED_REQUIRED_INPUT);
        assert!(err.message.starts_with("Flow validation failed: Required input variables"));
    }

    #[test]
    fn test_validate_empty_prompt() {
        let flow = Flow::new("x");
        let err = flow.validate().unwrap_err();
        assert_eq!(err.message, "Flow validation failed: Prompt template is required");
    }

    #[test]
    fn test_render_prompt_missing_required() {
        let err = story_flow()
            .render_prompt(Vec::<(&str, &str)>::new())
            .unwrap_err();

        assert_eq!(err.code, error_codes::MISSING_VARIABLES);
        assert_eq!(err.variables, BTreeSet::from(["character".to_string()]));
    }

    #[test]
    fn test_render_prompt_all_values() {
        let rendered = story_flow()
            .render_prompt([("character", "a robot"), ("genre", "noir")])
            .unwrap();
        assert_eq!(rendered, "Write a story about a robot in noir");
    }

    #[test]
    fn test_render_prompt_optional_left_out() {
        let err = story_flow()
            .render_prompt([("character", "a robot")])
            .unwrap_err();

        assert_eq!(err.code, error_codes::UNKNOWN_VARIABLE);
        assert_eq!(err.variables, BTreeSet::from(["genre".to_string()]));
    }

    #[test]
    fn test_to_dict_shape() {
        let mut flow = story_flow();
        flow.metadata.author = "acme".to_string();
        flow.metadata.add_tag("creative");
        flow.set_dataset("acme/books");

        let expected = serde_json::json!({
            "version": "1.0.0",
            "metadata": {
                "name": "story-generator",
                "description": "",
                "author": "acme",
                "private": false,
                "tags": ["creative"]
            },
            "inputs": {
                "character": {"type": "string", "description": "Main character", "required": true, "example": null},
                "genre": {"type": "string", "description": "Story genre", "required": false, "example": null}
            },
            "output": {"name": "story", "type": "string"},
            "model": {"provider": "tric", "name": "llama"},
            "prompt": "Write a story about {character} in {genre}",
            "readme": "",
            "dataset": {"source": "acme/books"}
        });

        assert_eq!(flow.to_dict(), expected);
    }

    #[test]
    fn test_to_dict_omits_empty_dataset() {
        let mut flow = story_flow();
        flow.set_dataset("");
        assert!(flow.to_dict().get("dataset").is_none());
    }

    #[test]
    fn test_construct_with_empty_source_keeps_name() {
        let flow = Flow::construct(Some("named"), Some(serde_json::json!({}).into())).unwrap();
        assert_eq!(flow.metadata.name, "named");

        let flow = Flow::construct(Some("named"), Some(FlowSource::from(""))).unwrap();
        assert_eq!(flow.metadata.name, "named");

        let source = serde_json::json!({"metadata": {"name": "loaded"}});
        let flow = Flow::construct(Some("named"), Some(source.into())).unwrap();
        assert_eq!(flow.metadata.name, "loaded");
    }

    #[test]
    fn test_to_dict_omits_unset_dataset() {
        let dict = story_flow().to_dict();
        assert!(dict.get("dataset").is_none());
    }

    #[test]
    fn test_from_mapping_defaults() {
        let flow = Flow::from_source(serde_json::json!({
            "metadata": {"name": "partial"},
            "prompt": "Hi"
        }))
        .unwrap();

        assert_eq!(flow.metadata.name, "partial");
        assert!(flow.inputs.is_empty());
        assert_eq!(flow.model, Model::default());
        assert_eq!(flow.version, "1.0.0");
    }

    #[test]
    fn test_from_mapping_bad_input_is_load_error() {
        let err = Flow::from_source(serde_json::json!({
            "inputs": {"character": {"description": "no type"}}
        }))
        .unwrap_err();

        assert!(err.message.starts_with("Failed to load flow configuration"));
    }

    #[test]
    fn test_clone_as_is_independent() {
        let flow = story_flow();
        let mut copy = flow.clone_as("someone-else", "other-name").unwrap();

        assert_eq!(copy.to_dict(), flow.to_dict());
        assert_eq!(copy.metadata.name, "story-generator");

        copy.add_input("extra", "Extra").metadata.add_tag("copied");
        assert!(!flow.inputs.contains_key("extra"));
        assert!(flow.metadata.tags.is_empty());
    }

    #[test]
    fn test_describe() {
        let mut flow = story_flow();
        flow.inputs["genre"].set_example("noir");

        let text = flow.describe();
        assert!(text.starts_with("Flow: story-generator\n"));
        assert!(text.contains("  - character (required): Main character\n"));
        assert!(text.contains("  - genre (optional): Story genre (example: noir)\n"));
        assert!(text.contains("Model: tric/llama"));
        assert!(text.contains("Dataset source: None"));
        assert!(text.contains("\nPrompt:\nWrite a story about {character} in {genre}\n"));
    }
}
