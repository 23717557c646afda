use serde_json::Value;

use crate::compound::CompoundFlow;
use crate::flow::Flow;
use crate::naming::normalize_author;
use crate::validation::{error_codes, ValidationError};

/// Either kind of flow the backend accepts
#[derive(Debug, Clone, Copy)]
pub enum FlowDefinition<'a> {
    /// A single prompt flow
    Simple(&'a Flow),

    /// An opaque composition of flows
    Compound(&'a CompoundFlow),
}

/// Where a flow is deployed to
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeployTarget {
    /// Author (organisation) without a leading `@`
    pub author: String,

    /// Flow name
    pub name: String,

    /// Version to deploy as, if any
    pub version: Option<String>,

    /// Flow kind sent as the deploy `type`
    pub flow_type: Option<String>,
}

impl<'a> FlowDefinition<'a> {
    /// The mapping sent to the server as the flow configuration
    pub fn to_wire(&self) -> Value {
        match self {
            FlowDefinition::Simple(flow) => flow.to_dict(),
            FlowDefinition::Compound(flow) => flow.config.clone(),
        }
    }

    /// Resolve the author, name, version, and type used for deployment
    pub fn deploy_target(&self) -> Result<DeployTarget, ValidationError> {
        match self {
            FlowDefinition::Simple(flow) => Ok(DeployTarget {
                author: normalize_author(&flow.metadata.author).to_string(),
                name: flow.metadata.name.clone(),
                version: Some(flow.version.clone()),
                flow_type: Some(flow.metadata.flow_type.clone()),
            }),
            FlowDefinition::Compound(flow) => {
                let author = flow.author().ok_or_else(|| missing("metadata.author"))?;
                let name = flow.name().ok_or_else(|| missing("metadata.name"))?;

                Ok(DeployTarget {
                    author: normalize_author(author).to_string(),
                    name: name.to_string(),
                    version: flow.version().map(str::to_string),
                    flow_type: flow.flow_type().map(str::to_string),
                })
            }
        }
    }
}

impl<'a> From<&'a Flow> for FlowDefinition<'a> {
    fn from(flow: &'a Flow) -> Self {
        FlowDefinition::Simple(flow)
    }
}

impl<'a> From<&'a CompoundFlow> for FlowDefinition<'a> {
    fn from(flow: &'a CompoundFlow) -> Self {
        FlowDefinition::Compound(flow)
    }
}

fn missing(field: &str) -> ValidationError {
    ValidationError::new(
        error_codes::MISSING_NAME,
        format!("Compound flow is missing {}", field),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_simple_target_strips_at() {
        let mut flow = Flow::new("story");
        flow.metadata.author = "@acme".to_string();

        let target = FlowDefinition::from(&flow).deploy_target().unwrap();
        assert_eq!(
            target,
            DeployTarget {
                author: "acme".to_string(),
                name: "story".to_string(),
                version: Some("1.0.0".to_string()),
                flow_type: Some("primitive".to_string()),
            }
        );
        // the flow itself is untouched
        assert_eq!(flow.metadata.author, "@acme");
    }

    #[test]
    fn test_compound_wire_is_verbatim() {
        let config = json!({"metadata": {"author": "acme", "name": "chain"}, "custom": [1, 2]});
        let compound = CompoundFlow::new(config.clone());

        let definition = FlowDefinition::from(&compound);
        assert_eq!(definition.to_wire(), config);

        let target = definition.deploy_target().unwrap();
        assert_eq!(target.name, "chain");
        assert_eq!(target.version, None);
    }

    #[test]
    fn test_compound_without_author() {
        let compound = CompoundFlow::new(json!({"metadata": {"name": "chain"}}));
        let err = FlowDefinition::from(&compound).deploy_target().unwrap_err();
        assert!(err.message.contains("metadata.author"));
    }
}
