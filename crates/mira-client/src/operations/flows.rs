use mira_flow::{normalize_author, Flow, FlowDefinition, QualifiedName};
use serde_json::{json, Map, Value};
use tracing::{debug, instrument};

use crate::async_console::AsyncConsole;
use crate::composio::ComposioConfig;
use crate::console::Console;
use crate::error::Result;
use crate::request::{take_data, ApiRequest};

/// Flow operations over the blocking console
#[derive(Debug, Clone, Copy)]
pub struct FlowOperations<'c> {
    console: &'c Console,
}

impl<'c> FlowOperations<'c> {
    pub(crate) fn new(console: &'c Console) -> Self {
        FlowOperations { console }
    }

    /// Run an undeployed flow against `input`
    #[instrument(skip_all)]
    pub fn test<'f>(
        &self,
        flow: impl Into<FlowDefinition<'f>>,
        input: &Value,
        composio: Option<&ComposioConfig>,
    ) -> Result<Value> {
        self.console.send(&test_request(flow.into(), input, composio)?)
    }

    /// Fetch a deployed flow by `org/name[/version]`
    #[instrument(skip(self))]
    pub fn get(&self, flow_name: &str) -> Result<Flow> {
        let response = self.console.send(&get_request(&QualifiedName::parse(flow_name)?))?;
        decode_flow(response)
    }

    pub fn get_by_author(&self, author: &str) -> Result<Value> {
        take_data(self.console.send(&by_author_request(author))?)
    }

    pub fn get_by_tag(&self, tag: &str, user_id: Option<&str>) -> Result<Value> {
        self.console.send(&by_tag_request(tag, user_id))
    }

    pub fn search(&self, query: &str) -> Result<Value> {
        self.console.send(&search_request(query))
    }

    pub fn get_all_versions(&self, flow_name: &str) -> Result<Value> {
        self.console.send(&versions_request(&QualifiedName::parse(flow_name)?))
    }

    /// Deploy a flow under its author and name
    #[instrument(skip_all)]
    pub fn deploy<'f>(&self, flow: impl Into<FlowDefinition<'f>>) -> Result<Value> {
        self.console.send(&deploy_request(flow.into())?)
    }

    /// Execute a deployed flow by `org/name[/version]`
    #[instrument(skip(self, input, composio))]
    pub fn execute(
        &self,
        flow_name: &str,
        input: &Value,
        composio: Option<&ComposioConfig>,
    ) -> Result<Value> {
        let name = QualifiedName::parse(flow_name)?;
        self.console.send(&execute_request(&name, input, composio)?)
    }
}

/// Flow operations over the async console
#[derive(Debug, Clone, Copy)]
pub struct AsyncFlowOperations<'c> {
    console: &'c AsyncConsole,
}

impl<'c> AsyncFlowOperations<'c> {
    pub(crate) fn new(console: &'c AsyncConsole) -> Self {
        AsyncFlowOperations { console }
    }

    #[instrument(skip_all)]
    pub async fn test<'f>(
        &self,
        flow: impl Into<FlowDefinition<'f>>,
        input: &Value,
        composio: Option<&ComposioConfig>,
    ) -> Result<Value> {
        let request = test_request(flow.into(), input, composio)?;
        self.console.send(&request).await
    }

    #[instrument(skip(self))]
    pub async fn get(&self, flow_name: &str) -> Result<Flow> {
        let request = get_request(&QualifiedName::parse(flow_name)?);
        decode_flow(self.console.send(&request).await?)
    }

    pub async fn get_by_author(&self, author: &str) -> Result<Value> {
        take_data(self.console.send(&by_author_request(author)).await?)
    }

    pub async fn get_by_tag(&self, tag: &str, user_id: Option<&str>) -> Result<Value> {
        self.console.send(&by_tag_request(tag, user_id)).await
    }

    pub async fn search(&self, query: &str) -> Result<Value> {
        self.console.send(&search_request(query)).await
    }

    pub async fn get_all_versions(&self, flow_name: &str) -> Result<Value> {
        let request = versions_request(&QualifiedName::parse(flow_name)?);
        self.console.send(&request).await
    }

    #[instrument(skip_all)]
    pub async fn deploy<'f>(&self, flow: impl Into<FlowDefinition<'f>>) -> Result<Value> {
        let request = deploy_request(flow.into())?;
        self.console.send(&request).await
    }

    #[instrument(skip(self, input, composio))]
    pub async fn execute(
        &self,
        flow_name: &str,
        input: &Value,
        composio: Option<&ComposioConfig>,
    ) -> Result<Value> {
        let request = execute_request(&QualifiedName::parse(flow_name)?, input, composio)?;
        self.console.send(&request).await
    }
}

fn decode_flow(response: Value) -> Result<Flow> {
    Ok(Flow::from_source(take_data(response)?)?)
}

fn attach_composio(body: &mut Map<String, Value>, composio: Option<&ComposioConfig>) -> Result<()> {
    if let Some(composio) = composio {
        body.insert("composio_config".to_string(), serde_json::to_value(composio)?);
    }
    Ok(())
}

pub(crate) fn test_request(
    flow: FlowDefinition<'_>,
    input: &Value,
    composio: Option<&ComposioConfig>,
) -> Result<ApiRequest> {
    let mut body = Map::new();
    body.insert("flow_config".to_string(), flow.to_wire());
    body.insert("input".to_string(), input.clone());
    attach_composio(&mut body, composio)?;

    Ok(ApiRequest::post("v1/flows/flows/run").json(Value::Object(body)))
}

pub(crate) fn get_request(name: &QualifiedName) -> ApiRequest {
    ApiRequest::get(format!("v1/flows/yaml/{}/{}", name.org, name.name))
        .query_opt("version", name.version.as_deref().filter(|v| !v.is_empty()))
}

pub(crate) fn by_author_request(author: &str) -> ApiRequest {
    ApiRequest::get(format!("v1/flows/flows/{}", normalize_author(author)))
}

pub(crate) fn by_tag_request(tag: &str, user_id: Option<&str>) -> ApiRequest {
    ApiRequest::get("v1/flows/flows_tag/tag_search")
        .query("tag", tag)
        .query_opt("user_id", user_id.filter(|id| !id.is_empty()))
}

pub(crate) fn search_request(query: &str) -> ApiRequest {
    ApiRequest::get("v1/flows/flows_keyword/flow_search").query("keyword", query)
}

pub(crate) fn versions_request(name: &QualifiedName) -> ApiRequest {
    ApiRequest::get(format!("v1/flows/flows/{}/{}/versions", name.org, name.name))
}

pub(crate) fn deploy_request(flow: FlowDefinition<'_>) -> Result<ApiRequest> {
    let target = flow.deploy_target()?;
    debug!(author = %target.author, name = %target.name, "Deploying flow");

    Ok(
        ApiRequest::post(format!("v1/flows/deploy/{}/{}", target.author, target.name))
            .json(json!({
                "flow": flow.to_wire(),
                "type": target.flow_type,
            }))
            .query_opt("version", target.version.filter(|v| !v.is_empty())),
    )
}

pub(crate) fn execute_request(
    name: &QualifiedName,
    input: &Value,
    composio: Option<&ComposioConfig>,
) -> Result<ApiRequest> {
    let mut body = Map::new();
    body.insert("input".to_string(), input.clone());
    attach_composio(&mut body, composio)?;

    let mut request = ApiRequest::post(format!("v1/flows/flows/{}/{}", name.org, name.name))
        .json(Value::Object(body));
    if let Some(version) = name.version.as_deref().filter(|v| !v.is_empty()) {
        request = request.query("version", version).query("type", "PRIMITIVE");
    }
    Ok(request)
}
