use mira_flow::{normalize_author, QualifiedName};
use serde_json::{json, Value};
use tracing::{debug, instrument};

use crate::async_console::AsyncConsole;
use crate::console::Console;
use crate::error::{ClientError, Result};
use crate::prompt::{id_to_string, Prompt, PromptRecord, PromptVersionRecord};
use crate::request::{take_data, ApiRequest};

/// Prompt operations over the blocking console
#[derive(Debug, Clone, Copy)]
pub struct PromptOperations<'c> {
    console: &'c Console,
}

impl<'c> PromptOperations<'c> {
    pub(crate) fn new(console: &'c Console) -> Self {
        PromptOperations { console }
    }

    /// Store a new prompt; the returned copy carries the server id
    #[instrument(skip_all, fields(prompt = %prompt))]
    pub fn create(&self, prompt: &Prompt) -> Result<Prompt> {
        let response = self.console.send(&create_request(prompt))?;
        with_returned_id(prompt, response)
    }

    /// Add `prompt` as a new version of the stored prompt with the same name
    #[instrument(skip_all, fields(prompt = %prompt))]
    pub fn update(&self, prompt: &Prompt) -> Result<Prompt> {
        let current = take_data(self.console.send(&get_request(&prompt.org, &prompt.name, None))?)?;
        let response = self.console.send(&version_request(prompt, &current)?)?;
        with_returned_id(prompt, response)
    }

    /// Fetch a prompt by `org/name[/version]`
    #[instrument(skip(self))]
    pub fn get(&self, prompt_name: &str) -> Result<Prompt> {
        let name = QualifiedName::parse(prompt_name)?;
        let response = self
            .console
            .send(&get_request(&name.org, &name.name, name.version.as_deref()))?;
        decode_prompt(response)
    }

    pub fn get_by_author(&self, author: &str) -> Result<Value> {
        take_data(self.console.send(&by_author_request(author))?)
    }

    /// List every stored version of `prompt`
    pub fn get_all_versions(&self, prompt: &Prompt) -> Result<Vec<Prompt>> {
        let response = self.console.send(&versions_request(prompt)?)?;
        decode_versions(prompt, response)
    }
}

/// Prompt operations over the async console
#[derive(Debug, Clone, Copy)]
pub struct AsyncPromptOperations<'c> {
    console: &'c AsyncConsole,
}

impl<'c> AsyncPromptOperations<'c> {
    pub(crate) fn new(console: &'c AsyncConsole) -> Self {
        AsyncPromptOperations { console }
    }

    #[instrument(skip_all, fields(prompt = %prompt))]
    pub async fn create(&self, prompt: &Prompt) -> Result<Prompt> {
        let response = self.console.send(&create_request(prompt)).await?;
        with_returned_id(prompt, response)
    }

    #[instrument(skip_all, fields(prompt = %prompt))]
    pub async fn update(&self, prompt: &Prompt) -> Result<Prompt> {
        let request = get_request(&prompt.org, &prompt.name, None);
        let current = take_data(self.console.send(&request).await?)?;
        let response = self.console.send(&version_request(prompt, &current)?).await?;
        with_returned_id(prompt, response)
    }

    #[instrument(skip(self))]
    pub async fn get(&self, prompt_name: &str) -> Result<Prompt> {
        let name = QualifiedName::parse(prompt_name)?;
        let request = get_request(&name.org, &name.name, name.version.as_deref());
        decode_prompt(self.console.send(&request).await?)
    }

    pub async fn get_by_author(&self, author: &str) -> Result<Value> {
        take_data(self.console.send(&by_author_request(author)).await?)
    }

    pub async fn get_all_versions(&self, prompt: &Prompt) -> Result<Vec<Prompt>> {
        let request = versions_request(prompt)?;
        decode_versions(prompt, self.console.send(&request).await?)
    }
}

pub(crate) fn create_request(prompt: &Prompt) -> ApiRequest {
    ApiRequest::post("v1/prompts/").json(json!({
        "name": prompt.name,
        "author_name": prompt.org,
        "content": prompt.content,
        "variables": prompt.variables,
        "version": prompt.version,
    }))
}

pub(crate) fn get_request(org: &str, name: &str, version: Option<&str>) -> ApiRequest {
    ApiRequest::get(format!("v1/prompts/{}/{}", org, name))
        .query_opt("version", version.filter(|v| !v.is_empty()))
}

pub(crate) fn by_author_request(author: &str) -> ApiRequest {
    ApiRequest::get(format!("v1/prompts/{}", normalize_author(author)))
}

/// `current` is the `data` of the stored prompt; its id is sent back as given
pub(crate) fn version_request(prompt: &Prompt, current: &Value) -> Result<ApiRequest> {
    let prompt_id = current
        .get("prompt_id")
        .filter(|id| !id.is_null())
        .ok_or_else(|| ClientError::InvalidResponse("stored prompt has no `prompt_id`".to_string()))?;

    Ok(ApiRequest::post("v1/prompts/version").json(json!({
        "prompt_id": prompt_id,
        "content": prompt.content,
        "variables": prompt.variables,
        "version": prompt.version,
    })))
}

pub(crate) fn versions_request(prompt: &Prompt) -> Result<ApiRequest> {
    let prompt_id = prompt
        .prompt_id
        .as_deref()
        .ok_or_else(|| ClientError::InvalidResponse("Prompt ID not found for this prompt".to_string()))?;
    Ok(ApiRequest::get(format!("v1/prompts/{}/versions", prompt_id)))
}

fn with_returned_id(prompt: &Prompt, response: Value) -> Result<Prompt> {
    let data = take_data(response)?;
    let prompt_id = data
        .get("prompt_id")
        .and_then(id_to_string)
        .ok_or_else(|| ClientError::InvalidResponse("response has no `data.prompt_id`".to_string()))?;
    debug!(prompt_id = %prompt_id, "Prompt stored");

    Ok(Prompt {
        prompt_id: Some(prompt_id),
        ..prompt.clone()
    })
}

fn decode_prompt(response: Value) -> Result<Prompt> {
    let record: PromptRecord = serde_json::from_value(take_data(response)?)?;
    Ok(record.into_prompt())
}

fn decode_versions(prompt: &Prompt, response: Value) -> Result<Vec<Prompt>> {
    let records: Vec<PromptVersionRecord> = serde_json::from_value(take_data(response)?)?;
    Ok(records
        .into_iter()
        .map(|record| Prompt {
            org: prompt.org.clone(),
            name: prompt.name.clone(),
            version: record.version,
            content: record.content,
            variables: record.variables.unwrap_or_default(),
            prompt_id: None,
        })
        .collect())
}
