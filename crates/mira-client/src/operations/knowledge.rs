use std::fs::{self, File};
use std::path::{Path, PathBuf};

use mira_flow::QualifiedName;
use serde_json::{json, Value};
use tracing::{debug, instrument};

use crate::async_console::AsyncConsole;
use crate::console::Console;
use crate::error::{ClientError, Result};
use crate::request::ApiRequest;

/// Largest file accepted for upload (200 MiB)
pub const MAX_FILE_SIZE: u64 = 200 * 1024 * 1024;

/// File extensions accepted for upload
pub const ALLOWED_EXTENSIONS: [&str; 4] = ["csv", "txt", "pdf", "md"];

/// Where knowledge for a dataset comes from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KnowledgeSource {
    /// A local file uploaded as multipart
    File(PathBuf),
    /// A URL the server fetches itself
    Url(String),
}

/// Knowledge dataset operations over the blocking console
#[derive(Debug, Clone, Copy)]
pub struct KnowledgeOperations<'c> {
    console: &'c Console,
}

impl<'c> KnowledgeOperations<'c> {
    pub(crate) fn new(console: &'c Console) -> Self {
        KnowledgeOperations { console }
    }

    /// Add a file or URL to the dataset `org/name`
    #[instrument(skip(self))]
    pub fn add_source(&self, dataset_name: &str, source: &KnowledgeSource) -> Result<Value> {
        self.console.send(&add_source_request(dataset_name, source)?)
    }

    pub fn create(&self, dataset_name: &str, description: Option<&str>) -> Result<Value> {
        self.console.send(&create_request(dataset_name, description)?)
    }

    pub fn get_context_for_prompt(&self, dataset_name: &str, prompt: &str) -> Result<Value> {
        self.console.send(&context_request(dataset_name, prompt)?)
    }
}

/// Knowledge dataset operations over the async console
#[derive(Debug, Clone, Copy)]
pub struct AsyncKnowledgeOperations<'c> {
    console: &'c AsyncConsole,
}

impl<'c> AsyncKnowledgeOperations<'c> {
    pub(crate) fn new(console: &'c AsyncConsole) -> Self {
        AsyncKnowledgeOperations { console }
    }

    #[instrument(skip(self))]
    pub async fn add_source(&self, dataset_name: &str, source: &KnowledgeSource) -> Result<Value> {
        let request = add_source_request(dataset_name, source)?;
        self.console.send(&request).await
    }

    pub async fn create(&self, dataset_name: &str, description: Option<&str>) -> Result<Value> {
        let request = create_request(dataset_name, description)?;
        self.console.send(&request).await
    }

    pub async fn get_context_for_prompt(&self, dataset_name: &str, prompt: &str) -> Result<Value> {
        let request = context_request(dataset_name, prompt)?;
        self.console.send(&request).await
    }
}

/// Check that a local file may be uploaded as knowledge.
///
/// The file must exist, be readable, be at most [`MAX_FILE_SIZE`] bytes and
/// carry one of [`ALLOWED_EXTENSIONS`] (any case).
pub fn check_knowledge_file(path: &Path) -> Result<()> {
    if !path.exists() {
        return Err(ClientError::KnowledgeSource(format!(
            "The file {} does not exist.",
            path.display()
        )));
    }

    if File::open(path).is_err() {
        return Err(ClientError::KnowledgeSource(format!(
            "The file {} is not readable.",
            path.display()
        )));
    }

    let size = fs::metadata(path)
        .map_err(|source| ClientError::Io {
            path: path.to_path_buf(),
            source,
        })?
        .len();
    if size > MAX_FILE_SIZE {
        return Err(ClientError::KnowledgeSource(format!(
            "The file {} exceeds the maximum allowed size of 200MB.",
            path.display()
        )));
    }

    let allowed = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ALLOWED_EXTENSIONS.iter().any(|allowed| ext.eq_ignore_ascii_case(allowed)))
        .unwrap_or(false);
    if !allowed {
        return Err(ClientError::KnowledgeSource(
            "Unsupported file type. Allowed types are: .csv, .txt, .pdf, .md".to_string(),
        ));
    }

    Ok(())
}

pub(crate) fn add_source_request(dataset_name: &str, source: &KnowledgeSource) -> Result<ApiRequest> {
    let name = QualifiedName::parse(dataset_name)?;

    match source {
        KnowledgeSource::File(path) => {
            check_knowledge_file(path)?;
            debug!(path = %path.display(), "Uploading knowledge file");
            Ok(ApiRequest::post("v1/knowledge/upload/")
                .file("file", path)
                .form_field("author_name", name.org)
                .form_field("name", name.name))
        }
        KnowledgeSource::Url(url) => Ok(ApiRequest::post("v1/knowledge/process_url/").json(json!({
            "author_name": name.org,
            "name": name.name,
            "url": url,
        }))),
    }
}

pub(crate) fn create_request(dataset_name: &str, description: Option<&str>) -> Result<ApiRequest> {
    let name = QualifiedName::parse(dataset_name)?;
    Ok(ApiRequest::post("v1/knowledge/create/").json(json!({
        "name": name.name,
        "author_name": name.org,
        "description": description,
    })))
}

pub(crate) fn context_request(dataset_name: &str, prompt: &str) -> Result<ApiRequest> {
    let name = QualifiedName::parse(dataset_name)?;
    let request = ApiRequest::get(format!("v1/knowledge/{}/{}", name.org, name.name));
    Ok(if prompt.is_empty() {
        request
    } else {
        request.query("prompt", prompt)
    })
}
