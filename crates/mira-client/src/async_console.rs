use reqwest::multipart::{Form, Part};
use reqwest::Client;
use serde_json::Value;
use tracing::{debug, instrument};

use crate::config::ClientConfig;
use crate::error::{ClientError, Result};
use crate::request::{decode_response, ApiRequest, AUTH_HEADER};

/// Non-blocking transport for the Mira console API
#[derive(Debug, Clone)]
pub struct AsyncConsole {
    config: ClientConfig,
    http: Client,
}

impl AsyncConsole {
    pub fn new(config: ClientConfig) -> Result<Self> {
        config.validate()?;
        let http = Client::builder().build()?;
        Ok(AsyncConsole { config, http })
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Send a request and decode the JSON response
    #[instrument(skip(self, request), fields(method = %request.method, path = %request.path))]
    pub async fn send(&self, request: &ApiRequest) -> Result<Value> {
        let url = self.config.url(&request.path);
        debug!(url = %url, "Sending request");

        let mut builder = self
            .http
            .request(request.method.clone(), &url)
            .header(AUTH_HEADER, &self.config.api_key);

        if !request.query.is_empty() {
            builder = builder.query(&request.query);
        }
        if let Some(body) = &request.json {
            builder = builder.json(body);
        }

        if let Some(upload) = &request.file {
            let bytes = tokio::fs::read(&upload.path)
                .await
                .map_err(|source| ClientError::Io {
                    path: upload.path.clone(),
                    source,
                })?;
            let file_name = upload
                .path
                .file_name()
                .map(|name| name.to_string_lossy().into_owned())
                .unwrap_or_default();

            let mut form = Form::new();
            for (key, value) in &request.form {
                form = form.text(key.clone(), value.clone());
            }
            form = form.part(upload.field.clone(), Part::bytes(bytes).file_name(file_name));
            builder = builder.multipart(form);
        } else if !request.form.is_empty() {
            builder = builder.form(&request.form);
        }

        let response = builder.send().await?;
        let status = response.status();
        let body = response.text().await?;
        debug!(status = status.as_u16(), "Received response");

        decode_response(status, &body)
    }
}
