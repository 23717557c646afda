use reqwest::blocking::{multipart, Client};
use serde_json::Value;
use tracing::{debug, instrument};

use crate::config::ClientConfig;
use crate::error::{ClientError, Result};
use crate::request::{decode_response, ApiRequest, AUTH_HEADER};

/// Blocking transport for the Mira console API
#[derive(Debug, Clone)]
pub struct Console {
    config: ClientConfig,
    http: Client,
}

impl Console {
    /// Create a console.
    ///
    /// Must not be called from inside an async runtime; use
    /// [`AsyncConsole`](crate::AsyncConsole) there.
    pub fn new(config: ClientConfig) -> Result<Self> {
        config.validate()?;
        let http = Client::builder().build()?;
        Ok(Console { config, http })
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Send a request and decode the JSON response
    #[instrument(skip(self, request), fields(method = %request.method, path = %request.path))]
    pub fn send(&self, request: &ApiRequest) -> Result<Value> {
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
            let mut form = multipart::Form::new();
            for (key, value) in &request.form {
                form = form.text(key.clone(), value.clone());
            }
            // The opened file lives in the form and is closed once the request is done.
            form = form
                .file(upload.field.clone(), &upload.path)
                .map_err(|source| ClientError::Io {
                    path: upload.path.clone(),
                    source,
                })?;
            builder = builder.multipart(form);
        } else if !request.form.is_empty() {
            builder = builder.form(&request.form);
        }

        let response = builder.send()?;
        let status = response.status();
        let body = response.text()?;
        debug!(status = status.as_u16(), "Received response");

        decode_response(status, &body)
    }
}
