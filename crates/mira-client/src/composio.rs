use serde::{Deserialize, Serialize};

/// Credentials and task for the Composio tool integration.
///
/// Attached to flow test and execute requests as `composio_config`; the
/// server expects the upper-case field names.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComposioConfig {
    #[serde(rename = "COMPOSIO_API_KEY")]
    pub api_key: String,
    #[serde(rename = "ACTION")]
    pub action: String,
    #[serde(rename = "TASK")]
    pub task: String,
    #[serde(rename = "ENTITY_ID")]
    pub entity_id: String,
}
