use serde::{Deserialize, Serialize};

/// One scripted operation call: tool name plus its JSON arguments.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct McpRequest {
    pub tool: String,
    #[serde(default)]
    pub payload: serde_json::Value,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct McpResponse {
    pub status: String,
    #[serde(default)]
    pub payload: serde_json::Value,
}

impl McpResponse {
    pub fn ok(payload: serde_json::Value) -> Self {
        Self {
            status: "ok".to_string(),
            payload,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            status: "error".to_string(),
            payload: serde_json::Value::String(message.into()),
        }
    }
}
