use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, Serialize)]
pub struct InitializeRequest {
    pub goal: String,
    pub model: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct InitializeResponse {
    pub thread_id: String,
}

/// One unit of backend progress: a mapping from agent node name to that
/// node's update payload. serde_json's preserve_order feature keeps the
/// backend's key order, which the normalizer relies on.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct MissionEvent(pub serde_json::Map<String, Value>);

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CurrentState {
    #[serde(default)]
    pub research_notes: Vec<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct StreamResponse {
    #[serde(default)]
    pub events: Vec<MissionEvent>,
    #[serde(default)]
    pub is_paused: bool,
    #[serde(default)]
    pub current_state: Option<CurrentState>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ApproveRequest {
    pub thread_id: String,
    pub approve: bool,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ApproveResponse {
    #[serde(default)]
    pub events: Vec<MissionEvent>,
    #[serde(default)]
    pub final_output: Option<String>,
    #[serde(default)]
    pub status: String,
}

#[cfg(test)]
#[path = "../tests/unit/protocol_tests.rs"]
mod tests;
