use serde_json::Value;

use crate::protocol::MissionEvent;
use crate::telemetry::{AgentRole, LogEntry};

const RESEARCHER_UPDATE: &str = "Intelligence gathered from secure channels.";
const WRITER_UPDATE: &str = "Synthesizing accumulated intelligence into draft.";
const UNROUTED_LABEL: &str = "UNROUTED";
const MISSING_REVISION_NOTES: &str = "(no revision notes)";

/// A backend node's update, classified by the agent role that produced it.
/// Payload fields the console cares about are pulled out here; everything
/// else in the payload is ignored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AgentUpdate {
    Manager { next_agent: Option<String> },
    Researcher,
    Writer,
    Reviewer { revision_notes: Option<String> },
    Unrecognized,
}

pub fn classify_update(node: &str, payload: &Value) -> AgentUpdate {
    match node {
        "manager" => AgentUpdate::Manager {
            next_agent: string_field(payload, "next_agent"),
        },
        "researcher" => AgentUpdate::Researcher,
        "writer" => AgentUpdate::Writer,
        "reviewer" => AgentUpdate::Reviewer {
            revision_notes: string_field(payload, "revision_notes"),
        },
        // "system" entries come from operator transitions, never from the
        // backend stream; unknown node names are dropped outright.
        _ => AgentUpdate::Unrecognized,
    }
}

fn string_field(payload: &Value, field: &str) -> Option<String> {
    payload
        .get(field)
        .and_then(Value::as_str)
        .map(ToString::to_string)
}

pub fn entry_for_update(update: &AgentUpdate) -> Option<LogEntry> {
    match update {
        AgentUpdate::Manager { next_agent } => {
            let route = next_agent
                .as_deref()
                .map(|agent| agent.to_ascii_uppercase())
                .unwrap_or_else(|| UNROUTED_LABEL.to_string());
            Some(LogEntry::new(
                AgentRole::Manager,
                format!("Orchestrating logic. Route -> {route}"),
            ))
        }
        AgentUpdate::Researcher => Some(LogEntry::new(AgentRole::Researcher, RESEARCHER_UPDATE)),
        AgentUpdate::Writer => Some(LogEntry::new(AgentRole::Writer, WRITER_UPDATE)),
        AgentUpdate::Reviewer { revision_notes } => {
            let notes = revision_notes.as_deref().unwrap_or(MISSING_REVISION_NOTES);
            Some(LogEntry::new(
                AgentRole::Reviewer,
                format!("Quality Audit: {notes}"),
            ))
        }
        AgentUpdate::Unrecognized => None,
    }
}

/// Entries come out in the payload's key order, so a single event carrying
/// several node updates logs them exactly as the backend reported them.
pub fn normalize_event(event: &MissionEvent) -> Vec<LogEntry> {
    event
        .0
        .iter()
        .filter_map(|(node, payload)| entry_for_update(&classify_update(node, payload)))
        .collect()
}

pub fn normalize_events(events: &[MissionEvent]) -> Vec<LogEntry> {
    events.iter().flat_map(normalize_event).collect()
}

#[cfg(test)]
#[path = "../tests/unit/normalizer_tests.rs"]
mod tests;
