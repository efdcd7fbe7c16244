use super::*;

use crate::telemetry::AgentRole;

fn event_from_json(body: &str) -> MissionEvent {
    serde_json::from_str(body).expect("event should parse")
}

#[test]
fn manager_update_routes_to_named_agent() {
    let event = event_from_json(r#"{"manager": {"next_agent": "researcher"}}"#);
    let entries = normalize_event(&event);
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].role, AgentRole::Manager);
    assert_eq!(entries[0].content, "Orchestrating logic. Route -> RESEARCHER");
}

#[test]
fn manager_update_without_next_agent_still_logs() {
    let event = event_from_json(r#"{"manager": {}}"#);
    let entries = normalize_event(&event);
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].content, "Orchestrating logic. Route -> UNROUTED");
}

#[test]
fn researcher_update_does_not_echo_payload() {
    let event = event_from_json(r#"{"researcher": {"research_notes": ["secret finding"]}}"#);
    let entries = normalize_event(&event);
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].role, AgentRole::Researcher);
    assert_eq!(entries[0].content, "Intelligence gathered from secure channels.");
    assert!(!entries[0].content.contains("secret finding"));
}

#[test]
fn writer_update_logs_fixed_content() {
    let event = event_from_json(r#"{"writer": {"draft": "partial"}}"#);
    let entries = normalize_event(&event);
    assert_eq!(entries.len(), 1);
    assert_eq!(
        entries[0].content,
        "Synthesizing accumulated intelligence into draft."
    );
}

#[test]
fn reviewer_update_quotes_revision_notes() {
    let event = event_from_json(r#"{"reviewer": {"revision_notes": "tighten intro"}}"#);
    let entries = normalize_event(&event);
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].role, AgentRole::Reviewer);
    assert_eq!(entries[0].content, "Quality Audit: tighten intro");
}

#[test]
fn reviewer_update_without_notes_uses_placeholder() {
    let event = event_from_json(r#"{"reviewer": {}}"#);
    let entries = normalize_event(&event);
    assert_eq!(entries[0].content, "Quality Audit: (no revision notes)");
}

#[test]
fn malformed_payload_degrades_to_placeholder() {
    let event = event_from_json(r#"{"manager": "not an object", "reviewer": 17}"#);
    let entries = normalize_event(&event);
    assert_eq!(entries.len(), 2);
    assert_eq!(entries[0].content, "Orchestrating logic. Route -> UNROUTED");
    assert_eq!(entries[1].content, "Quality Audit: (no revision notes)");
}

#[test]
fn unknown_node_names_produce_no_entries() {
    let event = event_from_json(r#"{"navigator": {"next_agent": "writer"}}"#);
    assert!(normalize_event(&event).is_empty());
}

#[test]
fn system_node_is_never_normalized() {
    // "system" telemetry comes from operator transitions, not the backend.
    let event = event_from_json(r#"{"system": {"message": "ignored"}}"#);
    assert!(normalize_event(&event).is_empty());
}

#[test]
fn multi_node_event_preserves_key_order() {
    let event = event_from_json(
        r#"{"writer": {}, "manager": {"next_agent": "reviewer"}, "ghost": {}, "reviewer": {"revision_notes": "ok"}}"#,
    );
    let entries = normalize_event(&event);
    let roles: Vec<AgentRole> = entries.iter().map(|e| e.role).collect();
    assert_eq!(
        roles,
        vec![AgentRole::Writer, AgentRole::Manager, AgentRole::Reviewer]
    );
}

#[test]
fn batch_normalization_preserves_event_order() {
    let events = vec![
        event_from_json(r#"{"manager": {"next_agent": "researcher"}}"#),
        event_from_json(r#"{"researcher": {}}"#),
        event_from_json(r#"{"manager": {"next_agent": "writer"}}"#),
    ];
    let entries = normalize_events(&events);
    let roles: Vec<AgentRole> = entries.iter().map(|e| e.role).collect();
    assert_eq!(
        roles,
        vec![AgentRole::Manager, AgentRole::Researcher, AgentRole::Manager]
    );
    assert_eq!(entries[2].content, "Orchestrating logic. Route -> WRITER");
}

#[test]
fn classify_update_builds_tagged_variants() {
    let payload = serde_json::json!({"next_agent": "writer"});
    assert_eq!(
        classify_update("manager", &payload),
        AgentUpdate::Manager {
            next_agent: Some("writer".to_string())
        }
    );
    assert_eq!(
        classify_update("researcher", &serde_json::json!({})),
        AgentUpdate::Researcher
    );
    assert_eq!(
        classify_update("system", &serde_json::json!({})),
        AgentUpdate::Unrecognized
    );
    assert_eq!(
        classify_update("navigator", &serde_json::json!({})),
        AgentUpdate::Unrecognized
    );
}

#[test]
fn non_string_payload_fields_are_treated_as_absent() {
    let event = event_from_json(r#"{"manager": {"next_agent": 42}}"#);
    let entries = normalize_event(&event);
    assert_eq!(entries[0].content, "Orchestrating logic. Route -> UNROUTED");
}
