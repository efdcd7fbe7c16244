use super::*;

use crate::protocol::{ApproveResponse, CurrentState, MissionEvent, StreamResponse};
use crate::telemetry::AgentRole;

fn manager_event(next_agent: &str) -> MissionEvent {
    serde_json::from_value(serde_json::json!({"manager": {"next_agent": next_agent}}))
        .expect("event should parse")
}

fn stream_response(events: Vec<MissionEvent>, is_paused: bool, notes: &[&str]) -> StreamResponse {
    StreamResponse {
        events,
        is_paused,
        current_state: is_paused.then(|| CurrentState {
            research_notes: notes.iter().map(ToString::to_string).collect(),
        }),
    }
}

fn approve_response(events: Vec<MissionEvent>, final_output: Option<&str>) -> ApproveResponse {
    ApproveResponse {
        events,
        final_output: final_output.map(ToString::to_string),
        status: String::new(),
    }
}

fn session_in_processing(goal: &str, thread_id: &str) -> MissionSession {
    let mut session = MissionSession::new();
    session.submit_goal(goal).expect("submit should pass");
    session.confirm_initialized(thread_id);
    session
}

#[test]
fn new_session_starts_idle_and_empty() {
    let session = MissionSession::new();
    assert_eq!(session.phase(), Phase::Idle);
    assert!(session.thread_id().is_none());
    assert!(session.log().is_empty());
    assert!(session.research_notes().is_empty());
    assert!(session.final_report().is_none());
    assert!(session.last_failure().is_none());
}

#[test]
fn empty_goal_is_rejected_before_any_transition() {
    let mut session = MissionSession::new();
    assert_eq!(session.submit_goal("   "), Err(SubmitRejection::EmptyGoal));
    assert_eq!(session.phase(), Phase::Idle);
    assert!(session.log().is_empty());
}

#[test]
fn submit_enters_processing_and_logs_system_entry() {
    let mut session = MissionSession::new();
    session.submit_goal("Summarize X").expect("submit should pass");
    assert_eq!(session.phase(), Phase::Processing);
    assert_eq!(session.log().len(), 1);
    assert_eq!(session.log()[0].role, AgentRole::System);
    assert_eq!(session.log()[0].content, "Mission Initialized: Summarize X");
    // The id arrives only once the client confirms.
    assert!(session.thread_id().is_none());
}

#[test]
fn submit_trims_the_goal_before_logging() {
    let mut session = MissionSession::new();
    session.submit_goal("  Summarize X  ").expect("submit should pass");
    assert_eq!(session.log()[0].content, "Mission Initialized: Summarize X");
}

#[test]
fn second_submit_while_processing_is_rejected() {
    let mut session = session_in_processing("Summarize X", "t1");
    assert_eq!(
        session.submit_goal("Another goal"),
        Err(SubmitRejection::MissionInFlight)
    );
    assert_eq!(session.log().len(), 1);
    assert_eq!(session.thread_id(), Some("t1"));
}

#[test]
fn scenario_a_stream_without_pause_stays_processing() {
    let mut session = session_in_processing("Summarize X", "t1");
    session.apply_stream(
        "t1",
        &stream_response(vec![manager_event("researcher")], false, &[]),
    );

    assert_eq!(session.phase(), Phase::Processing);
    assert_eq!(session.log().len(), 2);
    assert_eq!(session.log()[0].role, AgentRole::System);
    assert_eq!(session.log()[1].role, AgentRole::Manager);
    assert_eq!(
        session.log()[1].content,
        "Orchestrating logic. Route -> RESEARCHER"
    );
}

#[test]
fn scenario_b_paused_stream_opens_approval_gate() {
    let mut session = session_in_processing("Summarize X", "t1");
    session.apply_stream(
        "t1",
        &stream_response(vec![manager_event("researcher")], true, &["note1", "note2"]),
    );

    assert_eq!(session.phase(), Phase::AwaitingApproval);
    assert_eq!(session.research_notes(), ["note1", "note2"]);
    assert_eq!(session.latest_research_note(), Some("note2"));
}

#[test]
fn pause_replaces_snapshot_wholesale() {
    let mut session = session_in_processing("Summarize X", "t1");
    session.apply_stream("t1", &stream_response(vec![], true, &["old1", "old2"]));
    session.request_approval().expect("gate should be open");
    session.apply_stream("t1", &stream_response(vec![], true, &["new"]));

    assert_eq!(session.research_notes(), ["new"]);
}

#[test]
fn scenario_c_approval_with_final_output_finalizes() {
    let mut session = session_in_processing("Summarize X", "t1");
    session.apply_stream("t1", &stream_response(vec![], true, &["note1"]));

    let thread_id = session.request_approval().expect("gate should be open");
    assert_eq!(thread_id, "t1");
    // Paused flag clears optimistically, before the approve call resolves.
    assert_eq!(session.phase(), Phase::Processing);

    let before = session.log().len();
    session.apply_approval(
        "t1",
        &approve_response(vec![manager_event("writer")], Some("Report text")),
    );
    assert_eq!(session.phase(), Phase::Finalized);
    assert_eq!(session.final_report(), Some("Report text"));
    assert_eq!(session.log().len(), before + 1);
    assert_eq!(
        session.log().last().expect("entry should exist").content,
        "Orchestrating logic. Route -> WRITER"
    );
}

#[test]
fn scenario_d_approval_without_final_output_keeps_processing() {
    let mut session = session_in_processing("Summarize X", "t1");
    session.apply_stream("t1", &stream_response(vec![], true, &["note1"]));
    session.request_approval().expect("gate should be open");

    session.apply_approval("t1", &approve_response(vec![manager_event("writer")], None));
    assert_eq!(session.phase(), Phase::Processing);
    assert!(session.final_report().is_none());
    assert_eq!(session.log().len(), 2);
}

#[test]
fn empty_final_output_means_still_running() {
    let mut session = session_in_processing("Summarize X", "t1");
    session.apply_stream("t1", &stream_response(vec![], true, &["note1"]));
    session.request_approval().expect("gate should be open");

    session.apply_approval("t1", &approve_response(vec![], Some("")));
    assert_eq!(session.phase(), Phase::Processing);
    assert!(session.final_report().is_none());
}

#[test]
fn request_approval_outside_the_gate_returns_none() {
    let mut session = MissionSession::new();
    assert!(session.request_approval().is_none());
    session.submit_goal("Summarize X").expect("submit should pass");
    assert!(session.request_approval().is_none());
    assert_eq!(session.phase(), Phase::Processing);
}

#[test]
fn reset_returns_to_idle_from_any_phase() {
    let mut session = session_in_processing("Summarize X", "t1");
    session.apply_stream("t1", &stream_response(vec![], true, &["note1"]));
    session.request_approval().expect("gate should be open");
    session.apply_approval("t1", &approve_response(vec![], Some("Report text")));
    assert_eq!(session.phase(), Phase::Finalized);

    session.reset();
    assert_eq!(session.phase(), Phase::Idle);
    assert!(session.thread_id().is_none());
    assert!(session.log().is_empty());
    assert!(session.research_notes().is_empty());
    assert!(session.final_report().is_none());

    session.reset();
    assert_eq!(session.phase(), Phase::Idle);
    assert!(session.log().is_empty());
}

#[test]
fn round_trip_leaves_no_residual_state() {
    let run = |session: &mut MissionSession| {
        session.submit_goal("Summarize X").expect("submit should pass");
        session.confirm_initialized("t1");
        session.apply_stream(
            "t1",
            &stream_response(vec![manager_event("researcher")], false, &[]),
        );
        session
            .log()
            .iter()
            .map(|entry| (entry.role, entry.content.clone()))
            .collect::<Vec<_>>()
    };

    let mut session = MissionSession::new();
    let first_shape = run(&mut session);
    session.apply_stream("t1", &stream_response(vec![], true, &["note1"]));
    session.request_approval().expect("gate should be open");
    session.apply_approval("t1", &approve_response(vec![], Some("Report text")));

    session.reset();
    let second_shape = run(&mut session);
    assert_eq!(first_shape, second_shape);
}

#[test]
fn results_for_another_thread_are_ignored() {
    let mut session = session_in_processing("Summarize X", "t1");
    session.apply_stream(
        "t-other",
        &stream_response(vec![manager_event("researcher")], true, &["note1"]),
    );
    assert_eq!(session.phase(), Phase::Processing);
    assert_eq!(session.log().len(), 1);
    assert!(session.research_notes().is_empty());
}

#[test]
fn results_landing_after_reset_are_ignored() {
    let mut session = session_in_processing("Summarize X", "t1");
    session.reset();

    session.apply_stream(
        "t1",
        &stream_response(vec![manager_event("researcher")], true, &["note1"]),
    );
    session.apply_approval("t1", &approve_response(vec![], Some("Report text")));

    assert_eq!(session.phase(), Phase::Idle);
    assert!(session.log().is_empty());
    assert!(session.final_report().is_none());
}

#[test]
fn initialize_confirmation_after_reset_is_dropped() {
    let mut session = MissionSession::new();
    session.submit_goal("Summarize X").expect("submit should pass");
    session.reset();
    session.confirm_initialized("t1");
    assert!(session.thread_id().is_none());
}

#[test]
fn failures_never_move_the_phase_or_touch_the_log() {
    let mut session = session_in_processing("Summarize X", "t1");
    session.record_failure("stream call failed: connection refused");

    assert_eq!(session.phase(), Phase::Processing);
    assert_eq!(session.log().len(), 1);
    assert_eq!(
        session.last_failure(),
        Some("stream call failed: connection refused")
    );
}

#[test]
fn new_submission_clears_the_previous_failure() {
    let mut session = MissionSession::new();
    session.submit_goal("First").expect("submit should pass");
    session.record_failure("initialize call failed: timeout");
    session.reset();

    session.submit_goal("Second").expect("submit should pass");
    assert!(session.last_failure().is_none());
}

#[test]
fn submit_from_the_gate_starts_a_fresh_mission_on_the_same_log() {
    let mut session = session_in_processing("Summarize X", "t1");
    session.apply_stream("t1", &stream_response(vec![], true, &["note1"]));
    assert_eq!(session.phase(), Phase::AwaitingApproval);

    session.submit_goal("New objective").expect("submit should pass");
    assert_eq!(session.phase(), Phase::Processing);
    assert!(session.thread_id().is_none());
    assert!(session.research_notes().is_empty());
    assert_eq!(session.log().len(), 2);

    // The stale pause response for the abandoned mission no longer applies.
    session.apply_stream("t1", &stream_response(vec![manager_event("writer")], false, &[]));
    assert_eq!(session.log().len(), 2);
}

#[test]
fn submit_from_finalized_clears_the_artifact() {
    let mut session = session_in_processing("Summarize X", "t1");
    session.apply_stream("t1", &stream_response(vec![], true, &["note1"]));
    session.request_approval().expect("gate should be open");
    session.apply_approval("t1", &approve_response(vec![], Some("Report text")));

    session.submit_goal("Follow-up mission").expect("submit should pass");
    assert_eq!(session.phase(), Phase::Processing);
    assert!(session.final_report().is_none());
}
