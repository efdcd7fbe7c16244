use super::*;

use crate::protocol::StreamResponse;

#[test]
fn endpoint_url_joins_paths() {
    assert_eq!(
        endpoint_url("http://localhost:8000", "mission/initialize"),
        "http://localhost:8000/mission/initialize"
    );
}

#[test]
fn endpoint_url_tolerates_trailing_slash() {
    assert_eq!(
        endpoint_url("http://localhost:8000/", "mission/stream/t1"),
        "http://localhost:8000/mission/stream/t1"
    );
}

#[test]
fn default_config_targets_the_local_backend() {
    let config = ClientConfig::default();
    assert_eq!(config.endpoint, DEFAULT_ENDPOINT);
    assert_eq!(config.model, DEFAULT_MODEL);
}

#[test]
fn api_operation_labels_name_the_calls() {
    assert_eq!(ApiOperation::Initialize.label(), "initialize");
    assert_eq!(ApiOperation::Stream.label(), "stream");
    assert_eq!(ApiOperation::Approve.label(), "approve");
}

#[test]
fn drain_on_idle_client_returns_nothing() {
    let client = MissionApiClient::new();
    assert!(client.drain_events().is_empty());
}

#[test]
fn drain_preserves_send_order() {
    let client = MissionApiClient::new();
    let tx = client.event_sender();
    tx.send(ClientEvent::MissionStarted {
        thread_id: "t1".to_string(),
    })
    .expect("send should pass");
    tx.send(ClientEvent::StreamArrived {
        thread_id: "t1".to_string(),
        response: StreamResponse::default(),
    })
    .expect("send should pass");

    let events = client.drain_events();
    assert_eq!(events.len(), 2);
    assert!(matches!(&events[0], ClientEvent::MissionStarted { thread_id } if thread_id == "t1"));
    assert!(matches!(&events[1], ClientEvent::StreamArrived { thread_id, .. } if thread_id == "t1"));
}

#[test]
fn drain_respects_the_per_loop_cap() {
    let client = MissionApiClient::new();
    let tx = client.event_sender();
    for _ in 0..5 {
        tx.send(ClientEvent::CallFailed {
            operation: ApiOperation::Stream,
            detail: "boom".to_string(),
        })
        .expect("send should pass");
    }

    assert_eq!(client.drain_events_limited(3).len(), 3);
    assert_eq!(client.drain_events_limited(3).len(), 2);
    assert!(client.drain_events_limited(0).is_empty());
}
