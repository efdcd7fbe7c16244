use std::sync::mpsc::{self, Receiver, Sender};
use std::thread;
use std::time::Duration;

use serde::de::DeserializeOwned;

use crate::protocol::{
    ApproveRequest, ApproveResponse, InitializeRequest, InitializeResponse, StreamResponse,
};

pub const DEFAULT_ENDPOINT: &str = "http://localhost:8000";
pub const DEFAULT_MODEL: &str = "gpt-4o-mini";
const REQUEST_TIMEOUT_SECS: u64 = 300;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApiOperation {
    Initialize,
    Stream,
    Approve,
}

impl ApiOperation {
    pub fn label(self) -> &'static str {
        match self {
            ApiOperation::Initialize => "initialize",
            ApiOperation::Stream => "stream",
            ApiOperation::Approve => "approve",
        }
    }
}

#[derive(Debug, Clone)]
pub enum ClientEvent {
    MissionStarted {
        thread_id: String,
    },
    StreamArrived {
        thread_id: String,
        response: StreamResponse,
    },
    ApprovalArrived {
        thread_id: String,
        response: ApproveResponse,
    },
    CallFailed {
        operation: ApiOperation,
        detail: String,
    },
}

#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub endpoint: String,
    pub model: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            model: DEFAULT_MODEL.to_string(),
        }
    }
}

/// Boundary adapter for the Mission API. Calls run on background threads and
/// report back through an mpsc channel that the UI loop drains; the adapter
/// itself holds no mission state.
pub struct MissionApiClient {
    config: ClientConfig,
    event_tx: Sender<ClientEvent>,
    event_rx: Receiver<ClientEvent>,
}

impl MissionApiClient {
    pub fn with_config(config: ClientConfig) -> Self {
        let (event_tx, event_rx) = mpsc::channel();
        Self {
            config,
            event_tx,
            event_rx,
        }
    }

    #[cfg(test)]
    pub fn new() -> Self {
        Self::with_config(ClientConfig::default())
    }

    /// Initialize the mission, then fetch the event stream exactly once.
    /// Both calls share one background thread so their outcomes arrive in
    /// order. There is no retry and no way to cancel an issued call.
    pub fn start_mission(&self, goal: String) {
        let config = self.config.clone();
        let tx = self.event_tx.clone();
        thread::spawn(move || {
            let thread_id = match initialize_call(&config, &goal) {
                Ok(response) => response.thread_id,
                Err(detail) => {
                    let _ = tx.send(ClientEvent::CallFailed {
                        operation: ApiOperation::Initialize,
                        detail,
                    });
                    return;
                }
            };
            let _ = tx.send(ClientEvent::MissionStarted {
                thread_id: thread_id.clone(),
            });
            match stream_call(&config, &thread_id) {
                Ok(response) => {
                    let _ = tx.send(ClientEvent::StreamArrived {
                        thread_id,
                        response,
                    });
                }
                Err(detail) => {
                    let _ = tx.send(ClientEvent::CallFailed {
                        operation: ApiOperation::Stream,
                        detail,
                    });
                }
            }
        });
    }

    pub fn approve(&self, thread_id: String) {
        let config = self.config.clone();
        let tx = self.event_tx.clone();
        thread::spawn(move || match approve_call(&config, &thread_id) {
            Ok(response) => {
                let _ = tx.send(ClientEvent::ApprovalArrived {
                    thread_id,
                    response,
                });
            }
            Err(detail) => {
                let _ = tx.send(ClientEvent::CallFailed {
                    operation: ApiOperation::Approve,
                    detail,
                });
            }
        });
    }

    #[cfg(test)]
    pub fn drain_events(&self) -> Vec<ClientEvent> {
        self.drain_events_limited(usize::MAX)
    }

    pub fn drain_events_limited(&self, max_events: usize) -> Vec<ClientEvent> {
        let mut events = Vec::new();
        if max_events == 0 {
            return events;
        }
        while events.len() < max_events {
            let Ok(event) = self.event_rx.try_recv() else {
                break;
            };
            events.push(event);
        }
        events
    }

    #[cfg(test)]
    pub fn event_sender(&self) -> Sender<ClientEvent> {
        self.event_tx.clone()
    }
}

pub fn endpoint_url(endpoint: &str, path: &str) -> String {
    format!("{}/{}", endpoint.trim_end_matches('/'), path)
}

fn http_client() -> Result<reqwest::blocking::Client, String> {
    reqwest::blocking::Client::builder()
        .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
        .build()
        .map_err(|err| format!("failed to build http client: {err}"))
}

fn initialize_call(config: &ClientConfig, goal: &str) -> Result<InitializeResponse, String> {
    let client = http_client()?;
    let request = InitializeRequest {
        goal: goal.to_string(),
        model: config.model.clone(),
    };
    let response = client
        .post(endpoint_url(&config.endpoint, "mission/initialize"))
        .json(&request)
        .send()
        .map_err(|err| format!("initialize request failed: {err}"))?;
    decode_response(response, ApiOperation::Initialize)
}

fn stream_call(config: &ClientConfig, thread_id: &str) -> Result<StreamResponse, String> {
    let client = http_client()?;
    let response = client
        .get(endpoint_url(
            &config.endpoint,
            &format!("mission/stream/{thread_id}"),
        ))
        .send()
        .map_err(|err| format!("stream request failed: {err}"))?;
    decode_response(response, ApiOperation::Stream)
}

fn approve_call(config: &ClientConfig, thread_id: &str) -> Result<ApproveResponse, String> {
    let client = http_client()?;
    let request = ApproveRequest {
        thread_id: thread_id.to_string(),
        approve: true,
    };
    let response = client
        .post(endpoint_url(&config.endpoint, "mission/approve"))
        .json(&request)
        .send()
        .map_err(|err| format!("approve request failed: {err}"))?;
    decode_response(response, ApiOperation::Approve)
}

fn decode_response<T: DeserializeOwned>(
    response: reqwest::blocking::Response,
    operation: ApiOperation,
) -> Result<T, String> {
    let status = response.status();
    if !status.is_success() {
        return Err(format!("{} returned status {status}", operation.label()));
    }
    response
        .json::<T>()
        .map_err(|err| format!("{} returned an unreadable body: {err}", operation.label()))
}

#[cfg(test)]
#[path = "../tests/unit/client_tests.rs"]
mod tests;
