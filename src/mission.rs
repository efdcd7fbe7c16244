use crate::normalizer;
use crate::protocol::{ApproveResponse, StreamResponse};
use crate::telemetry::{AgentRole, LogEntry, TelemetryLog};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Phase {
    #[default]
    Idle,
    Processing,
    AwaitingApproval,
    Finalized,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitRejection {
    EmptyGoal,
    MissionInFlight,
}

impl SubmitRejection {
    pub fn message(self) -> &'static str {
        match self {
            SubmitRejection::EmptyGoal => "Enter a mission goal before launching.",
            SubmitRejection::MissionInFlight => "A mission is already in flight.",
        }
    }
}

/// The mission state machine. One instance per console, owned by the App and
/// mutated only on the UI thread; client threads never see it.
#[derive(Debug, Default)]
pub struct MissionSession {
    phase: Phase,
    thread_id: Option<String>,
    log: TelemetryLog,
    research_notes: Vec<String>,
    final_report: Option<String>,
    last_failure: Option<String>,
}

impl MissionSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn thread_id(&self) -> Option<&str> {
        self.thread_id.as_deref()
    }

    pub fn log(&self) -> &[LogEntry] {
        self.log.entries()
    }

    pub fn research_notes(&self) -> &[String] {
        &self.research_notes
    }

    /// The note shown in the approval gate; only the most recent one is
    /// surfaced to the operator.
    pub fn latest_research_note(&self) -> Option<&str> {
        self.research_notes.last().map(String::as_str)
    }

    pub fn final_report(&self) -> Option<&str> {
        self.final_report.as_deref()
    }

    pub fn last_failure(&self) -> Option<&str> {
        self.last_failure.as_deref()
    }

    /// Enters processing optimistically and logs the goal before the
    /// initialize call confirms; the thread id arrives later through
    /// `confirm_initialized`. Rejected while a mission is mid-flight.
    pub fn submit_goal(&mut self, goal: &str) -> Result<(), SubmitRejection> {
        let goal = goal.trim();
        if goal.is_empty() {
            return Err(SubmitRejection::EmptyGoal);
        }
        if self.phase == Phase::Processing {
            return Err(SubmitRejection::MissionInFlight);
        }
        // Launching from the paused or finalized phase starts a fresh mission
        // on the same log; the prior run's identity and outputs no longer
        // apply.
        self.thread_id = None;
        self.research_notes.clear();
        self.final_report = None;
        self.last_failure = None;
        self.phase = Phase::Processing;
        self.log.push(LogEntry::new(
            AgentRole::System,
            format!("Mission Initialized: {goal}"),
        ));
        Ok(())
    }

    /// Records the backend's thread id once initialize confirms. A
    /// confirmation landing after a reset is dropped.
    pub fn confirm_initialized(&mut self, thread_id: &str) {
        if self.phase != Phase::Processing {
            return;
        }
        self.thread_id = Some(thread_id.to_string());
    }

    pub fn apply_stream(&mut self, thread_id: &str, response: &StreamResponse) {
        if !self.owns_thread(thread_id) {
            return;
        }
        self.log.append(normalizer::normalize_events(&response.events));
        if response.is_paused {
            self.phase = Phase::AwaitingApproval;
            self.research_notes = response
                .current_state
                .as_ref()
                .map(|state| state.research_notes.clone())
                .unwrap_or_default();
        }
    }

    /// Clears the paused phase optimistically and hands back the thread id
    /// for the approve call; the response reconciles the authoritative state
    /// when it arrives. Returns None outside the approval gate.
    pub fn request_approval(&mut self) -> Option<String> {
        if self.phase != Phase::AwaitingApproval {
            return None;
        }
        let thread_id = self.thread_id.clone()?;
        self.phase = Phase::Processing;
        Some(thread_id)
    }

    pub fn apply_approval(&mut self, thread_id: &str, response: &ApproveResponse) {
        if !self.owns_thread(thread_id) {
            return;
        }
        self.log.append(normalizer::normalize_events(&response.events));
        // An empty final_output means the mission is still running; the
        // artifact is only ever set to non-empty text.
        if let Some(report) = response
            .final_output
            .as_deref()
            .filter(|text| !text.is_empty())
        {
            self.final_report = Some(report.to_string());
            self.phase = Phase::Finalized;
        }
    }

    /// Transport and protocol failures never move the phase and never append
    /// telemetry; the detail is kept so the console can show a stalled
    /// mission instead of a silently quiet one.
    pub fn record_failure(&mut self, detail: impl Into<String>) {
        self.last_failure = Some(detail.into());
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }

    fn owns_thread(&self, thread_id: &str) -> bool {
        // Results from before a reset carry a thread id the session no longer
        // holds, so they fall out here.
        self.phase != Phase::Idle && self.thread_id.as_deref() == Some(thread_id)
    }
}

#[cfg(test)]
#[path = "../tests/unit/mission_tests.rs"]
mod tests;
