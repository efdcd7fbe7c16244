use std::time::{SystemTime, UNIX_EPOCH};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AgentRole {
    Manager,
    Researcher,
    Writer,
    Reviewer,
    System,
}

impl AgentRole {
    pub fn label(self) -> &'static str {
        match self {
            AgentRole::Manager => "manager",
            AgentRole::Researcher => "researcher",
            AgentRole::Writer => "writer",
            AgentRole::Reviewer => "reviewer",
            AgentRole::System => "system",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogEntry {
    pub role: AgentRole,
    pub content: String,
    pub timestamp: String,
}

impl LogEntry {
    /// Stamps the entry with the wall clock at capture time. Backend
    /// timestamps, if any, are ignored.
    pub fn new(role: AgentRole, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
            timestamp: timestamp_label(),
        }
    }
}

pub fn timestamp_label() -> String {
    let secs = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0);
    let day_secs = secs % 86_400;
    format!(
        "{:02}:{:02}:{:02}",
        day_secs / 3600,
        (day_secs / 60) % 60,
        day_secs % 60
    )
}

/// Append-only mission log. Entries are never mutated, reordered, or
/// deduplicated; `reset` is the only way to remove them.
#[derive(Debug, Default)]
pub struct TelemetryLog {
    entries: Vec<LogEntry>,
}

impl TelemetryLog {
    pub fn push(&mut self, entry: LogEntry) {
        self.entries.push(entry);
    }

    pub fn append(&mut self, entries: Vec<LogEntry>) {
        self.entries.extend(entries);
    }

    pub fn entries(&self) -> &[LogEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn reset(&mut self) {
        self.entries.clear();
    }
}

#[cfg(test)]
#[path = "../tests/unit/telemetry_tests.rs"]
mod tests;
