use crate::mission::MissionSession;

const COMMAND_INDEX: [(&str, &str); 4] = [
    ("/approve", "Authorize synthesis and resume the mission"),
    ("/clear", "Reset the console for a new mission"),
    ("/quit", "Quit app"),
    ("/exit", "Quit app"),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CommandSuggestion {
    pub command: &'static str,
    pub description: &'static str,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pane {
    Telemetry,
    Command,
    Output,
}

/// Work the UI loop must hand to the Mission Client after a submit; the
/// session has already transitioned by the time one of these is returned.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConsoleCommand {
    StartMission(String),
    Approve(String),
}

#[derive(Debug)]
pub struct App {
    pub running: bool,
    pub ticks: u64,
    pub active_pane: Pane,
    session: MissionSession,
    input: String,
    input_cursor: usize,
    telemetry_scroll: u16,
    output_scroll: u16,
    call_in_flight: bool,
    notice: Option<String>,
}

impl Default for App {
    fn default() -> Self {
        Self {
            running: true,
            ticks: 0,
            active_pane: Pane::Command,
            session: MissionSession::new(),
            input: String::new(),
            input_cursor: 0,
            telemetry_scroll: 0,
            output_scroll: 0,
            call_in_flight: false,
            notice: None,
        }
    }
}

impl App {
    pub fn on_tick(&mut self) {
        self.ticks = self.ticks.saturating_add(1);
    }

    pub fn quit(&mut self) {
        self.running = false;
    }

    pub fn session(&self) -> &MissionSession {
        &self.session
    }

    pub fn session_mut(&mut self) -> &mut MissionSession {
        &mut self.session
    }

    pub fn next_pane(&mut self) {
        self.active_pane = match self.active_pane {
            Pane::Telemetry => Pane::Command,
            Pane::Command => Pane::Output,
            Pane::Output => Pane::Telemetry,
        };
    }

    pub fn prev_pane(&mut self) {
        self.active_pane = match self.active_pane {
            Pane::Telemetry => Pane::Output,
            Pane::Command => Pane::Telemetry,
            Pane::Output => Pane::Command,
        };
    }

    pub fn telemetry_scroll(&self) -> u16 {
        self.telemetry_scroll
    }

    pub fn output_scroll(&self) -> u16 {
        self.output_scroll
    }

    pub fn scroll_up(&mut self) {
        match self.active_pane {
            Pane::Telemetry => self.telemetry_scroll = self.telemetry_scroll.saturating_sub(1),
            Pane::Output => self.output_scroll = self.output_scroll.saturating_sub(1),
            Pane::Command => {}
        }
    }

    /// The caller supplies the maximum from the UI layout so the offset never
    /// runs past the last wrapped line.
    pub fn scroll_down(&mut self, max_scroll: u16) {
        match self.active_pane {
            Pane::Telemetry => {
                self.telemetry_scroll = self.telemetry_scroll.saturating_add(1).min(max_scroll);
            }
            Pane::Output => {
                self.output_scroll = self.output_scroll.saturating_add(1).min(max_scroll);
            }
            Pane::Command => {}
        }
    }

    pub fn input(&self) -> &str {
        &self.input
    }

    pub fn input_char(&mut self, c: char) {
        let byte_idx = char_to_byte_idx(&self.input, self.input_cursor);
        self.input.insert(byte_idx, c);
        self.input_cursor = self.input_cursor.saturating_add(1);
    }

    pub fn backspace_input(&mut self) {
        if self.input_cursor == 0 {
            return;
        }
        let start = char_to_byte_idx(&self.input, self.input_cursor.saturating_sub(1));
        let end = char_to_byte_idx(&self.input, self.input_cursor);
        self.input.drain(start..end);
        self.input_cursor = self.input_cursor.saturating_sub(1);
    }

    pub fn move_cursor_left(&mut self) {
        self.input_cursor = self.input_cursor.saturating_sub(1);
    }

    pub fn move_cursor_right(&mut self) {
        let char_len = self.input.chars().count();
        self.input_cursor = (self.input_cursor + 1).min(char_len);
    }

    /// (line, column) of the cursor after word-wrapping the input to `width`.
    pub fn input_cursor_line_col(&self, width: u16) -> (u16, u16) {
        let wrapped = crate::text_layout::wrap_input(&self.input, width.max(1));
        wrapped
            .positions
            .get(self.input_cursor)
            .copied()
            .unwrap_or((0, 0))
    }

    pub fn is_call_in_flight(&self) -> bool {
        self.call_in_flight
    }

    pub fn set_call_in_flight(&mut self, in_flight: bool) {
        self.call_in_flight = in_flight;
    }

    pub fn notice(&self) -> Option<&str> {
        self.notice.as_deref()
    }

    pub fn should_show_command_index(&self) -> bool {
        self.input.trim_start().starts_with('/')
    }

    pub fn command_suggestions(&self) -> Vec<CommandSuggestion> {
        let prefix = self.input.trim();
        COMMAND_INDEX
            .iter()
            .filter(|(command, _)| command.starts_with(prefix))
            .map(|(command, description)| CommandSuggestion {
                command,
                description,
            })
            .collect()
    }

    /// Takes the input buffer and routes it: slash commands act on the
    /// console, anything else is a mission goal. Rejections surface as a
    /// status-bar notice, never as telemetry.
    pub fn submit_input(&mut self) -> Option<ConsoleCommand> {
        let raw = std::mem::take(&mut self.input);
        self.input_cursor = 0;
        self.submit_text(&raw)
    }

    pub fn submit_text(&mut self, text: &str) -> Option<ConsoleCommand> {
        self.notice = None;
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return None;
        }
        match trimmed {
            "/quit" | "/exit" => {
                self.running = false;
                None
            }
            "/clear" => {
                self.reset_console();
                None
            }
            "/approve" => match self.session.request_approval() {
                Some(thread_id) => Some(ConsoleCommand::Approve(thread_id)),
                None => {
                    self.notice = Some("Nothing is awaiting approval.".to_string());
                    None
                }
            },
            command if command.starts_with('/') => {
                self.notice = Some(format!("Unknown command: {command}"));
                None
            }
            goal => match self.session.submit_goal(goal) {
                Ok(()) => Some(ConsoleCommand::StartMission(goal.to_string())),
                Err(rejection) => {
                    self.notice = Some(rejection.message().to_string());
                    None
                }
            },
        }
    }

    fn reset_console(&mut self) {
        self.session.reset();
        self.telemetry_scroll = 0;
        self.output_scroll = 0;
        // Any response still in flight is stale after this; the session's
        // thread-id guard drops it when it lands.
        self.call_in_flight = false;
    }
}

fn char_to_byte_idx(text: &str, char_idx: usize) -> usize {
    text.char_indices()
        .nth(char_idx)
        .map(|(idx, _)| idx)
        .unwrap_or(text.len())
}

#[cfg(test)]
#[path = "../tests/unit/app_tests.rs"]
mod tests;
