use ratatui::prelude::*;
use ratatui::text::{Line, Text};
use ratatui::widgets::{Block, Padding, Paragraph};

use crate::app::{App, CommandSuggestion, Pane};
use crate::mission::Phase;
use crate::telemetry::{AgentRole, LogEntry};
use crate::text_layout::{wrap_display_line, wrap_input};
use crate::theme::Theme;

const STATUS_HEIGHT: u16 = 3;
const TITLE_BAR_HEIGHT: u16 = 3;
const TEXT_PADDING: u16 = 1;
const MAX_INPUT_TEXT_LINES: u16 = 5;
const WRAP_INDENT: usize = 4;
const ACTIVE_TITLE_BG: Color = Color::Rgb(90, 145, 200);
const ACTIVE_TITLE_FG: Color = Color::Black;
const MANAGER_FG: Color = Color::Rgb(245, 158, 11);
const RESEARCHER_FG: Color = Color::Rgb(16, 185, 129);
const WRITER_FG: Color = Color::Rgb(59, 130, 246);
const REVIEWER_FG: Color = Color::Rgb(239, 68, 68);
const STATUS_HELP_TEXT: &str =
    "Tab/Shift+Tab focus | Up/Down or wheel scroll | Enter submit | /approve /clear /quit";

struct ConsoleAreas {
    telemetry: Rect,
    command: Rect,
    output: Rect,
    status: Rect,
}

fn console_areas(screen: Rect) -> ConsoleAreas {
    let [body, status] = Layout::vertical([Constraint::Min(0), Constraint::Length(STATUS_HEIGHT)])
        .areas(screen);
    let [left, output] =
        Layout::horizontal([Constraint::Percentage(50), Constraint::Percentage(50)]).areas(body);
    let [telemetry, command] =
        Layout::vertical([Constraint::Percentage(60), Constraint::Percentage(40)]).areas(left);
    ConsoleAreas {
        telemetry,
        command,
        output,
        status,
    }
}

pub fn render(frame: &mut Frame, app: &App, theme: &Theme) {
    let areas = console_areas(frame.area());
    render_telemetry_pane(
        frame,
        areas.telemetry,
        app,
        app.active_pane == Pane::Telemetry,
        theme,
    );
    render_command_pane(
        frame,
        areas.command,
        app,
        app.active_pane == Pane::Command,
        theme,
    );
    render_output_pane(
        frame,
        areas.output,
        app,
        app.active_pane == Pane::Output,
        theme,
    );
    render_status_bar(frame, areas.status, app, theme);
}

pub fn max_scroll_for_active_pane(screen: Rect, app: &App) -> u16 {
    match app.active_pane {
        Pane::Telemetry => telemetry_max_scroll(screen, app),
        Pane::Output => output_max_scroll(screen, app),
        Pane::Command => 0,
    }
}

pub fn telemetry_max_scroll(screen: Rect, app: &App) -> u16 {
    let areas = console_areas(screen);
    let (width, height) = pane_content_metrics(areas.telemetry);
    let total = telemetry_lines(app.session().log(), width).len() as u16;
    total.saturating_sub(height)
}

pub fn output_max_scroll(screen: Rect, app: &App) -> u16 {
    let areas = console_areas(screen);
    let (width, height) = pane_content_metrics(areas.output);
    let total = output_lines(app, width).len() as u16;
    total.saturating_sub(height)
}

fn pane_content_metrics(area: Rect) -> (u16, u16) {
    let [_title, content] =
        Layout::vertical([Constraint::Length(TITLE_BAR_HEIGHT), Constraint::Min(0)]).areas(area);
    (
        content.width.saturating_sub(TEXT_PADDING * 2).max(1),
        content.height.saturating_sub(TEXT_PADDING * 2).max(1),
    )
}

fn title_bar_bg(base: Color, active: bool) -> Color {
    if active { ACTIVE_TITLE_BG } else { base }
}

fn render_pane_title(
    frame: &mut Frame,
    area: Rect,
    text: &str,
    base_bg: Color,
    active: bool,
    theme: &Theme,
) {
    let bg = title_bar_bg(base_bg, active);
    let fg = if active { ACTIVE_TITLE_FG } else { theme.muted_fg };
    frame.render_widget(Block::default().style(Style::default().bg(bg)), area);
    frame.render_widget(
        Paragraph::new(text)
            .style(Style::default().bg(bg).fg(fg))
            .block(
                Block::default()
                    .style(Style::default().bg(bg))
                    .padding(Padding::uniform(TEXT_PADDING)),
            ),
        area,
    );
}

fn role_fg(role: AgentRole, theme: &Theme) -> Color {
    match role {
        AgentRole::Manager => MANAGER_FG,
        AgentRole::Researcher => RESEARCHER_FG,
        AgentRole::Writer => WRITER_FG,
        AgentRole::Reviewer => REVIEWER_FG,
        AgentRole::System => theme.muted_fg,
    }
}

fn telemetry_lines(entries: &[LogEntry], width: u16) -> Vec<(String, AgentRole)> {
    let mut lines = Vec::new();
    for entry in entries {
        let rendered = format!(
            "[{}] {}: {}",
            entry.timestamp,
            entry.role.label().to_ascii_uppercase(),
            entry.content
        );
        for line in wrap_display_line(&rendered, width, WRAP_INDENT) {
            lines.push((line, entry.role));
        }
    }
    lines
}

fn render_telemetry_pane(frame: &mut Frame, area: Rect, app: &App, active: bool, theme: &Theme) {
    let [title_area, content_area] =
        Layout::vertical([Constraint::Length(TITLE_BAR_HEIGHT), Constraint::Min(0)]).areas(area);
    render_pane_title(
        frame,
        title_area,
        "Neural Telemetry",
        theme.telemetry_bg,
        active,
        theme,
    );

    let width = content_area.width.saturating_sub(TEXT_PADDING * 2).max(1);
    let lines: Vec<Line> = telemetry_lines(app.session().log(), width)
        .into_iter()
        .map(|(text, role)| Line::styled(text, Style::default().fg(role_fg(role, theme))))
        .collect();
    let scroll = app
        .telemetry_scroll()
        .min(telemetry_max_scroll(frame.area(), app));
    frame.render_widget(
        Paragraph::new(Text::from(lines))
            .style(Style::default().bg(theme.telemetry_bg).fg(theme.text_fg))
            .scroll((scroll, 0))
            .block(
                Block::default()
                    .style(Style::default().bg(theme.telemetry_bg))
                    .padding(Padding::uniform(TEXT_PADDING)),
            ),
        content_area,
    );
}

fn phase_label(phase: Phase) -> &'static str {
    match phase {
        Phase::Idle => "STANDBY",
        Phase::Processing => "PROCESSING",
        Phase::AwaitingApproval => "AWAITING AUTHORIZATION",
        Phase::Finalized => "FINALIZED",
    }
}

fn render_command_pane(frame: &mut Frame, area: Rect, app: &App, active: bool, theme: &Theme) {
    let [title_area, content] =
        Layout::vertical([Constraint::Length(TITLE_BAR_HEIGHT), Constraint::Min(0)]).areas(area);
    render_pane_title(
        frame,
        title_area,
        "Mission Parameters",
        theme.command_bg,
        active,
        theme,
    );

    frame.render_widget(
        Block::default().style(Style::default().bg(theme.command_bg)),
        content,
    );
    if content.width < 1 || content.height < 2 {
        return;
    }

    let input_text_width = content.width.saturating_sub(TEXT_PADDING * 2).max(1);
    let wrapped_input = wrap_input(app.input(), input_text_width);
    let (cursor_line, cursor_col) = app.input_cursor_line_col(input_text_width);
    let max_input_height = content.height.saturating_sub(1).max(1);
    let (input_height, input_scroll) =
        input_box_metrics(wrapped_input.line_count, cursor_line, max_input_height);

    let [info_area, input_area] =
        Layout::vertical([Constraint::Min(1), Constraint::Length(input_height)]).areas(content);

    let session = app.session();
    let mut info_lines = vec![format!("Phase: {}", phase_label(session.phase()))];
    if let Some(thread_id) = session.thread_id() {
        info_lines.push(format!("Thread: {thread_id}"));
    }
    if session.phase() == Phase::Idle {
        info_lines.push("Type a mission goal and press Enter.".to_string());
    }
    if session.phase() == Phase::AwaitingApproval {
        info_lines.push("Type /approve to authorize synthesis.".to_string());
    }
    frame.render_widget(
        Paragraph::new(info_lines.join("\n"))
            .style(Style::default().bg(theme.command_bg).fg(theme.muted_fg))
            .block(
                Block::default()
                    .style(Style::default().bg(theme.command_bg))
                    .padding(Padding::uniform(TEXT_PADDING)),
            ),
        info_area,
    );

    frame.render_widget(
        Paragraph::new(wrapped_input.rendered)
            .style(Style::default().bg(theme.input_bg).fg(theme.text_fg))
            .scroll((input_scroll, 0))
            .block(
                Block::default()
                    .style(Style::default().bg(theme.input_bg))
                    .padding(Padding::uniform(TEXT_PADDING)),
            ),
        input_area,
    );

    if app.should_show_command_index() {
        render_command_index(frame, app.command_suggestions(), info_area, input_area, theme);
    }

    if active {
        let input_inner = input_area.inner(Margin {
            horizontal: TEXT_PADDING,
            vertical: TEXT_PADDING,
        });
        if input_inner.width > 0 && input_inner.height > 0 {
            let visible_cursor_line = cursor_line.saturating_sub(input_scroll);
            if visible_cursor_line < input_inner.height {
                frame.set_cursor_position((
                    input_inner
                        .x
                        .saturating_add(cursor_col.min(input_inner.width.saturating_sub(1))),
                    input_inner.y.saturating_add(visible_cursor_line),
                ));
            }
        }
    }
}

fn input_box_metrics(input_text_lines: u16, cursor_line: u16, max_height: u16) -> (u16, u16) {
    let text_lines = input_text_lines.max(1).min(MAX_INPUT_TEXT_LINES);
    let height = text_lines
        .saturating_add(TEXT_PADDING * 2)
        .min(max_height.max(1));
    let visible = height.saturating_sub(TEXT_PADDING * 2).max(1);
    let scroll = cursor_line.saturating_sub(visible.saturating_sub(1));
    (height, scroll)
}

fn render_command_index(
    frame: &mut Frame,
    suggestions: Vec<CommandSuggestion>,
    info_area: Rect,
    input_area: Rect,
    theme: &Theme,
) {
    if suggestions.is_empty() || info_area.height == 0 || input_area.width == 0 {
        return;
    }
    let max_items = info_area.height.saturating_sub(2).max(1) as usize;
    let shown = suggestions.into_iter().take(max_items).collect::<Vec<_>>();
    let overlay_height = (shown.len() as u16)
        .saturating_add(2)
        .min(info_area.height.max(1));
    let y = input_area.y.saturating_sub(overlay_height).max(info_area.y);
    let overlay = Rect::new(input_area.x, y, input_area.width, overlay_height);

    let mut lines = Vec::with_capacity(shown.len());
    for (idx, item) in shown.iter().enumerate() {
        let style = if idx == 0 {
            Style::default().fg(theme.active_fg)
        } else {
            Style::default().fg(theme.text_fg)
        };
        lines.push(Line::styled(
            format!("{}  {}", item.command, item.description),
            style,
        ));
    }
    frame.render_widget(ratatui::widgets::Clear, overlay);
    frame.render_widget(
        Paragraph::new(Text::from(lines)).block(
            Block::default()
                .style(Style::default().bg(theme.status_bg))
                .padding(Padding::uniform(TEXT_PADDING)),
        ),
        overlay,
    );
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum OutputLineKind {
    Gate,
    Report,
    Placeholder,
    Footer,
}

fn output_lines(app: &App, width: u16) -> Vec<(String, OutputLineKind)> {
    let session = app.session();
    let mut lines = Vec::new();

    if session.phase() == Phase::AwaitingApproval {
        lines.push(("AUTHORIZATION REQUIRED".to_string(), OutputLineKind::Gate));
        lines.push((
            "Human-in-the-loop checkpoint active.".to_string(),
            OutputLineKind::Gate,
        ));
        lines.push((String::new(), OutputLineKind::Gate));
        let note = session.latest_research_note().unwrap_or("No Data");
        for line in wrap_display_line(note, width, 0) {
            lines.push((line, OutputLineKind::Gate));
        }
        lines.push((String::new(), OutputLineKind::Gate));
        lines.push((
            "Type /approve to authorize synthesis.".to_string(),
            OutputLineKind::Gate,
        ));
        lines.push((String::new(), OutputLineKind::Gate));
    }

    match session.final_report() {
        Some(report) => {
            for raw_line in report.lines() {
                if raw_line.trim().is_empty() {
                    lines.push((String::new(), OutputLineKind::Report));
                    continue;
                }
                for line in wrap_display_line(raw_line, width, 0) {
                    lines.push((line, OutputLineKind::Report));
                }
            }
            lines.push((String::new(), OutputLineKind::Report));
            lines.push((
                format!(
                    "WORDS: {} | STATUS: FINALIZED",
                    report.split_whitespace().count()
                ),
                OutputLineKind::Footer,
            ));
        }
        None => {
            lines.push((
                "Awaiting neural synthesis...".to_string(),
                OutputLineKind::Placeholder,
            ));
        }
    }
    lines
}

fn render_output_pane(frame: &mut Frame, area: Rect, app: &App, active: bool, theme: &Theme) {
    let [title_area, content_area] =
        Layout::vertical([Constraint::Length(TITLE_BAR_HEIGHT), Constraint::Min(0)]).areas(area);
    render_pane_title(
        frame,
        title_area,
        "Intelligence Output",
        theme.output_bg,
        active,
        theme,
    );

    let width = content_area.width.saturating_sub(TEXT_PADDING * 2).max(1);
    let lines: Vec<Line> = output_lines(app, width)
        .into_iter()
        .map(|(text, kind)| {
            let style = match kind {
                OutputLineKind::Gate => Style::default().fg(theme.alert_fg),
                OutputLineKind::Report => Style::default().fg(theme.text_fg),
                OutputLineKind::Placeholder | OutputLineKind::Footer => {
                    Style::default().fg(theme.muted_fg)
                }
            };
            Line::styled(text, style)
        })
        .collect();
    let scroll = app.output_scroll().min(output_max_scroll(frame.area(), app));
    frame.render_widget(
        Paragraph::new(Text::from(lines))
            .style(Style::default().bg(theme.output_bg).fg(theme.text_fg))
            .scroll((scroll, 0))
            .block(
                Block::default()
                    .style(Style::default().bg(theme.output_bg))
                    .padding(Padding::uniform(TEXT_PADDING)),
            ),
        content_area,
    );
}

fn working_dots(ticks: u64) -> &'static str {
    const FRAMES: [&str; 6] = ["[   ]", "[.  ]", "[.. ]", "[...]", "[ ..]", "[  .]"];
    FRAMES[((ticks / 2) as usize) % FRAMES.len()]
}

fn render_status_bar(frame: &mut Frame, area: Rect, app: &App, theme: &Theme) {
    frame.render_widget(
        Block::default().style(Style::default().bg(theme.status_bg)),
        area,
    );
    // An alert replaces the help text for the row; appending it would push it
    // past the right edge on common terminal widths.
    let mut spans = match app.notice().or_else(|| app.session().last_failure()) {
        Some(alert) => vec![ratatui::text::Span::styled(
            alert.to_string(),
            Style::default().fg(theme.alert_fg),
        )],
        None => vec![ratatui::text::Span::styled(
            STATUS_HELP_TEXT,
            Style::default().fg(theme.muted_fg),
        )],
    };
    if app.is_call_in_flight() {
        spans.push(ratatui::text::Span::styled(
            format!(" | Mission working {}", working_dots(app.ticks)),
            Style::default().fg(theme.active_fg),
        ));
    }
    frame.render_widget(
        Paragraph::new(Line::from(spans))
            .style(Style::default().bg(theme.status_bg))
            .block(
                Block::default()
                    .style(Style::default().bg(theme.status_bg))
                    .padding(Padding::uniform(TEXT_PADDING)),
            ),
        area,
    );
}

#[cfg(test)]
#[path = "../tests/unit/ui_tests.rs"]
mod tests;
