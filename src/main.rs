use std::io;
use std::path::PathBuf;

use crossterm::cursor::SetCursorStyle;
use crossterm::event::{DisableMouseCapture, EnableMouseCapture};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::prelude::*;

mod app;
mod client;
mod config;
mod events;
mod mission;
mod normalizer;
mod protocol;
mod telemetry;
mod text_layout;
mod theme;
mod ui;

use app::{App, ConsoleCommand};
use client::{ClientConfig, ClientEvent, MissionApiClient};
use config::ConsoleConfig;
use events::AppEvent;
use theme::Theme;

const MAX_CLIENT_EVENTS_PER_LOOP: usize = 128;

fn main() -> io::Result<()> {
    let launch_options = parse_launch_options(std::env::args().skip(1))?;
    let startup_goal = if let Some(path) = &launch_options.goal_file {
        Some(std::fs::read_to_string(path)?)
    } else {
        None
    };
    let client_config = resolve_client_config(
        ConsoleConfig::load_or_default("console.toml"),
        &launch_options,
    );

    enable_raw_mode()?;

    let mut stdout = io::stdout();
    execute!(
        stdout,
        EnterAlternateScreen,
        EnableMouseCapture,
        SetCursorStyle::SteadyBar
    )?;

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;
    terminal.clear()?;
    let theme = Theme::load_or_default("theme.toml");
    let result = run_app(
        &mut terminal,
        App::default(),
        &theme,
        client_config,
        startup_goal.as_deref(),
    );

    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        SetCursorStyle::DefaultUserShape,
        DisableMouseCapture,
        LeaveAlternateScreen
    )?;
    terminal.show_cursor()?;

    result
}

fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    mut app: App,
    theme: &Theme,
    client_config: ClientConfig,
    startup_goal: Option<&str>,
) -> io::Result<()> {
    let client = MissionApiClient::with_config(client_config);

    if let Some(goal) = startup_goal {
        let command = app.submit_text(goal);
        dispatch_console_command(&mut app, &client, command);
    }

    while app.running {
        for event in client.drain_events_limited(MAX_CLIENT_EVENTS_PER_LOOP) {
            apply_client_event(&mut app, event);
        }

        terminal.draw(|frame| ui::render(frame, &app, theme))?;

        match events::next_event()? {
            AppEvent::Tick => app.on_tick(),
            AppEvent::Quit => app.quit(),
            AppEvent::NextPane => app.next_pane(),
            AppEvent::PrevPane => app.prev_pane(),
            AppEvent::ScrollUp | AppEvent::MouseScrollUp => app.scroll_up(),
            AppEvent::ScrollDown | AppEvent::MouseScrollDown => {
                let max_scroll = ui::max_scroll_for_active_pane(screen_rect(terminal)?, &app);
                app.scroll_down(max_scroll);
            }
            AppEvent::CursorLeft => app.move_cursor_left(),
            AppEvent::CursorRight => app.move_cursor_right(),
            AppEvent::InputChar(c) => app.input_char(c),
            AppEvent::Backspace => app.backspace_input(),
            AppEvent::Submit => {
                let command = app.submit_input();
                dispatch_console_command(&mut app, &client, command);
            }
        }
    }

    Ok(())
}

/// All session mutation happens here, on the UI thread, in reaction to what
/// the client threads sent back. Stale results are dropped by the session's
/// own thread-id guard.
fn apply_client_event(app: &mut App, event: ClientEvent) {
    match event {
        ClientEvent::MissionStarted { thread_id } => {
            app.session_mut().confirm_initialized(&thread_id);
        }
        ClientEvent::StreamArrived {
            thread_id,
            response,
        } => {
            app.session_mut().apply_stream(&thread_id, &response);
            app.set_call_in_flight(false);
        }
        ClientEvent::ApprovalArrived {
            thread_id,
            response,
        } => {
            app.session_mut().apply_approval(&thread_id, &response);
            app.set_call_in_flight(false);
        }
        ClientEvent::CallFailed { operation, detail } => {
            app.session_mut()
                .record_failure(format!("{} call failed: {detail}", operation.label()));
            app.set_call_in_flight(false);
        }
    }
}

fn dispatch_console_command(
    app: &mut App,
    client: &MissionApiClient,
    command: Option<ConsoleCommand>,
) {
    match command {
        Some(ConsoleCommand::StartMission(goal)) => {
            client.start_mission(goal);
            app.set_call_in_flight(true);
        }
        Some(ConsoleCommand::Approve(thread_id)) => {
            client.approve(thread_id);
            app.set_call_in_flight(true);
        }
        None => {}
    }
}

fn screen_rect(terminal: &Terminal<CrosstermBackend<io::Stdout>>) -> io::Result<Rect> {
    let size = terminal.size()?;
    Ok(Rect::new(0, 0, size.width, size.height))
}

fn resolve_client_config(config: ConsoleConfig, launch_options: &LaunchOptions) -> ClientConfig {
    let mut client_config = config.client_config();
    if let Some(endpoint) = &launch_options.endpoint {
        client_config.endpoint = endpoint.clone();
    }
    if let Some(model) = &launch_options.model {
        client_config.model = model.clone();
    }
    client_config
}

#[derive(Debug, Default)]
struct LaunchOptions {
    goal_file: Option<PathBuf>,
    endpoint: Option<String>,
    model: Option<String>,
}

fn parse_launch_options<I>(args: I) -> io::Result<LaunchOptions>
where
    I: IntoIterator<Item = String>,
{
    let mut options = LaunchOptions::default();
    let mut iter = args.into_iter();
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--goal-file" => {
                let Some(path) = iter.next() else {
                    return Err(io::Error::new(
                        io::ErrorKind::InvalidInput,
                        "--goal-file requires a path argument",
                    ));
                };
                options.goal_file = Some(PathBuf::from(path));
            }
            "--endpoint" => {
                let Some(endpoint) = iter.next() else {
                    return Err(io::Error::new(
                        io::ErrorKind::InvalidInput,
                        "--endpoint requires a url argument",
                    ));
                };
                options.endpoint = Some(endpoint);
            }
            "--model" => {
                let Some(model) = iter.next() else {
                    return Err(io::Error::new(
                        io::ErrorKind::InvalidInput,
                        "--model requires a name argument",
                    ));
                };
                options.model = Some(model);
            }
            _ => {
                return Err(io::Error::new(
                    io::ErrorKind::InvalidInput,
                    format!("Unknown argument: {arg}"),
                ));
            }
        }
    }
    Ok(options)
}
