//! Monitor view
//!
//! A nested, time-sliced loop entered from the console. It keeps draining
//! the same client-event channel with the server's shared handler (so the
//! display reflects live traffic), redraws a full-screen status view on
//! every tick, and records output values to CSV while toggled on.
//!
//! Keys: `q` returns to the console, `r` toggles recording. Each toggle
//! to ON opens a brand-new artifact with a freshly frozen client list.

use std::io::{self, Stderr};
use std::time::{Duration, Instant};

use crossterm::execute;
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use patchbay_protocol::{ClientId, CHANNELS_PER_CLIENT};
use patchbay_recorder::RecordingSession;
use ratatui::backend::CrosstermBackend;
use ratatui::layout::{Constraint, Layout};
use ratatui::text::Line;
use ratatui::widgets::{Paragraph, Row, Table};
use ratatui::Terminal;
use tokio::sync::mpsc;
use tokio::time::MissedTickBehavior;

use crate::console::{ConsoleEvent, ConsoleMode};
use crate::server::{Event, Server};

type Tui = Terminal<CrosstermBackend<Stderr>>;

/// Run the monitor until the operator quits it
///
/// Suspends ordinary console dispatch: the serve loop's select is parked
/// inside this call, and every event both loops care about flows through
/// the same handler.
pub async fn run(
    server: &mut Server,
    events: &mut mpsc::UnboundedReceiver<Event>,
    console: &mut mpsc::UnboundedReceiver<ConsoleEvent>,
    fps: u32,
) {
    println!("Entering monitor mode at {fps} FPS.");
    let mut terminal = match setup_terminal() {
        Ok(terminal) => terminal,
        Err(e) => {
            println!("Cannot enter monitor mode: {e}");
            return;
        }
    };
    server.set_console_mode(ConsoleMode::Key);

    let started = Instant::now();
    let mut recording: Option<RecordingSession> = None;

    let period = Duration::from_micros((1_000_000 / u64::from(fps)).max(1));
    let mut ticker = tokio::time::interval(period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    let mut quit = false;
    while !quit {
        tokio::select! {
            _ = ticker.tick() => {
                if let Some(session) = recording.as_mut() {
                    let snapshots: Vec<Option<[String; CHANNELS_PER_CLIENT]>> = session
                        .frozen()
                        .iter()
                        .map(|&id| server.switchboard().outputs_snapshot(id))
                        .collect();
                    if let Err(e) = session.append(started.elapsed(), &snapshots) {
                        tracing::warn!(error = %e, "recording stopped");
                        recording = None;
                    }
                }
                draw(&mut terminal, server, fps, recording.as_ref());
            }

            Some(event) = events.recv() => server.handle_event(event),

            Some(input) = console.recv() => {
                if let ConsoleEvent::Key(key) = input {
                    match key {
                        'q' | 'Q' => quit = true,
                        'r' | 'R' => toggle_recording(server, &mut recording),
                        _ => {}
                    }
                }
            }
        }
    }

    // Closes the artifact, if one is open
    drop(recording);

    restore_terminal(terminal);
    server.set_console_mode(ConsoleMode::Line);
    println!("Exiting monitor mode.");
}

/// Start a new recording session, or close the open one
fn toggle_recording(server: &Server, recording: &mut Option<RecordingSession>) {
    if recording.take().is_some() {
        return;
    }
    let frozen: Vec<ClientId> = server.switchboard().clients().map(|slot| slot.id()).collect();
    match RecordingSession::start(&server.config().monitor.logs_dir, &frozen) {
        Ok(session) => *recording = Some(session),
        Err(e) => {
            // Reported once; recording stays off, the view keeps running
            tracing::warn!(error = %e, "cannot start recording");
        }
    }
}

fn draw(terminal: &mut Tui, server: &Server, fps: u32, recording: Option<&RecordingSession>) {
    let result = terminal.draw(|frame| {
        let [status_area, table_area] =
            Layout::vertical([Constraint::Length(4), Constraint::Min(0)]).areas(frame.area());

        let recording_line = match recording {
            Some(session) => format!("Recording: ON (file: {})", session.path().display()),
            None => "Recording: OFF".to_string(),
        };
        let status = Paragraph::new(vec![
            Line::from(format!("Monitor ({fps} FPS)")),
            Line::from("Press 'Q' to quit, 'R' to toggle recording."),
            Line::from(recording_line),
        ]);
        frame.render_widget(status, status_area);

        let rows: Vec<Row> = server
            .switchboard()
            .clients()
            .map(|slot| {
                let outputs = server
                    .switchboard()
                    .outputs_snapshot(slot.id())
                    .unwrap_or_default();
                let mut cells = vec![slot.id().to_string()];
                cells.extend(outputs.into_iter().map(|value| value.replace(['\n', '\r'], " ")));
                Row::new(cells)
            })
            .collect();

        let mut widths = vec![Constraint::Length(10)];
        widths.extend(std::iter::repeat_n(Constraint::Fill(1), CHANNELS_PER_CLIENT));
        let table = Table::new(rows, widths)
            .header(Row::new(["Client", "out0", "out1", "out2", "out3", "out4"]))
            .column_spacing(2);
        frame.render_widget(table, table_area);
    });

    if let Err(e) = result {
        tracing::warn!(error = %e, "monitor draw failed");
    }
}

fn setup_terminal() -> io::Result<Tui> {
    enable_raw_mode()?;
    let mut stderr = io::stderr();
    if let Err(e) = execute!(stderr, EnterAlternateScreen) {
        let _ = disable_raw_mode();
        return Err(e);
    }
    Terminal::new(CrosstermBackend::new(stderr))
}

fn restore_terminal(mut terminal: Tui) {
    let _ = disable_raw_mode();
    let _ = execute!(terminal.backend_mut(), LeaveAlternateScreen);
    let _ = terminal.show_cursor();
}
