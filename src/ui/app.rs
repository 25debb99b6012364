//! Main TUI application state and logic

use crate::interpreter::engine::{CancelToken, Engine};
use crate::samples;
use crate::script::Script;
use crate::snapshot::{RunStatus, Snapshot, SnapshotHistory};
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind};
use ratatui::{
    backend::Backend,
    layout::{Constraint, Direction, Layout},
    Frame, Terminal,
};
use std::io;
use std::sync::mpsc::{self, Receiver, TryRecvError};
use std::thread;
use std::time::Duration;

/// Playback speed on a 1..=100 scale. Each engine step pauses
/// `2000 - 18 * speed` milliseconds, so 1 is leisurely and 100 still leaves
/// 200ms to watch each step land.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Speed(u8);

impl Speed {
    pub fn new(value: u8) -> Self {
        Speed(value.clamp(1, 100))
    }

    pub fn value(self) -> u8 {
        self.0
    }

    pub fn faster(self) -> Self {
        Speed::new(self.0.saturating_add(5))
    }

    pub fn slower(self) -> Self {
        Speed::new(self.0.saturating_sub(5))
    }

    /// Pause inserted after each engine step.
    pub fn step_delay(self) -> Duration {
        Duration::from_millis(2000 - 18 * self.0 as u64)
    }
}

impl Default for Speed {
    fn default() -> Self {
        Speed(30)
    }
}

/// Which pane is currently focused
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FocusedPane {
    Source,
    Variables,
    Log,
}

impl FocusedPane {
    /// Move focus to the next pane
    pub fn next(self) -> Self {
        match self {
            FocusedPane::Source => FocusedPane::Variables,
            FocusedPane::Variables => FocusedPane::Log,
            FocusedPane::Log => FocusedPane::Source,
        }
    }

    /// Move focus to the previous pane
    pub fn prev(self) -> Self {
        match self {
            FocusedPane::Source => FocusedPane::Log,
            FocusedPane::Variables => FocusedPane::Source,
            FocusedPane::Log => FocusedPane::Variables,
        }
    }
}

/// Channel and cancel handle for an engine running on a worker thread.
struct ActiveRun {
    rx: Receiver<Snapshot>,
    cancel: CancelToken,
}

/// The main application state
pub struct App {
    /// Script currently loaded (also the source shown in the left pane)
    pub script: Script,

    /// Display name of the loaded script
    pub script_name: String,

    /// Playback speed; applies to the next run
    pub speed: Speed,

    /// Every snapshot received from the current or last run
    pub history: SnapshotHistory,

    /// Review position in history; `None` follows the latest snapshot
    pub view: Option<usize>,

    /// The in-flight run, if any
    run: Option<ActiveRun>,

    /// Currently focused pane
    pub focused_pane: FocusedPane,

    /// Per-pane scroll offsets
    pub source_scroll: usize,
    pub vars_scroll: usize,
    pub log_scroll: usize,

    /// Whether the app should quit
    pub should_quit: bool,

    /// Status message to display
    pub status_message: String,
}

impl App {
    /// Create a new app showing the given script
    pub fn new(script: Script, script_name: String) -> Self {
        App {
            script,
            script_name,
            speed: Speed::default(),
            history: SnapshotHistory::new(),
            view: None,
            run: None,
            focused_pane: FocusedPane::Source,
            source_scroll: 0,
            vars_scroll: 0,
            log_scroll: 0,
            should_quit: false,
            status_message: String::from("Press r to run"),
        }
    }

    /// Run the TUI application
    pub fn run<B: Backend>(&mut self, terminal: &mut Terminal<B>) -> io::Result<()> {
        loop {
            self.drain_snapshots();
            terminal.draw(|f| self.render(f))?;

            if self.should_quit {
                self.stop_run();
                break;
            }

            // Poll with a timeout so snapshots keep flowing between keys
            if event::poll(Duration::from_millis(50))? {
                if let Event::Key(key) = event::read()? {
                    if key.kind == KeyEventKind::Press {
                        self.handle_key_event(key);
                    }
                }
            }
        }

        Ok(())
    }

    /// Pull every snapshot the worker has produced since the last frame.
    fn drain_snapshots(&mut self) {
        let Some(run) = &self.run else {
            return;
        };

        let mut batch = Vec::new();
        let mut disconnected = false;
        loop {
            match run.rx.try_recv() {
                Ok(snapshot) => batch.push(snapshot),
                Err(TryRecvError::Empty) => break,
                Err(TryRecvError::Disconnected) => {
                    disconnected = true;
                    break;
                }
            }
        }

        let mut finished = disconnected;
        let got_new = !batch.is_empty();
        for snapshot in batch {
            if snapshot.is_terminal() {
                finished = true;
            }
            self.history.push(snapshot);
        }

        if got_new && self.view.is_none() {
            // stick the log to the bottom while following live
            self.log_scroll = usize::MAX;
        }

        if finished {
            self.run = None;
            self.status_message = match self.history.latest() {
                Some(s) if s.is_terminal() => match &s.status {
                    RunStatus::Failed(message) => format!("Run failed: {}", message),
                    _ => "Run completed".to_string(),
                },
                _ => "Run cancelled".to_string(),
            };
        }
    }

    /// Launch the engine on a worker thread and start following it.
    fn start_run(&mut self) {
        self.stop_run();
        self.history.clear();
        self.view = None;
        self.log_scroll = usize::MAX;

        let mut engine = Engine::new(self.script.clone(), self.speed.step_delay());
        let cancel = engine.cancel_token();
        let (tx, rx) = mpsc::channel();
        thread::spawn(move || {
            let mut sink = tx;
            engine.run(&mut sink);
        });

        self.run = Some(ActiveRun { rx, cancel });
        self.status_message = format!("Running {}", self.script_name);
    }

    /// Tear down the active run immediately, dropping its channel.
    fn stop_run(&mut self) {
        if let Some(run) = self.run.take() {
            run.cancel.cancel();
        }
    }

    /// Ask the active run to stop; snapshots already emitted stay in history.
    fn cancel_run(&mut self) {
        match &self.run {
            Some(run) => {
                run.cancel.cancel();
                self.status_message = "Cancelling...".to_string();
            }
            None => {
                self.status_message = "Nothing to cancel".to_string();
            }
        }
    }

    /// Swap in one of the bundled samples.
    fn select_sample(&mut self, index: usize) {
        let Some(sample) = samples::ALL.get(index) else {
            return;
        };
        match Script::parse(sample.source) {
            Ok(script) => {
                self.stop_run();
                self.history.clear();
                self.view = None;
                self.script = script;
                self.script_name = sample.name.to_string();
                self.source_scroll = 0;
                self.status_message = format!("Loaded {} (press r to run)", sample.name);
            }
            Err(err) => {
                self.status_message = format!("Cannot load {}: {}", sample.name, err);
            }
        }
    }

    /// Step one snapshot back in history.
    fn review_back(&mut self) {
        if self.history.is_empty() {
            return;
        }
        let latest = self.history.len() - 1;
        let shown = self.view.unwrap_or(latest);
        let target = shown.saturating_sub(1);
        self.view = Some(target);
        self.status_message = format!("Reviewing step {}/{}", target + 1, self.history.len());
    }

    /// Step one snapshot forward; reaching the latest resumes following.
    fn review_forward(&mut self) {
        let Some(shown) = self.view else {
            return;
        };
        let latest = self.history.len().saturating_sub(1);
        let next = shown + 1;
        if next >= latest {
            self.view = None;
            self.log_scroll = usize::MAX;
            self.status_message = "Showing latest step".to_string();
        } else {
            self.view = Some(next);
            self.status_message = format!("Reviewing step {}/{}", next + 1, self.history.len());
        }
    }

    /// Render the UI
    fn render(&mut self, frame: &mut Frame) {
        let size = frame.area();

        // Pane grid plus a one-row status bar at the bottom
        let main_chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(0), Constraint::Length(1)])
            .split(size);

        let pane_area = main_chunks[0];
        let status_area = main_chunks[1];

        // Left column: script. Right column: array | variables | log.
        let columns = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(45), Constraint::Percentage(55)])
            .split(pane_area);

        let right_rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(7),
                Constraint::Percentage(40),
                Constraint::Min(0),
            ])
            .split(columns[1]);

        let shown = match self.view {
            Some(index) => self.history.get(index),
            None => self.history.latest(),
        };

        let current_line = shown.and_then(|s| s.current_line);
        let error_line = shown.and_then(|s| match &s.status {
            RunStatus::Failed(_) => s.current_line,
            _ => None,
        });

        super::panes::render_source_pane(
            frame,
            columns[0],
            self.script.lines(),
            current_line,
            error_line,
            self.focused_pane == FocusedPane::Source,
            &mut self.source_scroll,
        );

        super::panes::render_array_pane(
            frame,
            right_rows[0],
            shown.and_then(|s| s.array_view.as_ref()),
            shown.and_then(|s| s.highlighted),
        );

        super::panes::render_vars_pane(
            frame,
            right_rows[1],
            shown.map(|s| s.variables.as_slice()).unwrap_or(&[]),
            self.focused_pane == FocusedPane::Variables,
            &mut self.vars_scroll,
        );

        super::panes::render_log_pane(
            frame,
            right_rows[2],
            shown.map(|s| s.log.as_slice()).unwrap_or(&[]),
            self.focused_pane == FocusedPane::Log,
            &mut self.log_scroll,
        );

        super::panes::render_status_bar(
            frame,
            status_area,
            super::panes::StatusRenderData {
                message: &self.status_message,
                status: shown.map(|s| &s.status),
                running: self.run.is_some(),
                step: shown.map(|s| s.step),
                total: self.history.len(),
                reviewing: self.view.is_some(),
                speed: self.speed.value(),
            },
        );
    }

    /// Handle keyboard events
    fn handle_key_event(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('q') | KeyCode::Char('Q') => {
                self.should_quit = true;
            }
            KeyCode::Char('r') | KeyCode::Char('R') => {
                self.start_run();
            }
            KeyCode::Char('c') | KeyCode::Char('C') => {
                self.cancel_run();
            }
            KeyCode::Char(c @ '1'..='4') => {
                // Swapping the script mid-run would desync the source pane
                if self.run.is_none() {
                    self.select_sample((c as u8 - b'1') as usize);
                } else {
                    self.status_message = "Cancel the run before loading a demo".to_string();
                }
            }
            KeyCode::Char('+') | KeyCode::Char('=') => {
                if self.run.is_none() {
                    self.speed = self.speed.faster();
                    self.status_message = format!("Speed {} (next run)", self.speed.value());
                }
            }
            KeyCode::Char('-') => {
                if self.run.is_none() {
                    self.speed = self.speed.slower();
                    self.status_message = format!("Speed {} (next run)", self.speed.value());
                }
            }
            KeyCode::Tab => {
                self.focused_pane = self.focused_pane.next();
            }
            KeyCode::BackTab => {
                self.focused_pane = self.focused_pane.prev();
            }
            KeyCode::Left => {
                self.review_back();
            }
            KeyCode::Right => {
                self.review_forward();
            }
            KeyCode::Backspace => {
                // Jump to the first snapshot
                if !self.history.is_empty() {
                    self.view = Some(0);
                    self.status_message = format!("Reviewing step 1/{}", self.history.len());
                }
            }
            KeyCode::Enter => {
                // Jump back to the latest snapshot
                self.view = None;
                self.log_scroll = usize::MAX;
                self.status_message = "Showing latest step".to_string();
            }
            KeyCode::Up => match self.focused_pane {
                FocusedPane::Source => {
                    self.source_scroll = self.source_scroll.saturating_sub(1);
                }
                FocusedPane::Variables => {
                    self.vars_scroll = self.vars_scroll.saturating_sub(1);
                }
                FocusedPane::Log => {
                    self.log_scroll = self.log_scroll.saturating_sub(1);
                }
            },
            KeyCode::Down => match self.focused_pane {
                FocusedPane::Source => {
                    self.source_scroll = self.source_scroll.saturating_add(1);
                }
                FocusedPane::Variables => {
                    self.vars_scroll = self.vars_scroll.saturating_add(1);
                }
                FocusedPane::Log => {
                    self.log_scroll = self.log_scroll.saturating_add(1);
                }
            },
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_speed_clamps_and_maps_to_delay() {
        assert_eq!(Speed::new(0).value(), 1);
        assert_eq!(Speed::new(200).value(), 100);
        assert_eq!(Speed::default().value(), 30);
        assert_eq!(Speed::new(100).step_delay(), Duration::from_millis(200));
        assert_eq!(Speed::new(1).step_delay(), Duration::from_millis(1982));
        assert_eq!(Speed::default().step_delay(), Duration::from_millis(1460));
    }

    #[test]
    fn test_speed_steps_stay_in_range() {
        let mut speed = Speed::new(95);
        speed = speed.faster();
        assert_eq!(speed.value(), 100);
        speed = speed.faster();
        assert_eq!(speed.value(), 100);

        let mut speed = Speed::new(4);
        speed = speed.slower();
        assert_eq!(speed.value(), 1);
    }

    #[test]
    fn test_focus_cycles_through_all_panes() {
        let mut pane = FocusedPane::Source;
        pane = pane.next();
        assert_eq!(pane, FocusedPane::Variables);
        pane = pane.next();
        assert_eq!(pane, FocusedPane::Log);
        pane = pane.next();
        assert_eq!(pane, FocusedPane::Source);
        assert_eq!(FocusedPane::Source.prev(), FocusedPane::Log);
    }
}
