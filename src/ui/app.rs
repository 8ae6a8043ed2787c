//! Main TUI application state and logic
//!
//! The interpreter runs on a worker thread in debug mode. Its events arrive
//! over a channel and are folded into a [`Snapshot`] that the panes render;
//! key presses are forwarded as pause/resume/step/cancel controls.

use crate::grid::region::Regions;
use crate::grid::Grid;
use crate::interpreter::control::ExecutionState;
use crate::interpreter::engine::{DebugSettings, HaltReason, Interpreter, Termination};
use crate::interpreter::errors::Fault;
use crate::interpreter::events::Event as MachineEvent;
use crate::snapshot::{SharedOutput, Snapshot};
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind};
use ratatui::{
    backend::Backend,
    layout::{Constraint, Direction, Layout},
    Frame, Terminal,
};
use std::io;
use std::sync::mpsc::{self, Receiver};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

/// Which pane is currently focused
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FocusedPane {
    Grid,
    Machine,
    Output,
}

impl FocusedPane {
    /// Move focus to the next pane (grid -> output -> machine)
    pub fn next(self) -> Self {
        match self {
            FocusedPane::Grid => FocusedPane::Output,
            FocusedPane::Output => FocusedPane::Machine,
            FocusedPane::Machine => FocusedPane::Grid,
        }
    }
}

type Worker = JoinHandle<Result<Termination, Fault>>;

/// The main application state
pub struct App {
    grid: Arc<Grid>,
    regions: Regions,
    program: String,
    input: String,

    interpreter: Arc<Interpreter>,
    events: Receiver<MachineEvent>,
    output: SharedOutput,
    worker: Option<Worker>,

    /// Machine state as of the last drained event
    pub snapshot: Snapshot,

    /// Set once the current run has ended
    pub finished: bool,

    /// Whether the status message reports a fault
    pub is_error: bool,

    /// Currently focused pane
    pub focused_pane: FocusedPane,

    /// Per-pane scroll offsets
    pub stack_scroll: usize,
    pub output_scroll: usize,

    /// Whether the app should quit
    pub should_quit: bool,

    /// Status message to display
    pub status_message: String,
}

impl App {
    /// Create the app and start the first run
    pub fn new(grid: Grid, program: String, settings: DebugSettings, input: String) -> Self {
        let (tx, rx) = mpsc::channel();
        let regions = Regions::segment(&grid);
        let mut app = App {
            grid: Arc::new(grid),
            regions,
            program,
            input,
            interpreter: Arc::new(Interpreter::debug(settings, tx)),
            events: rx,
            output: SharedOutput::new(),
            worker: None,
            snapshot: Snapshot::new(),
            finished: false,
            is_error: false,
            focused_pane: FocusedPane::Grid,
            stack_scroll: 0,
            output_scroll: 0,
            should_quit: false,
            status_message: String::new(),
        };
        app.start();
        app
    }

    /// Start a fresh run on a worker thread
    fn start(&mut self) {
        self.stop();
        self.drain_events();
        self.snapshot = Snapshot::new();
        self.output.clear();
        self.finished = false;
        self.is_error = false;
        self.stack_scroll = 0;
        self.output_scroll = 0;

        let interpreter = Arc::clone(&self.interpreter);
        let grid = Arc::clone(&self.grid);
        let output = self.output.clone();
        let input = io::Cursor::new(self.input.clone().into_bytes());
        let worker = thread::spawn(move || interpreter.interpret(&grid, output, input));

        // The first event comes after the engine has accepted the run. From
        // then on a single cancel reaches it
        while !worker.is_finished() {
            if let Ok(event) = self.events.recv_timeout(Duration::from_millis(5)) {
                self.snapshot.apply(&event);
                break;
            }
        }
        self.worker = Some(worker);
        self.status_message = "Running".to_string();
    }

    /// Cancel the current run (if any) and wait for the worker to exit
    fn stop(&mut self) {
        if let Some(worker) = self.worker.take() {
            let _ = self.interpreter.cancel();
            let _ = worker.join();
        }
    }

    fn drain_events(&mut self) {
        while let Ok(event) = self.events.try_recv() {
            self.snapshot.apply(&event);
        }
    }

    /// Collect the result of a worker that has exited on its own
    fn poll_worker(&mut self) {
        if !self.worker.as_ref().is_some_and(|w| w.is_finished()) {
            return;
        }
        let Some(worker) = self.worker.take() else {
            return;
        };
        self.finished = true;
        self.output_scroll = usize::MAX;
        match worker.join() {
            Ok(Ok(termination)) => {
                self.status_message = match termination.reason {
                    HaltReason::Blocked => "Halted: no exit from region".to_string(),
                    HaltReason::WhiteTrap => "Halted: trapped in white".to_string(),
                    HaltReason::Cancelled => "Cancelled".to_string(),
                };
            }
            Ok(Err(fault)) => {
                self.is_error = true;
                self.status_message = format!("Fault: {}", fault);
            }
            Err(_) => {
                self.is_error = true;
                self.status_message = "Interpreter thread panicked".to_string();
            }
        }
    }

    /// Run the TUI application
    pub fn run<B: Backend>(&mut self, terminal: &mut Terminal<B>) -> io::Result<()> {
        loop {
            self.drain_events();
            self.poll_worker();
            terminal.draw(|f| self.render(f))?;

            if self.should_quit {
                self.stop();
                break;
            }

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

    /// Render the UI
    fn render(&mut self, frame: &mut Frame) {
        let size = frame.area();

        let main_chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(0), Constraint::Length(1)])
            .split(size);

        let columns = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
            .split(main_chunks[0]);

        // Left column: Grid (top) | Output (bottom)
        let left_rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Percentage(70), Constraint::Percentage(30)])
            .split(columns[0]);

        super::panes::render_grid_pane(
            frame,
            left_rows[0],
            &self.grid,
            &self.regions,
            &self.snapshot,
            &self.program,
            self.focused_pane == FocusedPane::Grid,
        );

        super::panes::render_terminal_pane(
            frame,
            left_rows[1],
            &self.output,
            self.focused_pane == FocusedPane::Output,
            &mut self.output_scroll,
        );

        super::panes::render_stack_pane(
            frame,
            columns[1],
            &self.snapshot,
            self.focused_pane == FocusedPane::Machine,
            &mut self.stack_scroll,
        );

        super::panes::render_status_bar(
            frame,
            main_chunks[1],
            &self.status_message,
            self.snapshot.state,
            self.snapshot.operations,
            self.finished,
            self.is_error,
        );
    }

    /// Forward a control to the engine and report the outcome
    fn control(&mut self, send: fn(&Interpreter) -> Result<ExecutionState, Fault>) {
        match send(&self.interpreter) {
            Ok(state) => {
                self.is_error = false;
                self.status_message = match state {
                    ExecutionState::Running => "Running".to_string(),
                    ExecutionState::Paused => "Paused".to_string(),
                    ExecutionState::OneMoreStep => "Stepping".to_string(),
                    ExecutionState::Idle => "Cancelled".to_string(),
                };
            }
            Err(fault) => {
                self.status_message = fault.to_string();
            }
        }
    }

    /// Handle keyboard events
    fn handle_key_event(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('q') | KeyCode::Char('Q') => {
                self.should_quit = true;
            }
            KeyCode::Char(' ') => {
                if self.worker.is_none() {
                    self.start();
                    return;
                }
                match self.interpreter.state() {
                    ExecutionState::Running => self.control(Interpreter::pause),
                    ExecutionState::Paused | ExecutionState::OneMoreStep => {
                        self.control(Interpreter::resume)
                    }
                    ExecutionState::Idle => {}
                }
            }
            KeyCode::Right | KeyCode::Char('s') => {
                if self.worker.is_none() {
                    self.status_message = "Run finished; press r to restart".to_string();
                    return;
                }
                // Stepping out of a free run stops it first
                if self.interpreter.state() == ExecutionState::Running {
                    self.control(Interpreter::pause);
                } else {
                    self.control(Interpreter::step);
                }
            }
            KeyCode::Char('c') => {
                if self.worker.is_some() {
                    self.control(Interpreter::cancel);
                }
            }
            KeyCode::Char('r') => {
                self.start();
            }
            KeyCode::Tab => {
                self.focused_pane = self.focused_pane.next();
            }
            KeyCode::Up => match self.focused_pane {
                FocusedPane::Machine => self.stack_scroll = self.stack_scroll.saturating_sub(1),
                FocusedPane::Output => self.output_scroll = self.output_scroll.saturating_sub(1),
                FocusedPane::Grid => {}
            },
            KeyCode::Down => match self.focused_pane {
                FocusedPane::Machine => self.stack_scroll = self.stack_scroll.saturating_add(1),
                FocusedPane::Output => self.output_scroll = self.output_scroll.saturating_add(1),
                FocusedPane::Grid => {}
            },
            _ => {}
        }
    }
}

impl Drop for App {
    fn drop(&mut self) {
        self.stop();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_focus_cycles_through_all_panes() {
        let start = FocusedPane::Grid;
        assert_eq!(start.next(), FocusedPane::Output);
        assert_eq!(start.next().next(), FocusedPane::Machine);
        assert_eq!(start.next().next().next(), start);
    }
}
