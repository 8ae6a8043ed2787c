// Execution engine for the interpreter

use crate::grid::region::{Region, Regions};
use crate::grid::{Grid, Position};
use crate::interpreter::constants::{DEFAULT_STEP_DELAY, EXIT_ATTEMPTS, WHITE_SLIDE_ATTEMPTS};
use crate::interpreter::control::{ControlBlock, DebugHandle, ExecutionState, Gate};
use crate::interpreter::cursor::{exit_candidate, Cursor};
use crate::interpreter::errors::{Failure, Fault};
use crate::interpreter::events::{Event, Observer};
use crate::interpreter::io::InputReader;
use crate::interpreter::operation::Operation;
use crate::memory::{Stack, Value};
use rustc_hash::FxHashSet;
use std::io::{Read, Write};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

/// Debug-mode settings
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DebugSettings {
    /// Pause before every iteration
    pub step_delay: Duration,
    /// Enter `Paused` before the first iteration
    pub start_paused: bool,
}

impl Default for DebugSettings {
    fn default() -> Self {
        DebugSettings {
            step_delay: DEFAULT_STEP_DELAY,
            start_paused: false,
        }
    }
}

/// Why a run ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HaltReason {
    /// A colored region had no exit in any direction (or the run started on black)
    Blocked,
    /// A white slide was enclosed or came back over its own trace
    WhiteTrap,
    /// The host cancelled the run
    Cancelled,
}

/// Summary of a finished run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Termination {
    pub reason: HaltReason,
    /// Region exits made, `nop` and skipped operations included
    pub operations: u64,
    /// Final stack, bottom-first
    pub stack: Vec<Value>,
    pub cursor: Cursor,
}

/// The interpreter
///
/// An interpreter can run any number of programs one after another, but only
/// one at a time. `interpret` takes `&self` so a debug host can share the
/// interpreter with a worker thread and drive it through [`DebugHandle`].
pub struct Interpreter {
    control: Arc<ControlBlock>,
    debug: Option<DebugSettings>,
    observer: Mutex<Option<Box<dyn Observer + Send>>>,
}

impl Interpreter {
    /// Plain interpreter: no delay, no events, no debug controls
    pub fn new() -> Self {
        Interpreter {
            control: Arc::new(ControlBlock::new()),
            debug: None,
            observer: Mutex::new(None),
        }
    }

    /// Debug interpreter reporting to `observer`
    pub fn debug(settings: DebugSettings, observer: impl Observer + Send + 'static) -> Self {
        Interpreter {
            control: Arc::new(ControlBlock::new()),
            debug: Some(settings),
            observer: Mutex::new(Some(Box::new(observer))),
        }
    }

    pub fn is_debug(&self) -> bool {
        self.debug.is_some()
    }

    pub fn state(&self) -> ExecutionState {
        self.control.state()
    }

    /// Handle for issuing debug controls from another thread
    pub fn handle(&self) -> DebugHandle {
        DebugHandle::new(Arc::clone(&self.control), self.is_debug())
    }

    pub fn pause(&self) -> Result<ExecutionState, Fault> {
        self.handle().pause()
    }

    pub fn resume(&self) -> Result<ExecutionState, Fault> {
        self.handle().resume()
    }

    pub fn step(&self) -> Result<ExecutionState, Fault> {
        self.handle().step()
    }

    pub fn cancel(&self) -> Result<ExecutionState, Fault> {
        self.handle().cancel()
    }

    /// Run a program to completion (or cancellation)
    ///
    /// Program output is written to `output` as UTF-8; `input` feeds the
    /// `in_char`/`in_number` operations.
    pub fn interpret<W: Write, R: Read>(
        &self,
        grid: &Grid,
        output: W,
        input: R,
    ) -> Result<Termination, Fault> {
        if let Some((slot, stored)) = grid.find_misplaced() {
            return Err(Fault::CorruptGrid { slot, stored });
        }

        let start_paused = self.debug.is_some_and(|d| d.start_paused);
        let initial = self.control.begin(start_paused)?;
        let run = ActiveRun {
            control: &self.control,
            released: false,
        };

        let mut observer_slot = self
            .observer
            .lock()
            .unwrap_or_else(PoisonError::into_inner);

        let regions = Regions::segment(grid);
        let mut machine = Machine {
            grid,
            regions: &regions,
            stack: Stack::new(),
            cursor: Cursor::start(),
            white_trace: FxHashSet::default(),
            input: InputReader::new(input),
            output,
            observer: observer_slot.as_deref_mut().map(|o| o as &mut dyn Observer),
            operations: 0,
        };

        machine.emit(Event::StateChanged(initial));
        let gate = self.debug.map(|d| (self.control.as_ref(), d.step_delay));
        let result = machine.run(gate);
        // Idle is announced only once the engine accepts a new run
        run.release();
        machine.emit(Event::StateChanged(ExecutionState::Idle));

        let reason = result?;
        log::info!(
            "halted ({:?}) after {} operations at {}",
            reason,
            machine.operations,
            machine.cursor.position
        );

        Ok(Termination {
            reason,
            operations: machine.operations,
            stack: machine.stack.as_slice().to_vec(),
            cursor: machine.cursor,
        })
    }
}

impl Default for Interpreter {
    fn default() -> Self {
        Self::new()
    }
}

/// Returns the engine to `Idle` however the run ends
struct ActiveRun<'a> {
    control: &'a ControlBlock,
    released: bool,
}

impl ActiveRun<'_> {
    fn release(mut self) {
        self.released = true;
        self.control.finish();
    }
}

impl Drop for ActiveRun<'_> {
    fn drop(&mut self) {
        if !self.released {
            self.control.finish();
        }
    }
}

/// State of one run
pub(crate) struct Machine<'a, W, R> {
    pub(crate) grid: &'a Grid,
    pub(crate) regions: &'a Regions,
    pub(crate) stack: Stack,
    pub(crate) cursor: Cursor,
    /// White codels crossed in the current slide
    pub(crate) white_trace: FxHashSet<Position>,
    pub(crate) input: InputReader<R>,
    pub(crate) output: W,
    pub(crate) observer: Option<&'a mut dyn Observer>,
    pub(crate) operations: u64,
}

impl<'a, W: Write, R: Read> Machine<'a, W, R> {
    pub(crate) fn emit(&mut self, event: Event) {
        if let Some(observer) = self.observer.as_deref_mut() {
            observer.notify(&event);
        }
    }

    pub(crate) fn observing(&self) -> bool {
        self.observer.is_some()
    }

    fn run(&mut self, gate: Option<(&ControlBlock, Duration)>) -> Result<HaltReason, Fault> {
        let start = self.cursor.position;
        match self.grid.color_at(start) {
            Some(color) if color.is_black() => {
                log::debug!("program starts on black, nothing to execute");
                return Ok(HaltReason::Blocked);
            }
            Some(color) if !color.is_white() => self.enter_region(start),
            _ => {}
        }

        loop {
            let single_step = match gate {
                Some((control, delay)) => match control.gate(delay) {
                    Gate::Cancelled => {
                        log::debug!("run cancelled at {}", self.cursor.position);
                        return Ok(HaltReason::Cancelled);
                    }
                    Gate::Proceed { single_step } => single_step,
                },
                None => false,
            };

            let halted = self.advance()?;

            if single_step {
                if let Some(state) = gate.and_then(|(control, _)| control.end_step()) {
                    self.emit(Event::StateChanged(state));
                }
            }
            if let Some(reason) = halted {
                return Ok(reason);
            }
        }
    }

    /// One loop iteration: a white slide step or a region exit
    fn advance(&mut self) -> Result<Option<HaltReason>, Fault> {
        let position = self.cursor.position;
        let on_white = self.grid.color_at(position).is_some_and(|c| c.is_white());
        if on_white {
            return Ok(self.slide());
        }

        self.white_trace.clear();
        let regions = self.regions;
        let region = regions.region_at(position);

        match self.find_exit(region) {
            Some((from, to)) => {
                self.cursor.position = to;
                let to_color = self.grid.color_at(to).unwrap_or(region.color);
                if to_color.is_white() {
                    self.emit(Event::Moved(to));
                } else {
                    self.enter_region(to);
                }

                let operation = Operation::for_transition(region.color, to_color);
                self.emit(Event::OperationSelected {
                    operation,
                    from,
                    to,
                });
                self.operations += 1;
                self.execute(operation, region)?;
                Ok(None)
            }
            None => {
                log::debug!("region {:?} has no exit", region.id);
                Ok(Some(HaltReason::Blocked))
            }
        }
    }

    /// Search all DP/CC combinations for a way out of `region`
    ///
    /// Failed attempts alternate between toggling CC and rotating DP, and
    /// those changes persist.
    fn find_exit(&mut self, region: &Region) -> Option<(Position, Position)> {
        for attempt in 0..EXIT_ATTEMPTS {
            let from = exit_candidate(region, self.cursor.dp, self.cursor.cc);
            if let Some(to) = self.open_neighbor(from) {
                return Some((from, to));
            }
            if attempt % 2 == 0 {
                self.toggle_chooser();
            } else {
                self.rotate_direction(1);
            }
        }
        None
    }

    /// Slide one codel across white, or detect a trap
    fn slide(&mut self) -> Option<HaltReason> {
        let position = self.cursor.position;
        self.white_trace.insert(position);

        let mut target = None;
        for _ in 0..WHITE_SLIDE_ATTEMPTS {
            if let Some(next) = self.open_neighbor(position) {
                target = Some(next);
                break;
            }
            self.toggle_chooser();
            self.rotate_direction(1);
        }

        let Some(next) = target else {
            log::debug!("white codel {} is enclosed", position);
            return Some(HaltReason::WhiteTrap);
        };
        if self.white_trace.contains(&next) {
            log::debug!("white slide returned to {}", next);
            return Some(HaltReason::WhiteTrap);
        }

        self.cursor.position = next;
        if self.grid.color_at(next).is_some_and(|c| !c.is_white()) {
            self.white_trace.clear();
            self.enter_region(next);
        } else {
            self.emit(Event::Moved(next));
        }
        None
    }

    /// Neighbor of `from` in the DP direction, unless off-grid or black
    fn open_neighbor(&self, from: Position) -> Option<Position> {
        self.cursor
            .dp
            .step_from(from, self.grid)
            .filter(|&p| self.grid.color_at(p).is_some_and(|c| !c.is_black()))
    }

    fn enter_region(&mut self, position: Position) {
        let region = self.regions.region_at(position);
        log::trace!(
            "entered region {:?} ({}, size {}) at {}",
            region.id,
            region.color,
            region.size(),
            position
        );
        self.emit(Event::RegionEntered {
            region: region.id,
            color: region.color,
            size: region.size(),
            position,
        });
    }

    pub(crate) fn toggle_chooser(&mut self) {
        self.cursor.cc = self.cursor.cc.toggled();
        self.emit(Event::ChooserChanged(self.cursor.cc));
    }

    /// Rotate DP by `steps` (negative is counter-clockwise); no event if unchanged
    pub(crate) fn rotate_direction(&mut self, steps: Value) {
        let rotated = self.cursor.dp.rotated(steps);
        if rotated != self.cursor.dp {
            self.cursor.dp = rotated;
            self.emit(Event::DirectionChanged(rotated));
        }
    }

    /// Report a skipped operation
    pub(crate) fn fail(&mut self, operation: Operation, failure: Failure) {
        log::debug!("{} skipped: {}", operation, failure);
        self.emit(Event::OperationFailed { operation, failure });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(text: &str, input: &str) -> (Termination, String) {
        let grid: Grid = text.parse().expect("valid notation");
        let mut out = Vec::new();
        let result = Interpreter::new()
            .interpret(&grid, &mut out, input.as_bytes())
            .expect("no fault");
        (result, String::from_utf8(out).expect("utf8 output"))
    }

    #[test]
    fn test_single_white_codel_halts() {
        let (result, out) = run("W", "");
        assert_eq!(result.reason, HaltReason::WhiteTrap);
        assert_eq!(result.operations, 0);
        assert!(out.is_empty());
    }

    #[test]
    fn test_start_on_black_halts() {
        let (result, _) = run("K R", "");
        assert_eq!(result.reason, HaltReason::Blocked);
        assert_eq!(result.operations, 0);
    }

    #[test]
    fn test_lone_colored_codel_exhausts_exits() {
        let (result, _) = run("R", "");
        assert_eq!(result.reason, HaltReason::Blocked);
        // Four toggles and four rotations bring DP/CC back to the start
        assert_eq!(result.cursor, Cursor::start());
    }

    #[test]
    fn test_exit_search_rotates_after_toggle() {
        // Right is blocked by black: toggle CC (still blocked), then rotate DP
        // to Down and leave through the codel below. The white strip at the
        // bottom ends the run.
        let (result, _) = run("lR K\nR  K\nW  K\nW  K", "");
        assert_eq!(result.operations, 2);
        assert_eq!(result.stack, vec![1]);
        assert_eq!(result.reason, HaltReason::WhiteTrap);
        assert_eq!(result.cursor.position, Position::new(0, 3));
    }

    #[test]
    fn test_white_slide_reaches_colored_region() {
        // lR -> W (nop), slide into R without executing, R -> W (nop), then
        // the two-codel white strip traps the slide.
        let (result, _) = run("lR W R W W", "");
        assert_eq!(result.operations, 2);
        assert!(result.stack.is_empty());
        assert_eq!(result.reason, HaltReason::WhiteTrap);
    }
}
