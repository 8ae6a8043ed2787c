// Snapshot of interpreter state as seen by a debug host

use crate::grid::color::Color;
use crate::grid::region::RegionId;
use crate::grid::Position;
use crate::interpreter::control::ExecutionState;
use crate::interpreter::cursor::{Chooser, Direction};
use crate::interpreter::errors::Failure;
use crate::interpreter::events::{Event, Observer};
use crate::interpreter::operation::Operation;
use crate::memory::Value;
use std::io::{self, Write};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// Clonable in-memory output sink
///
/// The interpreter writes through one clone on its worker thread while the
/// host reads the accumulated text through another.
#[derive(Debug, Clone, Default)]
pub struct SharedOutput {
    buffer: Arc<Mutex<Vec<u8>>>,
}

impl SharedOutput {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, Vec<u8>> {
        self.buffer.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Everything written so far, with invalid UTF-8 replaced
    pub fn contents(&self) -> String {
        String::from_utf8_lossy(&self.lock()).into_owned()
    }

    /// Output split into lines; a trailing newline does not add an empty line
    pub fn lines(&self) -> Vec<String> {
        let text = self.contents();
        let mut result: Vec<String> = text.split('\n').map(|s| s.to_string()).collect();
        if result.last().is_some_and(|s| s.is_empty()) {
            result.pop();
        }
        result
    }

    pub fn clear(&self) {
        self.lock().clear();
    }
}

impl Write for SharedOutput {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.lock().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// Colored region the cursor is in
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RegionInfo {
    pub id: RegionId,
    pub color: Color,
    pub size: usize,
}

/// Interpreter state rebuilt from the event stream
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Snapshot {
    pub state: ExecutionState,
    pub stack: Vec<Value>,
    pub dp: Direction,
    pub cc: Chooser,
    pub position: Position,
    /// `None` while the cursor is on white
    pub region: Option<RegionInfo>,
    pub last_operation: Option<Operation>,
    pub last_failure: Option<(Operation, Failure)>,
    pub operations: u64,
    pub failures: u64,
}

impl Default for Snapshot {
    fn default() -> Self {
        Snapshot {
            state: ExecutionState::Idle,
            stack: Vec::new(),
            dp: Direction::Right,
            cc: Chooser::Left,
            position: Position::new(0, 0),
            region: None,
            last_operation: None,
            last_failure: None,
            operations: 0,
            failures: 0,
        }
    }
}

impl Snapshot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold one event into the snapshot
    pub fn apply(&mut self, event: &Event) {
        match event {
            Event::OperationSelected { operation, to, .. } => {
                self.last_operation = Some(*operation);
                self.last_failure = None;
                self.position = *to;
                self.operations += 1;
            }
            Event::OperationFailed { operation, failure } => {
                self.last_failure = Some((*operation, *failure));
                self.failures += 1;
            }
            Event::DirectionChanged(dp) => self.dp = *dp,
            Event::ChooserChanged(cc) => self.cc = *cc,
            Event::RegionEntered {
                region,
                color,
                size,
                position,
            } => {
                self.region = Some(RegionInfo {
                    id: *region,
                    color: *color,
                    size: *size,
                });
                self.position = *position;
            }
            Event::Moved(position) => {
                self.position = *position;
                self.region = None;
            }
            Event::StackChanged(stack) => self.stack.clone_from(stack),
            Event::StateChanged(state) => self.state = *state,
        }
    }
}

/// Observer that keeps every event for later inspection
///
/// Nothing is ever dropped, so memory grows with the run. Use it for tests
/// and runs known to halt; a long-lived debugger should fold events into a
/// [`Snapshot`] as they arrive instead.
#[derive(Debug, Clone, Default)]
pub struct Recorder {
    events: Arc<Mutex<Vec<Event>>>,
}

impl Recorder {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, Vec<Event>> {
        self.events.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn events(&self) -> Vec<Event> {
        self.lock().clone()
    }

    /// Snapshot folded from all events recorded so far
    pub fn snapshot(&self) -> Snapshot {
        let mut snapshot = Snapshot::new();
        for event in self.lock().iter() {
            snapshot.apply(event);
        }
        snapshot
    }

    pub fn clear(&self) {
        self.lock().clear();
    }
}

impl Observer for Recorder {
    fn notify(&mut self, event: &Event) {
        self.lock().push(event.clone());
    }
}
