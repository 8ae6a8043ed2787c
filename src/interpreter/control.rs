//! Execution state machine
//!
//! ```text
//!            interpret()            pause()
//!   Idle ───────────────▶ Running ─────────▶ Paused
//!    ▲                      ▲   ◀───────────   │ ▲
//!    │ cancel() / halt      │     resume()     │ │ one iteration
//!    └──────── any ─────────┘          step()  ▼ │
//!                                          OneMoreStep
//! ```
//!
//! The executing thread blocks on a condition variable while paused; the
//! host's `resume`/`step`/`cancel` calls wake it. State lives behind a mutex
//! shared through [`DebugHandle`], so controls can be issued from any thread.

use super::errors::{Control, Fault};
use std::fmt;
use std::sync::{Arc, Condvar, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

/// Lifecycle state of an interpreter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ExecutionState {
    Idle,
    Running,
    Paused,
    OneMoreStep,
}

impl fmt::Display for ExecutionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ExecutionState::Idle => "idle",
            ExecutionState::Running => "running",
            ExecutionState::Paused => "paused",
            ExecutionState::OneMoreStep => "stepping",
        };
        f.pad(name)
    }
}

/// What the executing thread should do after passing the gate
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Gate {
    /// Run one iteration; `single_step` means revert to paused afterwards
    Proceed { single_step: bool },
    /// The run was cancelled
    Cancelled,
}

#[derive(Debug)]
struct Inner {
    state: ExecutionState,
    /// A run owns the engine; stays set until the run has fully unwound,
    /// even after a cancel has already moved the state to `Idle`
    active: bool,
}

#[derive(Debug)]
pub(crate) struct ControlBlock {
    inner: Mutex<Inner>,
    wake: Condvar,
}

impl ControlBlock {
    pub(crate) fn new() -> Self {
        ControlBlock {
            inner: Mutex::new(Inner {
                state: ExecutionState::Idle,
                active: false,
            }),
            wake: Condvar::new(),
        }
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub(crate) fn state(&self) -> ExecutionState {
        self.lock().state
    }

    /// Claim the engine for a new run
    pub(crate) fn begin(&self, start_paused: bool) -> Result<ExecutionState, Fault> {
        let mut inner = self.lock();
        if inner.active || inner.state != ExecutionState::Idle {
            return Err(Fault::AlreadyRunning { state: inner.state });
        }
        inner.active = true;
        inner.state = if start_paused {
            ExecutionState::Paused
        } else {
            ExecutionState::Running
        };
        Ok(inner.state)
    }

    /// Release the engine at the end of a run
    pub(crate) fn finish(&self) {
        let mut inner = self.lock();
        inner.active = false;
        inner.state = ExecutionState::Idle;
        self.wake.notify_all();
    }

    /// Apply a host control, returning the resulting state
    pub(crate) fn apply(&self, control: Control) -> Result<ExecutionState, Fault> {
        use ExecutionState::*;

        let mut inner = self.lock();
        let next = match (control, inner.state) {
            (Control::Cancel, _) => Idle,
            (Control::Pause, Running | OneMoreStep | Paused) => Paused,
            (Control::Resume, Paused | OneMoreStep | Running) => Running,
            (Control::Step, Paused | OneMoreStep) => OneMoreStep,
            (control, state) => return Err(Fault::InvalidControl { control, state }),
        };
        inner.state = next;
        self.wake.notify_all();
        Ok(next)
    }

    /// Block before the next iteration: wait out `delay` (cut short by a
    /// cancel), then wait for as long as the run is paused
    pub(crate) fn gate(&self, delay: Duration) -> Gate {
        let mut inner = self.lock();
        if !delay.is_zero() {
            inner = self
                .wake
                .wait_timeout_while(inner, delay, |i| i.state != ExecutionState::Idle)
                .map(|(guard, _)| guard)
                .unwrap_or_else(|poisoned| poisoned.into_inner().0);
        }
        inner = self
            .wake
            .wait_while(inner, |i| i.state == ExecutionState::Paused)
            .unwrap_or_else(PoisonError::into_inner);

        match inner.state {
            ExecutionState::Idle => Gate::Cancelled,
            ExecutionState::OneMoreStep => Gate::Proceed { single_step: true },
            ExecutionState::Running | ExecutionState::Paused => Gate::Proceed { single_step: false },
        }
    }

    /// After a single-stepped iteration: fall back to paused unless the host
    /// has resumed or cancelled in the meantime
    pub(crate) fn end_step(&self) -> Option<ExecutionState> {
        let mut inner = self.lock();
        if inner.state == ExecutionState::OneMoreStep {
            inner.state = ExecutionState::Paused;
            Some(inner.state)
        } else {
            None
        }
    }
}

/// Thread-safe handle for driving a debug interpreter from another thread
#[derive(Debug, Clone)]
pub struct DebugHandle {
    control: Arc<ControlBlock>,
    debug: bool,
}

impl DebugHandle {
    pub(crate) fn new(control: Arc<ControlBlock>, debug: bool) -> Self {
        DebugHandle { control, debug }
    }

    pub fn state(&self) -> ExecutionState {
        self.control.state()
    }

    pub fn pause(&self) -> Result<ExecutionState, Fault> {
        self.send(Control::Pause)
    }

    pub fn resume(&self) -> Result<ExecutionState, Fault> {
        self.send(Control::Resume)
    }

    /// Run exactly one more iteration, then pause again
    pub fn step(&self) -> Result<ExecutionState, Fault> {
        self.send(Control::Step)
    }

    /// Stop the run at the next iteration boundary
    pub fn cancel(&self) -> Result<ExecutionState, Fault> {
        self.send(Control::Cancel)
    }

    fn send(&self, control: Control) -> Result<ExecutionState, Fault> {
        if !self.debug {
            return Err(Fault::NotDebuggable { control });
        }
        self.control.apply(control)
    }
}
