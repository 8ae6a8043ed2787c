//! Observation hooks for debug mode
//!
//! Events are delivered synchronously on the executing thread, before the
//! engine passes its next pause point, so a host that pauses on an event is
//! guaranteed to stop before the following operation.

use super::control::ExecutionState;
use super::cursor::{Chooser, Direction};
use super::errors::Failure;
use super::operation::Operation;
use crate::grid::color::Color;
use crate::grid::region::RegionId;
use crate::grid::Position;
use crate::memory::Value;
use std::sync::mpsc;

/// Something the engine did
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    /// An operation was chosen by a region exit (fired for `nop` too)
    OperationSelected {
        operation: Operation,
        /// Codel the exit was made from
        from: Position,
        /// Codel the exit landed on
        to: Position,
    },

    /// The selected operation was skipped
    OperationFailed {
        operation: Operation,
        failure: Failure,
    },

    DirectionChanged(Direction),

    ChooserChanged(Chooser),

    /// The cursor landed in a non-white region (including the first one)
    RegionEntered {
        region: RegionId,
        color: Color,
        size: usize,
        position: Position,
    },

    /// The cursor moved onto a white codel, by a region exit or a slide step
    Moved(Position),

    /// Stack contents, bottom-first, after an applied operation
    StackChanged(Vec<Value>),

    /// The engine itself moved the execution state (start, step end, halt)
    StateChanged(ExecutionState),
}

/// Receiver of engine events
pub trait Observer {
    fn notify(&mut self, event: &Event);
}

impl Observer for mpsc::Sender<Event> {
    fn notify(&mut self, event: &Event) {
        // A host that dropped its receiver is no longer interested
        let _ = self.send(event.clone());
    }
}

impl<F: FnMut(&Event)> Observer for F {
    fn notify(&mut self, event: &Event) {
        self(event)
    }
}
