//! Error types for the interpreter
//!
//! Two tiers are kept strictly apart:
//!
//! - [`Failure`]: a program-level anomaly (too few operands, zero divisor,
//!   bad roll depth, exhausted input). The operation is skipped, the stack is
//!   left as it was, observers are told, and execution continues.
//! - [`Fault`]: a contract violation by the host (corrupt grid, a second
//!   concurrent run, debug controls on a non-debug engine) or a broken output
//!   sink. The call fails immediately and nothing further executes.

use super::control::ExecutionState;
use crate::grid::Position;
use crate::memory::RollError;
use std::fmt;
use std::io;

/// Why an operation was skipped
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Failure {
    /// Fewer values on the stack than the operation needs
    StackUnderflow { required: usize, available: usize },

    /// `divide` or `mod` with zero on top of the stack
    DivisionByZero,

    /// `roll` with a negative depth or one deeper than the stack
    InvalidRoll(RollError),

    /// Input source has nothing more to read
    InputExhausted,

    /// Input could not be decoded as a character or number
    MalformedInput,

    /// `out_char` with a value that is not a Unicode scalar value
    InvalidCodePoint(i64),
}

impl fmt::Display for Failure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Failure::StackUnderflow {
                required,
                available,
            } => {
                write!(
                    f,
                    "needs {} value{} on the stack, found {}",
                    required,
                    if *required == 1 { "" } else { "s" },
                    available
                )
            }
            Failure::DivisionByZero => write!(f, "division by zero"),
            Failure::InvalidRoll(err) => write!(f, "{}", err),
            Failure::InputExhausted => write!(f, "input exhausted"),
            Failure::MalformedInput => write!(f, "malformed input"),
            Failure::InvalidCodePoint(value) => {
                write!(f, "{} is not a valid character code", value)
            }
        }
    }
}

/// Debug control requested by the host
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Control {
    Pause,
    Resume,
    Step,
    Cancel,
}

impl fmt::Display for Control {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Control::Pause => "pause",
            Control::Resume => "resume",
            Control::Step => "step",
            Control::Cancel => "cancel",
        };
        f.pad(name)
    }
}

/// Contract violations and sink failures; always fatal for the call
#[derive(Debug)]
pub enum Fault {
    /// A cell's stored position disagrees with its slot in the grid
    CorruptGrid { slot: Position, stored: Position },

    /// `interpret` called while another run is active
    AlreadyRunning { state: ExecutionState },

    /// Debug control used on an engine built without debug mode
    NotDebuggable { control: Control },

    /// Debug control that makes no sense in the current state
    InvalidControl {
        control: Control,
        state: ExecutionState,
    },

    /// Writing to the output sink failed
    Io(io::Error),
}

impl Fault {
    /// Whether the fault was caused by misuse of the API rather than I/O
    pub fn is_contract_violation(&self) -> bool {
        !matches!(self, Fault::Io(_))
    }
}

impl fmt::Display for Fault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Fault::CorruptGrid { slot, stored } => {
                write!(
                    f,
                    "Corrupt grid: cell at {} claims position {}",
                    slot, stored
                )
            }
            Fault::AlreadyRunning { state } => {
                write!(f, "Interpreter is already active (state: {})", state)
            }
            Fault::NotDebuggable { control } => {
                write!(
                    f,
                    "Cannot {}: interpreter was not built in debug mode",
                    control
                )
            }
            Fault::InvalidControl { control, state } => {
                write!(f, "Cannot {} while {}", control, state)
            }
            Fault::Io(err) => write!(f, "Output error: {}", err),
        }
    }
}

impl std::error::Error for Fault {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Fault::Io(err) => Some(err),
            _ => None,
        }
    }
}

impl From<io::Error> for Fault {
    fn from(err: io::Error) -> Self {
        Fault::Io(err)
    }
}
