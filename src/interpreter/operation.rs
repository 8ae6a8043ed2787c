//! Color-transition operation table
//!
//! Leaving one chromatic region for another selects an operation from the
//! change in hue and lightness between the two colors:
//!
//! ```text
//!              lightness delta
//!  hue delta │ 0          1            2
//! ───────────┼──────────────────────────────────
//!          0 │ nop        push         pop
//!          1 │ add        subtract     multiply
//!          2 │ divide     mod          not
//!          3 │ greater    pointer      switch
//!          4 │ duplicate  roll         in_number
//!          5 │ in_char    out_number   out_char
//! ```
//!
//! Any transition involving white is `nop`.

use crate::grid::color::Color;
use std::fmt;

/// The instruction set
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    Nop,
    Push,
    Pop,
    Add,
    Subtract,
    Multiply,
    Divide,
    Mod,
    Not,
    Greater,
    Pointer,
    Switch,
    Duplicate,
    Roll,
    InNumber,
    InChar,
    OutNumber,
    OutChar,
}

const TABLE: [[Operation; 3]; 6] = {
    use Operation::*;
    [
        [Nop, Push, Pop],
        [Add, Subtract, Multiply],
        [Divide, Mod, Not],
        [Greater, Pointer, Switch],
        [Duplicate, Roll, InNumber],
        [InChar, OutNumber, OutChar],
    ]
};

impl Operation {
    /// Operation selected by moving from a region of color `from` into `to`
    ///
    /// Black never reaches this point (exits into black are rejected first);
    /// it is treated like white here.
    pub fn for_transition(from: Color, to: Color) -> Operation {
        match (from, to) {
            (Color::Chromatic(h1, l1), Color::Chromatic(h2, l2)) => {
                let hue_delta = (h2.index() + 6 - h1.index()) % 6;
                let lightness_delta = (l2.index() + 3 - l1.index()) % 3;
                Operation::from_deltas(hue_delta, lightness_delta)
            }
            _ => Operation::Nop,
        }
    }

    /// Table lookup by `(hue delta, lightness delta)`, both reduced cyclically
    pub fn from_deltas(hue_delta: usize, lightness_delta: usize) -> Operation {
        TABLE[hue_delta % 6][lightness_delta % 3]
    }

    /// Minimum stack depth needed before the operation can run
    pub fn required_operands(self) -> usize {
        match self {
            Operation::Add
            | Operation::Subtract
            | Operation::Multiply
            | Operation::Divide
            | Operation::Mod
            | Operation::Greater
            | Operation::Roll => 2,
            Operation::Pop
            | Operation::Not
            | Operation::Pointer
            | Operation::Switch
            | Operation::Duplicate
            | Operation::OutNumber
            | Operation::OutChar => 1,
            Operation::Nop | Operation::Push | Operation::InNumber | Operation::InChar => 0,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Operation::Nop => "nop",
            Operation::Push => "push",
            Operation::Pop => "pop",
            Operation::Add => "add",
            Operation::Subtract => "subtract",
            Operation::Multiply => "multiply",
            Operation::Divide => "divide",
            Operation::Mod => "mod",
            Operation::Not => "not",
            Operation::Greater => "greater",
            Operation::Pointer => "pointer",
            Operation::Switch => "switch",
            Operation::Duplicate => "duplicate",
            Operation::Roll => "roll",
            Operation::InNumber => "in_number",
            Operation::InChar => "in_char",
            Operation::OutNumber => "out_number",
            Operation::OutChar => "out_char",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.name())
    }
}
