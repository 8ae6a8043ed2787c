//! Value stack
//!
//! The stack is an ordered sequence of integers with the most recently pushed
//! value on top. It is owned by the executing engine; hosts only ever see
//! copies of it (through events or the final [`Termination`] report).
//!
//! # Roll
//!
//! `roll(depth, count)` rotates the top `depth` values. A positive `count`
//! buries the top value `count` positions deeper; a negative `count` rotates
//! the other way, so `roll(d, n)` followed by `roll(d, -n)` is the identity.
//! Rotation is done in place with a single slice rotate, so large counts cost
//! nothing extra.
//!
//! [`Termination`]: crate::interpreter::engine::Termination

use std::fmt;

/// A stack value
pub type Value = i64;

/// Reasons a roll cannot be applied
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RollError {
    /// Depth is below zero
    NegativeDepth(Value),
    /// Depth exceeds the number of values on the stack
    TooDeep { depth: Value, available: usize },
}

impl fmt::Display for RollError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RollError::NegativeDepth(depth) => write!(f, "negative roll depth {}", depth),
            RollError::TooDeep { depth, available } => {
                write!(
                    f,
                    "roll depth {} exceeds stack size {}",
                    depth, available
                )
            }
        }
    }
}

/// The value stack
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Stack {
    values: Vec<Value>,
}

impl Stack {
    pub fn new() -> Self {
        Stack { values: Vec::new() }
    }

    pub fn push(&mut self, value: Value) {
        self.values.push(value);
    }

    pub fn pop(&mut self) -> Option<Value> {
        self.values.pop()
    }

    /// Top value without removing it
    pub fn peek(&self) -> Option<Value> {
        self.values.last().copied()
    }

    /// Pop the top two values as `(second, top)`, or leave the stack alone if
    /// fewer than two are present
    pub fn pop_pair(&mut self) -> Option<(Value, Value)> {
        if self.values.len() < 2 {
            return None;
        }
        let top = self.values.pop()?;
        let second = self.values.pop()?;
        Some((second, top))
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Values bottom-first
    pub fn as_slice(&self) -> &[Value] {
        &self.values
    }

    /// Rotate the top `depth` values by `count` positions
    pub fn roll(&mut self, depth: Value, count: Value) -> Result<(), RollError> {
        if depth < 0 {
            return Err(RollError::NegativeDepth(depth));
        }
        let available = self.values.len();
        let depth_usize = usize::try_from(depth).map_err(|_| RollError::TooDeep { depth, available })?;
        if depth_usize > available {
            return Err(RollError::TooDeep { depth, available });
        }
        if depth_usize == 0 {
            return Ok(());
        }

        let shift = count.rem_euclid(depth) as usize;
        self.values[available - depth_usize..].rotate_right(shift);
        Ok(())
    }
}

impl From<Vec<Value>> for Stack {
    fn from(values: Vec<Value>) -> Self {
        Stack { values }
    }
}
