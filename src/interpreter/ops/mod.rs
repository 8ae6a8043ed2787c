//! Operation execution
//!
//! Every operation checks its preconditions before touching the stack. When
//! they do not hold, the operation is skipped as a whole and reported through
//! [`Machine::fail`]; a skipped operation never leaves the stack half-popped.

pub mod arithmetic;

use crate::grid::region::Region;
use crate::interpreter::engine::Machine;
use crate::interpreter::errors::{Failure, Fault};
use crate::interpreter::events::Event;
use crate::interpreter::io::{write_char, write_number};
use crate::interpreter::operation::Operation;
use crate::memory::Value;
use std::io::{Read, Write};

impl<W: Write, R: Read> Machine<'_, W, R> {
    /// Apply `operation` after leaving `exited`
    pub(crate) fn execute(&mut self, operation: Operation, exited: &Region) -> Result<(), Fault> {
        if operation == Operation::Nop {
            return Ok(());
        }

        let required = operation.required_operands();
        let available = self.stack.len();
        if available < required {
            self.fail(
                operation,
                Failure::StackUnderflow {
                    required,
                    available,
                },
            );
            return Ok(());
        }

        let applied = match operation {
            Operation::Nop => Ok(()),
            Operation::Push => {
                self.stack.push(exited.size() as Value);
                Ok(())
            }
            Operation::Pop => {
                self.stack.pop();
                Ok(())
            }
            Operation::Add => self.binary(arithmetic::add),
            Operation::Subtract => self.binary(arithmetic::subtract),
            Operation::Multiply => self.binary(arithmetic::multiply),
            Operation::Greater => self.binary(arithmetic::greater),
            Operation::Divide => self.checked_division(arithmetic::divide),
            Operation::Mod => self.checked_division(arithmetic::modulo),
            Operation::Not => {
                if let Some(value) = self.stack.pop() {
                    self.stack.push(arithmetic::not(value));
                }
                Ok(())
            }
            Operation::Duplicate => {
                if let Some(value) = self.stack.peek() {
                    self.stack.push(value);
                }
                Ok(())
            }
            Operation::Pointer => {
                if let Some(steps) = self.stack.pop() {
                    self.rotate_direction(steps);
                }
                Ok(())
            }
            Operation::Switch => {
                if let Some(times) = self.stack.pop() {
                    if times % 2 != 0 {
                        self.toggle_chooser();
                    }
                }
                Ok(())
            }
            Operation::Roll => self.roll(),
            Operation::InNumber => self.input.read_number().map(|n| self.stack.push(n)),
            Operation::InChar => self
                .input
                .read_char()
                .map(|c| self.stack.push(Value::from(u32::from(c)))),
            Operation::OutNumber => {
                if let Some(value) = self.stack.pop() {
                    write_number(&mut self.output, value)?;
                }
                Ok(())
            }
            Operation::OutChar => self.out_char()?,
        };

        match applied {
            Ok(()) => {
                log::trace!("{} -> {:?}", operation, self.stack.as_slice());
                if self.observing() {
                    let stack = self.stack.as_slice().to_vec();
                    self.emit(Event::StackChanged(stack));
                }
            }
            Err(failure) => self.fail(operation, failure),
        }
        Ok(())
    }

    /// Pop `b` then `a`, push `f(a, b)`
    fn binary(&mut self, f: fn(Value, Value) -> Value) -> Result<(), Failure> {
        if let Some((a, b)) = self.stack.pop_pair() {
            self.stack.push(f(a, b));
        }
        Ok(())
    }

    /// Like [`Self::binary`], but refuse to run with a zero divisor on top
    fn checked_division(&mut self, f: fn(Value, Value) -> Value) -> Result<(), Failure> {
        if self.stack.peek() == Some(0) {
            return Err(Failure::DivisionByZero);
        }
        self.binary(f)
    }

    /// Pop count then depth; an invalid depth puts both back untouched
    fn roll(&mut self) -> Result<(), Failure> {
        let Some((depth, count)) = self.stack.pop_pair() else {
            return Ok(());
        };
        self.stack.roll(depth, count).map_err(|err| {
            self.stack.push(depth);
            self.stack.push(count);
            Failure::InvalidRoll(err)
        })
    }

    /// Only pops once the top value is known to be a valid character
    fn out_char(&mut self) -> Result<Result<(), Failure>, Fault> {
        let Some(value) = self.stack.peek() else {
            return Ok(Ok(()));
        };
        let Some(c) = u32::try_from(value).ok().and_then(char::from_u32) else {
            return Ok(Err(Failure::InvalidCodePoint(value)));
        };
        self.stack.pop();
        write_char(&mut self.output, c)?;
        Ok(Ok(()))
    }
}
