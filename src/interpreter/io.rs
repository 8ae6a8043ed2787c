//! Program input and output channels
//!
//! Both directions use UTF-8. The input side keeps one byte of lookahead so
//! `in_number` can stop at the first non-digit without consuming it.

use super::errors::Failure;
use crate::memory::Value;
use std::io::{self, ErrorKind, Read, Write};

/// Byte source with single-byte pushback
pub struct InputReader<R> {
    inner: R,
    peeked: Option<u8>,
}

impl<R: Read> InputReader<R> {
    pub fn new(inner: R) -> Self {
        InputReader {
            inner,
            peeked: None,
        }
    }

    fn next_byte(&mut self) -> Option<u8> {
        if let Some(b) = self.peeked.take() {
            return Some(b);
        }
        let mut buf = [0u8; 1];
        loop {
            match self.inner.read(&mut buf) {
                Ok(0) => return None,
                Ok(_) => return Some(buf[0]),
                Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                Err(e) => {
                    log::warn!("input read failed, treating as end of input: {}", e);
                    return None;
                }
            }
        }
    }

    fn peek_byte(&mut self) -> Option<u8> {
        if self.peeked.is_none() {
            self.peeked = self.next_byte();
        }
        self.peeked
    }

    /// Decode one code point
    pub fn read_char(&mut self) -> Result<char, Failure> {
        let lead = self.next_byte().ok_or(Failure::InputExhausted)?;
        let width = match lead {
            0x00..=0x7F => 1,
            0xC2..=0xDF => 2,
            0xE0..=0xEF => 3,
            0xF0..=0xF4 => 4,
            _ => return Err(Failure::MalformedInput),
        };

        let mut buf = [lead, 0, 0, 0];
        for slot in buf.iter_mut().take(width).skip(1) {
            match self.peek_byte() {
                Some(b) if b & 0xC0 == 0x80 => {
                    *slot = b;
                    self.peeked = None;
                }
                // Leave the offending byte for the next read
                _ => return Err(Failure::MalformedInput),
            }
        }

        std::str::from_utf8(&buf[..width])
            .ok()
            .and_then(|s| s.chars().next())
            .ok_or(Failure::MalformedInput)
    }

    /// Parse an optionally negative decimal integer, skipping leading whitespace
    pub fn read_number(&mut self) -> Result<Value, Failure> {
        while self.peek_byte().is_some_and(|b| b.is_ascii_whitespace()) {
            self.peeked = None;
        }

        let negative = match self.peek_byte() {
            None => return Err(Failure::InputExhausted),
            Some(b'-') => {
                self.peeked = None;
                true
            }
            Some(_) => false,
        };

        let mut value: Option<Value> = Some(0);
        let mut digits = 0;
        while let Some(b) = self.peek_byte().filter(u8::is_ascii_digit) {
            self.peeked = None;
            digits += 1;
            let digit = Value::from(b - b'0');
            // Accumulate toward the sign so i64::MIN parses
            value = value.and_then(|v| v.checked_mul(10)).and_then(|v| {
                if negative {
                    v.checked_sub(digit)
                } else {
                    v.checked_add(digit)
                }
            });
        }

        if digits == 0 {
            return Err(Failure::MalformedInput);
        }
        value.ok_or(Failure::MalformedInput)
    }
}

/// Write a number in decimal with no separator
pub fn write_number<W: Write>(out: &mut W, value: Value) -> io::Result<()> {
    write!(out, "{}", value)?;
    out.flush()
}

/// Write a single character as UTF-8
pub fn write_char<W: Write>(out: &mut W, c: char) -> io::Result<()> {
    let mut buf = [0u8; 4];
    out.write_all(c.encode_utf8(&mut buf).as_bytes())?;
    out.flush()
}
