//! Arithmetic and comparison on stack values
//!
//! `a` is the second value from the top, `b` the top. Everything wraps on
//! overflow; callers rule out a zero divisor before dividing.

use crate::memory::Value;

pub fn add(a: Value, b: Value) -> Value {
    a.wrapping_add(b)
}

pub fn subtract(a: Value, b: Value) -> Value {
    a.wrapping_sub(b)
}

pub fn multiply(a: Value, b: Value) -> Value {
    a.wrapping_mul(b)
}

/// Truncating division
pub fn divide(a: Value, b: Value) -> Value {
    a.wrapping_div(b)
}

/// Remainder in `[0, b)` for a positive divisor and in `[b, 0)` for a
/// negative one, so an exact multiple of a negative `b` yields `b`
pub fn modulo(a: Value, b: Value) -> Value {
    let r = a.wrapping_rem_euclid(b);
    if b < 0 {
        r.wrapping_add(b)
    } else {
        r
    }
}

pub fn greater(a: Value, b: Value) -> Value {
    Value::from(a > b)
}

pub fn not(value: Value) -> Value {
    Value::from(value == 0)
}
