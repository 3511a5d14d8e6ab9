//! Observability trait for inspecting emulator state.
//!
//! Hosts read registers and counters by path without knowing which
//! backend produced them. Queries never affect emulation state.

use std::fmt;

/// A dynamically-typed value for state queries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Value {
    /// Boolean value.
    Bool(bool),
    /// 32-bit unsigned integer (registers).
    U32(u32),
    /// 64-bit unsigned integer (counters).
    U64(u64),
    /// String value.
    String(String),
    /// Array of values.
    Array(Vec<Value>),
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Bool(v) => write!(f, "{v}"),
            Value::U32(v) => write!(f, "{v:08X}"),
            Value::U64(v) => write!(f, "{v}"),
            Value::String(v) => write!(f, "{v}"),
            Value::Array(arr) => {
                write!(f, "[")?;
                for (i, v) in arr.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{v}")?;
                }
                write!(f, "]")
            }
        }
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Bool(v)
    }
}

impl From<u32> for Value {
    fn from(v: u32) -> Self {
        Value::U32(v)
    }
}

impl From<u64> for Value {
    fn from(v: u64) -> Self {
        Value::U64(v)
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::String(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::String(v.to_string())
    }
}

impl From<&[u32]> for Value {
    fn from(v: &[u32]) -> Self {
        Value::Array(v.iter().copied().map(Value::U32).collect())
    }
}

/// A component whose state can be inspected.
pub trait Observable {
    /// Query a specific property by path.
    ///
    /// Paths are hierarchical, separated by dots:
    /// - `frame_count` - Completed frames since reset
    /// - `arm9.r15` - ARM9 program counter
    /// - `arm7.cpsr` - ARM7 status register
    ///
    /// Returns `None` if the path is not recognised.
    fn query(&self, path: &str) -> Option<Value>;

    /// List all available query paths.
    fn query_paths(&self) -> &'static [&'static str];
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn registers_display_as_eight_hex_digits() {
        assert_eq!(Value::U32(0x1F).to_string(), "0000001F");
        assert_eq!(Value::U32(0xDEAD_BEEF).to_string(), "DEADBEEF");
    }

    #[test]
    fn array_display() {
        let v = Value::from(&[1u32, 2][..]);
        assert_eq!(v.to_string(), "[00000001, 00000002]");
    }
}
